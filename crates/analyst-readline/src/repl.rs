//! The interactive loop.
//!
//! Input is read on a dedicated thread (rustyline blocks) and forwarded to the
//! main task, which owns the [`Workbench`]. Sends run as spawned tasks and
//! hand their outcome back over a channel, so replies are applied while the
//! user keeps typing.

use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use tokio::sync::mpsc;

use analyst_application::{ActiveView, SendOutcome, ViewId, Workbench};
use analyst_core::AnalystError;
use analyst_core::navigation::Location;
use analyst_core::session::{SessionId, SessionIdMinter, SessionStore};

use crate::command::{self, Command};
use crate::helper::CliHelper;
use crate::render;

enum InputEvent {
    Line(String),
    Interrupted,
    Eof,
    Failed(String),
}

enum Flow {
    Continue,
    Quit,
}

/// Tracks what has already been printed for the mounted view.
struct Screen {
    width: usize,
    chat: Option<ViewId>,
    printed: usize,
}

impl Screen {
    fn new(width: usize) -> Self {
        Self {
            width,
            chat: None,
            printed: 0,
        }
    }

    /// Prints the whole mounted view.
    fn show_view(&mut self, workbench: &Workbench) {
        self.width = render::terminal_width();
        println!();
        println!("{}", render::render_view_header(workbench.location()));
        match workbench.view() {
            ActiveView::Chat(chat) => {
                self.chat = Some(chat.id());
                self.printed = 0;
                if chat.transcript().is_empty() && !chat.is_loading() {
                    println!("{}", render::render_empty_chat(self.width));
                }
                self.show_new(workbench);
            }
            ActiveView::Notebook(notebook) => {
                self.chat = None;
                for row in render::render_notebook(notebook.chats()) {
                    println!("{row}");
                }
                println!(
                    "{}",
                    "/open <n> to continue a chat, /new to start one".bright_black()
                );
            }
        }
    }

    /// Prints messages appended since the last call.
    fn show_new(&mut self, workbench: &Workbench) {
        let Some(chat) = workbench.chat() else {
            return;
        };
        if self.chat != Some(chat.id()) {
            self.show_view(workbench);
            return;
        }

        let fresh = chat.transcript().since(self.printed);
        for message in fresh {
            for line in render::render_message(message, self.width) {
                println!("{line}");
            }
        }
        if !fresh.is_empty() && chat.is_loading() {
            println!("{}", render::THINKING.bright_black().italic());
        }
        self.printed = chat.transcript().len();
    }
}

fn prompt(workbench: &Workbench) -> String {
    let place = workbench.location().to_string();
    match workbench.chat().and_then(|chat| chat.staged_attachment()) {
        Some(file) => format!("{place} [{}]> ", file.name()),
        None => format!("{place}> "),
    }
}

fn spawn_input_thread(
    events: mpsc::Sender<InputEvent>,
    prompts: std::sync::mpsc::Receiver<String>,
    first_prompt: String,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let mut rl: Editor<CliHelper, DefaultHistory> = match Editor::new() {
            Ok(rl) => rl,
            Err(err) => {
                let _ = events.blocking_send(InputEvent::Failed(err.to_string()));
                return;
            }
        };
        rl.set_helper(Some(CliHelper::new()));

        let mut prompt = first_prompt;
        loop {
            let event = match rl.readline(&prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = rl.add_history_entry(line.as_str());
                    }
                    InputEvent::Line(line)
                }
                Err(ReadlineError::Interrupted) => InputEvent::Interrupted,
                Err(ReadlineError::Eof) => InputEvent::Eof,
                Err(err) => InputEvent::Failed(err.to_string()),
            };
            let last = matches!(event, InputEvent::Eof | InputEvent::Failed(_));
            if events.blocking_send(event).is_err() || last {
                break;
            }
            // Wait until the line has been handled so output lands before the next prompt.
            match prompts.recv() {
                Ok(next) => prompt = next,
                Err(_) => break,
            }
        }
    })
}

/// Runs the REPL until the user quits.
pub async fn run(
    initial: Location,
    store: Arc<dyn SessionStore>,
    minter: Arc<dyn SessionIdMinter>,
) -> Result<()> {
    println!("{}", "=== Analyst ===".bright_magenta().bold());
    println!(
        "{}",
        "Type a question to analyze, '/help' for commands, or 'quit' to exit.".bright_black()
    );

    let mut workbench = Workbench::start(initial, store, minter).await;
    let mut screen = Screen::new(render::terminal_width());
    screen.show_view(&workbench);

    let (input_tx, mut input_rx) = mpsc::channel::<InputEvent>(32);
    let (outcome_tx, mut outcome_rx) = mpsc::channel::<SendOutcome>(32);
    let (prompt_tx, prompt_rx) = std::sync::mpsc::channel::<String>();
    let input_thread = spawn_input_thread(input_tx, prompt_rx, prompt(&workbench));

    loop {
        tokio::select! {
            event = input_rx.recv() => {
                let Some(event) = event else { break };
                match event {
                    InputEvent::Line(line) => {
                        let command = Command::parse(&line);
                        if let Flow::Quit = handle(command, &mut workbench, &mut screen, &outcome_tx).await {
                            println!("{}", "Goodbye!".bright_green());
                            break;
                        }
                    }
                    InputEvent::Interrupted => {
                        println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
                    }
                    InputEvent::Eof => {
                        println!("{}", "CTRL-D detected. Exiting...".bright_green());
                        break;
                    }
                    InputEvent::Failed(err) => {
                        eprintln!("{}", format!("Error: {err}").red());
                        break;
                    }
                }
                if prompt_tx.send(prompt(&workbench)).is_err() {
                    break;
                }
            }
            Some(outcome) = outcome_rx.recv() => {
                let failure = outcome.result.as_ref().err().cloned();
                if workbench.complete_send(outcome) {
                    screen.show_new(&workbench);
                    if let Some(err) = failure {
                        println!("{}", render::render_send_error(&err));
                    }
                }
            }
        }
    }

    drop(prompt_tx);
    let _ = input_thread.join();
    Ok(())
}

async fn handle(
    command: Command,
    workbench: &mut Workbench,
    screen: &mut Screen,
    outcomes: &mpsc::Sender<SendOutcome>,
) -> Flow {
    match command {
        Command::Send(text) => send(text, workbench, screen, outcomes),
        Command::Chat => {
            workbench.navigate(Location::new_chat()).await;
            screen.show_view(workbench);
        }
        Command::Notebook => {
            workbench.navigate(Location::notebook()).await;
            screen.show_view(workbench);
        }
        Command::Open(selector) => open(&selector, workbench, screen).await,
        Command::New => {
            workbench.new_chat().await;
            screen.show_view(workbench);
        }
        Command::Attach(path) => match workbench.stage_attachment(&path) {
            Ok(file) => println!(
                "{}",
                format!("Attached {}. It is sent with your next message.", file.name()).green()
            ),
            Err(err) if err.is_not_csv() => println!("{}", render::CSV_ALERT.red().bold()),
            Err(AnalystError::NoActiveChat) => {
                println!("{}", "Files can only be attached in a chat (/chat).".yellow())
            }
            Err(err) => println!("{}", err.to_string().red()),
        },
        Command::Detach => match workbench.clear_attachment() {
            Ok(Some(file)) => println!("{}", format!("Removed {}", file.name()).bright_black()),
            Ok(None) => println!("{}", "No file is attached".bright_black()),
            Err(err) => println!("{}", err.to_string().yellow()),
        },
        Command::Go(target) => match Location::parse(&target) {
            Ok(location) => {
                workbench.navigate(location).await;
                screen.show_view(workbench);
            }
            Err(err) => println!("{}", err.to_string().red()),
        },
        Command::Where => println!("{}", workbench.location()),
        Command::Refresh => {
            workbench.refresh().await;
            screen.show_view(workbench);
        }
        Command::Help => {
            for line in command::help_lines() {
                println!("{}", line.bright_black());
            }
        }
        Command::MissingArgument(usage) => println!("{}", format!("Usage: {usage}").yellow()),
        Command::Unknown(name) => {
            println!("{}", format!("Unknown command {name}. Type /help").bright_black())
        }
        Command::Quit => return Flow::Quit,
    }
    Flow::Continue
}

fn send(
    text: String,
    workbench: &mut Workbench,
    screen: &mut Screen,
    outcomes: &mpsc::Sender<SendOutcome>,
) {
    let has_file = workbench
        .chat()
        .is_some_and(|chat| chat.staged_attachment().is_some());
    if text.trim().is_empty() && !has_file {
        return;
    }

    let was_bound = workbench
        .chat()
        .is_some_and(|chat| chat.binding().is_bound());
    match workbench.begin_send(&text) {
        Ok(pending) => {
            let store = workbench.store();
            let tx = outcomes.clone();
            tokio::spawn(async move {
                let outcome = pending.dispatch(store.as_ref()).await;
                let _ = tx.send(outcome).await;
            });

            if !was_bound {
                println!("{}", workbench.location().to_string().bright_black());
            }
            screen.show_new(workbench);
        }
        Err(err) => println!("{}", render::render_send_error(&err)),
    }
}

async fn open(selector: &str, workbench: &mut Workbench, screen: &mut Screen) {
    if workbench.notebook().is_some() {
        match workbench.open_chat(selector).await {
            Some(_) => screen.show_view(workbench),
            None => println!("{}", format!("No chat matches '{selector}'").yellow()),
        }
        return;
    }

    // Outside the notebook the selector can only be a session id.
    match SessionId::parse(selector) {
        Some(session_id) => {
            workbench.navigate(Location::chat(session_id)).await;
            screen.show_view(workbench);
        }
        None => println!("{}", "Usage: /open <number|session id>".yellow()),
    }
}
