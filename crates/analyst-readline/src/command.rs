//! REPL command parsing.

use std::path::PathBuf;

/// Slash commands offered for completion, in help order.
pub const COMMANDS: &[&str] = &[
    "/chat", "/notebook", "/open", "/new", "/attach", "/detach", "/go", "/where", "/refresh",
    "/help",
];

/// One line of user input, interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the chat view without a session (`/`).
    Chat,
    /// Show the notebook (`/notebook`).
    Notebook,
    /// Open a notebook row by position or session id.
    Open(String),
    /// Start a new chat.
    New,
    /// Stage a CSV file for the next message.
    Attach(PathBuf),
    /// Drop the staged file.
    Detach,
    /// Go to an arbitrary location string.
    Go(String),
    /// Print the current location.
    Where,
    /// Remount the current view.
    Refresh,
    Help,
    Quit,
    /// Anything that is not a command: the chat input, as typed.
    Send(String),
    /// A known command without its required argument.
    MissingArgument(&'static str),
    /// A line starting with `/` that names no command.
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed == "quit" || trimmed == "exit" {
            return Command::Quit;
        }
        if !trimmed.starts_with('/') {
            return Command::Send(line.to_string());
        }
        // `//text` sends `/text`.
        if trimmed.starts_with("//") {
            let lead = line.len() - line.trim_start().len();
            return Command::Send(format!("{}{}", &line[..lead], &line[lead + 1..]));
        }

        let (name, arg) = match trimmed.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (trimmed, ""),
        };

        match name {
            "/chat" => Command::Chat,
            "/notebook" => Command::Notebook,
            "/new" => Command::New,
            "/detach" => Command::Detach,
            "/where" => Command::Where,
            "/refresh" => Command::Refresh,
            "/help" => Command::Help,
            "/open" if arg.is_empty() => Command::MissingArgument("/open <number|session id>"),
            "/open" => Command::Open(arg.to_string()),
            "/attach" if arg.is_empty() => Command::MissingArgument("/attach <path to .csv>"),
            "/attach" => Command::Attach(PathBuf::from(unquote(arg))),
            "/go" if arg.is_empty() => Command::MissingArgument("/go <location>"),
            "/go" => Command::Go(arg.to_string()),
            _ => Command::Unknown(name.to_string()),
        }
    }
}

// Paths dragged into a terminal often arrive quoted.
fn unquote(arg: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = arg
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    arg
}

/// Help text for `/help`.
pub fn help_lines() -> Vec<&'static str> {
    vec![
        "Type a message and press Enter to send it.",
        "//text           send a message that starts with '/'",
        "/attach <path>   stage a CSV file for the next message (Enter on an empty line sends it alone)",
        "/detach          drop the staged file",
        "/new             start a new chat",
        "/notebook        list all chats",
        "/open <n|id>     open a chat from the notebook",
        "/chat            go to the chat view",
        "/go <location>   go to a location such as /?chat=<id>",
        "/where           show the current location",
        "/refresh         reload the current view",
        "quit             exit",
    ]
}
