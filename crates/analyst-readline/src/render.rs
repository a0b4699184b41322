//! Terminal rendering of transcripts and the notebook list.

use colored::{ColoredString, Colorize};
use pulldown_cmark::{Event as MdEvent, Options as MdOptions, Parser as MdParser, Tag, TagEnd};

use analyst_core::AnalystError;
use analyst_core::navigation::{Location, Route};
use analyst_core::session::{ChatSummary, Message, Sender};

pub const THINKING: &str = "Analyst is thinking…";
pub const NO_CHATS: &str = "No chats yet";
pub const CSV_ALERT: &str = "Only CSV files are allowed.";
pub const EMPTY_CHAT_HINT: &str = "Ask a question or /attach a CSV file to get started";

/// Width used when the terminal size is unknown.
pub const DEFAULT_WIDTH: usize = 80;

/// Current width of the terminal.
pub fn terminal_width() -> usize {
    width_from_size(crossterm::terminal::size())
}

fn width_from_size(size: std::io::Result<(u16, u16)>) -> usize {
    size.ok()
        .map(|(cols, _rows)| usize::from(cols))
        .filter(|&cols| cols >= 20)
        .unwrap_or(DEFAULT_WIDTH)
}

/// One line explaining why a message did not go through.
///
/// Validation problems are hints about what to do next; remote failures mean
/// the message was sent but never answered.
pub fn render_send_error(err: &AnalystError) -> String {
    if err.is_validation() {
        let hint = match err {
            AnalystError::NoActiveChat => {
                "Messages are sent from a chat. Use /open <n>, /new or /chat.".to_string()
            }
            other => other.to_string(),
        };
        hint.yellow().to_string()
    } else if err.is_remote() {
        format!("The analyst did not answer this message ({err}). Details are in the log.")
            .red()
            .to_string()
    } else {
        format!("The message could not be sent: {err}").red().to_string()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Inline {
    Strong,
    Emphasis,
    Strike,
    Heading,
}

fn styled(text: &str, styles: &[Inline]) -> String {
    if styles.is_empty() {
        return text.to_string();
    }
    let mut out: ColoredString = text.normal();
    for style in styles {
        out = match style {
            Inline::Strong | Inline::Heading => out.bold(),
            Inline::Emphasis => out.italic(),
            Inline::Strike => out.strikethrough(),
        };
    }
    out.to_string()
}

/// Renders CommonMark (with GFM tables, strikethrough and task lists) into
/// terminal lines.
pub fn render_markdown_lines(text: &str, width: usize) -> Vec<String> {
    let mut options = MdOptions::empty();
    options.insert(MdOptions::ENABLE_STRIKETHROUGH);
    options.insert(MdOptions::ENABLE_TABLES);
    options.insert(MdOptions::ENABLE_TASKLISTS);

    #[derive(Clone, Copy)]
    enum ListKind {
        Bullet,
        Ordered(u64),
    }

    let mut lines = Vec::new();
    let mut line = String::new();
    let mut quote_depth = 0usize;
    let mut list_stack: Vec<ListKind> = Vec::new();
    let mut styles: Vec<Inline> = Vec::new();
    let mut links: Vec<String> = Vec::new();
    let mut in_code_block = false;

    let mut table: Option<TableBuilder> = None;

    let flush_line = |line: &mut String, lines: &mut Vec<String>| {
        if !line.is_empty() {
            lines.push(std::mem::take(line));
        }
    };

    for event in MdParser::new_ext(text, options) {
        if in_code_block {
            match event {
                MdEvent::End(TagEnd::CodeBlock) => {
                    in_code_block = false;
                    lines.push(String::new());
                }
                MdEvent::Text(t) | MdEvent::Code(t) => {
                    for code_line in t.lines() {
                        lines.push(format!("    {}", code_line.yellow()));
                    }
                }
                _ => {}
            }
            continue;
        }

        if let Some(builder) = table.as_mut() {
            match event {
                MdEvent::Start(Tag::TableHead) | MdEvent::Start(Tag::TableRow) => {
                    builder.rows.push(Vec::new())
                }
                MdEvent::Start(Tag::TableCell) => builder.cell.clear(),
                MdEvent::End(TagEnd::TableCell) => {
                    let cell = std::mem::take(&mut builder.cell);
                    if let Some(row) = builder.rows.last_mut() {
                        row.push(cell);
                    }
                }
                MdEvent::End(TagEnd::TableHead) => builder.header_rows = builder.rows.len(),
                MdEvent::End(TagEnd::Table) => {
                    if let Some(builder) = table.take() {
                        lines.extend(builder.finish());
                    }
                    lines.push(String::new());
                }
                MdEvent::Text(t) | MdEvent::Code(t) => builder.cell.push_str(&t),
                _ => {}
            }
            continue;
        }

        match event {
            MdEvent::Start(tag) => match tag {
                Tag::Paragraph => {}
                Tag::Heading { .. } => {
                    flush_line(&mut line, &mut lines);
                    styles.push(Inline::Heading);
                }
                Tag::BlockQuote(_) => {
                    flush_line(&mut line, &mut lines);
                    quote_depth = quote_depth.saturating_add(1);
                }
                Tag::List(start) => {
                    flush_line(&mut line, &mut lines);
                    match start {
                        Some(n) => list_stack.push(ListKind::Ordered(n)),
                        None => list_stack.push(ListKind::Bullet),
                    }
                }
                Tag::Item => {
                    flush_line(&mut line, &mut lines);
                    line.push_str(&"  ".repeat(list_stack.len().saturating_sub(1)));
                    if let Some(kind) = list_stack.last_mut() {
                        match kind {
                            ListKind::Bullet => line.push_str("• "),
                            ListKind::Ordered(n) => {
                                line.push_str(&format!("{n}. "));
                                *n += 1;
                            }
                        }
                    }
                }
                Tag::CodeBlock(_) => {
                    flush_line(&mut line, &mut lines);
                    in_code_block = true;
                }
                Tag::Table(_) => {
                    flush_line(&mut line, &mut lines);
                    table = Some(TableBuilder::default());
                }
                Tag::Strong => styles.push(Inline::Strong),
                Tag::Emphasis => styles.push(Inline::Emphasis),
                Tag::Strikethrough => styles.push(Inline::Strike),
                Tag::Link { dest_url, .. } => links.push(dest_url.to_string()),
                Tag::Image { dest_url, .. } => {
                    line.push_str(&format!("[image: {dest_url}] "));
                    links.push(String::new());
                }
                _ => {}
            },
            MdEvent::End(tag_end) => match tag_end {
                TagEnd::Paragraph => {
                    flush_line(&mut line, &mut lines);
                    lines.push(String::new());
                }
                TagEnd::Heading(_) => {
                    styles.pop();
                    flush_line(&mut line, &mut lines);
                    lines.push(String::new());
                }
                TagEnd::BlockQuote(_) => {
                    flush_line(&mut line, &mut lines);
                    quote_depth = quote_depth.saturating_sub(1);
                    lines.push(String::new());
                }
                TagEnd::List(_) => {
                    flush_line(&mut line, &mut lines);
                    list_stack.pop();
                    if list_stack.is_empty() {
                        lines.push(String::new());
                    }
                }
                TagEnd::Item => flush_line(&mut line, &mut lines),
                TagEnd::Strong | TagEnd::Emphasis | TagEnd::Strikethrough => {
                    styles.pop();
                }
                TagEnd::Link | TagEnd::Image => {
                    if let Some(url) = links.pop()
                        && !url.is_empty()
                    {
                        line.push_str(&format!(" ({})", url.bright_black()));
                    }
                }
                _ => {}
            },
            MdEvent::Text(t) => {
                if line.is_empty() && quote_depth > 0 {
                    line.push_str(&"│ ".repeat(quote_depth));
                }
                line.push_str(&styled(&t, &styles));
            }
            MdEvent::Code(t) => line.push_str(&t.cyan().to_string()),
            MdEvent::TaskListMarker(done) => line.push_str(if done { "[x] " } else { "[ ] " }),
            MdEvent::SoftBreak => line.push(' '),
            MdEvent::HardBreak => flush_line(&mut line, &mut lines),
            MdEvent::Rule => {
                flush_line(&mut line, &mut lines);
                lines.push("─".repeat(width.min(48)));
                lines.push(String::new());
            }
            MdEvent::InlineMath(t) | MdEvent::DisplayMath(t) => line.push_str(&t),
            _ => {}
        }
    }
    flush_line(&mut line, &mut lines);

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

#[derive(Default)]
struct TableBuilder {
    rows: Vec<Vec<String>>,
    header_rows: usize,
    cell: String,
}

impl TableBuilder {
    fn finish(self) -> Vec<String> {
        let columns = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut widths = vec![0usize; columns];
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let format_row = |row: &[String]| {
            let cells: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, width)| {
                    let cell = row.get(i).map(String::as_str).unwrap_or("");
                    let pad = width.saturating_sub(cell.chars().count());
                    format!(" {}{} ", cell, " ".repeat(pad))
                })
                .collect();
            format!("│{}│", cells.join("│"))
        };

        let mut out = Vec::with_capacity(self.rows.len() + 1);
        for (i, row) in self.rows.iter().enumerate() {
            let rendered = format_row(row);
            if i < self.header_rows {
                out.push(rendered.bold().to_string());
            } else {
                out.push(rendered);
            }
            if i + 1 == self.header_rows {
                let rule: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
                out.push(format!("├{}┤", rule.join("┼")));
            }
        }
        out
    }
}

/// Renders one transcript message.
pub fn render_message(message: &Message, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    match message.sender {
        Sender::User => {
            out.push("You".green().bold().to_string());
            for line in message.text.lines() {
                out.push(format!("  {}", line.green()));
            }
            if let Some(file) = &message.file {
                out.push(format!("  {}", format!("📎 {file}").bright_black()));
            }
        }
        Sender::Bot => {
            out.push("Analyst".bright_blue().bold().to_string());
            for line in render_markdown_lines(&message.text, width.saturating_sub(2)) {
                out.push(format!("  {line}"));
            }
            if let Some(plot) = &message.plot {
                out.push(format!("  {} {}", "Plot:".magenta(), plot.underline()));
            }
        }
    }
    out
}

/// Header printed whenever a view is (re)mounted.
pub fn render_view_header(location: &Location) -> String {
    let title = match (location.route(), location.session_id()) {
        (Route::Notebook, _) => "Notebook".to_string(),
        (Route::Chat, Some(id)) => format!("Chat {}", id.short(8)),
        (Route::Chat, None) => "New chat".to_string(),
    };
    format!("── {} ── {}", title.bright_magenta().bold(), location.to_string().bright_black())
}

/// Hint shown for a chat with no messages, centred in `width`.
pub fn render_empty_chat(width: usize) -> String {
    let len = EMPTY_CHAT_HINT.chars().count();
    let pad = width.saturating_sub(len) / 2;
    format!("{}{}", " ".repeat(pad), EMPTY_CHAT_HINT.bright_black())
}

/// Renders the notebook list, one numbered row per chat.
pub fn render_notebook(chats: &[ChatSummary]) -> Vec<String> {
    if chats.is_empty() {
        return vec![NO_CHATS.bright_black().to_string()];
    }

    let mut out = Vec::with_capacity(chats.len() * 2);
    for (i, chat) in chats.iter().enumerate() {
        let indicator = if chat.has_attachment() { " 📎" } else { "" };
        out.push(format!(
            "{:>3}. {}{}  {}",
            i + 1,
            chat.title.bold(),
            indicator,
            chat.session_id.short(8).bright_black()
        ));
        if !chat.preview.is_empty() {
            out.push(format!("     {}", chat.preview.bright_black()));
        }
    }
    out
}
