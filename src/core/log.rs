use crate::errors::AppResult;
use crate::store::log::{LogEntry, read_log};
use ansi_term::Colour;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

const OP_WIDTH_MAX: usize = 60;

fn strip_ansi(s: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("static regex"));
    re.replace_all(s, "").into_owned()
}

/// ANSI colour of an operation name.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "join" => Colour::Green,
        "leave" => Colour::Yellow,
        "reject" => Colour::Red,
        "setup" => Colour::Cyan,
        "clear" | "reset" => Colour::Purple,
        "backup" | "export" => Colour::Blue,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

fn truncate_visible(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let mut out: String = s.chars().take(max - 3).collect();
        out.push_str("...");
        out
    } else {
        s.to_string()
    }
}

/// One printable line; `op_w` is the padded width of the op/target column.
fn format_line(idx: usize, idx_w: usize, date_w: usize, op_w: usize, e: &LogEntry) -> String {
    let date = chrono::DateTime::parse_from_rfc3339(&e.date)
        .map(|dt| dt.format("%FT%T%:z").to_string())
        .unwrap_or_else(|_| e.date.clone());

    let op_target = if e.target.is_empty() {
        e.operation.clone()
    } else {
        format!("{} ({})", e.operation, e.target)
    };
    let visible = truncate_visible(&op_target, OP_WIDTH_MAX);

    // only the operation word is coloured
    let color = color_for_operation(&e.operation);
    let colored = match visible.split_once(' ') {
        Some((op, rest)) => format!("{} {}", color.paint(op), rest),
        None => color.paint(visible.as_str()).to_string(),
    };
    let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&colored).chars().count()));

    format!(
        "{:>idx_w$}: {:<date_w$} | {}{} => {}",
        idx,
        date,
        colored,
        padding,
        e.message,
        idx_w = idx_w,
        date_w = date_w
    )
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(path: &Path) -> AppResult<()> {
        let entries = read_log(path)?;
        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let op_w = entries
            .iter()
            .map(|e| e.operation.chars().count() + e.target.chars().count() + 3)
            .max()
            .unwrap_or(10)
            .min(OP_WIDTH_MAX);
        let idx_w = entries.len().to_string().len();
        let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(25);

        println!("📜 Internal log:\n");
        for (i, e) in entries.iter().enumerate() {
            println!("{}", format_line(i + 1, idx_w, date_w, op_w, e));
        }
        Ok(())
    }
}
