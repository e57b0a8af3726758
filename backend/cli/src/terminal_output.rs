//! Terminal output utilities: ANSI notes, progress bar, table rendering.

use std::io::Write;

// ---------------------------------------------------------------------------
// ANSI Color/Style helpers
// ---------------------------------------------------------------------------

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

const BAR_WIDTH: usize = 30;

/// Color unless `NO_COLOR` is set or the terminal is dumb or unknown.
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::env::var_os("COLORTERM").is_some()
        || std::env::var("TERM").is_ok_and(|term| term != "dumb")
}

/// Remove `ESC [ ... m` sequences.
pub fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_escape = false;
    for c in s.chars() {
        match (in_escape, c) {
            (false, '\x1b') => in_escape = true,
            (false, c) => out.push(c),
            (true, 'm') => in_escape = false,
            (true, _) => {}
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Formatted notes
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
enum Note {
    Info,
    Warn,
    Error,
    Success,
}

impl Note {
    fn style(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Note::Info => (CYAN, "ℹ", "INFO:"),
            Note::Warn => (YELLOW, "⚠", "WARN:"),
            Note::Error => (RED, "✗", "ERROR:"),
            Note::Success => (GREEN, "✓", "OK:"),
        }
    }

    fn render(self, msg: &str) -> String {
        let (color, icon, plain) = self.style();
        if supports_color() {
            format!("{color}{BOLD}{icon}{RESET} {msg}")
        } else {
            format!("{plain} {msg}")
        }
    }
}

pub fn note_info(msg: &str) {
    println!("{}", Note::Info.render(msg));
}

pub fn note_warn(msg: &str) {
    println!("{}", Note::Warn.render(msg));
}

/// Errors go to stderr.
pub fn note_error(msg: &str) {
    eprintln!("{}", Note::Error.render(msg));
}

pub fn note_success(msg: &str) {
    println!("{}", Note::Success.render(msg));
}

// ---------------------------------------------------------------------------
// Progress bar
// ---------------------------------------------------------------------------

/// One-line bar for a whole percentage. Shows "Processing..." at 100%
/// while the server is still forwarding files.
pub fn render_progress_bar(percent: u8) -> String {
    let percent = percent.min(100);
    let filled = BAR_WIDTH * percent as usize / 100;
    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled));
    let label = if percent < 100 {
        format!("Uploading... {percent}%")
    } else {
        "Processing...".to_string()
    };
    if supports_color() {
        format!("[{CYAN}{bar}{RESET}] {DIM}{label}{RESET}")
    } else {
        format!("[{bar}] {label}")
    }
}

// ---------------------------------------------------------------------------
// Table rendering
// ---------------------------------------------------------------------------

/// Render left-aligned columns with a bold header and a dashed separator.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(strip_ansi(cell).len());
        }
    }

    let mut out = String::new();

    let header_cells: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| pad_cell(h, widths[i]))
        .collect();
    out.push_str(&format!("{BOLD}  {}  {RESET}\n", header_cells.join("  ")));

    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("  {}  \n", sep.join("  ")));

    for row in rows {
        let cells: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, w)| pad_cell(row.get(i).map(String::as_str).unwrap_or(""), *w))
            .collect();
        out.push_str(&format!("  {}  \n", cells.join("  ")));
    }

    out
}

fn pad_cell(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(strip_ansi(s).len());
    format!("{s}{}", " ".repeat(pad))
}

// ---------------------------------------------------------------------------
// Streaming writer
// ---------------------------------------------------------------------------

/// Write a chunk and flush, for in-place redraws.
pub fn stream_write(writer: &mut impl Write, chunk: &str) -> std::io::Result<()> {
    writer.write_all(chunk.as_bytes())?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_ansi() {
        let colored = format!("{GREEN}{BOLD}hello{RESET} world");
        assert_eq!(strip_ansi(&colored), "hello world");
    }

    #[test]
    fn notes_keep_message_text() {
        for note in [Note::Info, Note::Warn, Note::Error, Note::Success] {
            assert!(strip_ansi(&note.render("queued 3 files")).ends_with(" queued 3 files"));
        }
    }

    #[test]
    fn progress_bar_fills_and_switches_label() {
        let half = strip_ansi(&render_progress_bar(50));
        assert!(half.contains(&"#".repeat(15)));
        assert!(half.ends_with("Uploading... 50%"));

        let done = strip_ansi(&render_progress_bar(100));
        assert!(done.contains(&"#".repeat(BAR_WIDTH)));
        assert!(done.ends_with("Processing..."));
    }

    #[test]
    fn renders_table() {
        let rows = vec![
            vec!["error".to_string(), "media".to_string()],
            vec!["warning".to_string(), "server.port".to_string()],
        ];
        let table = strip_ansi(&render_table(&["Level", "Path"], &rows));
        assert!(table.contains("warning  server.port"));
        assert!(table.contains("-------"));
    }
}
