//! Terminal and JSON output.
//!
//! In JSON mode commands print JSON documents on stdout and status lines are
//! suppressed; otherwise results are aligned tables.
//! Styling comes from `console`, which drops escape codes when stdout is not
//! a terminal.

use std::fmt::Display;

use console::style;
use serde::Serialize;
use serde_json::{Map, Value};

/// Column cells longer than this are cut by [`truncate`].
pub const MAX_CELL_WIDTH: usize = 40;

/// Gap between table columns.
const COLUMN_GAP: usize = 2;

#[derive(Debug, Clone, Copy, Default)]
pub struct Printer {
    json: bool,
}

impl Printer {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Pretty-print `value` as JSON, regardless of mode.
    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), serde_json::Error> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Print rows under `headers`.
    ///
    /// In JSON mode rows become objects keyed by the snake-cased header.
    pub fn table(&self, headers: &[&str], rows: &[Vec<String>]) -> Result<(), serde_json::Error> {
        if self.json {
            return self.print_json(&rows_as_objects(headers, rows));
        }

        if rows.is_empty() {
            println!("{}", style("(none)").dim());
            return Ok(());
        }

        let mut lines = render_table(headers, rows).into_iter();
        if let Some(header) = lines.next() {
            println!("{}", style(header).bold());
        }
        if let Some(separator) = lines.next() {
            println!("{}", style(separator).dim());
        }
        for line in lines {
            println!("{}", line);
        }
        Ok(())
    }

    /// `key: value` pairs for a single entity.
    pub fn details(&self, pairs: &[(&str, String)]) {
        let width = pairs.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (key, value) in pairs {
            let label = format!("{:<w$}", format!("{}:", key), w = width + 1);
            println!("{}  {}", style(label).bold(), value);
        }
    }

    pub fn success(&self, message: impl Display) {
        if !self.json {
            println!("{} {}", style("✓").green().bold(), message);
        }
    }

    pub fn info(&self, message: impl Display) {
        if !self.json {
            println!("{} {}", style("ℹ").blue().bold(), message);
        }
    }
}

/// Print an error line on stderr; shown in every mode.
pub fn error(message: impl Display) {
    eprintln!("{} {}", style("✗").red().bold().for_stderr(), message);
}

/// Lay out a table as plain text lines: header, separator, then one line per
/// row. Trailing whitespace is trimmed.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| {
        let mut out = String::new();
        for (cell, width) in cells.iter().zip(&widths) {
            out.push_str(&format!("{:<w$}", cell, w = width + COLUMN_GAP));
        }
        out.trim_end().to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(line(headers.to_vec()));

    let dashes: Vec<String> = headers.iter().map(|h| "-".repeat(h.chars().count())).collect();
    lines.push(line(dashes.iter().map(String::as_str).collect()));

    for row in rows {
        lines.push(line(row.iter().map(String::as_str).collect()));
    }
    lines
}

fn rows_as_objects(headers: &[&str], rows: &[Vec<String>]) -> Vec<Value> {
    rows.iter()
        .map(|row| {
            let object: Map<String, Value> = headers
                .iter()
                .zip(row)
                .map(|(h, cell)| (json_key(h), Value::String(cell.clone())))
                .collect();
            Value::Object(object)
        })
        .collect()
}

fn json_key(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

/// Cut `s` to at most `max` characters, ending with `...` when shortened.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max <= 3 {
        return s.chars().take(max).collect();
    }
    let head: String = s.chars().take(max - 3).collect();
    format!("{}...", head)
}
