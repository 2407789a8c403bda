use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;
use rusqlite::Connection;

struct LogEntry {
    id: i64,
    date: String,
    operation: String,
    target: String,
    message: String,
}

fn strip_ansi(re: &Regex, s: &str) -> String {
    re.replace_all(s, "").into_owned()
}

/// Colour of an operation in the log listing.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "add" => Colour::Green,
        "reset" => Colour::Red,
        "init" => Colour::RGB(255, 153, 51),
        "cache_install" | "cache_activate" => Colour::Blue,
        other if other.starts_with("migrate") => Colour::Purple,
        _ => Colour::White,
    }
}

pub struct LogLogic;

impl LogLogic {
    /// Load the audit log as printable lines, oldest first.
    pub fn render_log(conn: &Connection) -> AppResult<Vec<String>> {
        let mut stmt = conn.prepare_cached(
            "SELECT id, date, operation, target, message FROM log ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            let raw_date: String = row.get(1)?;
            let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                .map(|dt| dt.format("%F %T").to_string())
                .unwrap_or(raw_date);

            Ok(LogEntry {
                id: row.get(0)?,
                date,
                operation: row.get(2)?,
                target: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                message: row.get(4)?,
            })
        })?;

        let mut entries = Vec::new();
        for r in rows {
            entries.push(r?);
        }

        let ansi = Regex::new(r"\x1B\[[0-9;]*[mK]")
            .map_err(|e| crate::errors::AppError::Other(e.to_string()))?;

        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let op_w = entries
            .iter()
            .map(|e| e.operation.len() + e.target.len() + 3)
            .max()
            .unwrap_or(10)
            .min(40);

        let lines = entries
            .into_iter()
            .map(|e| {
                let painted = color_for_operation(&e.operation)
                    .paint(e.operation.as_str())
                    .to_string();
                let op_target = if e.target.is_empty() {
                    painted
                } else {
                    format!("{} ({})", painted, e.target)
                };

                // padding computed on the visible width, without ANSI codes
                let visible = strip_ansi(&ansi, &op_target).chars().count();
                let padding = " ".repeat(op_w.saturating_sub(visible));

                format!(
                    "{:>id_w$}: {} | {}{} => {}",
                    e.id,
                    e.date,
                    op_target,
                    padding,
                    e.message,
                    id_w = id_w
                )
            })
            .collect();

        Ok(lines)
    }

    pub fn print_log(conn: &Connection) -> AppResult<()> {
        let lines = Self::render_log(conn)?;

        println!("📜 Internal log:\n");
        if lines.is_empty() {
            println!("(empty)");
        }
        for line in lines {
            println!("{}", line);
        }

        Ok(())
    }
}
