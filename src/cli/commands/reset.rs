use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::session::Session;
use crate::db::log;
use crate::errors::{AppError, AppResult};
use crate::ui::banner::TerminalSink;
use crate::ui::messages::{info, success, warning};
use crate::utils::date;
use chrono::Local;

use std::io::{self, Write};

/// Ask a yes/no confirmation from the user
fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Reset {
        date: date_arg,
        yes,
    } = cmd
    {
        let d = date::date_or_today(date_arg.as_ref())?;

        if !*yes
            && !ask_confirmation(&format!(
                "Delete ALL events for {}? This action is irreversible.",
                d
            ))
        {
            info("Operation cancelled.");
            return Ok(());
        }

        let noon = date::midday_millis(d);

        let mut session = Session::open_in(&cfg.database, Local, noon, TerminalSink)
            .map_err(AppError::reported)?;
        let deleted = session.reset_counts().map_err(AppError::reported)?;

        success(format!("Counts reset for {} ({} events deleted).", d, deleted));

        log::ttlog_or_warn(
            session.store().conn(),
            "reset",
            &d.to_string(),
            &format!("{} events deleted", deleted),
        );
    }

    Ok(())
}
