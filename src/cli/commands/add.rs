use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::session::Session;
use crate::db::log;
use crate::errors::{AppError, AppResult};
use crate::ui::banner::TerminalSink;
use crate::ui::messages::success;
use crate::ui::render::render_day;

/// Log an event now and print the refreshed counts for today.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Add { category } = cmd {
        // failures are printed by the sink
        let mut session =
            Session::open(&cfg.database, TerminalSink).map_err(AppError::reported)?;
        let event = session
            .log_activity(*category)
            .map_err(AppError::reported)?;

        success(format!("Logged {} at {}", category, event.time_str()));
        print!("{}", render_day(session.day(), session.counts(), None));

        log::ttlog_or_warn(
            session.store().conn(),
            "add",
            category.to_db_str(),
            &format!("timestamp {}", event.timestamp),
        );
    }

    Ok(())
}
