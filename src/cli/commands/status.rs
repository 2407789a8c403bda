use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::session::Session;
use crate::errors::{AppError, AppResult};
use crate::ui::banner::TerminalSink;
use crate::ui::render::render_day;
use crate::utils::date;
use chrono::Local;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Status { date: date_arg } = cmd {
        let d = date::date_or_today(date_arg.as_ref())?;

        let noon = date::midday_millis(d);

        let session = Session::open_in(&cfg.database, Local, noon, TerminalSink)
            .map_err(AppError::reported)?;
        print!("{}", render_day(session.day(), session.counts(), None));
    }

    Ok(())
}
