use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::store::EventStore;
use crate::errors::AppResult;
use crate::utils::colors::{GREY, RESET};
use crate::utils::date::{self, DayRange};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { date: date_arg } = cmd {
        let d = date::date_or_today(date_arg.as_ref())?;
        let range = DayRange::for_date(d)?;

        let mut store = EventStore::open(&cfg.database)?;
        let events = store.events_in_range(range.start, range.end)?;

        if events.is_empty() {
            println!("No events for {}", d);
            return Ok(());
        }

        println!("📋 Events for {} ({}):\n", date::display_date(d), d);
        for (i, ev) in events.iter().enumerate() {
            println!(
                "{:>3}. {} {} {:<8} {GREY}{}{RESET}",
                i + 1,
                ev.time_str(),
                ev.category.icon(),
                ev.category.to_db_str(),
                ev.timestamp
            );
        }
    }

    Ok(())
}
