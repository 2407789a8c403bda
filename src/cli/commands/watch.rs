use super::runtime;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::session::Session;
use crate::core::watch;
use crate::errors::AppResult;
use crate::ui::banner::Banner;
use crate::ui::messages::info;
use crate::ui::render::render_day;
use crate::utils::date::now_millis;
use std::io::{self, Write};
use std::time::Duration;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Watch { interval } = cmd {
        let every = Duration::from_secs(interval.unwrap_or(cfg.day_check_interval).max(1));
        let mut session = Session::open(&cfg.database, Banner::default())?;

        let rt = runtime()?;
        let rollovers = rt.block_on(watch::run(
            &mut session,
            every,
            now_millis,
            |s| {
                print!(
                    "{}{}\n(Ctrl-C to quit)\n",
                    CLEAR_SCREEN,
                    render_day(s.day(), s.counts(), s.sink().message())
                );
                let _ = io::stdout().flush();
            },
            async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::warn!(error = %e, "cannot listen for Ctrl-C");
                    std::future::pending::<()>().await;
                }
            },
        ));

        info(format!("Stopped watching ({} day changes seen).", rollovers));
    }

    Ok(())
}
