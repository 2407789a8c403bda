//! The only recurring task: periodically re-evaluate whether the day rolled
//! over and redraw when it did.

use crate::core::session::Session;
use crate::ui::banner::ErrorSink;
use chrono::TimeZone;
use std::future::Future;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};

/// Run the day-rollover check every `every` until `shutdown` resolves.
///
/// `render` is called once up front and again after each rollover or
/// failed check. `clock` returns the current time in ms since epoch.
/// Returns the number of rollovers observed.
pub async fn run<S, Tz, C, R, F>(
    session: &mut Session<S, Tz>,
    every: Duration,
    clock: C,
    mut render: R,
    shutdown: F,
) -> usize
where
    S: ErrorSink,
    Tz: TimeZone,
    C: Fn() -> i64,
    R: FnMut(&Session<S, Tz>),
    F: Future<Output = ()>,
{
    render(&*session);

    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;

    tokio::pin!(shutdown);
    let mut rollovers = 0;

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                match session.check_date_change(clock()) {
                    Ok(true) => {
                        rollovers += 1;
                        render(&*session);
                    }
                    Ok(false) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "day check failed");
                        render(&*session);
                    }
                }
            }
        }
    }

    rollovers
}
