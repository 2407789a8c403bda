use chrono::{NaiveDate, TimeZone, Utc};
use rpeetracker::core::session::Session;
use rpeetracker::core::store::EventStore;
use rpeetracker::core::watch;
use rpeetracker::models::category::Category;
use rpeetracker::models::day_counts::DayCounts;
use rpeetracker::ui::banner::Banner;
use std::env;
use std::time::Duration;

mod common;
use common::RecordingSink;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> i64 {
    Utc.with_ymd_and_hms(y, m, d, h, min, s)
        .unwrap()
        .timestamp_millis()
}

fn memory_session(now_ms: i64) -> Session<Banner, Utc> {
    let store = EventStore::open_in_memory().unwrap();
    Session::start(store, Utc, now_ms, Banner::default()).unwrap()
}

#[test]
fn test_session_starts_on_the_day_of_now() {
    let session = memory_session(at(2026, 10, 14, 9, 30, 0));

    assert_eq!(
        session.day().date,
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    );
    assert_eq!(session.day().label, "October 14");
    assert_eq!(session.counts(), DayCounts::default());
    assert!(!session.sink().is_visible());
}

#[test]
fn test_log_activity_refreshes_counts() {
    let mut session = memory_session(at(2026, 10, 14, 8, 0, 0));

    session
        .log_activity_at(Category::Water, at(2026, 10, 14, 8, 0, 1))
        .unwrap();
    session
        .log_activity_at(Category::Water, at(2026, 10, 14, 9, 0, 0))
        .unwrap();
    session
        .log_activity_at(Category::Urinate, at(2026, 10, 14, 9, 30, 0))
        .unwrap();

    assert_eq!(
        session.counts(),
        DayCounts {
            water: 2,
            urinate: 1
        }
    );
}

#[test]
fn test_failures_reach_the_banner_and_success_clears_it() {
    let mut session = memory_session(at(2026, 10, 14, 8, 0, 0));
    let ts = at(2026, 10, 14, 8, 15, 0);

    session.log_activity_at(Category::Water, ts).unwrap();
    assert!(session.log_activity_at(Category::Urinate, ts).is_err());

    let shown = session.sink().message().unwrap().to_string();
    assert!(shown.starts_with("Error: "), "{shown}");
    assert!(shown.contains("already exists"), "{shown}");
    // the failed append did not change the tallies
    assert_eq!(session.counts().water, 1);
    assert_eq!(session.counts().urinate, 0);

    session.log_activity_at(Category::Urinate, ts + 1).unwrap();
    assert!(!session.sink().is_visible());
}

#[test]
fn test_reset_counts_only_touches_current_day() {
    let mut session = memory_session(at(2026, 10, 14, 20, 0, 0));

    session
        .store_mut()
        .append_at(Category::Water, at(2026, 10, 13, 23, 59, 59))
        .unwrap();
    session
        .log_activity_at(Category::Water, at(2026, 10, 14, 0, 0, 0))
        .unwrap();
    session
        .log_activity_at(Category::Urinate, at(2026, 10, 14, 12, 0, 0))
        .unwrap();

    let deleted = session.reset_counts().unwrap();
    assert_eq!(deleted, 2);
    assert_eq!(session.counts(), DayCounts::default());

    let yesterday = at(2026, 10, 13, 0, 0, 0);
    let n = session
        .store_mut()
        .count_by_category_in_range(Category::Water, yesterday, yesterday + 86_400_000 - 1)
        .unwrap();
    assert_eq!(n, 1);

    // counts stay at zero after a reload
    assert_eq!(session.load_data().unwrap(), DayCounts::default());
}

#[test]
fn test_failed_reset_reaches_the_banner_and_keeps_counts() {
    let mut session = memory_session(at(2026, 10, 14, 10, 0, 0));
    session
        .log_activity_at(Category::Water, at(2026, 10, 14, 8, 0, 0))
        .unwrap();
    session
        .log_activity_at(Category::Urinate, at(2026, 10, 14, 9, 0, 0))
        .unwrap();

    session
        .store()
        .conn()
        .execute_batch(
            "CREATE TRIGGER no_delete BEFORE DELETE ON events
             BEGIN SELECT RAISE(ABORT, 'read only'); END;",
        )
        .unwrap();

    assert!(session.reset_counts().is_err());
    let shown = session.sink().message().unwrap().to_string();
    assert!(shown.contains("Transaction failed"), "{shown}");
    assert_eq!(
        session.counts(),
        DayCounts {
            water: 1,
            urinate: 1
        }
    );
    assert_eq!(session.load_data().unwrap().water, 1);
}

#[test]
fn test_rollover_switches_day_and_resets_counts() {
    let mut session = memory_session(at(2026, 10, 14, 23, 50, 0));
    session
        .log_activity_at(Category::Water, at(2026, 10, 14, 23, 55, 0))
        .unwrap();
    assert_eq!(session.counts().water, 1);

    assert!(!session.check_date_change(at(2026, 10, 14, 23, 59, 59)).unwrap());
    assert_eq!(session.day().label, "October 14");

    assert!(session.check_date_change(at(2026, 10, 15, 0, 0, 1)).unwrap());
    assert_eq!(session.day().label, "October 15");
    assert_eq!(session.counts(), DayCounts::default());

    session
        .log_activity_at(Category::Urinate, at(2026, 10, 15, 0, 1, 0))
        .unwrap();
    assert_eq!(
        session.counts(),
        DayCounts {
            water: 0,
            urinate: 1
        }
    );
}

#[test]
fn test_open_failure_is_reported_to_sink() {
    let mut path = env::temp_dir();
    path.push("rpeetracker_session_missing_dir");
    std::fs::remove_dir_all(&path).ok();
    path.push("db.sqlite");

    let sink = RecordingSink::default();
    let result = Session::open_in(&path.to_string_lossy(), Utc, 0, sink.clone());

    assert!(result.is_err());
    assert_eq!(sink.reports(), 1);
    let shown = sink.shown().unwrap();
    assert!(shown.contains("Event store unavailable"), "{shown}");
}

#[tokio::test(start_paused = true)]
async fn test_watch_renders_again_after_midnight() {
    let start = at(2026, 10, 14, 23, 59, 30);
    let mut session = memory_session(start);

    let base = tokio::time::Instant::now();
    let clock = move || start + base.elapsed().as_millis() as i64;

    let mut rendered = Vec::new();
    let rollovers = watch::run(
        &mut session,
        Duration::from_secs(60),
        clock,
        |s| rendered.push(s.day().label.clone()),
        tokio::time::sleep(Duration::from_secs(150)),
    )
    .await;

    assert_eq!(rollovers, 1);
    assert_eq!(rendered, vec!["October 14", "October 15"]);
    assert_eq!(session.counts(), DayCounts::default());
}
