use crate::db::migrate::schema_version;
use crate::db::pool::DbPool;
use crate::models::category::Category;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use chrono::{Local, TimeZone};
use std::fs;

/// Events per calendar day between `first` and `last`, both days included.
pub fn average_per_day<Tz: TimeZone>(count: i64, first: i64, last: i64, tz: &Tz) -> f64 {
    let day_of = |ts: i64| tz.timestamp_millis_opt(ts).single().map(|t| t.date_naive());
    let days = match (day_of(first), day_of(last)) {
        (Some(a), Some(b)) => (b - a).num_days() + 1,
        _ => 1,
    }
    .max(1);
    count as f64 / days as f64
}

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE + SCHEMA
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_kb = (file_size as f64) / 1024.0;

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.1} KB", CYAN, RESET, file_kb);
    println!(
        "{}• Schema version:{} {}",
        CYAN,
        RESET,
        schema_version(&pool.conn)?
    );

    //
    // 2) TOTAL EVENTS
    //
    let count: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
    println!(
        "{}• Total events:{} {}{}{}",
        CYAN, RESET, GREEN, count, RESET
    );

    for category in Category::ALL {
        let n: i64 = pool.conn.query_row(
            "SELECT COUNT(*) FROM events WHERE category = ?1",
            [category.to_db_str()],
            |row| row.get(0),
        )?;
        println!("    {:<8} {}", category.to_db_str(), n);
    }

    //
    // 3) TIME RANGE
    //
    let (first, last): (Option<i64>, Option<i64>) = pool.conn.query_row(
        "SELECT MIN(timestamp), MAX(timestamp) FROM events",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    let bounds = first.zip(last);

    let fmt_ts = |ts: i64| {
        Local
            .timestamp_millis_opt(ts)
            .single()
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| ts.to_string())
    };

    println!("{}• Time range:{}", CYAN, RESET);
    match bounds {
        Some((first, last)) => {
            println!("    from: {}", fmt_ts(first));
            println!("    to:   {}", fmt_ts(last));

            //
            // 4) AVERAGE EVENTS/DAY
            //
            let avg = average_per_day(count, first, last, &Local);
            println!("{}• Average events/day:{} {:.2}", CYAN, RESET, avg);
        }
        None => {
            println!("    from: {GREY}--{RESET}");
            println!("    to:   {GREY}--{RESET}");
        }
    }

    println!();
    Ok(())
}
