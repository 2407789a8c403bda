//! Session: the explicit context the counting UI operates on.
//!
//! A session owns the open store, the day it is counting against and the
//! latest counts. Every public operation reports its outcome to the error
//! sink: failures are displayed, successes hide the previous error.

use crate::core::day::{DayContext, local_date};
use crate::core::store::EventStore;
use crate::errors::AppResult;
use crate::models::category::Category;
use crate::models::day_counts::DayCounts;
use crate::models::event::Event;
use crate::ui::banner::ErrorSink;
use crate::utils::date::now_millis;
use chrono::{Local, TimeZone};

pub struct Session<S: ErrorSink, Tz: TimeZone = Local> {
    store: EventStore,
    tz: Tz,
    day: DayContext,
    counts: DayCounts,
    sink: S,
}

impl<S: ErrorSink> Session<S, Local> {
    /// Open the store at `db_path` and start counting today, local time.
    pub fn open(db_path: &str, sink: S) -> AppResult<Self> {
        Self::open_in(db_path, Local, now_millis(), sink)
    }
}

impl<S: ErrorSink, Tz: TimeZone> Session<S, Tz> {
    pub fn open_in(db_path: &str, tz: Tz, now_ms: i64, mut sink: S) -> AppResult<Self> {
        match EventStore::open(db_path) {
            Ok(store) => Self::start(store, tz, now_ms, sink),
            Err(e) => {
                sink.display_error(&e.to_string());
                Err(e)
            }
        }
    }

    /// Build the day context for `now_ms` and load its counts.
    pub fn start(store: EventStore, tz: Tz, now_ms: i64, mut sink: S) -> AppResult<Self> {
        let day = match DayContext::at(&tz, now_ms) {
            Ok(day) => day,
            Err(e) => {
                sink.display_error(&e.to_string());
                return Err(e);
            }
        };

        let mut session = Self {
            store,
            tz,
            day,
            counts: DayCounts::default(),
            sink,
        };
        session.load_data()?;
        Ok(session)
    }

    pub fn day(&self) -> &DayContext {
        &self.day
    }

    pub fn counts(&self) -> DayCounts {
        self.counts
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut EventStore {
        &mut self.store
    }

    /// Recompute both counts for the current day.
    ///
    /// The two counts are independent read transactions.
    pub fn load_data(&mut self) -> AppResult<DayCounts> {
        let result = self.count_day();
        self.report(result)
    }

    fn count_day(&mut self) -> AppResult<DayCounts> {
        let range = self.day.range;
        let mut counts = DayCounts::default();
        for category in Category::ALL {
            let n = self
                .store
                .count_by_category_in_range(category, range.start, range.end)?;
            counts.set(category, n);
        }
        self.counts = counts;
        Ok(counts)
    }

    /// Log `category` now and refresh the counts.
    pub fn log_activity(&mut self, category: Category) -> AppResult<Event> {
        self.log_activity_at(category, now_millis())
    }

    pub fn log_activity_at(&mut self, category: Category, timestamp: i64) -> AppResult<Event> {
        let result = self.store.append_at(category, timestamp);
        let event = self.report(result)?;
        self.load_data()?;
        Ok(event)
    }

    /// Delete every event of the current day. Returns how many were removed.
    pub fn reset_counts(&mut self) -> AppResult<usize> {
        let range = self.day.range;
        let result = self.store.delete_range(range.start, range.end);
        let deleted = self.report(result)?;
        self.counts = DayCounts::default();
        Ok(deleted)
    }

    /// Switch to the day containing `now_ms` if it differs from the current
    /// one, reloading the counts. Returns whether the day rolled over.
    pub fn check_date_change(&mut self, now_ms: i64) -> AppResult<bool> {
        let date = match local_date(&self.tz, now_ms) {
            Ok(date) => date,
            Err(e) => return self.report(Err(e)),
        };
        if date == self.day.date {
            return Ok(false);
        }

        let day = DayContext::for_date(date, &self.tz);
        self.day = self.report(day)?;
        tracing::info!(date = %self.day.date, "day rolled over");
        self.load_data()?;
        Ok(true)
    }

    fn report<T>(&mut self, result: AppResult<T>) -> AppResult<T> {
        match &result {
            Ok(_) => self.sink.hide_error(),
            Err(e) => self.sink.display_error(&e.to_string()),
        }
        result
    }
}
