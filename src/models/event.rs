use super::category::Category;
use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub timestamp: i64,     // ⇔ events.timestamp (INTEGER PRIMARY KEY, ms since epoch)
    pub category: Category, // ⇔ events.category ('water' | 'urinate')
}

impl Event {
    pub fn new(timestamp: i64, category: Category) -> Self {
        Self {
            timestamp,
            category,
        }
    }

    /// The event instant in local time, if the timestamp is representable.
    pub fn local_time(&self) -> Option<DateTime<Local>> {
        Local.timestamp_millis_opt(self.timestamp).single()
    }

    pub fn time_str(&self) -> String {
        self.local_time()
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "--:--:--".to_string())
    }
}
