pub mod category;
pub mod day_counts;
pub mod event;
