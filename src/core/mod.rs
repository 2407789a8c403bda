pub mod day;
pub mod log;
pub mod session;
pub mod store;
pub mod watch;
