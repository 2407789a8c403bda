pub mod add;
pub mod cache;
pub mod config;
pub mod db;
pub mod init;
pub mod list;
pub mod log;
pub mod reset;
pub mod status;
pub mod watch;

use crate::errors::AppResult;

/// Single-threaded runtime for the commands that touch the network or run
/// the periodic day check.
pub(crate) fn runtime() -> AppResult<tokio::runtime::Runtime> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(rt)
}
