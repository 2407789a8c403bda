//! Unified application error type.
//! All modules (db, core, cache, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Event store
    // ---------------------------
    #[error("Event store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Transaction failed: {0}")]
    TransactionFailure(String),

    #[error("An event with timestamp {0} already exists")]
    DuplicateKey(i64),

    /// Raw database error, used by maintenance commands (check, vacuum, info).
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    // ---------------------------
    // Asset cache
    // ---------------------------
    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    #[error("Asset cache error: {0}")]
    Cache(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration: {0}")]
    ConfigLoad(String),

    #[error("Failed to save configuration: {0}")]
    ConfigSave(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),

    /// Already shown by an error sink; `main` only sets the exit status.
    #[error("{0}")]
    Reported(Box<AppError>),
}

impl AppError {
    /// Mark an error as already displayed to the user.
    pub fn reported(self) -> Self {
        match self {
            AppError::Reported(_) => self,
            other => AppError::Reported(Box::new(other)),
        }
    }

    pub fn is_reported(&self) -> bool {
        matches!(self, AppError::Reported(_))
    }
}

pub type AppResult<T> = Result<T, AppError>;
