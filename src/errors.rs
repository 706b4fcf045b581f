//! Unified application error type.
//! All modules (store, core, collab, cli, utils) return AppError to keep the
//! error handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO / serialization
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ---------------------------
    // Operator input validation
    // ---------------------------
    #[error("Invalid weekday: '{0}'. Use a day name (thursday, thu) or 0-6 (0 = Monday)")]
    InvalidWeekday(String),

    #[error("Invalid time format: '{0}'. Use HH:MM (19:30) or h:mm am/pm (7:30pm)")]
    InvalidTime(String),

    #[error("Invalid date format: '{0}'. Use YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Unknown timezone: '{0}'. Use an IANA name such as Europe/London")]
    InvalidTimezone(String),

    #[error("Occurrence error: {0}")]
    Occurrence(String),

    // ---------------------------
    // Roster / category model
    // ---------------------------
    #[error("Category model error: {0}")]
    Category(String),

    #[error("No signup message is bound. Run `setup` first")]
    NotBound,

    // ---------------------------
    // Collaborator failures
    // ---------------------------
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Platform error: {0}")]
    Platform(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
