//! Error types for nudge.
//!
//! This module defines all error types used throughout the nudge crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for nudge operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Reminder Errors ===
    /// A required reminder field was not supplied.
    #[error("incomplete reminder: {field} is required")]
    IncompleteReminder {
        /// Name of the missing field.
        field: &'static str,
    },

    /// The interval magnitude is zero or too large to represent.
    #[error("invalid interval: {message}")]
    InvalidInterval {
        /// Description of the problem.
        message: String,
    },

    /// The custom time of day could not be parsed.
    #[error("invalid time of day '{value}': expected HH:MM")]
    InvalidCustomTime {
        /// The rejected input.
        value: String,
    },

    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Notification Errors ===
    /// A notification backend failed to show a notification.
    #[error("notification backend '{backend}' failed: {message}")]
    Notification {
        /// Name of the backend.
        backend: &'static str,
        /// Description of what went wrong.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for nudge operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create an incomplete reminder error for the named field.
    #[must_use]
    pub fn incomplete(field: &'static str) -> Self {
        Self::IncompleteReminder { field }
    }

    /// Create an invalid interval error.
    #[must_use]
    pub fn invalid_interval(message: impl Into<String>) -> Self {
        Self::InvalidInterval {
            message: message.into(),
        }
    }

    /// Create a notification backend error.
    #[must_use]
    pub fn notification(backend: &'static str, message: impl Into<String>) -> Self {
        Self::Notification {
            backend,
            message: message.into(),
        }
    }

    /// Check if this error was caused by bad reminder input.
    ///
    /// These are the errors a user can fix by re-entering the reminder.
    #[must_use]
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            Self::IncompleteReminder { .. }
                | Self::InvalidInterval { .. }
                | Self::InvalidCustomTime { .. }
        )
    }

    /// Short message telling the user how to fix an input error.
    #[must_use]
    pub fn user_hint(&self) -> Option<&'static str> {
        self.is_user_input().then_some("Please fill in all fields")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_reminder_display() {
        let err = Error::incomplete("message");
        assert_eq!(err.to_string(), "incomplete reminder: message is required");
    }

    #[test]
    fn test_invalid_interval_display() {
        let err = Error::invalid_interval("must be greater than 0");
        assert_eq!(
            err.to_string(),
            "invalid interval: must be greater than 0"
        );
    }

    #[test]
    fn test_invalid_custom_time_display() {
        let err = Error::InvalidCustomTime {
            value: "25:99".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("25:99"));
        assert!(msg.contains("HH:MM"));
    }

    #[test]
    fn test_is_user_input() {
        assert!(Error::incomplete("unit").is_user_input());
        assert!(Error::invalid_interval("zero").is_user_input());
        assert!(Error::InvalidCustomTime {
            value: "x".to_string()
        }
        .is_user_input());
        assert!(!Error::internal("bug").is_user_input());
        assert!(!Error::notification("desktop", "no bus").is_user_input());
    }

    #[test]
    fn test_user_hint() {
        assert_eq!(
            Error::incomplete("message").user_hint(),
            Some("Please fill in all fields")
        );
        assert!(Error::internal("bug").user_hint().is_none());
    }

    #[test]
    fn test_notification_error_display() {
        let err = Error::notification("desktop", "no notification daemon");
        let msg = err.to_string();
        assert!(msg.contains("desktop"));
        assert!(msg.contains("no notification daemon"));
    }

    #[test]
    fn test_internal_error() {
        let err = Error::internal("something went wrong");
        assert_eq!(err.to_string(), "internal error: something went wrong");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_database_migration_error_display() {
        let err = Error::DatabaseMigration {
            message: "version mismatch".to_string(),
        };
        assert!(err.to_string().contains("version mismatch"));
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "check_interval_secs must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("check_interval_secs"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
