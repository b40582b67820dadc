//! Store error handling
//!
//! Typed errors for store and listing operations, split along the
//! caller-facing taxonomy: client input errors (bad filter values, bad
//! cursors, unsupported sort fields) versus infrastructure errors
//! (database failures, corrupt rows). Client errors should never be
//! retried; infrastructure errors are safe to retry because every
//! listing operation is read-only and idempotent.

use thiserror::Error;

use crate::query::cursor::CursorError;

/// Errors that can occur during store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Continuation cursor failed to decode or does not match the active sort
    #[error("Invalid cursor: {0}")]
    InvalidCursor(#[from] CursorError),

    /// A filter value could not be interpreted (e.g. malformed id)
    #[error("Invalid value for {field}: '{value}'")]
    InvalidFilter { field: &'static str, value: String },

    /// Requested sort field is not recognized
    #[error("Unsupported sort field: '{0}'. Valid fields: created_at, updated_at, title")]
    UnsupportedSortField(String),

    /// Page size must be at least one
    #[error("Limit must be at least 1")]
    InvalidLimit,

    /// Post title exceeds the allowed length
    #[error("Title is {len} characters (max {max})")]
    TitleTooLong { len: usize, max: usize },

    /// Entity lookup found nothing (or the caller does not own it)
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// An operation required a caller identity but none was resolved
    #[error("No active user is configured. Run `scrawl user use <id>` first.")]
    NoActiveUser,

    /// Category deletion blocked by existing posts
    #[error("Category is still referenced by {count} post(s)")]
    CategoryInUse { count: i64 },

    /// User creation with an email that is already registered
    #[error("A user with email '{0}' already exists")]
    DuplicateEmail(String),

    /// A stored row could not be read back into its model
    #[error("Corrupt row in {table}: {details}")]
    CorruptRow { table: &'static str, details: String },

    /// SQLite database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl StoreError {
    /// Whether this error was caused by the caller's input.
    ///
    /// Client errors map to a 4xx-equivalent and should be surfaced
    /// verbatim, never retried.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidCursor(_)
                | StoreError::InvalidFilter { .. }
                | StoreError::UnsupportedSortField(_)
                | StoreError::InvalidLimit
                | StoreError::TitleTooLong { .. }
                | StoreError::NotFound { .. }
                | StoreError::NoActiveUser
                | StoreError::CategoryInUse { .. }
                | StoreError::DuplicateEmail(_)
        )
    }

    /// Whether retrying the same call can succeed.
    ///
    /// Only infrastructure failures qualify; the store never mutates
    /// during a read, so callers may retry with backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Database(_))
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
