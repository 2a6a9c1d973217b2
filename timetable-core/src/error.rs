//! Error types for timetable operations.

use thiserror::Error;

/// Errors that can occur while fetching, storing or configuring a timetable.
///
/// Entries the parser cannot read are not errors: they are skipped and
/// counted in [`ParsedFeed::skipped`](crate::ics::ParsedFeed).
#[derive(Error, Debug)]
pub enum TimetableError {
    /// Network error, non-success HTTP status, empty body, or an error page
    /// served instead of calendar data.
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// The feed was fetched but yielded no parsable entries.
    #[error("No events found in the feed. Check that the feed URL is correct.")]
    EmptyFeed,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for timetable operations.
pub type TimetableResult<T> = Result<T, TimetableError>;
