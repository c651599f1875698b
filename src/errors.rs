use thiserror::Error;

use crate::component::FieldKind;

/// Represents errors that can occur while parsing and evaluating cron patterns.
///
/// `CronError` is used throughout the `cronplan` crate to indicate various types of failures
/// and is exported for consuming programs to use.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CronError {
    /// No expression was supplied at all.
    ///
    /// Distinct from [`CronError::EmptyPattern`]: this is reported before any parsing happens.
    #[error("Cron expression is missing.")]
    MissingExpression,

    /// The pattern string provided was empty or only whitespace.
    #[error("CronPattern cannot be an empty string.")]
    EmptyPattern,

    /// The pattern did not split into the number of fields the parser expects.
    #[error("Pattern must consist of {expected} fields, found {found}.")]
    FieldCount { expected: usize, found: usize },

    /// One field of the pattern failed to parse.
    ///
    /// Carries the kind of field and its text so callers can build a diagnostic.
    #[error("Invalid {kind} field '{text}': {source}")]
    InvalidField {
        kind: FieldKind,
        text: String,
        #[source]
        source: FieldError,
    },

    /// Encountered an invalid date while evaluating a cron pattern.
    #[error("Occurrence search reached an invalid date.")]
    InvalidDate,

    /// Encountered an invalid time while evaluating a cron pattern.
    #[error("Occurrence search reached an invalid time.")]
    InvalidTime,

    /// The search for the next valid time exceeded a reasonable limit.
    ///
    /// This is what an expression that can never fire, like `* * 31 2 *`, produces.
    #[error("No occurrence found within the search limit.")]
    TimeSearchLimitExceeded,
}

/// Errors produced while parsing a single field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The field, or one of its comma separated items, was empty.
    #[error("empty value")]
    Empty,

    /// A token is neither a number nor a recognized name.
    #[error("invalid token '{0}'")]
    InvalidToken(String),

    /// A numeric value falls outside the field's range.
    #[error("value {value} is out of range ({min}-{max})")]
    OutOfRange { value: u32, min: u8, max: u8 },

    /// The start of a range is greater than its end.
    #[error("range start {start} is greater than range end {end}")]
    InvalidRange { start: u8, end: u8 },

    /// The step of a stepped item is zero or not a positive number.
    #[error("invalid step '{0}'")]
    InvalidStep(String),
}
