//! Parser for crontab expressions.
//!
//! Cronplan uses [`CronParser`] to parse the cron expression. Invoking
//!
//! ```rust
//! # use std::str::FromStr as _;
//! #
//! # use cronplan::Cron;
//! #
//! Cron::from_str("*/5 * * * *");
//! ```
//!
//! is equivalent to
//!
//! ```rust
//! # use cronplan::parser::CronParser;
//! #
//! CronParser::new().parse("*/5 * * * *");
//! ```
//!
//! You can customise the parser by creating a parser builder using
//! [`CronParser::builder`]. So, for example, to parse six field cron
//! expressions where the first field holds the seconds:
//!
//! ```rust
//! use cronplan::parser::{CronParser, Seconds};
//!
//! let parser = CronParser::builder().seconds(Seconds::Required).build();
//!
//! let cron = parser.parse("*/10 * * * * *").unwrap();
//! assert_eq!(cron.to_string(), "0,10,20,30,40,50 * * * * *");
//!
//! // Five fields are rejected once seconds are required
//! assert!(parser.parse("* * * * *").is_err());
//! ```

use derive_builder::Builder;
use strum::EnumIs;
use tracing::debug;

use crate::{
    component::{CronComponent, FieldKind},
    errors::CronError,
    pattern::CronPattern,
    Cron,
};

/// How the parser treats a leading seconds field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIs)]
pub enum Seconds {
    /// Expressions have five fields and always fire at second zero.
    #[default]
    Disallowed,
    /// Expressions have six fields, the first one being the seconds.
    Required,
}

impl Seconds {
    fn field_count(self) -> usize {
        match self {
            Seconds::Disallowed => 5,
            Seconds::Required => 6,
        }
    }
}

/// Parser for crontab expressions.
///
/// In order to build a custom cron parser use [`CronParser::builder`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Builder)]
#[builder(default, build_fn(skip), pattern = "owned")]
pub struct CronParser {
    /// Configure whether the expression carries a seconds field.
    seconds: Seconds,
    /// Require both a restricted day of month and a restricted day of week to match,
    /// instead of either of them.
    dom_and_dow: bool,
}

impl CronParser {
    /// Create a new parser for five field expressions.
    ///
    /// You should probably be using [`Cron`]'s implementation of
    /// [`FromStr`][std::str::FromStr] instead of invoking this.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a builder for custom parsing.
    ///
    /// Equivalent to [`CronParserBuilder::default`].
    pub fn builder() -> CronParserBuilder {
        CronParserBuilder::default()
    }

    /// Parses an expression that may be absent.
    ///
    /// `None` is reported as [`CronError::MissingExpression`] without any parsing,
    /// which keeps it apart from an empty or malformed expression.
    pub fn parse_optional(&self, pattern: Option<&str>) -> Result<Cron, CronError> {
        match pattern {
            Some(pattern) => self.parse(pattern),
            None => Err(CronError::MissingExpression),
        }
    }

    /// Parses the cron pattern string.
    pub fn parse(&self, pattern: &str) -> Result<Cron, CronError> {
        let parts: Vec<&str> = pattern.split_whitespace().collect();
        if parts.is_empty() {
            return Err(CronError::EmptyPattern);
        }

        let expected = self.seconds.field_count();
        if parts.len() != expected {
            debug!(pattern, expected, found = parts.len(), "wrong number of cron fields");
            return Err(CronError::FieldCount {
                expected,
                found: parts.len(),
            });
        }

        // Without a seconds field every occurrence lands on second zero
        let (seconds, rest) = if self.seconds.is_required() {
            (parse_field(FieldKind::Second, parts[0])?, &parts[1..])
        } else {
            (parse_field(FieldKind::Second, "0")?, &parts[..])
        };

        Ok(Cron {
            pattern: CronPattern {
                seconds,
                minutes: parse_field(FieldKind::Minute, rest[0])?,
                hours: parse_field(FieldKind::Hour, rest[1])?,
                days: parse_field(FieldKind::Day, rest[2])?,
                months: parse_field(FieldKind::Month, rest[3])?,
                days_of_week: parse_field(FieldKind::DayOfWeek, rest[4])?,
                with_seconds: self.seconds.is_required(),
                dom_and_dow: self.dom_and_dow,
            },
        })
    }
}

fn parse_field(kind: FieldKind, text: &str) -> Result<CronComponent, CronError> {
    CronComponent::parse(kind, text).map_err(|source| {
        debug!(field = %kind, text, error = %source, "failed to parse cron field");
        CronError::InvalidField {
            kind,
            text: text.to_string(),
            source,
        }
    })
}

impl CronParserBuilder {
    pub fn build(self) -> CronParser {
        let CronParserBuilder {
            seconds,
            dom_and_dow,
        } = self;
        CronParser {
            seconds: seconds.unwrap_or_default(),
            dom_and_dow: dom_and_dow.unwrap_or_default(),
        }
    }
}
