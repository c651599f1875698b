//! # Cronplan
//!
//! Cronplan parses crontab expressions and computes when they fire next.
//!
//! ## Features
//! - Parses five field expressions, or six field expressions with a leading seconds field.
//! - Accepts wildcards, ranges, steps, lists and month or weekday names.
//! - Finds the next occurrence after any `chrono` timestamp, optionally bounded by an end time.
//! - Always terminates, even for expressions that can never fire, such as the 31st of February.
//!
//! ## Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use cronplan::Cron;
//!
//! // Every Monday at 12:30
//! let cron: Cron = "30 12 * * Mon".parse().expect("Successful parsing");
//!
//! let start = Utc.with_ymd_and_hms(2003, 1, 1, 0, 0, 0).unwrap();
//! let next = cron.next_occurrence(&start).unwrap();
//!
//! assert_eq!(next, Utc.with_ymd_and_hms(2003, 1, 6, 12, 30, 0).unwrap());
//! assert_eq!(cron.to_string(), "30 12 * * 1");
//! ```
//!
//! ## Pattern
//!
//! ```text
//! ┌──────────────── (optional) second (0 - 59)
//! │ ┌────────────── minute (0 - 59)
//! │ │ ┌──────────── hour (0 - 23)
//! │ │ │ ┌────────── day of month (1 - 31)
//! │ │ │ │ ┌──────── month (1 - 12, JAN-DEC)
//! │ │ │ │ │ ┌────── day of week (0 - 6, SUN-SAT)
//! │ │ │ │ │ │
//! * * * * * *
//! ```
//!
//! | Field        | Required | Allowed values  | Allowed special characters |
//! | ------------ | -------- | --------------- | -------------------------- |
//! | Seconds      | Optional | 0-59            | * , - /                    |
//! | Minutes      | Yes      | 0-59            | * , - /                    |
//! | Hours        | Yes      | 0-23            | * , - /                    |
//! | Day of Month | Yes      | 1-31            | * , - /                    |
//! | Month        | Yes      | 1-12 or JAN-DEC | * , - /                    |
//! | Day of Week  | Yes      | 0-6 or SUN-SAT  | * , - /                    |
//!
//! When both day of month and day of week are restricted, a day matches if either
//! of them does. [`parser::CronParserBuilder::dom_and_dow`] switches that to both.

pub mod component;
pub mod errors;
pub mod iterator;
pub mod parser;
pub mod pattern;

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Timelike,
};
use tracing::{trace, warn};

pub use errors::{CronError, FieldError};
use iterator::CronIterator;
use parser::CronParser;
use pattern::CronPattern;

/// Number of years the search may look ahead of its start before giving up.
///
/// The Gregorian calendar repeats every 400 years, so a schedule that has not fired
/// within one full cycle never will.
pub const SEARCH_YEAR_SPAN: i32 = 400;

#[derive(Debug, Clone, Copy)]
enum TimeComponent {
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

// Working timestamp of one search. Fields are ordered from most to least significant,
// so the derived ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Cursor {
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
}

impl Cursor {
    fn from_naive(time: &NaiveDateTime) -> Self {
        Self {
            year: time.year(),
            month: time.month(),
            day: time.day(),
            hour: time.hour(),
            minute: time.minute(),
            second: time.second(),
        }
    }

    fn to_naive(self) -> Result<NaiveDateTime, CronError> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .ok_or(CronError::InvalidDate)?
            .and_hms_opt(self.hour, self.minute, self.second)
            .ok_or(CronError::InvalidTime)
    }

    // Moves the given component to `value` and resets everything below it.
    fn set(&mut self, component: TimeComponent, value: u32) {
        match component {
            TimeComponent::Year => {
                self.year = value as i32;
                self.set(TimeComponent::Month, 1);
            }
            TimeComponent::Month => {
                self.month = value;
                self.set(TimeComponent::Day, 1);
            }
            TimeComponent::Day => {
                self.day = value;
                self.set(TimeComponent::Hour, 0);
            }
            TimeComponent::Hour => {
                self.hour = value;
                self.set(TimeComponent::Minute, 0);
            }
            TimeComponent::Minute => {
                self.minute = value;
                self.second = 0;
            }
            TimeComponent::Second => self.second = value,
        }
    }

    // Adds one to the given component, carrying into the next one on overflow.
    // Days are allowed to run past the end of the month; the day search rejects them.
    fn increment(&mut self, component: TimeComponent) {
        match component {
            TimeComponent::Year => self.set(component, (self.year + 1) as u32),
            TimeComponent::Month if self.month >= 12 => self.increment(TimeComponent::Year),
            TimeComponent::Month => self.set(component, self.month + 1),
            TimeComponent::Day if self.day >= 31 => self.increment(TimeComponent::Month),
            TimeComponent::Day => self.set(component, self.day + 1),
            TimeComponent::Hour if self.hour >= 23 => self.increment(TimeComponent::Day),
            TimeComponent::Hour => self.set(component, self.hour + 1),
            TimeComponent::Minute if self.minute >= 59 => self.increment(TimeComponent::Hour),
            TimeComponent::Minute => self.set(component, self.minute + 1),
            TimeComponent::Second if self.second >= 59 => self.increment(TimeComponent::Minute),
            TimeComponent::Second => self.set(component, self.second + 1),
        }
    }
}

/// A parsed crontab schedule.
///
/// Immutable once parsed; clone it or share it between threads freely.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cron {
    pub pattern: CronPattern, // Parsed cron pattern
}

impl Cron {
    /// Evaluates if a given `DateTime` matches the cron pattern associated with this instance.
    ///
    /// The local calendar fields of `time` are checked against every field of the pattern,
    /// seconds included. A five field pattern only matches at second zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use cronplan::Cron;
    ///
    /// let cron: Cron = "0 9 1 1 *".parse().expect("Couldn't parse cron string");
    ///
    /// let time = Utc.with_ymd_and_hms(2023, 1, 1, 9, 0, 0).unwrap();
    /// assert!(cron.is_time_matching(&time).unwrap());
    /// ```
    pub fn is_time_matching<Tz: TimeZone>(&self, time: &DateTime<Tz>) -> Result<bool, CronError> {
        let naive_time = time.naive_local();

        Ok(self.pattern.second_match(naive_time.second())
            && self.pattern.minute_match(naive_time.minute())
            && self.pattern.hour_match(naive_time.hour())
            && self.pattern.month_match(naive_time.month())
            && self
                .pattern
                .day_match(naive_time.year(), naive_time.month(), naive_time.day())?)
    }

    /// Finds the first occurrence strictly after `after`.
    ///
    /// # Errors
    ///
    /// - `CronError::TimeSearchLimitExceeded`: the pattern does not fire within
    ///   [`SEARCH_YEAR_SPAN`] years, which means it never will.
    /// - `CronError::InvalidDate` / `CronError::InvalidTime`: the search ran outside the
    ///   range `chrono` can represent.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use cronplan::parser::{CronParser, Seconds};
    ///
    /// let cron = CronParser::builder()
    ///     .seconds(Seconds::Required)
    ///     .build()
    ///     .parse("45 * * * * *")
    ///     .unwrap();
    ///
    /// let start = Utc.with_ymd_and_hms(2003, 1, 1, 0, 0, 0).unwrap();
    /// assert_eq!(
    ///     cron.next_occurrence(&start).unwrap(),
    ///     Utc.with_ymd_and_hms(2003, 1, 1, 0, 0, 45).unwrap()
    /// );
    /// ```
    pub fn next_occurrence<Tz: TimeZone>(
        &self,
        after: &DateTime<Tz>,
    ) -> Result<DateTime<Tz>, CronError> {
        self.find_next_occurrence(after, false)
    }

    /// Finds the first occurrence strictly after `after`, stopping at `until`.
    ///
    /// When the search reaches `until` before finding an occurrence, `until` itself is
    /// returned unchanged, whether it matches the pattern or not. This makes it cheap to
    /// walk a finite window even for patterns that never fire.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use cronplan::Cron;
    ///
    /// let cron: Cron = "* * 31 Feb *".parse().unwrap();
    /// let start = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap();
    /// let end = Utc.with_ymd_and_hms(2010, 1, 1, 0, 0, 0).unwrap();
    ///
    /// assert_eq!(cron.next_occurrence_until(&start, &end).unwrap(), end);
    /// ```
    pub fn next_occurrence_until<Tz: TimeZone>(
        &self,
        after: &DateTime<Tz>,
        until: &DateTime<Tz>,
    ) -> Result<DateTime<Tz>, CronError> {
        Ok(self
            .find_occurrence(after, false, Some(until))?
            .unwrap_or_else(|| until.clone()))
    }

    /// Finds the next occurrence of the pattern starting from `start_time`.
    ///
    /// If `inclusive` is `true`, `start_time` itself is returned when it matches (it is
    /// first rounded up to whole seconds, or whole minutes for five field patterns);
    /// otherwise the search starts one second, or one minute, later.
    pub fn find_next_occurrence<Tz: TimeZone>(
        &self,
        start_time: &DateTime<Tz>,
        inclusive: bool,
    ) -> Result<DateTime<Tz>, CronError> {
        self.find_occurrence(start_time, inclusive, None)?
            .ok_or(CronError::TimeSearchLimitExceeded)
    }

    /// Creates a `CronIterator` yielding every occurrence after `start_after`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{Datelike, TimeZone, Utc};
    /// use cronplan::Cron;
    ///
    /// let cron: Cron = "0 0 * * *".parse().unwrap();
    /// let start = Utc.with_ymd_and_hms(2023, 1, 1, 12, 0, 0).unwrap();
    ///
    /// let days: Vec<u32> = cron.iter_after(start).take(3).map(|t| t.day()).collect();
    /// assert_eq!(days, vec![2, 3, 4]);
    /// ```
    pub fn iter_after<Tz: TimeZone>(&self, start_after: DateTime<Tz>) -> CronIterator<Tz> {
        CronIterator::new(self.clone(), start_after, None)
    }

    /// Creates a `CronIterator` yielding the occurrences after `start_after` and before `end`.
    pub fn iter_between<Tz: TimeZone>(
        &self,
        start_after: DateTime<Tz>,
        end: DateTime<Tz>,
    ) -> CronIterator<Tz> {
        CronIterator::new(self.clone(), start_after, Some(end))
    }

    // Smallest step the pattern can distinguish.
    fn resolution(&self) -> Duration {
        if self.pattern.with_seconds {
            Duration::seconds(1)
        } else {
            Duration::minutes(1)
        }
    }

    // First instant the search may return: `start` rounded down to the resolution,
    // then moved one step forward unless an inclusive search starts exactly on it.
    fn seed(&self, start: &NaiveDateTime, inclusive: bool) -> Result<NaiveDateTime, CronError> {
        let second = if self.pattern.with_seconds {
            start.second()
        } else {
            0
        };
        let truncated = start
            .date()
            .and_hms_opt(start.hour(), start.minute(), second)
            .ok_or(CronError::InvalidTime)?;

        if inclusive && truncated == *start {
            Ok(truncated)
        } else {
            truncated
                .checked_add_signed(self.resolution())
                .ok_or(CronError::InvalidTime)
        }
    }

    // Runs the search on local calendar fields and maps the result back into the time zone.
    // `Ok(None)` means `until` was reached first.
    fn find_occurrence<Tz: TimeZone>(
        &self,
        start_time: &DateTime<Tz>,
        inclusive: bool,
        until: Option<&DateTime<Tz>>,
    ) -> Result<Option<DateTime<Tz>>, CronError> {
        let timezone = start_time.timezone();
        // Wall clock bound in the start's zone. A clock change can put an earlier instant
        // on a later wall clock time, so the bound is widened by a day and every candidate
        // is checked against `until` as an instant.
        let naive_until = until.map(|until| {
            until
                .with_timezone(&timezone)
                .naive_local()
                .checked_add_signed(Duration::days(1))
                .unwrap_or(NaiveDateTime::MAX)
        });
        let mut seed = self.seed(&start_time.naive_local(), inclusive)?;

        loop {
            let Some(found) = self.find_next_naive(seed, naive_until.as_ref())? else {
                return Ok(None);
            };

            let candidate = match timezone.from_local_datetime(&found) {
                LocalResult::Single(time) => Some(time),
                // Repeated wall clock time, take the first instant that is still ahead
                LocalResult::Ambiguous(earliest, latest) => {
                    if earliest > *start_time || (inclusive && earliest == *start_time) {
                        Some(earliest)
                    } else if latest > *start_time {
                        Some(latest)
                    } else {
                        None
                    }
                }
                // Skipped wall clock time
                LocalResult::None => None,
            };

            if let Some(time) = candidate {
                if until.is_some_and(|until| time >= *until) {
                    return Ok(None);
                }
                return Ok(Some(time));
            }

            seed = found
                .checked_add_signed(self.resolution())
                .ok_or(CronError::InvalidTime)?;
        }
    }

    // Carry search over calendar fields, from the month down to the second.
    //
    // Every step either accepts the cursor's current value, moves it forward to the next
    // member (resetting all lower fields), or carries into the next higher field and starts
    // over. The cursor only ever moves forward, and the year ceiling bounds the loop.
    fn find_next_naive(
        &self,
        start: NaiveDateTime,
        until: Option<&NaiveDateTime>,
    ) -> Result<Option<NaiveDateTime>, CronError> {
        let pattern = &self.pattern;
        // An end bound further away than the span extends the search up to it
        let year_limit = start
            .year()
            .saturating_add(SEARCH_YEAR_SPAN)
            .max(until.map_or(i32::MIN, |until| until.year()));
        let until = until.map(Cursor::from_naive);
        let mut cursor = Cursor::from_naive(&start);

        loop {
            if until.is_some_and(|until| cursor >= until) {
                return Ok(None);
            }
            if cursor.year > year_limit {
                warn!(
                    pattern = %pattern,
                    start = %start,
                    "no occurrence within {} years, giving up",
                    SEARCH_YEAR_SPAN
                );
                return Err(CronError::TimeSearchLimitExceeded);
            }

            // Month
            if !pattern.month_match(cursor.month) {
                match pattern.months.next_set(cursor.month) {
                    Some(month) => cursor.set(TimeComponent::Month, month),
                    None => cursor.increment(TimeComponent::Year),
                }
                trace!(year = cursor.year, month = cursor.month, "advanced month");
                continue;
            }

            // Day, checked against the real length of the month
            match pattern.next_day_match(cursor.year, cursor.month, cursor.day)? {
                Some(day) if day == cursor.day => {}
                Some(day) => cursor.set(TimeComponent::Day, day),
                None => {
                    cursor.increment(TimeComponent::Month);
                    trace!(year = cursor.year, month = cursor.month, "no matching day left");
                    continue;
                }
            }

            // Hour
            match pattern.hours.next_set(cursor.hour) {
                Some(hour) if hour == cursor.hour => {}
                Some(hour) => cursor.set(TimeComponent::Hour, hour),
                None => {
                    cursor.increment(TimeComponent::Day);
                    continue;
                }
            }

            // Minute
            match pattern.minutes.next_set(cursor.minute) {
                Some(minute) if minute == cursor.minute => {}
                Some(minute) => cursor.set(TimeComponent::Minute, minute),
                None => {
                    cursor.increment(TimeComponent::Hour);
                    continue;
                }
            }

            // Second
            match pattern.seconds.next_set(cursor.second) {
                Some(second) if second == cursor.second => {}
                Some(second) => cursor.set(TimeComponent::Second, second),
                None => {
                    cursor.increment(TimeComponent::Minute);
                    continue;
                }
            }

            if until.is_some_and(|until| cursor >= until) {
                return Ok(None);
            }
            return cursor.to_naive().map(Some);
        }
    }
}

// Enables creating a Cron instance from a string slice, returning a CronError if parsing fails.
// Uses the default parser, which expects five fields.
impl FromStr for Cron {
    type Err = CronError;

    fn from_str(cron_string: &str) -> Result<Cron, CronError> {
        CronParser::new().parse(cron_string)
    }
}

impl fmt::Display for Cron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pattern)
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use serde::de::{self, MapAccess, Visitor};
    use serde::ser::SerializeStruct;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::*;
    use crate::parser::Seconds;

    const FIELDS: &[&str] = &["pattern", "dom_and_dow"];

    // Six fields select the seconds parser, anything else goes through the default one.
    fn parse_pattern(pattern: &str, dom_and_dow: bool) -> Result<Cron, CronError> {
        let seconds = if pattern.split_whitespace().count() == 6 {
            Seconds::Required
        } else {
            Seconds::Disallowed
        };
        CronParser::builder()
            .seconds(seconds)
            .dom_and_dow(dom_and_dow)
            .build()
            .parse(pattern)
    }

    // The canonical rendering, wrapped in a struct with the mode when both restricted
    // day fields have to match.
    impl Serialize for Cron {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if !self.pattern.dom_and_dow {
                return serializer.collect_str(self);
            }
            let mut state = serializer.serialize_struct("Cron", FIELDS.len())?;
            state.serialize_field("pattern", &self.to_string())?;
            state.serialize_field("dom_and_dow", &true)?;
            state.end()
        }
    }

    struct CronVisitor;

    impl<'de> Visitor<'de> for CronVisitor {
        type Value = Cron;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a cron expression, or a map with `pattern` and `dom_and_dow`")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Cron, E> {
            parse_pattern(value, false).map_err(E::custom)
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Cron, A::Error> {
            let mut pattern: Option<String> = None;
            let mut dom_and_dow: Option<bool> = None;
            while let Some(key) = map.next_key::<String>()? {
                match key.as_str() {
                    "pattern" if pattern.is_some() => {
                        return Err(de::Error::duplicate_field("pattern"))
                    }
                    "pattern" => pattern = Some(map.next_value()?),
                    "dom_and_dow" if dom_and_dow.is_some() => {
                        return Err(de::Error::duplicate_field("dom_and_dow"))
                    }
                    "dom_and_dow" => dom_and_dow = Some(map.next_value()?),
                    other => return Err(de::Error::unknown_field(other, FIELDS)),
                }
            }
            let pattern = pattern.ok_or_else(|| de::Error::missing_field("pattern"))?;
            parse_pattern(&pattern, dom_and_dow.unwrap_or_default()).map_err(de::Error::custom)
        }
    }

    impl<'de> Deserialize<'de> for Cron {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(CronVisitor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Seconds;
    use chrono::{FixedOffset, Local, TimeZone, Utc};

    fn with_seconds(pattern: &str) -> Cron {
        CronParser::builder()
            .seconds(Seconds::Required)
            .build()
            .parse(pattern)
            .unwrap()
    }

    #[test]
    fn test_cursor_increment_carries() {
        let mut cursor = Cursor {
            year: 2003,
            month: 12,
            day: 31,
            hour: 23,
            minute: 59,
            second: 59,
        };
        cursor.increment(TimeComponent::Second);
        assert_eq!(
            cursor,
            Cursor {
                year: 2004,
                month: 1,
                day: 1,
                hour: 0,
                minute: 0,
                second: 0
            }
        );

        let mut cursor = Cursor {
            year: 2003,
            month: 2,
            day: 28,
            hour: 10,
            minute: 5,
            second: 0,
        };
        cursor.increment(TimeComponent::Day);
        // Day 29 of a non leap February is left for the day search to reject
        assert_eq!((cursor.month, cursor.day, cursor.hour, cursor.minute), (2, 29, 0, 0));
    }

    #[test]
    fn test_cursor_ordering_is_chronological() {
        let early = Cursor::from_naive(
            &NaiveDate::from_ymd_opt(2003, 1, 31)
                .unwrap()
                .and_hms_opt(23, 0, 0)
                .unwrap(),
        );
        let late = Cursor::from_naive(
            &NaiveDate::from_ymd_opt(2003, 2, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        );
        assert!(early < late);
    }

    #[test]
    fn test_is_time_matching() -> Result<(), CronError> {
        // This pattern is meant to match first second of 9 am on the first day of January.
        let cron: Cron = "0 9 1 1 *".parse()?;
        let time_matching = Local.with_ymd_and_hms(2023, 1, 1, 9, 0, 0).unwrap();
        let time_not_matching = Local.with_ymd_and_hms(2023, 1, 1, 10, 0, 0).unwrap();
        let second_not_matching = Local.with_ymd_and_hms(2023, 1, 1, 9, 0, 30).unwrap();

        assert!(cron.is_time_matching(&time_matching)?);
        assert!(!cron.is_time_matching(&time_not_matching)?);
        assert!(!cron.is_time_matching(&second_not_matching)?);

        Ok(())
    }

    #[test]
    fn test_is_time_matching_or_rule() -> Result<(), CronError> {
        // Should match on the 1st and on every Monday.
        let cron: Cron = "0 12 1 * MON".parse()?;
        let first_of_month = Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap(); // A Tuesday
        let a_monday = Utc.with_ymd_and_hms(2025, 7, 14, 12, 0, 0).unwrap();
        let neither = Utc.with_ymd_and_hms(2025, 7, 15, 12, 0, 0).unwrap();

        assert!(cron.is_time_matching(&first_of_month)?);
        assert!(cron.is_time_matching(&a_monday)?);
        assert!(!cron.is_time_matching(&neither)?);
        Ok(())
    }

    #[test]
    fn test_is_time_matching_different_time_zones() -> Result<(), CronError> {
        let cron: Cron = "0 12 * * *".parse()?;
        let time_east_matching = FixedOffset::east_opt(3600)
            .expect("Success")
            .with_ymd_and_hms(2023, 1, 1, 12, 0, 0)
            .unwrap();
        let time_west_matching = FixedOffset::west_opt(3600)
            .expect("Success")
            .with_ymd_and_hms(2023, 1, 1, 12, 0, 0)
            .unwrap();

        assert!(cron.is_time_matching(&time_east_matching)?);
        assert!(cron.is_time_matching(&time_west_matching)?);

        Ok(())
    }

    #[test]
    fn test_find_next_occurrence() -> Result<(), CronError> {
        let cron = with_seconds("* * * * * *");
        let start_time = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 29).unwrap();
        let next_occurrence = cron.find_next_occurrence(&start_time, false)?;
        assert_eq!(
            next_occurrence,
            Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 30).unwrap()
        );
        Ok(())
    }

    #[test]
    fn test_find_next_minute() -> Result<(), CronError> {
        let cron: Cron = "* * * * *".parse()?;
        let start_time = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 29).unwrap();
        let next_occurrence = cron.next_occurrence(&start_time)?;
        assert_eq!(
            next_occurrence,
            Utc.with_ymd_and_hms(2023, 1, 1, 0, 1, 0).unwrap()
        );
        Ok(())
    }

    #[test]
    fn test_sub_second_start_is_truncated() -> Result<(), CronError> {
        let cron = with_seconds("* * * * * *");
        let start_time = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 29).unwrap()
            + Duration::milliseconds(500);
        assert_eq!(
            cron.next_occurrence(&start_time)?,
            Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 30).unwrap()
        );
        // An inclusive search can not go back to 00:00:29
        assert_eq!(
            cron.find_next_occurrence(&start_time, true)?,
            Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 30).unwrap()
        );
        Ok(())
    }

    #[test]
    fn test_wrap_month_and_year() -> Result<(), CronError> {
        let cron = with_seconds("0 0 15 * * *");
        let start_time = Utc.with_ymd_and_hms(2023, 12, 31, 16, 0, 0).unwrap();
        assert_eq!(
            cron.next_occurrence(&start_time)?,
            Utc.with_ymd_and_hms(2024, 1, 1, 15, 0, 0).unwrap()
        );
        Ok(())
    }

    #[test]
    fn test_find_next_occurrence_edge_case_inclusive() -> Result<(), CronError> {
        let cron = with_seconds("59 59 23 * * *");
        let start_time = Utc.with_ymd_and_hms(2023, 3, 14, 23, 59, 59).unwrap();
        assert_eq!(cron.find_next_occurrence(&start_time, true)?, start_time);
        Ok(())
    }

    #[test]
    fn test_find_next_occurrence_edge_case_exclusive() -> Result<(), CronError> {
        let cron = with_seconds("59 59 23 * * *");
        let start_time = Utc.with_ymd_and_hms(2023, 3, 14, 23, 59, 59).unwrap();
        assert_eq!(
            cron.find_next_occurrence(&start_time, false)?,
            Utc.with_ymd_and_hms(2023, 3, 15, 23, 59, 59).unwrap()
        );
        Ok(())
    }

    #[test]
    fn test_time_overflow() -> Result<(), CronError> {
        let cron_match = with_seconds("59 59 23 31 12 *");
        let cron_next = with_seconds("0 0 0 1 1 *");
        let time_matching = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();

        assert!(cron_match.is_time_matching(&time_matching)?);
        assert_eq!(
            cron_next.next_occurrence(&time_matching)?,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            cron_match.next_occurrence(&time_matching)?,
            Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap()
        );
        Ok(())
    }

    #[test]
    fn test_impossible_pattern_hits_search_limit() {
        let cron: Cron = "* * 31 Feb *".parse().unwrap();
        let start_time = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            cron.next_occurrence(&start_time),
            Err(CronError::TimeSearchLimitExceeded)
        );
    }

    #[test]
    fn test_dom_and_dow_mode() -> Result<(), CronError> {
        let cron = CronParser::builder()
            .dom_and_dow(true)
            .build()
            .parse("45 16 1 * Mon")?;
        let start_time = Utc.with_ymd_and_hms(2003, 1, 1, 12, 0, 0).unwrap();
        let first = cron.next_occurrence(&start_time)?;
        assert_eq!(first, Utc.with_ymd_and_hms(2003, 9, 1, 16, 45, 0).unwrap());
        assert_eq!(
            cron.next_occurrence(&first)?,
            Utc.with_ymd_and_hms(2003, 12, 1, 16, 45, 0).unwrap()
        );
        Ok(())
    }

    #[test]
    fn test_equality_ignores_source_text() {
        let a: Cron = "* 1-3 * * *".parse().unwrap();
        let b: Cron = "* 1-2,3 * * *".parse().unwrap();
        let c: Cron = "* 1-4 * * *".parse().unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_cron_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Cron>();
    }
}
