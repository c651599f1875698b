use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::component::{CronComponent, FieldKind};
use crate::errors::CronError;

// This struct holds the parsed fields of a cron expression.
// It is built once by the parser and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CronPattern {
    pub seconds: CronComponent,      // -
    pub minutes: CronComponent,      // --
    pub hours: CronComponent,        // --- Each individual part of the cron expression
    pub days: CronComponent,         // --- represented by a bitmask
    pub months: CronComponent,       // --
    pub days_of_week: CronComponent, // -

    // Options
    pub with_seconds: bool, // Six fields were parsed, and are rendered back
    pub dom_and_dow: bool,  // Combine restricted day of month and day of week with AND instead of OR
}

impl CronPattern {
    // Checks if a given year, month, and day match the day part of the cron pattern.
    //
    // An unrestricted day of month leaves the decision to the day of week and vice versa.
    // When both are restricted a day matches if either does, unless `dom_and_dow` asks for both.
    pub fn day_match(&self, year: i32, month: u32, day: u32) -> Result<bool, CronError> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or(CronError::InvalidDate)?;

        let day_matches = self.days.is_bit_set(day);
        let dow_matches = self
            .days_of_week
            .is_bit_set(date.weekday().num_days_from_sunday());

        Ok(match (self.days.is_full(), self.days_of_week.is_full()) {
            (true, _) => dow_matches,
            (false, true) => day_matches,
            (false, false) if self.dom_and_dow => day_matches && dow_matches,
            (false, false) => day_matches || dow_matches,
        })
    }

    // Finds the first matching day on or after `day`, within the real length of the month.
    pub fn next_day_match(&self, year: i32, month: u32, day: u32) -> Result<Option<u32>, CronError> {
        let last_day = last_day_of_month(year, month)?;
        for candidate in day..=last_day {
            if self.day_match(year, month, candidate)? {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    pub fn month_match(&self, month: u32) -> bool {
        self.months.is_bit_set(month)
    }

    pub fn hour_match(&self, hour: u32) -> bool {
        self.hours.is_bit_set(hour)
    }

    pub fn minute_match(&self, minute: u32) -> bool {
        self.minutes.is_bit_set(minute)
    }

    pub fn second_match(&self, second: u32) -> bool {
        self.seconds.is_bit_set(second)
    }

    /// Returns the component for the given field kind.
    pub fn component(&self, kind: FieldKind) -> &CronComponent {
        match kind {
            FieldKind::Second => &self.seconds,
            FieldKind::Minute => &self.minutes,
            FieldKind::Hour => &self.hours,
            FieldKind::Day => &self.days,
            FieldKind::Month => &self.months,
            FieldKind::DayOfWeek => &self.days_of_week,
        }
    }
}

// Canonical rendering, one space between fields; seconds only when they were parsed.
impl fmt::Display for CronPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.with_seconds {
            write!(f, "{} ", self.seconds)?;
        }
        write!(
            f,
            "{} {} {} {} {}",
            self.minutes, self.hours, self.days, self.months, self.days_of_week
        )
    }
}

// Helper function to find the last day of a given month
pub fn last_day_of_month(year: i32, month: u32) -> Result<u32, CronError> {
    if month == 0 || month > 12 {
        return Err(CronError::InvalidDate);
    }

    // Create a date that should be the first day of the next month
    let (next_month_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_month_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .ok_or(CronError::InvalidDate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(days: &str, days_of_week: &str, dom_and_dow: bool) -> CronPattern {
        CronPattern {
            seconds: CronComponent::parse(FieldKind::Second, "0").unwrap(),
            minutes: CronComponent::all(FieldKind::Minute),
            hours: CronComponent::all(FieldKind::Hour),
            days: CronComponent::parse(FieldKind::Day, days).unwrap(),
            months: CronComponent::all(FieldKind::Month),
            days_of_week: CronComponent::parse(FieldKind::DayOfWeek, days_of_week).unwrap(),
            with_seconds: false,
            dom_and_dow,
        }
    }

    #[test]
    fn test_last_day_of_month() -> Result<(), CronError> {
        assert_eq!(last_day_of_month(2023, 1)?, 31);
        assert_eq!(last_day_of_month(2023, 2)?, 28);
        assert_eq!(last_day_of_month(2024, 2)?, 29);
        assert_eq!(last_day_of_month(2000, 2)?, 29);
        assert_eq!(last_day_of_month(1900, 2)?, 28);
        assert_eq!(last_day_of_month(2023, 4)?, 30);
        assert_eq!(last_day_of_month(2023, 12)?, 31);
        assert!(last_day_of_month(2023, 13).is_err());
        Ok(())
    }

    #[test]
    fn test_day_match_or_when_both_restricted() -> Result<(), CronError> {
        let pattern = pattern("1", "1", false);
        // 2003-01-01 is a Wednesday, 2003-01-06 a Monday
        assert!(pattern.day_match(2003, 1, 1)?);
        assert!(pattern.day_match(2003, 1, 6)?);
        assert!(!pattern.day_match(2003, 1, 7)?);
        Ok(())
    }

    #[test]
    fn test_day_match_and_when_requested() -> Result<(), CronError> {
        let pattern = pattern("1", "1", true);
        assert!(!pattern.day_match(2003, 1, 1)?);
        assert!(!pattern.day_match(2003, 1, 6)?);
        // 2003-09-01 is a Monday
        assert!(pattern.day_match(2003, 9, 1)?);
        Ok(())
    }

    #[test]
    fn test_day_match_unrestricted_sides() -> Result<(), CronError> {
        let only_weekday = pattern("*", "1", false);
        assert!(!only_weekday.day_match(2003, 1, 1)?);
        assert!(only_weekday.day_match(2003, 1, 6)?);

        let only_day = pattern("15", "*", false);
        assert!(only_day.day_match(2003, 1, 15)?);
        assert!(!only_day.day_match(2003, 1, 6)?);
        Ok(())
    }

    #[test]
    fn test_day_match_invalid_date() {
        let pattern = pattern("*", "*", false);
        assert_eq!(pattern.day_match(2003, 2, 31), Err(CronError::InvalidDate));
    }

    #[test]
    fn test_next_day_match_respects_month_length() -> Result<(), CronError> {
        let pattern = pattern("15,30,31", "*", false);
        assert_eq!(pattern.next_day_match(2000, 1, 16)?, Some(30));
        assert_eq!(pattern.next_day_match(2000, 2, 16)?, None);
        assert_eq!(pattern.next_day_match(2000, 4, 16)?, Some(30));
        assert_eq!(pattern.next_day_match(2000, 4, 31)?, None);
        Ok(())
    }

    #[test]
    fn test_display_with_and_without_seconds() {
        let mut pattern = pattern("1-3", "Mon-Fri", false);
        assert_eq!(pattern.to_string(), "* * 1-3 * 1-5");
        pattern.with_seconds = true;
        assert_eq!(pattern.to_string(), "0 * * 1-3 * 1-5");
    }
}
