use std::fmt;

use strum::{Display, EnumIter};

use crate::errors::FieldError;

const MONTH_NAMES: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];
const WEEKDAY_NAMES: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// The six kinds of field a crontab expression is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum FieldKind {
    Second,
    Minute,
    Hour,
    Day,
    Month,
    DayOfWeek,
}

impl FieldKind {
    /// Smallest value the field accepts.
    pub const fn min(self) -> u8 {
        match self {
            FieldKind::Day | FieldKind::Month => 1,
            _ => 0,
        }
    }

    /// Largest value the field accepts.
    pub const fn max(self) -> u8 {
        match self {
            FieldKind::Second | FieldKind::Minute => 59,
            FieldKind::Hour => 23,
            FieldKind::Day => 31,
            FieldKind::Month => 12,
            FieldKind::DayOfWeek => 6,
        }
    }

    // Name table, indexed from `min()`.
    fn names(self) -> Option<&'static [&'static str]> {
        match self {
            FieldKind::Month => Some(&MONTH_NAMES),
            FieldKind::DayOfWeek => Some(&WEEKDAY_NAMES),
            _ => None,
        }
    }

    // Bits of the complete range.
    const fn range_mask(self) -> u64 {
        let upper = (1u64 << (self.max() as u32 + 1)) - 1;
        let lower = (1u64 << self.min() as u32) - 1;
        upper & !lower
    }
}

/// Membership set of one cron field.
///
/// Bit `v` of the inner `u64` is set when value `v` satisfies the field. Every field
/// range fits in 60 bits, so membership tests and "next member" lookups are single
/// mask operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CronComponent {
    kind: FieldKind,
    bits: u64,
}

impl CronComponent {
    /// Creates a component of the given kind with no members.
    pub fn new(kind: FieldKind) -> Self {
        Self { kind, bits: 0 }
    }

    /// Creates a component with every value of its range set, as parsed from `*`.
    pub fn all(kind: FieldKind) -> Self {
        Self {
            kind,
            bits: kind.range_mask(),
        }
    }

    /// Parses the text of one field into its membership set.
    ///
    /// The text is a comma separated list where every item is `*`, `*/step`, a value,
    /// `value/step`, `low-high` or `low-high/step`. Values are numeric or, for months
    /// and days of the week, names such as `Jan` or `friday`.
    pub fn parse(kind: FieldKind, field: &str) -> Result<Self, FieldError> {
        let mut component = Self::new(kind);
        if field.is_empty() {
            return Err(FieldError::Empty);
        }
        for part in field.split(',') {
            component.handle_part(part.trim())?;
        }
        if component.bits == 0 {
            return Err(FieldError::Empty);
        }
        Ok(component)
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn min_value(&self) -> u8 {
        self.kind.min()
    }

    pub fn max_value(&self) -> u8 {
        self.kind.max()
    }

    // Set a bit at a given position
    pub fn set_bit(&mut self, pos: u8) -> Result<(), FieldError> {
        if pos < self.kind.min() || pos > self.kind.max() {
            return Err(FieldError::OutOfRange {
                value: pos as u32,
                min: self.kind.min(),
                max: self.kind.max(),
            });
        }
        self.bits |= 1 << pos;
        Ok(())
    }

    /// Returns `true` when `value` is a member. Values outside the range never are.
    pub fn is_bit_set(&self, value: u32) -> bool {
        value <= self.kind.max() as u32 && self.bits & (1 << value) != 0
    }

    /// Returns `true` when every value of the field's range is a member.
    pub fn is_full(&self) -> bool {
        self.bits == self.kind.range_mask()
    }

    /// Smallest member.
    pub fn first(&self) -> Option<u32> {
        self.next_set(0)
    }

    /// Smallest member greater than or equal to `from`.
    pub fn next_set(&self, from: u32) -> Option<u32> {
        if from > self.kind.max() as u32 {
            return None;
        }
        let masked = self.bits & (u64::MAX << from);
        if masked == 0 {
            None
        } else {
            Some(masked.trailing_zeros())
        }
    }

    /// Iterates over the members in ascending order.
    pub fn values(&self) -> impl Iterator<Item = u32> + '_ {
        (self.kind.min() as u32..=self.kind.max() as u32)
            .filter(move |&value| self.is_bit_set(value))
    }

    fn handle_part(&mut self, part: &str) -> Result<(), FieldError> {
        if part.is_empty() {
            return Err(FieldError::Empty);
        }

        let (range_part, step) = match part.split_once('/') {
            Some((range_part, step_str)) => (range_part, Some(Self::parse_step(step_str)?)),
            None => (part, None),
        };

        let (start, end) = if range_part == "*" {
            (self.kind.min(), self.kind.max())
        } else if let Some((low, high)) = range_part.split_once('-') {
            (self.parse_value(low)?, self.parse_value(high)?)
        } else {
            let value = self.parse_value(range_part)?;
            // A lone value with a step runs to the end of the range.
            match step {
                Some(_) => (value, self.kind.max()),
                None => (value, value),
            }
        };

        if start > end {
            return Err(FieldError::InvalidRange { start, end });
        }

        for value in (start..=end).step_by(step.unwrap_or(1)) {
            self.set_bit(value)?;
        }
        Ok(())
    }

    fn parse_step(step_str: &str) -> Result<usize, FieldError> {
        if step_str.is_empty() || !step_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FieldError::InvalidStep(step_str.to_string()));
        }
        match step_str.parse::<usize>() {
            Ok(step) if step > 0 => Ok(step),
            _ => Err(FieldError::InvalidStep(step_str.to_string())),
        }
    }

    fn parse_value(&self, token: &str) -> Result<u8, FieldError> {
        if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
            // Digits only, so parsing can only fail on overflow
            let value = token.parse::<u32>().unwrap_or(u32::MAX);
            if value < self.kind.min() as u32 || value > self.kind.max() as u32 {
                return Err(FieldError::OutOfRange {
                    value,
                    min: self.kind.min(),
                    max: self.kind.max(),
                });
            }
            return Ok(value as u8);
        }

        self.lookup_name(token)
            .ok_or_else(|| FieldError::InvalidToken(token.to_string()))
    }

    // Names match on their first three letters, so `Feb`, `February` and `febr` are the same.
    fn lookup_name(&self, token: &str) -> Option<u8> {
        let names = self.kind.names()?;
        if token.len() < 3 || !token.bytes().all(|b| b.is_ascii_alphabetic()) {
            return None;
        }
        let prefix = &token[..3];
        names
            .iter()
            .position(|name| name.eq_ignore_ascii_case(prefix))
            .map(|index| index as u8 + self.kind.min())
    }
}

// Canonical rendering: `*` for a full range, otherwise maximal runs joined by commas.
impl fmt::Display for CronComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_full() {
            return f.write_str("*");
        }

        let mut next = self.first();
        let mut separator = "";
        while let Some(first) = next {
            let mut last = first;
            while self.is_bit_set(last + 1) {
                last += 1;
            }
            if first == last {
                write!(f, "{separator}{first}")?;
            } else {
                write!(f, "{separator}{first}-{last}")?;
            }
            separator = ",";
            next = self.next_set(last + 1);
        }
        Ok(())
    }
}
