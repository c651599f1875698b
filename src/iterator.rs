use chrono::{DateTime, TimeZone};
use tracing::warn;

use crate::{Cron, CronError};

/// Iterator over the occurrences of a [`Cron`] schedule.
///
/// Created by [`Cron::iter_after`] and [`Cron::iter_between`]. Every yielded time is
/// strictly later than the previous one. The iterator ends when the optional end time is
/// reached, or when the schedule has no further occurrence.
#[derive(Debug, Clone)]
pub struct CronIterator<Tz>
where
    Tz: TimeZone,
{
    cron: Cron,
    current_time: DateTime<Tz>,
    end_time: Option<DateTime<Tz>>,
    finished: bool,
}

impl<Tz> CronIterator<Tz>
where
    Tz: TimeZone,
{
    /// Creates a new `CronIterator`.
    ///
    /// # Arguments
    ///
    /// * `cron` - The `Cron` schedule instance.
    /// * `start_after` - Occurrences strictly after this time are yielded.
    /// * `end_time` - When set, occurrences at or after this time are not yielded.
    pub fn new(cron: Cron, start_after: DateTime<Tz>, end_time: Option<DateTime<Tz>>) -> Self {
        CronIterator {
            cron,
            current_time: start_after,
            end_time,
            finished: false,
        }
    }
}

impl<Tz> Iterator for CronIterator<Tz>
where
    Tz: TimeZone,
{
    type Item = DateTime<Tz>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self
            .cron
            .find_occurrence(&self.current_time, false, self.end_time.as_ref())
        {
            Ok(Some(found_time)) => {
                self.current_time = found_time.clone();
                Some(found_time)
            }
            Ok(None) | Err(CronError::TimeSearchLimitExceeded) => {
                self.finished = true;
                None
            }
            Err(error) => {
                warn!(pattern = %self.cron, %error, "cron iterator stopped");
                self.finished = true;
                None
            }
        }
    }
}
