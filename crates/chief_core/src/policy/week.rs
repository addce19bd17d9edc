//! Visible work-week window.
//!
//! # Invariants
//! - The week is anchored on Monday.
//! - Working days are the first `work_days` days starting at Monday.

use crate::config::PlannerConfig;
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

/// Monday-anchored week with working hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkWeek {
    monday: NaiveDate,
    work_days: u8,
    work_start_hour: u32,
    work_end_hour: u32,
}

impl WorkWeek {
    /// Returns the week containing `date`.
    pub fn containing(date: NaiveDate, config: &PlannerConfig) -> Self {
        let offset = u64::from(date.weekday().num_days_from_monday());
        Self {
            monday: date - Days::new(offset),
            work_days: config.work_days,
            work_start_hour: config.work_start_hour,
            work_end_hour: config.work_end_hour,
        }
    }

    pub fn monday(&self) -> NaiveDate {
        self.monday
    }

    /// Date `offset` days after Monday.
    pub fn day(&self, offset: u32) -> Option<NaiveDate> {
        self.monday.checked_add_days(Days::new(u64::from(offset)))
    }

    /// Wall-clock instant on day `offset` at `hour:minute`.
    pub fn at(&self, offset: u32, hour: u32, minute: u32) -> Option<NaiveDateTime> {
        self.day(offset)?.and_hms_opt(hour, minute, 0)
    }

    /// Working days in calendar order.
    pub fn working_days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..u32::from(self.work_days)).filter_map(|offset| self.day(offset))
    }

    /// Working-hours window `[open, close)` for `date`.
    pub fn working_hours(&self, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        let midnight = date.and_time(NaiveTime::MIN);
        (
            midnight + TimeDelta::hours(i64::from(self.work_start_hour)),
            midnight + TimeDelta::hours(i64::from(self.work_end_hour)),
        )
    }

    /// Whether `instant` falls inside the calendar week (any weekday).
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        let date = instant.date();
        let next_monday = self.monday + Days::new(7);
        date >= self.monday && date < next_monday
    }
}
