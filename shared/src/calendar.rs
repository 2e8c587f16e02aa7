//! Business-day calendar construction for weekly plans

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// One delivery day of a generated plan
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BusinessDay {
    /// 1-based, sequential within the plan
    pub day_number: i32,
    pub date: NaiveDate,
}

/// Walk forward from `start` one calendar day at a time and collect the
/// first `count` weekday (Mon-Fri) dates. A weekend `start` is skipped, so
/// the first accepted date is the following Monday. The last element's date
/// becomes the plan's week-end date.
pub fn build_business_days(start: NaiveDate, count: usize) -> Vec<BusinessDay> {
    let mut days = Vec::with_capacity(count);
    let mut current = start;
    while days.len() < count {
        if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            days.push(BusinessDay {
                day_number: days.len() as i32 + 1,
                date: current,
            });
        }
        current = match current.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
    days
}

/// Date a given day number is consumed on, falling back to the plan's
/// week-start date when the day number is not part of the calendar.
pub fn consumption_date(days: &[BusinessDay], day_number: i32, week_start: NaiveDate) -> NaiveDate {
    days.iter()
        .find(|d| d.day_number == day_number)
        .map(|d| d.date)
        .unwrap_or(week_start)
}
