//! Trading Day Filter
//!
//! Approximate US market calendar: weekends, three fixed-date holidays and
//! Thanksgiving. Holidays falling on a weekend are not shifted to an observed
//! weekday, and the other federal holidays are not modelled.

use chrono::{Datelike, NaiveDate, Weekday};

/// Monday through Friday
pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Fourth Thursday of November: the first Thursday plus three weeks.
pub fn thanksgiving(year: i32) -> Option<NaiveDate> {
    let nov_first = NaiveDate::from_ymd_opt(year, 11, 1)?;
    let to_thursday = (7 + Weekday::Thu.num_days_from_monday()
        - nov_first.weekday().num_days_from_monday())
        % 7;
    nov_first.checked_add_days(chrono::Days::new(u64::from(to_thursday) + 21))
}

pub fn is_holiday(date: NaiveDate) -> bool {
    match (date.month(), date.day()) {
        // New Year's Day, Independence Day, Christmas
        (1, 1) | (7, 4) | (12, 25) => true,
        (11, day) => thanksgiving(date.year()).is_some_and(|t| t.day() == day),
        _ => false,
    }
}

/// Whether markets are presumed open on `date`.
pub fn is_trading_day(date: NaiveDate) -> bool {
    is_weekday(date) && !is_holiday(date)
}
