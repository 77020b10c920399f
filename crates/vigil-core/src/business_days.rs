use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};

/// Returns true when `date` falls on Monday through Friday.
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Counts weekday date boundaries crossed between two instants.
///
/// Distance is measured on calendar dates: every day strictly after
/// `from`'s date up to and including `to`'s date contributes one when it
/// lands on a weekday. Time of day within a date never contributes, so two
/// instants on the same date are zero days apart and `to` at or before
/// `from` is also zero.
pub fn business_days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> u32 {
    let end = to.date_naive();
    let mut day = from.date_naive();
    let mut count: u32 = 0;
    while day < end {
        let Some(next) = day.succ_opt() else {
            break;
        };
        day = next;
        if is_business_day(day) {
            count = count.saturating_add(1);
        }
    }
    count
}
