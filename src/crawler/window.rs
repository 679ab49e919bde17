//! Date-window resolution for the acceptance threshold

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

/// Returns the inclusive lower bound on accepted publish dates.
///
/// `num_months` of 2 or 3 reaches back one or two calendar months; every
/// other value, 1 included, keeps the window at the current month. The bound
/// is always the first day of the resolved month at midnight.
pub fn resolve_target_date(num_months: i64, now: NaiveDateTime) -> NaiveDateTime {
    let months_back = match num_months {
        1 => 0,
        2 => 1,
        3 => 2,
        other => {
            tracing::warn!(
                num_months = other,
                "num_months outside 1..=3, defaulting to the current month"
            );
            0
        }
    };

    NaiveDateTime::new(month_floor(now.date(), months_back), NaiveTime::MIN)
}

/// First day of the month `months_back` calendar months before `date`
fn month_floor(date: NaiveDate, months_back: u32) -> NaiveDate {
    let total = date.year() * 12 + date.month0() as i32 - months_back as i32;
    let year = total.div_euclid(12);
    let month0 = total.rem_euclid(12) as u32;
    // month0 is in 0..12 and every month has a first day
    NaiveDate::from_ymd_opt(year, month0 + 1, 1).unwrap()
}
