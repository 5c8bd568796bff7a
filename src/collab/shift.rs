use crate::rule::Frequency;
use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta};

/// Move `dt` by `amount` calendar units.
///
/// Month and year steps keep the day of month; when that day does not exist
/// in the target month the result rolls forward to the 1st of the following
/// month (Jan 31 + 1 month is Mar 1, Feb 29 + 1 year is Mar 1).
pub(crate) fn shift(dt: NaiveDateTime, amount: i64, unit: Frequency) -> Option<NaiveDateTime> {
    let delta = match unit {
        Frequency::Secondly => TimeDelta::try_seconds(amount)?,
        Frequency::Minutely => TimeDelta::try_minutes(amount)?,
        Frequency::Hourly => TimeDelta::try_hours(amount)?,
        Frequency::Daily => TimeDelta::try_days(amount)?,
        Frequency::Weekly => TimeDelta::try_weeks(amount)?,
        Frequency::Monthly => return add_months(dt, amount),
        Frequency::Yearly => return add_months(dt, amount.checked_mul(12)?),
    };
    dt.checked_add_signed(delta)
}

fn add_months(dt: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let zero_based = i64::from(dt.month0()).checked_add(months)?;
    let year = i32::try_from(i64::from(dt.year()) + zero_based.div_euclid(12)).ok()?;
    let month = zero_based.rem_euclid(12) as u32 + 1;
    let date = match NaiveDate::from_ymd_opt(year, month, dt.day()) {
        Some(date) => date,
        None => first_of_following_month(year, month)?,
    };
    Some(date.and_time(dt.time()))
}

fn first_of_following_month(year: i32, month: u32) -> Option<NaiveDate> {
    if month == 12 { NaiveDate::from_ymd_opt(year + 1, 1, 1) } else { NaiveDate::from_ymd_opt(year, month + 1, 1) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn month_steps_roll_past_missing_days() {
        assert_eq!(shift(at(2010, 1, 31, 8), 1, Frequency::Monthly), Some(at(2010, 3, 1, 8)));
        assert_eq!(shift(at(2012, 2, 29, 0), 1, Frequency::Yearly), Some(at(2013, 3, 1, 0)));
        assert_eq!(shift(at(2010, 1, 15, 0), 1, Frequency::Monthly), Some(at(2010, 2, 15, 0)));
    }

    #[test]
    fn month_steps_cross_year_boundaries() {
        assert_eq!(shift(at(2010, 11, 15, 0), 3, Frequency::Monthly), Some(at(2011, 2, 15, 0)));
        assert_eq!(shift(at(2010, 2, 15, 0), -3, Frequency::Monthly), Some(at(2009, 11, 15, 0)));
    }

    #[test]
    fn fixed_length_units() {
        assert_eq!(shift(at(2010, 1, 1, 0), 2, Frequency::Weekly), Some(at(2010, 1, 15, 0)));
        assert_eq!(shift(at(2010, 1, 1, 0), 36, Frequency::Hourly), Some(at(2010, 1, 2, 12)));
        assert_eq!(shift(at(2010, 1, 1, 0), i64::MAX, Frequency::Daily), None);
    }
}
