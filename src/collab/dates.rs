//! Date phrase resolution.
//!
//! [`EnglishDates`] first tries a handful of targeted forms that event
//! phrases use constantly and that need recurrence-friendly semantics (a
//! month and day without a year means the *next* such date, a bare month
//! means its 1st), then hands anything else to `chrono-english`.

use super::DateResolver;
use super::shift::shift;
use crate::grammar::tables::{month_number, number_value, unit_frequency, weekday_named};
use crate::rule::Frequency;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_english::{Dialect, parse_date_string};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishDates;

impl DateResolver for EnglishDates {
    fn resolve(&self, phrase: &str, reference: NaiveDateTime) -> Option<NaiveDateTime> {
        let cleaned = clean(phrase);
        if cleaned.is_empty() {
            return None;
        }
        let resolved = month_and_day(&cleaned, reference)
            .or_else(|| bare_month(&cleaned, reference))
            .or_else(|| weekday_ahead(&cleaned, reference))
            .or_else(|| relative_period(&cleaned, reference))
            .or_else(|| counted_offset(&cleaned, reference))
            .or_else(|| free_form(&cleaned, reference));
        debug!(phrase = %cleaned, resolved = ?resolved, "date phrase");
        resolved
    }
}

fn clean(phrase: &str) -> String {
    let lowered = phrase.trim().to_lowercase();
    let without_lead = regex!(r"^(?:on\s+)?(?:the\s+)?").replace(&lowered, "");
    let without_suffix = regex!(r"\b(\d{1,2})(?:st|nd|rd|th)\b").replace_all(&without_lead, "$1");
    let without_fillers = regex!(r"\b(?:of|and)\b").replace_all(&without_suffix, " ");
    regex!(r"\s+").replace_all(without_fillers.trim(), " ").into_owned()
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Next date on or after `reference` with the given month and day.
pub(crate) fn next_month_day(month: u32, day: u32, reference: NaiveDateTime) -> Option<NaiveDate> {
    let today = reference.date();
    // Feb 29 may be up to eight years away.
    (0..=8)
        .filter_map(|offset| NaiveDate::from_ymd_opt(today.year() + offset, month, day))
        .find(|date| *date >= today)
}

/// `march 3`, `thursday february 18`, `mar 2 2012`, `3 march`.
fn month_and_day(text: &str, reference: NaiveDateTime) -> Option<NaiveDateTime> {
    let (month, day, year) = if let Some(caps) =
        regex!(r"^(?:([a-z]+)\s+)?([a-z]+)\s+(\d{1,2})(?:\s+(\d{4}))?$").captures(text)
    {
        if let Some(weekday) = caps.get(1) {
            weekday_named(weekday.as_str())?;
        }
        (month_number(&caps[2])?, caps[3].parse::<u32>().ok()?, caps.get(4))
    } else {
        let caps = regex!(r"^(\d{1,2})\s+([a-z]+)(?:\s+(\d{4}))?$").captures(text)?;
        (month_number(&caps[2])?, caps[1].parse::<u32>().ok()?, caps.get(3))
    };
    let date = match year {
        Some(year) => NaiveDate::from_ymd_opt(year.as_str().parse().ok()?, month, day)?,
        None => next_month_day(month, day, reference)?,
    };
    trace!(%date, "month and day");
    Some(midnight(date))
}

/// `november`, `june 2011`: the 1st of that month.
fn bare_month(text: &str, reference: NaiveDateTime) -> Option<NaiveDateTime> {
    let caps = regex!(r"^([a-z]+)(?:\s+(\d{4}))?$").captures(text)?;
    let month = month_number(&caps[1])?;
    let year = match caps.get(2) {
        Some(year) => year.as_str().parse().ok()?,
        None if month < reference.month() => reference.year() + 1,
        None => reference.year(),
    };
    NaiveDate::from_ymd_opt(year, month, 1).map(midnight)
}

/// `sunday`, `this sunday`, `next tuesday`: the first such day on or after
/// the reference date, strictly after it for `next`.
fn weekday_ahead(text: &str, reference: NaiveDateTime) -> Option<NaiveDateTime> {
    let caps = regex!(r"^(?:(this|next|coming)\s+)?([a-z]+)$").captures(text)?;
    let target = weekday_named(&caps[2])?;
    let today = reference.date();
    let mut ahead = (7 + target.num_days_from_monday() - today.weekday().num_days_from_monday()) % 7;
    if ahead == 0 && caps.get(1).is_some_and(|m| m.as_str() == "next") {
        ahead = 7;
    }
    Some(midnight(today + chrono::Days::new(u64::from(ahead))))
}

/// `next week`, `this month`, `following year`.
fn relative_period(text: &str, reference: NaiveDateTime) -> Option<NaiveDateTime> {
    let caps = regex!(r"^(next|this|following|coming)\s+(week|month|year)$").captures(text)?;
    let today = reference.date();
    if &caps[1] == "this" {
        return Some(midnight(today));
    }
    let date = match &caps[2] {
        "week" => today + chrono::Days::new(7),
        "month" => {
            let first = today.with_day(1)?;
            first.checked_add_months(chrono::Months::new(1))?
        }
        _ => NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)?,
    };
    Some(midnight(date))
}

/// `in 3 weeks`, `two days from now`.
fn counted_offset(text: &str, reference: NaiveDateTime) -> Option<NaiveDateTime> {
    let caps = regex!(r"^in\s+(\w+)\s+([a-z]+)$")
        .captures(text)
        .or_else(|| regex!(r"^(\w+)\s+([a-z]+)\s+from\s+now$").captures(text))?;
    let amount = number_value(&caps[1]).or_else(|| (&caps[1] == "a").then_some(1))?;
    let unit = unit_frequency(&caps[2])?;
    let shifted = shift(reference, i64::from(amount), unit)?;
    Some(match unit {
        Frequency::Hourly | Frequency::Minutely | Frequency::Secondly => shifted,
        _ => midnight(shifted.date()),
    })
}

fn free_form(text: &str, reference: NaiveDateTime) -> Option<NaiveDateTime> {
    match parse_date_string(text, reference.and_utc(), Dialect::Us) {
        Ok(resolved) => Some(resolved.naive_utc()),
        Err(err) => {
            trace!(phrase = text, %err, "not a date");
            None
        }
    }
}
