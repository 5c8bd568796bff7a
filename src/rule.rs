//! Recurrence rule model.
//!
//! [`RecurrenceRule`] is the structured value the parser fills in and the
//! formatter reads back. It mirrors the RFC 5545 RRULE parts this crate
//! understands; the text encoding lives in `rule/wire.rs`.
//!
//! All `by*` lists are ordered sets: insertion order is kept (it is the order
//! the phrase mentioned things in) and duplicates are ignored.

#[path = "rule/wire.rs"]
mod wire;

pub use wire::WireError;

use chrono::{NaiveDate, NaiveDateTime, Weekday};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Frequency {
    Secondly,
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Secondly => "SECONDLY",
            Frequency::Minutely => "MINUTELY",
            Frequency::Hourly => "HOURLY",
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Yearly => "YEARLY",
        }
    }

    pub(crate) fn from_wire(s: &str) -> Option<Self> {
        Some(match s {
            "SECONDLY" => Frequency::Secondly,
            "MINUTELY" => Frequency::Minutely,
            "HOURLY" => Frequency::Hourly,
            "DAILY" => Frequency::Daily,
            "WEEKLY" => Frequency::Weekly,
            "MONTHLY" => Frequency::Monthly,
            "YEARLY" => Frequency::Yearly,
            _ => return None,
        })
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A BYDAY entry: a weekday, optionally qualified by its position within the
/// period (`1FR` is the first Friday, `-1SU` the last Sunday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekdayNum {
    pub nth: Option<i32>,
    pub weekday: Weekday,
}

impl WeekdayNum {
    pub fn every(weekday: Weekday) -> Self {
        WeekdayNum { nth: None, weekday }
    }

    pub fn nth(nth: i32, weekday: Weekday) -> Self {
        WeekdayNum { nth: Some(nth), weekday }
    }
}

impl fmt::Display for WeekdayNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(nth) = self.nth {
            write!(f, "{nth}")?;
        }
        f.write_str(weekday_code(self.weekday))
    }
}

/// An exception attached to a rule before it is matched against the rule's
/// occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExDate {
    /// An exact occurrence instant.
    At(NaiveDateTime),
    /// Any occurrence on this date; the occurrence supplies the time of day.
    Date(NaiveDate),
    /// Every occurrence in a month. Without a year the month binds to the
    /// first year in which the rule has an occurrence in it.
    Month { month: u32, year: Option<i32> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub dtstart: Option<NaiveDateTime>,
    pub until: Option<NaiveDateTime>,
    pub count: Option<u32>,
    pub interval: u32,
    pub freq: Option<Frequency>,
    pub byday: Vec<WeekdayNum>,
    pub bymonthday: Vec<i32>,
    pub byyearday: Vec<i32>,
    pub bymonth: Vec<u32>,
    pub byweekno: Vec<i32>,
    pub bysetpos: Vec<i32>,
    pub byhour: Vec<u32>,
    pub byminute: Vec<u32>,
    pub exrule: Option<Box<RecurrenceRule>>,
    pub exdate: Vec<ExDate>,
}

impl Default for RecurrenceRule {
    fn default() -> Self {
        RecurrenceRule {
            dtstart: None,
            until: None,
            count: None,
            interval: 1,
            freq: None,
            byday: Vec::new(),
            bymonthday: Vec::new(),
            byyearday: Vec::new(),
            bymonth: Vec::new(),
            byweekno: Vec::new(),
            bysetpos: Vec::new(),
            byhour: Vec::new(),
            byminute: Vec::new(),
            exrule: None,
            exdate: Vec::new(),
        }
    }
}

impl RecurrenceRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// A rule is only meaningful once it has a frequency.
    pub fn is_recurring(&self) -> bool {
        self.freq.is_some()
    }

    /// Whether any BYDAY entry carries an ordinal.
    pub fn has_ordinal_weekdays(&self) -> bool {
        self.byday.iter().any(|w| w.nth.is_some())
    }

    /// Whether the rule picks particular days out of a month or a year.
    pub(crate) fn addresses_days(&self) -> bool {
        matches!(self.freq, Some(Frequency::Monthly | Frequency::Yearly))
            && (self.has_ordinal_weekdays() || !self.bymonthday.is_empty() || !self.byyearday.is_empty())
    }

    /// Settle conflicting parts before the rule is emitted.
    ///
    /// Ordinal weekdays win over plain ones, and an end date wins over a
    /// repetition count.
    pub(crate) fn finalize(&mut self) {
        if self.has_ordinal_weekdays() {
            self.byday.retain(|w| w.nth.is_some());
        }
        if self.until.is_some() {
            self.count = None;
        }
        if self.interval == 0 {
            self.interval = 1;
        }
    }
}

pub(crate) fn push_unique<T: PartialEq>(set: &mut Vec<T>, value: T) {
    if !set.contains(&value) {
        set.push(value);
    }
}

pub(crate) fn weekday_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

pub(crate) fn weekday_from_code(code: &str) -> Option<Weekday> {
    Some(match code {
        "MO" => Weekday::Mon,
        "TU" => Weekday::Tue,
        "WE" => Weekday::Wed,
        "TH" => Weekday::Thu,
        "FR" => Weekday::Fri,
        "SA" => Weekday::Sat,
        "SU" => Weekday::Sun,
        _ => return None,
    })
}

/// Midnight of the given instant's date; rule boundaries are whole days.
pub(crate) fn start_of_day(dt: NaiveDateTime) -> NaiveDateTime {
    dt.date().and_time(chrono::NaiveTime::MIN)
}

pub(crate) fn first_of_year(year: i32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, 1, 1).map(|d| d.and_time(chrono::NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinal_weekdays_override_plain_ones() {
        let mut rule = RecurrenceRule::new();
        rule.freq = Some(Frequency::Monthly);
        rule.byday = vec![WeekdayNum::every(Weekday::Mon), WeekdayNum::nth(1, Weekday::Fri)];
        rule.finalize();
        assert_eq!(rule.byday, vec![WeekdayNum::nth(1, Weekday::Fri)]);
    }

    #[test]
    fn until_drops_count() {
        let mut rule = RecurrenceRule::new();
        rule.freq = Some(Frequency::Daily);
        rule.count = Some(5);
        rule.until = Some(NaiveDate::from_ymd_opt(2010, 2, 1).unwrap().and_hms_opt(0, 0, 0).unwrap());
        rule.finalize();
        assert_eq!(rule.count, None);
    }

    #[test]
    fn weekday_entries_render_with_ordinals() {
        assert_eq!(WeekdayNum::nth(-1, Weekday::Sun).to_string(), "-1SU");
        assert_eq!(WeekdayNum::nth(3, Weekday::Fri).to_string(), "3FR");
        assert_eq!(WeekdayNum::every(Weekday::Tue).to_string(), "TU");
    }

    #[test]
    fn push_unique_keeps_first_position() {
        let mut days = vec![4, 10];
        push_unique(&mut days, 4);
        push_unique(&mut days, 1);
        assert_eq!(days, vec![4, 10, 1]);
    }
}
