//! Text encoding of [`RecurrenceRule`].
//!
//! ```text
//! DTSTART:20100303
//! RRULE:FREQ=WEEKLY;INTERVAL=1;BYDAY=MO,TH;UNTIL=20100325
//! EXRULE:FREQ=YEARLY;INTERVAL=1;BYMONTH=3;BYMONTHDAY=4
//! EXDATE:20100304T000000,20100311T000000
//! ```
//!
//! `DTSTART` and `UNTIL` are date-only. Parts inside a rule line are always
//! written in the same order so equal rules produce equal text.

use super::{ExDate, Frequency, RecurrenceRule, WeekdayNum, weekday_from_code};
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt::Display;

const DATE: &str = "%Y%m%d";
const DATE_TIME: &str = "%Y%m%dT%H%M%S";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    #[error("rule has no FREQ part")]
    MissingFrequency,
    #[error("unknown frequency `{0}`")]
    UnknownFrequency(String),
    #[error("unknown rule part `{0}`")]
    UnknownPart(String),
    #[error("rule part `{0}` has no value")]
    MissingValue(String),
    #[error("invalid BYDAY entry `{0}`")]
    InvalidWeekday(String),
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
    #[error("invalid date `{0}`")]
    InvalidDate(String),
    #[error("unrecognized line `{0}`")]
    UnknownLine(String),
}

impl RecurrenceRule {
    /// Encode the rule, or `None` when it has no frequency.
    pub fn to_wire(&self) -> Option<String> {
        let mut out = String::new();
        if let Some(start) = self.dtstart {
            out.push_str(&format!("DTSTART:{}\n", start.format(DATE)));
        }
        out.push_str("RRULE:");
        out.push_str(&self.body(false)?);
        if let Some(body) = self.exrule.as_ref().and_then(|ex| ex.body(false)) {
            out.push_str("\nEXRULE:");
            out.push_str(&body);
        }
        let stamps: Vec<String> = self
            .exdate
            .iter()
            .filter_map(|ex| match ex {
                ExDate::At(at) => Some(at.format(DATE_TIME).to_string()),
                ExDate::Date(date) => Some(date.and_time(chrono::NaiveTime::MIN).format(DATE_TIME).to_string()),
                ExDate::Month { .. } => None,
            })
            .collect();
        if !stamps.is_empty() {
            out.push_str("\nEXDATE:");
            out.push_str(&stamps.join(","));
        }
        Some(out)
    }

    /// Rule line for the expansion library: UNTIL is pinned to the last
    /// second of its day in UTC so it stays inclusive for timed starts.
    pub(crate) fn expansion_body(&self) -> Option<String> {
        self.body(true)
    }

    fn body(&self, for_expansion: bool) -> Option<String> {
        let freq = self.freq?;
        let mut parts = vec![format!("FREQ={}", freq.as_str()), format!("INTERVAL={}", self.interval)];
        push_list(&mut parts, "BYDAY", &self.byday);
        push_list(&mut parts, "BYMONTHDAY", &self.bymonthday);
        push_list(&mut parts, "BYYEARDAY", &self.byyearday);
        push_list(&mut parts, "BYMONTH", &self.bymonth);
        push_list(&mut parts, "BYWEEKNO", &self.byweekno);
        push_list(&mut parts, "BYSETPOS", &self.bysetpos);
        push_list(&mut parts, "BYHOUR", &self.byhour);
        push_list(&mut parts, "BYMINUTE", &self.byminute);
        if let Some(until) = self.until {
            let stamp = if for_expansion {
                format!("{}T235959Z", until.format(DATE))
            } else {
                until.format(DATE).to_string()
            };
            parts.push(format!("UNTIL={stamp}"));
        } else if let Some(count) = self.count {
            parts.push(format!("COUNT={count}"));
        }
        Some(parts.join(";"))
    }

    /// Decode rule text produced by [`RecurrenceRule::to_wire`] or any
    /// equivalent RFC 5545 snippet using the same parts.
    pub fn from_wire(text: &str) -> Result<Self, WireError> {
        let mut rule = RecurrenceRule::new();
        let mut saw_rule = false;
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let Some((name, value)) = line.split_once(':') else {
                if line.contains('=') {
                    parse_body(line, &mut rule)?;
                    saw_rule = true;
                    continue;
                }
                return Err(WireError::UnknownLine(line.to_string()));
            };
            let name = name.split(';').next().unwrap_or(name).trim().to_ascii_uppercase();
            match name.as_str() {
                "DTSTART" => rule.dtstart = Some(parse_stamp(value)?),
                "RRULE" => {
                    parse_body(value, &mut rule)?;
                    saw_rule = true;
                }
                "EXRULE" => {
                    let mut ex = RecurrenceRule::new();
                    parse_body(value, &mut ex)?;
                    rule.exrule = Some(Box::new(ex));
                }
                "EXDATE" => {
                    for stamp in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                        rule.exdate.push(ExDate::At(parse_stamp(stamp)?));
                    }
                }
                _ => return Err(WireError::UnknownLine(line.to_string())),
            }
        }
        if !saw_rule || rule.freq.is_none() {
            return Err(WireError::MissingFrequency);
        }
        Ok(rule)
    }
}

fn push_list<T: Display>(parts: &mut Vec<String>, key: &str, values: &[T]) {
    if values.is_empty() {
        return;
    }
    let joined: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    parts.push(format!("{key}={}", joined.join(",")));
}

fn parse_body(body: &str, rule: &mut RecurrenceRule) -> Result<(), WireError> {
    for part in body.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let (key, value) = part.split_once('=').ok_or_else(|| WireError::MissingValue(part.to_string()))?;
        let key = key.trim().to_ascii_uppercase();
        let value = value.trim();
        match key.as_str() {
            "FREQ" => {
                let upper = value.to_ascii_uppercase();
                rule.freq = Some(Frequency::from_wire(&upper).ok_or(WireError::UnknownFrequency(upper))?);
            }
            "INTERVAL" => rule.interval = parse_number(value)?,
            "COUNT" => rule.count = Some(parse_number(value)?),
            "UNTIL" => rule.until = Some(parse_stamp(value)?),
            "BYDAY" => rule.byday = parse_list(value, parse_weekday)?,
            "BYMONTHDAY" => rule.bymonthday = parse_list(value, parse_number)?,
            "BYYEARDAY" => rule.byyearday = parse_list(value, parse_number)?,
            "BYMONTH" => rule.bymonth = parse_list(value, parse_number)?,
            "BYWEEKNO" => rule.byweekno = parse_list(value, parse_number)?,
            "BYSETPOS" => rule.bysetpos = parse_list(value, parse_number)?,
            "BYHOUR" => rule.byhour = parse_list(value, parse_number)?,
            "BYMINUTE" => rule.byminute = parse_list(value, parse_number)?,
            "WKST" => {}
            _ => return Err(WireError::UnknownPart(key)),
        }
    }
    Ok(())
}

fn parse_list<T>(value: &str, item: fn(&str) -> Result<T, WireError>) -> Result<Vec<T>, WireError> {
    value.split(',').map(str::trim).filter(|v| !v.is_empty()).map(item).collect()
}

fn parse_number<T: std::str::FromStr>(value: &str) -> Result<T, WireError> {
    value.trim_start_matches('+').parse().map_err(|_| WireError::InvalidNumber(value.to_string()))
}

fn parse_weekday(value: &str) -> Result<WeekdayNum, WireError> {
    let caps = regex!(r"^([+-]?\d{1,2})?([A-Za-z]{2})$")
        .captures(value)
        .ok_or_else(|| WireError::InvalidWeekday(value.to_string()))?;
    let weekday = weekday_from_code(&caps[2].to_ascii_uppercase())
        .ok_or_else(|| WireError::InvalidWeekday(value.to_string()))?;
    let nth = match caps.get(1) {
        Some(m) => Some(parse_number::<i32>(m.as_str()).map_err(|_| WireError::InvalidWeekday(value.to_string()))?),
        None => None,
    };
    Ok(WeekdayNum { nth, weekday })
}

fn parse_stamp(value: &str) -> Result<NaiveDateTime, WireError> {
    let trimmed = value.trim().trim_end_matches(['Z', 'z']);
    if let Ok(at) = NaiveDateTime::parse_from_str(trimmed, DATE_TIME) {
        return Ok(at);
    }
    NaiveDate::parse_from_str(trimmed, DATE)
        .map(|d| d.and_time(chrono::NaiveTime::MIN))
        .map_err(|_| WireError::InvalidDate(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    #[test]
    fn emits_parts_in_fixed_order() {
        let mut rule = RecurrenceRule::new();
        rule.freq = Some(Frequency::Yearly);
        rule.bymonth = vec![11];
        rule.byday = vec![WeekdayNum::nth(4, Weekday::Thu)];
        rule.byhour = vec![15];
        rule.byminute = vec![0];
        rule.until = Some(day(2012, 1, 1));
        assert_eq!(
            rule.to_wire().unwrap(),
            "RRULE:FREQ=YEARLY;INTERVAL=1;BYDAY=4TH;BYMONTH=11;BYHOUR=15;BYMINUTE=0;UNTIL=20120101"
        );
    }

    #[test]
    fn no_frequency_means_no_text() {
        assert_eq!(RecurrenceRule::new().to_wire(), None);
    }

    #[test]
    fn dtstart_exrule_and_exdates_get_their_own_lines() {
        let mut rule = RecurrenceRule::new();
        rule.freq = Some(Frequency::Daily);
        rule.dtstart = Some(day(2010, 2, 2));
        let mut ex = RecurrenceRule::new();
        ex.freq = Some(Frequency::Weekly);
        ex.byday = vec![WeekdayNum::every(Weekday::Sat), WeekdayNum::every(Weekday::Sun)];
        rule.exrule = Some(Box::new(ex));
        rule.exdate = vec![ExDate::At(day(2010, 3, 3)), ExDate::Month { month: 4, year: None }];
        assert_eq!(
            rule.to_wire().unwrap(),
            "DTSTART:20100202\nRRULE:FREQ=DAILY;INTERVAL=1\nEXRULE:FREQ=WEEKLY;INTERVAL=1;BYDAY=SA,SU\nEXDATE:20100303T000000"
        );
    }

    #[test]
    fn expansion_body_pins_until_to_end_of_day() {
        let mut rule = RecurrenceRule::new();
        rule.freq = Some(Frequency::Daily);
        rule.until = Some(day(2010, 3, 25));
        rule.count = Some(3);
        assert_eq!(rule.expansion_body().unwrap(), "FREQ=DAILY;INTERVAL=1;UNTIL=20100325T235959Z");
    }

    #[test]
    fn decodes_what_it_encodes() {
        let text = "DTSTART:20100303\nRRULE:FREQ=MONTHLY;INTERVAL=2;BYDAY=1FR,-1SU;BYSETPOS=1;COUNT=4\nEXDATE:20100402T000000";
        let rule = RecurrenceRule::from_wire(text).unwrap();
        assert_eq!(rule.dtstart, Some(day(2010, 3, 3)));
        assert_eq!(rule.freq, Some(Frequency::Monthly));
        assert_eq!(rule.interval, 2);
        assert_eq!(rule.byday, vec![WeekdayNum::nth(1, Weekday::Fri), WeekdayNum::nth(-1, Weekday::Sun)]);
        assert_eq!(rule.bysetpos, vec![1]);
        assert_eq!(rule.count, Some(4));
        assert_eq!(rule.exdate, vec![ExDate::At(day(2010, 4, 2))]);
        assert_eq!(rule.to_wire().unwrap(), text);
    }

    #[test]
    fn accepts_explicit_plus_sign_and_timed_until() {
        let rule = RecurrenceRule::from_wire("RRULE:FREQ=MONTHLY;BYDAY=+1FR;UNTIL=20100401T235959Z").unwrap();
        assert_eq!(rule.byday, vec![WeekdayNum::nth(1, Weekday::Fri)]);
        assert_eq!(rule.until, Some(NaiveDate::from_ymd_opt(2010, 4, 1).unwrap().and_hms_opt(23, 59, 59).unwrap()));
        assert_eq!(rule.interval, 1);
    }

    #[test]
    fn rejects_malformed_text() {
        assert_eq!(RecurrenceRule::from_wire("RRULE:INTERVAL=2"), Err(WireError::MissingFrequency));
        assert_eq!(
            RecurrenceRule::from_wire("RRULE:FREQ=WEEKLY;BYDAY=XX"),
            Err(WireError::InvalidWeekday("XX".to_string()))
        );
        assert_eq!(
            RecurrenceRule::from_wire("RRULE:FREQ=FORTNIGHTLY"),
            Err(WireError::UnknownFrequency("FORTNIGHTLY".to_string()))
        );
        assert!(RecurrenceRule::from_wire("hello world").is_err());
    }
}
