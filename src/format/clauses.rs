//! Clauses that follow the event phrase: clock times, start, end, count
//! and exceptions.

use super::event;
use crate::collab::{Expander, Horizon, next_month_day};
use crate::grammar::tables::month_short_name;
use crate::rule::{ExDate, RecurrenceRule, start_of_day};
use crate::Options;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use tracing::trace;

/// Occurrences compared when deciding whether the start date matters.
const START_PROBE: u16 = 24;

/// A concrete date, with its year and, when not midnight, its time.
pub(crate) fn format_date(date: NaiveDateTime) -> String {
    let mut out = format!("{} {} {}", month_short_name(date.month()), date.day(), date.year());
    if (date.hour(), date.minute()) != (0, 0) {
        out.push_str(&format!(" at {}", clock(date.hour(), date.minute())));
    }
    out
}

/// ` at 9am and 5:30pm`: every hour paired with every minute.
pub(crate) fn times(rule: &RecurrenceRule) -> String {
    if rule.byhour.is_empty() {
        return String::new();
    }
    let minutes: &[u32] = if rule.byminute.is_empty() { &[0] } else { &rule.byminute };
    let labels: Vec<String> =
        rule.byhour.iter().flat_map(|h| minutes.iter().map(move |m| clock(*h, *m))).collect();
    format!(" at {}", labels.join(" and "))
}

fn clock(hour: u32, minute: u32) -> String {
    let meridiem = if hour < 12 { "am" } else { "pm" };
    let hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    if minute == 0 { format!("{hour}{meridiem}") } else { format!("{hour}:{minute:02}{meridiem}") }
}

/// ` starting Feb 2`, left out when the start date does not change which
/// occurrences the rule produces.
pub(crate) fn starting(
    rule: &RecurrenceRule,
    reference: NaiveDateTime,
    options: &Options,
    expander: &dyn Expander,
) -> String {
    let Some(dtstart) = rule.dtstart else {
        return String::new();
    };
    let horizon = Horizon::first(options.expansion_limit.min(START_PROBE));
    let from_start = expander.expand(rule, dtstart, horizon);
    let from_reference = expander.expand(rule, start_of_day(reference), horizon);
    if let (Ok(a), Ok(b)) = (&from_start, &from_reference) {
        if a == b {
            trace!(%dtstart, "start date has no effect");
            return String::new();
        }
    }
    format!(" starting {}", render_date(dtstart.date(), reference))
}

/// ` until Apr 5` or ` for 3 times`.
pub(crate) fn ending(rule: &RecurrenceRule, anchor: NaiveDateTime) -> String {
    if let Some(until) = rule.until {
        return format!(" until {}", render_date(until.date(), anchor));
    }
    match rule.count {
        Some(1) => " for 1 occurrence".to_string(),
        Some(n) => format!(" for {n} times"),
        None => String::new(),
    }
}

/// ` except weekends` or ` except Mar 4 and Mar 11`.
pub(crate) fn except(rule: &RecurrenceRule, anchor: NaiveDateTime) -> String {
    if let Some(exrule) = &rule.exrule {
        return format!(" except {}{}", event(exrule), times(exrule));
    }
    let mut days: Vec<NaiveDate> = rule
        .exdate
        .iter()
        .filter_map(|entry| match entry {
            ExDate::At(at) => Some(at.date()),
            ExDate::Date(date) => Some(*date),
            ExDate::Month { .. } => None,
        })
        .collect();
    days.sort_unstable();
    days.dedup();
    if days.is_empty() {
        return String::new();
    }
    let labels: Vec<String> = days.iter().map(|d| render_date(*d, anchor)).collect();
    format!(" except {}", labels.join(" and "))
}

/// `Mar 3` when that is the next Mar 3 from `anchor`, else `Mar 3 2011`.
fn render_date(date: NaiveDate, anchor: NaiveDateTime) -> String {
    let short = format!("{} {}", month_short_name(date.month()), date.day());
    if next_month_day(date.month(), date.day(), anchor) == Some(date) {
        short
    } else {
        format!("{short} {}", date.year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::RRuleExpander;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
    }

    fn rule(text: &str) -> RecurrenceRule {
        RecurrenceRule::from_wire(text).unwrap()
    }

    #[test]
    fn clock_times() {
        let cases = vec![
            ("", "RRULE:FREQ=DAILY;INTERVAL=1"),
            (" at 3pm", "RRULE:FREQ=DAILY;INTERVAL=1;BYHOUR=15"),
            (" at 12am and 12pm", "RRULE:FREQ=DAILY;INTERVAL=1;BYHOUR=0,12;BYMINUTE=0"),
            (
                " at 9am and 9:30am and 5pm and 5:30pm",
                "RRULE:FREQ=DAILY;INTERVAL=1;BYHOUR=9,17;BYMINUTE=0,30",
            ),
        ];
        for (expected, text) in cases {
            assert_eq!(times(&rule(text)), expected, "{text}");
        }
    }

    #[test]
    fn dates_carry_a_year_only_when_needed() {
        let anchor = at(2010, 1, 1, 0, 0);
        assert_eq!(render_date(NaiveDate::from_ymd_opt(2010, 3, 3).unwrap(), anchor), "Mar 3");
        assert_eq!(render_date(NaiveDate::from_ymd_opt(2011, 3, 3).unwrap(), anchor), "Mar 3 2011");
        assert_eq!(format_date(at(2010, 3, 3, 0, 0)), "Mar 3 2010");
        assert_eq!(format_date(at(2010, 3, 3, 15, 30)), "Mar 3 2010 at 3:30pm");
    }

    #[test]
    fn start_dates_that_change_nothing_are_dropped() {
        let options = Options::default();
        let reference = at(2010, 1, 1, 0, 0);
        let later = rule("DTSTART:20100202\nRRULE:FREQ=DAILY;INTERVAL=1");
        assert_eq!(starting(&later, reference, &options, &RRuleExpander), " starting Feb 2");
        let same = rule("DTSTART:20100101\nRRULE:FREQ=WEEKLY;INTERVAL=1;BYDAY=MO");
        assert_eq!(starting(&same, reference, &options, &RRuleExpander), "");
    }

    #[test]
    fn ends_and_exceptions() {
        let anchor = at(2010, 1, 1, 0, 0);
        assert_eq!(ending(&rule("RRULE:FREQ=DAILY;INTERVAL=1;UNTIL=20100405"), anchor), " until Apr 5");
        assert_eq!(ending(&rule("RRULE:FREQ=DAILY;INTERVAL=1;COUNT=3"), anchor), " for 3 times");
        assert_eq!(ending(&rule("RRULE:FREQ=DAILY;INTERVAL=1;COUNT=1"), anchor), " for 1 occurrence");

        let exrule = rule("RRULE:FREQ=DAILY;INTERVAL=1\nEXRULE:FREQ=WEEKLY;INTERVAL=1;BYDAY=SA,SU");
        assert_eq!(except(&exrule, anchor), " except weekends");
        let exdates = rule("RRULE:FREQ=WEEKLY;INTERVAL=1;BYDAY=TH\nEXDATE:20100304T090000,20100311T090000");
        assert_eq!(except(&exdates, anchor), " except Mar 4 and Mar 11");
    }
}
