//! Rule and date rendering.
//!
//! The reverse of parsing: wire text (or a concrete date) in, a short
//! English phrase out. Every template is chosen so that parsing its output
//! gives back the same rule, which keeps `format(parse(..))` stable under
//! repetition.
//!
//! ```text
//! FREQ=MONTHLY;INTERVAL=1;BYDAY=1FR,3FR     1st and 3rd Fri of every month
//! FREQ=YEARLY;INTERVAL=1;BYDAY=4TH;BYMONTH=11
//!                                           every 4th Thu in Nov
//! FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE        every other week on Mon and Wed
//! ```
//!
//! Clauses that follow the event (times, start, end, except) live in
//! `format/clauses.rs`.

#[path = "format/clauses.rs"]
mod clauses;

pub(crate) use clauses::format_date;

use crate::collab::Expander;
use crate::grammar::tables::{WEEKEND, WORK_WEEK, month_short_name, ordinal_label, weekday_short_name};
use crate::rule::{Frequency, RecurrenceRule, WeekdayNum};
use crate::{Context, Options};
use tracing::debug;

/// Render rule text, or return it unchanged when it does not decode.
pub(crate) fn format_rule(text: &str, context: &Context, options: &Options, expander: &dyn Expander) -> String {
    match RecurrenceRule::from_wire(text) {
        Ok(rule) => describe(&rule, context, options, expander),
        Err(err) => {
            debug!(%err, "rule text left as is");
            text.to_string()
        }
    }
}

fn describe(rule: &RecurrenceRule, context: &Context, options: &Options, expander: &dyn Expander) -> String {
    let mut out = event(rule);
    out.push_str(&clauses::times(rule));
    let reference = context.reference_time;
    let starting = clauses::starting(rule, reference, options, expander);
    out.push_str(&starting);
    let anchor = rule.dtstart.unwrap_or(reference);
    out.push_str(&clauses::ending(rule, anchor));
    out.push_str(&clauses::except(rule, anchor));
    out
}

/// The event phrase alone, without times or bounds.
pub(crate) fn event(rule: &RecurrenceRule) -> String {
    let Some(freq) = rule.freq else {
        return String::new();
    };
    let mut out = match freq {
        Frequency::Weekly => weekly(rule),
        Frequency::Monthly => monthly(rule),
        Frequency::Yearly => yearly(rule),
        _ => {
            let mut out = every(rule.interval, freq);
            out.push_str(&on_plain_days(rule));
            if !rule.bymonthday.is_empty() {
                out.push_str(&format!(" on the {}", ordinals(&rule.bymonthday)));
            }
            out
        }
    };
    if !matches!(freq, Frequency::Yearly) && !rule.bymonth.is_empty() {
        out.push_str(&format!(" in {}", months(&rule.bymonth)));
    }
    out
}

fn weekly(rule: &RecurrenceRule) -> String {
    let plain: Vec<_> = rule.byday.iter().map(|w| w.weekday).collect();
    if rule.byday.is_empty() {
        return every(rule.interval, Frequency::Weekly);
    }
    if rule.interval == 1 && rule.byday.iter().all(|w| w.nth.is_none()) {
        if plain == WORK_WEEK {
            return "weekdays".to_string();
        }
        if plain == WEEKEND {
            return "weekends".to_string();
        }
        return format!("every {}", days(&rule.byday));
    }
    format!("{} on {}", every(rule.interval, Frequency::Weekly), days(&rule.byday))
}

fn monthly(rule: &RecurrenceRule) -> String {
    let period = format!("of {}", every(rule.interval, Frequency::Monthly));
    let nth_weekday = !rule.bysetpos.is_empty() && rule.byday.iter().map(|w| w.weekday).eq(WORK_WEEK);
    let body = if rule.has_ordinal_weekdays() {
        format!("{} {period}", ordinal_days(&rule.byday))
    } else if nth_weekday {
        format!("the {} weekday {period}", ordinals(&rule.bysetpos))
    } else if !rule.bymonthday.is_empty() {
        if rule.bymonthday.iter().all(|d| *d > 0) {
            format!("the {} {period}", ordinals(&rule.bymonthday))
        } else {
            format!("the {} day {period}", ordinals(&rule.bymonthday))
        }
    } else {
        let mut out = every(rule.interval, Frequency::Monthly);
        out.push_str(&on_plain_days(rule));
        out
    };
    if rule.bysetpos.is_empty() || nth_weekday {
        body
    } else {
        format!("the {} instance of {body}", ordinals(&rule.bysetpos))
    }
}

fn yearly(rule: &RecurrenceRule) -> String {
    let ordinal_days_only = rule.has_ordinal_weekdays() && rule.bymonthday.is_empty();
    let simple = rule.interval == 1
        && rule.byweekno.is_empty()
        && rule.byyearday.is_empty()
        && rule.bysetpos.is_empty()
        && !rule.bymonth.is_empty();
    if simple {
        if ordinal_days_only {
            return format!("every {} in {}", ordinal_days(&rule.byday), months(&rule.bymonth));
        }
        if rule.byday.is_empty() {
            match (rule.bymonth.as_slice(), rule.bymonthday.as_slice()) {
                ([month], [day]) if *day > 0 => {
                    return format!("every {} {}", month_short_name(*month), ordinal_label(*day));
                }
                (_, []) => return format!("every {}", months(&rule.bymonth)),
                _ => {}
            }
        }
    }

    let mut out = every(rule.interval, Frequency::Yearly);
    if rule.has_ordinal_weekdays() {
        out.push_str(&format!(" on the {}", ordinal_days(&rule.byday)));
    } else {
        out.push_str(&on_plain_days(rule));
    }
    if !rule.bymonthday.is_empty() {
        let of_month = if rule.bymonth.is_empty() { " day of the month" } else { "" };
        out.push_str(&format!(" on the {}{of_month}", ordinals(&rule.bymonthday)));
    }
    if !rule.bymonth.is_empty() {
        let joiner = if rule.bymonthday.is_empty() { "in" } else { "of" };
        out.push_str(&format!(" {joiner} {}", months(&rule.bymonth)));
    }
    if !rule.byyearday.is_empty() {
        out.push_str(&format!(" on the {} day", ordinals(&rule.byyearday)));
    }
    if !rule.byweekno.is_empty() {
        out.push_str(&format!(" in the {} week", ordinals(&rule.byweekno)));
    }
    if !rule.bysetpos.is_empty() {
        out = format!("the {} instance of {out}", ordinals(&rule.bysetpos));
    }
    out
}

/// `every day`, `every other week`, `every 3 months`.
fn every(interval: u32, freq: Frequency) -> String {
    let unit = match freq {
        Frequency::Secondly => "second",
        Frequency::Minutely => "minute",
        Frequency::Hourly => "hour",
        Frequency::Daily => "day",
        Frequency::Weekly => "week",
        Frequency::Monthly => "month",
        Frequency::Yearly => "year",
    };
    match interval {
        0 | 1 => format!("every {unit}"),
        2 => format!("every other {unit}"),
        n => format!("every {n} {unit}s"),
    }
}

fn on_plain_days(rule: &RecurrenceRule) -> String {
    let plain: Vec<WeekdayNum> = rule.byday.iter().filter(|w| w.nth.is_none()).copied().collect();
    if plain.is_empty() { String::new() } else { format!(" on {}", days(&plain)) }
}

fn days(days: &[WeekdayNum]) -> String {
    let names: Vec<String> = days.iter().map(|w| weekday_short_name(w.weekday).to_string()).collect();
    join_and(&names)
}

/// `1st and 3rd Fri`, with runs on the same weekday sharing one name.
fn ordinal_days(days: &[WeekdayNum]) -> String {
    let mut groups: Vec<(Vec<i32>, chrono::Weekday)> = Vec::new();
    for day in days.iter().filter(|w| w.nth.is_some()) {
        let nth = day.nth.unwrap_or(1);
        match groups.last_mut() {
            Some((ords, weekday)) if *weekday == day.weekday => ords.push(nth),
            _ => groups.push((vec![nth], day.weekday)),
        }
    }
    let parts: Vec<String> =
        groups.iter().map(|(ords, weekday)| format!("{} {}", ordinals(ords), weekday_short_name(*weekday))).collect();
    join_and(&parts)
}

fn ordinals(values: &[i32]) -> String {
    let labels: Vec<String> = values.iter().map(|n| ordinal_label(*n)).collect();
    join_and(&labels)
}

fn months(values: &[u32]) -> String {
    let names: Vec<String> = values.iter().map(|m| month_short_name(*m).to_string()).collect();
    join_and(&names)
}

/// `a`, `a and b`, `a, b and c`.
pub(crate) fn join_and(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [one] => one.clone(),
        [rest @ .., last] => format!("{} and {last}", rest.join(", ")),
    }
}
