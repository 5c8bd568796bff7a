//! Phrase segmentation.
//!
//! Peels structural clauses off a normalized phrase, in this order:
//!
//! ```text
//! except clause      "... except march 4 and 11"
//! count              "... for 3 times", "... twice"
//! span               "... for the next 2 months"
//! clock times        "... at 9am and 5pm"
//! from/to range      "... from nov to jun"
//!   or start + event "starting monday every week ..."
//!   or event + start "every week ... starting monday"
//!   or trailing end  "... until june"
//! ```
//!
//! Each step works on what the previous ones left behind. Dates stay as
//! text here; the parser resolves them.

use super::metrics::SegmentSummary;
use crate::api::DaytimeWindow;
use crate::grammar::TimeOfDay;
use crate::grammar::tables::{number_value, unit_frequency};
use crate::grammar::time_of_day;
use crate::rule::Frequency;
use std::ops::Range;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Segments {
    /// The core event phrase.
    pub event: String,
    /// The phrase with only the except, count, span and time clauses
    /// removed. Used when the phrase is not recurring.
    pub residual: String,
    pub starting: Option<String>,
    pub ending: Option<String>,
    /// Start and end came from a `from .. to ..` range.
    pub range: bool,
    pub count: Option<u32>,
    pub span: Option<(u32, Frequency)>,
    pub except: Option<String>,
    pub times: Vec<TimeOfDay>,
}

impl Segments {
    pub(crate) fn summary(&self) -> SegmentSummary {
        SegmentSummary {
            event: self.event.clone(),
            starting: self.starting.clone(),
            ending: self.ending.clone(),
            count: self.count,
            span: self.span.map(|(n, unit)| format!("{n} {}", unit_plural(unit))),
            except: self.except.clone(),
            times: self.times.iter().map(|t| format!("{:02}:{:02}", t.hour, t.minute)).collect(),
        }
    }
}

pub(crate) fn split(text: &str, window: DaytimeWindow, split_except: bool) -> Segments {
    let mut seg = Segments::default();
    let mut rest = text.trim().to_string();

    if split_except {
        let found = regex!(r"^(?P<main>.*?)\s*\bexcept(?:\s+(?:for|on|in))?\s+(?P<except>.+)$")
            .captures(&rest)
            .map(|caps| (caps["main"].to_string(), caps["except"].trim().to_string()));
        if let Some((main, except)) = found {
            rest = main;
            seg.except = Some(except);
        }
    }

    let count = regex!(r"\bfor\s+(?:(\w+)\s*(?:x|times|occurrences?)|(once|twice))\b").captures(&rest).and_then(|caps| {
        let n = match caps.get(2).map(|m| m.as_str()) {
            Some("once") => 1,
            Some(_) => 2,
            None => amount(&caps[1])?,
        };
        Some((cut(&rest, caps.get(0)?.range()), n))
    });
    if let Some((remaining, n)) = count {
        rest = remaining;
        seg.count = Some(n);
    }

    let span = regex!(r"\bfor\s+(?:the\s+)?(?:next\s+)?(\w+)\s+(days?|weeks?|months?|years?)\b")
        .captures(&rest)
        .and_then(|caps| {
            let n = amount(&caps[1])?;
            let unit = unit_frequency(&caps[2])?;
            Some((cut(&rest, caps.get(0)?.range()), (n, unit)))
        });
    if let Some((remaining, span)) = span {
        rest = remaining;
        seg.span = Some(span);
    }

    let (rest, times) = time_of_day::extract(&rest, window);
    seg.times = times;
    seg.residual = rest.clone();

    if let Some((event, start, end)) =
        regex!(r"^(?P<event>.*?)\s*\bfrom\s+(?P<start>.+?)\s+(?:to|through|thru|until|till)\s+(?P<end>.+)$")
            .captures(&rest)
            .map(|caps| (caps["event"].to_string(), caps["start"].to_string(), caps["end"].to_string()))
    {
        seg.event = event;
        seg.starting = Some(start);
        seg.ending = Some(end);
        seg.range = true;
    } else if let Some((start, event)) = start_then_event(&rest) {
        let (event, end) = split_end(&event);
        seg.event = event;
        seg.starting = Some(start);
        seg.ending = end;
    } else if let Some((event, start)) = event_then_start(&rest) {
        let (event, event_end) = split_end(&event);
        let (start, start_end) = split_end(&start);
        seg.event = event;
        seg.starting = Some(start);
        seg.ending = start_end.or(event_end);
    } else {
        let (event, end) = split_end(&rest);
        seg.event = event;
        seg.ending = end;
    }
    seg.event = seg.event.trim().to_string();
    seg
}

/// `starting next week every other friday`
fn start_then_event(text: &str) -> Option<(String, String)> {
    regex!(
        r"^(?:start(?:s|ing)?|beginning)\s+(?:on\s+)?(?P<start>.+?)\s+(?P<event>(?:every|each|on|repeat(?:s|ing)?|daily|everyday|(?:bi-?)?weekly|fortnightly|monthly|yearly|annually|weekdays|weekends|(?:mon|tue|tues|wed|wednes|thu|thur|thurs|fri|sat|satur|sun)days)\b.*)$"
    )
    .captures(text)
    .map(|caps| (caps["start"].to_string(), caps["event"].to_string()))
}

/// `every other friday starting next week`
fn event_then_start(text: &str) -> Option<(String, String)> {
    regex!(r"^(?P<event>.+?)\s+(?:start(?:s|ing)?|beginning|from)\s+(?:on\s+)?(?P<start>.+)$")
        .captures(text)
        .map(|caps| (caps["event"].to_string(), caps["start"].to_string()))
}

/// Split a trailing `until <date>` off a phrase.
fn split_end(text: &str) -> (String, Option<String>) {
    match regex!(r"^(?P<other>.*?)\s*\b(?:until|till|ending|ends|end)\s+(?:on\s+)?(?P<ending>.+)$").captures(text) {
        Some(caps) => (caps["other"].trim().to_string(), Some(caps["ending"].trim().to_string())),
        None => (text.trim().to_string(), None),
    }
}

fn amount(word: &str) -> Option<u32> {
    match word {
        "a" | "an" => Some(1),
        _ => number_value(word).filter(|n| *n > 0),
    }
}

fn cut(text: &str, span: Range<usize>) -> String {
    let joined = format!("{} {}", &text[..span.start], &text[span.end..]);
    regex!(r"\s+").replace_all(joined.trim(), " ").into_owned()
}

fn unit_plural(unit: Frequency) -> &'static str {
    match unit {
        Frequency::Secondly => "seconds",
        Frequency::Minutely => "minutes",
        Frequency::Hourly => "hours",
        Frequency::Daily => "days",
        Frequency::Weekly => "weeks",
        Frequency::Monthly => "months",
        Frequency::Yearly => "years",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(text: &str) -> Segments {
        split(text, DaytimeWindow::default(), true)
    }

    #[test]
    fn start_after_event_with_trailing_end() {
        let s = seg("every other friday starting next week until june");
        assert_eq!(s.event, "every other friday");
        assert_eq!(s.starting.as_deref(), Some("next week"));
        assert_eq!(s.ending.as_deref(), Some("june"));
        assert!(!s.range);
    }

    #[test]
    fn start_before_event() {
        let s = seg("starting on march 3 every day until march 10");
        assert_eq!(s.starting.as_deref(), Some("march 3"));
        assert_eq!(s.event, "every day");
        assert_eq!(s.ending.as_deref(), Some("march 10"));
    }

    #[test]
    fn from_to_range() {
        let s = seg("every monday from nov to jun");
        assert_eq!(s.event, "every monday");
        assert_eq!(s.starting.as_deref(), Some("nov"));
        assert_eq!(s.ending.as_deref(), Some("jun"));
        assert!(s.range);
    }

    #[test]
    fn counts_and_spans() {
        let cases = vec![
            ("every day for 3 times", Some(3), None),
            ("every day for 10x", Some(10), None),
            ("every week twice", None, None),
            ("every week for twice", Some(2), None),
            ("every day for the next 2 weeks", None, Some((2, Frequency::Weekly))),
            ("every day for a month", None, Some((1, Frequency::Monthly))),
        ];
        for (text, count, span) in cases {
            let s = seg(text);
            assert_eq!(s.count, count, "count for {text}");
            assert_eq!(s.span, span, "span for {text}");
        }
        assert_eq!(seg("every day for the next 2 weeks").event, "every day");
    }

    #[test]
    fn except_clause_is_split_first() {
        let s = seg("every thursday except for march 4 and march 11 until april");
        assert_eq!(s.event, "every thursday");
        assert_eq!(s.except.as_deref(), Some("march 4 and march 11 until april"));
        let nested = split("every thursday except friday", DaytimeWindow::default(), false);
        assert_eq!(nested.except, None);
    }

    #[test]
    fn times_are_pulled_out() {
        let s = seg("every day at 9am and 5pm starting tomorrow");
        assert_eq!(s.event, "every day");
        assert_eq!(s.residual, "every day starting tomorrow");
        assert_eq!(s.summary().times, vec!["09:00", "17:00"]);
    }

    #[test]
    fn plain_phrase_has_no_clauses() {
        let s = seg("march 3rd");
        assert_eq!(s.event, "march 3rd");
        assert_eq!(s.residual, "march 3rd");
        assert_eq!(s.starting, None);
        assert_eq!(s.ending, None);
    }
}
