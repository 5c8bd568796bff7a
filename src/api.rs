use crate::collab::{DateResolver, EnglishDates, Expander, RRuleExpander};
use crate::engine::EventParser;
use crate::format::{format_date, format_rule};
use crate::Token;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;
use std::time::Duration;

pub use crate::engine::{Resolution, SegmentSummary, StageTimings};

/// Parsing context.
///
/// Holds the reference instant that relative phrases ("tomorrow", "next
/// tuesday", a month without a year) resolve against.
#[derive(Debug, Clone)]
pub struct Context {
    pub reference_time: NaiveDateTime,
}

impl Default for Context {
    fn default() -> Self {
        if cfg!(test) {
            let date = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();
            let time = NaiveTime::from_hms_opt(0, 0, 0).unwrap();
            Self { reference_time: NaiveDateTime::new(date, time) }
        } else {
            Self { reference_time: Local::now().naive_local() }
        }
    }
}

/// Hours (24-hour clock) that a bare clock reading is assumed to fall in.
///
/// `at 4` has no meridiem; since 4am is before `start` and 4pm is not after
/// `end`, it reads as 16:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaytimeWindow {
    pub start: u32,
    pub end: u32,
}

impl Default for DaytimeWindow {
    fn default() -> Self {
        Self { start: 8, end: 19 }
    }
}

/// Options that affect parsing and formatting.
#[derive(Debug, Clone)]
pub struct Options {
    pub daytime: DaytimeWindow,
    /// Most occurrences ever expanded for a single rule.
    pub expansion_limit: u16,
}

impl Default for Options {
    fn default() -> Self {
        Self { daytime: DaytimeWindow::default(), expansion_limit: 10_000 }
    }
}

/// What a phrase turned out to mean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    /// Wire text: optional `DTSTART`, the `RRULE`, optional `EXRULE` and
    /// `EXDATE` lines, joined by `\n`.
    Rule(String),
    /// A single point in time.
    Date(NaiveDateTime),
}

impl Parsed {
    pub fn as_rule(&self) -> Option<&str> {
        match self {
            Parsed::Rule(text) => Some(text),
            Parsed::Date(_) => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            Parsed::Rule(_) => None,
            Parsed::Date(date) => Some(*date),
        }
    }
}

impl fmt::Display for Parsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parsed::Rule(text) => f.write_str(text),
            Parsed::Date(date) => write!(f, "{}", date.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// Additional details returned by [`parse_verbose_with`].
#[derive(Debug, Clone)]
pub struct ParseDetails {
    pub normalized: String,
    pub segments: SegmentSummary,
    /// Tokens of the event phrase, after the clauses were removed.
    pub tokens: Vec<Token>,
    pub resolution: Resolution,
    pub dtstart: Option<NaiveDateTime>,
    pub until: Option<NaiveDateTime>,
    pub stages: StageTimings,
    pub total: Duration,
}

/// Result from [`parse_verbose_with`].
#[derive(Debug, Clone)]
pub struct ParseResultVerbose {
    pub text: String,
    pub parsed: Option<Parsed>,
    pub elapsed: Duration,
    pub details: ParseDetails,
}

/// Parse `text` against a default [`Context`].
///
/// # Example
/// ```
/// use recurrent::{Parsed, parse};
///
/// let out = parse("every 3 weeks on mon");
/// assert_eq!(out, Some(Parsed::Rule("RRULE:FREQ=WEEKLY;INTERVAL=3;BYDAY=MO".to_string())));
/// ```
pub fn parse(text: &str) -> Option<Parsed> {
    parse_with(text, &Context::default(), &Options::default())
}

/// Parse `text` with the provided `context`/`options`.
///
/// Use this when you want deterministic parsing by supplying a reference time.
pub fn parse_with(text: &str, context: &Context, options: &Options) -> Option<Parsed> {
    parse_using(text, context, options, &EnglishDates, &RRuleExpander)
}

/// Parse with caller-supplied date resolution and rule expansion.
pub fn parse_using(
    text: &str,
    context: &Context,
    options: &Options,
    dates: &dyn DateResolver,
    expander: &dyn Expander,
) -> Option<Parsed> {
    EventParser::new(context, options, dates, expander).run(text).parsed
}

/// Parse `text` and return what each stage saw along the way.
///
/// The plain [`parse_with`] path returns the same outcome without the
/// bookkeeping.
pub fn parse_verbose_with(text: &str, context: &Context, options: &Options) -> ParseResultVerbose {
    let run = EventParser::new(context, options, &EnglishDates, &RRuleExpander).run(text);
    let details = ParseDetails {
        normalized: run.normalized,
        segments: run.segments,
        tokens: run.tokens,
        resolution: run.resolution,
        dtstart: run.dtstart,
        until: run.until,
        stages: run.metrics.stages,
        total: run.metrics.total,
    };
    ParseResultVerbose { text: text.to_string(), parsed: run.parsed, elapsed: run.metrics.total, details }
}

/// Render a parse outcome as English, against a default [`Context`].
///
/// # Example
/// ```
/// use recurrent::{Parsed, format};
///
/// let rule = Parsed::Rule("RRULE:FREQ=MONTHLY;INTERVAL=1;BYDAY=+1FR".to_string());
/// assert_eq!(format(&rule), "1st Fri of every month");
/// ```
pub fn format(parsed: &Parsed) -> String {
    format_with(parsed, &Context::default(), &Options::default())
}

pub fn format_with(parsed: &Parsed, context: &Context, options: &Options) -> String {
    format_using(parsed, context, options, &RRuleExpander)
}

/// Render with a caller-supplied expander, used to decide whether a start
/// date is worth mentioning.
pub fn format_using(parsed: &Parsed, context: &Context, options: &Options, expander: &dyn Expander) -> String {
    match parsed {
        Parsed::Rule(text) => format_rule(text, context, options, expander),
        Parsed::Date(date) => format_date(*date),
    }
}
