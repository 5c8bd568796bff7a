//! Translate informal English event phrases into RFC 5545 recurrence rules,
//! and render such rules back into short English phrases.
//!
//! ```text
//! "every 3 weeks on mon"          -> RRULE:FREQ=WEEKLY;INTERVAL=3;BYDAY=MO
//! "first and third friday of each month"
//!                                  -> RRULE:FREQ=MONTHLY;INTERVAL=1;BYDAY=1FR,3FR
//! "march 3rd at 12:15am"          -> 2010-03-03 00:15:00 (a single date)
//! "remember to call mitchell"     -> nothing
//! ```
//!
//! Parsing is a deterministic pipeline (normalize, segment, tokenize, resolve)
//! with two fallbacks for phrases that name a single date. Calendar arithmetic
//! that needs a real recurrence engine or a free-form date parser goes through
//! the [`Expander`] and [`DateResolver`] traits; [`RRuleExpander`] and
//! [`EnglishDates`] are the stock implementations.

#[macro_use]
mod macros;
mod api;
mod collab;
mod engine;
mod format;
mod grammar;
mod rule;

pub use api::{
    Context, DaytimeWindow, Options, ParseDetails, ParseResultVerbose, Parsed, Resolution, SegmentSummary,
    StageTimings, format, format_using, format_with, parse, parse_using, parse_verbose_with, parse_with,
};
pub use collab::{DateResolver, EnglishDates, Expander, ExpansionError, Horizon, RRuleExpander};
pub use rule::{ExDate, Frequency, RecurrenceRule, WeekdayNum, WireError};

// --- Tokens -----------------------------------------------------------------

/// Category assigned to a single word of a normalized phrase.
///
/// The first eleven variants carry recurrence content; the rest only shape the
/// sentence and are skipped by the resolver's content scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `daily`, `everyday`.
    Daily,
    /// `every`, `each`, `once`.
    Every,
    /// `through`, `thru`.
    Through,
    /// `weekly`, `biweekly`, `monthly`, `yearly`, ...
    RecurringUnit,
    /// `1st`, `third`, `last`, `-2nd`.
    Ordinal,
    /// `day`, `weeks`, `min`, ...
    Unit,
    /// Digits or a small number word.
    Number,
    /// `mondays`, `weekends`, ...
    PluralWeekday,
    /// `mon`, `wednesday`, `weekday`, ...
    DayOfWeek,
    /// `jan`, `september`, ...
    MonthOfYear,
    /// `instance`, `occurrences`.
    SetPosition,
    /// `other`, `next`, `this`, ...
    AmbiguousModifier,
    Starting,
    Ending,
    Repeat,
    Separator,
    Time,
    /// Filler such as `on`, `of`, `the`.
    Other,
    AmPm,
    /// Anything no pattern claims.
    Untyped,
}

impl TokenKind {
    /// Whether the resolver reads this kind when scanning a phrase.
    pub fn is_content(self) -> bool {
        matches!(
            self,
            TokenKind::Daily
                | TokenKind::Every
                | TokenKind::Through
                | TokenKind::RecurringUnit
                | TokenKind::Ordinal
                | TokenKind::Unit
                | TokenKind::Number
                | TokenKind::PluralWeekday
                | TokenKind::DayOfWeek
                | TokenKind::MonthOfYear
                | TokenKind::SetPosition
        )
    }
}

/// One word of a normalized phrase with its category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
}

impl Token {
    pub(crate) fn new(text: &str, kind: TokenKind) -> Self {
        Token { text: text.to_string(), kind }
    }
}
