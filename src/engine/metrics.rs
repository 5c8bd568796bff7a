//! Engine run metrics.
//!
//! A run records how long each pipeline stage took and which
//! interpretation finally produced the outcome. The same data backs the
//! verbose API and the CLI report.

use crate::rule::RecurrenceRule;
use crate::{Parsed, Token};
use chrono::NaiveDateTime;
use std::fmt;
use std::time::Duration;

/// Which interpretation produced the outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resolution {
    /// The event phrase resolved to a recurrence rule.
    Recurring,
    /// One ordinal occurrence, e.g. `2nd friday in august`.
    Singleton,
    /// A plain date handed to the date resolver.
    Absolute,
    #[default]
    NotADate,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resolution::Recurring => "recurring",
            Resolution::Singleton => "singleton",
            Resolution::Absolute => "absolute",
            Resolution::NotADate => "not a date",
        })
    }
}

/// Per-stage elapsed time.
#[derive(Debug, Default, Clone, Copy)]
pub struct StageTimings {
    pub normalize: Duration,
    /// Clause extraction plus resolution of the start and end dates.
    pub segment: Duration,
    /// Tokenizing and resolving the event phrase.
    pub resolve: Duration,
    /// Parsing and reconciling the except clause.
    pub exceptions: Duration,
    /// Singleton and plain date interpretations.
    pub fallback: Duration,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RunMetrics {
    pub total: Duration,
    pub stages: StageTimings,
}

/// The clauses peeled off the phrase, as they appeared in the text.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SegmentSummary {
    /// What is left once every clause is removed.
    pub event: String,
    pub starting: Option<String>,
    pub ending: Option<String>,
    pub count: Option<u32>,
    /// A `for the next N weeks` style span, as `N unit`.
    pub span: Option<String>,
    pub except: Option<String>,
    /// Clock times as `HH:MM`.
    pub times: Vec<String>,
}

/// Parser output bundled with what the run saw along the way.
#[derive(Debug, Clone, Default)]
pub struct RunResult {
    pub parsed: Option<Parsed>,
    pub normalized: String,
    pub segments: SegmentSummary,
    pub tokens: Vec<Token>,
    pub resolution: Resolution,
    /// The finished rule when the phrase was recurring.
    pub rule: Option<RecurrenceRule>,
    /// Resolved start and end, before they are folded into the rule.
    pub dtstart: Option<NaiveDateTime>,
    pub until: Option<NaiveDateTime>,
    pub metrics: RunMetrics,
}
