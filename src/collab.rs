//! Calendar collaborators.
//!
//! The grammar decides *what* a phrase means; turning that into concrete
//! dates needs two capabilities it does not implement itself:
//!
//! - [`DateResolver`]: resolve a free-form date phrase ("march 3rd",
//!   "tomorrow", "next week") against a reference instant.
//! - [`Expander`]: enumerate the occurrences of a rule.
//!
//! Both are traits so callers can swap in their own implementations;
//! [`EnglishDates`] and [`RRuleExpander`] are the defaults used by
//! [`crate::parse_with`] and [`crate::format_with`].

#[path = "collab/dates.rs"]
mod dates;
#[path = "collab/expand.rs"]
mod expand;
#[path = "collab/shift.rs"]
pub(crate) mod shift;

pub use dates::EnglishDates;
pub(crate) use dates::next_month_day;
pub use expand::{ExpansionError, Horizon, RRuleExpander};

use crate::rule::RecurrenceRule;
use chrono::NaiveDateTime;

pub trait DateResolver {
    /// Resolve `phrase` relative to `reference`, or `None` when the phrase
    /// does not name a date.
    fn resolve(&self, phrase: &str, reference: NaiveDateTime) -> Option<NaiveDateTime>;
}

pub trait Expander {
    /// Occurrences of `rule` starting at `start`, bounded by `horizon`.
    ///
    /// `rule.dtstart` is ignored; `start` plays that role.
    fn expand(
        &self,
        rule: &RecurrenceRule,
        start: NaiveDateTime,
        horizon: Horizon,
    ) -> Result<Vec<NaiveDateTime>, ExpansionError>;
}
