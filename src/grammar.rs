//! English recurrence grammar.
//!
//! Everything here works on a single phrase and knows nothing about
//! reference times or calendars:
//!
//! - `tables.rs`: name tables (weekdays, months, ordinals, units).
//! - `normalize.rs`: lowercasing, punctuation and idiom rewrites.
//! - `tokenizer.rs`: one category per word, plus the `KindMask` summary.
//! - `time_of_day.rs`: `at 3pm` style clock times.
//! - `resolve.rs`: token stream to [`crate::RecurrenceRule`] parts.

#[path = "grammar/normalize.rs"]
pub(crate) mod normalize;
#[path = "grammar/resolve.rs"]
pub(crate) mod resolve;
#[path = "grammar/tables.rs"]
pub(crate) mod tables;
#[path = "grammar/time_of_day.rs"]
pub(crate) mod time_of_day;
#[path = "grammar/tokenizer.rs"]
pub(crate) mod tokenizer;

pub(crate) use normalize::normalize;
pub(crate) use resolve::resolve;
pub(crate) use time_of_day::TimeOfDay;
pub(crate) use tokenizer::tokenize;
