//! Parsing engine.
//!
//! The grammar in `crate::grammar` reads a single event phrase. This module
//! wraps it into the full pipeline a caller sees: it peels the structural
//! clauses off the input, resolves their dates, and falls back to one-off
//! interpretations when the phrase does not recur.
//!
//! ## How the parts work together
//!
//! ```text
//! input ── normalize ── segment::split          (segment.rs)
//!                          │  except / count / span / times / start / end
//!                          v
//!                  EventParser::run              (parser.rs)
//!                    - resolve start and end dates
//!                    - tokenize + resolve the event phrase
//!                    - except clause: nested run, then reconcile::reconcile
//!                          │                     (reconcile.rs)
//!                          v
//!              recurring? ── yes ──> RRULE text
//!                  │ no
//!                  v
//!     singleton::resolve_singleton               (singleton.rs)
//!                  │ none
//!                  v
//!        DateResolver::resolve ──> date, or not a date
//! ```
//!
//! ## Responsibilities by module
//!
//! - `segment.rs`: whole-phrase clause extraction, no date resolution.
//! - `parser.rs`: orchestration, bounds, exceptions, fallbacks.
//! - `reconcile.rs`: pins loose exception dates to concrete occurrences.
//! - `singleton.rs`: one ordinal occurrence (`2nd friday in august`).
//! - `metrics.rs`: per-stage timings and the run summary behind the verbose
//!   API.
//!
//! ## Debugging
//!
//! Stage boundaries log at `debug`, per-token decisions at `trace`. Set
//! `RUST_LOG=recurrent=trace` when running the CLI.

#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/parser.rs"]
mod parser;
#[path = "engine/reconcile.rs"]
mod reconcile;
#[path = "engine/segment.rs"]
mod segment;
#[path = "engine/singleton.rs"]
mod singleton;

pub use metrics::{Resolution, SegmentSummary, StageTimings};
pub(crate) use parser::EventParser;
