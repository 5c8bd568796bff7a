//! The parse pipeline.
//!
//! ```text
//! text ── normalize ── segment ──┬── start / end / count / span ──┐
//!                                │                                 │
//!                                └── event ── tokenize ── resolve ─┴── rule
//!                                                                     │
//!                     except clause ── nested run ── exrule | exdate ─┘
//! ```
//!
//! A phrase that does not resolve to a rule falls back, in order, to a
//! singleton ordinal date, then to a plain date from the [`DateResolver`],
//! then to "not a date".

use super::metrics::{Resolution, RunMetrics, RunResult, StageTimings};
use super::reconcile::{horizon_end, reconcile};
use super::segment::{self, Segments};
use super::singleton::resolve_singleton;
use crate::collab::shift::shift;
use crate::collab::{DateResolver, Expander, Horizon};
use crate::grammar::tables::month_number;
use crate::grammar::{TimeOfDay, normalize, resolve, time_of_day, tokenize};
use crate::rule::{ExDate, Frequency, RecurrenceRule, start_of_day};
use crate::{Context, Options, Parsed};
use chrono::NaiveDateTime;
use std::time::Instant;
use tracing::debug;

/// One parse of one phrase. Except clauses get a nested parser of their
/// own, one level deep.
#[derive(Clone, Copy)]
pub(crate) struct EventParser<'a> {
    context: &'a Context,
    options: &'a Options,
    dates: &'a dyn DateResolver,
    expander: &'a dyn Expander,
    depth: u8,
}

impl<'a> EventParser<'a> {
    pub(crate) fn new(
        context: &'a Context,
        options: &'a Options,
        dates: &'a dyn DateResolver,
        expander: &'a dyn Expander,
    ) -> Self {
        EventParser { context, options, dates, expander, depth: 0 }
    }

    fn nested(&self) -> Self {
        EventParser { depth: self.depth + 1, ..*self }
    }

    fn reference(&self) -> NaiveDateTime {
        self.context.reference_time
    }

    pub(crate) fn run(&self, text: &str) -> RunResult {
        let started = Instant::now();
        let mut stages = StageTimings::default();
        let mut run = RunResult::default();

        let t = Instant::now();
        run.normalized = normalize(text);
        stages.normalize = t.elapsed();
        if run.normalized.is_empty() {
            run.metrics = RunMetrics { total: started.elapsed(), stages };
            return run;
        }

        let t = Instant::now();
        let segments = segment::split(&run.normalized, self.options.daytime, self.depth == 0);
        let mut rule = RecurrenceRule::new();
        self.apply_bounds(&segments, &mut rule);
        stages.segment = t.elapsed();
        debug!(
            event = %segments.event,
            starting = ?segments.starting,
            ending = ?segments.ending,
            count = ?segments.count,
            except = ?segments.except,
            "segments"
        );
        run.segments = segments.summary();
        run.dtstart = rule.dtstart;
        run.until = rule.until;

        let t = Instant::now();
        run.tokens = tokenize(&segments.event);
        let recurring = resolve(&run.tokens, &segments.event, &mut rule);
        stages.resolve = t.elapsed();

        if recurring {
            apply_times(&segments.times, &mut rule);
            rule.finalize();
            if let Some(except) = &segments.except {
                let t = Instant::now();
                self.apply_exceptions(except, &mut rule);
                stages.exceptions = t.elapsed();
            }
            if let Some(wire) = rule.to_wire() {
                run.parsed = Some(Parsed::Rule(wire));
                run.resolution = Resolution::Recurring;
                run.rule = Some(rule);
            }
        }

        if run.parsed.is_none() {
            let t = Instant::now();
            let (parsed, resolution) = self.fallback(&segments);
            run.parsed = parsed;
            run.resolution = resolution;
            stages.fallback = t.elapsed();
        }

        run.metrics = RunMetrics { total: started.elapsed(), stages };
        debug!(input = text, depth = self.depth, resolution = %run.resolution, "parsed");
        run
    }

    /// Resolve the start and end clauses and fold count and span into the
    /// rule.
    fn apply_bounds(&self, segments: &Segments, rule: &mut RecurrenceRule) {
        let reference = self.reference();
        rule.dtstart = segments.starting.as_deref().and_then(|p| self.dates.resolve(p, reference)).map(start_of_day);
        let end_reference = rule.dtstart.unwrap_or(reference);
        rule.until = segments.ending.as_deref().and_then(|p| self.dates.resolve(p, end_reference)).map(start_of_day);

        // `from nov to jun`
        if segments.range {
            if let (Some(start), Some(until)) = (rule.dtstart, rule.until) {
                if until < start {
                    rule.until = shift(until, 1, Frequency::Yearly);
                }
            }
        }

        rule.count = segments.count;
        if let Some((n, unit)) = segments.span {
            let anchor = rule.dtstart.unwrap_or_else(|| start_of_day(reference));
            if let Some(until) = shift(anchor, i64::from(n), unit) {
                rule.until = Some(until);
            }
        }
    }

    fn apply_exceptions(&self, except: &str, rule: &mut RecurrenceRule) {
        let nested = self.nested().run(except);
        if let Some(mut exrule) = nested.rule {
            exrule.dtstart = None;
            exrule.exrule = None;
            exrule.exdate.clear();
            rule.exrule = Some(Box::new(exrule));
            return;
        }

        let start = rule.dtstart.unwrap_or_else(|| start_of_day(self.reference()));
        let entries: Vec<ExDate> =
            except.split(" and ").filter_map(|item| self.exception_entry(item.trim(), start)).collect();
        if entries.is_empty() {
            debug!(clause = except, "no usable exceptions");
            return;
        }

        let mut horizon = Horizon::first(self.options.expansion_limit);
        if let Some(end) = horizon_end(&entries) {
            horizon = horizon.before(end);
        }
        let occurrences = self.expander.expand(rule, start, horizon).unwrap_or_else(|err| {
            debug!(%err, "expansion failed, exceptions dropped");
            Vec::new()
        });
        rule.exdate = reconcile(&entries, occurrences).into_iter().map(ExDate::At).collect();
    }

    fn exception_entry(&self, item: &str, anchor: NaiveDateTime) -> Option<ExDate> {
        if let Some(caps) = regex!(r"^(?:the\s+)?(?:month\s+of\s+)?([a-z]+)(?:\s+(\d{4}))?$").captures(item) {
            if let Some(month) = month_number(&caps[1]) {
                let year = caps.get(2).and_then(|y| y.as_str().parse().ok());
                return Some(ExDate::Month { month, year });
            }
        }
        let (phrase, times) = time_of_day::extract(item, self.options.daytime);
        let resolved = self.dates.resolve(&phrase, anchor)?;
        Some(match times.first() {
            Some(_) => ExDate::At(with_time(resolved, &times)),
            None => ExDate::Date(resolved.date()),
        })
    }

    fn fallback(&self, segments: &Segments) -> (Option<Parsed>, Resolution) {
        let reference = self.reference();
        let text = segments.residual.as_str();
        if let Some(date) = resolve_singleton(text, reference, self.expander) {
            return (Some(Parsed::Date(with_time(date, &segments.times))), Resolution::Singleton);
        }
        // `at 4` alone is today at that time.
        let resolved = if text.is_empty() {
            (!segments.times.is_empty()).then(|| start_of_day(reference))
        } else {
            self.dates.resolve(text, reference)
        };
        match resolved {
            Some(date) => (Some(Parsed::Date(with_time(date, &segments.times))), Resolution::Absolute),
            None => (None, Resolution::NotADate),
        }
    }
}

/// Clock times become sorted BYHOUR and BYMINUTE sets.
fn apply_times(times: &[TimeOfDay], rule: &mut RecurrenceRule) {
    if times.is_empty() {
        return;
    }
    let mut hours: Vec<u32> = times.iter().map(|t| t.hour).collect();
    let mut minutes: Vec<u32> = times.iter().map(|t| t.minute).collect();
    hours.sort_unstable();
    hours.dedup();
    minutes.sort_unstable();
    minutes.dedup();
    rule.byhour = hours;
    rule.byminute = minutes;
}

fn with_time(date: NaiveDateTime, times: &[TimeOfDay]) -> NaiveDateTime {
    times.first().and_then(|t| date.date().and_hms_opt(t.hour, t.minute, 0)).unwrap_or(date)
}
