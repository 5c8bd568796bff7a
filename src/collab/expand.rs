//! Occurrence expansion backed by the `rrule` crate.

use super::Expander;
use crate::rule::RecurrenceRule;
use chrono::{NaiveDateTime, Utc};
use tracing::trace;

#[derive(Debug, thiserror::Error)]
pub enum ExpansionError {
    #[error("rule has no frequency")]
    MissingFrequency,
    #[error("failed to parse RRULE: {0}")]
    ParseError(String),
}

/// How far an expansion may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Horizon {
    /// Maximum number of occurrences returned.
    pub limit: u16,
    /// Only occurrences strictly before this instant.
    pub before: Option<NaiveDateTime>,
}

impl Horizon {
    pub fn first(limit: u16) -> Self {
        Self { limit, before: None }
    }

    #[must_use]
    pub fn before(mut self, end: NaiveDateTime) -> Self {
        self.before = Some(end);
        self
    }
}

/// Default [`Expander`]. Times are treated as UTC wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct RRuleExpander;

impl Expander for RRuleExpander {
    fn expand(
        &self,
        rule: &RecurrenceRule,
        start: NaiveDateTime,
        horizon: Horizon,
    ) -> Result<Vec<NaiveDateTime>, ExpansionError> {
        let body = rule.expansion_body().ok_or(ExpansionError::MissingFrequency)?;
        if horizon.limit == 0 {
            return Ok(Vec::new());
        }
        let text = format!("DTSTART:{}\nRRULE:{}", start.format("%Y%m%dT%H%M%SZ"), body);
        let mut set = text
            .parse::<rrule::RRuleSet>()
            .map_err(|e| ExpansionError::ParseError(e.to_string()))?;
        if let Some(end) = horizon.before {
            let tz = rrule::Tz::Tz(chrono_tz::UTC);
            set = set.before(end.and_utc().with_timezone(&tz));
        }
        let result = set.all(horizon.limit);
        trace!(rule = %body, count = result.dates.len(), limited = result.limited, "expanded");
        Ok(result.dates.into_iter().map(|dt| dt.with_timezone(&Utc).naive_utc()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{Frequency, WeekdayNum};
    use chrono::{NaiveDate, Weekday};

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    fn weekly(days: &[Weekday]) -> RecurrenceRule {
        RecurrenceRule {
            freq: Some(Frequency::Weekly),
            byday: days.iter().copied().map(WeekdayNum::every).collect(),
            ..RecurrenceRule::default()
        }
    }

    #[test]
    fn expands_from_the_given_start() {
        let rule = weekly(&[Weekday::Mon, Weekday::Thu]);
        let dates = RRuleExpander.expand(&rule, at(2010, 1, 1, 0), Horizon::first(3)).unwrap();
        assert_eq!(dates, vec![at(2010, 1, 4, 0), at(2010, 1, 7, 0), at(2010, 1, 11, 0)]);
    }

    #[test]
    fn until_is_inclusive_for_timed_starts() {
        let mut rule = weekly(&[Weekday::Fri]);
        rule.until = Some(at(2010, 1, 15, 0));
        let dates = RRuleExpander.expand(&rule, at(2010, 1, 1, 9), Horizon::first(10)).unwrap();
        assert_eq!(dates, vec![at(2010, 1, 1, 9), at(2010, 1, 8, 9), at(2010, 1, 15, 9)]);
    }

    #[test]
    fn before_bounds_the_expansion() {
        let rule = RecurrenceRule { freq: Some(Frequency::Daily), ..RecurrenceRule::default() };
        let horizon = Horizon::first(100).before(at(2010, 1, 3, 12));
        let dates = RRuleExpander.expand(&rule, at(2010, 1, 1, 0), horizon).unwrap();
        assert_eq!(dates.len(), 3);
    }

    #[test]
    fn zero_limit_and_missing_frequency() {
        let rule = RecurrenceRule { freq: Some(Frequency::Daily), ..RecurrenceRule::default() };
        assert!(RRuleExpander.expand(&rule, at(2010, 1, 1, 0), Horizon::first(0)).unwrap().is_empty());
        let err = RRuleExpander.expand(&RecurrenceRule::default(), at(2010, 1, 1, 0), Horizon::first(5));
        assert!(matches!(err, Err(ExpansionError::MissingFrequency)));
    }
}
