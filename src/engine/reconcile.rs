//! Exception reconciliation.
//!
//! Except clauses name dates loosely: `march 4` has no time, `june` has no
//! year. Walking the rule's occurrences once, in order, pins each entry to
//! the concrete occurrences it removes.

use crate::rule::ExDate;
use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

/// Occurrences excluded by `entries`, ascending and without duplicates.
///
/// A date entry removes every occurrence on that day. A month entry removes
/// every occurrence in that month; without a year it binds to the first year
/// in which an occurrence falls in that month. Entries that never meet an
/// occurrence are dropped.
///
/// Entries become half-open spans sorted by start. One cursor walks them
/// alongside the occurrences; a span opens when the occurrence stream
/// reaches it and closes once the stream passes its end.
pub(crate) fn reconcile(entries: &[ExDate], occurrences: impl IntoIterator<Item = NaiveDateTime>) -> Vec<NaiveDateTime> {
    let mut spans: Vec<(NaiveDateTime, NaiveDateTime)> = entries.iter().filter_map(span).collect();
    spans.sort();
    let mut floating: Vec<u32> = entries
        .iter()
        .filter_map(|entry| match *entry {
            ExDate::Month { month, year: None } => Some(month),
            _ => None,
        })
        .collect();
    floating.sort_unstable();
    floating.dedup();

    let mut cursor = 0usize;
    let mut open: Vec<(NaiveDateTime, NaiveDateTime)> = Vec::new();
    let mut excluded = Vec::new();
    let mut seen = 0usize;
    for occurrence in occurrences {
        if cursor == spans.len() && open.is_empty() && floating.is_empty() {
            break;
        }
        seen += 1;
        while let Some(next) = spans.get(cursor).filter(|(start, _)| *start <= occurrence) {
            open.push(*next);
            cursor += 1;
        }
        if let Some(pos) = floating.iter().position(|m| *m == occurrence.month()) {
            floating.swap_remove(pos);
            if let Some(bound) = span(&ExDate::Month { month: occurrence.month(), year: Some(occurrence.year()) }) {
                open.push(bound);
            }
        }
        open.retain(|(_, end)| *end > occurrence);
        if !open.is_empty() {
            excluded.push(occurrence);
        }
    }
    excluded.dedup();
    debug!(entries = entries.len(), occurrences = seen, excluded = excluded.len(), "reconciled exceptions");
    excluded
}

/// The instants an entry covers, `[start, end)`, or `None` while a month
/// still lacks a year.
fn span(entry: &ExDate) -> Option<(NaiveDateTime, NaiveDateTime)> {
    match *entry {
        ExDate::At(at) => Some((at, at.checked_add_signed(chrono::TimeDelta::seconds(1))?)),
        ExDate::Date(date) => {
            Some((date.and_time(NaiveTime::MIN), date.checked_add_days(Days::new(1))?.and_time(NaiveTime::MIN)))
        }
        ExDate::Month { month, year } => {
            let first = NaiveDate::from_ymd_opt(year?, month, 1)?;
            Some((first.and_time(NaiveTime::MIN), first.checked_add_months(Months::new(1))?.and_time(NaiveTime::MIN)))
        }
    }
}

/// First instant after every entry, or `None` while a month still lacks a
/// year.
pub(crate) fn horizon_end(entries: &[ExDate]) -> Option<NaiveDateTime> {
    entries
        .iter()
        .map(|entry| span(entry).map(|(_, end)| end))
        .try_fold(None, |latest: Option<NaiveDateTime>, end| end.map(|end| Some(latest.map_or(end, |l| l.max(end)))))
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Thursdays at 9am from Jan 7 2010.
    fn thursdays(n: u64) -> Vec<NaiveDateTime> {
        (0..n).map(|i| at(2010, 1, 7, 9) + Days::new(7 * i)).collect()
    }

    #[test]
    fn bare_dates_take_the_occurrence_time() {
        let entries = vec![ExDate::Date(date(2010, 1, 21)), ExDate::Date(date(2010, 1, 14))];
        assert_eq!(reconcile(&entries, thursdays(10)), vec![at(2010, 1, 14, 9), at(2010, 1, 21, 9)]);
    }

    #[test]
    fn exact_stamps_must_match() {
        let entries = vec![ExDate::At(at(2010, 1, 14, 9)), ExDate::At(at(2010, 1, 21, 10))];
        assert_eq!(reconcile(&entries, thursdays(10)), vec![at(2010, 1, 14, 9)]);
    }

    #[test]
    fn months_bind_to_the_first_matching_year() {
        let entries = vec![ExDate::Month { month: 2, year: None }];
        let excluded = reconcile(&entries, thursdays(60));
        assert_eq!(excluded.len(), 4);
        assert!(excluded.iter().all(|dt| dt.year() == 2010 && dt.month() == 2));
    }

    #[test]
    fn misses_are_dropped() {
        let entries = vec![ExDate::Date(date(2010, 1, 15)), ExDate::Month { month: 3, year: Some(2009) }];
        assert!(reconcile(&entries, thursdays(10)).is_empty());
    }

    #[test]
    fn overlapping_entries_exclude_once() {
        let entries = vec![
            ExDate::Date(date(2010, 2, 11)),
            ExDate::Month { month: 2, year: Some(2010) },
            ExDate::At(at(2010, 2, 11, 9)),
            ExDate::Date(date(2010, 3, 4)),
        ];
        let expected = vec![at(2010, 2, 4, 9), at(2010, 2, 11, 9), at(2010, 2, 18, 9), at(2010, 2, 25, 9), at(2010, 3, 4, 9)];
        assert_eq!(reconcile(&entries, thursdays(20)), expected);
    }

    #[test]
    fn horizon_covers_every_entry() {
        let entries = vec![ExDate::Date(date(2010, 3, 4)), ExDate::Month { month: 2, year: Some(2010) }];
        assert_eq!(horizon_end(&entries), Some(at(2010, 3, 5, 0)));
        let open = vec![ExDate::Date(date(2010, 3, 4)), ExDate::Month { month: 2, year: None }];
        assert_eq!(horizon_end(&open), None);
        assert_eq!(horizon_end(&[]), None);
    }
}
