//! Rule resolution.
//!
//! Turns the token stream of an event phrase into the parts of a
//! [`RecurrenceRule`]. Resolution picks one of three paths from the
//! categories present in the phrase:
//!
//! - `daily` anywhere: a plain daily rule.
//! - plural weekdays and no ordinal (`tuesdays`, `weekends in march`): a
//!   weekly rule on those days.
//! - `every`/`each` or a recurring adverb (`monthly`): a left-to-right scan
//!   over the content tokens.
//!
//! Phrases that match none of these are not recurring.
//!
//! ## The scan
//!
//! The scan drops the first `every` and then reads content tokens in order.
//! Ordinals are grouped into runs (`first and third`) and bound by whatever
//! follows the run: a weekday gives ordinal BYDAY entries, a month name gives
//! month days, `day`/`week` look ahead for a containing month or year, and so
//! on. A run with nothing to bind to waits until the end, where it takes the
//! frequency the rest of the phrase settled on.
//!
//! The scan also tracks whether an `of`/`in`/`every` sits between two
//! content tokens; that is what separates `every 4th month` (an interval)
//! from `the 4th of every month` (a month day).

use super::tables::{
    month_number, number_value, ordinal_value, recurring_frequency, unit_frequency, weekdays_named,
};
use super::tokenizer::KindMask;
use crate::rule::{Frequency, RecurrenceRule, WeekdayNum, push_unique};
use crate::{Token, TokenKind};
use chrono::Weekday;
use tracing::trace;

/// Fill `rule` from `tokens`. Returns whether the phrase is recurring.
pub(crate) fn resolve(tokens: &[Token], text: &str, rule: &mut RecurrenceRule) -> bool {
    let mask = KindMask::scan(tokens);
    if mask.contains(KindMask::DAILY) {
        trace!(phrase = text, "daily shortcut");
        rule.freq = Some(Frequency::Daily);
        rule.interval = 1;
        return true;
    }
    if mask.contains(KindMask::PLURAL_WEEKDAY) && !mask.contains(KindMask::ORDINAL) {
        trace!(phrase = text, "plural weekday shortcut");
        plural_weekdays(tokens, text, rule);
        return true;
    }
    if !mask.intersects(KindMask::EVERY | KindMask::RECURRING_UNIT) {
        trace!(phrase = text, "no recurrence marker");
        return false;
    }
    Scan::new(tokens, text, rule).run();
    rule.is_recurring()
}

fn every_other(text: &str) -> bool {
    regex!(r"\b(?:every|each) other\b").is_match(text)
}

fn plural_weekdays(tokens: &[Token], text: &str, rule: &mut RecurrenceRule) {
    rule.freq = Some(Frequency::Weekly);
    let adverb_interval = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::RecurringUnit)
        .filter_map(|t| recurring_frequency(&t.text))
        .map(|(_, interval)| interval)
        .max()
        .unwrap_or(1);
    let leading_number = tokens
        .iter()
        .take_while(|t| !matches!(t.kind, TokenKind::PluralWeekday | TokenKind::DayOfWeek))
        .filter(|t| t.kind == TokenKind::Number)
        .find_map(|t| number_value(&t.text))
        .filter(|n| *n > 0);
    rule.interval = if every_other(text) || adverb_interval > 1 {
        2
    } else {
        leading_number.unwrap_or(1)
    };
    for token in tokens {
        match token.kind {
            TokenKind::PluralWeekday | TokenKind::DayOfWeek => {
                for day in weekdays_named(&token.text).unwrap_or_default() {
                    push_unique(&mut rule.byday, WeekdayNum::every(*day));
                }
            }
            TokenKind::MonthOfYear => {
                if let Some(month) = month_number(&token.text) {
                    push_unique(&mut rule.bymonth, month);
                }
            }
            _ => {}
        }
    }
}

/// A content token and whether a linking word (`of`, `in`, `every`)
/// separates it from the previous content token.
#[derive(Debug, Clone, Copy)]
struct Item<'t> {
    token: &'t Token,
    linked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Week,
    Month,
    Year,
    Named(u32),
}

struct Scan<'t, 'r> {
    items: Vec<Item<'t>>,
    rule: &'r mut RecurrenceRule,
    pending: Vec<i32>,
    pending_second: bool,
}

impl<'t, 'r> Scan<'t, 'r> {
    fn new(tokens: &'t [Token], text: &str, rule: &'r mut RecurrenceRule) -> Self {
        rule.interval = if every_other(text) { 2 } else { 1 };
        let mut items = Vec::new();
        let mut linked = false;
        for token in tokens {
            match token.kind {
                TokenKind::Every => linked = true,
                TokenKind::Other if token.text == "of" || token.text == "in" => linked = true,
                kind if kind.is_content() => {
                    items.push(Item { token, linked });
                    linked = false;
                }
                _ => {}
            }
        }
        Scan { items, rule, pending: Vec::new(), pending_second: false }
    }

    fn run(mut self) {
        let mut idx = 0;
        while idx < self.items.len() {
            idx = self.step(idx);
        }
        self.settle();
    }

    fn step(&mut self, idx: usize) -> usize {
        let token = self.items[idx].token;
        match token.kind {
            TokenKind::Number => {
                if let Some(n) = number_value(&token.text).filter(|n| (1..1000).contains(n)) {
                    self.rule.interval = n;
                }
                idx + 1
            }
            TokenKind::Unit => self.unit(idx),
            TokenKind::RecurringUnit => {
                if let Some((freq, interval)) = recurring_frequency(&token.text) {
                    self.rule.freq = Some(freq);
                    if interval > 1 {
                        self.rule.interval = interval;
                    }
                }
                idx + 1
            }
            TokenKind::Ordinal => self.ordinals(idx),
            TokenKind::DayOfWeek | TokenKind::PluralWeekday => {
                self.weekdays(&token.text);
                idx + 1
            }
            TokenKind::MonthOfYear => self.month(idx),
            TokenKind::Daily | TokenKind::Every | TokenKind::Through | TokenKind::SetPosition => idx + 1,
            TokenKind::AmbiguousModifier
            | TokenKind::Starting
            | TokenKind::Ending
            | TokenKind::Repeat
            | TokenKind::Separator
            | TokenKind::Time
            | TokenKind::Other
            | TokenKind::AmPm
            | TokenKind::Untyped => idx + 1,
        }
    }

    fn weekdays(&mut self, word: &str) {
        let Some(days) = weekdays_named(word) else {
            return;
        };
        self.rule.freq.get_or_insert(Frequency::Weekly);
        for day in days {
            push_unique(&mut self.rule.byday, WeekdayNum::every(*day));
        }
    }

    /// `day N` and `week N` address a numbered day or week; any other unit
    /// sets the frequency.
    fn unit(&mut self, idx: usize) -> usize {
        let Some(freq) = unit_frequency(&self.items[idx].token.text) else {
            return idx + 1;
        };
        let number = self
            .items
            .get(idx + 1)
            .filter(|it| it.token.kind == TokenKind::Number)
            .and_then(|it| number_value(&it.token.text))
            .filter(|n| *n > 0);
        match (freq, number) {
            (Frequency::Daily, Some(n)) if n <= 366 => {
                self.bind_days(&[n as i32], idx + 2);
                idx + 2
            }
            (Frequency::Weekly, Some(n)) if n <= 53 => {
                push_unique(&mut self.rule.byweekno, n as i32);
                self.rule.freq = Some(Frequency::Yearly);
                idx + 2
            }
            _ => {
                self.rule.freq = Some(freq);
                idx + 1
            }
        }
    }

    /// A month name, optionally followed by the day of that month.
    fn month(&mut self, idx: usize) -> usize {
        let Some(month) = month_number(&self.items[idx].token.text) else {
            return idx + 1;
        };
        push_unique(&mut self.rule.bymonth, month);
        self.rule.freq.get_or_insert(Frequency::Yearly);
        let Some(next) = self.items.get(idx + 1) else {
            return idx + 1;
        };
        let day = match next.token.kind {
            TokenKind::Ordinal => {
                let names_weekday = self
                    .items
                    .get(idx + 2)
                    .is_some_and(|it| matches!(it.token.kind, TokenKind::DayOfWeek | TokenKind::PluralWeekday));
                if names_weekday { None } else { ordinal_value(&next.token.text) }
            }
            TokenKind::Number => number_value(&next.token.text).and_then(|n| i32::try_from(n).ok()),
            _ => None,
        };
        match day.filter(|d| (1..=31).contains(d)) {
            Some(day) => {
                push_unique(&mut self.rule.bymonthday, day);
                idx + 2
            }
            None => idx + 1,
        }
    }

    fn ordinals(&mut self, idx: usize) -> usize {
        let mut ords = Vec::new();
        let mut second_word = false;
        let mut next = idx;
        while let Some(item) = self.items.get(next).filter(|it| it.token.kind == TokenKind::Ordinal) {
            if let Some(n) = ordinal_value(&item.token.text) {
                ords.push(n);
            }
            second_word |= item.token.text == "second";
            next += 1;
        }
        let Some(follower) = self.items.get(next).copied() else {
            self.defer(ords, second_word);
            return next;
        };
        match follower.token.kind {
            TokenKind::DayOfWeek | TokenKind::PluralWeekday => {
                self.ordinal_weekdays(&ords, &follower.token.text);
                next + 1
            }
            TokenKind::Unit => {
                self.ordinal_unit(&ords, next);
                next + 1
            }
            TokenKind::MonthOfYear => {
                if let Some(month) = month_number(&follower.token.text) {
                    push_unique(&mut self.rule.bymonth, month);
                    extend_within(&mut self.rule.bymonthday, &ords, MONTH_DAYS);
                    if !matches!(self.rule.freq, Some(Frequency::Monthly | Frequency::Yearly)) {
                        self.rule.freq = Some(Frequency::Yearly);
                    }
                }
                next + 1
            }
            TokenKind::SetPosition => {
                extend_within(&mut self.rule.bysetpos, &ords, YEAR_DAYS);
                next + 1
            }
            _ => {
                self.defer(ords, second_word);
                next
            }
        }
    }

    fn ordinal_weekdays(&mut self, ords: &[i32], word: &str) {
        let Some(days) = weekdays_named(word) else {
            return;
        };
        if let [day] = days {
            for n in ords {
                push_unique(&mut self.rule.byday, WeekdayNum::nth(*n, *day));
            }
            return;
        }
        // `last weekday`: a position within the set of days.
        for day in days {
            push_unique(&mut self.rule.byday, WeekdayNum::every(*day));
        }
        extend_within(&mut self.rule.bysetpos, ords, YEAR_DAYS);
    }

    fn ordinal_unit(&mut self, ords: &[i32], unit_idx: usize) {
        let item = self.items[unit_idx];
        let Some(unit) = unit_frequency(&item.token.text) else {
            return;
        };
        let single = match ords {
            [n] if *n > 0 => Some(*n as u32),
            _ => None,
        };
        let container = self.container(unit_idx + 1);
        let free = !item.linked && container.is_none() && self.rule.freq.is_none();
        match unit {
            Frequency::Daily => match single.filter(|_| free) {
                Some(n) => {
                    self.rule.freq = Some(Frequency::Daily);
                    self.rule.interval = n;
                }
                None => self.bind_days(ords, unit_idx + 1),
            },
            Frequency::Weekly => {
                if container == Some(Container::Year) || self.rule.freq == Some(Frequency::Yearly) {
                    extend_within(&mut self.rule.byweekno, ords, WEEKS);
                    self.rule.freq = Some(Frequency::Yearly);
                } else {
                    self.rule.freq = Some(Frequency::Weekly);
                    if let Some(n) = single {
                        self.rule.interval = n;
                    }
                }
            }
            Frequency::Monthly | Frequency::Yearly => {
                self.rule.freq = Some(unit);
                match single.filter(|_| !item.linked) {
                    Some(n) => self.rule.interval = n,
                    None => self.bind(ords),
                }
            }
            Frequency::Hourly | Frequency::Minutely | Frequency::Secondly => {
                self.rule.freq = Some(unit);
                if let Some(n) = single {
                    self.rule.interval = n;
                }
            }
        }
    }

    /// Bind day numbers to the period that contains them: the next month or
    /// year word in the phrase, else the frequency seen so far.
    fn bind_days(&mut self, days: &[i32], from: usize) {
        match self.container(from) {
            Some(Container::Year) => {
                self.rule.freq = Some(Frequency::Yearly);
                extend_within(&mut self.rule.byyearday, days, YEAR_DAYS);
            }
            Some(Container::Month) => {
                if self.rule.freq != Some(Frequency::Yearly) {
                    self.rule.freq = Some(Frequency::Monthly);
                }
                extend_within(&mut self.rule.bymonthday, days, MONTH_DAYS);
            }
            Some(Container::Named(month)) => {
                self.rule.freq = Some(Frequency::Yearly);
                push_unique(&mut self.rule.bymonth, month);
                extend_within(&mut self.rule.bymonthday, days, MONTH_DAYS);
            }
            Some(Container::Week) => {
                self.rule.freq = Some(Frequency::Weekly);
                self.bind(days);
            }
            None => match self.rule.freq {
                Some(Frequency::Yearly | Frequency::Weekly) => self.bind(days),
                _ => {
                    self.rule.freq = Some(Frequency::Monthly);
                    extend_within(&mut self.rule.bymonthday, days, MONTH_DAYS);
                }
            },
        }
    }

    fn container(&self, from: usize) -> Option<Container> {
        for item in self.items.iter().skip(from) {
            match item.token.kind {
                TokenKind::Unit => match unit_frequency(&item.token.text) {
                    Some(Frequency::Weekly) => return Some(Container::Week),
                    Some(Frequency::Monthly) => return Some(Container::Month),
                    Some(Frequency::Yearly) => return Some(Container::Year),
                    _ => {}
                },
                TokenKind::MonthOfYear => return month_number(&item.token.text).map(Container::Named),
                TokenKind::Ordinal => return None,
                _ => {}
            }
        }
        None
    }

    /// Bind ordinals by the current frequency, or hold them until the end.
    fn bind(&mut self, ords: &[i32]) {
        match self.rule.freq {
            Some(Frequency::Monthly) => extend_within(&mut self.rule.bymonthday, ords, MONTH_DAYS),
            Some(Frequency::Yearly) => extend_within(&mut self.rule.byyearday, ords, YEAR_DAYS),
            Some(Frequency::Weekly) => {
                for day in ords.iter().filter_map(|n| weekday_by_index(*n)) {
                    push_unique(&mut self.rule.byday, WeekdayNum::every(day));
                }
            }
            _ => self.pending.extend_from_slice(ords),
        }
    }

    fn defer(&mut self, ords: Vec<i32>, second_word: bool) {
        self.pending_second |= second_word && ords == [2];
        self.pending.extend(ords);
    }

    fn settle(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        if !pending.is_empty() {
            match self.rule.freq {
                None if self.pending_second && pending == [2] => {
                    trace!("lone `second` read as a unit");
                    self.rule.freq = Some(Frequency::Secondly);
                }
                None => {
                    self.rule.freq = Some(Frequency::Monthly);
                    extend_within(&mut self.rule.bymonthday, &pending, MONTH_DAYS);
                }
                Some(Frequency::Monthly | Frequency::Yearly | Frequency::Weekly) => self.bind(&pending),
                Some(_) => extend_within(&mut self.rule.bymonthday, &pending, MONTH_DAYS),
            }
        }
        let ordinal_days = self.rule.has_ordinal_weekdays();
        if ordinal_days && !matches!(self.rule.freq, Some(Frequency::Monthly | Frequency::Yearly)) {
            self.rule.freq = Some(Frequency::Monthly);
        }
        if self.rule.freq.is_none() && !self.rule.bysetpos.is_empty() {
            self.rule.freq = Some(Frequency::Monthly);
        }
    }
}

const MONTH_DAYS: i32 = 31;
const YEAR_DAYS: i32 = 366;
const WEEKS: i32 = 53;

/// Add the values that lie in `-limit..=limit`, skipping zero. Anything
/// outside stays unbound.
fn extend_within(set: &mut Vec<i32>, values: &[i32], limit: i32) {
    for v in values.iter().filter(|v| **v != 0 && v.abs() <= limit) {
        push_unique(set, *v);
    }
}

/// Day of the week by position, Monday first.
fn weekday_by_index(n: i32) -> Option<Weekday> {
    match n {
        1..=7 => Some((1..n).fold(Weekday::Mon, |day, _| day.succ())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::normalize::normalize;
    use crate::grammar::tokenizer::tokenize;

    fn wire(text: &str) -> Option<String> {
        let normalized = normalize(text);
        let mut rule = RecurrenceRule::new();
        if !resolve(&tokenize(&normalized), &normalized, &mut rule) {
            return None;
        }
        rule.finalize();
        rule.to_wire().map(|w| w.trim_start_matches("RRULE:").to_string())
    }

    #[test]
    fn simple_frequencies() {
        let expected = vec![
            ("FREQ=DAILY;INTERVAL=1", "daily"),
            ("FREQ=DAILY;INTERVAL=1", "every day"),
            ("FREQ=DAILY;INTERVAL=2", "every other day"),
            ("FREQ=DAILY;INTERVAL=2", "every 2nd day"),
            ("FREQ=MONTHLY;INTERVAL=2", "every 2nd month"),
            ("FREQ=WEEKLY;INTERVAL=2", "biweekly"),
            ("FREQ=MINUTELY;INTERVAL=5", "every 5 minutes"),
            ("FREQ=SECONDLY;INTERVAL=30", "every 30 seconds"),
            ("FREQ=HOURLY;INTERVAL=2", "every other hour"),
            ("FREQ=SECONDLY;INTERVAL=1", "every second"),
            ("FREQ=MONTHLY;INTERVAL=1", "once a month"),
        ];
        for (out, input) in expected {
            assert_eq!(wire(input).as_deref(), Some(out), "{input}");
        }
    }

    #[test]
    fn weekly_days() {
        let expected = vec![
            ("FREQ=WEEKLY;INTERVAL=1;BYDAY=TU", "tuesdays"),
            ("FREQ=WEEKLY;INTERVAL=1;BYDAY=SA,SU", "weekends"),
            ("FREQ=WEEKLY;INTERVAL=1;BYDAY=MO,TU,WE,TH,FR", "every weekday"),
            ("FREQ=WEEKLY;INTERVAL=1;BYDAY=SU,SA", "every sunday and saturday"),
            ("FREQ=WEEKLY;INTERVAL=1;BYDAY=WE", "every wednsday"),
            ("FREQ=WEEKLY;INTERVAL=2;BYDAY=FR", "every other friday"),
            ("FREQ=WEEKLY;INTERVAL=3;BYDAY=MO", "every 3 weeks on mon"),
            ("FREQ=WEEKLY;INTERVAL=2;BYDAY=FR", "biweekly on fridays"),
            ("FREQ=WEEKLY;INTERVAL=3;BYDAY=MO,TU,WE,TH,FR", "every 3 weeks on weekdays"),
            ("FREQ=WEEKLY;INTERVAL=1;BYDAY=MO;BYMONTH=3", "mondays in march"),
            ("FREQ=WEEKLY;INTERVAL=1;BYDAY=MO,TU,WE", "every mon-wed"),
        ];
        for (out, input) in expected {
            assert_eq!(wire(input).as_deref(), Some(out), "{input}");
        }
    }

    #[test]
    fn ordinal_positions() {
        let expected = vec![
            ("FREQ=MONTHLY;INTERVAL=1;BYMONTHDAY=4", "every 4th of the month"),
            ("FREQ=MONTHLY;INTERVAL=1;BYMONTHDAY=4,10", "every 4th and 10th of the month"),
            ("FREQ=MONTHLY;INTERVAL=1;BYMONTHDAY=15", "every 15th"),
            ("FREQ=MONTHLY;INTERVAL=1;BYMONTHDAY=1,15", "monthly on the 1st and 15th"),
            ("FREQ=MONTHLY;INTERVAL=1;BYDAY=1FR,3FR", "first and third friday of each month"),
            ("FREQ=MONTHLY;INTERVAL=1;BYDAY=-1FR", "every last friday of the month"),
            ("FREQ=MONTHLY;INTERVAL=1;BYDAY=-2FR", "every second to last friday"),
            ("FREQ=MONTHLY;INTERVAL=1;BYMONTHDAY=-1", "the last day of every month"),
            ("FREQ=MONTHLY;INTERVAL=1;BYMONTHDAY=1", "the beginning of every month"),
            ("FREQ=MONTHLY;INTERVAL=1;BYDAY=MO,TU,WE,TH,FR;BYSETPOS=-1", "the last weekday of every month"),
            ("FREQ=YEARLY;INTERVAL=1;BYDAY=4TH;BYMONTH=11", "yearly on the fourth thursday in november"),
            ("FREQ=YEARLY;INTERVAL=1;BYMONTHDAY=17;BYMONTH=3", "every march 17th"),
            ("FREQ=YEARLY;INTERVAL=1;BYYEARDAY=100", "every 100th day of the year"),
            ("FREQ=YEARLY;INTERVAL=1;BYYEARDAY=100", "every day 100 of the year"),
            ("FREQ=YEARLY;INTERVAL=1;BYWEEKNO=2", "every week 2"),
            ("FREQ=YEARLY;INTERVAL=1;BYWEEKNO=2", "every year in the 2nd week"),
            ("FREQ=YEARLY;INTERVAL=1;BYMONTHDAY=15", "every year on the 15th day of the month"),
            ("FREQ=MONTHLY;INTERVAL=1;BYDAY=MO,FR;BYSETPOS=1,-1", "the 1st and last instance of every month on mon and fri"),
        ];
        for (out, input) in expected {
            assert_eq!(wire(input).as_deref(), Some(out), "{input}");
        }
    }

    #[test]
    fn out_of_range_ordinals_stay_unbound() {
        let expected = vec![
            ("FREQ=MONTHLY;INTERVAL=1", "every 40th of the month"),
            ("FREQ=MONTHLY;INTERVAL=1", "every 9999th day of the month"),
            ("FREQ=MONTHLY;INTERVAL=1;BYMONTHDAY=4", "every 4th and 40th of the month"),
            ("FREQ=YEARLY;INTERVAL=1", "every 400th day of the year"),
            ("FREQ=YEARLY;INTERVAL=1", "every year in the 60th week"),
        ];
        for (out, input) in expected {
            assert_eq!(wire(input).as_deref(), Some(out), "{input}");
        }
    }

    #[test]
    fn phrases_without_recurrence() {
        for input in ["march 3rd", "tomorrow", "not a date at all", "remember to call mitchell", "cancel"] {
            assert_eq!(wire(input), None, "{input}");
        }
    }
}
