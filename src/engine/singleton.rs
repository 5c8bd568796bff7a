//! Singleton ordinal dates.
//!
//! `2nd friday in august` or `40th day of 2020` name one day by its position.
//! Rather than keep a second copy of the ordinal grammar, the phrase is read
//! as `every ...`, and the first occurrence of the resulting rule is the
//! answer.

use crate::collab::{Expander, Horizon};
use crate::grammar::{resolve, tokenize};
use crate::rule::{RecurrenceRule, first_of_year, start_of_day};
use crate::TokenKind;
use chrono::NaiveDateTime;
use tracing::{debug, trace};

pub(crate) fn resolve_singleton(text: &str, reference: NaiveDateTime, expander: &dyn Expander) -> Option<NaiveDateTime> {
    let tokens = tokenize(text);
    let ordinals = tokens.iter().filter(|t| t.kind == TokenKind::Ordinal).count();
    if ordinals != 1 {
        trace!(phrase = text, ordinals, "not a singleton candidate");
        return None;
    }
    let has_month = tokens.iter().any(|t| t.kind == TokenKind::MonthOfYear);

    let year = regex!(r"\b(\d{4})\b")
        .captures(text)
        .and_then(|caps| Some((caps[1].parse::<i32>().ok()?, caps.get(0)?.range())));
    let phrase = match &year {
        // `40th day of 2020` is a day of the year; with a month name the year
        // only picks where to start.
        Some((_, span)) => {
            let filler = if has_month { "" } else { "the year" };
            format!("{}{}{}", &text[..span.start], filler, &text[span.end..])
        }
        None => text.to_string(),
    };

    let wrapped = format!("every {}", phrase.trim());
    let mut rule = RecurrenceRule::new();
    if !resolve(&tokenize(&wrapped), &wrapped, &mut rule) || !rule.addresses_days() {
        trace!(phrase = %wrapped, "no ordinal day");
        return None;
    }
    rule.finalize();

    let start = match year {
        Some((year, _)) => first_of_year(year)?,
        None => start_of_day(reference),
    };
    let first = expander.expand(&rule, start, Horizon::first(1)).ok()?.into_iter().next();
    debug!(phrase = %wrapped, ?first, "singleton date");
    first
}
