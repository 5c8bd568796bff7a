//! Word classification.
//!
//! Each whitespace-separated word of a normalized phrase becomes exactly one
//! [`Token`]. Categories are tried in a fixed priority order and the first
//! pattern that matches the whole word wins, so `second` is an ordinal while
//! `seconds` is a unit. Words nothing claims stay in the stream as
//! [`TokenKind::Untyped`].
//!
//! [`KindMask`] summarizes which categories a phrase contains; the resolver
//! uses it to pick a path before scanning token by token.

use crate::{Token, TokenKind};
use once_cell::sync::Lazy;
use regex::Regex;

bitflags::bitflags! {
    /// Set of token categories present in a phrase.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KindMask: u32 {
        const DAILY          = 1 << 0;
        const EVERY          = 1 << 1;
        const THROUGH        = 1 << 2;
        const RECURRING_UNIT = 1 << 3;
        const ORDINAL        = 1 << 4;
        const UNIT           = 1 << 5;
        const NUMBER         = 1 << 6;
        const PLURAL_WEEKDAY = 1 << 7;
        const DAY_OF_WEEK    = 1 << 8;
        const MONTH_OF_YEAR  = 1 << 9;
        const SET_POSITION   = 1 << 10;
        const MODIFIER       = 1 << 11;
        const STARTING       = 1 << 12;
        const ENDING         = 1 << 13;
        const REPEAT         = 1 << 14;
        const SEPARATOR      = 1 << 15;
        const TIME           = 1 << 16;
        const OTHER          = 1 << 17;
        const AM_PM          = 1 << 18;
        const UNTYPED        = 1 << 19;
    }
}

impl KindMask {
    pub(crate) fn of(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Daily => KindMask::DAILY,
            TokenKind::Every => KindMask::EVERY,
            TokenKind::Through => KindMask::THROUGH,
            TokenKind::RecurringUnit => KindMask::RECURRING_UNIT,
            TokenKind::Ordinal => KindMask::ORDINAL,
            TokenKind::Unit => KindMask::UNIT,
            TokenKind::Number => KindMask::NUMBER,
            TokenKind::PluralWeekday => KindMask::PLURAL_WEEKDAY,
            TokenKind::DayOfWeek => KindMask::DAY_OF_WEEK,
            TokenKind::MonthOfYear => KindMask::MONTH_OF_YEAR,
            TokenKind::SetPosition => KindMask::SET_POSITION,
            TokenKind::AmbiguousModifier => KindMask::MODIFIER,
            TokenKind::Starting => KindMask::STARTING,
            TokenKind::Ending => KindMask::ENDING,
            TokenKind::Repeat => KindMask::REPEAT,
            TokenKind::Separator => KindMask::SEPARATOR,
            TokenKind::Time => KindMask::TIME,
            TokenKind::Other => KindMask::OTHER,
            TokenKind::AmPm => KindMask::AM_PM,
            TokenKind::Untyped => KindMask::UNTYPED,
        }
    }

    /// Categories present in `tokens`.
    pub(crate) fn scan(tokens: &[Token]) -> Self {
        tokens.iter().fold(KindMask::empty(), |mask, t| mask | KindMask::of(t.kind))
    }
}

static PATTERNS: Lazy<Vec<(TokenKind, Regex)>> = Lazy::new(|| {
    let table = [
        (TokenKind::Daily, r"^(?:daily|everyday)$"),
        (TokenKind::Every, r"^(?:every|each|once)$"),
        (TokenKind::Through, r"^(?:through|thru)$"),
        (
            TokenKind::RecurringUnit,
            r"^(?:(?:bi-?)?(?:weekly|monthly|yearly|annually|hourly|minutely|secondly)|fortnightly)$",
        ),
        (
            TokenKind::Ordinal,
            r"^(?:-?\d{1,4}(?:st|nd|rd|th)|first|second|third|fourth|fifth|sixth|seventh|eighth|ninth|tenth|last)$",
        ),
        (TokenKind::Unit, r"^(?:day|week|month|year|hour|minute|min|second|sec)s?$"),
        (TokenKind::Number, r"^(?:\d+|zero|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve)$"),
        (
            TokenKind::PluralWeekday,
            r"^(?:mon|tues?|wed(?:nes|ns|n|s)?|we(?:dnes|nds|ns|des)|thu?r?s?|th(?:urs|ers|ur)|fri|sat(?:[ue]r)?|sun|week)days$|^weekends$",
        ),
        (
            TokenKind::DayOfWeek,
            r"^(?:mon(?:day)?|tues?(?:day)?|wed|wed(?:nes|ns|n|s)?day|we(?:dnes|nds|ns|des)day|thu|thur|thurs|th(?:urs|ers|ur)?day|fri(?:day)?|sat(?:[ue]rday)?|sun(?:day)?|weekday|weekend)$",
        ),
        (
            TokenKind::MonthOfYear,
            r"^(?:jan(?:uary)?|feb(?:r?uary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sept?(?:ember)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)$",
        ),
        (TokenKind::SetPosition, r"^(?:instances?|occurrences?)$"),
        (TokenKind::AmbiguousModifier, r"^(?:other|next|this|following|coming)$"),
        (TokenKind::Starting, r"^(?:start(?:s|ing)?|beginning|from|after)$"),
        (TokenKind::Ending, r"^(?:end(?:s|ing)?|until|till|til|to|before)$"),
        (TokenKind::Repeat, r"^(?:repeat(?:s|ing|ed)?|recurr?(?:s|ing)?)$"),
        (TokenKind::Separator, r"^(?:and|or|plus|&)$"),
        (TokenKind::Time, r"^(?:\d{1,2}:\d{2}(?:am|pm)?|\d{1,2}(?:am|pm)|noon|midnight)$"),
        (TokenKind::Other, r"^(?:on|of|in|the|at|a|an|per|for)$"),
        (TokenKind::AmPm, r"^(?:am|pm)$"),
    ];
    table.into_iter().map(|(kind, pat)| (kind, Regex::new(pat).unwrap())).collect()
});

pub(crate) fn classify(word: &str) -> TokenKind {
    PATTERNS.iter().find(|(_, re)| re.is_match(word)).map(|(kind, _)| *kind).unwrap_or(TokenKind::Untyped)
}

pub(crate) fn tokenize(text: &str) -> Vec<Token> {
    text.split_whitespace().map(|word| Token::new(word, classify(word))).collect()
}
