use crate::rule::Frequency;
use chrono::Weekday;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

pub(crate) static WORK_WEEK: [Weekday; 5] = [Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri];
pub(crate) static WEEKEND: [Weekday; 2] = [Weekday::Sat, Weekday::Sun];

static ALL_DAYS: [Weekday; 7] =
    [Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri, Weekday::Sat, Weekday::Sun];

/// Day-name spellings, misspellings included, each with an optional plural `s`.
static DAY_NAMES: Lazy<Vec<(Regex, &'static [Weekday])>> = Lazy::new(|| {
    let table: [(&str, &'static [Weekday]); 9] = [
        (r"^mon(day)?s?$", &ALL_DAYS[0..1]),
        (r"^tues?(day)?s?$", &ALL_DAYS[1..2]),
        (r"^(wed|wed(nes|ns|n|s)?day|we(dnes|nds|ns|des)day)s?$", &ALL_DAYS[2..3]),
        (r"^(thu|thur|thurs|th(urs|ers|ur)?day)s?$", &ALL_DAYS[3..4]),
        (r"^fri(day)?s?$", &ALL_DAYS[4..5]),
        (r"^sat([ue]rday)?s?$", &ALL_DAYS[5..6]),
        (r"^sun(day)?s?$", &ALL_DAYS[6..7]),
        (r"^weekdays?$", &WORK_WEEK),
        (r"^weekends?$", &WEEKEND),
    ];
    table.into_iter().map(|(pat, days)| (Regex::new(pat).unwrap(), days)).collect()
});

static MONTH_NAMES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^jan(uary)?$",
        r"^feb(r?uary)?$",
        r"^mar(ch)?$",
        r"^apr(il)?$",
        r"^may$",
        r"^june?$",
        r"^july?$",
        r"^aug(ust)?$",
        r"^sept?(ember)?$",
        r"^oct(ober)?$",
        r"^nov(ember)?$",
        r"^dec(ember)?$",
    ]
    .into_iter()
    .map(|pat| Regex::new(pat).unwrap())
    .collect()
});

static ORDINAL_WORDS: Lazy<HashMap<&'static str, i32>> = Lazy::new(|| {
    HashMap::from([
        ("first", 1),
        ("second", 2),
        ("third", 3),
        ("fourth", 4),
        ("fifth", 5),
        ("sixth", 6),
        ("seventh", 7),
        ("eighth", 8),
        ("ninth", 9),
        ("tenth", 10),
        ("last", -1),
    ])
});

static NUMBER_WORDS: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    HashMap::from([
        ("zero", 0),
        ("one", 1),
        ("two", 2),
        ("three", 3),
        ("four", 4),
        ("five", 5),
        ("six", 6),
        ("seven", 7),
        ("eight", 8),
        ("nine", 9),
        ("ten", 10),
        ("eleven", 11),
        ("twelve", 12),
    ])
});

/// Weekdays named by a single word: `fri` gives one day, `weekends` two.
pub(crate) fn weekdays_named(word: &str) -> Option<&'static [Weekday]> {
    DAY_NAMES.iter().find(|(re, _)| re.is_match(word)).map(|(_, days)| *days)
}

/// The single weekday a word names, if it names exactly one.
pub(crate) fn weekday_named(word: &str) -> Option<Weekday> {
    match weekdays_named(word)? {
        [day] => Some(*day),
        _ => None,
    }
}

/// Month number (1-12) for a month name or abbreviation.
pub(crate) fn month_number(word: &str) -> Option<u32> {
    MONTH_NAMES.iter().position(|re| re.is_match(word)).map(|idx| idx as u32 + 1)
}

/// Value of an ordinal word: `3rd` is 3, `-2nd` is -2, `last` is -1.
pub(crate) fn ordinal_value(word: &str) -> Option<i32> {
    if let Some(value) = ORDINAL_WORDS.get(word) {
        return Some(*value);
    }
    let caps = regex!(r"^(-?)(\d{1,4})(?:st|nd|rd|th)$").captures(word)?;
    let magnitude: i32 = caps[2].parse().ok()?;
    if magnitude == 0 {
        return None;
    }
    Some(if caps[1].is_empty() { magnitude } else { -magnitude })
}

pub(crate) fn number_value(word: &str) -> Option<u32> {
    if let Some(value) = NUMBER_WORDS.get(word) {
        return Some(*value);
    }
    if word.len() <= 9 && word.bytes().all(|b| b.is_ascii_digit()) {
        return word.parse().ok();
    }
    None
}

/// Frequency named by a unit word (`days`, `min`, `year`).
pub(crate) fn unit_frequency(word: &str) -> Option<Frequency> {
    let caps = regex!(r"^(day|week|month|year|hour|minute|min|second|sec)s?$").captures(word)?;
    Some(match &caps[1] {
        "day" => Frequency::Daily,
        "week" => Frequency::Weekly,
        "month" => Frequency::Monthly,
        "year" => Frequency::Yearly,
        "hour" => Frequency::Hourly,
        "minute" | "min" => Frequency::Minutely,
        _ => Frequency::Secondly,
    })
}

/// Frequency and interval named by an adverb such as `weekly` or `biweekly`.
pub(crate) fn recurring_frequency(word: &str) -> Option<(Frequency, u32)> {
    if word == "fortnightly" {
        return Some((Frequency::Weekly, 2));
    }
    let caps = regex!(r"^(bi-?)?(weekly|monthly|yearly|annually|hourly|minutely|secondly)$").captures(word)?;
    let freq = match &caps[2] {
        "weekly" => Frequency::Weekly,
        "monthly" => Frequency::Monthly,
        "yearly" | "annually" => Frequency::Yearly,
        "hourly" => Frequency::Hourly,
        "minutely" => Frequency::Minutely,
        _ => Frequency::Secondly,
    };
    Some((freq, if caps.get(1).is_some() { 2 } else { 1 }))
}

pub(crate) fn weekday_full_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

pub(crate) fn weekday_short_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

pub(crate) fn month_short_name(month: u32) -> &'static str {
    const NAMES: [&str; 12] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];
    NAMES.get(month.wrapping_sub(1) as usize).copied().unwrap_or("")
}

/// English ordinal label: `1st`, `22nd`, `113th`, `last`, `2nd to last`.
pub(crate) fn ordinal_label(n: i32) -> String {
    if n == -1 {
        return "last".to_string();
    }
    if n < 0 {
        return format!("{} to last", ordinal_label(-n));
    }
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
