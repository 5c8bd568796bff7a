use crate::api::DaytimeWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct TimeOfDay {
    pub hour: u32,
    pub minute: u32,
}

/// Pull clock times out of a phrase.
///
/// Recognizes `at 3`, `at 3:30pm`, `at noon`, `at 9am and 5pm`, and bare
/// times that carry a meridiem (`9am`). Returns the phrase with those spans
/// removed plus the times in mention order.
pub(crate) fn extract(text: &str, window: DaytimeWindow) -> (String, Vec<TimeOfDay>) {
    let mut times = Vec::new();
    let after_at = regex!(
        r"\bat\s+((?:\d{1,2}(?::\d{2})?\s?(?:am|pm)?|noon|midnight)(?:\s+and\s+(?:\d{1,2}(?::\d{2})?\s?(?:am|pm)?|noon|midnight))*)\b"
    )
    .replace_all(text, |caps: &regex::Captures| {
        let found = items(&caps[1], window);
        if found.is_empty() {
            return caps[0].to_string();
        }
        times.extend(found);
        String::new()
    });
    let bare = regex!(r"\b\d{1,2}(?::\d{2})?\s?(?:am|pm)\b").replace_all(&after_at, |caps: &regex::Captures| {
        let found = items(&caps[0], window);
        if found.is_empty() {
            return caps[0].to_string();
        }
        times.extend(found);
        String::new()
    });
    let rest = regex!(r"\s+").replace_all(bare.trim(), " ").into_owned();
    (rest, times)
}

fn items(list: &str, window: DaytimeWindow) -> Vec<TimeOfDay> {
    regex!(r"(?:(\d{1,2})(?::(\d{2}))?\s?(am|pm)?|(noon)|(midnight))")
        .captures_iter(list)
        .filter_map(|caps| {
            if caps.get(4).is_some() {
                return Some(TimeOfDay { hour: 12, minute: 0 });
            }
            if caps.get(5).is_some() {
                return Some(TimeOfDay { hour: 0, minute: 0 });
            }
            let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
            let minute: u32 = match caps.get(2) {
                Some(m) => m.as_str().parse().ok()?,
                None => 0,
            };
            to_24_hour(hour, minute, caps.get(3).map(|m| m.as_str()), window)
        })
        .collect()
}

/// Resolve a clock reading to a 24-hour time.
///
/// Without a meridiem, an hour before the start of the daytime window is
/// taken as pm (`at 4` is 16:00). Zero stays midnight.
pub(crate) fn to_24_hour(hour: u32, minute: u32, meridiem: Option<&str>, window: DaytimeWindow) -> Option<TimeOfDay> {
    if minute > 59 {
        return None;
    }
    let hour = match meridiem {
        Some(m) => {
            if !(1..=12).contains(&hour) {
                return None;
            }
            match (m, hour) {
                ("am", 12) => 0,
                ("am", h) => h,
                (_, 12) => 12,
                (_, h) => h + 12,
            }
        }
        None if hour > 23 => return None,
        None if hour > 0 && hour < window.start => hour + 12,
        None => hour,
    };
    Some(TimeOfDay { hour, minute })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u32, minute: u32) -> TimeOfDay {
        TimeOfDay { hour, minute }
    }

    #[test]
    fn pulls_times_after_at() {
        let window = DaytimeWindow::default();
        assert_eq!(extract("daily at 3pm", window), ("daily".to_string(), vec![at(15, 0)]));
        assert_eq!(extract("daily at 3:00pm", window), ("daily".to_string(), vec![at(15, 0)]));
        assert_eq!(extract("march 3rd at 12:15am", window), ("march 3rd".to_string(), vec![at(0, 15)]));
        assert_eq!(extract("tomorrow at 3:30", window), ("tomorrow".to_string(), vec![at(15, 30)]));
        assert_eq!(extract("sunday at 2", window), ("sunday".to_string(), vec![at(14, 0)]));
        assert_eq!(extract("at 4", window), ("".to_string(), vec![at(16, 0)]));
    }

    #[test]
    fn lists_noon_and_bare_meridiem_times() {
        let window = DaytimeWindow::default();
        assert_eq!(
            extract("weekdays at 9am and 5pm", window),
            ("weekdays".to_string(), vec![at(9, 0), at(17, 0)])
        );
        assert_eq!(extract("every day at noon", window), ("every day".to_string(), vec![at(12, 0)]));
        assert_eq!(extract("every monday 8:30 am", window), ("every monday".to_string(), vec![at(8, 30)]));
    }

    #[test]
    fn leaves_ordinals_and_plain_numbers_alone() {
        let window = DaytimeWindow::default();
        assert_eq!(extract("meet at the 4th", window), ("meet at the 4th".to_string(), vec![]));
        assert_eq!(extract("every 3 weeks", window), ("every 3 weeks".to_string(), vec![]));
    }

    #[test]
    fn ambiguous_hours_follow_the_daytime_window() {
        let window = DaytimeWindow { start: 8, end: 19 };
        assert_eq!(to_24_hour(7, 0, None, window), Some(at(19, 0)));
        assert_eq!(to_24_hour(8, 0, None, window), Some(at(8, 0)));
        assert_eq!(to_24_hour(0, 0, None, window), Some(at(0, 0)));
        assert_eq!(to_24_hour(12, 0, Some("am"), window), Some(at(0, 0)));
        assert_eq!(to_24_hour(12, 0, Some("pm"), window), Some(at(12, 0)));
        assert_eq!(to_24_hour(13, 0, Some("pm"), window), None);
        assert_eq!(to_24_hour(25, 0, None, window), None);

        let narrow = DaytimeWindow { start: 10, end: 14 };
        assert_eq!(to_24_hour(3, 0, None, narrow), Some(at(15, 0)));
        assert_eq!(to_24_hour(9, 30, None, narrow), Some(at(21, 30)));
        assert_eq!(to_24_hour(11, 0, None, narrow), Some(at(11, 0)));
    }
}
