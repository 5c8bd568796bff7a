use super::tables::{ordinal_label, ordinal_value, weekday_full_name, weekday_named};
use regex::Captures;

/// Canonicalize a raw phrase before segmentation and tokenization.
///
/// Lowercases, turns list punctuation into `and`, drops the remaining
/// punctuation, rewrites a few idioms into the grammar's vocabulary and
/// expands weekday ranges into explicit lists.
pub(crate) fn normalize(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let listed = regex!(r"\s*[,&;]\s*").replace_all(&lowered, " and ");
    let stripped = regex!(r"[^a-z0-9/:\-\s]").replace_all(&listed, "");
    let spaced = regex!(r"\s+").replace_all(&stripped, " ");

    let edges = regex!(r"\b(?:the\s+)?(beginning|start|end)\s+of\s+(?:(the|each|every)\s+)?(week|month|year)\b")
        .replace_all(&spaced, |caps: &Captures| {
            let ordinal = if &caps[1] == "end" { "last" } else { "1st" };
            match caps.get(2) {
                Some(det) => format!("{ordinal} day of {} {}", det.as_str(), &caps[3]),
                None => format!("{ordinal} day of {}", &caps[3]),
            }
        });

    let from_last = regex!(
        r"\b(\d{1,3}(?:st|nd|rd|th)|first|second|third|fourth|fifth|sixth|seventh|eighth|ninth|tenth)\s+(?:to\s+(?:the\s+)?)?last\b"
    )
    .replace_all(&edges, |caps: &Captures| match ordinal_value(&caps[1]) {
        Some(n) if n > 0 => format!("-{}", ordinal_label(n)),
        _ => caps[0].to_string(),
    });

    let ranged = regex!(
        r"\b((?:mon|tue|wed|thu|fri|sat|sun)[a-z]*)\s*(?:\bthrough\b|\bthru\b|\bto\b|-)\s*((?:mon|tue|wed|thu|fri|sat|sun)[a-z]*)\b"
    )
    .replace_all(&from_last, expand_weekday_range);

    regex!(r"\s+").replace_all(ranged.trim(), " ").into_owned()
}

fn expand_weekday_range(caps: &Captures) -> String {
    let (Some(first), Some(last)) = (weekday_named(&caps[1]), weekday_named(&caps[2])) else {
        return caps[0].to_string();
    };
    let plural = caps[1].ends_with('s') || caps[2].ends_with('s');
    let mut names = Vec::new();
    let mut day = first;
    loop {
        let name = weekday_full_name(day);
        names.push(if plural { format!("{name}s") } else { name.to_string() });
        if day == last {
            break;
        }
        day = day.succ();
    }
    names.join(" and ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_and_punctuation() {
        let expected = vec![
            ("every monday and thursday", "Every Monday, Thursday."),
            ("mondays and fridays", "Mondays & Fridays"),
            ("every wed at 3pm", "every wed. at 3p.m."),
            ("daily at 12:15am", "  daily   at 12:15am "),
            ("every other day", "Every other day!"),
        ];
        for (out, input) in expected {
            assert_eq!(normalize(input), out, "{input}");
        }
    }

    #[test]
    fn month_edges_become_ordinal_days() {
        assert_eq!(normalize("the end of every month"), "last day of every month");
        assert_eq!(normalize("beginning of the month"), "1st day of the month");
        assert_eq!(normalize("start of each year"), "1st day of each year");
    }

    #[test]
    fn counted_from_the_end() {
        assert_eq!(normalize("second to last friday of the month"), "-2nd friday of the month");
        assert_eq!(normalize("the 3rd last day of the month"), "the -3rd day of the month");
        assert_eq!(normalize("last friday"), "last friday");
    }

    #[test]
    fn weekday_ranges_expand() {
        assert_eq!(normalize("every mon-wed"), "every monday and tuesday and wednesday");
        assert_eq!(normalize("fri through sun"), "friday and saturday and sunday");
        assert_eq!(normalize("mondays thru wednesdays"), "mondays and tuesdays and wednesdays");
        assert_eq!(normalize("sat to mon"), "saturday and sunday and monday");
        assert_eq!(normalize("from monday to june"), "from monday to june");
    }
}
