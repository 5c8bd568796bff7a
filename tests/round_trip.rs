//! Rendering a parsed phrase and parsing the rendering again is stable.

use chrono::{NaiveDate, NaiveDateTime};
use recurrent::{Context, Options, Parsed, format_with, parse_with};
use rstest::rstest;

fn context() -> Context {
    let reference_time: NaiveDateTime = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
    Context { reference_time }
}

fn parse(text: &str) -> Option<Parsed> {
    parse_with(text, &context(), &Options::default())
}

fn format(parsed: &Parsed) -> String {
    format_with(parsed, &context(), &Options::default())
}

#[rstest]
#[case("daily")]
#[case("every other day")]
#[case("every 5 minutes")]
#[case("every other hour")]
#[case("weekdays")]
#[case("weekends")]
#[case("tuesdays and thursdays")]
#[case("every 3 weeks on mon")]
#[case("every other week on monday and wednesday")]
#[case("every 4th and 10th of the month")]
#[case("first and third friday of each month")]
#[case("the last day of every month")]
#[case("the last weekday of every month")]
#[case("the 1st and last instance of every month on mon and fri")]
#[case("yearly on the fourth thursday in november")]
#[case("every march 17th")]
#[case("every 100th day of the year")]
#[case("every year on the 15th day of the month")]
#[case("every day at 9am and 5:30pm")]
#[case("every day starting feb 2")]
#[case("daily starting march 3rd until april 5th")]
#[case("every wed until november")]
#[case("every thursday for 3 times")]
#[case("every day except weekends")]
#[case("every thursday at 9am starting march 3 except march 4 and march 11")]
#[case("march 3rd at 12:15am")]
#[case("2nd friday in august")]
fn rendering_parses_back_to_the_same_meaning(#[case] text: &str) {
    let first = parse(text).unwrap_or_else(|| panic!("{text} did not parse"));
    let rendered = format(&first);
    let second = parse(&rendered).unwrap_or_else(|| panic!("{rendered} did not parse"));
    assert_eq!(format(&second), rendered, "{text}");
    assert_eq!(second, first, "{text} -> {rendered}");
}

#[rstest]
#[case("RRULE:FREQ=MONTHLY;INTERVAL=1;BYDAY=+1FR", "1st Fri of every month")]
#[case("RRULE:FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE", "every other week on Mon and Wed")]
#[case("RRULE:FREQ=YEARLY;INTERVAL=1;BYDAY=4TH;BYMONTH=11", "every 4th Thu in Nov")]
#[case("DTSTART:20100303\nRRULE:FREQ=DAILY;INTERVAL=1;UNTIL=20100405", "every day starting Mar 3 until Apr 5")]
#[case("RRULE:FREQ=DAILY;INTERVAL=1;BYHOUR=15;BYMINUTE=0", "every day at 3pm")]
#[case("RRULE:FREQ=WEEKLY;INTERVAL=1;BYDAY=TH;COUNT=3", "every Thu for 3 times")]
#[case("RRULE:FREQ=YEARLY;INTERVAL=1;BYMONTHDAY=15", "every year on the 15th day of the month")]
#[case("not a rule", "not a rule")]
fn renders_rule_text(#[case] wire: &str, #[case] expected: &str) {
    assert_eq!(format(&Parsed::Rule(wire.to_string())), expected);
}
