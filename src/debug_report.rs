use recurrent::ParseResultVerbose;

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(res: &ParseResultVerbose, color: bool) {
    let palette = ansi::Palette::new(color);
    let details = &res.details;
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Parsing: \"{}\"", res.text), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Normalized ━━━", ansi::GRAY));
    println!("  {}", details.normalized);

    println!("\n{}", palette.paint("━━━ Segments ━━━", ansi::GRAY));
    print_segments(res, &palette);

    println!("\n{}", palette.paint("━━━ Tokens ━━━", ansi::GRAY));
    if details.tokens.is_empty() {
        println!("{}", palette.dim("  No tokens produced"));
    }
    for (idx, token) in details.tokens.iter().enumerate() {
        let kind = format!("{:?}", token.kind);
        let kind = if token.kind.is_content() { palette.paint(kind, ansi::BLUE) } else { palette.dim(kind) };
        println!("  {} {} {} {}", palette.paint(format!("[{idx}]"), ansi::GRAY), token.text, palette.dim("│"), kind);
    }

    println!("\n{}", palette.paint("━━━ Outcome ━━━", ansi::GRAY));
    match &res.parsed {
        Some(parsed) => {
            println!("  {} {}", palette.dim("path:"), palette.paint(details.resolution.to_string(), ansi::CYAN));
            for line in parsed.to_string().lines() {
                println!("  {}", palette.bold(palette.paint(line, ansi::GREEN)));
            }
        }
        None => {
            println!("{}", palette.dim("  Not a date"));
            println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
            println!("  • No recurrence marker (every, daily, plural weekday, ...)");
            println!("  • The date resolver did not recognize the remaining phrase");
            println!("\n{}", palette.dim("  Tip: Set RUST_LOG=recurrent=trace to see each stage"));
        }
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    let stages = &details.stages;
    println!(
        "  Total: {}  │  Segment: {}  │  Resolve: {}  │  Except: {}  │  Fallback: {}",
        palette.paint(format!("{:?}", details.total), ansi::GREEN),
        palette.paint(format!("{:?}", stages.segment), ansi::CYAN),
        palette.paint(format!("{:?}", stages.resolve), ansi::CYAN),
        palette.dim(format!("{:?}", stages.exceptions)),
        palette.dim(format!("{:?}", stages.fallback)),
    );
    println!();
}

fn print_segments(res: &ParseResultVerbose, palette: &ansi::Palette) {
    let seg = &res.details.segments;
    let row = |label: &str, value: Option<String>| {
        if let Some(value) = value {
            println!("  {} {}", palette.paint(format!("{label:<9}"), ansi::BLUE), value);
        }
    };
    row("event", Some(seg.event.clone()));
    row("starting", seg.starting.clone());
    row("ending", seg.ending.clone());
    row("count", seg.count.map(|n| n.to_string()));
    row("span", seg.span.clone());
    row("except", seg.except.clone());
    row("times", (!seg.times.is_empty()).then(|| seg.times.join(", ")));
    if let Some(dtstart) = res.details.dtstart {
        row("dtstart", Some(palette.paint(dtstart.to_string(), ansi::YELLOW)));
    }
    if let Some(until) = res.details.until {
        row("until", Some(palette.paint(until.to_string(), ansi::YELLOW)));
    }
}
