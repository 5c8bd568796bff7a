mod debug_report;

use chrono::NaiveDateTime;
use clap::Parser;
use recurrent::{Context, DaytimeWindow, Options, format_with, parse_verbose_with};
use std::io::{self, IsTerminal, Read};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "recurrent", version)]
#[command(about = "Turn English event phrases into RFC 5545 recurrence rules")]
struct Args {
    /// Reference time in YYYY-MM-DDTHH:MM:SS. Default: now.
    #[arg(long, value_parser = parse_reference)]
    reference: Option<NaiveDateTime>,

    /// Hours a bare clock reading falls in, as START-END.
    #[arg(long, value_parser = parse_daytime, default_value = "8-19")]
    daytime: DaytimeWindow,

    /// Most occurrences expanded per rule.
    #[arg(long, default_value_t = 10_000)]
    limit: u16,

    /// Also render the result back to English.
    #[arg(short, long)]
    format: bool,

    /// Print the per-stage report.
    #[arg(short, long)]
    verbose: bool,

    /// Disable ANSI color output.
    #[arg(long)]
    no_color: bool,

    /// Input text. Read from stdin when omitted.
    input: Vec<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();

    let args = Args::parse();
    let input = if args.input.is_empty() {
        match read_stdin_input() {
            Ok(text) => text,
            Err(err) => {
                eprintln!("{err}");
                return ExitCode::from(2);
            }
        }
    } else {
        args.input.join(" ")
    };
    if input.trim().is_empty() {
        eprintln!("error: no input provided");
        return ExitCode::from(2);
    }

    let ctx = match args.reference {
        Some(reference_time) => Context { reference_time },
        None => Context::default(),
    };
    let opts = Options { daytime: args.daytime, expansion_limit: args.limit };
    let res = parse_verbose_with(input.trim(), &ctx, &opts);

    if args.verbose {
        let color = !args.no_color && io::stdout().is_terminal();
        debug_report::print_run(&res, color);
    }

    let Some(parsed) = &res.parsed else {
        println!("not a date");
        return ExitCode::from(1);
    };
    println!("{parsed}");
    if args.format {
        println!("{}", format_with(parsed, &ctx, &opts));
    }
    ExitCode::SUCCESS
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn parse_reference(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .map_err(|_| format!("invalid reference '{value}' (expected YYYY-MM-DDTHH:MM:SS)"))
}

fn parse_daytime(value: &str) -> Result<DaytimeWindow, String> {
    let invalid = || format!("invalid daytime '{value}' (expected START-END, e.g. 8-19)");
    let (start, end) = value.split_once('-').ok_or_else(invalid)?;
    let start: u32 = start.trim().parse().map_err(|_| invalid())?;
    let end: u32 = end.trim().parse().map_err(|_| invalid())?;
    if start >= end || end > 23 {
        return Err(invalid());
    }
    Ok(DaytimeWindow { start, end })
}
