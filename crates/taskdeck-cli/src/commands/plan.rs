//! `taskdeck plan`: run the planning pipeline over a request document.

use std::path::PathBuf;

use clap::Args;
use taskdeck_core::{process_plan, Config, PlanRequest};

use super::io::{parse_now, read_json, write_json, CliResult};

#[derive(Args)]
pub struct PlanArgs {
    /// Request JSON file (stdin when omitted or "-")
    input: Option<PathBuf>,
    /// Write the report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Planning time (RFC 3339), defaults to now
    #[arg(long)]
    now: Option<String>,
}

pub fn run(args: PlanArgs) -> CliResult {
    let config = Config::load()?;
    let request: PlanRequest = read_json(args.input.as_deref())?;
    let now = parse_now(args.now.as_deref())?;

    let report = process_plan(request, now, &config)?;
    write_json(&report, args.output.as_deref())?;
    eprintln!("{}", report.validation_summary);
    Ok(())
}
