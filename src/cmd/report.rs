//! Dashboard commands: `pharmalog report`.

use anyhow::{Context, Result};
use chrono::Local;
use pharmalog::config::Config;
use pharmalog::forms::parse_date;
use pharmalog::report::render::{render_costs, render_production, terminal_width};
use pharmalog::report::{CostReport, Granularity, ProductionReport, ReportFilter};

use super::super::{ReportArgs, ReportCommands};
use super::open_store;

fn filter_from_args(args: &ReportArgs) -> Result<ReportFilter> {
    let start = args.start.as_deref().map(parse_date).transpose()?;
    let end = args.end.as_deref().map(parse_date).transpose()?;
    let group = args
        .group
        .as_deref()
        .map(str::parse::<Granularity>)
        .transpose()
        .context("Invalid --group")?;
    let filter = ReportFilter { start, end, group };
    filter.validate()?;
    Ok(filter)
}

pub fn cmd_report(config: &Config, command: ReportCommands) -> Result<()> {
    let store = open_store(config);
    let today = Local::now().date_naive();
    let group = config.report_group();

    match command {
        ReportCommands::Production(args) => {
            let filter = filter_from_args(&args)?;
            let records = store.formulas.load()?;
            let mut report = ProductionReport::build(&records.rows, &filter, group, today);
            report.skipped += records.skipped;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_production(&report, terminal_width()));
            }
        }
        ReportCommands::Costs(args) => {
            let filter = filter_from_args(&args)?;
            let records = store.incidents.load()?;
            let mut report = CostReport::build(&records.rows, &filter, group, today);
            report.skipped += records.skipped;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_costs(&report, terminal_width()));
            }
        }
    }

    Ok(())
}
