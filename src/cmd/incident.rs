//! Incident commands: `pharmalog incident`.

use anyhow::Result;
use chrono::Local;
use console::style;
use pharmalog::config::Config;
use pharmalog::forms::{IncidentDraft, prompt};
use pharmalog::report::render::format_money;
use pharmalog_common::Employee;

use super::super::{IncidentArgs, IncidentCommands};
use super::{open_store, tail};

fn draft_from_args(args: IncidentArgs) -> IncidentDraft {
    IncidentDraft {
        date: args.date.unwrap_or_default(),
        nr: args.nr.unwrap_or_default(),
        error_types: args.error_types,
        employee: args.employee.unwrap_or_default(),
        value: args.value.unwrap_or_default(),
        discounted: args.discounted,
        billed: args.billed,
        notes: args.notes.unwrap_or_default(),
    }
}

pub fn cmd_incident(config: &Config, command: IncidentCommands) -> Result<()> {
    let store = open_store(config);

    match command {
        IncidentCommands::Add(args) => {
            let draft = if args.interactive {
                let employees: Vec<Employee> = store.employees.list()?.into_values().collect();
                let error_types = store.error_types.list()?;
                prompt::incident_form(&employees, &error_types)?
            } else {
                draft_from_args(args)
            };
            let record = draft.validate(Local::now().naive_local())?;
            let total = store.incidents.append(record.clone())?;
            println!(
                "Incident {} saved: {} ({} on file).",
                record.nr,
                format_money(record.value),
                total
            );
        }
        IncidentCommands::List(args) => {
            let incidents = tail(store.incidents.list()?, args.last);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&incidents)?);
                return Ok(());
            }
            if incidents.is_empty() {
                println!("No incidents recorded.");
                return Ok(());
            }
            for i in &incidents {
                println!(
                    "  {} {}  {:>8}  {:<14} {:>14}  {}  {}",
                    i.date,
                    i.time,
                    i.nr,
                    i.employee,
                    format_money(i.value),
                    i.error_types.join(", "),
                    style(i.status().label()).dim()
                );
            }
        }
    }

    Ok(())
}
