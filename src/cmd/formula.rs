//! Formula commands: `pharmalog formula`.

use anyhow::Result;
use chrono::Local;
use console::style;
use pharmalog::config::Config;
use pharmalog::forms::{FormulaDraft, prompt};
use pharmalog_common::Employee;

use super::super::{FormulaArgs, FormulaCommands};
use super::{open_store, tail};

fn draft_from_args(args: FormulaArgs) -> FormulaDraft {
    FormulaDraft {
        date: args.date.unwrap_or_default(),
        time: args.time.unwrap_or_default(),
        nr: args.nr.unwrap_or_default(),
        shift: args.shift.unwrap_or_default(),
        formula_type: args.formula_type.unwrap_or_default(),
        weighing_employee: args.weighing.unwrap_or_default(),
        handling_employee: args.handling.unwrap_or_default(),
        pm_employee: args.pm.unwrap_or_default(),
        redo_pm: args.redo_pm,
        redo_exc: args.redo_exc,
        stock_used: args.stock_used,
        stock_made: args.stock_made,
        pm_over_20: args.pm_over_20,
    }
}

pub fn cmd_formula(config: &Config, command: FormulaCommands) -> Result<()> {
    let store = open_store(config);

    match command {
        FormulaCommands::Add(args) => {
            let today = Local::now().date_naive();
            let policy = config.default_date();
            let draft = if args.interactive {
                let employees: Vec<Employee> = store.employees.list()?.into_values().collect();
                prompt::formula_form(&employees, policy.resolve(today))?
            } else {
                draft_from_args(args)
            };
            let record = draft.validate(today, policy)?;
            let total = store.formulas.append(record.clone())?;
            println!(
                "Formula {} saved for {} ({} on file).",
                record.nr, record.date, total
            );
        }
        FormulaCommands::List(args) => {
            let formulas = tail(store.formulas.list()?, args.last);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&formulas)?);
                return Ok(());
            }
            if formulas.is_empty() {
                println!("No formulas recorded.");
                return Ok(());
            }
            for f in &formulas {
                let mut flags = Vec::new();
                if f.redo_pm {
                    flags.push("redo PM");
                }
                if f.redo_exc {
                    flags.push("redo EXC");
                }
                if f.stock_used {
                    flags.push("stock used");
                }
                if f.stock_made {
                    flags.push("stock made");
                }
                if f.pm_over_20 {
                    flags.push("PM>20");
                }
                println!(
                    "  {} {:>8}  {:<30} W:{} H:{} PM:{} {}",
                    f.date,
                    f.nr,
                    f.formula_type,
                    f.weighing_employee,
                    f.handling_employee,
                    if f.pm_employee.is_empty() { "-" } else { f.pm_employee.as_str() },
                    style(flags.join(", ")).yellow()
                );
            }
        }
    }

    Ok(())
}
