//! Employee registry commands: `pharmalog employee`.

use anyhow::Result;
use console::style;
use pharmalog::config::Config;
use pharmalog_common::Role;

use super::super::{Cli, EmployeeCommands};
use super::{confirmed, open_store};

pub fn cmd_employee(config: &Config, cli: &Cli, command: EmployeeCommands) -> Result<()> {
    let store = open_store(config).employees;

    match command {
        EmployeeCommands::Add {
            name,
            role,
            pharmacist,
            interactive,
        } => {
            let (name, role) = match name {
                Some(name) if !interactive => {
                    let role = match role {
                        Some(raw) => Some(raw.parse::<Role>()?),
                        None if pharmacist => Some(Role::Farmaceutico),
                        None => Some(Role::Operador),
                    };
                    (name, role)
                }
                _ => pharmalog::forms::prompt::employee_form()?,
            };
            let employee = store.add(&name, role)?;
            println!("Employee '{}' added.", employee.name);
        }
        EmployeeCommands::Remove { name } => {
            if !confirmed(cli.yes, &format!("Remove employee '{}'?", name))? {
                println!("Cancelled.");
                return Ok(());
            }
            let removed = store.remove(&name)?;
            println!("Employee '{}' removed.", removed.name);
        }
        EmployeeCommands::List { json } => {
            let employees = store.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&employees)?);
                return Ok(());
            }
            if employees.is_empty() {
                println!("No employees registered.");
                return Ok(());
            }
            for employee in employees.values() {
                let role = employee
                    .role
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("  {}  {}", style(&employee.name).bold(), style(role).dim());
            }
        }
    }

    Ok(())
}
