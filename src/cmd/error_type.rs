//! Error-type vocabulary commands: `pharmalog error-type`.

use anyhow::Result;
use pharmalog::config::Config;

use super::super::{Cli, ErrorTypeCommands};
use super::{confirmed, open_store};

pub fn cmd_error_type(config: &Config, cli: &Cli, command: ErrorTypeCommands) -> Result<()> {
    let store = open_store(config).error_types;

    match command {
        ErrorTypeCommands::Add { name, interactive } => {
            let name = match name {
                Some(name) if !interactive => name,
                _ => pharmalog::forms::prompt::text("New error type")?,
            };
            store.add(&name)?;
            println!("Error type '{}' added.", name.trim());
        }
        ErrorTypeCommands::Remove { name } => {
            if !confirmed(cli.yes, &format!("Remove error type '{}'?", name))? {
                println!("Cancelled.");
                return Ok(());
            }
            store.remove(&name)?;
            println!("Error type '{}' removed.", name.trim());
        }
        ErrorTypeCommands::List { json } => {
            let types = store.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&types)?);
            } else if types.is_empty() {
                println!("No error types registered.");
            } else {
                for name in types {
                    println!("  {}", name);
                }
            }
        }
    }

    Ok(())
}
