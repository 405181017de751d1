//! Fake-data commands: `pharmalog seed`.

use std::path::Path;

use anyhow::{Context, Result};
use pharmalog::config::Config;
use pharmalog::forms::parse_date;
use pharmalog::seed::{Generator, SeedWindow};
use pharmalog::store::JsonFile;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use super::super::{SeedArgs, SeedCommands};
use super::open_store;

const DEFAULT_FORMULAS: usize = 900;
const DEFAULT_INCIDENTS: usize = 200;

fn generator(args: &SeedArgs) -> Result<Generator> {
    let end = parse_date(&args.end).context("Invalid --end")?;
    let window = SeedWindow::new(end, args.days).with_context(|| {
        format!("--days {} does not fit before --end {}", args.days, end)
    })?;
    Ok(Generator::new(args.seed, window))
}

/// Overwrite `path` with `records` in the store's file format.
fn write_file<T>(path: &Path, records: &Vec<T>) -> Result<()>
where
    T: Serialize + DeserializeOwned,
{
    JsonFile::<Vec<T>>::new(path)
        .save(records)
        .with_context(|| format!("Failed to write {}", path.display()))
}

pub fn cmd_seed(config: &Config, command: SeedCommands) -> Result<()> {
    let store = open_store(config);
    let roster = store.employees.names()?;

    match command {
        SeedCommands::Formulas(args) => {
            let count = args.count.unwrap_or(DEFAULT_FORMULAS);
            let records = generator(&args)?.formulas(count, &roster);
            match &args.output {
                Some(path) => {
                    write_file(path, &records)?;
                    println!("Generated {} formulas into {}", records.len(), path.display());
                }
                None => {
                    let total = store.formulas.append_many(records)?;
                    println!("Appended {} formulas ({} on file).", count, total);
                }
            }
            info!(count, "seeded formulas");
        }
        SeedCommands::Incidents(args) => {
            let count = args.count.unwrap_or(DEFAULT_INCIDENTS);
            let error_types = store.error_types.list()?;
            let records = generator(&args)?.incidents(count, &roster, &error_types);
            match &args.output {
                Some(path) => {
                    write_file(path, &records)?;
                    println!("Generated {} incidents into {}", records.len(), path.display());
                }
                None => {
                    let total = store.incidents.append_many(records)?;
                    println!("Appended {} incidents ({} on file).", count, total);
                }
            }
            info!(count, "seeded incidents");
        }
    }

    Ok(())
}
