//! Configuration view and validation commands: `pharmalog config`.

use anyhow::Result;

use super::super::ConfigCommands;

pub fn cmd_config(project_dir: &std::path::Path, command: Option<ConfigCommands>) -> Result<()> {
    use pharmalog::config::{CONFIG_FILE, Config, Overrides, PharmalogToml};

    let config_path = project_dir.join(CONFIG_FILE);

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("pharmalog Configuration");
            println!("=======================");
            println!();

            if config_path.exists() {
                println!("Config file: {}", config_path.display());
            } else {
                println!("No {} found at {}", CONFIG_FILE, config_path.display());
                println!("Using default configuration.");
            }
            println!();

            let config = Config::load(project_dir, &Overrides::default())?;
            let toml = &config.toml;

            println!("[storage]");
            println!("  data_dir = \"{}\"", toml.storage.data_dir.display());
            println!("  employees_file = \"{}\"", toml.storage.employees_file);
            println!("  formulas_file = \"{}\"", toml.storage.formulas_file);
            println!("  incidents_file = \"{}\"", toml.storage.incidents_file);
            println!("  error_types_file = \"{}\"", toml.storage.error_types_file);
            println!();
            println!("[server]");
            println!("  host = \"{}\"", toml.server.host);
            println!("  port = {}", toml.server.port);
            println!("  cors = {}", toml.server.cors);
            println!();
            println!("[forms]");
            println!("  default_date = \"{}\"", toml.forms.default_date);
            println!();
            println!("[reports]");
            println!("  group = \"{}\"", toml.reports.group);
            println!();
            println!("[logging]");
            if let Some(dir) = &toml.logging.dir {
                println!("  dir = \"{}\"", dir.display());
            }
            println!("  json = {}", toml.logging.json);
            println!();

            println!("Effective values (with env overrides):");
            println!("  data_dir = \"{}\"", config.data_dir.display());
            println!("  listen = \"{}:{}\"", config.host, config.port);
            println!();

            if !config_path.exists() {
                println!("Run 'pharmalog config init' to create a {} file.", CONFIG_FILE);
                println!();
            }
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            if !config_path.exists() {
                println!("No {} found. Using defaults (valid).", CONFIG_FILE);
                return Ok(());
            }

            let toml = PharmalogToml::load(&config_path)?;
            let warnings = toml.validate();

            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("{} already exists at {}", CONFIG_FILE, config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            if !project_dir.exists() {
                std::fs::create_dir_all(project_dir)?;
            }

            PharmalogToml::default().save(&config_path)?;

            println!("Created {} at {}", CONFIG_FILE, config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [storage] data_dir and file names");
            println!("  - [server] host, port, cors");
            println!("  - [forms] default_date, [reports] group, [logging] dir");
            println!();
        }
    }

    Ok(())
}
