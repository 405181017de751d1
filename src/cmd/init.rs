//! Project initialization: `pharmalog init`.

use anyhow::{Context, Result};
use pharmalog::config::{CONFIG_FILE, Config, PharmalogToml};

use super::open_store;

pub fn cmd_init(config: &Config) -> Result<()> {
    let config_path = config.project_dir.join(CONFIG_FILE);
    let wrote_config = if config_path.exists() {
        false
    } else {
        PharmalogToml::default().save(&config_path)?;
        true
    };

    let created = open_store(config)
        .ensure_files()
        .context("Failed to create the data files")?;

    if wrote_config {
        println!("Created {}", config_path.display());
    }
    if created.is_empty() {
        println!(
            "Data files already present in {}",
            config.data_dir.display()
        );
    } else {
        println!("Created data files in {}:", config.data_dir.display());
        for path in &created {
            if let Some(name) = path.file_name() {
                println!("  {}", name.to_string_lossy());
            }
        }
        println!();
        println!("Next steps:");
        println!("  1. pharmalog employee add <name>");
        println!("  2. pharmalog error-type add <type>");
        println!("  3. pharmalog formula add --interactive");
    }
    Ok(())
}
