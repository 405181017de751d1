//! CLI command implementations.
//!
//! Each submodule owns one `Commands` variant:
//!
//! | Module       | Commands handled |
//! |--------------|------------------|
//! | `init`       | `Init`           |
//! | `employee`   | `Employee`       |
//! | `error_type` | `ErrorType`      |
//! | `formula`    | `Formula`        |
//! | `incident`   | `Incident`       |
//! | `report`     | `Report`         |
//! | `serve`      | `Serve`          |
//! | `seed`       | `Seed`           |
//! | `config`     | `Config`         |

pub mod config;
pub mod employee;
pub mod error_type;
pub mod formula;
pub mod incident;
pub mod init;
pub mod report;
pub mod seed;
pub mod serve;

pub use config::cmd_config;
pub use employee::cmd_employee;
pub use error_type::cmd_error_type;
pub use formula::cmd_formula;
pub use incident::cmd_incident;
pub use init::cmd_init;
pub use report::cmd_report;
pub use seed::cmd_seed;
pub use serve::cmd_serve;

use anyhow::Result;
use pharmalog::config::Config;
use pharmalog::store::Store;

pub(crate) fn open_store(config: &Config) -> Store {
    Store::open(&config.store_paths())
}

/// Ask before a destructive change unless `--yes` was given or nobody is at the terminal.
pub(crate) fn confirmed(yes: bool, prompt: &str) -> Result<bool> {
    if yes || !console::user_attended() {
        return Ok(true);
    }
    pharmalog::forms::prompt::confirm(prompt)
}

/// Keep only the last `n` items when a limit is given.
pub(crate) fn tail<T>(mut items: Vec<T>, last: Option<usize>) -> Vec<T> {
    if let Some(n) = last
        && items.len() > n
    {
        items.drain(..items.len() - n);
    }
    items
}
