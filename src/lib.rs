//! pharmalog: production records for a compounding pharmacy.
//!
//! Employees, formula batches and incidents live in flat JSON files
//! ([`store`]); data entry goes through validated drafts ([`forms`]);
//! [`report`] aggregates the files into the production and cost
//! dashboards; [`http`] serves the same store over REST.

pub mod config;
pub mod errors;
pub mod forms;
pub mod http;
pub mod logging;
pub mod report;
pub mod seed;
pub mod store;
