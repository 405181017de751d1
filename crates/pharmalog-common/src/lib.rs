//! Shared domain types for pharmalog.
//!
//! Records keep the key names of the production JSON files (`tipo_formula`,
//! `funcionario_pesagem`, ...) so files written by the desktop forms load
//! unchanged. Field names on the Rust side are English.

pub mod employee;
pub mod formula;
pub mod incident;

pub use employee::{Employee, EmployeeMap, Role, fill_missing_names};
pub use formula::{FORMULA_TYPES, FormulaRecord, Shift};
pub use incident::{IncidentRecord, IncidentStatus};

use thiserror::Error;

/// A string did not name a known variant of a domain enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {kind} '{value}'. Valid values: {expected}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}
