//! Data-entry drafts.
//!
//! A draft holds what the user typed, as text. `validate` is the only way
//! to turn one into a record, so the CLI flags, the interactive prompts and
//! the tests all go through the same rules.

pub mod prompt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use pharmalog_common::{FORMULA_TYPES, FormulaRecord, IncidentRecord, Shift};

use crate::config::DefaultDate;
use crate::errors::ValidationError;

/// Raw input for a formula record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormulaDraft {
    /// `YYYY-MM-DD`; empty picks the configured default date
    pub date: String,
    /// `HH:MM`; empty leaves the record without a time
    pub time: String,
    pub nr: String,
    /// `manha` / `tarde`; empty means morning
    pub shift: String,
    /// Empty means the first catalogue entry
    pub formula_type: String,
    pub weighing_employee: String,
    pub handling_employee: String,
    pub pm_employee: String,
    pub redo_pm: bool,
    pub redo_exc: bool,
    pub stock_used: bool,
    pub stock_made: bool,
    pub pm_over_20: bool,
}

impl FormulaDraft {
    pub fn validate(
        &self,
        today: NaiveDate,
        default_date: DefaultDate,
    ) -> Result<FormulaRecord, ValidationError> {
        let nr = required("nr", &self.nr)?;
        let weighing = required("weighing employee", &self.weighing_employee)?;
        let handling = required("handling employee", &self.handling_employee)?;
        let nr: i64 = nr
            .parse()
            .map_err(|_| ValidationError::InvalidNr(nr.to_string()))?;

        let date = match self.date.trim() {
            "" => default_date.resolve(today),
            raw => parse_date(raw)?,
        };
        let time = match self.time.trim() {
            "" => None,
            raw => Some(parse_time(raw)?),
        };
        let shift = match self.shift.trim() {
            "" => Shift::default(),
            raw => raw.parse::<Shift>().map_err(|e| {
                ValidationError::InvalidChoice {
                    field: "shift",
                    message: e.to_string(),
                }
            })?,
        };
        let formula_type = match self.formula_type.trim() {
            "" => FORMULA_TYPES[0].to_string(),
            raw => raw.to_string(),
        };

        Ok(FormulaRecord {
            date: date.format("%Y-%m-%d").to_string(),
            time,
            nr,
            shift: Some(shift),
            formula_type,
            weighing_employee: weighing.to_string(),
            handling_employee: handling.to_string(),
            pm_employee: self.pm_employee.trim().to_string(),
            redo_pm: self.redo_pm,
            redo_exc: self.redo_exc,
            stock_used: self.stock_used,
            stock_made: self.stock_made,
            pm_over_20: self.pm_over_20,
        })
    }
}

/// Raw input for an incident record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncidentDraft {
    /// `YYYY-MM-DD`; empty stamps the submission date
    pub date: String,
    pub nr: String,
    pub error_types: Vec<String>,
    pub employee: String,
    /// Accepts `12,50` as well as `12.50`
    pub value: String,
    pub discounted: bool,
    pub billed: bool,
    pub notes: String,
}

impl IncidentDraft {
    pub fn validate(&self, now: NaiveDateTime) -> Result<IncidentRecord, ValidationError> {
        let nr = required("nr", &self.nr)?;
        let error_types: Vec<String> = self
            .error_types
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        if error_types.is_empty() {
            return Err(ValidationError::MissingField("error type"));
        }
        let employee = required("employee", &self.employee)?;
        let value = parse_amount(required("value", &self.value)?)?;

        let date = match self.date.trim() {
            "" => now.date(),
            raw => parse_date(raw)?,
        };
        let notes = self.notes.trim();

        Ok(IncidentRecord {
            date: date.format("%Y-%m-%d").to_string(),
            time: now.format("%H:%M").to_string(),
            nr: nr.to_string(),
            error_types,
            employee: employee.to_string(),
            value,
            discounted: self.discounted,
            billed: self.billed,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        })
    }
}

fn required<'a>(field: &'static str, raw: &'a str) -> Result<&'a str, ValidationError> {
    match raw.trim() {
        "" => Err(ValidationError::MissingField(field)),
        value => Ok(value),
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))
}

fn parse_time(raw: &str) -> Result<String, ValidationError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|_| ValidationError::InvalidChoice {
            field: "time",
            message: format!("'{}' is not HH:MM", raw),
        })
}

/// Parse a monetary value written with either decimal separator.
pub fn parse_amount(raw: &str) -> Result<f64, ValidationError> {
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationError::InvalidAmount(raw.to_string()))
}
