use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ParseEnumError;

/// Formula types offered by the entry forms, in display order.
pub const FORMULA_TYPES: [&str; 5] = [
    "Cápsulas",
    "Sachês",
    "Sub-Lingual/Cápsulas Oleosas",
    "Semi-Sólidos",
    "Líquidos Orais",
];

/// Work shift ("turno") of a formula record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    #[default]
    #[serde(alias = "morning")]
    Manha,
    #[serde(alias = "afternoon")]
    Tarde,
}

impl Shift {
    pub const ALL: [Shift; 2] = [Shift::Manha, Shift::Tarde];

    /// Human label used by forms and reports.
    pub fn label(self) -> &'static str {
        match self {
            Shift::Manha => "Manhã",
            Shift::Tarde => "Tarde",
        }
    }
}

impl std::fmt::Display for Shift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shift::Manha => write!(f, "manha"),
            Shift::Tarde => write!(f, "tarde"),
        }
    }
}

impl std::str::FromStr for Shift {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "manha" | "manhã" | "morning" => Ok(Shift::Manha),
            "tarde" | "afternoon" => Ok(Shift::Tarde),
            _ => Err(ParseEnumError {
                kind: "shift",
                value: s.to_string(),
                expected: "manha, tarde",
            }),
        }
    }
}

/// A production batch record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaRecord {
    /// ISO date (`YYYY-MM-DD`). Kept as text so one bad row never hides the rest of the file.
    pub date: String,
    #[serde(rename = "horario", default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub nr: i64,
    #[serde(rename = "turno", default, skip_serializing_if = "Option::is_none")]
    pub shift: Option<Shift>,
    #[serde(rename = "tipo_formula")]
    pub formula_type: String,
    #[serde(rename = "funcionario_pesagem")]
    pub weighing_employee: String,
    #[serde(rename = "funcionario_manipulacao")]
    pub handling_employee: String,
    #[serde(rename = "funcionario_pm", default)]
    pub pm_employee: String,
    #[serde(rename = "refeito_pm", default)]
    pub redo_pm: bool,
    #[serde(rename = "refeito_exc", default)]
    pub redo_exc: bool,
    #[serde(rename = "estoque_usado", default)]
    pub stock_used: bool,
    #[serde(rename = "estoque_feito", default)]
    pub stock_made: bool,
    #[serde(rename = "pm_mais_20", default)]
    pub pm_over_20: bool,
}

impl FormulaRecord {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }

    /// The three employee fields as (role label, name) pairs.
    pub fn staff(&self) -> [(&'static str, &str); 3] {
        [
            ("pesagem", self.weighing_employee.as_str()),
            ("manipulacao", self.handling_employee.as_str()),
            ("pm", self.pm_employee.as_str()),
        ]
    }
}
