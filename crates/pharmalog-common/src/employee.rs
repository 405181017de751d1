use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ParseEnumError;

/// Role tag attached to an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(alias = "farmaceutico", alias = "pharmacist")]
    Farmaceutico,
    #[serde(alias = "operador", alias = "operator")]
    Operador,
}

impl Role {
    pub fn is_pharmacist(self) -> bool {
        matches!(self, Role::Farmaceutico)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Farmaceutico => write!(f, "Farmaceutico"),
            Role::Operador => write!(f, "Operador"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "farmaceutico" | "farmacêutico" | "pharmacist" => Ok(Role::Farmaceutico),
            "operador" | "operator" => Ok(Role::Operador),
            _ => Err(ParseEnumError {
                kind: "role",
                value: s.to_string(),
                expected: "pharmacist, operator",
            }),
        }
    }
}

/// An employee entry. The store keys employees by `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Older files omit the name inside the value; it is restored from the key on load.
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl Employee {
    pub fn new(name: impl Into<String>, role: Option<Role>) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }

    pub fn is_pharmacist(&self) -> bool {
        self.role.is_some_and(Role::is_pharmacist)
    }
}

/// The employee file: a JSON object keyed by employee name.
pub type EmployeeMap = BTreeMap<String, Employee>;

/// Copy each key into its value when the value has no name of its own.
pub fn fill_missing_names(map: &mut EmployeeMap) {
    for (key, employee) in map.iter_mut() {
        if employee.name.is_empty() {
            employee.name = key.clone();
        }
    }
}
