use std::path::PathBuf;

use pharmalog_common::{Employee, EmployeeMap, Role, fill_missing_names};
use tracing::info;

use super::json_file::JsonFile;
use crate::errors::StoreError;

/// Employee registry: a JSON object keyed by employee name.
#[derive(Debug, Clone)]
pub struct EmployeeStore {
    file: JsonFile<EmployeeMap>,
}

impl EmployeeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonFile::new(path),
        }
    }

    pub fn file(&self) -> &JsonFile<EmployeeMap> {
        &self.file
    }

    pub fn list(&self) -> Result<EmployeeMap, StoreError> {
        let mut map = self.file.load()?;
        fill_missing_names(&mut map);
        Ok(map)
    }

    /// Employee names in key order, as offered by selection lists.
    pub fn names(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.list()?.into_keys().collect())
    }

    pub fn get(&self, name: &str) -> Result<Option<Employee>, StoreError> {
        Ok(self.list()?.remove(name.trim()))
    }

    /// Register a new employee. Duplicates are rejected and leave the file untouched.
    pub fn add(&self, name: &str, role: Option<Role>) -> Result<Employee, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName { what: "Employee name" });
        }
        let employee = self.file.update(|map| {
            if map.contains_key(name) {
                return Err(StoreError::EmployeeExists {
                    name: name.to_string(),
                });
            }
            let employee = Employee::new(name, role);
            map.insert(name.to_string(), employee.clone());
            Ok(employee)
        })?;
        info!(employee = %employee.name, role = ?employee.role, "employee added");
        Ok(employee)
    }

    pub fn remove(&self, name: &str) -> Result<Employee, StoreError> {
        let name = name.trim();
        let mut removed = self.file.update(|map| {
            map.remove(name).ok_or_else(|| StoreError::EmployeeNotFound {
                name: name.to_string(),
            })
        })?;
        if removed.name.is_empty() {
            removed.name = name.to_string();
        }
        info!(employee = %removed.name, "employee removed");
        Ok(removed)
    }
}
