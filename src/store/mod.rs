//! Flat JSON persistence.
//!
//! ```text
//! data/
//! ├── funcionarios.json   # {"<name>": {"name": ..., "role": ...}}
//! ├── formulas.json       # [FormulaRecord, ...]
//! ├── erros.json          # [IncidentRecord, ...]
//! └── tipos_erro.json     # ["<error type>", ...]
//! ```
//!
//! Every mutation rewrites the whole file under an exclusive `<file>.lock`.

pub mod employees;
pub mod error_types;
pub mod json_file;
pub mod records;

use std::path::PathBuf;

use pharmalog_common::{FormulaRecord, IncidentRecord};

pub use employees::EmployeeStore;
pub use error_types::ErrorTypeStore;
pub use json_file::JsonFile;
pub use records::RecordStore;

use crate::errors::StoreError;

pub type FormulaStore = RecordStore<FormulaRecord>;
pub type IncidentStore = RecordStore<IncidentRecord>;

/// Locations of the four store files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub employees: PathBuf,
    pub formulas: PathBuf,
    pub incidents: PathBuf,
    pub error_types: PathBuf,
}

impl StorePaths {
    /// Default file names inside `data_dir`.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        let dir = data_dir.into();
        Self {
            employees: dir.join("funcionarios.json"),
            formulas: dir.join("formulas.json"),
            incidents: dir.join("erros.json"),
            error_types: dir.join("tipos_erro.json"),
        }
    }
}

/// All stores of one data directory.
#[derive(Debug, Clone)]
pub struct Store {
    pub employees: EmployeeStore,
    pub formulas: FormulaStore,
    pub incidents: IncidentStore,
    pub error_types: ErrorTypeStore,
}

impl Store {
    pub fn open(paths: &StorePaths) -> Self {
        Self {
            employees: EmployeeStore::new(&paths.employees),
            formulas: RecordStore::new(&paths.formulas, "formula"),
            incidents: RecordStore::new(&paths.incidents, "incident"),
            error_types: ErrorTypeStore::new(&paths.error_types),
        }
    }

    /// Create every missing file with its empty default; returns the created paths.
    pub fn ensure_files(&self) -> Result<Vec<PathBuf>, StoreError> {
        let mut created = Vec::new();
        if self.employees.file().ensure_exists()? {
            created.push(self.employees.file().path().to_path_buf());
        }
        if self.formulas.file().ensure_exists()? {
            created.push(self.formulas.file().path().to_path_buf());
        }
        if self.incidents.file().ensure_exists()? {
            created.push(self.incidents.file().path().to_path_buf());
        }
        if self.error_types.file().ensure_exists()? {
            created.push(self.error_types.file().path().to_path_buf());
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn ensure_files_creates_defaults_once() {
        let dir = tempdir().unwrap();
        let paths = StorePaths::in_dir(dir.path().join("data"));
        let store = Store::open(&paths);

        assert_eq!(store.ensure_files().unwrap().len(), 4);
        assert_eq!(std::fs::read_to_string(&paths.employees).unwrap(), "{}");
        assert_eq!(std::fs::read_to_string(&paths.formulas).unwrap(), "[]");
        assert!(store.ensure_files().unwrap().is_empty());
    }
}
