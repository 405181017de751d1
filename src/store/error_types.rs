use std::path::PathBuf;

use tracing::info;

use super::json_file::JsonFile;
use crate::errors::StoreError;

/// Controlled vocabulary of error types: a JSON array of unique strings.
#[derive(Debug, Clone)]
pub struct ErrorTypeStore {
    file: JsonFile<Vec<String>>,
}

impl ErrorTypeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: JsonFile::new(path),
        }
    }

    pub fn file(&self) -> &JsonFile<Vec<String>> {
        &self.file
    }

    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        self.file.load()
    }

    pub fn add(&self, name: &str) -> Result<(), StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName { what: "Error type" });
        }
        self.file.update(|types| {
            if types.iter().any(|t| t == name) {
                return Err(StoreError::ErrorTypeExists {
                    name: name.to_string(),
                });
            }
            types.push(name.to_string());
            Ok(())
        })?;
        info!(error_type = name, "error type added");
        Ok(())
    }

    pub fn remove(&self, name: &str) -> Result<(), StoreError> {
        let name = name.trim();
        self.file.update(|types| {
            let idx = types
                .iter()
                .position(|t| t == name)
                .ok_or_else(|| StoreError::ErrorTypeNotFound {
                    name: name.to_string(),
                })?;
            types.remove(idx);
            Ok::<_, StoreError>(())
        })?;
        info!(error_type = name, "error type removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn vocabulary_keeps_insertion_order_and_rejects_duplicates() {
        let dir = tempdir().unwrap();
        let store = ErrorTypeStore::new(dir.path().join("tipos_erro.json"));
        store.add("Rótulo").unwrap();
        store.add("Pesagem").unwrap();
        assert!(matches!(
            store.add(" Rótulo ").unwrap_err(),
            StoreError::ErrorTypeExists { .. }
        ));
        assert_eq!(store.list().unwrap(), vec!["Rótulo", "Pesagem"]);
    }

    #[test]
    fn remove_unknown_type_is_not_found() {
        let dir = tempdir().unwrap();
        let store = ErrorTypeStore::new(dir.path().join("tipos_erro.json"));
        store.add("Rótulo").unwrap();
        assert!(store.remove("Embalagem").unwrap_err().is_not_found());
        store.remove("Rótulo").unwrap();
        assert!(store.list().unwrap().is_empty());
    }
}
