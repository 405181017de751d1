use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::errors::StoreError;

/// One JSON document on disk with an empty default.
///
/// Reads never fail on content: a missing file is created with `T::default()`
/// and an undecodable one is treated as empty. Writes replace the whole file
/// through a rename so readers never observe a half-written document.
#[derive(Debug, Clone)]
pub struct JsonFile<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

/// Outcome of reading the file from disk.
enum Loaded<T> {
    Parsed(T),
    Created(T),
    Corrupt(T),
}

impl<T> Loaded<T> {
    fn into_inner(self) -> T {
        match self {
            Loaded::Parsed(v) | Loaded::Created(v) | Loaded::Corrupt(v) => v,
        }
    }
}

impl<T> JsonFile<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file with its default content if it does not exist.
    /// Returns `true` when the file was created.
    /// Creation happens under the writer lock.
    pub fn ensure_exists(&self) -> Result<bool, StoreError> {
        if self.path.exists() {
            return Ok(false);
        }
        let lock = self.lock()?;
        let created = !self.path.exists();
        if created {
            self.save(&T::default())?;
            debug!(path = %self.path.display(), "created empty store file");
        }
        let _ = FileExt::unlock(&lock);
        Ok(created)
    }

    /// Read the document, recovering to the default on missing or corrupt files.
    pub fn load(&self) -> Result<T, StoreError> {
        if let Some(loaded) = self.read()? {
            return Ok(loaded.into_inner());
        }
        self.ensure_exists()?;
        Ok(self.read()?.map_or_else(T::default, Loaded::into_inner))
    }

    /// `None` when the file does not exist.
    fn read(&self) -> Result<Option<Loaded<T>>, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(value) => Ok(Some(Loaded::Parsed(value))),
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        error = %e,
                        "store file is not valid JSON for its record type, using empty default"
                    );
                    Ok(Some(Loaded::Corrupt(T::default())))
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }

    /// Serialize with 4-space indentation and atomically replace the file.
    pub fn save(&self, value: &T) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut ser).map_err(|e| StoreError::Serialize {
            path: self.path.clone(),
            source: e,
        })?;

        let tmp = self.sibling(&format!("{}.tmp", std::process::id()));
        fs::write(&tmp, &buf).map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }

    /// Load, mutate and save while holding an exclusive lock on `<file>.lock`.
    ///
    /// The file is only rewritten when `f` returns `Ok`. If the current content
    /// could not be decoded it is copied to `<file>.corrupt-<timestamp>` before
    /// being replaced.
    pub fn update<R, E>(&self, f: impl FnOnce(&mut T) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        let lock = self.lock()?;

        let loaded = self
            .read()?
            .unwrap_or_else(|| Loaded::Created(T::default()));
        let corrupt = matches!(loaded, Loaded::Corrupt(_));
        let mut value = loaded.into_inner();
        let result = f(&mut value)?;

        if corrupt {
            let backup = self.sibling(&format!(
                "corrupt-{}",
                chrono::Local::now().format("%Y%m%d%H%M%S")
            ));
            fs::copy(&self.path, &backup).map_err(|e| StoreError::io(&backup, e))?;
            warn!(backup = %backup.display(), "kept unreadable store file before overwriting it");
        }
        self.save(&value)?;

        // Closing the handle releases the lock as well.
        let _ = FileExt::unlock(&lock);
        Ok(result)
    }

    fn lock(&self) -> Result<File, StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        let lock_path = self.sibling("lock");
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| StoreError::io(&lock_path, e))?;
        FileExt::lock_exclusive(&file).map_err(|e| StoreError::Lock {
            path: lock_path,
            source: e,
        })?;
        Ok(file)
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".");
        name.push(suffix);
        self.path.with_file_name(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_created_with_default() {
        let dir = tempdir().unwrap();
        let file: JsonFile<Vec<String>> = JsonFile::new(dir.path().join("data/tipos_erro.json"));
        assert!(file.load().unwrap().is_empty());
        assert_eq!(fs::read_to_string(file.path()).unwrap(), "[]");
    }

    #[test]
    fn corrupt_file_recovers_to_default_without_touching_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("funcionarios.json");
        fs::write(&path, "{ not json").unwrap();
        let file: JsonFile<BTreeMap<String, String>> = JsonFile::new(&path);
        assert!(file.load().unwrap().is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn wrong_top_level_shape_is_treated_as_corrupt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tipos_erro.json");
        fs::write(&path, r#"{"Rótulo": true}"#).unwrap();
        let file: JsonFile<Vec<String>> = JsonFile::new(&path);
        assert!(file.load().unwrap().is_empty());
    }

    #[test]
    fn save_uses_four_space_indent_and_keeps_accents() {
        let dir = tempdir().unwrap();
        let file: JsonFile<Vec<String>> = JsonFile::new(dir.path().join("t.json"));
        file.save(&vec!["Cápsulas".to_string()]).unwrap();
        let text = fs::read_to_string(file.path()).unwrap();
        assert_eq!(text, "[\n    \"Cápsulas\"\n]");
    }

    #[test]
    fn update_persists_only_on_success() {
        let dir = tempdir().unwrap();
        let file: JsonFile<Vec<u32>> = JsonFile::new(dir.path().join("n.json"));
        file.update(|v| {
            v.push(1);
            Ok::<_, StoreError>(())
        })
        .unwrap();
        let failed: Result<(), StoreError> = file.update(|v| {
            v.push(2);
            Err(StoreError::EmptyName { what: "Name" })
        });
        assert!(failed.is_err());
        assert_eq!(file.load().unwrap(), vec![1]);
    }

    #[test]
    fn update_backs_up_corrupt_content_before_overwriting() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("formulas.json");
        fs::write(&path, "[{\"broken\": ").unwrap();
        let file: JsonFile<Vec<u32>> = JsonFile::new(&path);
        file.update(|v| {
            v.push(7);
            Ok::<_, StoreError>(())
        })
        .unwrap();
        assert_eq!(file.load().unwrap(), vec![7]);
        let backups: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".corrupt-"))
            .collect();
        assert_eq!(backups.len(), 1);
        assert_eq!(
            fs::read_to_string(backups[0].path()).unwrap(),
            "[{\"broken\": "
        );
    }

    #[test]
    fn concurrent_writers_do_not_lose_updates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("n.json");
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let file: JsonFile<Vec<u32>> = JsonFile::new(path);
                    for i in 0..25 {
                        file.update(|v| {
                            v.push(worker * 100 + i);
                            Ok::<_, StoreError>(())
                        })
                        .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let file: JsonFile<Vec<u32>> = JsonFile::new(&path);
        assert_eq!(file.load().unwrap().len(), 200);
    }

    #[test]
    fn load_waits_for_a_writer_creating_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tipos_erro.json");
        let file: JsonFile<Vec<String>> = JsonFile::new(&path);
        let lock = file.lock().unwrap();

        let reader = {
            let path = path.clone();
            std::thread::spawn(move || JsonFile::<Vec<String>>::new(path).load().unwrap())
        };
        std::thread::sleep(std::time::Duration::from_millis(100));
        file.save(&vec!["Rótulo".to_string()]).unwrap();
        FileExt::unlock(&lock).unwrap();
        drop(lock);

        assert_eq!(reader.join().unwrap(), vec!["Rótulo"]);
        assert_eq!(file.load().unwrap(), vec!["Rótulo"]);
    }
}
