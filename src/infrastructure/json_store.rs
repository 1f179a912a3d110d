use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::document::Document;
use crate::domain::errors::DomainError;
use crate::domain::ports::DocumentStore;

/// Document store backed by one pretty-printed JSON file.
///
/// Writes go to a sibling temp file that is then renamed over the target, so
/// readers never see a half-written document. Clones share one lock, which
/// serialises `transaction` calls inside this process. Other processes
/// writing the same file are not coordinated: the last save wins.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: Arc<PathBuf>,
    lock: Arc<Mutex<()>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the seeded document if no file exists yet. Returns whether a
    /// new file was created.
    pub fn initialize(&self) -> Result<bool, DomainError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        if self.path.exists() {
            return Ok(false);
        }
        self.write(&Document::seeded())?;
        log::info!("Initialised data file at {}", self.path.display());
        Ok(true)
    }

    fn read(&self) -> Result<Document, DomainError> {
        if !self.path.exists() {
            let doc = Document::seeded();
            self.write(&doc)?;
            log::info!("Created data file at {}", self.path.display());
            return Ok(doc);
        }
        let bytes = fs::read(self.path.as_path())?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn write(&self, doc: &Document) -> Result<(), DomainError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(doc)?)?;
        fs::rename(&tmp, self.path.as_path())?;
        Ok(())
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> Result<Document, DomainError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.read().inspect_err(|e| log::error!("Failed to load data file: {e}"))
    }

    fn save(&self, doc: &Document) -> Result<(), DomainError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.write(doc)
            .inspect_err(|e| log::error!("Failed to save data file: {e}"))
    }

    fn transaction<T, F>(&self, f: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut Document) -> Result<T, DomainError>,
    {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut doc = self
            .read()
            .inspect_err(|e| log::error!("Failed to load data file: {e}"))?;
        let out = f(&mut doc)?;
        self.write(&doc)
            .inspect_err(|e| log::error!("Failed to save data file: {e}"))?;
        Ok(out)
    }
}
