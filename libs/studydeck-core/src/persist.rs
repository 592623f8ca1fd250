//! Persistence collaborators for the class hierarchy.
//!
//! The whole tree is loaded once and saved after every mutation. Records
//! are stored as a versioned nested document (class → topics → flashcards).

use crate::error::PersistError;
use crate::types::ClassEntity;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Current version of the persisted document.
pub const SCHEMA_VERSION: u32 = 1;

/// Load/save contract over the full hierarchy.
pub trait Persistence: Send {
    /// Load the stored hierarchy. An absent store yields an empty list.
    fn load(&self) -> Result<Vec<ClassEntity>, PersistError>;

    /// Replace the stored hierarchy.
    fn save(&self, classes: &[ClassEntity]) -> Result<(), PersistError>;
}

#[derive(Serialize)]
struct DocumentRef<'a> {
    version: u32,
    classes: &'a [ClassEntity],
}

#[derive(Deserialize)]
struct Document {
    version: u32,
    classes: Vec<ClassEntity>,
}

/// Serialize the hierarchy as a versioned JSON document.
pub fn to_json(classes: &[ClassEntity]) -> Result<String, PersistError> {
    let doc = DocumentRef {
        version: SCHEMA_VERSION,
        classes,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Parse a versioned JSON document.
pub fn from_json(json: &str) -> Result<Vec<ClassEntity>, PersistError> {
    let doc: Document = serde_json::from_str(json)?;
    if doc.version != SCHEMA_VERSION {
        return Err(PersistError::UnsupportedVersion(doc.version));
    }
    Ok(doc.classes)
}

/// In-memory store holding the serialized document.
///
/// Clones share the same buffer, so a test can keep a handle and inspect
/// what the card store saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    document: Arc<Mutex<Option<String>>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with an existing document.
    pub fn with_document(json: impl Into<String>) -> Self {
        Self {
            document: Arc::new(Mutex::new(Some(json.into()))),
        }
    }

    /// Raw document as last saved.
    pub fn document(&self) -> Option<String> {
        self.document.lock().ok().and_then(|doc| doc.clone())
    }
}

impl Persistence for MemoryPersistence {
    fn load(&self) -> Result<Vec<ClassEntity>, PersistError> {
        match self.document() {
            Some(json) => from_json(&json),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, classes: &[ClassEntity]) -> Result<(), PersistError> {
        let json = to_json(classes)?;
        let mut doc = self
            .document
            .lock()
            .map_err(|e| PersistError::Backend(e.to_string().into()))?;
        *doc = Some(json);
        Ok(())
    }
}

/// JSON file store. Writes are atomic via temp file + rename.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Persistence for JsonFilePersistence {
    fn load(&self) -> Result<Vec<ClassEntity>, PersistError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let json = fs::read_to_string(&self.path)?;
        from_json(&json)
    }

    fn save(&self, classes: &[ClassEntity]) -> Result<(), PersistError> {
        let json = to_json(classes)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }
}
