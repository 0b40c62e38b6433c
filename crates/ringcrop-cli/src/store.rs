//! File-backed collaborators for the cropper.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ringcrop_core::error::{CropperError, Result};
use ringcrop_core::settings::{CropSettings, ImageSink, SettingsStore};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    crops: BTreeMap<String, CropSettings>,
}

/// Crop settings kept in one TOML document, keyed by source id.
///
/// Every change is written through to disk immediately.
pub struct TomlSettingsStore {
    path: PathBuf,
    file: StoreFile,
}

impl TomlSettingsStore {
    /// Load the store at `path`; a missing file is an empty store.
    pub fn open(path: &Path) -> Result<Self> {
        let file = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str(&contents).map_err(|e| {
                CropperError::Store(format!("{}: {}", path.display(), e))
            })?
        } else {
            StoreFile::default()
        };
        debug!(path = %path.display(), entries = file.crops.len(), "Opened settings store");
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn len(&self) -> usize {
        self.file.crops.len()
    }

    fn flush(&self) -> Result<()> {
        let contents = toml::to_string_pretty(&self.file)
            .map_err(|e| CropperError::Store(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl SettingsStore for TomlSettingsStore {
    fn load(&self, source_id: &str) -> Result<Option<CropSettings>> {
        Ok(self.file.crops.get(source_id).cloned())
    }

    fn persist(&mut self, source_id: &str, settings: &CropSettings) -> Result<()> {
        self.file.crops.insert(source_id.to_owned(), settings.clone());
        self.flush()
    }

    fn remove(&mut self, source_id: &str) -> Result<()> {
        if self.file.crops.remove(source_id).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Writes committed PNGs to a fixed output path.
pub struct FileImageSink {
    path: PathBuf,
}

impl FileImageSink {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl ImageSink for FileImageSink {
    fn save(&mut self, png: &[u8]) -> Result<String> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, png)?;
        Ok(self.path.display().to_string())
    }
}
