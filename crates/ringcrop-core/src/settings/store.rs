use std::collections::HashMap;

use crate::error::{CropperError, Result};

use super::CropSettings;

/// Keyed persistence for crop settings. Source ids are opaque strings.
pub trait SettingsStore {
    fn load(&self, source_id: &str) -> Result<Option<CropSettings>>;
    fn persist(&mut self, source_id: &str, settings: &CropSettings) -> Result<()>;
    fn remove(&mut self, source_id: &str) -> Result<()>;
}

/// Destination for committed PNG bytes. Returns an opaque storage path.
pub trait ImageSink {
    fn save(&mut self, png: &[u8]) -> Result<String>;
}

/// In-memory settings store.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    entries: HashMap<String, CropSettings>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self, source_id: &str) -> Result<Option<CropSettings>> {
        Ok(self.entries.get(source_id).cloned())
    }

    fn persist(&mut self, source_id: &str, settings: &CropSettings) -> Result<()> {
        self.entries.insert(source_id.to_owned(), settings.clone());
        Ok(())
    }

    fn remove(&mut self, source_id: &str) -> Result<()> {
        self.entries.remove(source_id);
        Ok(())
    }
}

/// In-memory image sink. Can be told to fail, to exercise commit error paths.
#[derive(Debug, Default)]
pub struct MemoryImageSink {
    saved: Vec<Vec<u8>>,
    fail: bool,
}

impl MemoryImageSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every save fails with an I/O error.
    pub fn failing() -> Self {
        Self {
            saved: Vec::new(),
            fail: true,
        }
    }

    pub fn set_failing(&mut self, fail: bool) {
        self.fail = fail;
    }

    pub fn saved(&self) -> &[Vec<u8>] {
        &self.saved
    }
}

impl ImageSink for MemoryImageSink {
    fn save(&mut self, png: &[u8]) -> Result<String> {
        if self.fail {
            return Err(CropperError::Io(std::io::Error::other("sink unavailable")));
        }
        self.saved.push(png.to_vec());
        Ok(format!("memory://{}", self.saved.len() - 1))
    }
}
