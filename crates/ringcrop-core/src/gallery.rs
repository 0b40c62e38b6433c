//! Previously saved originals available for re-editing.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, info};

use crate::consts::SUPPORTED_EXTENSIONS;
use crate::error::Result;
use crate::settings::{CropSettings, SettingsStore};

/// One image in the gallery.
#[derive(Clone, Debug, PartialEq)]
pub struct GalleryEntry {
    pub path: PathBuf,
    pub modified: SystemTime,
}

impl GalleryEntry {
    /// Key used for this entry in the settings store.
    pub fn source_id(&self) -> String {
        source_id_for(&self.path)
    }

    /// Whether this entry is the source currently open in an editor.
    pub fn matches_source(&self, source_id: Option<&str>) -> bool {
        source_id.is_some_and(|id| id == self.source_id())
    }
}

/// Settings-store key for an image path.
pub fn source_id_for(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Case-insensitive check against the supported extensions.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
}

/// List supported images in `dir`, newest first (path order breaks ties).
pub fn list_available(dir: &Path) -> Result<Vec<GalleryEntry>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || !is_supported_image(&path) {
            continue;
        }
        let modified = entry.metadata()?.modified()?;
        entries.push(GalleryEntry { path, modified });
    }

    entries.sort_by(|a, b| b.modified.cmp(&a.modified).then_with(|| a.path.cmp(&b.path)));
    debug!(dir = %dir.display(), count = entries.len(), "Listed gallery");
    Ok(entries)
}

/// Saved crop settings for an original, if any.
pub fn load_settings_for<S: SettingsStore + ?Sized>(
    store: &S,
    path: &Path,
) -> Result<Option<CropSettings>> {
    store.load(&source_id_for(path))
}

/// Delete an original and its saved settings. Returns the removed source id so
/// the caller can reset an editor that still has it open.
pub fn remove_entry<S: SettingsStore + ?Sized>(store: &mut S, path: &Path) -> Result<String> {
    let source_id = source_id_for(path);
    std::fs::remove_file(path)?;
    store.remove(&source_id)?;
    info!(%source_id, "Removed gallery entry");
    Ok(source_id)
}
