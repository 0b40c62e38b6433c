use std::path::PathBuf;
use std::time::SystemTime;

use anyhow::{Context, Result};
use clap::Args;
use console::Style;
use ringcrop_core::gallery::{list_available, load_settings_for, remove_entry};

use super::DEFAULT_STORE;
use crate::store::TomlSettingsStore;

#[derive(Args)]
pub struct GalleryArgs {
    /// Directory of originals
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Settings store (TOML)
    #[arg(long, default_value = DEFAULT_STORE)]
    pub store: PathBuf,

    /// Delete this original and its saved crop
    #[arg(long)]
    pub remove: Option<PathBuf>,
}

pub fn run(args: &GalleryArgs) -> Result<()> {
    let mut store = TomlSettingsStore::open(&args.store)
        .with_context(|| format!("Failed to open settings store {}", args.store.display()))?;

    if let Some(ref path) = args.remove {
        let source_id = remove_entry(&mut store, path)
            .with_context(|| format!("Failed to remove {}", path.display()))?;
        println!("Removed {}", source_id);
        return Ok(());
    }

    let entries = list_available(&args.dir)
        .with_context(|| format!("Failed to list {}", args.dir.display()))?;
    if entries.is_empty() {
        println!("No images in {}", args.dir.display());
        return Ok(());
    }

    let label = Style::new().dim();
    let saved = Style::new().green();
    let path_style = Style::new().underlined();
    let now = SystemTime::now();

    for entry in &entries {
        let age = now
            .duration_since(entry.modified)
            .map(|d| format_age(d.as_secs()))
            .unwrap_or_else(|_| "just now".into());
        let status = match load_settings_for(&store, &entry.path)? {
            Some(s) => saved
                .apply_to(format!("cropped {:.0}px @ {:.1}°", s.width, s.rotation_angle))
                .to_string(),
            None => label.apply_to("not cropped").to_string(),
        };
        println!(
            "  {:<10} {}  {}",
            label.apply_to(age),
            path_style.apply_to(entry.path.display()),
            status
        );
    }
    println!();
    println!("{} image(s)", entries.len());

    Ok(())
}

fn format_age(secs: u64) -> String {
    match secs {
        0..=59 => format!("{}s ago", secs),
        60..=3599 => format!("{}m ago", secs / 60),
        3600..=86_399 => format!("{}h ago", secs / 3600),
        _ => format!("{}d ago", secs / 86_400),
    }
}
