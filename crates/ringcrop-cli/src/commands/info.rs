use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use ringcrop_core::config::CropLimits;
use ringcrop_core::gallery::load_settings_for;
use ringcrop_core::geometry::{default_crop, fit_to_container, max_crop_size, Size};
use ringcrop_core::render::decode_file;

use super::parse_size;
use crate::store::TomlSettingsStore;

#[derive(Args)]
pub struct InfoArgs {
    /// Input image
    pub file: PathBuf,

    /// Editor container size, WIDTHxHEIGHT in display pixels
    #[arg(long, default_value = "800x800", value_parser = parse_size)]
    pub container: Size,

    /// Settings store to look up a saved crop in (TOML)
    #[arg(long)]
    pub store: Option<PathBuf>,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let image = decode_file(&args.file)
        .with_context(|| format!("Failed to decode {}", args.file.display()))?;
    let source = Size::from_pixels(image.width(), image.height());

    println!("File:        {}", args.file.display());
    println!("Dimensions:  {}x{} (oriented)", image.width(), image.height());
    println!("Color:       {:?}", image.color());

    let limits = CropLimits::default();
    if let Some(metrics) = fit_to_container(args.container, source) {
        let crop = default_crop(&metrics, &limits);
        println!(
            "Display:     {:.1}x{:.1} at ({:.1}, {:.1})",
            metrics.display_size.width,
            metrics.display_size.height,
            metrics.display_offset.x,
            metrics.display_offset.y
        );
        println!(
            "Crop range:  {:.0}-{:.0} px, default {:.0}",
            limits.min_size,
            max_crop_size(metrics.display_size, &limits),
            crop.width
        );
    }

    if let Some(ref store_path) = args.store {
        let store = TomlSettingsStore::open(store_path)?;
        match load_settings_for(&store, &args.file)? {
            Some(s) => println!(
                "Saved crop:  {:.0}px at ({:.1}, {:.1}), {:.1}°, {} quarter turn(s)",
                s.width, s.x, s.y, s.rotation_angle, s.quarter_turns
            ),
            None => println!("Saved crop:  none"),
        }
    }

    Ok(())
}
