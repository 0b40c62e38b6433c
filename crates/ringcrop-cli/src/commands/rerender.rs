use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use ringcrop_core::editor::Cropper;
use ringcrop_core::gallery::load_settings_for;
use ringcrop_core::geometry::Size;
use ringcrop_core::render::ImageInput;
use ringcrop_core::worker::RenderWorker;

use super::{commit_on_worker, load_config, open_on_worker, parse_size, spinner, DEFAULT_STORE};
use crate::store::{FileImageSink, TomlSettingsStore};
use crate::summary::print_crop_summary;

#[derive(Args)]
pub struct RerenderArgs {
    /// Original image with a saved crop
    pub file: PathBuf,

    /// Output PNG path
    #[arg(short, long, default_value = "profile.png")]
    pub output: PathBuf,

    /// Editor container size, WIDTHxHEIGHT in display pixels
    #[arg(long, default_value = "800x800", value_parser = parse_size)]
    pub container: Size,

    /// Settings store (TOML)
    #[arg(long, default_value = DEFAULT_STORE)]
    pub store: PathBuf,

    /// Cropper config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Re-open an original with its saved selection and commit it unchanged.
pub fn run(args: &RerenderArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let store = TomlSettingsStore::open(&args.store)
        .with_context(|| format!("Failed to open settings store {}", args.store.display()))?;
    if load_settings_for(&store, &args.file)?.is_none() {
        bail!(
            "No saved crop for {} in {}",
            args.file.display(),
            args.store.display()
        );
    }

    let input = ImageInput::from_path(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let mut cropper = Cropper::new(config, store, FileImageSink::new(&args.output));
    let worker = RenderWorker::spawn()?;
    let pb = spinner("Starting")?;

    open_on_worker(&mut cropper, &worker, input, args.container, &pb)?;
    let outcome = commit_on_worker(&mut cropper, &worker, &pb)?;
    pb.finish_and_clear();

    print_crop_summary(&args.file, &outcome, cropper.session());
    Ok(())
}
