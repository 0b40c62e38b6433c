pub mod config;
pub mod crop;
pub mod gallery;
pub mod info;
pub mod rerender;

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use ringcrop_core::config::CropperConfig;
use ringcrop_core::editor::{CommitOutcome, CropEvent, Cropper};
use ringcrop_core::geometry::Size;
use ringcrop_core::render::ImageInput;
use ringcrop_core::settings::{ImageSink, SettingsStore};
use ringcrop_core::worker::{RenderWorker, WorkerCommand, WorkerResult};

/// Default settings store shared by `crop`, `rerender` and `gallery`.
pub const DEFAULT_STORE: &str = "ringcrop-crops.toml";

/// Parse a `WIDTHxHEIGHT` container size.
pub fn parse_size(s: &str) -> std::result::Result<Size, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let width: f64 = w.trim().parse().map_err(|_| format!("invalid width '{w}'"))?;
    let height: f64 = h.trim().parse().map_err(|_| format!("invalid height '{h}'"))?;
    if !(width > 0.0 && height > 0.0) {
        return Err(format!("container must be positive, got '{s}'"));
    }
    Ok(Size::new(width, height))
}

/// Read a cropper config from TOML, or fall back to the defaults.
pub fn load_config(path: Option<&Path>) -> Result<CropperConfig> {
    let Some(path) = path else {
        return Ok(CropperConfig::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&contents).context("Invalid cropper config")
}

pub fn spinner(message: &'static str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    pb.set_message(message);
    Ok(pb)
}

fn wait_for_result(worker: &RenderWorker, pb: &ProgressBar) -> Result<WorkerResult> {
    loop {
        if let Some(result) = worker.recv_timeout(Duration::from_millis(80))? {
            return Ok(result);
        }
        pb.tick();
    }
}

/// Decode `input` on the worker thread and open it in `cropper`.
pub fn open_on_worker<S: SettingsStore, K: ImageSink>(
    cropper: &mut Cropper<S, K>,
    worker: &RenderWorker,
    input: ImageInput,
    container: Size,
    pb: &ProgressBar,
) -> Result<()> {
    let path = input.source_id.clone();
    pb.set_message("Decoding");
    worker.submit(WorkerCommand::Decode { input })?;

    match wait_for_result(worker, pb)? {
        WorkerResult::Decoded { source_id, image } => {
            cropper.open_decoded(source_id, image, container)?;
            Ok(())
        }
        WorkerResult::Error { error, .. } => {
            Err(error).with_context(|| format!("Failed to open {path}"))
        }
        WorkerResult::Rendered(_) => bail!("Render worker returned a commit while decoding"),
    }
}

/// Render the current crop on the worker thread, then save and persist it.
pub fn commit_on_worker<S: SettingsStore, K: ImageSink>(
    cropper: &mut Cropper<S, K>,
    worker: &RenderWorker,
    pb: &ProgressBar,
) -> Result<CommitOutcome> {
    let job = cropper
        .prepare_commit()
        .context("Nothing to commit: no renderable crop selection")?;
    pb.set_message("Rendering");
    worker.submit(WorkerCommand::Commit { job })?;

    let rendered = match wait_for_result(worker, pb)? {
        WorkerResult::Rendered(rendered) => rendered,
        WorkerResult::Error { error, .. } => return Err(error).context("Commit render failed"),
        WorkerResult::Decoded { .. } => bail!("Render worker returned a decode while committing"),
    };

    pb.set_message("Saving");
    match cropper.finish_commit(rendered).context("Failed to save profile image")? {
        CropEvent::Committed(outcome) => Ok(outcome),
        CropEvent::Cancelled => bail!("Commit was cancelled"),
    }
}
