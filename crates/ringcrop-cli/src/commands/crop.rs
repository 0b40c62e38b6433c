use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use ringcrop_core::editor::{Cropper, RotationDirection};
use ringcrop_core::geometry::{angle_of_point, rotate_handle_position, GestureKind, Point, Size};
use ringcrop_core::render::{encode_png, ImageInput, RenderQuality};
use ringcrop_core::settings::{ImageSink, SettingsStore};
use ringcrop_core::worker::RenderWorker;

use super::{commit_on_worker, load_config, open_on_worker, parse_size, spinner, DEFAULT_STORE};
use crate::store::{FileImageSink, TomlSettingsStore};
use crate::summary::print_crop_summary;

/// Parse a `DX,DY` pointer offset.
fn parse_offset(s: &str) -> std::result::Result<(f64, f64), String> {
    let (dx, dy) = s
        .split_once(',')
        .ok_or_else(|| format!("expected DX,DY, got '{s}'"))?;
    let dx = dx.trim().parse().map_err(|_| format!("invalid offset '{dx}'"))?;
    let dy = dy.trim().parse().map_err(|_| format!("invalid offset '{dy}'"))?;
    Ok((dx, dy))
}

#[derive(Args)]
pub struct CropArgs {
    /// Input image (jpg, png, bmp, gif)
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

    /// Ignore any saved crop for this image
    #[arg(long)]
    pub reset: bool,

    /// Quarter turns to apply to the source (negative turns counter-clockwise)
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub turns: i32,

    /// Drag the selection by DX,DY display pixels
    #[arg(long = "move", value_parser = parse_offset, allow_hyphen_values = true)]
    pub offset: Option<(f64, f64)>,

    /// Resize the selection by dragging its ring outward (>1) or inward (<1)
    #[arg(long)]
    pub scale: Option<f64>,

    /// Rotate the selection with its corner handle, in degrees clockwise
    #[arg(long, allow_hyphen_values = true)]
    pub rotate: Option<f64>,

    /// Also write the final high-quality preview to this path
    #[arg(long)]
    pub preview: Option<PathBuf>,
}

pub fn run(args: &CropArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut store = TomlSettingsStore::open(&args.store)
        .with_context(|| format!("Failed to open settings store {}", args.store.display()))?;
    let input = ImageInput::from_path(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    if args.reset {
        store.remove(&input.source_id)?;
    }

    let mut cropper = Cropper::new(config, store, FileImageSink::new(&args.output));
    let worker = RenderWorker::spawn()?;
    let pb = spinner("Starting")?;

    open_on_worker(&mut cropper, &worker, input, args.container, &pb)?;
    apply_turns(&mut cropper, args.turns)?;
    if let Some((dx, dy)) = args.offset {
        drag(&mut cropper, dx, dy)?;
    }
    if let Some(scale) = args.scale {
        resize(&mut cropper, scale)?;
    }
    if let Some(degrees) = args.rotate {
        rotate(&mut cropper, degrees)?;
    }

    if let Some(ref path) = args.preview {
        let frame = cropper
            .preview(RenderQuality::High)
            .context("Nothing to preview: no renderable crop selection")?;
        std::fs::write(path, encode_png(&frame.image)?)
            .with_context(|| format!("Failed to write preview to {}", path.display()))?;
    }

    let outcome = commit_on_worker(&mut cropper, &worker, &pb)?;
    pb.finish_and_clear();

    print_crop_summary(&args.file, &outcome, cropper.session());
    Ok(())
}

fn apply_turns<S: SettingsStore, K: ImageSink>(
    cropper: &mut Cropper<S, K>,
    turns: i32,
) -> Result<()> {
    let direction = if turns >= 0 {
        RotationDirection::Clockwise
    } else {
        RotationDirection::CounterClockwise
    };
    for _ in 0..turns.unsigned_abs() % 4 {
        cropper.rotate_by_90(direction)?;
    }
    Ok(())
}

fn gesture<S: SettingsStore, K: ImageSink>(
    cropper: &mut Cropper<S, K>,
    expected: GestureKind,
    press: Point,
    release: Point,
) -> Result<()> {
    match cropper.on_pointer_down(press) {
        Some(kind) if kind == expected => {}
        other => bail!("Expected a {expected:?} gesture at ({:.1}, {:.1}), got {other:?}", press.x, press.y),
    }
    cropper.on_pointer_move(release);
    cropper.on_pointer_up();
    Ok(())
}

fn drag<S: SettingsStore, K: ImageSink>(cropper: &mut Cropper<S, K>, dx: f64, dy: f64) -> Result<()> {
    let center = cropper.session().rect().center();
    gesture(cropper, GestureKind::Move, center, center.offset(dx, dy))
}

/// Press on the ring opposite the rotation handle and pull radially.
fn resize<S: SettingsStore, K: ImageSink>(cropper: &mut Cropper<S, K>, scale: f64) -> Result<()> {
    if !(scale.is_finite() && scale > 0.0) {
        bail!("Scale must be a positive number, got {scale}");
    }
    let rect = cropper.session().rect();
    let center = rect.center();
    let angle = (cropper.session().rotation() + 135.0).to_radians();
    let (sin, cos) = angle.sin_cos();
    let radius = rect.radius();

    let press = center.offset(radius * cos, radius * sin);
    let release = center.offset(radius * scale * cos, radius * scale * sin);
    gesture(cropper, GestureKind::Resize, press, release)
}

/// Grab the corner handle and swing it around the center.
fn rotate<S: SettingsStore, K: ImageSink>(cropper: &mut Cropper<S, K>, degrees: f64) -> Result<()> {
    let rect = cropper.session().rect();
    let center = rect.center();
    let handle = rotate_handle_position(&rect, cropper.session().rotation());
    let distance = center.distance_to(handle);
    let angle = (angle_of_point(center, handle) + degrees).to_radians();
    let (sin, cos) = angle.sin_cos();

    gesture(
        cropper,
        GestureKind::Rotate,
        handle,
        center.offset(distance * cos, distance * sin),
    )
}
