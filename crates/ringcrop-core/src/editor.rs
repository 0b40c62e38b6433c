//! Editing facade: one crop session plus the bitmaps and collaborators it needs.

use std::sync::Arc;
use std::time::Instant;

use image::{DynamicImage, RgbaImage};
use tracing::{debug, info, warn};

use crate::config::CropperConfig;
use crate::error::{CropperError, Result};
use crate::geometry::{GestureKind, Point, Rect, Size};
use crate::render::{
    decode_with_orientation, display_copy, downscale_if_oversized, encode_png, render_crop,
    rotate_by_90_multiple, ImageInput, RenderQuality,
};
use crate::session::{CropSession, PreviewThrottle};
use crate::settings::{CropSettings, ImageSink, SettingsStore};

/// Direction of a lossless quarter turn of the source image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    fn degrees(self) -> i32 {
        match self {
            Self::Clockwise => 90,
            Self::CounterClockwise => -90,
        }
    }

    fn quarter_turns(self) -> u8 {
        match self {
            Self::Clockwise => 1,
            Self::CounterClockwise => 3,
        }
    }
}

/// A rendered live preview.
#[derive(Clone, Debug)]
pub struct PreviewFrame {
    pub image: RgbaImage,
    pub quality: RenderQuality,
}

/// Everything a commit render needs, detached from the editor so it can run on
/// another thread.
#[derive(Clone, Debug)]
pub struct CommitJob {
    pub source_id: String,
    pub source: Arc<RgbaImage>,
    pub crop: Rect,
    pub rotation: f64,
    pub output_size: u32,
    pub settings: CropSettings,
}

/// Output of [`CommitJob::run`]: encoded PNG ready to hand to the sink.
#[derive(Clone, Debug)]
pub struct RenderedCommit {
    pub source_id: String,
    pub png: Vec<u8>,
    pub settings: CropSettings,
}

impl CommitJob {
    /// Render the full-quality circular crop and encode it.
    pub fn run(&self) -> Result<RenderedCommit> {
        let started = Instant::now();
        let image = render_crop(
            &self.source,
            self.crop,
            self.rotation,
            self.output_size,
            RenderQuality::High,
        )
        .ok_or_else(|| {
            CropperError::InvalidCrop(format!(
                "cannot render {:.1}x{:.1} region of {}x{} source",
                self.crop.width,
                self.crop.height,
                self.source.width(),
                self.source.height()
            ))
        })?;
        let png = encode_png(&image)?;

        debug!(
            source_id = %self.source_id,
            bytes = png.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Commit render finished"
        );
        Ok(RenderedCommit {
            source_id: self.source_id.clone(),
            png,
            settings: self.settings.clone(),
        })
    }
}

/// Payload of a successful commit.
#[derive(Clone, Debug)]
pub struct CommitOutcome {
    pub png: Vec<u8>,
    pub settings: CropSettings,
    pub source_id: String,
    /// Opaque location returned by the image sink.
    pub storage_path: String,
}

/// What the editor reports to its caller when it finishes.
#[derive(Clone, Debug)]
pub enum CropEvent {
    Committed(CommitOutcome),
    Cancelled,
}

struct LoadedImage {
    source_id: String,
    full: Arc<RgbaImage>,
    display: RgbaImage,
    quarter_turns: u8,
}

/// The cropper: owns the session, both bitmaps, the preview throttle and the
/// persistence collaborators.
pub struct Cropper<S: SettingsStore, K: ImageSink> {
    config: CropperConfig,
    session: CropSession,
    image: Option<LoadedImage>,
    container: Size,
    throttle: PreviewThrottle,
    store: S,
    sink: K,
}

impl<S: SettingsStore, K: ImageSink> Cropper<S, K> {
    pub fn new(config: CropperConfig, store: S, sink: K) -> Self {
        let session = CropSession::new(config.limits.clone());
        let throttle = PreviewThrottle::new(config.render.preview_interval());
        Self {
            config,
            session,
            image: None,
            container: Size::default(),
            throttle,
            store,
            sink,
        }
    }

    /// Decode `input` and start a session on it.
    ///
    /// On decode failure the previously loaded image and selection stay as they were.
    pub fn open(&mut self, input: ImageInput, container: Size) -> Result<()> {
        let decoded = decode_with_orientation(&input.bytes, input.path.as_deref()).inspect_err(|e| {
            warn!(source_id = %input.source_id, error = %e, "Failed to decode source image");
        })?;
        self.open_decoded(input.source_id, decoded, container)
    }

    /// Start a session on an already decoded (and oriented) image.
    pub fn open_decoded(
        &mut self,
        source_id: String,
        decoded: DynamicImage,
        container: Size,
    ) -> Result<()> {
        let mut full = downscale_if_oversized(decoded, self.config.render.max_image_size).into_rgba8();

        let saved = match self.store.load(&source_id) {
            Ok(saved) => saved,
            Err(e) => {
                warn!(%source_id, error = %e, "Failed to load saved crop settings");
                None
            }
        };

        let quarter_turns = saved.as_ref().map_or(0, |s| s.quarter_turns % 4);
        if quarter_turns != 0 {
            full = rotate_by_90_multiple(full, quarter_turns as i32 * 90)?;
        }
        let display = display_copy(&full, self.config.render.display_copy_max);
        let source_size = Size::from_pixels(full.width(), full.height());

        info!(
            %source_id,
            width = full.width(),
            height = full.height(),
            restored = saved.is_some(),
            "Opened source image"
        );

        self.image = Some(LoadedImage {
            source_id,
            full: Arc::new(full),
            display,
            quarter_turns,
        });
        self.container = container;
        self.throttle.reset();
        self.session.clear();
        self.session.initialize(container, source_size, saved.as_ref());
        Ok(())
    }

    /// Begin a gesture. No-op without an image.
    pub fn on_pointer_down(&mut self, position: Point) -> Option<GestureKind> {
        self.image.as_ref()?;
        self.session.on_pointer_down(position)
    }

    /// Apply a pointer move; returns a low-quality preview when the throttle admits one.
    pub fn on_pointer_move(&mut self, position: Point) -> Option<PreviewFrame> {
        self.on_pointer_move_at(position, Instant::now())
    }

    /// [`Cropper::on_pointer_move`] with an explicit clock reading.
    pub fn on_pointer_move_at(&mut self, position: Point, now: Instant) -> Option<PreviewFrame> {
        self.image.as_ref()?;
        if !self.session.on_pointer_move(position) {
            return None;
        }
        if !self.throttle.admit(now) {
            return None;
        }
        self.preview(RenderQuality::Low)
    }

    /// End the gesture and render one full-quality preview.
    pub fn on_pointer_up(&mut self) -> Option<PreviewFrame> {
        self.image.as_ref()?;
        if !self.session.on_pointer_up() {
            return None;
        }
        self.throttle.reset();
        self.preview(RenderQuality::High)
    }

    /// Cancel the gesture, keeping what it already changed.
    pub fn on_capture_lost(&mut self) -> bool {
        self.session.on_capture_lost()
    }

    pub fn resize_container(&mut self, container: Size) {
        if self.image.is_none() {
            return;
        }
        self.container = container;
        self.session.on_container_resized(container);
        self.throttle.reset();
    }

    /// Turn the source a quarter and start over with a default selection.
    pub fn rotate_by_90(&mut self, direction: RotationDirection) -> Result<()> {
        let Some(loaded) = self.image.take() else {
            return Ok(());
        };

        let full = Arc::try_unwrap(loaded.full).unwrap_or_else(|shared| (*shared).clone());
        let rotated = rotate_by_90_multiple(full, direction.degrees())?;
        let display = display_copy(&rotated, self.config.render.display_copy_max);
        let source_size = Size::from_pixels(rotated.width(), rotated.height());
        let quarter_turns = (loaded.quarter_turns + direction.quarter_turns()) % 4;

        debug!(?direction, quarter_turns, "Rotated source image");
        self.image = Some(LoadedImage {
            source_id: loaded.source_id,
            full: Arc::new(rotated),
            display,
            quarter_turns,
        });
        self.throttle.reset();
        self.session.initialize(self.container, source_size, None);
        Ok(())
    }

    /// Render a preview from the display-resolution copy. `None` while the
    /// state is not renderable.
    pub fn preview(&self, quality: RenderQuality) -> Option<PreviewFrame> {
        let loaded = self.image.as_ref()?;
        let pixel_size = Size::from_pixels(loaded.display.width(), loaded.display.height());
        let crop = self.session.source_rect(pixel_size)?;
        let image = render_crop(
            &loaded.display,
            crop,
            self.session.rotation(),
            self.config.render.preview_size,
            quality,
        )?;
        Some(PreviewFrame { image, quality })
    }

    /// Current crop as settings, including the applied quarter turns.
    pub fn current_settings(&self) -> Option<CropSettings> {
        let loaded = self.image.as_ref()?;
        self.session
            .settings()
            .map(|s| s.with_quarter_turns(loaded.quarter_turns))
    }

    /// Snapshot the state needed for a full-resolution commit render.
    pub fn prepare_commit(&self) -> Option<CommitJob> {
        let loaded = self.image.as_ref()?;
        let pixel_size = Size::from_pixels(loaded.full.width(), loaded.full.height());
        let crop = self.session.source_rect(pixel_size)?;
        Some(CommitJob {
            source_id: loaded.source_id.clone(),
            source: Arc::clone(&loaded.full),
            crop,
            rotation: self.session.rotation(),
            output_size: self.config.render.output_size,
            settings: self.current_settings()?,
        })
    }

    /// Hand a finished render to the sink and persist its settings.
    ///
    /// Errors leave the session untouched so the commit can be retried.
    pub fn finish_commit(&mut self, rendered: RenderedCommit) -> Result<CropEvent> {
        let storage_path = self.sink.save(&rendered.png)?;
        self.store.persist(&rendered.source_id, &rendered.settings)?;

        info!(
            source_id = %rendered.source_id,
            %storage_path,
            "Committed profile image"
        );
        Ok(CropEvent::Committed(CommitOutcome {
            png: rendered.png,
            settings: rendered.settings,
            source_id: rendered.source_id,
            storage_path,
        }))
    }

    /// Render, save and persist in one go. `Ok(None)` when there is nothing to commit.
    pub fn commit(&mut self) -> Result<Option<CropEvent>> {
        let Some(job) = self.prepare_commit() else {
            debug!("Commit skipped, nothing renderable");
            return Ok(None);
        };
        let rendered = job.run()?;
        self.finish_commit(rendered).map(Some)
    }

    /// Abandon the session.
    pub fn cancel(&mut self) -> CropEvent {
        self.close();
        CropEvent::Cancelled
    }

    /// Release both bitmaps and reset the session.
    pub fn close(&mut self) {
        self.image = None;
        self.session.clear();
        self.throttle.reset();
    }

    pub fn source_id(&self) -> Option<&str> {
        self.image.as_ref().map(|l| l.source_id.as_str())
    }

    /// Pixel size of the full-resolution source, after quarter turns.
    pub fn source_dimensions(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(|l| l.full.dimensions())
    }

    pub fn quarter_turns(&self) -> u8 {
        self.image.as_ref().map_or(0, |l| l.quarter_turns)
    }

    pub fn session(&self) -> &CropSession {
        &self.session
    }

    pub fn config(&self) -> &CropperConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }
}
