/// Smallest allowed side of the crop square, in display pixels.
pub const MINIMUM_CROP_SIZE: f64 = 50.0;

/// Largest allowed side of the crop square, in display pixels.
pub const MAXIMUM_CROP_SIZE: f64 = 400.0;

/// Largest crop side as a fraction of the shorter display dimension.
pub const MAXIMUM_CROP_RATIO: f64 = 0.8;

/// Decoded sources larger than this (on either axis) are downscaled on load.
pub const MAXIMUM_IMAGE_SIZE: u32 = 4096;

/// Side of the committed circular profile image.
pub const PROFILE_IMAGE_OUTPUT_SIZE: u32 = 512;

/// Side of the live preview rendered while a gesture is in progress.
pub const PREVIEW_OUTPUT_SIZE: u32 = 140;

/// Minimum interval between two live preview renders (~30 fps).
pub const PREVIEW_THROTTLE_MS: u64 = 33;

/// Default crop side as a fraction of the shorter display dimension.
pub const DEFAULT_CROP_FRACTION: f64 = 0.5;

/// Resize band tolerance inside the crop circle.
pub const RESIZE_BAND_INNER: f64 = 20.0;

/// Resize band tolerance outside the crop circle.
pub const RESIZE_BAND_OUTER: f64 = 10.0;

/// Hit radius of the rotation handle drawn at the selection corner.
pub const ROTATE_HANDLE_RADIUS: f64 = 12.0;

/// Rotations at or below this magnitude take the axis-aligned render path.
pub const ROTATION_EPSILON_DEGREES: f64 = 0.01;

/// The display-resolution copy used for previews is capped at this size.
pub const DISPLAY_COPY_MAX_DIMENSION: u32 = 1024;

/// Small epsilon to avoid division by zero in floating-point comparisons.
pub const EPSILON: f64 = 1e-9;

/// Current version of the persisted crop settings record.
pub const CROP_SETTINGS_VERSION: u32 = 1;

/// Image file extensions the cropper accepts (lowercase, without dot).
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif"];

/// Minimum output pixel count to render rows in parallel.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;
