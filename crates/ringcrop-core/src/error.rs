use thiserror::Error;

#[derive(Error, Debug)]
pub enum CropperError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Rotation of {0} degrees is not a multiple of 90")]
    InvalidRotation(i32),

    #[error("Invalid crop: {0}")]
    InvalidCrop(String),

    #[error("Settings store error: {0}")]
    Store(String),

    #[error("Render worker is no longer running")]
    WorkerDisconnected,
}

pub type Result<T> = std::result::Result<T, CropperError>;
