/// Error type shared by every layer of the rendering pipeline
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The drawing surface cannot do something the driver needs. Fatal, there is no fallback.
    #[error("surface capability not available: {0}")]
    MissingCapability(&'static str),

    #[error("invalid polygon: {0}")]
    InvalidPolygon(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("cannot parse colour {0:?}")]
    ColorParse(String),

    #[error("event generator is already attached")]
    AlreadyAttached,

    #[error("surface error: {0}")]
    Surface(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
