pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid dimension: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    #[error("gradient needs 2 or 4 colour stops, got {0}")]
    InvalidGradient(usize),

    #[error("invalid pixel buffer: {0}")]
    InvalidBuffer(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("image error: {0}")]
    Image(String),

    #[error("display error: {0}")]
    Display(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn dimension(width: u32, height: u32) -> Self {
        Self::InvalidDimension { width, height }
    }

    pub fn buffer(msg: impl Into<String>) -> Self {
        Self::InvalidBuffer(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn image(msg: impl Into<String>) -> Self {
        Self::Image(msg.into())
    }

    pub fn display(msg: impl Into<String>) -> Self {
        Self::Display(msg.into())
    }
}

/// Reject empty grids before anything is allocated.
pub(crate) fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::dimension(width, height));
    }
    Ok(())
}
