//! PNG decoding and encoding at the edge of the pipeline

use std::path::Path;

use crate::display::PixelBuffer;
use crate::error::{Error, Result};

/// Decode an image file into a straight-alpha RGBA buffer
pub fn load_png(path: impl AsRef<Path>) -> Result<PixelBuffer> {
    let path = path.as_ref();
    let img = image::open(path)
        .map_err(|e| Error::image(format!("decode '{}': {}", path.display(), e)))?
        .into_rgba8();
    let (width, height) = img.dimensions();
    tracing::debug!(path = %path.display(), width, height, "sprite decoded");
    PixelBuffer::from_rgba(width, height, img.into_raw())
}

/// Write the visible pixels of `buffer` as an RGBA PNG
pub fn save_png(buffer: &PixelBuffer, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    image::save_buffer_with_format(
        path,
        &buffer.to_packed(),
        buffer.width(),
        buffer.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| Error::image(format!("write '{}': {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_keeps_straight_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sprite.png");
        let mut buf = PixelBuffer::with_size(3, 2).unwrap();
        buf.set_pixel_rgba(0, 0, 255, 0, 0, 255);
        buf.set_pixel_rgba(2, 1, 200, 100, 50, 128);
        save_png(&buf, &path).unwrap();

        let back = load_png(&path).unwrap();
        assert_eq!((back.width(), back.height()), (3, 2));
        assert_eq!(back.get_pixel_rgba(2, 1), Some((200, 100, 50, 128)));
        assert_eq!(back, buf);
    }

    #[test]
    fn test_missing_file_is_image_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_png(dir.path().join("nope.png")).unwrap_err();
        assert!(matches!(err, Error::Image(_)));
        assert!(err.to_string().contains("nope.png"));
    }
}
