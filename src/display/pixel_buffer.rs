use crate::error::{check_dimensions, Error, Result};

// ============================================================================
// Rect
// ============================================================================

/// Integer rectangle in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// RGBA pixel buffer for software rendering.
///
/// Bytes are stored R, G, B, A per pixel, row-major. `pitch` is the byte
/// distance between rows and is `width * 4` unless the buffer was built from a
/// padded image. Backgrounds, sprites and the screen are all `PixelBuffer`s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    pitch: usize,
}

impl PixelBuffer {
    /// Create a zeroed buffer (every channel, alpha included, is 0)
    pub fn with_size(width: u32, height: u32) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            pixels: vec![0; width as usize * height as usize * 4],
            width,
            height,
            pitch: width as usize * 4,
        })
    }

    /// Create a buffer filled with one colour
    pub fn filled(width: u32, height: u32, r: u8, g: u8, b: u8, a: u8) -> Result<Self> {
        let mut buffer = Self::with_size(width, height)?;
        buffer.clear_rgba(r, g, b, a);
        Ok(buffer)
    }

    /// Wrap tightly packed RGBA data
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::from_rgba_with_pitch(width, height, width as usize * 4, data)
    }

    /// Wrap RGBA data whose rows are `pitch` bytes apart
    pub fn from_rgba_with_pitch(
        width: u32,
        height: u32,
        pitch: usize,
        data: Vec<u8>,
    ) -> Result<Self> {
        check_dimensions(width, height)?;
        let row_bytes = width as usize * 4;
        if pitch < row_bytes {
            return Err(Error::buffer(format!(
                "pitch {} is smaller than a {}-pixel row",
                pitch, width
            )));
        }
        let needed = pitch * (height as usize - 1) + row_bytes;
        if data.len() < needed {
            return Err(Error::buffer(format!(
                "{} bytes given, {}x{} with pitch {} needs {}",
                data.len(),
                width,
                height,
                pitch,
                needed
            )));
        }
        Ok(Self {
            pixels: data,
            width,
            height,
            pitch,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row
    #[inline]
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Calculate byte offset for pixel at (x, y)
    #[inline]
    pub(crate) fn pixel_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.pitch + x as usize * 4
    }

    /// Fill every pixel with one colour
    pub fn clear_rgba(&mut self, r: u8, g: u8, b: u8, a: u8) {
        let row_bytes = self.width as usize * 4;
        for row in self.pixels.chunks_mut(self.pitch) {
            let len = row.len().min(row_bytes);
            for px in row[..len].chunks_exact_mut(4) {
                px.copy_from_slice(&[r, g, b, a]);
            }
        }
    }

    /// Set a single pixel (bounds checked)
    #[inline]
    pub fn set_pixel_rgba(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8, a: u8) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            self.pixels[idx..idx + 4].copy_from_slice(&[r, g, b, a]);
        }
    }

    /// Read all 4 channels of a pixel (bounds checked)
    #[inline]
    pub fn get_pixel_rgba(&self, x: i32, y: i32) -> Option<(u8, u8, u8, u8)> {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            Some((
                self.pixels[idx],
                self.pixels[idx + 1],
                self.pixels[idx + 2],
                self.pixels[idx + 3],
            ))
        } else {
            None
        }
    }

    /// Read the colour channels of a pixel (bounds checked)
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<(u8, u8, u8)> {
        self.get_pixel_rgba(x, y).map(|(r, g, b, _)| (r, g, b))
    }

    /// The `width * 4` visible bytes of row `y`
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.pitch;
        &self.pixels[start..start + self.width as usize * 4]
    }

    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.pitch;
        let end = start + self.width as usize * 4;
        &mut self.pixels[start..end]
    }

    // ========================================================================
    // Primitives
    // ========================================================================

    /// Draw a horizontal span (clipped)
    pub fn hline(&mut self, x1: i32, x2: i32, y: i32, r: u8, g: u8, b: u8, a: u8) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let (x1, x2) = if x1 > x2 { (x2, x1) } else { (x1, x2) };
        let x1 = x1.max(0);
        let x2 = x2.min(self.width as i32 - 1);
        for x in x1..=x2 {
            let idx = self.pixel_index(x as u32, y as u32);
            self.pixels[idx..idx + 4].copy_from_slice(&[r, g, b, a]);
        }
    }

    /// Draw a vertical span (clipped)
    pub fn vline(&mut self, x: i32, y1: i32, y2: i32, r: u8, g: u8, b: u8, a: u8) {
        let (y1, y2) = if y1 > y2 { (y2, y1) } else { (y1, y2) };
        for y in y1..=y2 {
            self.set_pixel_rgba(x, y, r, g, b, a);
        }
    }

    /// Fill an axis-aligned ellipse using horizontal spans
    pub fn fill_ellipse(&mut self, cx: i32, cy: i32, rx: i32, ry: i32, r: u8, g: u8, b: u8, a: u8) {
        if rx <= 0 || ry <= 0 {
            return;
        }
        let ry_f = ry as f32;
        let rx_f = rx as f32;
        for dy in -ry..=ry {
            let t = dy as f32 / ry_f;
            let half = (rx_f * (1.0 - t * t).max(0.0).sqrt()) as i32;
            self.hline(cx - half, cx + half, cy + dy, r, g, b, a);
        }
    }

    /// Fill a circle
    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, r: u8, g: u8, b: u8, a: u8) {
        if radius == 0 {
            self.set_pixel_rgba(cx, cy, r, g, b, a);
        } else {
            self.fill_ellipse(cx, cy, radius, radius, r, g, b, a);
        }
    }

    /// Circle outline (midpoint algorithm)
    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, r: u8, g: u8, b: u8, a: u8) {
        if radius <= 0 {
            return;
        }
        let mut x = radius;
        let mut y = 0;
        let mut err = 1 - radius;

        while x >= y {
            for (px, py) in [
                (x, y),
                (y, x),
                (-y, x),
                (-x, y),
                (-x, -y),
                (-y, -x),
                (y, -x),
                (x, -y),
            ] {
                self.set_pixel_rgba(cx + px, cy + py, r, g, b, a);
            }

            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err += 2 * (y - x) + 1;
            }
        }
    }

    // ========================================================================
    // Buffer Operations
    // ========================================================================

    /// Copy a sub-rectangle into a new, tightly packed buffer.
    /// The rectangle must lie fully inside this buffer.
    pub fn region(&self, rect: Rect) -> Result<Self> {
        if rect.x < 0
            || rect.y < 0
            || rect.x as u64 + rect.w as u64 > self.width as u64
            || rect.y as u64 + rect.h as u64 > self.height as u64
        {
            return Err(Error::buffer(format!(
                "region {:?} outside {}x{} buffer",
                rect, self.width, self.height
            )));
        }
        let mut out = Self::with_size(rect.w, rect.h)?;
        let row_bytes = rect.w as usize * 4;
        for y in 0..rect.h {
            let src = self.pixel_index(rect.x as u32, rect.y as u32 + y);
            out.row_mut(y)
                .copy_from_slice(&self.pixels[src..src + row_bytes]);
        }
        Ok(out)
    }

    /// Visible pixels without row padding, for PNG export
    pub fn to_packed(&self) -> Vec<u8> {
        if self.pitch == self.width as usize * 4 {
            return self.pixels[..self.width as usize * self.height as usize * 4].to_vec();
        }
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for y in 0..self.height {
            out.extend_from_slice(self.row(y));
        }
        out
    }

    /// Raw bytes, including any row padding
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable access to raw pixels
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            PixelBuffer::with_size(0, 4),
            Err(Error::InvalidDimension { .. })
        ));
        assert!(PixelBuffer::with_size(4, 0).is_err());
    }

    #[test]
    fn test_new_buffer_is_zeroed() {
        let buf = PixelBuffer::with_size(3, 2).unwrap();
        assert_eq!(buf.pitch(), 12);
        assert!(buf.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_rgba_byte_order() {
        let mut buf = PixelBuffer::with_size(2, 2).unwrap();
        buf.set_pixel_rgba(1, 0, 10, 20, 30, 40);
        assert_eq!(&buf.as_bytes()[4..8], &[10, 20, 30, 40]);
        assert_eq!(buf.get_pixel_rgba(1, 0), Some((10, 20, 30, 40)));
        assert_eq!(buf.get_pixel(1, 0), Some((10, 20, 30)));
    }

    #[test]
    fn test_out_of_bounds_writes_ignored() {
        let mut buf = PixelBuffer::with_size(2, 2).unwrap();
        buf.set_pixel_rgba(-1, 0, 255, 255, 255, 255);
        buf.set_pixel_rgba(2, 1, 255, 255, 255, 255);
        buf.hline(-5, 10, 5, 255, 255, 255, 255);
        assert!(buf.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(buf.get_pixel_rgba(2, 0), None);
    }

    #[test]
    fn test_from_rgba_size_checked() {
        assert!(PixelBuffer::from_rgba(2, 2, vec![0; 16]).is_ok());
        assert!(matches!(
            PixelBuffer::from_rgba(2, 2, vec![0; 15]),
            Err(Error::InvalidBuffer(_))
        ));
    }

    #[test]
    fn test_pitch_padding_respected() {
        // 2x2 image with 4 bytes of padding per row
        let data = vec![
            1, 1, 1, 1, 2, 2, 2, 2, 9, 9, 9, 9, //
            3, 3, 3, 3, 4, 4, 4, 4,
        ];
        let buf = PixelBuffer::from_rgba_with_pitch(2, 2, 12, data).unwrap();
        assert_eq!(buf.get_pixel_rgba(0, 1), Some((3, 3, 3, 3)));
        assert_eq!(buf.get_pixel_rgba(1, 1), Some((4, 4, 4, 4)));
        assert_eq!(buf.to_packed(), vec![1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4]);
        assert!(PixelBuffer::from_rgba_with_pitch(2, 2, 7, vec![0; 64]).is_err());
    }

    #[test]
    fn test_clear_leaves_padding() {
        let mut buf = PixelBuffer::from_rgba_with_pitch(1, 2, 8, vec![0; 16]).unwrap();
        buf.clear_rgba(5, 6, 7, 8);
        assert_eq!(buf.as_bytes(), &[5, 6, 7, 8, 0, 0, 0, 0, 5, 6, 7, 8, 0, 0, 0, 0]);
    }

    #[test]
    fn test_region_copies_sub_image() {
        let mut buf = PixelBuffer::with_size(4, 4).unwrap();
        buf.set_pixel_rgba(2, 3, 9, 8, 7, 6);
        let sub = buf.region(Rect::new(2, 2, 2, 2)).unwrap();
        assert_eq!(sub.width(), 2);
        assert_eq!(sub.get_pixel_rgba(0, 1), Some((9, 8, 7, 6)));
        assert!(buf.region(Rect::new(3, 3, 2, 2)).is_err());
        assert!(buf.region(Rect::new(-1, 0, 1, 1)).is_err());
    }

    #[test]
    fn test_fill_circle_stays_inside_radius() {
        let mut buf = PixelBuffer::with_size(21, 21).unwrap();
        buf.fill_circle(10, 10, 5, 255, 0, 0, 255);
        assert_eq!(buf.get_pixel_rgba(10, 10), Some((255, 0, 0, 255)));
        assert_eq!(buf.get_pixel_rgba(10, 5), Some((255, 0, 0, 255)));
        assert_eq!(buf.get_pixel_rgba(0, 0), Some((0, 0, 0, 0)));
        assert_eq!(buf.get_pixel_rgba(16, 10), Some((0, 0, 0, 0)));
    }

    #[test]
    fn test_draw_circle_outline() {
        let mut buf = PixelBuffer::with_size(11, 11).unwrap();
        buf.draw_circle(5, 5, 4, 1, 2, 3, 4);
        assert_eq!(buf.get_pixel_rgba(9, 5), Some((1, 2, 3, 4)));
        assert_eq!(buf.get_pixel_rgba(5, 5), Some((0, 0, 0, 0)));
    }
}
