//! Colour ramps and noise-to-pixel mapping
//!
//! A [`ColorRamp`] is a 256-entry palette. [`rescale`] stretches a
//! [`ScalarField`] over the ramp using the field's own extremes.

use crate::display::PixelBuffer;
use crate::error::{Error, Result};
use crate::noise::ScalarField;
use crate::util::lerp_color;

pub const RAMP_SIZE: usize = 256;

/// 256 RGB entries indexed by a rescaled noise value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorRamp {
    colors: [(u8, u8, u8); RAMP_SIZE],
}

impl ColorRamp {
    /// Linear blend from `c1` at index 0 to `c2` at index 255
    pub fn single(c1: (u8, u8, u8), c2: (u8, u8, u8)) -> Self {
        let mut colors = [(0, 0, 0); RAMP_SIZE];
        for (i, slot) in colors.iter_mut().enumerate() {
            let pct = i as f32 / 255.0;
            *slot = lerp_color(c1, c2, pct);
        }
        Self { colors }
    }

    /// `c1 -> c2` over the first half, `c3 -> c4` over the second.
    ///
    /// The second half uses `pct * 1.5 - 0.5` rather than a clean
    /// `(pct - 0.5) * 2`, so it starts a quarter of the way into `c3 -> c4`.
    pub fn dual(c1: (u8, u8, u8), c2: (u8, u8, u8), c3: (u8, u8, u8), c4: (u8, u8, u8)) -> Self {
        let mut colors = [(0, 0, 0); RAMP_SIZE];
        for (i, slot) in colors.iter_mut().enumerate() {
            let pct = i as f32 / 255.0;
            *slot = if pct < 0.5 {
                lerp_color(c1, c2, pct * 2.0)
            } else {
                lerp_color(c3, c4, pct * 1.5 - 0.5)
            };
        }
        Self { colors }
    }

    /// Two stops build a single ramp, four build a dual ramp
    pub fn from_stops(stops: &[(u8, u8, u8)]) -> Result<Self> {
        match *stops {
            [c1, c2] => Ok(Self::single(c1, c2)),
            [c1, c2, c3, c4] => Ok(Self::dual(c1, c2, c3, c4)),
            _ => Err(Error::InvalidGradient(stops.len())),
        }
    }

    #[inline]
    pub fn get(&self, index: u8) -> (u8, u8, u8) {
        self.colors[index as usize]
    }

    pub fn colors(&self) -> &[(u8, u8, u8)] {
        &self.colors
    }
}

/// Map a field value to a ramp index, truncating and clamping to [0, 255].
///
/// A flat field (`max == min`) maps everything to index 0.
#[inline]
pub fn ramp_index(value: f32, min: f32, max: f32) -> u8 {
    let range = f64::from(max) - f64::from(min);
    if range <= 0.0 || !range.is_finite() {
        return 0;
    }
    let scaled = (f64::from(value) - f64::from(min)) * 255.0 / range;
    scaled.trunc().clamp(0.0, 255.0) as u8
}

/// Map `field` through `ramp` into a new buffer. Alpha stays 0.
pub fn rescale(field: &ScalarField, ramp: &ColorRamp) -> Result<PixelBuffer> {
    let mut out = PixelBuffer::with_size(field.width(), field.height())?;
    rescale_into(field, ramp, &mut out)?;
    Ok(out)
}

/// Map `field` through `ramp` into `dst`, writing R, G, B only.
pub fn rescale_into(field: &ScalarField, ramp: &ColorRamp, dst: &mut PixelBuffer) -> Result<()> {
    if dst.width() != field.width() || dst.height() != field.height() {
        return Err(Error::buffer(format!(
            "field is {}x{} but target is {}x{}",
            field.width(),
            field.height(),
            dst.width(),
            dst.height()
        )));
    }

    let (min, max) = (field.min(), field.max());
    if max <= min {
        tracing::warn!(min, max, "flat noise field, mapping to first ramp entry");
    }

    let width = field.width() as usize;
    for (y, values) in field.values().chunks_exact(width).enumerate() {
        let row = dst.row_mut(y as u32);
        for (px, &v) in row.chunks_exact_mut(4).zip(values) {
            let (r, g, b) = ramp.get(ramp_index(v, min, max));
            px[0] = r;
            px[1] = g;
            px[2] = b;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::{generate, NoiseParams};

    const BLACK: (u8, u8, u8) = (0, 0, 0);
    const WHITE: (u8, u8, u8) = (255, 255, 255);

    #[test]
    fn test_single_ramp_endpoints() {
        let ramp = ColorRamp::single(BLACK, WHITE);
        assert_eq!(ramp.get(0), BLACK);
        assert_eq!(ramp.get(255), WHITE);
        assert_eq!(ramp.colors().len(), 256);
    }

    #[test]
    fn test_single_ramp_is_monotonic() {
        let ramp = ColorRamp::single((0, 0, 255), WHITE);
        for pair in ramp.colors().windows(2) {
            assert!(pair[0].0 <= pair[1].0);
            assert_eq!(pair[0].2, 255);
        }
    }

    #[test]
    fn test_dual_ramp_segments() {
        let red = (255, 0, 0);
        let green = (0, 255, 0);
        let ramp = ColorRamp::dual(BLACK, red, green, WHITE);
        assert_eq!(ramp.get(0), BLACK);
        // index 127 is the last one below pct 0.5
        assert!(ramp.get(127).0 > 250);
        // second segment starts at pct*1.5-0.5 ~= 0.25 of green -> white
        let (r, g, b) = ramp.get(128);
        assert_eq!(g, 255);
        assert!(r > 60 && r < 70, "r = {}", r);
        assert_eq!(r, b);
        assert_eq!(ramp.get(255), WHITE);
    }

    #[test]
    fn test_from_stops_counts() {
        assert_eq!(
            ColorRamp::from_stops(&[BLACK, WHITE]).unwrap(),
            ColorRamp::single(BLACK, WHITE)
        );
        assert!(ColorRamp::from_stops(&[BLACK, WHITE, BLACK, WHITE]).is_ok());
        assert!(matches!(
            ColorRamp::from_stops(&[BLACK, WHITE, BLACK]),
            Err(Error::InvalidGradient(3))
        ));
        assert!(ColorRamp::from_stops(&[]).is_err());
    }

    #[test]
    fn test_ramp_index_clamps_and_truncates() {
        assert_eq!(ramp_index(0.0, 0.0, 1.0), 0);
        assert_eq!(ramp_index(1.0, 0.0, 1.0), 255);
        assert_eq!(ramp_index(-5.0, 0.0, 1.0), 0);
        assert_eq!(ramp_index(7.0, 0.0, 1.0), 255);
        // 0.999 * 255 = 254.7 truncates
        assert_eq!(ramp_index(0.999, 0.0, 1.0), 254);
    }

    #[test]
    fn test_ramp_index_full_f32_range() {
        // max - min overflows f32 but the field is not flat
        assert_eq!(ramp_index(f32::MAX, f32::MIN, f32::MAX), 255);
        assert_eq!(ramp_index(f32::MIN, f32::MIN, f32::MAX), 0);
        assert_eq!(ramp_index(0.0, f32::MIN, f32::MAX), 127);
        assert_eq!(ramp_index(1.0, 0.0, f32::INFINITY), 0);
    }

    #[test]
    fn test_flat_field_maps_to_zero() {
        assert_eq!(ramp_index(2.0, 2.0, 2.0), 0);
        let field = ScalarField::from_values(2, 2, vec![4.0; 4]).unwrap();
        let ramp = ColorRamp::single((10, 20, 30), WHITE);
        let out = rescale(&field, &ramp).unwrap();
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(out.get_pixel_rgba(x, y), Some((10, 20, 30, 0)));
            }
        }
    }

    #[test]
    fn test_four_by_four_scenario() {
        let values: Vec<f32> = (0..16).map(|i| (i % 4) as f32).collect();
        let field = ScalarField::from_values(4, 4, values).unwrap();
        assert_eq!((field.min(), field.max()), (0.0, 3.0));
        let ramp = ColorRamp::single(BLACK, WHITE);
        let out = rescale(&field, &ramp).unwrap();
        let expected = [0u8, 85, 170, 255];
        for y in 0..4 {
            for (x, &v) in expected.iter().enumerate() {
                assert_eq!(out.get_pixel(x as i32, y), Some((v, v, v)));
            }
        }
    }

    #[test]
    fn test_rescale_leaves_alpha() {
        let field = ScalarField::from_values(2, 1, vec![0.0, 1.0]).unwrap();
        let ramp = ColorRamp::single(BLACK, WHITE);

        let fresh = rescale(&field, &ramp).unwrap();
        assert_eq!(fresh.get_pixel_rgba(1, 0), Some((255, 255, 255, 0)));

        let mut opaque = PixelBuffer::filled(2, 1, 9, 9, 9, 255).unwrap();
        rescale_into(&field, &ramp, &mut opaque).unwrap();
        assert_eq!(opaque.get_pixel_rgba(0, 0), Some((0, 0, 0, 255)));
        assert_eq!(opaque.get_pixel_rgba(1, 0), Some((255, 255, 255, 255)));
    }

    #[test]
    fn test_rescale_into_size_mismatch() {
        let field = ScalarField::from_values(2, 1, vec![0.0, 1.0]).unwrap();
        let ramp = ColorRamp::single(BLACK, WHITE);
        let mut wrong = PixelBuffer::with_size(1, 2).unwrap();
        assert!(rescale_into(&field, &ramp, &mut wrong).is_err());
    }

    #[test]
    fn test_noise_extremes_hit_ramp_ends() {
        let field = generate(&NoiseParams::default(), 80, 60).unwrap();
        let ramp = ColorRamp::single(BLACK, WHITE);
        let out = rescale(&field, &ramp).unwrap();
        let mut saw_min = false;
        let mut saw_max = false;
        for y in 0..60u32 {
            for x in 0..80u32 {
                let v = field.get(x, y).unwrap();
                let (r, _, _) = out.get_pixel(x as i32, y as i32).unwrap();
                if v == field.min() {
                    assert_eq!(r, 0);
                    saw_min = true;
                }
                if v == field.max() {
                    assert_eq!(r, 255);
                    saw_max = true;
                }
            }
        }
        assert!(saw_min && saw_max);
    }
}
