//! Noise Field Generation
//!
//! Hash-based 2D value noise layered into fractional Brownian motion (fBm) or
//! turbulence, sampled over a pixel grid. The grid keeps the exact minimum and
//! maximum it produced so the gradient mapper can rescale without guessing.

use serde::{Deserialize, Serialize};

use crate::error::{check_dimensions, Result};

/// Which octave kernel to layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseKind {
    /// Plain sum of octaves
    #[default]
    Fbm,
    /// Sum of |2n - 1| per octave: billowy, sharper creases
    Turbulence,
}

/// Parameters for [`generate`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    pub kind: NoiseKind,
    /// Base frequency in cycles per pixel
    pub frequency: f32,
    /// Amplitude multiplier between octaves
    pub persistence: f32,
    /// Frequency multiplier between octaves
    pub lacunarity: f32,
    pub octaves: u32,
    pub seed: u32,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            kind: NoiseKind::Fbm,
            frequency: 0.009,
            persistence: 0.5,
            lacunarity: 2.0,
            octaves: 3,
            seed: 3,
        }
    }
}

/// Row-major grid of noise samples with the observed extremes
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    width: u32,
    height: u32,
    values: Vec<f32>,
    min: f32,
    max: f32,
}

impl ScalarField {
    /// Wrap precomputed values. `min`/`max` are measured from the data.
    pub fn from_values(width: u32, height: u32, values: Vec<f32>) -> Result<Self> {
        check_dimensions(width, height)?;
        let expected = width as usize * height as usize;
        if values.len() != expected {
            return Err(crate::Error::buffer(format!(
                "{} field values given, {}x{} needs {}",
                values.len(),
                width,
                height,
                expected
            )));
        }
        let (min, max) = extremes(&values);
        Ok(Self {
            width,
            height,
            values,
            min,
            max,
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

    #[inline]
    pub fn min(&self) -> f32 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.values[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }
}

fn extremes(values: &[f32]) -> (f32, f32) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
    }
    (min, max)
}

/// Sample `params` over a `width`x`height` grid.
///
/// Cell (x, y) is sampled at the integer coordinate scaled by
/// `params.frequency`. Equal parameters always give identical fields.
#[tracing::instrument(level = "debug", skip(params), fields(kind = ?params.kind))]
pub fn generate(params: &NoiseParams, width: u32, height: u32) -> Result<ScalarField> {
    check_dimensions(width, height)?;

    let mut values = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        for x in 0..width {
            let fx = x as f32 * params.frequency;
            let fy = y as f32 * params.frequency;
            let v = match params.kind {
                NoiseKind::Fbm => fbm_2d(
                    fx,
                    fy,
                    params.octaves,
                    params.persistence,
                    params.lacunarity,
                    params.seed,
                ),
                NoiseKind::Turbulence => turbulence_2d(
                    fx,
                    fy,
                    params.octaves,
                    params.persistence,
                    params.lacunarity,
                    params.seed,
                ),
            };
            values.push(v);
        }
    }

    let (min, max) = extremes(&values);
    tracing::debug!(min, max, "noise field generated");
    Ok(ScalarField {
        width,
        height,
        values,
        min,
        max,
    })
}

/// Hash-based pseudo-random value for integer grid coordinates.
/// Returns a value in [0.0, 1.0].
#[inline]
pub fn noise_hash_2d(x: i32, y: i32, seed: u32) -> f32 {
    let mut h = seed.wrapping_add(x as u32).wrapping_mul(374761393);
    h = h.wrapping_add(y as u32).wrapping_mul(668265263);
    h = (h ^ (h >> 13)).wrapping_mul(1274126177);
    h = h ^ (h >> 16);
    (h & 0x7fff) as f32 / 0x7fff as f32
}

/// Smoothstep interpolation: 3t² - 2t³
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// 2D value noise with smoothstep interpolation, in [0.0, 1.0].
pub fn value_noise_2d(x: f32, y: f32, seed: u32) -> f32 {
    let ix = x.floor() as i32;
    let iy = y.floor() as i32;
    let fx = smoothstep(x - ix as f32);
    let fy = smoothstep(y - iy as f32);

    let c00 = noise_hash_2d(ix, iy, seed);
    let c10 = noise_hash_2d(ix + 1, iy, seed);
    let c01 = noise_hash_2d(ix, iy + 1, seed);
    let c11 = noise_hash_2d(ix + 1, iy + 1, seed);

    let x0 = c00 + (c10 - c00) * fx;
    let x1 = c01 + (c11 - c01) * fx;

    x0 + (x1 - x0) * fy
}

/// Fractional Brownian motion: octave `i` has amplitude `persistence^i` and
/// frequency `lacunarity^i`.
pub fn fbm_2d(x: f32, y: f32, octaves: u32, persistence: f32, lacunarity: f32, seed: u32) -> f32 {
    let mut value = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    for _ in 0..octaves {
        value += amplitude * value_noise_2d(x * frequency, y * frequency, seed);
        amplitude *= persistence;
        frequency *= lacunarity;
    }
    value
}

/// Turbulence: like fBm but folds each octave around its midpoint
pub fn turbulence_2d(
    x: f32,
    y: f32,
    octaves: u32,
    persistence: f32,
    lacunarity: f32,
    seed: u32,
) -> f32 {
    let mut value = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    for _ in 0..octaves {
        value += amplitude * (value_noise_2d(x * frequency, y * frequency, seed) * 2.0 - 1.0).abs();
        amplitude *= persistence;
        frequency *= lacunarity;
    }
    value
}
