//! Balloon Sky Effect
//!
//! Fractal-noise clouds mapped through a colour ramp, with balloons floating
//! over them. In depth mode balloons bounce inside a 3D box, shrink with
//! distance and burst when clicked; in drift mode they pace back and forth.

use super::Effect;
use crate::composite::blit_opaque;
use crate::config::{Motion, SkyConfig};
use crate::display::PixelBuffer;
use crate::error::Result;
use crate::gradient::{rescale_into, ColorRamp};
use crate::math3d::Vec3;
use crate::noise::generate;
use crate::sprite::{balloon_sprite, explosion_sheet, sort_by_depth, Balloon, PopState};
use crate::util::Rng;

/// Red, blue and green, like the classic sprite set
const BALLOON_COLORS: [(u8, u8, u8); 3] = [(220, 40, 40), (40, 80, 220), (40, 180, 70)];

/// Distance from the right edge where drifting balloons turn around
const DRIFT_MARGIN: f32 = 200.0;

/// Generate the opaque cloud background described by `config`
pub fn cloud_background(config: &SkyConfig) -> Result<PixelBuffer> {
    let field = generate(&config.noise, config.width, config.height)?;
    let ramp = ColorRamp::from_stops(&config.gradient)?;
    let mut background = PixelBuffer::filled(config.width, config.height, 0, 0, 0, 255)?;
    rescale_into(&field, &ramp, &mut background)?;
    tracing::info!(
        width = config.width,
        height = config.height,
        min = field.min(),
        max = field.max(),
        "cloud background ready"
    );
    Ok(background)
}

pub struct BalloonSky {
    background: PixelBuffer,
    balloons: Vec<Balloon>,
    explosion: PixelBuffer,
    bounds: Vec3,
    motion: Motion,
    clock_ms: f32,
}

impl BalloonSky {
    /// Build the sky. `sprites` are cycled through for the balloons; when
    /// empty, procedural balloons are drawn instead. `explosion` falls back to
    /// a procedural sheet.
    pub fn new(
        config: &SkyConfig,
        sprites: Vec<PixelBuffer>,
        explosion: Option<PixelBuffer>,
    ) -> Result<Self> {
        config.validate()?;
        let background = cloud_background(config)?;

        let sprites = if sprites.is_empty() {
            let (w, h) = config.balloons.sprite_size;
            tracing::debug!(w, h, "using procedural balloon sprites");
            BALLOON_COLORS
                .iter()
                .map(|&c| balloon_sprite(c, w, h))
                .collect::<Result<Vec<_>>>()?
        } else {
            sprites
        };
        let explosion = match explosion {
            Some(sheet) => sheet,
            None => explosion_sheet()?,
        };

        let bounds = Vec3::new(
            config.width as f32,
            config.height as f32,
            config.balloons.depth,
        );
        let balloons = match config.balloons.motion {
            Motion::Depth => scatter(&sprites, config.balloons.count, config.balloons.seed, bounds),
            Motion::Drift => row(&sprites, config.balloons.count),
        };
        tracing::info!(
            count = balloons.len(),
            motion = ?config.balloons.motion,
            "balloons placed"
        );

        Ok(Self {
            background,
            balloons,
            explosion,
            bounds,
            motion: config.balloons.motion,
            clock_ms: 0.0,
        })
    }

    pub fn background(&self) -> &PixelBuffer {
        &self.background
    }

    pub fn balloons(&self) -> &[Balloon] {
        &self.balloons
    }

    /// Milliseconds of animation so far
    pub fn clock_ms(&self) -> f32 {
        self.clock_ms
    }
}

/// Random positions inside the box, slow random velocities
fn scatter(sprites: &[PixelBuffer], count: usize, seed: u64, bounds: Vec3) -> Vec<Balloon> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|i| {
            let image = sprites[i % sprites.len()].clone();
            let pos = Vec3::new(
                rng.range_f32(0.0, bounds.x),
                rng.range_f32(0.0, bounds.y),
                rng.range_f32(0.0, bounds.z),
            );
            let vel = Vec3::new(
                rng.range_f32(-0.25, 0.25),
                rng.range_f32(-0.25, 0.25),
                rng.range_f32(-0.125, 0.125),
            );
            Balloon::new(image, pos, vel)
        })
        .collect()
}

/// Diagonal row; balloon i moves (i + 1) pixels per 5 ms
fn row(sprites: &[PixelBuffer], count: usize) -> Vec<Balloon> {
    (0..count)
        .map(|i| {
            let image = sprites[i % sprites.len()].clone();
            let offset = i as f32 * 60.0;
            let vel = Vec3::new((i + 1) as f32 / 5.0, 0.0, 0.0);
            Balloon::new(image, Vec3::new(offset, offset, 0.0), vel)
        })
        .collect()
}

impl Effect for BalloonSky {
    fn update(&mut self, dt_ms: f32) {
        self.clock_ms += dt_ms;
        match self.motion {
            Motion::Depth => {
                for balloon in &mut self.balloons {
                    balloon.update(dt_ms, self.clock_ms, self.bounds);
                }
                self.balloons.retain(|b| b.state != PopState::Exploded);
                sort_by_depth(&mut self.balloons);
            },
            Motion::Drift => {
                let max_x = self.bounds.x - DRIFT_MARGIN;
                for balloon in &mut self.balloons {
                    balloon.sprite.drift_x(dt_ms, max_x);
                }
            },
        }
    }

    fn render(&self, buffer: &mut PixelBuffer) {
        blit_opaque(buffer, &self.background, 0, 0);
        for balloon in &self.balloons {
            match self.motion {
                Motion::Depth => balloon.draw(buffer, Some(&self.explosion), self.clock_ms),
                Motion::Drift => balloon.sprite.draw(buffer),
            }
        }
    }

    fn name(&self) -> &str {
        "Balloon Sky"
    }

    fn click(&mut self, x: f32, y: f32) -> bool {
        if self.motion != Motion::Depth {
            return false;
        }
        let now = self.clock_ms;
        let mut popped = 0;
        for balloon in &mut self.balloons {
            if balloon.hit_test(x, y) && balloon.pop(now) {
                popped += 1;
            }
        }
        if popped > 0 {
            tracing::debug!(popped, x, y, "balloons popped");
        }
        popped > 0
    }
}
