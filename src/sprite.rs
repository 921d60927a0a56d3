//! Moving sprites and poppable balloons
//!
//! Velocities are in pixels per millisecond. A balloon's `z` is its depth:
//! nearer balloons (larger `z`) are drawn larger and later.

use crate::composite::{blit_alpha, blit_alpha_scaled};
use crate::display::{PixelBuffer, Rect};
use crate::error::Result;
use crate::math3d::Vec3;

/// Frames in an explosion sprite sheet (4x4 grid)
pub const EXPLOSION_FRAMES: i32 = 16;
/// Side length of one explosion frame in the sheet
pub const EXPLOSION_FRAME_SIZE: u32 = 64;
/// Milliseconds each explosion frame stays on screen
pub const EXPLOSION_FRAME_MS: f32 = 20.0;

/// An image with a position and velocity
#[derive(Debug, Clone)]
pub struct Sprite {
    pub image: PixelBuffer,
    pub pos: Vec3,
    pub vel: Vec3,
}

impl Sprite {
    pub fn new(image: PixelBuffer, pos: Vec3, vel: Vec3) -> Self {
        Self { image, pos, vel }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Move by `vel * dt_ms` inside the box `[0, bounds]`. A component whose
    /// next position would leave the box is reversed before the move.
    pub fn update(&mut self, dt_ms: f32, bounds: Vec3) {
        let next = self.pos + self.vel * dt_ms;
        if next.x < 0.0 || next.x > bounds.x {
            self.vel.x = -self.vel.x;
        }
        if next.y < 0.0 || next.y > bounds.y {
            self.vel.y = -self.vel.y;
        }
        if next.z < 0.0 || next.z > bounds.z {
            self.vel.z = -self.vel.z;
        }
        self.pos = self.pos + self.vel * dt_ms;
    }

    /// Horizontal ping-pong: move along x, then turn around once outside
    /// `[0, max_x]`
    pub fn drift_x(&mut self, dt_ms: f32, max_x: f32) {
        self.pos.x += self.vel.x * dt_ms;
        if self.pos.x > max_x || self.pos.x < 0.0 {
            self.vel.x = -self.vel.x;
        }
    }

    /// Alpha blit at the sprite's top-left position
    pub fn draw(&self, dst: &mut PixelBuffer) {
        blit_alpha(dst, &self.image, self.pos.x as i32, self.pos.y as i32);
    }
}

/// Where a balloon is in its pop animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PopState {
    Floating,
    Exploding { started_ms: f32 },
    Exploded,
}

/// A sprite centred on its position, scaled by depth, that can be popped
#[derive(Debug, Clone)]
pub struct Balloon {
    pub sprite: Sprite,
    pub state: PopState,
}

impl Balloon {
    pub fn new(image: PixelBuffer, pos: Vec3, vel: Vec3) -> Self {
        Self {
            sprite: Sprite::new(image, pos, vel),
            state: PopState::Floating,
        }
    }

    /// Depth scale: 0.5 at z = 0, 0.75 at z = 100
    #[inline]
    pub fn scale(&self) -> f32 {
        (self.sprite.pos.z / 200.0 + 1.0) / 2.0
    }

    /// Click target (cx, cy, radius). Sits above the centre so the string
    /// does not count.
    pub fn hit_circle(&self) -> (f32, f32, f32) {
        let scale = self.scale();
        let x = self.sprite.pos.x;
        let y = self.sprite.pos.y - 30.0 * scale;
        let r = self.sprite.width() as f32 / 2.0 * scale;
        (x, y, r)
    }

    pub fn hit_test(&self, px: f32, py: f32) -> bool {
        let (x, y, r) = self.hit_circle();
        let dx = px - x;
        let dy = py - y;
        (dx * dx + dy * dy).sqrt() < r
    }

    /// Start the explosion. Returns false if already popped.
    pub fn pop(&mut self, now_ms: f32) -> bool {
        if self.state == PopState::Floating {
            self.state = PopState::Exploding { started_ms: now_ms };
            true
        } else {
            false
        }
    }

    /// Sheet frame to show at `now_ms`. Frames play from 15 down to 0.
    pub fn explosion_frame(&self, now_ms: f32) -> Option<u32> {
        match self.state {
            PopState::Exploding { started_ms } => {
                let elapsed = (now_ms - started_ms).max(0.0);
                let index = EXPLOSION_FRAMES - 1 - (elapsed / EXPLOSION_FRAME_MS) as i32;
                (index >= 0).then_some(index as u32)
            },
            _ => None,
        }
    }

    /// Move and advance the pop animation
    pub fn update(&mut self, dt_ms: f32, now_ms: f32, bounds: Vec3) {
        if matches!(self.state, PopState::Exploding { .. }) && self.explosion_frame(now_ms).is_none()
        {
            self.state = PopState::Exploded;
        }
        self.sprite.update(dt_ms, bounds);
    }

    /// Screen rectangle of the scaled balloon, centred on its position
    pub fn screen_rect(&self) -> Rect {
        let scale = self.scale();
        let w = (self.sprite.width() as f32 * scale) as i32;
        let h = (self.sprite.height() as f32 * scale) as i32;
        let x = (self.sprite.pos.x - w as f32 / 2.0) as i32;
        let y = (self.sprite.pos.y - h as f32 / 2.0) as i32;
        Rect::new(x, y, w.max(0) as u32, h.max(0) as u32)
    }

    pub fn draw(&self, dst: &mut PixelBuffer, explosion: Option<&PixelBuffer>, now_ms: f32) {
        if self.state == PopState::Exploded {
            return;
        }
        let rect = self.screen_rect();
        let image = &self.sprite.image;
        blit_alpha_scaled(
            dst,
            image,
            Rect::new(0, 0, image.width(), image.height()),
            rect,
        );

        if let (Some(sheet), Some(frame)) = (explosion, self.explosion_frame(now_ms)) {
            // twice the balloon's size, same centre
            let burst = Rect::new(
                rect.x - rect.w as i32 / 2,
                rect.y - rect.h as i32 / 2,
                rect.w * 2,
                rect.h * 2,
            );
            blit_alpha_scaled(dst, sheet, explosion_frame_rect(frame), burst);
        }
    }
}

/// Sheet rectangle of explosion frame `index` (row-major 4x4 grid)
pub fn explosion_frame_rect(index: u32) -> Rect {
    let col = index % 4;
    let row = index / 4;
    Rect::new(
        (col * EXPLOSION_FRAME_SIZE) as i32,
        (row * EXPLOSION_FRAME_SIZE) as i32,
        EXPLOSION_FRAME_SIZE,
        EXPLOSION_FRAME_SIZE,
    )
}

/// Sort nearest-last so nearer balloons are painted over farther ones
pub fn sort_by_depth(balloons: &mut [Balloon]) {
    balloons.sort_by(|a, b| a.sprite.pos.z.total_cmp(&b.sprite.pos.z));
}

// ============================================================================
// Procedural sprites
// ============================================================================

/// Balloon body with a highlight, knot and string on a transparent background
pub fn balloon_sprite(color: (u8, u8, u8), width: u32, height: u32) -> Result<PixelBuffer> {
    let mut img = PixelBuffer::with_size(width, height)?;
    let (r, g, b) = color;
    let w = width as i32;
    let h = height as i32;

    let body_h = h * 3 / 4;
    let cx = w / 2;
    let cy = body_h / 2;
    let rx = (w / 2 - 1).max(1);
    let ry = (body_h / 2 - 1).max(1);
    img.fill_ellipse(cx, cy, rx, ry, r, g, b, 255);

    // Highlight
    let hl = crate::util::lerp_color(color, (255, 255, 255), 0.6);
    img.fill_ellipse(cx - rx / 3, cy - ry / 3, (rx / 5).max(1), (ry / 4).max(1), hl.0, hl.1, hl.2, 255);

    // Knot
    let dark = crate::util::lerp_color(color, (0, 0, 0), 0.3);
    for i in 0..3 {
        img.hline(cx - i, cx + i, cy + ry + i, dark.0, dark.1, dark.2, 255);
    }

    // String, only when there is room below the knot
    let string_top = cy + ry + 3;
    if string_top < h {
        img.vline(cx, string_top, h - 1, 90, 90, 90, 255);
    }
    Ok(img)
}

/// 256x256 sheet of 16 expanding, fading rings. Frame 15 is the first shown.
pub fn explosion_sheet() -> Result<PixelBuffer> {
    let size = EXPLOSION_FRAME_SIZE * 4;
    let mut sheet = PixelBuffer::with_size(size, size)?;
    let half = EXPLOSION_FRAME_SIZE as i32 / 2;

    for index in 0..EXPLOSION_FRAMES as u32 {
        let rect = explosion_frame_rect(index);
        let cx = rect.x + half;
        let cy = rect.y + half;
        let progress = (EXPLOSION_FRAMES as u32 - 1 - index) as f32 / (EXPLOSION_FRAMES - 1) as f32;
        let radius = 4 + (progress * (half - 6) as f32) as i32;
        let alpha = (255.0 * (1.0 - progress * 0.8)) as u8;

        img_burst(&mut sheet, cx, cy, radius, alpha);
    }
    Ok(sheet)
}

fn img_burst(sheet: &mut PixelBuffer, cx: i32, cy: i32, radius: i32, alpha: u8) {
    sheet.fill_circle(cx, cy, radius / 2, 255, 240, 160, alpha);
    for ring in 0..3 {
        sheet.draw_circle(cx, cy, radius - ring, 255, 140 - ring as u8 * 30, 40, alpha);
    }
}
