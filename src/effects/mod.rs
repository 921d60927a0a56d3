mod balloon_sky;
mod evolving;

pub use balloon_sky::{cloud_background, BalloonSky};
pub use evolving::EvolvingPicture;

use crate::display::PixelBuffer;

/// A full-screen animated scene
pub trait Effect {
    /// Advance state by `dt_ms` milliseconds (called each frame)
    fn update(&mut self, dt_ms: f32);

    /// Render the current frame into the pixel buffer
    fn render(&self, buffer: &mut PixelBuffer);

    /// Effect name for UI/debugging
    fn name(&self) -> &str;

    /// Pointer press at screen coordinates. Returns true if anything reacted.
    fn click(&mut self, _x: f32, _y: f32) -> bool {
        false
    }
}
