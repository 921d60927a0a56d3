//! Balloon sky: fractal-noise clouds, colour ramps, alpha compositing and
//! sprites that float, bounce and pop over the background.
//!
//! Everything renders into [`display::PixelBuffer`]; the SDL2 window in
//! [`display`] is only compiled with the `window` feature.

pub mod apt;
pub mod assets;
pub mod composite;
pub mod config;
pub mod display;
pub mod effects;
pub mod error;
pub mod gradient;
pub mod math3d;
pub mod noise;
pub mod sprite;
pub mod util;

pub use error::{Error, Result};
