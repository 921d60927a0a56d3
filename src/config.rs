use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{check_dimensions, Error, Result};
use crate::gradient::ColorRamp;
use crate::noise::NoiseParams;

/// How balloons move around the sky
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Motion {
    /// Bounce inside a 3D box, scale with depth, pop on click
    #[default]
    Depth,
    /// March left and right in a row at unit scale
    Drift,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalloonConfig {
    pub count: usize,
    pub seed: u64,
    /// Depth of the box balloons bounce in
    pub depth: f32,
    pub motion: Motion,
    /// PNG sprites, cycled through. Empty means procedural balloons.
    pub sprites: Vec<PathBuf>,
    /// 4x4 sheet of 64x64 explosion frames. None means procedural.
    pub explosion: Option<PathBuf>,
    /// Size of procedural balloons
    pub sprite_size: (u32, u32),
}

impl Default for BalloonConfig {
    fn default() -> Self {
        Self {
            count: 20,
            seed: 1,
            depth: 100.0,
            motion: Motion::Depth,
            sprites: Vec::new(),
            explosion: None,
            sprite_size: (100, 150),
        }
    }
}

/// Everything the balloon sky needs, loadable from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyConfig {
    pub width: u32,
    pub height: u32,
    pub noise: NoiseParams,
    /// 2 stops for a single ramp, 4 for a dual ramp
    pub gradient: Vec<(u8, u8, u8)>,
    pub balloons: BalloonConfig,
    /// Frames shorter than this are padded with a sleep
    pub min_frame_ms: u64,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            noise: NoiseParams::default(),
            gradient: vec![(0, 0, 255), (255, 255, 255)],
            balloons: BalloonConfig::default(),
            min_frame_ms: 5,
        }
    }
}

impl SkyConfig {
    /// Check everything that would fail later, before any work happens
    pub fn validate(&self) -> Result<()> {
        check_dimensions(self.width, self.height)?;
        ColorRamp::from_stops(&self.gradient)?;
        let (w, h) = self.balloons.sprite_size;
        check_dimensions(w, h)?;
        if self.balloons.depth.is_nan() || self.balloons.depth < 0.0 {
            return Err(Error::config(format!(
                "balloon depth must be non-negative, got {}",
                self.balloons.depth
            )));
        }
        if !(self.noise.frequency.is_finite() && self.noise.frequency > 0.0) {
            return Err(Error::config(format!(
                "noise frequency must be positive, got {}",
                self.noise.frequency
            )));
        }
        for (name, value) in [
            ("persistence", self.noise.persistence),
            ("lacunarity", self.noise.lacunarity),
        ] {
            if !value.is_finite() {
                return Err(Error::config(format!(
                    "noise {} must be finite, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Save config to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load and validate config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::NoiseKind;

    #[test]
    fn test_defaults_match_demo() {
        let c = SkyConfig::default();
        assert_eq!((c.width, c.height), (800, 600));
        assert_eq!(c.noise.kind, NoiseKind::Fbm);
        assert_eq!(c.noise.frequency, 0.009);
        assert_eq!(c.noise.octaves, 3);
        assert_eq!(c.gradient, vec![(0, 0, 255), (255, 255, 255)]);
        assert_eq!(c.balloons.count, 20);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let json = r#"{
            "width": 320,
            "noise": { "kind": "turbulence", "octaves": 5 },
            "gradient": [[0, 0, 0], [10, 10, 10], [20, 20, 20], [255, 255, 255]],
            "balloons": { "motion": "drift", "count": 3 }
        }"#;
        let c: SkyConfig = serde_json::from_str(json).unwrap();
        assert_eq!(c.width, 320);
        assert_eq!(c.height, 600);
        assert_eq!(c.noise.kind, NoiseKind::Turbulence);
        assert_eq!(c.noise.octaves, 5);
        assert_eq!(c.noise.persistence, 0.5);
        assert_eq!(c.gradient.len(), 4);
        assert_eq!(c.balloons.motion, Motion::Drift);
        assert_eq!(c.balloons.depth, 100.0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut c = SkyConfig {
            width: 0,
            ..SkyConfig::default()
        };
        assert!(matches!(c.validate(), Err(Error::InvalidDimension { .. })));

        c.width = 10;
        c.gradient.push((1, 2, 3));
        assert!(matches!(c.validate(), Err(Error::InvalidGradient(3))));

        c.gradient.pop();
        c.balloons.depth = -1.0;
        assert!(matches!(c.validate(), Err(Error::Config(_))));

        c.balloons.depth = 10.0;
        c.noise.frequency = 0.0;
        assert!(matches!(c.validate(), Err(Error::Config(_))));

        c.noise.frequency = 0.01;
        c.noise.persistence = f32::INFINITY;
        assert!(matches!(c.validate(), Err(Error::Config(_))));

        c.noise.persistence = 0.5;
        c.noise.lacunarity = f32::NAN;
        assert!(matches!(c.validate(), Err(Error::Config(_))));

        c.noise.lacunarity = 2.0;
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sky.json");
        let mut c = SkyConfig::default();
        c.balloons.sprites = vec![PathBuf::from("images/balloon_red.png")];
        c.save(&path).unwrap();
        assert_eq!(SkyConfig::load(&path).unwrap(), c);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            SkyConfig::load(dir.path().join("missing.json")),
            Err(Error::Io(_))
        ));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(SkyConfig::load(&bad), Err(Error::Json(_))));

        let invalid = dir.path().join("invalid.json");
        fs::write(&invalid, r#"{ "height": 0 }"#).unwrap();
        assert!(matches!(
            SkyConfig::load(&invalid),
            Err(Error::InvalidDimension { .. })
        ));
    }
}
