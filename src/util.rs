//! Shared utilities

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Simple deterministic RNG using xorshift64
/// Used to scatter balloons reproducibly from a config seed
pub struct Rng {
    state: u64,
}

impl Rng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) } // Ensure non-zero
    }

    /// Get the next random u64
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Get a random f32 in [0, 1)
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u64() & 0xFFFFFF) as f32 / 0x1000000 as f32
    }

    /// Get a random f32 in [min, max)
    #[inline]
    pub fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }
}

/// Linear interpolation between two colors, truncating each channel
#[inline]
pub fn lerp_color(c1: (u8, u8, u8), c2: (u8, u8, u8), t: f32) -> (u8, u8, u8) {
    let t = t.clamp(0.0, 1.0);
    (
        (c1.0 as f32 + (c2.0 as f32 - c1.0 as f32) * t) as u8,
        (c1.1 as f32 + (c2.1 as f32 - c1.1 as f32) * t) as u8,
        (c1.2 as f32 + (c2.2 as f32 - c1.2 as f32) * t) as u8,
    )
}

// ============================================================================
// Frame timing
// ============================================================================

/// FPS counter with rolling average
pub struct FpsCounter {
    frame_times: VecDeque<f32>,
    last_frame: Instant,
    sample_count: usize,
}

impl FpsCounter {
    /// Create a new FPS counter with specified sample window
    pub fn new(sample_count: usize) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(sample_count),
            last_frame: Instant::now(),
            sample_count: sample_count.max(1),
        }
    }

    /// Call once per frame. Returns (delta_seconds, average_fps)
    pub fn tick(&mut self) -> (f32, f32) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.record(dt);

        let avg_dt = self.avg_frame_time_ms() / 1000.0;
        let avg_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
        (dt, avg_fps)
    }

    fn record(&mut self, dt: f32) {
        self.frame_times.push_back(dt);
        if self.frame_times.len() > self.sample_count {
            self.frame_times.pop_front();
        }
    }

    /// Get the average frame time in milliseconds
    pub fn avg_frame_time_ms(&self) -> f32 {
        let avg_dt: f32 =
            self.frame_times.iter().sum::<f32>() / self.frame_times.len().max(1) as f32;
        avg_dt * 1000.0
    }

    /// Get min/max FPS from sample window
    pub fn min_max_fps(&self) -> (f32, f32) {
        if self.frame_times.is_empty() {
            return (0.0, 0.0);
        }
        let min_dt = self
            .frame_times
            .iter()
            .cloned()
            .fold(f32::INFINITY, f32::min);
        let max_dt = self.frame_times.iter().cloned().fold(0.0, f32::max);
        let max_fps = if min_dt > 0.0 { 1.0 / min_dt } else { 0.0 };
        let min_fps = if max_dt > 0.0 { 1.0 / max_dt } else { 0.0 };
        (min_fps, max_fps)
    }
}

/// How long to sleep so a frame that started at `frame_start` lasts at least
/// `min_frame`. Zero once the frame is already long enough.
pub fn frame_sleep(frame_start: Instant, min_frame: Duration) -> Duration {
    min_frame.saturating_sub(frame_start.elapsed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut a = Rng::new(7);
        let mut b = Rng::new(7);
        for _ in 0..10 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_rng_zero_seed_not_stuck() {
        let mut rng = Rng::new(0);
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn test_range_f32_bounds() {
        let mut rng = Rng::new(99);
        for _ in 0..1000 {
            let v = rng.range_f32(-0.25, 0.25);
            assert!((-0.25..0.25).contains(&v));
        }
    }

    #[test]
    fn test_lerp_color_truncates() {
        assert_eq!(lerp_color((0, 0, 0), (255, 255, 255), 0.5), (127, 127, 127));
        assert_eq!(lerp_color((10, 20, 30), (0, 0, 0), 2.0), (0, 0, 0));
    }

    #[test]
    fn test_fps_counter_window() {
        let mut fps = FpsCounter::new(2);
        fps.record(0.010);
        fps.record(0.020);
        fps.record(0.030);
        assert!((fps.avg_frame_time_ms() - 25.0).abs() < 0.01);
        let (min_fps, max_fps) = fps.min_max_fps();
        assert!((min_fps - 33.333).abs() < 0.01);
        assert!((max_fps - 50.0).abs() < 0.01);
    }

    #[test]
    fn test_frame_sleep_saturates() {
        let start = Instant::now() - Duration::from_millis(50);
        assert_eq!(frame_sleep(start, Duration::from_millis(5)), Duration::ZERO);
        assert!(frame_sleep(Instant::now(), Duration::from_millis(500)) > Duration::ZERO);
    }
}
