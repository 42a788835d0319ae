//! Time management for the game loop.

use std::time::{Duration, Instant};

/// Longest frame delta handed to gameplay. The first 3D frame stalls while the
/// terrain mesh is built; without a cap the player would jump across the map.
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(100);

/// Manages frame timing and delta time calculation.
#[derive(Debug)]
pub struct Time {
    /// Time of the last frame.
    last_frame: Instant,
    /// Duration of the last frame (capped at `MAX_FRAME_DELTA`).
    delta: Duration,
    /// Total game time, sum of capped deltas.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new time manager.
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Update timing at the start of a new frame.
    pub fn update(&mut self) {
        let now = Instant::now();
        let raw = now - self.last_frame;
        self.last_frame = now;
        self.advance(raw);
    }

    /// Advance the clock by an explicit frame duration.
    pub fn advance(&mut self, raw: Duration) {
        if raw > MAX_FRAME_DELTA {
            log::debug!("Long frame ({:?}), capping delta", raw);
        }
        self.delta = raw.min(MAX_FRAME_DELTA);
        self.elapsed += self.delta;
        self.frame_count += 1;
    }

    /// Get the delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get total elapsed game time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the current FPS (averaged over last frame).
    pub fn fps(&self) -> f32 {
        if self.delta.as_secs_f32() > 0.0 {
            1.0 / self.delta.as_secs_f32()
        } else {
            0.0
        }
    }
}
