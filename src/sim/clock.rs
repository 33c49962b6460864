//! Frame timing for the host's animation loop
//!
//! Turns `requestAnimationFrame` timestamps (ms) into clamped step sizes.

use crate::clamp_frame_dt;
use crate::consts::MIN_FRAME_DT;

#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    running: bool,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_ms: None,
            running: true,
        }
    }

    /// Step size for a frame at `now_ms`, or `None` once stopped
    pub fn advance(&mut self, now_ms: f64) -> Option<f32> {
        if !self.running {
            return None;
        }
        let dt = match self.last_ms {
            Some(last) => clamp_frame_dt(((now_ms - last) / 1000.0) as f32),
            None => MIN_FRAME_DT,
        };
        self.last_ms = Some(now_ms);
        Some(dt)
    }

    /// Stop producing frames (view torn down or hidden)
    pub fn stop(&mut self) {
        self.running = false;
        self.last_ms = None;
    }

    /// Restart; the next frame is treated as the first
    pub fn resume(&mut self) {
        self.running = true;
        self.last_ms = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
