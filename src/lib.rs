//! Drift Words - floating word rows that bounce off each other
//!
//! Core modules:
//! - `text`: Split raw text into rows of word tokens
//! - `layout`: Measured token geometry (host-supplied or estimated)
//! - `settings`: Motion profiles and viewport-driven profile selection
//! - `sim`: Deterministic drift simulation (bounds, reflection, stagnation)
//! - `web`: wasm-bindgen surface driven by requestAnimationFrame

pub mod layout;
pub mod settings;
pub mod sim;
pub mod text;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use layout::{MonospaceMetrics, RowLayout, TokenLayout};
pub use settings::{DriftParams, Profile, Settings};
pub use sim::{DriftState, FrameClock, tick};
pub use text::{WordRows, WordToken, parse_rows};

/// Simulation constants
pub mod consts {
    /// Shortest frame the simulation will step (~60 fps)
    pub const MIN_FRAME_DT: f32 = 0.016;
    /// Longest frame the simulation will step; dropped frames are not replayed
    pub const MAX_FRAME_DT: f32 = 0.05;

    /// Movement below this (px) counts as a stagnant tick
    pub const STAGNATION_EPSILON: f32 = 0.1;
    /// Consecutive stagnant ticks tolerated before a forced reversal (~0.33s at 60fps)
    pub const STAGNATION_THRESHOLD: u32 = 20;

    /// Speed used when a token with zero velocity hits a bound (px/s)
    pub const REFLECT_FALLBACK_SPEED: f32 = 40.0;
    /// Speed used when a stagnant token with zero velocity is reversed (px/s)
    pub const REVERSE_FALLBACK_SPEED: f32 = 60.0;

    /// Viewport width at or below which the compact profile applies (px)
    pub const COMPACT_BREAKPOINT: f32 = 720.0;
}

/// Clamp a raw frame delta (seconds) into the stable stepping range
#[inline]
pub fn clamp_frame_dt(dt: f32) -> f32 {
    use consts::{MAX_FRAME_DT, MIN_FRAME_DT};
    if dt.is_finite() {
        dt.clamp(MIN_FRAME_DT, MAX_FRAME_DT)
    } else {
        MIN_FRAME_DT
    }
}
