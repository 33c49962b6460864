//! Deterministic drift simulation
//!
//! All motion logic lives here. This module must be pure and deterministic:
//! - Caller-supplied frame deltas only, clamped before use
//! - No randomness; speed variation is a function of row/token index
//! - Stable iteration order (rows top to bottom, tokens left to right)
//! - No rendering or platform dependencies

pub mod clock;
pub mod state;
pub mod tick;

pub use clock::FrameClock;
pub use state::{DriftState, Row, Token, initial_velocity, speed_variation};
pub use tick::tick;
