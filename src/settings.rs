//! Motion profiles and settings
//!
//! The profile is chosen once from the viewport and handed to the simulation;
//! nothing inside a tick queries the environment.

use serde::{Deserialize, Serialize};

use crate::consts::COMPACT_BREAKPOINT;

/// Motion profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Profile {
    /// Small viewports and reduced motion: slower, tighter spacing
    Compact,
    #[default]
    Full,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Compact => "Compact",
            Profile::Full => "Full",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "compact" | "mobile" => Some(Profile::Compact),
            "full" | "desktop" => Some(Profile::Full),
            _ => None,
        }
    }

    /// Simulation constants for this profile
    pub fn params(&self) -> DriftParams {
        match self {
            Profile::Compact => DriftParams {
                gap: 4.0,
                side_padding: 18.0,
                base_speed: 22.0,
                speed_step: 3.0,
            },
            Profile::Full => DriftParams {
                gap: 8.0,
                side_padding: 28.0,
                base_speed: 48.0,
                speed_step: 8.0,
            },
        }
    }
}

/// Geometry and speed constants for one simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftParams {
    /// Minimum space between adjacent words (px)
    pub gap: f32,
    /// Space kept free at both row edges (px)
    pub side_padding: f32,
    /// Slowest initial drift speed (px/s)
    pub base_speed: f32,
    /// Extra speed per variation step (px/s)
    pub speed_step: f32,
}

impl Default for DriftParams {
    fn default() -> Self {
        Profile::Full.params()
    }
}

/// User-facing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Viewports this wide or narrower use the compact profile (px)
    pub compact_breakpoint: f32,
    /// Prefer reduced motion (forces the compact profile)
    pub reduced_motion: bool,
    /// Force a profile regardless of viewport
    pub profile: Option<Profile>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            compact_breakpoint: COMPACT_BREAKPOINT,
            reduced_motion: false,
            profile: None,
        }
    }
}

impl Settings {
    /// Profile for a viewport of the given CSS width
    pub fn profile_for_viewport(&self, viewport_width: f32) -> Profile {
        if let Some(profile) = self.profile {
            return profile;
        }
        if self.reduced_motion || viewport_width <= self.compact_breakpoint {
            Profile::Compact
        } else {
            Profile::Full
        }
    }

    /// Parse settings from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
