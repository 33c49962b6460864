//! Browser surface
//!
//! The page renders the rows from `rows_json`, measures the spans, hands the
//! geometry to `set_layout`, then calls `frame` from its animation loop and
//! applies each returned offset as `translate3d(x, 0, 0)`.

use wasm_bindgen::prelude::*;

use crate::layout::RowLayout;
use crate::settings::{Profile, Settings};
use crate::sim::{DriftState, FrameClock, tick};
use crate::text::{WordRows, parse_rows};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    // Already initialized when the module is instantiated twice
    let _ = console_log::init_with_level(log::Level::Info);
}

/// True if the page matches a media query
fn media_matches(query: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.match_media(query).ok().flatten())
        .map(|mql| mql.matches())
        .unwrap_or(false)
}

/// Profile for the current viewport and motion preference
fn detect_profile(settings: &Settings, viewport_width: f32) -> Profile {
    let narrow = media_matches(&format!("(max-width: {}px)", settings.compact_breakpoint));
    let settings = Settings {
        reduced_motion: settings.reduced_motion
            || media_matches("(prefers-reduced-motion: reduce)"),
        ..settings.clone()
    };
    let width = if narrow {
        viewport_width.min(settings.compact_breakpoint)
    } else {
        viewport_width
    };
    settings.profile_for_viewport(width)
}

/// One floating-words section
#[wasm_bindgen]
pub struct WordDrift {
    rows: WordRows,
    settings: Settings,
    state: DriftState,
    clock: FrameClock,
}

#[wasm_bindgen]
impl WordDrift {
    #[wasm_bindgen(constructor)]
    pub fn new(text: &str) -> WordDrift {
        let rows = parse_rows(text);
        log::info!(
            "WordDrift: {} rows, {} words",
            rows.rows.len(),
            rows.token_count()
        );
        WordDrift {
            rows,
            settings: Settings::default(),
            state: DriftState::empty(Profile::Full.params()),
            clock: FrameClock::new(),
        }
    }

    /// Parsed rows as JSON: `[[{"text": "...", "alternate": bool}, ...], ...]`
    pub fn rows_json(&self) -> String {
        serde_json::to_string(&self.rows.rows).unwrap_or_else(|_| "[]".to_string())
    }

    /// Replace settings from JSON (missing fields take defaults)
    pub fn set_settings(&mut self, json: &str) -> Result<(), JsValue> {
        self.settings =
            Settings::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(())
    }

    /// (Re)start from measured geometry; call on mount and on every resize
    pub fn set_layout(&mut self, layout_json: &str, viewport_width: f32) -> Result<(), JsValue> {
        let layout: Vec<RowLayout> =
            serde_json::from_str(layout_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let profile = detect_profile(&self.settings, viewport_width);
        log::info!("WordDrift layout: {} rows, {} profile", layout.len(), profile.as_str());
        self.state = DriftState::new(&layout, profile.params());
        Ok(())
    }

    /// Offsets for an animation frame at `now_ms`; `undefined` once stopped
    pub fn frame(&mut self, now_ms: f64) -> Option<Vec<f32>> {
        let dt = self.clock.advance(now_ms)?;
        tick(&mut self.state, dt);
        Some(self.state.offsets())
    }

    /// Advance by an explicit step (seconds) and return offsets
    pub fn tick(&mut self, elapsed: f32) -> Vec<f32> {
        tick(&mut self.state, elapsed);
        self.state.offsets()
    }

    /// Current offsets without advancing
    pub fn offsets(&self) -> Vec<f32> {
        self.state.offsets()
    }

    /// Stop the loop (unmount or hidden tab); `frame` returns `undefined` after this
    pub fn stop(&mut self) {
        self.clock.stop();
    }

    pub fn resume(&mut self) {
        self.clock.resume();
    }

    pub fn token_count(&self) -> usize {
        self.state.token_count()
    }
}
