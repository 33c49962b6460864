//! Simulation state and initialization
//!
//! Tokens live in one flat arena; each row owns a contiguous index range.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::layout::{RowLayout, TokenLayout};
use crate::settings::DriftParams;

/// A single word drifting inside its row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Index of the owning row
    pub row: usize,
    /// Layout position relative to row start (fixed after layout)
    pub base: f32,
    /// Measured width (fixed after layout)
    pub width: f32,
    /// Horizontal displacement applied by the renderer
    pub offset: f32,
    /// Drift velocity in px/s; sign is direction
    pub velocity: f32,
    /// Consecutive ticks with negligible movement
    pub stagnant_ticks: u32,
    /// Offset accepted on the previous tick
    pub prev_offset: f32,
}

impl Token {
    /// Current left edge relative to row start
    #[inline]
    pub fn left(&self) -> f32 {
        self.base + self.offset
    }

    /// Current right edge relative to row start
    #[inline]
    pub fn right(&self) -> f32 {
        self.base + self.offset + self.width
    }
}

/// One horizontal strip of tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub width: f32,
    /// Indices into `DriftState::tokens`, left to right
    pub tokens: Range<usize>,
}

impl Row {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Whole-component simulation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftState {
    pub params: DriftParams,
    pub rows: Vec<Row>,
    pub tokens: Vec<Token>,
    /// Ticks simulated since the last (re)layout; empty states never advance
    pub time_ticks: u64,
}

/// Deterministic per-token speed variation in `0..5`
#[inline]
pub fn speed_variation(row: usize, token: usize) -> u32 {
    ((row * 7 + token * 13) % 5) as u32
}

/// Initial velocity: even tokens drift right, odd tokens drift left
pub fn initial_velocity(params: &DriftParams, row: usize, token: usize) -> f32 {
    let dir = if token % 2 == 0 { 1.0 } else { -1.0 };
    let speed = params.base_speed + speed_variation(row, token) as f32 * params.speed_step;
    dir * speed
}

impl DriftState {
    /// Build a centered, freshly moving state from measured layout
    pub fn new(layout: &[RowLayout], params: DriftParams) -> Self {
        let mut rows = Vec::with_capacity(layout.len());
        let mut tokens = Vec::with_capacity(layout.iter().map(|r| r.tokens.len()).sum());

        for (ri, row) in layout.iter().enumerate() {
            let start = tokens.len();
            for (wi, (item, offset)) in row
                .tokens
                .iter()
                .zip(initial_offsets(row, &params))
                .enumerate()
            {
                tokens.push(Token {
                    row: ri,
                    base: item.x,
                    width: item.width,
                    offset,
                    velocity: initial_velocity(&params, ri, wi),
                    stagnant_ticks: 0,
                    prev_offset: offset,
                });
            }
            rows.push(Row {
                width: row.width,
                tokens: start..tokens.len(),
            });
        }

        log::debug!(
            "Drift state initialized: {} rows, {} tokens",
            rows.len(),
            tokens.len()
        );

        Self {
            params,
            rows,
            tokens,
            time_ticks: 0,
        }
    }

    /// Empty state (nothing to simulate)
    pub fn empty(params: DriftParams) -> Self {
        Self::new(&[], params)
    }

    /// Re-initialize from fresh measurements, discarding all motion
    pub fn relayout(&mut self, layout: &[RowLayout]) {
        *self = Self::new(layout, self.params);
    }

    /// Switch params and re-initialize from the stored geometry
    pub fn set_params(&mut self, params: DriftParams) {
        let layout = self.layout();
        *self = Self::new(&layout, params);
    }

    /// Geometry this state was built from
    pub fn layout(&self) -> Vec<RowLayout> {
        self.rows
            .iter()
            .map(|row| RowLayout {
                width: row.width,
                tokens: self.tokens[row.tokens.clone()]
                    .iter()
                    .map(|t| TokenLayout {
                        x: t.base,
                        width: t.width,
                    })
                    .collect(),
            })
            .collect()
    }

    /// Tokens of one row, left to right
    pub fn row_tokens(&self, row: usize) -> &[Token] {
        match self.rows.get(row) {
            Some(r) => &self.tokens[r.tokens.clone()],
            None => &[],
        }
    }

    /// Current offsets, row-major
    pub fn offsets(&self) -> Vec<f32> {
        self.tokens.iter().map(|t| t.offset).collect()
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Override a token's velocity
    #[cfg(test)]
    pub(crate) fn set_velocity(&mut self, row: usize, token: usize, velocity: f32) {
        if let Some(r) = self.rows.get(row)
            && token < r.len()
        {
            self.tokens[r.tokens.start + token].velocity = velocity;
        }
    }
}

/// Starting offsets: the row's words as one centered cluster
///
/// Words keep their measured positions and share one offset, except that any
/// pair measured closer than `gap` is spread to exactly `gap` first.
fn initial_offsets(row: &RowLayout, params: &DriftParams) -> Vec<f32> {
    let mut spread = Vec::with_capacity(row.tokens.len());
    let mut prev_right: Option<f32> = None;
    for item in &row.tokens {
        let left = match prev_right {
            Some(right) => item.x.max(right + params.gap),
            None => item.x,
        };
        spread.push(left - item.x);
        prev_right = Some(left + item.width);
    }

    let Some((min_x, max_right)) = row
        .tokens
        .iter()
        .zip(&spread)
        .map(|(t, s)| (t.x + s, t.x + s + t.width))
        .reduce(|(l, r), (tl, tr)| (l.min(tl), r.max(tr)))
    else {
        return spread;
    };

    let group = max_right - min_x;
    let available = row.width - 2.0 * params.side_padding;
    let desired_left = params.side_padding + ((available - group) / 2.0).max(0.0);
    let delta = desired_left - min_x;
    spread.iter().map(|s| s + delta).collect()
}
