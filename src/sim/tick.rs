//! Per-frame drift update
//!
//! Rows are independent. Within a row tokens update left to right, so each
//! token is bounded by its left neighbour's new position and its right
//! neighbour's old one.

use super::state::DriftState;
use crate::clamp_frame_dt;
use crate::consts::*;

/// Which way a clamp pushed a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reflect {
    Right,
    Left,
}

/// Allowed offset range for one token on this tick
#[derive(Debug, Clone, Copy)]
struct Bounds {
    min: f32,
    max: f32,
    /// `min` comes from the left neighbour rather than the row edge
    min_from_neighbour: bool,
    /// `max` comes from the right neighbour rather than the row edge
    max_from_neighbour: bool,
}

impl Bounds {
    /// Clamp an offset, reporting which bound (if any) was hit
    fn clamp(&self, offset: f32) -> (f32, Option<Reflect>) {
        if self.min > self.max {
            // Cramped: spacing between words beats edge padding
            return if self.max_from_neighbour && !self.min_from_neighbour {
                (self.max, Some(Reflect::Left))
            } else {
                (self.min, Some(Reflect::Right))
            };
        }
        if offset < self.min {
            (self.min, Some(Reflect::Right))
        } else if offset > self.max {
            (self.max, Some(Reflect::Left))
        } else {
            (offset, None)
        }
    }
}

/// Advance every row by one frame of `elapsed` seconds
pub fn tick(state: &mut DriftState, elapsed: f32) {
    if state.tokens.is_empty() {
        return;
    }
    let dt = clamp_frame_dt(elapsed);
    let params = state.params;

    for row in &state.rows {
        let tokens = &mut state.tokens[row.tokens.clone()];
        let last = tokens.len().saturating_sub(1);

        for i in 0..tokens.len() {
            let base = tokens[i].base;
            let width = tokens[i].width;

            let bounds = Bounds {
                min: if i == 0 {
                    params.side_padding - base
                } else {
                    tokens[i - 1].right() + params.gap - base
                },
                max: if i == last {
                    row.width - params.side_padding - base - width
                } else {
                    tokens[i + 1].left() - params.gap - base - width
                },
                min_from_neighbour: i > 0,
                max_from_neighbour: i < last,
            };

            let token = &mut tokens[i];
            let (accepted, hit) = bounds.clamp(token.offset + token.velocity * dt);
            match hit {
                Some(Reflect::Right) => token.velocity = reflect_speed(token.velocity),
                Some(Reflect::Left) => token.velocity = -reflect_speed(token.velocity),
                None => {}
            }
            token.offset = accepted;

            if (accepted - token.prev_offset).abs() < STAGNATION_EPSILON {
                token.stagnant_ticks += 1;
            } else {
                token.stagnant_ticks = 0;
            }

            if token.stagnant_ticks > STAGNATION_THRESHOLD {
                token.velocity = if token.velocity == 0.0 {
                    -REVERSE_FALLBACK_SPEED
                } else {
                    -token.velocity
                };
                let (nudged, _) = bounds.clamp(accepted + token.velocity * dt * 2.0);
                token.offset = nudged;
                token.stagnant_ticks = 0;
                log::trace!(
                    "Token {} in row {} stuck, reversing to {:.1}px/s",
                    i,
                    token.row,
                    token.velocity
                );
            }

            token.prev_offset = accepted;
        }
    }

    state.time_ticks += 1;
}

/// Magnitude to bounce away with; a resting token gets a nudge
#[inline]
fn reflect_speed(velocity: f32) -> f32 {
    if velocity == 0.0 {
        REFLECT_FALLBACK_SPEED
    } else {
        velocity.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{MonospaceMetrics, RowLayout, TokenLayout};
    use crate::settings::{DriftParams, Profile};
    use crate::text::parse_rows;
    use proptest::prelude::*;

    const EPS: f32 = 1e-3;

    fn params(side_padding: f32) -> DriftParams {
        DriftParams {
            side_padding,
            ..Profile::Full.params()
        }
    }

    fn row(width: f32, items: &[(f32, f32)]) -> RowLayout {
        RowLayout {
            width,
            tokens: items
                .iter()
                .map(|&(x, width)| TokenLayout { x, width })
                .collect(),
        }
    }

    fn assert_no_overlap(state: &DriftState) {
        for r in 0..state.rows.len() {
            for pair in state.row_tokens(r).windows(2) {
                assert!(
                    pair[0].right() + state.params.gap <= pair[1].left() + EPS,
                    "overlap in row {r}: {:?} / {:?}",
                    pair[0],
                    pair[1]
                );
            }
        }
    }

    fn assert_contained(state: &DriftState) {
        let pad = state.params.side_padding;
        for r in 0..state.rows.len() {
            let tokens = state.row_tokens(r);
            if let (Some(first), Some(last)) = (tokens.first(), tokens.last()) {
                assert!(first.left() >= pad - EPS, "left edge {}", first.left());
                assert!(
                    last.right() <= state.rows[r].width - pad + EPS,
                    "right edge {}",
                    last.right()
                );
            }
        }
    }

    #[test]
    fn test_two_tokens_collide_and_reflect() {
        let mut state = DriftState::new(&[row(500.0, &[(0.0, 80.0), (90.0, 100.0)])], params(20.0));
        state.set_velocity(0, 0, 50.0);
        state.set_velocity(0, 1, -50.0);

        let mut flips = [0; 2];
        let mut last_sign = [1.0f32, -1.0];
        for _ in 0..63 {
            tick(&mut state, 0.016);
            assert_no_overlap(&state);
            assert_contained(&state);
            for (i, t) in state.tokens.iter().enumerate() {
                if t.velocity.signum() != last_sign[i] {
                    flips[i] += 1;
                    last_sign[i] = t.velocity.signum();
                }
            }
        }
        assert!(flips[0] >= 1, "left token never reflected");
        assert!(flips[1] >= 1, "right token never reflected");
    }

    #[test]
    fn test_single_token_bounces_between_edges() {
        let mut state = DriftState::new(&[row(300.0, &[(0.0, 50.0)])], params(20.0));
        state.set_velocity(0, 0, 200.0);

        let mut hit_right = false;
        let mut returned_left = false;
        for _ in 0..300 {
            tick(&mut state, 0.016);
            let t = &state.tokens[0];
            assert!(t.left() >= 20.0 - EPS && t.right() <= 280.0 + EPS);
            if t.velocity < 0.0 {
                hit_right = true;
            }
            if hit_right && t.velocity > 0.0 {
                returned_left = true;
            }
        }
        assert!(hit_right);
        assert!(returned_left);
    }

    #[test]
    fn test_reflection_forces_direction() {
        let mut state = DriftState::new(&[row(300.0, &[(0.0, 50.0)])], params(20.0));
        state.tokens[0].offset = 228.0;
        state.set_velocity(0, 0, 100.0);
        tick(&mut state, 0.05);
        assert_eq!(state.tokens[0].right(), 280.0);
        assert_eq!(state.tokens[0].velocity, -100.0);

        state.tokens[0].offset = 21.0;
        state.set_velocity(0, 0, -30.0);
        tick(&mut state, 0.05);
        assert_eq!(state.tokens[0].left(), 20.0);
        assert_eq!(state.tokens[0].velocity, 30.0);
    }

    #[test]
    fn test_zero_velocity_reflects_with_fallback() {
        let mut state = DriftState::new(&[row(300.0, &[(0.0, 50.0)])], params(20.0));
        state.tokens[0].offset = 0.0;
        state.set_velocity(0, 0, 0.0);
        tick(&mut state, 0.016);
        assert_eq!(state.tokens[0].left(), 20.0);
        assert_eq!(state.tokens[0].velocity, REFLECT_FALLBACK_SPEED);
    }

    #[test]
    fn test_elapsed_is_clamped() {
        let mut state = DriftState::new(&[row(1000.0, &[(0.0, 50.0)])], params(20.0));
        state.set_velocity(0, 0, 100.0);
        let start = state.tokens[0].offset;
        tick(&mut state, 10.0);
        assert!((state.tokens[0].offset - start - 5.0).abs() < EPS);

        let start = state.tokens[0].offset;
        tick(&mut state, 0.0);
        assert!((state.tokens[0].offset - start - 1.6).abs() < EPS);
    }

    #[test]
    fn test_stagnant_token_reverses() {
        // Creeping too slowly to register as movement
        let mut state = DriftState::new(&[row(300.0, &[(0.0, 50.0)])], params(20.0));
        state.tokens[0].offset = 100.0;
        state.tokens[0].prev_offset = 100.0;
        state.set_velocity(0, 0, 0.001);

        let mut reversed_at = None;
        for n in 1..=STAGNATION_THRESHOLD + 1 {
            tick(&mut state, 0.016);
            assert!(state.tokens[0].stagnant_ticks <= STAGNATION_THRESHOLD);
            if state.tokens[0].velocity < 0.0 {
                reversed_at = Some(n);
                break;
            }
        }
        assert_eq!(reversed_at, Some(STAGNATION_THRESHOLD + 1));
        assert_eq!(state.tokens[0].stagnant_ticks, 0);
        assert!(state.tokens[0].right() <= 280.0 + EPS);
    }

    #[test]
    fn test_deadlocked_pair_separates() {
        // Two tokens squeezed with no free space, both at rest
        let p = params(20.0);
        let mut state = DriftState::new(&[row(248.0, &[(0.0, 100.0), (108.0, 100.0)])], p);
        state.set_velocity(0, 0, 0.0);
        state.set_velocity(0, 1, 0.0);

        for _ in 0..200 {
            tick(&mut state, 0.016);
            assert_no_overlap(&state);
            for t in &state.tokens {
                assert!(t.stagnant_ticks <= STAGNATION_THRESHOLD);
            }
        }
        assert!(state.tokens.iter().all(|t| t.velocity != 0.0));
    }

    #[test]
    fn test_cramped_row_keeps_spacing() {
        // Tokens wider than the row: edge padding yields to spacing
        let mut state = DriftState::new(
            &[row(150.0, &[(0.0, 60.0), (70.0, 60.0), (140.0, 60.0)])],
            params(20.0),
        );
        for _ in 0..120 {
            tick(&mut state, 0.016);
            assert_no_overlap(&state);
        }
    }

    #[test]
    fn test_tight_base_spacing_resolved_on_first_tick() {
        // Measured spacing (2px) smaller than the gap (8px)
        let mut state = DriftState::new(
            &[row(600.0, &[(0.0, 50.0), (52.0, 50.0), (104.0, 50.0)])],
            params(20.0),
        );
        tick(&mut state, 0.016);
        assert_no_overlap(&state);
        assert_contained(&state);
    }

    #[test]
    fn test_close_words_in_exact_fit_row_stay_contained() {
        // 50 + 8 + 50 + 2 * 28 = 164: room for padding and gap, nothing spare
        let mut state = DriftState::new(
            &[row(164.0, &[(0.0, 50.0), (52.0, 50.0)])],
            Profile::Full.params(),
        );
        assert_no_overlap(&state);
        assert_contained(&state);
        for _ in 0..120 {
            tick(&mut state, 0.016);
            assert_no_overlap(&state);
            assert_contained(&state);
        }
    }

    #[test]
    fn test_empty_row_is_noop() {
        let mut state = DriftState::new(&[row(300.0, &[]), row(0.0, &[])], params(20.0));
        let before = state.clone();
        tick(&mut state, 0.016);
        assert_eq!(state, before);

        let mut empty = DriftState::empty(params(20.0));
        tick(&mut empty, 0.016);
        assert_eq!(empty, DriftState::empty(params(20.0)));
    }

    #[test]
    fn test_rows_are_independent() {
        let layout = vec![
            row(500.0, &[(0.0, 80.0), (90.0, 100.0)]),
            row(500.0, &[(0.0, 40.0)]),
        ];
        let mut both = DriftState::new(&layout, params(20.0));
        let mut alone = DriftState::new(&layout[..1], params(20.0));
        for _ in 0..100 {
            tick(&mut both, 0.016);
            tick(&mut alone, 0.016);
        }
        assert_eq!(both.row_tokens(0), alone.row_tokens(0));
    }

    #[test]
    fn test_profile_text_simulation() {
        let rows = parse_rows("design engineer\nbuilding playful, useful things on the web");
        let layout = MonospaceMetrics::default().layout(&rows, 900.0);
        for profile in [Profile::Full, Profile::Compact] {
            let mut state = DriftState::new(&layout, profile.params());
            for _ in 0..600 {
                tick(&mut state, 1.0 / 60.0);
                assert_no_overlap(&state);
                assert_contained(&state);
            }
            assert_eq!(state.time_ticks, 600);
        }
    }

    fn arb_layout() -> impl Strategy<Value = (f32, Vec<(f32, f32)>)> {
        // Measured spacing may be tighter than the gap; the row always fits
        // the words, their gaps and both paddings
        prop::collection::vec((10.0f32..120.0, 0.0f32..40.0), 1..6).prop_flat_map(|items| {
            let gap = Profile::Full.params().gap;
            let mut x = 0.0;
            let mut needed = 0.0;
            let tokens: Vec<(f32, f32)> = items
                .iter()
                .map(|&(w, space)| {
                    let t = (x, w);
                    x += w + space;
                    needed += w + space.max(gap);
                    t
                })
                .collect();
            let min_width = needed + 56.0;
            (min_width..min_width + 600.0, Just(tokens))
        })
    }

    fn arb_dts() -> impl Strategy<Value = Vec<f32>> {
        prop::collection::vec(0.0f32..0.1, 1..400)
    }

    proptest! {
        #[test]
        fn prop_invariants_hold((width, items) in arb_layout(), dts in arb_dts()) {
            let mut state = DriftState::new(&[row(width, &items)], Profile::Full.params());
            for dt in dts {
                tick(&mut state, dt);
                assert_no_overlap(&state);
                assert_contained(&state);
                for t in &state.tokens {
                    prop_assert!(t.stagnant_ticks <= STAGNATION_THRESHOLD);
                }
            }
        }

        #[test]
        fn prop_cramped_never_overlaps(
            items in prop::collection::vec(10.0f32..120.0, 2..6),
            width in 0.0f32..200.0,
            dts in arb_dts(),
        ) {
            let mut x = 0.0;
            let layout: Vec<(f32, f32)> = items
                .iter()
                .map(|&w| {
                    let t = (x, w);
                    x += w + 4.0;
                    t
                })
                .collect();
            let mut state = DriftState::new(&[row(width, &layout)], Profile::Compact.params());
            for dt in dts {
                tick(&mut state, dt);
                assert_no_overlap(&state);
            }
        }

        #[test]
        fn prop_deterministic_replay((width, items) in arb_layout(), dts in arb_dts()) {
            let layout = [row(width, &items)];
            let mut a = DriftState::new(&layout, Profile::Full.params());
            let mut b = DriftState::new(&layout, Profile::Full.params());
            for &dt in &dts {
                tick(&mut a, dt);
                tick(&mut b, dt);
                prop_assert_eq!(a.offsets(), b.offsets());
            }
            prop_assert_eq!(a, b);
        }
    }
}
