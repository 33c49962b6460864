//! Measured row geometry
//!
//! In the browser these come from `getBoundingClientRect` on the row and its
//! word spans. `MonospaceMetrics` stands in for a browser when there is none.

use serde::{Deserialize, Serialize};

use crate::text::WordRows;

/// A token's measured box, relative to its row's left edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TokenLayout {
    pub x: f32,
    pub width: f32,
}

/// A row's measured width and its tokens, left to right
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowLayout {
    pub width: f32,
    pub tokens: Vec<TokenLayout>,
}

/// Fixed-pitch text measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonospaceMetrics {
    /// Advance of one glyph (px)
    pub char_width: f32,
    /// Width of the space between words (px)
    pub space_width: f32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            char_width: 14.0,
            space_width: 14.0,
        }
    }
}

impl MonospaceMetrics {
    /// Lay every row out left-aligned inside a row of `row_width`
    pub fn layout(&self, rows: &WordRows, row_width: f32) -> Vec<RowLayout> {
        rows.rows
            .iter()
            .map(|row| {
                let mut x = 0.0;
                let tokens = row
                    .iter()
                    .map(|token| {
                        let width = token.text.chars().count() as f32 * self.char_width;
                        let item = TokenLayout { x, width };
                        x += width + self.space_width;
                        item
                    })
                    .collect();
                RowLayout {
                    width: row_width,
                    tokens,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::parse_rows;

    #[test]
    fn test_monospace_layout() {
        let rows = parse_rows("ab cde\nf");
        let metrics = MonospaceMetrics {
            char_width: 10.0,
            space_width: 5.0,
        };
        let layout = metrics.layout(&rows, 400.0);
        assert_eq!(layout.len(), 2);
        assert_eq!(layout[0].width, 400.0);
        assert_eq!(
            layout[0].tokens,
            vec![
                TokenLayout { x: 0.0, width: 20.0 },
                TokenLayout { x: 25.0, width: 30.0 },
            ]
        );
        assert_eq!(layout[1].tokens, vec![TokenLayout { x: 0.0, width: 10.0 }]);
    }

    #[test]
    fn test_layout_json_shape() {
        let json = r#"[{"width": 500, "tokens": [{"x": 0, "width": 80}]}]"#;
        let rows: Vec<RowLayout> = serde_json::from_str(json).unwrap();
        assert_eq!(rows[0].tokens[0].width, 80.0);
    }
}
