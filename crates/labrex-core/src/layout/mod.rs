//! Line reconstruction from unordered OCR tokens.
//!
//! OCR emits tokens in detection order with pixel bounding boxes; this module
//! rebuilds the logical text rows by grouping tokens into vertical bands.

use tracing::trace;

use crate::tokens::Token;

/// A reconstructed text line: tokens in one vertical band, left-to-right.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Tokens belonging to this line, ordered by their left edge.
    pub tokens: Vec<Token>,
}

impl Line {
    /// Number of tokens in the line.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True when the line holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token texts joined with single spaces.
    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Arithmetic mean of the token confidences, unrounded.
    pub fn mean_confidence(&self) -> f64 {
        if self.tokens.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.tokens.iter().map(|t| t.confidence).sum();
        sum / self.tokens.len() as f64
    }
}

/// Groups tokens into lines based on vertical proximity.
pub struct LineReconstructor {
    y_tolerance: u32,
}

impl LineReconstructor {
    /// Create a reconstructor with the default 20 px tolerance.
    pub fn new() -> Self {
        Self { y_tolerance: 20 }
    }

    /// Set the maximum vertical distance for a token to join the current line.
    pub fn with_y_tolerance(mut self, y_tolerance: u32) -> Self {
        self.y_tolerance = y_tolerance;
        self
    }

    /// Group tokens into ordered lines.
    ///
    /// Tokens are sorted by `(top, left)` first, so the result does not
    /// depend on input order. The walk keeps a running band coordinate that
    /// is averaged pairwise with each joining token's `top`
    /// (`current_y = (current_y + top) / 2`). This is not a true cumulative
    /// mean and can drift on long lines; the behavior is kept as-is for
    /// compatibility with existing extraction output.
    pub fn reconstruct(&self, tokens: &[Token]) -> Vec<Line> {
        let mut sorted: Vec<Token> = tokens.to_vec();
        sorted.sort_by(|a, b| (a.top, a.left).cmp(&(b.top, b.left)));

        let mut lines: Vec<Line> = Vec::new();
        let mut current: Vec<Token> = Vec::new();
        let mut current_y: Option<f64> = None;

        for token in sorted {
            match current_y {
                None => {
                    current_y = Some(token.top as f64);
                    current.push(token);
                }
                Some(y) if (token.top as f64 - y).abs() <= self.y_tolerance as f64 => {
                    current_y = Some((y + token.top as f64) / 2.0);
                    current.push(token);
                }
                Some(_) => {
                    current.sort_by_key(|t| t.left);
                    lines.push(Line {
                        tokens: std::mem::take(&mut current),
                    });
                    current_y = Some(token.top as f64);
                    current.push(token);
                }
            }
        }

        // Flush the final line
        if !current.is_empty() {
            current.sort_by_key(|t| t.left);
            lines.push(Line { tokens: current });
        }

        trace!("reconstructed {} lines from {} tokens", lines.len(), tokens.len());

        lines
    }
}

impl Default for LineReconstructor {
    fn default() -> Self {
        Self::new()
    }
}
