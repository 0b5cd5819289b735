//! Size constraints handed down the box tree.

use serde::Serialize;

use crate::error::FolioError;
use crate::model::Edges;

/// Available space for one layout step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConstraints {
    pub inline_min: f64,
    pub inline_max: f64,
    pub block_min: f64,
    pub block_max: f64,
    /// Block size left on the current page.
    pub remaining_block: f64,
    /// Whether content may break in the middle.
    pub allow_break: bool,
}

impl LayoutConstraints {
    /// Constraints for a container `inline_max` wide with unbounded height.
    pub fn new(inline_max: f64) -> Self {
        Self {
            inline_min: 0.0,
            inline_max,
            block_min: 0.0,
            block_max: f64::INFINITY,
            remaining_block: f64::INFINITY,
            allow_break: true,
        }
    }

    pub fn with_block_range(mut self, block_min: f64, block_max: f64) -> Self {
        self.block_min = block_min;
        self.block_max = block_max;
        self
    }

    pub fn with_inline_range(mut self, inline_min: f64, inline_max: f64) -> Self {
        self.inline_min = inline_min;
        self.inline_max = inline_max;
        self
    }

    pub fn with_remaining_block(mut self, remaining: f64) -> Self {
        self.remaining_block = remaining;
        self
    }

    /// Reject NaN, negative, and inverted ranges.
    pub fn validate(&self) -> Result<(), FolioError> {
        let ranges = [
            ("inline", self.inline_min, self.inline_max),
            ("block", self.block_min, self.block_max),
        ];
        for (axis, min, max) in ranges {
            if min.is_nan() || max.is_nan() || min < 0.0 || max < 0.0 {
                return Err(FolioError::invalid(format!(
                    "{axis} constraints must be non-negative numbers (got {min}..{max})"
                )));
            }
            if min > max {
                return Err(FolioError::invalid(format!(
                    "{axis} minimum {min} exceeds maximum {max}"
                )));
            }
        }
        if self.remaining_block.is_nan() || self.remaining_block < 0.0 {
            return Err(FolioError::invalid(
                "remaining block size must be non-negative",
            ));
        }
        Ok(())
    }

    /// Constraints for a child: the parent's content box, less the child's
    /// own margins. Minimums do not propagate.
    pub fn narrow(&self, margin: &Edges, frame: &Edges) -> Self {
        let inset = margin.horizontal() + frame.horizontal();
        let vertical = margin.vertical() + frame.vertical();
        Self {
            inline_min: 0.0,
            inline_max: (self.inline_max - inset).max(0.0),
            block_min: 0.0,
            block_max: (self.block_max - vertical).max(0.0),
            remaining_block: (self.remaining_block - vertical).max(0.0),
            allow_break: self.allow_break,
        }
    }

    pub fn clamp_inline(&self, value: f64) -> f64 {
        value.max(self.inline_min).min(self.inline_max)
    }

    pub fn clamp_block(&self, value: f64) -> f64 {
        value.max(self.block_min).min(self.block_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_subtracts_margin_and_frame() {
        let parent = LayoutConstraints::new(500.0).with_remaining_block(300.0);
        let child = parent.narrow(&Edges::uniform(10.0), &Edges::uniform(5.0));
        assert_eq!(child.inline_max, 470.0);
        assert_eq!(child.remaining_block, 270.0);
        assert!(child.block_max.is_infinite());
    }

    #[test]
    fn validate_rejects_inverted_and_negative_ranges() {
        assert!(LayoutConstraints::new(100.0).validate().is_ok());
        assert!(LayoutConstraints::new(-1.0).validate().is_err());
        assert!(LayoutConstraints::new(100.0)
            .with_inline_range(200.0, 100.0)
            .validate()
            .is_err());
        assert!(LayoutConstraints::new(f64::NAN).validate().is_err());
    }
}
