//! CSS-style padding shorthand.

use serde::{Deserialize, Serialize};

use crate::error::GenerateError;
use crate::params::parse_pixels;

/// Padding in pixels on each side of a rendered label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaddingBox {
    /// Top padding.
    pub top: u32,
    /// Right padding.
    pub right: u32,
    /// Bottom padding.
    pub bottom: u32,
    /// Left padding.
    pub left: u32,
}

impl PaddingBox {
    /// The same padding on all four sides.
    #[must_use]
    pub fn uniform(value: u32) -> Self {
        Self { top: value, right: value, bottom: value, left: value }
    }

    /// Parse a css-style padding declaration:
    ///
    /// ```text
    /// 10          all sides
    /// 10 5        top/bottom, left/right
    /// 10 5 10     top, left/right, bottom
    /// 10 5 10 5   top, right, bottom, left
    /// ```
    ///
    /// Values may carry a `px` suffix.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::InvalidPadding`] for any other token count or
    /// for a token that is not a non-negative pixel length.
    pub fn parse(shorthand: &str) -> Result<Self, GenerateError> {
        let invalid = || GenerateError::InvalidPadding(shorthand.to_string());
        let parts = shorthand
            .split_whitespace()
            .map(|token| parse_pixels(token).ok_or_else(invalid))
            .collect::<Result<Vec<_>, _>>()?;

        match parts[..] {
            [p] => Ok(Self::uniform(p)),
            [p, q] => Ok(Self { top: p, right: q, bottom: p, left: q }),
            [p, q, r] => Ok(Self { top: p, right: q, bottom: r, left: q }),
            [top, right, bottom, left] => Ok(Self { top, right, bottom, left }),
            _ => Err(invalid()),
        }
    }

    /// Canvas size needed to hold content of the given size plus this padding.
    #[must_use]
    pub fn outer_size(&self, width: u32, height: u32) -> (u32, u32) {
        (
            self.left.saturating_add(width).saturating_add(self.right),
            self.top.saturating_add(height).saturating_add(self.bottom),
        )
    }
}

/// Per-side padding overrides applied on top of a shorthand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaddingSides {
    /// Explicit top padding.
    pub top: Option<u32>,
    /// Explicit right padding.
    pub right: Option<u32>,
    /// Explicit bottom padding.
    pub bottom: Option<u32>,
    /// Explicit left padding.
    pub left: Option<u32>,
}

impl PaddingSides {
    /// True when no side was given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Resolve against an optional shorthand. Explicit sides win; a side with
    /// neither input is 0.
    #[must_use]
    pub fn resolve(&self, shorthand: Option<PaddingBox>) -> PaddingBox {
        let base = shorthand.unwrap_or_default();
        PaddingBox {
            top: self.top.unwrap_or(base.top),
            right: self.right.unwrap_or(base.right),
            bottom: self.bottom.unwrap_or(base.bottom),
            left: self.left.unwrap_or(base.left),
        }
    }
}
