//! Root margin - grow or shrink the viewport test region
//!
//! Parsed from CSS-style margin strings: one to four components, each a
//! `px` length, a `%` of the viewport, or a bare `0`. Components follow the
//! CSS shorthand order (top, right, bottom, left).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::layout::Rect;

/// Root margin parse failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarginParseError {
    #[error("root margin is empty")]
    Empty,

    #[error("root margin has {0} components, expected 1 to 4")]
    TooManyComponents(usize),

    #[error("invalid root margin length `{0}`, expected px or %")]
    InvalidLength(String),
}

/// One margin component.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MarginLength {
    Px(f32),
    Percent(f32),
}

impl MarginLength {
    /// Resolve against the viewport extent on the same axis.
    pub fn resolve(self, basis: f32) -> f32 {
        match self {
            MarginLength::Px(px) => px,
            MarginLength::Percent(pct) => basis * pct / 100.0,
        }
    }
}

impl FromStr for MarginLength {
    type Err = MarginParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || MarginParseError::InvalidLength(raw.to_string());

        let (number, make): (&str, fn(f32) -> MarginLength) =
            if let Some(number) = raw.strip_suffix("px") {
                (number, MarginLength::Px)
            } else if let Some(number) = raw.strip_suffix('%') {
                (number, MarginLength::Percent)
            } else if raw == "0" {
                return Ok(MarginLength::Px(0.0));
            } else {
                return Err(invalid());
            };

        let value: f32 = number.parse().map_err(|_| invalid())?;
        if !value.is_finite() {
            return Err(invalid());
        }
        Ok(make(value))
    }
}

impl fmt::Display for MarginLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarginLength::Px(px) => write!(f, "{px}px"),
            MarginLength::Percent(pct) => write!(f, "{pct}%"),
        }
    }
}

/// Per-edge viewport adjustment. Positive grows the region, negative shrinks it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootMargin {
    pub top: MarginLength,
    pub right: MarginLength,
    pub bottom: MarginLength,
    pub left: MarginLength,
}

impl RootMargin {
    /// No adjustment.
    pub const ZERO: RootMargin = RootMargin {
        top: MarginLength::Px(0.0),
        right: MarginLength::Px(0.0),
        bottom: MarginLength::Px(0.0),
        left: MarginLength::Px(0.0),
    };

    /// Apply the margin to a viewport rectangle.
    ///
    /// Vertical percentages resolve against the viewport height, horizontal
    /// ones against its width. A region shrunk past zero collapses to empty.
    pub fn apply(&self, viewport: Rect) -> Rect {
        let top = self.top.resolve(viewport.height);
        let bottom = self.bottom.resolve(viewport.height);
        let left = self.left.resolve(viewport.width);
        let right = self.right.resolve(viewport.width);

        Rect {
            x: viewport.x - left,
            y: viewport.y - top,
            width: (viewport.width + left + right).max(0.0),
            height: (viewport.height + top + bottom).max(0.0),
        }
    }
}

impl Default for RootMargin {
    fn default() -> Self {
        Self::ZERO
    }
}

impl FromStr for RootMargin {
    type Err = MarginParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let parts = raw
            .split_whitespace()
            .map(str::parse::<MarginLength>)
            .collect::<Result<Vec<_>, _>>()?;

        match parts.as_slice() {
            [] => Err(MarginParseError::Empty),
            [all] => Ok(RootMargin { top: *all, right: *all, bottom: *all, left: *all }),
            [vertical, horizontal] => Ok(RootMargin {
                top: *vertical,
                right: *horizontal,
                bottom: *vertical,
                left: *horizontal,
            }),
            [top, horizontal, bottom] => Ok(RootMargin {
                top: *top,
                right: *horizontal,
                bottom: *bottom,
                left: *horizontal,
            }),
            [top, right, bottom, left] => Ok(RootMargin {
                top: *top,
                right: *right,
                bottom: *bottom,
                left: *left,
            }),
            more => Err(MarginParseError::TooManyComponents(more.len())),
        }
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}
