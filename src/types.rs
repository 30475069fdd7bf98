//! Strongly-typed value types shared across the crate.
//!
//! Extents come from the text-shaping engine's flat coordinate space; sides and
//! alignment are the user-facing knobs of a text path.

use std::fmt;

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is negative when non-negative required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Validate that a value is finite (rejects NaN/infinite).
#[inline]
pub fn check_finite(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else {
        Ok(val)
    }
}

/// Validate that a value is finite and not negative.
#[inline]
pub fn check_non_negative(val: f64) -> Result<f64, NumericError> {
    let val = check_finite(val)?;
    if val < 0.0 {
        Err(NumericError::Negative)
    } else {
        Ok(val)
    }
}

/// Axis-aligned rectangle in the shaping engine's coordinate space.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Extent {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Extent {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Extent { x, y, width, height }
    }

    /// Right edge (`x + width`)
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`)
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Smallest extent covering both `self` and `other`.
    pub fn union(&self, other: &Extent) -> Extent {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Extent {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }
}

/// An [`Extent`] plus the offset from the top of its text line to the baseline.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct GlyphExtent {
    pub extent: Extent,
    pub baseline: f64,
}

impl GlyphExtent {
    pub fn new(x: f64, y: f64, width: f64, height: f64, baseline: f64) -> Self {
        GlyphExtent {
            extent: Extent::new(x, y, width, height),
            baseline,
        }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.extent.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.extent.y
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.extent.width
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.extent.height
    }
}

/// Side of a directed edge.
///
/// For the horizontal segment `P1------->P2` in screen coordinates (y grows
/// downward), the left-hand side is everything above the segment and the
/// right-hand side everything below it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Side {
    #[default]
    Left,
    Right,
}

impl Side {
    /// The opposite side. Useful when a y-axis flip swaps "above" and "below".
    pub fn flipped(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Where the text starts relative to the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Horizontal heading of a segment, judged on x-coordinates only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HorizontalDirection {
    LeftToRight,
    RightToLeft,
    /// Vertical (or zero-length) segment
    Ambiguous,
}
