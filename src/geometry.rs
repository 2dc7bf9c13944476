//! Core geometry types: Rect and Insets.
//!
//! These are the foundational coordinate types used throughout emberui for
//! widget bounds, dirty-region accumulation, and padding/border insets.
//! Coordinates are pixels on the device framebuffer.

// ---------------------------------------------------------------------------
// Rect
// ---------------------------------------------------------------------------

/// A rectangle defined by its top-left corner and size, in pixels.
///
/// This is the most heavily-used geometry type: widget bounds, clip regions
/// and the dirty-region accumulator are all `Rect`s. `union` and
/// `intersection` are marked `#[inline]` for the redraw hot path.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    /// An empty rectangle at the origin.
    pub const EMPTY: Rect = Rect { x: 0, y: 0, w: 0, h: 0 };

    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// The right edge (exclusive): `x + w`.
    #[inline]
    pub const fn right(self) -> i32 {
        self.x + self.w
    }

    /// The bottom edge (exclusive): `y + h`.
    #[inline]
    pub const fn bottom(self) -> i32 {
        self.y + self.h
    }

    /// Whether this rectangle has zero area.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Whether the point (x, y) lies inside this rectangle.
    #[inline]
    pub const fn contains(self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Whether `other` overlaps this rectangle (non-zero intersection area).
    #[inline]
    pub const fn overlaps(self, other: Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Compute the smallest rectangle containing both `self` and `other`.
    ///
    /// An empty rectangle is treated as the identity so that dirty-region
    /// accumulation can start from `Rect::EMPTY`.
    #[inline]
    pub const fn union(self, other: Rect) -> Rect {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }

        let x1 = if self.x < other.x { self.x } else { other.x };
        let y1 = if self.y < other.y { self.y } else { other.y };

        let sr = self.right();
        let or = other.right();
        let x2 = if sr > or { sr } else { or };

        let sb = self.bottom();
        let ob = other.bottom();
        let y2 = if sb > ob { sb } else { ob };

        Rect { x: x1, y: y1, w: x2 - x1, h: y2 - y1 }
    }

    /// Compute the intersection of two rectangles.
    ///
    /// Returns [`Rect::EMPTY`] if the rectangles do not overlap.
    #[inline]
    pub const fn intersection(self, other: Rect) -> Rect {
        let x1 = if self.x > other.x { self.x } else { other.x };
        let y1 = if self.y > other.y { self.y } else { other.y };

        let sr = self.right();
        let or = other.right();
        let x2 = if sr < or { sr } else { or };

        let sb = self.bottom();
        let ob = other.bottom();
        let y2 = if sb < ob { sb } else { ob };

        let w = x2 - x1;
        let h = y2 - y1;

        if w <= 0 || h <= 0 {
            Rect::EMPTY
        } else {
            Rect { x: x1, y: y1, w, h }
        }
    }

    /// Shrink this rectangle by the given insets on each side.
    ///
    /// Width and height are clamped at zero.
    #[inline]
    pub fn inset(self, insets: Insets) -> Rect {
        Rect {
            x: self.x + insets.left,
            y: self.y + insets.top,
            w: (self.w - insets.left - insets.right).max(0),
            h: (self.h - insets.top - insets.bottom).max(0),
        }
    }
}

// ---------------------------------------------------------------------------
// Insets
// ---------------------------------------------------------------------------

/// Per-side spacing, used for widget padding and border reservations.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Insets {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Insets {
    /// No spacing on any side.
    pub const ZERO: Insets = Insets { left: 0, top: 0, right: 0, bottom: 0 };

    /// Create insets with the given per-side values.
    #[inline]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Create uniform insets with the same value on every side.
    #[inline]
    pub const fn uniform(v: i32) -> Self {
        Self { left: v, top: v, right: v, bottom: v }
    }

    /// Total horizontal spacing: `left + right`.
    #[inline]
    pub const fn horizontal(self) -> i32 {
        self.left + self.right
    }

    /// Total vertical spacing: `top + bottom`.
    #[inline]
    pub const fn vertical(self) -> i32 {
        self.top + self.bottom
    }
}

// ===========================================================================
// Tests
// ===========================================================================
