//! Per-widget core state: geometry, style identity, invalidation epochs.

use crate::geometry::{Insets, Rect};
use crate::style::value::Align;
use crate::widget::layer;

// ---------------------------------------------------------------------------
// PreferredBounds
// ---------------------------------------------------------------------------

/// A widget's requested placement within its parent's content box.
///
/// `None` in any field means "fill": the parent substitutes the matching
/// edge or extent of its own content box during layout. Containers that
/// measure children (the menu sizing its scrollbar column) skip `None`
/// fields the same way.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PreferredBounds {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub w: Option<i32>,
    pub h: Option<i32>,
}

impl PreferredBounds {
    /// Fill the parent's content box entirely.
    pub const FILL: PreferredBounds = PreferredBounds { x: None, y: None, w: None, h: None };

    /// Resolve against a content box, substituting its edges for `None`.
    pub fn resolve(self, content: Rect) -> Rect {
        Rect {
            x: self.x.unwrap_or(content.x),
            y: self.y.unwrap_or(content.y),
            w: self.w.unwrap_or(content.w),
            h: self.h.unwrap_or(content.h),
        }
    }
}

// ---------------------------------------------------------------------------
// WidgetCore
// ---------------------------------------------------------------------------

/// State shared by every widget kind.
///
/// The two epoch fields implement lazy invalidation: a widget is re-skinned
/// when `style_epoch` falls behind the framework's style origin, and re-laid
/// out when `layout_epoch` falls behind the layout origin. Both start at 0,
/// which is always stale (origins start at 1).
#[derive(Debug)]
pub struct WidgetCore {
    /// Absolute bounds on the framebuffer.
    pub bounds: Rect,
    /// Placement request consulted by the parent's layout.
    pub preferred: PreferredBounds,
    /// Interior spacing between the bounds and content.
    pub padding: Insets,
    /// Exterior spacing reserved around the widget by containers.
    pub border: Insets,
    /// Draw layer mask, one of [`crate::widget::layer`].
    pub layer: u32,
    pub visible: bool,
    /// This widget's segment in the style path, if it contributes one.
    pub style_name: Option<String>,
    /// Cached dotted ancestor path; rebuilt after reparenting or renaming.
    pub(crate) style_path: Option<String>,
    pub(crate) style_epoch: u64,
    pub(crate) layout_epoch: u64,
    /// Content (text, counts) changed without a geometry change; a prepare
    /// step runs before the next draw.
    pub content_invalid: bool,
}

impl Default for WidgetCore {
    fn default() -> Self {
        Self {
            bounds: Rect::EMPTY,
            preferred: PreferredBounds::FILL,
            padding: Insets::ZERO,
            border: Insets::ZERO,
            layer: layer::CONTENT,
            visible: true,
            style_name: None,
            style_path: None,
            style_epoch: 0,
            layout_epoch: 0,
            content_invalid: false,
        }
    }
}

impl WidgetCore {
    /// Core with the given style-path segment.
    pub fn named(style_name: impl Into<String>) -> Self {
        Self { style_name: Some(style_name.into()), ..Self::default() }
    }

    /// Horizontal offset of content of width `content_w`, relative to
    /// `bounds.x`.
    ///
    /// Content wider than the padded box is pinned to the padding-left edge
    /// regardless of the requested alignment.
    pub fn halign(&self, align: Align, content_w: i32) -> i32 {
        use crate::style::value::HAlign;

        let avail = self.bounds.w - self.padding.horizontal();
        if content_w >= avail {
            return self.padding.left;
        }
        match align.horizontal() {
            HAlign::Left => self.padding.left,
            HAlign::Center => self.padding.left + (avail - content_w) / 2,
            HAlign::Right => self.bounds.w - self.padding.right - content_w,
        }
    }

    /// Vertical offset of content of height `content_h`, relative to
    /// `bounds.y`.
    pub fn valign(&self, align: Align, content_h: i32) -> i32 {
        use crate::style::value::VAlign;

        let avail = self.bounds.h - self.padding.vertical();
        if content_h >= avail {
            return self.padding.top;
        }
        match align.vertical() {
            VAlign::Top => self.padding.top,
            VAlign::Center => self.padding.top + (avail - content_h) / 2,
            VAlign::Bottom => self.bounds.h - self.padding.bottom - content_h,
        }
    }

    /// The bounds shrunk by padding.
    pub fn content_box(&self) -> Rect {
        self.bounds.inset(self.padding)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::value::Align;

    fn core(w: i32, h: i32, padding: Insets) -> WidgetCore {
        WidgetCore {
            bounds: Rect::new(0, 0, w, h),
            padding,
            ..WidgetCore::default()
        }
    }

    // ── PreferredBounds ──────────────────────────────────────────────

    #[test]
    fn preferred_fill_takes_content_box() {
        let content = Rect::new(5, 6, 70, 80);
        assert_eq!(PreferredBounds::FILL.resolve(content), content);
    }

    #[test]
    fn preferred_partial_resolve() {
        let p = PreferredBounds { x: Some(1), y: None, w: Some(10), h: None };
        let r = p.resolve(Rect::new(5, 6, 70, 80));
        assert_eq!(r, Rect::new(1, 6, 10, 80));
    }

    // ── Alignment ────────────────────────────────────────────────────

    #[test]
    fn halign_positions() {
        let c = core(100, 20, Insets::new(4, 0, 6, 0));
        assert_eq!(c.halign(Align::Left, 30), 4);
        assert_eq!(c.halign(Align::Center, 30), 4 + (90 - 30) / 2);
        assert_eq!(c.halign(Align::Right, 30), 100 - 6 - 30);
    }

    #[test]
    fn valign_positions() {
        let c = core(100, 60, Insets::new(0, 3, 0, 5));
        assert_eq!(c.valign(Align::Top, 20), 3);
        assert_eq!(c.valign(Align::Center, 20), 3 + (52 - 20) / 2);
        assert_eq!(c.valign(Align::Bottom, 20), 60 - 5 - 20);
    }

    #[test]
    fn oversized_content_pins_to_leading_edge() {
        let c = core(40, 40, Insets::uniform(2));
        assert_eq!(c.halign(Align::Right, 50), 2);
        assert_eq!(c.valign(Align::Bottom, 50), 2);
    }

    #[test]
    fn corner_alignment_uses_both_components() {
        let c = core(100, 60, Insets::ZERO);
        assert_eq!(c.halign(Align::BottomRight, 10), 90);
        assert_eq!(c.valign(Align::BottomRight, 10), 50);
    }

    #[test]
    fn content_box_applies_padding() {
        let c = core(100, 60, Insets::new(1, 2, 3, 4));
        assert_eq!(c.content_box(), Rect::new(1, 2, 96, 54));
    }

    #[test]
    fn default_epochs_are_stale() {
        let c = WidgetCore::default();
        assert_eq!(c.style_epoch, 0);
        assert_eq!(c.layout_epoch, 0);
    }
}
