//! Menu widget: a vertical list of fixed-height items with an optional
//! scrollbar column.
//!
//! The geometry contract: `num_widgets = bounds.h / item_height` rows fit
//! on screen, and the scrollbar appears exactly when the list is longer
//! than that. Both values are computed during the skin pass and recomputed
//! during layout, because either the bounds or the item height may have
//! changed in between.

use crate::resource::{FontData, ResourceSlot};
use crate::style::value::Color;
use crate::widget::tree::WidgetId;

/// Item height used when the style table provides none.
pub const DEFAULT_ITEM_HEIGHT: i32 = 20;

#[derive(Debug)]
pub struct MenuPeer {
    /// Pixel height of one row, from the `itemHeight` style key.
    pub item_height: i32,
    /// Rows that fit in the current bounds.
    pub num_widgets: usize,
    /// Total items in the backing list (item children, scrollbar excluded).
    pub list_size: usize,
    pub has_scrollbar: bool,
    /// Index of the selected item.
    pub selected: usize,
    /// First visible item index.
    pub top: usize,
    /// Accelerator overlay text shown during fast scrolling.
    pub accel_text: Option<String>,
    pub font: ResourceSlot<FontData>,
    pub fg: Color,
    /// The scrollbar child, excluded from the item run during layout.
    pub scrollbar: Option<WidgetId>,
}

impl Default for MenuPeer {
    fn default() -> Self {
        Self {
            item_height: DEFAULT_ITEM_HEIGHT,
            num_widgets: 0,
            list_size: 0,
            has_scrollbar: false,
            selected: 0,
            top: 0,
            accel_text: None,
            font: ResourceSlot::empty(),
            fg: Color::WHITE,
            scrollbar: None,
        }
    }
}

impl MenuPeer {
    /// Recompute the visible row count and scrollbar need from the current
    /// bounds height.
    pub fn update_counts(&mut self, bounds_h: i32, list_size: usize) {
        self.num_widgets = if self.item_height > 0 {
            (bounds_h / self.item_height).max(0) as usize
        } else {
            0
        };
        self.list_size = list_size;
        self.has_scrollbar = list_size > self.num_widgets;
        // A shrunken list pulls the selection and scroll window back in.
        self.selected = self.selected.min(list_size.saturating_sub(1));
        let max_top = list_size.saturating_sub(self.num_widgets.max(1));
        self.top = self.top.min(max_top);
    }

    /// Move the selection by `delta`, clamped to the list, scrolling the
    /// visible window to keep the selection on screen. Returns true if the
    /// selection moved.
    pub fn scroll_by(&mut self, delta: i32) -> bool {
        if self.list_size == 0 {
            return false;
        }
        let max = self.list_size - 1;
        let next = (self.selected as i64 + delta as i64).clamp(0, max as i64) as usize;
        if next == self.selected {
            return false;
        }
        self.selected = next;
        if self.num_widgets > 0 {
            if self.selected < self.top {
                self.top = self.selected;
            } else if self.selected >= self.top + self.num_widgets {
                self.top = self.selected + 1 - self.num_widgets;
            }
        }
        true
    }
}

// ===========================================================================
// Tests
// ===========================================================================
