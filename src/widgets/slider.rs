//! Slider widget: a value in `0..=range` with a proportional pill.

use crate::resource::{ImageData, ResourceSlot};

#[derive(Debug)]
pub struct SliderPeer {
    pub value: i32,
    pub range: i32,
    pub pill: ResourceSlot<ImageData>,
    pub background: ResourceSlot<ImageData>,
}

impl SliderPeer {
    pub fn new(range: i32) -> Self {
        Self {
            value: 0,
            range: range.max(1),
            pill: ResourceSlot::empty(),
            background: ResourceSlot::empty(),
        }
    }

    /// Move the value by `delta`, clamped to the range. Returns true if the
    /// value changed.
    pub fn scroll_by(&mut self, delta: i32) -> bool {
        let next = (self.value + delta).clamp(0, self.range);
        if next == self.value {
            return false;
        }
        self.value = next;
        true
    }
}
