//! Text label widget.

use crate::resource::{FontData, ResourceSlot};
use crate::style::value::{Align, Color};

#[derive(Debug)]
pub struct LabelPeer {
    pub text: String,
    pub font: ResourceSlot<FontData>,
    pub fg: Color,
    pub align: Option<Align>,
}

impl LabelPeer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: ResourceSlot::empty(),
            fg: Color::WHITE,
            align: None,
        }
    }
}
