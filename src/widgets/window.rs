//! Window widget: the root of one screenful of UI.
//!
//! Windows form the window stack; only the top window receives input.
//! A popup window is drawn over the window beneath it, which is composited
//! first so the popup only obscures its own bounds.

use crate::style::value::Color;
use crate::widget::tree::WidgetId;

#[derive(Debug, Default)]
pub struct WindowPeer {
    /// Popup windows composite the window beneath them before painting.
    pub is_popup: bool,
    /// Translucent wash painted between the window beneath and the popup
    /// frame, when styled.
    pub mask: Option<Color>,
    /// The widget that receives key and scroll input while this window is
    /// top of stack.
    pub focus: Option<WidgetId>,
}

impl WindowPeer {
    pub fn popup() -> Self {
        Self { is_popup: true, ..Self::default() }
    }
}
