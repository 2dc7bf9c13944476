//! Widget tree and per-widget state.
//!
//! Widgets live in a slotmap arena ([`tree::WidgetTree`]) and are addressed
//! by [`tree::WidgetId`]. Every widget carries a [`core::WidgetCore`] with
//! geometry, style identity and invalidation epochs, plus a kind-specific
//! peer payload defined in [`crate::widgets`].

pub mod core;
pub mod tree;

pub use self::core::{PreferredBounds, WidgetCore};
pub use self::tree::{WidgetId, WidgetTree};

/// Draw layers. A widget paints only when the draw pass's layer mask
/// intersects its layer; popups use the mask to composite the window
/// beneath them before painting their own frame.
pub mod layer {
    pub const FRAME: u32 = 0x01;
    pub const TITLE: u32 = 0x02;
    pub const CONTENT: u32 = 0x04;
    pub const CONTENT_OFF_STAGE: u32 = 0x08;
    pub const CONTENT_ON_STAGE: u32 = 0x10;
    pub const LOWER: u32 = 0x20;
    pub const ALL: u32 = 0xFFFF;
}
