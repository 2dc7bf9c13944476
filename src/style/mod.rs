//! Hierarchical style system.
//!
//! - [`value`]: property values (colors, alignments, resource handles,
//!   computed rules).
//! - [`table`]: the nested table of named scopes a skin defines.
//! - [`resolve`]: the suffix cascade that maps a widget's ancestor path to
//!   a property value.

pub mod resolve;
pub mod table;
pub mod value;

pub use self::resolve::{
    resolve, resolve_align, resolve_bool, resolve_color, resolve_font, resolve_image,
    resolve_int, resolve_or,
};
pub use self::table::StyleTable;
pub use self::value::{Align, Color, HAlign, StyleRule, StyleValue, VAlign};
