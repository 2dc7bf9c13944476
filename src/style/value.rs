//! Style value types: Color, Align, StyleValue, computed rules.
//!
//! A style property is either a literal (number, color, image/font handle,
//! string) or a computed [`StyleRule`] invoked with the widget at lookup
//! time. Rules are re-evaluated on every lookup, never cached.

use std::fmt;
use std::sync::Arc;

use crate::error::UiError;
use crate::resource::{SharedFont, SharedImage};
use crate::widget::tree::{WidgetId, WidgetTree};

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// An RGBA color quad.
///
/// Style definitions may omit alpha; it defaults to fully opaque.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);

    /// Fully opaque color from RGB components.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    /// Color from RGBA components.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Pack as `0xRRGGBBAA`.
    #[inline]
    pub const fn packed(self) -> u32 {
        ((self.r as u32) << 24) | ((self.g as u32) << 16) | ((self.b as u32) << 8) | self.a as u32
    }

    /// Unpack from `0xRRGGBBAA`.
    #[inline]
    pub const fn from_packed(v: u32) -> Self {
        Self {
            r: (v >> 24) as u8,
            g: (v >> 16) as u8,
            b: (v >> 8) as u8,
            a: v as u8,
        }
    }
}

// ---------------------------------------------------------------------------
// Align
// ---------------------------------------------------------------------------

/// Content alignment within a widget's padded box.
///
/// All nine positions are distinct; the horizontal and vertical components
/// are extracted separately when positioning content.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Align {
    Center,
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Horizontal component of an alignment.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

/// Vertical component of an alignment.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

impl Align {
    /// The horizontal component of this alignment.
    pub fn horizontal(self) -> HAlign {
        match self {
            Align::Left | Align::TopLeft | Align::BottomLeft => HAlign::Left,
            Align::Center | Align::Top | Align::Bottom => HAlign::Center,
            Align::Right | Align::TopRight | Align::BottomRight => HAlign::Right,
        }
    }

    /// The vertical component of this alignment.
    pub fn vertical(self) -> VAlign {
        match self {
            Align::Top | Align::TopLeft | Align::TopRight => VAlign::Top,
            Align::Center | Align::Left | Align::Right => VAlign::Center,
            Align::Bottom | Align::BottomLeft | Align::BottomRight => VAlign::Bottom,
        }
    }

    /// Parse the style-table spelling of an alignment.
    pub fn from_name(name: &str) -> Option<Align> {
        Some(match name {
            "center" => Align::Center,
            "left" => Align::Left,
            "right" => Align::Right,
            "top" => Align::Top,
            "bottom" => Align::Bottom,
            "top-left" => Align::TopLeft,
            "top-right" => Align::TopRight,
            "bottom-left" => Align::BottomLeft,
            "bottom-right" => Align::BottomRight,
            _ => return None,
        })
    }
}

// ---------------------------------------------------------------------------
// StyleValue
// ---------------------------------------------------------------------------

/// A computed style rule.
///
/// Invoked with the widget tree, the widget being resolved, and any extra
/// arguments the caller supplied. A failing rule is logged and the cascade
/// search continues as if the entry were absent.
pub type StyleRule =
    Arc<dyn Fn(&WidgetTree, WidgetId, &[StyleValue]) -> Result<StyleValue, UiError> + Send + Sync>;

/// A value stored in the style table.
#[derive(Clone)]
pub enum StyleValue {
    Int(i32),
    Bool(bool),
    Str(String),
    Color(Color),
    Align(Align),
    Image(SharedImage),
    Font(SharedFont),
    Rule(StyleRule),
}

impl StyleValue {
    /// Wrap a closure as a computed rule value.
    pub fn rule<F>(f: F) -> StyleValue
    where
        F: Fn(&WidgetTree, WidgetId, &[StyleValue]) -> Result<StyleValue, UiError>
            + Send
            + Sync
            + 'static,
    {
        StyleValue::Rule(Arc::new(f))
    }

    /// Coerce to an integer. Booleans coerce to 0/1.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            StyleValue::Int(v) => Some(*v),
            StyleValue::Bool(v) => Some(*v as i32),
            _ => None,
        }
    }

    /// Coerce to a boolean. Integers coerce to `!= 0`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StyleValue::Bool(v) => Some(*v),
            StyleValue::Int(v) => Some(*v != 0),
            _ => None,
        }
    }

    /// Extract a color.
    pub fn as_color(&self) -> Option<Color> {
        match self {
            StyleValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    /// Extract an alignment. Strings are parsed by name.
    pub fn as_align(&self) -> Option<Align> {
        match self {
            StyleValue::Align(a) => Some(*a),
            StyleValue::Str(s) => Align::from_name(s),
            _ => None,
        }
    }

    /// Extract an image handle.
    pub fn as_image(&self) -> Option<SharedImage> {
        match self {
            StyleValue::Image(img) => Some(img.clone()),
            _ => None,
        }
    }

    /// Extract a font handle.
    pub fn as_font(&self) -> Option<SharedFont> {
        match self {
            StyleValue::Font(f) => Some(f.clone()),
            _ => None,
        }
    }
}

impl fmt::Debug for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Int(v) => write!(f, "Int({v})"),
            StyleValue::Bool(v) => write!(f, "Bool({v})"),
            StyleValue::Str(v) => write!(f, "Str({v:?})"),
            StyleValue::Color(v) => write!(f, "Color({v:?})"),
            StyleValue::Align(v) => write!(f, "Align({v:?})"),
            StyleValue::Image(v) => write!(f, "Image({})", v.name),
            StyleValue::Font(v) => write!(f, "Font({} {})", v.name, v.size),
            StyleValue::Rule(_) => write!(f, "Rule(..)"),
        }
    }
}

impl From<i32> for StyleValue {
    fn from(v: i32) -> Self {
        StyleValue::Int(v)
    }
}

impl From<bool> for StyleValue {
    fn from(v: bool) -> Self {
        StyleValue::Bool(v)
    }
}

impl From<&str> for StyleValue {
    fn from(v: &str) -> Self {
        StyleValue::Str(v.to_owned())
    }
}

impl From<Color> for StyleValue {
    fn from(v: Color) -> Self {
        StyleValue::Color(v)
    }
}

impl From<Align> for StyleValue {
    fn from(v: Align) -> Self {
        StyleValue::Align(v)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
