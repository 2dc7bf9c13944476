//! Drawing seam between widgets and the rendering backend.
//!
//! Widgets paint through [`Surface`]; the production backend wraps the
//! device framebuffer, and [`RecordingSurface`] captures the call stream
//! so draw behavior is testable without pixels.

use crate::geometry::Rect;
use crate::resource::{SharedFont, SharedImage};
use crate::style::value::Color;

pub trait Surface {
    /// Framebuffer size.
    fn size(&self) -> (i32, i32);

    /// Restrict subsequent drawing to `clip`; `None` lifts the restriction.
    fn set_clip(&mut self, clip: Option<Rect>);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn blit(&mut self, image: &SharedImage, x: i32, y: i32);

    fn draw_text(&mut self, font: &SharedFont, color: Color, text: &str, x: i32, y: i32);
}

// ---------------------------------------------------------------------------
// RecordingSurface
// ---------------------------------------------------------------------------

/// One recorded drawing call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawCall {
    SetClip(Option<Rect>),
    FillRect { rect: Rect, color: Color },
    Blit { image: String, x: i32, y: i32 },
    Text { text: String, x: i32, y: i32, color: Color },
}

/// Surface that records calls instead of drawing.
#[derive(Debug)]
pub struct RecordingSurface {
    size: (i32, i32),
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new(w: i32, h: i32) -> Self {
        Self { size: (w, h), calls: Vec::new() }
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Rects of every `FillRect` call, in order.
    pub fn filled_rects(&self) -> Vec<Rect> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::FillRect { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }

    /// Text of every `Text` call, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (i32, i32) {
        self.size
    }

    fn set_clip(&mut self, clip: Option<Rect>) {
        self.calls.push(DrawCall::SetClip(clip));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.calls.push(DrawCall::FillRect { rect, color });
    }

    fn blit(&mut self, image: &SharedImage, x: i32, y: i32) {
        self.calls.push(DrawCall::Blit { image: image.name.clone(), x, y });
    }

    fn draw_text(&mut self, font: &SharedFont, color: Color, text: &str, x: i32, y: i32) {
        let _ = font;
        self.calls.push(DrawCall::Text { text: text.to_owned(), x, y, color });
    }
}
