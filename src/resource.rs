//! Shared image and font resources.
//!
//! Loaded images and fonts are shared between widgets: several menu tiles can
//! reference the same glyph strip, and most text widgets share one or two
//! fonts. Handles are reference counted; a resource is released only when the
//! last handle drops. [`ResourceSlot`] enforces the swap discipline widgets
//! must follow when a style change gives them a new resource: the new handle
//! is installed *before* the old one is released, so a concurrently iterating
//! draw pass never observes a freed resource.
//!
//! The actual pixel data and glyph rasterization live in the rendering
//! backend; this module only models identity and metrics.

use std::sync::Arc;

// ---------------------------------------------------------------------------
// Image
// ---------------------------------------------------------------------------

/// An opaque loaded image, identified by source name with known dimensions.
#[derive(Debug, PartialEq, Eq)]
pub struct ImageData {
    pub name: String,
    pub width: i32,
    pub height: i32,
}

/// Reference-counted handle to a loaded image.
pub type SharedImage = Arc<ImageData>;

/// Load an image by name. Dimensions come from the backend decoder; this
/// constructor is the seam the external loader plugs into.
pub fn load_image(name: impl Into<String>, width: i32, height: i32) -> SharedImage {
    Arc::new(ImageData { name: name.into(), width, height })
}

// ---------------------------------------------------------------------------
// Font
// ---------------------------------------------------------------------------

/// An opaque loaded font at a fixed pixel size.
#[derive(Debug, PartialEq, Eq)]
pub struct FontData {
    pub name: String,
    pub size: i32,
}

impl FontData {
    /// Line height for this font.
    pub fn height(&self) -> i32 {
        self.size + 2
    }

    /// Measure rendered text as (width, height).
    ///
    /// A fixed advance per glyph stands in for backend metrics; the real
    /// rasterizer is an external service behind the [`Surface`] trait.
    ///
    /// [`Surface`]: crate::surface::Surface
    pub fn measure(&self, text: &str) -> (i32, i32) {
        let advance = (self.size / 2).max(1);
        (text.chars().count() as i32 * advance, self.height())
    }
}

/// Reference-counted handle to a loaded font.
pub type SharedFont = Arc<FontData>;

/// Load a font by name at the given pixel size.
pub fn load_font(name: impl Into<String>, size: i32) -> SharedFont {
    Arc::new(FontData { name: name.into(), size })
}

// ---------------------------------------------------------------------------
// ResourceSlot
// ---------------------------------------------------------------------------

/// A widget-owned slot holding an optional shared resource.
///
/// `replace` installs the incoming handle before the previous handle is
/// dropped, and reports whether the slot actually changed — widgets use the
/// report to skip redundant redraws when a skin pass re-resolves to the same
/// resource.
#[derive(Debug)]
pub struct ResourceSlot<T> {
    current: Option<Arc<T>>,
}

// Not derived: the slot is empty by default whether or not `T: Default`.
impl<T> Default for ResourceSlot<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> ResourceSlot<T> {
    /// An empty slot.
    pub fn empty() -> Self {
        Self { current: None }
    }

    /// The currently held handle, if any.
    pub fn get(&self) -> Option<&Arc<T>> {
        self.current.as_ref()
    }

    /// Swap in `next`, releasing the previous handle afterwards.
    ///
    /// Returns `true` if the slot now refers to a different resource.
    pub fn replace(&mut self, next: Option<Arc<T>>) -> bool {
        let changed = match (&self.current, &next) {
            (Some(a), Some(b)) => !Arc::ptr_eq(a, b),
            (None, None) => false,
            _ => true,
        };
        // Install before release: `old` keeps the previous resource alive
        // until after `next` is in place.
        let old = std::mem::replace(&mut self.current, next);
        drop(old);
        changed
    }

    /// Release the held handle, if any.
    pub fn clear(&mut self) {
        self.current = None;
    }
}

// ===========================================================================
// Tests
// ===========================================================================
