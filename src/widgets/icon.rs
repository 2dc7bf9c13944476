//! Icon widget: a single image aligned within its bounds.

use crate::resource::{ImageData, ResourceSlot, SharedImage};
use crate::style::value::Align;

#[derive(Debug, Default)]
pub struct IconPeer {
    pub image: ResourceSlot<ImageData>,
    pub align: Option<Align>,
}

impl IconPeer {
    pub fn with_image(image: SharedImage) -> Self {
        let mut peer = Self::default();
        peer.image.replace(Some(image));
        peer
    }
}
