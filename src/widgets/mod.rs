//! Built-in widget kinds.
//!
//! The kind set is closed: every widget's payload is one variant of
//! [`Peer`], and the framework's skin/layout/draw/event passes dispatch on
//! it with exhaustive matches. Adding a kind means adding a variant and
//! letting the compiler point at every pass that must learn about it.

pub mod group;
pub mod icon;
pub mod label;
pub mod menu;
pub mod slider;
pub mod window;

pub use self::group::GroupPeer;
pub use self::icon::IconPeer;
pub use self::label::LabelPeer;
pub use self::menu::MenuPeer;
pub use self::slider::SliderPeer;
pub use self::window::WindowPeer;

/// Kind-specific widget payload.
#[derive(Debug)]
pub enum Peer {
    Window(WindowPeer),
    Menu(MenuPeer),
    Icon(IconPeer),
    Label(LabelPeer),
    Slider(SliderPeer),
    Group(GroupPeer),
}

impl Peer {
    /// Short kind name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Peer::Window(_) => "window",
            Peer::Menu(_) => "menu",
            Peer::Icon(_) => "icon",
            Peer::Label(_) => "label",
            Peer::Slider(_) => "slider",
            Peer::Group(_) => "group",
        }
    }
}
