//! emberui — retained-mode widget toolkit core for embedded media-remote
//! devices.
//!
//! The toolkit keeps a widget tree alive between frames and repaints only
//! accumulated damage. Core systems:
//!
//! - **Widget tree** ([`widget`], [`widgets`]): slotmap arena of windows,
//!   menus, labels, icons, sliders and groups, with generational ids.
//! - **Styles** ([`style`]): a nested table of named scopes resolved
//!   through a suffix cascade over each widget's ancestor path, with
//!   computed rules evaluated at lookup time.
//! - **Events** ([`event`]): one queue fed by input drivers, timers and
//!   application code; three-stage dispatch (global listeners, the top
//!   window, unused-event listeners) with window-stack routing.
//! - **Timers** ([`timer`]): callbacks run at event consumption on the
//!   framework thread, with firings coalesced while the queue is busy.
//! - **Input** ([`input`]): terminal adapter plus the key and IR debounce
//!   machines that turn raw transitions into press/hold semantics.
//! - **Framework** ([`framework`]): ties the above together and runs the
//!   skin, layout, and dirty-region draw passes.
//!
//! ```
//! use emberui::framework::Framework;
//! use emberui::surface::RecordingSurface;
//! use emberui::widget::WidgetCore;
//! use emberui::widgets::{LabelPeer, Peer};
//!
//! let mut fw = Framework::new(240, 320);
//! fw.styles.set("home.title", "fg", emberui::style::Color::WHITE);
//!
//! let win = fw.new_window("home");
//! fw.add_widget(win, WidgetCore::named("title"), Peer::Label(LabelPeer::new("Now Playing")))
//!     .unwrap();
//! fw.push_window(win).unwrap();
//!
//! let mut surface = RecordingSurface::new(240, 320);
//! assert!(fw.update_screen(&mut surface));
//! ```

pub mod error;
pub mod event;
pub mod framework;
pub mod geometry;
pub mod input;
pub mod resource;
pub mod style;
pub mod surface;
pub mod timer;
pub mod widget;
pub mod widgets;

pub use error::UiError;
pub use event::{Event, EventKind, EventResult};
pub use framework::Framework;
pub use geometry::{Insets, Rect};
pub use style::{Color, StyleTable, StyleValue};
pub use timer::TimerId;
pub use widget::{WidgetCore, WidgetId, WidgetTree};
