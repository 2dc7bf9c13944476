//! Error taxonomy for the toolkit core.
//!
//! Only [`UiError::InvalidWidget`] is treated as fatal for its call path; it
//! indicates a lifecycle bug (an operation invoked on a destroyed widget).
//! Every other variant is logged at the nearest dispatch boundary and the
//! triggering operation becomes a no-op — the consumer loop never aborts.

use thiserror::Error;

/// Errors raised by style resolution, widget operations, and resources.
#[derive(Debug, Error)]
pub enum UiError {
    /// A style value had the wrong shape for the requested type, e.g. a color
    /// rule that did not produce a color. The lookup is treated as absent.
    #[error("malformed style value for key `{key}`: expected {expected}")]
    MalformedStyle { key: String, expected: &'static str },

    /// A computed style rule failed at evaluation time. The cascade search
    /// continues past the failing entry.
    #[error("style rule failed: {0}")]
    StyleRule(String),

    /// A widget operation or event handler raised. Sibling dispatch continues.
    #[error("handler fault: {0}")]
    HandlerFault(String),

    /// An operation was invoked on a widget id that is no longer in the tree.
    #[error("invalid widget reference")]
    InvalidWidget,
}
