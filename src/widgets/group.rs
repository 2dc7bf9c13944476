//! Plain container widget. No payload of its own; it exists to name a style
//! scope and stack children.

#[derive(Debug, Default)]
pub struct GroupPeer;
