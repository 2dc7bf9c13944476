//! The nested style table.
//!
//! Styles are defined as a tree of named scopes: a dotted path like
//! `home.menu.item` addresses a scope three levels deep, and each scope maps
//! property keys to [`StyleValue`]s. The resolver walks the table with
//! progressively shorter path suffixes; this module only provides the raw
//! storage and path walk.

use std::collections::HashMap;

use super::value::StyleValue;

// ---------------------------------------------------------------------------
// StyleNode
// ---------------------------------------------------------------------------

/// One scope in the style tree: its own properties plus nested scopes.
#[derive(Debug, Default, Clone)]
struct StyleNode {
    values: HashMap<String, StyleValue>,
    children: HashMap<String, StyleNode>,
}

impl StyleNode {
    fn descend_mut(&mut self, path: &str) -> &mut StyleNode {
        let mut node = self;
        if path.is_empty() {
            return node;
        }
        for seg in path.split('.') {
            node = node.children.entry(seg.to_owned()).or_default();
        }
        node
    }

    fn descend(&self, path: &str) -> Option<&StyleNode> {
        let mut node = self;
        if path.is_empty() {
            return Some(node);
        }
        for seg in path.split('.') {
            node = node.children.get(seg)?;
        }
        Some(node)
    }
}

// ---------------------------------------------------------------------------
// StyleTable
// ---------------------------------------------------------------------------

/// The skin's style definitions.
///
/// Properties set at the empty path form the global scope, consulted as the
/// last fallback when no path suffix matches.
#[derive(Debug, Default, Clone)]
pub struct StyleTable {
    root: StyleNode,
}

impl StyleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` within the scope addressed by the dotted `path`.
    ///
    /// Missing intermediate scopes are created. An empty path addresses the
    /// global scope.
    pub fn set(&mut self, path: &str, key: &str, value: impl Into<StyleValue>) {
        self.root
            .descend_mut(path)
            .values
            .insert(key.to_owned(), value.into());
    }

    /// Look up `key` in the scope addressed by the dotted `path`.
    ///
    /// Returns `None` if any path segment is missing or the scope has no
    /// such key. No suffix search happens here.
    pub fn lookup(&self, path: &str, key: &str) -> Option<&StyleValue> {
        self.root.descend(path)?.values.get(key)
    }

    /// Look up `key` in the global scope.
    pub fn global(&self, key: &str) -> Option<&StyleValue> {
        self.root.values.get(key)
    }

    /// Remove every definition. Used when a new skin is loaded wholesale.
    pub fn clear(&mut self) {
        self.root = StyleNode::default();
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::value::Color;

    #[test]
    fn set_and_lookup_nested() {
        let mut t = StyleTable::new();
        t.set("home.menu.item", "itemHeight", 28);

        let v = t.lookup("home.menu.item", "itemHeight");
        assert_eq!(v.and_then(|v| v.as_int()), Some(28));
    }

    #[test]
    fn lookup_missing_segment_is_none() {
        let mut t = StyleTable::new();
        t.set("home.menu", "fg", Color::WHITE);
        assert!(t.lookup("home.menu.item", "fg").is_none());
        assert!(t.lookup("settings", "fg").is_none());
    }

    #[test]
    fn lookup_does_not_cascade() {
        let mut t = StyleTable::new();
        t.set("home", "fg", Color::WHITE);
        t.set("home.menu", "bg", Color::BLACK);

        // `fg` is defined on the parent scope only; a direct lookup on the
        // child must not see it.
        assert!(t.lookup("home.menu", "fg").is_none());
    }

    #[test]
    fn global_scope() {
        let mut t = StyleTable::new();
        t.set("", "fg", Color::WHITE);
        assert_eq!(t.global("fg").and_then(|v| v.as_color()), Some(Color::WHITE));
        assert_eq!(t.lookup("", "fg").and_then(|v| v.as_color()), Some(Color::WHITE));
    }

    #[test]
    fn overwrite_replaces() {
        let mut t = StyleTable::new();
        t.set("a", "x", 1);
        t.set("a", "x", 2);
        assert_eq!(t.lookup("a", "x").and_then(|v| v.as_int()), Some(2));
    }

    #[test]
    fn clear_empties_table() {
        let mut t = StyleTable::new();
        t.set("a.b", "x", 1);
        t.clear();
        assert!(t.lookup("a.b", "x").is_none());
    }
}
