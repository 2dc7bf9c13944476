//! Slotmap-backed widget arena with explicit parent/child links.
//!
//! Ids are generational: a destroyed widget's id never aliases a later
//! widget, so stale ids held by timers or listeners fail lookups instead of
//! touching the wrong widget. Child order is the draw, layout, and event
//! broadcast order.

use slotmap::{new_key_type, SecondaryMap, SlotMap};

use crate::error::UiError;
use crate::widget::core::WidgetCore;
use crate::widgets::Peer;

new_key_type! {
    /// Generational handle to a widget in a [`WidgetTree`].
    pub struct WidgetId;
}

/// A widget: shared core state plus the kind-specific peer payload.
#[derive(Debug)]
pub struct Widget {
    pub core: WidgetCore,
    pub peer: Peer,
}

// ---------------------------------------------------------------------------
// WidgetTree
// ---------------------------------------------------------------------------

/// The widget arena.
///
/// The arena is a forest: windows and global widgets are all roots here, and
/// the window stack imposes order between them.
#[derive(Debug, Default)]
pub struct WidgetTree {
    nodes: SlotMap<WidgetId, Widget>,
    parents: SecondaryMap<WidgetId, WidgetId>,
    children: SecondaryMap<WidgetId, Vec<WidgetId>>,
}

impl WidgetTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a widget with no parent.
    pub fn insert(&mut self, core: WidgetCore, peer: Peer) -> WidgetId {
        let id = self.nodes.insert(Widget { core, peer });
        self.children.insert(id, Vec::new());
        id
    }

    /// Insert a widget as the last child of `parent`.
    pub fn insert_child(
        &mut self,
        parent: WidgetId,
        core: WidgetCore,
        peer: Peer,
    ) -> Result<WidgetId, UiError> {
        if !self.nodes.contains_key(parent) {
            return Err(UiError::InvalidWidget);
        }
        let id = self.insert(core, peer);
        self.parents.insert(id, parent);
        self.children[parent].push(id);
        Ok(id)
    }

    /// Remove a widget and its whole subtree. Peer payloads drop here,
    /// releasing their resource handles.
    pub fn remove(&mut self, id: WidgetId) {
        if let Some(parent) = self.parents.get(id).copied() {
            if let Some(siblings) = self.children.get_mut(parent) {
                siblings.retain(|&c| c != id);
            }
        }
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(kids) = self.children.remove(cur) {
                stack.extend(kids);
            }
            self.parents.remove(cur);
            self.nodes.remove(cur);
        }
    }

    /// Move `id` under a new parent, appended as its last child.
    ///
    /// The subtree's cached style paths are dropped; they depend on the
    /// ancestor chain.
    pub fn reparent(&mut self, id: WidgetId, new_parent: WidgetId) -> Result<(), UiError> {
        if !self.nodes.contains_key(id) || !self.nodes.contains_key(new_parent) {
            return Err(UiError::InvalidWidget);
        }
        // Refuse a cycle: new_parent must not be inside id's subtree.
        let mut cur = Some(new_parent);
        while let Some(c) = cur {
            if c == id {
                return Err(UiError::InvalidWidget);
            }
            cur = self.parents.get(c).copied();
        }

        if let Some(old) = self.parents.get(id).copied() {
            if let Some(siblings) = self.children.get_mut(old) {
                siblings.retain(|&c| c != id);
            }
        }
        self.parents.insert(id, new_parent);
        self.children[new_parent].push(id);
        self.invalidate_style_paths(id);
        Ok(())
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: WidgetId) -> Option<&Widget> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut Widget> {
        self.nodes.get_mut(id)
    }

    pub fn core(&self, id: WidgetId) -> Option<&WidgetCore> {
        self.nodes.get(id).map(|w| &w.core)
    }

    pub fn core_mut(&mut self, id: WidgetId) -> Option<&mut WidgetCore> {
        self.nodes.get_mut(id).map(|w| &mut w.core)
    }

    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.parents.get(id).copied()
    }

    /// Direct children in draw order.
    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The widget and all descendants, preorder.
    pub fn subtree(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if !self.nodes.contains_key(cur) {
                continue;
            }
            out.push(cur);
            // Reverse so preorder pops children in draw order.
            for &c in self.children(cur).iter().rev() {
                stack.push(c);
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // -----------------------------------------------------------------------
    // Style paths
    // -----------------------------------------------------------------------

    /// The dotted root-to-leaf join of ancestor style names.
    ///
    /// Widgets without a style name contribute no segment. Uses the cached
    /// path when present; otherwise computes without caching (callers that
    /// can take `&mut self` use [`cache_style_path`](Self::cache_style_path)
    /// during the skin pass).
    pub fn style_path(&self, id: WidgetId) -> String {
        if let Some(w) = self.nodes.get(id) {
            if let Some(cached) = &w.core.style_path {
                return cached.clone();
            }
        }
        self.compute_style_path(id)
    }

    /// Compute and store the style path for `id`.
    pub fn cache_style_path(&mut self, id: WidgetId) -> String {
        let path = self.compute_style_path(id);
        if let Some(w) = self.nodes.get_mut(id) {
            w.core.style_path = Some(path.clone());
        }
        path
    }

    /// Rename the widget's style segment, invalidating cached paths in its
    /// subtree.
    pub fn set_style_name(&mut self, id: WidgetId, name: Option<String>) {
        if let Some(w) = self.nodes.get_mut(id) {
            if w.core.style_name == name {
                return;
            }
            w.core.style_name = name;
        } else {
            return;
        }
        self.invalidate_style_paths(id);
        self.mark_style_stale(id);
    }

    fn compute_style_path(&self, id: WidgetId) -> String {
        let mut chain = Vec::new();
        let mut cur = Some(id);
        while let Some(c) = cur {
            chain.push(c);
            cur = self.parents.get(c).copied();
        }
        let mut path = String::new();
        for &c in chain.iter().rev() {
            let Some(w) = self.nodes.get(c) else { continue };
            if let Some(name) = &w.core.style_name {
                if !path.is_empty() {
                    path.push('.');
                }
                path.push_str(name);
            }
        }
        path
    }

    fn invalidate_style_paths(&mut self, id: WidgetId) {
        for w in self.subtree(id) {
            if let Some(node) = self.nodes.get_mut(w) {
                node.core.style_path = None;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Invalidation
    // -----------------------------------------------------------------------

    /// Mark the subtree as needing a skin pass (epoch 0 is always stale).
    pub fn mark_style_stale(&mut self, id: WidgetId) {
        for w in self.subtree(id) {
            if let Some(node) = self.nodes.get_mut(w) {
                node.core.style_epoch = 0;
            }
        }
    }

    /// Mark the subtree as needing a layout pass.
    pub fn mark_layout_stale(&mut self, id: WidgetId) {
        for w in self.subtree(id) {
            if let Some(node) = self.nodes.get_mut(w) {
                node.core.layout_epoch = 0;
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::{GroupPeer, Peer};

    fn group(tree: &mut WidgetTree, name: &str) -> WidgetId {
        tree.insert(WidgetCore::named(name), Peer::Group(GroupPeer::default()))
    }

    fn child(tree: &mut WidgetTree, parent: WidgetId, name: &str) -> WidgetId {
        tree.insert_child(parent, WidgetCore::named(name), Peer::Group(GroupPeer::default()))
            .unwrap()
    }

    // ── Structure ────────────────────────────────────────────────────

    #[test]
    fn insert_and_links() {
        let mut tree = WidgetTree::new();
        let root = group(&mut tree, "window");
        let a = child(&mut tree, root, "a");
        let b = child(&mut tree, root, "b");

        assert_eq!(tree.children(root), &[a, b]);
        assert_eq!(tree.parent(a), Some(root));
        assert_eq!(tree.parent(root), None);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn insert_child_of_missing_parent_fails() {
        let mut tree = WidgetTree::new();
        let root = group(&mut tree, "w");
        tree.remove(root);
        let err = tree.insert_child(root, WidgetCore::default(), Peer::Group(GroupPeer::default()));
        assert!(err.is_err());
    }

    #[test]
    fn remove_takes_subtree() {
        let mut tree = WidgetTree::new();
        let root = group(&mut tree, "w");
        let a = child(&mut tree, root, "a");
        let a1 = child(&mut tree, a, "a1");
        let b = child(&mut tree, root, "b");

        tree.remove(a);
        assert!(!tree.contains(a));
        assert!(!tree.contains(a1));
        assert!(tree.contains(b));
        assert_eq!(tree.children(root), &[b]);
    }

    #[test]
    fn stale_id_does_not_alias() {
        let mut tree = WidgetTree::new();
        let a = group(&mut tree, "a");
        tree.remove(a);
        let _b = group(&mut tree, "b");
        assert!(!tree.contains(a));
        assert!(tree.get(a).is_none());
    }

    #[test]
    fn subtree_is_preorder() {
        let mut tree = WidgetTree::new();
        let root = group(&mut tree, "w");
        let a = child(&mut tree, root, "a");
        let a1 = child(&mut tree, a, "a1");
        let b = child(&mut tree, root, "b");

        assert_eq!(tree.subtree(root), vec![root, a, a1, b]);
    }

    // ── Reparent ─────────────────────────────────────────────────────

    #[test]
    fn reparent_moves_and_appends() {
        let mut tree = WidgetTree::new();
        let w1 = group(&mut tree, "one");
        let w2 = group(&mut tree, "two");
        let a = child(&mut tree, w1, "a");
        let b = child(&mut tree, w2, "b");

        tree.reparent(a, w2).unwrap();
        assert_eq!(tree.children(w1), &[]);
        assert_eq!(tree.children(w2), &[b, a]);
        assert_eq!(tree.parent(a), Some(w2));
    }

    #[test]
    fn reparent_rejects_cycle() {
        let mut tree = WidgetTree::new();
        let root = group(&mut tree, "w");
        let a = child(&mut tree, root, "a");
        assert!(tree.reparent(root, a).is_err());
        assert!(tree.reparent(root, root).is_err());
    }

    // ── Style paths ──────────────────────────────────────────────────

    #[test]
    fn style_path_joins_named_ancestors() {
        let mut tree = WidgetTree::new();
        let root = group(&mut tree, "home");
        let menu = child(&mut tree, root, "menu");
        let item = child(&mut tree, menu, "item");

        assert_eq!(tree.style_path(item), "home.menu.item");
        assert_eq!(tree.style_path(root), "home");
    }

    #[test]
    fn unnamed_widgets_contribute_no_segment() {
        let mut tree = WidgetTree::new();
        let root = group(&mut tree, "home");
        let anon = tree
            .insert_child(root, WidgetCore::default(), Peer::Group(GroupPeer::default()))
            .unwrap();
        let leaf = child(&mut tree, anon, "label");

        assert_eq!(tree.style_path(leaf), "home.label");
        assert_eq!(tree.style_path(anon), "home");
    }

    #[test]
    fn cached_path_survives_until_reparent() {
        let mut tree = WidgetTree::new();
        let w1 = group(&mut tree, "one");
        let w2 = group(&mut tree, "two");
        let a = child(&mut tree, w1, "a");

        assert_eq!(tree.cache_style_path(a), "one.a");
        tree.reparent(a, w2).unwrap();
        // Cache was dropped; recompute reflects the new chain.
        assert_eq!(tree.style_path(a), "two.a");
    }

    #[test]
    fn rename_invalidates_descendant_paths() {
        let mut tree = WidgetTree::new();
        let root = group(&mut tree, "home");
        let menu = child(&mut tree, root, "menu");
        let item = child(&mut tree, menu, "item");
        tree.cache_style_path(item);

        tree.set_style_name(root, Some("settings".into()));
        assert_eq!(tree.style_path(item), "settings.menu.item");
    }

    // ── Invalidation marks ───────────────────────────────────────────

    #[test]
    fn style_stale_marks_subtree() {
        let mut tree = WidgetTree::new();
        let root = group(&mut tree, "w");
        let a = child(&mut tree, root, "a");

        tree.core_mut(root).unwrap().style_epoch = 5;
        tree.core_mut(a).unwrap().style_epoch = 5;
        tree.mark_style_stale(root);
        assert_eq!(tree.core(root).unwrap().style_epoch, 0);
        assert_eq!(tree.core(a).unwrap().style_epoch, 0);
    }
}
