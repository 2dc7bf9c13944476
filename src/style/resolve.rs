//! Style resolution: the suffix cascade.
//!
//! A widget's style path is the dotted join of ancestor style names, root
//! to leaf. Resolution searches the table once per suffix obtained by
//! repeatedly dropping the *leading* segment — `home.menu.item`, then
//! `menu.item`, then `item` — so the most specific match wins and generic
//! leaf styles act as shared defaults. If no suffix matches, the global
//! scope is consulted, then the caller's default.
//!
//! Computed rules are invoked at lookup time with the widget being
//! resolved. A failing rule is logged and skipped; the search continues as
//! if the entry were absent.

use crate::resource::{SharedFont, SharedImage};
use crate::style::table::StyleTable;
use crate::style::value::{Align, Color, StyleValue};
use crate::widget::tree::{WidgetId, WidgetTree};

// ---------------------------------------------------------------------------
// Core search
// ---------------------------------------------------------------------------

/// Resolve `key` for the widget, walking the suffix cascade.
///
/// `args` are forwarded to computed rules; literal lookups ignore them.
pub fn resolve(
    table: &StyleTable,
    tree: &WidgetTree,
    id: WidgetId,
    key: &str,
    args: &[StyleValue],
) -> Option<StyleValue> {
    let path = tree.style_path(id);
    let mut suffix = path.as_str();
    loop {
        if !suffix.is_empty() {
            if let Some(v) = table.lookup(suffix, key) {
                if let Some(v) = evaluate(v, tree, id, key, args) {
                    return Some(v);
                }
            }
        }
        match suffix.find('.') {
            Some(dot) => suffix = &suffix[dot + 1..],
            None => break,
        }
    }
    table
        .global(key)
        .and_then(|v| evaluate(v, tree, id, key, args))
}

/// Resolve with a caller-supplied default.
pub fn resolve_or(
    table: &StyleTable,
    tree: &WidgetTree,
    id: WidgetId,
    key: &str,
    default: StyleValue,
) -> StyleValue {
    resolve(table, tree, id, key, &[]).unwrap_or(default)
}

fn evaluate(
    value: &StyleValue,
    tree: &WidgetTree,
    id: WidgetId,
    key: &str,
    args: &[StyleValue],
) -> Option<StyleValue> {
    match value {
        StyleValue::Rule(rule) => match rule(tree, id, args) {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("style rule for `{key}` failed: {e}");
                None
            }
        },
        other => Some(other.clone()),
    }
}

// ---------------------------------------------------------------------------
// Typed wrappers
// ---------------------------------------------------------------------------

/// Resolve an integer property. Booleans coerce to 0/1; any other shape is
/// treated as absent.
pub fn resolve_int(
    table: &StyleTable,
    tree: &WidgetTree,
    id: WidgetId,
    key: &str,
    default: i32,
) -> i32 {
    match resolve(table, tree, id, key, &[]) {
        Some(v) => v.as_int().unwrap_or_else(|| {
            log::debug!("style key `{key}`: expected int, got {v:?}");
            default
        }),
        None => default,
    }
}

/// Resolve a boolean property. Integers coerce to `!= 0`.
pub fn resolve_bool(
    table: &StyleTable,
    tree: &WidgetTree,
    id: WidgetId,
    key: &str,
    default: bool,
) -> bool {
    match resolve(table, tree, id, key, &[]) {
        Some(v) => v.as_bool().unwrap_or_else(|| {
            log::debug!("style key `{key}`: expected bool, got {v:?}");
            default
        }),
        None => default,
    }
}

/// Resolve a color property. The second element reports whether the color
/// was actually defined, so callers can distinguish "styled transparent"
/// from "not styled at all".
pub fn resolve_color(
    table: &StyleTable,
    tree: &WidgetTree,
    id: WidgetId,
    key: &str,
    default: Color,
) -> (Color, bool) {
    match resolve(table, tree, id, key, &[]) {
        Some(v) => match v.as_color() {
            Some(c) => (c, true),
            None => {
                log::debug!("style key `{key}`: expected color, got {v:?}");
                (default, false)
            }
        },
        None => (default, false),
    }
}

/// Resolve an alignment property.
pub fn resolve_align(
    table: &StyleTable,
    tree: &WidgetTree,
    id: WidgetId,
    key: &str,
    default: Align,
) -> Align {
    match resolve(table, tree, id, key, &[]) {
        Some(v) => v.as_align().unwrap_or_else(|| {
            log::debug!("style key `{key}`: expected align, got {v:?}");
            default
        }),
        None => default,
    }
}

/// Resolve an image property. There is no default image; absence means the
/// widget draws nothing for that visual.
pub fn resolve_image(
    table: &StyleTable,
    tree: &WidgetTree,
    id: WidgetId,
    key: &str,
) -> Option<SharedImage> {
    let v = resolve(table, tree, id, key, &[])?;
    match v.as_image() {
        Some(img) => Some(img),
        None => {
            log::debug!("style key `{key}`: expected image, got {v:?}");
            None
        }
    }
}

/// Resolve a font property, falling back to the given default font so text
/// widgets always have something to render with.
pub fn resolve_font(
    table: &StyleTable,
    tree: &WidgetTree,
    id: WidgetId,
    key: &str,
    default: &SharedFont,
) -> SharedFont {
    match resolve(table, tree, id, key, &[]) {
        Some(v) => v.as_font().unwrap_or_else(|| {
            log::debug!("style key `{key}`: expected font, got {v:?}");
            default.clone()
        }),
        None => default.clone(),
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UiError;
    use crate::resource::load_font;
    use crate::widget::core::WidgetCore;
    use crate::widgets::{GroupPeer, Peer};

    fn tree_home_menu_item() -> (WidgetTree, WidgetId) {
        let mut tree = WidgetTree::new();
        let home = tree.insert(WidgetCore::named("home"), Peer::Group(GroupPeer::default()));
        let menu = tree
            .insert_child(home, WidgetCore::named("menu"), Peer::Group(GroupPeer::default()))
            .unwrap();
        let item = tree
            .insert_child(menu, WidgetCore::named("item"), Peer::Group(GroupPeer::default()))
            .unwrap();
        (tree, item)
    }

    // ── Cascade order ────────────────────────────────────────────────

    #[test]
    fn most_specific_suffix_wins() {
        let (tree, item) = tree_home_menu_item();
        let mut t = StyleTable::new();
        t.set("item", "fg", Color::rgb(1, 1, 1));
        t.set("menu.item", "fg", Color::rgb(2, 2, 2));
        t.set("home.menu.item", "fg", Color::rgb(3, 3, 3));

        let (c, set) = resolve_color(&t, &tree, item, "fg", Color::BLACK);
        assert!(set);
        assert_eq!(c, Color::rgb(3, 3, 3));
    }

    #[test]
    fn shorter_suffix_fills_gaps() {
        let (tree, item) = tree_home_menu_item();
        let mut t = StyleTable::new();
        t.set("item", "itemHeight", 24);

        assert_eq!(resolve_int(&t, &tree, item, "itemHeight", 20), 24);
    }

    #[test]
    fn global_is_last_fallback() {
        let (tree, item) = tree_home_menu_item();
        let mut t = StyleTable::new();
        t.set("", "fg", Color::rgb(9, 9, 9));

        let (c, set) = resolve_color(&t, &tree, item, "fg", Color::BLACK);
        assert!(set);
        assert_eq!(c, Color::rgb(9, 9, 9));
    }

    #[test]
    fn caller_default_when_nothing_matches() {
        let (tree, item) = tree_home_menu_item();
        let t = StyleTable::new();
        assert_eq!(resolve_int(&t, &tree, item, "layer", 4), 4);
        let (_, set) = resolve_color(&t, &tree, item, "fg", Color::BLACK);
        assert!(!set);
    }

    #[test]
    fn intermediate_scopes_are_not_consulted() {
        // A value at `home.menu` must not match a lookup for `home.menu.item`;
        // only complete suffixes of the widget's own path are searched.
        let (tree, item) = tree_home_menu_item();
        let mut t = StyleTable::new();
        t.set("home.menu", "fg", Color::rgb(1, 1, 1));

        let (_, set) = resolve_color(&t, &tree, item, "fg", Color::BLACK);
        assert!(!set);
    }

    // ── Computed rules ───────────────────────────────────────────────

    #[test]
    fn rule_is_invoked_with_widget() {
        let (tree, item) = tree_home_menu_item();
        let mut t = StyleTable::new();
        t.set(
            "menu.item",
            "w",
            StyleValue::rule(|tree, id, _| {
                let w = tree.core(id).ok_or(UiError::InvalidWidget)?.bounds.w;
                Ok(StyleValue::Int(w + 1))
            }),
        );
        assert_eq!(resolve_int(&t, &tree, item, "w", 0), 1);
    }

    #[test]
    fn failing_rule_falls_through_to_shorter_suffix() {
        let (tree, item) = tree_home_menu_item();
        let mut t = StyleTable::new();
        t.set(
            "home.menu.item",
            "fg",
            StyleValue::rule(|_, _, _| Err(UiError::StyleRule("boom".into()))),
        );
        t.set("item", "fg", Color::rgb(7, 7, 7));

        let (c, set) = resolve_color(&t, &tree, item, "fg", Color::BLACK);
        assert!(set);
        assert_eq!(c, Color::rgb(7, 7, 7));
    }

    #[test]
    fn rules_are_reevaluated_every_lookup() {
        use std::sync::atomic::{AtomicI32, Ordering};
        use std::sync::Arc;

        let (tree, item) = tree_home_menu_item();
        let counter = Arc::new(AtomicI32::new(0));
        let c = counter.clone();
        let mut t = StyleTable::new();
        t.set(
            "item",
            "n",
            StyleValue::rule(move |_, _, _| {
                Ok(StyleValue::Int(c.fetch_add(1, Ordering::SeqCst)))
            }),
        );

        assert_eq!(resolve_int(&t, &tree, item, "n", -1), 0);
        assert_eq!(resolve_int(&t, &tree, item, "n", -1), 1);
    }

    // ── Typed wrappers ───────────────────────────────────────────────

    #[test]
    fn wrong_shape_is_treated_as_absent() {
        let (tree, item) = tree_home_menu_item();
        let mut t = StyleTable::new();
        t.set("item", "fg", 42);

        let (c, set) = resolve_color(&t, &tree, item, "fg", Color::BLACK);
        assert!(!set);
        assert_eq!(c, Color::BLACK);
    }

    #[test]
    fn bool_int_coercion_in_wrappers() {
        let (tree, item) = tree_home_menu_item();
        let mut t = StyleTable::new();
        t.set("item", "popup", true);
        t.set("item", "hidden", 0);

        assert_eq!(resolve_int(&t, &tree, item, "popup", 0), 1);
        assert!(!resolve_bool(&t, &tree, item, "hidden", true));
    }

    #[test]
    fn font_falls_back_to_default() {
        let (tree, item) = tree_home_menu_item();
        let t = StyleTable::new();
        let fallback = load_font("FreeSans", 15);
        let f = resolve_font(&t, &tree, item, "font", &fallback);
        assert!(std::sync::Arc::ptr_eq(&f, &fallback));
    }

    #[test]
    fn align_by_name_string() {
        let (tree, item) = tree_home_menu_item();
        let mut t = StyleTable::new();
        t.set("item", "align", "bottom-right");
        assert_eq!(
            resolve_align(&t, &tree, item, "align", Align::Center),
            Align::BottomRight
        );
    }
}
