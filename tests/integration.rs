//! End-to-end exercises of the public API: a window with a menu, the style
//! cascade, the dispatch stages, the IR pipeline, and timers.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pretty_assertions::assert_eq;

use emberui::event::types::mask;
use emberui::event::{Event, EventKind, EventResult};
use emberui::framework::Framework;
use emberui::input::{ir_code, DriverInput};
use emberui::style::{resolve_int, Color};
use emberui::surface::RecordingSurface;
use emberui::widget::core::PreferredBounds;
use emberui::widget::WidgetCore;
use emberui::widgets::{LabelPeer, MenuPeer, Peer, SliderPeer};
use emberui::{Rect, WidgetId};

/// Window with a menu of `items` labels plus a scrollbar column.
fn menu_fixture(fw: &mut Framework, menu_h: i32, items: usize) -> (WidgetId, WidgetId, WidgetId) {
    fw.styles.set("home.menu", "itemHeight", 20);

    let win = fw.new_window("home");
    let menu = fw
        .add_widget(win, WidgetCore::named("menu"), Peer::Menu(MenuPeer::default()))
        .unwrap();
    fw.tree.core_mut(menu).unwrap().preferred = PreferredBounds {
        x: Some(0),
        y: Some(0),
        w: Some(240),
        h: Some(menu_h),
    };
    for i in 0..items {
        fw.add_widget(
            menu,
            WidgetCore::named("item"),
            Peer::Label(LabelPeer::new(format!("item {i}"))),
        )
        .unwrap();
    }
    let scrollbar = fw
        .add_widget(menu, WidgetCore::named("scrollbar"), Peer::Slider(SliderPeer::new(100)))
        .unwrap();
    fw.tree.core_mut(scrollbar).unwrap().preferred = PreferredBounds {
        x: None,
        y: None,
        w: Some(8),
        h: None,
    };
    if let Some(Peer::Menu(m)) = fw.tree.get_mut(menu).map(|n| &mut n.peer) {
        m.scrollbar = Some(scrollbar);
    }
    fw.push_window(win).unwrap();
    (win, menu, scrollbar)
}

fn menu_peer<'a>(fw: &'a Framework, menu: WidgetId) -> &'a MenuPeer {
    match fw.tree.get(menu).map(|n| &n.peer) {
        Some(Peer::Menu(m)) => m,
        other => panic!("not a menu: {other:?}"),
    }
}

// ── Menu geometry ────────────────────────────────────────────────────

#[test]
fn overflowing_menu_gets_scrollbar_column() {
    let mut fw = Framework::new(240, 320);
    let (_, menu, scrollbar) = menu_fixture(&mut fw, 100, 7);

    let mut surface = RecordingSurface::new(240, 320);
    fw.update_screen(&mut surface);

    let m = menu_peer(&fw, menu);
    assert_eq!(m.num_widgets, 5);
    assert!(m.has_scrollbar);

    // Items stack at item_height, narrowed by the scrollbar column.
    let first = fw.tree.children(menu)[0];
    let second = fw.tree.children(menu)[1];
    assert_eq!(fw.tree.core(first).unwrap().bounds, Rect::new(0, 0, 232, 20));
    assert_eq!(fw.tree.core(second).unwrap().bounds, Rect::new(0, 20, 232, 20));

    let sb = fw.tree.core(scrollbar).unwrap();
    assert!(sb.visible);
    assert_eq!(sb.bounds, Rect::new(232, 0, 8, 100));
}

#[test]
fn fitting_menu_hides_scrollbar_and_widens_items() {
    let mut fw = Framework::new(240, 320);
    let (_, menu, scrollbar) = menu_fixture(&mut fw, 140, 7);

    let mut surface = RecordingSurface::new(240, 320);
    fw.update_screen(&mut surface);

    let m = menu_peer(&fw, menu);
    assert_eq!(m.num_widgets, 7);
    assert!(!m.has_scrollbar);
    assert!(!fw.tree.core(scrollbar).unwrap().visible);

    let first = fw.tree.children(menu)[0];
    assert_eq!(fw.tree.core(first).unwrap().bounds, Rect::new(0, 0, 240, 20));
}

#[test]
fn off_screen_items_are_hidden_until_scrolled_to() {
    let mut fw = Framework::new(240, 320);
    let (win, menu, _) = menu_fixture(&mut fw, 100, 7);
    fw.set_focus(win, Some(menu)).unwrap();

    let mut surface = RecordingSurface::new(240, 320);
    fw.update_screen(&mut surface);
    assert!(surface.texts().contains(&"item 0"));
    assert!(!surface.texts().contains(&"item 6"));

    // Scroll the selection to the end; the visible window follows.
    fw.input_scroll(6);
    fw.pump();
    surface.clear();
    fw.update_screen(&mut surface);
    assert!(surface.texts().contains(&"item 6"));
    assert!(!surface.texts().contains(&"item 0"));
    assert_eq!(menu_peer(&fw, menu).selected, 6);
}

// ── Style cascade ────────────────────────────────────────────────────

#[test]
fn cascade_prefers_longer_suffix_over_global() {
    let mut fw = Framework::new(240, 320);
    let win = fw.new_window("home");
    let label = fw
        .add_widget(win, WidgetCore::named("title"), Peer::Label(LabelPeer::new("t")))
        .unwrap();

    fw.styles.set("", "fontSize", 10);
    assert_eq!(resolve_int(&fw.styles, &fw.tree, label, "fontSize", 0), 10);

    fw.styles.set("title", "fontSize", 12);
    assert_eq!(resolve_int(&fw.styles, &fw.tree, label, "fontSize", 0), 12);

    fw.styles.set("home.title", "fontSize", 14);
    assert_eq!(resolve_int(&fw.styles, &fw.tree, label, "fontSize", 0), 14);
}

#[test]
fn reskin_picks_up_table_changes() {
    let mut fw = Framework::new(240, 320);
    let (_, menu, _) = menu_fixture(&mut fw, 100, 7);
    let mut surface = RecordingSurface::new(240, 320);
    fw.update_screen(&mut surface);
    assert_eq!(menu_peer(&fw, menu).item_height, 20);

    fw.styles.set("home.menu", "itemHeight", 25);
    fw.style_changed();
    fw.update_screen(&mut surface);
    let m = menu_peer(&fw, menu);
    assert_eq!(m.item_height, 25);
    assert_eq!(m.num_widgets, 4);
}

// ── Dispatch stages ──────────────────────────────────────────────────

#[test]
fn focused_menu_consumes_scroll_before_unused_listeners() {
    let mut fw = Framework::new(240, 320);
    let (win, menu, _) = menu_fixture(&mut fw, 100, 7);
    let mut surface = RecordingSurface::new(240, 320);
    fw.update_screen(&mut surface);

    let fallthrough = Arc::new(AtomicU32::new(0));
    let f = fallthrough.clone();
    fw.add_unused_listener(
        mask::SCROLL,
        Box::new(move |_| {
            f.fetch_add(1, Ordering::SeqCst);
            EventResult::handled()
        }),
    );

    // No focus yet: the scroll falls through to the unused stage.
    fw.input_scroll(1);
    fw.pump();
    assert_eq!(fallthrough.load(Ordering::SeqCst), 1);
    assert_eq!(menu_peer(&fw, menu).selected, 0);

    fw.set_focus(win, Some(menu)).unwrap();
    fw.input_scroll(1);
    fw.pump();
    assert_eq!(fallthrough.load(Ordering::SeqCst), 1);
    assert_eq!(menu_peer(&fw, menu).selected, 1);
}

#[test]
fn global_listener_can_consume_ahead_of_the_window() {
    let mut fw = Framework::new(240, 320);
    let (win, menu, _) = menu_fixture(&mut fw, 100, 7);
    fw.set_focus(win, Some(menu)).unwrap();
    let mut surface = RecordingSurface::new(240, 320);
    fw.update_screen(&mut surface);

    fw.add_listener(mask::SCROLL, Box::new(|_| EventResult::consumed()));
    fw.input_scroll(1);
    fw.pump();
    assert_eq!(menu_peer(&fw, menu).selected, 0);
}

// ── IR pipeline ──────────────────────────────────────────────────────

#[test]
fn ir_frames_become_press_after_silence() {
    let mut fw = Framework::new(240, 320);
    let win = fw.new_window("home");
    fw.push_window(win).unwrap();

    let seen: Arc<Mutex<Vec<EventKind>>> = Arc::default();
    let s = seen.clone();
    fw.add_listener(
        mask::IR_ALL,
        Box::new(move |e| {
            s.lock().unwrap().push(e.kind.clone());
            EventResult::unused()
        }),
    );

    fw.feed(DriverInput::IrCode(ir_code::DOWN));
    fw.feed(DriverInput::IrCode(0)); // repeat sentinel
    fw.pump();
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            EventKind::IrDown { code: ir_code::DOWN },
            EventKind::IrRepeat { code: ir_code::DOWN },
        ]
    );

    // Silence past the key-up window: the next pump completes the press.
    seen.lock().unwrap().clear();
    std::thread::sleep(Duration::from_millis(150));
    fw.pump();
    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            EventKind::IrPress { code: ir_code::DOWN },
            EventKind::IrUp { code: ir_code::DOWN },
        ]
    );
}

// ── Timers ───────────────────────────────────────────────────────────

#[test]
fn once_timer_runs_once_and_unregisters() {
    let mut fw = Framework::new(240, 320);
    let hits = Arc::new(AtomicU32::new(0));
    let h = hits.clone();
    let id = fw.schedule_timer(
        Duration::from_millis(10),
        true,
        Box::new(move |_| {
            h.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }),
    );

    assert!(fw.fire_timer(id));
    fw.pump();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert!(!fw.fire_timer(id));
}

#[test]
fn timer_can_drive_ui_changes() {
    let mut fw = Framework::new(240, 320);
    let (win, menu, _) = menu_fixture(&mut fw, 100, 7);
    fw.set_focus(win, Some(menu)).unwrap();
    let mut surface = RecordingSurface::new(240, 320);
    fw.update_screen(&mut surface);

    let id = fw.schedule_timer(
        Duration::from_millis(10),
        false,
        Box::new(|fw| {
            fw.post(Event::now(EventKind::Scroll { rel: 1 }));
            Ok(())
        }),
    );

    fw.fire_timer(id);
    fw.pump();
    assert_eq!(menu_peer(&fw, menu).selected, 1);
}

// ── Quit ─────────────────────────────────────────────────────────────

#[test]
fn quit_input_stops_the_pump() {
    let mut fw = Framework::new(240, 320);
    fw.feed(DriverInput::Event(Event::now(EventKind::Quit)));
    assert!(!fw.pump());
}

// ── Background and damage ────────────────────────────────────────────

#[test]
fn first_frame_paints_background_then_settles() {
    let mut fw = Framework::new(240, 320);
    fw.background = Color::rgb(10, 20, 30);
    let win = fw.new_window("home");
    fw.push_window(win).unwrap();

    let mut surface = RecordingSurface::new(240, 320);
    assert!(fw.update_screen(&mut surface));
    assert_eq!(surface.filled_rects(), vec![Rect::new(0, 0, 240, 320)]);

    surface.clear();
    assert!(!fw.update_screen(&mut surface));
}
