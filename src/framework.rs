//! The framework: owns the widget tree, the style table, the window stack,
//! the event queue, and the timers, and runs the skin/layout/draw passes.
//!
//! Event dispatch runs in three stages: global listeners first, then the
//! addressed window (the top of the stack unless a stack transition targets
//! another), then the unused-event listeners. A consumed result stops the
//! later stages.
//!
//! Redraw is dirty-region based: damage accumulates into a single union
//! rectangle, and each frame clips to the union of this frame's damage and
//! the previous frame's, so moved widgets erase their old position.

use std::time::Duration;

use slotmap::SecondaryMap;

use crate::error::UiError;
use crate::event::ir::IrDebounce;
use crate::event::key::KeyDebounce;
use crate::event::queue::{EventQueue, EventSender};
use crate::event::types::{jiffies, Event, EventKind, EventResult};
use crate::geometry::Rect;
use crate::input::DriverInput;
use crate::resource::{load_font, SharedFont};
use crate::style::resolve::{
    resolve_align, resolve_bool, resolve_color, resolve_font, resolve_image, resolve_int,
};
use crate::style::table::StyleTable;
use crate::style::value::{Align, Color};
use crate::surface::Surface;
use crate::timer::{TimerCallback, TimerId, TimerService};
use crate::widget::core::WidgetCore;
use crate::widget::layer;
use crate::widget::tree::{WidgetId, WidgetTree};
use crate::widgets::{Peer, WindowPeer};

/// Listener invoked during dispatch. Listeners observe events; mutations go
/// back through the queue or timers.
pub type ListenerFn = Box<dyn FnMut(&Event) -> EventResult + Send>;

struct Listener {
    mask: u64,
    f: ListenerFn,
}

/// Passes over a stale tree before giving up on convergence.
const MAX_LAYOUT_PASSES: u32 = 8;

pub struct Framework {
    pub tree: WidgetTree,
    pub styles: StyleTable,
    /// Index 0 is the top of the stack.
    window_stack: Vec<WidgetId>,
    /// Drawn over every window, receive broadcast events.
    global_widgets: Vec<WidgetId>,
    global_listeners: Vec<Listener>,
    unused_listeners: Vec<Listener>,
    /// Run when the event is delivered to that widget, before its intrinsic
    /// handling.
    widget_listeners: SecondaryMap<WidgetId, Vec<Listener>>,
    queue: EventQueue,
    timers: TimerService,
    ir: IrDebounce,
    keys: KeyDebounce,
    dirty: Rect,
    last_dirty: Rect,
    style_origin: u64,
    layout_origin: u64,
    layout_pending: bool,
    screen: Rect,
    pub background: Color,
    pub default_font: SharedFont,
    running: bool,
}

impl Framework {
    pub fn new(screen_w: i32, screen_h: i32) -> Self {
        let queue = EventQueue::new();
        let timers = TimerService::new(queue.sender());
        let screen = Rect::new(0, 0, screen_w, screen_h);
        Self {
            tree: WidgetTree::new(),
            styles: StyleTable::new(),
            window_stack: Vec::new(),
            global_widgets: Vec::new(),
            global_listeners: Vec::new(),
            unused_listeners: Vec::new(),
            widget_listeners: SecondaryMap::new(),
            queue,
            timers,
            ir: IrDebounce::with_system_clock(),
            keys: KeyDebounce::new(),
            dirty: screen,
            last_dirty: Rect::EMPTY,
            style_origin: 1,
            layout_origin: 1,
            layout_pending: true,
            screen,
            background: Color::BLACK,
            default_font: load_font("FreeSans", 15),
            running: true,
        }
    }

    pub fn screen(&self) -> Rect {
        self.screen
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// A posting handle for input drivers and application tasks.
    pub fn sender(&self) -> EventSender {
        self.queue.sender()
    }

    pub fn post(&self, event: Event) {
        self.queue.post(event);
    }

    // -----------------------------------------------------------------------
    // Windows and widgets
    // -----------------------------------------------------------------------

    /// Create a window widget sized to the screen. Not yet on the stack.
    pub fn new_window(&mut self, style_name: &str) -> WidgetId {
        let mut core = WidgetCore::named(style_name);
        core.bounds = self.screen;
        core.layer = layer::ALL;
        self.tree.insert(core, Peer::Window(WindowPeer::default()))
    }

    /// Create a popup window. Popups composite the window beneath them.
    pub fn new_popup(&mut self, style_name: &str) -> WidgetId {
        let mut core = WidgetCore::named(style_name);
        core.bounds = self.screen;
        core.layer = layer::ALL;
        self.tree.insert(core, Peer::Window(WindowPeer::popup()))
    }

    pub fn add_widget(
        &mut self,
        parent: WidgetId,
        core: WidgetCore,
        peer: Peer,
    ) -> Result<WidgetId, UiError> {
        let id = self.tree.insert_child(parent, core, peer)?;
        self.relayout(parent);
        Ok(id)
    }

    /// Remove a widget subtree, dropping focus and stack references to it.
    pub fn remove_widget(&mut self, id: WidgetId) {
        let removed: Vec<WidgetId> = self.tree.subtree(id);
        if let Some(bounds) = self.tree.core(id).map(|c| c.bounds) {
            self.redraw(bounds);
        }
        if let Some(parent) = self.tree.parent(id) {
            self.relayout(parent);
        }
        self.tree.remove(id);

        self.window_stack.retain(|w| !removed.contains(w));
        self.global_widgets.retain(|w| !removed.contains(w));
        for &w in &removed {
            self.widget_listeners.remove(w);
        }
        for win in self.window_stack.clone() {
            if let Some(Peer::Window(w)) = self.tree.get_mut(win).map(|n| &mut n.peer) {
                if let Some(f) = w.focus {
                    if removed.contains(&f) {
                        w.focus = None;
                    }
                }
            }
        }
    }

    /// Drawn above every window; broadcast events reach it on the default
    /// path.
    pub fn add_global_widget(&mut self, id: WidgetId) {
        if self.tree.contains(id) && !self.global_widgets.contains(&id) {
            self.global_widgets.push(id);
            self.layout_pending = true;
            self.full_redraw();
        }
    }

    pub fn top_window(&self) -> Option<WidgetId> {
        self.window_stack.first().copied()
    }

    /// Push a window onto the stack. The previous top is notified it went
    /// inactive and hidden; the new top gets push/active/show.
    pub fn push_window(&mut self, id: WidgetId) -> Result<(), UiError> {
        if !self.tree.contains(id) {
            return Err(UiError::InvalidWidget);
        }
        if let Some(old_top) = self.top_window() {
            self.dispatch_to(old_top, &Event::now(EventKind::WindowInactive));
            self.dispatch_to(old_top, &Event::now(EventKind::Hide));
        }
        self.window_stack.insert(0, id);
        self.tree.mark_style_stale(id);
        self.tree.mark_layout_stale(id);
        self.layout_pending = true;
        self.full_redraw();

        self.dispatch_to(id, &Event::now(EventKind::WindowPush));
        self.dispatch_to(id, &Event::now(EventKind::WindowActive));
        self.dispatch_to(id, &Event::now(EventKind::Show));
        Ok(())
    }

    /// Pop the top window. The window stays in the tree; callers remove it
    /// if it will not return.
    pub fn pop_window(&mut self) -> Option<WidgetId> {
        if self.window_stack.is_empty() {
            return None;
        }
        let old = self.window_stack.remove(0);
        self.dispatch_to(old, &Event::now(EventKind::WindowPop));
        self.dispatch_to(old, &Event::now(EventKind::WindowInactive));
        self.dispatch_to(old, &Event::now(EventKind::Hide));

        if let Some(new_top) = self.top_window() {
            self.tree.mark_layout_stale(new_top);
            self.layout_pending = true;
            self.dispatch_to(new_top, &Event::now(EventKind::WindowActive));
            self.dispatch_to(new_top, &Event::now(EventKind::Show));
        }
        self.full_redraw();
        Some(old)
    }

    /// Focus a widget within a window for key/scroll routing.
    pub fn set_focus(&mut self, window: WidgetId, widget: Option<WidgetId>) -> Result<(), UiError> {
        if let Some(w) = widget {
            if !self.tree.contains(w) {
                return Err(UiError::InvalidWidget);
            }
        }
        match self.tree.get_mut(window).map(|n| &mut n.peer) {
            Some(Peer::Window(win)) => {
                win.focus = widget;
                Ok(())
            }
            _ => Err(UiError::InvalidWidget),
        }
    }

    pub fn focused(&self, window: WidgetId) -> Option<WidgetId> {
        match self.tree.get(window).map(|n| &n.peer) {
            Some(Peer::Window(win)) => win.focus,
            _ => None,
        }
    }

    /// Replace a label's text. Damages the label and schedules a prepare
    /// step before the next draw.
    pub fn set_label_text(
        &mut self,
        id: WidgetId,
        text: impl Into<String>,
    ) -> Result<(), UiError> {
        match self.tree.get_mut(id).map(|n| &mut n.peer) {
            Some(Peer::Label(l)) => l.text = text.into(),
            _ => return Err(UiError::InvalidWidget),
        }
        self.invalidate_content(id);
        Ok(())
    }

    /// Show or clear a menu's accelerator overlay.
    pub fn set_menu_accel(&mut self, id: WidgetId, text: Option<String>) -> Result<(), UiError> {
        match self.tree.get_mut(id).map(|n| &mut n.peer) {
            Some(Peer::Menu(m)) => m.accel_text = text,
            _ => return Err(UiError::InvalidWidget),
        }
        self.invalidate_content(id);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Listeners and timers
    // -----------------------------------------------------------------------

    /// Observe events before any window sees them. A consumed result stops
    /// dispatch.
    pub fn add_listener(&mut self, mask: u64, f: ListenerFn) {
        self.global_listeners.push(Listener { mask, f });
    }

    /// Observe events no window consumed (the back-stop for default key
    /// bindings).
    pub fn add_unused_listener(&mut self, mask: u64, f: ListenerFn) {
        self.unused_listeners.push(Listener { mask, f });
    }

    /// Observe events delivered to one widget, on whichever path delivers
    /// them (focus routing, broadcast, or the global-widget pass). A
    /// consumed result suppresses the widget's intrinsic handling.
    pub fn add_widget_listener(&mut self, id: WidgetId, mask: u64, f: ListenerFn) {
        if !self.tree.contains(id) {
            return;
        }
        match self.widget_listeners.get_mut(id) {
            Some(listeners) => listeners.push(Listener { mask, f }),
            None => {
                self.widget_listeners.insert(id, vec![Listener { mask, f }]);
            }
        }
    }

    pub fn schedule_timer(
        &mut self,
        interval: Duration,
        once: bool,
        callback: TimerCallback,
    ) -> TimerId {
        self.timers.schedule(interval, once, callback)
    }

    pub fn cancel_timer(&mut self, id: TimerId) -> bool {
        self.timers.cancel(id)
    }

    /// Drive one timer expiry by hand (headless and test setups).
    pub fn fire_timer(&self, id: TimerId) -> bool {
        self.timers.fire(id)
    }

    fn consume_timer(&mut self, id: TimerId) {
        // Cancelled after posting: the queued event resolves to nothing.
        let Some(mut cb) = self.timers.take_for_dispatch(id) else { return };
        if let Err(e) = cb(self) {
            log::warn!("timer callback failed: {e}");
        }
        self.timers.restore_callback(id, cb);
    }

    // -----------------------------------------------------------------------
    // Input feeds
    // -----------------------------------------------------------------------

    /// Feed one translated driver input.
    pub fn feed(&mut self, input: DriverInput) {
        let now = jiffies();
        match input {
            DriverInput::Event(e) => self.queue.post(e),
            DriverInput::KeyDown(code) => self.input_key_down(code, now),
            DriverInput::KeyUp(code) => self.input_key_up(code, now),
            DriverInput::IrCode(code) => self.input_ir_code(code, now),
            DriverInput::Char(ch) => self.queue.post(Event::now(EventKind::CharPress { ch })),
        }
    }

    pub fn input_key_down(&mut self, code: u32, now_ms: u64) {
        for e in self.keys.on_key_down(code, now_ms) {
            self.queue.post(e);
        }
    }

    pub fn input_key_up(&mut self, code: u32, now_ms: u64) {
        for e in self.keys.on_key_up(code, now_ms) {
            self.queue.post(e);
        }
    }

    pub fn input_ir_code(&mut self, code: u32, now_ms: u64) {
        for e in self.ir.on_code(code, now_ms) {
            self.queue.post(e);
        }
    }

    pub fn input_scroll(&mut self, rel: i32) {
        self.queue.post(Event::now(EventKind::Scroll { rel }));
    }

    // -----------------------------------------------------------------------
    // Event pump and dispatch
    // -----------------------------------------------------------------------

    /// Run the debounce deadlines and drain the queue. Returns false once a
    /// quit has been processed.
    pub fn pump(&mut self) -> bool {
        let now = jiffies();
        for e in self.keys.on_tick(now) {
            self.queue.post(e);
        }
        for e in self.ir.on_idle(now) {
            self.queue.post(e);
        }
        while let Some(event) = self.queue.try_pop() {
            self.handle_event(event);
            if !self.running {
                break;
            }
        }
        self.running
    }

    fn handle_event(&mut self, event: Event) {
        match event.kind {
            EventKind::TimerFired { timer } => self.consume_timer(timer),
            EventKind::Quit => self.running = false,
            _ => {
                if let EventKind::Resize { w, h } = event.kind {
                    self.resize(w, h);
                }
                let r = self.dispatch_event(&event);
                if r.is_quit() {
                    self.running = false;
                }
            }
        }
    }

    /// The output surface changed size: windows track the screen.
    pub fn resize(&mut self, w: i32, h: i32) {
        self.screen = Rect::new(0, 0, w, h);
        for win in self.window_stack.clone() {
            self.set_bounds(win, self.screen);
        }
        self.layout_pending = true;
        self.full_redraw();
    }

    /// Dispatch through the three stages, addressed at the top window.
    pub fn dispatch_event(&mut self, event: &Event) -> EventResult {
        let target = self.top_window();
        self.dispatch_stages(target, event)
    }

    /// Dispatch addressed at a specific window (stack transitions).
    fn dispatch_to(&mut self, window: WidgetId, event: &Event) -> EventResult {
        self.dispatch_stages(Some(window), event)
    }

    fn dispatch_stages(&mut self, window: Option<WidgetId>, event: &Event) -> EventResult {
        let bit = event.kind.mask_bit();
        let mut r = EventResult::unused();

        for l in &mut self.global_listeners {
            if l.mask & bit != 0 {
                r |= (l.f)(event);
            }
        }
        if !r.is_consumed() {
            if let Some(win) = window {
                r |= self.window_event(win, event);
            }
        }
        if !r.is_consumed() {
            for l in &mut self.unused_listeners {
                if l.mask & bit != 0 {
                    r |= (l.f)(event);
                }
            }
        }
        r
    }

    /// The window's routing policy.
    fn window_event(&mut self, win: WidgetId, event: &Event) -> EventResult {
        if event.kind.is_focus_routed() {
            return match self.focused(win) {
                Some(focus) if self.tree.contains(focus) => self.widget_event_recursive(focus, event),
                _ => EventResult::unused(),
            };
        }
        if event.kind.is_window_transition() {
            // Addressed to the window itself; the subtree never sees these.
            return EventResult::unused();
        }
        if event.kind.is_visibility() {
            return self.broadcast_children(win, event);
        }
        // Default: global widgets, then the window's subtree.
        let mut r = EventResult::unused();
        for g in self.global_widgets.clone() {
            r |= self.widget_event_recursive(g, event);
        }
        r | self.broadcast_children(win, event)
    }

    fn broadcast_children(&mut self, id: WidgetId, event: &Event) -> EventResult {
        let mut r = EventResult::unused();
        for child in self.tree.children(id).to_vec() {
            r |= self.widget_event_recursive(child, event);
        }
        r
    }

    fn widget_event_recursive(&mut self, id: WidgetId, event: &Event) -> EventResult {
        let mut r = self.widget_event(id, event);
        for child in self.tree.children(id).to_vec() {
            r |= self.widget_event_recursive(child, event);
        }
        r
    }

    /// Widget listeners, then kind-intrinsic handling.
    fn widget_event(&mut self, id: WidgetId, event: &Event) -> EventResult {
        let bit = event.kind.mask_bit();
        let mut r = EventResult::unused();
        if let Some(listeners) = self.widget_listeners.get_mut(id) {
            for l in listeners {
                if l.mask & bit != 0 {
                    r |= (l.f)(event);
                }
            }
        }
        if r.is_consumed() {
            return r;
        }

        // (moved, bounds, needs_relayout)
        let outcome = match self.tree.get_mut(id) {
            Some(node) => match (&mut node.peer, &event.kind) {
                (Peer::Menu(menu), EventKind::Scroll { rel }) => {
                    Some((menu.scroll_by(*rel), node.core.bounds, true))
                }
                (Peer::Slider(slider), EventKind::Scroll { rel }) => {
                    Some((slider.scroll_by(*rel), node.core.bounds, false))
                }
                _ => None,
            },
            None => return r,
        };
        match outcome {
            Some((moved, bounds, needs_relayout)) => {
                if moved {
                    if needs_relayout {
                        self.relayout(id);
                    }
                    self.redraw(bounds);
                }
                r | EventResult::consumed()
            }
            None => r,
        }
    }

    // -----------------------------------------------------------------------
    // Invalidation
    // -----------------------------------------------------------------------

    /// Accumulate damage.
    pub fn redraw(&mut self, rect: Rect) {
        self.dirty = self.dirty.union(rect.intersection(self.screen));
    }

    pub fn full_redraw(&mut self) {
        self.dirty = self.screen;
    }

    /// Content changed without a geometry change (text, list length): mark
    /// the widget for a prepare step and damage its bounds.
    pub fn invalidate_content(&mut self, id: WidgetId) {
        let Some(core) = self.tree.core_mut(id) else { return };
        core.content_invalid = true;
        let bounds = core.bounds;
        self.layout_pending = true;
        self.redraw(bounds);
    }

    /// Mark a subtree for re-layout on the next frame.
    pub fn relayout(&mut self, id: WidgetId) {
        self.tree.mark_layout_stale(id);
        self.layout_pending = true;
    }

    /// Mark a subtree for a skin pass (style re-resolution) and re-layout.
    pub fn reskin(&mut self, id: WidgetId) {
        self.tree.mark_style_stale(id);
        self.tree.mark_layout_stale(id);
        self.layout_pending = true;
    }

    /// The style table changed wholesale: every widget re-resolves.
    pub fn style_changed(&mut self) {
        self.style_origin += 1;
        self.layout_origin += 1;
        self.layout_pending = true;
        self.full_redraw();
    }

    // -----------------------------------------------------------------------
    // Skin and layout passes
    // -----------------------------------------------------------------------

    /// Run skin/layout passes until the tree converges, then repaint damage.
    /// Returns true if anything was drawn.
    pub fn update_screen(&mut self, surface: &mut dyn Surface) -> bool {
        let mut passes = 0;
        while self.layout_pending && passes < MAX_LAYOUT_PASSES {
            self.layout_pending = false;
            for win in self.visible_windows() {
                self.check_layout(win);
            }
            for g in self.global_widgets.clone() {
                self.check_layout(g);
            }
            passes += 1;
        }
        if self.layout_pending {
            log::warn!("layout did not converge after {passes} passes");
            self.layout_pending = false;
        }

        if self.dirty.is_empty() {
            return false;
        }
        // Clip to this frame's damage plus last frame's, so widgets that
        // moved erase their previous position.
        let clip = self.dirty.union(self.last_dirty).intersection(self.screen);
        surface.set_clip(Some(clip));
        surface.fill_rect(self.screen, self.background);
        if let Some(top) = self.top_window() {
            self.draw_widget(top, surface, layer::ALL);
        }
        surface.set_clip(None);

        self.last_dirty = self.dirty;
        self.dirty = Rect::EMPTY;
        true
    }

    /// The top window plus every window a popup chain composites beneath
    /// it. All of them are drawn, so all of them must be kept laid out.
    fn visible_windows(&self) -> Vec<WidgetId> {
        let mut out = Vec::new();
        for &win in &self.window_stack {
            out.push(win);
            let popup = matches!(
                self.tree.get(win).map(|n| &n.peer),
                Some(Peer::Window(w)) if w.is_popup
            );
            if !popup {
                break;
            }
        }
        out
    }

    fn check_layout(&mut self, id: WidgetId) {
        let Some(core) = self.tree.core(id) else { return };
        if core.style_epoch != self.style_origin {
            self.skin_widget(id);
            if let Some(core) = self.tree.core_mut(id) {
                core.style_epoch = self.style_origin;
            }
        }
        if self.tree.core(id).is_some_and(|c| c.content_invalid) {
            self.prepare_widget(id);
            if let Some(core) = self.tree.core_mut(id) {
                core.content_invalid = false;
            }
        }
        for child in self.tree.children(id).to_vec() {
            self.check_layout(child);
        }
        let Some(core) = self.tree.core(id) else { return };
        if core.layout_epoch != self.layout_origin {
            self.layout_widget(id);
            if let Some(core) = self.tree.core_mut(id) {
                core.layout_epoch = self.layout_origin;
            }
        }
    }

    /// Refresh derived content state ahead of the draw. Menus recount their
    /// rows; other kinds carry their content directly.
    fn prepare_widget(&mut self, id: WidgetId) {
        if let Some(Peer::Menu(_)) = self.tree.get(id).map(|n| &n.peer) {
            let bounds_h = self.tree.core(id).map(|c| c.bounds.h).unwrap_or(0);
            let list_size = self.menu_items(id).len();
            if let Some(Peer::Menu(m)) = self.tree.get_mut(id).map(|n| &mut n.peer) {
                m.update_counts(bounds_h, list_size);
            }
            self.relayout(id);
        }
    }

    /// Resolve this widget's styled geometry and kind properties.
    fn skin_widget(&mut self, id: WidgetId) {
        self.tree.cache_style_path(id);
        let Some(core) = self.tree.core(id) else { return };
        let cur = core.bounds;
        let cur_layer = core.layer;

        let bounds = Rect {
            x: resolve_int(&self.styles, &self.tree, id, "x", cur.x),
            y: resolve_int(&self.styles, &self.tree, id, "y", cur.y),
            w: resolve_int(&self.styles, &self.tree, id, "w", cur.w),
            h: resolve_int(&self.styles, &self.tree, id, "h", cur.h),
        };
        let padding = self.resolve_insets(id, "padding");
        let border = self.resolve_insets(id, "border");
        let wlayer = resolve_int(&self.styles, &self.tree, id, "layer", cur_layer as i32);
        let hidden = resolve_bool(&self.styles, &self.tree, id, "hidden", false);

        self.skin_peer(id);

        self.apply_bounds(id, bounds);
        let mut damage = None;
        if let Some(core) = self.tree.core_mut(id) {
            core.padding = padding;
            core.border = border;
            core.layer = wlayer as u32;
            let visible = !hidden;
            if core.visible != visible {
                core.visible = visible;
                damage = Some(core.bounds);
            }
        }
        if let Some(rect) = damage {
            self.redraw(rect);
        }
    }

    fn resolve_insets(&self, id: WidgetId, key: &str) -> crate::geometry::Insets {
        let base = resolve_int(&self.styles, &self.tree, id, key, 0);
        crate::geometry::Insets {
            left: resolve_int(&self.styles, &self.tree, id, &format!("{key}Left"), base),
            top: resolve_int(&self.styles, &self.tree, id, &format!("{key}Top"), base),
            right: resolve_int(&self.styles, &self.tree, id, &format!("{key}Right"), base),
            bottom: resolve_int(&self.styles, &self.tree, id, &format!("{key}Bottom"), base),
        }
    }

    fn skin_peer(&mut self, id: WidgetId) {
        // Resolve first (immutable), then install (mutable).
        match self.tree.get(id).map(|n| &n.peer) {
            Some(Peer::Window(_)) => {
                let (mask, is_set) =
                    resolve_color(&self.styles, &self.tree, id, "mask", Color::BLACK);
                if let Some(Peer::Window(w)) = self.tree.get_mut(id).map(|n| &mut n.peer) {
                    w.mask = is_set.then_some(mask);
                }
            }
            Some(Peer::Menu(_)) => {
                let item_height = resolve_int(
                    &self.styles,
                    &self.tree,
                    id,
                    "itemHeight",
                    crate::widgets::menu::DEFAULT_ITEM_HEIGHT,
                );
                let font =
                    resolve_font(&self.styles, &self.tree, id, "font", &self.default_font);
                let (fg, _) = resolve_color(&self.styles, &self.tree, id, "fg", Color::WHITE);
                let bounds_h = self.tree.core(id).map(|c| c.bounds.h).unwrap_or(0);
                let list_size = self.menu_items(id).len();
                if let Some(Peer::Menu(m)) = self.tree.get_mut(id).map(|n| &mut n.peer) {
                    m.item_height = item_height;
                    m.font.replace(Some(font));
                    m.fg = fg;
                    m.update_counts(bounds_h, list_size);
                }
            }
            Some(Peer::Label(_)) => {
                let font =
                    resolve_font(&self.styles, &self.tree, id, "font", &self.default_font);
                let (fg, _) = resolve_color(&self.styles, &self.tree, id, "fg", Color::WHITE);
                let align = resolve_align(&self.styles, &self.tree, id, "align", Align::Left);
                if let Some(Peer::Label(l)) = self.tree.get_mut(id).map(|n| &mut n.peer) {
                    l.font.replace(Some(font));
                    l.fg = fg;
                    l.align.get_or_insert(align);
                }
            }
            Some(Peer::Icon(_)) => {
                let img = resolve_image(&self.styles, &self.tree, id, "img");
                let align = resolve_align(&self.styles, &self.tree, id, "align", Align::Center);
                if let Some(Peer::Icon(i)) = self.tree.get_mut(id).map(|n| &mut n.peer) {
                    if img.is_some() {
                        i.image.replace(img);
                    }
                    i.align.get_or_insert(align);
                }
            }
            Some(Peer::Slider(_)) => {
                let pill = resolve_image(&self.styles, &self.tree, id, "img");
                let background = resolve_image(&self.styles, &self.tree, id, "bgImg");
                if let Some(Peer::Slider(s)) = self.tree.get_mut(id).map(|n| &mut n.peer) {
                    if pill.is_some() {
                        s.pill.replace(pill);
                    }
                    if background.is_some() {
                        s.background.replace(background);
                    }
                }
            }
            Some(Peer::Group(_)) | None => {}
        }
    }

    /// Item children of a menu, scrollbar excluded.
    fn menu_items(&self, id: WidgetId) -> Vec<WidgetId> {
        let scrollbar = match self.tree.get(id).map(|n| &n.peer) {
            Some(Peer::Menu(m)) => m.scrollbar,
            _ => None,
        };
        self.tree
            .children(id)
            .iter()
            .copied()
            .filter(|&c| Some(c) != scrollbar)
            .collect()
    }

    fn layout_widget(&mut self, id: WidgetId) {
        match self.tree.get(id).map(|n| &n.peer) {
            Some(Peer::Window(_)) | Some(Peer::Group(_)) => self.layout_container(id),
            Some(Peer::Menu(_)) => self.layout_menu(id),
            _ => {}
        }
    }

    /// Children fill the content box except where their preferred bounds
    /// pin an edge or extent.
    fn layout_container(&mut self, id: WidgetId) {
        let Some(core) = self.tree.core(id) else { return };
        let content = core.content_box();
        for child in self.tree.children(id).to_vec() {
            let Some(ccore) = self.tree.core(child) else { continue };
            let rect = ccore.preferred.resolve(content);
            self.apply_bounds(child, rect);
        }
    }

    /// Stack items at `item_height`, reserving a right-hand column for the
    /// scrollbar when the list overflows.
    fn layout_menu(&mut self, id: WidgetId) {
        let Some(core) = self.tree.core(id) else { return };
        let bounds = core.bounds;
        let padding = core.padding;

        let items = self.menu_items(id);
        let (scrollbar, top, num_widgets, item_height, has_scrollbar) = {
            let Some(Peer::Menu(m)) = self.tree.get_mut(id).map(|n| &mut n.peer) else {
                return;
            };
            m.update_counts(bounds.h, items.len());
            (m.scrollbar, m.top, m.num_widgets, m.item_height, m.has_scrollbar)
        };

        // Scrollbar column: preferred extent plus its border reservation.
        let mut sb_w = 0;
        let mut sb_h = bounds.h - padding.vertical();
        let mut sb_border = crate::geometry::Insets::ZERO;
        if has_scrollbar {
            if let Some(sb) = scrollbar {
                if let Some(sc) = self.tree.core(sb) {
                    if let Some(w) = sc.preferred.w {
                        sb_w = w;
                    }
                    if let Some(h) = sc.preferred.h {
                        sb_h = h;
                    }
                    sb_border = sc.border;
                    sb_w += sb_border.horizontal();
                    sb_h += sb_border.vertical();
                }
            }
        }

        let item_x = bounds.x + padding.left;
        let item_w = bounds.w - padding.horizontal() - sb_w;
        let mut item_y = bounds.y + padding.top;

        let mut placements: Vec<(WidgetId, Rect)> = Vec::new();
        let mut visibility: Vec<(WidgetId, bool)> = Vec::new();
        for (i, &item) in items.iter().enumerate() {
            let on_screen = i >= top && i < top + num_widgets;
            visibility.push((item, on_screen));
            if on_screen {
                placements.push((item, Rect::new(item_x, item_y, item_w, item_height)));
                item_y += item_height;
            }
        }

        for (item, on_screen) in visibility {
            let mut damage = None;
            if let Some(c) = self.tree.core_mut(item) {
                if c.visible != on_screen {
                    c.visible = on_screen;
                    damage = Some(c.bounds);
                }
            }
            if let Some(rect) = damage {
                self.redraw(rect);
            }
        }
        for (item, rect) in placements {
            self.apply_bounds(item, rect);
        }

        if let Some(sb) = scrollbar {
            let mut damage = None;
            if let Some(c) = self.tree.core_mut(sb) {
                if c.visible != has_scrollbar {
                    c.visible = has_scrollbar;
                    damage = Some(c.bounds);
                }
            }
            if let Some(rect) = damage {
                self.redraw(rect);
            }
            if has_scrollbar {
                let rect = Rect::new(
                    bounds.right() - padding.right - sb_w + sb_border.left,
                    bounds.y + padding.top + sb_border.top,
                    sb_w - sb_border.horizontal(),
                    sb_h - sb_border.vertical(),
                );
                self.apply_bounds(sb, rect);
            }
        }
    }

    /// Move/resize a widget: damage both positions and re-lay out the
    /// subtree. Identical bounds are a no-op.
    pub fn set_bounds(&mut self, id: WidgetId, rect: Rect) {
        if let Some(core) = self.tree.core(id) {
            if core.style_epoch != self.style_origin {
                self.skin_widget(id);
                if let Some(core) = self.tree.core_mut(id) {
                    core.style_epoch = self.style_origin;
                }
            }
        }
        self.apply_bounds(id, rect);
    }

    fn apply_bounds(&mut self, id: WidgetId, rect: Rect) {
        let Some(core) = self.tree.core(id) else { return };
        let old = core.bounds;
        if old == rect {
            return;
        }
        self.redraw(old);
        if let Some(core) = self.tree.core_mut(id) {
            core.bounds = rect;
        }
        self.relayout(id);
        self.redraw(rect);
    }

    // -----------------------------------------------------------------------
    // Draw pass
    // -----------------------------------------------------------------------

    fn draw_widget(&self, id: WidgetId, surface: &mut dyn Surface, layer_mask: u32) {
        let Some(node) = self.tree.get(id) else { return };
        if !node.core.visible {
            return;
        }
        let core = &node.core;
        let painting = core.layer & layer_mask != 0;

        match &node.peer {
            Peer::Window(win) => {
                if win.is_popup && layer_mask & layer::FRAME != 0 {
                    // Composite the window beneath first: a popup only
                    // obscures its own bounds.
                    if let Some(pos) = self.window_stack.iter().position(|&w| w == id) {
                        if let Some(&beneath) = self.window_stack.get(pos + 1) {
                            self.draw_widget(beneath, surface, layer::ALL);
                        }
                    }
                    if let Some(mask) = win.mask {
                        surface.fill_rect(self.screen, mask);
                    }
                }
                for &g in &self.global_widgets {
                    self.draw_widget(g, surface, layer_mask);
                }
                for &child in self.tree.children(id) {
                    self.draw_widget(child, surface, layer_mask);
                }
            }
            Peer::Group(_) => {
                for &child in self.tree.children(id) {
                    self.draw_widget(child, surface, layer_mask);
                }
            }
            Peer::Menu(menu) => {
                for &child in self.tree.children(id) {
                    self.draw_widget(child, surface, layer_mask);
                }
                if painting {
                    if let (Some(text), Some(font)) = (&menu.accel_text, menu.font.get()) {
                        let (tw, th) = font.measure(text);
                        let x = core.bounds.x + core.halign(Align::Center, tw);
                        let y = core.bounds.y + core.valign(Align::Center, th);
                        surface.draw_text(font, menu.fg, text, x, y);
                    }
                }
            }
            Peer::Label(label) => {
                if painting {
                    if let Some(font) = label.font.get() {
                        let (tw, th) = font.measure(&label.text);
                        let align = label.align.unwrap_or(Align::Left);
                        let x = core.bounds.x + core.halign(align, tw);
                        let y = core.bounds.y + core.valign(align, th);
                        surface.draw_text(font, label.fg, &label.text, x, y);
                    }
                }
            }
            Peer::Icon(icon) => {
                if painting {
                    if let Some(img) = icon.image.get() {
                        let align = icon.align.unwrap_or(Align::Center);
                        let x = core.bounds.x + core.halign(align, img.width);
                        let y = core.bounds.y + core.valign(align, img.height);
                        surface.blit(img, x, y);
                    }
                }
            }
            Peer::Slider(slider) => {
                if painting {
                    if let Some(bg) = slider.background.get() {
                        surface.blit(bg, core.bounds.x, core.bounds.y);
                    }
                    if let Some(pill) = slider.pill.get() {
                        let track = core.bounds.w - core.padding.horizontal() - pill.width;
                        let offset = if slider.range > 0 {
                            (track.max(0) as i64 * slider.value as i64 / slider.range as i64) as i32
                        } else {
                            0
                        };
                        let x = core.bounds.x + core.padding.left + offset;
                        let y = core.bounds.y + core.valign(Align::Center, pill.height);
                        surface.blit(pill, x, y);
                    }
                }
            }
        }
    }
}

impl std::fmt::Debug for Framework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Framework")
            .field("widgets", &self.tree.len())
            .field("window_stack", &self.window_stack)
            .field("dirty", &self.dirty)
            .field("running", &self.running)
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
