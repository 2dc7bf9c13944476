//! Terminal input driver.
//!
//! Translates crossterm terminal events into the toolkit's input feeds so
//! the whole stack can be exercised on a development machine: letter keys
//! map to the device's hardware keys, and holding ALT turns the navigation
//! keys into raw IR codes routed through the IR normalizer, exactly as the
//! real receiver would deliver them.

use std::time::Duration;

use crossterm::event::{
    Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
};

use crate::event::types::{key, Event, EventKind};

/// Raw codes for the stock remote, used by the ALT simulation map.
pub mod ir_code {
    pub const UP: u32 = 0x7689_e01f;
    pub const DOWN: u32 = 0x7689_b04f;
    pub const LEFT: u32 = 0x7689_906f;
    pub const RIGHT: u32 = 0x7689_d02f;
    pub const PLAY: u32 = 0x7689_10ef;
    pub const ADD: u32 = 0x7689_609f;
    pub const DIGITS: [u32; 10] = [
        0x7689_9867, // 0
        0x7689_f00f,
        0x7689_08f7,
        0x7689_8877,
        0x7689_48b7,
        0x7689_c837,
        0x7689_28d7,
        0x7689_a857,
        0x7689_6897,
        0x7689_e817, // 9
    ];
}

/// One translated input, fed to [`Framework::feed`].
///
/// [`Framework::feed`]: crate::framework::Framework::feed
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DriverInput {
    /// Post directly, no debounce.
    Event(Event),
    /// Run through the key press/hold debounce.
    KeyDown(u32),
    KeyUp(u32),
    /// Run through the IR normalizer.
    IrCode(u32),
    /// Text entry.
    Char(char),
}

/// Block up to `timeout` for one terminal event and translate it. Returns
/// `Ok(None)` on timeout or on events with no mapping.
pub fn poll_input(timeout: Duration) -> std::io::Result<Option<DriverInput>> {
    if !crossterm::event::poll(timeout)? {
        return Ok(None);
    }
    Ok(translate(&crossterm::event::read()?))
}

/// Translate one terminal event.
pub fn translate(event: &TermEvent) -> Option<DriverInput> {
    match event {
        TermEvent::Key(k) => translate_key(k),
        TermEvent::Mouse(m) => {
            let (x, y) = (m.column as i32, m.row as i32);
            match m.kind {
                MouseEventKind::ScrollUp => {
                    Some(DriverInput::Event(Event::now(EventKind::Scroll { rel: -1 })))
                }
                MouseEventKind::ScrollDown => {
                    Some(DriverInput::Event(Event::now(EventKind::Scroll { rel: 1 })))
                }
                MouseEventKind::Down(_) => {
                    Some(DriverInput::Event(Event::now(EventKind::MouseDown { x, y })))
                }
                MouseEventKind::Up(_) => {
                    Some(DriverInput::Event(Event::now(EventKind::MouseUp { x, y })))
                }
                MouseEventKind::Drag(_) => {
                    Some(DriverInput::Event(Event::now(EventKind::MouseDrag { x, y })))
                }
                MouseEventKind::Moved => {
                    Some(DriverInput::Event(Event::now(EventKind::MouseMove { x, y })))
                }
                // Horizontal scroll has no device equivalent.
                _ => None,
            }
        }
        TermEvent::Resize(w, h) => Some(DriverInput::Event(Event::now(EventKind::Resize {
            w: *w as i32,
            h: *h as i32,
        }))),
        _ => None,
    }
}

fn translate_key(k: &KeyEvent) -> Option<DriverInput> {
    if k.modifiers.contains(KeyModifiers::CONTROL) && k.code == KeyCode::Char('c') {
        return Some(DriverInput::Event(Event::now(EventKind::Quit)));
    }

    // ALT: simulate the IR receiver. Every press and autorepeat becomes a
    // raw frame; the normalizer reconstructs press/hold/up from the stream.
    if k.modifiers.contains(KeyModifiers::ALT) {
        if k.kind == KeyEventKind::Release {
            return None;
        }
        let code = ir_map(k.code)?;
        return Some(DriverInput::IrCode(code));
    }

    let mapped = key_map(k.code);
    match (mapped, k.kind) {
        (Some(code), KeyEventKind::Press | KeyEventKind::Repeat) => {
            Some(DriverInput::KeyDown(code))
        }
        (Some(code), KeyEventKind::Release) => Some(DriverInput::KeyUp(code)),
        (None, KeyEventKind::Press) => match k.code {
            KeyCode::Char(ch) => Some(DriverInput::Char(ch)),
            _ => None,
        },
        _ => None,
    }
}

/// Terminal keys standing in for the device's hardware keys.
fn key_map(code: KeyCode) -> Option<u32> {
    Some(match code {
        KeyCode::Enter => key::GO,
        KeyCode::Esc | KeyCode::Backspace => key::BACK,
        KeyCode::Up => key::UP,
        KeyCode::Down => key::DOWN,
        KeyCode::Left => key::LEFT,
        KeyCode::Right => key::RIGHT,
        KeyCode::Home => key::HOME,
        KeyCode::Char('p') => key::PLAY,
        KeyCode::Char(' ') => key::PAUSE,
        KeyCode::Char('a') => key::ADD,
        KeyCode::Char('z') => key::REW,
        KeyCode::Char('b') => key::FWD,
        KeyCode::Char('+') | KeyCode::Char('=') => key::VOLUME_UP,
        KeyCode::Char('-') => key::VOLUME_DOWN,
        KeyCode::PageUp => key::PAGE_UP,
        KeyCode::PageDown => key::PAGE_DOWN,
        KeyCode::Char('m') => key::MUTE,
        _ => return None,
    })
}

/// ALT chords standing in for remote buttons.
fn ir_map(code: KeyCode) -> Option<u32> {
    Some(match code {
        KeyCode::Up => ir_code::UP,
        KeyCode::Down => ir_code::DOWN,
        KeyCode::Left => ir_code::LEFT,
        KeyCode::Right => ir_code::RIGHT,
        KeyCode::Char('p') => ir_code::PLAY,
        KeyCode::Char('a') => ir_code::ADD,
        KeyCode::Char(ch @ '0'..='9') => ir_code::DIGITS[ch as usize - '0' as usize],
        _ => return None,
    })
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, MouseEvent};

    fn press(code: KeyCode, modifiers: KeyModifiers) -> TermEvent {
        TermEvent::Key(KeyEvent::new(code, modifiers))
    }

    fn release(code: KeyCode) -> TermEvent {
        TermEvent::Key(KeyEvent::new_with_kind(
            code,
            KeyModifiers::NONE,
            KeyEventKind::Release,
        ))
    }

    #[test]
    fn mapped_keys_become_key_transitions() {
        assert_eq!(
            translate(&press(KeyCode::Enter, KeyModifiers::NONE)),
            Some(DriverInput::KeyDown(key::GO))
        );
        assert_eq!(translate(&release(KeyCode::Enter)), Some(DriverInput::KeyUp(key::GO)));
        assert_eq!(
            translate(&press(KeyCode::PageDown, KeyModifiers::NONE)),
            Some(DriverInput::KeyDown(key::PAGE_DOWN))
        );
    }

    #[test]
    fn alt_simulates_ir_frames() {
        assert_eq!(
            translate(&press(KeyCode::Up, KeyModifiers::ALT)),
            Some(DriverInput::IrCode(ir_code::UP))
        );
        assert_eq!(
            translate(&press(KeyCode::Char('7'), KeyModifiers::ALT)),
            Some(DriverInput::IrCode(ir_code::DIGITS[7]))
        );
        // No release frames on an IR wire.
        let rel = TermEvent::Key(KeyEvent::new_with_kind(
            KeyCode::Up,
            KeyModifiers::ALT,
            KeyEventKind::Release,
        ));
        assert_eq!(translate(&rel), None);
    }

    #[test]
    fn unmapped_char_is_text_entry() {
        assert_eq!(
            translate(&press(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(DriverInput::Char('q'))
        );
    }

    #[test]
    fn ctrl_c_quits() {
        match translate(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)) {
            Some(DriverInput::Event(e)) => assert_eq!(e.kind, EventKind::Quit),
            other => panic!("expected quit, got {other:?}"),
        }
    }

    #[test]
    fn wheel_scrolls() {
        let wheel = TermEvent::Mouse(MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        match translate(&wheel) {
            Some(DriverInput::Event(e)) => assert_eq!(e.kind, EventKind::Scroll { rel: 1 }),
            other => panic!("expected scroll, got {other:?}"),
        }
    }

    #[test]
    fn horizontal_scroll_has_no_mapping() {
        let wheel = TermEvent::Mouse(MouseEvent {
            kind: MouseEventKind::ScrollLeft,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(translate(&wheel), None);
    }

    #[test]
    fn resize_passes_through() {
        match translate(&TermEvent::Resize(120, 40)) {
            Some(DriverInput::Event(e)) => {
                assert_eq!(e.kind, EventKind::Resize { w: 120, h: 40 })
            }
            other => panic!("expected resize, got {other:?}"),
        }
    }
}
