/// Input collector.
///
/// Drains every pending terminal event without blocking and keeps them in
/// arrival order, so navigation is applied exactly in the order the user
/// pressed. Press and Repeat both count: holding an arrow keeps stepping,
/// the way a browser's keydown repeats.
///
/// Release events are ignored. Mouse support is limited to left-button
/// presses, which the tour hit-tests against the on-screen controls.

use std::time::Duration;

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Click { col: u16, row: u16 },
    Resize { cols: u16, rows: u16 },
}

/// What the host loop should do with a key before navigation sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetaKey {
    Quit,
    ToggleHelp,
}

pub struct InputState {
    pub events: Vec<InputEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState { events: Vec::with_capacity(8) }
    }

    /// Drain all pending terminal events. Call once per loop iteration.
    pub fn drain_events(&mut self) {
        self.events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(ev) => {
                    if let Some(input) = translate(ev) {
                        self.events.push(input);
                    }
                }
                Err(_) => break,
            }
        }
    }
}

fn translate(ev: Event) -> Option<InputEvent> {
    match ev {
        Event::Key(key) if key.kind != KeyEventKind::Release => Some(InputEvent::Key(key)),
        Event::Mouse(m) if m.kind == MouseEventKind::Down(MouseButton::Left) => {
            Some(InputEvent::Click { col: m.column, row: m.row })
        }
        Event::Resize(cols, rows) => Some(InputEvent::Resize { cols, rows }),
        _ => None,
    }
}

pub fn meta_key(key: &KeyEvent) -> Option<MetaKey> {
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
    {
        return Some(MetaKey::Quit);
    }
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(MetaKey::Quit),
        KeyCode::Char('?') | KeyCode::F(1) => Some(MetaKey::ToggleHelp),
        _ => None,
    }
}

/// Rows to scroll the current page for this key, if it is a scroll key.
pub fn scroll_delta(key: &KeyEvent, page_rows: u16) -> Option<i32> {
    let page = i32::from(page_rows.max(1));
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(-1),
        KeyCode::Down | KeyCode::Char('j') => Some(1),
        KeyCode::PageUp => Some(-page),
        KeyCode::PageDown => Some(page),
        KeyCode::Home => Some(-i32::from(u16::MAX)),
        KeyCode::End => Some(i32::from(u16::MAX)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseEvent};

    fn key(code: KeyCode, kind: KeyEventKind, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent { code, modifiers, kind, state: KeyEventState::NONE }
    }

    #[test]
    fn releases_are_dropped() {
        let k = key(KeyCode::Right, KeyEventKind::Release, KeyModifiers::NONE);
        assert_eq!(translate(Event::Key(k)), None);
        let k = key(KeyCode::Right, KeyEventKind::Repeat, KeyModifiers::NONE);
        assert_eq!(translate(Event::Key(k)), Some(InputEvent::Key(k)));
    }

    #[test]
    fn only_left_presses_become_clicks() {
        let down = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 4,
            row: 9,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(translate(Event::Mouse(down)), Some(InputEvent::Click { col: 4, row: 9 }));
        let right = MouseEvent { kind: MouseEventKind::Down(MouseButton::Right), ..down };
        assert_eq!(translate(Event::Mouse(right)), None);
        assert_eq!(translate(Event::Resize(80, 24)), Some(InputEvent::Resize { cols: 80, rows: 24 }));
    }

    #[test]
    fn meta_keys() {
        let ctrl_c = key(KeyCode::Char('c'), KeyEventKind::Press, KeyModifiers::CONTROL);
        assert_eq!(meta_key(&ctrl_c), Some(MetaKey::Quit));
        let plain_c = key(KeyCode::Char('c'), KeyEventKind::Press, KeyModifiers::NONE);
        assert_eq!(meta_key(&plain_c), None);
        let help = key(KeyCode::Char('?'), KeyEventKind::Press, KeyModifiers::SHIFT);
        assert_eq!(meta_key(&help), Some(MetaKey::ToggleHelp));
        let right = key(KeyCode::Right, KeyEventKind::Press, KeyModifiers::NONE);
        assert_eq!(meta_key(&right), None);
    }

    #[test]
    fn scroll_keys_never_navigate() {
        let down = key(KeyCode::Down, KeyEventKind::Press, KeyModifiers::NONE);
        assert_eq!(scroll_delta(&down, 20), Some(1));
        let pgup = key(KeyCode::PageUp, KeyEventKind::Press, KeyModifiers::NONE);
        assert_eq!(scroll_delta(&pgup, 20), Some(-20));
        let right = key(KeyCode::Right, KeyEventKind::Press, KeyModifiers::NONE);
        assert_eq!(scroll_delta(&right, 20), None);
        assert_eq!(crate::sim::nav::command_for_key(KeyCode::Down), None);
    }
}
