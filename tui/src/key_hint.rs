//! Key bindings and the footer hints that describe them.

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use ratatui::style::Style;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::text::Span;

const CTRL_PREFIX: &str = "ctrl + ";
const SHIFT_PREFIX: &str = "shift + ";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct KeyBinding {
    key: KeyCode,
    modifiers: KeyModifiers,
}

impl KeyBinding {
    pub(crate) const fn new(key: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { key, modifiers }
    }

    /// Press or repeat of exactly this key and modifier set.
    pub(crate) fn is_press(&self, event: KeyEvent) -> bool {
        self.key == event.code
            && self.modifiers == event.modifiers
            && matches!(event.kind, KeyEventKind::Press | KeyEventKind::Repeat)
    }
}

pub(crate) const fn plain(key: KeyCode) -> KeyBinding {
    KeyBinding::new(key, KeyModifiers::NONE)
}

pub(crate) const fn ctrl(key: KeyCode) -> KeyBinding {
    KeyBinding::new(key, KeyModifiers::CONTROL)
}

pub(crate) const fn shift(key: KeyCode) -> KeyBinding {
    KeyBinding::new(key, KeyModifiers::SHIFT)
}

pub(crate) const QUIT: KeyBinding = ctrl(KeyCode::Char('c'));
pub(crate) const LOGOUT: KeyBinding = ctrl(KeyCode::Char('l'));
pub(crate) const PANIC: KeyBinding = ctrl(KeyCode::Char('p'));
pub(crate) const NEXT_FIELD: KeyBinding = plain(KeyCode::Tab);
pub(crate) const PREV_FIELD: KeyBinding = shift(KeyCode::BackTab);
pub(crate) const ACTIVATE: KeyBinding = plain(KeyCode::Enter);
pub(crate) const BACK: KeyBinding = plain(KeyCode::Esc);
pub(crate) const GO_HOME: KeyBinding = plain(KeyCode::F(1));
pub(crate) const GO_FEATURES: KeyBinding = plain(KeyCode::F(2));
pub(crate) const GO_DASHBOARD: KeyBinding = plain(KeyCode::F(3));
pub(crate) const GO_ABOUT: KeyBinding = plain(KeyCode::F(4));

fn modifiers_to_string(modifiers: KeyModifiers) -> String {
    let mut result = String::new();
    if modifiers.contains(KeyModifiers::CONTROL) {
        result.push_str(CTRL_PREFIX);
    }
    if modifiers.contains(KeyModifiers::SHIFT) {
        result.push_str(SHIFT_PREFIX);
    }
    result
}

impl From<KeyBinding> for Span<'static> {
    fn from(binding: KeyBinding) -> Self {
        let KeyBinding { key, modifiers } = binding;
        let modifiers = modifiers_to_string(modifiers);
        let key = match key {
            KeyCode::Enter => "enter".to_string(),
            KeyCode::Esc => "esc".to_string(),
            KeyCode::Tab => "tab".to_string(),
            KeyCode::BackTab => "tab".to_string(),
            KeyCode::Up => "↑".to_string(),
            KeyCode::Down => "↓".to_string(),
            KeyCode::Left => "←".to_string(),
            KeyCode::Right => "→".to_string(),
            _ => format!("{key}").to_ascii_lowercase(),
        };
        Span::styled(format!("{modifiers}{key}"), Style::default().cyan())
    }
}

/// `key label · key label · ...`
pub(crate) fn hint_line(hints: &[(KeyBinding, &'static str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (i, (binding, label)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::from(" · ").dim());
        }
        spans.push(Span::from(*binding));
        spans.push(Span::from(format!(" {label}")).dim());
    }
    Line::from(spans)
}
