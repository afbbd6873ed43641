//! Screens. Each one renders from a [`SessionState`] and turns key presses
//! into session actions; none of them mutate the session directly.

mod auth;
mod dashboard;
mod landing;
mod notice;
mod splash;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Constraint;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use raksha_core::session::Action;
use raksha_core::session::Phase;
use raksha_core::session::Route;
use raksha_core::session::SessionState;
use strum::IntoEnumIterator;

pub(crate) use auth::AuthView;
pub(crate) use dashboard::DashboardView;
pub(crate) use landing::HomeView;

use crate::key_hint;

pub(crate) const ACCENT: Color = Color::Magenta;

/// Per-screen cursor state. Lives outside the session because it only
/// matters to this front-end.
#[derive(Debug, Default)]
pub(crate) struct Views {
    pub(crate) auth: AuthView,
    pub(crate) home: HomeView,
    pub(crate) dashboard: DashboardView,
}

impl Views {
    /// Route a key press to whatever is on screen. Global keys (quit,
    /// notice dismissal) are handled by the caller.
    pub(crate) fn handle_key(&mut self, state: &SessionState, key: KeyEvent) -> Option<Action> {
        match state.phase() {
            Phase::Splash => splash::handle_key(key),
            Phase::Auth => self.auth.handle_key(state.auth(), key),
            Phase::App => {
                if let Some(action) = navigation_key(state.route(), key) {
                    return Some(action);
                }
                match state.route() {
                    Route::Home => self.home.handle_key(key),
                    Route::Features | Route::About => None,
                    Route::Dashboard => self.dashboard.handle_key(state, key),
                }
            }
        }
    }
}

fn navigation_key(current: Route, key: KeyEvent) -> Option<Action> {
    if key_hint::LOGOUT.is_press(key) {
        return Some(Action::Logout);
    }
    let target = if key_hint::GO_HOME.is_press(key) {
        Route::Home
    } else if key_hint::GO_FEATURES.is_press(key) {
        Route::Features
    } else if key_hint::GO_DASHBOARD.is_press(key) {
        Route::Dashboard
    } else if key_hint::GO_ABOUT.is_press(key) {
        Route::About
    } else if key_hint::BACK.is_press(key) && current != Route::Home {
        Route::Home
    } else {
        return None;
    };
    Some(Action::Navigate(target))
}

pub(crate) fn render(frame: &mut Frame, state: &SessionState, views: &Views) {
    let area = frame.area();
    match state.phase() {
        Phase::Splash => splash::render(frame, area),
        Phase::Auth => views.auth.render(frame, area, state.auth()),
        Phase::App => {
            let [nav, body, footer] = Layout::vertical([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .areas(area);
            render_nav(frame, nav, state.route());
            match state.route() {
                Route::Home => views.home.render(frame, body),
                Route::Features => landing::render_features(frame, body),
                Route::About => landing::render_about(frame, body),
                Route::Dashboard => views.dashboard.render(frame, body, state),
            }
            frame.render_widget(Paragraph::new(footer_hints(state.route())), footer);
        }
    }

    if let Some(notice) = state.notice() {
        notice::render(frame, area, notice);
    }
}

fn render_nav(frame: &mut Frame, area: Rect, current: Route) {
    let mut spans = vec![Span::styled(" Raksha AI ", Style::default().fg(ACCENT).bold())];
    for route in Route::iter() {
        spans.push(Span::raw("  "));
        let label = format!(" {route} ");
        if route == current {
            spans.push(Span::styled(label, Style::default().black().bg(ACCENT).bold()));
        } else {
            spans.push(Span::raw(label));
        }
    }
    spans.push(Span::raw("  "));
    spans.push(Span::from(key_hint::LOGOUT));
    spans.push(Span::from(" logout").dim());
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn footer_hints(route: Route) -> Line<'static> {
    match route {
        Route::Home => key_hint::hint_line(&[
            (key_hint::NEXT_FIELD, "next"),
            (key_hint::ACTIVATE, "open"),
            (key_hint::GO_DASHBOARD, "dashboard"),
            (key_hint::QUIT, "quit"),
        ]),
        Route::Dashboard => key_hint::hint_line(&[
            (key_hint::NEXT_FIELD, "next"),
            (key_hint::PREV_FIELD, "prev"),
            (key_hint::ACTIVATE, "activate"),
            (key_hint::PANIC, "panic"),
            (key_hint::BACK, "home"),
            (key_hint::QUIT, "quit"),
        ]),
        Route::Features | Route::About => key_hint::hint_line(&[
            (key_hint::BACK, "home"),
            (key_hint::GO_DASHBOARD, "dashboard"),
            (key_hint::QUIT, "quit"),
        ]),
    }
}

/// Next (or previous) variant of a select field, wrapping around.
pub(crate) fn cycle<T>(current: T, forward: bool) -> T
where
    T: IntoEnumIterator + PartialEq + Copy,
{
    let all: Vec<T> = T::iter().collect();
    let Some(pos) = all.iter().position(|v| *v == current) else {
        return current;
    };
    let len = all.len();
    let next = if forward {
        (pos + 1) % len
    } else {
        (pos + len - 1) % len
    };
    all[next]
}

/// Append `c` to a text value, or drop its last character.
pub(crate) fn edit_text(current: &str, key: KeyEvent) -> Option<String> {
    use crossterm::event::KeyCode;
    use crossterm::event::KeyModifiers;

    if !matches!(
        key.kind,
        crossterm::event::KeyEventKind::Press | crossterm::event::KeyEventKind::Repeat
    ) {
        return None;
    }
    match key.code {
        KeyCode::Char(c)
            if !key.modifiers.contains(KeyModifiers::CONTROL)
                && !key.modifiers.contains(KeyModifiers::ALT) =>
        {
            let mut value = current.to_string();
            value.push(c);
            Some(value)
        }
        KeyCode::Backspace => {
            let mut value = current.to_string();
            value.pop()?;
            Some(value)
        }
        _ => None,
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use raksha_protocol::RiskLevel;

    #[test]
    fn cycle_wraps_both_ways() {
        assert_eq!(cycle(RiskLevel::High, true), RiskLevel::Low);
        assert_eq!(cycle(RiskLevel::Low, false), RiskLevel::High);
        assert_eq!(cycle(RiskLevel::Low, true), RiskLevel::Medium);
    }

    #[test]
    fn edit_text_appends_and_deletes() {
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(edit_text("as", key(KeyCode::Char('h'))), Some("ash".to_string()));
        assert_eq!(edit_text("ash", key(KeyCode::Backspace)), Some("as".to_string()));
        assert_eq!(edit_text("", key(KeyCode::Backspace)), None);
        assert_eq!(edit_text("a", key(KeyCode::Enter)), None);
        assert_eq!(
            edit_text("a", KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn escape_returns_home_from_sections() {
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(
            navigation_key(Route::About, esc),
            Some(Action::Navigate(Route::Home))
        );
        assert_eq!(navigation_key(Route::Home, esc), None);
    }
}
