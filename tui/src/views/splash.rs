use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::layout::Constraint;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use raksha_core::session::Action;

use super::ACCENT;

/// The splash only ends on its timer; keys are ignored until then.
pub(super) fn handle_key(_key: KeyEvent) -> Option<Action> {
    None
}

pub(super) fn render(frame: &mut Frame, area: Rect) {
    let [_, center, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Fill(1),
    ])
    .areas(area);

    let lines = vec![
        Line::styled("Raksha AI", Style::default().fg(ACCENT).bold()),
        Line::from(""),
        Line::from("Safety for every ride").italic(),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), center);
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;
    use crossterm::event::KeyEvent;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use raksha_core::session::Phase;
    use raksha_core::session::SessionSettings;
    use raksha_core::session::SessionState;

    use crate::views::Views;
    use crate::views::test_support::render_to_string;

    #[test]
    fn key_presses_do_not_skip_the_splash() {
        let (state, _) = SessionState::boot(SessionSettings::default());
        let mut views = Views::default();
        for code in [KeyCode::Char('x'), KeyCode::Enter, KeyCode::Esc] {
            let action = views.handle_key(&state, KeyEvent::new(code, KeyModifiers::NONE));
            assert_eq!(action, None);
        }
        assert_eq!(state.phase(), Phase::Splash);

        let screen = render_to_string(&state, &views, 80, 20);
        assert!(screen.contains("Raksha AI"), "{screen}");
        assert!(!screen.contains("press any key"), "{screen}");
    }
}
