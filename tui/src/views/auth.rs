use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Constraint;
use ratatui::layout::Flex;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;
use raksha_core::session::Action;
use raksha_core::session::AuthField;
use raksha_core::session::AuthForm;
use raksha_core::session::AuthMode;

use super::ACCENT;
use super::edit_text;
use crate::key_hint;

/// Which row of the form has the cursor. Rows are the mode's fields followed
/// by the submit button.
#[derive(Debug, Default)]
pub(crate) struct AuthView {
    focus: usize,
}

impl AuthView {
    fn focused_field(&self, form: &AuthForm) -> Option<AuthField> {
        form.mode.fields().get(self.focus).copied()
    }

    fn rows(form: &AuthForm) -> usize {
        form.mode.fields().len() + 1
    }

    pub(crate) fn handle_key(&mut self, form: &AuthForm, key: KeyEvent) -> Option<Action> {
        self.focus = self.focus.min(Self::rows(form) - 1);

        if key_hint::NEXT_FIELD.is_press(key) || key_hint::plain(KeyCode::Down).is_press(key) {
            self.focus = (self.focus + 1) % Self::rows(form);
            return None;
        }
        if key_hint::PREV_FIELD.is_press(key) || key_hint::plain(KeyCode::Up).is_press(key) {
            self.focus = (self.focus + Self::rows(form) - 1) % Self::rows(form);
            return None;
        }
        if key_hint::plain(KeyCode::Left).is_press(key) {
            self.focus = 0;
            return Some(Action::SetAuthMode(AuthMode::Login));
        }
        if key_hint::plain(KeyCode::Right).is_press(key) {
            self.focus = 0;
            return Some(Action::SetAuthMode(AuthMode::Signup));
        }
        if key_hint::ACTIVATE.is_press(key) {
            return Some(Action::SubmitAuth);
        }

        let field = self.focused_field(form)?;
        edit_text(form.value(field), key).map(|value| Action::EditAuthField(field, value))
    }

    pub(crate) fn render(&self, frame: &mut Frame, area: Rect, form: &AuthForm) {
        let fields = form.mode.fields();
        let height = fields.len() as u16 * 2 + 8;
        let [area] = Layout::horizontal([Constraint::Length(56)])
            .flex(Flex::Center)
            .areas(area);
        let [area] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(ACCENT))
            .title(Span::styled(
                format!(" {} ", form.mode.title()),
                Style::default().fg(ACCENT).bold(),
            ));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let tab = |mode: AuthMode, label: &'static str| {
            if form.mode == mode {
                Span::styled(format!(" {label} "), Style::default().black().bg(ACCENT).bold())
            } else {
                Span::raw(format!(" {label} "))
            }
        };
        let mut lines = vec![
            Line::from(vec![
                tab(AuthMode::Login, "Login"),
                Span::raw("  "),
                tab(AuthMode::Signup, "Sign Up"),
            ]),
            Line::from(""),
        ];

        let focus = self.focus.min(fields.len());
        for (i, field) in fields.iter().enumerate() {
            let value = form.value(*field);
            let shown = match field {
                AuthField::Password => "•".repeat(value.chars().count()),
                AuthField::Name | AuthField::Email => value.to_string(),
            };
            let marker = if i == focus { "› " } else { "  " };
            lines.push(Line::from(vec![
                Span::styled(marker, Style::default().fg(ACCENT)),
                Span::styled(format!("{}: ", field.label()), Style::default().dim()),
                Span::raw(shown),
                if i == focus {
                    Span::styled("_", Style::default().fg(Color::Gray))
                } else {
                    Span::raw("")
                },
            ]));
            lines.push(Line::from(""));
        }

        let submit = format!("[ {} ]", form.mode.submit_label());
        lines.push(if focus == fields.len() {
            Line::from(Span::styled(submit, Style::default().black().bg(ACCENT).bold()))
        } else {
            Line::from(Span::styled(submit, Style::default().fg(ACCENT)))
        });

        if let Some(hint) = &form.hint {
            lines.push(Line::from(Span::styled(
                hint.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(""));
        }
        lines.push(key_hint::hint_line(&[
            (key_hint::NEXT_FIELD, "next"),
            (key_hint::plain(KeyCode::Left), "login"),
            (key_hint::plain(KeyCode::Right), "sign up"),
            (key_hint::ACTIVATE, "submit"),
        ]));

        frame.render_widget(Paragraph::new(lines), inner);
    }
}
