//! Home menu plus the static Features and About sections.

use chrono::Datelike;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;
use raksha_core::session::Action;
use raksha_core::session::Route;

use super::ACCENT;
use crate::key_hint;

const HOME_CHOICES: [(Route, &str); 3] = [
    (Route::Features, "Explore Features"),
    (Route::Dashboard, "Open Dashboard"),
    (Route::About, "About Raksha AI"),
];

const FEATURES: [&str; 5] = [
    "Instant Panic/SOS alerts with live broadcast",
    "Anomaly detection: route deviation, unsafe driving, distress voice",
    "AI explanations and actionable safety guidance",
    "Nearest support recommendations and safe route hints",
    "Real-time WebSocket alerts dashboard",
];

const ABOUT: &str = "Raksha AI is a prototype safety platform showcasing real-time \
alerting via WebSocket and contextual guidance APIs. This console brings the same \
panic, anomaly and escalation flows to the terminal.";

#[derive(Debug, Default)]
pub(crate) struct HomeView {
    selected: usize,
}

impl HomeView {
    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        let len = HOME_CHOICES.len();
        if key_hint::NEXT_FIELD.is_press(key)
            || key_hint::plain(KeyCode::Down).is_press(key)
            || key_hint::plain(KeyCode::Right).is_press(key)
        {
            self.selected = (self.selected + 1) % len;
            None
        } else if key_hint::PREV_FIELD.is_press(key)
            || key_hint::plain(KeyCode::Up).is_press(key)
            || key_hint::plain(KeyCode::Left).is_press(key)
        {
            self.selected = (self.selected + len - 1) % len;
            None
        } else if key_hint::ACTIVATE.is_press(key) {
            HOME_CHOICES
                .get(self.selected)
                .map(|(route, _)| Action::Navigate(*route))
        } else {
            None
        }
    }

    pub(crate) fn render(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::styled("Welcome to Raksha AI", Style::default().fg(ACCENT).bold()),
            Line::from(""),
            Line::from("Choose a section to continue:").dim(),
            Line::from(""),
        ];
        let mut buttons = Vec::new();
        for (i, (_, label)) in HOME_CHOICES.iter().enumerate() {
            let label = format!(" {label} ");
            buttons.push(if i == self.selected {
                Span::styled(label, Style::default().black().bg(ACCENT).bold())
            } else {
                Span::styled(label, Style::default().fg(ACCENT))
            });
            buttons.push(Span::raw("  "));
        }
        lines.push(Line::from(buttons));

        frame.render_widget(Paragraph::new(lines).block(panel("Home")), area);
    }
}

pub(super) fn render_features(frame: &mut Frame, area: Rect) {
    let lines: Vec<Line> = FEATURES
        .iter()
        .map(|f| Line::from(vec![Span::styled("• ", Style::default().fg(ACCENT)), Span::raw(*f)]))
        .collect();
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(panel("Features")),
        area,
    );
}

pub(super) fn render_about(frame: &mut Frame, area: Rect) {
    let year = chrono::Local::now().year();
    let lines = vec![
        Line::from(ABOUT),
        Line::from(""),
        Line::from(format!("© {year} Raksha AI")).dim(),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(panel("About Raksha AI")),
        area,
    );
}

pub(super) fn panel(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT))
        .title(Span::styled(format!(" {title} "), Style::default().fg(ACCENT).bold()))
}
