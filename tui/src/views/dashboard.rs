use crossterm::event::KeyCode;
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
use ratatui::widgets::Wrap;
use raksha_core::session::Action;
use raksha_core::session::DraftField;
use raksha_core::session::LiveFeedStatus;
use raksha_core::session::SessionState;
use strum_macros::EnumIter;

use super::ACCENT;
use super::cycle;
use super::edit_text;
use super::landing::panel;
use crate::key_hint;

/// Focusable controls, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter)]
pub(crate) enum Control {
    #[default]
    PanicUserId,
    SendPanic,
    Voice,
    AnomalyType,
    SendAnomaly,
    Explain,
    EscalationContacts,
    EscalationAnomaly,
    EscalationLevel,
    SendEscalation,
    RiskLevel,
    Guidance,
}

#[derive(Debug, Default)]
pub(crate) struct DashboardView {
    focus: Control,
}

impl DashboardView {
    pub(crate) fn handle_key(&mut self, state: &SessionState, key: KeyEvent) -> Option<Action> {
        if key_hint::PANIC.is_press(key) {
            return Some(Action::SendPanic);
        }
        if key_hint::NEXT_FIELD.is_press(key) || key_hint::plain(KeyCode::Down).is_press(key) {
            self.focus = cycle(self.focus, true);
            return None;
        }
        if key_hint::PREV_FIELD.is_press(key) || key_hint::plain(KeyCode::Up).is_press(key) {
            self.focus = cycle(self.focus, false);
            return None;
        }

        let left = key_hint::plain(KeyCode::Left).is_press(key);
        let right = key_hint::plain(KeyCode::Right).is_press(key);
        if left || right {
            return self.select(state, right);
        }

        if key_hint::ACTIVATE.is_press(key) {
            return match self.focus {
                Control::SendPanic => Some(Action::SendPanic),
                Control::Voice => Some(Action::ToggleVoice),
                Control::SendAnomaly => Some(Action::SendAnomaly),
                Control::Explain => Some(Action::FetchExplanation),
                Control::SendEscalation => Some(Action::SendEscalation),
                Control::Guidance => Some(Action::FetchGuidance),
                Control::PanicUserId
                | Control::AnomalyType
                | Control::EscalationContacts
                | Control::EscalationAnomaly
                | Control::EscalationLevel
                | Control::RiskLevel => {
                    self.focus = cycle(self.focus, true);
                    None
                }
            };
        }

        let (field, current) = match self.focus {
            Control::PanicUserId => (DraftField::PanicUserId, &state.panic_draft().user_id),
            Control::EscalationContacts => (
                DraftField::EscalationContacts,
                &state.escalation_draft().contacts,
            ),
            _ => return None,
        };
        edit_text(current, key).map(|value| Action::EditField(field, value))
    }

    fn select(&self, state: &SessionState, forward: bool) -> Option<Action> {
        match self.focus {
            Control::AnomalyType => Some(Action::SelectAnomalyType(cycle(
                state.anomaly_draft().anomaly_type,
                forward,
            ))),
            Control::EscalationAnomaly => Some(Action::SelectEscalationAnomaly(cycle(
                state.escalation_draft().anomaly_type,
                forward,
            ))),
            Control::EscalationLevel => Some(Action::SelectEscalationLevel(cycle(
                state.escalation_draft().escalation_level,
                forward,
            ))),
            Control::RiskLevel => Some(Action::SelectRiskLevel(cycle(
                state.risk_level(),
                forward,
            ))),
            _ => None,
        }
    }

    pub(crate) fn render(&self, frame: &mut Frame, area: Rect, state: &SessionState) {
        let [forms, info, live] = Layout::vertical([
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Min(5),
        ])
        .areas(area);
        let [panic_area, anomaly_area, escalation_area] =
            Layout::horizontal([Constraint::Ratio(1, 3); 3]).areas(forms);
        let [explain_area, guidance_area] =
            Layout::horizontal([Constraint::Ratio(1, 2); 2]).areas(info);

        self.render_panic(frame, panic_area, state);
        self.render_anomaly(frame, anomaly_area, state);
        self.render_escalation(frame, escalation_area, state);
        self.render_explanation(frame, explain_area, state);
        self.render_guidance(frame, guidance_area, state);
        render_live_alerts(frame, live, state);
    }

    fn render_panic(&self, frame: &mut Frame, area: Rect, state: &SessionState) {
        let draft = state.panic_draft();
        let voice = if state.is_voice_listening() {
            "Stop Voice Trigger"
        } else {
            "Start Voice Trigger"
        };
        let mut lines = vec![
            self.text_field(Control::PanicUserId, "User ID", &draft.user_id),
            detail("Vehicle", &draft.vehicle_id),
            detail("Location", &draft.location),
            Line::from(""),
            self.button(Control::SendPanic, "SEND PANIC ALERT"),
            self.button(Control::Voice, voice),
        ];
        if state.is_voice_listening() {
            lines.push(Line::from(Span::styled(
                "● listening",
                Style::default().fg(Color::Red),
            )));
        }
        frame.render_widget(
            Paragraph::new(lines).block(panel("Trigger Panic Alert")),
            area,
        );
    }

    fn render_anomaly(&self, frame: &mut Frame, area: Rect, state: &SessionState) {
        let draft = state.anomaly_draft();
        let lines = vec![
            self.select_field(Control::AnomalyType, "Type", draft.anomaly_type.label()),
            detail("Vehicle", &draft.vehicle_id),
            detail("Location", &draft.current_location),
            Line::from(""),
            self.button(Control::SendAnomaly, "Send Anomaly"),
            self.button(Control::Explain, "Get Explanation"),
        ];
        frame.render_widget(
            Paragraph::new(lines).block(panel("Send Anomaly Alert")),
            area,
        );
    }

    fn render_escalation(&self, frame: &mut Frame, area: Rect, state: &SessionState) {
        let draft = state.escalation_draft();
        let lines = vec![
            self.text_field(
                Control::EscalationContacts,
                "Contacts (comma separated)",
                &draft.contacts,
            ),
            self.select_field(
                Control::EscalationAnomaly,
                "Anomaly",
                draft.anomaly_type.label(),
            ),
            self.select_field(
                Control::EscalationLevel,
                "Level",
                draft.escalation_level.label(),
            ),
            Line::from(""),
            self.button(Control::SendEscalation, "Send Escalation"),
        ];
        frame.render_widget(
            Paragraph::new(lines).block(panel("Send Escalation Alert")),
            area,
        );
    }

    fn render_explanation(&self, frame: &mut Frame, area: Rect, state: &SessionState) {
        let body = match state.explanation() {
            Some(text) => Line::from(text.to_string()),
            None => Line::from("Select an anomaly type and press Get Explanation.").dim(),
        };
        frame.render_widget(
            Paragraph::new(vec![body])
                .wrap(Wrap { trim: true })
                .block(panel("AI Explanation")),
            area,
        );
    }

    fn render_guidance(&self, frame: &mut Frame, area: Rect, state: &SessionState) {
        let mut lines = vec![
            self.select_field(Control::RiskLevel, "Risk", state.risk_level().label()),
            self.button(Control::Guidance, "Get Guidance"),
            Line::from(""),
        ];
        match state.guidance() {
            Some(guidance) => {
                lines.push(Line::from(guidance.guidance.clone()));
                if !guidance.safe_route.is_empty() {
                    lines.push(Line::from("Safe Route Coordinates:").bold());
                    for point in &guidance.safe_route {
                        lines.push(Line::from(format!("  {point}")));
                    }
                }
            }
            None => lines.push(Line::from("No guidance fetched yet.").dim()),
        }
        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .block(panel("Safety Guidance")),
            area,
        );
    }

    fn focus_marker(&self, control: Control) -> Span<'static> {
        if self.focus == control {
            Span::styled("› ", Style::default().fg(ACCENT).bold())
        } else {
            Span::raw("  ")
        }
    }

    fn text_field(&self, control: Control, label: &str, value: &str) -> Line<'static> {
        let mut spans = vec![
            self.focus_marker(control),
            Span::styled(format!("{label}: "), Style::default().dim()),
            Span::raw(value.to_string()),
        ];
        if self.focus == control {
            spans.push(Span::styled("_", Style::default().fg(Color::Gray)));
        }
        Line::from(spans)
    }

    fn select_field(&self, control: Control, label: &str, value: &str) -> Line<'static> {
        Line::from(vec![
            self.focus_marker(control),
            Span::styled(format!("{label}: "), Style::default().dim()),
            Span::styled(format!("‹ {value} ›"), Style::default().fg(ACCENT)),
        ])
    }

    fn button(&self, control: Control, label: &str) -> Line<'static> {
        let text = format!("[ {label} ]");
        let style = if self.focus == control {
            Style::default().black().bg(ACCENT).bold()
        } else {
            Style::default().fg(ACCENT)
        };
        Line::from(vec![self.focus_marker(control), Span::styled(text, style)])
    }
}

fn detail(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{label}: "), Style::default().dim()),
        Span::raw(value.to_string()),
    ])
}

fn render_live_alerts(frame: &mut Frame, area: Rect, state: &SessionState) {
    let badge = match state.live_status() {
        LiveFeedStatus::Live => Span::styled(" Live ", Style::default().black().bg(Color::Green)),
        LiveFeedStatus::Connecting => Span::styled(" Connecting ", Style::default().black().bg(Color::Yellow)),
        LiveFeedStatus::Offline => Span::styled(" Offline ", Style::default().white().bg(Color::Red)),
        LiveFeedStatus::Idle => Span::raw(""),
    };
    let mut lines = vec![Line::from(badge), Line::from("")];

    let alerts = state.alerts();
    if alerts.is_empty() {
        lines.push(Line::from("Waiting for incoming alerts...").dim());
    }
    for alert in alerts.iter() {
        lines.push(Line::from(Span::styled(
            alert.message.clone(),
            Style::default().bold(),
        )));
        lines.push(Line::from(vec![
            Span::styled("  Vehicle: ", Style::default().dim()),
            Span::raw(alert.vehicle_display()),
            Span::styled(" | Location: ", Style::default().dim()),
            Span::raw(alert.location_display()),
        ]));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(panel("Live Alerts Dashboard")),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::Views;
    use crate::views::test_support::render_to_string;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use raksha_core::session::AuthField;
    use raksha_core::session::Route;
    use raksha_core::session::SessionSettings;
    use raksha_protocol::Alert;
    use raksha_protocol::AnomalyType;
    use raksha_protocol::Guidance;
    use raksha_protocol::RiskLevel;
    use raksha_protocol::RoutePoint;
    use serde_json::json;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn dashboard_state() -> SessionState {
        let (state, _) = SessionState::boot(SessionSettings::default());
        [
            Action::SplashElapsed,
            Action::EditAuthField(AuthField::Email, "a@x.com".into()),
            Action::EditAuthField(AuthField::Password, "pw".into()),
            Action::SubmitAuth,
            Action::Navigate(Route::Dashboard),
        ]
        .into_iter()
        .fold(state, |state, action| state.reduce(action).0)
    }

    #[test]
    fn typing_into_the_user_id_edits_the_panic_draft() {
        let state = dashboard_state();
        let mut view = DashboardView::default();
        assert_eq!(
            view.handle_key(&state, key(KeyCode::Char('a'))),
            Some(Action::EditField(DraftField::PanicUserId, "a".to_string()))
        );
    }

    #[test]
    fn enter_on_buttons_sends() {
        let state = dashboard_state();
        let mut view = DashboardView::default();
        view.handle_key(&state, key(KeyCode::Tab));
        assert_eq!(view.handle_key(&state, key(KeyCode::Enter)), Some(Action::SendPanic));
        view.handle_key(&state, key(KeyCode::Tab));
        assert_eq!(view.handle_key(&state, key(KeyCode::Enter)), Some(Action::ToggleVoice));
    }

    #[test]
    fn arrows_cycle_select_fields() {
        let state = dashboard_state();
        let mut view = DashboardView {
            focus: Control::AnomalyType,
        };
        assert_eq!(
            view.handle_key(&state, key(KeyCode::Right)),
            Some(Action::SelectAnomalyType(AnomalyType::UnsafeDriving))
        );
        view.focus = Control::RiskLevel;
        assert_eq!(
            view.handle_key(&state, key(KeyCode::Left)),
            Some(Action::SelectRiskLevel(RiskLevel::Low))
        );
    }

    #[test]
    fn panic_hotkey_works_from_any_control() {
        let state = dashboard_state();
        let mut view = DashboardView {
            focus: Control::EscalationContacts,
        };
        let hotkey = KeyEvent::new(KeyCode::Char('p'), KeyModifiers::CONTROL);
        assert_eq!(view.handle_key(&state, hotkey), Some(Action::SendPanic));
    }

    #[test]
    fn renders_alerts_newest_first_with_json_locations() {
        let state = dashboard_state();
        let id = state.live_subscription().unwrap();
        let state = ["first", "second"].into_iter().fold(state, |state, m| {
            state
                .reduce(Action::AlertReceived {
                    subscription: id,
                    alert: Alert {
                        message: m.to_string(),
                        vehicle_id: json!(17),
                        location: json!("Gate 2"),
                    },
                })
                .0
        });

        let screen = render_to_string(&state, &Views::default(), 140, 40);
        let second = screen.find("second").unwrap();
        let first = screen.find("first").unwrap();
        assert!(second < first, "{screen}");
        assert!(screen.contains("Vehicle: 17 | Location: Gate 2"), "{screen}");
    }

    #[test]
    fn renders_guidance_route_points() {
        let state = dashboard_state().reduce(Action::GuidanceLoaded(Guidance {
            guidance: "Stay near the driver.".to_string(),
            safe_route: vec![RoutePoint {
                lat: 28.61394,
                lng: 77.20902,
            }],
        }));
        let screen = render_to_string(&state.0, &Views::default(), 140, 40);
        assert!(screen.contains("Stay near the driver."), "{screen}");
        assert!(screen.contains("Lat: 28.6139, Lng: 77.2090"), "{screen}");
    }

    #[test]
    fn empty_feed_shows_waiting_message() {
        let screen = render_to_string(&dashboard_state(), &Views::default(), 140, 40);
        assert!(screen.contains("Waiting for incoming alerts..."), "{screen}");
        assert!(screen.contains("Connecting"), "{screen}");
    }
}
