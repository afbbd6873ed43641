#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;
use std::time::Instant;

use pretty_assertions::assert_eq;
use raksha_core::AlertRetention;
use raksha_core::session::Action;
use raksha_core::session::AuthField;
use raksha_core::session::AuthMode;
use raksha_core::session::DraftField;
use raksha_core::session::Effect;
use raksha_core::session::LiveFeedStatus;
use raksha_core::session::Notice;
use raksha_core::session::Phase;
use raksha_core::session::RequestKind;
use raksha_core::session::Route;
use raksha_core::session::SessionSettings;
use raksha_core::session::SessionState;
use raksha_core::session::SubscriptionId;
use raksha_core::session::VOICE_UNAVAILABLE_MESSAGE;
use raksha_core::voice::VoiceTrigger;
use raksha_protocol::Alert;
use raksha_protocol::EscalationLevel;
use raksha_protocol::PanicDraft;
use serde_json::json;

/// Applies `actions` in order and collects every effect.
fn run(state: SessionState, actions: Vec<Action>) -> (SessionState, Vec<Effect>) {
    actions
        .into_iter()
        .fold((state, Vec::new()), |(state, mut all), action| {
            let (next, effects) = state.reduce(action);
            all.extend(effects);
            (next, all)
        })
}

fn signed_in(settings: SessionSettings) -> SessionState {
    let (state, _) = SessionState::boot(settings);
    let (state, _) = run(
        state,
        vec![
            Action::SplashElapsed,
            Action::SetAuthMode(AuthMode::Signup),
            Action::EditAuthField(AuthField::Name, "Asha".into()),
            Action::EditAuthField(AuthField::Email, "asha@example.com".into()),
            Action::EditAuthField(AuthField::Password, "secret".into()),
            Action::SubmitAuth,
        ],
    );
    assert_eq!(state.phase(), Phase::App);
    state
}

fn on_dashboard(settings: SessionSettings) -> (SessionState, SubscriptionId) {
    let (state, effects) = signed_in(settings).reduce(Action::Navigate(Route::Dashboard));
    let id = state.live_subscription().expect("dashboard opens the feed");
    assert_eq!(effects, vec![Effect::OpenLiveFeed(id)]);
    (state, id)
}

fn with_voice() -> SessionSettings {
    SessionSettings {
        voice_available: true,
        ..SessionSettings::default()
    }
}

fn alert(message: &str) -> Alert {
    Alert {
        message: message.to_string(),
        vehicle_id: json!("Bus #17"),
        location: json!({"lat": 28.6, "lng": 77.2}),
    }
}

fn messages(state: &SessionState) -> Vec<String> {
    state.alerts().iter().map(|a| a.message.clone()).collect()
}

#[test]
fn complete_sign_in_lands_on_home() {
    let state = signed_in(SessionSettings::default());
    assert_eq!(state.route(), Route::Home);
    assert_eq!(state.notice(), None);
}

#[test]
fn logout_returns_to_auth_and_releases_the_dashboard() {
    let (state, id) = on_dashboard(with_voice());
    let (state, _) = state.reduce(Action::ToggleVoice);
    let listener = state.voice_listener().unwrap();

    let (state, effects) = state.reduce(Action::Logout);

    assert_eq!(state.phase(), Phase::Auth);
    assert_eq!(
        effects,
        vec![Effect::CloseLiveFeed(id), Effect::StopVoice(listener)]
    );
    assert!(!state.is_voice_listening());
    assert_eq!(state.live_subscription(), None);
}

#[test]
fn navigating_to_the_current_route_is_a_no_op() {
    let (state, id) = on_dashboard(SessionSettings::default());
    let (state, effects) = state.reduce(Action::Navigate(Route::Dashboard));
    assert!(effects.is_empty());
    assert_eq!(state.live_subscription(), Some(id));
}

#[test]
fn navigation_is_ignored_before_sign_in() {
    let (state, _) = SessionState::boot(SessionSettings::default());
    let (state, effects) = state.reduce(Action::Navigate(Route::Dashboard));
    assert_eq!(state.phase(), Phase::Splash);
    assert!(effects.is_empty());
}

#[test]
fn live_alerts_are_prepended_in_arrival_order() {
    let (state, id) = on_dashboard(SessionSettings::default());
    let (state, _) = run(
        state,
        vec![
            Action::LiveFeedConnected(id),
            Action::AlertReceived {
                subscription: id,
                alert: alert("M1"),
            },
            Action::AlertReceived {
                subscription: id,
                alert: alert("M2"),
            },
            Action::AlertReceived {
                subscription: id,
                alert: alert("M3"),
            },
        ],
    );

    assert_eq!(state.live_status(), LiveFeedStatus::Live);
    assert_eq!(messages(&state), vec!["M3", "M2", "M1"]);
    let newest = state.alerts().iter().next().unwrap();
    assert_eq!(newest.location_display(), r#"{"lat":28.6,"lng":77.2}"#);
}

#[test]
fn alerts_after_leaving_the_dashboard_are_dropped() {
    let (state, id) = on_dashboard(SessionSettings::default());
    let (state, effects) = state.reduce(Action::Navigate(Route::About));
    assert_eq!(effects, vec![Effect::CloseLiveFeed(id)]);

    let (state, _) = state.reduce(Action::AlertReceived {
        subscription: id,
        alert: alert("late"),
    });
    assert!(state.alerts().is_empty());
}

#[test]
fn leaving_the_dashboard_while_listening_stops_voice() {
    let (state, id) = on_dashboard(with_voice());
    let (state, _) = state.reduce(Action::ToggleVoice);
    let listener = state.voice_listener().unwrap();

    let (state, effects) = state.reduce(Action::Navigate(Route::Home));

    assert_eq!(state.phase(), Phase::App);
    assert_eq!(state.route(), Route::Home);
    assert_eq!(
        effects,
        vec![Effect::CloseLiveFeed(id), Effect::StopVoice(listener)]
    );
    assert!(!state.is_voice_listening());
    assert_eq!(state.live_subscription(), None);

    let (state, effects) = state.reduce(Action::VoiceResults {
        listener,
        results: vec!["help".to_string()],
        at: Instant::now(),
    });
    assert!(effects.is_empty());
    assert!(!state.is_voice_listening());
}

#[test]
fn whitespace_password_still_signs_in() {
    let (state, _) = SessionState::boot(SessionSettings::default());
    let (state, _) = run(
        state,
        vec![
            Action::SplashElapsed,
            Action::EditAuthField(AuthField::Email, "a@x.com".into()),
            Action::EditAuthField(AuthField::Password, "   ".into()),
            Action::SubmitAuth,
        ],
    );
    assert_eq!(state.phase(), Phase::App);
    assert_eq!(state.route(), Route::Home);
}

#[test]
fn revisiting_the_dashboard_uses_a_fresh_subscription() {
    let (state, first) = on_dashboard(SessionSettings::default());
    let (state, _) = run(
        state,
        vec![
            Action::Navigate(Route::Home),
            Action::Navigate(Route::Dashboard),
        ],
    );
    let second = state.live_subscription().unwrap();
    assert_ne!(first, second);

    let (state, _) = run(
        state,
        vec![
            Action::AlertReceived {
                subscription: first,
                alert: alert("stale"),
            },
            Action::AlertReceived {
                subscription: second,
                alert: alert("fresh"),
            },
        ],
    );
    assert_eq!(messages(&state), vec!["fresh"]);
}

#[test]
fn alerts_survive_navigation() {
    let (state, id) = on_dashboard(SessionSettings::default());
    let (state, _) = run(
        state,
        vec![
            Action::AlertReceived {
                subscription: id,
                alert: alert("kept"),
            },
            Action::Navigate(Route::Features),
        ],
    );
    assert_eq!(messages(&state), vec!["kept"]);
}

#[test]
fn alert_retention_bounds_the_feed() {
    let settings = SessionSettings {
        alert_retention: AlertRetention::from_limit(2),
        ..SessionSettings::default()
    };
    let (state, id) = on_dashboard(settings);
    let actions = ["M1", "M2", "M3"]
        .into_iter()
        .map(|m| Action::AlertReceived {
            subscription: id,
            alert: alert(m),
        })
        .collect();
    let (state, _) = run(state, actions);
    assert_eq!(messages(&state), vec!["M3", "M2"]);
}

#[test]
fn feed_close_marks_it_offline_without_reconnecting() {
    let (state, id) = on_dashboard(SessionSettings::default());
    let (state, effects) = state.reduce(Action::LiveFeedClosed(id));
    assert_eq!(state.live_status(), LiveFeedStatus::Offline);
    assert!(effects.is_empty());
}

#[test]
fn sends_carry_the_current_drafts() {
    let state = signed_in(SessionSettings::default());
    let (_, effects) = run(
        state,
        vec![
            Action::EditField(DraftField::PanicUserId, "  asha ".into()),
            Action::SendPanic,
            Action::EditField(DraftField::EscalationContacts, "a@x.com, b@y.com".into()),
            Action::SelectEscalationLevel(EscalationLevel::Fleet),
            Action::SendEscalation,
        ],
    );

    let [Effect::SendPanic(panic), Effect::SendEscalation(escalation)] = effects.as_slice() else {
        panic!("unexpected effects: {effects:?}");
    };
    assert_eq!(panic.user_id, "  asha ");
    assert_eq!(escalation.contacts, "a@x.com, b@y.com");
    assert_eq!(escalation.escalation_level, EscalationLevel::Fleet);
}

#[test]
fn repeated_sends_are_not_deduplicated() {
    let state = signed_in(SessionSettings::default());
    let (_, effects) = run(state, vec![Action::SendAnomaly, Action::SendAnomaly]);
    assert_eq!(effects.len(), 2);
}

#[test]
fn success_and_failure_notices() {
    let state = signed_in(SessionSettings::default());
    let (state, _) = state.reduce(Action::RequestSucceeded(RequestKind::Panic));
    assert_eq!(state.notice(), Some(&Notice::info("Panic alert sent!")));

    let (state, _) = state.reduce(Action::DismissNotice);
    assert_eq!(state.notice(), None);

    let before = state.clone();
    let (state, _) = state.reduce(Action::RequestFailed(RequestKind::Guidance));
    assert_eq!(state.notice(), Some(&Notice::error("Error fetching guidance")));
    assert_eq!(state.guidance(), before.guidance());
    assert_eq!(state.panic_draft(), before.panic_draft());
}

#[test]
fn voice_toggle_without_recognizer_shows_a_notice() {
    let (state, _) = on_dashboard(SessionSettings::default());
    let (state, effects) = state.reduce(Action::ToggleVoice);
    assert!(effects.is_empty());
    assert!(!state.is_voice_listening());
    assert_eq!(state.notice(), Some(&Notice::error(VOICE_UNAVAILABLE_MESSAGE)));
}

#[test]
fn voice_keyword_sends_the_panic_draft() {
    let (state, _) = on_dashboard(with_voice());
    let (state, effects) = state.reduce(Action::ToggleVoice);
    let listener = state.voice_listener().unwrap();
    assert_eq!(effects, vec![Effect::StartVoice(listener)]);

    let (_, effects) = state.reduce(Action::VoiceResults {
        listener,
        results: vec!["please".into(), "HELP me".into()],
        at: Instant::now(),
    });
    assert_eq!(effects, vec![Effect::SendPanic(PanicDraft::default())]);
}

#[test]
fn voice_without_keyword_does_nothing() {
    let (state, _) = on_dashboard(with_voice());
    let (state, _) = state.reduce(Action::ToggleVoice);
    let listener = state.voice_listener().unwrap();
    let (_, effects) = state.reduce(Action::VoiceResults {
        listener,
        results: vec!["the bus is late".into()],
        at: Instant::now(),
    });
    assert!(effects.is_empty());
}

#[test]
fn voice_triggers_respect_the_cooldown() {
    let (state, _) = on_dashboard(with_voice());
    let (state, _) = state.reduce(Action::ToggleVoice);
    let listener = state.voice_listener().unwrap();
    let start = Instant::now();
    let sos = |at| Action::VoiceResults {
        listener,
        results: vec!["sos".into()],
        at,
    };

    let (_, effects) = run(
        state,
        vec![
            sos(start),
            sos(start + Duration::from_secs(2)),
            sos(start + Duration::from_secs(10)),
        ],
    );
    assert_eq!(effects.len(), 2);
}

#[test]
fn zero_cooldown_sends_every_match() {
    let settings = SessionSettings {
        voice_trigger: VoiceTrigger::new(["madad"], Duration::ZERO),
        ..with_voice()
    };
    let (state, _) = on_dashboard(settings);
    let (state, _) = state.reduce(Action::ToggleVoice);
    let listener = state.voice_listener().unwrap();
    let now = Instant::now();
    let batch = || Action::VoiceResults {
        listener,
        results: vec!["Madad!".into()],
        at: now,
    };
    let (_, effects) = run(state, vec![batch(), batch()]);
    assert_eq!(effects.len(), 2);
}

#[test]
fn stale_voice_results_are_ignored() {
    let (state, _) = on_dashboard(with_voice());
    let (state, _) = state.reduce(Action::ToggleVoice);
    let listener = state.voice_listener().unwrap();
    let (state, effects) = state.reduce(Action::ToggleVoice);
    assert_eq!(effects, vec![Effect::StopVoice(listener)]);

    let (_, effects) = state.reduce(Action::VoiceResults {
        listener,
        results: vec!["help".into()],
        at: Instant::now(),
    });
    assert!(effects.is_empty());
}

#[test]
fn recognizer_ending_turns_listening_off() {
    let (state, _) = on_dashboard(with_voice());
    let (state, _) = state.reduce(Action::ToggleVoice);
    let listener = state.voice_listener().unwrap();
    let (state, effects) = state.reduce(Action::VoiceEnded(listener));
    assert!(!state.is_voice_listening());
    assert!(effects.is_empty());
}

#[test]
fn recognizer_start_failure_reports_unavailable() {
    let (state, _) = on_dashboard(with_voice());
    let (state, _) = state.reduce(Action::ToggleVoice);
    let listener = state.voice_listener().unwrap();
    let (state, _) = state.reduce(Action::VoiceStartFailed(listener));
    assert!(!state.is_voice_listening());
    assert_eq!(state.notice(), Some(&Notice::error(VOICE_UNAVAILABLE_MESSAGE)));
}

#[test]
fn voice_toggle_is_dashboard_only() {
    let state = signed_in(with_voice());
    let (state, effects) = state.reduce(Action::ToggleVoice);
    assert!(effects.is_empty());
    assert!(!state.is_voice_listening());
}
