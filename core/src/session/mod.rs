//! Session and phase controller.
//!
//! [`SessionState`] is an immutable value. Every input is an [`Action`];
//! [`SessionState::reduce`] returns the next state together with the
//! [`Effect`]s the front-end must execute (network calls, timers, the live
//! feed, voice capture). The reducer never blocks and never fails.

mod action;
mod forms;

use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use raksha_protocol::AnomalyDraft;
use raksha_protocol::DraftContext;
use raksha_protocol::EscalationDraft;
use raksha_protocol::Guidance;
use raksha_protocol::PanicDraft;
use raksha_protocol::RiskLevel;
use tracing::debug;

pub use action::Action;
pub use action::Effect;
pub use action::ListenerId;
pub use action::RequestKind;
pub use action::SubscriptionId;
pub use forms::AuthField;
pub use forms::AuthForm;
pub use forms::AuthMode;
pub use forms::DraftField;
pub use forms::Phase;
pub use forms::Route;

use crate::alert_feed::AlertFeed;
use crate::alert_feed::AlertRetention;
use crate::config::RakshaConfig;
use crate::voice::VoiceTrigger;

/// Shown when voice is toggled without a usable recognizer.
pub const VOICE_UNAVAILABLE_MESSAGE: &str = "Voice recognition not supported in this terminal.";

/// Values fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub splash_delay: Duration,
    pub drafts: DraftContext,
    pub alert_retention: AlertRetention,
    pub voice_available: bool,
    pub voice_trigger: VoiceTrigger,
}

impl SessionSettings {
    pub fn from_config(config: &RakshaConfig, voice_available: bool) -> Self {
        Self {
            splash_delay: config.splash_delay,
            drafts: config.drafts.clone(),
            alert_retention: config.alert_retention,
            voice_available,
            voice_trigger: config.voice.trigger(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            splash_delay: Duration::from_secs(5),
            drafts: DraftContext::default(),
            alert_retention: AlertRetention::default(),
            voice_available: false,
            voice_trigger: VoiceTrigger::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A blocking message the user has to dismiss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LiveFeedStatus {
    #[default]
    Idle,
    Connecting,
    Live,
    Offline,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct VoiceState {
    listener: Option<ListenerId>,
    last_trigger: Option<Instant>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    settings: Arc<SessionSettings>,
    phase: Phase,
    route: Route,
    auth: AuthForm,
    panic: PanicDraft,
    anomaly: AnomalyDraft,
    escalation: EscalationDraft,
    risk: RiskLevel,
    explanation: Option<String>,
    guidance: Option<Guidance>,
    alerts: AlertFeed,
    subscription: Option<SubscriptionId>,
    live_status: LiveFeedStatus,
    voice: VoiceState,
    notice: Option<Notice>,
    next_id: u64,
}

impl SessionState {
    pub fn new(settings: SessionSettings) -> Self {
        let settings = Arc::new(settings);
        Self {
            phase: Phase::Splash,
            route: Route::Home,
            auth: AuthForm::default(),
            panic: PanicDraft::from_context(&settings.drafts),
            anomaly: AnomalyDraft::from_context(&settings.drafts),
            escalation: EscalationDraft::from_context(&settings.drafts),
            risk: RiskLevel::default(),
            explanation: None,
            guidance: None,
            alerts: AlertFeed::new(settings.alert_retention),
            subscription: None,
            live_status: LiveFeedStatus::Idle,
            voice: VoiceState::default(),
            notice: None,
            next_id: 0,
            settings,
        }
    }

    /// Fresh session in the splash phase plus the timer that ends it.
    pub fn boot(settings: SessionSettings) -> (Self, Vec<Effect>) {
        let state = Self::new(settings);
        let delay = state.settings.splash_delay;
        (state, vec![Effect::ScheduleSplash(delay)])
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn auth(&self) -> &AuthForm {
        &self.auth
    }

    pub fn panic_draft(&self) -> &PanicDraft {
        &self.panic
    }

    pub fn anomaly_draft(&self) -> &AnomalyDraft {
        &self.anomaly
    }

    pub fn escalation_draft(&self) -> &EscalationDraft {
        &self.escalation
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.risk
    }

    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    pub fn guidance(&self) -> Option<&Guidance> {
        self.guidance.as_ref()
    }

    pub fn alerts(&self) -> &AlertFeed {
        &self.alerts
    }

    pub fn live_subscription(&self) -> Option<SubscriptionId> {
        self.subscription
    }

    pub fn live_status(&self) -> LiveFeedStatus {
        self.live_status
    }

    pub fn voice_listener(&self) -> Option<ListenerId> {
        self.voice.listener
    }

    pub fn is_voice_listening(&self) -> bool {
        self.voice.listener.is_some()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn reduce(mut self, action: Action) -> (Self, Vec<Effect>) {
        let mut effects = Vec::new();
        match action {
            Action::SplashElapsed => {
                if self.phase == Phase::Splash {
                    self.phase = Phase::Auth;
                }
            }

            Action::SetAuthMode(mode) => {
                if self.phase == Phase::Auth && self.auth.mode != mode {
                    self.auth.mode = mode;
                    self.auth.hint = None;
                }
            }
            Action::EditAuthField(field, value) => {
                if self.phase == Phase::Auth {
                    self.auth.set(field, value);
                    self.auth.hint = None;
                }
            }
            Action::SubmitAuth => {
                if self.phase == Phase::Auth {
                    match self.auth.first_missing() {
                        Some(field) => {
                            self.auth.hint = Some(format!("{} is required", field.label()));
                        }
                        None => {
                            self.phase = Phase::App;
                            self.route = Route::Home;
                            self.auth = AuthForm {
                                mode: self.auth.mode,
                                ..AuthForm::default()
                            };
                        }
                    }
                }
            }
            Action::Logout => {
                if self.phase == Phase::App {
                    self.release_dashboard(&mut effects);
                    self.phase = Phase::Auth;
                    self.route = Route::Home;
                }
            }

            Action::Navigate(route) => {
                if self.phase == Phase::App && self.route != route {
                    if self.route == Route::Dashboard {
                        self.release_dashboard(&mut effects);
                    }
                    self.route = route;
                    if route == Route::Dashboard {
                        let id = SubscriptionId(self.allocate_id());
                        self.subscription = Some(id);
                        self.live_status = LiveFeedStatus::Connecting;
                        effects.push(Effect::OpenLiveFeed(id));
                    }
                }
            }

            Action::EditField(field, value) if self.phase == Phase::App => match field {
                DraftField::PanicUserId => self.panic.user_id = value,
                DraftField::EscalationContacts => self.escalation.contacts = value,
            },
            Action::SelectAnomalyType(kind) if self.phase == Phase::App => {
                self.anomaly.anomaly_type = kind;
            }
            Action::SelectEscalationAnomaly(kind) if self.phase == Phase::App => {
                self.escalation.anomaly_type = kind;
            }
            Action::SelectEscalationLevel(level) if self.phase == Phase::App => {
                self.escalation.escalation_level = level;
            }
            Action::SelectRiskLevel(risk) if self.phase == Phase::App => {
                self.risk = risk;
            }

            Action::SendPanic if self.phase == Phase::App => {
                effects.push(Effect::SendPanic(self.panic.clone()));
            }
            Action::SendAnomaly if self.phase == Phase::App => {
                effects.push(Effect::SendAnomaly(self.anomaly.clone()));
            }
            Action::SendEscalation if self.phase == Phase::App => {
                effects.push(Effect::SendEscalation(self.escalation.clone()));
            }
            Action::FetchExplanation if self.phase == Phase::App => {
                effects.push(Effect::FetchExplanation(self.anomaly.anomaly_type));
            }
            Action::FetchGuidance if self.phase == Phase::App => {
                effects.push(Effect::FetchGuidance {
                    location: self.panic.location.clone(),
                    risk: self.risk,
                });
            }

            Action::RequestSucceeded(kind) => {
                if let Some(message) = kind.success_message() {
                    self.notice = Some(Notice::info(message));
                }
            }
            Action::ExplanationLoaded(text) => {
                self.explanation = Some(text);
            }
            Action::GuidanceLoaded(guidance) => {
                self.guidance = Some(guidance);
            }
            Action::RequestFailed(kind) => {
                self.notice = Some(Notice::error(kind.failure_message()));
            }

            Action::LiveFeedConnected(id) => {
                if self.subscription == Some(id) {
                    self.live_status = LiveFeedStatus::Live;
                }
            }
            Action::LiveFeedClosed(id) => {
                if self.subscription == Some(id) {
                    self.live_status = LiveFeedStatus::Offline;
                }
            }
            Action::AlertReceived {
                subscription,
                alert,
            } => {
                if self.subscription == Some(subscription) {
                    self.alerts.push(alert);
                } else {
                    debug!("dropping alert from stale subscription {subscription}");
                }
            }

            Action::ToggleVoice => {
                if self.phase == Phase::App && self.route == Route::Dashboard {
                    if let Some(listener) = self.voice.listener.take() {
                        effects.push(Effect::StopVoice(listener));
                    } else if self.settings.voice_available {
                        let listener = ListenerId(self.allocate_id());
                        self.voice.listener = Some(listener);
                        effects.push(Effect::StartVoice(listener));
                    } else {
                        self.notice = Some(Notice::error(VOICE_UNAVAILABLE_MESSAGE));
                    }
                }
            }
            Action::VoiceStartFailed(listener) => {
                if self.voice.listener == Some(listener) {
                    self.voice.listener = None;
                    self.notice = Some(Notice::error(VOICE_UNAVAILABLE_MESSAGE));
                }
            }
            Action::VoiceEnded(listener) => {
                if self.voice.listener == Some(listener) {
                    self.voice.listener = None;
                }
            }
            Action::VoiceResults {
                listener,
                results,
                at,
            } => {
                if self.phase == Phase::App && self.voice.listener == Some(listener) {
                    let trigger = &self.settings.voice_trigger;
                    if trigger.matches(&results) {
                        if trigger.cooled_down(self.voice.last_trigger, at) {
                            self.voice.last_trigger = Some(at);
                            effects.push(Effect::SendPanic(self.panic.clone()));
                        } else {
                            debug!("voice trigger suppressed by cooldown");
                        }
                    }
                }
            }

            Action::DismissNotice => {
                self.notice = None;
            }

            // Outbound and draft actions outside the app phase.
            Action::EditField(..)
            | Action::SelectAnomalyType(_)
            | Action::SelectEscalationAnomaly(_)
            | Action::SelectEscalationLevel(_)
            | Action::SelectRiskLevel(_)
            | Action::SendPanic
            | Action::SendAnomaly
            | Action::SendEscalation
            | Action::FetchExplanation
            | Action::FetchGuidance => {}
        }
        (self, effects)
    }

    /// Close the live feed and stop voice capture, if active.
    fn release_dashboard(&mut self, effects: &mut Vec<Effect>) {
        if let Some(id) = self.subscription.take() {
            effects.push(Effect::CloseLiveFeed(id));
        }
        self.live_status = LiveFeedStatus::Idle;
        if let Some(listener) = self.voice.listener.take() {
            effects.push(Effect::StopVoice(listener));
        }
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(SessionSettings::default())
    }
}
