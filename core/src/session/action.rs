use std::time::Duration;
use std::time::Instant;

use raksha_protocol::Alert;
use raksha_protocol::AnomalyDraft;
use raksha_protocol::AnomalyType;
use raksha_protocol::EscalationDraft;
use raksha_protocol::EscalationLevel;
use raksha_protocol::Guidance;
use raksha_protocol::PanicDraft;
use raksha_protocol::RiskLevel;

use super::forms::AuthField;
use super::forms::AuthMode;
use super::forms::DraftField;
use super::forms::Route;

/// Tags one live-feed subscription. Deliveries carrying an older id are
/// dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

/// Tags one voice listening session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Panic,
    Anomaly,
    Escalation,
    Explanation,
    Guidance,
}

impl RequestKind {
    /// Sends confirm with a notice; fetches just show their result.
    pub fn success_message(self) -> Option<&'static str> {
        match self {
            RequestKind::Panic => Some("Panic alert sent!"),
            RequestKind::Anomaly => Some("Anomaly alert sent!"),
            RequestKind::Escalation => Some("Escalation alert sent!"),
            RequestKind::Explanation | RequestKind::Guidance => None,
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            RequestKind::Panic => "Error sending panic alert",
            RequestKind::Anomaly => "Error sending anomaly alert",
            RequestKind::Escalation => "Error sending escalation alert",
            RequestKind::Explanation => "Error fetching explanation",
            RequestKind::Guidance => "Error fetching guidance",
        }
    }
}

/// Everything that can happen to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SplashElapsed,

    SetAuthMode(AuthMode),
    EditAuthField(AuthField, String),
    SubmitAuth,
    Logout,

    Navigate(Route),

    EditField(DraftField, String),
    SelectAnomalyType(AnomalyType),
    SelectEscalationAnomaly(AnomalyType),
    SelectEscalationLevel(EscalationLevel),
    SelectRiskLevel(RiskLevel),

    SendPanic,
    SendAnomaly,
    SendEscalation,
    FetchExplanation,
    FetchGuidance,

    RequestSucceeded(RequestKind),
    ExplanationLoaded(String),
    GuidanceLoaded(Guidance),
    RequestFailed(RequestKind),

    LiveFeedConnected(SubscriptionId),
    /// Connect failure or server-side close.
    LiveFeedClosed(SubscriptionId),
    AlertReceived {
        subscription: SubscriptionId,
        alert: Alert,
    },

    ToggleVoice,
    VoiceStartFailed(ListenerId),
    VoiceEnded(ListenerId),
    VoiceResults {
        listener: ListenerId,
        results: Vec<String>,
        at: Instant,
    },

    DismissNotice,
}

/// Side effects requested by the reducer, executed by the front-end.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Dispatch [`Action::SplashElapsed`] after the delay.
    ScheduleSplash(Duration),

    SendPanic(PanicDraft),
    SendAnomaly(AnomalyDraft),
    SendEscalation(EscalationDraft),
    FetchExplanation(AnomalyType),
    FetchGuidance {
        location: String,
        risk: RiskLevel,
    },

    OpenLiveFeed(SubscriptionId),
    CloseLiveFeed(SubscriptionId),

    StartVoice(ListenerId),
    StopVoice(ListenerId),
}
