//! Closed option sets offered by the dashboard selectors.

use serde::Deserialize;
use serde::Serialize;
use strum_macros::AsRefStr;
use strum_macros::Display;
use strum_macros::EnumIter;
use strum_macros::EnumString;

/// Kind of anomaly reported to the backend and explained by it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AnomalyType {
    RouteDeviation,
    UnsafeDriving,
    DistressVoice,
}

impl AnomalyType {
    /// Human-readable label shown in selectors.
    pub fn label(self) -> &'static str {
        match self {
            AnomalyType::RouteDeviation => "Route Deviation",
            AnomalyType::UnsafeDriving => "Unsafe Driving",
            AnomalyType::DistressVoice => "Distress Voice",
        }
    }
}

/// Who an escalation is routed to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EscalationLevel {
    #[default]
    Family,
    Fleet,
    Police,
}

impl EscalationLevel {
    pub fn label(self) -> &'static str {
        match self {
            EscalationLevel::Family => "Family",
            EscalationLevel::Fleet => "Fleet",
            EscalationLevel::Police => "Police",
        }
    }
}

/// Risk level passed to the guidance endpoint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskLevel {
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
        }
    }
}
