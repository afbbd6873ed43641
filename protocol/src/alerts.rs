//! Inbound payloads: live alerts, explanations and guidance.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// One event from the live channel.
///
/// `vehicle_id` and `location` are usually strings but the backend does not
/// promise it, so they are kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub vehicle_id: Value,
    #[serde(default)]
    pub location: Value,
}

impl Alert {
    pub fn vehicle_display(&self) -> String {
        display_value(&self.vehicle_id)
    }

    pub fn location_display(&self) -> String {
        display_value(&self.location)
    }
}

/// Strings render bare; anything else renders as its JSON text.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationResponse {
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub lat: f64,
    pub lng: f64,
}

impl std::fmt::Display for RoutePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Lat: {:.4}, Lng: {:.4}", self.lat, self.lng)
    }
}

/// Safety guidance text plus an optional suggested route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guidance {
    pub guidance: String,
    #[serde(default)]
    pub safe_route: Vec<RoutePoint>,
}
