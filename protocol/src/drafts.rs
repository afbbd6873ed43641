//! Editable alert drafts and the request bodies derived from them.

use serde::Deserialize;
use serde::Serialize;

use crate::options::AnomalyType;
use crate::options::EscalationLevel;

/// Identifier sent in place of a blank panic user id.
pub const UNKNOWN_USER: &str = "Unknown User";

const DEFAULT_VEHICLE_ID: &str = "Bus #17";
const DEFAULT_LANG: &str = "en";
const DEFAULT_LOCATION: &str = "Metro Station XYZ";

/// Values every draft is seeded with: which vehicle the passenger is in,
/// the alert language and the last known location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftContext {
    pub vehicle_id: String,
    pub lang: String,
    pub location: String,
}

impl Default for DraftContext {
    fn default() -> Self {
        Self {
            vehicle_id: DEFAULT_VEHICLE_ID.to_string(),
            lang: DEFAULT_LANG.to_string(),
            location: DEFAULT_LOCATION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanicDraft {
    pub user_id: String,
    pub vehicle_id: String,
    pub lang: String,
    pub location: String,
}

impl PanicDraft {
    pub fn from_context(ctx: &DraftContext) -> Self {
        Self {
            user_id: String::new(),
            vehicle_id: ctx.vehicle_id.clone(),
            lang: ctx.lang.clone(),
            location: ctx.location.clone(),
        }
    }

    /// Build the wire body. A blank user id (after trimming) is replaced by
    /// [`UNKNOWN_USER`].
    pub fn to_request(&self) -> PanicRequest {
        let trimmed = self.user_id.trim();
        let user_id = if trimmed.is_empty() {
            UNKNOWN_USER.to_string()
        } else {
            trimmed.to_string()
        };
        PanicRequest {
            user_id,
            vehicle_id: self.vehicle_id.clone(),
            lang: self.lang.clone(),
            location: self.location.clone(),
        }
    }
}

impl Default for PanicDraft {
    fn default() -> Self {
        Self::from_context(&DraftContext::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanicRequest {
    pub user_id: String,
    pub vehicle_id: String,
    pub lang: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnomalyDraft {
    pub anomaly_type: AnomalyType,
    pub vehicle_id: String,
    pub lang: String,
    pub current_location: String,
}

impl AnomalyDraft {
    pub fn from_context(ctx: &DraftContext) -> Self {
        Self {
            anomaly_type: AnomalyType::RouteDeviation,
            vehicle_id: ctx.vehicle_id.clone(),
            lang: ctx.lang.clone(),
            current_location: ctx.location.clone(),
        }
    }

    pub fn to_request(&self) -> AnomalyRequest {
        AnomalyRequest {
            anomaly_type: self.anomaly_type,
            vehicle_id: self.vehicle_id.clone(),
            lang: self.lang.clone(),
            current_location: self.current_location.clone(),
        }
    }
}

impl Default for AnomalyDraft {
    fn default() -> Self {
        Self::from_context(&DraftContext::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyRequest {
    pub anomaly_type: AnomalyType,
    pub vehicle_id: String,
    pub lang: String,
    pub current_location: String,
}

/// Escalation form. `contacts` is kept as the raw comma separated text the
/// user typed; it is only split when the request is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscalationDraft {
    pub anomaly_type: AnomalyType,
    pub contacts: String,
    pub vehicle_id: String,
    pub lang: String,
    pub escalation_level: EscalationLevel,
}

impl EscalationDraft {
    pub fn from_context(ctx: &DraftContext) -> Self {
        Self {
            anomaly_type: AnomalyType::DistressVoice,
            contacts: String::new(),
            vehicle_id: ctx.vehicle_id.clone(),
            lang: ctx.lang.clone(),
            escalation_level: EscalationLevel::Family,
        }
    }

    pub fn to_request(&self) -> EscalationRequest {
        EscalationRequest {
            anomaly_type: self.anomaly_type,
            contacts: parse_contacts(&self.contacts),
            vehicle_id: self.vehicle_id.clone(),
            lang: self.lang.clone(),
            escalation_level: self.escalation_level,
        }
    }
}

impl Default for EscalationDraft {
    fn default() -> Self {
        Self::from_context(&DraftContext::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationRequest {
    pub anomaly_type: AnomalyType,
    pub contacts: Vec<String>,
    pub vehicle_id: String,
    pub lang: String,
    pub escalation_level: EscalationLevel,
}

/// Split a comma separated contact list, trimming each entry and dropping
/// the empty ones. Order is preserved.
pub fn parse_contacts(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn contacts_drop_blank_entries_and_keep_order() {
        assert_eq!(
            parse_contacts("a@x.com, , b@y.com ,,"),
            vec!["a@x.com".to_string(), "b@y.com".to_string()]
        );
        assert!(parse_contacts("").is_empty());
        assert!(parse_contacts(" , ,").is_empty());
    }

    #[test]
    fn blank_user_id_becomes_unknown_user() {
        let mut draft = PanicDraft::default();
        assert_eq!(draft.to_request().user_id, UNKNOWN_USER);

        draft.user_id = "   \t".to_string();
        assert_eq!(draft.to_request().user_id, UNKNOWN_USER);

        draft.user_id = "  asha  ".to_string();
        assert_eq!(draft.to_request().user_id, "asha");
    }

    #[test]
    fn to_request_leaves_the_draft_untouched() {
        let draft = EscalationDraft {
            contacts: "100, 112".to_string(),
            ..EscalationDraft::default()
        };
        let request = draft.to_request();
        assert_eq!(request.contacts, vec!["100".to_string(), "112".to_string()]);
        assert_eq!(draft.contacts, "100, 112");
    }

    #[test]
    fn escalation_body_uses_wire_field_names() {
        let body = serde_json::to_value(EscalationDraft::default().to_request()).ok();
        assert_eq!(
            body,
            Some(serde_json::json!({
                "anomaly_type": "distress_voice",
                "contacts": [],
                "vehicle_id": "Bus #17",
                "lang": "en",
                "escalation_level": "family",
            }))
        );
    }
}
