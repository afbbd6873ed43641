//! Wire types shared by the Raksha gateway client and the terminal front-end.
//!
//! Drafts are the user-editable forms; requests are what actually goes over
//! the wire after normalization. Inbound types (`Alert`, `Guidance`,
//! `ExplanationResponse`) are decoded leniently because the backend is only
//! loosely specified.

pub mod alerts;
pub mod drafts;
pub mod options;

pub use alerts::Alert;
pub use alerts::ExplanationResponse;
pub use alerts::Guidance;
pub use alerts::RoutePoint;
pub use drafts::AnomalyDraft;
pub use drafts::AnomalyRequest;
pub use drafts::DraftContext;
pub use drafts::EscalationDraft;
pub use drafts::EscalationRequest;
pub use drafts::PanicDraft;
pub use drafts::PanicRequest;
pub use drafts::UNKNOWN_USER;
pub use drafts::parse_contacts;
pub use options::AnomalyType;
pub use options::EscalationLevel;
pub use options::RiskLevel;

/// Default backend base address.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Path of the live alert channel, appended to the derived `ws` address.
pub const LIVE_CHANNEL_PATH: &str = "/ws";
