//! Root of the `raksha-core` library.
//!
//! Holds everything the front-end needs that is not drawing: the session
//! state machine, the live alert feed, the voice keyword trigger and the
//! layered configuration.

// Library code never writes to the terminal directly; the TUI owns it.
#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod alert_feed;
pub mod config;
pub mod session;
pub mod voice;

pub use alert_feed::AlertFeed;
pub use alert_feed::AlertRetention;
pub use config::ConfigLoadError;
pub use config::ConfigLoader;
pub use config::ConfigOverrides;
pub use config::RakshaConfig;
pub use session::Action;
pub use session::Effect;
pub use session::Phase;
pub use session::Route;
pub use session::SessionSettings;
pub use session::SessionState;
pub use voice::VoiceCapability;
