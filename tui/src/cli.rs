use std::path::PathBuf;

use clap::Parser;
use raksha_core::ConfigOverrides;

/// Passenger safety console: panic and anomaly alerts, escalation, guidance
/// and a live alert feed.
#[derive(Parser, Debug, Default)]
#[command(name = "raksha", version)]
pub struct Cli {
    /// Backend base address, e.g. `http://localhost:8000`.
    #[arg(long = "api-base", value_name = "URL")]
    pub api_base: Option<String>,

    /// Read configuration from this file instead of `$RAKSHA_HOME/config.toml`.
    #[arg(long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// How long the splash screen stays up.
    #[arg(long = "splash-secs", value_name = "N")]
    pub splash_secs: Option<u64>,

    /// Keep at most N live alerts (0 keeps all of them).
    #[arg(long = "max-alerts", value_name = "N")]
    pub max_alerts: Option<usize>,

    /// Speech transcription command; each line it prints is one utterance.
    /// Pass an empty string to disable voice.
    #[arg(long = "voice-command", value_name = "CMD")]
    pub voice_command: Option<String>,
}

impl Cli {
    pub fn config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            api_base: self.api_base.clone(),
            splash_secs: self.splash_secs,
            max_alerts: self.max_alerts,
            voice_command: self.voice_command.clone(),
        }
    }
}
