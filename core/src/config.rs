//! Layered configuration loader.
//!
//! Precedence, later layers win:
//! 1. Built-in defaults
//! 2. `config.toml` under the Raksha home (`$RAKSHA_HOME`, default `~/.raksha`)
//! 3. `RAKSHA_*` environment variables
//! 4. Command-line overrides ([`ConfigOverrides`])

use std::env;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use raksha_protocol::DEFAULT_API_BASE;
use raksha_protocol::DraftContext;
use serde::Deserialize;

use crate::alert_feed::AlertRetention;
use crate::voice::DEFAULT_KEYWORDS;
use crate::voice::DEFAULT_TRIGGER_COOLDOWN;
use crate::voice::VoiceTrigger;

const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_HOME_DIR: &str = ".raksha";
const DEFAULT_SPLASH_SECS: u64 = 5;
const DEFAULT_MAX_ALERTS: usize = 500;

#[derive(Debug)]
pub enum ConfigLoadError {
    IoError(std::io::Error),

    TomlParseError(toml::de::Error),

    ValidationError(String),

    InvalidEnvValue {
        var: String,
        value: String,
        expected: String,
    },
}

impl std::fmt::Display for ConfigLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigLoadError::IoError(e) => write!(f, "I/O error loading config: {e}"),
            ConfigLoadError::TomlParseError(e) => write!(f, "TOML parsing error: {e}"),
            ConfigLoadError::ValidationError(msg) => write!(f, "Config validation error: {msg}"),
            ConfigLoadError::InvalidEnvValue {
                var,
                value,
                expected,
            } => write!(
                f,
                "Invalid value for ${var}: '{value}' (expected: {expected})"
            ),
        }
    }
}

impl std::error::Error for ConfigLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigLoadError::IoError(e) => Some(e),
            ConfigLoadError::TomlParseError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigLoadError {
    fn from(err: std::io::Error) -> Self {
        ConfigLoadError::IoError(err)
    }
}

impl From<toml::de::Error> for ConfigLoadError {
    fn from(err: toml::de::Error) -> Self {
        ConfigLoadError::TomlParseError(err)
    }
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RakshaConfig {
    /// Backend base address, e.g. `http://localhost:8000`.
    pub api_base: String,

    pub splash_delay: Duration,

    /// Seed values for every alert draft.
    pub drafts: DraftContext,

    pub alert_retention: AlertRetention,

    pub voice: VoiceConfig,

    /// Directory holding `config.toml` and the `log/` directory.
    pub raksha_home: PathBuf,
}

impl RakshaConfig {
    pub fn defaults(raksha_home: PathBuf) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            splash_delay: Duration::from_secs(DEFAULT_SPLASH_SECS),
            drafts: DraftContext::default(),
            alert_retention: AlertRetention::from_limit(DEFAULT_MAX_ALERTS),
            voice: VoiceConfig::default(),
            raksha_home,
        }
    }

    pub fn log_dir(&self) -> PathBuf {
        self.raksha_home.join("log")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VoiceConfig {
    /// External transcription program and its arguments. `None` disables
    /// voice recognition.
    pub command: Option<Vec<String>>,

    pub keywords: Vec<String>,

    /// `Duration::ZERO` disables throttling.
    pub trigger_cooldown: Duration,
}

impl VoiceConfig {
    pub fn trigger(&self) -> VoiceTrigger {
        VoiceTrigger::new(&self.keywords, self.trigger_cooldown)
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            command: None,
            keywords: DEFAULT_KEYWORDS.iter().map(|k| (*k).to_string()).collect(),
            trigger_cooldown: DEFAULT_TRIGGER_COOLDOWN,
        }
    }
}

/// On-disk shape of `config.toml`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConfigToml {
    pub api_base: Option<String>,
    pub splash_secs: Option<u64>,
    pub drafts: DraftsToml,
    pub alerts: AlertsToml,
    pub voice: VoiceToml,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct DraftsToml {
    pub vehicle_id: Option<String>,
    pub lang: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AlertsToml {
    /// `0` keeps every alert.
    pub max_retained: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct VoiceToml {
    pub command: Option<Vec<String>>,
    pub keywords: Option<Vec<String>>,
    pub trigger_cooldown_secs: Option<u64>,
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub api_base: Option<String>,
    pub splash_secs: Option<u64>,
    pub max_alerts: Option<usize>,
    /// Shell-style command line; an empty string disables voice.
    pub voice_command: Option<String>,
}

impl ConfigOverrides {
    fn apply(self, config: &mut RakshaConfig) -> Result<(), ConfigLoadError> {
        if let Some(api_base) = self.api_base {
            config.api_base = non_empty(api_base, "--api-base")?;
        }
        if let Some(secs) = self.splash_secs {
            config.splash_delay = Duration::from_secs(secs);
        }
        if let Some(max) = self.max_alerts {
            config.alert_retention = AlertRetention::from_limit(max);
        }
        if let Some(command) = self.voice_command {
            config.voice.command = split_command(&command).ok_or_else(|| {
                ConfigLoadError::ValidationError(format!(
                    "--voice-command has unbalanced quoting: {command}"
                ))
            })?;
        }
        Ok(())
    }
}

pub struct ConfigLoader {
    raksha_home: Option<PathBuf>,
    config_file: Option<PathBuf>,
    env_prefix: String,
    overrides: ConfigOverrides,
    skip_file: bool,
    skip_env: bool,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            raksha_home: None,
            config_file: None,
            env_prefix: "RAKSHA".to_string(),
            overrides: ConfigOverrides::default(),
            skip_file: false,
            skip_env: false,
        }
    }

    /// If not set, resolved from `$RAKSHA_HOME`, defaulting to `~/.raksha`.
    pub fn with_raksha_home(mut self, path: PathBuf) -> Self {
        self.raksha_home = Some(path);
        self
    }

    /// Read this file instead of `<home>/config.toml`. Unlike the implicit
    /// file, an explicit one must exist.
    pub fn with_config_file(mut self, path: PathBuf) -> Self {
        self.config_file = Some(path);
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn skip_file_layer(mut self) -> Self {
        self.skip_file = true;
        self
    }

    pub fn skip_env_layer(mut self) -> Self {
        self.skip_env = true;
        self
    }

    pub fn load(self) -> Result<RakshaConfig, ConfigLoadError> {
        let raksha_home = self.resolve_raksha_home()?;
        let mut config = RakshaConfig::defaults(raksha_home);

        if !self.skip_file {
            let file = match &self.config_file {
                Some(path) => Self::read_config_file(path)?,
                None => Self::load_from_file(&config.raksha_home)?,
            };
            Self::merge_file(&mut config, file)?;
        }

        if !self.skip_env {
            Self::apply_env_overrides(&mut config, &self.env_prefix)?;
        }

        self.overrides.apply(&mut config)?;
        Ok(config)
    }

    fn resolve_raksha_home(&self) -> Result<PathBuf, ConfigLoadError> {
        if let Some(ref path) = self.raksha_home {
            return Ok(path.clone());
        }

        if let Ok(path) = env::var("RAKSHA_HOME")
            && !path.trim().is_empty()
        {
            return Ok(PathBuf::from(path));
        }

        dirs::home_dir()
            .map(|home| home.join(DEFAULT_HOME_DIR))
            .ok_or_else(|| {
                ConfigLoadError::ValidationError("Cannot determine home directory".to_string())
            })
    }

    /// Reads `config.toml` from `raksha_home`. A missing file yields an
    /// empty layer.
    pub fn load_from_file(raksha_home: &Path) -> Result<ConfigToml, ConfigLoadError> {
        let config_path = raksha_home.join(CONFIG_FILE_NAME);

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => Ok(toml::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("config.toml not found at {:?}, using defaults", config_path);
                Ok(ConfigToml::default())
            }
            Err(e) => Err(ConfigLoadError::IoError(e)),
        }
    }

    fn read_config_file(path: &Path) -> Result<ConfigToml, ConfigLoadError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn merge_file(config: &mut RakshaConfig, file: ConfigToml) -> Result<(), ConfigLoadError> {
        if let Some(api_base) = file.api_base {
            config.api_base = non_empty(api_base, "api_base")?;
        }
        if let Some(secs) = file.splash_secs {
            config.splash_delay = Duration::from_secs(secs);
        }

        let drafts = file.drafts;
        if let Some(vehicle_id) = drafts.vehicle_id {
            config.drafts.vehicle_id = vehicle_id;
        }
        if let Some(lang) = drafts.lang {
            config.drafts.lang = lang;
        }
        if let Some(location) = drafts.location {
            config.drafts.location = location;
        }

        if let Some(max) = file.alerts.max_retained {
            config.alert_retention = AlertRetention::from_limit(max);
        }

        let voice = file.voice;
        if let Some(command) = voice.command {
            config.voice.command = (!command.is_empty()).then_some(command);
        }
        if let Some(keywords) = voice.keywords {
            config.voice.keywords = keywords;
        }
        if let Some(secs) = voice.trigger_cooldown_secs {
            config.voice.trigger_cooldown = Duration::from_secs(secs);
        }
        Ok(())
    }

    /// Blank variables are ignored.
    pub fn apply_env_overrides(
        config: &mut RakshaConfig,
        prefix: &str,
    ) -> Result<(), ConfigLoadError> {
        let api_var = format!("{prefix}_API_BASE");
        if let Some(value) = read_env(&api_var) {
            tracing::debug!("Applying env override: {}={}", api_var, value);
            config.api_base = value;
        }

        let splash_var = format!("{prefix}_SPLASH_SECS");
        if let Some(value) = read_env(&splash_var) {
            let secs = parse_env::<u64>(&splash_var, value, "whole seconds")?;
            tracing::debug!("Applying env override: {}={}", splash_var, secs);
            config.splash_delay = Duration::from_secs(secs);
        }

        let alerts_var = format!("{prefix}_MAX_ALERTS");
        if let Some(value) = read_env(&alerts_var) {
            let max = parse_env::<usize>(&alerts_var, value, "a count, 0 for unbounded")?;
            tracing::debug!("Applying env override: {}={}", alerts_var, max);
            config.alert_retention = AlertRetention::from_limit(max);
        }

        let command_var = format!("{prefix}_VOICE_COMMAND");
        if let Some(value) = read_env(&command_var) {
            let Some(command) = split_command(&value) else {
                return Err(ConfigLoadError::InvalidEnvValue {
                    var: command_var,
                    value,
                    expected: "a shell-style command line".to_string(),
                });
            };
            tracing::debug!("Applying env override: {}={}", command_var, value);
            config.voice.command = command;
        }

        let cooldown_var = format!("{prefix}_VOICE_COOLDOWN_SECS");
        if let Some(value) = read_env(&cooldown_var) {
            let secs = parse_env::<u64>(&cooldown_var, value, "whole seconds")?;
            tracing::debug!("Applying env override: {}={}", cooldown_var, secs);
            config.voice.trigger_cooldown = Duration::from_secs(secs);
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn read_env(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T: std::str::FromStr>(
    var: &str,
    value: String,
    expected: &str,
) -> Result<T, ConfigLoadError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ConfigLoadError::InvalidEnvValue {
            var: var.to_string(),
            value,
            expected: expected.to_string(),
        })
}

fn non_empty(value: String, field: &str) -> Result<String, ConfigLoadError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigLoadError::ValidationError(format!(
            "{field} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// `Some(None)` for a blank command line, `None` on unbalanced quoting.
fn split_command(raw: &str) -> Option<Option<Vec<String>>> {
    let argv = shlex::split(raw)?;
    Some((!argv.is_empty()).then_some(argv))
}
