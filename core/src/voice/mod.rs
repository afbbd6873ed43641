//! Voice keyword trigger.
//!
//! Speech recognition is optional: the front-end asks for a
//! [`VoiceCapability`] and branches on it. When a recognizer is available,
//! each utterance batch is checked against a keyword set and a match sends
//! the current panic draft.

mod command;

use std::time::Duration;
use std::time::Instant;

use thiserror::Error;

pub use command::CommandRecognizer;

/// Phrases that fire a panic alert.
pub const DEFAULT_KEYWORDS: &[&str] = &["help", "sos", "bachao", "save me", "madad"];

/// Default minimum spacing between two voice-triggered panic sends.
pub const DEFAULT_TRIGGER_COOLDOWN: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("speech recognizer command is empty")]
    EmptyCommand,

    #[error("speech recognizer is already listening")]
    AlreadyListening,

    #[error("failed to start speech recognizer `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// What a recognizer reports while listening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizerEvent {
    /// One batch of recognized utterances.
    Results(Vec<String>),
    /// The recognizer stopped on its own (end of input or error).
    Ended,
}

pub type TranscriptSink = Box<dyn FnMut(RecognizerEvent) + Send>;

/// A platform speech-recognition backend.
pub trait SpeechRecognizer: Send {
    /// Begin listening; events go to `sink` until [`stop`](Self::stop) or
    /// until the recognizer ends by itself.
    fn start(&mut self, sink: TranscriptSink) -> Result<(), VoiceError>;

    /// Release the capture. Calling it while idle is a no-op.
    fn stop(&mut self);

    fn is_listening(&self) -> bool;
}

pub enum VoiceCapability {
    Available(Box<dyn SpeechRecognizer>),
    Unavailable,
}

impl VoiceCapability {
    /// Build the capability from an optional external transcription command
    /// (`program` followed by its arguments).
    pub fn from_command(command: Option<&[String]>) -> Self {
        match command.and_then(CommandRecognizer::from_argv) {
            Some(recognizer) => VoiceCapability::Available(Box::new(recognizer)),
            None => VoiceCapability::Unavailable,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, VoiceCapability::Available(_))
    }
}

impl std::fmt::Debug for VoiceCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoiceCapability::Available(r) => f
                .debug_struct("Available")
                .field("listening", &r.is_listening())
                .finish(),
            VoiceCapability::Unavailable => f.write_str("Unavailable"),
        }
    }
}

/// Keyword matcher plus the cooldown applied between triggered sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceTrigger {
    keywords: Vec<String>,
    cooldown: Duration,
}

impl VoiceTrigger {
    pub fn new<I, S>(keywords: I, cooldown: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords, cooldown }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Lower-case and join every result, then look for any keyword as a
    /// substring.
    pub fn matches(&self, results: &[String]) -> bool {
        let transcript = results.join(" ").to_lowercase();
        self.keywords.iter().any(|k| transcript.contains(k.as_str()))
    }

    /// A zero cooldown never throttles.
    pub fn cooled_down(&self, last_fired: Option<Instant>, now: Instant) -> bool {
        match last_fired {
            Some(last) => now.saturating_duration_since(last) >= self.cooldown,
            None => true,
        }
    }
}

impl Default for VoiceTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS.iter().copied(), DEFAULT_TRIGGER_COOLDOWN)
    }
}
