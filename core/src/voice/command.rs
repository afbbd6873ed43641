use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::RecognizerEvent;
use super::SpeechRecognizer;
use super::TranscriptSink;
use super::VoiceError;

/// Recognizer backed by an external transcription program.
///
/// Every non-empty stdout line is one utterance batch. Must be started from
/// within a tokio runtime.
#[derive(Debug)]
pub struct CommandRecognizer {
    program: String,
    args: Vec<String>,
    session: Option<Session>,
}

#[derive(Debug)]
struct Session {
    cancel: CancellationToken,
    task: JoinHandle<()>,
    /// Cleared by the reader before it reports `Ended`.
    listening: Arc<AtomicBool>,
}

impl CommandRecognizer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            session: None,
        }
    }

    /// `None` when `argv` is empty.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }
}

impl SpeechRecognizer for CommandRecognizer {
    fn start(&mut self, mut sink: TranscriptSink) -> Result<(), VoiceError> {
        if self.is_listening() {
            return Err(VoiceError::AlreadyListening);
        }
        if self.program.trim().is_empty() {
            return Err(VoiceError::EmptyCommand);
        }
        if let Some(finished) = self.session.take() {
            finished.cancel.cancel();
        }

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| VoiceError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        let Some(stdout) = child.stdout.take() else {
            return Err(VoiceError::Spawn {
                program: self.program.clone(),
                source: std::io::Error::other("stdout was not captured"),
            });
        };
        info!("speech recognizer started: {}", self.program);

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let listening = Arc::new(AtomicBool::new(true));
        let reader_listening = Arc::clone(&listening);
        let task = tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        reader_listening.store(false, Ordering::SeqCst);
                        if let Err(e) = child.kill().await {
                            debug!("speech recognizer already gone: {e}");
                        }
                        return;
                    }
                    line = lines.next_line() => match line {
                        Ok(Some(line)) => {
                            let utterance = line.trim();
                            if !utterance.is_empty() {
                                sink(RecognizerEvent::Results(vec![utterance.to_string()]));
                            }
                        }
                        Ok(None) => {
                            info!("speech recognizer ended");
                            break;
                        }
                        Err(e) => {
                            warn!("speech recognizer read failed: {e}");
                            break;
                        }
                    }
                }
            }
            reader_listening.store(false, Ordering::SeqCst);
            let _ = child.kill().await;
            sink(RecognizerEvent::Ended);
        });

        self.session = Some(Session {
            cancel,
            task,
            listening,
        });
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(session) = self.session.take() {
            session.listening.store(false, Ordering::SeqCst);
            session.cancel.cancel();
            debug!("speech recognizer stopped: {}", self.program);
        }
    }

    fn is_listening(&self) -> bool {
        self.session.as_ref().is_some_and(|session| {
            session.listening.load(Ordering::SeqCst) && !session.task.is_finished()
        })
    }
}

impl Drop for CommandRecognizer {
    fn drop(&mut self) {
        self.stop();
    }
}
