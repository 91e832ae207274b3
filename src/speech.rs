//! Speech playback and capture seams, plus console implementations.
//!
//! The console binary "speaks" by printing to stdout and "listens" by
//! reading one line from stdin, which keeps the whole flow scriptable.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::SpeechConfig;
use crate::conversation::Phase;
use crate::error::{NaviError, Result};
use crate::text::Locale;

/// Speech playback.
#[async_trait]
pub trait Speaker: Send + Sync {
    /// Speak `text`, returning once playback finished or was stopped.
    async fn speak(&self, text: &str, locale: Locale) -> Result<()>;

    /// Interrupt any playback in progress.
    async fn stop(&self);
}

/// Speech capture.
#[async_trait]
pub trait Listener: Send + Sync {
    /// Capture one utterance and return its transcript. An empty transcript
    /// means nothing usable was heard.
    async fn listen(&self, phase: Phase) -> Result<String>;
}

/// Prints each utterance as a line on stdout.
#[derive(Debug, Clone)]
pub struct ConsoleSpeaker {
    rate: f32,
    pitch: f32,
}

impl ConsoleSpeaker {
    pub fn new(config: &SpeechConfig) -> Self {
        Self {
            rate: config.rate,
            pitch: config.pitch,
        }
    }
}

#[async_trait]
impl Speaker for ConsoleSpeaker {
    async fn speak(&self, text: &str, locale: Locale) -> Result<()> {
        debug!(%locale, rate = self.rate, pitch = self.pitch, "speak");
        // Multi-line prompts read as one sentence.
        println!("[{locale}] {}", text.replace('\n', " "));
        Ok(())
    }

    async fn stop(&self) {}
}

/// Reads transcripts line by line from stdin.
pub struct StdinListener {
    lines: Mutex<Lines<BufReader<Stdin>>>,
    on_eof: Option<CancellationToken>,
}

impl StdinListener {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
            on_eof: None,
        }
    }

    /// Cancel `token` once stdin is exhausted.
    pub fn cancel_on_eof(mut self, token: CancellationToken) -> Self {
        self.on_eof = Some(token);
        self
    }
}

impl Default for StdinListener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Listener for StdinListener {
    async fn listen(&self, phase: Phase) -> Result<String> {
        eprint!("({phase:?}) > ");
        let mut lines = self.lines.lock().await;
        match lines.next_line().await {
            Ok(Some(line)) => Ok(line),
            Ok(None) => {
                debug!("stdin closed");
                if let Some(token) = &self.on_eof {
                    token.cancel();
                }
                Ok(String::new())
            }
            Err(e) => Err(NaviError::Speech(format!("reading transcript: {e}"))),
        }
    }
}
