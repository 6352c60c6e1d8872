//! Line transcriber - Typed or piped text standing in for a microphone.
//!
//! Each line read is one utterance. A blank line or a listen timeout is
//! reported as silence; end of input closes the session.

use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::Transcriber;

/// `Transcriber` over any line-oriented async reader.
pub struct LineTranscriber<R> {
    lines: Mutex<Lines<R>>,
    timeout: Option<Duration>,
    max_len: usize,
}

/// `LineTranscriber` reading the process's standard input.
pub type StdinTranscriber = LineTranscriber<BufReader<Stdin>>;

impl StdinTranscriber {
    pub fn stdin(max_len: usize) -> Self {
        LineTranscriber::new(BufReader::new(tokio::io::stdin()), max_len)
    }
}

impl<R: AsyncBufRead + Unpin + Send> LineTranscriber<R> {
    pub fn new(reader: R, max_len: usize) -> Self {
        Self {
            lines: Mutex::new(reader.lines()),
            timeout: None,
            max_len,
        }
    }

    /// Treats a listen that takes longer than `timeout` as silence.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> Transcriber for LineTranscriber<R> {
    async fn listen(&self) -> Result<Option<String>, DomainError> {
        let mut lines = self.lines.lock().await;

        let read = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, lines.next_line()).await {
                Ok(read) => read,
                Err(_) => {
                    tracing::debug!(timeout_ms = limit.as_millis() as u64, "listen timed out");
                    return Ok(None);
                }
            },
            None => lines.next_line().await,
        };

        let line = read
            .map_err(|e| DomainError::new(ErrorCode::TranscriptionFailed, e.to_string()))?
            .ok_or_else(|| DomainError::new(ErrorCode::InputClosed, "Transcript input closed"))?;

        let text = line.trim();
        if text.is_empty() {
            return Ok(None);
        }
        Ok(Some(text.chars().take(self.max_len).collect()))
    }
}
