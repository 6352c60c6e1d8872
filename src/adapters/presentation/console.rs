//! Console presenter - Prints spoken lines to a terminal.

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt, Stdout};
use tokio::sync::Mutex;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::questionnaire::PresentationEvent;
use crate::ports::Presenter;

/// Writes the text-to-speech line of each event, one per line.
pub struct ConsolePresenter<W> {
    out: Mutex<W>,
}

impl ConsolePresenter<Stdout> {
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

impl<W: AsyncWrite + Unpin + Send> ConsolePresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> Presenter for ConsolePresenter<W> {
    async fn present(&self, event: &PresentationEvent) -> Result<(), DomainError> {
        let Some(line) = event.event.spoken_text() else {
            return Ok(());
        };
        let mut out = self.out.lock().await;
        let write = async {
            out.write_all(line.as_bytes()).await?;
            out.write_all(b"\n").await?;
            out.flush().await
        };
        write
            .await
            .map_err(|e| DomainError::new(ErrorCode::PresentationFailed, e.to_string()))
    }
}
