//! Presenter that writes every event to the log.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::questionnaire::PresentationEvent;
use crate::ports::Presenter;

/// Logs presentation events through `tracing`; used when no display is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingPresenter;

#[async_trait]
impl Presenter for TracingPresenter {
    async fn present(&self, event: &PresentationEvent) -> Result<(), DomainError> {
        tracing::info!(
            session_id = %event.session_id,
            event_id = %event.event_id,
            event_type = event.event_type(),
            spoken = event.event.spoken_text().as_deref().unwrap_or(""),
            "presentation event"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;
    use crate::domain::questionnaire::KioskEvent;

    #[tokio::test]
    async fn never_fails() {
        let event = PresentationEvent::new(
            SessionId::new(),
            KioskEvent::feedback("Please answer yes or no."),
        );
        assert!(TracingPresenter.present(&event).await.is_ok());
        assert!(TracingPresenter.present_all(&[event]).await.is_ok());
    }
}
