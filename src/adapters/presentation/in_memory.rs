//! In-memory presenter for testing.
//!
//! Records every presented event so tests can assert on what the user
//! would have seen and heard.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::questionnaire::{KioskEvent, PresentationEvent};
use crate::ports::Presenter;

/// Presenter that captures events for assertions.
///
/// # Example
///
/// ```ignore
/// let presenter = Arc::new(InMemoryPresenter::new());
/// presenter.present(&event).await?;
/// assert!(presenter.has_event("kiosk.result_ready.v1"));
/// ```
#[derive(Default)]
pub struct InMemoryPresenter {
    presented: RwLock<Vec<PresentationEvent>>,
    failing: AtomicBool,
}

impl InMemoryPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// Makes every following `present` call fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns all presented events in order.
    pub fn presented_events(&self) -> Vec<PresentationEvent> {
        self.presented
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Returns the inner kiosk events in order.
    pub fn kiosk_events(&self) -> Vec<KioskEvent> {
        self.presented_events()
            .into_iter()
            .map(|e| e.event)
            .collect()
    }

    /// Returns events of a specific type.
    pub fn events_of_type(&self, event_type: &str) -> Vec<PresentationEvent> {
        self.presented_events()
            .into_iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Returns every line a speech synthesizer would have read.
    pub fn spoken_lines(&self) -> Vec<String> {
        self.presented_events()
            .iter()
            .filter_map(|e| e.event.spoken_text())
            .collect()
    }

    pub fn event_count(&self) -> usize {
        self.presented
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn has_event(&self, event_type: &str) -> bool {
        self.presented
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .any(|e| e.event_type() == event_type)
    }

    pub fn clear(&self) {
        self.presented
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

#[async_trait]
impl Presenter for InMemoryPresenter {
    async fn present(&self, event: &PresentationEvent) -> Result<(), DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::PresentationFailed,
                "Presenter unavailable",
            ));
        }
        self.presented
            .write()
            .map_err(|_| DomainError::new(ErrorCode::InternalError, "Presenter lock poisoned"))?
            .push(event.clone());
        Ok(())
    }
}
