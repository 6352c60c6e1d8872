//! Presenter port - Display and text-to-speech output.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::questionnaire::PresentationEvent;

/// Port for delivering presentation events to the user.
///
/// Implementations must:
/// - Deliver events in the order they are presented
/// - Not block the caller for longer than rendering or speaking takes
#[async_trait]
pub trait Presenter: Send + Sync {
    async fn present(&self, event: &PresentationEvent) -> Result<(), DomainError>;

    /// Presents a batch in order, stopping at the first failure.
    async fn present_all(&self, events: &[PresentationEvent]) -> Result<(), DomainError> {
        for event in events {
            self.present(event).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time check that trait is object-safe
    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn Presenter) {}
}
