//! Transcriber port - Blocking speech recognition.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;

/// Port for speech-to-text.
///
/// `listen` waits for one utterance. `Ok(None)` means nothing was heard
/// before the recognizer timed out; errors are reserved for a broken
/// recognizer or a closed input.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn listen(&self) -> Result<Option<String>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time check that trait is object-safe
    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn Transcriber) {}
}
