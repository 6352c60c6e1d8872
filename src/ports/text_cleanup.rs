//! TextCleanup port - Best-effort coercion of noisy transcripts.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::questionnaire::QuestionKind;

/// Port for transcript cleanup.
///
/// Output is a hint toward `"yes"`, `"no"` or a digit string. It is always
/// passed through `AnswerNormalizer` and the question's bounds afterwards,
/// so an adapter may return the input unchanged when unsure.
#[async_trait]
pub trait TextCleanup: Send + Sync {
    async fn cleanup(&self, raw: &str, expected: QuestionKind) -> Result<String, DomainError>;
}
