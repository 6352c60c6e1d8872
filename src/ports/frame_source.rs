//! FrameSource port - Camera capture.

use async_trait::async_trait;

use super::classifier::Frame;
use crate::domain::foundation::DomainError;

/// Port for a stream of camera frames.
///
/// Returns `Ok(None)` once the source is exhausted or the camera closed.
#[async_trait]
pub trait FrameSource: Send {
    async fn next_frame(&mut self) -> Result<Option<Frame>, DomainError>;
}
