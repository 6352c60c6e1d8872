//! Domain layer containing the kiosk's business logic.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `gesture` - Frame stabilization and digit entry
//! - `questionnaire` - Question flow, answers and presentation events
//! - `tax` - Exemption rule base

pub mod foundation;
pub mod gesture;
pub mod questionnaire;
pub mod tax;
