//! Smart Tax Advisor - Accessible tax exemption kiosk
//!
//! This crate walks a user through a short questionnaire answered either by
//! hand signs in front of a camera or by voice, then classifies which
//! personal tax exemption applies.
//!
//! - `domain` holds the pure logic: gesture stabilization, digit entry,
//!   answer normalization, the questionnaire state machine and tax rules.
//! - `ports` and `adapters` connect it to cameras, recognizers and output.
//! - `application` runs a session against those collaborators.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
