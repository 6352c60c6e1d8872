//! Digit entry protocol - Multi-digit numbers from single-digit gestures.
//!
//! A number is signed as its digit count (1-9) followed by that many digits,
//! most significant first. Small counts skip the count step and take one
//! digit directly. The hand has to leave frame between commits.

use serde::Serialize;
use thiserror::Error;

use super::sample::{DetectionSample, SymbolSet};
use super::stabilizer::{GestureStabilizer, StabilizerSettings};

/// Shape of the numeric answer being signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitEntryMode {
    /// A count of digits, then that many digits.
    CountThenDigits,
    /// Exactly one digit, zero permitted.
    SingleDigit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DigitEntryStage {
    AwaitingCount,
    EnteringDigits,
}

/// Progress through one numeric question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigitEntryState {
    pub stage: DigitEntryStage,
    pub expected_digit_count: Option<u8>,
    pub digits: String,
    pub hand_present: bool,
}

impl DigitEntryState {
    fn for_mode(mode: DigitEntryMode) -> Self {
        match mode {
            DigitEntryMode::CountThenDigits => Self {
                stage: DigitEntryStage::AwaitingCount,
                expected_digit_count: None,
                digits: String::new(),
                hand_present: false,
            },
            DigitEntryMode::SingleDigit => Self {
                stage: DigitEntryStage::EnteringDigits,
                expected_digit_count: Some(1),
                digits: String::new(),
                hand_present: false,
            },
        }
    }

    /// Returns true once every expected digit has been entered.
    pub fn is_complete(&self) -> bool {
        self.stage == DigitEntryStage::EnteringDigits
            && self
                .expected_digit_count
                .is_some_and(|expected| self.digits.len() == usize::from(expected))
    }
}

/// Outcome of one protocol step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DigitEntryProgress {
    /// Nothing committed on this sample.
    Pending,
    CountAccepted(u8),
    DigitAccepted { digit: u8, entered: usize, expected: u8 },
    /// All digits entered; carries the concatenated number.
    Complete(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigitEntryError {
    #[error("Digit count must be between 1 and 9, got {0}")]
    CountOutOfRange(u8),

    #[error("Not a single digit: {0:?}")]
    NotADigit(String),

    #[error("Digit entry already complete")]
    AlreadyComplete,
}

/// Count-then-digits entry layered on a hand-removal stabilizer.
#[derive(Debug, Clone)]
pub struct DigitEntryProtocol {
    mode: DigitEntryMode,
    state: DigitEntryState,
    stabilizer: GestureStabilizer,
}

impl DigitEntryProtocol {
    pub fn new(mode: DigitEntryMode, settings: StabilizerSettings) -> Self {
        let stabilizer =
            GestureStabilizer::new(settings, Self::initial_symbols(mode)).requiring_hand_removal();
        Self {
            mode,
            state: DigitEntryState::for_mode(mode),
            stabilizer,
        }
    }

    /// Starts out waiting for a hand that is already in frame to leave.
    pub fn with_hand_in_frame(mut self) -> Self {
        self.stabilizer.arm_hand_removal_guard();
        self.state.hand_present = true;
        self
    }

    /// Feeds one detection sample through the stabilizer.
    pub fn on_sample(
        &mut self,
        sample: &DetectionSample,
    ) -> Result<DigitEntryProgress, DigitEntryError> {
        if self.state.is_complete() {
            return Err(DigitEntryError::AlreadyComplete);
        }
        let committed = self.stabilizer.observe(sample);
        self.state.hand_present = self.stabilizer.awaiting_hand_removal();
        match committed {
            Some(symbol) => self.accept_symbol(&symbol),
            None => Ok(DigitEntryProgress::Pending),
        }
    }

    /// Applies a committed digit symbol to the protocol.
    ///
    /// A rejected count leaves the state untouched so the user can re-sign it.
    pub fn accept_symbol(&mut self, symbol: &str) -> Result<DigitEntryProgress, DigitEntryError> {
        if self.state.is_complete() {
            return Err(DigitEntryError::AlreadyComplete);
        }
        let digit = parse_digit(symbol)?;

        match self.state.stage {
            DigitEntryStage::AwaitingCount => {
                if digit == 0 {
                    return Err(DigitEntryError::CountOutOfRange(digit));
                }
                self.state.expected_digit_count = Some(digit);
                self.state.digits.clear();
                self.state.stage = DigitEntryStage::EnteringDigits;
                self.stabilizer.set_symbols(SymbolSet::ALL_DIGITS);
                tracing::debug!(count = digit, "digit count accepted");
                Ok(DigitEntryProgress::CountAccepted(digit))
            }
            DigitEntryStage::EnteringDigits => {
                self.state.digits.push(char::from(b'0' + digit));
                if self.state.is_complete() {
                    tracing::debug!(value = %self.state.digits, "digit entry complete");
                    return Ok(DigitEntryProgress::Complete(self.state.digits.clone()));
                }
                Ok(DigitEntryProgress::DigitAccepted {
                    digit,
                    entered: self.state.digits.len(),
                    expected: self.state.expected_digit_count.unwrap_or(1),
                })
            }
        }
    }

    /// Starts the question over, dropping any partial entry.
    pub fn reset(&mut self) {
        self.state = DigitEntryState::for_mode(self.mode);
        self.stabilizer.reset();
        self.stabilizer.set_symbols(Self::initial_symbols(self.mode));
    }

    /// Starts the entry over but keeps waiting for the hand to leave frame,
    /// so a digit still being held is not read as the new count.
    pub fn restart(&mut self) {
        self.state = DigitEntryState::for_mode(self.mode);
        self.stabilizer.set_symbols(Self::initial_symbols(self.mode));
        self.state.hand_present = self.stabilizer.awaiting_hand_removal();
    }

    pub fn mode(&self) -> DigitEntryMode {
        self.mode
    }

    pub fn state(&self) -> &DigitEntryState {
        &self.state
    }

    /// Symbols the stabilizer currently accepts.
    pub fn symbols(&self) -> SymbolSet {
        self.stabilizer.symbols()
    }

    fn initial_symbols(mode: DigitEntryMode) -> SymbolSet {
        match mode {
            DigitEntryMode::CountThenDigits => SymbolSet::NONZERO_DIGITS,
            DigitEntryMode::SingleDigit => SymbolSet::ALL_DIGITS,
        }
    }
}

fn parse_digit(symbol: &str) -> Result<u8, DigitEntryError> {
    let mut chars = symbol.trim().chars();
    match (chars.next().and_then(|c| c.to_digit(10)), chars.next()) {
        (Some(digit), None) => Ok(digit as u8),
        _ => Err(DigitEntryError::NotADigit(symbol.to_string())),
    }
}
