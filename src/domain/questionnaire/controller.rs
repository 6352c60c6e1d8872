//! Questionnaire controller - Drives one kiosk session.
//!
//! Owns the question progression, the answer map and the per-question
//! capture state. Frame samples and transcripts are fed in one at a time;
//! every call is synchronous and returns a `StepOutcome`.
//!
//! # Skip rules
//!
//! - Married = no fills children 0, spouse works no, spouse salary 0 and
//!   joint filing no without prompting.
//! - Spouse works = no fills spouse salary 0.
//!
//! After an answer the controller jumps to the next question without an
//! answer and evaluates the rules once none is left.

use tracing::{debug, error, info, warn};

use super::answers::{AnswerMap, AnswerValue};
use super::errors::QuestionnaireError;
use super::events::{KioskEvent, PresentationEvent, RejectReason};
use super::normalizer::AnswerNormalizer;
use super::phase::{Modality, SessionPhase};
use super::question::{Question, QuestionId, QuestionKind, QuestionRole, QuestionSet};
use crate::domain::foundation::{SessionId, StateMachine};
use crate::domain::gesture::{
    DetectionSample, DigitEntryError, DigitEntryMode, DigitEntryProgress, DigitEntryProtocol,
    DigitEntryState, GestureStabilizer, StabilizerSettings, SymbolSet, Vocabulary,
};
use crate::domain::tax::{ExemptionCategory, RuleEngine};

/// Result of feeding one input to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing committed yet.
    Pending,
    /// Part of a multi-step answer was accepted.
    Progress,
    /// The attempt was not accepted; the same question stays open.
    Rejected(RejectReason),
    Answered {
        question_id: QuestionId,
        value: AnswerValue,
    },
    /// The last answer was recorded and the rules were evaluated.
    Completed(ExemptionCategory),
}

/// State machine over the question list.
#[derive(Debug)]
pub struct QuestionnaireController {
    session_id: SessionId,
    questions: QuestionSet,
    settings: StabilizerSettings,
    phase: SessionPhase,
    modality: Option<Modality>,
    answers: AnswerMap,
    letters: GestureStabilizer,
    digit_entry: Option<DigitEntryProtocol>,
    outcome: Option<ExemptionCategory>,
    events: Vec<PresentationEvent>,
}

impl QuestionnaireController {
    pub fn new(questions: QuestionSet, settings: StabilizerSettings) -> Self {
        Self {
            session_id: SessionId::new(),
            questions,
            letters: GestureStabilizer::new(settings, SymbolSet::YesNoLetters),
            settings,
            phase: SessionPhase::SelectingModality,
            modality: None,
            answers: AnswerMap::new(),
            digit_entry: None,
            outcome: None,
            events: Vec::new(),
        }
    }

    /// Chooses gesture or speech input and asks the first question.
    ///
    /// # Errors
    ///
    /// `ProtocolViolation` unless the session is still selecting a modality.
    pub fn select_modality(&mut self, modality: Modality) -> Result<(), QuestionnaireError> {
        if self.phase != SessionPhase::SelectingModality {
            return Err(self.violation(format!(
                "cannot switch to {} modality in phase {:?}",
                modality, self.phase
            )));
        }
        info!(session_id = %self.session_id, %modality, "modality selected");
        self.modality = Some(modality);
        self.ask(0)
    }

    /// Feeds one classifier sample for the open question.
    ///
    /// # Errors
    ///
    /// `ProtocolViolation` if no question is open or the session is not in
    /// gesture mode. `IncompleteFactSet` if the final evaluation fails.
    pub fn on_frame(&mut self, sample: &DetectionSample) -> Result<StepOutcome, QuestionnaireError> {
        let question = self.open_question(Modality::Gesture)?;

        if question.kind == QuestionKind::YesNo {
            return match self.letters.observe(sample) {
                Some(symbol) => self.submit(&question, &symbol),
                None => Ok(StepOutcome::Pending),
            };
        }

        let progress = match self.digit_entry.as_mut() {
            Some(entry) => entry.on_sample(sample),
            None => {
                return Err(self.violation(format!(
                    "no digit entry active for question {}",
                    question.id
                )))
            }
        };

        match progress {
            Ok(DigitEntryProgress::Pending) => Ok(StepOutcome::Pending),
            Ok(DigitEntryProgress::CountAccepted(count)) => {
                self.push(KioskEvent::feedback(format!(
                    "Now sign {} digit{}, one at a time.",
                    count,
                    if count == 1 { "" } else { "s" }
                )));
                Ok(StepOutcome::Progress)
            }
            Ok(DigitEntryProgress::DigitAccepted { digit, entered, expected }) => {
                self.push(KioskEvent::feedback(format!(
                    "Digit {} accepted ({} of {}).",
                    digit, entered, expected
                )));
                Ok(StepOutcome::Progress)
            }
            Ok(DigitEntryProgress::Complete(digits)) => self.submit(&question, &digits),
            Err(DigitEntryError::CountOutOfRange(_)) => {
                Ok(self.reject(RejectReason::CountOutOfRange))
            }
            Err(err) => Err(self.violation(err.to_string())),
        }
    }

    /// Feeds one transcript (or a listen timeout) for the open question.
    ///
    /// # Errors
    ///
    /// `ProtocolViolation` if no question is open or the session is not in
    /// speech mode. `IncompleteFactSet` if the final evaluation fails.
    pub fn on_transcript(
        &mut self,
        transcript: Option<&str>,
    ) -> Result<StepOutcome, QuestionnaireError> {
        let question = self.open_question(Modality::Speech)?;
        match transcript.map(str::trim).filter(|text| !text.is_empty()) {
            Some(text) => self.submit(&question, text),
            None => Ok(self.reject(RejectReason::RecognitionMiss)),
        }
    }

    /// Abandons the session, releasing all capture state.
    pub fn abort(&mut self) -> Result<(), QuestionnaireError> {
        self.phase = self.phase.transition_to(SessionPhase::Aborted)?;
        info!(session_id = %self.session_id, answered = self.answers.len(), "session aborted");
        self.clear_capture();
        self.answers.clear();
        Ok(())
    }

    /// Starts a fresh session with a new id, keeping the question set.
    pub fn reset(&mut self) {
        debug!(session_id = %self.session_id, "session reset");
        self.session_id = SessionId::new();
        self.phase = SessionPhase::SelectingModality;
        self.modality = None;
        self.answers.clear();
        self.outcome = None;
        self.events.clear();
        self.clear_capture();
    }

    /// Drains the queued presentation events in emission order.
    pub fn take_events(&mut self) -> Vec<PresentationEvent> {
        std::mem::take(&mut self.events)
    }

    /// Vocabulary the classifier should run for the open question.
    pub fn expected_vocabulary(&self) -> Option<Vocabulary> {
        if self.modality != Some(Modality::Gesture) {
            return None;
        }
        let index = match self.phase {
            SessionPhase::AwaitingAnswer(index) => index,
            _ => return None,
        };
        self.questions.get(index).map(|q| match q.kind {
            QuestionKind::YesNo => Vocabulary::Letters,
            QuestionKind::Number | QuestionKind::DigitCount => Vocabulary::Digits,
        })
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn modality(&self) -> Option<Modality> {
        self.modality
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.phase
            .question_index()
            .and_then(|index| self.questions.get(index))
    }

    pub fn digit_entry_state(&self) -> Option<&DigitEntryState> {
        self.digit_entry.as_ref().map(DigitEntryProtocol::state)
    }

    pub fn outcome(&self) -> Option<ExemptionCategory> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    // ------------------------------------------------------------------

    fn open_question(&self, source: Modality) -> Result<Question, QuestionnaireError> {
        let index = match self.phase {
            SessionPhase::AwaitingAnswer(index) => index,
            phase => {
                return Err(self.violation(format!(
                    "{} input received in phase {:?}",
                    source, phase
                )))
            }
        };
        if self.modality != Some(source) {
            return Err(self.violation(format!(
                "{} input received in a {} session",
                source,
                self.modality.map_or("unselected".to_string(), |m| m.to_string())
            )));
        }
        self.questions
            .get(index)
            .cloned()
            .ok_or_else(|| self.violation(format!("no question at index {}", index)))
    }

    fn ask(&mut self, index: usize) -> Result<(), QuestionnaireError> {
        let question = self
            .questions
            .get(index)
            .cloned()
            .ok_or_else(|| self.violation(format!("no question at index {}", index)))?;

        self.phase = self.phase.transition_to(SessionPhase::AskingQuestion(index))?;
        info!(session_id = %self.session_id, question_id = %question.id, "asking question");
        self.push(KioskEvent::PromptChanged {
            question_id: question.id,
            text: question.text.clone(),
        });

        // The hand that answered the previous question may still be in frame.
        let letter_held = self.letters.awaiting_hand_removal();
        let digit_held = self
            .digit_entry
            .take()
            .is_some_and(|entry| entry.state().hand_present);

        if self.modality == Some(Modality::Gesture) {
            let mode = match question.kind {
                QuestionKind::YesNo => {
                    if digit_held {
                        self.letters.arm_hand_removal_guard();
                    }
                    None
                }
                QuestionKind::Number => Some(DigitEntryMode::CountThenDigits),
                QuestionKind::DigitCount => Some(DigitEntryMode::SingleDigit),
            };
            if let Some(mode) = mode {
                self.letters.reset();
                let entry = DigitEntryProtocol::new(mode, self.settings);
                self.digit_entry = Some(if letter_held || digit_held {
                    entry.with_hand_in_frame()
                } else {
                    entry
                });
            }
        }

        self.phase = self.phase.transition_to(SessionPhase::AwaitingAnswer(index))?;
        Ok(())
    }

    /// Normalizes and bound-checks a raw answer for `question`.
    fn submit(&mut self, question: &Question, raw: &str) -> Result<StepOutcome, QuestionnaireError> {
        let Some(value) = AnswerNormalizer::normalize(raw, question.kind) else {
            debug!(question_id = %question.id, raw, "answer not recognized");
            return Ok(self.reject(RejectReason::UnrecognizedAnswer {
                expected: question.kind,
            }));
        };

        if let (Some(bounds), Some(number)) = (question.bounds, value.as_number()) {
            if !bounds.contains(number) {
                debug!(question_id = %question.id, number, "answer out of range");
                return Ok(self.reject(RejectReason::OutOfRange {
                    min: bounds.min,
                    max: bounds.max,
                }));
            }
        }

        self.record(question, value)
    }

    fn record(
        &mut self,
        question: &Question,
        value: AnswerValue,
    ) -> Result<StepOutcome, QuestionnaireError> {
        let index = self.phase.question_index().unwrap_or_default();
        self.answers.insert(question.id, value);
        info!(session_id = %self.session_id, question_id = %question.id, %value, "answer recorded");
        self.push(KioskEvent::AnswerRecorded {
            question_id: question.id,
            value,
            auto_filled: false,
        });
        self.phase = self.phase.transition_to(SessionPhase::AnsweredAdvancing(index))?;

        self.apply_skip_rules(question.role, value);

        match self.advance(index)? {
            Some(category) => Ok(StepOutcome::Completed(category)),
            None => Ok(StepOutcome::Answered {
                question_id: question.id,
                value,
            }),
        }
    }

    fn apply_skip_rules(&mut self, role: QuestionRole, value: AnswerValue) {
        match (role, value) {
            (QuestionRole::Married, AnswerValue::No) => {
                self.auto_fill(QuestionRole::ChildrenCount, AnswerValue::Number(0));
                self.auto_fill(QuestionRole::SpouseWorks, AnswerValue::No);
                self.auto_fill(QuestionRole::SpouseSalary, AnswerValue::Number(0));
                self.auto_fill(QuestionRole::JointFiling, AnswerValue::No);
            }
            (QuestionRole::SpouseWorks, AnswerValue::No) => {
                self.auto_fill(QuestionRole::SpouseSalary, AnswerValue::Number(0));
            }
            _ => {}
        }
    }

    fn auto_fill(&mut self, role: QuestionRole, value: AnswerValue) {
        let Some(question_id) = self.questions.by_role(role).map(|q| q.id) else {
            return;
        };
        if self.answers.contains(question_id) {
            return;
        }
        self.answers.insert(question_id, value);
        debug!(session_id = %self.session_id, %question_id, %value, "answer auto-filled");
        self.push(KioskEvent::AnswerRecorded {
            question_id,
            value,
            auto_filled: true,
        });
    }

    fn advance(&mut self, from: usize) -> Result<Option<ExemptionCategory>, QuestionnaireError> {
        let next = (from + 1..self.questions.len()).find(|&index| {
            self.questions
                .get(index)
                .is_some_and(|q| !self.answers.contains(q.id))
        });

        match next {
            Some(index) => {
                self.ask(index)?;
                Ok(None)
            }
            None => self.evaluate().map(Some),
        }
    }

    fn evaluate(&mut self) -> Result<ExemptionCategory, QuestionnaireError> {
        self.phase = self.phase.transition_to(SessionPhase::Evaluating)?;
        self.clear_capture();

        let facts = self.answers.to_facts(&self.questions);
        let category = RuleEngine::evaluate(&facts).map_err(|err| {
            error!(session_id = %self.session_id, error = %err, "rule evaluation failed");
            QuestionnaireError::from(err)
        })?;

        self.outcome = Some(category);
        self.phase = self.phase.transition_to(SessionPhase::Done)?;
        info!(session_id = %self.session_id, %category, "result ready");
        self.push(KioskEvent::result_ready(category));
        Ok(category)
    }

    fn reject(&mut self, reason: RejectReason) -> StepOutcome {
        if let Some(entry) = self.digit_entry.as_mut() {
            entry.restart();
        }
        self.push(KioskEvent::rejected(reason));
        StepOutcome::Rejected(reason)
    }

    fn clear_capture(&mut self) {
        self.letters.reset();
        self.digit_entry = None;
    }

    fn push(&mut self, event: KioskEvent) {
        self.events
            .push(PresentationEvent::new(self.session_id, event));
    }

    fn violation(&self, message: String) -> QuestionnaireError {
        warn!(session_id = %self.session_id, phase = ?self.phase, "{}", message);
        QuestionnaireError::protocol_violation(message)
    }
}
