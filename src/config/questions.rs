//! Loading question definitions from YAML.
//!
//! The file is a list of questions in display order:
//!
//! ```yaml
//! - id: 0
//!   text: Are you married?
//!   kind: yes_no
//!   role: married
//! - id: 5
//!   text: What is your salary amount?
//!   kind: number
//!   role: salary
//!   min: 1
//!   max: 99999
//! ```
//!
//! `min` and `max` are inclusive and only valid on numeric questions.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::questionnaire::{
    NumericBounds, Question, QuestionId, QuestionKind, QuestionRole, QuestionSet,
    QuestionnaireError,
};

/// Errors from reading a question file
#[derive(Debug, Error)]
pub enum QuestionFileError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed question YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error(transparent)]
    Invalid(#[from] QuestionnaireError),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct QuestionRecord {
    id: QuestionId,
    text: String,
    kind: QuestionKind,
    role: QuestionRole,
    min: Option<u64>,
    max: Option<u64>,
}

impl From<QuestionRecord> for Question {
    fn from(record: QuestionRecord) -> Self {
        let bounds = match (record.min, record.max) {
            (None, None) => None,
            (min, max) => Some(NumericBounds::new(
                min.unwrap_or(0),
                max.unwrap_or(u64::MAX),
            )),
        };
        Question {
            id: record.id,
            text: record.text,
            kind: record.kind,
            role: record.role,
            bounds,
        }
    }
}

/// Parses and validates a YAML question list.
pub fn parse_questions(yaml: &str) -> Result<QuestionSet, QuestionFileError> {
    let records: Vec<QuestionRecord> = serde_yaml::from_str(yaml)?;
    Ok(QuestionSet::new(records.into_iter().map(Question::from).collect())?)
}

/// Reads a question file, or returns the built-in set when no path is given.
pub fn load_questions(path: Option<&Path>) -> Result<QuestionSet, QuestionFileError> {
    let Some(path) = path else {
        return Ok(QuestionSet::standard());
    };
    let yaml = std::fs::read_to_string(path).map_err(|source| QuestionFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let questions = parse_questions(&yaml)?;
    tracing::info!(path = %path.display(), count = questions.len(), "Loaded question set");
    Ok(questions)
}
