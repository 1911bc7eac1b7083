//! Interactive yes/no questionnaire.
//!
//! Walks a symptom catalog one prompt at a time and collects the identifiers the patient
//! answers "yes" to, in catalog order.

use cardio_core::{SymptomCatalog, SymptomId};
use std::io::{BufRead, Write};

#[derive(Debug, thiserror::Error)]
pub enum QuestionnaireError {
    #[error("failed to read answer: {0}")]
    Read(std::io::Error),
    #[error("failed to write prompt: {0}")]
    Write(std::io::Error),
    #[error("input ended before question {0} was answered")]
    UnexpectedEof(usize),
}

/// Parses a yes/no answer. Returns `None` for anything unrecognised.
pub fn parse_answer(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "si" | "sí" | "s" | "yes" | "y" => Some(true),
        "no" | "n" => Some(false),
        _ => None,
    }
}

/// Step-by-step questionnaire state.
#[derive(Debug)]
pub struct Questionnaire<'a> {
    catalog: &'a SymptomCatalog,
    index: usize,
    affirmed: Vec<SymptomId>,
}

impl<'a> Questionnaire<'a> {
    pub fn new(catalog: &'a SymptomCatalog) -> Self {
        Self {
            catalog,
            index: 0,
            affirmed: Vec::new(),
        }
    }

    /// Prompt for the current question, or `None` once every question is answered.
    pub fn current_prompt(&self) -> Option<&str> {
        self.catalog
            .entries()
            .get(self.index)
            .map(|entry| entry.prompt.as_str())
    }

    /// Records the answer to the current question and moves to the next one.
    pub fn answer(&mut self, present: bool) {
        if let Some(entry) = self.catalog.entries().get(self.index) {
            if present {
                self.affirmed.push(entry.id.clone());
            }
            self.index += 1;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.catalog.len()
    }

    /// Symptoms answered "yes", in catalog order.
    pub fn into_symptoms(self) -> Vec<SymptomId> {
        self.affirmed
    }

    /// Runs the whole questionnaire over the given reader and writer.
    ///
    /// Unrecognised answers repeat the question.
    pub fn run<R: BufRead, W: Write>(
        mut self,
        input: &mut R,
        output: &mut W,
    ) -> Result<Vec<SymptomId>, QuestionnaireError> {
        let mut line = String::new();
        while !self.is_finished() {
            let Some(prompt) = self.current_prompt() else {
                break;
            };
            write!(output, "{prompt}? [si/no] ").map_err(QuestionnaireError::Write)?;
            output.flush().map_err(QuestionnaireError::Write)?;

            line.clear();
            let read = input.read_line(&mut line).map_err(QuestionnaireError::Read)?;
            if read == 0 {
                return Err(QuestionnaireError::UnexpectedEof(self.index + 1));
            }

            match parse_answer(&line) {
                Some(present) => self.answer(present),
                None => writeln!(output, "Responda 'si' o 'no'.").map_err(QuestionnaireError::Write)?,
            }
        }
        Ok(self.into_symptoms())
    }
}
