//! Symptom and diagnosis catalogs.
//!
//! These are the lookup tables the presentation layers need around the engine: which
//! symptoms to ask about, and how to describe a diagnosis once one is reached. The engine
//! itself never reads them.

use crate::rules::{Rule, RuleRegistry};
use crate::{CoreError, CoreResult};
use cardio_types::{DiagnosisId, SymptomId};
use std::collections::HashSet;
use std::str::FromStr;

/// Which symptom catalog the questionnaire walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogMode {
    /// The eight-question patient questionnaire. Most built-in rules reference
    /// symptoms outside it and can never fire from questionnaire answers.
    #[default]
    Questionnaire,
    /// One question per symptom referenced by the rule table.
    RuleVocabulary,
}

impl FromStr for CatalogMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "questionnaire" => Ok(CatalogMode::Questionnaire),
            "rules" | "rule_vocabulary" => Ok(CatalogMode::RuleVocabulary),
            other => Err(CoreError::InvalidCatalogMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SymptomEntry {
    pub id: SymptomId,
    pub prompt: String,
}

/// Ordered list of symptoms to ask about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymptomCatalog {
    entries: Vec<SymptomEntry>,
}

impl SymptomCatalog {
    pub fn new(entries: Vec<SymptomEntry>) -> Self {
        Self { entries }
    }

    /// The eight-question cardiovascular questionnaire, in the order it is asked.
    pub fn questionnaire() -> Self {
        const ENTRIES: &[(&str, &str)] = &[
            ("dolor_pecho", "Dolor en el pecho"),
            ("dificultad_respirar", "Dificultad para respirar"),
            ("falta_aire", "Falta de aire"),
            ("dolor_muscular", "Dolor muscular"),
            ("mareo", "Mareo"),
            ("fatiga", "Fatiga"),
            ("palpitaciones", "Palpitaciones"),
            ("hinchazon_tobillos", "Hinchazón de tobillos"),
        ];

        let entries = ENTRIES
            .iter()
            .filter_map(|(id, prompt)| {
                SymptomId::new(id).ok().map(|id| SymptomEntry {
                    id,
                    prompt: (*prompt).to_string(),
                })
            })
            .collect();
        Self { entries }
    }

    /// One entry per symptom referenced by `registry`, in first-seen order.
    ///
    /// Prompts are derived from the identifier (`Dolor_muscular` → `Dolor muscular`).
    pub fn from_rules(registry: &RuleRegistry) -> Self {
        let entries = registry
            .symptom_vocabulary()
            .into_iter()
            .map(|id| {
                let prompt = humanise(id.as_str());
                SymptomEntry { id, prompt }
            })
            .collect();
        Self { entries }
    }

    pub fn for_mode(mode: CatalogMode, registry: &RuleRegistry) -> Self {
        match mode {
            CatalogMode::Questionnaire => Self::questionnaire(),
            CatalogMode::RuleVocabulary => Self::from_rules(registry),
        }
    }

    pub fn entries(&self) -> &[SymptomEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &SymptomId) -> bool {
        self.entries.iter().any(|entry| &entry.id == id)
    }

    /// Rules with at least one symptom condition this catalog never asks about.
    pub fn unreachable_rules<'r>(&self, registry: &'r RuleRegistry) -> Vec<&'r Rule> {
        let known: HashSet<&SymptomId> = self.entries.iter().map(|entry| &entry.id).collect();
        registry
            .rules()
            .iter()
            .filter(|rule| rule.symptom_conditions().any(|id| !known.contains(id)))
            .collect()
    }
}

fn humanise(id: &str) -> String {
    let spaced = id.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => spaced,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DiagnosisInfo {
    pub id: DiagnosisId,
    pub description: String,
    pub treatment: String,
}

/// Descriptions and recommended treatment keyed by diagnosis identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosisCatalog {
    entries: Vec<DiagnosisInfo>,
}

impl DiagnosisCatalog {
    pub fn new(entries: Vec<DiagnosisInfo>) -> Self {
        Self { entries }
    }

    /// Built-in metadata for every diagnosis the default rules can produce, plus `arritmia`.
    pub fn builtin() -> Self {
        const ENTRIES: &[(&str, &str, &str)] = &[
            ("angina", "Angina", "Tratamiento para la angina"),
            ("infarto", "Infarto", "Tratamiento para el infarto"),
            (
                "insuficiencia_cardiaca",
                "Insuficiencia cardíaca",
                "Tratamiento para insuficiencia cardíaca",
            ),
            ("arritmia", "Arritmia", "Tratamiento para la arritmia"),
            (
                "hipertension arterial",
                "Hipertensión arterial",
                "Tratamiento para la hipertensión arterial",
            ),
            (
                "Transtorno de ritmo cardiaco",
                "Trastorno del ritmo cardíaco",
                "Tratamiento para el trastorno del ritmo cardíaco",
            ),
            (
                "Exceso de colesterol",
                "Exceso de colesterol",
                "Tratamiento para el exceso de colesterol",
            ),
        ];

        let entries = ENTRIES
            .iter()
            .filter_map(|(id, description, treatment)| {
                DiagnosisId::new(id).ok().map(|id| DiagnosisInfo {
                    id,
                    description: (*description).to_string(),
                    treatment: (*treatment).to_string(),
                })
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, id: &DiagnosisId) -> Option<&DiagnosisInfo> {
        self.entries.iter().find(|entry| &entry.id == id)
    }

    pub fn entries(&self) -> &[DiagnosisInfo] {
        &self.entries
    }

    /// Looks up metadata by a raw identifier string.
    pub fn lookup(&self, id: &str) -> CoreResult<Option<&DiagnosisInfo>> {
        let id = DiagnosisId::new(id)?;
        Ok(self.get(&id))
    }
}

impl Default for DiagnosisCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
