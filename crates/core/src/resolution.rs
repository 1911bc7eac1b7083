//! Diagnosis resolution policies.
//!
//! The rule table is not mutually exclusive, so a run may assert several diagnoses. A
//! [`ResolutionPolicy`] picks the single diagnosis reported to the caller.

use crate::matcher::Firing;
use cardio_types::DiagnosisId;

/// The diagnosis reported for one inference run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Diagnosis {
    Determined(DiagnosisId),
    Undetermined,
}

impl Diagnosis {
    pub fn id(&self) -> Option<&DiagnosisId> {
        match self {
            Diagnosis::Determined(id) => Some(id),
            Diagnosis::Undetermined => None,
        }
    }

    pub fn is_determined(&self) -> bool {
        matches!(self, Diagnosis::Determined(_))
    }
}

impl std::fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnosis::Determined(id) => write!(f, "{id}"),
            Diagnosis::Undetermined => f.write_str("undetermined"),
        }
    }
}

/// Chooses the reported diagnosis from the firings of a completed run.
pub trait ResolutionPolicy: Send + Sync + std::fmt::Debug {
    /// `firings` lists every asserted diagnosis in assertion order.
    fn resolve(&self, firings: &[Firing]) -> Diagnosis;
}

/// Reports the diagnosis asserted last.
///
/// This does not prefer the most specific rule: a patient matching both `infarto` and the
/// two-symptom `Exceso de colesterol` rule is reported as the latter because it is scanned
/// later. Callers who need clinically ranked output must supply their own policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct LatestWins;

impl ResolutionPolicy for LatestWins {
    fn resolve(&self, firings: &[Firing]) -> Diagnosis {
        firings
            .last()
            .map(|firing| Diagnosis::Determined(firing.diagnosis.clone()))
            .unwrap_or(Diagnosis::Undetermined)
    }
}

/// Reports the diagnosis of the rule with the most conditions, falling back to
/// [`LatestWins`] ordering between equally specific rules.
#[derive(Debug, Clone, Default)]
pub struct MostSpecific {
    condition_counts: std::collections::HashMap<String, usize>,
}

impl MostSpecific {
    /// Captures the condition count of every rule in `registry`.
    pub fn new(registry: &crate::rules::RuleRegistry) -> Self {
        let condition_counts = registry
            .rules()
            .iter()
            .map(|rule| (rule.name().to_string(), rule.conditions().len()))
            .collect();
        Self { condition_counts }
    }
}

impl ResolutionPolicy for MostSpecific {
    fn resolve(&self, firings: &[Firing]) -> Diagnosis {
        let mut best: Option<(&Firing, usize)> = None;
        for firing in firings {
            let specificity = self.condition_counts.get(&firing.rule).copied().unwrap_or(0);
            if best.map_or(true, |(_, current)| specificity >= current) {
                best = Some((firing, specificity));
            }
        }

        best.map(|(firing, _)| Diagnosis::Determined(firing.diagnosis.clone()))
            .unwrap_or(Diagnosis::Undetermined)
    }
}
