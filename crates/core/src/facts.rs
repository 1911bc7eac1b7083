//! Facts and the per-session fact store.
//!
//! A [`Fact`] is either an observed symptom or a diagnosis derived by a rule. The
//! [`FactStore`] is the working memory of one inference session: facts are only ever added,
//! never retracted, and asserting a fact that is already present has no effect.

use cardio_types::{DiagnosisId, SymptomId};
use std::collections::BTreeSet;

/// An atomic piece of asserted knowledge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fact {
    /// The patient presents this symptom.
    Symptom(SymptomId),
    /// A rule has concluded this diagnosis.
    Diagnosis(DiagnosisId),
}

impl Fact {
    pub fn symptom(id: SymptomId) -> Self {
        Fact::Symptom(id)
    }

    pub fn diagnosis(id: DiagnosisId) -> Self {
        Fact::Diagnosis(id)
    }

    pub fn as_diagnosis(&self) -> Option<&DiagnosisId> {
        match self {
            Fact::Diagnosis(id) => Some(id),
            Fact::Symptom(_) => None,
        }
    }
}

impl std::fmt::Display for Fact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Fact::Symptom(id) => write!(f, "symptom:{id}"),
            Fact::Diagnosis(id) => write!(f, "diagnosis:{id}"),
        }
    }
}

/// Working set of facts for a single session.
#[derive(Debug, Default, Clone)]
pub struct FactStore {
    facts: BTreeSet<Fact>,
}

impl FactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fact to the store.
    ///
    /// # Returns
    /// `true` if the fact was not present before, `false` if it was already asserted.
    pub fn assert(&mut self, fact: Fact) -> bool {
        self.facts.insert(fact)
    }

    pub fn contains(&self, fact: &Fact) -> bool {
        self.facts.contains(fact)
    }

    /// Returns true when every fact yielded by `facts` is present.
    pub fn contains_all<'a>(&self, facts: impl IntoIterator<Item = &'a Fact>) -> bool {
        facts.into_iter().all(|fact| self.facts.contains(fact))
    }

    /// Read-only snapshot of all asserted facts.
    pub fn all(&self) -> BTreeSet<Fact> {
        self.facts.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fact> {
        self.facts.iter()
    }

    /// Diagnosis facts currently in the store, in identifier order.
    pub fn diagnoses(&self) -> impl Iterator<Item = &DiagnosisId> {
        self.facts.iter().filter_map(Fact::as_diagnosis)
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Clears every fact so the store can be reused for another patient.
    pub fn reset(&mut self) {
        self.facts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symptom(id: &str) -> Fact {
        Fact::symptom(SymptomId::new(id).unwrap())
    }

    #[test]
    fn test_assert_reports_new_facts_only() {
        let mut store = FactStore::new();

        assert!(store.assert(symptom("Fatiga")));
        assert!(!store.assert(symptom("Fatiga")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_contains_all_requires_every_fact() {
        let mut store = FactStore::new();
        store.assert(symptom("Fatiga"));

        let conditions = [symptom("Fatiga"), symptom("Dolor_muscular")];
        assert!(!store.contains_all(&conditions));

        store.assert(symptom("Dolor_muscular"));
        assert!(store.contains_all(&conditions));
    }

    #[test]
    fn test_symptom_and_diagnosis_with_same_name_are_distinct() {
        let mut store = FactStore::new();
        store.assert(symptom("angina"));

        let diagnosis = Fact::diagnosis(DiagnosisId::new("angina").unwrap());
        assert!(!store.contains(&diagnosis));
        assert!(store.assert(diagnosis));
        assert_eq!(store.diagnoses().count(), 1);
    }

    #[test]
    fn test_snapshot_is_detached_from_store() {
        let mut store = FactStore::new();
        store.assert(symptom("mareo"));

        let snapshot = store.all();
        store.assert(symptom("fatiga"));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_reset_clears_store() {
        let mut store = FactStore::new();
        store.assert(symptom("mareo"));
        store.reset();

        assert!(store.is_empty());
        assert!(!store.contains(&symptom("mareo")));
    }

    #[test]
    fn test_fact_display() {
        assert_eq!(symptom("mareo").to_string(), "symptom:mareo");
        let d = Fact::diagnosis(DiagnosisId::new("infarto").unwrap());
        assert_eq!(d.to_string(), "diagnosis:infarto");
    }
}
