//! Inference sessions and the engine façade.
//!
//! [`Engine`] is the entry point used by the questionnaire and HTTP layers. Every call to
//! [`Engine::infer`] builds a fresh [`Session`] with its own fact store, so one engine can
//! serve any number of patients concurrently; only the read-only rule registry is shared.

use crate::facts::{Fact, FactStore};
use crate::matcher::{Firing, Matcher};
use crate::resolution::{Diagnosis, LatestWins, ResolutionPolicy};
use crate::rules::RuleRegistry;
use cardio_types::SymptomId;
use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Full result of an inference run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inference {
    /// The diagnosis chosen by the resolution policy.
    pub diagnosis: Diagnosis,
    /// Every rule that fired, in assertion order.
    pub firings: Vec<Firing>,
    /// All facts present when the matcher stopped.
    pub facts: BTreeSet<Fact>,
    /// Matcher passes executed.
    pub passes: usize,
}

/// One inference run for one patient.
///
/// A session owns its fact store exclusively and borrows the registry read-only.
#[derive(Debug)]
pub struct Session<'a> {
    registry: &'a RuleRegistry,
    store: FactStore,
    max_passes: Option<NonZeroUsize>,
}

impl<'a> Session<'a> {
    pub fn new(registry: &'a RuleRegistry) -> Self {
        Self {
            registry,
            store: FactStore::new(),
            max_passes: None,
        }
    }

    /// Overrides the matcher pass limit (default: number of rules).
    pub fn with_max_passes(mut self, max_passes: NonZeroUsize) -> Self {
        self.max_passes = Some(max_passes);
        self
    }

    /// Clears the fact store so the session can be reused for another patient.
    pub fn reset(&mut self) {
        self.store.reset();
    }

    /// Asserts one symptom fact per identifier.
    ///
    /// Identifiers match exactly: blank ones are skipped, and ones with surrounding
    /// whitespace are treated as unknown. Unknown identifiers never satisfy a rule.
    /// Returns the number of new facts.
    pub fn assert_symptoms<I, S>(&mut self, symptoms: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for raw in symptoms {
            let raw = raw.as_ref();
            match SymptomId::new(raw) {
                Ok(id) if id.as_str() == raw => {
                    if self.store.assert(Fact::Symptom(id)) {
                        added += 1;
                    }
                }
                Ok(_) => tracing::trace!(symptom = raw, "skipping padded symptom identifier"),
                Err(_) => tracing::trace!("skipping blank symptom identifier"),
            }
        }
        added
    }

    pub fn facts(&self) -> &FactStore {
        &self.store
    }

    /// Runs the matcher to fixpoint and resolves the reported diagnosis.
    pub fn run(&mut self, policy: &dyn ResolutionPolicy) -> Inference {
        let matcher = match self.max_passes {
            Some(limit) => Matcher::new(self.registry).with_max_passes(limit),
            None => Matcher::new(self.registry),
        };
        let run = matcher.run(&mut self.store);
        let diagnosis = policy.resolve(&run.firings);

        Inference {
            diagnosis,
            firings: run.firings,
            facts: self.store.all(),
            passes: run.passes,
        }
    }
}

/// Shared inference engine.
///
/// Cloning is cheap; clones share the registry and policy.
#[derive(Debug, Clone)]
pub struct Engine {
    registry: Arc<RuleRegistry>,
    policy: Arc<dyn ResolutionPolicy>,
    max_passes: Option<NonZeroUsize>,
}

impl Engine {
    /// Creates an engine using the [`LatestWins`] policy.
    pub fn new(registry: Arc<RuleRegistry>) -> Self {
        Self {
            registry,
            policy: Arc::new(LatestWins),
            max_passes: None,
        }
    }

    /// Replaces the resolution policy.
    pub fn with_policy(mut self, policy: Arc<dyn ResolutionPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Overrides the matcher pass limit (default: number of rules).
    pub fn with_max_passes(mut self, max_passes: NonZeroUsize) -> Self {
        self.max_passes = Some(max_passes);
        self
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Opens a fresh session against this engine's registry.
    pub fn session(&self) -> Session<'_> {
        let session = Session::new(&self.registry);
        match self.max_passes {
            Some(limit) => session.with_max_passes(limit),
            None => session,
        }
    }

    /// Infers a diagnosis from the given symptom identifiers.
    ///
    /// Empty or entirely unknown input yields [`Diagnosis::Undetermined`].
    pub fn infer<I, S>(&self, symptoms: I) -> Diagnosis
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.infer_detailed(symptoms).diagnosis
    }

    /// Like [`Engine::infer`], but also returns the firing trace and final fact set.
    pub fn infer_detailed<I, S>(&self, symptoms: I) -> Inference
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut session = self.session();
        session.reset();
        let asserted = session.assert_symptoms(symptoms);
        let inference = session.run(self.policy.as_ref());

        tracing::debug!(
            symptoms = asserted,
            fired = inference.firings.len(),
            passes = inference.passes,
            diagnosis = %inference.diagnosis,
            "inference complete"
        );
        inference
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Arc::new(RuleRegistry::builtin()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolution::MostSpecific;

    const INFARTO: [&str; 8] = [
        "Molestias_fisicas",
        "Sudoracion",
        "Dolor_muscular",
        "Nauseas",
        "Aturdimiento_mareos",
        "Falta_aire",
        "Fatiga",
        "dolor_pecho",
    ];

    fn determined(id: &str) -> Diagnosis {
        Diagnosis::Determined(id.parse().unwrap())
    }

    #[test]
    fn test_empty_input_is_undetermined() {
        let engine = Engine::default();
        assert_eq!(engine.infer(Vec::<String>::new()), Diagnosis::Undetermined);
    }

    #[test]
    fn test_unknown_symptom_is_undetermined() {
        let engine = Engine::default();
        assert_eq!(engine.infer(["not_a_real_symptom"]), Diagnosis::Undetermined);
    }

    #[test]
    fn test_single_full_match_angina() {
        let engine = Engine::default();
        let diagnosis = engine.infer([
            "Molestias_fisicas",
            "Sudoracion",
            "Dolor_muscular",
            "dolor_pecho",
        ]);
        assert_eq!(diagnosis, determined("angina"));
    }

    #[test]
    fn test_latest_asserted_diagnosis_wins() {
        let engine = Engine::default();
        let inference = engine.infer_detailed(INFARTO);

        let fired: Vec<&str> = inference.firings.iter().map(|f| f.rule.as_str()).collect();
        assert_eq!(fired, ["angina", "infarto", "exceso_colesterol"]);
        assert_eq!(inference.diagnosis, determined("Exceso de colesterol"));
    }

    #[test]
    fn test_policy_can_be_replaced() {
        let registry = Arc::new(RuleRegistry::builtin());
        let engine =
            Engine::new(registry.clone()).with_policy(Arc::new(MostSpecific::new(&registry)));

        assert_eq!(engine.infer(INFARTO), determined("infarto"));
    }

    #[test]
    fn test_inference_is_deterministic() {
        let engine = Engine::default();
        let input = ["Fatiga", "Dolor_muscular", "Cambio_ritmo_cardiaco"];

        assert_eq!(engine.infer_detailed(input), engine.infer_detailed(input));
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let engine = Engine::default();
        let mut reversed = INFARTO;
        reversed.reverse();

        assert_eq!(engine.infer(INFARTO), engine.infer(reversed));
        assert_eq!(
            engine.infer(["Cambio_ritmo_cardiaco", "Fatiga", "Dolor_muscular"]),
            engine.infer(["Dolor_muscular", "Cambio_ritmo_cardiaco", "Fatiga"]),
        );
    }

    #[test]
    fn test_adding_symptoms_never_removes_diagnoses() {
        let engine = Engine::default();
        let base = ["Fatiga", "Dolor_muscular"];
        let mut extended = base.to_vec();
        extended.push("Cambio_ritmo_cardiaco");

        let before: Vec<_> = engine
            .infer_detailed(base)
            .firings
            .into_iter()
            .map(|f| f.diagnosis)
            .collect();
        let after: Vec<_> = engine
            .infer_detailed(&extended)
            .firings
            .into_iter()
            .map(|f| f.diagnosis)
            .collect();

        assert!(before.iter().all(|d| after.contains(d)));
        assert_eq!(after.len(), 2);
        // Under latest-wins the reported diagnosis may change as symptoms are added.
        assert_eq!(engine.infer(&extended), determined("Exceso de colesterol"));
        assert_eq!(engine.infer(["Cambio_ritmo_cardiaco"]), determined("Transtorno de ritmo cardiaco"));
    }

    #[test]
    fn test_repeated_symptom_is_idempotent() {
        let engine = Engine::default();
        let once = engine.infer_detailed(["Fatiga", "Dolor_muscular"]);
        let twice = engine.infer_detailed(["Fatiga", "Fatiga", "Dolor_muscular", "Dolor_muscular"]);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_blank_identifiers_are_skipped() {
        let engine = Engine::default();
        let inference = engine.infer_detailed(["", "  ", "Fatiga", "Dolor_muscular"]);

        assert_eq!(inference.diagnosis, determined("Exceso de colesterol"));
        assert_eq!(inference.facts.len(), 3);
    }

    #[test]
    fn test_padded_identifiers_do_not_match() {
        let engine = Engine::default();
        let inference = engine.infer_detailed([" Fatiga ", "Dolor_muscular\n"]);

        assert_eq!(inference.diagnosis, Diagnosis::Undetermined);
        assert!(inference.facts.is_empty());
        assert_eq!(
            engine.infer(["Fatiga ", "Dolor_muscular"]),
            Diagnosis::Undetermined
        );
    }

    #[test]
    fn test_smallest_pass_limit_still_fires_first_pass() {
        let engine = Engine::default().with_max_passes(NonZeroUsize::MIN);
        let inference = engine.infer_detailed(["Fatiga", "Dolor_muscular"]);

        assert_eq!(inference.diagnosis, determined("Exceso de colesterol"));
        assert_eq!(inference.passes, 1);
    }

    #[test]
    fn test_yaml_rules_chain_through_engine() {
        let yaml = r#"
rules:
  - name: arritmia_con_mareo
    conditions:
      - diagnosis: arritmia
      - symptom: mareo
    diagnosis: arritmia grave
  - name: arritmia
    conditions:
      - symptom: palpitaciones
    diagnosis: arritmia
"#;
        let registry = RuleRegistry::from_yaml_str(yaml).unwrap();
        let engine = Engine::new(Arc::new(registry));

        let inference = engine.infer_detailed(["palpitaciones", "mareo"]);
        let fired: Vec<(&str, usize)> = inference
            .firings
            .iter()
            .map(|f| (f.rule.as_str(), f.pass))
            .collect();
        assert_eq!(fired, [("arritmia", 1), ("arritmia_con_mareo", 2)]);
        assert_eq!(inference.diagnosis, determined("arritmia grave"));
        assert_eq!(engine.infer(["mareo"]), Diagnosis::Undetermined);
    }

    #[test]
    fn test_questionnaire_symptoms_never_reach_most_rules() {
        // The questionnaire catalog uses lowercase ids that the rules mostly do not reference.
        let engine = Engine::default();
        let diagnosis = engine.infer([
            "dolor_pecho",
            "dificultad_respirar",
            "falta_aire",
            "dolor_muscular",
            "mareo",
            "fatiga",
            "palpitaciones",
            "hinchazon_tobillos",
        ]);
        assert_eq!(diagnosis, Diagnosis::Undetermined);
    }

    #[test]
    fn test_session_reset_isolates_patients() {
        let registry = RuleRegistry::builtin();
        let mut session = Session::new(&registry);

        session.assert_symptoms(["Cambio_ritmo_cardiaco"]);
        let first = session.run(&LatestWins);
        assert!(first.diagnosis.is_determined());

        session.reset();
        session.assert_symptoms(["mareo"]);
        let second = session.run(&LatestWins);
        assert_eq!(second.diagnosis, Diagnosis::Undetermined);
        assert!(session.facts().diagnoses().next().is_none());
    }

    #[test]
    fn test_engine_is_shared_across_threads() {
        let engine = Engine::default();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let engine = &engine;
                    scope.spawn(move || {
                        if i % 2 == 0 {
                            engine.infer(["Cambio_ritmo_cardiaco"])
                        } else {
                            engine.infer(["Fatiga", "Dolor_muscular"])
                        }
                    })
                })
                .collect();

            for (i, handle) in handles.into_iter().enumerate() {
                let expected = if i % 2 == 0 {
                    determined("Transtorno de ritmo cardiaco")
                } else {
                    determined("Exceso de colesterol")
                };
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
