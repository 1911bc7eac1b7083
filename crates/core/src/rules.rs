//! Rule registry.
//!
//! Rules are data: a conjunction of condition facts and the diagnosis they conclude. The
//! registry is built once, validated, and then shared read-only by every session. Registry
//! order is the matcher's scan order; it carries no priority.
//!
//! Rule tables can come from the built-in cardiovascular table or from a YAML file:
//!
//! ```yaml
//! rules:
//!   - name: exceso_colesterol
//!     conditions:
//!       - symptom: Fatiga
//!       - symptom: Dolor_muscular
//!     diagnosis: Exceso de colesterol
//! ```

use crate::facts::Fact;
use crate::validation::{validate_rule, validate_rule_table};
use crate::{CoreError, CoreResult};
use cardio_types::{DiagnosisId, SymptomId};
use std::path::Path;

/// A single diagnostic rule.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Rule {
    name: String,
    conditions: Vec<Fact>,
    diagnosis: DiagnosisId,
}

impl Rule {
    /// Creates a validated rule.
    ///
    /// # Errors
    ///
    /// Returns a [`CoreError`] if the name is blank or the rule fails
    /// [`validate_rule`](crate::validation::validate_rule).
    pub fn new(
        name: impl Into<String>,
        conditions: Vec<Fact>,
        diagnosis: DiagnosisId,
    ) -> CoreResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::InvalidInput("rule name cannot be empty".into()));
        }

        let rule = Self {
            name,
            conditions,
            diagnosis,
        };
        validate_rule(&rule)?;
        Ok(rule)
    }

    #[cfg(test)]
    pub(crate) fn unchecked(name: &str, conditions: Vec<Fact>, diagnosis: DiagnosisId) -> Self {
        Self {
            name: name.to_string(),
            conditions,
            diagnosis,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn conditions(&self) -> &[Fact] {
        &self.conditions
    }

    pub fn diagnosis(&self) -> &DiagnosisId {
        &self.diagnosis
    }

    /// The fact asserted when this rule fires.
    pub fn conclusion(&self) -> Fact {
        Fact::Diagnosis(self.diagnosis.clone())
    }

    /// Symptom identifiers among the conditions, in condition order.
    pub fn symptom_conditions(&self) -> impl Iterator<Item = &SymptomId> {
        self.conditions.iter().filter_map(|fact| match fact {
            Fact::Symptom(id) => Some(id),
            Fact::Diagnosis(_) => None,
        })
    }
}

/// The fixed, ordered set of rules shared by all sessions.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
}

impl RuleRegistry {
    /// Builds a registry from an ordered rule list.
    ///
    /// # Errors
    ///
    /// Returns a [`CoreError`] if the table is empty, a rule is malformed or rule names repeat.
    pub fn new(rules: Vec<Rule>) -> CoreResult<Self> {
        validate_rule_table(&rules)?;
        tracing::info!("rule registry loaded with {} rules", rules.len());
        Ok(Self { rules })
    }

    /// The built-in cardiovascular rule table.
    pub fn builtin() -> Self {
        let rules = BUILTIN_RULES
            .iter()
            .map(|(name, symptoms, diagnosis)| Rule {
                name: (*name).to_string(),
                conditions: symptoms
                    .iter()
                    .map(|s| Fact::Symptom(builtin_id(s)))
                    .collect(),
                diagnosis: builtin_id(diagnosis),
            })
            .collect();
        Self { rules }
    }

    /// Parses a YAML rule table.
    pub fn from_yaml_str(yaml: &str) -> CoreResult<Self> {
        let de = serde_yaml::Deserializer::from_str(yaml);
        let table: RuleTableDef = serde_path_to_error::deserialize(de)?;

        let rules = table
            .rules
            .into_iter()
            .map(|def| Rule::new(def.name, def.conditions, def.diagnosis))
            .collect::<CoreResult<Vec<_>>>()?;

        Self::new(rules)
    }

    /// Reads and parses a YAML rule table from disk.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|source| CoreError::RulesFileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Rules in scan order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.name == name)
    }

    /// Every symptom referenced by a rule condition, in first-seen order.
    pub fn symptom_vocabulary(&self) -> Vec<SymptomId> {
        let mut vocabulary: Vec<SymptomId> = Vec::new();
        for id in self.rules.iter().flat_map(Rule::symptom_conditions) {
            if !vocabulary.contains(id) {
                vocabulary.push(id.clone());
            }
        }
        vocabulary
    }
}

#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleTableDef {
    rules: Vec<RuleDef>,
}

#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleDef {
    name: String,
    // `- symptom: Fatiga` rather than the `!symptom Fatiga` tag form.
    #[serde(with = "serde_yaml::with::singleton_map_recursive")]
    conditions: Vec<Fact>,
    diagnosis: DiagnosisId,
}

// Identifiers are literal, case-sensitive, and must match what the questionnaire sends.
const BUILTIN_RULES: &[(&str, &[&str], &str)] = &[
    (
        "angina",
        &["Molestias_fisicas", "Sudoracion", "Dolor_muscular", "dolor_pecho"],
        "angina",
    ),
    (
        "infarto",
        &[
            "Molestias_fisicas",
            "Sudoracion",
            "Dolor_muscular",
            "Nauseas",
            "Aturdimiento_mareos",
            "Falta_aire",
            "Fatiga",
            "dolor_pecho",
        ],
        "infarto",
    ),
    (
        "insuficiencia_cardiaca",
        &["Dolor_muscular", "Fatiga", "Falta_aire", "Retencion_liquidos"],
        "insuficiencia_cardiaca",
    ),
    (
        "hipertension_arterial",
        &[
            "dificultad_respirar",
            "Pitidos_oidos",
            "Vision_borrosa",
            "Nauseas",
            "Cambio_ritmo_cardiaco",
            "dolor_pecho",
        ],
        "hipertension arterial",
    ),
    (
        "transtorno_ritmo_cardiaco",
        &["Cambio_ritmo_cardiaco"],
        "Transtorno de ritmo cardiaco",
    ),
    (
        "exceso_colesterol",
        &["Fatiga", "Dolor_muscular"],
        "Exceso de colesterol",
    ),
];

fn builtin_id<T: std::str::FromStr>(literal: &str) -> T
where
    T::Err: std::fmt::Debug,
{
    literal
        .parse()
        .unwrap_or_else(|e| panic!("built-in identifier {literal:?} is invalid: {e:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_table_is_valid() {
        let registry = RuleRegistry::builtin();
        assert!(validate_rule_table(registry.rules()).is_ok());
    }

    #[test]
    fn test_builtin_scan_order() {
        let registry = RuleRegistry::builtin();
        let names: Vec<&str> = registry.rules().iter().map(Rule::name).collect();
        assert_eq!(
            names,
            [
                "angina",
                "infarto",
                "insuficiencia_cardiaca",
                "hipertension_arterial",
                "transtorno_ritmo_cardiaco",
                "exceso_colesterol",
            ]
        );
    }

    #[test]
    fn test_builtin_diagnosis_identifiers() {
        let registry = RuleRegistry::builtin();
        let rule = registry.get("hipertension_arterial").unwrap();
        assert_eq!(rule.diagnosis().as_str(), "hipertension arterial");
        assert_eq!(rule.conditions().len(), 6);
    }

    #[test]
    fn test_symptom_vocabulary_is_deduplicated_in_first_seen_order() {
        let registry = RuleRegistry::builtin();
        let vocabulary = registry.symptom_vocabulary();

        assert_eq!(vocabulary.first().unwrap().as_str(), "Molestias_fisicas");
        assert_eq!(vocabulary.len(), 13);
        let dolor_pecho = vocabulary
            .iter()
            .filter(|id| id.as_str() == "dolor_pecho")
            .count();
        assert_eq!(dolor_pecho, 1);
    }

    #[test]
    fn test_from_yaml_str_parses_tagged_conditions() {
        let yaml = r#"
rules:
  - name: arritmia
    conditions:
      - symptom: palpitaciones
    diagnosis: arritmia
  - name: arritmia_con_mareo
    conditions:
      - diagnosis: arritmia
      - symptom: mareo
    diagnosis: arritmia grave
"#;
        let registry = RuleRegistry::from_yaml_str(yaml).unwrap();

        assert_eq!(registry.len(), 2);
        let chained = registry.get("arritmia_con_mareo").unwrap();
        assert_eq!(
            chained.conditions()[0],
            Fact::Diagnosis(DiagnosisId::new("arritmia").unwrap())
        );
    }

    #[test]
    fn test_from_yaml_str_rejects_empty_conditions() {
        let yaml = r#"
rules:
  - name: vacia
    conditions: []
    diagnosis: angina
"#;
        assert!(matches!(
            RuleRegistry::from_yaml_str(yaml),
            Err(CoreError::EmptyRule(name)) if name == "vacia"
        ));
    }

    #[test]
    fn test_from_yaml_str_reports_failing_path() {
        let yaml = r#"
rules:
  - name: mala
    conditions:
      - sintoma: mareo
    diagnosis: angina
"#;
        match RuleRegistry::from_yaml_str(yaml) {
            Err(CoreError::RulesYaml(e)) => {
                assert!(e.path().to_string().starts_with("rules[0].conditions"));
            }
            other => panic!("expected RulesYaml error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "rules:\n  - name: angina\n    conditions:\n      - symptom: dolor_pecho\n    diagnosis: angina"
        )
        .unwrap();

        let registry = RuleRegistry::from_path(file.path()).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.rules()[0].conditions(),
            [Fact::Symptom(SymptomId::new("dolor_pecho").unwrap())]
        );
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("rules.yaml");

        assert!(matches!(
            RuleRegistry::from_path(&missing),
            Err(CoreError::RulesFileRead { .. })
        ));
    }

    #[test]
    fn test_rule_new_rejects_blank_name() {
        let result = Rule::new(
            "  ",
            vec![Fact::Symptom(SymptomId::new("mareo").unwrap())],
            DiagnosisId::new("x").unwrap(),
        );
        assert!(matches!(result, Err(CoreError::InvalidInput(_))));
    }
}
