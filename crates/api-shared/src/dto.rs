//! Wire types for the HTTP API.
//!
//! These mirror core types but use plain strings so the OpenAPI schema stays simple.

use cardio_core::{
    DiagnosisCatalog, Firing, Inference, Rule, SymptomEntry, UNDETERMINED_MESSAGE,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DiagnoseReq {
    /// Symptom identifiers the patient answered "yes" to.
    #[serde(default)]
    pub symptoms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FiredRule {
    pub rule: String,
    pub diagnosis: String,
    pub pass: usize,
}

impl From<&Firing> for FiredRule {
    fn from(firing: &Firing) -> Self {
        Self {
            rule: firing.rule.clone(),
            diagnosis: firing.diagnosis.to_string(),
            pass: firing.pass,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DiagnoseRes {
    pub determined: bool,
    /// Diagnosis identifier, absent when undetermined.
    pub diagnosis: Option<String>,
    /// Human-readable summary suitable for display.
    pub message: String,
    pub description: Option<String>,
    pub treatment: Option<String>,
    pub fired_rules: Vec<FiredRule>,
}

impl DiagnoseRes {
    /// Builds a response from an inference, enriching it with catalog metadata.
    pub fn from_inference(inference: &Inference, catalog: &DiagnosisCatalog) -> Self {
        let fired_rules = inference.firings.iter().map(FiredRule::from).collect();

        match inference.diagnosis.id() {
            Some(id) => {
                let info = catalog.get(id);
                Self {
                    determined: true,
                    diagnosis: Some(id.to_string()),
                    message: info
                        .map(|i| i.description.clone())
                        .unwrap_or_else(|| id.to_string()),
                    description: info.map(|i| i.description.clone()),
                    treatment: info.map(|i| i.treatment.clone()),
                    fired_rules,
                }
            }
            None => Self {
                determined: false,
                diagnosis: None,
                message: UNDETERMINED_MESSAGE.to_string(),
                description: None,
                treatment: None,
                fired_rules,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SymptomRes {
    pub id: String,
    pub prompt: String,
}

impl From<&SymptomEntry> for SymptomRes {
    fn from(entry: &SymptomEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            prompt: entry.prompt.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListSymptomsRes {
    pub symptoms: Vec<SymptomRes>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RuleRes {
    pub name: String,
    /// Conditions rendered as `symptom:<id>` or `diagnosis:<id>`.
    pub conditions: Vec<String>,
    pub diagnosis: String,
}

impl From<&Rule> for RuleRes {
    fn from(rule: &Rule) -> Self {
        Self {
            name: rule.name().to_string(),
            conditions: rule.conditions().iter().map(ToString::to_string).collect(),
            diagnosis: rule.diagnosis().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListRulesRes {
    pub rules: Vec<RuleRes>,
}
