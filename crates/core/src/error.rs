#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(#[from] cardio_types::TextError),

    #[error("rule table must contain at least one rule")]
    EmptyRuleTable,
    #[error("rule '{0}' has no conditions")]
    EmptyRule(String),
    #[error("rule '{rule}' lists its own result '{diagnosis}' as a condition")]
    SelfReferentialRule { rule: String, diagnosis: String },
    #[error("rule '{rule}' repeats condition '{condition}'")]
    DuplicateCondition { rule: String, condition: String },
    #[error("rule name '{0}' is used more than once")]
    DuplicateRuleName(String),

    #[error("failed to read rules file {path}: {source}", path = path.display())]
    RulesFileRead {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse rules YAML: {0}")]
    RulesYaml(#[from] serde_path_to_error::Error<serde_yaml::Error>),

    #[error("unknown catalog mode '{0}' (expected 'questionnaire' or 'rules')")]
    InvalidCatalogMode(String),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
