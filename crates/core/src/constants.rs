//! Constants used throughout the cardio core crate.

/// Text shown to users when no rule produced a diagnosis.
pub const UNDETERMINED_MESSAGE: &str = "No se pudo determinar el diagnóstico";

/// Environment variable naming a YAML rule table that replaces the built-in rules.
pub const RULES_FILE_ENV: &str = "CARDIO_RULES_FILE";

/// Environment variable selecting the questionnaire catalog (`questionnaire` or `rules`).
pub const CATALOG_MODE_ENV: &str = "CARDIO_CATALOG";

/// Environment variable overriding the matcher's pass limit.
pub const MAX_PASSES_ENV: &str = "CARDIO_MAX_PASSES";

/// Default address for the REST server.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";
