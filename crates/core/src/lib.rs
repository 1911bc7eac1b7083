//! # Cardio Core
//!
//! Forward-chaining inference for the cardiovascular expert system.
//!
//! Given the symptoms a patient reports, the engine fires every diagnostic rule whose
//! conditions are all present, repeats until nothing new can be derived, and reports a single
//! diagnosis chosen by a resolution policy:
//!
//! - [`facts`]: facts and the per-session fact store
//! - [`rules`]: the validated, read-only rule registry
//! - [`matcher`]: the fixpoint loop
//! - [`resolution`]: policies choosing the reported diagnosis
//! - [`session`]: per-patient sessions and the shared [`Engine`]
//! - [`catalog`]: symptom questionnaire and diagnosis metadata lookups
//!
//! **No I/O during inference**: HTTP, questionnaires and persistence belong in `api-rest`
//! and `cardio-cli`. The only I/O here is loading a rule file at startup.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod facts;
pub mod matcher;
pub mod resolution;
pub mod rules;
pub mod session;
pub mod validation;

pub use catalog::{CatalogMode, DiagnosisCatalog, DiagnosisInfo, SymptomCatalog, SymptomEntry};
pub use config::{CoreConfig, RuleSource};
pub use constants::UNDETERMINED_MESSAGE;
pub use error::{CoreError, CoreResult};
pub use facts::{Fact, FactStore};
pub use matcher::{Firing, MatchRun, Matcher};
pub use resolution::{Diagnosis, LatestWins, MostSpecific, ResolutionPolicy};
pub use rules::{Rule, RuleRegistry};
pub use session::{Engine, Inference, Session};

pub use cardio_types::{DiagnosisId, SymptomId};
