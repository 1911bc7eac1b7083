//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into services. Core code
//! never reads environment variables itself; binaries read them and hand the raw values to
//! [`CoreConfig::from_env_values`].

use crate::catalog::{CatalogMode, SymptomCatalog};
use crate::rules::RuleRegistry;
use crate::session::Engine;
use crate::{CoreError, CoreResult};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;

/// Where the rule table comes from.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum RuleSource {
    #[default]
    Builtin,
    File(PathBuf),
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug, Default)]
pub struct CoreConfig {
    rule_source: RuleSource,
    catalog_mode: CatalogMode,
    max_passes: Option<NonZeroUsize>,
}

impl CoreConfig {
    pub fn new(
        rule_source: RuleSource,
        catalog_mode: CatalogMode,
        max_passes: Option<NonZeroUsize>,
    ) -> Self {
        Self {
            rule_source,
            catalog_mode,
            max_passes,
        }
    }

    /// Builds a configuration from optional raw environment values.
    ///
    /// Empty or whitespace values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns a [`CoreError`] if the catalog mode is unknown or the pass limit is not a
    /// positive integer.
    pub fn from_env_values(
        rules_file: Option<String>,
        catalog_mode: Option<String>,
        max_passes: Option<String>,
    ) -> CoreResult<Self> {
        fn non_blank(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        let rule_source = non_blank(rules_file)
            .map(|path| RuleSource::File(PathBuf::from(path)))
            .unwrap_or_default();

        let catalog_mode = non_blank(catalog_mode)
            .map(|mode| mode.parse::<CatalogMode>())
            .transpose()?
            .unwrap_or_default();

        let max_passes = non_blank(max_passes)
            .map(|raw| {
                raw.parse::<NonZeroUsize>().map_err(|_| {
                    CoreError::InvalidInput(format!(
                        "pass limit must be a positive integer, got '{raw}'"
                    ))
                })
            })
            .transpose()?;

        Ok(Self::new(rule_source, catalog_mode, max_passes))
    }

    pub fn rule_source(&self) -> &RuleSource {
        &self.rule_source
    }

    pub fn catalog_mode(&self) -> CatalogMode {
        self.catalog_mode
    }

    pub fn max_passes(&self) -> Option<NonZeroUsize> {
        self.max_passes
    }

    /// Loads and validates the configured rule table.
    pub fn load_registry(&self) -> CoreResult<RuleRegistry> {
        match &self.rule_source {
            RuleSource::Builtin => Ok(RuleRegistry::builtin()),
            RuleSource::File(path) => RuleRegistry::from_path(path),
        }
    }

    /// Builds the engine and questionnaire catalog for this configuration.
    ///
    /// Logs a warning for every rule the configured catalog can never satisfy.
    pub fn build(&self) -> CoreResult<(Engine, SymptomCatalog)> {
        let registry = Arc::new(self.load_registry()?);
        let catalog = SymptomCatalog::for_mode(self.catalog_mode, &registry);

        for rule in catalog.unreachable_rules(&registry) {
            tracing::warn!(
                rule = rule.name(),
                "rule references symptoms the {:?} catalog never asks about",
                self.catalog_mode
            );
        }

        let mut engine = Engine::new(registry);
        if let Some(limit) = self.max_passes {
            tracing::info!(limit = limit.get(), "overriding matcher pass limit");
            engine = engine.with_max_passes(limit);
        }

        Ok((engine, catalog))
    }
}
