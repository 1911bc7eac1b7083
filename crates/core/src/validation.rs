//! Rule table validation.
//!
//! The rule table is configuration: it is checked once when the registry is built and a
//! malformed table stops startup rather than failing individual inference sessions.

use crate::rules::Rule;
use crate::{CoreError, CoreResult};
use std::collections::HashSet;

/// Validates a single rule.
///
/// # Errors
///
/// - [`CoreError::EmptyRule`] if the rule has no conditions.
/// - [`CoreError::SelfReferentialRule`] if the rule's result is also one of its conditions.
/// - [`CoreError::DuplicateCondition`] if a condition is listed twice.
pub fn validate_rule(rule: &Rule) -> CoreResult<()> {
    if rule.conditions().is_empty() {
        return Err(CoreError::EmptyRule(rule.name().to_string()));
    }

    if rule.conditions().contains(&rule.conclusion()) {
        return Err(CoreError::SelfReferentialRule {
            rule: rule.name().to_string(),
            diagnosis: rule.diagnosis().to_string(),
        });
    }

    let mut seen = HashSet::new();
    for condition in rule.conditions() {
        if !seen.insert(condition) {
            return Err(CoreError::DuplicateCondition {
                rule: rule.name().to_string(),
                condition: condition.to_string(),
            });
        }
    }

    Ok(())
}

/// Validates a whole rule table: every rule individually, plus unique rule names.
pub fn validate_rule_table(rules: &[Rule]) -> CoreResult<()> {
    if rules.is_empty() {
        return Err(CoreError::EmptyRuleTable);
    }

    let mut names = HashSet::new();
    for rule in rules {
        validate_rule(rule)?;
        if !names.insert(rule.name()) {
            return Err(CoreError::DuplicateRuleName(rule.name().to_string()));
        }
    }

    Ok(())
}
