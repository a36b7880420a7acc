//! Translates a configured rule set into rule objects.

use std::collections::BTreeMap;

use deply_core::{ConfigError, RuleBox, RuleSpec};
use tracing::debug;

use crate::{ClassNamingRule, FunctionNamingRule, LayerDependencyRule};

/// Builds the rules for every layer entry of a rule set.
///
/// A `disallow` list becomes a [`LayerDependencyRule`], `class_naming`
/// a [`ClassNamingRule`] and `function_naming` a [`FunctionNamingRule`].
///
/// # Errors
///
/// Returns [`ConfigError::InvalidRegex`] for an invalid naming pattern.
pub fn rules_from_ruleset(ruleset: &BTreeMap<String, RuleSpec>) -> Result<Vec<RuleBox>, ConfigError> {
    let mut rules: Vec<RuleBox> = Vec::new();
    for (layer, spec) in ruleset {
        if !spec.disallow.is_empty() {
            rules.push(Box::new(LayerDependencyRule::new(
                layer.clone(),
                spec.disallow.iter().cloned(),
            )));
        }
        if let Some(naming) = &spec.class_naming {
            rules.push(Box::new(ClassNamingRule::new(layer.clone(), &naming.regex)?));
        }
        if let Some(naming) = &spec.function_naming {
            rules.push(Box::new(FunctionNamingRule::new(
                layer.clone(),
                &naming.regex,
            )?));
        }
    }
    debug!("Built {} rules from rule set", rules.len());
    Ok(rules)
}
