//! Rule forbidding dependencies from one layer onto others.
//!
//! Fires for every edge whose source belongs to the configured layer and
//! whose target belongs to one of the disallowed layers. Edges inside a
//! single layer never fire, including self-edges.

use std::collections::BTreeSet;

use deply_core::{Dependency, Rule, Violation, ViolationType};

/// Rule name for layer dependencies.
pub const NAME: &str = "layer-dependency";

/// Forbids `layer` from depending on any layer in `disallowed`.
#[derive(Debug, Clone)]
pub struct LayerDependencyRule {
    layer: String,
    disallowed: BTreeSet<String>,
}

impl LayerDependencyRule {
    /// Creates the rule for one source layer.
    #[must_use]
    pub fn new(layer: impl Into<String>, disallowed: impl IntoIterator<Item = String>) -> Self {
        Self {
            layer: layer.into(),
            disallowed: disallowed.into_iter().collect(),
        }
    }

    /// The layer this rule constrains.
    #[must_use]
    pub fn layer(&self) -> &str {
        &self.layer
    }
}

impl Rule for LayerDependencyRule {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> String {
        format!(
            "layer '{}' must not depend on: {}",
            self.layer,
            self.disallowed.iter().cloned().collect::<Vec<_>>().join(", ")
        )
    }

    fn check_edge(
        &self,
        source_layer: &str,
        target_layer: &str,
        dependency: &Dependency,
    ) -> Option<Violation> {
        if source_layer != self.layer
            || source_layer == target_layer
            || !self.disallowed.contains(target_layer)
        {
            return None;
        }
        Some(Violation::at_edge(
            dependency,
            ViolationType::LayerDependency,
            format!(
                "Layer '{source_layer}' is not allowed to depend on layer '{target_layer}' ({} -> {})",
                dependency.source.name(),
                dependency.target.name()
            ),
        ))
    }
}
