//! Rule engine: evaluates rules against every layered element and every
//! dependency edge.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::analyzer::DependencyAnalyzer;
use crate::layer::Layers;
use crate::rule::RuleBox;
use crate::types::{AnalysisResult, Violation};

/// Runs a fixed set of rules over one analysis.
#[derive(Default)]
pub struct RuleEngine {
    rules: Vec<RuleBox>,
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field(
                "rules",
                &self.rules.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl RuleEngine {
    /// Creates an engine for `rules`.
    #[must_use]
    pub fn new(rules: Vec<RuleBox>) -> Self {
        Self { rules }
    }

    /// Adds a rule, builder style.
    #[must_use]
    pub fn with_rule(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// The registered rules.
    #[must_use]
    pub fn rules(&self) -> &[RuleBox] {
        &self.rules
    }

    /// Checks every element once, then streams the analyzer's edges
    /// through the edge checks. Edges whose target belongs to no layer
    /// are counted but not checked.
    pub fn run(&self, layers: &Layers, analyzer: &mut DependencyAnalyzer) -> AnalysisResult {
        let mut violations: BTreeSet<Violation> = BTreeSet::new();

        for (element, layer) in layers.assignments() {
            for rule in &self.rules {
                if let Some(v) = rule.check_element(layer, element) {
                    debug!("{}: {}", rule.name(), v);
                    violations.insert(v);
                }
            }
        }

        let edges_checked = analyzer.for_each_dependency(layers.elements(), |dependency| {
            let (Some(source_layer), Some(target_layer)) = (
                layers.layer_of(&dependency.source),
                layers.layer_of(&dependency.target),
            ) else {
                return;
            };
            for rule in &self.rules {
                if let Some(v) = rule.check_edge(source_layer, target_layer, dependency) {
                    debug!("{}: {}", rule.name(), v);
                    violations.insert(v);
                }
            }
        });

        info!(
            "Analysis complete: {} violations, {} elements, {} edges",
            violations.len(),
            layers.element_count(),
            edges_checked
        );

        AnalysisResult {
            violations: violations.into_iter().collect(),
            elements_checked: layers.element_count(),
            edges_checked,
        }
    }
}
