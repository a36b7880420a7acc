//! Rule trait for defining architecture rules.

use crate::types::{CodeElement, Dependency, Violation};

/// An architecture rule evaluated against dependency edges, single
/// elements, or both.
///
/// Both checks default to "no violation", so a rule only implements the
/// side it cares about.
///
/// # Example
///
/// ```ignore
/// use deply_core::{CodeElement, Rule, Violation, ViolationType};
///
/// pub struct NoPrivateClasses { layer: String }
///
/// impl Rule for NoPrivateClasses {
///     fn name(&self) -> &'static str { "no-private-classes" }
///
///     fn check_element(&self, layer: &str, element: &CodeElement) -> Option<Violation> {
///         (layer == self.layer && element.short_name().starts_with('_')).then(|| {
///             Violation::at_element(element, ViolationType::ClassNaming, "private class")
///         })
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "layer-dependency").
    fn name(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> String {
        String::new()
    }

    /// Checks one edge whose source and target both belong to a layer.
    fn check_edge(
        &self,
        _source_layer: &str,
        _target_layer: &str,
        _dependency: &Dependency,
    ) -> Option<Violation> {
        None
    }

    /// Checks one element of `layer`.
    fn check_element(&self, _layer: &str, _element: &CodeElement) -> Option<Violation> {
        None
    }
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
