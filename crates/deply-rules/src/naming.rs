//! Naming rules for classes and functions of a layer.

use deply_core::{CodeElement, ConfigError, ElementKind, Pattern, Rule, Violation, ViolationType};

/// Rule name for class naming.
pub const CLASS_NAMING: &str = "class-naming";

/// Rule name for function naming.
pub const FUNCTION_NAMING: &str = "function-naming";

/// Requires every class of `layer` to have a simple name matching `regex`.
#[derive(Debug, Clone)]
pub struct ClassNamingRule {
    layer: String,
    regex: Pattern,
}

impl ClassNamingRule {
    /// Creates the rule.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRegex`] if `regex` does not compile.
    pub fn new(layer: impl Into<String>, regex: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            layer: layer.into(),
            regex: Pattern::matching(regex)?,
        })
    }
}

impl Rule for ClassNamingRule {
    fn name(&self) -> &'static str {
        CLASS_NAMING
    }

    fn description(&self) -> String {
        format!("classes in layer '{}' match '{}'", self.layer, self.regex)
    }

    fn check_element(&self, layer: &str, element: &CodeElement) -> Option<Violation> {
        check_name(
            &self.layer,
            &self.regex,
            ElementKind::Class,
            layer,
            element,
        )
    }
}

/// Requires every function of `layer` to have a simple name matching
/// `regex`.
#[derive(Debug, Clone)]
pub struct FunctionNamingRule {
    layer: String,
    regex: Pattern,
}

impl FunctionNamingRule {
    /// Creates the rule.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRegex`] if `regex` does not compile.
    pub fn new(layer: impl Into<String>, regex: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            layer: layer.into(),
            regex: Pattern::matching(regex)?,
        })
    }
}

impl Rule for FunctionNamingRule {
    fn name(&self) -> &'static str {
        FUNCTION_NAMING
    }

    fn description(&self) -> String {
        format!("functions in layer '{}' match '{}'", self.layer, self.regex)
    }

    fn check_element(&self, layer: &str, element: &CodeElement) -> Option<Violation> {
        check_name(
            &self.layer,
            &self.regex,
            ElementKind::Function,
            layer,
            element,
        )
    }
}

fn check_name(
    rule_layer: &str,
    regex: &Pattern,
    kind: ElementKind,
    layer: &str,
    element: &CodeElement,
) -> Option<Violation> {
    if layer != rule_layer || element.kind() != kind || regex.is_match(element.short_name()) {
        return None;
    }
    let (violation_type, label) = match kind {
        ElementKind::Class => (ViolationType::ClassNaming, "Class"),
        _ => (ViolationType::FunctionNaming, "Function"),
    };
    Some(Violation::at_element(
        element,
        violation_type,
        format!(
            "{label} '{}' in layer '{layer}' does not match naming pattern '{regex}'",
            element.name()
        ),
    ))
}
