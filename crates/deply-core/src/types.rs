//! Core value types: code elements, dependency edges and violations.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Kind of code element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// A class definition.
    Class,
    /// A function or method definition.
    Function,
    /// A module-level variable.
    Variable,
}

impl ElementKind {
    /// Lowercase name used in configuration and reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Function => "function",
            Self::Variable => "variable",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<deply_ast::DefinitionKind> for ElementKind {
    fn from(kind: deply_ast::DefinitionKind) -> Self {
        match kind {
            deply_ast::DefinitionKind::Class => Self::Class,
            deply_ast::DefinitionKind::Function => Self::Function,
            deply_ast::DefinitionKind::Variable => Self::Variable,
        }
    }
}

/// A located class, function or variable definition.
///
/// Immutable once built. Equality, hashing and ordering cover every field.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CodeElement {
    file: PathBuf,
    name: String,
    kind: ElementKind,
    line: usize,
    column: usize,
}

impl CodeElement {
    /// Creates a new code element.
    #[must_use]
    pub fn new(
        file: impl Into<PathBuf>,
        name: impl Into<String>,
        kind: ElementKind,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            file: file.into(),
            name: name.into(),
            kind,
            line,
            column,
        }
    }

    /// Canonical path of the defining file.
    #[must_use]
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Fully qualified name within the file (`Outer.Inner.method`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rightmost `.` segment of the name.
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.name
            .rsplit_once('.')
            .map_or(self.name.as_str(), |(_, short)| short)
    }

    /// Element kind.
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Line of the defining token (1-indexed).
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Column of the defining token (1-indexed).
    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }
}

impl std::fmt::Display for CodeElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} ({}:{}:{})",
            self.kind,
            self.name,
            self.file.display(),
            self.line,
            self.column
        )
    }
}

/// A dependency edge: `source` references `target` at `line` of the
/// source's file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dependency {
    /// Referencing element.
    pub source: CodeElement,
    /// Referenced element.
    pub target: CodeElement,
    /// Line of the reference in the source's file (1-indexed).
    pub line: usize,
}

impl Dependency {
    /// Creates a new dependency edge.
    #[must_use]
    pub fn new(source: CodeElement, target: CodeElement, line: usize) -> Self {
        Self {
            source,
            target,
            line,
        }
    }

    /// Whether source and target are the same element.
    #[must_use]
    pub fn is_self_edge(&self) -> bool {
        self.source == self.target
    }
}

/// Category of rule that produced a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationType {
    /// A layer depends on a layer it is not allowed to.
    LayerDependency,
    /// A class name does not match its layer's naming pattern.
    ClassNaming,
    /// A function name does not match its layer's naming pattern.
    FunctionNaming,
}

impl std::fmt::Display for ViolationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::LayerDependency => "LAYER_DEPENDENCY",
            Self::ClassNaming => "CLASS_NAMING",
            Self::FunctionNaming => "FUNCTION_NAMING",
        })
    }
}

/// A single rule failure.
///
/// Field order drives the derived ordering, so sorted violations read
/// file by file, top to bottom.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Violation {
    /// File of the offending element.
    pub file: PathBuf,
    /// Line of the offending reference or definition (1-indexed).
    pub line: usize,
    /// Column of the offending element (1-indexed).
    pub column: usize,
    /// Qualified name of the offending element.
    pub element_name: String,
    /// Kind of the offending element.
    pub element_kind: ElementKind,
    /// Rule category.
    pub violation_type: ViolationType,
    /// Human-readable message.
    pub message: String,
}

impl Violation {
    /// A violation located at a dependency edge's reference site.
    #[must_use]
    pub fn at_edge(
        dependency: &Dependency,
        violation_type: ViolationType,
        message: impl Into<String>,
    ) -> Self {
        let source = &dependency.source;
        Self {
            file: source.file.clone(),
            line: dependency.line,
            column: source.column,
            element_name: source.name.clone(),
            element_kind: source.kind,
            violation_type,
            message: message.into(),
        }
    }

    /// A violation located at an element's definition.
    #[must_use]
    pub fn at_element(
        element: &CodeElement,
        violation_type: ViolationType,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file: element.file.clone(),
            line: element.line,
            column: element.column,
            element_name: element.name.clone(),
            element_kind: element.kind,
            violation_type,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{} - {} ({} {})",
            self.file.display(),
            self.line,
            self.message,
            self.element_kind,
            self.element_name
        )
    }
}

/// Result of one analysis run.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Distinct violations, sorted.
    pub violations: Vec<Violation>,
    /// Number of elements assigned to a layer.
    pub elements_checked: usize,
    /// Number of dependency edges produced by the analyzer.
    pub edges_checked: usize,
}

impl AnalysisResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if any rule was violated.
    #[must_use]
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Violations of one category.
    #[must_use]
    pub fn by_type(&self, violation_type: ViolationType) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|v| v.violation_type == violation_type)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: &str, kind: ElementKind, line: usize) -> CodeElement {
        CodeElement::new("/src/app/views.py", name, kind, line, 1)
    }

    #[test]
    fn short_name_is_rightmost_segment() {
        assert_eq!(element("Outer.Inner.foo", ElementKind::Function, 1).short_name(), "foo");
        assert_eq!(element("CONSTANT", ElementKind::Variable, 1).short_name(), "CONSTANT");
    }

    #[test]
    fn equality_covers_position() {
        let a = element("foo", ElementKind::Function, 1);
        let b = element("foo", ElementKind::Function, 2);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn edge_violation_uses_reference_line_and_source_element() {
        let source = element("my_view", ElementKind::Function, 3);
        let target = CodeElement::new("/src/models.py", "MyModel", ElementKind::Class, 1, 1);
        let dep = Dependency::new(source, target, 7);
        let v = Violation::at_edge(&dep, ViolationType::LayerDependency, "not allowed");
        assert_eq!(v.line, 7);
        assert_eq!(v.element_name, "my_view");
        assert_eq!(v.element_kind, ElementKind::Function);
        assert_eq!(
            v.to_string(),
            "/src/app/views.py:7 - not allowed (function my_view)"
        );
    }

    #[test]
    fn violations_sort_by_file_then_line() {
        let mut vs = [
            Violation::at_element(
                &CodeElement::new("/b.py", "x", ElementKind::Class, 1, 1),
                ViolationType::ClassNaming,
                "m",
            ),
            Violation::at_element(
                &CodeElement::new("/a.py", "y", ElementKind::Class, 9, 1),
                ViolationType::ClassNaming,
                "m",
            ),
            Violation::at_element(
                &CodeElement::new("/a.py", "z", ElementKind::Class, 2, 1),
                ViolationType::ClassNaming,
                "m",
            ),
        ];
        vs.sort();
        let order: Vec<&str> = vs.iter().map(|v| v.element_name.as_str()).collect();
        assert_eq!(order, vec!["z", "y", "x"]);
    }

    #[test]
    fn violation_type_serializes_screaming_snake() {
        let json = serde_json::to_string(&ViolationType::LayerDependency).unwrap();
        assert_eq!(json, "\"LAYER_DEPENDENCY\"");
    }
}
