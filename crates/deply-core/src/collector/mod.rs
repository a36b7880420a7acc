//! Collectors select the code elements that make up a layer.
//!
//! Every collector enumerates `.py` files through a shared
//! [`SourceScope`], applies its own file and definition filters and
//! returns a set of [`CodeElement`]s. The [`BoolCollector`] composes other
//! collectors, so the family is closed under composition.

mod boolean;
mod class_inherits;
mod class_name_regex;
mod decorator_usage;
mod directory;
mod factory;
mod file_regex;
mod function_name_regex;

pub use boolean::BoolCollector;
pub use class_inherits::ClassInheritsCollector;
pub use class_name_regex::ClassNameRegexCollector;
pub use decorator_usage::DecoratorUsageCollector;
pub use directory::DirectoryCollector;
pub use factory::{create_collector, COLLECTOR_TYPES};
pub use file_regex::FileRegexCollector;
pub use function_name_regex::FunctionNameRegexCollector;

use std::collections::BTreeSet;

use deply_ast::DefinitionKind;

use crate::config::{CollectorConfig, ConfigError};
use crate::pattern::Pattern;
use crate::source::SourceScope;
use crate::types::{CodeElement, ElementKind};

/// Set of collected elements, ordered for deterministic iteration.
pub type ElementSet = BTreeSet<CodeElement>;

/// A selector of code elements.
pub trait Collector: Send + Sync {
    /// Collector tag as used in configuration (e.g. `file_regex`).
    fn name(&self) -> &'static str;

    /// Returns every element this collector admits.
    fn collect(&self) -> ElementSet;
}

/// Boxed collector for dynamic dispatch.
pub type CollectorBox = Box<dyn Collector>;

/// Every class, function and module variable in the scope.
#[must_use]
pub fn all_elements(scope: &SourceScope) -> ElementSet {
    scope
        .files(None)
        .iter()
        .flat_map(|file| scope.elements(file, |_| true))
        .collect()
}

/// Reads the optional `element_type` option. Absent or empty means all
/// kinds.
pub(crate) fn element_type(config: &CollectorConfig) -> Result<Option<ElementKind>, ConfigError> {
    match config.get_str("element_type")? {
        None | Some("") => Ok(None),
        Some("class") => Ok(Some(ElementKind::Class)),
        Some("function") => Ok(Some(ElementKind::Function)),
        Some("variable") => Ok(Some(ElementKind::Variable)),
        Some(other) => Err(ConfigError::InvalidField {
            collector: config.kind.clone(),
            field: "element_type".into(),
            reason: format!("`{other}` is not one of class, function, variable"),
        }),
    }
}

/// Whether a definition of `kind` passes an `element_type` filter.
pub(crate) fn kind_admitted(filter: Option<ElementKind>, kind: DefinitionKind) -> bool {
    filter.map_or(true, |wanted| wanted == ElementKind::from(kind))
}

/// Reads the optional, anchored `exclude_files_regex` option.
pub(crate) fn exclude_regex(config: &CollectorConfig) -> Result<Option<Pattern>, ConfigError> {
    config
        .get_str("exclude_files_regex")?
        .filter(|s| !s.is_empty())
        .map(Pattern::matching)
        .transpose()
}


#[cfg(test)]
mod tests {
    use super::test_support::{names, scope, tree};
    use super::*;

    #[test]
    fn universe_covers_all_kinds() {
        let dir = tree(&[("m.py", "X = 1\nclass A:\n    def f(self):\n        pass\n")]);
        let all = all_elements(&scope(&dir));
        assert_eq!(names(&all), vec!["A", "A.f", "X"]);
    }

    #[test]
    fn element_type_parsing() {
        let c = CollectorConfig::new("file_regex").with("element_type", "class");
        assert_eq!(element_type(&c).unwrap(), Some(ElementKind::Class));
        let c = CollectorConfig::new("file_regex").with("element_type", "");
        assert_eq!(element_type(&c).unwrap(), None);
        let c = CollectorConfig::new("file_regex").with("element_type", "module");
        assert!(element_type(&c).is_err());
    }
}
