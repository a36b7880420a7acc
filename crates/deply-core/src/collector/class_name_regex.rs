//! `class_name_regex` collector.

use std::sync::Arc;

use deply_ast::DefinitionKind;

use super::{exclude_regex, Collector, ElementSet};
use crate::config::{CollectorConfig, ConfigError};
use crate::pattern::Pattern;
use crate::source::SourceScope;

/// Classes whose simple name matches `class_name_regex`.
#[derive(Debug)]
pub struct ClassNameRegexCollector {
    scope: Arc<SourceScope>,
    regex: Pattern,
    exclude: Option<Pattern>,
}

impl ClassNameRegexCollector {
    /// Builds the collector from its configuration entry.
    ///
    /// # Errors
    ///
    /// Returns error if `class_name_regex` is missing or invalid.
    pub fn from_config(config: &CollectorConfig, scope: Arc<SourceScope>) -> Result<Self, ConfigError> {
        Ok(Self {
            regex: Pattern::matching(config.require_str("class_name_regex")?)?,
            exclude: exclude_regex(config)?,
            scope,
        })
    }
}

impl Collector for ClassNameRegexCollector {
    fn name(&self) -> &'static str {
        "class_name_regex"
    }

    fn collect(&self) -> ElementSet {
        self.scope
            .files(self.exclude.as_ref())
            .iter()
            .flat_map(|file| {
                self.scope.elements(file, |d| {
                    d.kind == DefinitionKind::Class && self.regex.is_match(&d.name)
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::test_support::{names, scope, tree};

    #[test]
    fn matches_simple_names_of_nested_classes() {
        let dir = tree(&[(
            "services.py",
            "class UserService:\n    class InnerService:\n        pass\nclass ServiceFactory:\n    pass\ndef make_service():\n    pass\n",
        )]);
        let config = CollectorConfig::new("class_name_regex").with("class_name_regex", ".*Service$");
        let collector = ClassNameRegexCollector::from_config(&config, scope(&dir)).unwrap();
        assert_eq!(
            names(&collector.collect()),
            vec!["UserService", "UserService.InnerService"]
        );
    }
}
