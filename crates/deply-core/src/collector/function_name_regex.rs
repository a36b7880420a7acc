//! `function_name_regex` collector.

use std::sync::Arc;

use deply_ast::DefinitionKind;

use super::{exclude_regex, Collector, ElementSet};
use crate::config::{CollectorConfig, ConfigError};
use crate::pattern::Pattern;
use crate::source::SourceScope;

/// Functions and methods whose simple name matches `function_name_regex`.
#[derive(Debug)]
pub struct FunctionNameRegexCollector {
    scope: Arc<SourceScope>,
    regex: Pattern,
    exclude: Option<Pattern>,
}

impl FunctionNameRegexCollector {
    /// Builds the collector from its configuration entry.
    ///
    /// # Errors
    ///
    /// Returns error if `function_name_regex` is missing or invalid.
    pub fn from_config(config: &CollectorConfig, scope: Arc<SourceScope>) -> Result<Self, ConfigError> {
        Ok(Self {
            regex: Pattern::matching(config.require_str("function_name_regex")?)?,
            exclude: exclude_regex(config)?,
            scope,
        })
    }
}

impl Collector for FunctionNameRegexCollector {
    fn name(&self) -> &'static str {
        "function_name_regex"
    }

    fn collect(&self) -> ElementSet {
        self.scope
            .files(self.exclude.as_ref())
            .iter()
            .flat_map(|file| {
                self.scope.elements(file, |d| {
                    d.kind == DefinitionKind::Function && self.regex.is_match(&d.name)
                })
            })
            .collect()
    }
}
