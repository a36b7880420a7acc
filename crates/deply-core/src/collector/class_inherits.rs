//! `class_inherits` collector: classes with a given direct base class.

use std::sync::Arc;

use deply_ast::DefinitionKind;

use super::{exclude_regex, Collector, ElementSet};
use crate::config::{CollectorConfig, ConfigError};
use crate::pattern::Pattern;
use crate::source::SourceScope;

/// Classes with a base equal to `base_class` or ending in `.base_class`,
/// after resolving import aliases.
#[derive(Debug)]
pub struct ClassInheritsCollector {
    scope: Arc<SourceScope>,
    base_class: String,
    exclude: Option<Pattern>,
}

impl ClassInheritsCollector {
    /// Builds the collector from its configuration entry.
    ///
    /// # Errors
    ///
    /// Returns error if `base_class` is missing.
    pub fn from_config(config: &CollectorConfig, scope: Arc<SourceScope>) -> Result<Self, ConfigError> {
        Ok(Self {
            base_class: config.require_str("base_class")?.to_string(),
            exclude: exclude_regex(config)?,
            scope,
        })
    }
}

impl Collector for ClassInheritsCollector {
    fn name(&self) -> &'static str {
        "class_inherits"
    }

    fn collect(&self) -> ElementSet {
        self.scope
            .files(self.exclude.as_ref())
            .iter()
            .flat_map(|file| {
                self.scope.elements(file, |d| {
                    d.kind == DefinitionKind::Class && d.inherits_from(&self.base_class)
                })
            })
            .collect()
    }
}
