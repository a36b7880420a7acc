//! `file_regex` collector: elements of files whose relative path matches.

use std::sync::Arc;

use deply_ast::{Definition, DefinitionKind};
use tracing::debug;

use super::{element_type, exclude_regex, kind_admitted, Collector, ElementSet};
use crate::config::{CollectorConfig, ConfigError};
use crate::pattern::Pattern;
use crate::source::SourceScope;
use crate::types::ElementKind;

/// Elements from files whose root-relative path matches `regex`.
///
/// `element_type` narrows the kinds emitted. `base_class` keeps only
/// classes inheriting from it; functions and variables are unaffected.
#[derive(Debug)]
pub struct FileRegexCollector {
    scope: Arc<SourceScope>,
    regex: Pattern,
    element_type: Option<ElementKind>,
    base_class: Option<String>,
    exclude: Option<Pattern>,
}

impl FileRegexCollector {
    /// Builds the collector from its configuration entry.
    ///
    /// # Errors
    ///
    /// Returns error if `regex` is missing or any option is invalid.
    pub fn from_config(config: &CollectorConfig, scope: Arc<SourceScope>) -> Result<Self, ConfigError> {
        Ok(Self {
            regex: Pattern::matching(config.require_str("regex")?)?,
            element_type: element_type(config)?,
            base_class: config
                .get_str("base_class")?
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            exclude: exclude_regex(config)?,
            scope,
        })
    }

    fn admits(&self, definition: &Definition) -> bool {
        if !kind_admitted(self.element_type, definition.kind) {
            return false;
        }
        match &self.base_class {
            Some(base) if definition.kind == DefinitionKind::Class => {
                definition.inherits_from(base)
            }
            _ => true,
        }
    }
}

impl Collector for FileRegexCollector {
    fn name(&self) -> &'static str {
        "file_regex"
    }

    fn collect(&self) -> ElementSet {
        let mut elements = ElementSet::new();
        for file in self.scope.files(self.exclude.as_ref()) {
            if !self.regex.is_match(&file.relative) {
                continue;
            }
            debug!("file_regex {} admits {}", self.regex, file.relative);
            elements.extend(self.scope.elements(&file, |d| self.admits(d)));
        }
        elements
    }
}
