//! `decorator_usage` collector: classes and functions carrying a decorator.

use std::sync::Arc;

use deply_ast::{Definition, DefinitionKind};

use super::{exclude_regex, Collector, ElementSet};
use crate::config::{CollectorConfig, ConfigError};
use crate::pattern::Pattern;
use crate::source::SourceScope;

/// Classes and functions carrying a decorator whose lexical name equals
/// `decorator_name` or matches `decorator_regex`.
#[derive(Debug)]
pub struct DecoratorUsageCollector {
    scope: Arc<SourceScope>,
    decorator_name: Option<String>,
    decorator_regex: Option<Pattern>,
    exclude: Option<Pattern>,
}

impl DecoratorUsageCollector {
    /// Builds the collector from its configuration entry.
    ///
    /// # Errors
    ///
    /// Returns error if neither `decorator_name` nor `decorator_regex` is
    /// set, or the regex is invalid.
    pub fn from_config(config: &CollectorConfig, scope: Arc<SourceScope>) -> Result<Self, ConfigError> {
        let decorator_name = config
            .get_str("decorator_name")?
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let decorator_regex = config
            .get_str("decorator_regex")?
            .filter(|s| !s.is_empty())
            .map(Pattern::matching)
            .transpose()?;
        if decorator_name.is_none() && decorator_regex.is_none() {
            return Err(ConfigError::MissingField {
                collector: config.kind.clone(),
                field: "decorator_name or decorator_regex".into(),
            });
        }
        Ok(Self {
            scope,
            decorator_name,
            decorator_regex,
            exclude: exclude_regex(config)?,
        })
    }

    fn admits(&self, definition: &Definition) -> bool {
        if !matches!(
            definition.kind,
            DefinitionKind::Class | DefinitionKind::Function
        ) {
            return false;
        }
        definition.decorators.iter().any(|decorator| {
            self.decorator_name.as_deref() == Some(decorator.as_str())
                || self
                    .decorator_regex
                    .as_ref()
                    .is_some_and(|re| re.is_match(decorator))
        })
    }
}

impl Collector for DecoratorUsageCollector {
    fn name(&self) -> &'static str {
        "decorator_usage"
    }

    fn collect(&self) -> ElementSet {
        self.scope
            .files(self.exclude.as_ref())
            .iter()
            .flat_map(|file| self.scope.elements(file, |d| self.admits(d)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::test_support::{names, scope, tree};

    const APP: &str = "@login_required\nclass UserController:\n    pass\n\n@service_decorator\nclass UserService:\n    pass\n\n@utility_decorator\ndef helper_function():\n    pass\n\n@app.route('/x')\ndef view():\n    pass\n";

    fn collect(config: CollectorConfig) -> Vec<String> {
        let dir = tree(&[("app.py", APP)]);
        let collector = DecoratorUsageCollector::from_config(&config, scope(&dir)).unwrap();
        names(&collector.collect())
    }

    #[test]
    fn by_name() {
        let got = collect(
            CollectorConfig::new("decorator_usage").with("decorator_name", "login_required"),
        );
        assert_eq!(got, vec!["UserController"]);
    }

    #[test]
    fn by_regex() {
        let got = collect(
            CollectorConfig::new("decorator_usage").with("decorator_regex", "^.*decorator$"),
        );
        assert_eq!(got, vec!["UserService", "helper_function"]);
    }

    #[test]
    fn call_decorators_use_callee_attribute() {
        let got = collect(CollectorConfig::new("decorator_usage").with("decorator_name", "route"));
        assert_eq!(got, vec!["view"]);
    }

    #[test]
    fn requires_name_or_regex() {
        let dir = tree(&[("app.py", APP)]);
        let err = DecoratorUsageCollector::from_config(
            &CollectorConfig::new("decorator_usage"),
            scope(&dir),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { .. }));
    }
}
