//! `bool` collector: set algebra over nested collectors.

use std::sync::Arc;

use tracing::debug;

use super::{all_elements, create_collector, Collector, CollectorBox, ElementSet};
use crate::config::{CollectorConfig, ConfigError};
use crate::source::SourceScope;

/// Composes other collectors: `⋂ must ∩ ⋃ any_of ∖ ⋃ must_not`.
///
/// An empty `must` or `any_of` list stands for every element in scope, so
/// each is the identity of its operation.
pub struct BoolCollector {
    scope: Arc<SourceScope>,
    must: Vec<CollectorBox>,
    any_of: Vec<CollectorBox>,
    must_not: Vec<CollectorBox>,
}

impl std::fmt::Debug for BoolCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = |cs: &[CollectorBox]| cs.iter().map(|c| c.name()).collect::<Vec<_>>();
        f.debug_struct("BoolCollector")
            .field("must", &names(&self.must))
            .field("any_of", &names(&self.any_of))
            .field("must_not", &names(&self.must_not))
            .finish_non_exhaustive()
    }
}

impl BoolCollector {
    /// Composes already built collectors.
    #[must_use]
    pub fn new(
        scope: Arc<SourceScope>,
        must: Vec<CollectorBox>,
        any_of: Vec<CollectorBox>,
        must_not: Vec<CollectorBox>,
    ) -> Self {
        Self {
            scope,
            must,
            any_of,
            must_not,
        }
    }

    /// Builds the collector and its children from a configuration entry.
    ///
    /// # Errors
    ///
    /// Returns the first error from a nested collector entry.
    pub fn from_config(config: &CollectorConfig, scope: Arc<SourceScope>) -> Result<Self, ConfigError> {
        let build = |key: &str| -> Result<Vec<CollectorBox>, ConfigError> {
            config
                .nested(key)?
                .iter()
                .map(|nested| create_collector(nested, &scope))
                .collect()
        };
        let must = build("must")?;
        let any_of = build("any_of")?;
        let must_not = build("must_not")?;
        Ok(Self::new(scope, must, any_of, must_not))
    }
}

impl Collector for BoolCollector {
    fn name(&self) -> &'static str {
        "bool"
    }

    fn collect(&self) -> ElementSet {
        let mut result: Option<ElementSet> = None;

        for collector in &self.must {
            let collected = collector.collect();
            result = Some(match result {
                None => collected,
                Some(acc) => acc.intersection(&collected).cloned().collect(),
            });
        }

        if !self.any_of.is_empty() {
            let union: ElementSet = self.any_of.iter().flat_map(|c| c.collect()).collect();
            result = Some(match result {
                None => union,
                Some(acc) => acc.intersection(&union).cloned().collect(),
            });
        }

        let mut result = result.unwrap_or_else(|| all_elements(&self.scope));

        for collector in &self.must_not {
            for element in collector.collect() {
                result.remove(&element);
            }
        }

        debug!("bool collector produced {} elements", result.len());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::test_support::{names, scope, tree};
    use serde_json::json;

    const FILES: &[(&str, &str)] = &[
        (
            "base_service.py",
            "class BaseService:\n    pass\nclass OtherService:\n    pass\n",
        ),
        ("user_service.py", "class UserService:\n    pass\ndef helper():\n    pass\n"),
    ];

    fn collect(config: serde_json::Value) -> Vec<String> {
        let dir = tree(FILES);
        let config: CollectorConfig = serde_json::from_value(config).unwrap();
        let collector = BoolCollector::from_config(&config, scope(&dir)).unwrap();
        names(&collector.collect())
    }

    #[test]
    fn must_minus_must_not() {
        let got = collect(json!({
            "type": "bool",
            "must": [{ "type": "class_name_regex", "class_name_regex": ".*Service$" }],
            "must_not": [{ "type": "file_regex", "regex": ".*base_service.py" }],
        }));
        assert_eq!(got, vec!["UserService"]);
    }

    #[test]
    fn empty_must_with_any_of_is_the_union() {
        let got = collect(json!({
            "type": "bool",
            "any_of": [
                { "type": "class_name_regex", "class_name_regex": "Base" },
                { "type": "function_name_regex", "function_name_regex": "helper" },
            ],
        }));
        assert_eq!(got, vec!["BaseService", "helper"]);
    }

    #[test]
    fn any_of_narrows_must() {
        let got = collect(json!({
            "type": "bool",
            "must": [{ "type": "class_name_regex", "class_name_regex": ".*Service$" }],
            "any_of": [{ "type": "file_regex", "regex": "user_" }],
        }));
        assert_eq!(got, vec!["UserService"]);
    }

    #[test]
    fn empty_must_not_is_identity() {
        let with = collect(json!({
            "type": "bool",
            "must": [{ "type": "class_name_regex", "class_name_regex": ".*Service$" }],
            "must_not": [],
        }));
        assert_eq!(with, vec!["BaseService", "OtherService", "UserService"]);
    }

    #[test]
    fn only_must_not_subtracts_from_universe() {
        let got = collect(json!({
            "type": "bool",
            "must_not": [{ "type": "file_regex", "regex": "base_" }],
        }));
        assert_eq!(got, vec!["UserService", "helper"]);
    }

    #[test]
    fn nested_errors_propagate() {
        let dir = tree(FILES);
        let config: CollectorConfig = serde_json::from_value(json!({
            "type": "bool",
            "must": [{ "type": "nonsense" }],
        }))
        .unwrap();
        let err = BoolCollector::from_config(&config, scope(&dir)).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownCollector { .. }));
    }
}
