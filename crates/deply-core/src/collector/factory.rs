//! Builds collectors from their configuration tag.

use std::sync::Arc;

use super::{
    BoolCollector, ClassInheritsCollector, ClassNameRegexCollector, CollectorBox,
    DecoratorUsageCollector, DirectoryCollector, FileRegexCollector, FunctionNameRegexCollector,
};
use crate::config::{CollectorConfig, ConfigError};
use crate::source::SourceScope;

/// Every collector `type` tag understood by [`create_collector`].
pub const COLLECTOR_TYPES: &[&str] = &[
    "file_regex",
    "class_inherits",
    "class_name_regex",
    "function_name_regex",
    "directory",
    "decorator_usage",
    "bool",
];

/// Builds the collector named by `config.kind`.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownCollector`] for an unknown tag, or the
/// collector's own error for invalid options.
pub fn create_collector(
    config: &CollectorConfig,
    scope: &Arc<SourceScope>,
) -> Result<CollectorBox, ConfigError> {
    let scope = Arc::clone(scope);
    Ok(match config.kind.as_str() {
        "file_regex" => Box::new(FileRegexCollector::from_config(config, scope)?),
        "class_inherits" => Box::new(ClassInheritsCollector::from_config(config, scope)?),
        "class_name_regex" => Box::new(ClassNameRegexCollector::from_config(config, scope)?),
        "function_name_regex" => Box::new(FunctionNameRegexCollector::from_config(config, scope)?),
        "directory" => Box::new(DirectoryCollector::from_config(config, scope)?),
        "decorator_usage" => Box::new(DecoratorUsageCollector::from_config(config, scope)?),
        "bool" => Box::new(BoolCollector::from_config(config, scope)?),
        other => {
            return Err(ConfigError::UnknownCollector {
                kind: other.to_string(),
            })
        }
    })
}
