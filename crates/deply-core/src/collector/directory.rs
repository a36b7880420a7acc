//! `directory` collector: elements of files under configured directories.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, warn};

use super::{element_type, exclude_regex, kind_admitted, Collector, ElementSet};
use crate::config::{CollectorConfig, ConfigError};
use crate::pattern::Pattern;
use crate::source::{SourceFile, SourceScope};
use crate::types::ElementKind;

/// Elements from files under one of `directories`, relative to each root.
///
/// With `recursive: false` only files directly inside a directory count.
#[derive(Debug)]
pub struct DirectoryCollector {
    scope: Arc<SourceScope>,
    directories: Vec<String>,
    recursive: bool,
    element_type: Option<ElementKind>,
    exclude: Option<Pattern>,
}

impl DirectoryCollector {
    /// Builds the collector from its configuration entry.
    ///
    /// # Errors
    ///
    /// Returns error if `directories` is missing or any option is invalid.
    pub fn from_config(config: &CollectorConfig, scope: Arc<SourceScope>) -> Result<Self, ConfigError> {
        let directories = config.get_str_list("directories")?;
        if directories.is_empty() {
            return Err(ConfigError::MissingField {
                collector: config.kind.clone(),
                field: "directories".into(),
            });
        }
        Ok(Self {
            directories,
            recursive: config.get_bool("recursive", true)?,
            element_type: element_type(config)?,
            exclude: exclude_regex(config)?,
            scope,
        })
    }

    fn files(&self) -> Vec<SourceFile> {
        let suffix = if self.recursive { "**/*.py" } else { "*.py" };
        let mut files = Vec::new();

        for root in self.scope.roots() {
            for directory in &self.directories {
                let base = root.join(directory.trim_matches('/'));
                let pattern = format!(
                    "{}/{suffix}",
                    glob::Pattern::escape(&base.to_string_lossy())
                );
                let entries = match glob::glob(&pattern) {
                    Ok(entries) => entries,
                    Err(e) => {
                        warn!("Skipping directory {}: {}", base.display(), e);
                        continue;
                    }
                };
                for entry in entries {
                    let path: PathBuf = match entry {
                        Ok(path) => path,
                        Err(e) => {
                            warn!("Skipping unreadable entry: {}", e);
                            continue;
                        }
                    };
                    if !path.is_file() {
                        continue;
                    }
                    if let Some(file) = self.scope.source_file(root, &path, self.exclude.as_ref())
                    {
                        files.push(file);
                    }
                }
            }
        }
        debug!("directory collector matched {} files", files.len());
        files
    }
}

impl Collector for DirectoryCollector {
    fn name(&self) -> &'static str {
        "directory"
    }

    fn collect(&self) -> ElementSet {
        self.files()
            .iter()
            .flat_map(|file| {
                self.scope
                    .elements(file, |d| kind_admitted(self.element_type, d.kind))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::test_support::{names, scope, tree};

    const FILES: &[(&str, &str)] = &[
        ("app/views/list.py", "class ListView:\n    pass\n"),
        ("app/views/generic/base.py", "def render():\n    pass\nTEMPLATE = 'x'\n"),
        ("app/models.py", "class Model:\n    pass\n"),
    ];

    fn collect(config: CollectorConfig) -> Vec<String> {
        let dir = tree(FILES);
        let collector = DirectoryCollector::from_config(&config, scope(&dir)).unwrap();
        names(&collector.collect())
    }

    #[test]
    fn recursive_by_default() {
        let got = collect(CollectorConfig::new("directory").with("directories", vec!["app/views"]));
        assert_eq!(got, vec!["ListView", "TEMPLATE", "render"]);
    }

    #[test]
    fn non_recursive_stays_in_directory() {
        let got = collect(
            CollectorConfig::new("directory")
                .with("directories", vec!["app/views"])
                .with("recursive", false),
        );
        assert_eq!(got, vec!["ListView"]);
    }

    #[test]
    fn element_type_and_exclude() {
        let got = collect(
            CollectorConfig::new("directory")
                .with("directories", vec!["app"])
                .with("element_type", "class")
                .with("exclude_files_regex", "app/models"),
        );
        assert_eq!(got, vec!["ListView"]);
    }

    #[test]
    fn missing_directory_collects_nothing() {
        let got = collect(CollectorConfig::new("directory").with("directories", vec!["nope"]));
        assert!(got.is_empty());
    }
}
