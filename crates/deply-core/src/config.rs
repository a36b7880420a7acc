//! YAML / TOML configuration for layers, collectors and rules.
//!
//! The document may nest everything under a top-level `deply:` key:
//!
//! ```yaml
//! deply:
//!   paths: ["./src"]
//!   exclude_files: ["migrations/"]
//!   layers:
//!     - name: models
//!       collectors:
//!         - type: class_inherits
//!           base_class: BaseModel
//!   ruleset:
//!     views:
//!       disallow: [models]
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::pattern::Pattern;

/// Key the configuration may be nested under.
pub const ROOT_KEY: &str = "deply";

/// Errors when loading or interpreting configuration.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ConfigError {
    /// Failed to read config file.
    #[error("failed to read {path}: {source}")]
    #[diagnostic(code(deply::config::io))]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// IO error.
        source: std::io::Error,
    },

    /// The file is not valid YAML / TOML or does not fit the schema.
    #[error("invalid config: {message}")]
    #[diagnostic(
        code(deply::config::parse),
        help("check the document syntax and the types of `paths`, `layers` and `ruleset`")
    )]
    Parse {
        /// Parse error detail.
        message: String,
    },

    /// No configuration file was given or found.
    #[error("no configuration file found in {dir}")]
    #[diagnostic(
        code(deply::config::not_found),
        help("pass --config <path> or create deply.yaml in the working directory")
    )]
    NotFound {
        /// Directory that was searched.
        dir: PathBuf,
    },

    /// A collector `type` tag that no collector implements.
    #[error("unknown collector type `{kind}`")]
    #[diagnostic(
        code(deply::config::unknown_collector),
        help("expected one of: file_regex, class_inherits, class_name_regex, function_name_regex, directory, decorator_usage, bool")
    )]
    UnknownCollector {
        /// The unrecognized tag.
        kind: String,
    },

    /// A collector option that is required but absent.
    #[error("collector `{collector}` requires `{field}`")]
    #[diagnostic(code(deply::config::missing_field))]
    MissingField {
        /// Collector type.
        collector: String,
        /// Missing option name.
        field: String,
    },

    /// A collector option with the wrong shape or value.
    #[error("collector `{collector}`: invalid `{field}`: {reason}")]
    #[diagnostic(code(deply::config::invalid_field))]
    InvalidField {
        /// Collector type.
        collector: String,
        /// Offending option name.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A regular expression that does not compile.
    #[error("invalid regex `{pattern}`: {reason}")]
    #[diagnostic(code(deply::config::invalid_regex))]
    InvalidRegex {
        /// The pattern as written.
        pattern: String,
        /// Compiler message.
        reason: String,
    },

    /// Config is structurally invalid.
    #[error("config validation: {0}")]
    #[diagnostic(code(deply::config::validation))]
    Validation(String),
}

/// Configuration file syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML document.
    Yaml,
    /// TOML document.
    Toml,
}

impl ConfigFormat {
    /// `.toml` files are TOML, everything else is YAML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

/// One collector entry: a `type` tag plus collector-specific options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Collector tag (`file_regex`, `bool`, ...).
    #[serde(rename = "type")]
    pub kind: String,

    /// Every other key of the entry.
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl CollectorConfig {
    /// Creates a collector entry with no options.
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            options: Map::new(),
        }
    }

    /// Adds an option, builder style.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.options.insert(key.to_string(), value.into());
        self
    }

    fn invalid(&self, field: &str, reason: &str) -> ConfigError {
        ConfigError::InvalidField {
            collector: self.kind.clone(),
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Gets an optional string option. `null` counts as absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] if the value is not a string.
    pub fn get_str(&self, key: &str) -> Result<Option<&str>, ConfigError> {
        match self.options.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(self.invalid(key, "expected a string")),
        }
    }

    /// Gets a required, non-empty string option.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] if absent or empty.
    pub fn require_str(&self, key: &str) -> Result<&str, ConfigError> {
        match self.get_str(key)? {
            Some(s) if !s.is_empty() => Ok(s),
            _ => Err(ConfigError::MissingField {
                collector: self.kind.clone(),
                field: key.to_string(),
            }),
        }
    }

    /// Gets a boolean option, falling back to `default`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] if the value is not a boolean.
    pub fn get_bool(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        match self.options.get(key) {
            None | Some(Value::Null) => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(_) => Err(self.invalid(key, "expected true or false")),
        }
    }

    /// Gets a list of strings. A single string is a one-element list.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] for any other shape.
    pub fn get_str_list(&self, key: &str) -> Result<Vec<String>, ConfigError> {
        match self.options.get(key) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::String(s)) => Ok(vec![s.clone()]),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| self.invalid(key, "expected a list of strings"))
                })
                .collect(),
            Some(_) => Err(self.invalid(key, "expected a list of strings")),
        }
    }

    /// Gets a list of nested collector entries (for `bool`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] if the value is not a list of
    /// collector entries.
    pub fn nested(&self, key: &str) -> Result<Vec<CollectorConfig>, ConfigError> {
        match self.options.get(key) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value @ Value::Array(_)) => serde_json::from_value(value.clone())
                .map_err(|e| self.invalid(key, &e.to_string())),
            Some(_) => Err(self.invalid(key, "expected a list of collectors")),
        }
    }
}

/// A named layer and the collectors that populate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Layer name, unique within a configuration.
    pub name: String,

    /// Collectors whose results are unioned into the layer.
    #[serde(default)]
    pub collectors: Vec<CollectorConfig>,
}

/// Naming constraint for one element kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamingSpec {
    /// Pattern the simple name must match (anchored at the start).
    pub regex: String,
}

/// Rules attached to one layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSpec {
    /// Layers this layer must not depend on.
    #[serde(default, alias = "disallow_layer_dependencies")]
    pub disallow: Vec<String>,

    /// Naming constraint for classes in this layer.
    #[serde(default)]
    pub class_naming: Option<NamingSpec>,

    /// Naming constraint for functions in this layer.
    #[serde(default)]
    pub function_naming: Option<NamingSpec>,
}

/// Validated top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeplyConfig {
    /// Project roots, absolute or relative to the working directory.
    pub paths: Vec<PathBuf>,

    /// Regexes searched in root-relative file paths; matches are skipped.
    pub exclude_files: Vec<String>,

    /// Layer definitions, in processing order.
    pub layers: Vec<LayerConfig>,

    /// Rules keyed by layer name.
    pub ruleset: BTreeMap<String, RuleSpec>,
}

/// Document shape before defaults are applied. `null` is treated as absent.
#[derive(Deserialize)]
struct RawConfig {
    #[serde(default)]
    paths: Option<Vec<PathBuf>>,
    #[serde(default)]
    exclude_files: Option<Vec<String>>,
    #[serde(default)]
    layers: Option<Vec<LayerConfig>>,
    #[serde(default)]
    ruleset: Option<BTreeMap<String, Option<RuleSpec>>>,
}

impl DeplyConfig {
    /// Loads and validates a configuration file. Relative `paths` resolve
    /// against the file's directory, which is also the default root.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Self::parse(&content, ConfigFormat::from_path(path), base_dir)
    }

    /// Parses and validates a configuration document.
    ///
    /// # Errors
    ///
    /// Returns error if the document is malformed or fails validation.
    pub fn parse(content: &str, format: ConfigFormat, base_dir: &Path) -> Result<Self, ConfigError> {
        let document: Value = match format {
            _ if content.trim().is_empty() => Value::Null,
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| ConfigError::Parse {
                message: e.to_string(),
            })?,
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| ConfigError::Parse {
                message: e.to_string(),
            })?,
        };

        let document = match document {
            Value::Null => Value::Object(Map::new()),
            Value::Object(mut map) if map.get(ROOT_KEY).is_some_and(Value::is_object) => {
                map.remove(ROOT_KEY).unwrap_or_default()
            }
            other => other,
        };

        let raw: RawConfig = serde_json::from_value(document).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;

        let paths = match raw.paths {
            Some(paths) if !paths.is_empty() => paths
                .into_iter()
                .map(|p| if p.is_relative() { base_dir.join(p) } else { p })
                .collect(),
            _ => vec![base_dir.to_path_buf()],
        };

        let config = Self {
            paths,
            exclude_files: raw.exclude_files.unwrap_or_default(),
            layers: raw.layers.unwrap_or_default(),
            ruleset: raw
                .ruleset
                .unwrap_or_default()
                .into_iter()
                .map(|(layer, spec)| (layer, spec.unwrap_or_default()))
                .collect(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks cross references and patterns that do not depend on the
    /// file system.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut names = BTreeSet::new();
        for layer in &self.layers {
            if layer.name.trim().is_empty() {
                return Err(ConfigError::Validation("layer with empty name".into()));
            }
            if !names.insert(layer.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate layer name `{}`",
                    layer.name
                )));
            }
        }

        for pattern in &self.exclude_files {
            Pattern::searching(pattern)?;
        }

        for (layer, spec) in &self.ruleset {
            if !names.contains(layer.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "ruleset refers to undefined layer `{layer}`"
                )));
            }
            if let Some(target) = spec.disallow.iter().find(|t| !names.contains(t.as_str())) {
                return Err(ConfigError::Validation(format!(
                    "layer `{layer}` disallows undefined layer `{target}`"
                )));
            }
            for naming in [&spec.class_naming, &spec.function_naming].into_iter().flatten() {
                Pattern::matching(&naming.regex)?;
            }
        }
        Ok(())
    }

    /// Returns the layer definition with the given name.
    #[must_use]
    pub fn layer(&self, name: &str) -> Option<&LayerConfig> {
        self.layers.iter().find(|l| l.name == name)
    }
}
