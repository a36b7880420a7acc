//! # deply-core
//!
//! Core framework for layered-architecture checks on Python code bases.
//!
//! This crate provides:
//!
//! - [`DeplyConfig`] for loading layers, collectors and rule sets
//! - [`Collector`] and the built-in collectors for selecting elements
//! - [`Layers`] for assembling layers and the element → layer index
//! - [`DependencyAnalyzer`] for deriving dependency edges by name matching
//! - [`Rule`] and [`RuleEngine`] for evaluating rules over edges and elements
//! - [`render`] for text, JSON and HTML reports
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use deply_core::{DeplyConfig, DependencyAnalyzer, Layers, RuleEngine, SourceScope};
//!
//! let config = DeplyConfig::from_file("deply.yaml".as_ref())?;
//! let scope = Arc::new(SourceScope::new(&config.paths, &config.exclude_files)?);
//! let layers = Layers::assemble(&config, &scope)?;
//! let mut analyzer =
//!     DependencyAnalyzer::with_cache(layers.elements(), Arc::clone(scope.parse_cache()));
//! let result = RuleEngine::new(my_rules).run(&layers, &mut analyzer);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod cache;
pub mod collector;
pub mod config;
mod engine;
mod layer;
mod pattern;
mod report;
mod rule;
mod source;
mod types;

pub use analyzer::{DependencyAnalyzer, NameIndex};
pub use cache::{ModuleFacts, ParseCache};
pub use collector::{all_elements, create_collector, Collector, CollectorBox, ElementSet};
pub use config::{
    CollectorConfig, ConfigError, ConfigFormat, DeplyConfig, LayerConfig, NamingSpec, RuleSpec,
};
pub use engine::RuleEngine;
pub use layer::{Layer, Layers};
pub use pattern::Pattern;
pub use report::{render, ReportFormat};
pub use rule::{Rule, RuleBox};
pub use source::{element_of, SourceFile, SourceScope};
pub use types::{AnalysisResult, CodeElement, Dependency, ElementKind, Violation, ViolationType};
