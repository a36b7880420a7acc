//! End-to-end pipeline: configuration → layers → edges → violations.

use std::path::Path;
use std::sync::Arc;

use deply_core::{
    AnalysisResult, ConfigError, DependencyAnalyzer, DeplyConfig, Layers, RuleEngine, SourceScope,
};
use deply_rules::rules_from_ruleset;
use tracing::info;

/// Runs a full analysis for `config`.
///
/// # Errors
///
/// Returns [`ConfigError`] if a collector, exclude pattern or rule in the
/// configuration is invalid. Unreadable or unparsable source files are
/// skipped, never reported as errors.
pub fn run(config: &DeplyConfig) -> Result<AnalysisResult, ConfigError> {
    info!(
        "Starting analysis of {} path(s) with {} layer(s)",
        config.paths.len(),
        config.layers.len()
    );

    let rules = rules_from_ruleset(&config.ruleset)?;
    let scope = Arc::new(SourceScope::new(&config.paths, &config.exclude_files)?);
    let layers = Layers::assemble(config, &scope)?;
    let mut analyzer =
        DependencyAnalyzer::with_cache(layers.elements(), Arc::clone(scope.parse_cache()));

    Ok(RuleEngine::new(rules).run(&layers, &mut analyzer))
}

/// Loads the configuration at `path` and runs a full analysis.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be loaded or is invalid.
pub fn run_file(path: &Path) -> Result<AnalysisResult, ConfigError> {
    let config = DeplyConfig::from_file(path)?;
    run(&config)
}
