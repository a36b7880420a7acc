//! Per-run cache of parsed Python modules.
//!
//! Collectors need a file's definitions and the analyzer needs its
//! references. Both are extracted from a single parse and kept here, so
//! every file is read and parsed at most once per run.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use deply_ast::{Definition, ParseError, ParsedModule, Reference};
use tracing::{debug, warn};

/// What deply keeps of a parsed file.
#[derive(Debug, Default)]
pub struct ModuleFacts {
    /// Classes, functions and module-level variables.
    pub definitions: Vec<Definition>,
    /// Syntactic references edges are derived from.
    pub references: Vec<Reference>,
}

/// Path → parsed facts, shared between the source scope and the analyzer.
#[derive(Debug, Default)]
pub struct ParseCache {
    modules: Mutex<HashMap<PathBuf, Arc<ModuleFacts>>>,
    parses: AtomicUsize,
}

impl ParseCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Facts for `path`, parsing the file on first use. A file that cannot
    /// be read or parsed has empty facts.
    pub fn get(&self, path: &Path) -> Arc<ModuleFacts> {
        if let Some(cached) = self.lock().get(path) {
            return Arc::clone(cached);
        }

        self.parses.fetch_add(1, Ordering::Relaxed);
        let facts = Arc::new(match ParsedModule::from_path(path) {
            Ok(module) => ModuleFacts {
                definitions: module.definitions(),
                references: module.references(),
            },
            Err(e) => {
                log_parse_error(&e);
                ModuleFacts::default()
            }
        });
        Arc::clone(
            self.lock()
                .entry(path.to_path_buf())
                .or_insert_with(|| Arc::clone(&facts)),
        )
    }

    /// Number of files parsed so far.
    #[must_use]
    pub fn parse_count(&self) -> usize {
        self.parses.load(Ordering::Relaxed)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, Arc<ModuleFacts>>> {
        // Inserts are single calls, so a poisoned map is still consistent.
        self.modules.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// IO problems are worth a warning; syntax and encoding problems are
/// expected in real trees and only logged at debug.
fn log_parse_error(error: &ParseError) {
    match error {
        ParseError::Io { .. } | ParseError::Language(_) => warn!("Skipping file: {}", error),
        _ => debug!("Skipping file: {}", error),
    }
}
