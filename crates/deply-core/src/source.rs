//! Python file enumeration and the parse cache shared by all collectors
//! and the analyzer of a run.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use deply_ast::Definition;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::cache::{ModuleFacts, ParseCache};
use crate::config::ConfigError;
use crate::pattern::Pattern;
use crate::types::CodeElement;

/// A `.py` file found under one of the project roots.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceFile {
    /// Canonical path of the file.
    pub path: PathBuf,
    /// Canonical root the file was found under.
    pub root: PathBuf,
    /// Path relative to `root`, `/`-separated.
    pub relative: String,
}

/// Project roots, global excludes and the parse cache.
pub struct SourceScope {
    roots: Vec<PathBuf>,
    exclude_files: Vec<Pattern>,
    cache: Arc<ParseCache>,
}

impl std::fmt::Debug for SourceScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceScope")
            .field("roots", &self.roots)
            .field("exclude_files", &self.exclude_files)
            .finish_non_exhaustive()
    }
}

impl SourceScope {
    /// Creates a scope over `paths`. Roots that do not exist as
    /// directories are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRegex`] if an exclude pattern does not
    /// compile.
    pub fn new(paths: &[PathBuf], exclude_files: &[String]) -> Result<Self, ConfigError> {
        let exclude_files = exclude_files
            .iter()
            .map(|p| Pattern::searching(p))
            .collect::<Result<Vec<_>, _>>()?;

        let mut roots = Vec::new();
        for path in paths {
            match path.canonicalize() {
                Ok(root) if root.is_dir() => {
                    if !roots.contains(&root) {
                        roots.push(root);
                    }
                }
                Ok(root) => warn!("Skipping root {}: not a directory", root.display()),
                Err(e) => warn!("Skipping root {}: {}", path.display(), e),
            }
        }

        Ok(Self {
            roots,
            exclude_files,
            cache: Arc::new(ParseCache::new()),
        })
    }

    /// Canonical project roots that exist.
    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Whether a root-relative path is excluded, either by a global
    /// `exclude_files` pattern (searched) or by `own` (matched).
    #[must_use]
    pub fn is_excluded(&self, relative: &str, own: Option<&Pattern>) -> bool {
        self.exclude_files.iter().any(|p| p.is_match(relative))
            || own.is_some_and(|p| p.is_match(relative))
    }

    /// Every `.py` file under every root, sorted by root then path, minus
    /// excluded files.
    #[must_use]
    pub fn files(&self, own_exclude: Option<&Pattern>) -> Vec<SourceFile> {
        let mut files = Vec::new();
        for root in &self.roots {
            for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                        continue;
                    }
                };
                if !entry.file_type().is_file()
                    || !entry.path().extension().is_some_and(|ext| ext == "py")
                {
                    continue;
                }
                if let Some(file) = self.source_file(root, entry.path(), own_exclude) {
                    files.push(file);
                }
            }
        }
        files
    }

    /// Builds a [`SourceFile`] for `path` found under `root`, or `None` if
    /// it lies outside the root or is excluded.
    #[must_use]
    pub fn source_file(
        &self,
        root: &Path,
        path: &Path,
        own_exclude: Option<&Pattern>,
    ) -> Option<SourceFile> {
        let relative = relative_path(root, path)?;
        if self.is_excluded(&relative, own_exclude) {
            debug!("Excluding: {}", path.display());
            return None;
        }
        Some(SourceFile {
            path: path.canonicalize().unwrap_or_else(|_| path.to_path_buf()),
            root: root.to_path_buf(),
            relative,
        })
    }

    /// Parsed facts of `path`, parsed at most once per run. Unreadable or
    /// unparsable files have none.
    #[must_use]
    pub fn module(&self, path: &Path) -> Arc<ModuleFacts> {
        self.cache.get(path)
    }

    /// The parse cache, for handing to the dependency analyzer.
    #[must_use]
    pub fn parse_cache(&self) -> &Arc<ParseCache> {
        &self.cache
    }

    /// Elements defined in `file` for which `keep` returns true.
    pub fn elements<F>(&self, file: &SourceFile, mut keep: F) -> Vec<CodeElement>
    where
        F: FnMut(&Definition) -> bool,
    {
        self.module(&file.path)
            .definitions
            .iter()
            .filter(|d| keep(d))
            .map(|d| element_of(&file.path, d))
            .collect()
    }
}

/// Builds the code element for a definition in `file`.
#[must_use]
pub fn element_of(file: &Path, definition: &Definition) -> CodeElement {
    CodeElement::new(
        file,
        definition.qualified_name.clone(),
        definition.kind.into(),
        definition.line,
        definition.column,
    )
}

/// `path` relative to `root` with `/` separators.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}
