//! Dependency analysis by lexical name matching.
//!
//! Every collected element is indexed under its short name (the rightmost
//! `.` segment). Each syntactic reference in a source element's file is
//! looked up in that index, and every element found becomes the target of
//! a [`Dependency`] edge. There is no type inference: two classes named
//! `User` in different files are both candidates for a reference to `User`.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::{ModuleFacts, ParseCache};
use crate::types::{CodeElement, Dependency};

/// Short name → every collected element with that short name.
pub type NameIndex = BTreeMap<String, BTreeSet<CodeElement>>;

/// Emits dependency edges between collected elements.
#[derive(Debug, Default)]
pub struct DependencyAnalyzer {
    name_index: NameIndex,
    cache: Arc<ParseCache>,
}

impl DependencyAnalyzer {
    /// Builds the name index over `elements` with a fresh parse cache.
    pub fn new<'a>(elements: impl IntoIterator<Item = &'a CodeElement>) -> Self {
        Self::with_cache(elements, Arc::new(ParseCache::new()))
    }

    /// Builds the name index over `elements`, reading files through
    /// `cache`. Pass the source scope's cache so collectors and the
    /// analyzer share one parse per file.
    pub fn with_cache<'a>(
        elements: impl IntoIterator<Item = &'a CodeElement>,
        cache: Arc<ParseCache>,
    ) -> Self {
        let mut name_index = NameIndex::new();
        for element in elements {
            name_index
                .entry(element.short_name().to_string())
                .or_default()
                .insert(element.clone());
        }
        debug!("Name index holds {} short names", name_index.len());
        Self { name_index, cache }
    }

    /// The short-name index.
    #[must_use]
    pub fn name_index(&self) -> &NameIndex {
        &self.name_index
    }

    /// Elements a probe string resolves to.
    pub fn candidates(&self, probe: &str) -> impl Iterator<Item = &CodeElement> {
        self.name_index.get(probe).into_iter().flatten()
    }

    /// Parsed facts of `file`. A file that cannot be read or parsed has no
    /// references.
    pub fn module(&mut self, file: &Path) -> Arc<ModuleFacts> {
        self.cache.get(file)
    }

    /// Streams every edge from each of `sources` into `sink`.
    ///
    /// All references in a source's file are attributed to the source.
    /// Duplicate edges of one source are passed once. Self-edges are
    /// included. Returns the number of edges passed to `sink`.
    pub fn for_each_dependency<'a, F>(
        &mut self,
        sources: impl IntoIterator<Item = &'a CodeElement>,
        mut sink: F,
    ) -> usize
    where
        F: FnMut(&Dependency),
    {
        let mut emitted = 0;
        for source in sources {
            let module = self.module(source.file());
            let mut seen = BTreeSet::new();
            for reference in &module.references {
                for target in self.candidates(&reference.probe) {
                    if !seen.insert((target, reference.line)) {
                        continue;
                    }
                    sink(&Dependency::new(source.clone(), target.clone(), reference.line));
                    emitted += 1;
                }
            }
        }
        info!("Analyzed {} dependency edges", emitted);
        emitted
    }

    /// Accumulates every edge, grouped by source element.
    pub fn dependencies<'a>(
        &mut self,
        sources: impl IntoIterator<Item = &'a CodeElement>,
    ) -> BTreeMap<CodeElement, BTreeSet<Dependency>> {
        let mut edges: BTreeMap<CodeElement, BTreeSet<Dependency>> = BTreeMap::new();
        self.for_each_dependency(sources, |dependency| {
            edges
                .entry(dependency.source.clone())
                .or_default()
                .insert(dependency.clone());
        });
        edges
    }
}
