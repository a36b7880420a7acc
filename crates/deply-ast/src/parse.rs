//! Parsing Python source into a tree-sitter tree.

use std::path::{Path, PathBuf};

use tree_sitter::{Language, Node, Parser, Tree};

use crate::definitions::{self, Definition};
use crate::imports::{self, ImportRecord};
use crate::references::{self, Reference};
use crate::walk::{ParentMap, Walk};

/// Reasons a source file yields no syntax tree.
///
/// All variants are recoverable: callers skip the file and keep going.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The file is not valid UTF-8.
    #[error("{path} is not valid UTF-8")]
    Encoding {
        /// File that failed.
        path: PathBuf,
    },

    /// The source contains a syntax error.
    #[error("syntax error in {path} at line {line}")]
    Syntax {
        /// File that failed.
        path: PathBuf,
        /// 1-indexed line of the first error node.
        line: usize,
    },

    /// The Python grammar could not be loaded into the parser.
    #[error("failed to load python grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// Tree-sitter returned no tree (cancelled or timed out).
    #[error("parser produced no tree for {path}")]
    NoTree {
        /// File that failed.
        path: PathBuf,
    },
}

/// Statements the grammar still accepts but Python 3 rejects.
const PYTHON2_STATEMENTS: &[&str] = &["print_statement", "exec_statement"];

/// A parsed Python module: its path, source text and syntax tree.
pub struct ParsedModule {
    path: PathBuf,
    source: String,
    tree: Tree,
}

impl std::fmt::Debug for ParsedModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedModule")
            .field("path", &self.path)
            .field("bytes", &self.source.len())
            .finish_non_exhaustive()
    }
}

impl ParsedModule {
    /// Reads and parses a Python file.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the file cannot be read, is not UTF-8 or
    /// does not parse cleanly.
    pub fn from_path(path: &Path) -> Result<Self, ParseError> {
        let bytes = std::fs::read(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let source = String::from_utf8(bytes).map_err(|_| ParseError::Encoding {
            path: path.to_path_buf(),
        })?;
        Self::parse(path, source)
    }

    /// Parses already-loaded source text. `path` is only used for errors
    /// and [`ParsedModule::path`].
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Syntax`] if the tree contains error or missing
    /// nodes, or Python 2 `print` / `exec` statements.
    pub fn parse(path: impl Into<PathBuf>, source: impl Into<String>) -> Result<Self, ParseError> {
        let path = path.into();
        let source = source.into();

        let language: Language = tree_sitter_python::LANGUAGE.into();
        let mut parser = Parser::new();
        parser.set_language(&language)?;

        let Some(tree) = parser.parse(source.as_bytes(), None) else {
            return Err(ParseError::NoTree { path });
        };

        let root = tree.root_node();
        let rejected = Walk::new(root)
            .find(|(node, _)| {
                node.is_error() || node.is_missing() || PYTHON2_STATEMENTS.contains(&node.kind())
            })
            .map(|(node, _)| node.start_position().row)
            .or_else(|| root.has_error().then_some(root.start_position().row));
        if let Some(row) = rejected {
            return Err(ParseError::Syntax {
                path,
                line: row + 1,
            });
        }

        Ok(Self { path, source, tree })
    }

    /// Path this module was parsed from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw source text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Root `module` node.
    #[must_use]
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Source text covered by `node`.
    #[must_use]
    pub fn text(&self, node: Node<'_>) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    /// Lazy pre-order traversal of every node with its depth.
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        Walk::new(self.root())
    }

    /// Builds the parent back-link map for this module.
    #[must_use]
    pub fn parents(&self) -> ParentMap<'_> {
        ParentMap::build(self.root())
    }

    /// All `import` / `from ... import` statements.
    #[must_use]
    pub fn imports(&self) -> Vec<ImportRecord> {
        imports::collect(self)
    }

    /// Classes, functions and module-level variables defined here.
    #[must_use]
    pub fn definitions(&self) -> Vec<Definition> {
        definitions::collect(self)
    }

    /// Every syntactic reference that can resolve to a code element.
    #[must_use]
    pub fn references(&self) -> Vec<Reference> {
        references::collect(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_module() {
        let module = ParsedModule::parse("ok.py", "class A:\n    pass\n").unwrap();
        assert_eq!(module.root().kind(), "module");
        assert_eq!(module.path(), Path::new("ok.py"));
    }

    #[test]
    fn empty_source_is_valid() {
        let module = ParsedModule::parse("empty.py", "").unwrap();
        assert_eq!(module.walk().count(), 1);
    }

    #[test]
    fn syntax_error_reports_line() {
        let err = ParsedModule::parse("bad.py", "x = 1\ndef broken(:\n    pass\n").unwrap_err();
        match err {
            ParseError::Syntax { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn python2_statements_are_syntax_errors() {
        for src in ["x = 1\nprint 'x'\n", "x = 1\nexec 'y = 2'\n"] {
            match ParsedModule::parse("py2.py", src) {
                Err(ParseError::Syntax { line, .. }) => assert_eq!(line, 2, "{src}"),
                other => panic!("expected syntax error for {src:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn print_and_exec_calls_are_valid() {
        assert!(ParsedModule::parse("py3.py", "print('x')\nexec('y = 2')\n").is_ok());
    }

    #[test]
    fn non_utf8_file_is_encoding_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.py");
        std::fs::write(&path, [b'x', b'=', 0xff, 0xfe]).unwrap();
        assert!(matches!(
            ParsedModule::from_path(&path),
            Err(ParseError::Encoding { .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ParsedModule::from_path(Path::new("/definitely/not/here.py")).unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
    }
}
