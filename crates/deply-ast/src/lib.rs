//! # deply-ast
//!
//! Tree-sitter based Python syntax facade for deply.
//!
//! deply never implements a Python parser itself. This crate wraps
//! `tree-sitter-python` and exposes just what the collectors and the
//! dependency analyzer need:
//!
//! - [`ParsedModule`] for parsing a file once and keeping its tree
//! - [`Walk`] and [`ParentMap`] for traversal and parent back-links
//! - [`ImportRecord`], [`import_aliases`], [`base_name`], [`full_dotted`]
//!   for alias-aware name resolution
//! - [`Definition`] for classes, functions and module-level variables
//! - [`Reference`] for the syntactic references dependency edges come from

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod definitions;
pub mod imports;
pub mod parse;
pub mod references;
pub mod walk;

pub use definitions::{Definition, DefinitionKind};
pub use imports::{base_name, full_dotted, import_aliases, ImportRecord};
pub use parse::{ParseError, ParsedModule};
pub use references::{Reference, ReferenceKind};
pub use walk::{ParentMap, Walk};
