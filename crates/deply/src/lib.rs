//! # deply
//!
//! Layered-architecture conformance checker for Python code bases.
//!
//! This is the facade crate that re-exports the core framework and the
//! built-in rules, and wires them into a single [`run`] pipeline.
//!
//! ## Configuration
//!
//! ```yaml
//! deply:
//!   paths: ["./src"]
//!   layers:
//!     - name: models
//!       collectors:
//!         - type: class_inherits
//!           base_class: BaseModel
//!     - name: views
//!       collectors:
//!         - type: file_regex
//!           regex: ".*/views.py"
//!   ruleset:
//!     views:
//!       disallow: [models]
//! ```
//!
//! ## Programmatic Usage
//!
//! ```rust,ignore
//! let result = deply::run_file("deply.yaml".as_ref())?;
//! print!("{}", deply::render(&result.violations, deply::ReportFormat::Text)?);
//! ```

#![forbid(unsafe_code)]

// Re-export core types and traits
pub use deply_core::*;

/// Python syntax facade.
pub mod ast {
    pub use deply_ast::*;
}

/// Built-in rules.
pub mod rules {
    pub use deply_rules::*;
}

mod runner;

pub use runner::{run, run_file};
