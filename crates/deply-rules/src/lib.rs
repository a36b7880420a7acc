//! # deply-rules
//!
//! Built-in architecture rules for deply.
//!
//! ## Available Rules
//!
//! | Name | Config key | Checks |
//! |------|------------|--------|
//! | `layer-dependency` | `disallow` | edges from a layer onto forbidden layers |
//! | `class-naming` | `class_naming.regex` | simple names of a layer's classes |
//! | `function-naming` | `function_naming.regex` | simple names of a layer's functions |
//!
//! ## Usage
//!
//! ```ignore
//! use deply_rules::rules_from_ruleset;
//!
//! let rules = rules_from_ruleset(&config.ruleset)?;
//! let result = deply_core::RuleEngine::new(rules).run(&layers, &mut analyzer);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod layer_dependency;
mod naming;
mod ruleset;

pub use layer_dependency::LayerDependencyRule;
pub use naming::{ClassNamingRule, FunctionNamingRule};
pub use ruleset::rules_from_ruleset;
