//! Splice - apply an ordered set of rewrite rules to a source file in place.
//!
//! This library provides the core functionality for splice, including:
//! - Rule set parsing, validation and discovery
//! - Literal and regex rule compilation and application
//! - The ordered rewrite pipeline with a configurable no-match policy
//! - Loading and storing the target file
//!
//! # Example
//!
//! ```no_run
//! use splice_cli::config::builtin_rule_set;
//! use splice_cli::pipeline::Pipeline;
//! use splice_cli::NoMatchPolicy;
//!
//! let rule_set = builtin_rule_set().unwrap();
//! let pipeline = Pipeline::from_rule_set(&rule_set, NoMatchPolicy::Warn).unwrap();
//!
//! let source = std::fs::read_to_string("website/app.js").unwrap();
//! let rewritten = pipeline.run(source).unwrap();
//! println!("{} rules applied", rewritten.report.applied_count());
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod rules;
pub mod source;

pub use config::NoMatchPolicy;
pub use error::{Result, SpliceError};
