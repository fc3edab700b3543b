//! Rule compilation and application for splice.
//!
//! This module handles:
//! - Compiling declarative rules into literal or regex matchers
//! - Applying a single rule to a buffer with verbatim replacement text

pub mod compiled;
pub mod rewriter;

pub use compiled::{CompiledRule, Matcher, compile_rules};
pub use rewriter::{Applied, NoMatch};
