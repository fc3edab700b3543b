//! Rule set loading and parsing for splice.
//!
//! This module handles:
//! - TOML rules file parsing and validation
//! - Rules file discovery from the working directory
//! - The built-in rule set

pub mod builtin;
pub mod discovery;
pub mod parser;
pub mod types;

pub use builtin::{BUILTIN_RULES, builtin_rule_set, generate_init_template};
pub use discovery::{RULES_FILE_NAME, discover_rules_file, load_rule_set, user_rules_path};
pub use parser::{parse_rules_file, parse_rules_str};
pub use types::{
	LoadedRuleSet, NoMatchPolicy, RuleFlag, RuleKind, RuleSet, RuleSource, RuleSpec,
};
