use crate::config::types::RuleSet;
use crate::error::{Result, SpliceError};
use std::path::Path;

/// Parse a rules file from the given path.
pub fn parse_rules_file(path: &Path) -> Result<RuleSet> {
	let content = std::fs::read_to_string(path).map_err(|source| SpliceError::RulesRead {
		path: path.to_path_buf(),
		source,
	})?;

	parse_rules_str(&content, path)
}

/// Parse a rule set from a string. `path` is only used in error messages.
pub fn parse_rules_str(content: &str, path: &Path) -> Result<RuleSet> {
	let rule_set: RuleSet =
		toml::from_str(content).map_err(|source| SpliceError::RulesParse {
			path: path.to_path_buf(),
			source,
		})?;

	rule_set.validate()?;

	Ok(rule_set)
}
