use std::path::PathBuf;

use crate::rules::NoMatch;

/// Library-level structured errors for splice.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum SpliceError {
	#[error("Failed to read source file: {path}")]
	SourceRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to write source file: {path}")]
	SourceWrite {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to read rules file: {path}")]
	RulesRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse rules file: {path}")]
	RulesParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid pattern in rule `{rule}`: {pattern}")]
	PatternCompile {
		rule: String,
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Rule `{rule}`: mutually exclusive options {option1} and {option2}")]
	MutuallyExclusive {
		rule: String,
		option1: String,
		option2: String,
	},

	#[error("Rule `{rule}` is missing required field `{field}`")]
	MissingField { rule: String, field: String },

	#[error("Rule `{rule}` is invalid: {reason}")]
	InvalidRule { rule: String, reason: String },

	#[error(transparent)]
	NoMatch(#[from] NoMatch),
}

/// Result type alias using SpliceError.
pub type Result<T> = std::result::Result<T, SpliceError>;
