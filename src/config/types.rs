use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

use crate::error::SpliceError;

/// Top-level rule set from a `.splice.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuleSet {
	/// What to do when a rule finds fewer matches than it expects.
	/// A command-line flag takes precedence over this.
	#[serde(default)]
	pub on_no_match: Option<NoMatchPolicy>,

	/// Rewrite rules, applied in document order.
	#[serde(default)]
	pub rules: Vec<RuleSpec>,
}

/// A single declarative rewrite rule.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RuleSpec {
	/// Name used in reports and errors. Defaults to `rule-<n>`.
	pub name: Option<String>,

	/// Literal substring match or regular expression match.
	pub kind: RuleKind,

	/// Exact substring to find (literal rules only).
	pub find: Option<String>,

	/// Regular expression to search for (pattern rules only).
	pub pattern: Option<String>,

	/// Replacement text. Inserted verbatim; `$1` and friends are not expanded.
	pub replace: String,

	/// Replace every occurrence instead of only the first.
	/// Defaults to true for literal rules and false for pattern rules.
	pub global: Option<bool>,

	/// Regex flags (pattern rules only).
	#[serde(default)]
	pub flags: Vec<RuleFlag>,

	/// Minimum number of matches the rule expects. Defaults to 1.
	pub min_matches: Option<usize>,
}

/// How a rule matches the buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
	#[default]
	Literal,
	Pattern,
}

impl RuleKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			RuleKind::Literal => "literal",
			RuleKind::Pattern => "pattern",
		}
	}
}

impl fmt::Display for RuleKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Regex flags recognised on pattern rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleFlag {
	/// `^`/`$` match at line boundaries and `.` matches `\n`.
	MultilineDotall,
	Multiline,
	Dotall,
	CaseInsensitive,
}

impl RuleFlag {
	pub fn as_str(&self) -> &'static str {
		match self {
			RuleFlag::MultilineDotall => "multiline_dotall",
			RuleFlag::Multiline => "multiline",
			RuleFlag::Dotall => "dotall",
			RuleFlag::CaseInsensitive => "case_insensitive",
		}
	}
}

/// Consequence of a rule finding fewer matches than it expects.
///
/// The buffer is never modified by such a rule; the policy only decides
/// whether the run is reported, warned about, or aborted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NoMatchPolicy {
	/// Leave the buffer unchanged and say nothing.
	Ignore,

	/// Leave the buffer unchanged and log a warning.
	#[default]
	Warn,

	/// Abort the run; nothing is written.
	Fail,
}

impl NoMatchPolicy {
	pub fn as_str(&self) -> &'static str {
		match self {
			NoMatchPolicy::Ignore => "ignore",
			NoMatchPolicy::Warn => "warn",
			NoMatchPolicy::Fail => "fail",
		}
	}
}

/// Where a rule set came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSource {
	/// A rules file on disk.
	File(PathBuf),

	/// The rule set compiled into the binary.
	Builtin,
}

impl fmt::Display for RuleSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RuleSource::File(path) => write!(f, "{}", path.display()),
			RuleSource::Builtin => f.write_str("<builtin: tetrascript>"),
		}
	}
}

/// A parsed rule set with its source for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedRuleSet {
	/// The parsed rule set.
	pub rule_set: RuleSet,

	/// Where it was loaded from.
	pub source: RuleSource,
}

impl RuleSpec {
	/// Name for reports: the declared name, or `rule-<n>` (1-based).
	pub fn display_name(&self, index: usize) -> String {
		self.name
			.clone()
			.unwrap_or_else(|| format!("rule-{}", index + 1))
	}

	/// Whether this rule replaces every occurrence.
	pub fn is_global(&self) -> bool {
		self.global.unwrap_or(self.kind == RuleKind::Literal)
	}

	/// The text this rule searches for, whichever field holds it.
	pub fn target(&self) -> Option<&str> {
		match self.kind {
			RuleKind::Literal => self.find.as_deref(),
			RuleKind::Pattern => self.pattern.as_deref(),
		}
	}

	/// Check that the fields agree with the declared kind.
	pub fn validate(&self, index: usize) -> Result<(), SpliceError> {
		let rule = self.display_name(index);

		match (self.kind, &self.find, &self.pattern) {
			(_, Some(_), Some(_)) => {
				return Err(SpliceError::MutuallyExclusive {
					rule,
					option1: "find".to_string(),
					option2: "pattern".to_string(),
				});
			}
			(RuleKind::Literal, None, Some(_)) => {
				return Err(SpliceError::InvalidRule {
					rule,
					reason: "literal rules take `find`, not `pattern`".to_string(),
				});
			}
			(RuleKind::Pattern, Some(_), None) => {
				return Err(SpliceError::InvalidRule {
					rule,
					reason: "pattern rules take `pattern`, not `find`".to_string(),
				});
			}
			(RuleKind::Literal, None, None) => {
				return Err(SpliceError::MissingField {
					rule,
					field: "find".to_string(),
				});
			}
			(RuleKind::Pattern, None, None) => {
				return Err(SpliceError::MissingField {
					rule,
					field: "pattern".to_string(),
				});
			}
			_ => {}
		}

		if self.kind == RuleKind::Literal {
			if self.find.as_deref() == Some("") {
				return Err(SpliceError::InvalidRule {
					rule,
					reason: "`find` must not be empty".to_string(),
				});
			}
			if !self.flags.is_empty() {
				return Err(SpliceError::InvalidRule {
					rule,
					reason: "`flags` only apply to pattern rules".to_string(),
				});
			}
		}

		Ok(())
	}
}

impl RuleSet {
	/// Validate all rules in this set.
	pub fn validate(&self) -> Result<(), SpliceError> {
		for (index, rule) in self.rules.iter().enumerate() {
			rule.validate(index)?;
		}
		Ok(())
	}
}
