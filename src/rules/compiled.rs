use crate::config::types::{RuleFlag, RuleKind, RuleSet, RuleSpec};
use crate::error::{Result, SpliceError};
use regex::{Regex, RegexBuilder};
use std::ops::Range;

/// What a compiled rule searches for.
#[derive(Debug, Clone)]
pub enum Matcher {
	/// Exact substring.
	Literal(String),

	/// Compiled regular expression.
	Pattern(Regex),
}

/// A rule ready to be applied to a buffer.
#[derive(Debug, Clone)]
pub struct CompiledRule {
	/// Name for reports and errors.
	pub name: String,

	/// What to search for.
	pub matcher: Matcher,

	/// Replacement text, inserted verbatim.
	pub replace: String,

	/// Replace every occurrence instead of only the first.
	pub global: bool,

	/// Fewer matches than this is a no-match.
	pub min_matches: usize,
}

impl CompiledRule {
	/// Compile the rule at `index` of a rule set.
	pub fn compile(spec: &RuleSpec, index: usize) -> Result<Self> {
		spec.validate(index)?;
		let name = spec.display_name(index);

		let matcher = match spec.kind {
			RuleKind::Literal => Matcher::Literal(spec.find.clone().unwrap_or_default()),
			RuleKind::Pattern => {
				let pattern = spec.pattern.as_deref().unwrap_or_default();
				Matcher::Pattern(compile_pattern(&name, pattern, &spec.flags)?)
			}
		};

		Ok(CompiledRule {
			name,
			matcher,
			replace: spec.replace.clone(),
			global: spec.is_global(),
			min_matches: spec.min_matches.unwrap_or(1),
		})
	}

	/// Count every non-overlapping occurrence in `haystack`.
	pub fn count_matches(&self, haystack: &str) -> usize {
		match &self.matcher {
			Matcher::Literal(find) => haystack.matches(find.as_str()).count(),
			Matcher::Pattern(regex) => regex.find_iter(haystack).count(),
		}
	}

	/// Byte ranges this rule would replace in `haystack`.
	///
	/// Single-shot rules yield at most one range.
	pub fn match_ranges(&self, haystack: &str) -> Vec<Range<usize>> {
		let limit = if self.global { usize::MAX } else { 1 };

		match &self.matcher {
			Matcher::Literal(find) => haystack
				.match_indices(find.as_str())
				.take(limit)
				.map(|(start, found)| start..start + found.len())
				.collect(),
			Matcher::Pattern(regex) => regex
				.find_iter(haystack)
				.take(limit)
				.map(|m| m.range())
				.collect(),
		}
	}
}

/// Compile a pattern with the rule's flags.
fn compile_pattern(rule: &str, pattern: &str, flags: &[RuleFlag]) -> Result<Regex> {
	let mut builder = RegexBuilder::new(pattern);

	for flag in flags {
		match flag {
			RuleFlag::MultilineDotall => {
				builder.multi_line(true).dot_matches_new_line(true);
			}
			RuleFlag::Multiline => {
				builder.multi_line(true);
			}
			RuleFlag::Dotall => {
				builder.dot_matches_new_line(true);
			}
			RuleFlag::CaseInsensitive => {
				builder.case_insensitive(true);
			}
		}
	}

	builder.build().map_err(|source| SpliceError::PatternCompile {
		rule: rule.to_string(),
		pattern: pattern.to_string(),
		source,
	})
}

/// Compile every rule in a set. Fails on the first invalid rule, before any
/// rule has touched a buffer.
pub fn compile_rules(rule_set: &RuleSet) -> Result<Vec<CompiledRule>> {
	rule_set
		.rules
		.iter()
		.enumerate()
		.map(|(index, spec)| CompiledRule::compile(spec, index))
		.collect()
}
