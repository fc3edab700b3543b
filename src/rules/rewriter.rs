use crate::rules::compiled::{CompiledRule, Matcher};
use regex::NoExpand;

/// Result of applying one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
	/// The rewritten buffer.
	pub text: String,

	/// Number of occurrences replaced.
	pub matches: usize,
}

/// A rule found fewer matches than it expects. The buffer is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Rule `{rule}` expected at least {expected} match(es), found {found}")]
pub struct NoMatch {
	/// Name of the rule.
	pub rule: String,

	/// The rule's `min-matches`.
	pub expected: usize,

	/// Occurrences actually present in the buffer.
	pub found: usize,
}

impl CompiledRule {
	/// Apply this rule to `buffer`.
	///
	/// The replacement text is inserted as-is, so text such as `${id}` in a
	/// replacement body survives untouched.
	pub fn apply(&self, buffer: &str) -> Result<Applied, NoMatch> {
		let found = self.count_matches(buffer);

		if found < self.min_matches {
			return Err(NoMatch {
				rule: self.name.clone(),
				expected: self.min_matches,
				found,
			});
		}

		if found == 0 {
			return Ok(Applied {
				text: buffer.to_string(),
				matches: 0,
			});
		}

		let text = match (&self.matcher, self.global) {
			(Matcher::Literal(find), true) => buffer.replace(find.as_str(), &self.replace),
			(Matcher::Literal(find), false) => buffer.replacen(find.as_str(), &self.replace, 1),
			(Matcher::Pattern(regex), true) => regex
				.replace_all(buffer, NoExpand(&self.replace))
				.into_owned(),
			(Matcher::Pattern(regex), false) => {
				regex.replace(buffer, NoExpand(&self.replace)).into_owned()
			}
		};

		let matches = if self.global { found } else { 1 };
		tracing::debug!(rule = %self.name, matches, "applied rule");

		Ok(Applied { text, matches })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::types::{RuleFlag, RuleKind, RuleSpec};

	fn literal(find: &str, replace: &str) -> CompiledRule {
		let spec = RuleSpec {
			kind: RuleKind::Literal,
			find: Some(find.to_string()),
			replace: replace.to_string(),
			..Default::default()
		};
		CompiledRule::compile(&spec, 0).unwrap()
	}

	fn pattern(pattern: &str, replace: &str) -> CompiledRule {
		let spec = RuleSpec {
			kind: RuleKind::Pattern,
			pattern: Some(pattern.to_string()),
			replace: replace.to_string(),
			flags: vec![RuleFlag::MultilineDotall],
			..Default::default()
		};
		CompiledRule::compile(&spec, 0).unwrap()
	}

	#[test]
	fn test_literal_replaces_single_occurrence() {
		let rule = literal(
			"localStorage.setItem('TS64_STASH_' + id, encryptedB64);",
			"await dbSet('TS64_STASH_' + id, encryptedB64);",
		);
		let buffer = "\
            const encryptedB64 = await encryptData(text, pwd);
            localStorage.setItem('TS64_STASH_' + id, encryptedB64);
            localStorage.setItem('TS64_THEME', theme);
";

		let applied = rule.apply(buffer).unwrap();

		assert_eq!(applied.matches, 1);
		assert_eq!(
			applied.text,
			"\
            const encryptedB64 = await encryptData(text, pwd);
            await dbSet('TS64_STASH_' + id, encryptedB64);
            localStorage.setItem('TS64_THEME', theme);
"
		);
	}

	#[test]
	fn test_literal_global_and_single_shot() {
		let global = literal("foo", "bar");
		assert_eq!(global.apply("foo foo foo").unwrap().text, "bar bar bar");
		assert_eq!(global.apply("foo foo foo").unwrap().matches, 3);

		let mut single = literal("foo", "bar");
		single.global = false;
		let applied = single.apply("foo foo foo").unwrap();
		assert_eq!(applied.text, "bar foo foo");
		assert_eq!(applied.matches, 1);
	}

	#[test]
	fn test_pattern_spans_lines() {
		let rule = pattern(
			r"function save\(\) \{.*?\n\}",
			"async function save() {\n    await dbSet('k', v);\n}",
		);
		let buffer = "a();\nfunction save() {\n    localStorage.setItem('k', v);\n}\nb();\n";

		let applied = rule.apply(buffer).unwrap();

		assert_eq!(
			applied.text,
			"a();\nasync function save() {\n    await dbSet('k', v);\n}\nb();\n"
		);
	}

	#[test]
	fn test_pattern_replaces_first_match_by_default() {
		let rule = pattern(r"x+", "y");
		let applied = rule.apply("xx-xxx").unwrap();

		assert_eq!(applied.text, "y-xxx");
		assert_eq!(applied.matches, 1);
	}

	#[test]
	fn test_replacement_is_not_expanded() {
		let rule = pattern(r"(\w+) = 1;", "`Key Restored: ${id}` $1 $$");
		let applied = rule.apply("let a = 1;").unwrap();

		assert_eq!(applied.text, "let `Key Restored: ${id}` $1 $$");
	}

	#[test]
	fn test_pattern_no_match_leaves_buffer_alone() {
		let rule = pattern(r"async function encryptData\(text, password\) \{.*?\}", "x");
		let buffer = "async function encryptData(data, password) {\n}\n";

		let err = rule.apply(buffer).unwrap_err();

		assert_eq!(
			err,
			NoMatch {
				rule: "rule-1".to_string(),
				expected: 1,
				found: 0,
			}
		);
	}

	#[test]
	fn test_min_matches_above_found() {
		let mut rule = literal("dbGet(", "dbRead(");
		rule.min_matches = 3;

		let err = rule.apply("dbGet(a); dbGet(b);").unwrap_err();
		assert_eq!(err.expected, 3);
		assert_eq!(err.found, 2);
		assert_eq!(
			err.to_string(),
			"Rule `rule-1` expected at least 3 match(es), found 2"
		);
	}

	#[test]
	fn test_optional_rule_with_zero_min_matches() {
		let mut rule = literal("missing", "x");
		rule.min_matches = 0;

		let applied = rule.apply("unchanged").unwrap();
		assert_eq!(applied.text, "unchanged");
		assert_eq!(applied.matches, 0);
	}
}
