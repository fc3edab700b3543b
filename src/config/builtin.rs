use crate::config::parser::parse_rules_str;
use crate::config::types::RuleSet;
use crate::error::Result;
use std::path::Path;

/// The TetraScript storage/crypto migration, embedded at compile time.
pub const BUILTIN_RULES: &str = include_str!("../../rules/tetrascript.toml");

/// Parse the embedded rule set.
pub fn builtin_rule_set() -> Result<RuleSet> {
	parse_rules_str(BUILTIN_RULES, Path::new("<builtin: tetrascript>"))
}

/// Template written by `splice --init`.
pub fn generate_init_template() -> String {
	r#"# splice rules file
#
# Rules run top to bottom; each one sees the output of the one before it.
# Replacement text is inserted verbatim ($1 is not expanded).

# What to do when a rule finds fewer matches than `min-matches` (default 1):
# "ignore", "warn" or "fail". `--on-no-match` on the command line wins.
on-no-match = "warn"

[[rules]]
name = "stash-write"
kind = "literal"
find = "localStorage.setItem(key, value);"
replace = "await dbSet(key, value);"
# Literal rules replace every occurrence unless `global = false`.

[[rules]]
name = "load-async"
kind = "pattern"
pattern = 'function load\(\) \{.*?\n\}'
flags = ["multiline_dotall"]
# Pattern rules replace only the first match unless `global = true`.
replace = '''
async function load() {
    return await dbGet('state');
}'''
"#
	.to_string()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::types::RuleKind;

	#[test]
	fn test_builtin_rule_set_parses() {
		let rule_set = builtin_rule_set().unwrap();

		let names: Vec<_> = rule_set
			.rules
			.iter()
			.enumerate()
			.map(|(i, r)| r.display_name(i))
			.collect();
		assert_eq!(
			names,
			vec![
				"indexeddb-helpers",
				"encrypt-binary",
				"decrypt-binary",
				"storage-stats-async",
				"status-await-stats",
				"stash-db-set",
				"unlock-db-get",
				"purge-db-keys",
				"help-media-commands",
				"import-db-set",
			]
		);
	}

	#[test]
	fn test_builtin_rules_replace_all_occurrences() {
		let rule_set = builtin_rule_set().unwrap();

		for rule in &rule_set.rules {
			assert!(rule.is_global(), "{:?} should be global", rule.name);
			if rule.kind == RuleKind::Pattern {
				assert!(!rule.flags.is_empty());
			}
		}
	}

	#[test]
	fn test_init_template_parses() {
		let template = generate_init_template();
		let rule_set = parse_rules_str(&template, Path::new(".splice.toml")).unwrap();

		assert_eq!(rule_set.rules.len(), 2);
		assert_eq!(rule_set.rules[1].kind, RuleKind::Pattern);
	}
}
