use crate::rules::CompiledRule;
use std::ops::Range;

/// Two rules whose match regions intersect in the same buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlap {
	/// The rule that runs first.
	pub first: String,
	pub first_range: Range<usize>,

	/// The rule that runs later and will see the first rule's output.
	pub second: String,
	pub second_range: Range<usize>,
}

/// Report pairs of rules whose matches intersect in `buffer`.
///
/// Every rule is evaluated against the same buffer rather than against the
/// output of the rules before it. A rule that only matches text inserted by
/// an earlier rule therefore has no ranges here and is never reported.
/// At most one overlap is reported per pair of rules.
pub fn find_overlaps(rules: &[CompiledRule], buffer: &str) -> Vec<Overlap> {
	let ranges: Vec<Vec<Range<usize>>> = rules.iter().map(|r| r.match_ranges(buffer)).collect();
	let mut overlaps = Vec::new();

	for (i, first) in rules.iter().enumerate() {
		for (j, second) in rules.iter().enumerate().skip(i + 1) {
			let hit = ranges[i].iter().find_map(|a| {
				ranges[j]
					.iter()
					.find(|b| intersects(a, b))
					.map(|b| (a.clone(), b.clone()))
			});

			if let Some((first_range, second_range)) = hit {
				overlaps.push(Overlap {
					first: first.name.clone(),
					first_range,
					second: second.name.clone(),
					second_range,
				});
			}
		}
	}

	overlaps
}

fn intersects(a: &Range<usize>, b: &Range<usize>) -> bool {
	a.start < b.end && b.start < a.end
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::types::{RuleFlag, RuleKind, RuleSpec};

	fn rule(name: &str, kind: RuleKind, target: &str) -> CompiledRule {
		let mut spec = RuleSpec {
			name: Some(name.to_string()),
			kind,
			..Default::default()
		};
		match kind {
			RuleKind::Literal => spec.find = Some(target.to_string()),
			RuleKind::Pattern => {
				spec.pattern = Some(target.to_string());
				spec.flags = vec![RuleFlag::MultilineDotall];
			}
		}
		CompiledRule::compile(&spec, 0).unwrap()
	}

	#[test]
	fn test_disjoint_rules() {
		let rules = vec![
			rule("save", RuleKind::Literal, "localStorage.setItem(k, v);"),
			rule("load", RuleKind::Literal, "localStorage.getItem(k);"),
		];
		let buffer = "localStorage.setItem(k, v);\nlocalStorage.getItem(k);\n";

		assert!(find_overlaps(&rules, buffer).is_empty());
	}

	#[test]
	fn test_pattern_swallowing_literal_target() {
		let rules = vec![
			rule("status", RuleKind::Literal, "render();"),
			rule("body", RuleKind::Pattern, r"function run\(\) \{.*?\n\}"),
		];
		let buffer = "function run() {\n    render();\n}\n";

		let overlaps = find_overlaps(&rules, buffer);

		assert_eq!(
			overlaps,
			vec![Overlap {
				first: "status".to_string(),
				first_range: 21..30,
				second: "body".to_string(),
				second_range: 0..32,
			}]
		);
	}

	#[test]
	fn test_adjacent_ranges_do_not_overlap() {
		let rules = vec![
			rule("a", RuleKind::Literal, "foo"),
			rule("b", RuleKind::Literal, "bar"),
		];

		assert!(find_overlaps(&rules, "foobar").is_empty());
	}

	#[test]
	fn test_rule_matching_only_inserted_text_is_ignored() {
		let rules = vec![
			rule("insert", RuleKind::Literal, "init() {"),
			rule("needs-insert", RuleKind::Literal, "dbSet("),
		];

		assert!(find_overlaps(&rules, "init() {\n}\n").is_empty());
	}
}
