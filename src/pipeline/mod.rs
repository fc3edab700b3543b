//! The rewrite pipeline: an ordered fold of rules over one buffer.
//!
//! Every rule is compiled before the first one runs, so an invalid pattern
//! aborts the run before any text changes. Rules then run strictly in
//! authored order, each seeing the output of the previous one. Nothing is
//! written to disk unless the whole fold succeeds.

pub mod overlap;

pub use overlap::{Overlap, find_overlaps};

use crate::config::types::{NoMatchPolicy, RuleSet};
use crate::error::Result;
use crate::rules::{CompiledRule, NoMatch, compile_rules};
use crate::source;
use std::path::Path;

/// What happened to one rule during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
	/// The rule matched and rewrote the buffer.
	Applied { matches: usize },

	/// The rule found too few matches and left the buffer unchanged.
	Skipped { expected: usize, found: usize },
}

/// Outcome of one rule, by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleReport {
	pub rule: String,
	pub outcome: RuleOutcome,
}

/// Per-rule outcomes of a run, in application order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
	pub rules: Vec<RuleReport>,
}

impl PipelineReport {
	pub fn applied_count(&self) -> usize {
		self.rules
			.iter()
			.filter(|r| matches!(r.outcome, RuleOutcome::Applied { .. }))
			.count()
	}

	pub fn skipped_count(&self) -> usize {
		self.rules
			.iter()
			.filter(|r| matches!(r.outcome, RuleOutcome::Skipped { .. }))
			.count()
	}

	/// Look up the outcome of a rule by name.
	pub fn outcome(&self, rule: &str) -> Option<RuleOutcome> {
		self.rules
			.iter()
			.find(|r| r.rule == rule)
			.map(|r| r.outcome)
	}
}

/// The final buffer of a run together with its report.
#[derive(Debug, Clone)]
pub struct Rewritten {
	pub text: String,
	pub report: PipelineReport,
}

/// An ordered list of compiled rules plus the no-match policy.
#[derive(Debug, Clone)]
pub struct Pipeline {
	rules: Vec<CompiledRule>,
	policy: NoMatchPolicy,
}

impl Pipeline {
	pub fn new(rules: Vec<CompiledRule>, policy: NoMatchPolicy) -> Self {
		Pipeline { rules, policy }
	}

	/// Compile every rule in `rule_set`.
	pub fn from_rule_set(rule_set: &RuleSet, policy: NoMatchPolicy) -> Result<Self> {
		Ok(Pipeline::new(compile_rules(rule_set)?, policy))
	}

	pub fn rules(&self) -> &[CompiledRule] {
		&self.rules
	}

	pub fn policy(&self) -> NoMatchPolicy {
		self.policy
	}

	/// Fold every rule over `buffer`.
	///
	/// Under [`NoMatchPolicy::Fail`] the first rule that finds too few matches
	/// ends the run with [`SpliceError::NoMatch`](crate::SpliceError::NoMatch).
	pub fn run(&self, buffer: String) -> Result<Rewritten> {
		let mut report = PipelineReport::default();

		let text = self
			.rules
			.iter()
			.try_fold(buffer, |buffer, rule| -> Result<String> {
				let (text, outcome) = match rule.apply(&buffer) {
					Ok(applied) => (
						applied.text,
						RuleOutcome::Applied {
							matches: applied.matches,
						},
					),
					Err(no_match) => (buffer, self.on_no_match(no_match)?),
				};

				report.rules.push(RuleReport {
					rule: rule.name.clone(),
					outcome,
				});
				Ok(text)
			})?;

		Ok(Rewritten { text, report })
	}

	fn on_no_match(&self, no_match: NoMatch) -> Result<RuleOutcome> {
		match self.policy {
			NoMatchPolicy::Fail => Err(no_match.into()),
			NoMatchPolicy::Warn => {
				tracing::warn!(
					rule = %no_match.rule,
					expected = no_match.expected,
					found = no_match.found,
					"rule did not match, leaving buffer unchanged"
				);
				Ok(skipped(&no_match))
			}
			NoMatchPolicy::Ignore => Ok(skipped(&no_match)),
		}
	}
}

fn skipped(no_match: &NoMatch) -> RuleOutcome {
	RuleOutcome::Skipped {
		expected: no_match.expected,
		found: no_match.found,
	}
}

/// Load `path`, run `pipeline` over it and write the result back.
///
/// The file is only written if every rule succeeded under the pipeline's
/// policy.
pub fn rewrite_file(path: &Path, pipeline: &Pipeline) -> Result<PipelineReport> {
	let buffer = source::load(path)?;
	let rewritten = pipeline.run(buffer)?;
	source::store(path, &rewritten.text)?;
	Ok(rewritten.report)
}
