use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use splice_cli::NoMatchPolicy;
use splice_cli::config::{
	LoadedRuleSet, RULES_FILE_NAME, RuleSpec, generate_init_template, load_rule_set,
};
use splice_cli::pipeline::{Pipeline, RuleOutcome, find_overlaps, rewrite_file};
use splice_cli::rules::compile_rules;
use splice_cli::source;

#[derive(Parser)]
#[command(name = "splice")]
#[command(
	author,
	version,
	about = "Apply an ordered set of literal and regex rewrite rules to a source file in place"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Rules file to use instead of discovering .splice.toml
	#[arg(long, value_name = "FILE", global = true)]
	rules: Option<PathBuf>,

	/// What to do when a rule finds no match
	#[arg(long, value_enum, value_name = "POLICY")]
	on_no_match: Option<NoMatchPolicy>,

	/// Abort without writing if any rule finds no match (same as --on-no-match fail)
	#[arg(long, conflicts_with = "on_no_match")]
	strict: bool,

	/// Create a template .splice.toml in the current directory
	#[arg(long)]
	init: bool,

	/// Overwrite existing .splice.toml when using --init
	#[arg(long, requires = "init")]
	force: bool,

	/// Increase log verbosity (-v info, -vv debug)
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,

	/// Source file to rewrite in place
	#[arg(value_name = "TARGET")]
	target: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
	/// Rule set inspection commands
	Rules {
		#[command(subcommand)]
		action: RulesAction,
	},
}

#[derive(Subcommand)]
enum RulesAction {
	/// Display the effective rule set and where it came from
	Show,
	/// Parse and compile every rule without touching any file
	Validate,
	/// Report rules whose matches overlap in TARGET
	Overlaps {
		/// Source file to check
		target: PathBuf,
	},
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	match run(cli) {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn init_tracing(verbose: u8) {
	let default_directive = match verbose {
		0 => "splice_cli=warn",
		1 => "splice_cli=info",
		_ => "splice_cli=debug",
	};
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(std::io::stderr().is_terminal())
		.with_target(false)
		.init();
}

fn run(cli: Cli) -> Result<ExitCode> {
	// Handle --init
	if cli.init {
		return handle_init(cli.force);
	}

	let rules_path = cli.rules.as_deref();

	// Handle subcommands
	if let Some(command) = cli.command {
		return match command {
			Commands::Rules { action } => match action {
				RulesAction::Show => handle_rules_show(rules_path),
				RulesAction::Validate => handle_rules_validate(rules_path),
				RulesAction::Overlaps { target } => handle_rules_overlaps(rules_path, &target),
			},
		};
	}

	let policy_flag = if cli.strict {
		Some(NoMatchPolicy::Fail)
	} else {
		cli.on_no_match
	};

	match cli.target {
		Some(target) => handle_rewrite(&target, rules_path, policy_flag),
		// No target specified - this shouldn't happen due to arg_required_else_help
		None => anyhow::bail!("No target file given"),
	}
}

fn load_rules(rules_path: Option<&Path>) -> Result<LoadedRuleSet> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	load_rule_set(rules_path, &cwd).context("Failed to load rule set")
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let rules_path = PathBuf::from(RULES_FILE_NAME);

	if rules_path.exists() && !force {
		anyhow::bail!("{RULES_FILE_NAME} already exists. Use --force to overwrite.");
	}

	std::fs::write(&rules_path, generate_init_template())
		.with_context(|| format!("Failed to write {}", rules_path.display()))?;

	println!("Created {RULES_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}

fn handle_rewrite(
	target: &Path,
	rules_path: Option<&Path>,
	policy_flag: Option<NoMatchPolicy>,
) -> Result<ExitCode> {
	let loaded = load_rules(rules_path)?;
	let policy = policy_flag
		.or(loaded.rule_set.on_no_match)
		.unwrap_or_default();

	let pipeline =
		Pipeline::from_rule_set(&loaded.rule_set, policy).context("Failed to compile rules")?;

	tracing::info!(
		rules = pipeline.rules().len(),
		source = %loaded.source,
		policy = policy.as_str(),
		"rewriting {}",
		target.display()
	);

	let report = rewrite_file(target, &pipeline)
		.with_context(|| format!("Failed to rewrite {}", target.display()))?;

	for rule in &report.rules {
		match rule.outcome {
			RuleOutcome::Applied { matches } => {
				println!("  applied  {} ({} match{})", rule.rule, matches, plural(matches));
			}
			RuleOutcome::Skipped { expected, found } => {
				println!(
					"  skipped  {} (expected {}, found {})",
					rule.rule, expected, found
				);
			}
		}
	}
	println!(
		"Rewrote {}: {} applied, {} skipped",
		target.display(),
		report.applied_count(),
		report.skipped_count()
	);

	Ok(ExitCode::SUCCESS)
}

fn handle_rules_show(rules_path: Option<&Path>) -> Result<ExitCode> {
	let loaded = load_rules(rules_path)?;
	let rule_set = &loaded.rule_set;

	println!("# Source: {}", loaded.source);
	match rule_set.on_no_match {
		Some(policy) => println!("# on-no-match: {}", policy.as_str()),
		None => println!(
			"# on-no-match: {} (default)",
			NoMatchPolicy::default().as_str()
		),
	}
	println!("# rules: {}", rule_set.rules.len());
	println!();

	for (i, rule) in rule_set.rules.iter().enumerate() {
		print_rule(i, rule);
	}

	Ok(ExitCode::SUCCESS)
}

fn print_rule(index: usize, rule: &RuleSpec) {
	println!("  Rule {}: {}", index + 1, rule.display_name(index));
	println!("    kind: {}", rule.kind);
	if let Some(ref find) = rule.find {
		println!("    find: {}", summarize(find));
	}
	if let Some(ref pattern) = rule.pattern {
		println!("    pattern: {}", summarize(pattern));
	}
	if !rule.flags.is_empty() {
		let flags: Vec<_> = rule.flags.iter().map(|f| f.as_str()).collect();
		println!("    flags: {}", flags.join(", "));
	}
	println!("    global: {}", rule.is_global());
	if let Some(min) = rule.min_matches {
		println!("    min-matches: {}", min);
	}
	println!("    replace: {}", summarize(&rule.replace));
	println!();
}

/// First line of `text`, with a note about how many lines follow.
fn summarize(text: &str) -> String {
	let mut lines = text.lines();
	let first = lines.next().unwrap_or("");
	let rest = lines.count();

	if rest == 0 {
		first.to_string()
	} else {
		format!("{first} ... (+{rest} lines)")
	}
}

fn plural(count: usize) -> &'static str {
	if count == 1 { "" } else { "es" }
}

fn handle_rules_validate(rules_path: Option<&Path>) -> Result<ExitCode> {
	let loaded = match load_rules(rules_path) {
		Ok(loaded) => loaded,
		Err(e) => {
			eprintln!("Rule set error: {e:#}");
			return Ok(ExitCode::FAILURE);
		}
	};

	match compile_rules(&loaded.rule_set) {
		Ok(rules) => {
			println!("All {} rules in {} are valid", rules.len(), loaded.source);
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Rule set error: {:#}", anyhow::Error::from(e));
			Ok(ExitCode::FAILURE)
		}
	}
}

fn handle_rules_overlaps(rules_path: Option<&Path>, target: &Path) -> Result<ExitCode> {
	let loaded = load_rules(rules_path)?;
	let rules = compile_rules(&loaded.rule_set).context("Failed to compile rules")?;
	let buffer = source::load(target)?;

	let overlaps = find_overlaps(&rules, &buffer);

	if overlaps.is_empty() {
		println!("No overlapping rules in {}", target.display());
		return Ok(ExitCode::SUCCESS);
	}

	println!("Overlapping rules in {}:", target.display());
	for overlap in &overlaps {
		println!(
			"  {} ({}..{}) overlaps {} ({}..{})",
			overlap.first,
			overlap.first_range.start,
			overlap.first_range.end,
			overlap.second,
			overlap.second_range.start,
			overlap.second_range.end
		);
	}

	Ok(ExitCode::FAILURE)
}
