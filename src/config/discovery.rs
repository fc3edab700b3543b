use crate::config::builtin::builtin_rule_set;
use crate::config::parser::parse_rules_file;
use crate::config::types::{LoadedRuleSet, RuleSource};
use crate::error::Result;
use std::path::{Path, PathBuf};

/// File name searched for during discovery.
pub const RULES_FILE_NAME: &str = ".splice.toml";

/// Find the rules file that applies to `start_dir`.
///
/// The lookup order is:
/// 1. Start from `start_dir` and look for `.splice.toml`
/// 2. Continue up the directory tree; the nearest file wins
/// 3. Finally, check ~/.splice.toml
///
/// Returns `None` when no file exists anywhere in the chain.
pub fn discover_rules_file(start_dir: &Path) -> Option<PathBuf> {
	let mut current_dir = Some(start_dir);

	while let Some(dir) = current_dir {
		let candidate = dir.join(RULES_FILE_NAME);
		if candidate.is_file() {
			return Some(candidate);
		}
		current_dir = dir.parent();
	}

	user_rules_path().filter(|path| path.is_file())
}

/// Load the effective rule set.
///
/// An explicit path always wins. Otherwise discovery runs from `start_dir`,
/// and the built-in rule set is used when nothing is found.
pub fn load_rule_set(explicit: Option<&Path>, start_dir: &Path) -> Result<LoadedRuleSet> {
	let path = match explicit {
		Some(path) => Some(path.to_path_buf()),
		None => discover_rules_file(start_dir),
	};

	match path {
		Some(path) => {
			tracing::debug!(path = %path.display(), "loading rules file");
			let rule_set = parse_rules_file(&path)?;
			Ok(LoadedRuleSet {
				rule_set,
				source: RuleSource::File(path),
			})
		}
		None => {
			tracing::debug!("no rules file found, using built-in rule set");
			Ok(LoadedRuleSet {
				rule_set: builtin_rule_set()?,
				source: RuleSource::Builtin,
			})
		}
	}
}

/// Get the path to the user's rules file, if a home directory is known.
pub fn user_rules_path() -> Option<PathBuf> {
	dirs::home_dir().map(|home| home.join(RULES_FILE_NAME))
}
