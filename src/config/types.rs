use crate::error::ImportfixError;
use serde::Deserialize;
use std::path::PathBuf;

/// Extension used when neither the config nor the command line names one.
pub const DEFAULT_EXTENSION: &str = ".js";

/// Top-level configuration from a `.importfix.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// Directory whose files are rewritten. Relative paths are resolved
	/// against the directory containing the config file.
	#[serde(default)]
	pub directory: Option<PathBuf>,

	/// File-name suffix selecting the files to rewrite ("js" or ".js").
	#[serde(default)]
	pub extension: Option<String>,

	/// Rewrite rules, applied in order to every file.
	#[serde(default)]
	pub rules: Vec<Rule>,
}

/// A single rewrite rule.
///
/// Either `pattern` + `replacement` (optionally with `regex = true`),
/// or a sed-like `substitution`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Rule {
	/// Text to search for. Matched literally unless `regex` is set.
	pub pattern: Option<String>,

	/// Text inserted in place of every match of `pattern`.
	pub replacement: Option<String>,

	/// Treat `pattern` as a regular expression; `$1`/`$name` expand in `replacement`.
	#[serde(default)]
	pub regex: bool,

	/// Sed-like substitution (mutually exclusive with pattern/replacement).
	/// Format: "s/pattern/replacement/" or "s/pattern/replacement/g" for global.
	pub substitution: Option<String>,
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

/// Values given on the command line that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
	pub directory: Option<PathBuf>,
	pub extension: Option<String>,

	/// Extra sed-like substitutions, applied after the config file's rules.
	pub substitutions: Vec<String>,
}

/// Effective configuration after merging the config file and overrides.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
	/// Absolute (or cwd-relative) target directory.
	pub directory: PathBuf,

	/// Normalized suffix, always starting with a dot.
	pub extension: String,

	/// All rules, in application order.
	pub rules: Vec<RuleWithSource>,

	/// The config file the settings came from, if any.
	pub source: Option<PathBuf>,
}

/// Where a rule was defined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSource {
	File(PathBuf),
	CommandLine,
}

impl std::fmt::Display for RuleSource {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			RuleSource::File(path) => write!(f, "{}", path.display()),
			RuleSource::CommandLine => write!(f, "<command line>"),
		}
	}
}

/// A rule with its source for debugging/display.
#[derive(Debug, Clone)]
pub struct RuleWithSource {
	/// The rule itself.
	pub rule: Rule,

	/// Where the rule came from.
	pub source: RuleSource,
}

impl Rule {
	/// Build a literal rule.
	pub fn literal(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
		Rule {
			pattern: Some(pattern.into()),
			replacement: Some(replacement.into()),
			..Default::default()
		}
	}

	/// Build a rule from a sed-like substitution string.
	pub fn substitution(input: impl Into<String>) -> Self {
		Rule {
			substitution: Some(input.into()),
			..Default::default()
		}
	}

	/// Validate that exactly one rule form is used and it is complete.
	pub fn validate(&self) -> Result<(), ImportfixError> {
		if self.substitution.is_some() {
			let conflicting = [
				("pattern", self.pattern.is_some()),
				("replacement", self.replacement.is_some()),
				("regex", self.regex),
			];
			if let Some((name, _)) = conflicting.iter().find(|(_, is_set)| *is_set) {
				return Err(ImportfixError::MutuallyExclusive {
					option1: "substitution".to_string(),
					option2: name.to_string(),
				});
			}
			return Ok(());
		}

		match (&self.pattern, &self.replacement) {
			(Some(pattern), Some(_)) if pattern.is_empty() => Err(ImportfixError::EmptyPattern),
			(Some(_), Some(_)) => Ok(()),
			(Some(_), None) => Err(ImportfixError::IncompleteRule {
				reason: "pattern has no replacement".to_string(),
			}),
			(None, Some(_)) => Err(ImportfixError::IncompleteRule {
				reason: "replacement has no pattern".to_string(),
			}),
			(None, None) => Err(ImportfixError::IncompleteRule {
				reason: "either pattern/replacement or substitution is required".to_string(),
			}),
		}
	}
}

impl Config {
	/// Validate all rules in this config.
	pub fn validate(&self) -> Result<(), ImportfixError> {
		if let Some(ref extension) = self.extension
			&& extension.trim_start_matches('.').is_empty()
		{
			return Err(ImportfixError::EmptyExtension);
		}
		for rule in &self.rules {
			rule.validate()?;
		}
		Ok(())
	}
}
