use crate::config::parser::parse_config_file;
use crate::config::types::{
	DEFAULT_EXTENSION, LoadedConfig, Overrides, ResolvedConfig, Rule, RuleSource, RuleWithSource,
};
use crate::error::{ImportfixError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked for in each directory during discovery.
pub const CONFIG_FILE_NAME: &str = ".importfix.toml";

/// Environment variable that, if truthy, skips the ~/.importfix.toml fallback.
pub const NO_USER_CONFIG_ENV_VAR: &str = "IMPORTFIX_NO_USER_CONFIG";

/// Find and load the config that applies to `start_dir`.
///
/// Walks up from `start_dir` looking for `.importfix.toml`; the nearest
/// file wins. When none is found, falls back to ~/.importfix.toml unless
/// `IMPORTFIX_NO_USER_CONFIG` is set.
pub fn discover_config(start_dir: &Path) -> Result<Option<LoadedConfig>> {
	let mut current_dir = Some(start_dir);

	while let Some(dir) = current_dir {
		let config_path = dir.join(CONFIG_FILE_NAME);
		if config_path.is_file() {
			debug!(path = %config_path.display(), "found config");
			return load_config(&config_path).map(Some);
		}
		current_dir = dir.parent();
	}

	if is_env_truthy(NO_USER_CONFIG_ENV_VAR) {
		return Ok(None);
	}

	// No home directory simply means there is no user config
	let Some(user_path) = user_config_candidate(dirs::home_dir().as_deref()) else {
		return Ok(None);
	};
	if user_path.is_file() {
		debug!(path = %user_path.display(), "using user config");
		load_config(&user_path).map(Some)
	} else {
		Ok(None)
	}
}

/// Load a config from an explicit path.
pub fn load_config(path: &Path) -> Result<LoadedConfig> {
	let config = parse_config_file(path)?;
	Ok(LoadedConfig {
		config,
		path: path.to_path_buf(),
	})
}

/// Check if an environment variable is set to a truthy value.
fn is_env_truthy(var_name: &str) -> bool {
	match std::env::var(var_name) {
		Ok(value) => {
			let lower = value.to_lowercase();
			!value.is_empty() && lower != "0" && lower != "false" && lower != "no"
		}
		Err(_) => false,
	}
}

/// Turn a configured extension into the suffix matched against file names.
///
/// A bare extension such as `js` gets a leading dot; anything already
/// containing a dot (`.js`, `_test.js`, `d.ts`) is used exactly as given.
pub fn normalize_extension(extension: &str) -> Result<String> {
	if extension.trim_start_matches('.').is_empty() {
		return Err(ImportfixError::EmptyExtension);
	}
	if extension.contains('.') {
		Ok(extension.to_string())
	} else {
		Ok(format!(".{extension}"))
	}
}

/// Merge an optional config file with command-line overrides.
///
/// Precedence for the directory: `--dir` (relative to `cwd`), then the
/// config's `directory` (relative to the config file), then the directory
/// holding the config file. Override substitutions run after file rules.
pub fn resolve_config(
	loaded: Option<&LoadedConfig>,
	overrides: &Overrides,
	cwd: &Path,
) -> Result<ResolvedConfig> {
	let config_dir = loaded.map(|l| l.path.parent().unwrap_or(Path::new(".")).to_path_buf());

	let directory = match (&overrides.directory, loaded, &config_dir) {
		(Some(dir), _, _) => cwd.join(dir),
		(None, Some(l), Some(base)) => match l.config.directory {
			Some(ref dir) => base.join(dir),
			None => base.clone(),
		},
		_ => {
			return Err(ImportfixError::NoConfiguration {
				start_dir: cwd.to_path_buf(),
			});
		}
	};

	let extension = overrides
		.extension
		.as_deref()
		.or_else(|| loaded.and_then(|l| l.config.extension.as_deref()))
		.unwrap_or(DEFAULT_EXTENSION);
	let extension = normalize_extension(extension)?;

	let mut rules: Vec<RuleWithSource> = loaded
		.map(|l| {
			l.config
				.rules
				.iter()
				.map(|rule| RuleWithSource {
					rule: rule.clone(),
					source: RuleSource::File(l.path.clone()),
				})
				.collect()
		})
		.unwrap_or_default();

	for substitution in &overrides.substitutions {
		let rule = Rule::substitution(substitution.clone());
		rule.validate()?;
		rules.push(RuleWithSource {
			rule,
			source: RuleSource::CommandLine,
		});
	}

	Ok(ResolvedConfig {
		directory,
		extension,
		rules,
		source: loaded.map(|l| l.path.clone()),
	})
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	user_config_candidate(dirs::home_dir().as_deref()).ok_or(ImportfixError::HomeDirectoryNotFound)
}

fn user_config_candidate(home_dir: Option<&Path>) -> Option<PathBuf> {
	home_dir.map(|home| home.join(CONFIG_FILE_NAME))
}
