use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use importfix::config::{
	CONFIG_FILE_NAME, LoadedConfig, Overrides, ResolvedConfig, discover_config,
	generate_init_template, load_config, resolve_config, user_config_path,
};
use importfix::rewrite::{FileStatus, Mode, RewriteConfig, rewrite_directory};
use importfix::rules::compile_rules;

/// Environment variable holding a tracing filter, e.g. `IMPORTFIX_LOG=debug`.
const LOG_ENV_VAR: &str = "IMPORTFIX_LOG";

#[derive(Parser)]
#[command(name = "importfix")]
#[command(
	author,
	version,
	about = "CLI tool for rewriting relative module import paths into absolute ones"
)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Use this config file instead of searching for .importfix.toml
	#[arg(long, short, value_name = "FILE", global = true)]
	config: Option<PathBuf>,

	/// Directory to rewrite (overrides the config file)
	#[arg(long, value_name = "DIR", global = true)]
	dir: Option<PathBuf>,

	/// File extension to select, e.g. "js" or ".js" (overrides the config file)
	#[arg(long, value_name = "EXT", global = true)]
	ext: Option<String>,

	/// Extra sed-like rule "s/pattern/replacement/g", applied after the config rules
	#[arg(long = "substitute", short = 's', value_name = "EXPR", global = true)]
	substitutions: Vec<String>,

	/// Report files that would change without writing them; exits 1 if any would
	#[arg(long)]
	check: bool,

	/// Create a template .importfix.toml in the current directory
	#[arg(long, conflicts_with = "check")]
	init: bool,

	/// Overwrite existing .importfix.toml when using --init
	#[arg(long, requires = "init")]
	force: bool,

	/// Increase log verbosity (-v debug, -vv trace)
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display the effective configuration with rule sources
	Show,
	/// Check the configuration and compile its rules without touching any file
	Validate,
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	match run(cli) {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn init_logging(verbose: u8) {
	let default_level = match verbose {
		0 => "warn",
		1 => "debug",
		_ => "trace",
	};

	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default_level)),
		)
		.with_writer(std::io::stderr)
		.init();
}

fn run(cli: Cli) -> Result<ExitCode> {
	if cli.init {
		return handle_init(cli.force);
	}

	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let overrides = Overrides {
		directory: cli.dir,
		extension: cli.ext,
		substitutions: cli.substitutions,
	};
	let loaded = load(cli.config.as_deref(), &cwd);

	if let Some(command) = cli.command {
		return match command {
			Commands::Config { action } => match action {
				ConfigAction::Show => handle_config_show(loaded?.as_ref(), &overrides, &cwd),
				ConfigAction::Validate => handle_config_validate(loaded, &overrides, &cwd),
			},
		};
	}

	let loaded = loaded?;

	let mode = if cli.check { Mode::Check } else { Mode::Write };
	handle_rewrite(loaded.as_ref(), &overrides, &cwd, mode)
}

/// Load the explicit config file, or discover one from `cwd`.
fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Option<LoadedConfig>> {
	match explicit {
		Some(path) => {
			let path = cwd.join(path);
			let loaded = load_config(&path)
				.with_context(|| format!("Failed to load {}", path.display()))?;
			Ok(Some(loaded))
		}
		None => discover_config(cwd).context("Failed to discover configuration"),
	}
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
	}

	std::fs::write(&config_path, generate_init_template())
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {CONFIG_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}

fn handle_rewrite(
	loaded: Option<&LoadedConfig>,
	overrides: &Overrides,
	cwd: &Path,
	mode: Mode,
) -> Result<ExitCode> {
	let resolved = resolve_config(loaded, overrides, cwd)?;
	let config = RewriteConfig::from_resolved(&resolved).context("Failed to compile rules")?;

	let report = rewrite_directory(&config, mode)
		.with_context(|| format!("Failed to rewrite {}", config.directory.display()))?;

	for outcome in &report.outcomes {
		let name = outcome.name();
		match outcome.status {
			FileStatus::Changed { replacements } if mode == Mode::Check => {
				println!("Would fix imports in {name} ({replacements} replacements)");
			}
			FileStatus::Changed { replacements } => {
				println!("Fixed imports in {name} ({replacements} replacements)");
			}
			FileStatus::Unchanged => println!("No changes needed in {name}"),
			FileStatus::Failed(ref e) => {
				eprintln!("Failed to process {name}: {}", error_chain(e));
			}
		}
	}

	println!(
		"Import fix complete: {} changed, {} unchanged, {} failed, {} replacements",
		report.changed().count(),
		report.unchanged().count(),
		report.failed().count(),
		report.replacements()
	);

	if !report.is_success() || (mode == Mode::Check && report.changed().next().is_some()) {
		return Ok(ExitCode::FAILURE);
	}
	Ok(ExitCode::SUCCESS)
}

/// Render an error followed by its source chain on one line.
fn error_chain(e: &dyn std::error::Error) -> String {
	let mut message = e.to_string();
	let mut source = e.source();
	while let Some(cause) = source {
		message.push_str(&format!(": {cause}"));
		source = cause.source();
	}
	message
}

fn handle_config_show(
	loaded: Option<&LoadedConfig>,
	overrides: &Overrides,
	cwd: &Path,
) -> Result<ExitCode> {
	if loaded.is_none() && overrides.directory.is_none() {
		println!("No configuration files found.");
		print_user_config_path();
		return Ok(ExitCode::SUCCESS);
	}

	let resolved = resolve_config(loaded, overrides, cwd)?;
	print_resolved(&resolved)?;
	print_user_config_path();

	Ok(ExitCode::SUCCESS)
}

fn print_resolved(resolved: &ResolvedConfig) -> Result<()> {
	let rules = compile_rules(resolved).context("Failed to compile rules")?;

	match resolved.source {
		Some(ref path) => println!("# Source: {}", path.display()),
		None => println!("# Source: <command line>"),
	}
	println!("# directory: {}", resolved.directory.display());
	println!("# extension: {}", resolved.extension);
	println!("# rules: {}", rules.len());
	println!();

	for (i, rule) in rules.iter().enumerate() {
		println!("  Rule {}: {}", i + 1, rule.describe());
		println!("    source: {}", rule.source);
	}

	Ok(())
}

fn print_user_config_path() {
	if let Ok(user_path) = user_config_path() {
		println!();
		println!("User config path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}
}

fn handle_config_validate(
	loaded: Result<Option<LoadedConfig>>,
	overrides: &Overrides,
	cwd: &Path,
) -> Result<ExitCode> {
	let loaded = match loaded {
		Ok(loaded) => loaded,
		Err(e) => {
			eprintln!("Configuration error: {e:#}");
			return Ok(ExitCode::FAILURE);
		}
	};
	let loaded = loaded.as_ref();

	if loaded.is_none() && overrides.directory.is_none() {
		println!("No configuration files found.");
		return Ok(ExitCode::SUCCESS);
	}

	let result = resolve_config(loaded, overrides, cwd)
		.and_then(|resolved| compile_rules(&resolved).map(|rules| (resolved, rules)));

	match result {
		Ok((resolved, rules)) => {
			let source = resolved
				.source
				.as_ref()
				.map(|p| p.display().to_string())
				.unwrap_or_else(|| "<command line>".to_string());
			println!("Configuration is valid:");
			println!("  {} ({} rules)", source, rules.len());
			if !resolved.directory.is_dir() {
				println!(
					"  warning: directory {} does not exist",
					resolved.directory.display()
				);
			}
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {}", error_chain(&e));
			Ok(ExitCode::FAILURE)
		}
	}
}
