//! Configuration loading and parsing for importfix.
//!
//! This module handles:
//! - TOML config file parsing and validation
//! - Config discovery from the working directory upwards
//! - Merging the config file with command-line overrides

pub mod discovery;
pub mod parser;
pub mod template;
pub mod types;

pub use discovery::{
	CONFIG_FILE_NAME, discover_config, load_config, normalize_extension, resolve_config,
	user_config_path,
};
pub use parser::{parse_config_file, parse_config_str};
pub use template::generate_init_template;
pub use types::{
	Config, LoadedConfig, Overrides, ResolvedConfig, Rule, RuleSource, RuleWithSource,
};
