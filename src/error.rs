use std::path::PathBuf;

/// Library-level structured errors for importfix.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum ImportfixError {
	#[error("Config file not found: {path}")]
	ConfigNotFound { path: PathBuf },

	#[error("No configuration found in {start_dir} or its parents; pass --dir or create .importfix.toml")]
	NoConfiguration { start_dir: PathBuf },

	#[error("Failed to read config file: {path}")]
	ConfigRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid regex pattern in rule: {pattern}")]
	InvalidRegex {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Invalid substitution {input}: {reason}")]
	InvalidSubstitution { input: String, reason: String },

	#[error("Rule pattern must not be empty")]
	EmptyPattern,

	#[error("Rule is incomplete: {reason}")]
	IncompleteRule { reason: String },

	#[error("Mutually exclusive options: {option1} and {option2}")]
	MutuallyExclusive { option1: String, option2: String },

	#[error("File extension must not be empty")]
	EmptyExtension,

	#[error("Failed to read directory: {path}")]
	DirectoryRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to read file: {path}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to write file: {path}")]
	FileWrite {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Result type alias using ImportfixError.
pub type Result<T> = std::result::Result<T, ImportfixError>;
