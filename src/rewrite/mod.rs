//! Directory rewriting for importfix.
//!
//! This module handles:
//! - Selecting the target files of one directory (non-recursive)
//! - Applying the compiled rules to each file
//! - Writing back only files whose content changed

pub mod report;

pub use report::{FileOutcome, FileStatus, RunReport};

use crate::config::ResolvedConfig;
use crate::error::{ImportfixError, Result};
use crate::rules::{CompiledRule, apply_rules, compile_rules};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Whether changed content is written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
	/// Overwrite files whose content changed.
	#[default]
	Write,

	/// Dry run: report what would change, never write.
	Check,
}

/// Everything a run needs, passed explicitly to [`rewrite_directory`].
#[derive(Debug, Clone)]
pub struct RewriteConfig {
	/// Directory scanned for target files.
	pub directory: PathBuf,

	/// Exact file-name suffix selecting target files, e.g. ".js".
	pub extension: String,

	/// Rules applied to each file, in order.
	pub rules: Vec<CompiledRule>,
}

impl RewriteConfig {
	/// Compile the rules of a resolved config.
	pub fn from_resolved(resolved: &ResolvedConfig) -> Result<Self> {
		Ok(RewriteConfig {
			directory: resolved.directory.clone(),
			extension: resolved.extension.clone(),
			rules: compile_rules(resolved)?,
		})
	}
}

/// List the regular files directly inside `directory` whose names end with `extension`.
///
/// Subdirectories are not descended into and symlinks are skipped, so
/// nothing outside `directory` is ever read or written. Results are
/// sorted by file name.
pub fn find_targets(directory: &Path, extension: &str) -> Result<Vec<PathBuf>> {
	let dir_error = |source| ImportfixError::DirectoryRead {
		path: directory.to_path_buf(),
		source,
	};

	let mut targets = Vec::new();
	for entry in std::fs::read_dir(directory).map_err(dir_error)? {
		let entry = entry.map_err(dir_error)?;
		let path = entry.path();

		if !entry.file_name().to_string_lossy().ends_with(extension) {
			continue;
		}
		let file_type = entry.file_type().map_err(dir_error)?;
		if file_type.is_symlink() {
			debug!(path = %path.display(), "skipping symlink");
			continue;
		}
		if !file_type.is_file() {
			debug!(path = %path.display(), "skipping non-file entry");
			continue;
		}
		targets.push(path);
	}

	targets.sort();
	Ok(targets)
}

/// Rewrite a single file.
///
/// The content is read once and written back only if it differs from
/// what was read. Never returns [`FileStatus::Failed`]; errors are
/// returned instead.
pub fn rewrite_file(path: &Path, rules: &[CompiledRule], mode: Mode) -> Result<FileStatus> {
	let original = std::fs::read_to_string(path).map_err(|source| ImportfixError::FileRead {
		path: path.to_path_buf(),
		source,
	})?;

	let rewritten = apply_rules(rules, &original);

	if rewritten.content == original {
		debug!(path = %path.display(), "no changes");
		return Ok(FileStatus::Unchanged);
	}

	if mode == Mode::Write {
		replace_contents(path, &rewritten.content).map_err(|source| ImportfixError::FileWrite {
			path: path.to_path_buf(),
			source,
		})?;
	}

	debug!(
		path = %path.display(),
		replacements = rewritten.replacements,
		?mode,
		"content changed"
	);
	Ok(FileStatus::Changed {
		replacements: rewritten.replacements,
	})
}

/// Replace a file's contents atomically.
///
/// The new content goes to a temporary file next to `path`, which is then
/// renamed over it; a failed write leaves the original untouched.
fn replace_contents(path: &Path, content: &str) -> std::io::Result<()> {
	let parent = path.parent().unwrap_or(Path::new("."));
	let permissions = std::fs::metadata(path)?.permissions();

	let mut temp = tempfile::NamedTempFile::new_in(parent)?;
	temp.write_all(content.as_bytes())?;
	temp.as_file().sync_all()?;
	temp.as_file().set_permissions(permissions)?;
	temp.persist(path).map_err(|e| e.error)?;
	Ok(())
}

/// Apply the configured rules to every target file of the directory.
///
/// A missing or unreadable directory aborts the run. Failures on
/// individual files are recorded in the report and the remaining files
/// are still processed.
pub fn rewrite_directory(config: &RewriteConfig, mode: Mode) -> Result<RunReport> {
	let targets = find_targets(&config.directory, &config.extension)?;
	debug!(
		directory = %config.directory.display(),
		extension = %config.extension,
		files = targets.len(),
		rules = config.rules.len(),
		"starting rewrite"
	);

	let mut report = RunReport::default();
	for path in targets {
		let status = rewrite_file(&path, &config.rules, mode).unwrap_or_else(|e| {
			warn!(path = %path.display(), error = %e, "failed to process file");
			FileStatus::Failed(e)
		});
		report.outcomes.push(FileOutcome { path, status });
	}

	info!(
		changed = report.changed().count(),
		unchanged = report.unchanged().count(),
		failed = report.failed().count(),
		replacements = report.replacements(),
		"rewrite finished"
	);
	Ok(report)
}
