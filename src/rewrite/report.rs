use crate::error::ImportfixError;
use std::path::PathBuf;

/// What happened to one target file.
#[derive(Debug)]
pub enum FileStatus {
	/// Content changed (in check mode: would change).
	Changed { replacements: usize },

	/// No rule matched; the file was not written.
	Unchanged,

	/// Reading or writing the file failed; other files were still processed.
	Failed(ImportfixError),
}

/// Outcome for one target file.
#[derive(Debug)]
pub struct FileOutcome {
	pub path: PathBuf,
	pub status: FileStatus,
}

impl FileOutcome {
	/// File name for display, falling back to the full path.
	pub fn name(&self) -> String {
		self.path
			.file_name()
			.unwrap_or(self.path.as_os_str())
			.to_string_lossy()
			.into_owned()
	}

	pub fn is_changed(&self) -> bool {
		matches!(self.status, FileStatus::Changed { .. })
	}
}

/// Result of a run over one directory, in processing order.
#[derive(Debug, Default)]
pub struct RunReport {
	pub outcomes: Vec<FileOutcome>,
}

impl RunReport {
	pub fn changed(&self) -> impl Iterator<Item = &FileOutcome> {
		self.outcomes.iter().filter(|o| o.is_changed())
	}

	pub fn unchanged(&self) -> impl Iterator<Item = &FileOutcome> {
		self.outcomes
			.iter()
			.filter(|o| matches!(o.status, FileStatus::Unchanged))
	}

	pub fn failed(&self) -> impl Iterator<Item = &FileOutcome> {
		self.outcomes
			.iter()
			.filter(|o| matches!(o.status, FileStatus::Failed(_)))
	}

	/// True when no file failed.
	pub fn is_success(&self) -> bool {
		self.failed().next().is_none()
	}

	/// Total replacements across all changed files.
	pub fn replacements(&self) -> usize {
		self.outcomes
			.iter()
			.map(|o| match o.status {
				FileStatus::Changed { replacements } => replacements,
				_ => 0,
			})
			.sum()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn outcome(name: &str, status: FileStatus) -> FileOutcome {
		FileOutcome {
			path: PathBuf::from("/project").join(name),
			status,
		}
	}

	#[test]
	fn test_report_counts() {
		let mut report = RunReport::default();
		report.outcomes.push(outcome(
			"a.js",
			FileStatus::Changed { replacements: 2 },
		));
		report.outcomes.push(outcome("b.js", FileStatus::Unchanged));
		report.outcomes.push(outcome(
			"c.js",
			FileStatus::Changed { replacements: 1 },
		));

		assert_eq!(report.changed().count(), 2);
		assert_eq!(report.unchanged().count(), 1);
		assert_eq!(report.replacements(), 3);
		assert!(report.is_success());
	}

	#[test]
	fn test_report_with_failure() {
		let mut report = RunReport::default();
		report.outcomes.push(outcome(
			"a.js",
			FileStatus::Failed(ImportfixError::FileRead {
				path: PathBuf::from("/project/a.js"),
				source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
			}),
		));

		assert!(!report.is_success());
		assert_eq!(report.failed().count(), 1);
		assert_eq!(report.outcomes[0].name(), "a.js");
	}
}
