//! Importfix - CLI tool for rewriting relative module import paths into absolute ones.
//!
//! This library provides the core functionality for importfix, including:
//! - Configuration file parsing, discovery and command-line overrides
//! - Literal, regex and sed-like rewrite rules applied in order
//! - In-place rewriting of one directory's files, writing only changed content
//!
//! # Example
//!
//! ```no_run
//! use importfix::config::{Overrides, discover_config, resolve_config};
//! use importfix::rewrite::{Mode, RewriteConfig, rewrite_directory};
//!
//! let cwd = std::env::current_dir().unwrap();
//! let loaded = discover_config(&cwd).unwrap();
//! let resolved = resolve_config(loaded.as_ref(), &Overrides::default(), &cwd).unwrap();
//! let config = RewriteConfig::from_resolved(&resolved).unwrap();
//!
//! let report = rewrite_directory(&config, Mode::Write).unwrap();
//! for outcome in report.changed() {
//!     println!("Fixed imports in {}", outcome.name());
//! }
//! ```

pub mod config;
pub mod error;
pub mod rewrite;
pub mod rules;

pub use error::{ImportfixError, Result};
