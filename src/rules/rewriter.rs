use crate::error::{ImportfixError, Result};
use crate::rules::compile::CompiledRule;
use regex::Regex;
use tracing::trace;

/// How a substitution finds the text it replaces.
#[derive(Debug, Clone)]
pub enum Matcher {
	/// Plain text; the replacement is inserted verbatim.
	Literal(String),

	/// Regular expression; `$1` / `$name` expand in the replacement.
	Regex(Regex),
}

/// A single pattern-to-replacement substitution.
#[derive(Debug, Clone)]
pub struct Substitution {
	/// What to look for.
	pub matcher: Matcher,

	/// The replacement string.
	pub replacement: String,

	/// Whether to replace all occurrences (global flag).
	pub global: bool,
}

/// Content after applying a list of rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
	pub content: String,

	/// Total number of matches replaced across all rules.
	pub replacements: usize,
}

impl Substitution {
	/// Literal substitution replacing every occurrence of `pattern`.
	pub fn literal(pattern: &str, replacement: &str) -> Result<Self> {
		if pattern.is_empty() {
			return Err(ImportfixError::EmptyPattern);
		}
		Ok(Substitution {
			matcher: Matcher::Literal(pattern.to_string()),
			replacement: replacement.to_string(),
			global: true,
		})
	}

	/// Regex substitution replacing every match of `pattern`.
	pub fn regex(pattern: &str, replacement: &str) -> Result<Self> {
		Ok(Substitution {
			matcher: Matcher::Regex(compile_regex(pattern)?),
			replacement: replacement.to_string(),
			global: true,
		})
	}

	/// Parse a substitution string in sed-like format: "s/pattern/replacement/" or "s/pattern/replacement/g"
	pub fn parse(input: &str) -> Result<Self> {
		let invalid = |reason: &str| ImportfixError::InvalidSubstitution {
			input: input.to_string(),
			reason: reason.to_string(),
		};

		let mut chars = input.chars();
		if chars.next() != Some('s') {
			return Err(invalid("must start with 's'"));
		}

		// The character after 's' is the delimiter
		let delimiter = chars.next().ok_or_else(|| invalid("too short"))?;
		if delimiter.is_alphanumeric() || delimiter == '\\' {
			return Err(invalid("delimiter must be a punctuation character"));
		}

		let parts = split_by_delimiter(chars.as_str(), delimiter);

		if parts.len() < 2 {
			return Err(invalid("must have pattern and replacement"));
		}

		let pattern_str = &parts[0];
		if pattern_str.is_empty() {
			return Err(ImportfixError::EmptyPattern);
		}
		let replacement = parts[1].clone();
		let flags = parts.get(2).map(String::as_str).unwrap_or("");

		if let Some(flag) = flags.chars().find(|c| *c != 'g') {
			return Err(invalid(&format!("unknown flag '{flag}'")));
		}
		if parts.len() > 3 {
			return Err(invalid("too many delimiters"));
		}

		Ok(Substitution {
			matcher: Matcher::Regex(compile_regex(pattern_str)?),
			replacement,
			global: flags.contains('g'),
		})
	}

	/// Apply this substitution to a string, returning the result and the number of replacements.
	pub fn apply(&self, input: &str) -> (String, usize) {
		match self.matcher {
			Matcher::Literal(ref pattern) => {
				let found = input.matches(pattern.as_str()).count();
				let count = if self.global { found } else { found.min(1) };
				if count == 0 {
					return (input.to_string(), 0);
				}
				(input.replacen(pattern.as_str(), &self.replacement, count), count)
			}
			Matcher::Regex(ref regex) => {
				let found = regex.find_iter(input).count();
				let count = if self.global { found } else { found.min(1) };
				if count == 0 {
					return (input.to_string(), 0);
				}
				let output = regex.replacen(input, count, self.replacement.as_str());
				(output.into_owned(), count)
			}
		}
	}
}

/// Compile a regex pattern string.
pub(crate) fn compile_regex(pattern: &str) -> Result<Regex> {
	Regex::new(pattern).map_err(|source| ImportfixError::InvalidRegex {
		pattern: pattern.to_string(),
		source,
	})
}

/// Split a string by a delimiter, respecting backslash escapes.
fn split_by_delimiter(input: &str, delimiter: char) -> Vec<String> {
	let mut parts = Vec::new();
	let mut current = String::new();
	let mut chars = input.chars().peekable();
	let mut escape_next = false;

	while let Some(c) = chars.next() {
		if escape_next {
			current.push(c);
			escape_next = false;
		} else if c == '\\' {
			// Only an escaped delimiter loses its backslash
			if chars.peek() == Some(&delimiter) {
				escape_next = true;
			} else {
				current.push(c);
			}
		} else if c == delimiter {
			parts.push(current);
			current = String::new();
		} else {
			current.push(c);
		}
	}

	// A trailing delimiter leaves an empty flags part
	parts.push(current);

	parts
}

/// Apply rules in order; each rule sees the output of the previous one.
pub fn apply_rules(rules: &[CompiledRule], content: &str) -> Rewritten {
	let mut current = content.to_string();
	let mut replacements = 0;

	for (index, rule) in rules.iter().enumerate() {
		let (next, count) = rule.substitution.apply(&current);
		if count > 0 {
			trace!(rule = index + 1, count, "rule matched");
			current = next;
			replacements += count;
		}
	}

	Rewritten {
		content: current,
		replacements,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::{Rule, RuleSource};

	fn compiled(rules: Vec<Rule>) -> Vec<CompiledRule> {
		rules
			.into_iter()
			.map(|rule| CompiledRule::new(rule, RuleSource::CommandLine).unwrap())
			.collect()
	}

	#[test]
	fn test_parse_simple_substitution() {
		let sub = Substitution::parse("s/foo/bar/").unwrap();
		assert_eq!(sub.replacement, "bar");
		assert!(!sub.global);
	}

	#[test]
	fn test_parse_global_substitution() {
		let sub = Substitution::parse("s/foo/bar/g").unwrap();
		assert_eq!(sub.replacement, "bar");
		assert!(sub.global);
	}

	#[test]
	fn test_parse_without_trailing_delimiter() {
		let sub = Substitution::parse("s/foo/bar").unwrap();
		assert_eq!(sub.apply("foo"), ("bar".to_string(), 1));
	}

	#[test]
	fn test_parse_different_delimiter() {
		let sub = Substitution::parse("s#../core/#/docs/js/core/#g").unwrap();
		assert_eq!(sub.replacement, "/docs/js/core/");
	}

	#[test]
	fn test_parse_escaped_delimiter() {
		let sub = Substitution::parse(r"s/foo\/bar/baz/").unwrap();
		assert_eq!(sub.replacement, "baz");
		assert_eq!(sub.apply("foo/bar").0, "baz");
	}

	#[test]
	fn test_parse_rejects_unknown_flag() {
		let result = Substitution::parse("s/foo/bar/x");
		assert!(matches!(
			result.unwrap_err(),
			ImportfixError::InvalidSubstitution { .. }
		));
	}

	#[test]
	fn test_parse_rejects_invalid_regex() {
		match Substitution::parse("s/[invalid/x/").unwrap_err() {
			ImportfixError::InvalidRegex { pattern, .. } => assert_eq!(pattern, "[invalid"),
			other => panic!("Expected InvalidRegex error, got {other:?}"),
		}
	}

	#[test]
	fn test_invalid_substitution_no_s() {
		assert!(Substitution::parse("foo/bar/").is_err());
	}

	#[test]
	fn test_invalid_substitution_too_short() {
		assert!(Substitution::parse("s").is_err());
		assert!(Substitution::parse("s/foo").is_err());
	}

	#[test]
	fn test_apply_global_substitution() {
		let sub = Substitution::parse("s/foo/bar/g").unwrap();
		assert_eq!(sub.apply("foo foo foo"), ("bar bar bar".to_string(), 3));
	}

	#[test]
	fn test_apply_non_global_substitution() {
		let sub = Substitution::parse("s/foo/bar/").unwrap();
		assert_eq!(sub.apply("foo foo foo"), ("bar foo foo".to_string(), 1));
	}

	#[test]
	fn test_apply_with_capture_groups() {
		let sub = Substitution::parse(r"s#from '\./(\w+)\.js'#from '/docs/js/systems/$1.js'#g")
			.unwrap();
		assert_eq!(
			sub.apply("import { a } from './planet.js';").0,
			"import { a } from '/docs/js/systems/planet.js';"
		);
	}

	#[test]
	fn test_literal_does_not_treat_pattern_as_regex() {
		let sub = Substitution::literal("../core/", "$1/").unwrap();
		assert_eq!(sub.apply("a ../core/ b xx/core/"), ("a $1/ b xx/core/".to_string(), 1));
	}

	#[test]
	fn test_literal_matches_are_non_overlapping() {
		let sub = Substitution::literal("aa", "b").unwrap();
		assert_eq!(sub.apply("aaaaa"), ("bba".to_string(), 2));
	}

	#[test]
	fn test_literal_rejects_empty_pattern() {
		assert!(matches!(
			Substitution::literal("", "x").unwrap_err(),
			ImportfixError::EmptyPattern
		));
	}

	#[test]
	fn test_apply_rules_relative_import() {
		let rules = compiled(vec![Rule::literal(
			"'../core/EventBus.js'",
			"'/docs/js/core/EventBus.js'",
		)]);

		let rewritten = apply_rules(&rules, "import x from '../core/EventBus.js'");

		assert_eq!(rewritten.content, "import x from '/docs/js/core/EventBus.js'");
		assert_eq!(rewritten.replacements, 1);
	}

	#[test]
	fn test_apply_rules_in_order() {
		// The second rule only matches text produced by the first
		let rules = compiled(vec![Rule::literal("a", "b"), Rule::literal("b", "c")]);
		assert_eq!(apply_rules(&rules, "a").content, "c");

		let reversed = compiled(vec![Rule::literal("b", "c"), Rule::literal("a", "b")]);
		assert_eq!(apply_rules(&reversed, "a").content, "b");
	}

	#[test]
	fn test_apply_rules_without_matches() {
		let rules = compiled(vec![Rule::literal("../core/", "/core/")]);
		let rewritten = apply_rules(&rules, "const x = 1;\n");

		assert_eq!(rewritten.content, "const x = 1;\n");
		assert_eq!(rewritten.replacements, 0);
	}

	#[test]
	fn test_apply_empty_rule_list() {
		let rewritten = apply_rules(&[], "from '../core/EventBus.js'");
		assert_eq!(rewritten.content, "from '../core/EventBus.js'");
		assert_eq!(rewritten.replacements, 0);
	}
}
