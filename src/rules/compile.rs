use crate::config::types::{ResolvedConfig, Rule, RuleSource};
use crate::error::{ImportfixError, Result};
use crate::rules::rewriter::Substitution;

/// A compiled rule ready for application.
#[derive(Debug, Clone)]
pub struct CompiledRule {
	/// The original rule.
	pub rule: Rule,

	/// The compiled substitution.
	pub substitution: Substitution,

	/// Where the rule was defined (for debugging).
	pub source: RuleSource,
}

impl CompiledRule {
	/// Validate and compile a rule.
	pub fn new(rule: Rule, source: RuleSource) -> Result<Self> {
		rule.validate()?;

		let substitution = match (&rule.substitution, &rule.pattern, &rule.replacement) {
			(Some(sed), _, _) => Substitution::parse(sed)?,
			(None, Some(pattern), Some(replacement)) if rule.regex => {
				Substitution::regex(pattern, replacement)?
			}
			(None, Some(pattern), Some(replacement)) => Substitution::literal(pattern, replacement)?,
			_ => {
				return Err(ImportfixError::IncompleteRule {
					reason: "either pattern/replacement or substitution is required".to_string(),
				});
			}
		};

		Ok(CompiledRule {
			rule,
			substitution,
			source,
		})
	}

	/// Short human-readable form, used by `config show`.
	pub fn describe(&self) -> String {
		match (&self.rule.substitution, &self.rule.pattern, &self.rule.replacement) {
			(Some(sed), _, _) => sed.clone(),
			(None, Some(pattern), Some(replacement)) if self.rule.regex => {
				format!("/{pattern}/ -> {replacement}")
			}
			(None, Some(pattern), Some(replacement)) => format!("{pattern:?} -> {replacement:?}"),
			_ => String::new(),
		}
	}
}

/// Compile all rules of a resolved config, preserving their order.
pub fn compile_rules(config: &ResolvedConfig) -> Result<Vec<CompiledRule>> {
	config
		.rules
		.iter()
		.map(|rws| CompiledRule::new(rws.rule.clone(), rws.source.clone()))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::RuleWithSource;
	use crate::rules::rewriter::Matcher;
	use std::path::PathBuf;

	fn resolved(rules: Vec<Rule>) -> ResolvedConfig {
		ResolvedConfig {
			directory: PathBuf::from("/project"),
			extension: ".js".to_string(),
			rules: rules
				.into_iter()
				.map(|rule| RuleWithSource {
					rule,
					source: RuleSource::File(PathBuf::from("test.toml")),
				})
				.collect(),
			source: None,
		}
	}

	#[test]
	fn test_compile_literal_rule() {
		let rule = CompiledRule::new(Rule::literal("../core/", "/core/"), RuleSource::CommandLine)
			.unwrap();
		assert!(matches!(rule.substitution.matcher, Matcher::Literal(_)));
		assert!(rule.substitution.global);
	}

	#[test]
	fn test_compile_regex_rule() {
		let rule = Rule {
			pattern: Some(r"\.\./(\w+)/".to_string()),
			replacement: Some("/$1/".to_string()),
			regex: true,
			..Default::default()
		};
		let compiled = CompiledRule::new(rule, RuleSource::CommandLine).unwrap();
		assert!(matches!(compiled.substitution.matcher, Matcher::Regex(_)));
		assert_eq!(compiled.substitution.apply("../core/x").0, "/core/x");
	}

	#[test]
	fn test_compile_invalid_regex() {
		let rule = Rule {
			pattern: Some("[invalid".to_string()),
			replacement: Some("x".to_string()),
			regex: true,
			..Default::default()
		};
		match CompiledRule::new(rule, RuleSource::CommandLine).unwrap_err() {
			ImportfixError::InvalidRegex { pattern, .. } => assert_eq!(pattern, "[invalid"),
			other => panic!("Expected InvalidRegex error, got {other:?}"),
		}
	}

	#[test]
	fn test_literal_rule_with_regex_metacharacters() {
		// Not a valid regex, but fine as a literal pattern
		let compiled =
			CompiledRule::new(Rule::literal("[invalid", "ok"), RuleSource::CommandLine).unwrap();
		assert_eq!(compiled.substitution.apply("a [invalid b").0, "a ok b");
	}

	#[test]
	fn test_compile_rules_preserves_order() {
		let config = resolved(vec![
			Rule::literal("first", "1"),
			Rule::substitution("s/second/2/g"),
		]);
		let compiled = compile_rules(&config).unwrap();

		assert_eq!(compiled.len(), 2);
		assert_eq!(compiled[0].describe(), "\"first\" -> \"1\"");
		assert_eq!(compiled[1].describe(), "s/second/2/g");
		assert_eq!(
			compiled[0].source,
			RuleSource::File(PathBuf::from("test.toml"))
		);
	}

	#[test]
	fn test_compile_rules_stops_at_first_error() {
		let config = resolved(vec![
			Rule::literal("ok", "fine"),
			Rule::substitution("s/[bad/x/"),
		]);
		assert!(compile_rules(&config).is_err());
	}
}
