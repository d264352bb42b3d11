/// Contents written by `importfix --init`.
///
/// Rewrites the relative imports used by the game systems into absolute
/// paths rooted at `/docs/js`.
pub fn generate_init_template() -> String {
	r##"# importfix configuration
#
# Files directly inside `directory` whose names end with `extension` are
# rewritten in place. Rules run in order; each one sees the output of the
# previous rule. A file is only written when its content changes.

# Relative to this file.
directory = "docs/js/systems"
extension = ".js"

[[rules]]
pattern = "from '../core/EventBus.js'"
replacement = "from '/docs/js/core/EventBus.js'"

[[rules]]
pattern = "from '../core/StateManager.js'"
replacement = "from '/docs/js/core/StateManager.js'"

[[rules]]
pattern = "from './proceduralPlanetRenderer.js'"
replacement = "from '/docs/js/systems/proceduralPlanetRenderer.js'"

[[rules]]
pattern = "from '../data/gameData.js'"
replacement = "from '/docs/js/data/gameData.js'"

# Regex rules expand $1 / $name in the replacement:
# [[rules]]
# pattern = "from '\\.\\./utils/(\\w+)\\.js'"
# replacement = "from '/docs/js/utils/$1.js'"
# regex = true

# Sed-like form, "g" replaces every match:
# [[rules]]
# substitution = "s#from '\\.\\./#from '/docs/js/#g"
"##
	.to_string()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::parse_config_str;
	use std::path::Path;

	#[test]
	fn test_template_parses() {
		let config = parse_config_str(&generate_init_template(), Path::new(".importfix.toml")).unwrap();

		assert_eq!(config.rules.len(), 4);
		assert_eq!(config.extension, Some(".js".to_string()));
		assert!(config.rules.iter().all(|rule| !rule.regex));
	}
}
