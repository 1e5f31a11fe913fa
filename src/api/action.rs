//! Action safety filter and name mapping.

use once_cell::sync::Lazy;
use regex::Regex;

static UPPER_CASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([A-Z])").unwrap());

const READ_ONLY_PREFIXES: &[&str] = &["Get", "Describe", "List"];

/// An action is permitted only when its name starts with a read-only prefix.
pub fn is_safe_action(action: &str) -> bool {
    READ_ONLY_PREFIXES
        .iter()
        .any(|prefix| action.starts_with(prefix))
}

/// `DescribeInstances` -> `describe_instances`: underscore before every
/// internal uppercase letter, then lowercase.
pub fn to_snake(action: &str) -> String {
    let underscored = UPPER_CASE.replace_all(action, "_$1");
    underscored
        .strip_prefix('_')
        .unwrap_or(&underscored)
        .to_lowercase()
}
