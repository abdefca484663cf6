//! File selection by mapping rule

use regex::Regex;

use crate::mapping::types::{MappingCriterion, MappingRule};

/// Translate a wildcard file name pattern (`*` and `?`) into an anchored regex
fn wildcard_to_regex(pattern: &str) -> String {
    let mut regex = String::with_capacity(pattern.len() + 2);
    regex.push('^');
    let mut literal = String::new();

    for ch in pattern.chars() {
        match ch {
            '*' | '?' => {
                regex.push_str(&regex::escape(&literal));
                literal.clear();
                regex.push_str(if ch == '*' { ".*" } else { "." });
            }
            _ => literal.push(ch),
        }
    }
    regex.push_str(&regex::escape(&literal));
    regex.push('$');
    regex
}

/// Check whether a file name matches a wildcard pattern such as `*.py` or `Dockerfile`
pub fn matches_file_name(pattern: &str, file_name: &str) -> bool {
    Regex::new(&wildcard_to_regex(pattern)).is_ok_and(|re| re.is_match(file_name))
}

impl MappingRule {
    /// Returns true when this rule selects a file with the given properties
    ///
    /// `language` and `file_type` are the editor-side keys of the file, when known.
    pub fn selects(&self, file_name: &str, language: Option<&str>, file_type: Option<&str>) -> bool {
        if !self.is_well_formed() {
            return false;
        }
        match &self.criterion {
            Some(MappingCriterion::Language(key)) => language == Some(key.as_str()),
            Some(MappingCriterion::FileType(key)) => file_type == Some(key.as_str()),
            Some(MappingCriterion::FileNamePatterns(patterns)) => patterns
                .iter()
                .any(|pattern| matches_file_name(pattern, file_name)),
            None => false,
        }
    }
}
