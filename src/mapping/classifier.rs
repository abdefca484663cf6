//! Partitioning of mapping rules by criterion kind

use serde::Serialize;
use tracing::warn;

use crate::mapping::types::{
    FileNamePatternMapping, FileTypeMapping, LanguageMapping, MappingCriterion, MappingRule,
};

/// Mapping rules split into the three criterion kinds, each in source order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedMappings {
    pub languages: Vec<LanguageMapping>,
    pub file_types: Vec<FileTypeMapping>,
    pub file_name_patterns: Vec<FileNamePatternMapping>,
}

impl ClassifiedMappings {
    /// Total number of retained rules across all kinds
    pub fn len(&self) -> usize {
        self.languages.len() + self.file_types.len() + self.file_name_patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition `rules` into language, file type and file name pattern mappings
///
/// Rules with an empty language id or an unset criterion are dropped. Each drop is
/// logged as a warning; the result itself carries no trace of them.
pub fn classify(rules: &[MappingRule]) -> ClassifiedMappings {
    let mut classified = ClassifiedMappings::default();

    for rule in rules {
        if rule.language_id.is_empty() {
            warn!("Dropping mapping rule without language id: {:?}", rule.criterion);
            continue;
        }

        match &rule.criterion {
            Some(MappingCriterion::Language(language)) if !language.is_empty() => {
                classified.languages.push(LanguageMapping {
                    language: language.clone(),
                    language_id: rule.language_id.clone(),
                });
            }
            Some(MappingCriterion::FileType(file_type)) if !file_type.is_empty() => {
                classified.file_types.push(FileTypeMapping {
                    file_type: file_type.clone(),
                    language_id: rule.language_id.clone(),
                });
            }
            Some(MappingCriterion::FileNamePatterns(patterns)) => {
                classified.file_name_patterns.push(FileNamePatternMapping {
                    patterns: patterns.clone(),
                    language_id: rule.language_id.clone(),
                });
            }
            _ => {
                warn!(
                    "Dropping mapping rule for language id '{}' without criterion",
                    rule.language_id
                );
            }
        }
    }

    classified
}

/// Flatten classified mappings back into one rule list
///
/// Order is fixed: language mappings, then file types, then file name patterns.
pub fn merge(classified: &ClassifiedMappings) -> Vec<MappingRule> {
    let languages = classified
        .languages
        .iter()
        .map(|m| MappingRule::language(m.language.clone(), m.language_id.clone()));
    let file_types = classified
        .file_types
        .iter()
        .map(|m| MappingRule::file_type(m.file_type.clone(), m.language_id.clone()));
    let patterns = classified
        .file_name_patterns
        .iter()
        .map(|m| MappingRule::file_name_patterns(m.patterns.clone(), m.language_id.clone()));

    languages.chain(file_types).chain(patterns).collect()
}

/// Drop rules that `classify` would discard, logging each one
///
/// Classified mappings are edited in place before they are merged, so an entry
/// may carry an empty key or language id by the time it is persisted.
pub fn retain_well_formed(rules: Vec<MappingRule>) -> Vec<MappingRule> {
    rules
        .into_iter()
        .filter(|rule| {
            let well_formed = rule.is_well_formed();
            if !well_formed {
                warn!(
                    "Dropping malformed mapping rule for language id '{}': {:?}",
                    rule.language_id, rule.criterion
                );
            }
            well_formed
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn mixed_rules() -> Vec<MappingRule> {
        vec![
            MappingRule::file_name_patterns(["*.py"], "python"),
            MappingRule::language("Python", "python"),
            MappingRule::file_type("TEXT", "plaintext"),
            MappingRule::language("Jython", "python"),
            MappingRule::file_type("Markdown", "markdown"),
        ]
    }

    #[test]
    fn classify_preserves_order_within_each_kind() {
        let classified = classify(&mixed_rules());

        assert_eq!(
            classified.languages,
            vec![
                LanguageMapping {
                    language: "Python".to_string(),
                    language_id: "python".to_string(),
                },
                LanguageMapping {
                    language: "Jython".to_string(),
                    language_id: "python".to_string(),
                },
            ]
        );
        assert_eq!(
            classified.file_types,
            vec![
                FileTypeMapping {
                    file_type: "TEXT".to_string(),
                    language_id: "plaintext".to_string(),
                },
                FileTypeMapping {
                    file_type: "Markdown".to_string(),
                    language_id: "markdown".to_string(),
                },
            ]
        );
        assert_eq!(
            classified.file_name_patterns,
            vec![FileNamePatternMapping {
                patterns: vec!["*.py".to_string()],
                language_id: "python".to_string(),
            }]
        );
    }

    #[test]
    fn classify_drops_rule_with_empty_language_id() {
        let rules = vec![
            MappingRule::language("Python", ""),
            MappingRule::file_type("TEXT", "plaintext"),
        ];

        let classified = classify(&rules);

        assert!(classified.languages.is_empty());
        assert_eq!(
            classified.file_types,
            vec![FileTypeMapping {
                file_type: "TEXT".to_string(),
                language_id: "plaintext".to_string(),
            }]
        );
        assert!(classified.file_name_patterns.is_empty());
        assert_eq!(classified.len(), 1);
    }

    #[rstest]
    #[case(MappingRule { criterion: None, language_id: "python".to_string() })]
    #[case(MappingRule::language("", "python"))]
    #[case(MappingRule::file_type("", "plaintext"))]
    #[case(MappingRule::file_name_patterns(["*.md"], ""))]
    fn classify_drops_malformed_rule(#[case] rule: MappingRule) {
        assert!(classify(&[rule]).is_empty());
    }

    #[test]
    fn classify_retains_exactly_the_well_formed_rules() {
        let mut rules = mixed_rules();
        rules.push(MappingRule::language("", "python"));
        rules.push(MappingRule {
            criterion: None,
            language_id: "rust".to_string(),
        });

        let expected = rules.iter().filter(|r| r.is_well_formed()).count();

        assert_eq!(classify(&rules).len(), expected);
        assert_eq!(expected, 5);
    }

    #[test]
    fn merge_orders_language_then_file_type_then_patterns() {
        let merged = merge(&classify(&mixed_rules()));

        assert_eq!(
            merged,
            vec![
                MappingRule::language("Python", "python"),
                MappingRule::language("Jython", "python"),
                MappingRule::file_type("TEXT", "plaintext"),
                MappingRule::file_type("Markdown", "markdown"),
                MappingRule::file_name_patterns(["*.py"], "python"),
            ]
        );
    }

    #[test]
    fn classify_after_merge_is_idempotent() {
        let classified = classify(&mixed_rules());

        assert_eq!(classify(&merge(&classified)), classified);
    }

    #[test]
    fn retain_well_formed_drops_entries_edited_into_malformed_rules() {
        let classified = ClassifiedMappings {
            languages: vec![
                LanguageMapping {
                    language: "Python".to_string(),
                    language_id: String::new(),
                },
                LanguageMapping {
                    language: "Jython".to_string(),
                    language_id: "python".to_string(),
                },
            ],
            file_types: vec![FileTypeMapping {
                file_type: String::new(),
                language_id: "plaintext".to_string(),
            }],
            file_name_patterns: vec![FileNamePatternMapping {
                patterns: vec!["*.py".to_string()],
                language_id: "python".to_string(),
            }],
        };

        assert_eq!(
            retain_well_formed(merge(&classified)),
            vec![
                MappingRule::language("Jython", "python"),
                MappingRule::file_name_patterns(["*.py"], "python"),
            ]
        );
    }

    #[test]
    fn merge_of_empty_classification_is_empty() {
        assert!(merge(&ClassifiedMappings::default()).is_empty());
    }
}
