//! Common types for mapping rules

use serde::{Deserialize, Serialize};

/// Kind of criterion a mapping rule uses to identify sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CriterionKind {
    /// Match by editor language key (e.g. "Python")
    Language,
    /// Match by editor file type name (e.g. "TEXT")
    FileType,
    /// Match by file name patterns (e.g. "*.py")
    FileNamePatterns,
}

impl CriterionKind {
    /// Returns the string representation of the criterion kind
    pub fn as_str(&self) -> &'static str {
        match self {
            CriterionKind::Language => "language",
            CriterionKind::FileType => "fileType",
            CriterionKind::FileNamePatterns => "fileNamePatterns",
        }
    }
}

/// Source-identification criterion of a mapping rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingCriterion {
    Language(String),
    FileType(String),
    FileNamePatterns(Vec<String>),
}

impl MappingCriterion {
    pub fn kind(&self) -> CriterionKind {
        match self {
            MappingCriterion::Language(_) => CriterionKind::Language,
            MappingCriterion::FileType(_) => CriterionKind::FileType,
            MappingCriterion::FileNamePatterns(_) => CriterionKind::FileNamePatterns,
        }
    }

    /// An empty language or file type key counts as unset.
    /// A pattern list is set even when empty.
    pub fn is_set(&self) -> bool {
        match self {
            MappingCriterion::Language(key) | MappingCriterion::FileType(key) => !key.is_empty(),
            MappingCriterion::FileNamePatterns(_) => true,
        }
    }
}

/// A rule binding a source-identification criterion to a language identifier
///
/// Rules read from storage or configuration may carry no criterion or an empty
/// language id; those are dropped by [`classify`](crate::mapping::classify).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "MappingRecord", from = "MappingRecord")]
pub struct MappingRule {
    pub criterion: Option<MappingCriterion>,
    pub language_id: String,
}

impl MappingRule {
    pub fn language(key: impl Into<String>, language_id: impl Into<String>) -> Self {
        Self {
            criterion: Some(MappingCriterion::Language(key.into())),
            language_id: language_id.into(),
        }
    }

    pub fn file_type(key: impl Into<String>, language_id: impl Into<String>) -> Self {
        Self {
            criterion: Some(MappingCriterion::FileType(key.into())),
            language_id: language_id.into(),
        }
    }

    pub fn file_name_patterns<I, P>(patterns: I, language_id: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            criterion: Some(MappingCriterion::FileNamePatterns(
                patterns.into_iter().map(Into::into).collect(),
            )),
            language_id: language_id.into(),
        }
    }

    /// Returns true when the rule has a set criterion and a non-empty language id
    pub fn is_well_formed(&self) -> bool {
        !self.language_id.is_empty()
            && self
                .criterion
                .as_ref()
                .is_some_and(MappingCriterion::is_set)
    }
}

/// Persisted shape of a mapping rule: `{criterionKind, key?, patterns?, languageId}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criterion_kind: Option<CriterionKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<String>>,
    #[serde(default)]
    pub language_id: String,
}

impl From<MappingRule> for MappingRecord {
    fn from(rule: MappingRule) -> Self {
        let (criterion_kind, key, patterns) = match rule.criterion {
            Some(MappingCriterion::Language(key)) => (Some(CriterionKind::Language), Some(key), None),
            Some(MappingCriterion::FileType(key)) => (Some(CriterionKind::FileType), Some(key), None),
            Some(MappingCriterion::FileNamePatterns(patterns)) => {
                (Some(CriterionKind::FileNamePatterns), None, Some(patterns))
            }
            None => (None, None, None),
        };
        Self {
            criterion_kind,
            key,
            patterns,
            language_id: rule.language_id,
        }
    }
}

impl From<MappingRecord> for MappingRule {
    fn from(record: MappingRecord) -> Self {
        let criterion = match (record.criterion_kind, record.key, record.patterns) {
            (Some(CriterionKind::Language), Some(key), _) => Some(MappingCriterion::Language(key)),
            (Some(CriterionKind::FileType), Some(key), _) => Some(MappingCriterion::FileType(key)),
            (Some(CriterionKind::FileNamePatterns), _, Some(patterns)) => {
                Some(MappingCriterion::FileNamePatterns(patterns))
            }
            _ => None,
        };
        Self {
            criterion,
            language_id: record.language_id,
        }
    }
}

/// A language-keyed mapping as shown in an editing view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageMapping {
    pub language: String,
    pub language_id: String,
}

/// A file-type-keyed mapping as shown in an editing view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileTypeMapping {
    pub file_type: String,
    pub language_id: String,
}

/// A file-name-pattern mapping as shown in an editing view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileNamePatternMapping {
    pub patterns: Vec<String>,
    pub language_id: String,
}
