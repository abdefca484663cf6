//! Mapping layer
//! - types.rs: Mapping rule and classified mapping types
//! - classifier.rs: Partitioning of rules by criterion kind and the inverse merge
//! - matcher.rs: File selection by mapping rule

pub mod classifier;
pub mod matcher;
pub mod types;

pub use classifier::{ClassifiedMappings, classify, merge, retain_well_formed};
pub use types::{
    CriterionKind, FileNamePatternMapping, FileTypeMapping, LanguageMapping, MappingCriterion,
    MappingRule,
};
