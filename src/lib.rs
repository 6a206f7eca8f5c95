//! Course Requirement Planning
//!
//! Requirements are plain-text mappings from a requirement name to the
//! courses that count toward it. A student's course history is credited
//! against those requirements to report what is complete.

pub mod domain;
pub use domain::{
    AreaOfStudy, CompletionRule, Config, CourseId, Definitions, DuplicateCreditError,
    FormatError, InvalidDefinitionError, MergePolicy, NotFoundError, StudentPlan,
};

/// Filesystem access for requirement definitions and transcripts.
pub mod storage;
pub use storage::{LoadError, Project};
