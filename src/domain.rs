//! Domain models for requirement tracking.
//!
//! This module contains the core domain types: course identifiers, the
//! requirement definitions mapping, the per-student requirement instance
//! ([`AreaOfStudy`]) and its pluggable completion rules, and configuration.

/// Course identifiers.
pub mod course;
pub use course::{CourseId, ParseCourseIdError};

/// Requirement definitions and their text format.
pub mod definitions;
pub use definitions::{Definitions, FormatError, MergePolicy, NotFoundError, Offerings};

/// Completion predicates for requirements.
pub mod completion;
pub use completion::{AnchoredCount, Completion, CompletionRule, CountThreshold, Progress};

/// Requirement instances and crediting.
pub mod area;
pub use area::{AreaOfStudy, DuplicateCreditError, InvalidDefinitionError, Status};

/// Collections of requirements tracked for one student.
pub mod plan;
pub use plan::{Applied, AreaSpec, CreditReport, Evaluation, PlanError, PlanTemplate, StudentPlan};

/// Course to requirement coverage matrix.
pub mod coverage;
pub use coverage::Coverage;

mod config;
pub use config::Config;
