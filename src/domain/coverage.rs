//! Which requirements each course counts toward.

use std::collections::HashSet;

use serde::Serialize;

use crate::domain::{CourseId, Definitions};

/// A course × requirement matrix.
///
/// Each row is one course; each column is one requirement, in name order. A
/// cell is `true` when the course is an offering of the requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Coverage {
    requirements: Vec<String>,
    rows: Vec<CoverageRow>,
}

/// One course's row of a [`Coverage`] matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageRow {
    /// The course.
    pub course: CourseId,
    /// One entry per requirement column.
    pub satisfies: Vec<bool>,
}

impl CoverageRow {
    /// The number of requirements the course counts toward.
    #[must_use]
    pub fn count(&self) -> usize {
        self.satisfies.iter().filter(|&&s| s).count()
    }
}

impl Coverage {
    /// Build the matrix for `courses`.
    ///
    /// Repeated courses appear once, at their first position.
    pub fn build(courses: impl IntoIterator<Item = CourseId>, definitions: &Definitions) -> Self {
        let requirements: Vec<String> = definitions.names().map(str::to_string).collect();

        let mut seen = HashSet::new();
        let rows = courses
            .into_iter()
            .filter(|course| seen.insert(*course))
            .map(|course| CoverageRow {
                course,
                satisfies: definitions
                    .iter()
                    .map(|(_, offerings)| offerings.contains(course))
                    .collect(),
            })
            .collect();

        Self { requirements, rows }
    }

    /// The requirement names, one per column.
    #[must_use]
    pub fn requirements(&self) -> &[String] {
        &self.requirements
    }

    /// The rows, one per course.
    #[must_use]
    pub fn rows(&self) -> &[CoverageRow] {
        &self.rows
    }

    /// Whether `course` counts toward `requirement`.
    ///
    /// Returns `None` if either is not part of the matrix.
    #[must_use]
    pub fn get(&self, course: CourseId, requirement: &str) -> Option<bool> {
        let column = self.requirements.iter().position(|r| r == requirement)?;
        let row = self.rows.iter().find(|row| row.course == course)?;
        row.satisfies.get(column).copied()
    }
}
