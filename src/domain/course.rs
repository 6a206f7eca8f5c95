use std::{fmt, num::NonZeroU32, str::FromStr};

use serde::{Deserialize, Serialize};

/// A course identifier, e.g. `41901`.
///
/// Course identifiers are positive integers. The catalog data they come from
/// (titles, instructors, quarters) is not needed to track requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(NonZeroU32);

impl CourseId {
    /// Create a course identifier from a pre-validated number.
    #[must_use]
    pub const fn new(id: NonZeroU32) -> Self {
        Self(id)
    }

    /// Returns the numeric value of the identifier.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for CourseId {
    type Error = ParseCourseIdError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        NonZeroU32::new(value)
            .map(Self)
            .ok_or_else(|| ParseCourseIdError(value.to_string()))
    }
}

impl From<CourseId> for u32 {
    fn from(id: CourseId) -> Self {
        id.get()
    }
}

impl FromStr for CourseId {
    type Err = ParseCourseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<NonZeroU32>()
            .map(Self)
            .map_err(|_| ParseCourseIdError(s.to_string()))
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Error returned when text is not a valid course identifier.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
#[error("Invalid course id '{0}': expected a positive integer")]
pub struct ParseCourseIdError(String);

impl ParseCourseIdError {
    /// The text that failed to parse.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.0
    }
}
