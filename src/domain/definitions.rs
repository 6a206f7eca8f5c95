//! Requirement definitions.
//!
//! A [`Definitions`] is an immutable mapping from requirement name to the set
//! of courses that count toward it. The text format is one requirement per
//! line:
//!
//! ```text
//! Financial Accounting:30000,30116,30117,30120,30130,30131
//! Microeconomics:33001,33002
//! ```

use std::{
    collections::{BTreeMap, BTreeSet},
    str::FromStr,
};

use non_empty_string::NonEmptyString;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::{CourseId, ParseCourseIdError};

/// The non-empty set of courses eligible to count toward a requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Offerings(BTreeSet<CourseId>);

impl Offerings {
    /// Creates a set of offerings.
    ///
    /// Returns `None` if `courses` is empty.
    pub fn new(courses: impl IntoIterator<Item = CourseId>) -> Option<Self> {
        let set: BTreeSet<_> = courses.into_iter().collect();
        if set.is_empty() { None } else { Some(Self(set)) }
    }

    /// Whether `course` is one of the offerings.
    #[must_use]
    pub fn contains(&self, course: CourseId) -> bool {
        self.0.contains(&course)
    }

    /// The number of distinct offerings. Always at least one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; offerings are never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the offerings in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = CourseId> + '_ {
        self.0.iter().copied()
    }

    /// The offerings as a set.
    #[must_use]
    pub const fn as_set(&self) -> &BTreeSet<CourseId> {
        &self.0
    }

    fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }
}

impl<'a> IntoIterator for &'a Offerings {
    type Item = CourseId;
    type IntoIter = std::iter::Copied<std::collections::btree_set::Iter<'a, CourseId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

/// How to combine two sets of definitions that share a requirement name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    /// The later definition replaces the earlier one.
    #[default]
    Overwrite,
    /// The offering sets are combined.
    Union,
}

/// An immutable mapping from requirement name to eligible courses.
///
/// Names are kept in sorted order so reports are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Definitions(BTreeMap<NonEmptyString, Offerings>);

impl Definitions {
    /// Parse definitions from text.
    ///
    /// Each non-blank line has the form `<name>:<id>,<id>,...`. The line is
    /// split on the first colon, the name is trimmed, and each comma-separated
    /// token is trimmed and parsed as a [`CourseId`]. If a name appears more
    /// than once, the last line wins.
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] naming the first malformed line.
    #[instrument(level = "debug", skip(source))]
    pub fn parse(source: &str) -> Result<Self, FormatError> {
        let mut definitions = BTreeMap::new();

        for (index, line) in source.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            let (name, offerings) = parse_line(line).map_err(|kind| FormatError {
                line: index + 1,
                kind,
            })?;

            if definitions.insert(name.clone(), offerings).is_some() {
                debug!(%name, "requirement redefined; keeping the later definition");
            }
        }

        Ok(Self(definitions))
    }

    /// Combine these definitions with a later-loaded set.
    ///
    /// Names present in only one set are kept as-is. For names present in
    /// both, `policy` decides the result.
    #[must_use]
    pub fn merge(mut self, later: Self, policy: MergePolicy) -> Self {
        for (name, offerings) in later.0 {
            if let Some(existing) = self.0.get_mut(&name) {
                match policy {
                    MergePolicy::Union => existing.extend(offerings),
                    MergePolicy::Overwrite => {
                        debug!(%name, "requirement overwritten by later definitions");
                        *existing = offerings;
                    }
                }
            } else {
                self.0.insert(name, offerings);
            }
        }
        self
    }

    /// Look up the offerings for a requirement.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] if no requirement has this name.
    pub fn get(&self, name: &str) -> Result<&Offerings, NotFoundError> {
        self.0
            .get(name)
            .ok_or_else(|| NotFoundError(name.to_string()))
    }

    /// Look up a requirement, returning its stored name with the offerings.
    pub(crate) fn entry(
        &self,
        name: &str,
    ) -> Result<(&NonEmptyString, &Offerings), NotFoundError> {
        self.0
            .get_key_value(name)
            .ok_or_else(|| NotFoundError(name.to_string()))
    }

    /// Whether a requirement with this name is defined.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Requirement names, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(NonEmptyString::get)
    }

    /// Requirements and their offerings, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Offerings)> {
        self.0.iter().map(|(name, offerings)| (name.get(), offerings))
    }

    /// Names of the requirements that `course` counts toward.
    pub fn requirements_for(&self, course: CourseId) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(move |(_, offerings)| offerings.contains(course))
            .map(|(name, _)| name)
    }

    /// The number of requirements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no requirements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for Definitions {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_line(line: &str) -> Result<(NonEmptyString, Offerings), FormatErrorKind> {
    let (name, courses) = line
        .split_once(':')
        .ok_or_else(|| FormatErrorKind::MissingColon(line.to_string()))?;

    let name = NonEmptyString::new(name.trim().to_string())
        .map_err(|_| FormatErrorKind::EmptyName)?;

    // `split` yields at least one token, so a successful parse is never empty.
    let courses = courses
        .split(',')
        .map(|token| token.trim().parse::<CourseId>())
        .collect::<Result<BTreeSet<_>, _>>()?;

    Ok((name, Offerings(courses)))
}

/// A malformed line in a requirement definitions source.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
#[error("line {line}: {kind}")]
pub struct FormatError {
    line: usize,
    kind: FormatErrorKind,
}

impl FormatError {
    /// The 1-based line number of the malformed line.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// What was wrong with the line.
    #[must_use]
    pub const fn kind(&self) -> &FormatErrorKind {
        &self.kind
    }
}

/// The ways a definitions line can be malformed.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum FormatErrorKind {
    /// The line has no `:` separating the name from the courses.
    #[error("expected '<name>:<course>,<course>,...', got '{0}'")]
    MissingColon(String),

    /// The requirement name is blank.
    #[error("requirement name is empty")]
    EmptyName,

    /// A course token is not a positive integer.
    #[error(transparent)]
    CourseId(#[from] ParseCourseIdError),
}

/// A requirement name that is not present in the loaded definitions.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
#[error("requirement '{0}' not found")]
pub struct NotFoundError(
    /// The requirement name that was looked up.
    pub String,
);
