use std::{fmt, sync::Arc};

use non_empty_string::NonEmptyString;
use tracing::debug;

use crate::domain::{
    CompletionRule, CountThreshold, CourseId, Definitions, NotFoundError, Offerings,
    completion::Progress,
};

/// One requirement being tracked for one student.
///
/// An area holds the courses eligible for the requirement (its offerings),
/// how many distinct courses are required, and the courses credited toward
/// it so far. The offerings and count are fixed at construction; the only
/// mutable state is the list of credited courses, which grows through
/// [`AreaOfStudy::take`].
///
/// ```
/// use course_planner::{AreaOfStudy, CourseId};
///
/// let course = |id: u32| CourseId::try_from(id).unwrap();
/// let mut metrics =
///     AreaOfStudy::new("Econometrics", 2, [41901, 41902, 41903].map(course)).unwrap();
///
/// assert!(!metrics.take(course(23)).unwrap());
/// assert!(metrics.take(course(41901)).unwrap());
/// assert!(metrics.take(course(41902)).unwrap());
/// assert!(metrics.completed());
/// assert_eq!(metrics.to_string(), "Econometrics: 2/2 completed");
/// ```
#[derive(Debug, Clone)]
pub struct AreaOfStudy {
    name: NonEmptyString,
    offerings: Offerings,
    n_required: usize,
    /// Credited courses, in the order they were credited. Every entry is an
    /// offering, and none repeat.
    taken: Vec<CourseId>,
    rule: Arc<dyn CompletionRule>,
}

/// Whether a requirement has been satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Initial state.
    Incomplete,
    /// The completion rule holds. Never left once entered.
    Completed,
}

impl AreaOfStudy {
    /// Create a requirement that needs `n_required` distinct courses from
    /// `offerings`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, there are no offerings, or
    /// `n_required` is zero or larger than the number of distinct offerings.
    pub fn new(
        name: impl Into<String>,
        n_required: usize,
        offerings: impl IntoIterator<Item = CourseId>,
    ) -> Result<Self, InvalidDefinitionError> {
        let name =
            NonEmptyString::new(name.into()).map_err(|_| InvalidDefinitionError::EmptyName)?;
        let offerings = Offerings::new(offerings).ok_or(InvalidDefinitionError::NoOfferings)?;
        Self::from_parts(name, n_required, offerings)
    }

    /// Create a requirement from a named entry in `definitions`.
    ///
    /// The requirement is satisfied by any one of its offerings. Use
    /// [`AreaOfStudy::new`] or [`AreaOfStudy::with_rule`] for requirements
    /// that need more.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] if `definitions` has no requirement called
    /// `name`.
    pub fn from_definition(name: &str, definitions: &Definitions) -> Result<Self, NotFoundError> {
        let (name, offerings) = definitions.entry(name)?;
        // One required course is always within a non-empty offering set.
        Ok(Self::unchecked(name.clone(), 1, offerings.clone()))
    }

    fn from_parts(
        name: NonEmptyString,
        n_required: usize,
        offerings: Offerings,
    ) -> Result<Self, InvalidDefinitionError> {
        if n_required == 0 {
            return Err(InvalidDefinitionError::NoneRequired);
        }
        if n_required > offerings.len() {
            return Err(InvalidDefinitionError::TooManyRequired {
                required: n_required,
                available: offerings.len(),
            });
        }
        Ok(Self::unchecked(name, n_required, offerings))
    }

    fn unchecked(name: NonEmptyString, n_required: usize, offerings: Offerings) -> Self {
        Self {
            name,
            offerings,
            n_required,
            taken: Vec::new(),
            rule: Arc::new(CountThreshold),
        }
    }

    /// Replace the completion rule.
    ///
    /// # Errors
    ///
    /// Returns an error if the rule rejects this requirement's offerings.
    pub fn with_rule(
        self,
        rule: impl CompletionRule + 'static,
    ) -> Result<Self, InvalidDefinitionError> {
        self.with_shared_rule(Arc::new(rule))
    }

    /// Replace the completion rule with one that may be shared between
    /// requirements.
    ///
    /// # Errors
    ///
    /// Returns an error if the rule rejects this requirement's offerings.
    pub fn with_shared_rule(
        mut self,
        rule: Arc<dyn CompletionRule>,
    ) -> Result<Self, InvalidDefinitionError> {
        rule.validate(&self.offerings, self.n_required)?;
        self.rule = rule;
        Ok(self)
    }

    /// The requirement's name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// The courses eligible for this requirement.
    #[must_use]
    pub const fn offerings(&self) -> &Offerings {
        &self.offerings
    }

    /// The number of distinct courses required.
    #[must_use]
    pub const fn n_required(&self) -> usize {
        self.n_required
    }

    /// Courses credited so far, in the order they were credited.
    #[must_use]
    pub fn taken(&self) -> &[CourseId] {
        &self.taken
    }

    /// Whether `course` counts toward this requirement.
    ///
    /// This depends only on the offerings, never on what has been taken.
    #[must_use]
    pub fn satisfies(&self, course: CourseId) -> bool {
        self.offerings.contains(course)
    }

    /// Whether `course` has already been credited toward this requirement.
    #[must_use]
    pub fn contains(&self, course: CourseId) -> bool {
        self.taken.contains(&course)
    }

    /// The number of courses credited so far.
    #[must_use]
    pub fn progress_count(&self) -> usize {
        self.taken.len()
    }

    /// Whether the completion rule holds.
    #[must_use]
    pub fn completed(&self) -> bool {
        self.rule
            .is_complete(&Progress::new(&self.taken, &self.offerings, self.n_required))
    }

    /// The current state of the requirement.
    #[must_use]
    pub fn status(&self) -> Status {
        if self.completed() {
            Status::Completed
        } else {
            Status::Incomplete
        }
    }

    /// Credit a completed course toward this requirement.
    ///
    /// Returns `Ok(true)` if the course was credited. Returns `Ok(false)`,
    /// leaving the requirement unchanged, if it is already complete or the
    /// course is not one of its offerings; the caller may then offer the
    /// course to another requirement.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateCreditError`] if the course has already been
    /// credited toward this requirement.
    pub fn take(&mut self, course: CourseId) -> Result<bool, DuplicateCreditError> {
        if self.contains(course) {
            return Err(DuplicateCreditError {
                requirement: self.name().to_string(),
                course,
            });
        }

        if self.completed() {
            debug!(requirement = self.name(), %course, "already complete; not credited");
            return Ok(false);
        }

        if !self.satisfies(course) {
            return Ok(false);
        }

        self.taken.push(course);
        debug!(
            requirement = self.name(),
            %course,
            progress = self.taken.len(),
            required = self.n_required,
            "credited"
        );
        Ok(true)
    }
}

impl fmt::Display for AreaOfStudy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}: {}/{} completed",
            self.name(),
            self.progress_count(),
            self.n_required
        )
    }
}

/// A requirement that cannot be constructed.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum InvalidDefinitionError {
    /// The requirement name is empty.
    #[error("requirement name is empty")]
    EmptyName,

    /// No courses are eligible for the requirement.
    #[error("requirement has no offerings")]
    NoOfferings,

    /// The requirement asks for zero courses.
    #[error("requirement must need at least one course")]
    NoneRequired,

    /// The requirement asks for more courses than it offers.
    #[error("requirement needs {required} courses but only {available} are offered")]
    TooManyRequired {
        /// The number of courses asked for.
        required: usize,
        /// The number of distinct offerings.
        available: usize,
    },

    /// An anchored rule has no anchors.
    #[error("anchored completion rule has no anchor courses")]
    NoAnchors,

    /// An anchor course is not one of the requirement's offerings.
    #[error("anchor course {0} is not an offering of the requirement")]
    AnchorNotOffered(CourseId),
}

/// A course credited twice toward the same requirement.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
#[error("course {course} has already been credited toward '{requirement}'")]
pub struct DuplicateCreditError {
    /// The requirement the course was already credited toward.
    pub requirement: String,
    /// The course.
    pub course: CourseId,
}
