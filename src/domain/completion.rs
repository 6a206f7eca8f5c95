//! Completion predicates.
//!
//! Whether a requirement is complete is decided by a [`CompletionRule`]. The
//! default rule, [`CountThreshold`], needs `n_required` distinct courses.
//! Other requirements need more than a count: [`AnchoredCount`] additionally
//! demands at least one course from a designated subset, and arbitrary rules
//! can be supplied as closures with [`from_fn`].
//!
//! Rules must be monotone: once a set of taken courses satisfies a rule, any
//! superset of it must too.

use std::{collections::BTreeSet, fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::domain::{CourseId, InvalidDefinitionError, Offerings};

/// The state of a requirement, as seen by a [`CompletionRule`].
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    taken: &'a [CourseId],
    offerings: &'a Offerings,
    n_required: usize,
}

impl<'a> Progress<'a> {
    pub(crate) const fn new(
        taken: &'a [CourseId],
        offerings: &'a Offerings,
        n_required: usize,
    ) -> Self {
        Self {
            taken,
            offerings,
            n_required,
        }
    }

    /// Courses credited so far, in the order they were credited.
    #[must_use]
    pub const fn taken(&self) -> &'a [CourseId] {
        self.taken
    }

    /// The courses eligible for the requirement.
    #[must_use]
    pub const fn offerings(&self) -> &'a Offerings {
        self.offerings
    }

    /// The number of distinct courses the requirement asks for.
    #[must_use]
    pub const fn n_required(&self) -> usize {
        self.n_required
    }
}

/// Decides whether a requirement's credited courses satisfy it.
pub trait CompletionRule: fmt::Debug + Send + Sync {
    /// Whether the requirement is complete.
    fn is_complete(&self, progress: &Progress<'_>) -> bool;

    /// Check that the rule can be applied to a requirement with these
    /// offerings.
    ///
    /// # Errors
    ///
    /// Returns an error if the rule could never be satisfied, or refers to
    /// courses outside `offerings`.
    fn validate(
        &self,
        _offerings: &Offerings,
        _n_required: usize,
    ) -> Result<(), InvalidDefinitionError> {
        Ok(())
    }
}

/// Complete once `n_required` courses have been credited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountThreshold;

impl CompletionRule for CountThreshold {
    fn is_complete(&self, progress: &Progress<'_>) -> bool {
        progress.taken.len() >= progress.n_required
    }
}

/// Complete once `n_required` courses have been credited, at least one of
/// which is an anchor.
///
/// For example, International Business requires three courses, one of which
/// must be 33501 or 33502.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchoredCount {
    anchors: BTreeSet<CourseId>,
}

impl AnchoredCount {
    /// Create the rule from the set of anchor courses.
    pub fn new(anchors: impl IntoIterator<Item = CourseId>) -> Self {
        Self {
            anchors: anchors.into_iter().collect(),
        }
    }

    /// The anchor courses.
    #[must_use]
    pub const fn anchors(&self) -> &BTreeSet<CourseId> {
        &self.anchors
    }
}

impl CompletionRule for AnchoredCount {
    fn is_complete(&self, progress: &Progress<'_>) -> bool {
        progress.taken.len() >= progress.n_required
            && progress.taken.iter().any(|c| self.anchors.contains(c))
    }

    fn validate(
        &self,
        offerings: &Offerings,
        _n_required: usize,
    ) -> Result<(), InvalidDefinitionError> {
        if self.anchors.is_empty() {
            return Err(InvalidDefinitionError::NoAnchors);
        }
        if let Some(&course) = self.anchors.iter().find(|&&c| !offerings.contains(c)) {
            return Err(InvalidDefinitionError::AnchorNotOffered(course));
        }
        Ok(())
    }
}

/// A completion rule backed by a closure.
pub struct FnRule<F>(F);

impl<F> fmt::Debug for FnRule<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("FnRule")
    }
}

impl<F> CompletionRule for FnRule<F>
where
    F: Fn(&Progress<'_>) -> bool + Send + Sync,
{
    fn is_complete(&self, progress: &Progress<'_>) -> bool {
        (self.0)(progress)
    }
}

/// Build a completion rule from a closure.
///
/// ```
/// use course_planner::{domain::completion, AreaOfStudy, CourseId};
///
/// let offerings = [1u32, 2, 3].map(|id| CourseId::try_from(id).unwrap());
/// let area = AreaOfStudy::new("Electives", 2, offerings)
///     .unwrap()
///     .with_rule(completion::from_fn(|p| p.taken().len() > p.n_required()))
///     .unwrap();
/// assert!(!area.completed());
/// ```
pub fn from_fn<F>(f: F) -> FnRule<F>
where
    F: Fn(&Progress<'_>) -> bool + Send + Sync,
{
    FnRule(f)
}

/// A serializable description of a built-in completion rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Completion {
    /// See [`CountThreshold`].
    #[default]
    Count,
    /// See [`AnchoredCount`].
    Anchored {
        /// Courses of which at least one must be taken.
        anchors: Vec<CourseId>,
    },
}

impl Completion {
    /// Build the rule this describes.
    #[must_use]
    pub fn into_rule(self) -> Arc<dyn CompletionRule> {
        match self {
            Self::Count => Arc::new(CountThreshold),
            Self::Anchored { anchors } => Arc::new(AnchoredCount::new(anchors)),
        }
    }
}
