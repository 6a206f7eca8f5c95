//! Tracking several requirements for one student.
//!
//! A [`StudentPlan`] is an ordered collection of [`AreaOfStudy`] instances.
//! Each completed course is offered to the areas in order and credited to the
//! first one that accepts it. A [`PlanTemplate`] describes which areas a plan
//! tracks, so that many students' transcripts can be evaluated against the
//! same definitions.

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::{
    AreaOfStudy, Completion, CourseId, Definitions, DuplicateCreditError, InvalidDefinitionError,
    NotFoundError,
};

/// How to build one [`AreaOfStudy`] from the loaded definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaSpec {
    /// The requirement name, as it appears in the definitions.
    pub name: String,

    /// The number of distinct courses required.
    #[serde(default = "default_required")]
    pub required: usize,

    /// The completion rule.
    #[serde(default, skip_serializing_if = "is_default_completion")]
    pub completion: Completion,
}

const fn default_required() -> usize {
    1
}

fn is_default_completion(completion: &Completion) -> bool {
    *completion == Completion::Count
}

impl AreaSpec {
    /// A requirement satisfied by any one of its offerings.
    #[must_use]
    pub fn any_one(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: default_required(),
            completion: Completion::Count,
        }
    }

    fn build(&self, definitions: &Definitions) -> Result<AreaOfStudy, PlanError> {
        let offerings = definitions.get(&self.name)?;
        let invalid = |source: InvalidDefinitionError| PlanError::InvalidDefinition {
            name: self.name.clone(),
            source,
        };

        AreaOfStudy::new(self.name.clone(), self.required, offerings)
            .and_then(|area| area.with_shared_rule(self.completion.clone().into_rule()))
            .map_err(invalid)
    }
}

/// The requirements to track for each student.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanTemplate {
    areas: Vec<AreaSpec>,
}

impl PlanTemplate {
    /// Create a template from an ordered list of area descriptions.
    #[must_use]
    pub const fn new(areas: Vec<AreaSpec>) -> Self {
        Self { areas }
    }

    /// Track every defined requirement, each satisfied by any one of its
    /// offerings.
    #[must_use]
    pub fn from_definitions(definitions: &Definitions) -> Self {
        Self::new(definitions.names().map(AreaSpec::any_one).collect())
    }

    /// The area descriptions, in the order courses are offered to them.
    #[must_use]
    pub fn areas(&self) -> &[AreaSpec] {
        &self.areas
    }

    /// Build an empty plan.
    ///
    /// # Errors
    ///
    /// Returns an error if an area names a requirement that is not defined,
    /// or describes a requirement that cannot be constructed.
    pub fn instantiate(&self, definitions: &Definitions) -> Result<StudentPlan, PlanError> {
        let areas = self
            .areas
            .iter()
            .map(|spec| spec.build(definitions))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(StudentPlan::new(areas))
    }

    /// Credit each transcript against a fresh plan.
    ///
    /// Transcripts are evaluated in parallel; results are returned in the
    /// same order as `transcripts`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot be instantiated. A transcript
    /// that credits the same course twice fails on its own, without affecting
    /// the others.
    #[instrument(level = "debug", skip_all, fields(transcripts = transcripts.len()))]
    pub fn evaluate<T>(
        &self,
        definitions: &Definitions,
        transcripts: &[T],
    ) -> Result<Vec<Result<Evaluation, DuplicateCreditError>>, PlanError>
    where
        T: AsRef<[CourseId]> + Sync,
    {
        let empty = self.instantiate(definitions)?;

        Ok(transcripts
            .par_iter()
            .map(|transcript| {
                let mut plan = empty.clone();
                let report = plan.credit_all(transcript.as_ref().iter().copied())?;
                Ok(Evaluation { plan, report })
            })
            .collect())
    }
}

/// A plan after crediting one transcript.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// The plan, with courses credited.
    pub plan: StudentPlan,
    /// Where each course went.
    pub report: CreditReport,
}

/// The requirements tracked for one student.
#[derive(Debug, Clone, Default)]
pub struct StudentPlan {
    areas: Vec<AreaOfStudy>,
}

impl StudentPlan {
    /// Create a plan from areas, in the order courses are offered to them.
    #[must_use]
    pub const fn new(areas: Vec<AreaOfStudy>) -> Self {
        Self { areas }
    }

    /// The tracked areas.
    #[must_use]
    pub fn areas(&self) -> &[AreaOfStudy] {
        &self.areas
    }

    /// Look up an area by name.
    #[must_use]
    pub fn area(&self, name: &str) -> Option<&AreaOfStudy> {
        self.areas.iter().find(|area| area.name() == name)
    }

    /// Credit a course to the first area that accepts it.
    ///
    /// Returns the name of the area the course was credited to, or `None` if
    /// no area accepted it.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateCreditError`] if the course has already been
    /// credited to any area of this plan. The plan is left unchanged.
    pub fn credit(&mut self, course: CourseId) -> Result<Option<&str>, DuplicateCreditError> {
        if let Some(area) = self.areas.iter().find(|area| area.contains(course)) {
            return Err(DuplicateCreditError {
                requirement: area.name().to_string(),
                course,
            });
        }

        for area in &mut self.areas {
            if area.take(course)? {
                return Ok(Some(area.name()));
            }
        }

        debug!(%course, "course does not count toward any open requirement");
        Ok(None)
    }

    /// Credit a sequence of courses, in order.
    ///
    /// # Errors
    ///
    /// Stops at the first course credited twice. Courses before it remain
    /// credited.
    pub fn credit_all(
        &mut self,
        courses: impl IntoIterator<Item = CourseId>,
    ) -> Result<CreditReport, DuplicateCreditError> {
        let mut report = CreditReport::default();
        for course in courses {
            match self.credit(course)? {
                Some(name) => report.applied.push(Applied {
                    course,
                    requirement: name.to_string(),
                }),
                None => report.unapplied.push(course),
            }
        }
        Ok(report)
    }

    /// The number of completed areas.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.areas.iter().filter(|area| area.completed()).count()
    }

    /// Whether every area is complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.areas.iter().all(AreaOfStudy::completed)
    }
}

/// A course credited to a requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Applied {
    /// The course.
    pub course: CourseId,
    /// The requirement it was credited to.
    pub requirement: String,
}

/// The outcome of crediting a transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreditReport {
    /// Courses credited, in transcript order.
    pub applied: Vec<Applied>,
    /// Courses no area accepted, in transcript order.
    pub unapplied: Vec<CourseId>,
}

/// Errors building a [`StudentPlan`] from a [`PlanTemplate`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PlanError {
    /// An area names a requirement that is not defined.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// An area cannot be constructed.
    #[error("invalid requirement '{name}': {source}")]
    InvalidDefinition {
        /// The requirement name.
        name: String,
        /// What is wrong with it.
        source: InvalidDefinitionError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFINITIONS: &str = "\
Financial Accounting:30000,30116,30117,30120,30130,30131
International Business:30131,33402,33501,33502,33503,33520,33521,35210,35213,35219
Econometrics:41000,41100,41201,41901,41902,41903
";

    fn course(id: u32) -> CourseId {
        CourseId::try_from(id).unwrap()
    }

    fn courses(ids: &[u32]) -> Vec<CourseId> {
        ids.iter().copied().map(course).collect()
    }

    fn definitions() -> Definitions {
        DEFINITIONS.parse().unwrap()
    }

    fn template() -> PlanTemplate {
        PlanTemplate::new(vec![
            AreaSpec::any_one("Financial Accounting"),
            AreaSpec {
                name: "International Business".to_string(),
                required: 3,
                completion: Completion::Anchored {
                    anchors: courses(&[33501, 33502]),
                },
            },
            AreaSpec {
                name: "Econometrics".to_string(),
                required: 3,
                completion: Completion::Count,
            },
        ])
    }

    #[test]
    fn from_definitions_tracks_everything() {
        let template = PlanTemplate::from_definitions(&definitions());
        let plan = template.instantiate(&definitions()).unwrap();

        let names: Vec<_> = plan.areas().iter().map(AreaOfStudy::name).collect();
        assert_eq!(
            names,
            vec!["Econometrics", "Financial Accounting", "International Business"]
        );
        assert!(plan.areas().iter().all(|area| area.n_required() == 1));
    }

    #[test]
    fn credit_goes_to_next_area_when_first_is_complete() {
        let mut plan = template().instantiate(&definitions()).unwrap();

        assert_eq!(plan.credit(course(30000)).unwrap(), Some("Financial Accounting"));
        // 30131 is offered by both; accounting is already complete.
        assert_eq!(plan.credit(course(30131)).unwrap(), Some("International Business"));
        assert_eq!(plan.credit(course(12345)).unwrap(), None);
    }

    #[test]
    fn credit_twice_across_plan_is_an_error() {
        let mut plan = template().instantiate(&definitions()).unwrap();
        plan.credit(course(41901)).unwrap();

        let error = plan.credit(course(41901)).unwrap_err();
        assert_eq!(error.requirement, "Econometrics");
        assert_eq!(plan.area("Econometrics").unwrap().progress_count(), 1);
    }

    #[test]
    fn credit_all_reports_applied_and_unapplied() {
        let mut plan = template().instantiate(&definitions()).unwrap();
        let report = plan
            .credit_all(courses(&[30000, 99, 41901, 30116]))
            .unwrap();

        assert_eq!(
            report.applied,
            vec![
                Applied {
                    course: course(30000),
                    requirement: "Financial Accounting".to_string()
                },
                Applied {
                    course: course(41901),
                    requirement: "Econometrics".to_string()
                },
            ]
        );
        assert_eq!(report.unapplied, courses(&[99, 30116]));
        assert_eq!(plan.completed_count(), 1);
        assert!(!plan.is_complete());
    }

    #[test]
    fn complete_plan() {
        let mut plan = template().instantiate(&definitions()).unwrap();
        plan.credit_all(courses(&[
            30000, 33402, 33503, 33501, 41901, 41902, 41903,
        ]))
        .unwrap();
        assert!(plan.is_complete());
        assert_eq!(plan.completed_count(), 3);
    }

    #[test]
    fn unknown_area_fails_instantiation() {
        let template = PlanTemplate::new(vec![AreaSpec::any_one("Nonexistent")]);
        assert_eq!(
            template.instantiate(&definitions()).unwrap_err(),
            PlanError::NotFound(NotFoundError("Nonexistent".to_string()))
        );
    }

    #[test]
    fn invalid_area_fails_instantiation() {
        let template = PlanTemplate::new(vec![AreaSpec {
            name: "Financial Accounting".to_string(),
            required: 7,
            completion: Completion::Count,
        }]);
        assert_eq!(
            template.instantiate(&definitions()).unwrap_err(),
            PlanError::InvalidDefinition {
                name: "Financial Accounting".to_string(),
                source: InvalidDefinitionError::TooManyRequired {
                    required: 7,
                    available: 6
                },
            }
        );
    }

    #[test]
    fn evaluate_many_transcripts() {
        let transcripts = vec![
            courses(&[30000]),
            courses(&[41901, 41901]),
            courses(&[33501, 33502, 33503, 30131]),
        ];

        let results = template().evaluate(&definitions(), &transcripts).unwrap();
        assert_eq!(results.len(), 3);

        let first = results[0].as_ref().unwrap();
        assert_eq!(first.plan.completed_count(), 1);

        assert!(results[1].is_err());

        let third = results[2].as_ref().unwrap();
        assert!(third.plan.area("International Business").unwrap().completed());
        // 30131 arrives after International Business is complete, so it is
        // credited to accounting instead.
        assert_eq!(
            third.report.applied.last(),
            Some(&Applied {
                course: course(30131),
                requirement: "Financial Accounting".to_string(),
            })
        );
        assert!(!third.plan.is_complete());
        assert_eq!(third.plan.completed_count(), 2);
    }

    #[test]
    fn area_spec_from_toml() {
        let spec: AreaSpec = toml::from_str(r#"name = "Financial Accounting""#).unwrap();
        assert_eq!(spec, AreaSpec::any_one("Financial Accounting"));
    }
}
