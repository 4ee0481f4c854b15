//! Bar-exam eligibility: subject matching over taken courses, greedy
//! priority picking and the judge/lawyer rule sets.

mod judge;
mod lawyer;
pub mod matching;
pub mod subjects;

pub use matching::{
    civil_qualification, civil_subareas, criminal_qualification, is_civil_course,
    is_criminal_course, normalize_course_name, pick_by_priority, source_rank, CivilQualification,
    CivilSubarea, CriminalQualification, ExamCourse, PriorityPick, SourceRank,
};
pub use subjects::{judge_subjects, lawyer_disciplines, SubjectMatcher};

use super::policy::CreditPolicy;
use serde::Serialize;

/// Credits any single subject can contribute.
pub const SUBJECT_CREDIT_CAP: f64 = 3.0;
pub const JUDGE_PASS_SUBJECTS: usize = 2;
pub const LAWYER_PASS_DISCIPLINES: usize = 7;
pub const LAWYER_PASS_CREDITS: f64 = 20.0;

const CIVIL_KEY: &str = "civil_law";
const CRIMINAL_KEY: &str = "criminal_law";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamKind {
    Judge,
    Lawyer,
}

impl ExamKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Judge => "Judicial officer examination",
            Self::Lawyer => "Lawyer examination",
        }
    }
}

/// Per-subject line of a verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectResult {
    pub key: String,
    pub label: String,
    /// Catalog title, e.g. `憲法`.
    pub native: String,
    pub satisfied: bool,
    pub raw_sum: f64,
    pub counted: f64,
    pub used: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EligibilityVerdict {
    pub exam: ExamKind,
    pub pass: bool,
    pub satisfied_count: usize,
    pub total_counted_credits: f64,
    pub subjects: Vec<SubjectResult>,
    /// Lawyer exam only: civil, criminal and a procedural discipline are all present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub must_have: Option<bool>,
}

impl EligibilityVerdict {
    pub fn subject(&self, key: &str) -> Option<&SubjectResult> {
        self.subjects.iter().find(|subject| subject.key == key)
    }
}

/// Evaluates both rule sets against a prepared list of taken courses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EligibilityEngine {
    judge_min_credit: f64,
    subject_cap: f64,
}

impl EligibilityEngine {
    pub fn new(policy: &CreditPolicy) -> Self {
        Self {
            judge_min_credit: policy.judge_min_credit,
            subject_cap: SUBJECT_CREDIT_CAP,
        }
    }

    pub fn judge(&self, courses: &[ExamCourse]) -> EligibilityVerdict {
        judge::evaluate(&matchable(courses), self.judge_min_credit, self.subject_cap)
    }

    pub fn lawyer(&self, courses: &[ExamCourse]) -> EligibilityVerdict {
        lawyer::evaluate(&matchable(courses), self.subject_cap)
    }
}

impl Default for EligibilityEngine {
    fn default() -> Self {
        Self::new(&CreditPolicy::default())
    }
}

pub fn evaluate_judge_eligibility(courses: &[ExamCourse]) -> EligibilityVerdict {
    EligibilityEngine::default().judge(courses)
}

pub fn evaluate_lawyer_eligibility(courses: &[ExamCourse]) -> EligibilityVerdict {
    EligibilityEngine::default().lawyer(courses)
}

fn matchable(courses: &[ExamCourse]) -> Vec<&ExamCourse> {
    courses.iter().filter(|course| course.is_matchable()).collect()
}

fn civil_subject(courses: &[&ExamCourse], cap: f64) -> SubjectResult {
    let qualification = civil_qualification(courses);
    let hits: Vec<&ExamCourse> = courses
        .iter()
        .copied()
        .filter(|course| is_civil_course(&course.name))
        .collect();
    let pick = pick_by_priority(&hits, cap);

    let used = if qualification.ok {
        let covered = qualification
            .subareas
            .iter()
            .map(|subarea| subarea.label())
            .collect::<Vec<_>>()
            .join(", ");
        std::iter::once(format!("Covered: {covered}"))
            .chain(pick.described())
            .collect()
    } else {
        vec!["Needs 3 of 5 subareas".to_string()]
    };

    SubjectResult {
        key: CIVIL_KEY.to_string(),
        label: "Civil Law".to_string(),
        native: "民法".to_string(),
        satisfied: qualification.ok,
        raw_sum: pick.raw_sum,
        counted: if qualification.ok { pick.counted } else { 0.0 },
        used,
    }
}

fn criminal_subject(courses: &[&ExamCourse], cap: f64) -> SubjectResult {
    let qualification = criminal_qualification(courses);
    let hits: Vec<&ExamCourse> = courses
        .iter()
        .copied()
        .filter(|course| is_criminal_course(&course.name))
        .collect();
    let pick = pick_by_priority(&hits, cap);

    let parts = format!(
        "General part: {} Special part: {}",
        mark(qualification.has_general),
        mark(qualification.has_special)
    );

    SubjectResult {
        key: CRIMINAL_KEY.to_string(),
        label: "Criminal Law".to_string(),
        native: "刑法".to_string(),
        satisfied: qualification.ok,
        raw_sum: pick.raw_sum,
        counted: if qualification.ok { pick.counted } else { 0.0 },
        used: std::iter::once(parts).chain(pick.described()).collect(),
    }
}

const fn mark(present: bool) -> &'static str {
    if present {
        "O"
    } else {
        "X"
    }
}

#[cfg(test)]
mod tests;
