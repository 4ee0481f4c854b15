//! Law-school course checklist: term ordering, status consistency, credit
//! aggregation, exam eligibility and the session service around them.

pub mod credits;
pub mod domain;
pub mod exam;
mod instance;
pub mod policy;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;
pub mod stats;
pub mod status;
pub mod term;

#[cfg(test)]
mod tests;

pub use credits::{
    check_cross_caps, sum_credits, AdvancedCategory, AdvancedCreditBreakdown, BaseCreditSplit,
    CapCheck, CapKind, CapWarning,
};
pub use domain::{
    clamp_grade, ChecklistError, CourseRow, CourseSource, CourseStatus, ExternalCredit, Program,
    RowId, Track,
};
pub use exam::{
    evaluate_judge_eligibility, evaluate_lawyer_eligibility, EligibilityEngine,
    EligibilityVerdict, ExamCourse, ExamKind, SubjectResult,
};
pub use instance::Checklist;
pub use policy::CreditPolicy;
pub use report::{ChecklistReport, CourseRowView, ReportOptions};
pub use repository::{ChecklistRepository, RepositoryError, SharedChecklist, StudentId};
pub use router::checklist_router;
pub use service::{
    AddCourseOutcome, ChecklistService, ChecklistServiceError, ReplaceCoursesRequest,
    ReportRequest,
};
pub use stats::{average_stats, AverageMode, AverageStats, GraduationProgress};
pub use status::{auto_infer_status_for_all, enforce_status_consistency};
pub use term::{
    infer_status, infer_status_by_term_key, row_order, term_key_of, term_order, Clock, FixedClock,
    SystemClock, TermKey,
};
