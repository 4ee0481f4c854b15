mod views;

pub use views::{AdvancedBucketEntry, CourseRowView};

use super::credits::{AdvancedCategory, AdvancedCreditBreakdown, BaseCreditSplit, CapCheck};
use super::domain::{CourseRow, Track};
use super::exam::{EligibilityVerdict, ExamCourse};
use super::instance::Checklist;
use super::policy::CreditPolicy;
use super::stats::{average_stats, AverageMode, AverageStats, GraduationProgress};
use super::term::{row_order, TermKey};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOptions {
    /// Term whose planned rows are projected and whose grades are averaged.
    pub focus_term: Option<TermKey>,
}

impl ReportOptions {
    pub fn for_term(term: TermKey) -> Self {
        Self {
            focus_term: Some(term),
        }
    }
}

/// Everything the presentation layer needs about one checklist.
#[derive(Debug, Clone, Serialize)]
pub struct ChecklistReport {
    pub policy: CreditPolicy,
    pub base_rows: Vec<CourseRowView>,
    pub advanced_rows: Vec<CourseRowView>,
    pub base_credits: BaseCreditSplit,
    pub advanced_credits: AdvancedCreditBreakdown,
    pub advanced_buckets: Vec<AdvancedBucketEntry>,
    pub caps: CapCheck,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap_message: Option<String>,
    pub overall_average: AverageStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_average: Option<AverageStats>,
    pub graduation: GraduationProgress,
    pub exam_courses: Vec<ExamCourse>,
    pub judge: EligibilityVerdict,
    pub lawyer: EligibilityVerdict,
}

impl ChecklistReport {
    pub fn build(checklist: &Checklist, options: &ReportOptions) -> Self {
        let policy = checklist.policy();
        let rows = checklist.rows();

        let base_credits = BaseCreditSplit::from_rows(checklist.track(Track::Base));
        let advanced_credits = AdvancedCreditBreakdown::from_rows(checklist.track(Track::Adv));
        let advanced_buckets = AdvancedCategory::ordered()
            .into_iter()
            .map(|category| AdvancedBucketEntry {
                category,
                label: category.label(),
                credits: advanced_credits.bucket(category),
            })
            .collect();

        let caps = checklist.cap_check();
        let cap_message = (!caps.is_clear()).then(|| caps.message());

        let exam_courses = checklist.exam_courses();
        let engine = checklist.eligibility_engine();
        let judge = engine.judge(&exam_courses);
        let lawyer = engine.lawyer(&exam_courses);

        Self {
            policy: policy.clone(),
            base_rows: sorted_views(checklist.track(Track::Base), &policy.admission_year),
            advanced_rows: sorted_views(checklist.track(Track::Adv), &policy.admission_year),
            base_credits,
            advanced_credits,
            advanced_buckets,
            caps,
            cap_message,
            overall_average: average_stats(rows, AverageMode::Overall),
            term_average: options
                .focus_term
                .map(|term| average_stats(rows, AverageMode::Term(term))),
            graduation: GraduationProgress::compute(rows, options.focus_term, policy),
            exam_courses,
            judge,
            lawyer,
        }
    }
}

/// Display order: term, then completed before planned, then name. Rows
/// without a name are left out.
pub fn sorted_views<'a, I>(rows: I, admission_year: &str) -> Vec<CourseRowView>
where
    I: IntoIterator<Item = &'a CourseRow>,
{
    let mut keyed: Vec<(u32, u8, CourseRowView)> = rows
        .into_iter()
        .filter(|row| !row.name.trim().is_empty())
        .map(|row| {
            (
                row_order(row),
                row.status.rank(),
                CourseRowView::from_row(row, admission_year),
            )
        })
        .collect();
    keyed.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then_with(|| a.1.cmp(&b.1))
            .then_with(|| a.2.display_name.cmp(&b.2.display_name))
    });
    keyed.into_iter().map(|(_, _, view)| view).collect()
}
