use super::credits::{AdvancedCreditBreakdown, BaseCreditSplit};
use super::domain::{CourseRow, CourseStatus};
use super::policy::CreditPolicy;
use super::term::{has_summer_marker, term_key_of, TermKey};
use serde::Serialize;

/// Scope of a grade average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "term")]
pub enum AverageMode {
    Overall,
    /// One regular semester; summer-session rows never count.
    Term(TermKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AverageStats {
    pub mode: AverageMode,
    /// Credit-weighted average, absent when nothing qualified.
    pub average: Option<f64>,
    pub credits: f64,
    pub courses: usize,
}

/// Credit-weighted grade average over completed, graded, in-program rows.
pub fn average_stats<'a, I>(rows: I, mode: AverageMode) -> AverageStats
where
    I: IntoIterator<Item = &'a CourseRow>,
{
    let mut weighted = 0.0;
    let mut credits = 0.0;
    let mut courses = 0;

    for row in rows.into_iter().filter(|row| !row.is_transfer) {
        if let AverageMode::Term(target) = mode {
            if row.is_smr || has_summer_marker(&row.name) || term_key_of(row) != Some(target) {
                continue;
            }
        }
        if row.status == CourseStatus::Planned {
            continue;
        }
        let Some(grade) = numeric_grade(&row.grade) else {
            continue;
        };
        let credit = row.countable_credit();
        if credit <= 0.0 {
            continue;
        }
        weighted += grade * credit;
        credits += credit;
        courses += 1;
    }

    AverageStats {
        mode,
        average: (credits > 0.0).then(|| weighted / credits),
        credits,
        courses,
    }
}

fn numeric_grade(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    (value.is_finite() && (0.0..=100.0).contains(&value)).then_some(value)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TrackCredits {
    pub base: BaseCreditSplit,
    pub advanced: AdvancedCreditBreakdown,
    pub total: f64,
}

impl TrackCredits {
    fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a CourseRow> + Clone,
    {
        let base = BaseCreditSplit::from_rows(rows.clone());
        let advanced = AdvancedCreditBreakdown::from_rows(rows);
        Self {
            base,
            advanced,
            total: base.total + advanced.grand_total,
        }
    }
}

/// Where the student stands against the graduation total, both as earned
/// today and as projected once the focus term's planned rows complete.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraduationProgress {
    pub graduation_credits: f64,
    pub focus_term: Option<TermKey>,
    pub earned: TrackCredits,
    pub planned: TrackCredits,
    pub projected_total: f64,
    pub earned_remaining: f64,
    pub projected_remaining: f64,
    /// External-college credit usable toward graduation, clamped to the cap.
    pub external_counted_earned: f64,
    pub external_counted_planned: f64,
    pub external_cap_reached: bool,
    pub language_cap_reached: bool,
}

impl GraduationProgress {
    pub fn compute(rows: &[CourseRow], focus_term: Option<TermKey>, policy: &CreditPolicy) -> Self {
        let done: Vec<&CourseRow> = rows
            .iter()
            .filter(|row| row.status == CourseStatus::Done)
            .collect();
        let planned: Vec<&CourseRow> = rows
            .iter()
            .filter(|row| row.status.is_planned())
            .filter(|row| focus_term.is_some() && term_key_of(row) == focus_term)
            .collect();

        let earned = TrackCredits::from_rows(done.iter().copied());
        let planned = TrackCredits::from_rows(planned.iter().copied());
        let projected_total = earned.total + planned.total;

        let external_seen = earned.advanced.external_college + planned.advanced.external_college;
        let language_seen = earned.advanced.language + planned.advanced.language;

        Self {
            graduation_credits: policy.graduation_credits,
            focus_term,
            earned,
            planned,
            projected_total,
            earned_remaining: (policy.graduation_credits - earned.total).max(0.0),
            projected_remaining: (policy.graduation_credits - projected_total).max(0.0),
            external_counted_earned: earned.advanced.external_college.min(policy.cap_external),
            external_counted_planned: planned.advanced.external_college.min(policy.cap_external),
            external_cap_reached: external_seen >= policy.cap_external,
            language_cap_reached: language_seen >= policy.cap_language,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::checklist::domain::{Program, Track};

    fn graded(name: &str, term: &str, credit: f64, grade: &str) -> CourseRow {
        CourseRow::new(name, Track::Adv, credit)
            .with_term(term)
            .with_grade(grade)
    }

    #[test]
    fn overall_average_is_credit_weighted() {
        let rows = vec![
            graded("Torts", "1131", 3.0, "90"),
            graded("Evidence", "1132", 1.0, "70"),
            graded("Legal English", "1131", 2.0, "100").transfer(),
            graded("Ethics", "1132", 2.0, "n/a"),
            graded("Seminar", "1132", 2.0, "101"),
            graded("Zero", "1132", 0.0, "80"),
        ];

        let stats = average_stats(&rows, AverageMode::Overall);

        assert_eq!(stats.average, Some(85.0));
        assert_eq!(stats.credits, 4.0);
        assert_eq!(stats.courses, 2);
    }

    #[test]
    fn term_average_skips_summer_and_other_terms() {
        let target = TermKey::parse("1141").expect("key");
        let rows = vec![
            graded("Torts", "1141", 2.0, "80"),
            graded("Legal Writing", "114", 2.0, "60").summer(),
            graded("Evidence", "1142", 2.0, "70"),
        ];

        let stats = average_stats(&rows, AverageMode::Term(target));

        assert_eq!(stats.average, Some(80.0));
        assert_eq!(stats.courses, 1);
    }

    #[test]
    fn nothing_graded_yields_no_average() {
        let rows = vec![graded("Torts", "1141", 2.0, "").with_status(CourseStatus::Planned)];
        let stats = average_stats(&rows, AverageMode::Overall);
        assert_eq!(stats.average, None);
        assert_eq!(stats.credits, 0.0);
    }

    #[test]
    fn graduation_progress_projects_the_focus_term() {
        let policy = CreditPolicy {
            graduation_credits: 20.0,
            cap_external: 3.0,
            ..CreditPolicy::default()
        };
        let rows = vec![
            CourseRow::new("Constitutional Law", Track::Base, 3.0).with_term("1131"),
            CourseRow::new("Criminal Law", Track::Base, 3.0).transfer(),
            CourseRow::new("Finance", Track::Adv, 4.0)
                .with_term("1132")
                .with_program(Program::ExternalCollege),
            CourseRow::new("Tax Law", Track::Adv, 2.0)
                .with_term("1141")
                .with_status(CourseStatus::Planned),
            CourseRow::new("Labor Law", Track::Adv, 2.0)
                .with_term("1142")
                .with_status(CourseStatus::Planned),
        ];

        let progress = GraduationProgress::compute(&rows, TermKey::parse("1141"), &policy);

        assert_eq!(progress.earned.base.total, 6.0);
        assert_eq!(progress.earned.base.transfer, 3.0);
        assert_eq!(progress.earned.total, 10.0);
        assert_eq!(progress.planned.total, 2.0);
        assert_eq!(progress.projected_total, 12.0);
        assert_eq!(progress.earned_remaining, 10.0);
        assert_eq!(progress.projected_remaining, 8.0);
        assert_eq!(progress.external_counted_earned, 3.0);
        assert!(progress.external_cap_reached);

        let finished = GraduationProgress::compute(&rows, None, &CreditPolicy {
            graduation_credits: 5.0,
            ..CreditPolicy::default()
        });
        assert_eq!(finished.planned.total, 0.0);
        assert_eq!(finished.earned_remaining, 0.0);
    }
}
