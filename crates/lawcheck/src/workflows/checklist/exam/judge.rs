use super::matching::{pick_by_priority, ExamCourse};
use super::subjects::judge_subjects;
use super::{
    civil_subject, criminal_subject, EligibilityVerdict, ExamKind, SubjectResult,
    JUDGE_PASS_SUBJECTS,
};

pub(super) fn evaluate(courses: &[&ExamCourse], min_credit: f64, cap: f64) -> EligibilityVerdict {
    let mut subjects: Vec<SubjectResult> = judge_subjects()
        .iter()
        .map(|matcher| {
            let hits = matcher.hits(courses);
            let qualifying: Vec<&ExamCourse> = hits
                .iter()
                .copied()
                .filter(|course| course.credit >= min_credit)
                .collect();
            let satisfied = !qualifying.is_empty();
            let pick = pick_by_priority(if satisfied { &qualifying } else { &hits }, cap);
            let used = if pick.picked.is_empty() {
                vec!["—".to_string()]
            } else {
                pick.described()
            };

            SubjectResult {
                key: matcher.key.to_string(),
                label: matcher.label.to_string(),
                native: matcher.native.to_string(),
                satisfied,
                raw_sum: pick.raw_sum,
                counted: if satisfied { pick.counted } else { 0.0 },
                used,
            }
        })
        .collect();

    subjects.push(civil_subject(courses, cap));
    subjects.push(criminal_subject(courses, cap));

    let satisfied_count = subjects.iter().filter(|subject| subject.satisfied).count();
    let total_counted_credits = subjects
        .iter()
        .fold(0.0, |total, subject| total + subject.counted);

    EligibilityVerdict {
        exam: ExamKind::Judge,
        pass: satisfied_count >= JUDGE_PASS_SUBJECTS,
        satisfied_count,
        total_counted_credits,
        subjects,
        must_have: None,
    }
}
