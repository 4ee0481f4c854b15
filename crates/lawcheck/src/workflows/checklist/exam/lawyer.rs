use super::matching::{pick_by_priority, ExamCourse};
use super::subjects::{lawyer_disciplines, CIVIL_PROCEDURE, CRIMINAL_PROCEDURE};
use super::{
    civil_subject, criminal_subject, EligibilityVerdict, ExamKind, SubjectResult,
    LAWYER_PASS_CREDITS, LAWYER_PASS_DISCIPLINES,
};

/// Roster disciplines count once they carry any credit. Civil and criminal
/// law count only when qualified, and both are mandatory together with one
/// of the two procedure codes.
pub(super) fn evaluate(courses: &[&ExamCourse], cap: f64) -> EligibilityVerdict {
    let civil = civil_subject(courses, cap);
    let criminal = criminal_subject(courses, cap);

    let roster: Vec<SubjectResult> = lawyer_disciplines()
        .iter()
        .map(|matcher| {
            let hits = matcher.hits(courses);
            let pick = pick_by_priority(&hits, cap);
            SubjectResult {
                key: matcher.key.to_string(),
                label: matcher.label.to_string(),
                native: matcher.native.to_string(),
                satisfied: pick.counted > 0.0,
                raw_sum: pick.raw_sum,
                counted: pick.counted,
                used: pick.described(),
            }
        })
        .collect();

    let procedure_counted = roster
        .iter()
        .filter(|discipline| discipline.key == CIVIL_PROCEDURE || discipline.key == CRIMINAL_PROCEDURE)
        .any(|discipline| discipline.counted > 0.0);
    let must_have = civil.satisfied && criminal.satisfied && procedure_counted;

    let subjects: Vec<SubjectResult> = [civil, criminal].into_iter().chain(roster).collect();
    let satisfied_count = subjects.iter().filter(|subject| subject.satisfied).count();
    let total_counted_credits: f64 = subjects
        .iter()
        .filter(|subject| subject.satisfied)
        .fold(0.0, |total, subject| total + subject.counted);

    EligibilityVerdict {
        exam: ExamKind::Lawyer,
        pass: satisfied_count >= LAWYER_PASS_DISCIPLINES
            && total_counted_credits >= LAWYER_PASS_CREDITS
            && must_have,
        satisfied_count,
        total_counted_credits,
        subjects,
        must_have: Some(must_have),
    }
}
