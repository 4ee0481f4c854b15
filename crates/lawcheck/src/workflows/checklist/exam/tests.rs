use super::*;

fn course(name: &str, credit: f64) -> ExamCourse {
    ExamCourse::new(name, credit, SourceRank::Regular, "checklist")
}

#[test]
fn judge_passes_with_constitutional_law_and_three_civil_subareas() {
    let courses = vec![
        course("Constitutional Law", 3.0),
        course("Civil Code - General Principles", 2.0),
        course("Civil Code - Obligations General", 2.0),
        course("Civil Code - Property", 2.0),
    ];

    let verdict = evaluate_judge_eligibility(&courses);

    assert!(verdict.pass);
    assert_eq!(verdict.satisfied_count, 2);
    let constitutional = verdict.subject("constitutional_law").expect("subject listed");
    assert!(constitutional.satisfied);
    assert_eq!(constitutional.counted, 3.0);
    assert_eq!(constitutional.native, "憲法");
    let civil = verdict.subject("civil_law").expect("subject listed");
    assert!(civil.satisfied);
    assert_eq!(civil.native, "民法");
    assert_eq!(civil.raw_sum, 6.0);
    assert_eq!(civil.counted, 3.0);
    assert!(civil.used[0].starts_with("Covered: "));
    assert_eq!(verdict.total_counted_credits, 6.0);
}

#[test]
fn judge_criminal_general_part_alone_counts_nothing() {
    let courses = vec![course("Criminal Code General Part", 3.0)];

    let verdict = evaluate_judge_eligibility(&courses);

    let criminal = verdict.subject("criminal_law").expect("subject listed");
    assert!(!criminal.satisfied);
    assert_eq!(criminal.raw_sum, 3.0);
    assert_eq!(criminal.counted, 0.0);
    assert_eq!(criminal.used[0], "General part: O Special part: X");
    assert!(!verdict.pass);
}

#[test]
fn judge_ordinary_subject_needs_a_course_at_the_minimum_credit() {
    let courses = vec![course("Constitutional Law", 1.0), course("Administrative Law", 2.0)];

    let verdict = evaluate_judge_eligibility(&courses);

    let constitutional = verdict.subject("constitutional_law").expect("subject listed");
    assert!(!constitutional.satisfied);
    assert_eq!(constitutional.raw_sum, 1.0);
    assert_eq!(constitutional.counted, 0.0);
    assert_eq!(constitutional.used, vec!["Constitutional Law(1)".to_string()]);

    let administrative = verdict.subject("administrative_law").expect("subject listed");
    assert!(administrative.satisfied);
    assert_eq!(administrative.counted, 2.0);

    let untouched = verdict.subject("commercial_law").expect("subject listed");
    assert_eq!(untouched.used, vec!["—".to_string()]);
}

#[test]
fn judge_minimum_credit_follows_the_policy() {
    let policy = CreditPolicy {
        judge_min_credit: 1.0,
        ..CreditPolicy::default()
    };
    let courses = vec![course("Constitutional Law", 1.0)];

    let verdict = EligibilityEngine::new(&policy).judge(&courses);

    assert!(verdict.subject("constitutional_law").expect("listed").satisfied);
}

#[test]
fn civil_subject_explains_a_missing_subarea() {
    let courses = vec![
        course("Civil Code - General Principles", 2.0),
        course("Civil Code - Property", 2.0),
    ];

    let verdict = evaluate_judge_eligibility(&courses);

    let civil = verdict.subject("civil_law").expect("subject listed");
    assert!(!civil.satisfied);
    assert_eq!(civil.counted, 0.0);
    assert_eq!(civil.used, vec!["Needs 3 of 5 subareas".to_string()]);
}

fn lawyer_courses(credit: f64, procedure: bool) -> Vec<ExamCourse> {
    let mut courses = vec![
        course("Civil Law", credit),
        course("Criminal Law", credit),
        course("Company Law", credit),
        course("Tax Law", credit),
        course("Labor Law", credit),
    ];
    if procedure {
        courses.push(course("Civil Procedure", credit));
        courses.push(course("Criminal Procedure", credit));
    } else {
        courses.push(course("Patent Law", credit));
        courses.push(course("Copyright Law", credit));
    }
    courses
}

#[test]
fn lawyer_passes_when_every_threshold_holds() {
    let verdict = evaluate_lawyer_eligibility(&lawyer_courses(3.0, true));

    assert_eq!(verdict.exam, ExamKind::Lawyer);
    assert_eq!(verdict.must_have, Some(true));
    assert_eq!(verdict.satisfied_count, 7);
    assert_eq!(verdict.total_counted_credits, 21.0);
    assert!(verdict.pass);
}

#[test]
fn lawyer_gate_requires_a_procedure_code() {
    let verdict = evaluate_lawyer_eligibility(&lawyer_courses(3.0, false));

    assert_eq!(verdict.satisfied_count, 7);
    assert_eq!(verdict.total_counted_credits, 21.0);
    assert_eq!(verdict.must_have, Some(false));
    assert!(!verdict.pass);
}

#[test]
fn lawyer_credit_threshold_is_independent() {
    let verdict = evaluate_lawyer_eligibility(&lawyer_courses(2.0, true));

    assert_eq!(verdict.must_have, Some(true));
    assert_eq!(verdict.satisfied_count, 7);
    assert_eq!(verdict.total_counted_credits, 14.0);
    assert!(!verdict.pass);
}

#[test]
fn lawyer_unqualified_civil_law_adds_no_credit() {
    let courses = vec![
        course("Civil Code - General Principles", 3.0),
        course("Company Law", 3.0),
    ];

    let verdict = evaluate_lawyer_eligibility(&courses);

    assert_eq!(verdict.satisfied_count, 1);
    assert_eq!(verdict.total_counted_credits, 3.0);
    assert_eq!(verdict.must_have, Some(false));
}

#[test]
fn empty_input_yields_all_false_verdicts() {
    let judge = evaluate_judge_eligibility(&[]);
    assert!(!judge.pass);
    assert_eq!(judge.satisfied_count, 0);
    assert_eq!(judge.total_counted_credits, 0.0);
    assert_eq!(judge.subjects.len(), 7);
    assert!(judge.must_have.is_none());

    let lawyer = evaluate_lawyer_eligibility(&[]);
    assert!(!lawyer.pass);
    assert_eq!(lawyer.satisfied_count, 0);
    assert_eq!(lawyer.subjects.len(), 36);
    assert!(lawyer.subjects.iter().all(|subject| subject.counted == 0.0));
    assert!(lawyer.subjects.iter().all(|subject| !subject.native.is_empty()));
    assert!(judge.total_counted_credits.is_sign_positive());
    assert!(lawyer.total_counted_credits.is_sign_positive());
}

#[test]
fn courses_without_a_name_are_never_matched() {
    let nameless = course("   ", 3.0);
    assert!(!nameless.is_matchable());

    let verdict = evaluate_lawyer_eligibility(&[nameless]);

    assert_eq!(verdict.satisfied_count, 0);
}
