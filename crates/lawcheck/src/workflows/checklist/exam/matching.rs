use super::super::domain::{CourseRow, CourseSource, ExternalCredit, Program};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Where an exam hit came from; higher ranks are counted first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceRank {
    Regular = 1,
    Transfer = 2,
    CreditClass = 3,
}

impl SourceRank {
    pub const fn value(self) -> u8 {
        self as u8
    }
}

/// A taken course prepared for subject matching. The name is always the
/// normalized title; the raw display name never reaches a matcher.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExamCourse {
    pub name: String,
    pub credit: f64,
    pub rank: SourceRank,
    pub origin: String,
}

impl ExamCourse {
    pub fn new(raw_name: &str, credit: f64, rank: SourceRank, origin: impl Into<String>) -> Self {
        Self {
            name: normalize_course_name(raw_name),
            credit: if credit.is_finite() { credit } else { 0.0 },
            rank,
            origin: origin.into(),
        }
    }

    pub fn from_row(row: &CourseRow) -> Self {
        let rank = if row.source == CourseSource::CreditClass {
            SourceRank::CreditClass
        } else if row.is_transfer {
            SourceRank::Transfer
        } else {
            SourceRank::Regular
        };
        let origin = if row.source == CourseSource::External {
            "external college (checklist)".to_string()
        } else if row.program == Program::Unspecified {
            "checklist".to_string()
        } else {
            format!("checklist - {}", row.program.label())
        };
        Self::new(&row.name, row.countable_credit(), rank, origin)
    }

    pub fn from_external(record: &ExternalCredit) -> Self {
        let school = if record.school.trim().is_empty() {
            "unspecified"
        } else {
            record.school.trim()
        };
        let (rank, origin) = match record.source {
            CourseSource::CreditClass => (SourceRank::CreditClass, format!("credit class - {school}")),
            CourseSource::Transfer => (SourceRank::Transfer, format!("transfer - {school}")),
            _ => (SourceRank::Regular, format!("school credit - {school}")),
        };
        Self {
            name: normalize_course_name(&record.name),
            credit: if record.credit.is_finite() { record.credit } else { 0.0 },
            rank,
            origin,
        }
    }

    pub fn describe(&self) -> String {
        format!("{}({})", self.name, self.credit)
    }

    pub(crate) fn is_matchable(&self) -> bool {
        !self.name.is_empty()
    }
}

/// Strips a leading `YYY-N ` term prefix and the language-course marker,
/// then collapses whitespace.
pub fn normalize_course_name(raw: &str) -> String {
    let without_prefix = term_prefix_pattern().replace(raw.trim(), "");
    let without_marker = language_marker_pattern().replace_all(&without_prefix, "");
    without_marker.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn source_rank(course: &ExamCourse) -> u8 {
    course.rank.value()
}

/// Result of the greedy rank-then-size selection toward a credit ceiling.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityPick<'a> {
    pub raw_sum: f64,
    pub counted: f64,
    pub picked: Vec<&'a ExamCourse>,
    pub hit_count: usize,
}

impl PriorityPick<'_> {
    pub fn described(&self) -> Vec<String> {
        self.picked.iter().map(|course| course.describe()).collect()
    }
}

/// Orders hits by source rank then credit (both descending, stable) and
/// accepts them one at a time, clamping the running total at `cap`. This is
/// not a subset-sum search: the first hits in priority order are the ones
/// listed as counted even when another combination would fill the cap better.
pub fn pick_by_priority<'a>(hits: &[&'a ExamCourse], cap: f64) -> PriorityPick<'a> {
    let mut sorted = hits.to_vec();
    sorted.sort_by(|a, b| {
        b.rank
            .cmp(&a.rank)
            .then_with(|| b.credit.total_cmp(&a.credit))
    });

    let raw_sum = sorted
        .iter()
        .fold(0.0, |total, course| total + course.credit);
    let mut counted = 0.0_f64;
    let mut picked = Vec::new();
    for course in &sorted {
        if counted >= cap {
            break;
        }
        if course.credit <= 0.0 {
            continue;
        }
        picked.push(*course);
        counted = cap.min(counted + course.credit);
    }

    PriorityPick {
        raw_sum,
        counted,
        picked,
        hit_count: sorted.len(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CivilSubarea {
    GeneralPrinciples,
    ObligationsGeneral,
    ObligationsSpecific,
    PropertyRights,
    FamilyAndStatus,
    /// A civil-code course naming no specific subarea.
    WholeCode,
}

impl CivilSubarea {
    pub const fn label(self) -> &'static str {
        match self {
            Self::GeneralPrinciples => "General Principles",
            Self::ObligationsGeneral => "Obligations (General)",
            Self::ObligationsSpecific => "Obligations (Specific)",
            Self::PropertyRights => "Property Rights",
            Self::FamilyAndStatus => "Family and Status",
            Self::WholeCode => "Civil Code (whole)",
        }
    }
}

pub fn civil_subareas(name: &str) -> BTreeSet<CivilSubarea> {
    let patterns = civil_patterns();
    let mut hits: BTreeSet<CivilSubarea> = patterns
        .subareas
        .iter()
        .filter(|(_, pattern)| pattern.is_match(name))
        .map(|(subarea, _)| *subarea)
        .collect();
    if hits.is_empty() && patterns.generic.is_match(name) {
        hits.insert(CivilSubarea::WholeCode);
    }
    hits
}

pub fn is_civil_course(name: &str) -> bool {
    !civil_subareas(name).is_empty()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CivilQualification {
    pub ok: bool,
    pub subareas: Vec<CivilSubarea>,
}

/// Qualifies with a whole-code course, or with three distinct subareas.
pub fn civil_qualification(courses: &[&ExamCourse]) -> CivilQualification {
    let covered: BTreeSet<CivilSubarea> = courses
        .iter()
        .flat_map(|course| civil_subareas(&course.name))
        .collect();
    let ok = covered.contains(&CivilSubarea::WholeCode) || covered.len() >= 3;
    CivilQualification {
        ok,
        subareas: covered.into_iter().collect(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CriminalQualification {
    pub ok: bool,
    pub has_general: bool,
    pub has_special: bool,
    pub has_whole: bool,
}

/// Qualifies with a whole-code course, or with both the general and special parts.
pub fn criminal_qualification(courses: &[&ExamCourse]) -> CriminalQualification {
    let patterns = criminal_patterns();
    let has_whole = courses.iter().any(|course| patterns.whole.is_match(&course.name));
    if has_whole {
        return CriminalQualification {
            ok: true,
            has_general: true,
            has_special: true,
            has_whole: true,
        };
    }
    let has_general = courses
        .iter()
        .any(|course| patterns.general.is_match(&course.name));
    let has_special = courses
        .iter()
        .any(|course| patterns.special.is_match(&course.name));
    CriminalQualification {
        ok: has_general && has_special,
        has_general,
        has_special,
        has_whole: false,
    }
}

pub fn is_criminal_course(name: &str) -> bool {
    let patterns = criminal_patterns();
    patterns.general.is_match(name)
        || patterns.special.is_match(name)
        || patterns.whole.is_match(name)
}

struct CivilPatterns {
    subareas: Vec<(CivilSubarea, Regex)>,
    generic: Regex,
}

struct CriminalPatterns {
    general: Regex,
    special: Regex,
    whole: Regex,
}

fn civil_patterns() -> &'static CivilPatterns {
    static PATTERNS: OnceLock<CivilPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        const SUBAREAS: &[(CivilSubarea, &str)] = &[
            (
                CivilSubarea::GeneralPrinciples,
                r"(?i)民法總則|civil (code|law)\b.*\bgeneral principles|general principles of (the )?civil (code|law)",
            ),
            (
                CivilSubarea::ObligationsGeneral,
                r"(?i)民法債編總論|obligations?\W*general\b|general (part of )?(the law of )?obligations",
            ),
            (
                CivilSubarea::ObligationsSpecific,
                r"(?i)民法債編各論|obligations?\W*(specific|special)\b|specific obligations|specific contracts",
            ),
            (
                CivilSubarea::PropertyRights,
                r"(?i)物權法|civil (code|law)\b.*\bproperty|law of property|rights in rem",
            ),
            (
                CivilSubarea::FamilyAndStatus,
                r"(?i)身分法|family (law|and succession)|civil (code|law)\b.*\b(family|succession|status)",
            ),
        ];
        CivilPatterns {
            subareas: SUBAREAS
                .iter()
                .map(|(subarea, pattern)| {
                    (*subarea, Regex::new(pattern).expect("civil subarea pattern compiles"))
                })
                .collect(),
            generic: Regex::new(r"(?i)民法|\bcivil (code|law)\b").expect("civil pattern compiles"),
        }
    })
}

fn criminal_patterns() -> &'static CriminalPatterns {
    static PATTERNS: OnceLock<CriminalPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| CriminalPatterns {
        general: Regex::new(
            r"(?i)刑法總則|criminal (code|law)\b.*\bgeneral part|general part of (the )?criminal (code|law)",
        )
        .expect("criminal general pattern compiles"),
        special: Regex::new(
            r"(?i)刑法分則|criminal (code|law)\b.*\b(special|specific) part|(special|specific) part of (the )?criminal (code|law)",
        )
        .expect("criminal special pattern compiles"),
        whole: Regex::new(
            r"(?i)(^|\s)刑法(\s|$)|刑法專題研究|基礎刑法|進階刑法|^criminal (code|law)$|criminal law seminar|seminar (on|in) criminal law|(basic|advanced|fundamental) criminal law",
        )
        .expect("criminal whole pattern compiles"),
    })
}

fn term_prefix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{3}-\d\s+").expect("term prefix pattern compiles"))
}

fn language_marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\(語文課\)|（語文課）|\(language course\)")
            .expect("language marker pattern compiles")
    })
}
