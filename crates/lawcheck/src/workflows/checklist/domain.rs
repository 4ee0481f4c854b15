use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque identifier assigned to a row when it enters a checklist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub String);

impl RowId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Completion state of a row. Anything other than the literal `planned`
/// deserializes as `Done`, including `null` and non-string values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseStatus {
    #[default]
    Done,
    Planned,
}

impl CourseStatus {
    pub fn normalize(raw: &str) -> Self {
        if raw == "planned" {
            Self::Planned
        } else {
            Self::Done
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Done => "Done",
            Self::Planned => "Planned",
        }
    }

    /// Display ordering: completed rows sort ahead of planned rows within a term.
    pub const fn rank(self) -> u8 {
        match self {
            Self::Done => 0,
            Self::Planned => 1,
        }
    }

    pub const fn is_planned(self) -> bool {
        matches!(self, Self::Planned)
    }
}

impl From<String> for CourseStatus {
    fn from(value: String) -> Self {
        Self::normalize(&value)
    }
}

impl<'de> Deserialize<'de> for CourseStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Loose::deserialize(deserializer)? {
            Loose::Text(text) => Self::normalize(&text),
            _ => Self::Done,
        })
    }
}

/// Requirement bucket a row counts toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    Base,
    Adv,
}

impl Track {
    pub const fn ordered() -> [Self; 2] {
        [Self::Base, Self::Adv]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Base => "Foundational",
            Self::Adv => "Advanced",
        }
    }

    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "base" | "foundational" | "basic" | "基礎" | "基礎課程" => Self::Base,
            _ => Self::Adv,
        }
    }
}

/// Where a row's credit was earned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CourseSource {
    #[default]
    Internal,
    External,
    Transfer,
    CreditClass,
    SchoolCredit,
    Other(String),
}

impl CourseSource {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Internal => "internal",
            Self::External => "external",
            Self::Transfer => "transfer",
            Self::CreditClass => "creditClass",
            Self::SchoolCredit => "schoolCredit",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for CourseSource {
    fn from(value: String) -> Self {
        match value.trim() {
            "" | "internal" => Self::Internal,
            "external" => Self::External,
            "transfer" => Self::Transfer,
            "creditClass" | "credit_class" => Self::CreditClass,
            "schoolCredit" | "school_credit" => Self::SchoolCredit,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<CourseSource> for String {
    fn from(value: CourseSource) -> Self {
        value.as_str().to_string()
    }
}

/// Normalized program affiliation. Free text is folded into one of the
/// known programs on deserialization; unknown values are preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Program {
    #[default]
    Unspecified,
    /// The student's home professional LLM track.
    ProfessionalLlm,
    /// Interdisciplinary law-science institute.
    LawScience,
    /// The law department's regular master's program.
    LawMasters,
    /// Any college outside the law school.
    ExternalCollege,
    /// Credit granted through transfer review.
    Transfer,
    Other(String),
}

impl Program {
    pub fn label(&self) -> &str {
        match self {
            Self::Unspecified => "",
            Self::ProfessionalLlm => "LLM professional track",
            Self::LawScience => "law interdisciplinary institute",
            Self::LawMasters => "law master's program",
            Self::ExternalCollege => "external college",
            Self::Transfer => "transfer credit",
            Self::Other(raw) => raw,
        }
    }

    pub const fn is_cross_internal(&self) -> bool {
        matches!(self, Self::LawScience | Self::LawMasters)
    }
}

impl From<String> for Program {
    fn from(value: String) -> Self {
        crate::workflows::roster::normalize_program(&value)
    }
}

impl From<Program> for String {
    fn from(value: Program) -> Self {
        value.label().to_string()
    }
}

/// A single academic record on the student's checklist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRow {
    #[serde(default)]
    pub id: RowId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub term: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub credit: f64,
    #[serde(default)]
    pub status: CourseStatus,
    #[serde(default, deserialize_with = "lenient_grade")]
    pub grade: String,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_transfer: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_lang: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_smr: bool,
    #[serde(default)]
    pub source: CourseSource,
    #[serde(default)]
    pub program: Program,
    pub track: Track,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub code: String,
}

impl CourseRow {
    pub fn new(name: impl Into<String>, track: Track, credit: f64) -> Self {
        Self {
            id: RowId::generate(),
            name: name.into(),
            term: String::new(),
            credit,
            status: CourseStatus::Done,
            grade: String::new(),
            is_transfer: false,
            is_lang: false,
            is_smr: false,
            source: CourseSource::Internal,
            program: Program::Unspecified,
            track,
            code: String::new(),
        }
    }

    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = term.into();
        self
    }

    pub fn with_status(mut self, status: CourseStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_grade(mut self, grade: impl Into<String>) -> Self {
        self.grade = grade.into();
        self
    }

    pub fn with_program(mut self, program: Program) -> Self {
        self.program = program;
        self
    }

    pub fn with_source(mut self, source: CourseSource) -> Self {
        self.source = source;
        self
    }

    pub fn transfer(mut self) -> Self {
        self.is_transfer = true;
        self.source = CourseSource::Transfer;
        self.status = CourseStatus::Done;
        self
    }

    pub fn language(mut self) -> Self {
        self.is_lang = true;
        self
    }

    pub fn summer(mut self) -> Self {
        self.is_smr = true;
        self
    }

    /// Credit usable in sums; non-finite or non-positive values count as nothing.
    pub fn countable_credit(&self) -> f64 {
        if self.credit.is_finite() && self.credit > 0.0 {
            self.credit
        } else {
            0.0
        }
    }

    pub fn is_transfer_credited(&self) -> bool {
        self.is_transfer || self.source == CourseSource::Transfer || self.program == Program::Transfer
    }

    pub fn is_external(&self) -> bool {
        self.source == CourseSource::External || self.program == Program::ExternalCollege
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ChecklistError {
    #[error("course row {0} not found")]
    RowNotFound(RowId),
    #[error("invalid term {0:?}: expected YYY1, YYY2, YYYS or a bare year")]
    InvalidTerm(String),
    #[error("invalid grade for row {row}: {reason}")]
    InvalidGrade { row: RowId, reason: &'static str },
    #[error("transfer credit on row {0} is always completed")]
    TransferLocked(RowId),
}

/// Credit earned outside the checklist rows (credit classes, other schools).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalCredit {
    #[serde(default)]
    pub source: CourseSource,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub credit: f64,
    #[serde(default, deserialize_with = "lenient_grade")]
    pub grade: String,
}

/// Any JSON scalar a client might send for a row field.
#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Flag(bool),
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

/// Accepts a JSON number, a numeric string, or anything else (which becomes 0).
pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Loose::deserialize(deserializer)? {
        Loose::Number(value) if value.is_finite() => value,
        Loose::Text(text) => parse_number(&text),
        _ => 0.0,
    })
}

/// Grades arrive as strings or bare numbers; anything else is an empty grade.
fn lenient_grade<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Loose::deserialize(deserializer)? {
        Loose::Number(value) if value.is_finite() => format!("{}", value),
        Loose::Text(text) => text,
        _ => String::new(),
    })
}

/// Booleans, the roster's truthy strings (`true`, `1`, `y`, `yes`) and non-zero numbers.
fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Loose::deserialize(deserializer)? {
        Loose::Flag(value) => value,
        Loose::Number(value) => value != 0.0,
        Loose::Text(text) => crate::workflows::roster::parse_bool(&text),
        Loose::Other(_) => false,
    })
}

pub(crate) fn parse_number(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Rounds and clamps a user-entered grade into `0..=100`. Empty input stays empty.
pub fn clamp_grade(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let value = parse_number(trimmed).round().clamp(0.0, 100.0);
    format!("{}", value as u8)
}
