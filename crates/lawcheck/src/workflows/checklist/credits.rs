use super::domain::{CourseRow, Program, Track};
use super::policy::CreditPolicy;
use serde::Serialize;
use tracing::debug;

/// Filtered credit sum. Rows with non-positive credit never contribute.
/// An empty sum is `+0.0`.
pub fn sum_credits<'a, I, P>(rows: I, mut predicate: P) -> f64
where
    I: IntoIterator<Item = &'a CourseRow>,
    P: FnMut(&CourseRow) -> bool,
{
    rows.into_iter()
        .filter(|row| predicate(row))
        .map(CourseRow::countable_credit)
        .fold(0.0, |total, credit| total + credit)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BaseCreditSplit {
    pub internal: f64,
    pub transfer: f64,
    pub total: f64,
}

impl BaseCreditSplit {
    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a CourseRow> + Clone,
    {
        let internal = sum_credits(rows.clone(), |row| {
            row.track == Track::Base && !row.is_transfer
        });
        let transfer = sum_credits(rows, |row| row.track == Track::Base && row.is_transfer);
        Self {
            internal,
            transfer,
            total: internal + transfer,
        }
    }
}

/// Mutually exclusive advanced-track buckets, in the order they are tested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvancedCategory {
    Transfer,
    Language,
    ProfessionalLlm,
    LawScience,
    LawMasters,
    ExternalCollege,
}

impl AdvancedCategory {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::ProfessionalLlm,
            Self::LawScience,
            Self::LawMasters,
            Self::Language,
            Self::ExternalCollege,
            Self::Transfer,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Transfer => "Transfer credit",
            Self::Language => "Language courses",
            Self::ProfessionalLlm => "LLM professional track",
            Self::LawScience => "Law interdisciplinary institute",
            Self::LawMasters => "Law master's program",
            Self::ExternalCollege => "External college",
        }
    }

    /// First match wins. Rows that match nothing belong to the home program.
    pub fn classify(row: &CourseRow) -> Self {
        if row.is_transfer_credited() {
            return Self::Transfer;
        }
        if row.is_lang {
            return Self::Language;
        }
        match row.program {
            Program::ProfessionalLlm => Self::ProfessionalLlm,
            Program::LawScience => Self::LawScience,
            Program::LawMasters => Self::LawMasters,
            _ if row.is_external() => Self::ExternalCollege,
            _ => Self::ProfessionalLlm,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AdvancedCreditBreakdown {
    pub professional_llm: f64,
    pub law_science: f64,
    pub law_masters: f64,
    pub language: f64,
    pub external_college: f64,
    pub transfer: f64,
    pub grand_total: f64,
}

impl AdvancedCreditBreakdown {
    pub fn from_rows<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = &'a CourseRow>,
    {
        let mut breakdown = Self::default();
        for row in rows.into_iter().filter(|row| row.track == Track::Adv) {
            let credit = row.countable_credit();
            if credit <= 0.0 {
                continue;
            }
            *breakdown.bucket_mut(AdvancedCategory::classify(row)) += credit;
        }
        breakdown.grand_total = breakdown.professional_llm
            + breakdown.law_science
            + breakdown.law_masters
            + breakdown.language
            + breakdown.external_college
            + breakdown.transfer;
        breakdown
    }

    pub fn bucket(&self, category: AdvancedCategory) -> f64 {
        match category {
            AdvancedCategory::Transfer => self.transfer,
            AdvancedCategory::Language => self.language,
            AdvancedCategory::ProfessionalLlm => self.professional_llm,
            AdvancedCategory::LawScience => self.law_science,
            AdvancedCategory::LawMasters => self.law_masters,
            AdvancedCategory::ExternalCollege => self.external_college,
        }
    }

    fn bucket_mut(&mut self, category: AdvancedCategory) -> &mut f64 {
        match category {
            AdvancedCategory::Transfer => &mut self.transfer,
            AdvancedCategory::Language => &mut self.language,
            AdvancedCategory::ProfessionalLlm => &mut self.professional_llm,
            AdvancedCategory::LawScience => &mut self.law_science,
            AdvancedCategory::LawMasters => &mut self.law_masters,
            AdvancedCategory::ExternalCollege => &mut self.external_college,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CapKind {
    External,
    Language,
    CrossTotal,
}

impl CapKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::External => "external college credits",
            Self::Language => "language credits",
            Self::CrossTotal => "cross-program credits",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapWarning {
    pub cap: CapKind,
    pub credits: f64,
    pub limit: f64,
}

impl CapWarning {
    pub fn message(&self) -> String {
        format!(
            "{} reached {} (cap {})",
            self.cap.label(),
            self.credits,
            self.limit
        )
    }
}

/// Advisory cap accounting. Exceeding a cap never blocks an insertion; the
/// warning travels back to the caller with the result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CapCheck {
    pub cross_internal: f64,
    pub external: f64,
    pub language: f64,
    pub cross_total: f64,
    pub warnings: Vec<CapWarning>,
}

impl CapCheck {
    pub fn is_clear(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn message(&self) -> String {
        self.warnings
            .iter()
            .map(CapWarning::message)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Accounts cross-program and external credit on the advanced track,
/// optionally including a row that is about to be inserted.
pub fn check_cross_caps<'a, I>(
    rows: I,
    proposed: Option<&'a CourseRow>,
    policy: &CreditPolicy,
) -> CapCheck
where
    I: IntoIterator<Item = &'a CourseRow>,
{
    let mut check = CapCheck::default();
    let candidates = rows
        .into_iter()
        .filter(|row| row.track == Track::Adv)
        .chain(proposed);

    for row in candidates {
        if row.is_transfer_credited() {
            continue;
        }
        let credit = row.countable_credit();
        let cross_internal = row.program.is_cross_internal();
        let external = !cross_internal && row.is_external();
        if cross_internal {
            check.cross_internal += credit;
        }
        if external {
            check.external += credit;
        }
        if row.is_lang && (cross_internal || external) {
            check.language += credit;
        }
    }
    check.cross_total = check.cross_internal + check.external;

    let limits = [
        (CapKind::External, check.external, policy.cap_external),
        (CapKind::Language, check.language, policy.cap_language),
        (CapKind::CrossTotal, check.cross_total, policy.cap_cross_total),
    ];
    check.warnings = limits
        .into_iter()
        .filter(|(_, credits, limit)| credits > limit)
        .map(|(cap, credits, limit)| CapWarning {
            cap,
            credits,
            limit,
        })
        .collect();

    if !check.warnings.is_empty() {
        debug!(warning = %check.message(), "credit cap exceeded");
    }

    check
}
