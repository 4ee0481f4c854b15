use super::matching::ExamCourse;
use regex::Regex;
use std::sync::OnceLock;

pub const CIVIL_PROCEDURE: &str = "civil_procedure";
pub const CRIMINAL_PROCEDURE: &str = "criminal_procedure";

/// A subject or discipline paired with the pattern that recognises it in a
/// normalized course name.
#[derive(Debug)]
pub struct SubjectMatcher {
    pub key: &'static str,
    pub label: &'static str,
    /// Title as it appears in the local course catalog.
    pub native: &'static str,
    pattern: Regex,
}

impl SubjectMatcher {
    fn compile(entry: &Entry) -> Self {
        let &(key, label, native, pattern) = entry;
        Self {
            key,
            label,
            native,
            pattern: Regex::new(pattern).expect("subject pattern compiles"),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.pattern.is_match(name)
    }

    pub fn hits<'a>(&self, courses: &[&'a ExamCourse]) -> Vec<&'a ExamCourse> {
        courses
            .iter()
            .copied()
            .filter(|course| self.matches(&course.name))
            .collect()
    }
}

type Entry = (&'static str, &'static str, &'static str, &'static str);

const JUDGE_SUBJECTS: &[Entry] = &[
    ("constitutional_law", "Constitutional Law", "憲法", r"(?i)憲法|constitution"),
    (
        "administrative_law",
        "Administrative Law",
        "行政法",
        r"(?i)行政法|行政救濟法|administrative (law|litigation|remedies)",
    ),
    (CIVIL_PROCEDURE, "Civil Procedure", "民事訴訟法", r"(?i)民事訴訟法|civil procedure"),
    (CRIMINAL_PROCEDURE, "Criminal Procedure", "刑事訴訟法", r"(?i)刑事訴訟法|criminal procedure"),
    (
        "commercial_law",
        "Commercial Law",
        "商事法",
        r"(?i)商事法|公司法|票據法|保險法|海商法|證券交易法|commercial law|company law|corporate law|negotiable instruments|insurance law|maritime law|securities",
    ),
];

const LAWYER_DISCIPLINES: &[Entry] = &[
    (CIVIL_PROCEDURE, "Civil Procedure", "民事訴訟法", r"(?i)民事訴訟法|civil procedure"),
    ("commercial_law", "Commercial Law", "商事法", r"(?i)商事法|commercial law"),
    (
        "non_contentious_matters",
        "Non-Contentious Matters Law",
        "非訟事件法",
        r"(?i)非訟事件法|non-contentious",
    ),
    ("arbitration", "Arbitration Law", "仲裁法", r"(?i)仲裁法|arbitration"),
    ("notary", "Notary Law", "公證法", r"(?i)公證法|notar(y|ial)"),
    (
        "compulsory_enforcement",
        "Compulsory Enforcement Law",
        "強制執行法",
        r"(?i)強制執行法|compulsory enforcement|enforcement of (civil )?judgments?",
    ),
    ("bankruptcy", "Bankruptcy Law", "破產法", r"(?i)破產法|bankruptcy|insolvency"),
    (
        "private_international_law",
        "Private International Law",
        "國際私法",
        r"(?i)國際私法|private international law|conflict of laws",
    ),
    (
        "juvenile_proceedings",
        "Juvenile Proceedings Law",
        "少年事件處理法",
        r"(?i)少年事件處理法|juvenile",
    ),
    (CRIMINAL_PROCEDURE, "Criminal Procedure", "刑事訴訟法", r"(?i)刑事訴訟法|criminal procedure"),
    ("evidence", "Evidence Law", "證據法", r"(?i)證據法|\bevidence\b"),
    (
        "administrative_law",
        "Administrative Law",
        "行政法",
        r"(?i)行政法|行政救濟法|administrative (law|litigation|remedies)",
    ),
    ("company_law", "Company Law", "公司法", r"(?i)公司法|company law|corporat(e|ion) law"),
    ("maritime_law", "Maritime Law", "海商法", r"(?i)海商法|maritime law|admiralty"),
    (
        "negotiable_instruments",
        "Negotiable Instruments Law",
        "票據法",
        r"(?i)票據法|negotiable instruments|bills and notes",
    ),
    ("insurance_law", "Insurance Law", "保險法", r"(?i)保險法|insurance law"),
    (
        "securities_exchange",
        "Securities Exchange Law",
        "證券交易法",
        r"(?i)證券交易法|securities (exchange|regulation|law)",
    ),
    ("land_law", "Land Law", "土地法", r"(?i)土地法|land law"),
    ("tax_law", "Tax Law", "租稅法", r"(?i)租稅法|\btax(ation)? law"),
    (
        "fair_trade",
        "Fair Trade Law",
        "公平交易法",
        r"(?i)公平交易法|fair trade law|competition law|antitrust",
    ),
    (
        "intellectual_property",
        "Intellectual Property Law",
        "智慧財產權法",
        r"(?i)智慧財產權法|intellectual property",
    ),
    ("copyright", "Copyright Law", "著作權法", r"(?i)著作權法|copyright"),
    ("patent", "Patent Law", "專利法", r"(?i)專利|patent"),
    ("trademark", "Trademark Law", "商標法", r"(?i)商標法|trademark"),
    (
        "consumer_protection",
        "Consumer Protection Law",
        "消費者保護法",
        r"(?i)消費者保護法|consumer protection",
    ),
    (
        "social_welfare",
        "Social Welfare Law",
        "社會福利法",
        r"(?i)社會福利法|社會保險法|social (welfare|insurance|security) law",
    ),
    (
        "labor_law",
        "Labor Law",
        "勞動法",
        r"(?i)勞動法|勞工法|labou?r law|employment law",
    ),
    (
        "environmental_law",
        "Environmental Law",
        "環境法",
        r"(?i)環境法|環境保護法|environmental (law|protection)",
    ),
    (
        "public_international_law",
        "Public International Law",
        "國際公法",
        r"(?i)國際公法|public international law|law of nations",
    ),
    (
        "international_trade",
        "International Trade Law",
        "國際貿易法",
        r"(?i)國際貿易法|國際貿易與法律|international trade",
    ),
    (
        "anglo_american_contracts",
        "Anglo-American Contract Law",
        "英美契約法",
        r"(?i)英美契約法|anglo-american contract",
    ),
    (
        "anglo_american_torts",
        "Anglo-American Tort Law",
        "英美侵權行為法",
        r"(?i)英美侵權行為法|anglo-american torts?",
    ),
    ("jurisprudence", "Jurisprudence", "法理學", r"(?i)法理學|jurisprudence|philosophy of law"),
    (
        "legal_methodology",
        "Legal Methodology",
        "法學方法論",
        r"(?i)法學方法論|legal methodology|methodology of law",
    ),
];

/// The five ordinary judge-exam subjects. Civil and criminal law are
/// evaluated separately through subarea detection.
pub fn judge_subjects() -> &'static [SubjectMatcher] {
    static ROSTER: OnceLock<Vec<SubjectMatcher>> = OnceLock::new();
    ROSTER.get_or_init(|| JUDGE_SUBJECTS.iter().map(SubjectMatcher::compile).collect())
}

/// The lawyer-exam discipline roster, in display order.
pub fn lawyer_disciplines() -> &'static [SubjectMatcher] {
    static ROSTER: OnceLock<Vec<SubjectMatcher>> = OnceLock::new();
    ROSTER.get_or_init(|| LAWYER_DISCIPLINES.iter().map(SubjectMatcher::compile).collect())
}
