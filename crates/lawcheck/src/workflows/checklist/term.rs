//! Academic term keys (`YYY1`, `YYY2`, `YYYS`) and their chronological order.
//!
//! Years are counted in the local calendar, whose epoch sits 1911 years
//! after the Gregorian one. A summer session is filed under the academic
//! year it precedes, so `114S` orders before `1141`.

use super::domain::{CourseRow, CourseStatus};
use chrono::{Local, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::OnceLock;

/// Order assigned to anything that is not a valid term key.
pub const UNORDERED: u32 = 1_000_000_000;

const CALENDAR_EPOCH_OFFSET: i32 = 1911;
const SUMMER_MARKERS: [&str; 2] = ["暑修", "summer session"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Session {
    Summer,
    First,
    Second,
}

impl Session {
    const fn weight(self) -> u32 {
        match self {
            Self::Summer => 0,
            Self::First => 1,
            Self::Second => 2,
        }
    }

    const fn code(self) -> char {
        match self {
            Self::Summer => 'S',
            Self::First => '1',
            Self::Second => '2',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TermKey {
    year: u16,
    session: Session,
}

impl TermKey {
    pub const fn new(year: u16, session: Session) -> Self {
        Self { year, session }
    }

    /// Parses `YYY1`, `YYY2` or `YYYS` after trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let captures = term_key_pattern().captures(raw.trim())?;
        let year = captures[1].parse().ok()?;
        let session = match &captures[2] {
            "1" => Session::First,
            "2" => Session::Second,
            _ => Session::Summer,
        };
        Some(Self { year, session })
    }

    pub const fn year(self) -> u16 {
        self.year
    }

    pub const fn session(self) -> Session {
        self.session
    }

    pub const fn order(self) -> u32 {
        self.year as u32 * 10 + self.session.weight()
    }

    pub fn label(self) -> String {
        match self.session {
            Session::Summer => format!("{:03} Summer", self.year),
            session => format!("{:03}-{}", self.year, session.code()),
        }
    }

    /// Moment the term is administratively over: second semesters close on
    /// May 1 of the following Gregorian year, everything else on November 1.
    pub fn cutoff(self) -> Option<NaiveDateTime> {
        let base_year = CALENDAR_EPOCH_OFFSET + i32::from(self.year);
        let date = match self.session {
            Session::Second => NaiveDate::from_ymd_opt(base_year + 1, 5, 1),
            Session::First | Session::Summer => NaiveDate::from_ymd_opt(base_year, 11, 1),
        }?;
        date.and_hms_opt(0, 0, 0)
    }
}

impl fmt::Display for TermKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}{}", self.year, self.session.code())
    }
}

impl Serialize for TermKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Source of "now" for clock-driven status inference.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    pub fn on(date: NaiveDate) -> Self {
        Self(date.and_hms_opt(12, 0, 0).unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Derives the term a row belongs to, or `None` when it cannot be placed.
pub fn term_key_of(row: &CourseRow) -> Option<TermKey> {
    let term = row.term.trim();
    if let Some(captures) = semester_term_pattern().captures(term) {
        let year = captures[1].parse().ok()?;
        let session = if &captures[2] == "1" {
            Session::First
        } else {
            Session::Second
        };
        return Some(TermKey::new(year, session));
    }

    if row.is_smr || has_summer_marker(&row.name) {
        let year = leading_year(term).or_else(|| leading_year(row.name.trim()))?;
        return Some(TermKey::new(year, Session::Summer));
    }

    let captures = prefixed_name_pattern().captures(&row.name)?;
    let year = captures[1].parse().ok()?;
    let session = match &captures[2] {
        "1" => Session::First,
        "2" => Session::Second,
        _ => return None,
    };
    Some(TermKey::new(year, session))
}

/// Order of a raw key; anything unparseable sorts after every real term.
pub fn term_order(raw: &str) -> u32 {
    TermKey::parse(raw).map_or(UNORDERED, TermKey::order)
}

pub fn row_order(row: &CourseRow) -> u32 {
    term_key_of(row).map_or(UNORDERED, TermKey::order)
}

/// Infers completion from the calendar. Keys that cannot be parsed are
/// treated as completed.
pub fn infer_status_by_term_key<C: Clock + ?Sized>(raw: &str, clock: &C) -> CourseStatus {
    match TermKey::parse(raw) {
        Some(key) => infer_status(key, clock),
        None => CourseStatus::Done,
    }
}

pub fn infer_status<C: Clock + ?Sized>(key: TermKey, clock: &C) -> CourseStatus {
    match key.cutoff() {
        Some(cutoff) if clock.now() < cutoff => CourseStatus::Planned,
        _ => CourseStatus::Done,
    }
}

pub(crate) fn has_summer_marker(name: &str) -> bool {
    let lowered = name.to_lowercase();
    SUMMER_MARKERS.iter().any(|marker| lowered.contains(marker))
}

/// Splits a legacy `YYY-N Name` title into its term and bare name.
pub(crate) fn split_prefixed_name(name: &str) -> Option<(String, String)> {
    let captures = legacy_title_pattern().captures(name.trim())?;
    Some((
        format!("{}{}", &captures[1], &captures[2]),
        captures[3].trim().to_string(),
    ))
}

/// Accepts what a user may type into a row's term field: nothing, a bare
/// year (for summer rows) or a full key.
pub fn is_term_input(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || term_input_pattern().is_match(trimmed)
}

fn leading_year(value: &str) -> Option<u16> {
    let captures = leading_year_pattern().captures(value)?;
    captures[1].parse().ok()
}

fn term_key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{3})([12S])$").expect("term key pattern compiles"))
}

fn semester_term_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{3})([12])$").expect("semester pattern compiles"))
}

fn prefixed_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{3})-(\d)\s+").expect("prefix pattern compiles"))
}

fn legacy_title_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{3})-(\d)\s+(.+)$").expect("legacy pattern compiles"))
}

fn term_input_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{3}[12S]?$").expect("term input pattern compiles"))
}

fn leading_year_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{3})").expect("year pattern compiles"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::checklist::domain::Track;

    fn row(name: &str, term: &str) -> CourseRow {
        CourseRow::new(name, Track::Adv, 2.0).with_term(term)
    }

    fn clock(year: i32, month: u32, day: u32) -> FixedClock {
        FixedClock::on(NaiveDate::from_ymd_opt(year, month, day).expect("valid date"))
    }

    #[test]
    fn explicit_semester_term_wins() {
        let key = term_key_of(&row("113-2 Torts", "1141")).expect("key");
        assert_eq!(key.to_string(), "1141");
    }

    #[test]
    fn summer_rows_take_year_from_term_or_name() {
        let from_term = term_key_of(&row("Legal Writing", "114").summer()).expect("key");
        assert_eq!(from_term.to_string(), "114S");

        let from_name = term_key_of(&row("113 暑修 Legal Writing", "")).expect("key");
        assert_eq!(from_name.to_string(), "113S");

        assert!(term_key_of(&row("Legal Writing", "").summer()).is_none());
    }

    #[test]
    fn name_prefix_is_used_as_fallback() {
        let key = term_key_of(&row("113-2 Constitutional Law", "")).expect("key");
        assert_eq!(key.to_string(), "1132");
        assert!(term_key_of(&row("113-2Constitutional Law", "")).is_none());
        assert!(term_key_of(&row("Constitutional Law", "")).is_none());
    }

    #[test]
    fn summer_orders_before_both_semesters_of_its_year() {
        assert!(term_order("114S") < term_order("1141"));
        assert!(term_order("1141") < term_order("1142"));
        assert!(term_order("1132") < term_order("114S"));
        assert_eq!(term_order("1143"), UNORDERED);
        assert_eq!(term_order(""), UNORDERED);
    }

    #[test]
    fn inferred_status_flips_at_the_cutoff() {
        assert_eq!(
            infer_status_by_term_key("1141", &clock(2025, 10, 31)),
            CourseStatus::Planned
        );
        assert_eq!(
            infer_status_by_term_key("1141", &clock(2025, 11, 1)),
            CourseStatus::Done
        );
        assert_eq!(
            infer_status_by_term_key("1142", &clock(2026, 4, 30)),
            CourseStatus::Planned
        );
        assert_eq!(
            infer_status_by_term_key("1142", &clock(2026, 5, 1)),
            CourseStatus::Done
        );
        assert_eq!(
            infer_status_by_term_key("garbage", &clock(2000, 1, 1)),
            CourseStatus::Done
        );
    }

    #[test]
    fn term_input_accepts_keys_and_bare_years() {
        assert!(is_term_input(""));
        assert!(is_term_input("114"));
        assert!(is_term_input(" 1142 "));
        assert!(is_term_input("114S"));
        assert!(!is_term_input("1143"));
        assert!(!is_term_input("fall"));
    }

    #[test]
    fn labels_render_for_display() {
        assert_eq!(TermKey::parse("1141").expect("key").label(), "114-1");
        assert_eq!(TermKey::parse("114S").expect("key").label(), "114 Summer");
    }

    #[test]
    fn legacy_titles_split_into_term_and_name() {
        assert_eq!(
            split_prefixed_name("113-1  Property Law"),
            Some(("1131".to_string(), "Property Law".to_string()))
        );
        assert_eq!(split_prefixed_name("Property Law"), None);
    }
}
