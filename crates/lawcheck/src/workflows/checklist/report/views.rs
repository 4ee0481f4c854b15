use super::super::credits::AdvancedCategory;
use super::super::domain::{CourseRow, CourseStatus, Track};
use super::super::term::{term_key_of, TermKey};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CourseRowView {
    pub id: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<TermKey>,
    pub credit: f64,
    pub status: CourseStatus,
    pub status_label: &'static str,
    pub grade_cell: String,
    pub track: Track,
    pub track_label: &'static str,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub code: String,
    pub is_transfer: bool,
}

impl CourseRowView {
    pub fn from_row(row: &CourseRow, admission_year: &str) -> Self {
        let term = term_key_of(row);
        let display_name = if row.is_transfer {
            format!("{admission_year} {} (transfer)", row.name.trim())
        } else {
            match term {
                Some(key) => format!("{} {}", key.label(), row.name.trim()),
                None => row.name.trim().to_string(),
            }
        };
        let grade_cell = match row.status {
            CourseStatus::Planned => CourseStatus::Planned.label().to_string(),
            CourseStatus::Done if row.grade.is_empty() => CourseStatus::Done.label().to_string(),
            CourseStatus::Done => row.grade.clone(),
        };

        Self {
            id: row.id.to_string(),
            display_name,
            term,
            credit: row.credit,
            status: row.status,
            status_label: row.status.label(),
            grade_cell,
            track: row.track,
            track_label: row.track.label(),
            code: row.code.clone(),
            is_transfer: row.is_transfer,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdvancedBucketEntry {
    pub category: AdvancedCategory,
    pub label: &'static str,
    pub credits: f64,
}
