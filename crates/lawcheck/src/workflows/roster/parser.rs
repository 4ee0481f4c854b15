use super::normalizer::{normalize_header, normalize_program, parse_bool};
use crate::workflows::checklist::domain::{
    parse_number, CourseRow, CourseSource, CourseStatus, ExternalCredit, Track,
};
use serde::{Deserialize, Deserializer};
use std::io::Read;

pub(crate) fn parse_course_rows<R: Read>(reader: R) -> Result<Vec<CourseRow>, csv::Error> {
    let mut csv_reader = open(reader)?;
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<CourseCsvRow>() {
        let row = record?;
        if row.name.trim().is_empty() {
            continue;
        }
        rows.push(row.into_course_row());
    }

    Ok(rows)
}

pub(crate) fn parse_external_credits<R: Read>(
    reader: R,
) -> Result<Vec<ExternalCredit>, csv::Error> {
    let mut csv_reader = open(reader)?;
    let mut credits = Vec::new();

    for record in csv_reader.deserialize::<ExternalCsvRow>() {
        let row = record?;
        if row.name.trim().is_empty() {
            continue;
        }
        credits.push(ExternalCredit {
            source: CourseSource::from(row.source.unwrap_or_default()),
            school: row.school,
            name: row.name.trim().to_string(),
            credit: parse_number(&row.credit),
            grade: row.grade,
        });
    }

    Ok(credits)
}

/// Header names are matched case-insensitively.
fn open<R: Read>(reader: R) -> Result<csv::Reader<R>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers: csv::StringRecord = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();
    csv_reader.set_headers(headers);
    Ok(csv_reader)
}

#[derive(Debug, Deserialize)]
struct CourseCsvRow {
    #[serde(default)]
    name: String,
    #[serde(default)]
    term: String,
    #[serde(default)]
    credit: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
    #[serde(default)]
    grade: String,
    #[serde(default)]
    track: String,
    #[serde(default)]
    program: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    source: Option<String>,
    #[serde(default)]
    is_transfer: String,
    #[serde(default)]
    is_lang: String,
    #[serde(default)]
    is_smr: String,
    #[serde(default)]
    code: String,
}

impl CourseCsvRow {
    fn into_course_row(self) -> CourseRow {
        let mut row = CourseRow::new(self.name.trim(), Track::parse_lenient(&self.track), parse_number(&self.credit))
            .with_term(self.term)
            .with_grade(self.grade)
            .with_program(normalize_program(&self.program))
            .with_source(CourseSource::from(self.source.unwrap_or_default()))
            .with_status(
                self.status
                    .as_deref()
                    .map(CourseStatus::normalize)
                    .unwrap_or_default(),
            );
        row.code = self.code;
        if parse_bool(&self.is_transfer) {
            row.is_transfer = true;
            row.status = CourseStatus::Done;
            if row.source == CourseSource::Internal {
                row.source = CourseSource::Transfer;
            }
        }
        row.is_lang = parse_bool(&self.is_lang);
        row.is_smr = parse_bool(&self.is_smr);
        row
    }
}

#[derive(Debug, Deserialize)]
struct ExternalCsvRow {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    source: Option<String>,
    #[serde(default)]
    school: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    credit: String,
    #[serde(default)]
    grade: String,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
