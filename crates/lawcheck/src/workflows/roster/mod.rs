//! CSV import of checklist rows and external credit records.

mod normalizer;
mod parser;

pub use normalizer::normalize_program;
pub(crate) use normalizer::parse_bool;

use crate::workflows::checklist::domain::{ChecklistError, CourseRow, ExternalCredit};
use crate::workflows::checklist::{Checklist, CreditPolicy};
use std::io::Read;
use std::path::Path;
use tracing::info;

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Checklist(ChecklistError),
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::Checklist(err) => {
                write!(f, "could not apply roster to checklist: {}", err)
            }
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::Checklist(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<ChecklistError> for RosterImportError {
    fn from(err: ChecklistError) -> Self {
        Self::Checklist(err)
    }
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        policy: CreditPolicy,
    ) -> Result<Checklist, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, policy)
    }

    /// Builds a checklist one row at a time so every row passes the same
    /// validation as an interactive insertion.
    pub fn from_reader<R: Read>(
        reader: R,
        policy: CreditPolicy,
    ) -> Result<Checklist, RosterImportError> {
        let mut checklist = Checklist::new(policy);
        let mut warnings = 0;

        for row in Self::rows_from_reader(reader)? {
            let (_, caps) = checklist.add(row)?;
            if !caps.is_clear() {
                warnings += 1;
            }
        }

        info!(
            rows = checklist.rows().len(),
            cap_warnings = warnings,
            "roster imported"
        );
        Ok(checklist)
    }

    pub fn rows_from_reader<R: Read>(reader: R) -> Result<Vec<CourseRow>, RosterImportError> {
        Ok(parser::parse_course_rows(reader)?)
    }

    pub fn external_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<Vec<ExternalCredit>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::external_from_reader(file)
    }

    pub fn external_from_reader<R: Read>(
        reader: R,
    ) -> Result<Vec<ExternalCredit>, RosterImportError> {
        Ok(parser::parse_external_credits(reader)?)
    }
}
