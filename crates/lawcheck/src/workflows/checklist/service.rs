use std::sync::{Arc, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::credits::CapCheck;
use super::domain::{ChecklistError, CourseRow, ExternalCredit, RowId};
use super::instance::Checklist;
use super::policy::CreditPolicy;
use super::report::{ChecklistReport, ReportOptions};
use super::repository::{ChecklistRepository, RepositoryError, SharedChecklist, StudentId};
use super::term::{Clock, SystemClock, TermKey};

/// Stateless report request: the caller owns the rows.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub rows: Vec<CourseRow>,
    #[serde(default)]
    pub external_credits: Vec<ExternalCredit>,
    #[serde(default)]
    pub focus_term: Option<String>,
    /// Recompute statuses from the calendar before reporting.
    #[serde(default)]
    pub auto_status: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplaceCoursesRequest {
    #[serde(default)]
    pub rows: Vec<CourseRow>,
    #[serde(default)]
    pub external_credits: Option<Vec<ExternalCredit>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddCourseOutcome {
    pub row_id: RowId,
    pub caps: CapCheck,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Service composing the session repository with the checklist engines.
pub struct ChecklistService<R> {
    repository: Arc<R>,
    policy: CreditPolicy,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl<R> ChecklistService<R>
where
    R: ChecklistRepository + 'static,
{
    pub fn new(repository: Arc<R>, policy: CreditPolicy) -> Self {
        Self::with_clock(repository, policy, Arc::new(SystemClock))
    }

    pub fn with_clock(
        repository: Arc<R>,
        policy: CreditPolicy,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        Self {
            repository,
            policy,
            clock,
        }
    }

    pub fn policy(&self) -> &CreditPolicy {
        &self.policy
    }

    pub fn report_for(&self, request: ReportRequest) -> Result<ChecklistReport, ChecklistServiceError> {
        let options = report_options(request.focus_term.as_deref())?;
        let mut checklist =
            Checklist::from_rows(request.rows, request.external_credits, self.policy.clone())?;
        if request.auto_status {
            checklist.auto_infer_status(self.clock.as_ref());
        }
        Ok(checklist.report(&options))
    }

    pub fn replace_courses(
        &self,
        student: &StudentId,
        request: ReplaceCoursesRequest,
    ) -> Result<ChecklistReport, ChecklistServiceError> {
        let session = self.repository.open(student, &self.policy)?;
        let mut checklist = lock(&session)?;
        checklist.replace_rows(request.rows)?;
        if let Some(credits) = request.external_credits {
            checklist.set_external_credits(credits);
        }
        debug!(student = %student, rows = checklist.rows().len(), "checklist replaced");
        Ok(checklist.report(&ReportOptions::default()))
    }

    pub fn add_course(
        &self,
        student: &StudentId,
        row: CourseRow,
    ) -> Result<AddCourseOutcome, ChecklistServiceError> {
        let session = self.repository.open(student, &self.policy)?;
        let mut checklist = lock(&session)?;
        let (row_id, caps) = checklist.add(row)?;
        let warning = (!caps.is_clear()).then(|| caps.message());
        Ok(AddCourseOutcome {
            row_id,
            caps,
            warning,
        })
    }

    pub fn remove_course(
        &self,
        student: &StudentId,
        row_id: &RowId,
    ) -> Result<CourseRow, ChecklistServiceError> {
        let session = self.existing(student)?;
        let mut checklist = lock(&session)?;
        Ok(checklist.remove(row_id)?)
    }

    pub fn report(
        &self,
        student: &StudentId,
        focus_term: Option<&str>,
    ) -> Result<ChecklistReport, ChecklistServiceError> {
        let options = report_options(focus_term)?;
        let session = self.existing(student)?;
        let checklist = lock(&session)?;
        Ok(checklist.report(&options))
    }

    fn existing(&self, student: &StudentId) -> Result<SharedChecklist, ChecklistServiceError> {
        Ok(self
            .repository
            .fetch(student)?
            .ok_or(RepositoryError::NotFound)?)
    }
}

fn lock(session: &SharedChecklist) -> Result<MutexGuard<'_, Checklist>, RepositoryError> {
    session
        .lock()
        .map_err(|_| RepositoryError::Unavailable("checklist lock poisoned".to_string()))
}

fn report_options(focus_term: Option<&str>) -> Result<ReportOptions, ChecklistError> {
    match focus_term.map(str::trim).filter(|term| !term.is_empty()) {
        None => Ok(ReportOptions::default()),
        Some(raw) => TermKey::parse(raw)
            .map(ReportOptions::for_term)
            .ok_or_else(|| ChecklistError::InvalidTerm(raw.to_string())),
    }
}

/// Error raised by the checklist service.
#[derive(Debug, thiserror::Error)]
pub enum ChecklistServiceError {
    #[error(transparent)]
    Checklist(#[from] ChecklistError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
