use chrono::NaiveDate;
use lawcheck::workflows::checklist::{
    Checklist, ChecklistRepository, Clock, CreditPolicy, FixedClock, RepositoryError,
    SharedChecklist, StudentId, SystemClock, TermKey,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Per-student sessions kept for the lifetime of the process. The outer
/// lock only guards the map; each checklist carries its own.
#[derive(Default, Clone)]
pub(crate) struct InMemoryChecklistRepository {
    sessions: Arc<Mutex<HashMap<StudentId, SharedChecklist>>>,
}

impl InMemoryChecklistRepository {
    fn sessions(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<StudentId, SharedChecklist>>, RepositoryError>
    {
        self.sessions
            .lock()
            .map_err(|_| RepositoryError::Unavailable("session map poisoned".to_string()))
    }
}

impl ChecklistRepository for InMemoryChecklistRepository {
    fn fetch(&self, student: &StudentId) -> Result<Option<SharedChecklist>, RepositoryError> {
        Ok(self.sessions()?.get(student).cloned())
    }

    fn open(
        &self,
        student: &StudentId,
        policy: &CreditPolicy,
    ) -> Result<SharedChecklist, RepositoryError> {
        let mut sessions = self.sessions()?;
        let session = sessions
            .entry(student.clone())
            .or_insert_with(|| Arc::new(Mutex::new(Checklist::new(policy.clone()))));
        Ok(session.clone())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_term(raw: &str) -> Result<TermKey, String> {
    TermKey::parse(raw).ok_or_else(|| format!("'{raw}' is not a term key such as 1141, 1142 or 114S"))
}

/// A pinned date when one was given on the command line, the wall clock otherwise.
pub(crate) fn clock_for(today: Option<NaiveDate>) -> Box<dyn Clock> {
    match today {
        Some(date) => Box::new(FixedClock::on(date)),
        None => Box::new(SystemClock),
    }
}
