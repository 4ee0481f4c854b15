use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::checklist::repository::{
    ChecklistRepository, RepositoryError, SharedChecklist, StudentId,
};
use crate::workflows::checklist::{
    checklist_router, Checklist, ChecklistService, CourseRow, CourseStatus, CreditPolicy,
    FixedClock, Program, Track,
};

#[derive(Default)]
pub(super) struct MemoryRepository {
    sessions: Mutex<HashMap<StudentId, SharedChecklist>>,
}

impl ChecklistRepository for MemoryRepository {
    fn fetch(&self, student: &StudentId) -> Result<Option<SharedChecklist>, RepositoryError> {
        let sessions = self
            .sessions
            .lock()
            .map_err(|err| RepositoryError::Unavailable(err.to_string()))?;
        Ok(sessions.get(student).cloned())
    }

    fn open(
        &self,
        student: &StudentId,
        policy: &CreditPolicy,
    ) -> Result<SharedChecklist, RepositoryError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|err| RepositoryError::Unavailable(err.to_string()))?;
        Ok(sessions
            .entry(student.clone())
            .or_insert_with(|| Arc::new(Mutex::new(Checklist::new(policy.clone()))))
            .clone())
    }
}

pub(super) struct UnavailableRepository;

impl ChecklistRepository for UnavailableRepository {
    fn fetch(&self, _student: &StudentId) -> Result<Option<SharedChecklist>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    fn open(
        &self,
        _student: &StudentId,
        _policy: &CreditPolicy,
    ) -> Result<SharedChecklist, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }
}

pub(super) fn student() -> StudentId {
    StudentId("r11a21001".to_string())
}

pub(super) fn fixed_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::on(
        NaiveDate::from_ymd_opt(2025, 12, 1).expect("valid date"),
    ))
}

pub(super) fn build_service() -> (ChecklistService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service =
        ChecklistService::with_clock(repository.clone(), CreditPolicy::default(), fixed_clock());
    (service, repository)
}

pub(super) fn checklist_router_with_service(
    service: ChecklistService<MemoryRepository>,
) -> axum::Router {
    checklist_router(Arc::new(service))
}

/// A record that passes the judge exam: constitutional law plus three civil subareas.
pub(super) fn judge_ready_rows() -> Vec<CourseRow> {
    vec![
        CourseRow::new("Constitutional Law", Track::Base, 3.0)
            .with_term("1131")
            .with_grade("86"),
        CourseRow::new("Civil Code - General Principles", Track::Base, 2.0).with_term("1131"),
        CourseRow::new("Civil Code - Obligations General", Track::Base, 2.0).with_term("1132"),
        CourseRow::new("Civil Code - Property", Track::Base, 2.0).with_term("1132"),
        CourseRow::new("Finance", Track::Adv, 2.0)
            .with_term("1141")
            .with_program(Program::ExternalCollege),
        CourseRow::new("Tax Law", Track::Adv, 2.0)
            .with_term("1142")
            .with_status(CourseStatus::Planned),
    ]
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
