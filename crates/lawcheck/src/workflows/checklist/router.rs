use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;

use super::domain::{CourseRow, RowId};
use super::repository::{ChecklistRepository, StudentId};
use super::service::{ChecklistService, ReplaceCoursesRequest, ReportRequest};
use crate::error::AppError;

/// Router builder exposing the stateless report and the per-student session API.
pub fn checklist_router<R>(service: Arc<ChecklistService<R>>) -> Router
where
    R: ChecklistRepository + 'static,
{
    Router::new()
        .route("/api/v1/checklist/report", post(report_handler::<R>))
        .route(
            "/api/v1/students/:student_id/courses",
            post(add_course_handler::<R>).put(replace_courses_handler::<R>),
        )
        .route(
            "/api/v1/students/:student_id/courses/:row_id",
            delete(remove_course_handler::<R>),
        )
        .route(
            "/api/v1/students/:student_id/report",
            get(student_report_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ReportQuery {
    #[serde(default)]
    focus_term: Option<String>,
}

pub(crate) async fn report_handler<R>(
    State(service): State<Arc<ChecklistService<R>>>,
    axum::Json(request): axum::Json<ReportRequest>,
) -> Response
where
    R: ChecklistRepository + 'static,
{
    match service.report_for(request) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn replace_courses_handler<R>(
    State(service): State<Arc<ChecklistService<R>>>,
    Path(student_id): Path<String>,
    axum::Json(request): axum::Json<ReplaceCoursesRequest>,
) -> Response
where
    R: ChecklistRepository + 'static,
{
    match service.replace_courses(&StudentId(student_id), request) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn add_course_handler<R>(
    State(service): State<Arc<ChecklistService<R>>>,
    Path(student_id): Path<String>,
    axum::Json(row): axum::Json<CourseRow>,
) -> Response
where
    R: ChecklistRepository + 'static,
{
    match service.add_course(&StudentId(student_id), row) {
        Ok(outcome) => (StatusCode::CREATED, axum::Json(outcome)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn remove_course_handler<R>(
    State(service): State<Arc<ChecklistService<R>>>,
    Path((student_id, row_id)): Path<(String, String)>,
) -> Response
where
    R: ChecklistRepository + 'static,
{
    match service.remove_course(&StudentId(student_id), &RowId(row_id)) {
        Ok(row) => (StatusCode::OK, axum::Json(row)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn student_report_handler<R>(
    State(service): State<Arc<ChecklistService<R>>>,
    Path(student_id): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Response
where
    R: ChecklistRepository + 'static,
{
    match service.report(&StudentId(student_id), query.focus_term.as_deref()) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}
