//! HTML request handlers.
//!
//! Each handler calls one `StudentService` operation and maps the
//! outcome to a page, a form re-render or a redirect with a notice.
//! No service error crosses the request boundary.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use tracing::{error, warn};

use crate::domain::form::StudentForm;
use crate::domain::student::StudentId;
use crate::usecases::students::ServiceError;

use super::notice::{with_notice, Notice, NoticeKind, NoticeQuery};
use super::pages::{self, FormMode};
use super::AppState;

const LIST_PATH: &str = "/view_students";

/// Query string accepted by the list and search pages.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub notice: Option<String>,
    pub id: Option<String>,
    pub name: Option<String>,
}

impl ListQuery {
    fn notice_query(&self) -> NoticeQuery {
        NoticeQuery {
            notice: self.notice.clone(),
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// Render a storage failure as a 500 page.
fn storage_failure(state: &AppState, err: &ServiceError) -> Response {
    error!(error = %err, "Request failed on storage");
    state.record_rejection(err.kind());
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(pages::error_page("The student records could not be accessed.")),
    )
        .into_response()
}

fn not_found_redirect(state: &AppState, id: StudentId) -> Response {
    warn!(id, "Student not found");
    state.record_rejection("not_found");
    Redirect::to(&with_notice(LIST_PATH, NoticeKind::NotFound, None, None)).into_response()
}

/// Turn `?notice=..&id=..` into a message, looking up the student's name
/// where it still exists. Deletions carry the name themselves.
async fn resolve_notice(state: &AppState, query: &NoticeQuery) -> Option<Notice> {
    let kind = query.kind()?;
    let id = query.id();
    let name = match (kind, id) {
        (NoticeKind::Added | NoticeKind::Updated, Some(id)) => {
            state.service.get(id).await.ok().map(|s| s.name)
        }
        (NoticeKind::Deleted, _) => query.name().map(str::to_string),
        _ => None,
    };
    Some(kind.message(id, name.as_deref()))
}

/// Re-render a form after a rejected submission.
fn rejected_form(
    state: &AppState,
    mode: FormMode,
    form: &StudentForm,
    err: &ServiceError,
) -> Response {
    let status = match err {
        ServiceError::DuplicateRollNo(_) => StatusCode::CONFLICT,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    };
    warn!(reason = err.kind(), "Student form rejected");
    state.record_rejection(err.kind());
    let html = pages::student_form(mode, form, Some(&Notice::error(err.to_string())));
    (status, Html(html)).into_response()
}

// ── Pages ───────────────────────────────────────────────────

/// `GET /` and `GET /index`
pub async fn index(State(state): State<AppState>, Query(query): Query<NoticeQuery>) -> Response {
    match state.service.stats().await {
        Ok(stats) => {
            let notice = resolve_notice(&state, &query).await;
            Html(pages::index(&stats, notice.as_ref())).into_response()
        }
        Err(e) => storage_failure(&state, &e),
    }
}

/// `GET /view_students[?q=term]`
pub async fn view_students(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Response {
    match query.q.as_deref().map(str::trim) {
        Some("") => Redirect::to(LIST_PATH).into_response(),
        Some(term) => render_search(&state, term, &query).await,
        None => {
            let notice = resolve_notice(&state, &query.notice_query()).await;
            match state.service.list().await {
                Ok(students) => {
                    Html(pages::student_list(&students, None, notice.as_ref())).into_response()
                }
                Err(e) => storage_failure(&state, &e),
            }
        }
    }
}

/// `GET /search?q=term`
pub async fn search(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Response {
    match query.q.as_deref().map(str::trim) {
        None | Some("") => Redirect::to(LIST_PATH).into_response(),
        Some(term) => render_search(&state, term, &query).await,
    }
}

async fn render_search(state: &AppState, term: &str, query: &ListQuery) -> Response {
    let notice = resolve_notice(state, &query.notice_query()).await;
    match state.service.search(term).await {
        Ok(students) => {
            Html(pages::student_list(&students, Some(term), notice.as_ref())).into_response()
        }
        Err(e) => storage_failure(state, &e),
    }
}

/// `GET /view_student/{id}`
pub async fn view_student(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
    Query(query): Query<NoticeQuery>,
) -> Response {
    match state.service.get(id).await {
        Ok(student) => {
            let notice = query.kind().map(|k| k.message(Some(id), Some(student.name.as_str())));
            Html(pages::student_detail(&student, notice.as_ref())).into_response()
        }
        Err(ServiceError::NotFound(_)) => not_found_redirect(&state, id),
        Err(e) => storage_failure(&state, &e),
    }
}

// ── Create ──────────────────────────────────────────────────

/// `GET /add_student`
pub async fn add_student_form() -> Html<String> {
    Html(pages::student_form(FormMode::Add, &StudentForm::default(), None))
}

/// `POST /add_student`
pub async fn add_student(State(state): State<AppState>, Form(form): Form<StudentForm>) -> Response {
    match state.service.create(&form).await {
        Ok(student) => {
            state.record_mutation("create");
            Redirect::to(&with_notice(LIST_PATH, NoticeKind::Added, Some(student.id), None))
                .into_response()
        }
        Err(e @ ServiceError::Storage(_)) => storage_failure(&state, &e),
        Err(e) => rejected_form(&state, FormMode::Add, &form, &e),
    }
}

// ── Edit ────────────────────────────────────────────────────

/// `GET /edit_student/{id}`
pub async fn edit_student_form(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
) -> Response {
    match state.service.get(id).await {
        Ok(student) => Html(pages::student_form(
            FormMode::Edit(id),
            &StudentForm::from_student(&student),
            None,
        ))
        .into_response(),
        Err(ServiceError::NotFound(_)) => not_found_redirect(&state, id),
        Err(e) => storage_failure(&state, &e),
    }
}

/// `POST /edit_student/{id}`
pub async fn edit_student(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
    Form(form): Form<StudentForm>,
) -> Response {
    match state.service.update(id, &form).await {
        Ok(student) => {
            state.record_mutation("update");
            let path = format!("/view_student/{}", student.id);
            Redirect::to(&with_notice(&path, NoticeKind::Updated, None, None)).into_response()
        }
        Err(ServiceError::NotFound(_)) => not_found_redirect(&state, id),
        Err(e @ ServiceError::Storage(_)) => storage_failure(&state, &e),
        Err(e) => rejected_form(&state, FormMode::Edit(id), &form, &e),
    }
}

// ── Delete ──────────────────────────────────────────────────

/// `GET /student/delete/{id}`
pub async fn delete_student(State(state): State<AppState>, Path(id): Path<StudentId>) -> Response {
    match state.service.delete(id).await {
        Ok(student) => {
            state.record_mutation("delete");
            let target = with_notice(
                LIST_PATH,
                NoticeKind::Deleted,
                Some(student.id),
                Some(&student.name),
            );
            Redirect::to(&target).into_response()
        }
        Err(ServiceError::NotFound(_)) => not_found_redirect(&state, id),
        Err(e) => storage_failure(&state, &e),
    }
}
