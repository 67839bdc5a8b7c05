// HTTP surface: one handler per use case, mapping error variants to status
// codes. Authentication, authorization, validation and not-found each get
// their own response class; everything else is a 500.

use axum::{
    Json, Router,
    body::{Body, Bytes},
    extract::rejection::JsonRejection,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, put},
};
use chrono::NaiveDate;
use futures_util::StreamExt;
use serde::Deserialize;
use uuid::Uuid;

use crate::modules::customizations::use_cases::delete_customization::{
    DeleteCustomizationError, DeleteCustomizationUseCase,
};
use crate::modules::customizations::use_cases::get_user_invoice_items::{
    GetUserInvoiceItemsError, GetUserInvoiceItemsUseCase,
};
use crate::modules::customizations::use_cases::update_customization::{
    CustomizationInput, UpdateCustomizationError, UpdateCustomizationUseCase,
};
use crate::modules::entries::core::entry::WeekEntriesInput;
use crate::modules::entries::use_cases::get_week_entries::{
    GetWeekEntriesError, GetWeekEntriesUseCase,
};
use crate::modules::entries::use_cases::update_week_entries::{
    UpdateWeekEntriesError, UpdateWeekEntriesUseCase,
};
use crate::modules::exports::use_cases::export_entries::{
    ExportEntriesError, ExportEntriesUseCase,
};
use crate::modules::projects::core::project::{NewProject, ProjectUpdate};
use crate::modules::projects::use_cases::create_project::{
    CreateProjectError, CreateProjectUseCase,
};
use crate::modules::projects::use_cases::delete_project::{
    DeleteProjectError, DeleteProjectUseCase,
};
use crate::modules::projects::use_cases::list_projects::{
    ListProjectsError, ListProjectsUseCase,
};
use crate::modules::projects::use_cases::update_project::{
    UpdateProjectError, UpdateProjectUseCase,
};
use crate::modules::users::use_cases::list_users::{ListUsersError, ListUsersUseCase};
use crate::modules::users::use_cases::update_user_permissions::{
    UpdateUserPermissionsError, UpdateUserPermissionsUseCase,
};
use crate::shared::core::color::Color;
use crate::shared::core::permission::PermissionSet;
use crate::shell::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/week/{year}/{week}", get(get_week).put(put_week))
        .route("/projects", get(list_projects).post(create_project))
        .route(
            "/projects/{id}",
            put(update_project).delete(delete_project),
        )
        .route("/invoice-items", get(get_invoice_items))
        .route(
            "/invoice-items/{id}/customization",
            put(put_customization).delete(delete_customization),
        )
        .route("/users", get(list_users))
        .route("/users/{id}/permissions", put(put_permissions))
        .route("/export", get(export))
        .with_state(state)
}

async fn get_week(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((year, week)): Path<(i32, u32)>,
) -> impl IntoResponse {
    let use_case = GetWeekEntriesUseCase::new(state.resolver(&headers), state.entries.clone());
    match use_case.execute(year, week).await {
        Ok(entries) => Json(entries).into_response(),
        Err(GetWeekEntriesError::UnauthenticatedUser) => StatusCode::UNAUTHORIZED.into_response(),
        Err(GetWeekEntriesError::UnauthorizedUser) => StatusCode::FORBIDDEN.into_response(),
        Err(GetWeekEntriesError::InvalidWeekNumber) => {
            StatusCode::UNPROCESSABLE_ENTITY.into_response()
        }
        Err(GetWeekEntriesError::Unknown) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn put_week(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((year, week)): Path<(i32, u32)>,
    body: Result<Json<WeekEntriesInput>, JsonRejection>,
) -> impl IntoResponse {
    let Json(input) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };
    let use_case = UpdateWeekEntriesUseCase::new(
        state.resolver(&headers),
        state.projects.clone(),
        state.customizations.clone(),
        state.entries.clone(),
    );
    match use_case.execute(year, week, input).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(UpdateWeekEntriesError::UnauthenticatedUser) => {
            StatusCode::UNAUTHORIZED.into_response()
        }
        Err(UpdateWeekEntriesError::UnauthorizedUser) => StatusCode::FORBIDDEN.into_response(),
        Err(UpdateWeekEntriesError::UnknownUserInvoiceItem) => StatusCode::NOT_FOUND.into_response(),
        Err(UpdateWeekEntriesError::Unknown) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        Err(_) => StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    }
}

async fn list_projects(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let use_case = ListProjectsUseCase::new(state.resolver(&headers), state.projects.clone());
    match use_case.execute().await {
        Ok(projects) => Json(projects).into_response(),
        Err(ListProjectsError::UnauthenticatedUser) => StatusCode::UNAUTHORIZED.into_response(),
        Err(ListProjectsError::UnauthorizedUser) => StatusCode::FORBIDDEN.into_response(),
        Err(ListProjectsError::Unknown) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn create_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<NewProject>, JsonRejection>,
) -> impl IntoResponse {
    let Json(input) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };
    let use_case = CreateProjectUseCase::new(state.resolver(&headers), state.projects.clone());
    match use_case.execute(input).await {
        Ok(project) => (StatusCode::CREATED, Json(project)).into_response(),
        Err(CreateProjectError::UnauthenticatedUser) => StatusCode::UNAUTHORIZED.into_response(),
        Err(CreateProjectError::UnauthorizedUser) => StatusCode::FORBIDDEN.into_response(),
        Err(CreateProjectError::DuplicateProjectName) => StatusCode::CONFLICT.into_response(),
        Err(CreateProjectError::Unknown) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        Err(_) => StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    }
}

async fn delete_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let use_case = DeleteProjectUseCase::new(
        state.resolver(&headers),
        state.projects.clone(),
        state.entries.clone(),
        state.customizations.clone(),
    );
    match use_case.execute(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(DeleteProjectError::UnauthenticatedUser) => StatusCode::UNAUTHORIZED.into_response(),
        Err(DeleteProjectError::UnauthorizedUser) => StatusCode::FORBIDDEN.into_response(),
        Err(DeleteProjectError::UnknownProjectId) => StatusCode::NOT_FOUND.into_response(),
        Err(DeleteProjectError::Unknown) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn update_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    body: Result<Json<ProjectUpdate>, JsonRejection>,
) -> impl IntoResponse {
    let Json(input) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };
    let use_case = UpdateProjectUseCase::new(
        state.resolver(&headers),
        state.projects.clone(),
        state.entries.clone(),
        state.customizations.clone(),
    );
    match use_case.execute(id, input).await {
        Ok(project) => Json(project).into_response(),
        Err(UpdateProjectError::UnauthenticatedUser) => StatusCode::UNAUTHORIZED.into_response(),
        Err(UpdateProjectError::UnauthorizedUser) => StatusCode::FORBIDDEN.into_response(),
        Err(UpdateProjectError::UnknownProjectId) => StatusCode::NOT_FOUND.into_response(),
        Err(UpdateProjectError::DuplicateProjectName) => StatusCode::CONFLICT.into_response(),
        Err(UpdateProjectError::Unknown) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        Err(_) => StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    }
}

async fn list_users(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let use_case = ListUsersUseCase::new(state.resolver(&headers), state.users.clone());
    match use_case.execute().await {
        Ok(users) => Json(users).into_response(),
        Err(ListUsersError::UnauthenticatedUser) => StatusCode::UNAUTHORIZED.into_response(),
        Err(ListUsersError::UnauthorizedUser) => StatusCode::FORBIDDEN.into_response(),
        Err(ListUsersError::Unknown) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn put_permissions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    body: Result<Json<PermissionSet>, JsonRejection>,
) -> impl IntoResponse {
    let Json(permissions) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };
    let use_case = UpdateUserPermissionsUseCase::new(state.resolver(&headers), state.users.clone());
    match use_case.execute(id, permissions).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(UpdateUserPermissionsError::UnauthenticatedUser) => {
            StatusCode::UNAUTHORIZED.into_response()
        }
        Err(UpdateUserPermissionsError::UnauthorizedUser) => StatusCode::FORBIDDEN.into_response(),
        Err(UpdateUserPermissionsError::UnknownUserId) => StatusCode::NOT_FOUND.into_response(),
        Err(UpdateUserPermissionsError::Unknown) => {
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(_) => StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    }
}

#[derive(Deserialize)]
struct CustomizationBody {
    color: Color,
    enabled: bool,
    active_from: Option<NaiveDate>,
    active_to: Option<NaiveDate>,
}

async fn put_customization(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    body: Result<Json<CustomizationBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(_) => return StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    };
    let use_case = UpdateCustomizationUseCase::new(
        state.resolver(&headers),
        state.projects.clone(),
        state.customizations.clone(),
    );
    let input = CustomizationInput {
        invoice_item_id: id,
        color: body.color,
        enabled: body.enabled,
        active_from: body.active_from,
        active_to: body.active_to,
    };
    match use_case.execute(input).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(UpdateCustomizationError::UnauthenticatedUser) => {
            StatusCode::UNAUTHORIZED.into_response()
        }
        Err(UpdateCustomizationError::UnauthorizedUser) => StatusCode::FORBIDDEN.into_response(),
        Err(UpdateCustomizationError::UnknownUserInvoiceItem) => {
            StatusCode::NOT_FOUND.into_response()
        }
        Err(UpdateCustomizationError::InvalidActiveDateRange) => {
            StatusCode::UNPROCESSABLE_ENTITY.into_response()
        }
        Err(UpdateCustomizationError::Unknown) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn delete_customization(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let use_case =
        DeleteCustomizationUseCase::new(state.resolver(&headers), state.customizations.clone());
    match use_case.execute(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(DeleteCustomizationError::UnauthenticatedUser) => {
            StatusCode::UNAUTHORIZED.into_response()
        }
        Err(DeleteCustomizationError::UnauthorizedUser) => StatusCode::FORBIDDEN.into_response(),
        Err(DeleteCustomizationError::UnknownUserInvoiceItem) => {
            StatusCode::NOT_FOUND.into_response()
        }
        Err(DeleteCustomizationError::Unknown) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn get_invoice_items(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let use_case = GetUserInvoiceItemsUseCase::new(
        state.resolver(&headers),
        state.projects.clone(),
        state.customizations.clone(),
    );
    match use_case.execute().await {
        Ok(items) => Json(items).into_response(),
        Err(GetUserInvoiceItemsError::UnauthenticatedUser) => {
            StatusCode::UNAUTHORIZED.into_response()
        }
        Err(GetUserInvoiceItemsError::UnauthorizedUser) => StatusCode::FORBIDDEN.into_response(),
        Err(GetUserInvoiceItemsError::Unknown) => {
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Deserialize)]
struct ExportRange {
    start: NaiveDate,
    stop: NaiveDate,
}

/// Streams newline-delimited JSON rows; rows are serialized as they arrive
/// from the store, never buffered as a whole.
async fn export(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(range): Query<ExportRange>,
) -> impl IntoResponse {
    let use_case = ExportEntriesUseCase::new(state.resolver(&headers), state.exports.clone());
    let stream = match use_case.execute(range.start, range.stop).await {
        Ok(stream) => stream,
        Err(ExportEntriesError::UnauthenticatedUser) => {
            return StatusCode::UNAUTHORIZED.into_response();
        }
        Err(ExportEntriesError::UnauthorizedUser) => return StatusCode::FORBIDDEN.into_response(),
        Err(ExportEntriesError::StartGreaterThanStop) => {
            return StatusCode::UNPROCESSABLE_ENTITY.into_response();
        }
        Err(ExportEntriesError::Unknown) => {
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let body = Body::from_stream(stream.map(|row| -> Result<Bytes, axum::BoxError> {
        let row = row?;
        let mut line = serde_json::to_vec(&row)?;
        line.push(b'\n');
        Ok(Bytes::from(line))
    }));
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .body(body)
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

#[cfg(test)]
mod http_shell_tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::shell::identity::{
        EMAIL_HEADER, EXTERNAL_ID_HEADER, NAME_HEADER, PROVIDER_HEADER,
    };
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn make_state() -> AppState {
        AppState::in_memory(AppConfig {
            first_admin_email: Some("admin@example.com".to_string()),
            ..AppConfig::default()
        })
    }

    fn authed(request: axum::http::request::Builder, email: &str) -> axum::http::request::Builder {
        request
            .header(PROVIDER_HEADER, "github")
            .header(EXTERNAL_ID_HEADER, format!("ext-{email}"))
            .header(NAME_HEADER, "Alex")
            .header(EMAIL_HEADER, email)
    }

    #[tokio::test]
    async fn it_should_return_401_without_identity_headers() {
        let response = router(make_state())
            .oneshot(
                Request::get("/week/2025/25")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn it_should_serve_an_empty_week_to_a_registered_caller() {
        let response = router(make_state())
            .oneshot(
                authed(Request::get("/week/2025/25"), "alex@example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["days"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn it_should_return_404_when_tracking_against_an_unknown_item() {
        let body = format!(
            r#"{{"days":[[{{"invoice_item_id":"{}","minutes":60,"remark":null}}],[],[],[],[],[],[]]}}"#,
            Uuid::now_v7()
        );
        let response = router(make_state())
            .oneshot(
                authed(Request::put("/week/2025/25"), "alex@example.com")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn it_should_return_403_for_projects_without_permission() {
        // A self-registered caller only gets the Entries axis.
        let response = router(make_state())
            .oneshot(
                authed(Request::get("/projects"), "alex@example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn it_should_let_the_first_admin_create_and_list_projects() {
        let app = router(make_state());
        let body = r#"{"name":"Alpha","enabled":true,"users":[],"invoice_items":[{"name":"Development","ordinal":0}]}"#;
        let response = app
            .clone()
            .oneshot(
                authed(Request::post("/projects"), "admin@example.com")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(
                authed(Request::get("/projects"), "admin@example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn it_should_return_422_for_an_inverted_export_range() {
        let response = router(make_state())
            .oneshot(
                authed(
                    Request::get("/export?start=2025-06-30&stop=2025-06-16"),
                    "admin@example.com",
                )
                .body(Body::empty())
                .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn it_should_return_404_when_deleting_an_unknown_customization() {
        let response = router(make_state())
            .oneshot(
                authed(
                    Request::delete(format!("/invoice-items/{}/customization", Uuid::now_v7())),
                    "admin@example.com",
                )
                .body(Body::empty())
                .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn it_should_return_404_when_deleting_a_missing_project() {
        let response = router(make_state())
            .oneshot(
                authed(
                    Request::delete(format!("/projects/{}", Uuid::now_v7())),
                    "admin@example.com",
                )
                .body(Body::empty())
                .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
