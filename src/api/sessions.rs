//! Training session CRUD endpoints.
//!
//! Creating, updating and deleting sessions requires the trainer role. Any
//! trainer may modify any session; ownership is recorded but not enforced.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::db::{
    CreateSessionRequest, CreateSessionResponse, Role, Session, UpdateSessionRequest,
};
use crate::AppState;

use super::auth::AuthUser;
use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_date, validate_title};
use super::MessageResponse;

fn validate_session_fields(title: &str, date: &str) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_title(title) {
        errors.add("title", e);
    }
    if let Err(e) = validate_date(date) {
        errors.add("date", e);
    }

    errors.finish()
}

/// Create a session
///
/// POST /sessions
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), ApiError> {
    if user.role != Role::Trainer {
        return Err(ApiError::forbidden("Only a trainer can create a session"));
    }

    validate_session_fields(&request.title, &request.date)?;

    let result = sqlx::query("INSERT INTO sessions (title, date, trainer_id) VALUES (?, ?, ?)")
        .bind(&request.title)
        .bind(&request.date)
        .bind(user.id)
        .execute(&state.db)
        .await?;

    let id = result.last_insert_rowid();
    info!(session_id = id, trainer_id = user.id, "Session created");

    Ok((StatusCode::CREATED, Json(CreateSessionResponse { id })))
}

/// List all sessions
///
/// GET /sessions
pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> Result<Json<Vec<Session>>, ApiError> {
    let sessions: Vec<Session> = sqlx::query_as("SELECT * FROM sessions ORDER BY id")
        .fetch_all(&state.db)
        .await?;

    Ok(Json(sessions))
}

/// Get a session by id
///
/// GET /sessions/:id
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Session>, ApiError> {
    let session: Option<Session> = sqlx::query_as("SELECT * FROM sessions WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;

    match session {
        Some(session) => Ok(Json(session)),
        None => Err(ApiError::not_found("Session not found")),
    }
}

/// Update a session's title and date
///
/// PUT /sessions/:id
pub async fn update_session(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(request): Json<UpdateSessionRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    if user.role != Role::Trainer {
        return Err(ApiError::forbidden("Only a trainer can update a session"));
    }

    validate_session_fields(&request.title, &request.date)?;

    let result = sqlx::query("UPDATE sessions SET title = ?, date = ? WHERE id = ?")
        .bind(&request.title)
        .bind(&request.date)
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Session not found"));
    }

    info!(session_id = id, trainer_id = user.id, "Session updated");

    Ok(Json(MessageResponse {
        message: "Session updated successfully".to_string(),
    }))
}

/// Delete a session
///
/// DELETE /sessions/:id
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    if user.role != Role::Trainer {
        return Err(ApiError::forbidden("Only a trainer can delete a session"));
    }

    let result = sqlx::query("DELETE FROM sessions WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Session not found"));
    }

    info!(session_id = id, trainer_id = user.id, "Session deleted");

    Ok(Json(MessageResponse {
        message: "Session deleted successfully".to_string(),
    }))
}
