//! Attendance (emargement) endpoints.
//!
//! Students check in to a session at most once; trainers list who checked in.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::db::{Attendee, Role, CHECKED_IN};
use crate::AppState;

use super::auth::AuthUser;
use super::error::ApiError;
use super::MessageResponse;

async fn session_exists(state: &AppState, id: i64) -> Result<bool, ApiError> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM sessions WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    Ok(row.is_some())
}

/// Check in to a session
///
/// POST /sessions/:id/emargement
pub async fn check_in(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(session_id): Path<i64>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    if user.role != Role::Student {
        return Err(ApiError::forbidden(
            "Only a student can check in to a session",
        ));
    }

    if !session_exists(&state, session_id).await? {
        return Err(ApiError::not_found("Session not found"));
    }

    // The (session_id, etudiant_id) primary key rejects a second check-in,
    // so two concurrent requests cannot both slip through.
    sqlx::query("INSERT INTO emargements (session_id, etudiant_id, status) VALUES (?, ?, ?)")
        .bind(session_id)
        .bind(user.id)
        .bind(CHECKED_IN)
        .execute(&state.db)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err)
                if db_err.message().contains("UNIQUE constraint failed") =>
            {
                ApiError::duplicate("Already checked in to this session")
            }
            _ => ApiError::from(e),
        })?;

    info!(session_id, student_id = user.id, "Student checked in");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Checked in successfully".to_string(),
        }),
    ))
}

/// List students checked in to a session
///
/// GET /sessions/:id/emargement
///
/// A session with zero check-ins is reported as not found rather than an
/// empty list.
pub async fn list_check_ins(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(session_id): Path<i64>,
) -> Result<Json<Vec<Attendee>>, ApiError> {
    if user.role != Role::Trainer {
        return Err(ApiError::forbidden(
            "Only a trainer can view the attendance list",
        ));
    }

    if !session_exists(&state, session_id).await? {
        return Err(ApiError::not_found("Session not found"));
    }

    let attendees: Vec<Attendee> = sqlx::query_as(
        "SELECT u.id, u.name, u.email FROM emargements e \
         INNER JOIN users u ON e.etudiant_id = u.id \
         WHERE e.session_id = ? ORDER BY u.id",
    )
    .bind(session_id)
    .fetch_all(&state.db)
    .await?;

    if attendees.is_empty() {
        return Err(ApiError::not_found(
            "No student has checked in to this session",
        ));
    }

    Ok(Json(attendees))
}
