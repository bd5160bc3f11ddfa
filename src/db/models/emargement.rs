//! Attendance (emargement) records.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Status written for every new check-in.
pub const CHECKED_IN: &str = "checked-in";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Emargement {
    pub session_id: i64,
    pub etudiant_id: i64,
    pub status: String,
    pub created_at: String,
}

/// A student that checked in to a session, as seen by a trainer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Attendee {
    pub id: i64,
    pub name: String,
    pub email: String,
}
