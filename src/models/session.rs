// src/models/session.rs

use serde::Serialize;
use sqlx::FromRow;

/// Statuses written by the session routes.
///
/// The column itself is free text; rows written by other tools are passed
/// through unchanged when read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    Blocked,
}

impl SessionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Blocked => "blocked",
        }
    }
}

/// Represents the 'quiz_sessions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuizSession {
    pub id: i32,
    pub student_absen: i32,
    pub student_class: String,
    pub status: String,
    pub last_updated: Option<chrono::DateTime<chrono::Utc>>,
}

/// Row of the monitoring view: a session joined with the student's name
/// from their submission, if any.
#[derive(Debug, Serialize, FromRow)]
pub struct SessionOverview {
    pub student_absen: i32,
    pub student_class: String,
    pub student_name: Option<String>,
    pub status: String,
}
