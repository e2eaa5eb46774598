// src/handlers/session.rs

//! Per-student quiz session flag (`active` / `blocked`).
//!
//! Writes are single statements with no transition table: any status may
//! follow any other, and concurrent writes to one (absen, class) row resolve
//! last-write-wins inside PostgreSQL.

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::AppError,
    extract::AppJson,
    models::{
        session::{QuizSession, SessionOverview, SessionStatus},
        student::{ClassFilter, StudentKey, StudentKeyRequest, StudentQuery},
    },
};

/// Sets the status of an existing session row.
/// Returns false when the student has no session, which is not an error.
async fn set_status(
    pool: &PgPool,
    student: &StudentKey,
    status: SessionStatus,
) -> Result<bool, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE quiz_sessions
        SET status = $1, last_updated = NOW()
        WHERE student_absen = $2 AND student_class = $3
        "#,
    )
    .bind(status.as_str())
    .bind(student.absen)
    .bind(&student.class)
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to set session status to {}: {:?}", status.as_str(), e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(result.rows_affected() > 0)
}

/// Creates the student's session, or resets an existing one to active.
pub async fn start_session(
    State(pool): State<PgPool>,
    AppJson(req): AppJson<StudentKeyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let student = req.require()?;

    let session: QuizSession = sqlx::query_as(
        r#"
        INSERT INTO quiz_sessions (student_absen, student_class, status)
        VALUES ($1, $2, $3)
        ON CONFLICT (student_absen, student_class)
        DO UPDATE SET status = EXCLUDED.status, last_updated = NOW()
        RETURNING id, student_absen, student_class, status, last_updated
        "#,
    )
    .bind(student.absen)
    .bind(&student.class)
    .bind(SessionStatus::Active.as_str())
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Error starting session: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(json!({ "success": true, "session": session })))
}

/// Blocks the student's session. A student without a session is left alone.
pub async fn block_session(
    State(pool): State<PgPool>,
    AppJson(req): AppJson<StudentKeyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let student = req.require()?;

    if set_status(&pool, &student, SessionStatus::Blocked).await? {
        tracing::warn!("Session blocked: absen {} class {}", student.absen, student.class);
    }

    Ok(Json(json!({ "success": true })))
}

/// Re-activates a blocked session. Admin only.
pub async fn unblock_session(
    State(pool): State<PgPool>,
    AppJson(req): AppJson<StudentKeyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let student = req.require()?;

    if set_status(&pool, &student, SessionStatus::Active).await? {
        tracing::info!("Session unblocked: absen {} class {}", student.absen, student.class);
    }

    Ok(Json(json!({
        "success": true,
        "message": "Siswa berhasil di-unblock."
    })))
}

/// Returns the stored status, or 404 `{"status": "not_found"}`.
pub async fn session_status(
    State(pool): State<PgPool>,
    Query(query): Query<StudentQuery>,
) -> Result<impl IntoResponse, AppError> {
    let student = query.require()?;

    let status: Option<String> = sqlx::query_scalar(
        "SELECT status FROM quiz_sessions WHERE student_absen = $1 AND student_class = $2",
    )
    .bind(student.absen)
    .bind(&student.class)
    .fetch_optional(&pool)
    .await?;

    Ok(match status {
        Some(status) => (StatusCode::OK, Json(json!({ "status": status }))),
        None => (StatusCode::NOT_FOUND, Json(json!({ "status": "not_found" }))),
    })
}

/// Monitoring view of sessions joined with student names.
/// Admin only.
pub async fn list_sessions(
    State(pool): State<PgPool>,
    Query(filter): Query<ClassFilter>,
) -> Result<impl IntoResponse, AppError> {
    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
        r#"
        SELECT
            s.student_absen,
            s.student_class,
            sub.student_name,
            s.status
        FROM quiz_sessions s
        LEFT JOIN submissions sub
            ON s.student_absen = sub.student_absen AND s.student_class = sub.student_class
        "#,
    );

    if let Some(class) = filter.class() {
        builder.push(" WHERE s.student_class = ");
        builder.push_bind(class);
    }
    builder.push(" ORDER BY s.student_class, s.student_absen");

    let sessions: Vec<SessionOverview> = builder
        .build_query_as()
        .fetch_all(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Error fetching sessions: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    Ok(Json(sessions))
}
