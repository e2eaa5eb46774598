// src/handlers/submission.rs

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::{PgPool, Postgres, QueryBuilder, types::Json as SqlJson};

use crate::{
    error::{AppError, is_unique_violation},
    extract::{AppJson, AppPath},
    models::{
        quiz::Quiz,
        student::{ClassFilter, StudentKeyRequest, StudentQuery},
        submission::{Submission, SubmitQuizRequest},
    },
    scoring::{AnswerKey, build_review, score_submission},
};

const SUBMISSION_COLUMNS: &str =
    "id, student_name, student_absen, student_class, score, wrong_answers, submitted_at";

/// Grades and stores a student's quiz.
///
/// * Loads the full answer key and grades every question.
/// * Inserts the submission; the (absen, class) unique constraint rejects a
///   second attempt with 409 instead of overwriting the first.
pub async fn submit_quiz(
    State(pool): State<PgPool>,
    AppJson(req): AppJson<SubmitQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let submission = req.into_new()?;

    let key: Vec<AnswerKey> =
        sqlx::query_as("SELECT id, correct_answer FROM quizzes ORDER BY id ASC")
            .fetch_all(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch answer key: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })?;

    let outcome = score_submission(&key, &submission.answers);

    sqlx::query(
        r#"
        INSERT INTO submissions (student_name, student_absen, student_class, score, wrong_answers)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(&submission.student_name)
    .bind(submission.student_absen)
    .bind(&submission.student_class)
    .bind(outcome.score)
    .bind(SqlJson(&outcome.wrong_answers))
    .execute(&pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict("Nomor absen ini sudah digunakan di kelas yang sama.".to_string())
        } else {
            tracing::error!("Error saat submit kuis: {:?}", e);
            AppError::InternalServerError(e.to_string())
        }
    })?;

    tracing::info!(
        "Submission stored for absen {} class {}: {}/{} correct, score {}",
        submission.student_absen,
        submission.student_class,
        outcome.correct_count,
        outcome.total_questions,
        outcome.score
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Jawaban berhasil disimpan!",
            "score": outcome.score,
        })),
    ))
}

/// Tells the quiz page whether this student already has a submission.
/// Answers 409 with `exists: true` when one is stored.
pub async fn check_absen(
    State(pool): State<PgPool>,
    AppJson(req): AppJson<StudentKeyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let student = req.require()?;

    let existing: Option<i32> = sqlx::query_scalar(
        "SELECT id FROM submissions WHERE student_absen = $1 AND student_class = $2",
    )
    .bind(student.absen)
    .bind(&student.class)
    .fetch_optional(&pool)
    .await?;

    if existing.is_some() {
        let body = json!({
            "exists": true,
            "message": format!(
                "Nilai untuk absen {} di kelas {} sudah ada di sistem. Kamu hanya bisa menyelesaikan quiz 1 kali! Silahkan hubungi guru jika ingin melakukan review/latihan soal",
                student.absen, student.class
            ),
        });
        return Ok((StatusCode::CONFLICT, Json(body)));
    }

    Ok((StatusCode::OK, Json(json!({ "exists": false }))))
}

/// Rebuilds the review of the student's latest submission against the
/// current quiz set.
pub async fn last_submission(
    State(pool): State<PgPool>,
    Query(query): Query<StudentQuery>,
) -> Result<impl IntoResponse, AppError> {
    let student = query.require()?;

    let submission: Submission = sqlx::query_as(&format!(
        r#"
        SELECT {SUBMISSION_COLUMNS}
        FROM submissions
        WHERE student_absen = $1 AND student_class = $2
        ORDER BY submitted_at DESC
        LIMIT 1
        "#
    ))
    .bind(student.absen)
    .bind(&student.class)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Error fetching last submission: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?
    .ok_or(AppError::NotFound("Data submission tidak ditemukan.".to_string()))?;

    let quizzes: Vec<Quiz> = sqlx::query_as(
        "SELECT id, question, options, correct_answer, image_base64, image_mimetype FROM quizzes ORDER BY id ASC",
    )
    .fetch_all(&pool)
    .await?;

    let details = build_review(quizzes, submission.wrong_answers());

    Ok(Json(json!({
        "student": { "student_name": submission.student_name },
        "score": submission.score,
        "date": submission.submitted_at,
        "details": details,
    })))
}

/// Lists submissions, optionally for one class.
/// Ordered by class, then best score first. Admin only.
pub async fn list_submissions(
    State(pool): State<PgPool>,
    Query(filter): Query<ClassFilter>,
) -> Result<impl IntoResponse, AppError> {
    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {SUBMISSION_COLUMNS} FROM submissions"));

    if let Some(class) = filter.class() {
        builder.push(" WHERE student_class = ");
        builder.push_bind(class);
    }
    builder.push(" ORDER BY student_class ASC, score DESC");

    let submissions: Vec<Submission> = builder
        .build_query_as()
        .fetch_all(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list submissions: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    Ok(Json(submissions))
}

/// Deletes a student's submission so they can take the quiz again.
/// Admin only.
pub async fn delete_submission(
    State(pool): State<PgPool>,
    AppPath((absen, kelas)): AppPath<(i32, String)>,
) -> Result<impl IntoResponse, AppError> {
    let result =
        sqlx::query("DELETE FROM submissions WHERE student_absen = $1 AND student_class = $2")
            .bind(absen)
            .bind(&kelas)
            .execute(&pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete submission: {:?}", e);
                AppError::InternalServerError(e.to_string())
            })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Data nilai siswa tidak ditemukan.".to_string()));
    }

    tracing::info!("Submission for absen {} class {} deleted", absen, kelas);

    Ok(Json(json!({
        "success": true,
        "message": "Data nilai siswa berhasil dihapus."
    })))
}
