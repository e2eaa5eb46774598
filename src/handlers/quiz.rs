// src/handlers/quiz.rs

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::{PgPool, types::Json as SqlJson};

use crate::{
    error::AppError,
    extract::{AppJson, AppPath},
    models::{
        quiz::{Quiz, QuizPayload},
        submission::CheckAnswerRequest,
    },
    scoring::answers_match,
};

const QUIZ_COLUMNS: &str =
    "id, question, options, correct_answer, image_base64, image_mimetype";

async fn fetch_all_quizzes(pool: &PgPool) -> Result<Vec<Quiz>, AppError> {
    sqlx::query_as::<_, Quiz>(&format!(
        "SELECT {QUIZ_COLUMNS} FROM quizzes ORDER BY id ASC"
    ))
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch quizzes: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })
}

/// Lists every quiz question, answer key included.
/// Admin only.
pub async fn list_quizzes(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(fetch_all_quizzes(&pool).await?))
}

/// Questions for the student quiz page, ordered by id.
///
/// `correct_answer` is part of the payload; the page uses it for its
/// per-question self-check.
pub async fn quiz_questions(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(fetch_all_quizzes(&pool).await?))
}

/// Creates a new quiz question.
/// Admin only.
pub async fn create_quiz(
    State(pool): State<PgPool>,
    AppJson(payload): AppJson<QuizPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.check()?;

    let id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO quizzes (question, options, correct_answer, image_base64, image_mimetype)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(&payload.question)
    .bind(SqlJson(&payload.options))
    .bind(&payload.correct_answer)
    .bind(&payload.image_base64)
    .bind(&payload.image_mimetype)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Error inserting quiz: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    tracing::info!("Quiz {} created", id);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": { "id": id } })),
    ))
}

/// Replaces a quiz question by ID.
/// Admin only.
pub async fn update_quiz(
    State(pool): State<PgPool>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<QuizPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.check()?;

    let updated: Option<i32> = sqlx::query_scalar(
        r#"
        UPDATE quizzes
        SET question = $1, options = $2, correct_answer = $3, image_base64 = $4, image_mimetype = $5
        WHERE id = $6
        RETURNING id
        "#,
    )
    .bind(&payload.question)
    .bind(SqlJson(&payload.options))
    .bind(&payload.correct_answer)
    .bind(&payload.image_base64)
    .bind(&payload.image_mimetype)
    .bind(id)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Error updating quiz: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let id = updated.ok_or(AppError::NotFound("Soal tidak ditemukan.".to_string()))?;

    Ok(Json(json!({ "success": true, "data": { "id": id } })))
}

/// Deletes a quiz question by ID.
/// Admin only.
pub async fn delete_quiz(
    State(pool): State<PgPool>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query("DELETE FROM quizzes WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete quiz: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Soal tidak ditemukan.".to_string()));
    }

    Ok(Json(json!({ "success": true, "message": "Soal berhasil dihapus." })))
}

/// Checks one answer against the key, ignoring case.
pub async fn check_answer(
    State(pool): State<PgPool>,
    AppJson(req): AppJson<CheckAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(question_id), Some(user_answer)) =
        (req.question_id, req.user_answer.filter(|a| !a.is_empty()))
    else {
        return Err(AppError::BadRequest(
            "Membutuhkan ID Soal dan Jawaban Pengguna.".to_string(),
        ));
    };

    let correct_answer: String =
        sqlx::query_scalar("SELECT correct_answer FROM quizzes WHERE id = $1")
            .bind(question_id)
            .fetch_optional(&pool)
            .await?
            .ok_or(AppError::NotFound("Soal tidak ditemukan.".to_string()))?;

    Ok(Json(json!({
        "success": true,
        "isCorrect": answers_match(&user_answer, &correct_answer),
        "correctAnswer": correct_answer,
    })))
}
