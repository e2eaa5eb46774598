// src/models/submission.rs

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use validator::Validate;

use crate::{error::AppError, models::student::lenient_i32};

/// Recorded as the selected answer when a question was left blank.
pub const NOT_ANSWERED: &str = "Tidak Dijawab";

/// One entry of the `wrong_answers` JSONB column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrongAnswer {
    pub question_id: i32,
    pub selected_answer: String,
    #[serde(default)]
    pub correct_answer: String,
}

/// Represents the 'submissions' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Submission {
    pub id: i32,
    pub student_name: String,
    pub student_absen: i32,
    pub student_class: String,
    pub score: i32,
    pub wrong_answers: Option<Json<Vec<WrongAnswer>>>,
    pub submitted_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Submission {
    pub fn wrong_answers(&self) -> &[WrongAnswer] {
        self.wrong_answers
            .as_ref()
            .map(|json| json.0.as_slice())
            .unwrap_or_default()
    }
}

/// A single answer as posted by the quiz page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    pub question_id: i32,
    #[serde(default)]
    pub answer: Option<String>,
}

/// DTO for `POST /api/submit-quiz`.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitQuizRequest {
    #[validate(length(min = 1, max = 255))]
    pub student_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub student_absen: Option<i32>,
    #[validate(length(min = 1, max = 50))]
    pub student_class: Option<String>,
    pub answers: Option<Vec<SubmittedAnswer>>,
}

/// A submit request with every required field present.
#[derive(Debug)]
pub struct NewSubmission {
    pub student_name: String,
    pub student_absen: i32,
    pub student_class: String,
    pub answers: Vec<SubmittedAnswer>,
}

impl SubmitQuizRequest {
    pub fn into_new(self) -> Result<NewSubmission, AppError> {
        self.validate()?;

        let (Some(student_name), Some(student_absen), Some(student_class), Some(answers)) = (
            self.student_name,
            self.student_absen,
            self.student_class,
            self.answers,
        ) else {
            return Err(AppError::BadRequest(
                "student_name, student_absen, student_class and answers are required".to_string(),
            ));
        };

        Ok(NewSubmission {
            student_name,
            student_absen,
            student_class,
            answers,
        })
    }
}

/// DTO for `POST /api/check-answer`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAnswerRequest {
    #[serde(default, deserialize_with = "lenient_i32")]
    pub question_id: Option<i32>,
    #[serde(default)]
    pub user_answer: Option<String>,
}

/// One question of the reconstructed review returned by `/api/last-submission`.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewItem {
    pub question: String,
    pub options: Json<crate::models::quiz::QuizOptions>,
    pub image_base64: Option<String>,
    pub image_mimetype: Option<String>,
    #[serde(rename = "userAnswer")]
    pub user_answer: String,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: String,
    #[serde(rename = "isCorrect")]
    pub is_correct: bool,
}
