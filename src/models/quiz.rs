// src/models/quiz.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

use crate::error::AppError;

/// Labeled choice set, e.g. `{"A": "Jakarta", "B": "Bandung"}`.
/// A `BTreeMap` keeps the labels in display order.
pub type QuizOptions = BTreeMap<String, String>;

/// Represents the 'quizzes' table in the database.
///
/// The same shape is served to students by `/api/quiz-questions`,
/// `correct_answer` included.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Quiz {
    pub id: i32,

    pub question: String,

    /// Stored as a JSONB object in the database.
    pub options: Json<QuizOptions>,

    /// Single-letter label of the correct option.
    pub correct_answer: String,

    /// Optional embedded image, base64 encoded.
    pub image_base64: Option<String>,
    pub image_mimetype: Option<String>,
}

/// DTO for creating or replacing a quiz question.
#[derive(Debug, Deserialize, Validate)]
pub struct QuizPayload {
    #[validate(length(min = 1, max = 5000))]
    pub question: String,
    #[validate(custom(function = validate_options))]
    pub options: QuizOptions,
    #[validate(length(equal = 1))]
    pub correct_answer: String,
    pub image_base64: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub image_mimetype: Option<String>,
}

impl QuizPayload {
    /// Field validation plus the checks that span several fields.
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()?;

        let has_label = self
            .options
            .keys()
            .any(|label| label.eq_ignore_ascii_case(&self.correct_answer));
        if !has_label {
            return Err(AppError::BadRequest(format!(
                "correct_answer '{}' is not one of the option labels",
                self.correct_answer
            )));
        }

        let has_image = self
            .image_base64
            .as_deref()
            .is_some_and(|data| !data.is_empty());
        if has_image && self.image_mimetype.is_none() {
            return Err(AppError::BadRequest(
                "image_mimetype is required when image_base64 is set".to_string(),
            ));
        }

        Ok(())
    }
}

fn validate_options(options: &QuizOptions) -> Result<(), validator::ValidationError> {
    if options.is_empty() {
        return Err(validator::ValidationError::new("options_cannot_be_empty"));
    }
    for (label, text) in options {
        if label.chars().count() != 1 {
            return Err(validator::ValidationError::new("option_label_must_be_one_letter"));
        }
        if text.len() > 1000 {
            return Err(validator::ValidationError::new("option_too_long"));
        }
    }
    Ok(())
}
