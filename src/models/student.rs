// src/models/student.rs

use serde::{Deserialize, Deserializer};

use crate::error::AppError;

/// Class filter value meaning "every class".
pub const ALL_CLASSES: &str = "semua";

/// Accepts a roll number sent either as a JSON number or as a numeric string,
/// since browser forms post the latter.
pub fn lenient_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(i64),
        Text(String),
    }

    let value = Option::<NumberOrText>::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(NumberOrText::Number(n)) => i32::try_from(n)
            .map(Some)
            .map_err(|_| serde::de::Error::custom("number out of range")),
        Some(NumberOrText::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(s)) => s
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("'{}' is not a number", s))),
    }
}

/// Natural student identity sent in request bodies.
#[derive(Debug, Deserialize)]
pub struct StudentKeyRequest {
    #[serde(default, deserialize_with = "lenient_i32")]
    pub student_absen: Option<i32>,
    #[serde(default)]
    pub student_class: Option<String>,
}

/// A validated (absen, class) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentKey {
    pub absen: i32,
    pub class: String,
}

impl StudentKeyRequest {
    pub fn require(self) -> Result<StudentKey, AppError> {
        match (self.student_absen, self.student_class) {
            (Some(absen), Some(class)) if !class.trim().is_empty() => Ok(StudentKey { absen, class }),
            _ => Err(AppError::BadRequest(
                "student_absen and student_class are required".to_string(),
            )),
        }
    }
}

/// Query string `?absen=..&kelas=..` used by the student-facing GET routes.
#[derive(Debug, Deserialize)]
pub struct StudentQuery {
    pub absen: Option<String>,
    pub kelas: Option<String>,
}

impl StudentQuery {
    pub fn require(self) -> Result<StudentKey, AppError> {
        let (Some(absen), Some(kelas)) = (self.absen, self.kelas) else {
            return Err(AppError::BadRequest("absen and kelas are required".to_string()));
        };
        if kelas.trim().is_empty() {
            return Err(AppError::BadRequest("absen and kelas are required".to_string()));
        }

        let absen = absen
            .trim()
            .parse::<i32>()
            .map_err(|_| AppError::BadRequest(format!("absen '{}' is not a number", absen)))?;

        Ok(StudentKey { absen, class: kelas })
    }
}

/// Query string `?kelas=..` used by the admin monitoring lists.
#[derive(Debug, Deserialize)]
pub struct ClassFilter {
    pub kelas: Option<String>,
}

impl ClassFilter {
    /// The class to filter on, or `None` for all classes.
    pub fn class(&self) -> Option<&str> {
        self.kelas
            .as_deref()
            .filter(|k| !k.is_empty() && *k != ALL_CLASSES)
    }
}
