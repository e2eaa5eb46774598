// src/scoring.rs

//! Grading of a submitted quiz and reconstruction of the per-question review.

use std::collections::HashMap;

use crate::models::{
    quiz::Quiz,
    submission::{NOT_ANSWERED, ReviewItem, SubmittedAnswer, WrongAnswer},
};

/// Answer key entry fetched for grading.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AnswerKey {
    pub id: i32,
    pub correct_answer: String,
}

/// Result of grading one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreOutcome {
    pub correct_count: usize,
    pub total_questions: usize,
    /// Percentage 0..=100.
    pub score: i32,
    pub wrong_answers: Vec<WrongAnswer>,
}

/// Case-insensitive comparison of a chosen option label with the key.
pub fn answers_match(given: &str, correct: &str) -> bool {
    given.to_lowercase() == correct.to_lowercase()
}

/// `round(correct / total * 100)` with halves rounded up; 0 when `total` is 0.
pub fn percentage(correct: usize, total: usize) -> i32 {
    if total == 0 {
        return 0;
    }
    ((200 * correct + total) / (2 * total)) as i32
}

/// Grades `answers` against the full answer key.
///
/// Every question of the key is graded. A question with no answer, or a
/// blank one, is wrong and recorded with [`NOT_ANSWERED`]. Answers for ids
/// not in the key are ignored. If an id is answered twice the first wins.
pub fn score_submission(key: &[AnswerKey], answers: &[SubmittedAnswer]) -> ScoreOutcome {
    let mut by_question: HashMap<i32, &str> = HashMap::new();
    for a in answers {
        if let Some(answer) = a.answer.as_deref() {
            by_question.entry(a.question_id).or_insert(answer);
        }
    }

    let mut correct_count = 0;
    let mut wrong_answers = Vec::new();

    for entry in key {
        match by_question.get(&entry.id).filter(|a| !a.is_empty()) {
            Some(given) if answers_match(given, &entry.correct_answer) => correct_count += 1,
            given => wrong_answers.push(WrongAnswer {
                question_id: entry.id,
                selected_answer: given.map_or(NOT_ANSWERED, |g| *g).to_string(),
                correct_answer: entry.correct_answer.clone(),
            }),
        }
    }

    ScoreOutcome {
        correct_count,
        total_questions: key.len(),
        score: percentage(correct_count, key.len()),
        wrong_answers,
    }
}

/// Rebuilds the review shown to a student after submitting.
///
/// Only wrong answers are stored, so any question missing from
/// `wrong_answers` is shown as answered correctly. Questions edited after
/// the submission are not detected.
pub fn build_review(quizzes: Vec<Quiz>, wrong_answers: &[WrongAnswer]) -> Vec<ReviewItem> {
    let selected: HashMap<i32, &str> = wrong_answers
        .iter()
        .map(|wa| (wa.question_id, wa.selected_answer.as_str()))
        .collect();

    quizzes
        .into_iter()
        .map(|q| {
            let wrong = selected.get(&q.id).copied();
            ReviewItem {
                user_answer: wrong.unwrap_or(&q.correct_answer).to_string(),
                is_correct: wrong.is_none(),
                question: q.question,
                options: q.options,
                image_base64: q.image_base64,
                image_mimetype: q.image_mimetype,
                correct_answer: q.correct_answer,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quiz::QuizOptions;
    use sqlx::types::Json;

    fn key(entries: &[(i32, &str)]) -> Vec<AnswerKey> {
        entries
            .iter()
            .map(|(id, c)| AnswerKey {
                id: *id,
                correct_answer: c.to_string(),
            })
            .collect()
    }

    fn answer(id: i32, a: Option<&str>) -> SubmittedAnswer {
        SubmittedAnswer {
            question_id: id,
            answer: a.map(str::to_string),
        }
    }

    fn quiz(id: i32, correct: &str) -> Quiz {
        Quiz {
            id,
            question: format!("Soal {}", id),
            options: Json(QuizOptions::from([
                ("A".to_string(), "satu".to_string()),
                ("B".to_string(), "dua".to_string()),
                ("C".to_string(), "tiga".to_string()),
            ])),
            correct_answer: correct.to_string(),
            image_base64: None,
            image_mimetype: None,
        }
    }

    #[test]
    fn mixed_case_scenario_scores_half() {
        let outcome = score_submission(
            &key(&[(1, "B"), (2, "C")]),
            &[answer(1, Some("b")), answer(2, Some("A"))],
        );

        assert_eq!(outcome.score, 50);
        assert_eq!(outcome.correct_count, 1);
        assert_eq!(
            outcome.wrong_answers,
            vec![WrongAnswer {
                question_id: 2,
                selected_answer: "A".to_string(),
                correct_answer: "C".to_string(),
            }]
        );
    }

    #[test]
    fn empty_quiz_scores_zero() {
        let outcome = score_submission(&[], &[answer(1, Some("A"))]);
        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.total_questions, 0);
        assert!(outcome.wrong_answers.is_empty());
    }

    #[test]
    fn percentage_rounds_like_math_round() {
        for total in 1..=40usize {
            for correct in 0..=total {
                let p = percentage(correct, total) as i64;
                let error = p * total as i64 - 100 * correct as i64;
                assert!((0..=100).contains(&p));
                assert!(2 * error.abs() <= total as i64, "{correct}/{total}");
            }
        }
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 3), 33);
    }

    #[test]
    fn unanswered_questions_are_recorded_with_marker() {
        let outcome = score_submission(
            &key(&[(1, "A"), (2, "B"), (3, "C")]),
            &[answer(1, Some("A")), answer(2, Some(""))],
        );

        assert_eq!(outcome.score, 33);
        let selected: Vec<_> = outcome
            .wrong_answers
            .iter()
            .map(|w| (w.question_id, w.selected_answer.as_str()))
            .collect();
        assert_eq!(selected, vec![(2, NOT_ANSWERED), (3, NOT_ANSWERED)]);
    }

    #[test]
    fn answers_for_unknown_questions_are_ignored() {
        let outcome = score_submission(
            &key(&[(1, "A")]),
            &[answer(1, Some("a")), answer(99, Some("B"))],
        );

        assert_eq!(outcome.score, 100);
        assert!(outcome.wrong_answers.is_empty());
    }

    #[test]
    fn first_answer_for_a_question_wins() {
        let outcome = score_submission(
            &key(&[(1, "A")]),
            &[answer(1, Some("A")), answer(1, Some("B"))],
        );
        assert_eq!(outcome.score, 100);
    }

    #[test]
    fn matching_ignores_case() {
        assert!(answers_match("a", "A"));
        assert!(answers_match("A", "A"));
        assert!(!answers_match("B", "A"));
    }

    #[test]
    fn review_marks_unlisted_questions_correct() {
        let wrong = vec![WrongAnswer {
            question_id: 2,
            selected_answer: "A".to_string(),
            correct_answer: "C".to_string(),
        }];

        let review = build_review(vec![quiz(1, "B"), quiz(2, "C")], &wrong);

        assert_eq!(review.len(), 2);
        assert_eq!(review[0].user_answer, "B");
        assert!(review[0].is_correct);
        assert_eq!(review[1].user_answer, "A");
        assert_eq!(review[1].correct_answer, "C");
        assert!(!review[1].is_correct);
    }

    #[test]
    fn review_of_graded_submission_matches_grading() {
        let quizzes = vec![quiz(1, "B"), quiz(2, "C"), quiz(3, "A")];
        let key: Vec<AnswerKey> = quizzes
            .iter()
            .map(|q| AnswerKey {
                id: q.id,
                correct_answer: q.correct_answer.clone(),
            })
            .collect();

        let outcome = score_submission(&key, &[answer(1, Some("B")), answer(3, Some("c"))]);
        let review = build_review(quizzes, &outcome.wrong_answers);

        let correct: Vec<bool> = review.iter().map(|r| r.is_correct).collect();
        assert_eq!(correct, vec![true, false, false]);
        assert_eq!(review[1].user_answer, NOT_ANSWERED);
        assert_eq!(review[2].user_answer, "c");
    }
}
