use axum::{extract::State, routing::post, Json, Router};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{queries::questions, Question},
    server::{app::AppState, error::ApiError, extractors::JsonBody},
    telemetry::QUIZ_QUESTIONS_CNTR,
};

use super::ApiResponse;

// quiz_category.id of 0 means "any category"
const ANY_CATEGORY: i64 = 0;

#[derive(Deserialize)]
struct QuizCategory {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    id: i64,
}

#[derive(Deserialize)]
struct QuizRequest {
    quiz_category: QuizCategory,
    previous_questions: Vec<i64>,
}

impl QuizRequest {
    fn category(&self) -> Option<i64> {
        match self.quiz_category.id {
            ANY_CATEGORY => None,
            id => Some(id),
        }
    }
}

#[derive(Serialize)]
struct QuizResponse {
    success: bool,
    question: Question,
    remaining_questions: usize,
}

async fn next_quiz_question(
    State(pool): State<SqlitePool>,
    JsonBody(request): JsonBody<QuizRequest>,
) -> ApiResponse<Json<QuizResponse>> {
    let category = request.category();
    let candidates =
        questions::get_quiz_candidates(&pool, category, &request.previous_questions).await?;

    let question = candidates
        .choose(&mut rand::thread_rng())
        .cloned()
        .ok_or(ApiError::NotFound)?;

    let label = category.map_or_else(|| "all".to_owned(), |id| id.to_string());
    QUIZ_QUESTIONS_CNTR.with_label_values(&[label.as_str()]).inc();

    Ok(Json(QuizResponse {
        success: true,
        question,
        remaining_questions: candidates.len() - 1,
    }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_quiz_question))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_means_any_category() {
        let request: QuizRequest = serde_json::from_str(
            r#"{"quiz_category": {"id": 0, "type": "click"}, "previous_questions": [1, 2]}"#,
        )
        .unwrap();
        assert_eq!(request.category(), None);
        assert_eq!(request.previous_questions, vec![1, 2]);
    }

    #[test]
    fn category_id_may_be_a_string() {
        let request: QuizRequest = serde_json::from_str(
            r#"{"quiz_category": {"id": "3", "type": "Geography"}, "previous_questions": []}"#,
        )
        .unwrap();
        assert_eq!(request.category(), Some(3));
    }

    #[test]
    fn previous_questions_are_required() {
        assert!(serde_json::from_str::<QuizRequest>(r#"{"quiz_category": {"id": 1}}"#).is_err());
    }
}
