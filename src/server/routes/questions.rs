use std::collections::BTreeMap;

use axum::{
    extract::State,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories, questions},
        NewQuestion, Question,
    },
    server::{
        app::AppState,
        deserializers::deserialize_non_empty_string,
        error::ApiError,
        extractors::{IdPath, JsonBody, PageNumber},
        pagination::{paginate, Page},
    },
};

use super::{categories::category_map, ApiResponse};

// the listing is not scoped to a category
const ALL_CATEGORIES: &str = "All";

/// Body of `POST /questions`: either a search or a new question.
#[derive(Deserialize)]
struct QuestionsBody {
    #[serde(rename = "searchTerm", default)]
    #[serde(deserialize_with = "deserialize_non_empty_string")]
    search_term: Option<String>,
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_option_number_from_string")]
    category: Option<i64>,
    #[serde(default)]
    #[serde(deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i64>,
}

enum QuestionsAction {
    Search(String),
    Create(NewQuestion),
}

impl TryFrom<QuestionsBody> for QuestionsAction {
    type Error = ApiError;

    fn try_from(body: QuestionsBody) -> Result<Self, Self::Error> {
        if let Some(term) = body.search_term {
            return Ok(QuestionsAction::Search(term));
        }
        match (body.question, body.answer, body.category, body.difficulty) {
            (Some(question), Some(answer), Some(category), Some(difficulty))
                if !question.trim().is_empty() && !answer.trim().is_empty() =>
            {
                Ok(QuestionsAction::Create(NewQuestion {
                    question,
                    answer,
                    category,
                    difficulty,
                }))
            }
            _ => Err(ApiError::Unprocessable),
        }
    }
}

#[derive(Serialize)]
struct QuestionsPageResponse {
    success: bool,
    #[serde(flatten)]
    page: Page<Question>,
    categories: BTreeMap<i64, String>,
    current_category: &'static str,
}

#[derive(Serialize)]
struct DeletedResponse {
    success: bool,
    deleted: i64,
    #[serde(flatten)]
    page: Page<Question>,
}

#[derive(Serialize)]
struct PageResponse {
    success: bool,
    #[serde(flatten)]
    page: Page<Question>,
}

async fn get_questions(
    State(pool): State<SqlitePool>,
    PageNumber(page): PageNumber,
) -> ApiResponse<Json<QuestionsPageResponse>> {
    let all_questions = questions::get_all_questions(&pool).await?;
    let all_categories = categories::get_all_categories(&pool).await?;

    let page = paginate(page, all_questions);
    if page.is_empty() {
        return Err(ApiError::NotFound);
    }

    Ok(Json(QuestionsPageResponse {
        success: true,
        page,
        categories: category_map(all_categories),
        current_category: ALL_CATEGORIES,
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    IdPath(id): IdPath,
    PageNumber(page): PageNumber,
) -> ApiResponse<Json<DeletedResponse>> {
    if questions::get_question(&pool, id).await?.is_none() {
        return Err(ApiError::NotFound);
    }

    // a concurrent delete between lookup and delete removes nothing; report it as gone
    if !questions::delete_question(&pool, id).await? {
        return Err(ApiError::NotFound);
    }
    tracing::info!(question_id = id, "Question deleted");

    let all_questions = questions::get_all_questions(&pool).await?;
    Ok(Json(DeletedResponse {
        success: true,
        deleted: id,
        page: paginate(page, all_questions),
    }))
}

async fn search_or_create_question(
    State(pool): State<SqlitePool>,
    PageNumber(page): PageNumber,
    JsonBody(body): JsonBody<QuestionsBody>,
) -> ApiResponse<Json<PageResponse>> {
    let records = match QuestionsAction::try_from(body)? {
        QuestionsAction::Search(term) => {
            let found = questions::search_questions(&pool, &term).await?;
            if found.is_empty() {
                return Err(ApiError::NotFound);
            }
            found
        }
        QuestionsAction::Create(new) => {
            let id = questions::create_question(&pool, &new).await?;
            tracing::info!(question_id = id, category = new.category, "Question created");
            questions::get_all_questions(&pool).await?
        }
    };

    Ok(Json(PageResponse {
        success: true,
        page: paginate(page, records),
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/questions",
            get(get_questions).post(search_or_create_question),
        )
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(json: &str) -> Result<QuestionsAction, ApiError> {
        QuestionsAction::try_from(serde_json::from_str::<QuestionsBody>(json).unwrap())
    }

    #[test]
    fn search_term_selects_search() {
        match action(r#"{"searchTerm": "title"}"#) {
            Ok(QuestionsAction::Search(term)) => assert_eq!(term, "title"),
            _ => panic!("expected a search"),
        }
    }

    #[test]
    fn empty_search_term_falls_through_to_create() {
        let result = action(
            r#"{"searchTerm": "", "question": "q", "answer": "a", "category": 1, "difficulty": 1}"#,
        );
        assert!(matches!(result, Ok(QuestionsAction::Create(_))));
    }

    #[test]
    fn numeric_strings_are_coerced() {
        match action(r#"{"question": "q", "answer": "a", "category": "4", "difficulty": "1"}"#) {
            Ok(QuestionsAction::Create(new)) => {
                assert_eq!(new.category, 4);
                assert_eq!(new.difficulty, 1);
            }
            _ => panic!("expected a new question"),
        }
    }

    #[test]
    fn missing_fields_are_unprocessable() {
        assert_eq!(
            action(r#"{"question": "q", "answer": "a"}"#).err(),
            Some(ApiError::Unprocessable)
        );
        assert_eq!(
            action(r#"{"question": " ", "answer": "a", "category": 1, "difficulty": 1}"#).err(),
            Some(ApiError::Unprocessable)
        );
        assert_eq!(action("{}").err(), Some(ApiError::Unprocessable));
    }

    #[test]
    fn non_numeric_category_does_not_parse() {
        assert!(serde_json::from_str::<QuestionsBody>(
            r#"{"question": "q", "answer": "a", "category": "four", "difficulty": 1}"#
        )
        .is_err());
    }
}
