use std::collections::BTreeMap;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories, questions},
        Category, Question,
    },
    server::{
        app::AppState,
        error::ApiError,
        extractors::{IdPath, PageNumber},
        pagination::{paginate, Page},
    },
};

use super::ApiResponse;

/// Categories keyed by id, the shape clients use to label questions.
pub(super) fn category_map(categories: Vec<Category>) -> BTreeMap<i64, String> {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}

#[derive(Serialize)]
struct CategoriesResponse {
    success: bool,
    categories: BTreeMap<i64, String>,
}

#[derive(Serialize)]
struct CategoryQuestionsResponse {
    success: bool,
    #[serde(flatten)]
    page: Page<Question>,
    categories: BTreeMap<i64, String>,
    current_category: String,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<Json<CategoriesResponse>> {
    let categories = categories::get_all_categories(&pool).await?;
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(CategoriesResponse {
        success: true,
        categories: category_map(categories),
    }))
}

async fn get_category_questions(
    State(pool): State<SqlitePool>,
    IdPath(id): IdPath,
    PageNumber(page): PageNumber,
) -> ApiResponse<Json<CategoryQuestionsResponse>> {
    let selected = categories::get_category(&pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let questions = questions::get_questions_for_category(&pool, selected.id).await?;
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }

    let all_categories = categories::get_all_categories(&pool).await?;
    Ok(Json(CategoryQuestionsResponse {
        success: true,
        page: paginate(page, questions),
        categories: category_map(all_categories),
        current_category: selected.kind,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(get_category_questions))
        .with_state(state)
}
