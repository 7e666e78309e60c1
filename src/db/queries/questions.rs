use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db::DbResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub question: String,
    pub answer: String,
    pub category: i64,
    pub difficulty: i64,
}

const SELECT_QUESTIONS: &str = "SELECT id, question, answer, category, difficulty FROM questions";

pub async fn get_all_questions(pool: &SqlitePool) -> DbResult<Vec<Question>> {
    let questions = sqlx::query_as::<_, Question>(&format!("{SELECT_QUESTIONS} ORDER BY id"))
        .fetch_all(pool)
        .await?;
    Ok(questions)
}

pub async fn get_question(pool: &SqlitePool, id: i64) -> DbResult<Option<Question>> {
    let question =
        sqlx::query_as::<_, Question>(&format!("{SELECT_QUESTIONS} WHERE questions.id = ?1"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(question)
}

/// Case-insensitive substring match over the question text.
///
/// Matching is done on Unicode-lowercased text, so the term is taken
/// literally and `%`/`_` carry no wildcard meaning.
pub async fn search_questions(pool: &SqlitePool, term: &str) -> DbResult<Vec<Question>> {
    let term = term.to_lowercase();
    let questions = get_all_questions(pool)
        .await?
        .into_iter()
        .filter(|q| q.question.to_lowercase().contains(&term))
        .collect();
    Ok(questions)
}

pub async fn get_questions_for_category(
    pool: &SqlitePool,
    category_id: i64,
) -> DbResult<Vec<Question>> {
    let questions = sqlx::query_as::<_, Question>(&format!(
        "{SELECT_QUESTIONS} WHERE questions.category = ?1 ORDER BY id"
    ))
    .bind(category_id)
    .fetch_all(pool)
    .await?;
    Ok(questions)
}

/// Questions a quiz may still ask: those in `category` (any category when
/// `None`) whose id is not in `exclude`.
pub async fn get_quiz_candidates(
    pool: &SqlitePool,
    category: Option<i64>,
    exclude: &[i64],
) -> DbResult<Vec<Question>> {
    // exclusions are applied here rather than bound into the query, the list
    // can outgrow SQLite's parameter limit
    let exclude: HashSet<i64> = exclude.iter().copied().collect();
    let questions = match category {
        Some(category_id) => get_questions_for_category(pool, category_id).await?,
        None => get_all_questions(pool).await?,
    };
    Ok(questions
        .into_iter()
        .filter(|q| !exclude.contains(&q.id))
        .collect())
}

pub async fn create_question(pool: &SqlitePool, new: &NewQuestion) -> DbResult<i64> {
    let id = sqlx::query(
        r#"
INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(&new.question)
    .bind(&new.answer)
    .bind(new.category)
    .bind(new.difficulty)
    .execute(pool)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Returns `false` when no question had this id.
pub async fn delete_question(pool: &SqlitePool, id: i64) -> DbResult<bool> {
    let affected = sqlx::query(
        r#"
DELETE FROM questions WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(affected > 0)
}

pub async fn import_questions(pool: &SqlitePool, questions: Vec<Question>) -> DbResult<()> {
    let mut tx = pool.begin().await?;
    for question in questions {
        sqlx::query(
            r#"
INSERT INTO questions (id, question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT (id) DO UPDATE SET
    question = excluded.question,
    answer = excluded.answer,
    category = excluded.category,
    difficulty = excluded.difficulty
            "#,
        )
        .bind(question.id)
        .bind(&question.question)
        .bind(&question.answer)
        .bind(question.category)
        .bind(question.difficulty)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(())
}
