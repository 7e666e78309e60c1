use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::db::DbResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
}

pub async fn get_all_categories(pool: &SqlitePool) -> DbResult<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>(
        r#"
SELECT id, type
FROM categories
ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

pub async fn get_category(pool: &SqlitePool, id: i64) -> DbResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(
        r#"
SELECT id, type
FROM categories
WHERE categories.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(category)
}

pub async fn import_categories(pool: &SqlitePool, categories: Vec<Category>) -> DbResult<()> {
    let mut tx = pool.begin().await?;
    for category in categories {
        sqlx::query(
            r#"
INSERT INTO categories (id, type) VALUES (?1, ?2)
ON CONFLICT (id) DO UPDATE SET type = excluded.type
            "#,
        )
        .bind(category.id)
        .bind(&category.kind)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{establish_in_memory, run_migrations};

    async fn pool() -> SqlitePool {
        let pool = establish_in_memory().await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn point_lookup() {
        let pool = pool().await;
        let category = get_category(&pool, 3).await.unwrap().unwrap();
        assert_eq!(category.kind, "Geography");
        assert!(get_category(&pool, 1000).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn import_overwrites_existing_ids() {
        let pool = pool().await;
        import_categories(
            &pool,
            vec![
                Category {
                    id: 1,
                    kind: "Physics".into(),
                },
                Category {
                    id: 42,
                    kind: "Music".into(),
                },
            ],
        )
        .await
        .unwrap();

        assert_eq!(get_category(&pool, 1).await.unwrap().unwrap().kind, "Physics");
        assert_eq!(get_category(&pool, 42).await.unwrap().unwrap().kind, "Music");
        assert_eq!(get_all_categories(&pool).await.unwrap().len(), 7);
    }

    #[test]
    fn serializes_kind_as_type() {
        let category = Category {
            id: 2,
            kind: "Art".into(),
        };
        let value = serde_json::to_value(&category).unwrap();
        assert_eq!(value, serde_json::json!({"id": 2, "type": "Art"}));
    }
}
