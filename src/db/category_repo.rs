//! Category repository
//!
//! Category CRUD proper belongs to the admin surface; the lifecycle
//! orchestrator only needs existence checks and dashboard counts.

use crate::models::Category;
use sqlx::PgExecutor;
use uuid::Uuid;

/// Fetch a category by ID
pub async fn get_category<'e, E>(ex: E, category_id: Uuid) -> Result<Option<Category>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = $1")
        .bind(category_id)
        .fetch_optional(ex)
        .await
}

/// Count all categories
pub async fn count_categories<'e, E>(ex: E) -> Result<i64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
        .fetch_one(ex)
        .await?;
    Ok(row.0)
}
