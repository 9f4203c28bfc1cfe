//! Like repository - database operations for the (user, video) like pairs
//!
//! Uniqueness is enforced by the `likes_user_video_unique` constraint, not by
//! an application-level check; concurrent inserts for the same pair surface
//! as unique violations.

use crate::models::Like;
use sqlx::{PgExecutor, Row};
use uuid::Uuid;

/// Insert a like. A duplicate pair fails with a unique violation.
pub async fn insert_like<'e, E>(
    ex: E,
    video_id: Uuid,
    user_id: Uuid,
) -> Result<Like, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Like>(
        r#"
        INSERT INTO likes (video_id, user_id)
        VALUES ($1, $2)
        RETURNING id, user_id, video_id, created_at
        "#,
    )
    .bind(video_id)
    .bind(user_id)
    .fetch_one(ex)
    .await
}

/// Remove a like; returns the number of rows removed.
pub async fn delete_like<'e, E>(ex: E, video_id: Uuid, user_id: Uuid) -> Result<u64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM likes WHERE video_id = $1 AND user_id = $2")
        .bind(video_id)
        .bind(user_id)
        .execute(ex)
        .await?;
    Ok(result.rows_affected())
}

/// Remove every like attached to a video (delete-protocol step).
pub async fn delete_likes_for_video<'e, E>(ex: E, video_id: Uuid) -> Result<u64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM likes WHERE video_id = $1")
        .bind(video_id)
        .execute(ex)
        .await?;
    Ok(result.rows_affected())
}

/// Live like count for a single video
pub async fn count_likes<'e, E>(ex: E, video_id: Uuid) -> Result<i64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query("SELECT COUNT(*) AS count FROM likes WHERE video_id = $1")
        .bind(video_id)
        .fetch_one(ex)
        .await?;
    Ok(row.get::<i64, _>("count"))
}

/// Like counts for multiple videos in one query
pub async fn count_likes_batch<'e, E>(
    ex: E,
    video_ids: &[Uuid],
) -> Result<Vec<(Uuid, i64)>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let rows = sqlx::query(
        r#"
        SELECT video_id, COUNT(*) AS count
        FROM likes
        WHERE video_id = ANY($1)
        GROUP BY video_id
        "#,
    )
    .bind(video_ids)
    .fetch_all(ex)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| (row.get("video_id"), row.get("count")))
        .collect())
}

/// Count all likes in the catalog
pub async fn count_all_likes<'e, E>(ex: E) -> Result<i64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM likes").fetch_one(ex).await?;
    Ok(row.0)
}
