//! Comment repository - database operations for video comments

use crate::models::Comment;
use sqlx::{PgExecutor, Row};
use uuid::Uuid;

/// Create a new comment on a video
pub async fn insert_comment<'e, E>(
    ex: E,
    video_id: Uuid,
    user_id: Uuid,
    text: &str,
) -> Result<Comment, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (video_id, user_id, text)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, video_id, text, created_at, updated_at
        "#,
    )
    .bind(video_id)
    .bind(user_id)
    .bind(text)
    .fetch_one(ex)
    .await
}

/// Get a single comment by ID
pub async fn get_comment<'e, E>(ex: E, comment_id: Uuid) -> Result<Option<Comment>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Comment>(
        "SELECT id, user_id, video_id, text, created_at, updated_at FROM comments WHERE id = $1",
    )
    .bind(comment_id)
    .fetch_optional(ex)
    .await
}

/// Update comment text
pub async fn update_comment<'e, E>(
    ex: E,
    comment_id: Uuid,
    text: &str,
) -> Result<Comment, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Comment>(
        r#"
        UPDATE comments
        SET text = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING id, user_id, video_id, text, created_at, updated_at
        "#,
    )
    .bind(comment_id)
    .bind(text)
    .fetch_one(ex)
    .await
}

/// Delete a comment; returns the number of rows removed.
pub async fn delete_comment<'e, E>(ex: E, comment_id: Uuid) -> Result<u64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(ex)
        .await?;
    Ok(result.rows_affected())
}

/// Remove every comment attached to a video (delete-protocol step).
pub async fn delete_comments_for_video<'e, E>(ex: E, video_id: Uuid) -> Result<u64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM comments WHERE video_id = $1")
        .bind(video_id)
        .execute(ex)
        .await?;
    Ok(result.rows_affected())
}

/// Comments for a video, newest first
pub async fn comments_for_video<'e, E>(
    ex: E,
    video_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<Comment>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Comment>(
        r#"
        SELECT id, user_id, video_id, text, created_at, updated_at
        FROM comments
        WHERE video_id = $1
        ORDER BY created_at DESC, id
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(video_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(ex)
    .await
}

/// Live comment count for a single video
pub async fn count_comments<'e, E>(ex: E, video_id: Uuid) -> Result<i64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let row = sqlx::query("SELECT COUNT(*) AS count FROM comments WHERE video_id = $1")
        .bind(video_id)
        .fetch_one(ex)
        .await?;
    Ok(row.get::<i64, _>("count"))
}

/// Comment counts for multiple videos in one query
pub async fn count_comments_batch<'e, E>(
    ex: E,
    video_ids: &[Uuid],
) -> Result<Vec<(Uuid, i64)>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let rows = sqlx::query(
        r#"
        SELECT video_id, COUNT(*) AS count
        FROM comments
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

/// Count all comments in the catalog
pub async fn count_all_comments<'e, E>(ex: E) -> Result<i64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments")
        .fetch_one(ex)
        .await?;
    Ok(row.0)
}
