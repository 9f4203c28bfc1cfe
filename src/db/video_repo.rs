//! Video repository - database operations for video rows

use crate::models::{NewVideo, Video, VideoChanges, VideoFilter, VideoWithCategory};
use sqlx::PgExecutor;
use uuid::Uuid;

const VIDEO_COLUMNS: &str = "id, title, description, category_id, media_id, media_url, \
     thumbnail_url, view_count, created_at, updated_at";

/// Insert a published video row. The media reference is always present here;
/// the orchestrator never persists a provisioning video.
pub async fn insert_video<'e, E>(ex: E, video: &NewVideo) -> Result<Video, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Video>(&format!(
        r#"
        INSERT INTO videos (title, description, category_id, media_id, media_url, thumbnail_url)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {VIDEO_COLUMNS}
        "#
    ))
    .bind(&video.title)
    .bind(&video.description)
    .bind(video.category_id)
    .bind(&video.media_id)
    .bind(&video.media_url)
    .bind(&video.thumbnail_url)
    .fetch_one(ex)
    .await
}

/// Fetch a video by ID
pub async fn get_video<'e, E>(ex: E, video_id: Uuid) -> Result<Option<Video>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Video>(&format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1"))
        .bind(video_id)
        .fetch_optional(ex)
        .await
}

/// Apply a partial update; unset fields keep their current value.
pub async fn update_video<'e, E>(
    ex: E,
    video_id: Uuid,
    changes: &VideoChanges,
) -> Result<Video, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, Video>(&format!(
        r#"
        UPDATE videos
        SET title = COALESCE($2, title),
            category_id = COALESCE($3, category_id),
            thumbnail_url = COALESCE($4, thumbnail_url),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {VIDEO_COLUMNS}
        "#
    ))
    .bind(video_id)
    .bind(&changes.title)
    .bind(changes.category_id)
    .bind(&changes.thumbnail_url)
    .fetch_one(ex)
    .await
}

/// Delete the video row; returns the number of rows removed.
pub async fn delete_video<'e, E>(ex: E, video_id: Uuid) -> Result<u64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let result = sqlx::query("DELETE FROM videos WHERE id = $1")
        .bind(video_id)
        .execute(ex)
        .await?;
    Ok(result.rows_affected())
}

/// Atomically bump the view counter; returns the new count if the row exists.
pub async fn record_view<'e, E>(ex: E, video_id: Uuid) -> Result<Option<i64>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let row: Option<(i64,)> = sqlx::query_as(
        "UPDATE videos SET view_count = view_count + 1 WHERE id = $1 RETURNING view_count",
    )
    .bind(video_id)
    .fetch_optional(ex)
    .await?;
    Ok(row.map(|r| r.0))
}

/// Published videos joined with category names, filtered and paginated.
/// Engagement counts are read separately in a batch (see db::PgCatalog).
pub async fn list_videos<'e, E>(
    ex: E,
    filter: &VideoFilter,
) -> Result<Vec<VideoWithCategory>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, VideoWithCategory>(
        r#"
        SELECT v.id, v.title, v.description, v.media_url, v.thumbnail_url,
               c.name AS category, v.view_count, v.created_at
        FROM videos v
        LEFT JOIN categories c ON c.id = v.category_id
        WHERE v.media_id IS NOT NULL
          AND ($1::text IS NULL OR v.title ILIKE '%' || $1 || '%')
          AND ($2::uuid IS NULL OR v.category_id = $2)
        ORDER BY v.created_at DESC, v.id
        OFFSET $3 LIMIT $4
        "#,
    )
    .bind(&filter.query)
    .bind(filter.category_id)
    .bind(filter.offset)
    .bind(filter.limit)
    .fetch_all(ex)
    .await
}

/// Title autocomplete over published videos.
pub async fn suggest_titles<'e, E>(
    ex: E,
    prefix: &str,
    limit: i64,
) -> Result<Vec<String>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let rows: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT DISTINCT title FROM videos
        WHERE media_id IS NOT NULL AND title ILIKE $1 || '%'
        ORDER BY title
        LIMIT $2
        "#,
    )
    .bind(prefix)
    .bind(limit)
    .fetch_all(ex)
    .await?;
    Ok(rows.into_iter().map(|r| r.0).collect())
}

/// Count all published videos
pub async fn count_videos<'e, E>(ex: E) -> Result<i64, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM videos WHERE media_id IS NOT NULL")
        .fetch_one(ex)
        .await?;
    Ok(row.0)
}
