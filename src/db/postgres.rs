use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::{
    db::CatalogStore,
    error::{AppError, AppResult},
    models::{Category, MediaType, Video, WatchStatus, WatchlistItem},
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Maps a unique-key violation to `Conflict`, passing other errors through
fn conflict_on_unique(err: sqlx::Error, message: String) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(message)
        }
        _ => AppError::Database(err),
    }
}

/// TMDB IDs are stored in a BIGINT column
fn tmdb_id_to_db(tmdb_id: u64) -> AppResult<i64> {
    i64::try_from(tmdb_id)
        .map_err(|_| AppError::InvalidInput(format!("tmdb_id {} is out of range", tmdb_id)))
}

fn tmdb_id_from_db(tmdb_id: i64) -> AppResult<u64> {
    u64::try_from(tmdb_id)
        .map_err(|_| AppError::Internal(format!("stored tmdb_id {} is negative", tmdb_id)))
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    slug: String,
    name: String,
    created_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            slug: row.slug,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct VideoRow {
    id: Uuid,
    title: String,
    url: String,
    description: String,
    category: String,
    favorite: bool,
    thumbnail: String,
    video_id: Option<String>,
    duration: String,
    channel_title: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<VideoRow> for Video {
    fn from(row: VideoRow) -> Self {
        Video {
            id: row.id,
            title: row.title,
            url: row.url,
            description: row.description,
            category: row.category,
            favorite: row.favorite,
            thumbnail: row.thumbnail,
            video_id: row.video_id,
            duration: row.duration,
            channel_title: row.channel_title,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct WatchlistRow {
    id: Uuid,
    tmdb_id: i64,
    media_type: String,
    title: String,
    original_title: Option<String>,
    overview: Option<String>,
    poster_url: Option<String>,
    release_year: Option<i32>,
    genres: Vec<String>,
    status: String,
    rating: Option<f32>,
    favorite: bool,
    notes: Option<String>,
    added_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<WatchlistRow> for WatchlistItem {
    type Error = AppError;

    fn try_from(row: WatchlistRow) -> Result<Self, Self::Error> {
        let media_type: MediaType = row.media_type.parse().map_err(AppError::Internal)?;
        let status: WatchStatus = row.status.parse().map_err(AppError::Internal)?;

        Ok(WatchlistItem {
            id: row.id,
            tmdb_id: tmdb_id_from_db(row.tmdb_id)?,
            media_type,
            title: row.title,
            original_title: row.original_title,
            overview: row.overview,
            poster_url: row.poster_url,
            release_year: row.release_year,
            genres: row.genres,
            status,
            rating: row.rating,
            favorite: row.favorite,
            notes: row.notes,
            added_at: row.added_at,
            updated_at: row.updated_at,
        })
    }
}

const VIDEO_COLUMNS: &str = "id, title, url, description, category, favorite, thumbnail, \
     video_id, duration, channel_title, created_at, updated_at";

const WATCHLIST_COLUMNS: &str = "id, tmdb_id, media_type, title, original_title, overview, \
     poster_url, release_year, genres, status, rating, favorite, notes, added_at, updated_at";

/// Catalog store backed by PostgreSQL
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Wraps the pool and applies pending migrations
    pub async fn new(pool: PgPool) -> AppResult<Self> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
        Ok(Self { pool })
    }
}

#[async_trait::async_trait]
impl CatalogStore for PostgresStore {
    async fn list_videos(&self) -> AppResult<Vec<Video>> {
        let rows = sqlx::query_as::<_, VideoRow>(&format!(
            "SELECT {} FROM videos ORDER BY created_at, id",
            VIDEO_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Video::from).collect())
    }

    async fn get_video(&self, id: Uuid) -> AppResult<Option<Video>> {
        let row = sqlx::query_as::<_, VideoRow>(&format!(
            "SELECT {} FROM videos WHERE id = $1",
            VIDEO_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Video::from))
    }

    async fn insert_video(&self, video: &Video) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO videos (id, title, url, description, category, favorite, thumbnail,
                                video_id, duration, channel_title, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(video.id)
        .bind(&video.title)
        .bind(&video.url)
        .bind(&video.description)
        .bind(&video.category)
        .bind(video.favorite)
        .bind(&video.thumbnail)
        .bind(&video.video_id)
        .bind(&video.duration)
        .bind(&video.channel_title)
        .bind(video.created_at)
        .bind(video.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_video(&self, video: &Video) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE videos
            SET title = $2, url = $3, description = $4, category = $5, favorite = $6,
                thumbnail = $7, video_id = $8, duration = $9, channel_title = $10,
                updated_at = $11
            WHERE id = $1
            "#,
        )
        .bind(video.id)
        .bind(&video.title)
        .bind(&video.url)
        .bind(&video.description)
        .bind(&video.category)
        .bind(video.favorite)
        .bind(&video.thumbnail)
        .bind(&video.video_id)
        .bind(&video.duration)
        .bind(&video.channel_title)
        .bind(video.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_video(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn reassign_category(&self, from: &str, to: &str) -> AppResult<u64> {
        let result =
            sqlx::query("UPDATE videos SET category = $2, updated_at = now() WHERE category = $1")
                .bind(from)
                .bind(to)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }

    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, slug, name, created_at FROM categories ORDER BY position",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn insert_category(&self, category: &Category) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO categories (id, slug, name, created_at, position)
            VALUES ($1, $2, $3, $4, (SELECT COALESCE(MAX(position), 0) + 1 FROM categories))
            "#,
        )
        .bind(category.id)
        .bind(&category.slug)
        .bind(&category.name)
        .bind(category.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            conflict_on_unique(e, format!("category '{}' already exists", category.slug))
        })?;

        Ok(())
    }

    async fn delete_category(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear_categories(&self) -> AppResult<()> {
        sqlx::query("DELETE FROM categories")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_watchlist(&self) -> AppResult<Vec<WatchlistItem>> {
        let rows = sqlx::query_as::<_, WatchlistRow>(&format!(
            "SELECT {} FROM watchlist ORDER BY added_at, id",
            WATCHLIST_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(WatchlistItem::try_from).collect()
    }

    async fn get_watchlist_item(&self, id: Uuid) -> AppResult<Option<WatchlistItem>> {
        let row = sqlx::query_as::<_, WatchlistRow>(&format!(
            "SELECT {} FROM watchlist WHERE id = $1",
            WATCHLIST_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(WatchlistItem::try_from).transpose()
    }

    async fn insert_watchlist_item(&self, item: &WatchlistItem) -> AppResult<()> {
        let tmdb_id = tmdb_id_to_db(item.tmdb_id)?;

        sqlx::query(
            r#"
            INSERT INTO watchlist (id, tmdb_id, media_type, title, original_title, overview,
                                   poster_url, release_year, genres, status, rating, favorite,
                                   notes, added_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(item.id)
        .bind(tmdb_id)
        .bind(item.media_type.as_str())
        .bind(&item.title)
        .bind(&item.original_title)
        .bind(&item.overview)
        .bind(&item.poster_url)
        .bind(item.release_year)
        .bind(&item.genres)
        .bind(item.status.as_str())
        .bind(item.rating)
        .bind(item.favorite)
        .bind(&item.notes)
        .bind(item.added_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            conflict_on_unique(
                e,
                format!(
                    "{} {} is already on the watchlist",
                    item.media_type, item.tmdb_id
                ),
            )
        })?;

        Ok(())
    }

    async fn update_watchlist_item(&self, item: &WatchlistItem) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE watchlist
            SET status = $2, rating = $3, favorite = $4, notes = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(item.id)
        .bind(item.status.as_str())
        .bind(item.rating)
        .bind(item.favorite)
        .bind(&item.notes)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_watchlist_item(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM watchlist WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tmdb_id_conversion_rejects_out_of_range() {
        assert_eq!(tmdb_id_to_db(603).unwrap(), 603);
        assert!(matches!(
            tmdb_id_to_db(u64::MAX),
            Err(AppError::InvalidInput(_))
        ));

        assert_eq!(tmdb_id_from_db(1396).unwrap(), 1396);
        assert!(matches!(tmdb_id_from_db(-1), Err(AppError::Internal(_))));
    }
}
