//! Index queue repository for PostgreSQL.
//!
//! Expected table (see `migrations/0001_index_queue.sql`):
//!
//! ```sql
//! CREATE TABLE index_queue_item (
//!     id          BIGSERIAL PRIMARY KEY,
//!     site_id     TEXT NOT NULL,
//!     item_type   TEXT NOT NULL,
//!     item_uid    BIGINT NOT NULL,
//!     changed_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     indexed_at  TIMESTAMPTZ,
//!     errors      TEXT
//! );
//! ```

use async_trait::async_trait;
use solradmin_core::error::AppError;
use solradmin_core::models::{QueueItem, Site};
use solradmin_core::traits::QueueStore;
use sqlx::{PgPool, Pool, Postgres};
use tracing::debug;

/// Column list for SELECT queries. Must remain a const literal to ensure SQL safety
/// since format!() bypasses sqlx compile-time validation.
const QUEUE_COLUMNS: &str = "id, site_id, item_type, item_uid, changed_at, indexed_at, errors";

/// Repository for index queue items in PostgreSQL.
///
/// # Examples
///
/// ```no_run
/// use sqlx::postgres::PgPoolOptions;
/// use solradmin_db::QueueRepository;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = PgPoolOptions::new()
///     .max_connections(5)
///     .connect("postgresql://localhost/solradmin")
///     .await?;
///
/// let repo = QueueRepository::new(pool);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct QueueRepository {
    pool: Pool<Postgres>,
}

impl QueueRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists a site's queue items, most recently changed first.
    pub async fn list_items_by_site(
        &self,
        site: &Site,
        limit: usize,
    ) -> Result<Vec<QueueItem>, AppError> {
        let query = format!(
            "SELECT {} FROM index_queue_item WHERE site_id = $1 ORDER BY changed_at DESC LIMIT $2",
            QUEUE_COLUMNS
        );
        let items = sqlx::query_as::<_, QueueItem>(&query)
            .bind(&site.id)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Counts the site's items whose last indexing attempt failed.
    pub async fn count_failed_by_site(&self, site: &Site) -> Result<u64, AppError> {
        let row: CountRow = sqlx::query_as(
            r#"
            SELECT COUNT(*) as total
            FROM index_queue_item
            WHERE site_id = $1 AND errors IS NOT NULL AND errors <> ''
            "#,
        )
        .bind(&site.id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.count())
    }
}

#[async_trait]
impl QueueStore for QueueRepository {
    async fn delete_items_by_site(&self, site: &Site) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM index_queue_item
            WHERE site_id = $1
            "#,
        )
        .bind(&site.id)
        .execute(&self.pool)
        .await?;

        debug!(
            "Deleted {} queue row(s) for site {}",
            result.rows_affected(),
            site.id
        );
        Ok(result.rows_affected())
    }

    async fn count_items_by_site(&self, site: &Site) -> Result<u64, AppError> {
        let row: CountRow = sqlx::query_as(
            r#"
            SELECT COUNT(*) as total
            FROM index_queue_item
            WHERE site_id = $1
            "#,
        )
        .bind(&site.id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.count())
    }
}

/// Helper struct for deserializing count query results
#[derive(sqlx::FromRow)]
struct CountRow {
    total: Option<i64>,
}

impl CountRow {
    fn count(&self) -> u64 {
        self.total.unwrap_or(0).max(0) as u64
    }
}
