/// Distinct category values across the content record tables.
use {anyhow::Result, async_trait::async_trait, tracing::debug};

use crate::schema::CATEGORY_TABLES;

/// Source of raw `category` values already in use.
///
/// Values are returned as stored; composite `"A, B"` values are split by
/// the caller.
#[async_trait]
pub trait CategorySource: Send + Sync {
    async fn distinct_categories(&self) -> Result<Vec<String>>;
}

/// SQLite-backed category aggregation.
pub struct SqliteCategorySource {
    pool: sqlx::SqlitePool,
}

impl SqliteCategorySource {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self { pool }
    }
}

fn distinct_query() -> String {
    CATEGORY_TABLES
        .iter()
        .map(|table| {
            format!("SELECT category FROM {table} WHERE category IS NOT NULL AND TRIM(category) != ''")
        })
        .collect::<Vec<_>>()
        .join(" UNION ")
}

#[async_trait]
impl CategorySource for SqliteCategorySource {
    async fn distinct_categories(&self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(&distinct_query())
            .fetch_all(&self.pool)
            .await?;
        debug!(count = rows.len(), "loaded distinct categories");
        Ok(rows.into_iter().map(|(c,)| c).collect())
    }
}
