use anyhow::Result;

/// Record tables that carry a free-form `category` column.
pub const CATEGORY_TABLES: &[&str] = &["galleries", "gallery_images", "portfolio_items"];

/// Create the tables the engine reads if they don't exist.
///
/// The content application owns these tables; this is for fresh databases
/// and tests.
pub async fn init(pool: &sqlx::SqlitePool) -> Result<()> {
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS galleries (
            id       INTEGER PRIMARY KEY AUTOINCREMENT,
            title    TEXT NOT NULL,
            category TEXT
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS gallery_images (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            gallery_id INTEGER REFERENCES galleries(id) ON DELETE CASCADE,
            url        TEXT NOT NULL,
            category   TEXT
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS portfolio_items (
            id       INTEGER PRIMARY KEY AUTOINCREMENT,
            title    TEXT NOT NULL,
            category TEXT
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS settings (
            key   TEXT PRIMARY KEY,
            value TEXT
        )"#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
