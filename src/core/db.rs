use anyhow::{Context, Result};
use tokio_rusqlite::Connection;

/// Open the sqlite database stored under `db_dir`.
pub async fn async_db(db_dir: &str) -> Result<Connection> {
    std::fs::create_dir_all(db_dir)
        .with_context(|| format!("Failed to create db directory {}", db_dir))?;
    let db_path = format!("{}/webnotify.sqlite", db_dir);
    let db = Connection::open(db_path).await?;
    Ok(db)
}

pub fn initialize_db(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS push_subscription (
             endpoint TEXT PRIMARY KEY,
             p256dh TEXT NOT NULL,
             auth TEXT NOT NULL
         );",
    )
}

/// Open the database and make sure the schema exists.
pub async fn migrated_db(db_dir: &str) -> Result<Connection> {
    let db = async_db(db_dir).await?;
    db.call(|conn| {
        initialize_db(conn)?;
        Ok(())
    })
    .await?;
    Ok(db)
}
