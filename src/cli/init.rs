use crate::core::db::migrated_db;
use anyhow::Result;

pub async fn run(db_path: &str) -> Result<()> {
    println!("Initializing db...");
    migrated_db(db_path).await?;
    println!("Finished initializing db at {}", db_path);
    Ok(())
}
