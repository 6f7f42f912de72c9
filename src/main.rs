use anyhow::Result;
use webnotify::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
