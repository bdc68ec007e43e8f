use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str, scrape_workers: usize) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let max_connections = pool_size(scrape_workers);
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established ({max_connections} connections)");
    Ok(pool)
}

/// Every scrape worker can hold a connection while inserting, with two spare.
fn pool_size(scrape_workers: usize) -> u32 {
    u32::try_from(scrape_workers)
        .unwrap_or(u32::MAX)
        .saturating_add(2)
        .max(5)
}
