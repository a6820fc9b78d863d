use std::sync::Arc;

use engine::StaticCatalog;
use migration::{Migrator, MigratorTrait};

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "commitments={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let catalog = StaticCatalog::from_path(&settings.catalog.path)?;

    let db = match &settings.database.url {
        Some(url) => {
            tracing::info!("Found database settings...");
            Some(connect_database(url).await?)
        }
        None => {
            tracing::warn!("database url is not set, evaluations will be unavailable");
            None
        }
    };

    let state = server::ServerState::new(Arc::new(catalog), db);
    let listener = tokio::net::TcpListener::bind(settings.server_addr()).await?;
    server::run_with_listener(state, listener).await?;

    Ok(())
}

async fn connect_database(
    url: &str,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
