use migration::{Migrator, MigratorTrait};
use server::{ServerOptions, UploadStore};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "staffbook={level},server={level},engine={level},report={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.server.database).await?;
    let engine = engine::Engine::builder()
        .database(db)
        .session_ttl(settings.server.session_ttl()?)
        .build()
        .await?;

    let purged = engine.purge_expired_sessions().await?;
    if purged > 0 {
        tracing::info!("purged {purged} expired sessions");
    }

    let options = ServerOptions {
        branding: settings.report.into(),
        uploads: UploadStore::new(&settings.uploads.dir, &settings.uploads.public_url),
        secure_cookies: settings.server.secure_cookies,
    };
    tracing::info!("uploads are stored in {}", options.uploads.dir().display());

    let bind = settings
        .server
        .bind
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    server::run_with_listener(engine, options, listener).await?;

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
