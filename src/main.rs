//! FitSense
//!
//! An MCP server for diet, workout, and calorie burn recommendations.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing::info;
use tracing_subscriber::EnvFilter;

use fitsense::build_info;
use fitsense::config::Config;
use fitsense::db;
use fitsense::mcp::FitSenseService;
use fitsense::recommend::RecommendationEngine;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Output to stderr to not interfere with MCP stdio
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("fitsense=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    let ai_backend = config
        .ai_enabled()
        .then(|| format!("gemini ({})", config.gemini_model));

    build_info::print_startup_banner(ai_backend.as_deref());
    eprintln!("Starting MCP server on stdio...");

    let db_path = config.database_path.clone();
    eprintln!("Database path: {}", db_path.display());

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    eprintln!("Initializing database...");
    let database = db::Database::new(&db_path)?;

    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        eprintln!("Database schema version: {}", version);
        Ok(())
    })?;

    let engine = RecommendationEngine::from_config(&config);
    if ai_backend.is_none() {
        info!("GEMINI_API_KEY not set, using rule-based recommendations only");
    }

    let service = FitSenseService::new(database, engine, ai_backend);

    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
