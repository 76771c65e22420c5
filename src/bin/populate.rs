//! Populate the anime catalogue from an anime-offline-database dump
//!
//! Usage: `populate [path/to/anime-offline-database.json]`
//!
//! The path falls back to `ANIME_DATA_PATH`. Nothing is loaded when the
//! catalogue already holds anime.

use std::env;
use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use anime_list_api::db::{anime, Database, DbError, RepositoryError};
use anime_list_api::models::NewAnime;

/// Number of anime inserted per transaction
const BATCH_SIZE: usize = 500;

#[derive(Error, Debug)]
enum PopulateError {
    #[error("DATABASE_URL must be set")]
    MissingDatabaseUrl,

    #[error("No data file given; pass a path or set ANIME_DATA_PATH")]
    MissingDataPath,

    #[error("Failed to read {0}: {1}")]
    Read(String, std::io::Error),

    #[error("Failed to parse anime data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Expected a JSON array or an object with a \"data\" array")]
    UnexpectedShape,

    #[error(transparent)]
    Database(#[from] DbError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Extract the entry array from either supported document shape
fn entries(document: Value) -> Result<Vec<Value>, PopulateError> {
    match document {
        Value::Array(entries) => Ok(entries),
        Value::Object(mut object) => match object.remove("data") {
            Some(Value::Array(entries)) => Ok(entries),
            _ => Err(PopulateError::UnexpectedShape),
        },
        _ => Err(PopulateError::UnexpectedShape),
    }
}

/// Convert raw entries, dropping those outside the supported enumerations
fn parse_entries(raw: Vec<Value>) -> (Vec<NewAnime>, usize) {
    let mut skipped = 0;
    let parsed = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<NewAnime>(entry) {
            Ok(anime) => Some(anime),
            Err(e) => {
                warn!("Skipping entry {}: {}", index, e);
                skipped += 1;
                None
            }
        })
        .collect();
    (parsed, skipped)
}

async fn run() -> Result<(), PopulateError> {
    dotenvy::dotenv().ok();

    let path = env::args()
        .nth(1)
        .or_else(|| env::var("ANIME_DATA_PATH").ok())
        .map(PathBuf::from)
        .ok_or(PopulateError::MissingDataPath)?;
    let database_url = env::var("DATABASE_URL").map_err(|_| PopulateError::MissingDatabaseUrl)?;

    let db = Database::new(&database_url).await?;
    db.run_migrations().await?;

    let existing = anime::count_anime(db.pool()).await?;
    if existing > 0 {
        info!("Catalogue already holds {} anime, nothing to do", existing);
        db.close().await;
        return Ok(());
    }

    info!("Reading {}", path.display());
    let contents = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| PopulateError::Read(path.display().to_string(), e))?;
    let (parsed, skipped) = parse_entries(entries(serde_json::from_str(&contents)?)?);

    let mut inserted = 0;
    for batch in parsed.chunks(BATCH_SIZE) {
        inserted += anime::insert_anime_batch(db.pool(), batch).await?;
        info!("Inserted {} / {} anime", inserted, parsed.len());
    }

    info!("Populated {} anime, skipped {}", inserted, skipped);
    db.close().await;
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!("Populate failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(anime_type: &str) -> Value {
        json!({
            "title": "Cowboy Bebop",
            "type": anime_type,
            "episodes": 26,
            "status": "FINISHED",
            "animeSeason": {"season": "SPRING", "year": 1998},
            "synonyms": [],
            "relatedAnime": [],
            "tags": ["space"]
        })
    }

    #[test]
    fn test_entries_accepts_bare_array() {
        let raw = entries(json!([entry("TV")])).unwrap();
        assert_eq!(raw.len(), 1);
    }

    #[test]
    fn test_entries_accepts_data_object() {
        let raw = entries(json!({"license": {}, "data": [entry("TV"), entry("MOVIE")]})).unwrap();
        assert_eq!(raw.len(), 2);
    }

    #[test]
    fn test_entries_rejects_other_shapes() {
        assert!(matches!(
            entries(json!({"anime": []})),
            Err(PopulateError::UnexpectedShape)
        ));
        assert!(matches!(entries(json!(42)), Err(PopulateError::UnexpectedShape)));
    }

    #[test]
    fn test_parse_entries_skips_unknown_enumerations() {
        let mut undefined_season = entry("TV");
        undefined_season["animeSeason"]["season"] = json!("UNDEFINED");

        let (parsed, skipped) =
            parse_entries(vec![entry("TV"), entry("UNKNOWN"), undefined_season]);
        assert_eq!(parsed.len(), 1);
        assert_eq!(skipped, 2);
    }
}
