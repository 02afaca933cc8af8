//! SurrealDB implementation for movie storage
//!
//! Provides connection management and record operations for
//! the movie catalog in SurrealDB.

use async_trait::async_trait;
use cine_core::{CineError, DatabaseConfig, Movie, MovieFields, Result, SentinelDocument};
use serde::{Deserialize, Serialize};
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use surrealdb::Surreal;

use crate::{SENTINEL_COLLECTION, SENTINEL_KEY};

/// SurrealDB document store implementation
pub struct SurrealDbStore {
    client: Surreal<Client>,
    table: String,
}

impl SurrealDbStore {
    /// Create a new SurrealDB connection
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let endpoint = config.store_endpoint();

        let client = Surreal::new::<Ws>(endpoint.as_str())
            .await
            .map_err(|e| CineError::StoreUnavailable(format!("SurrealDB connection failed: {e}")))?;

        // Emulator instances run unauthenticated
        if config.emulator {
            tracing::info!("SurrealDB in emulator mode ({})", endpoint);
        } else {
            client
                .signin(Root {
                    username: &config.store_user,
                    password: &config.store_pass,
                })
                .await
                .map_err(|e| CineError::StoreUnavailable(format!("SurrealDB auth failed: {e}")))?;
        }

        client
            .use_ns(&config.store_namespace)
            .use_db(&config.store_database)
            .await
            .map_err(|e| {
                CineError::StoreUnavailable(format!("SurrealDB namespace error: {e}"))
            })?;

        Ok(Self {
            client,
            table: config.movies_collection.clone(),
        })
    }
}

/// Movie record for SurrealDB
///
/// The record key is the movie id; `movie_id` repeats it as a plain field
/// so the stored document carries its own id.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MovieRecord {
    #[serde(default, skip_serializing)]
    id: Option<surrealdb::sql::Thing>,
    movie_id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    genre: Option<String>,
    #[serde(default)]
    year: Option<i32>,
}

impl From<&Movie> for MovieRecord {
    fn from(movie: &Movie) -> Self {
        Self {
            id: None,
            movie_id: movie.id.clone(),
            title: movie.fields.title.clone(),
            description: movie.fields.description.clone(),
            genre: movie.fields.genre.clone(),
            year: movie.fields.year,
        }
    }
}

impl From<MovieRecord> for Movie {
    fn from(record: MovieRecord) -> Self {
        Movie {
            id: record.movie_id,
            fields: MovieFields {
                title: record.title,
                description: record.description,
                genre: record.genre,
                year: record.year,
            },
        }
    }
}

#[async_trait]
impl super::DocumentStore for SurrealDbStore {
    async fn list_movies(&self) -> Result<Vec<Movie>> {
        let records: Vec<MovieRecord> = self
            .client
            .select(self.table.as_str())
            .await
            .map_err(|e| CineError::StoreUnavailable(format!("Failed to list movies: {e}")))?;

        Ok(records.into_iter().map(Movie::from).collect())
    }

    async fn create_movie(&self, fields: &MovieFields) -> Result<Movie> {
        let movie = Movie::create(fields.clone());

        let _: Option<MovieRecord> = self
            .client
            .create((self.table.as_str(), movie.id.as_str()))
            .content(MovieRecord::from(&movie))
            .await
            .map_err(|e| CineError::StoreUnavailable(format!("Failed to store movie: {e}")))?;

        tracing::info!(id = %movie.id, title = %movie.fields.title, "Stored movie");
        Ok(movie)
    }

    async fn write_sentinel(
        &self,
        sentinel: &SentinelDocument,
    ) -> Result<Option<SentinelDocument>> {
        let _: Option<SentinelDocument> = self
            .client
            .upsert((SENTINEL_COLLECTION, SENTINEL_KEY))
            .content(sentinel.clone())
            .await
            .map_err(|e| {
                CineError::StoreUnavailable(format!("Failed to write sentinel: {e}"))
            })?;

        self.client
            .select((SENTINEL_COLLECTION, SENTINEL_KEY))
            .await
            .map_err(|e| CineError::StoreUnavailable(format!("Failed to read sentinel: {e}")))
    }

    fn name(&self) -> &str {
        "surrealdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_round_trip_keeps_id() {
        let movie = Movie {
            id: "abc".to_string(),
            fields: MovieFields::new("Heat").with_genre("Crime"),
        };
        let record = MovieRecord::from(&movie);
        assert_eq!(record.movie_id, "abc");

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["movie_id"], "abc");

        assert_eq!(Movie::from(record), movie);
    }
}
