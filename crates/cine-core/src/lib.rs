//! Cine Core - Domain models, errors, and shared types
//!
//! This crate defines the types shared by every Cine crate:
//! - Movie records and the fields supplied when adding one
//! - Vector-side documents and scored matches
//! - The error taxonomy used across service boundaries
//! - Configuration management

pub mod config;

pub use config::{
    AppConfig, ConfigError, DatabaseConfig, EmbeddingConfig, EmbeddingProvider, LoggingConfig,
    ServerConfig, StoreBackend, VectorBackend,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for Cine operations
#[derive(Error, Debug)]
pub enum CineError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Document store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Vector index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    #[error("Vector dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CineError {
    /// Stable machine-readable code for this error kind
    pub fn code(&self) -> &'static str {
        match self {
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::IndexUnavailable(_) => "INDEX_UNAVAILABLE",
            Self::EmbeddingError(_) => "EMBEDDING_ERROR",
            Self::DimensionMismatch { .. } => "DIMENSION_MISMATCH",
            Self::NotFound(_) => "NOT_FOUND",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::Other(_) => "INTERNAL_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, CineError>;

// ============================================================================
// Movie Models
// ============================================================================

/// Fields supplied by the caller when adding a movie
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MovieFields {
    /// Movie title (required)
    #[schema(example = "Inception")]
    pub title: String,

    /// Free-text synopsis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "A thief who steals secrets via dreams")]
    pub description: Option<String>,

    /// Genre label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Sci-Fi")]
    pub genre: Option<String>,

    /// Release year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 2010)]
    pub year: Option<i32>,
}

impl MovieFields {
    /// Create fields with only a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set genre
    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    /// Set release year
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Whether the title is present once surrounding whitespace is ignored
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

/// A movie record as persisted in the document store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Movie {
    /// Identifier generated at creation
    #[schema(example = "6f1c2a0e-3b7d-4c55-9a8e-2f0d4b1e7c93")]
    pub id: String,

    #[serde(flatten)]
    pub fields: MovieFields,
}

impl Movie {
    /// Create a record with a freshly generated identifier
    pub fn create(fields: MovieFields) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            fields,
        }
    }

    pub fn title(&self) -> &str {
        &self.fields.title
    }
}

// ============================================================================
// Vector-side Models
// ============================================================================

/// Metadata stored next to each vector so a match resolves back to a movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchMetadata {
    pub id: String,
    pub title: String,
}

/// A movie's embedded representation in the vector index
#[derive(Debug, Clone)]
pub struct IndexedDocument {
    /// Same identifier as the movie record
    pub id: String,
    /// Synthetic text the vector was computed from
    pub text: String,
    pub vector: Vec<f32>,
    pub metadata: MatchMetadata,
}

/// A raw nearest-neighbour hit as returned by a vector index
#[derive(Debug, Clone, PartialEq)]
pub struct RawMatch {
    /// Movie id from the stored metadata, if any
    pub id: Option<String>,
    /// Movie title from the stored metadata, if any
    pub title: Option<String>,
    /// Distance to the query (lower is more similar)
    pub distance: f32,
}

/// A recommendation with a similarity score in [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScoredMatch {
    #[schema(example = "6f1c2a0e-3b7d-4c55-9a8e-2f0d4b1e7c93")]
    pub id: String,

    #[schema(example = "Inception")]
    pub title: String,

    #[schema(example = 0.82)]
    pub similarity: f32,
}

// ============================================================================
// Operation Results
// ============================================================================

/// The movie was catalogued but could not be indexed for similarity search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PartialWriteWarning {
    #[schema(example = "Added to catalog but indexing failed: connection refused")]
    pub message: String,
}

impl PartialWriteWarning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for PartialWriteWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of a successful add
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddedMovie {
    pub id: String,
    pub movie: Movie,
    /// Present when the record is stored but not discoverable by similarity
    pub warning: Option<PartialWriteWarning>,
}

impl AddedMovie {
    pub fn is_indexed(&self) -> bool {
        self.warning.is_none()
    }
}

/// Sentinel document written by the connectivity probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SentinelDocument {
    #[schema(example = "Connection successful")]
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl SentinelDocument {
    pub fn now() -> Self {
        Self {
            message: "Connection successful".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Result of a successful store probe
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoreHealth {
    #[schema(example = "Document store connection successful")]
    pub message: String,
    /// Sentinel document as read back from the store
    pub data: Option<SentinelDocument>,
}

/// Reachability summary shown on the status page
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SystemStatus {
    pub store_connected: bool,
    /// Probe failure message when the store is not reachable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_error: Option<String>,
    pub index_available: bool,
}

// ============================================================================
// Tests
// ============================================================================
