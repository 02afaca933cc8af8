//! Cine Configuration Management
//!
//! Handles configuration from environment variables and TOML config files
//! with sensible defaults for local development.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Document store and vector index connections
    pub database: DatabaseConfig,

    /// Embedding provider configuration
    pub embedding: EmbeddingConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_override()
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Apply environment variables on top of this config (env takes precedence)
    pub fn with_env_override(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server
        if let Some(host) = lookup("API_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("API_PORT") {
            self.server.port = parse_value("API_PORT", port)?;
        }
        if let Some(origins) = lookup("CORS_ORIGINS") {
            self.server.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Document store
        let db = &mut self.database;
        if let Some(backend) = lookup("STORE_BACKEND") {
            db.store_backend = backend.parse()?;
        }
        if let Some(host) = lookup("STORE_HOST") {
            db.store_host = host;
        }
        if let Some(port) = lookup("STORE_PORT") {
            db.store_port = parse_value("STORE_PORT", port)?;
        }
        if let Some(user) = lookup("STORE_USER") {
            db.store_user = user;
        }
        if let Some(pass) = lookup("STORE_PASS") {
            db.store_pass = pass;
        }
        if let Some(endpoint) = lookup("STORE_EMULATOR_HOST") {
            let (host, port) = split_host_port("STORE_EMULATOR_HOST", &endpoint)?;
            db.store_host = host;
            if let Some(port) = port {
                db.store_port = port;
            }
            db.emulator = true;
        }
        if let Some(name) = lookup("MOVIES_COLLECTION") {
            db.movies_collection = name;
        }

        // Vector index
        if let Some(backend) = lookup("VECTOR_BACKEND") {
            db.vector_backend = backend.parse()?;
        }
        if let Some(host) = lookup("QDRANT_HOST") {
            db.qdrant_host = host;
        }
        if let Some(port) = lookup("QDRANT_PORT") {
            db.qdrant_port = parse_value("QDRANT_PORT", port)?;
        }
        if let Some(name) = lookup("COLLECTION_NAME") {
            db.collection_name = name;
        }
        if let Some(dim) = lookup("VECTOR_DIMENSION") {
            db.vector_dimension = parse_value("VECTOR_DIMENSION", dim)?;
        }

        // Embedding
        let emb = &mut self.embedding;
        if let Some(provider) = lookup("EMBEDDING_PROVIDER") {
            emb.provider = provider.parse()?;
        }
        if let Some(host) = lookup("OLLAMA_HOST") {
            emb.ollama_host = host;
        }
        if let Some(port) = lookup("OLLAMA_PORT") {
            emb.ollama_port = parse_value("OLLAMA_PORT", port)?;
        }
        if let Some(key) = lookup("OPENAI_API_KEY") {
            emb.openai_api_key = Some(key);
        }
        if let Some(model) = lookup("EMBEDDING_MODEL") {
            emb.model = model;
        }
        if let Some(dim) = lookup("EMBEDDING_DIMENSION") {
            emb.dimension = Some(parse_value("EMBEDDING_DIMENSION", dim)?);
        }

        // Logging
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(self)
    }
}

fn parse_value<T: FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value,
    })
}

fn split_host_port(key: &str, endpoint: &str) -> Result<(String, Option<u16>), ConfigError> {
    match endpoint.rsplit_once(':') {
        Some((host, port)) => {
            let port = parse_value(key, port.to_string())?;
            Ok((host.to_string(), Some(port)))
        }
        None => Ok((endpoint.to_string(), None)),
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed origins for CORS (empty allows any origin)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: vec![],
        }
    }
}

/// Where movie records are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    SurrealDb,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "surrealdb" | "surreal" => Ok(Self::SurrealDb),
            "memory" => Ok(Self::Memory),
            _ => Err(ConfigError::InvalidValue {
                key: "STORE_BACKEND".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Where movie vectors are indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorBackend {
    Qdrant,
    Memory,
}

impl FromStr for VectorBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "qdrant" => Ok(Self::Qdrant),
            "memory" => Ok(Self::Memory),
            _ => Err(ConfigError::InvalidValue {
                key: "VECTOR_BACKEND".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Document store and vector index connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Document store implementation
    pub store_backend: StoreBackend,

    /// SurrealDB host
    pub store_host: String,

    /// SurrealDB WebSocket port
    pub store_port: u16,

    /// SurrealDB username
    pub store_user: String,

    /// SurrealDB password
    pub store_pass: String,

    /// SurrealDB namespace
    pub store_namespace: String,

    /// SurrealDB database name
    pub store_database: String,

    /// Local emulator mode: connect without signing in
    pub emulator: bool,

    /// Table holding movie records
    pub movies_collection: String,

    /// Vector index implementation
    pub vector_backend: VectorBackend,

    /// Qdrant host
    pub qdrant_host: String,

    /// Qdrant gRPC port
    pub qdrant_port: u16,

    /// Qdrant collection name
    pub collection_name: String,

    /// Vector dimension (fixed when the collection is created)
    pub vector_dimension: usize,
}

impl DatabaseConfig {
    /// SurrealDB endpoint without scheme, as the ws engine expects
    pub fn store_endpoint(&self) -> String {
        format!("{}:{}", self.store_host, self.store_port)
    }

    /// Qdrant gRPC URL
    pub fn qdrant_url(&self) -> String {
        format!("http://{}:{}", self.qdrant_host, self.qdrant_port)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            store_backend: StoreBackend::SurrealDb,
            store_host: "localhost".to_string(),
            store_port: 8000,
            store_user: "root".to_string(),
            store_pass: "root".to_string(),
            store_namespace: "cine".to_string(),
            store_database: "catalog".to_string(),
            emulator: false,
            movies_collection: "movies".to_string(),
            vector_backend: VectorBackend::Qdrant,
            qdrant_host: "localhost".to_string(),
            qdrant_port: 6334,
            collection_name: "movies".to_string(),
            vector_dimension: 512,
        }
    }
}

/// Embedding provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Provider to use
    pub provider: EmbeddingProvider,

    /// Ollama host
    pub ollama_host: String,

    /// Ollama port
    pub ollama_port: u16,

    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// Embedding model name
    pub model: String,

    /// Output dimension override (defaults to the model's native size)
    pub dimension: Option<usize>,

    /// Cached embeddings (0 disables the cache)
    pub cache_capacity: u64,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl EmbeddingConfig {
    /// Ollama base URL
    pub fn ollama_url(&self) -> String {
        format!("http://{}:{}", self.ollama_host, self.ollama_port)
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProvider::Ollama,
            ollama_host: "localhost".to_string(),
            ollama_port: 11434,
            openai_api_key: None,
            model: "nomic-embed-text".to_string(),
            dimension: None,
            cache_capacity: 1_000,
            timeout_secs: 60,
        }
    }
}

/// Supported embedding providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    Ollama,
    OpenAI,
    /// Offline feature-hashing embedder for local development
    Hashing,
}

impl FromStr for EmbeddingProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAI),
            "hashing" => Ok(Self::Hashing),
            _ => Err(ConfigError::InvalidValue {
                key: "EMBEDDING_PROVIDER".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
