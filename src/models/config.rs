//! Configuration model loaded from external sources.

use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::path::PathBuf;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use fastembed::EmbeddingModel;
use serde::Deserialize;

use crate::{FUZZ_THRESHOLD, SIMILARITY_THRESHOLD, TOKEN_SET_THRESHOLD};

/// Which matcher a deployment runs. The two are alternatives, never chained.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Embedding similarity backed by a fuzzy ratio, served on `/amibot`.
    #[default]
    Semantic,
    /// Token-set ratio only, served on `/ask`.
    Fuzzy,
}

/// Embedding models the precomputed catalog vectors may come from.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
pub enum EmbeddingModelKind {
    #[default]
    #[serde(rename = "all-minilm-l6-v2")]
    AllMiniLmL6V2,
    #[serde(rename = "multilingual-e5-large")]
    MultilingualE5Large,
}

impl EmbeddingModelKind {
    pub fn model(self) -> EmbeddingModel {
        match self {
            EmbeddingModelKind::AllMiniLmL6V2 => EmbeddingModel::AllMiniLML6V2,
            EmbeddingModelKind::MultilingualE5Large => EmbeddingModel::MultilingualE5Large,
        }
    }
}

/// Score cut-offs applied by the matchers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchThresholds {
    /// Cosine similarity must be strictly greater.
    pub similarity: f32,
    /// Fuzzy ratio must be strictly greater.
    pub fuzz: f64,
    /// Token-set ratio must be greater or equal.
    pub token_set: f64,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            similarity: SIMILARITY_THRESHOLD,
            fuzz: FUZZ_THRESHOLD,
            token_set: TOKEN_SET_THRESHOLD,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
/// Server settings, layered from `amibot.yaml` and `AMIBOT_*` variables.
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub strategy: MatchStrategy,
    pub embedding_model: EmbeddingModelKind,
    pub model_cache_dir: Option<PathBuf>,
    pub similarity_threshold: f32,
    pub fuzz_threshold: f64,
    pub token_set_threshold: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let thresholds = MatchThresholds::default();
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 5000,
            data_dir: PathBuf::from("amibot_data"),
            strategy: MatchStrategy::default(),
            embedding_model: EmbeddingModelKind::default(),
            model_cache_dir: None,
            similarity_threshold: thresholds.similarity,
            fuzz_threshold: thresholds.fuzz,
            token_set_threshold: thresholds.token_set,
        }
    }
}

impl ServerConfig {
    /// Load from an optional `amibot.yaml` in the working directory, then
    /// `AMIBOT_*` environment variables (e.g. `AMIBOT_DATA_DIR`).
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name("amibot").required(false))
                .add_source(
                    Environment::with_prefix("AMIBOT")
                        .prefix_separator("_")
                        .separator("__")
                        .try_parsing(true),
                ),
        )
    }

    pub(crate) fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let ip: IpAddr = self.bind_addr.parse()?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn thresholds(&self) -> MatchThresholds {
        MatchThresholds {
            similarity: self.similarity_threshold,
            fuzz: self.fuzz_threshold,
            token_set: self.token_set_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use config::{Config, File, FileFormat};

    use super::{EmbeddingModelKind, MatchStrategy, ServerConfig};

    fn from_yaml(yaml: &str) -> ServerConfig {
        ServerConfig::from_builder(
            Config::builder().add_source(File::from_str(yaml, FileFormat::Yaml)),
        )
        .expect("config should deserialize")
    }

    #[test]
    fn empty_source_falls_back_to_defaults() {
        let config = from_yaml("");

        assert_eq!(config.port, 5000);
        assert_eq!(config.strategy, MatchStrategy::Semantic);
        assert_eq!(config.embedding_model, EmbeddingModelKind::AllMiniLmL6V2);
        assert_eq!(config.thresholds().similarity, 0.55);
        assert_eq!(config.thresholds().fuzz, 70.0);
        assert_eq!(config.thresholds().token_set, 60.0);
    }

    #[test]
    fn yaml_overrides_selected_keys() {
        let config = from_yaml(
            "strategy: fuzzy\nport: 8080\ndata_dir: /srv/amibot\ntoken_set_threshold: 75\nembedding_model: multilingual-e5-large\n",
        );

        assert_eq!(config.strategy, MatchStrategy::Fuzzy);
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_dir.to_str(), Some("/srv/amibot"));
        assert_eq!(config.token_set_threshold, 75.0);
        assert_eq!(config.embedding_model, EmbeddingModelKind::MultilingualE5Large);
        assert_eq!(config.bind_addr, "0.0.0.0");
    }

    #[test]
    fn socket_addr_joins_host_and_port() {
        let addr = ServerConfig::default()
            .socket_addr()
            .expect("default address should parse");

        assert_eq!(addr.port(), 5000);
        assert!(addr.ip().is_unspecified());
    }

    #[test]
    fn socket_addr_accepts_ipv6_bind_addr() {
        let config = ServerConfig {
            bind_addr: "::".to_string(),
            port: 8080,
            ..ServerConfig::default()
        };

        let addr = config.socket_addr().expect("IPv6 address should parse");

        assert!(addr.is_ipv6());
        assert_eq!(addr.to_string(), "[::]:8080");
    }
}
