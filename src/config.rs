//! Configuration types for vidclip-dl

use crate::quality::QualityLabel;
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::PathBuf, time::Duration};
use utoipa::ToSchema;

/// Fetch behavior configuration (quality default, timeout, temp location)
///
/// Groups settings related to how fetches are executed and where session
/// artifacts live. Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct FetchConfig {
    /// Quality tier used when a request does not specify one (default: 1080p)
    #[serde(default)]
    pub default_quality: QualityLabel,

    /// Per-fetch time budget (default: 1800 seconds, None = unlimited)
    ///
    /// When the budget is exhausted the external process is killed and the
    /// request fails with a timeout error. The probe operation is metadata
    /// only and shares this budget.
    #[serde(default = "default_fetch_timeout", with = "optional_duration_serde")]
    #[schema(value_type = Option<u64>)]
    pub fetch_timeout: Option<Duration>,

    /// Parent directory for the session temp directory (default: system temp)
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub temp_parent_dir: Option<PathBuf>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            default_quality: QualityLabel::default(),
            fetch_timeout: default_fetch_timeout(),
            temp_parent_dir: None,
        }
    }
}

/// External tool configuration (binary location, extractor workarounds)
///
/// Groups settings for the media-fetch binary. Used as a nested sub-config
/// within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ToolsConfig {
    /// Path to the yt-dlp executable (auto-detected if None)
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub ytdlp_path: Option<PathBuf>,

    /// Whether to search PATH for the binary if no explicit path is set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,

    /// Extractor arguments passed through verbatim to the tool
    ///
    /// Deployment-specific workarounds for platform-side access restrictions
    /// belong here (e.g. `"youtube:player_client=android"`), not in code.
    #[serde(default)]
    pub extractor_args: Option<String>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: None,
            search_path: true,
            extractor_args: None,
        }
    }
}

/// Main configuration for [`VideoFetcher`](crate::fetcher::VideoFetcher)
///
/// Fields are organized into logical sub-configs:
/// - [`fetch`](FetchConfig) — quality default, timeout, temp location
/// - [`tools`](ToolsConfig) — external binary path, extractor workarounds
/// - [`server`](ServerIntegrationConfig) — REST API settings
///
/// All sub-config fields are flattened for serialization, so the JSON/TOML
/// format stays flat (no nesting).
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Fetch behavior settings
    #[serde(flatten)]
    pub fetch: FetchConfig,

    /// External tool settings
    #[serde(flatten)]
    pub tools: ToolsConfig,

    /// API and external server integration
    #[serde(flatten)]
    pub server: ServerIntegrationConfig,
}

// Convenience accessors — keep call sites short without reaching through
// the sub-config structs.
impl Config {
    /// Quality tier used when a request does not specify one
    pub fn default_quality(&self) -> QualityLabel {
        self.fetch.default_quality
    }

    /// Per-fetch time budget
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch.fetch_timeout
    }
}

/// API and external server integration configuration
///
/// Groups settings for external access and control interfaces.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ServerIntegrationConfig {
    /// REST API configuration
    #[serde(default)]
    pub api: ApiConfig,
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:5000)
    #[serde(default = "default_bind_address")]
    #[schema(value_type = String)]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_fetch_timeout() -> Option<Duration> {
    Some(Duration::from_secs(1800))
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 5000))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}

// Optional Duration serialization helper (seconds on the wire)
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<u64>::deserialize(deserializer)?;
        Ok(secs.map(Duration::from_secs))
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = Config::default();

        assert_eq!(config.default_quality(), QualityLabel::P1080);
        assert_eq!(config.fetch_timeout(), Some(Duration::from_secs(1800)));
        assert!(config.fetch.temp_parent_dir.is_none());
        assert!(config.tools.ytdlp_path.is_none());
        assert!(config.tools.search_path);
        assert!(config.tools.extractor_args.is_none());
        assert_eq!(
            config.server.api.bind_address,
            "127.0.0.1:5000".parse::<SocketAddr>().unwrap()
        );
        assert!(config.server.api.cors_enabled);
        assert_eq!(config.server.api.cors_origins, vec!["*".to_string()]);
        assert!(config.server.api.swagger_ui);
    }

    #[test]
    fn empty_json_deserializes_to_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();

        assert_eq!(config.default_quality(), QualityLabel::P1080);
        assert_eq!(config.fetch_timeout(), Some(Duration::from_secs(1800)));
        assert!(config.server.api.cors_enabled);
    }

    #[test]
    fn config_round_trips_through_json() {
        let mut original = Config::default();
        original.fetch.default_quality = QualityLabel::P720;
        original.fetch.fetch_timeout = Some(Duration::from_secs(120));
        original.tools.ytdlp_path = Some(PathBuf::from("/opt/yt-dlp"));
        original.tools.extractor_args = Some("youtube:player_client=android".to_string());
        original.server.api.bind_address = "0.0.0.0:8080".parse().unwrap();
        original.server.api.cors_origins = vec!["https://app.example.com".to_string()];

        let json = serde_json::to_string(&original).unwrap();
        let restored: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.fetch.default_quality, QualityLabel::P720);
        assert_eq!(restored.fetch.fetch_timeout, Some(Duration::from_secs(120)));
        assert_eq!(restored.tools.ytdlp_path, Some(PathBuf::from("/opt/yt-dlp")));
        assert_eq!(
            restored.tools.extractor_args.as_deref(),
            Some("youtube:player_client=android")
        );
        assert_eq!(
            restored.server.api.bind_address, original.server.api.bind_address,
            "api bind_address must survive round-trip"
        );
        assert_eq!(restored.server.api.cors_origins, original.server.api.cors_origins);
    }

    #[test]
    fn fetch_timeout_serializes_as_seconds() {
        let mut config = Config::default();
        config.fetch.fetch_timeout = Some(Duration::from_secs(90));

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["fetch_timeout"], 90);
    }

    #[test]
    fn null_fetch_timeout_means_unlimited() {
        let config: Config = serde_json::from_str(r#"{"fetch_timeout": null}"#).unwrap();
        assert_eq!(config.fetch_timeout(), None);
    }

    #[test]
    fn sub_configs_are_flattened_on_the_wire() {
        let json = serde_json::to_value(Config::default()).unwrap();

        // Flattened: fields live at the top level, not under sub-config keys
        assert!(json.get("default_quality").is_some());
        assert!(json.get("ytdlp_path").is_some());
        assert!(json.get("api").is_some());
        assert!(json.get("fetch").is_none());
        assert!(json.get("tools").is_none());
    }
}
