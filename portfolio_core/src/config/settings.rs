use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::locale::Locale;

const DEFAULT_SESSION_SECRET: &str = "9c4f1e7a2b8d3f6e0a5c7b9d1e3f5a7c";
const DEFAULT_OPERATOR_PASSWORD: &str = "change-me-now";
const MAX_SESSION_TTL_HOURS: u64 = 24 * 365;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub auth: AuthConfig,
    pub site: SiteConfig,
    pub feed: FeedConfig,
    pub websocket: WebSocketConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    Memory,
    Rtdb,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub database_url: Option<String>,
    pub collection: String,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthBackend {
    Local,
    IdentityToolkit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub backend: AuthBackend,
    pub api_key: Option<String>,
    pub operator_email: Option<String>,
    pub operator_password_hash: Option<String>,
    pub operator_password: Option<String>,
    pub session_secret: String,
    pub session_ttl_hours: u64,
    pub google: Option<GoogleOAuthConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterConfig {
    pub label: String,
    pub target: u32,
    pub suffix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub title: String,
    pub description: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub owner_name: String,
    pub headline: String,
    pub tagline: String,
    pub locale: Locale,
    pub toast_seconds: u64,
    #[serde(default)]
    pub counters: Vec<CounterConfig>,
    #[serde(default)]
    pub projects: Vec<ProjectConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub preview_chars: usize,
    pub display_offset_minutes: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSocketConfig {
    pub max_connections: usize,
    pub ping_interval_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            store: StoreConfig::default(),
            auth: AuthConfig::default(),
            site: SiteConfig::default(),
            feed: FeedConfig::default(),
            websocket: WebSocketConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            database_url: None,
            collection: "contact-messages".to_string(),
            request_timeout_seconds: 15,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            backend: AuthBackend::Local,
            api_key: None,
            operator_email: Some("admin@example.com".to_string()),
            operator_password_hash: None,
            operator_password: Some(DEFAULT_OPERATOR_PASSWORD.to_string()),
            session_secret: DEFAULT_SESSION_SECRET.to_string(),
            session_ttl_hours: 12,
            google: None,
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            owner_name: "Portfolio".to_string(),
            headline: "Software developer".to_string(),
            tagline: "I build fast, reliable web applications.".to_string(),
            locale: Locale::Es,
            toast_seconds: 3,
            counters: vec![
                CounterConfig {
                    label: "Projects".to_string(),
                    target: 25,
                    suffix: "+".to_string(),
                },
                CounterConfig {
                    label: "Years of experience".to_string(),
                    target: 5,
                    suffix: "+".to_string(),
                },
                CounterConfig {
                    label: "Happy clients".to_string(),
                    target: 18,
                    suffix: String::new(),
                },
            ],
            projects: Vec::new(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            preview_chars: 80,
            display_offset_minutes: 0,
        }
    }
}

impl Default for WebSocketConfig {
    fn default() -> Self {
        Self {
            max_connections: 64,
            ping_interval_seconds: 30,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?);

        if std::path::Path::new("config.toml").exists() {
            builder = builder.add_source(File::with_name("config"));
        }

        builder = builder.add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        app_config.validate()?;

        Ok(app_config)
    }

    pub fn load_from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(File::from(path))
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("Server port cannot be 0".to_string()));
        }

        if self.store.collection.trim().is_empty() {
            return Err(ConfigError::Message(
                "Store collection cannot be empty".to_string(),
            ));
        }

        if self.store.backend == StoreBackend::Rtdb
            && self.store.database_url.as_deref().map_or(true, str::is_empty)
        {
            return Err(ConfigError::Message(
                "The rtdb store backend requires store.database_url".to_string(),
            ));
        }

        match self.auth.backend {
            AuthBackend::IdentityToolkit => {
                if self.auth.api_key.as_deref().map_or(true, str::is_empty) {
                    return Err(ConfigError::Message(
                        "The identity_toolkit auth backend requires auth.api_key".to_string(),
                    ));
                }
            }
            AuthBackend::Local => {
                if self.auth.operator_email.as_deref().map_or(true, str::is_empty) {
                    return Err(ConfigError::Message(
                        "The local auth backend requires auth.operator_email".to_string(),
                    ));
                }
                if self.auth.operator_password_hash.is_none() && self.auth.operator_password.is_none() {
                    return Err(ConfigError::Message(
                        "The local auth backend requires auth.operator_password_hash".to_string(),
                    ));
                }
                if self.auth.operator_password.as_deref() == Some(DEFAULT_OPERATOR_PASSWORD)
                    && self.auth.operator_password_hash.is_none()
                {
                    tracing::warn!("Using the default operator password - change this in production!");
                }
            }
        }

        if self.auth.session_secret.len() < 32 {
            return Err(ConfigError::Message(
                "Session secret must be at least 32 characters long".to_string(),
            ));
        }

        if self.auth.session_secret == DEFAULT_SESSION_SECRET {
            tracing::warn!("Using default session secret - change this in production!");
        }

        if self.auth.session_ttl_hours == 0 {
            return Err(ConfigError::Message(
                "Session lifetime must be greater than 0".to_string(),
            ));
        }

        if self.auth.session_ttl_hours > MAX_SESSION_TTL_HOURS {
            return Err(ConfigError::Message(format!(
                "Session lifetime cannot exceed {} hours",
                MAX_SESSION_TTL_HOURS
            )));
        }

        if self.site.toast_seconds == 0 {
            return Err(ConfigError::Message(
                "Toast duration must be greater than 0".to_string(),
            ));
        }

        if self.feed.preview_chars == 0 {
            return Err(ConfigError::Message(
                "Feed preview length must be greater than 0".to_string(),
            ));
        }

        if self.websocket.max_connections == 0 {
            return Err(ConfigError::Message(
                "WebSocket max connections must be greater than 0".to_string(),
            ));
        }

        if self.websocket.ping_interval_seconds == 0 {
            return Err(ConfigError::Message(
                "WebSocket ping interval must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
