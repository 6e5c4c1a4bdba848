//! Application settings and configuration structures.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port)
    pub server: ServerSettings,

    /// Database configuration (PostgreSQL)
    pub database: DatabaseSettings,

    /// JWT authentication settings
    pub jwt: JwtSettings,

    /// Snowflake ID generator settings
    pub snowflake: SnowflakeSettings,

    /// Rate limiting configuration for `/api`
    pub rate_limit: RateLimitSettings,

    /// Request parsing and static asset settings
    pub http: HttpSettings,

    /// Avatar upload settings
    pub uploads: UploadSettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// Premium tier configuration
    pub premium: PremiumSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,
}

/// PostgreSQL database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Database connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections to maintain
    pub min_connections: u32,

    /// Connection acquire timeout in seconds
    pub acquire_timeout: u64,

    /// Apply pending migrations on startup
    pub run_migrations: bool,
}

/// JWT authentication configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens
    pub secret: String,

    /// Token lifetime in days
    pub expires_in_days: i64,
}

/// Snowflake ID generator configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeSettings {
    /// Machine/worker ID (0-31)
    pub machine_id: u16,

    /// Node ID (0-31)
    pub node_id: u16,
}

/// Fixed-window rate limiting configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitSettings {
    /// Requests allowed per client per window
    pub max_requests: u32,

    /// Window length in seconds
    pub window_seconds: u64,

    /// Message returned with 429 responses
    pub message: String,

    /// Key clients on `X-Forwarded-For` / `X-Real-IP`. Enable only behind a
    /// reverse proxy that overwrites these headers.
    #[serde(default)]
    pub trust_proxy_headers: bool,
}

/// HTTP request handling configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    /// Maximum JSON request body size in bytes
    pub json_body_limit: usize,

    /// Query parameters allowed to repeat
    pub hpp_whitelist: Vec<String>,

    /// Directory holding the built client, served in production
    pub static_dir: Option<String>,
}

/// Avatar upload configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    /// Directory uploaded photos are written to
    pub dir: String,

    /// Maximum upload size in bytes
    pub max_bytes: usize,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins (comma-separated in env)
    pub allowed_origins: Vec<String>,
}

/// Premium tier configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PremiumSettings {
    /// Rooms a non-premium user may own
    pub free_chatroom_limit: i64,

    /// Length of the monthly plan in days
    pub monthly_days: i64,

    /// Length of the yearly plan in days
    pub yearly_days: i64,
}

/// Minimum required length for JWT secret (256 bits = 32 bytes)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if JWT secret is too short.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Config::builder()
            .set_default("environment", environment.clone())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout", 30)?
            .set_default("database.run_migrations", true)?
            .set_default("jwt.expires_in_days", 90)?
            .set_default("snowflake.machine_id", 1)?
            .set_default("snowflake.node_id", 0)?
            .set_default("rate_limit.max_requests", 1000)?
            .set_default("rate_limit.window_seconds", 3600)?
            .set_default("rate_limit.trust_proxy_headers", false)?
            .set_default(
                "rate_limit.message",
                "Too many requests from this IP.\n Please try again in an hour.",
            )?
            .set_default("http.json_body_limit", 10 * 1024)?
            .set_default("http.hpp_whitelist", vec!["duration"])?
            .set_default("uploads.dir", "public/img/users")?
            .set_default("uploads.max_bytes", 5 * 1024 * 1024)?
            .set_default("cors.allowed_origins", Vec::<String>::new())?
            .set_default("premium.free_chatroom_limit", 3)?
            .set_default("premium.monthly_days", 30)?
            .set_default("premium.yearly_days", 365)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // APP__SERVER__PORT=3000 -> server.port = 3000
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .with_list_parse_key("http.hpp_whitelist")
                    .try_parsing(true),
            )
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
            .set_override_option(
                "snowflake.machine_id",
                std::env::var("SNOWFLAKE_MACHINE_ID").ok(),
            )?
            .build()?
            .try_deserialize()
            .and_then(|settings: Self| {
                settings.validate()?;
                Ok(settings)
            })
    }

    /// Check invariants the deserializer cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::Message(format!(
                "JWT secret must be at least {} characters. Current length: {}",
                MIN_JWT_SECRET_LENGTH,
                self.jwt.secret.len()
            )));
        }
        if self.rate_limit.max_requests == 0 || self.rate_limit.window_seconds == 0 {
            return Err(ConfigError::Message(
                "rate_limit.max_requests and rate_limit.window_seconds must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
