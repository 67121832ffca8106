use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// How often the safe-walk expiry monitor scans, in seconds (default: `30`).
    pub safewalk_monitor_interval_secs: u64,
    /// How often WebSocket connections are pinged and swept, in seconds (default: `30`).
    pub ws_heartbeat_interval_secs: u64,
    /// Base URL of the external transcription service.
    pub transcription_url: String,
    /// Shared secret the transcription service presents on its callback.
    pub transcription_callback_token: String,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                           | Default                       |
    /// |-----------------------------------|-------------------------------|
    /// | `HOST`                            | `0.0.0.0`                     |
    /// | `PORT`                            | `3000`                        |
    /// | `CORS_ORIGINS`                    | `http://localhost:5173`       |
    /// | `REQUEST_TIMEOUT_SECS`            | `30`                          |
    /// | `SHUTDOWN_TIMEOUT_SECS`           | `30`                          |
    /// | `SAFEWALK_MONITOR_INTERVAL_SECS`  | `30`                          |
    /// | `WS_HEARTBEAT_INTERVAL_SECS`      | `30`                          |
    /// | `TRANSCRIPTION_SERVICE_URL`       | `http://localhost:8090`       |
    /// | `TRANSCRIPTION_CALLBACK_TOKEN`    | `dev-callback-token`          |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let safewalk_monitor_interval_secs: u64 =
            std::env::var("SAFEWALK_MONITOR_INTERVAL_SECS")
                .unwrap_or_else(|_| "30".into())
                .parse()
                .expect("SAFEWALK_MONITOR_INTERVAL_SECS must be a valid u64");

        let ws_heartbeat_interval_secs: u64 = std::env::var("WS_HEARTBEAT_INTERVAL_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("WS_HEARTBEAT_INTERVAL_SECS must be a valid u64");

        let transcription_url = std::env::var("TRANSCRIPTION_SERVICE_URL")
            .unwrap_or_else(|_| "http://localhost:8090".into());

        let transcription_callback_token = std::env::var("TRANSCRIPTION_CALLBACK_TOKEN")
            .unwrap_or_else(|_| "dev-callback-token".into());

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            safewalk_monitor_interval_secs,
            ws_heartbeat_interval_secs,
            transcription_url,
            transcription_callback_token,
            jwt,
        }
    }
}
