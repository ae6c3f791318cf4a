use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

const DEFAULT_SITE_URL: &str = "https://easydriverhire.com";
const DEFAULT_EMAIL_FROM: &str = "noreply@easydriverhire.com";
const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com/emails";
const DEFAULT_JWT_AUDIENCE: &str = "authenticated";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub notifications: NotificationConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let notifications = NotificationConfig {
            resend_api_key: non_empty_var("RESEND_API_KEY"),
            resend_api_url: non_empty_var("RESEND_API_URL")
                .unwrap_or_else(|| DEFAULT_RESEND_API_URL.to_string()),
            email_from: non_empty_var("EMAIL_FROM")
                .unwrap_or_else(|| DEFAULT_EMAIL_FROM.to_string()),
            site_url: non_empty_var("APP_SITE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_SITE_URL.to_string()),
        };

        let auth = AuthConfig {
            jwt_secret: non_empty_var("AUTH_JWT_SECRET"),
            audience: non_empty_var("AUTH_JWT_AUDIENCE")
                .unwrap_or_else(|| DEFAULT_JWT_AUDIENCE.to_string()),
        };

        if environment == AppEnvironment::Production && auth.jwt_secret.is_none() {
            return Err(ConfigError::MissingJwtSecret);
        }

        let storage = StorageConfig {
            public_url: non_empty_var("STORAGE_PUBLIC_URL")
                .map(|url| url.trim_end_matches('/').to_string()),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            notifications,
            auth,
            storage,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Outbound e-mail settings. A missing API key disables delivery without failing requests.
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    pub resend_api_key: Option<String>,
    pub resend_api_url: String,
    pub email_from: String,
    pub site_url: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            resend_api_key: None,
            resend_api_url: DEFAULT_RESEND_API_URL.to_string(),
            email_from: DEFAULT_EMAIL_FROM.to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
        }
    }
}

/// Session token validation settings shared with the auth provider.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub audience: String,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("audience", &self.audience)
            .finish()
    }
}

/// Object storage settings used to resolve uploaded document paths into links.
#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    pub public_url: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    MissingJwtSecret,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::MissingJwtSecret => {
                write!(f, "AUTH_JWT_SECRET is required when APP_ENV=production")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::MissingJwtSecret => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_SITE_URL",
            "RESEND_API_KEY",
            "RESEND_API_URL",
            "EMAIL_FROM",
            "AUTH_JWT_SECRET",
            "AUTH_JWT_AUDIENCE",
            "STORAGE_PUBLIC_URL",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.notifications.resend_api_key.is_none());
        assert_eq!(config.notifications.email_from, DEFAULT_EMAIL_FROM);
        assert_eq!(config.auth.audience, "authenticated");
        assert!(config.storage.public_url.is_none());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn production_requires_jwt_secret() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "production");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::MissingJwtSecret)
        ));

        env::set_var("AUTH_JWT_SECRET", "super-secret");
        let config = AppConfig::load().expect("config loads with secret");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert!(!format!("{:?}", config.auth).contains("super-secret"));
        reset_env();
    }

    #[test]
    fn blank_values_fall_back_and_urls_are_trimmed() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("RESEND_API_KEY", "   ");
        env::set_var("APP_SITE_URL", "https://staging.easydriverhire.com/");
        env::set_var("STORAGE_PUBLIC_URL", "https://cdn.example.com/storage/");
        let config = AppConfig::load().expect("config loads");
        assert!(config.notifications.resend_api_key.is_none());
        assert_eq!(
            config.notifications.site_url,
            "https://staging.easydriverhire.com"
        );
        assert_eq!(
            config.storage.public_url.as_deref(),
            Some("https://cdn.example.com/storage")
        );
        reset_env();
    }
}
