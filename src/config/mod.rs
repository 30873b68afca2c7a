use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default NLP Cloud summarization model endpoint (without the trailing `/summarization`)
pub const DEFAULT_SUMMARIZER_URL: &str = "https://api.nlpcloud.io/v1/gpu/gpt-oss-120b";

/// Upper bound for `SECURITY_JWT_EXPIRY_HOURS` (one year)
pub const MAX_JWT_EXPIRY_HOURS: u64 = 24 * 365;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub summarizer: SummarizerConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Read `APP_ENV` from the process environment.
    pub fn from_env() -> Self {
        Self::from_name(env::var("APP_ENV").ok().as_deref())
    }

    /// Anything unrecognised, or nothing at all, is development.
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(skip_serializing)]
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizerConfig {
    pub base_url: String,
    #[serde(skip_serializing)]
    pub api_token: String,
    pub timeout_secs: u64,
}

impl DatabaseConfig {
    /// Just the database settings, for commands that never serve requests.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Environment::from_name(lookup("APP_ENV").as_deref());
        let url = required(&lookup, "DATABASE_URL")?;

        let mut database =
            AppConfig::preset(environment, url, String::new(), String::new()).database;
        database.apply_overrides(&lookup)?;
        Ok(database)
    }

    fn apply_overrides<F>(&mut self, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.max_connections = parse(&v, "DATABASE_MAX_CONNECTIONS")?;
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.connection_timeout = parse(&v, "DATABASE_CONNECTION_TIMEOUT")?;
        }
        Ok(())
    }
}

impl SummarizerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup, so tests don't touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Environment::from_name(lookup("APP_ENV").as_deref());

        let database_url = required(&lookup, "DATABASE_URL")?;
        let jwt_secret = required(&lookup, "JWT_SECRET")?;
        let api_token = required(&lookup, "NLP_CLOUD_API_KEY")?;

        Self::preset(environment, database_url, jwt_secret, api_token).with_env_overrides(&lookup)
    }

    fn preset(
        environment: Environment,
        database_url: String,
        jwt_secret: String,
        api_token: String,
    ) -> Self {
        match environment {
            Environment::Production => Self::production(database_url, jwt_secret, api_token),
            Environment::Staging => Self::staging(database_url, jwt_secret, api_token),
            Environment::Development => Self::development(database_url, jwt_secret, api_token),
        }
    }

    fn with_env_overrides<F>(mut self, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(v) = lookup("HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("PORT") {
            self.server.port = parse(&v, "PORT")?;
        }

        self.database.apply_overrides(lookup)?;

        // Security overrides
        if let Some(v) = lookup("SECURITY_JWT_EXPIRY_HOURS") {
            let hours: u64 = parse(&v, "SECURITY_JWT_EXPIRY_HOURS")?;
            if hours == 0 || hours > MAX_JWT_EXPIRY_HOURS {
                return Err(ConfigError::Invalid {
                    key: "SECURITY_JWT_EXPIRY_HOURS",
                    value: v,
                });
            }
            self.security.jwt_expiry_hours = hours;
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Summarizer overrides
        if let Some(v) = lookup("NLP_CLOUD_URL") {
            url::Url::parse(&v).map_err(|_| ConfigError::Invalid {
                key: "NLP_CLOUD_URL",
                value: v.clone(),
            })?;
            self.summarizer.base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = lookup("SUMMARIZER_TIMEOUT_SECS") {
            self.summarizer.timeout_secs = parse(&v, "SUMMARIZER_TIMEOUT_SECS")?;
        }

        Ok(self)
    }

    fn development(database_url: String, jwt_secret: String, api_token: String) -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                jwt_secret,
                jwt_expiry_hours: 24 * 7, // 1 week
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
            },
            summarizer: SummarizerConfig {
                base_url: DEFAULT_SUMMARIZER_URL.to_string(),
                api_token,
                timeout_secs: 20,
            },
        }
    }

    fn staging(database_url: String, jwt_secret: String, api_token: String) -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: database_url,
                max_connections: 20,
                connection_timeout: 10,
            },
            security: SecurityConfig {
                jwt_secret,
                jwt_expiry_hours: 24,
                cors_origins: Vec::new(),
            },
            ..Self::development(String::new(), String::new(), api_token)
        }
    }

    fn production(database_url: String, jwt_secret: String, api_token: String) -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: database_url,
                max_connections: 50,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                jwt_secret,
                jwt_expiry_hours: 24 * 7,
                cors_origins: Vec::new(),
            },
            ..Self::development(String::new(), String::new(), api_token)
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn parse<T: std::str::FromStr>(value: &str, key: &'static str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const BASE: [(&str, &str); 3] = [
        ("DATABASE_URL", "postgres://localhost/summaries"),
        ("JWT_SECRET", "test-secret"),
        ("NLP_CLOUD_API_KEY", "nlp-token"),
    ];

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::from_lookup(lookup_from(&BASE)).unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.summarizer.timeout(), Duration::from_secs(20));
        assert_eq!(config.summarizer.base_url, DEFAULT_SUMMARIZER_URL);
        assert_eq!(config.security.jwt_expiry_hours, 168);
    }

    #[test]
    fn test_production_keeps_secrets_and_tightens_defaults() {
        let mut pairs = BASE.to_vec();
        pairs.push(("APP_ENV", "production"));
        let config = AppConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.security.jwt_secret, "test-secret");
        assert_eq!(config.summarizer.api_token, "nlp-token");
        assert_eq!(config.database.max_connections, 50);
        assert!(config.security.cors_origins.is_empty());
    }

    #[test]
    fn test_missing_jwt_secret_is_an_error() {
        let pairs: Vec<_> = BASE.iter().copied().filter(|(k, _)| *k != "JWT_SECRET").collect();
        let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));

        let mut blank = pairs.clone();
        blank.push(("JWT_SECRET", "   "));
        let err = AppConfig::from_lookup(lookup_from(&blank)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn test_env_overrides() {
        let mut pairs = BASE.to_vec();
        pairs.push(("PORT", "8080"));
        pairs.push(("SUMMARIZER_TIMEOUT_SECS", "5"));
        pairs.push(("NLP_CLOUD_URL", "http://127.0.0.1:9000/"));
        pairs.push(("SECURITY_CORS_ORIGINS", "https://a.example, https://b.example"));
        let config = AppConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.summarizer.timeout_secs, 5);
        assert_eq!(config.summarizer.base_url, "http://127.0.0.1:9000");
        assert_eq!(
            config.security.cors_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }

    #[test]
    fn test_out_of_range_jwt_expiry_is_rejected() {
        for hours in ["0", "8761", "18446744073709551615"] {
            let mut pairs = BASE.to_vec();
            pairs.push(("SECURITY_JWT_EXPIRY_HOURS", hours));
            let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
            assert!(matches!(
                err,
                ConfigError::Invalid {
                    key: "SECURITY_JWT_EXPIRY_HOURS",
                    ..
                }
            ));
        }

        let mut pairs = BASE.to_vec();
        pairs.push(("SECURITY_JWT_EXPIRY_HOURS", "8760"));
        let config = AppConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.security.jwt_expiry_hours, MAX_JWT_EXPIRY_HOURS);
    }

    #[test]
    fn test_database_config_needs_only_the_url() {
        let config = DatabaseConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/summaries"),
            ("APP_ENV", "production"),
            ("DATABASE_MAX_CONNECTIONS", "7"),
        ]))
        .unwrap();
        assert_eq!(config.url, "postgres://localhost/summaries");
        assert_eq!(config.max_connections, 7);
        assert_eq!(config.connection_timeout, 5);

        let err = DatabaseConfig::from_lookup(lookup_from(&[("JWT_SECRET", "s")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let mut pairs = BASE.to_vec();
        pairs.push(("PORT", "not-a-port"));
        let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }
}
