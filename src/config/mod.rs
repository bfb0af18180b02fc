use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub backend: BackendConfig,
    pub auth: AuthConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the tenant-scoped data backend (the Salesforce proxy)
    pub base_url: String,
    /// Shared secret sent as `x-api-key` on every backend request
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Where the OAuth onboarding flow starts; falls back to `base_url`
    pub oauth_base_url: Option<String>,
    pub connect_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_audience: Option<String>,
    pub session_cookie: String,
    pub login_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

impl BackendConfig {
    pub fn oauth_base(&self) -> &str {
        self.oauth_base_url.as_deref().unwrap_or(&self.base_url)
    }
}

impl AppConfig {
    /// Resolve configuration from the process environment. Called once at startup.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(&lookup)?;

        config.validate()?;
        Ok(config)
    }

    fn with_overrides<F>(mut self, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(v) = lookup("RIFT_CONSOLE_BIND") {
            self.server.bind = v;
        }
        if let Some(v) = lookup("RIFT_CONSOLE_PORT").or_else(|| lookup("PORT")) {
            self.server.port = v.parse().map_err(|_| ConfigError::Invalid {
                key: "RIFT_CONSOLE_PORT",
                reason: format!("'{}' is not a port number", v),
            })?;
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = v;
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Backend overrides
        if let Some(v) = lookup("RIFT_BACKEND_URL") {
            self.backend.base_url = v;
        }
        if let Some(v) = lookup("RIFT_BACKEND_API_KEY") {
            self.backend.api_key = v;
        }
        if let Some(v) = lookup("RIFT_OAUTH_BASE_URL") {
            self.backend.oauth_base_url = Some(v).filter(|s| !s.trim().is_empty());
        }
        if let Some(v) = lookup("RIFT_BACKEND_CONNECT_TIMEOUT_SECS") {
            self.backend.connect_timeout_secs = v.parse().ok();
        }

        // Auth overrides
        if let Some(v) = lookup("AUTH_JWT_SECRET") {
            self.auth.jwt_secret = v;
        }
        if let Some(v) = lookup("AUTH_JWT_AUDIENCE") {
            self.auth.jwt_audience = Some(v).filter(|s| !s.trim().is_empty());
        }
        if let Some(v) = lookup("AUTH_SESSION_COOKIE") {
            self.auth.session_cookie = v;
        }
        if let Some(v) = lookup("AUTH_LOGIN_URL") {
            self.auth.login_url = v;
        }

        // Security overrides
        if let Some(v) = lookup("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        Ok(self)
    }

    /// Required values have no defaults; credentials are never baked into presets.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }
        if self.backend.base_url.trim().is_empty() {
            return Err(ConfigError::Missing("RIFT_BACKEND_URL"));
        }
        url::Url::parse(&self.backend.base_url).map_err(|e| ConfigError::Invalid {
            key: "RIFT_BACKEND_URL",
            reason: e.to_string(),
        })?;
        if let Some(oauth) = &self.backend.oauth_base_url {
            url::Url::parse(oauth).map_err(|e| ConfigError::Invalid {
                key: "RIFT_OAUTH_BASE_URL",
                reason: e.to_string(),
            })?;
        }
        if self.backend.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("RIFT_BACKEND_API_KEY"));
        }
        if self.auth.jwt_secret.is_empty() {
            return Err(ConfigError::Missing("AUTH_JWT_SECRET"));
        }
        Ok(())
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                bind: "127.0.0.1".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 5,
                connection_timeout: 30,
            },
            backend: BackendConfig {
                base_url: String::new(),
                api_key: String::new(),
                oauth_base_url: None,
                connect_timeout_secs: None,
            },
            auth: AuthConfig {
                jwt_secret: String::new(),
                jwt_audience: None,
                session_cookie: "rift-session".to_string(),
                login_url: "/login".to_string(),
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string()],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                bind: "0.0.0.0".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 10,
                connection_timeout: 10,
            },
            backend: BackendConfig {
                base_url: String::new(),
                api_key: String::new(),
                oauth_base_url: None,
                connect_timeout_secs: Some(10),
            },
            auth: AuthConfig {
                jwt_secret: String::new(),
                jwt_audience: Some("authenticated".to_string()),
                session_cookie: "rift-session".to_string(),
                login_url: "/login".to_string(),
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: Vec::new(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                bind: "0.0.0.0".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 20,
                connection_timeout: 5,
            },
            backend: BackendConfig {
                base_url: String::new(),
                api_key: String::new(),
                oauth_base_url: None,
                connect_timeout_secs: Some(5),
            },
            auth: AuthConfig {
                jwt_secret: String::new(),
                jwt_audience: Some("authenticated".to_string()),
                session_cookie: "rift-session".to_string(),
                login_url: "/login".to_string(),
            },
            security: SecurityConfig {
                enable_cors: false,
                cors_origins: Vec::new(),
            },
        }
    }
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

    const REQUIRED: &[(&str, &str)] = &[
        ("DATABASE_URL", "postgres://localhost/rift"),
        ("RIFT_BACKEND_URL", "http://127.0.0.1:3001"),
        ("RIFT_BACKEND_API_KEY", "test-key"),
        ("AUTH_JWT_SECRET", "secret"),
    ];

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::from_lookup(lookup_from(REQUIRED)).unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.backend.api_key, "test-key");
        assert_eq!(config.backend.oauth_base(), "http://127.0.0.1:3001");
        assert!(config.auth.jwt_audience.is_none());
    }

    #[test]
    fn test_production_preset_requires_audience() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("APP_ENV", "prod"));
        let config = AppConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.auth.jwt_audience.as_deref(), Some("authenticated"));
        assert!(!config.security.enable_cors);
    }

    #[test]
    fn missing_api_key_is_rejected() {
        let pairs: Vec<_> = REQUIRED
            .iter()
            .copied()
            .filter(|(k, _)| *k != "RIFT_BACKEND_API_KEY")
            .collect();
        let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("RIFT_BACKEND_API_KEY")));
    }

    #[test]
    fn invalid_port_is_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("RIFT_CONSOLE_PORT", "eighty"));
        let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "RIFT_CONSOLE_PORT", .. }));
    }

    #[test]
    fn oauth_base_override_and_cors_origins() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("RIFT_OAUTH_BASE_URL", "https://rift.example.com"));
        pairs.push(("SECURITY_CORS_ORIGINS", "https://a.example.com, ,https://b.example.com"));
        let config = AppConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.backend.oauth_base(), "https://rift.example.com");
        assert_eq!(
            config.security.cors_origins,
            vec!["https://a.example.com".to_string(), "https://b.example.com".to_string()]
        );
    }
}
