//! Server configuration.

use std::env;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Database URL. When absent, the in-memory store is used.
    pub database_url: Option<String>,
    /// Keycloak issuer URL (the realm URL embedded in token `iss` claims).
    pub keycloak_issuer_url: String,
    /// Realm RSA public key PEM for token verification.
    pub jwt_public_key: Option<String>,
    /// HMAC secret for token verification (dev mode only).
    pub jwt_secret: Option<String>,
    /// Log level.
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_public_key = env::var("BOOKCYCLE_JWT_PUBLIC_KEY").ok();
        let jwt_secret = env::var("BOOKCYCLE_JWT_SECRET").ok();
        if jwt_public_key.is_none() && jwt_secret.is_none() {
            anyhow::bail!(
                "Either BOOKCYCLE_JWT_PUBLIC_KEY or BOOKCYCLE_JWT_SECRET must be set"
            );
        }

        Ok(Self {
            host: env::var("BOOKCYCLE_SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("BOOKCYCLE_SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            database_url: env::var("DATABASE_URL").ok(),
            keycloak_issuer_url: env::var("BOOKCYCLE_KEYCLOAK_ISSUER_URL").unwrap_or_else(|_| {
                "http://localhost:8180/realms/bookcycle".to_string()
            }),
            jwt_public_key,
            jwt_secret,
            log_level: env::var("BOOKCYCLE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the Keycloak authorization endpoint for login redirects.
    pub fn keycloak_auth_url(&self) -> String {
        format!(
            "{}/protocol/openid-connect/auth",
            self.keycloak_issuer_url.trim_end_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: None,
            keycloak_issuer_url: "http://localhost:8180/realms/bookcycle".to_string(),
            jwt_public_key: None,
            jwt_secret: Some("dev-secret".to_string()),
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn test_server_addr() {
        assert_eq!(config().server_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_keycloak_auth_url_trims_trailing_slash() {
        let mut config = config();
        config.keycloak_issuer_url = "http://localhost:8180/realms/bookcycle/".to_string();
        assert_eq!(
            config.keycloak_auth_url(),
            "http://localhost:8180/realms/bookcycle/protocol/openid-connect/auth"
        );
    }
}
