use std::env;
use std::fmt;

/// Longest accepted `SESSION_TTL_HOURS`: one year.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

/// Settings consumed by the session middleware and the login/registration flow.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub cookie_name: String,
    pub session_ttl_secs: i64,
    pub secure_cookies: bool,
    pub bcrypt_cost: u32,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            cookie_name: "session".to_string(),
            session_ttl_secs: 24 * 60 * 60,
            secure_cookies: false,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_port: u16,
    pub server_host: String,
    pub allowed_origins: Vec<String>,
    pub auth: AuthSettings,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: &'static str,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}={:?} is invalid: {}", self.key, self.value, self.reason)
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, falling back to
    /// defaults for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AuthSettings::default();

        let server_port = parse_or(&lookup, "SERVER_PORT", 8080u16, "must be a port number")?;
        let ttl_hours = parse_or(&lookup, "SESSION_TTL_HOURS", 24i64, "must be an integer")?;
        if ttl_hours <= 0 {
            return Err(ConfigError {
                key: "SESSION_TTL_HOURS",
                value: ttl_hours.to_string(),
                reason: "must be positive",
            });
        }
        let session_ttl_secs = ttl_hours
            .checked_mul(60 * 60)
            .filter(|_| ttl_hours <= MAX_SESSION_TTL_HOURS)
            .ok_or_else(|| ConfigError {
                key: "SESSION_TTL_HOURS",
                value: ttl_hours.to_string(),
                reason: "must be at most 8760 (one year)",
            })?;
        let bcrypt_cost = parse_or(
            &lookup,
            "BCRYPT_COST",
            defaults.bcrypt_cost,
            "must be an integer",
        )?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError {
                key: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
                reason: "must be between 4 and 31",
            });
        }
        let secure_cookies = parse_or(
            &lookup,
            "SESSION_COOKIE_SECURE",
            false,
            "must be true or false",
        )?;

        let allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        if let Some(bad) = allowed_origins
            .iter()
            .find(|o| !(o.starts_with("http://") || o.starts_with("https://")))
        {
            return Err(ConfigError {
                key: "CORS_ALLOWED_ORIGINS",
                value: bad.clone(),
                reason: "origins must start with http:// or https://",
            });
        }

        Ok(Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://todos.db".to_string()),
            server_port,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            allowed_origins,
            auth: AuthSettings {
                cookie_name: lookup("SESSION_COOKIE_NAME").unwrap_or(defaults.cookie_name),
                session_ttl_secs,
                secure_cookies,
                bcrypt_cost,
            },
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<F, T>(
    lookup: &F,
    key: &'static str,
    default: T,
    reason: &'static str,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError { key, value, reason }),
        None => Ok(default),
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

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.database_url, "sqlite://todos.db");
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.server_host, "127.0.0.1");
        assert!(config.allowed_origins.is_empty());
        assert_eq!(config.auth.cookie_name, "session");
        assert_eq!(config.auth.session_ttl_secs, 86_400);
        assert!(!config.auth.secure_cookies);
        assert_eq!(config.auth.bcrypt_cost, bcrypt::DEFAULT_COST);
    }

    #[test]
    fn test_config_custom_values() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("SERVER_PORT", "3000"),
            ("SERVER_HOST", "0.0.0.0"),
            ("SESSION_COOKIE_NAME", "sid"),
            ("SESSION_TTL_HOURS", "2"),
            ("SESSION_COOKIE_SECURE", "true"),
            ("BCRYPT_COST", "6"),
            (
                "CORS_ALLOWED_ORIGINS",
                "http://localhost:5173, https://todos.example.com",
            ),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.server_url(), "http://0.0.0.0:3000");
        assert_eq!(config.auth.cookie_name, "sid");
        assert_eq!(config.auth.session_ttl_secs, 7_200);
        assert!(config.auth.secure_cookies);
        assert_eq!(config.auth.bcrypt_cost, 6);
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:5173", "https://todos.example.com"]
        );
    }

    #[test]
    fn test_config_rejects_invalid_values() {
        let err = Config::from_lookup(lookup_from(&[("SERVER_PORT", "eighty")])).unwrap_err();
        assert_eq!(err.key, "SERVER_PORT");

        for ttl in ["0", "8761", "3000000000000000"] {
            let err = Config::from_lookup(lookup_from(&[("SESSION_TTL_HOURS", ttl)])).unwrap_err();
            assert_eq!(err.key, "SESSION_TTL_HOURS", "{}", ttl);
        }

        let max = MAX_SESSION_TTL_HOURS.to_string();
        let config =
            Config::from_lookup(lookup_from(&[("SESSION_TTL_HOURS", max.as_str())])).unwrap();
        assert_eq!(config.auth.session_ttl_secs, MAX_SESSION_TTL_HOURS * 3600);

        let err = Config::from_lookup(lookup_from(&[("BCRYPT_COST", "2")])).unwrap_err();
        assert_eq!(err.key, "BCRYPT_COST");

        let err =
            Config::from_lookup(lookup_from(&[("CORS_ALLOWED_ORIGINS", "*")])).unwrap_err();
        assert_eq!(err.key, "CORS_ALLOWED_ORIGINS");
    }
}
