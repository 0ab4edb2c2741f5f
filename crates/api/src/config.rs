//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;

use chrono::Duration;
use thiserror::Error;

use courselib_auth::Pbkdf2Hasher;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_JWT_TTL_MINUTES: i64 = 60;
/// One year.
pub const MAX_JWT_TTL_MINUTES: i64 = 525_600;
const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("ADMIN_EMAIL and ADMIN_PASSWORD must be set together")]
    IncompleteAdminSeed,
}

/// Administrator account created at startup when absent.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

impl core::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AdminSeed").field("email", &self.email).finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub jwt_ttl: Duration,
    /// Postgres connection string; in-memory storage when `None`.
    pub database_url: Option<String>,
    pub admin: Option<AdminSeed>,
    pub password_hash_iterations: u32,
}

impl core::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind_addr", &self.bind_addr)
            .field("jwt_ttl", &self.jwt_ttl)
            .field("database", &self.database_url.as_ref().map(|_| "postgres"))
            .field("admin", &self.admin)
            .field("password_hash_iterations", &self.password_hash_iterations)
            .finish_non_exhaustive()
    }
}

impl ApiConfig {
    /// Defaults with in-memory storage and the given signing secret.
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            jwt_secret: jwt_secret.into(),
            jwt_ttl: Duration::minutes(DEFAULT_JWT_TTL_MINUTES),
            database_url: None,
            admin: None,
            password_hash_iterations: Pbkdf2Hasher::DEFAULT_ITERATIONS,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        let jwt_secret = get("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let ttl_minutes = parse_positive("JWT_TTL_MINUTES", get("JWT_TTL_MINUTES"), DEFAULT_JWT_TTL_MINUTES)?;
        let jwt_ttl = Duration::try_minutes(ttl_minutes)
            .filter(|_| ttl_minutes <= MAX_JWT_TTL_MINUTES)
            .ok_or_else(|| ConfigError::Invalid {
                var: "JWT_TTL_MINUTES",
                reason: format!("must be at most {MAX_JWT_TTL_MINUTES}"),
            })?;
        let iterations = parse_positive(
            "PASSWORD_HASH_ITERATIONS",
            get("PASSWORD_HASH_ITERATIONS"),
            i64::from(Pbkdf2Hasher::DEFAULT_ITERATIONS),
        )?;
        let password_hash_iterations = u32::try_from(iterations)
            .ok()
            .filter(|n| *n <= Pbkdf2Hasher::MAX_ITERATIONS)
            .ok_or_else(|| ConfigError::Invalid {
                var: "PASSWORD_HASH_ITERATIONS",
                reason: format!("must be at most {}", Pbkdf2Hasher::MAX_ITERATIONS),
            })?;

        let admin = match (get("ADMIN_EMAIL"), lookup("ADMIN_PASSWORD").filter(|p| !p.is_empty())) {
            (Some(email), Some(password)) => Some(AdminSeed { email, password }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteAdminSeed),
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            jwt_ttl,
            database_url: get("DATABASE_URL"),
            admin,
            password_hash_iterations,
        })
    }
}

fn parse_positive(var: &'static str, value: Option<String>, default: i64) -> Result<i64, ConfigError> {
    let Some(raw) = value else {
        return Ok(default);
    };
    match raw.parse::<i64>() {
        Ok(n) if n > 0 => Ok(n),
        Ok(_) => Err(ConfigError::Invalid {
            var,
            reason: "must be positive".to_string(),
        }),
        Err(e) => Err(ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        ApiConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(cfg.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(cfg.jwt_ttl, Duration::minutes(60));
        assert!(cfg.database_url.is_none());
        assert!(cfg.admin.is_none());
        assert_eq!(cfg.password_hash_iterations, Pbkdf2Hasher::DEFAULT_ITERATIONS);
    }

    #[test]
    fn reads_overrides() {
        let cfg = config(&[
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_TTL_MINUTES", "5"),
            ("DATABASE_URL", "postgres://localhost/courses"),
            ("ADMIN_EMAIL", "root@example.com"),
            ("ADMIN_PASSWORD", "correct horse"),
            ("PASSWORD_HASH_ITERATIONS", "1000"),
        ])
        .unwrap();

        assert_eq!(cfg.bind_addr.port(), 9000);
        assert_eq!(cfg.jwt_secret, "s3cret");
        assert_eq!(cfg.jwt_ttl, Duration::minutes(5));
        assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/courses"));
        assert_eq!(cfg.admin.unwrap().email, "root@example.com");
        assert_eq!(cfg.password_hash_iterations, 1000);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            config(&[("JWT_TTL_MINUTES", "0")]),
            Err(ConfigError::Invalid { var: "JWT_TTL_MINUTES", .. })
        ));
        for huge in ["525601", "100000000000000", "999999999999999999"] {
            assert!(matches!(
                config(&[("JWT_TTL_MINUTES", huge)]),
                Err(ConfigError::Invalid { var: "JWT_TTL_MINUTES", .. })
            ));
        }
        assert_eq!(config(&[("JWT_TTL_MINUTES", "525600")]).unwrap().jwt_ttl, Duration::days(365));
        assert!(matches!(
            config(&[("PASSWORD_HASH_ITERATIONS", "4000000000")]),
            Err(ConfigError::Invalid { var: "PASSWORD_HASH_ITERATIONS", .. })
        ));
        assert!(matches!(
            config(&[("BIND_ADDR", "nowhere")]),
            Err(ConfigError::Invalid { var: "BIND_ADDR", .. })
        ));
        assert_eq!(
            config(&[("ADMIN_EMAIL", "root@example.com")]).unwrap_err(),
            ConfigError::IncompleteAdminSeed
        );
    }

    #[test]
    fn debug_hides_secrets() {
        let cfg = config(&[("JWT_SECRET", "s3cret"), ("ADMIN_EMAIL", "a@b.c"), ("ADMIN_PASSWORD", "hunter22")]).unwrap();
        let shown = format!("{cfg:?}");
        assert!(!shown.contains("s3cret"));
        assert!(!shown.contains("hunter22"));
    }
}
