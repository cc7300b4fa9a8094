use tsk_auth::Params;
use tsk_core::Secret;

/// Startup configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required variable {key}")]
    Missing { key: &'static str },
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Process configuration, read once at startup and immutable afterwards.
#[derive(Debug, Clone)]
pub struct Settings {
    env: String,
    bind: String,
    database: Database,
    secret: Secret,
    ttl: std::time::Duration,
    params: Params,
}

#[derive(Clone)]
struct Database {
    host: String,
    port: u16,
    user: String,
    password: Secret,
    name: String,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password)
            .field("name", &self.name)
            .finish()
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .map(Secret::from)
            .ok_or(ConfigError::Missing { key: "JWT_SECRET" })?;
        let ttl = match lookup("TOKEN_TTL") {
            None => tsk_core::TOKEN_TTL,
            Some(s) => tsk_core::duration(&s).ok_or_else(|| ConfigError::Invalid {
                key: "TOKEN_TTL",
                reason: format!("'{}' is not a duration like 30s, 15m, 1h, 1d", s),
            })?,
        };
        if ttl > tsk_core::TOKEN_TTL_CEILING {
            return Err(ConfigError::Invalid {
                key: "TOKEN_TTL",
                reason: format!(
                    "{:?} exceeds the ceiling of {:?}",
                    ttl,
                    tsk_core::TOKEN_TTL_CEILING
                ),
            });
        }
        let params = Params::new(
            number(&lookup, "ARGON_MEMORY", tsk_core::ARGON_MEMORY)?,
            number(&lookup, "ARGON_ITERATIONS", tsk_core::ARGON_ITERATIONS)?,
            number(&lookup, "ARGON_PARALLELISM", tsk_core::ARGON_PARALLELISM)?,
            number(&lookup, "ARGON_SALT_LENGTH", tsk_core::ARGON_SALT_LENGTH)?,
            number(&lookup, "ARGON_KEY_LENGTH", tsk_core::ARGON_KEY_LENGTH)?,
        )
        .map_err(|e| ConfigError::Invalid {
            key: "ARGON_*",
            reason: e.to_string(),
        })?;
        Ok(Self {
            env: text("ENV", "dev"),
            bind: text("BIND_ADDR", "0.0.0.0:8080"),
            database: Database {
                host: text("DB_HOST", "localhost"),
                port: number(&lookup, "DB_PORT", 5432)?,
                user: text("DB_USER", "postgres"),
                password: Secret::from(text("DB_PASSWORD", "password")),
                name: text("DB_NAME", "todoapp"),
            },
            secret,
            ttl,
            params,
        })
    }

    pub fn level(&self) -> log::LevelFilter {
        match self.env.as_str() {
            "dev" => log::LevelFilter::Debug,
            _ => log::LevelFilter::Info,
        }
    }
    pub fn bind(&self) -> &str {
        &self.bind
    }
    pub fn secret(&self) -> &Secret {
        &self.secret
    }
    pub fn ttl(&self) -> std::time::Duration {
        self.ttl
    }
    pub fn params(&self) -> &Params {
        &self.params
    }
    /// libpq key/value connection string.
    pub fn database_url(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={}",
            self.database.host,
            self.database.port,
            self.database.user,
            String::from_utf8_lossy(self.database.password.expose()),
            self.database.name,
        )
    }
}

fn number<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(s) => s.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: format!("'{}': {}", s, e),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_fill_everything_but_the_secret() {
        let settings = settings(&[("JWT_SECRET", "s3cret")]).unwrap();
        assert_eq!(settings.bind(), "0.0.0.0:8080");
        assert_eq!(settings.ttl(), std::time::Duration::from_secs(3600));
        assert_eq!(settings.params(), &Params::default());
        assert_eq!(settings.level(), log::LevelFilter::Debug);
        assert_eq!(
            settings.database_url(),
            "host=localhost port=5432 user=postgres password=password dbname=todoapp"
        );
    }
    #[test]
    fn secret_is_required() {
        assert!(matches!(
            settings(&[]),
            Err(ConfigError::Missing { key: "JWT_SECRET" })
        ));
        assert!(matches!(
            settings(&[("JWT_SECRET", "")]),
            Err(ConfigError::Missing { key: "JWT_SECRET" })
        ));
    }
    #[test]
    fn overrides_apply() {
        let settings = settings(&[
            ("JWT_SECRET", "s3cret"),
            ("ENV", "prod"),
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("TOKEN_TTL", "15m"),
            ("ARGON_MEMORY", "1024"),
            ("ARGON_ITERATIONS", "1"),
            ("ARGON_PARALLELISM", "1"),
            ("DB_PORT", "6543"),
        ])
        .unwrap();
        assert_eq!(settings.level(), log::LevelFilter::Info);
        assert_eq!(settings.bind(), "127.0.0.1:9000");
        assert_eq!(settings.ttl(), std::time::Duration::from_secs(900));
        assert_eq!(settings.params().memory(), 1024);
        assert_eq!(settings.params().iterations(), 1);
        assert!(settings.database_url().contains("port=6543"));
    }
    #[test]
    fn garbage_is_rejected_not_defaulted() {
        assert!(matches!(
            settings(&[("JWT_SECRET", "s"), ("DB_PORT", "eighty")]),
            Err(ConfigError::Invalid { key: "DB_PORT", .. })
        ));
        assert!(matches!(
            settings(&[("JWT_SECRET", "s"), ("TOKEN_TTL", "forever")]),
            Err(ConfigError::Invalid { key: "TOKEN_TTL", .. })
        ));
        assert!(matches!(
            settings(&[("JWT_SECRET", "s"), ("ARGON_ITERATIONS", "0")]),
            Err(ConfigError::Invalid { key: "ARGON_*", .. })
        ));
    }
    #[test]
    fn oversized_ttl_rejected() {
        for ttl in ["18446744073709551615s", "9223372036854775807s", "366d"] {
            assert!(matches!(
                settings(&[("JWT_SECRET", "s"), ("TOKEN_TTL", ttl)]),
                Err(ConfigError::Invalid { key: "TOKEN_TTL", .. })
            ));
        }
        let settings = settings(&[("JWT_SECRET", "s"), ("TOKEN_TTL", "365d")]).unwrap();
        assert_eq!(settings.ttl(), tsk_core::TOKEN_TTL_CEILING);
    }
    #[test]
    fn debug_redacts_credentials() {
        let settings = settings(&[("JWT_SECRET", "s3cret"), ("DB_PASSWORD", "hunter2")]).unwrap();
        let printed = format!("{:?}", settings);
        assert!(!printed.contains("s3cret"));
        assert!(!printed.contains("hunter2"));
    }
}
