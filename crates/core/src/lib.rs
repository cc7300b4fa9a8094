//! Core identifiers, policy constants, and runtime helpers for tasklist.
//!
//! This crate provides the foundational types and configuration defaults
//! used throughout the tasklist workspace.

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Unix timestamp in whole seconds.
pub type Timestamp = i64;

// ============================================================================
// TRAITS
// ============================================================================
/// Unique identifier trait for domain entities.
pub trait Unique<T = Self> {
    fn id(&self) -> ID<T>;
}

// ============================================================================
// IDENTITY TYPES
// ============================================================================
use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

/// Generic ID wrapper providing compile-time type safety over a
/// database-assigned `BIGSERIAL` key.
pub struct ID<T> {
    inner: i64,
    marker: PhantomData<T>,
}

impl<T> ID<T> {
    pub fn inner(&self) -> i64 {
        self.inner
    }
    /// Cast ID<T> to ID<U> while preserving the underlying key.
    pub fn cast<U>(self) -> ID<U> {
        ID {
            inner: self.inner,
            marker: PhantomData,
        }
    }
}

impl<T> From<ID<T>> for i64 {
    fn from(id: ID<T>) -> Self {
        id.inner()
    }
}
impl<T> From<i64> for ID<T> {
    fn from(inner: i64) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}

impl<T> Copy for ID<T> {}
impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Hash for ID<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl<T> serde::Serialize for ID<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(self.inner)
    }
}
impl<'de, T> serde::Deserialize<'de> for ID<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        i64::deserialize(deserializer).map(Self::from)
    }
}

// ============================================================================
// SECRETS
// ============================================================================
/// Opaque key material. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(Vec<u8>);

impl Secret {
    pub fn expose(&self) -> &[u8] {
        &self.0
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Secret {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}
impl From<&[u8]> for Secret {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl Debug for Secret {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secret(***)")
    }
}

// ============================================================================
// ARGON2ID HASHING POLICY
// Cost vs. latency trade-off; overridable at startup via ARGON_* variables.
// ============================================================================
/// Memory cost in KiB (64 MiB).
pub const ARGON_MEMORY: u32 = 64 * 1024;
/// Passes over memory.
pub const ARGON_ITERATIONS: u32 = 3;
/// Lanes computed in parallel.
pub const ARGON_PARALLELISM: u32 = 2;
/// Random salt length in bytes.
pub const ARGON_SALT_LENGTH: usize = 16;
/// Derived key length in bytes.
pub const ARGON_KEY_LENGTH: usize = 32;
/// Largest memory cost accepted from policy or from a stored record (1 GiB).
pub const ARGON_MEMORY_CEILING: u32 = 1024 * 1024;

// ============================================================================
// SESSION TOKENS
// ============================================================================
/// Default lifetime of an issued session token.
pub const TOKEN_TTL: std::time::Duration = std::time::Duration::from_secs(60 * 60);
/// Longest configurable token lifetime.
pub const TOKEN_TTL_CEILING: std::time::Duration = std::time::Duration::from_secs(365 * 86400);

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Current wall-clock time in unix seconds.
pub fn now() -> Timestamp {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as Timestamp)
        .unwrap_or_default()
}

/// Parse duration string like "30s", "5m", "2h", "1d" into Duration.
pub fn duration(s: &str) -> Option<std::time::Duration> {
    let s = s.trim();
    let unit = s.chars().last()?;
    let value: u64 = s[..s.len() - unit.len_utf8()].parse().ok()?;
    let scale = match unit {
        's' => 1,
        'm' => 60,
        'h' => 3600,
        'd' => 86400,
        _ => return None,
    };
    value.checked_mul(scale).map(std::time::Duration::from_secs)
}

/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, `level` to terminal.
#[cfg(feature = "server")]
pub fn log(level: log::LevelFilter) -> std::io::Result<()> {
    std::fs::create_dir_all("logs")?;
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", now()))?,
    );
    let term = simplelog::TermLogger::new(
        level,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).map_err(std::io::Error::other)
}

#[cfg(test)]
mod tests {
    use super::*;
    struct Thing;
    #[test]
    fn ids_compare_by_key() {
        let a = ID::<Thing>::from(42);
        let b = ID::<Thing>::from(42);
        assert_eq!(a, b);
        assert!(ID::<Thing>::from(7) < a);
        assert_eq!(i64::from(a), 42);
        assert_eq!(a.to_string(), "42");
    }
    #[test]
    fn ids_cast_across_markers() {
        struct Other;
        let id = ID::<Thing>::from(9).cast::<Other>();
        assert_eq!(id.inner(), 9);
    }
    #[test]
    fn durations_parse_units() {
        assert_eq!(duration("30s"), Some(std::time::Duration::from_secs(30)));
        assert_eq!(duration("15m"), Some(std::time::Duration::from_secs(900)));
        assert_eq!(duration(" 1h "), Some(std::time::Duration::from_secs(3600)));
        assert_eq!(duration("2d"), Some(std::time::Duration::from_secs(172800)));
        assert_eq!(duration("1w"), None);
        assert_eq!(duration("h"), None);
        assert_eq!(duration(""), None);
        assert_eq!(duration("1é"), None);
    }
    #[test]
    fn secrets_never_print() {
        let secret = Secret::from(String::from("hunter2"));
        assert_eq!(format!("{:?}", secret), "Secret(***)");
        assert_eq!(secret.expose(), b"hunter2");
        assert_eq!(secret.len(), 7);
    }
    #[test]
    fn clock_is_past_epoch() {
        assert!(now() > 1_600_000_000);
    }
}
