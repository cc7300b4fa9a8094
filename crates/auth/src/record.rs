use super::*;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Version;
use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;

const ALGORITHM: &str = "argon2id";

/// A decoded credential hash.
///
/// Encodes as `$argon2id$v=19$m=<memory>,t=<iterations>,p=<parallelism>$<salt>$<key>`
/// with unpadded standard base64 for salt and key. Everything needed to
/// recompute the key travels inside the string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    version: Version,
    memory: u32,
    iterations: u32,
    parallelism: u32,
    salt: Vec<u8>,
    key: Vec<u8>,
}

impl Record {
    /// Derives a fresh record for `password` under `params` and `salt`.
    pub fn derive(password: &[u8], params: &Params, salt: Vec<u8>) -> Result<Self, PasswordError> {
        let mut record = Self {
            version: Version::V0x13,
            memory: params.memory(),
            iterations: params.iterations(),
            parallelism: params.parallelism(),
            salt,
            key: vec![0u8; params.key_length()],
        };
        record.key = record
            .kdf(password)
            .map_err(|e| PasswordError::InvalidParams {
                reason: e.to_string(),
            })?;
        Ok(record)
    }

    /// A record under `params` that no password matches.
    ///
    /// Checking a password against it costs one derivation at policy costs,
    /// the same as checking against a current stored record.
    pub fn decoy(params: &Params) -> Self {
        Self {
            version: Version::V0x13,
            memory: params.memory(),
            iterations: params.iterations(),
            parallelism: params.parallelism(),
            salt: vec![0u8; params.salt_length()],
            key: vec![0u8; params.key_length()],
        }
    }

    /// Recomputes the key with the embedded costs and compares in fixed time.
    pub fn matches(&self, password: &[u8]) -> Result<bool, PasswordError> {
        let derived = self
            .kdf(password)
            .map_err(|_| PasswordError::InvalidRecordFormat {
                reason: "embedded costs rejected by argon2",
            })?;
        Ok(ring::constant_time::verify_slices_are_equal(&derived, &self.key).is_ok())
    }

    /// True when this record was not produced under `params`.
    pub fn stale(&self, params: &Params) -> bool {
        self.version != Version::V0x13
            || self.memory != params.memory()
            || self.iterations != params.iterations()
            || self.parallelism != params.parallelism()
            || self.salt.len() != params.salt_length()
            || self.key.len() != params.key_length()
    }

    pub fn memory(&self) -> u32 {
        self.memory
    }
    pub fn iterations(&self) -> u32 {
        self.iterations
    }
    pub fn parallelism(&self) -> u32 {
        self.parallelism
    }
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    fn kdf(&self, password: &[u8]) -> Result<Vec<u8>, argon2::Error> {
        let params = argon2::Params::new(
            self.memory,
            self.iterations,
            self.parallelism,
            Some(self.key.len()),
        )?;
        let ref mut out = vec![0u8; self.key.len()];
        Argon2::new(Algorithm::Argon2id, self.version, params).hash_password_into(
            password,
            &self.salt,
            out,
        )?;
        Ok(std::mem::take(out))
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "${}$v={}$m={},t={},p={}${}${}",
            ALGORITHM,
            self.version as u32,
            self.memory,
            self.iterations,
            self.parallelism,
            STANDARD_NO_PAD.encode(&self.salt),
            STANDARD_NO_PAD.encode(&self.key),
        )
    }
}

impl std::str::FromStr for Record {
    type Err = PasswordError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| PasswordError::InvalidRecordFormat { reason };
        let fields = s.split('$').collect::<Vec<&str>>();
        let [lead, algorithm, version, costs, salt, key] = fields.as_slice() else {
            return Err(invalid("expected six '$'-separated fields"));
        };
        if !lead.is_empty() {
            return Err(invalid("record must begin with '$'"));
        }
        if *algorithm != ALGORITHM {
            return Err(invalid("unsupported algorithm"));
        }
        let version = version
            .strip_prefix("v=")
            .and_then(|v| v.parse::<u32>().ok())
            .and_then(|v| Version::try_from(v).ok())
            .ok_or_else(|| invalid("unsupported version"))?;
        let (memory, iterations, parallelism) =
            Self::costs(costs).ok_or_else(|| invalid("unparsable cost parameters"))?;
        if memory > tsk_core::ARGON_MEMORY_CEILING {
            return Err(invalid("memory cost above ceiling"));
        }
        let salt = STANDARD_NO_PAD
            .decode(salt)
            .map_err(|_| invalid("salt is not base64"))?;
        let key = STANDARD_NO_PAD
            .decode(key)
            .map_err(|_| invalid("key is not base64"))?;
        if salt.len() < argon2::MIN_SALT_LEN {
            return Err(invalid("salt too short"));
        }
        argon2::Params::new(memory, iterations, parallelism, Some(key.len()))
            .map_err(|_| invalid("cost parameters out of range"))?;
        Ok(Self {
            version,
            memory,
            iterations,
            parallelism,
            salt,
            key,
        })
    }
}

impl Record {
    /// Parses `m=<u32>,t=<u32>,p=<u32>` in exactly that order.
    fn costs(field: &str) -> Option<(u32, u32, u32)> {
        let mut parts = field.split(',');
        let m = parts.next()?.strip_prefix("m=")?.parse().ok()?;
        let t = parts.next()?.strip_prefix("t=")?.parse().ok()?;
        let p = parts.next()?.strip_prefix("p=")?.parse().ok()?;
        parts.next().is_none().then_some((m, t, p))
    }
}
