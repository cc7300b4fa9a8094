use super::*;
use tsk_core::ARGON_ITERATIONS;
use tsk_core::ARGON_KEY_LENGTH;
use tsk_core::ARGON_MEMORY;
use tsk_core::ARGON_PARALLELISM;
use tsk_core::ARGON_SALT_LENGTH;

/// Argon2id cost policy applied to newly hashed passwords.
///
/// Verification never consults this; stored records carry their own costs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Params {
    kdf: argon2::Params,
    salt_length: usize,
}

impl Params {
    /// Validates the costs against Argon2's bounds.
    pub fn new(
        memory: u32,
        iterations: u32,
        parallelism: u32,
        salt_length: usize,
        key_length: usize,
    ) -> Result<Self, PasswordError> {
        if salt_length < argon2::MIN_SALT_LEN {
            return Err(PasswordError::InvalidParams {
                reason: format!(
                    "salt length {} is below the minimum of {}",
                    salt_length,
                    argon2::MIN_SALT_LEN
                ),
            });
        }
        if memory > tsk_core::ARGON_MEMORY_CEILING {
            return Err(PasswordError::InvalidParams {
                reason: format!(
                    "memory cost {} KiB exceeds the ceiling of {} KiB",
                    memory,
                    tsk_core::ARGON_MEMORY_CEILING
                ),
            });
        }
        argon2::Params::new(memory, iterations, parallelism, Some(key_length))
            .map(|kdf| Self { kdf, salt_length })
            .map_err(|e| PasswordError::InvalidParams {
                reason: e.to_string(),
            })
    }
    pub fn memory(&self) -> u32 {
        self.kdf.m_cost()
    }
    pub fn iterations(&self) -> u32 {
        self.kdf.t_cost()
    }
    pub fn parallelism(&self) -> u32 {
        self.kdf.p_cost()
    }
    pub fn salt_length(&self) -> usize {
        self.salt_length
    }
    pub fn key_length(&self) -> usize {
        self.kdf.output_len().unwrap_or(ARGON_KEY_LENGTH)
    }
}

impl Default for Params {
    fn default() -> Self {
        Self::new(
            ARGON_MEMORY,
            ARGON_ITERATIONS,
            ARGON_PARALLELISM,
            ARGON_SALT_LENGTH,
            ARGON_KEY_LENGTH,
        )
        .expect("default argon2 parameters")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn defaults_match_policy() {
        let params = Params::default();
        assert_eq!(params.memory(), 65536);
        assert_eq!(params.iterations(), 3);
        assert_eq!(params.parallelism(), 2);
        assert_eq!(params.salt_length(), 16);
        assert_eq!(params.key_length(), 32);
    }
    #[test]
    fn short_salts_rejected() {
        assert!(matches!(
            Params::new(1024, 1, 1, 4, 32),
            Err(PasswordError::InvalidParams { .. })
        ));
    }
    #[test]
    fn argon_bounds_enforced() {
        assert!(Params::new(1024, 0, 1, 16, 32).is_err());
        assert!(Params::new(1024, 1, 0, 16, 32).is_err());
        assert!(Params::new(1024, 1, 1, 16, 2).is_err());
        assert!(Params::new(8, 1, 2, 16, 32).is_err());
        assert!(Params::new(1024, 1, 1, 16, 32).is_ok());
    }
    #[test]
    fn memory_ceiling_enforced() {
        let ceiling = tsk_core::ARGON_MEMORY_CEILING;
        assert!(Params::new(ceiling, 1, 1, 16, 32).is_ok());
        assert!(matches!(
            Params::new(ceiling + 1, 1, 1, 16, 32),
            Err(PasswordError::InvalidParams { .. })
        ));
    }
}
