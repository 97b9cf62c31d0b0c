//! Argon2id implementation of the [`PasswordHasher`] port.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString, rand_core::OsRng,
    },
};
use tracing::debug;

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Hashes passwords with Argon2id using a fresh random salt per hash.
///
/// Hashes are stored in PHC string form, so the parameters travel with
/// each hash and stronger defaults can be adopted without invalidating
/// existing accounts.
#[derive(Clone, Default)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Use explicit Argon2 parameters instead of the library defaults.
    #[must_use]
    pub fn with_argon2(argon2: Argon2<'static>) -> Self {
        Self { argon2 }
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| PasswordHashError::hashing(err.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let parsed =
            PasswordHash::new(hash).map_err(|err| PasswordHashError::malformed_hash(err.to_string()))?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(err) => {
                debug!(error = %err, "password verification failed");
                Err(PasswordHashError::malformed_hash(err.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::{Algorithm, Params, Version};
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Argon2PasswordHasher {
        let params = Params::new(8 * 1024, 1, 1, None).expect("valid params");
        Argon2PasswordHasher::with_argon2(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    #[rstest]
    fn hashes_are_salted(hasher: Argon2PasswordHasher) {
        let first = hasher.hash("Str0ng!Pass").expect("hash");
        let second = hasher.hash("Str0ng!Pass").expect("hash");

        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$"));
    }

    #[rstest]
    #[case("Str0ng!Pass", true)]
    #[case("str0ng!pass", false)]
    #[case("", false)]
    fn verifies_against_stored_hash(
        hasher: Argon2PasswordHasher,
        #[case] attempt: &str,
        #[case] expected: bool,
    ) {
        let stored = hasher.hash("Str0ng!Pass").expect("hash");
        assert_eq!(hasher.verify(attempt, &stored), Ok(expected));
    }

    #[rstest]
    fn rejects_malformed_hashes(hasher: Argon2PasswordHasher) {
        let result = hasher.verify("Str0ng!Pass", "not-a-phc-string");
        assert!(matches!(result, Err(PasswordHashError::MalformedHash { .. })));
    }
}
