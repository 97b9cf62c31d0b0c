//! Registration, sign-in, and token verification.
//!
//! Implements the [`AuthService`] driving port over a [`UserRepository`],
//! a [`PasswordHasher`], and a [`TokenService`]. Hashing runs on the
//! blocking pool because adaptive hashes are deliberately slow.
//!
//! Sign-in with an unknown email still verifies against a decoy hash, so
//! response time does not reveal which emails are registered.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{
    AuthService, PasswordHashError, PasswordHasher, TokenError, TokenService, UserRepository,
};
use crate::domain::resource_service::map_persistence_error;
use crate::domain::{
    AuthSession, AuthenticatedUser, Error, LoginCredentials, NewUser, Registration, Resource, User,
    UserStatus,
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";
const DECOY_PASSWORD: &str = "decoy-password-never-issued";

/// Account use cases backed by injected adapters.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
    decoy_hash: Arc<OnceLock<String>>,
}

impl AccountService {
    /// Wire the service to its adapters.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            decoy_hash: Arc::new(OnceLock::new()),
        }
    }

    fn map_hash_error(error: PasswordHashError) -> Error {
        Error::internal(format!("password hashing failed: {error}"))
    }

    fn map_token_error(error: TokenError) -> Error {
        match error {
            TokenError::Signing { message } => {
                Error::internal(format!("token signing failed: {message}"))
            }
            TokenError::Expired => Error::unauthorized("Token has expired"),
            TokenError::Malformed | TokenError::InvalidSignature => {
                Error::unauthorized("Invalid or expired token")
            }
        }
    }

    async fn run_hasher<T, F>(&self, work: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce(&dyn PasswordHasher) -> Result<T, PasswordHashError> + Send + 'static,
    {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || work(hasher.as_ref()))
            .await
            .map_err(|err| Error::internal(format!("hashing task failed: {err}")))?
            .map_err(Self::map_hash_error)
    }

    /// Spend one verification on a throwaway hash, computed on first use.
    async fn verify_decoy(&self, password: Zeroizing<String>) {
        let decoy = Arc::clone(&self.decoy_hash);
        let outcome = self
            .run_hasher(move |hasher| {
                let hash = match decoy.get() {
                    Some(hash) => hash.as_str(),
                    None => {
                        let fresh = hasher.hash(DECOY_PASSWORD)?;
                        decoy.get_or_init(|| fresh).as_str()
                    }
                };
                hasher.verify(password.as_str(), hash)
            })
            .await;
        if let Err(err) = outcome {
            warn!(error = %err, "decoy password verification failed");
        }
    }

    fn open_session(&self, user: User) -> Result<AuthSession, Error> {
        let token = self.tokens.issue(&user).map_err(Self::map_token_error)?;
        Ok(AuthSession::new(token, user))
    }
}

#[async_trait]
impl AuthService for AccountService {
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error> {
        let Registration {
            username,
            full_name,
            email,
            password,
            role,
        } = registration;

        let existing = self
            .users
            .find_by_email(&email)
            .await
            .map_err(|err| map_persistence_error(User::NAME, err))?;
        if existing.is_some() {
            return Err(Error::conflict("User with this email already exists"));
        }

        let password_hash = self
            .run_hasher(move |hasher| hasher.hash(password.as_str()))
            .await?;

        let user = self
            .users
            .create(&NewUser {
                username,
                full_name,
                email,
                password_hash,
                role,
                status: UserStatus::Active,
            })
            .await
            .map_err(|err| map_persistence_error(User::NAME, err))?;
        info!(user_id = user.id, role = %user.role, "user registered");
        self.open_session(user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error> {
        let Some(user) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(|err| map_persistence_error(User::NAME, err))?
        else {
            self.verify_decoy(Zeroizing::new(credentials.password().to_owned()))
                .await;
            warn!("login rejected: unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let password = Zeroizing::new(credentials.password().to_owned());
        let stored = user.password_hash.clone();
        let verified = self
            .run_hasher(move |hasher| hasher.verify(password.as_str(), &stored))
            .await?;
        if !verified {
            warn!(user_id = user.id, "login rejected: wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        if user.status != UserStatus::Active {
            warn!(user_id = user.id, "login rejected: inactive account");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        info!(user_id = user.id, "user logged in");
        self.open_session(user)
    }

    fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, Error> {
        self.tokens.verify(token).map_err(|err| {
            warn!(error = %err, "bearer token rejected");
            Self::map_token_error(err)
        })
    }

    async fn current_user(&self, caller: AuthenticatedUser) -> Result<User, Error> {
        self.users
            .find_by_id(caller.user_id)
            .await
            .map_err(|err| map_persistence_error(User::NAME, err))?
            .ok_or_else(|| Error::not_found("user not found"))
    }
}
