//! Staff accounts and the roles that gate catalogue mutations.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error returned when a role or status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Role outside `admin`, `pharmacist`, and `cashier`.
    UnknownRole(String),
    /// Status outside `active` and `inactive`.
    UnknownStatus(String),
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownRole(role) => write!(f, "unknown role: {role}"),
            Self::UnknownStatus(status) => write!(f, "unknown user status: {status}"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Staff role stored on each account and embedded in access tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including the staff directory.
    Admin,
    /// May maintain the catalogue.
    Pharmacist,
    /// Read-only catalogue access; the role given to self-registered staff.
    #[default]
    Cashier,
}

impl Role {
    /// Canonical lowercase form used in storage and tokens.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Pharmacist => "pharmacist",
            Self::Cashier => "cashier",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "pharmacist" => Ok(Self::Pharmacist),
            "cashier" => Ok(Self::Cashier),
            other => Err(UserValidationError::UnknownRole(other.to_owned())),
        }
    }
}

/// Whether an account may sign in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// The account may authenticate.
    #[default]
    Active,
    /// The account is disabled.
    Inactive,
}

impl UserStatus {
    /// Canonical lowercase form used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl FromStr for UserStatus {
    type Err = UserValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(UserValidationError::UnknownStatus(other.to_owned())),
        }
    }
}

/// A staff account.
///
/// The password hash never leaves the process: it is skipped when the user
/// is serialised into a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct User {
    /// Storage-assigned identifier.
    pub id: i64,
    /// Unique login handle.
    pub username: String,
    /// Display name.
    pub full_name: String,
    /// Unique contact address used to sign in.
    pub email: String,
    /// Salted password hash.
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub password_hash: String,
    /// Access level.
    pub role: Role,
    /// Whether the account may sign in.
    pub status: UserStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Attributes of an account about to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Unique login handle.
    pub username: String,
    /// Display name.
    pub full_name: String,
    /// Unique contact address.
    pub email: String,
    /// Salted password hash, never the plaintext.
    pub password_hash: String,
    /// Access level.
    pub role: Role,
    /// Initial account status.
    pub status: UserStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("admin", Role::Admin)]
    #[case("pharmacist", Role::Pharmacist)]
    #[case("cashier", Role::Cashier)]
    fn parses_known_roles(#[case] raw: &str, #[case] expected: Role) {
        assert_eq!(raw.parse::<Role>(), Ok(expected));
        assert_eq!(expected.as_str(), raw);
    }

    #[rstest]
    #[case("Admin")]
    #[case("manager")]
    #[case("")]
    fn rejects_unknown_roles(#[case] raw: &str) {
        assert!(matches!(
            raw.parse::<Role>(),
            Err(UserValidationError::UnknownRole(_))
        ));
    }

    #[rstest]
    fn default_role_is_cashier() {
        assert_eq!(Role::default(), Role::Cashier);
    }

    #[rstest]
    fn serialized_user_omits_password_hash() {
        let now = Utc::now();
        let user = User {
            id: 7,
            username: "ada".to_owned(),
            full_name: "Ada Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            password_hash: "$argon2id$secret".to_owned(),
            role: Role::Pharmacist,
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&user).expect("serialize user");
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["role"], "pharmacist");
        assert_eq!(value["status"], "active");
    }
}
