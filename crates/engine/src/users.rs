//! Users and password hashing.

use sea_orm::entity::prelude::*;
use sha2::{Digest, Sha256};

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub password_hash: String,
    pub salt: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::sessions::Entity")]
    Sessions,
}

impl Related<super::sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// An authenticated user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub username: String,
}

impl From<Model> for User {
    fn from(value: Model) -> Self {
        Self {
            username: value.username,
        }
    }
}

/// Reject passwords no user could be created with.
pub fn check_password(password: &str) -> ResultEngine<()> {
    if password.trim().is_empty() {
        return Err(EngineError::InvalidName(
            "password must not be empty".to_string(),
        ));
    }
    if password.chars().any(char::is_control) {
        return Err(EngineError::InvalidName(
            "password must not contain control characters".to_string(),
        ));
    }
    Ok(())
}

/// Salted SHA-256 of `password`, hex encoded.
pub(crate) fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Compare without short-circuiting on the first differing byte.
pub(crate) fn verify_password(model: &Model, password: &str) -> bool {
    let candidate = hash_password(&model.salt, password);
    let expected = model.password_hash.as_bytes();
    let candidate = candidate.as_bytes();
    if expected.len() != candidate.len() {
        return false;
    }
    expected
        .iter()
        .zip(candidate)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(password: &str) -> Model {
        Model {
            username: "alice".to_string(),
            password_hash: hash_password("pepper", password),
            salt: "pepper".to_string(),
        }
    }

    #[test]
    fn blank_or_control_passwords_are_rejected() {
        assert!(check_password("secret").is_ok());
        assert!(check_password("two words").is_ok());
        assert!(check_password("").is_err());
        assert!(check_password("   ").is_err());
        assert!(check_password("tab\there").is_err());
    }

    #[test]
    fn hash_depends_on_salt() {
        assert_ne!(hash_password("a", "secret"), hash_password("b", "secret"));
        assert_eq!(hash_password("a", "secret").len(), 64);
    }

    #[test]
    fn verify_accepts_only_the_right_password() {
        let user = model("secret");
        assert!(verify_password(&user, "secret"));
        assert!(!verify_password(&user, "Secret"));
        assert!(!verify_password(&user, ""));
    }
}
