use chrono::{Duration, Utc};
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, Session, User, sessions,
    users::{self, check_password, hash_password, verify_password},
};

use super::{Engine, with_tx};

impl Engine {
    /// Create a user with a freshly salted password hash.
    pub async fn create_user(&self, username: &str, password: &str) -> ResultEngine<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(EngineError::InvalidName(
                "username must not be empty".to_string(),
            ));
        }
        check_password(password)?;

        with_tx!(self, |db_tx| {
            if users::Entity::find_by_id(username.to_string())
                .one(&db_tx)
                .await?
                .is_some()
            {
                return Err(EngineError::ExistingKey(username.to_string()));
            }

            let salt = Uuid::new_v4().simple().to_string();
            let model = users::ActiveModel {
                username: ActiveValue::Set(username.to_string()),
                password_hash: ActiveValue::Set(hash_password(&salt, password)),
                salt: ActiveValue::Set(salt),
            };
            let model = model.insert(&db_tx).await?;
            Ok(User::from(model))
        })
    }

    /// Check a username/password pair.
    pub async fn authenticate(&self, username: &str, password: &str) -> ResultEngine<User> {
        if username.is_empty() || password.is_empty() {
            return Err(EngineError::Unauthorized);
        }

        let model = users::Entity::find_by_id(username.to_string())
            .one(&self.database)
            .await?
            .ok_or(EngineError::Unauthorized)?;
        if !verify_password(&model, password) {
            tracing::debug!(username, "rejected password");
            return Err(EngineError::Unauthorized);
        }
        Ok(User::from(model))
    }

    /// Authenticate and open a session valid for `ttl`.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        ttl: Duration,
    ) -> ResultEngine<Session> {
        let user = self.authenticate(username, password).await?;
        let now = Utc::now();
        let model = sessions::ActiveModel {
            token: ActiveValue::Set(Uuid::new_v4().simple().to_string()),
            username: ActiveValue::Set(user.username),
            created_at: ActiveValue::Set(now),
            expires_at: ActiveValue::Set(now + ttl),
        };
        let model = model.insert(&self.database).await?;
        tracing::info!(username = %model.username, "session opened");
        Ok(Session::from(model))
    }

    /// Resolve a session token into its user.
    ///
    /// Expired sessions are deleted and rejected.
    pub async fn session_user(&self, token: &str) -> ResultEngine<User> {
        let session = sessions::Entity::find_by_id(token.to_string())
            .one(&self.database)
            .await?
            .map(Session::from)
            .ok_or(EngineError::Unauthorized)?;

        if session.is_expired(Utc::now()) {
            sessions::Entity::delete_by_id(session.token)
                .exec(&self.database)
                .await?;
            return Err(EngineError::Unauthorized);
        }

        Ok(User {
            username: session.username,
        })
    }

    /// Close a session. Unknown tokens are ignored.
    pub async fn logout(&self, token: &str) -> ResultEngine<()> {
        sessions::Entity::delete_by_id(token.to_string())
            .exec(&self.database)
            .await?;
        Ok(())
    }

    /// Delete every expired session, returning how many were removed.
    pub async fn purge_expired_sessions(&self) -> ResultEngine<u64> {
        let expired: Vec<String> = sessions::Entity::find()
            .all(&self.database)
            .await?
            .into_iter()
            .map(Session::from)
            .filter(|session| session.is_expired(Utc::now()))
            .map(|session| session.token)
            .collect();
        if expired.is_empty() {
            return Ok(0);
        }

        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::Token.is_in(expired))
            .exec(&self.database)
            .await?;
        Ok(result.rows_affected)
    }
}
