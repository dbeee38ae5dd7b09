//! Login session repository.
//!
//! A session row's ID doubles as the bearer token. Expiry is enforced at
//! lookup time; `purge_expired_sessions` exists for housekeeping.

use chrono::{Duration, Utc};

use snag_core::entities::AuthSession;
use snag_core::identity::Identity;
use snag_core::ids::PREFIX_SESSION;

use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, parse_enum};
use crate::service::SnagService;

impl SnagService {
    /// Create a session for `user_id` valid for `ttl_hours`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on SQL failure.
    pub async fn create_session(
        &self,
        user_id: &str,
        ttl_hours: i64,
    ) -> Result<AuthSession, DatabaseError> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(ttl_hours);
        let id = self.db().generate_id(PREFIX_SESSION).await?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO auth_sessions (id, user_id, created_at, expires_at)
                 VALUES (?1, ?2, ?3, ?4)",
                libsql::params![
                    id.as_str(),
                    user_id,
                    now.to_rfc3339(),
                    expires_at.to_rfc3339()
                ],
            )
            .await?;

        Ok(AuthSession {
            id,
            user_id: user_id.to_string(),
            created_at: now,
            expires_at,
        })
    }

    /// Resolve a session token to the identity of its user.
    ///
    /// Returns `None` for unknown tokens and for expired sessions; expired
    /// rows are deleted on the way out.
    pub async fn identity_for_session(
        &self,
        token: &str,
    ) -> Result<Option<Identity>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT s.expires_at, u.id, u.email, u.role
                 FROM auth_sessions s
                 JOIN users u ON u.id = s.user_id
                 WHERE s.id = ?1",
                [token],
            )
            .await?;
        let Some(row) = rows.next().await? else {
            return Ok(None);
        };

        let expires_at = parse_datetime(&row.get::<String>(0)?)?;
        if expires_at <= Utc::now() {
            self.delete_session(token).await?;
            return Ok(None);
        }

        Ok(Some(Identity {
            user_id: row.get(1)?,
            email: row.get(2)?,
            role: parse_enum(&row.get::<String>(3)?)?,
        }))
    }

    /// Delete a session (logout). Deleting an unknown token is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on SQL failure.
    pub async fn delete_session(&self, token: &str) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute("DELETE FROM auth_sessions WHERE id = ?1", [token])
            .await?;
        Ok(())
    }

    /// Remove all expired sessions. Returns the number deleted.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on SQL failure.
    pub async fn purge_expired_sessions(&self) -> Result<u64, DatabaseError> {
        let deleted = self
            .db()
            .conn()
            .execute(
                "DELETE FROM auth_sessions WHERE expires_at <= ?1",
                [Utc::now().to_rfc3339()],
            )
            .await?;
        if deleted > 0 {
            tracing::debug!(deleted, "purged expired sessions");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use snag_core::enums::Role;

    use crate::test_support::helpers::{seed_user, test_service};

    #[tokio::test]
    async fn session_resolves_to_identity() {
        let svc = test_service().await;
        let user = seed_user(&svc, "mgr@example.com", Role::Manager).await;

        let session = svc.create_session(&user.id, 72).await.unwrap();
        assert!(session.id.starts_with("ses-"));
        assert!(session.expires_at > session.created_at);

        let identity = svc
            .identity_for_session(&session.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(identity.user_id, user.id);
        assert_eq!(identity.email, "mgr@example.com");
        assert_eq!(identity.role, Role::Manager);
    }

    #[tokio::test]
    async fn unknown_token_resolves_to_none() {
        let svc = test_service().await;
        let identity = svc.identity_for_session("ses-deadbeef").await.unwrap();
        assert!(identity.is_none());
    }

    #[tokio::test]
    async fn expired_session_rejected_and_removed() {
        let svc = test_service().await;
        let user = seed_user(&svc, "eng@example.com", Role::Engineer).await;

        // Negative TTL puts expires_at in the past.
        let session = svc.create_session(&user.id, -1).await.unwrap();
        let identity = svc.identity_for_session(&session.id).await.unwrap();
        assert!(identity.is_none());

        // Row was deleted by the expiry check.
        let mut rows = svc
            .db()
            .conn()
            .query("SELECT COUNT(*) FROM auth_sessions", ())
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 0);
    }

    #[tokio::test]
    async fn logout_invalidates_token() {
        let svc = test_service().await;
        let user = seed_user(&svc, "obs@example.com", Role::Observer).await;
        let session = svc.create_session(&user.id, 72).await.unwrap();

        svc.delete_session(&session.id).await.unwrap();
        assert!(svc.identity_for_session(&session.id).await.unwrap().is_none());

        // Repeat logout is a no-op.
        svc.delete_session(&session.id).await.unwrap();
    }

    #[tokio::test]
    async fn purge_removes_only_expired() {
        let svc = test_service().await;
        let user = seed_user(&svc, "u@example.com", Role::Engineer).await;
        svc.create_session(&user.id, -1).await.unwrap();
        let live = svc.create_session(&user.id, 72).await.unwrap();

        let deleted = svc.purge_expired_sessions().await.unwrap();
        assert_eq!(deleted, 1);
        assert!(svc.identity_for_session(&live.id).await.unwrap().is_some());
    }
}
