//! User repository: account creation, lookup, listing.
//!
//! Accounts are created by the one-time bootstrap endpoint (or seeded in
//! tests) and are immutable afterwards; there is no update path.

use chrono::Utc;

use snag_core::entities::User;
use snag_core::enums::Role;
use snag_core::ids::PREFIX_USER;
use snag_core::responses::UserPublic;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum};
use crate::service::SnagService;

const SELECT_COLS: &str = "id, email, name, password_hash, role, created_at";

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        name: get_opt_string(row, 2)?,
        password_hash: row.get(3)?,
        role: parse_enum(&row.get::<String>(4)?)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl SnagService {
    /// Create a user account with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on SQL failure (including a duplicate email,
    /// which trips the UNIQUE constraint).
    pub async fn create_user(
        &self,
        email: &str,
        name: Option<&str>,
        password_hash: &str,
        role: Role,
    ) -> Result<User, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_USER).await?;
        let email = email.trim().to_ascii_lowercase();

        self.db()
            .conn()
            .execute(
                "INSERT INTO users (id, email, name, password_hash, role, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                libsql::params![
                    id.as_str(),
                    email.as_str(),
                    name,
                    password_hash,
                    role.as_str(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok(User {
            id,
            email,
            name: name.map(String::from),
            password_hash: password_hash.to_string(),
            role,
            created_at: now,
        })
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the user does not exist.
    pub async fn get_user(&self, id: &str) -> Result<User, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM users WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_user(&row)
    }

    /// Look a user up by email (normalized to lowercase). `None` when absent.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let email = email.trim().to_ascii_lowercase();
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM users WHERE email = ?1"),
                [email.as_str()],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    /// Total number of accounts. Zero means the bootstrap has not run yet.
    pub async fn count_users(&self) -> Result<i64, DatabaseError> {
        let mut rows = self.db().conn().query("SELECT COUNT(*) FROM users", ()).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }

    /// List all accounts (public fields only), for assignee pickers.
    pub async fn list_users(&self) -> Result<Vec<UserPublic>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, email, name, role, created_at FROM users ORDER BY email",
                (),
            )
            .await?;

        let mut users = Vec::new();
        while let Some(row) = rows.next().await? {
            users.push(UserPublic {
                id: row.get(0)?,
                email: row.get(1)?,
                name: get_opt_string(&row, 2)?,
                role: parse_enum(&row.get::<String>(3)?)?,
                created_at: parse_datetime(&row.get::<String>(4)?)?,
            });
        }
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::test_service;

    #[tokio::test]
    async fn create_user_roundtrip() {
        let svc = test_service().await;

        let user = svc
            .create_user("Admin@Example.com", Some("Admin"), "$argon2id$x", Role::Manager)
            .await
            .unwrap();

        assert!(user.id.starts_with("usr-"));
        assert_eq!(user.email, "admin@example.com");
        assert_eq!(user.role, Role::Manager);

        let fetched = svc.get_user(&user.id).await.unwrap();
        assert_eq!(fetched.email, "admin@example.com");
        assert_eq!(fetched.password_hash, "$argon2id$x");
    }

    #[tokio::test]
    async fn lookup_by_email_is_case_insensitive() {
        let svc = test_service().await;
        svc.create_user("eng@example.com", None, "h", Role::Engineer)
            .await
            .unwrap();

        let found = svc.get_user_by_email("ENG@example.com").await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().role, Role::Engineer);

        let missing = svc.get_user_by_email("nobody@example.com").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn count_and_list_users() {
        let svc = test_service().await;
        assert_eq!(svc.count_users().await.unwrap(), 0);

        svc.create_user("b@example.com", None, "h", Role::Engineer)
            .await
            .unwrap();
        svc.create_user("a@example.com", None, "h", Role::Manager)
            .await
            .unwrap();

        assert_eq!(svc.count_users().await.unwrap(), 2);
        let users = svc.list_users().await.unwrap();
        assert_eq!(users.len(), 2);
        // Ordered by email.
        assert_eq!(users[0].email, "a@example.com");
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let svc = test_service().await;
        svc.create_user("dup@example.com", None, "h", Role::Manager)
            .await
            .unwrap();
        let result = svc
            .create_user("dup@example.com", None, "h", Role::Engineer)
            .await;
        assert!(result.is_err());
    }
}
