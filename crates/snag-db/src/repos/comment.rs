//! Comment repository. Any authenticated user may comment.

use chrono::Utc;

use snag_core::entities::Comment;
use snag_core::ids::PREFIX_COMMENT;
use snag_core::responses::{CommentRow, UserRef};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime};
use crate::service::SnagService;

impl SnagService {
    /// List a defect's comments, oldest first, with author references.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on SQL failure.
    pub async fn list_comments(&self, defect_id: &str) -> Result<Vec<CommentRow>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT c.id, c.defect_id, c.author_id, c.content, c.created_at,
                        u.name, u.email
                 FROM comments c
                 JOIN users u ON u.id = c.author_id
                 WHERE c.defect_id = ?1
                 ORDER BY c.created_at ASC",
                [defect_id],
            )
            .await?;

        let mut comments = Vec::new();
        while let Some(row) = rows.next().await? {
            comments.push(CommentRow {
                comment: Comment {
                    id: row.get(0)?,
                    defect_id: row.get(1)?,
                    author_id: row.get(2)?,
                    content: row.get(3)?,
                    created_at: parse_datetime(&row.get::<String>(4)?)?,
                },
                author: UserRef {
                    name: get_opt_string(&row, 5)?,
                    email: row.get(6)?,
                },
            });
        }
        Ok(comments)
    }

    /// Add a comment to a defect.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the defect does not exist.
    pub async fn create_comment(
        &self,
        defect_id: &str,
        author_id: &str,
        content: &str,
    ) -> Result<Comment, DatabaseError> {
        self.get_defect(defect_id).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_COMMENT).await?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO comments (id, defect_id, author_id, content, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![id.as_str(), defect_id, author_id, content, now.to_rfc3339()],
            )
            .await?;

        Ok(Comment {
            id,
            defect_id: defect_id.to_string(),
            author_id: author_id.to_string(),
            content: content.to_string(),
            created_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use snag_core::enums::Role;

    use crate::error::DatabaseError;
    use crate::test_support::helpers::{seed_defect, seed_project_site, seed_user, test_service};

    #[tokio::test]
    async fn comments_come_back_oldest_first_with_author() {
        let svc = test_service().await;
        let user = svc
            .create_user("a@example.com", Some("Ana"), "h", Role::Observer)
            .await
            .unwrap();
        let (_, site) = seed_project_site(&svc).await;
        let defect = seed_defect(&svc, &site.id, &user.id).await;

        let first = svc.create_comment(&defect.id, &user.id, "first").await.unwrap();
        assert!(first.id.starts_with("cmt-"));
        svc.db()
            .conn()
            .execute(
                "UPDATE comments SET created_at = '2020-01-01T00:00:00+00:00' WHERE id = ?1",
                [first.id.as_str()],
            )
            .await
            .unwrap();
        svc.create_comment(&defect.id, &user.id, "second").await.unwrap();

        let comments = svc.list_comments(&defect.id).await.unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].comment.content, "first");
        assert_eq!(comments[0].author.name.as_deref(), Some("Ana"));
        assert_eq!(comments[1].comment.content, "second");
    }

    #[tokio::test]
    async fn comment_on_missing_defect_is_no_result() {
        let svc = test_service().await;
        let user = seed_user(&svc, "u@example.com", Role::Engineer).await;
        let err = svc
            .create_comment("dft-missing", &user.id, "hello")
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NoResult));
    }
}
