//! Attachment repository.
//!
//! File upload and storage are out of scope; rows record the file name so
//! detail views can list what was attached.

use chrono::Utc;

use snag_core::entities::Attachment;
use snag_core::ids::PREFIX_ATTACHMENT;

use crate::error::DatabaseError;
use crate::helpers::parse_datetime;
use crate::service::SnagService;

impl SnagService {
    /// List a defect's attachments, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on SQL failure.
    pub async fn list_attachments(
        &self,
        defect_id: &str,
    ) -> Result<Vec<Attachment>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, defect_id, file_name, created_at
                 FROM attachments
                 WHERE defect_id = ?1
                 ORDER BY created_at ASC",
                [defect_id],
            )
            .await?;

        let mut attachments = Vec::new();
        while let Some(row) = rows.next().await? {
            attachments.push(Attachment {
                id: row.get(0)?,
                defect_id: row.get(1)?,
                file_name: row.get(2)?,
                created_at: parse_datetime(&row.get::<String>(3)?)?,
            });
        }
        Ok(attachments)
    }

    /// Record an attachment row for a defect.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the defect does not exist.
    pub async fn record_attachment(
        &self,
        defect_id: &str,
        file_name: &str,
    ) -> Result<Attachment, DatabaseError> {
        self.get_defect(defect_id).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_ATTACHMENT).await?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO attachments (id, defect_id, file_name, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                libsql::params![id.as_str(), defect_id, file_name, now.to_rfc3339()],
            )
            .await?;

        Ok(Attachment {
            id,
            defect_id: defect_id.to_string(),
            file_name: file_name.to_string(),
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
    async fn record_and_list_attachments() {
        let svc = test_service().await;
        let user = seed_user(&svc, "u@example.com", Role::Engineer).await;
        let (_, site) = seed_project_site(&svc).await;
        let defect = seed_defect(&svc, &site.id, &user.id).await;

        let att = svc
            .record_attachment(&defect.id, "crack-photo.jpg")
            .await
            .unwrap();
        assert!(att.id.starts_with("att-"));

        let listed = svc.list_attachments(&defect.id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].file_name, "crack-photo.jpg");

        let row = svc.get_defect_row(&defect.id).await.unwrap();
        assert_eq!(row.attachment_count, 1);
    }

    #[tokio::test]
    async fn attachment_on_missing_defect_is_no_result() {
        let svc = test_service().await;
        let err = svc
            .record_attachment("dft-missing", "x.png")
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NoResult));
    }
}
