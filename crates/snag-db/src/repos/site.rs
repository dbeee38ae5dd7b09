//! Site repository.
//!
//! Sites belong to exactly one project and cannot move between projects.
//! Deletion is rejected while defects still reference the site.

use chrono::Utc;

use snag_core::entities::Site;
use snag_core::ids::PREFIX_SITE;
use snag_core::responses::{SiteDetail, SiteSummary};

use crate::error::DatabaseError;
use crate::helpers::parse_datetime;
use crate::repos::defect::DefectFilter;
use crate::service::SnagService;

fn row_to_site(row: &libsql::Row) -> Result<Site, DatabaseError> {
    Ok(Site {
        id: row.get(0)?,
        project_id: row.get(1)?,
        name: row.get(2)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

impl SnagService {
    /// Create a site under a project.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the project does not exist.
    pub async fn create_site(
        &self,
        project_id: &str,
        name: &str,
    ) -> Result<Site, DatabaseError> {
        self.get_project(project_id).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_SITE).await?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO sites (id, project_id, name, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                libsql::params![id.as_str(), project_id, name, now.to_rfc3339()],
            )
            .await?;

        Ok(Site {
            id,
            project_id: project_id.to_string(),
            name: name.to_string(),
            created_at: now,
        })
    }

    /// Get a site by ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the site does not exist.
    pub async fn get_site(&self, id: &str) -> Result<Site, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, project_id, name, created_at FROM sites WHERE id = ?1",
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_site(&row)
    }

    /// Get a site with its project and defects (newest defects first).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the site does not exist.
    pub async fn get_site_detail(&self, id: &str) -> Result<SiteDetail, DatabaseError> {
        let site = self.get_site(id).await?;
        let project = self.get_project(&site.project_id).await?;
        let defects = self
            .list_defects(&DefectFilter {
                site_id: Some(site.id.clone()),
                ..DefectFilter::default()
            })
            .await?;
        let defect_count = i64::try_from(defects.len()).unwrap_or(i64::MAX);
        Ok(SiteDetail {
            site,
            project,
            defects,
            defect_count,
        })
    }

    /// List all sites in name order, optionally restricted to one project,
    /// with defect counts.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on SQL failure.
    pub async fn list_sites(
        &self,
        project_id: Option<&str>,
    ) -> Result<Vec<SiteSummary>, DatabaseError> {
        let base = "SELECT s.id, s.project_id, s.name, s.created_at,
                           (SELECT COUNT(*) FROM defects d WHERE d.site_id = s.id)
                    FROM sites s";
        let mut rows = match project_id {
            Some(pid) => {
                self.db()
                    .conn()
                    .query(
                        &format!("{base} WHERE s.project_id = ?1 ORDER BY s.name ASC"),
                        [pid],
                    )
                    .await?
            }
            None => {
                self.db()
                    .conn()
                    .query(&format!("{base} ORDER BY s.name ASC"), ())
                    .await?
            }
        };

        let mut sites = Vec::new();
        while let Some(row) = rows.next().await? {
            sites.push(SiteSummary {
                site: row_to_site(&row)?,
                defect_count: row.get::<i64>(4)?,
            });
        }
        Ok(sites)
    }

    /// Rename a site.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the site does not exist.
    pub async fn update_site(&self, id: &str, name: &str) -> Result<Site, DatabaseError> {
        let updated = self
            .db()
            .conn()
            .execute(
                "UPDATE sites SET name = ?1 WHERE id = ?2",
                libsql::params![name, id],
            )
            .await?;
        if updated == 0 {
            return Err(DatabaseError::NoResult);
        }
        self.get_site(id).await
    }

    /// Delete a site.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the site does not exist and
    /// `DatabaseError::HasDependents` while defects still reference it.
    pub async fn delete_site(&self, id: &str) -> Result<(), DatabaseError> {
        self.get_site(id).await?;

        let mut rows = self
            .db()
            .conn()
            .query("SELECT COUNT(*) FROM defects WHERE site_id = ?1", [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        if row.get::<i64>(0)? > 0 {
            return Err(DatabaseError::HasDependents {
                entity: "site",
                dependents: "defects",
            });
        }

        self.db()
            .conn()
            .execute("DELETE FROM sites WHERE id = ?1", [id])
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use snag_core::enums::Role;

    use crate::error::DatabaseError;
    use crate::test_support::helpers::{seed_defect, seed_user, test_service};

    #[tokio::test]
    async fn create_site_requires_existing_project() {
        let svc = test_service().await;
        let err = svc.create_site("prj-missing", "S").await.unwrap_err();
        assert!(matches!(err, DatabaseError::NoResult));

        let project = svc.create_project("P").await.unwrap();
        let site = svc.create_site(&project.id, "Block A").await.unwrap();
        assert!(site.id.starts_with("sit-"));
        assert_eq!(site.project_id, project.id);
    }

    #[tokio::test]
    async fn list_sites_name_order_with_counts() {
        let svc = test_service().await;
        let user = seed_user(&svc, "u@example.com", Role::Engineer).await;
        let project = svc.create_project("P").await.unwrap();
        let b = svc.create_site(&project.id, "Block B").await.unwrap();
        svc.create_site(&project.id, "Block A").await.unwrap();
        seed_defect(&svc, &b.id, &user.id).await;

        let sites = svc.list_sites(None).await.unwrap();
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].site.name, "Block A");
        assert_eq!(sites[0].defect_count, 0);
        assert_eq!(sites[1].defect_count, 1);

        let other = svc.create_project("Q").await.unwrap();
        svc.create_site(&other.id, "Annex").await.unwrap();
        let filtered = svc.list_sites(Some(project.id.as_str())).await.unwrap();
        assert_eq!(filtered.len(), 2);
    }

    #[tokio::test]
    async fn site_detail_includes_project_and_defects() {
        let svc = test_service().await;
        let user = seed_user(&svc, "u@example.com", Role::Engineer).await;
        let project = svc.create_project("P").await.unwrap();
        let site = svc.create_site(&project.id, "S").await.unwrap();
        seed_defect(&svc, &site.id, &user.id).await;

        let detail = svc.get_site_detail(&site.id).await.unwrap();
        assert_eq!(detail.project.id, project.id);
        assert_eq!(detail.defect_count, 1);
        assert_eq!(detail.defects[0].site_name, "S");
    }

    #[tokio::test]
    async fn update_site_renames() {
        let svc = test_service().await;
        let project = svc.create_project("P").await.unwrap();
        let site = svc.create_site(&project.id, "Old").await.unwrap();
        let renamed = svc.update_site(&site.id, "New").await.unwrap();
        assert_eq!(renamed.name, "New");
    }

    #[tokio::test]
    async fn delete_site_blocked_by_defects() {
        let svc = test_service().await;
        let user = seed_user(&svc, "u@example.com", Role::Engineer).await;
        let project = svc.create_project("P").await.unwrap();
        let site = svc.create_site(&project.id, "S").await.unwrap();
        seed_defect(&svc, &site.id, &user.id).await;

        let err = svc.delete_site(&site.id).await.unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::HasDependents {
                entity: "site",
                dependents: "defects"
            }
        ));
    }

    #[tokio::test]
    async fn delete_empty_site_succeeds() {
        let svc = test_service().await;
        let project = svc.create_project("P").await.unwrap();
        let site = svc.create_site(&project.id, "S").await.unwrap();
        svc.delete_site(&site.id).await.unwrap();
        assert!(matches!(
            svc.get_site(&site.id).await.unwrap_err(),
            DatabaseError::NoResult
        ));
    }
}
