//! Project repository.
//!
//! Projects are the top-level grouping. Deletion is rejected while sites
//! still reference the project; the caller surfaces that as a validation
//! error, not a conflict.

use chrono::Utc;

use snag_core::entities::{Project, Site};
use snag_core::ids::PREFIX_PROJECT;
use snag_core::responses::{ProjectSummary, SiteSummary};

use crate::error::DatabaseError;
use crate::helpers::parse_datetime;
use crate::service::SnagService;

fn row_to_project(row: &libsql::Row) -> Result<Project, DatabaseError> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: parse_datetime(&row.get::<String>(2)?)?,
    })
}

impl SnagService {
    /// Create a project.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on SQL failure.
    pub async fn create_project(&self, name: &str) -> Result<Project, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_PROJECT).await?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO projects (id, name, created_at) VALUES (?1, ?2, ?3)",
                libsql::params![id.as_str(), name, now.to_rfc3339()],
            )
            .await?;

        Ok(Project {
            id,
            name: name.to_string(),
            created_at: now,
        })
    }

    /// Get a project by ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the project does not exist.
    pub async fn get_project(&self, id: &str) -> Result<Project, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, name, created_at FROM projects WHERE id = ?1",
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_project(&row)
    }

    /// Get a project with its sites (and their defect counts).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the project does not exist.
    pub async fn get_project_summary(&self, id: &str) -> Result<ProjectSummary, DatabaseError> {
        let project = self.get_project(id).await?;
        let sites = self.sites_of_project(id).await?;
        let site_count = i64::try_from(sites.len()).unwrap_or(i64::MAX);
        Ok(ProjectSummary {
            project,
            sites,
            site_count,
        })
    }

    /// List all projects, newest first, each with its sites.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on SQL failure.
    pub async fn list_projects(&self) -> Result<Vec<ProjectSummary>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, name, created_at FROM projects ORDER BY created_at DESC",
                (),
            )
            .await?;

        let mut projects = Vec::new();
        while let Some(row) = rows.next().await? {
            projects.push(row_to_project(&row)?);
        }

        let mut summaries = Vec::with_capacity(projects.len());
        for project in projects {
            let sites = self.sites_of_project(&project.id).await?;
            let site_count = i64::try_from(sites.len()).unwrap_or(i64::MAX);
            summaries.push(ProjectSummary {
                project,
                sites,
                site_count,
            });
        }
        Ok(summaries)
    }

    /// Rename a project.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the project does not exist.
    pub async fn update_project(&self, id: &str, name: &str) -> Result<Project, DatabaseError> {
        let updated = self
            .db()
            .conn()
            .execute(
                "UPDATE projects SET name = ?1 WHERE id = ?2",
                libsql::params![name, id],
            )
            .await?;
        if updated == 0 {
            return Err(DatabaseError::NoResult);
        }
        self.get_project(id).await
    }

    /// Delete a project.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the project does not exist and
    /// `DatabaseError::HasDependents` while sites still reference it.
    pub async fn delete_project(&self, id: &str) -> Result<(), DatabaseError> {
        self.get_project(id).await?;

        let mut rows = self
            .db()
            .conn()
            .query("SELECT COUNT(*) FROM sites WHERE project_id = ?1", [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        if row.get::<i64>(0)? > 0 {
            return Err(DatabaseError::HasDependents {
                entity: "project",
                dependents: "sites",
            });
        }

        self.db()
            .conn()
            .execute("DELETE FROM projects WHERE id = ?1", [id])
            .await?;
        Ok(())
    }

    /// Sites of one project (name order) with defect counts.
    async fn sites_of_project(&self, project_id: &str) -> Result<Vec<SiteSummary>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT s.id, s.project_id, s.name, s.created_at,
                        (SELECT COUNT(*) FROM defects d WHERE d.site_id = s.id)
                 FROM sites s
                 WHERE s.project_id = ?1
                 ORDER BY s.name ASC",
                [project_id],
            )
            .await?;

        let mut sites = Vec::new();
        while let Some(row) = rows.next().await? {
            sites.push(SiteSummary {
                site: Site {
                    id: row.get(0)?,
                    project_id: row.get(1)?,
                    name: row.get(2)?,
                    created_at: parse_datetime(&row.get::<String>(3)?)?,
                },
                defect_count: row.get::<i64>(4)?,
            });
        }
        Ok(sites)
    }
}
