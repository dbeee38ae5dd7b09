//! Defect repository.
//!
//! The heart of the tracker. List/detail reads join the owning site and
//! project, creator and assignee references, and child counts so the wire
//! shape is one flat row per defect.

use chrono::Utc;

use snag_core::entities::Defect;
use snag_core::enums::{DefectPriority, DefectStatus};
use snag_core::ids::PREFIX_DEFECT;
use snag_core::responses::{DefectDetail, DefectRow, UserRef};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_optional_date};
use crate::service::SnagService;
use crate::updates::defect::DefectUpdate;

/// Fields for creating a defect. Status always starts at `NEW`.
#[derive(Debug, Clone)]
pub struct NewDefect {
    pub site_id: String,
    pub title: String,
    pub description: Option<String>,
    /// Defaults to `MEDIUM` when absent.
    pub priority: Option<DefectPriority>,
    pub assignee_id: Option<String>,
    pub deadline: Option<chrono::NaiveDate>,
    pub creator_id: String,
}

/// Optional filters for defect listings. All present filters are ANDed.
#[derive(Debug, Clone, Default)]
pub struct DefectFilter {
    pub site_id: Option<String>,
    pub status: Option<DefectStatus>,
    pub priority: Option<DefectPriority>,
}

pub(crate) const ROW_QUERY: &str = "SELECT d.id, d.site_id, d.title, d.description, d.status, d.priority,
        d.creator_id, d.assignee_id, d.deadline, d.created_at, d.updated_at,
        s.name, p.id, p.name,
        cu.name, cu.email, au.name, au.email,
        (SELECT COUNT(*) FROM comments c WHERE c.defect_id = d.id),
        (SELECT COUNT(*) FROM attachments a WHERE a.defect_id = d.id)
 FROM defects d
 JOIN sites s ON s.id = d.site_id
 JOIN projects p ON p.id = s.project_id
 JOIN users cu ON cu.id = d.creator_id
 LEFT JOIN users au ON au.id = d.assignee_id";

fn row_to_defect(row: &libsql::Row) -> Result<Defect, DatabaseError> {
    Ok(Defect {
        id: row.get(0)?,
        site_id: row.get(1)?,
        title: row.get(2)?,
        description: get_opt_string(row, 3)?,
        status: parse_enum(&row.get::<String>(4)?)?,
        priority: parse_enum(&row.get::<String>(5)?)?,
        creator_id: row.get(6)?,
        assignee_id: get_opt_string(row, 7)?,
        deadline: parse_optional_date(row.get::<Option<String>>(8)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(9)?)?,
        updated_at: parse_datetime(&row.get::<String>(10)?)?,
    })
}

pub(crate) fn row_to_defect_row(row: &libsql::Row) -> Result<DefectRow, DatabaseError> {
    let defect = row_to_defect(row)?;
    let assignee = match get_opt_string(row, 17)? {
        Some(email) => Some(UserRef {
            name: get_opt_string(row, 16)?,
            email,
        }),
        None => None,
    };
    Ok(DefectRow {
        defect,
        site_name: row.get(11)?,
        project_id: row.get(12)?,
        project_name: row.get(13)?,
        creator: UserRef {
            name: get_opt_string(row, 14)?,
            email: row.get(15)?,
        },
        assignee,
        comment_count: row.get::<i64>(18)?,
        attachment_count: row.get::<i64>(19)?,
    })
}

impl SnagService {
    /// Create a defect on a site.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the site does not exist.
    pub async fn create_defect(&self, new: NewDefect) -> Result<Defect, DatabaseError> {
        self.get_site(&new.site_id).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_DEFECT).await?;
        let priority = new.priority.unwrap_or_default();
        let deadline = new.deadline.map(|d| d.format("%Y-%m-%d").to_string());

        self.db()
            .conn()
            .execute(
                "INSERT INTO defects
                     (id, site_id, title, description, status, priority,
                      creator_id, assignee_id, deadline, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                libsql::params![
                    id.as_str(),
                    new.site_id.as_str(),
                    new.title.as_str(),
                    new.description.as_deref(),
                    DefectStatus::New.as_str(),
                    priority.as_str(),
                    new.creator_id.as_str(),
                    new.assignee_id.as_deref(),
                    deadline.as_deref(),
                    now.to_rfc3339(),
                    now.to_rfc3339()
                ],
            )
            .await?;

        Ok(Defect {
            id,
            site_id: new.site_id,
            title: new.title,
            description: new.description,
            status: DefectStatus::New,
            priority,
            creator_id: new.creator_id,
            assignee_id: new.assignee_id,
            deadline: new.deadline,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a bare defect by ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the defect does not exist.
    pub async fn get_defect(&self, id: &str) -> Result<Defect, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, site_id, title, description, status, priority,
                        creator_id, assignee_id, deadline, created_at, updated_at
                 FROM defects WHERE id = ?1",
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_defect(&row)
    }

    /// Get a joined defect row by ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the defect does not exist.
    pub async fn get_defect_row(&self, id: &str) -> Result<DefectRow, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("{ROW_QUERY} WHERE d.id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_defect_row(&row)
    }

    /// Get a defect with its comments (oldest first) and attachments.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the defect does not exist.
    pub async fn get_defect_detail(&self, id: &str) -> Result<DefectDetail, DatabaseError> {
        let row = self.get_defect_row(id).await?;
        let comments = self.list_comments(id).await?;
        let attachments = self.list_attachments(id).await?;
        Ok(DefectDetail {
            row,
            comments,
            attachments,
        })
    }

    /// List defects matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on SQL failure.
    pub async fn list_defects(
        &self,
        filter: &DefectFilter,
    ) -> Result<Vec<DefectRow>, DatabaseError> {
        let mut clauses: Vec<String> = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1;

        if let Some(site_id) = &filter.site_id {
            clauses.push(format!("d.site_id = ?{idx}"));
            params.push(libsql::Value::Text(site_id.clone()));
            idx += 1;
        }
        if let Some(status) = filter.status {
            clauses.push(format!("d.status = ?{idx}"));
            params.push(libsql::Value::Text(status.as_str().to_string()));
            idx += 1;
        }
        if let Some(priority) = filter.priority {
            clauses.push(format!("d.priority = ?{idx}"));
            params.push(libsql::Value::Text(priority.as_str().to_string()));
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };
        let sql = format!("{ROW_QUERY}{where_clause} ORDER BY d.created_at DESC");

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;

        let mut defects = Vec::new();
        while let Some(row) = rows.next().await? {
            defects.push(row_to_defect_row(&row)?);
        }
        Ok(defects)
    }

    /// Apply a partial update to a defect and bump `updated_at`.
    ///
    /// An empty update still bumps the timestamp and returns the row.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the defect does not exist.
    pub async fn update_defect(
        &self,
        id: &str,
        update: DefectUpdate,
    ) -> Result<Defect, DatabaseError> {
        self.get_defect(id).await?;

        let mut sets: Vec<String> = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1;

        if let Some(title) = update.title {
            sets.push(format!("title = ?{idx}"));
            params.push(libsql::Value::Text(title));
            idx += 1;
        }
        if let Some(description) = update.description {
            sets.push(format!("description = ?{idx}"));
            params.push(match description {
                Some(d) => libsql::Value::Text(d),
                None => libsql::Value::Null,
            });
            idx += 1;
        }
        if let Some(status) = update.status {
            sets.push(format!("status = ?{idx}"));
            params.push(libsql::Value::Text(status.as_str().to_string()));
            idx += 1;
        }
        if let Some(priority) = update.priority {
            sets.push(format!("priority = ?{idx}"));
            params.push(libsql::Value::Text(priority.as_str().to_string()));
            idx += 1;
        }
        if let Some(assignee_id) = update.assignee_id {
            sets.push(format!("assignee_id = ?{idx}"));
            params.push(match assignee_id {
                Some(a) => libsql::Value::Text(a),
                None => libsql::Value::Null,
            });
            idx += 1;
        }
        if let Some(deadline) = update.deadline {
            sets.push(format!("deadline = ?{idx}"));
            params.push(match deadline {
                Some(d) => libsql::Value::Text(d.format("%Y-%m-%d").to_string()),
                None => libsql::Value::Null,
            });
            idx += 1;
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(libsql::Value::Text(Utc::now().to_rfc3339()));
        idx += 1;

        let sql = format!("UPDATE defects SET {} WHERE id = ?{idx}", sets.join(", "));
        params.push(libsql::Value::Text(id.to_string()));

        self.db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;

        self.get_defect(id).await
    }

    /// Delete a defect. Comments and attachments cascade with it.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the defect does not exist.
    pub async fn delete_defect(&self, id: &str) -> Result<(), DatabaseError> {
        let deleted = self
            .db()
            .conn()
            .execute("DELETE FROM defects WHERE id = ?1", [id])
            .await?;
        if deleted == 0 {
            return Err(DatabaseError::NoResult);
        }
        Ok(())
    }
}
