//! Defect report aggregation.
//!
//! One read-only query surface: the matching defect rows plus counts grouped
//! by status, priority, and site. Date bounds are computed in Rust as UTC
//! instants (start of `start_date`, start of the day after `end_date`) so the
//! comparison works against the RFC 3339 strings stored in `created_at`.

use chrono::{NaiveDate, Utc};

use snag_core::responses::{PriorityCount, Report, SiteCount, StatusCount};

use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, parse_enum};
use crate::repos::defect::{ROW_QUERY, row_to_defect_row};
use crate::service::SnagService;

/// Optional filters for a report. All present filters are ANDed.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub project_id: Option<String>,
    /// Inclusive lower bound on defect creation date.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on defect creation date.
    pub end_date: Option<NaiveDate>,
}

struct FilterSql {
    where_clause: String,
    params: Vec<libsql::Value>,
}

fn filter_sql(filter: &ReportFilter) -> FilterSql {
    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<libsql::Value> = Vec::new();
    let mut idx = 1;

    if let Some(project_id) = &filter.project_id {
        clauses.push(format!("p.id = ?{idx}"));
        params.push(libsql::Value::Text(project_id.clone()));
        idx += 1;
    }
    if let Some(start) = filter.start_date {
        let bound = start.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        if let Some(bound) = bound {
            clauses.push(format!("d.created_at >= ?{idx}"));
            params.push(libsql::Value::Text(bound.to_rfc3339()));
            idx += 1;
        }
    }
    if let Some(end) = filter.end_date {
        // Exclusive bound at the start of the next day makes end_date inclusive.
        let bound = end
            .succ_opt()
            .and_then(|next| next.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc());
        if let Some(bound) = bound {
            clauses.push(format!("d.created_at < ?{idx}"));
            params.push(libsql::Value::Text(bound.to_rfc3339()));
        }
    }

    let where_clause = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };
    FilterSql {
        where_clause,
        params,
    }
}

const GROUP_FROM: &str = "FROM defects d
 JOIN sites s ON s.id = d.site_id
 JOIN projects p ON p.id = s.project_id";

impl SnagService {
    /// Build a defect report for the given filter.
    ///
    /// The total always equals the sum of the status group counts (and of the
    /// priority group counts) because every group query applies the same
    /// filter.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on SQL failure.
    pub async fn build_report(&self, filter: &ReportFilter) -> Result<Report, DatabaseError> {
        let sql = filter_sql(filter);

        let defects = {
            let mut rows = self
                .db()
                .conn()
                .query(
                    &format!(
                        "{ROW_QUERY}{} ORDER BY d.created_at DESC",
                        sql.where_clause
                    ),
                    libsql::params_from_iter(sql.params.clone()),
                )
                .await?;
            let mut defects = Vec::new();
            while let Some(row) = rows.next().await? {
                defects.push(row_to_defect_row(&row)?);
            }
            defects
        };

        let status_stats = {
            let mut rows = self
                .db()
                .conn()
                .query(
                    &format!(
                        "SELECT d.status, COUNT(*) {GROUP_FROM}{} GROUP BY d.status",
                        sql.where_clause
                    ),
                    libsql::params_from_iter(sql.params.clone()),
                )
                .await?;
            let mut stats = Vec::new();
            while let Some(row) = rows.next().await? {
                stats.push(StatusCount {
                    status: parse_enum(&row.get::<String>(0)?)?,
                    count: row.get::<i64>(1)?,
                });
            }
            stats
        };

        let priority_stats = {
            let mut rows = self
                .db()
                .conn()
                .query(
                    &format!(
                        "SELECT d.priority, COUNT(*) {GROUP_FROM}{} GROUP BY d.priority",
                        sql.where_clause
                    ),
                    libsql::params_from_iter(sql.params.clone()),
                )
                .await?;
            let mut stats = Vec::new();
            while let Some(row) = rows.next().await? {
                stats.push(PriorityCount {
                    priority: parse_enum(&row.get::<String>(0)?)?,
                    count: row.get::<i64>(1)?,
                });
            }
            stats
        };

        let site_stats = {
            let mut rows = self
                .db()
                .conn()
                .query(
                    &format!(
                        "SELECT s.id, s.name, p.name, COUNT(*), MAX(d.created_at)
                         {GROUP_FROM}{} GROUP BY s.id ORDER BY COUNT(*) DESC",
                        sql.where_clause
                    ),
                    libsql::params_from_iter(sql.params),
                )
                .await?;
            let mut stats = Vec::new();
            while let Some(row) = rows.next().await? {
                stats.push(SiteCount {
                    site_id: row.get(0)?,
                    site_name: row.get(1)?,
                    project_name: row.get(2)?,
                    count: row.get::<i64>(3)?,
                    latest_created_at: parse_datetime(&row.get::<String>(4)?)?,
                });
            }
            stats
        };

        Ok(Report {
            total_defects: i64::try_from(defects.len()).unwrap_or(i64::MAX),
            defects,
            status_stats,
            priority_stats,
            site_stats,
            generated_at: Utc::now(),
        })
    }
}
