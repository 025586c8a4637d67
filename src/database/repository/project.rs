use sqlx::PgPool;
use uuid::Uuid;

use super::{bind_params_as, bind_params_scalar, order_and_page_clause};
use crate::database::models::{Project, ProjectStatusCount, TypeCount};
use crate::filter::{CommonQuery, FilterBuilder, Resource};
use crate::types::ProjectStatus;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\"id\", \"name\", \"description\", \"type\", \"start_date\", \"end_date\", \
                       \"contributor\", \"attachments\", \"status\", \"logo\", \"created_at\", \"deleted_at\"";

#[derive(Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_one_by_id(&self, id: Uuid) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM \"projects\" WHERE \"id\" = $1 AND \"deleted_at\" IS NULL"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn find_all(&self, cq: &CommonQuery) -> Result<Vec<Project>, sqlx::Error> {
        let clause = FilterBuilder::build(cq, Resource::Project);
        let query = format!(
            "SELECT {COLUMNS} FROM \"projects\" WHERE {}{}",
            clause.sql,
            order_and_page_clause(cq)
        );
        bind_params_as(sqlx::query_as::<_, Project>(&query), &clause.params)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn count(&self, cq: &CommonQuery) -> Result<i64, sqlx::Error> {
        let clause = FilterBuilder::build(cq, Resource::Project);
        let query = format!("SELECT COUNT(*) FROM \"projects\" WHERE {}", clause.sql);
        bind_params_scalar(sqlx::query_scalar::<_, i64>(&query), &clause.params)
            .fetch_one(&self.pool)
            .await
    }

    /// Grouped status counts over the filtered set. Pagination is ignored by
    /// construction; callers reset it on the shared query first.
    pub async fn count_by_status(
        &self,
        cq: &CommonQuery,
    ) -> Result<ProjectStatusCount, sqlx::Error> {
        let clause = FilterBuilder::build(cq, Resource::Project);
        let query = format!(
            "SELECT \
                COUNT(*) AS total, \
                COUNT(*) FILTER (WHERE \"status\" = 'active') AS active, \
                COUNT(*) FILTER (WHERE \"status\" = 'completed') AS completed, \
                COUNT(*) FILTER (WHERE \"status\" = 'pending') AS pending, \
                COUNT(*) FILTER (WHERE \"status\" = 'cancelled') AS cancelled \
             FROM \"projects\" WHERE {}",
            clause.sql
        );
        bind_params_as(sqlx::query_as::<_, ProjectStatusCount>(&query), &clause.params)
            .fetch_one(&self.pool)
            .await
    }

    /// Count per distinct project type, cancelled projects excluded.
    pub async fn count_by_type(&self, cq: &CommonQuery) -> Result<Vec<TypeCount>, sqlx::Error> {
        let clause = FilterBuilder::build(cq, Resource::Project);
        let query = format!(
            "SELECT \"type\", COUNT(*) AS total \
             FROM \"projects\" WHERE {} AND \"status\" <> '{}' \
             GROUP BY \"type\" ORDER BY \"type\"",
            clause.sql,
            ProjectStatus::Cancelled.as_str()
        );
        bind_params_as(sqlx::query_as::<_, TypeCount>(&query), &clause.params)
            .fetch_all(&self.pool)
            .await
    }

    /// Non-deleted project count per user, for decorating user listings.
    pub async fn count_for_users(&self, user_ids: &[Uuid]) -> Result<Vec<(Uuid, i64)>, sqlx::Error> {
        if user_ids.is_empty() {
            return Ok(vec![]);
        }
        sqlx::query_as::<_, (Uuid, i64)>(
            "SELECT c, COUNT(*) FROM \"projects\" \
             CROSS JOIN LATERAL unnest(\"contributor\") AS c \
             WHERE \"deleted_at\" IS NULL AND c = ANY($1) \
             GROUP BY c",
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn insert(&self, project: &Project) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO \"projects\" \
                (\"id\", \"name\", \"description\", \"type\", \"start_date\", \"end_date\", \
                 \"contributor\", \"attachments\", \"status\", \"logo\", \"created_at\") \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(project.id)
            .bind(&project.name)
            .bind(&project.description)
            .bind(&project.kind)
            .bind(project.start_date)
            .bind(project.end_date)
            .bind(&project.contributor)
            .bind(&project.attachments)
            .bind(&project.status)
            .bind(&project.logo)
            .bind(project.created_at)
            .fetch_one(&self.pool)
            .await
    }

    /// Tombstone a project. Returns false when it was already gone.
    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE \"projects\" SET \"deleted_at\" = NOW() \
             WHERE \"id\" = $1 AND \"deleted_at\" IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
