use sqlx::PgPool;
use uuid::Uuid;

use super::{bind_params_as, order_and_page_clause};
use crate::database::models::{ProjectTaskBucket, Task, TaskStatusCount};
use crate::filter::{CommonQuery, FilterBuilder, Resource};

const COLUMNS: &str = "\"id\", \"name\", \"description\", \"start_date\", \"end_date\", \
                       \"contributor\", \"status\", \"project_id\", \"created_at\", \"deleted_at\"";

#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_one_by_id(&self, id: Uuid) -> Result<Option<Task>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM \"tasks\" WHERE \"id\" = $1 AND \"deleted_at\" IS NULL");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn find_all(&self, cq: &CommonQuery) -> Result<Vec<Task>, sqlx::Error> {
        let clause = FilterBuilder::build(cq, Resource::Task);
        let query = format!(
            "SELECT {COLUMNS} FROM \"tasks\" WHERE {}{}",
            clause.sql,
            order_and_page_clause(cq)
        );
        bind_params_as(sqlx::query_as::<_, Task>(&query), &clause.params)
            .fetch_all(&self.pool)
            .await
    }

    /// Grouped status counts over the filtered set.
    pub async fn count_by_status(&self, cq: &CommonQuery) -> Result<TaskStatusCount, sqlx::Error> {
        let clause = FilterBuilder::build(cq, Resource::Task);
        let query = format!(
            "SELECT \
                COUNT(*) AS total, \
                COUNT(*) FILTER (WHERE \"status\" = 'active') AS active, \
                COUNT(*) FILTER (WHERE \"status\" = 'testing') AS testing, \
                COUNT(*) FILTER (WHERE \"status\" = 'completed') AS completed, \
                COUNT(*) FILTER (WHERE \"status\" = 'cancelled') AS cancelled \
             FROM \"tasks\" WHERE {}",
            clause.sql
        );
        bind_params_as(sqlx::query_as::<_, TaskStatusCount>(&query), &clause.params)
            .fetch_one(&self.pool)
            .await
    }

    /// Status buckets for each given project, one row per project that has
    /// at least one non-deleted task.
    pub async fn buckets_by_project(
        &self,
        project_ids: &[Uuid],
    ) -> Result<Vec<ProjectTaskBucket>, sqlx::Error> {
        if project_ids.is_empty() {
            return Ok(vec![]);
        }
        sqlx::query_as::<_, ProjectTaskBucket>(
            "SELECT \"project_id\", \
                COUNT(*) AS total, \
                COUNT(*) FILTER (WHERE \"status\" = 'active') AS active, \
                COUNT(*) FILTER (WHERE \"status\" = 'testing') AS testing, \
                COUNT(*) FILTER (WHERE \"status\" = 'completed') AS completed, \
                COUNT(*) FILTER (WHERE \"status\" = 'cancelled') AS cancelled \
             FROM \"tasks\" \
             WHERE \"deleted_at\" IS NULL AND \"project_id\" = ANY($1) \
             GROUP BY \"project_id\"",
        )
        .bind(project_ids)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn insert(&self, task: &Task) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO \"tasks\" \
                (\"id\", \"name\", \"description\", \"start_date\", \"end_date\", \
                 \"contributor\", \"status\", \"project_id\", \"created_at\") \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(task.id)
            .bind(&task.name)
            .bind(&task.description)
            .bind(task.start_date)
            .bind(task.end_date)
            .bind(&task.contributor)
            .bind(&task.status)
            .bind(task.project_id)
            .bind(task.created_at)
            .fetch_one(&self.pool)
            .await
    }

    /// Full-row update after the handler merged the submitted fields.
    pub async fn update(&self, task: &Task) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE \"tasks\" SET \
                \"name\" = $2, \"description\" = $3, \"start_date\" = $4, \"end_date\" = $5, \
                \"contributor\" = $6, \"status\" = $7 \
             WHERE \"id\" = $1 AND \"deleted_at\" IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(task.id)
            .bind(&task.name)
            .bind(&task.description)
            .bind(task.start_date)
            .bind(task.end_date)
            .bind(&task.contributor)
            .bind(&task.status)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE \"tasks\" SET \"deleted_at\" = NOW() \
             WHERE \"id\" = $1 AND \"deleted_at\" IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Cascade used when a project is deleted.
    pub async fn soft_delete_by_project(&self, project_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE \"tasks\" SET \"deleted_at\" = NOW() \
             WHERE \"project_id\" = $1 AND \"deleted_at\" IS NULL",
        )
        .bind(project_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
