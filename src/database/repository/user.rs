use sqlx::PgPool;
use uuid::Uuid;

use super::{bind_params_as, bind_params_scalar, order_and_page_clause};
use crate::database::models::{ActiveUserCount, User};
use crate::filter::{CommonQuery, FilterBuilder, Resource};

const COLUMNS: &str = "\"id\", \"email\", \"password\", \"name\", \"role\", \"position\", \
                       \"avatar\", \"phone\", \"created_at\", \"deleted_at\"";

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_one_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM \"users\" WHERE \"id\" = $1 AND \"deleted_at\" IS NULL");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn find_one_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM \"users\" WHERE \"email\" = $1 AND \"deleted_at\" IS NULL"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn find_all(&self, cq: &CommonQuery) -> Result<Vec<User>, sqlx::Error> {
        let clause = FilterBuilder::build(cq, Resource::User);
        let query = format!(
            "SELECT {COLUMNS} FROM \"users\" WHERE {}{}",
            clause.sql,
            order_and_page_clause(cq)
        );
        bind_params_as(sqlx::query_as::<_, User>(&query), &clause.params)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn count(&self, cq: &CommonQuery) -> Result<i64, sqlx::Error> {
        let clause = FilterBuilder::build(cq, Resource::User);
        let query = format!("SELECT COUNT(*) FROM \"users\" WHERE {}", clause.sql);
        bind_params_scalar(sqlx::query_scalar::<_, i64>(&query), &clause.params)
            .fetch_one(&self.pool)
            .await
    }

    /// Display names for a set of user ids; deleted users are omitted.
    pub async fn find_names_by_ids(&self, ids: &[Uuid]) -> Result<Vec<(Uuid, String)>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        sqlx::query_as::<_, (Uuid, String)>(
            "SELECT \"id\", \"name\" FROM \"users\" \
             WHERE \"id\" = ANY($1) AND \"deleted_at\" IS NULL",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
    }

    /// Users contributing to at least one non-deleted active/testing task
    /// count as active; the remaining non-deleted users as not_active.
    pub async fn active_user_count(&self) -> Result<ActiveUserCount, sqlx::Error> {
        let (total, active) = sqlx::query_as::<_, (i64, i64)>(
            "SELECT \
                COUNT(*), \
                COUNT(*) FILTER (WHERE EXISTS ( \
                    SELECT 1 FROM \"tasks\" t \
                    WHERE t.\"deleted_at\" IS NULL \
                      AND t.\"status\" IN ('active', 'testing') \
                      AND t.\"contributor\" @> ARRAY[u.\"id\"])) \
             FROM \"users\" u WHERE u.\"deleted_at\" IS NULL",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(ActiveUserCount { total, active, not_active: total - active })
    }

    pub async fn insert(&self, user: &User) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO \"users\" \
                (\"id\", \"email\", \"password\", \"name\", \"role\", \"position\", \
                 \"avatar\", \"phone\", \"created_at\") \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(user.id)
            .bind(&user.email)
            .bind(&user.password)
            .bind(&user.name)
            .bind(&user.role)
            .bind(&user.position)
            .bind(&user.avatar)
            .bind(&user.phone)
            .bind(user.created_at)
            .fetch_one(&self.pool)
            .await
    }

    /// Full-row update after the handler merged the submitted fields.
    pub async fn update(&self, user: &User) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE \"users\" SET \
                \"email\" = $2, \"password\" = $3, \"name\" = $4, \"position\" = $5, \
                \"avatar\" = $6, \"phone\" = $7 \
             WHERE \"id\" = $1 AND \"deleted_at\" IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(user.id)
            .bind(&user.email)
            .bind(&user.password)
            .bind(&user.name)
            .bind(&user.position)
            .bind(&user.avatar)
            .bind(&user.phone)
            .fetch_optional(&self.pool)
            .await
    }
}
