use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::VerificationCode;

const COLUMNS: &str =
    "\"id\", \"user_id\", \"email\", \"code\", \"used\", \"expires_at\", \"created_at\"";

#[derive(Clone)]
pub struct CodeRepository {
    pool: PgPool,
}

impl CodeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Latest unused, unexpired code for a user.
    pub async fn find_active_one_by_user_id(
        &self,
        user_id: Uuid,
    ) -> Result<Option<VerificationCode>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM \"verification_codes\" \
             WHERE \"user_id\" = $1 AND \"used\" = false AND \"expires_at\" > NOW() \
             ORDER BY \"created_at\" DESC LIMIT 1"
        );
        sqlx::query_as::<_, VerificationCode>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn insert(&self, code: &VerificationCode) -> Result<VerificationCode, sqlx::Error> {
        let query = format!(
            "INSERT INTO \"verification_codes\" \
                (\"id\", \"user_id\", \"email\", \"code\", \"used\", \"expires_at\", \"created_at\") \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VerificationCode>(&query)
            .bind(code.id)
            .bind(code.user_id)
            .bind(&code.email)
            .bind(&code.code)
            .bind(code.used)
            .bind(code.expires_at)
            .bind(code.created_at)
            .fetch_one(&self.pool)
            .await
    }

    /// Consume a code once it has guarded an update.
    pub async fn mark_used(&self, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE \"verification_codes\" SET \"used\" = true WHERE \"id\" = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
