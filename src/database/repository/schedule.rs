use sqlx::PgPool;

use super::{bind_params_as, order_and_page_clause};
use crate::database::models::Schedule;
use crate::filter::{CommonQuery, FilterBuilder, Resource};

const COLUMNS: &str = "\"id\", \"name\", \"description\", \"start_date\", \"end_date\", \
                       \"start_time\", \"end_time\", \"contributor\", \"type\", \"created_at\", \"deleted_at\"";

#[derive(Clone)]
pub struct ScheduleRepository {
    pool: PgPool,
}

impl ScheduleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self, cq: &CommonQuery) -> Result<Vec<Schedule>, sqlx::Error> {
        let clause = FilterBuilder::build(cq, Resource::Schedule);
        let query = format!(
            "SELECT {COLUMNS} FROM \"schedules\" WHERE {}{}",
            clause.sql,
            order_and_page_clause(cq)
        );
        bind_params_as(sqlx::query_as::<_, Schedule>(&query), &clause.params)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn insert(&self, schedule: &Schedule) -> Result<Schedule, sqlx::Error> {
        let query = format!(
            "INSERT INTO \"schedules\" \
                (\"id\", \"name\", \"description\", \"start_date\", \"end_date\", \
                 \"start_time\", \"end_time\", \"contributor\", \"type\", \"created_at\") \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Schedule>(&query)
            .bind(schedule.id)
            .bind(&schedule.name)
            .bind(&schedule.description)
            .bind(schedule.start_date)
            .bind(schedule.end_date)
            .bind(&schedule.start_time)
            .bind(&schedule.end_time)
            .bind(&schedule.contributor)
            .bind(&schedule.kind)
            .bind(schedule.created_at)
            .fetch_one(&self.pool)
            .await
    }
}
