pub mod code;
pub mod project;
pub mod schedule;
pub mod task;
pub mod user;

pub use code::CodeRepository;
pub use project::ProjectRepository;
pub use schedule::ScheduleRepository;
pub use task::TaskRepository;
pub use user::UserRepository;

use sqlx::postgres::{PgArguments, PgRow};
use sqlx::FromRow;

use crate::filter::{CommonQuery, SqlParam};

/// Bind a generated clause's parameters onto a typed query in order.
pub(crate) fn bind_params_as<'q, T>(
    mut query: sqlx::query::QueryAs<'q, sqlx::Postgres, T, PgArguments>,
    params: &[SqlParam],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, T, PgArguments>
where
    T: for<'r> FromRow<'r, PgRow>,
{
    for param in params {
        query = match param {
            SqlParam::Text(s) => query.bind(s.clone()),
            SqlParam::Uuid(u) => query.bind(*u),
            SqlParam::Time(t) => query.bind(*t),
        };
    }
    query
}

/// Bind a generated clause's parameters onto a scalar query in order.
pub(crate) fn bind_params_scalar<'q, T>(
    mut query: sqlx::query::QueryScalar<'q, sqlx::Postgres, T, PgArguments>,
    params: &[SqlParam],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, T, PgArguments> {
    for param in params {
        query = match param {
            SqlParam::Text(s) => query.bind(s.clone()),
            SqlParam::Uuid(u) => query.bind(*u),
            SqlParam::Time(t) => query.bind(*t),
        };
    }
    query
}

/// `ORDER BY created_at` plus `LIMIT/OFFSET` when the query is bounded.
/// Offsets/limits are validated integers, inlined rather than bound.
pub(crate) fn order_and_page_clause(cq: &CommonQuery) -> String {
    let mut clause = format!(" ORDER BY \"created_at\" {}", cq.sort.to_sql());
    if let Some(limit) = cq.limit {
        let offset = crate::filter::paginate::skip(cq.page, limit);
        clause.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset));
    }
    clause
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ListParams;

    #[test]
    fn unbounded_query_has_no_limit_clause() {
        let cq = CommonQuery::unfiltered();
        assert_eq!(order_and_page_clause(&cq), " ORDER BY \"created_at\" DESC");
    }

    #[test]
    fn bounded_query_pages_with_offset() {
        let params = ListParams {
            sort: Some("asc".to_string()),
            page: Some("3".to_string()),
            limit: Some("10".to_string()),
            ..Default::default()
        };
        let cq = CommonQuery::from_params(&params);
        assert_eq!(
            order_and_page_clause(&cq),
            " ORDER BY \"created_at\" ASC LIMIT 10 OFFSET 20"
        );
    }
}
