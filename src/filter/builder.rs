use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::query::CommonQuery;
use crate::types::{ProjectKind, ProjectStatus, ScheduleKind, TaskStatus};

/// Typed bind parameter carried alongside a generated SQL fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Uuid(Uuid),
    Time(DateTime<Utc>),
}

/// A WHERE fragment plus its positional bind parameters ($1-based).
#[derive(Debug, Clone)]
pub struct SqlClause {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

/// Resource a filter targets. Decides which columns the free-text search
/// covers and which enumeration validates the status/type values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Project,
    Task,
    Schedule,
    User,
}

impl Resource {
    fn search_columns(&self) -> (&'static str, &'static str) {
        match self {
            Resource::User => ("name", "email"),
            _ => ("name", "description"),
        }
    }

    fn validates_status(&self, status: &str) -> bool {
        match self {
            Resource::Project => ProjectStatus::parse(status).is_some(),
            Resource::Task => TaskStatus::parse(status).is_some(),
            Resource::Schedule | Resource::User => false,
        }
    }

    fn validates_kind(&self, kind: &str) -> bool {
        match self {
            Resource::Project => ProjectKind::parse(kind).is_some(),
            Resource::Schedule => ScheduleKind::parse(kind).is_some(),
            Resource::Task | Resource::User => false,
        }
    }

    fn has_date_range(&self) -> bool {
        !matches!(self, Resource::User)
    }

    fn has_contributors(&self) -> bool {
        !matches!(self, Resource::User)
    }
}

/// Translates a [`CommonQuery`] into a conjunctive WHERE clause.
///
/// Each rule contributes one condition joined by AND. The free-text
/// disjunction and the date-overlap disjunction stay separate parenthesized
/// groups; flattening them into a single OR list would let a record match on
/// text alone while falling outside the requested date range.
pub struct FilterBuilder {
    conditions: Vec<String>,
    params: Vec<SqlParam>,
}

impl FilterBuilder {
    fn new() -> Self {
        Self { conditions: vec![], params: vec![] }
    }

    pub fn build(cq: &CommonQuery, resource: Resource) -> SqlClause {
        let mut b = Self::new();

        // Tombstoned records never match.
        b.conditions.push("\"deleted_at\" IS NULL".to_string());

        if !cq.q.is_empty() {
            let (left, right) = resource.search_columns();
            let pattern = like_pattern(&cq.q);
            let p1 = b.param(SqlParam::Text(pattern.clone()));
            let p2 = b.param(SqlParam::Text(pattern));
            b.conditions
                .push(format!("(\"{}\" ILIKE {} OR \"{}\" ILIKE {})", left, p1, right, p2));
        }

        // Status/type equality only applies when the value belongs to the
        // resource's enumeration; anything else is a no-op, not an error.
        if !cq.status.is_empty() && resource.validates_status(&cq.status) {
            let p = b.param(SqlParam::Text(cq.status.clone()));
            b.conditions.push(format!("\"status\" = {}", p));
        }

        if !cq.kind.is_empty() && resource.validates_kind(&cq.kind) {
            let p = b.param(SqlParam::Text(cq.kind.clone()));
            b.conditions.push(format!("\"type\" = {}", p));
        }

        if resource.has_contributors() {
            if let Some(user_id) = cq.user_id {
                let p = b.param(SqlParam::Uuid(user_id));
                b.conditions.push(format!("\"contributor\" @> ARRAY[{}]", p));
            }
        }

        if resource == Resource::Task {
            if let Some(project_id) = cq.project_id {
                let p = b.param(SqlParam::Uuid(project_id));
                b.conditions.push(format!("\"project_id\" = {}", p));
            }
        }

        // A record matches when its [start_date, end_date) interval overlaps
        // the query's [start, end) interval.
        if resource.has_date_range() {
            let end_a = b.param(SqlParam::Time(cq.end));
            let start_a = b.param(SqlParam::Time(cq.start));
            let start_b = b.param(SqlParam::Time(cq.start));
            let end_b = b.param(SqlParam::Time(cq.end));
            b.conditions.push(format!(
                "((\"start_date\" < {} AND \"end_date\" >= {}) OR (\"start_date\" >= {} AND \"start_date\" < {}))",
                end_a, start_a, start_b, end_b
            ));
        }

        SqlClause { sql: b.conditions.join(" AND "), params: b.params }
    }

    fn param(&mut self, value: SqlParam) -> String {
        self.params.push(value);
        format!("${}", self.params.len())
    }
}

/// Substring-match pattern with LIKE metacharacters escaped so user input is
/// matched literally.
fn like_pattern(q: &str) -> String {
    let mut escaped = String::with_capacity(q.len() + 2);
    for c in q.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::query::ListParams;

    fn query(params: ListParams) -> CommonQuery {
        CommonQuery::from_params(&params)
    }

    #[test]
    fn empty_query_still_excludes_tombstones() {
        let clause = FilterBuilder::build(&CommonQuery::unfiltered(), Resource::Task);
        assert!(clause.sql.starts_with("\"deleted_at\" IS NULL"));
        // unbounded date span is still emitted; it matches every record
        assert_eq!(clause.params.len(), 4);
    }

    #[test]
    fn user_filter_has_no_date_conjunct() {
        let clause = FilterBuilder::build(&CommonQuery::unfiltered(), Resource::User);
        assert_eq!(clause.sql, "\"deleted_at\" IS NULL");
        assert!(clause.params.is_empty());
    }

    #[test]
    fn text_search_covers_both_columns() {
        let cq = query(ListParams { q: Some("alpha".to_string()), ..Default::default() });

        let clause = FilterBuilder::build(&cq, Resource::Project);
        assert!(clause.sql.contains("(\"name\" ILIKE $1 OR \"description\" ILIKE $2)"));
        assert_eq!(clause.params[0], SqlParam::Text("%alpha%".to_string()));

        let clause = FilterBuilder::build(&cq, Resource::User);
        assert!(clause.sql.contains("(\"name\" ILIKE $1 OR \"email\" ILIKE $2)"));
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        let cq = query(ListParams { q: Some("50%_done".to_string()), ..Default::default() });
        let clause = FilterBuilder::build(&cq, Resource::Task);
        assert_eq!(clause.params[0], SqlParam::Text("%50\\%\\_done%".to_string()));
    }

    #[test]
    fn invalid_status_is_a_no_op() {
        let bogus = query(ListParams { status: Some("bogus".to_string()), ..Default::default() });
        let clause = FilterBuilder::build(&bogus, Resource::Task);
        assert!(!clause.sql.contains("\"status\""));

        // "pending" is a project status, not a task status
        let pending = query(ListParams { status: Some("pending".to_string()), ..Default::default() });
        assert!(!FilterBuilder::build(&pending, Resource::Task).sql.contains("\"status\""));
        assert!(FilterBuilder::build(&pending, Resource::Project).sql.contains("\"status\" = $1"));
    }

    #[test]
    fn kind_applies_to_schedule_and_project_only() {
        let cq = query(ListParams { kind: Some("meeting".to_string()), ..Default::default() });
        assert!(FilterBuilder::build(&cq, Resource::Schedule).sql.contains("\"type\" = $1"));
        assert!(!FilterBuilder::build(&cq, Resource::Task).sql.contains("\"type\""));
        assert!(!FilterBuilder::build(&cq, Resource::Project).sql.contains("\"type\""));
    }

    #[test]
    fn contributor_membership_and_project_equality() {
        let user_id = Uuid::new_v4();
        let project_id = Uuid::new_v4();
        let cq = query(ListParams {
            user_id: Some(user_id.to_string()),
            project_id: Some(project_id.to_string()),
            ..Default::default()
        });

        let clause = FilterBuilder::build(&cq, Resource::Task);
        assert!(clause.sql.contains("\"contributor\" @> ARRAY[$1]"));
        assert!(clause.sql.contains("\"project_id\" = $2"));
        assert_eq!(clause.params[0], SqlParam::Uuid(user_id));
        assert_eq!(clause.params[1], SqlParam::Uuid(project_id));

        // projectId only narrows tasks
        let clause = FilterBuilder::build(&cq, Resource::Project);
        assert!(!clause.sql.contains("\"project_id\""));
    }

    #[test]
    fn text_and_date_disjunctions_stay_nested() {
        let cq = query(ListParams {
            q: Some("alpha".to_string()),
            start: Some("1000".to_string()),
            end: Some("2000".to_string()),
            ..Default::default()
        });
        let clause = FilterBuilder::build(&cq, Resource::Schedule);

        // Two independent parenthesized OR groups joined by AND, never one
        // flattened OR list.
        let text_group = clause.sql.find("(\"name\" ILIKE").expect("text group");
        let date_group = clause.sql.find("((\"start_date\"").expect("date group");
        let between = &clause.sql[text_group..date_group];
        assert!(between.contains(" AND "), "groups must be ANDed: {}", clause.sql);

        // The date group binds end, start, start, end in that order.
        assert_eq!(clause.params.len(), 6);
        assert!(matches!(clause.params[2], SqlParam::Time(_)));
        assert_eq!(clause.params[2], clause.params[5]);
        assert_eq!(clause.params[3], clause.params[4]);
    }

    #[test]
    fn param_placeholders_are_sequential() {
        let cq = query(ListParams {
            q: Some("x".to_string()),
            status: Some("active".to_string()),
            user_id: Some(Uuid::new_v4().to_string()),
            ..Default::default()
        });
        let clause = FilterBuilder::build(&cq, Resource::Task);
        for i in 1..=clause.params.len() {
            assert!(
                clause.sql.contains(&format!("${}", i)),
                "missing ${} in {}",
                i,
                clause.sql
            );
        }
    }
}
