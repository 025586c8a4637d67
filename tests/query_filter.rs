//! End-to-end properties of the query parsing / filter construction /
//! pagination pipeline, exercised through the crate's public surface.

use anyhow::Result;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use proman_api::filter::{
    CommonQuery, FilterBuilder, ListParams, PageEnvelope, Resource, SortDirection, SqlParam,
};

fn params() -> ListParams {
    ListParams::default()
}

#[test]
fn empty_construction_matches_every_non_deleted_record() -> Result<()> {
    let cq = CommonQuery::from_params(&params());

    for resource in [Resource::Project, Resource::Task, Resource::Schedule, Resource::User] {
        let clause = FilterBuilder::build(&cq, resource);
        assert!(
            clause.sql.starts_with("\"deleted_at\" IS NULL"),
            "{:?}: {}",
            resource,
            clause.sql
        );
        // No narrowing condition besides the always-true default date span.
        assert!(!clause.sql.contains("ILIKE"));
        assert!(!clause.sql.contains("\"status\""));
        assert!(!clause.sql.contains("\"contributor\""));
    }

    assert_eq!(cq.start, DateTime::<Utc>::UNIX_EPOCH);
    assert_eq!(cq.end, DateTime::<Utc>::MAX_UTC);
    Ok(())
}

#[test]
fn date_range_uses_half_open_interval_boundaries() -> Result<()> {
    let cq = CommonQuery::from_params(&ListParams {
        start: Some("1000".to_string()),
        end: Some("2000".to_string()),
        ..params()
    });
    let clause = FilterBuilder::build(&cq, Resource::Task);

    // record.start < end (exclusive) and record.end >= start (inclusive),
    // OR record.start inside [start, end).
    let date_group = clause.sql.split(" AND (").last().unwrap_or_default();
    assert!(date_group.contains("\"start_date\" < "));
    assert!(date_group.contains("\"end_date\" >= "));
    assert!(!date_group.contains("\"end_date\" > "));
    assert!(!date_group.contains("\"start_date\" <= "));
    Ok(())
}

#[test]
fn invalid_status_filters_nothing() -> Result<()> {
    for bogus in ["bogus", "ACTIVE!", "pending"] {
        let cq = CommonQuery::from_params(&ListParams {
            status: Some(bogus.to_string()),
            ..params()
        });
        let clause = FilterBuilder::build(&cq, Resource::Task);
        assert!(
            !clause.sql.contains("\"status\""),
            "status {:?} must be a no-op for tasks: {}",
            bogus,
            clause.sql
        );
    }
    Ok(())
}

#[test]
fn contributor_filter_is_membership_not_equality() -> Result<()> {
    let user_id = Uuid::new_v4();
    let cq = CommonQuery::from_params(&ListParams {
        user_id: Some(user_id.to_string()),
        status: Some("active".to_string()),
        ..params()
    });
    let clause = FilterBuilder::build(&cq, Resource::Task);

    assert!(clause.sql.contains("\"contributor\" @> ARRAY["));
    assert!(!clause.sql.contains("\"contributor\" = "));
    assert!(clause.params.contains(&SqlParam::Uuid(user_id)));
    assert!(clause.sql.contains("\"status\" = "));
    Ok(())
}

#[test]
fn text_and_date_or_groups_are_independent_conjuncts() -> Result<()> {
    let cq = CommonQuery::from_params(&ListParams {
        q: Some("deploy".to_string()),
        start: Some("0".to_string()),
        end: Some("1700000000000".to_string()),
        ..params()
    });
    let clause = FilterBuilder::build(&cq, Resource::Project);

    // Both OR groups are present and separately parenthesized.
    let text_at = clause.sql.find("(\"name\" ILIKE").expect("text OR group");
    let date_at = clause.sql.find("((\"start_date\"").expect("date OR group");
    assert!(text_at < date_at);

    // The text group closes before the date group opens: the disjunctions
    // never flatten into one OR list.
    let glue = &clause.sql[text_at..date_at];
    assert!(glue.contains(") AND "), "flattened OR groups: {}", clause.sql);
    Ok(())
}

#[test]
fn pagination_math_matches_contract() -> Result<()> {
    for (total, limit, expected_pages) in
        [(0, 10, 0), (1, 10, 1), (10, 10, 1), (11, 10, 2), (95, 10, 10)]
    {
        let envelope = PageEnvelope::<u8>::new(vec![], total, 1, limit);
        assert_eq!(envelope.pages, expected_pages, "total={} limit={}", total, limit);
    }

    // Out-of-range page on a non-empty set: null result, accurate metadata.
    let envelope = PageEnvelope::<u8>::new(vec![], 31, 5, 10);
    assert!(envelope.result.is_none());
    assert_eq!((envelope.total, envelope.pages, envelope.page, envelope.limit), (31, 4, 5, 10));

    let payload = serde_json::to_value(&envelope)?;
    assert!(payload["result"].is_null());
    assert_eq!(payload["pages"], 4);

    // Page 1 of an empty set is an ordinary empty page.
    let envelope = PageEnvelope::<u8>::new(vec![], 0, 1, 10);
    assert!(envelope.result.is_some());
    Ok(())
}

#[test]
fn reused_query_resets_for_count_calls() -> Result<()> {
    let mut cq = CommonQuery::from_params(&ListParams {
        page: Some("7".to_string()),
        limit: Some("10".to_string()),
        start: Some("5000".to_string()),
        end: Some("9000".to_string()),
        sort: Some("asc".to_string()),
        ..params()
    });

    cq.reset_pagination();
    cq.reset_date_range();

    assert_eq!(cq.page, 1);
    assert_eq!(cq.limit, None);
    assert_eq!(cq.start, DateTime::<Utc>::UNIX_EPOCH);
    assert_eq!(cq.end, DateTime::<Utc>::MAX_UTC);
    // Non-pagination, non-date fields survive the resets.
    assert_eq!(cq.sort, SortDirection::Asc);
    Ok(())
}

#[test]
fn eight_week_overview_buckets_are_ordered() -> Result<()> {
    use proman_api::filter::query::{end_of_week, start_of_week};

    let offsets: Vec<i64> = (-7..=0).collect();
    assert_eq!(offsets.len(), 8);

    let mut previous_end: Option<DateTime<Utc>> = None;
    for offset in offsets {
        let start = start_of_week(offset);
        let end = end_of_week(offset);
        assert!(start < end);
        if let Some(prev) = previous_end {
            assert!(start > prev, "buckets must not overlap");
        }
        // Label format is day-of-month + abbreviated month, e.g. "04 Aug".
        let label = start.format("%d %b").to_string();
        assert_eq!(label.len(), 6, "unexpected label {:?}", label);
        previous_end = Some(end);
    }
    Ok(())
}
