use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Utc};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Raw list-endpoint query parameters as they arrive on the wire.
///
/// Every field is an optional string; parsing happens in
/// [`CommonQuery::from_params`] so that malformed values fall back to
/// defaults instead of rejecting the request.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    #[serde(rename = "projectId")]
    pub project_id: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Normalized list-endpoint filter.
///
/// Constructed once per request; read-only afterwards except for the two
/// reset operations used when the same query drives a data fetch and then a
/// count fetch. `limit: None` means unbounded (internal count-style calls);
/// paginating handlers substitute [`super::DEFAULT_PAGE_SIZE`].
#[derive(Debug, Clone)]
pub struct CommonQuery {
    pub q: String,
    pub status: String,
    pub kind: String,
    pub user_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub sort: SortDirection,
    pub page: i64,
    pub limit: Option<i64>,
}

impl CommonQuery {
    pub fn from_params(params: &ListParams) -> Self {
        let mut cq = Self::unfiltered();

        if let Some(q) = &params.q {
            cq.q = q.trim().to_string();
        }
        if let Some(status) = &params.status {
            cq.status = status.trim().to_lowercase();
        }
        if let Some(kind) = &params.kind {
            cq.kind = kind.trim().to_lowercase();
        }
        if let Some(raw) = &params.user_id {
            cq.user_id = parse_id(raw);
        }
        if let Some(raw) = &params.project_id {
            cq.project_id = parse_id(raw);
        }
        if let Some(raw) = &params.start {
            if let Some(ts) = parse_timestamp(raw) {
                cq.start = ts;
            }
        }
        if let Some(raw) = &params.end {
            if let Some(ts) = parse_timestamp(raw) {
                cq.end = ts;
            }
        }
        if let Some(sort) = &params.sort {
            if sort.trim() == "asc" {
                cq.sort = SortDirection::Asc;
            }
        }
        if let Some(raw) = &params.page {
            if let Ok(page) = raw.trim().parse::<i64>() {
                if page > 0 {
                    cq.page = page;
                }
            }
        }
        if let Some(raw) = &params.limit {
            if let Ok(limit) = raw.trim().parse::<i64>() {
                if limit > 0 {
                    cq.limit = Some(limit);
                }
            }
        }
        cq
    }

    /// A query that matches every non-deleted record of a resource.
    pub fn unfiltered() -> Self {
        Self {
            q: String::new(),
            status: String::new(),
            kind: String::new(),
            user_id: None,
            project_id: None,
            start: DateTime::<Utc>::UNIX_EPOCH,
            end: DateTime::<Utc>::MAX_UTC,
            sort: SortDirection::Desc,
            page: 1,
            limit: None,
        }
    }

    /// Drop pagination so a sibling count call sees the whole filtered set.
    pub fn reset_pagination(&mut self) -> &mut Self {
        self.page = 1;
        self.limit = None;
        self
    }

    /// Restore the full date span so a sibling count call is not narrowed by
    /// the list's range.
    pub fn reset_date_range(&mut self) -> &mut Self {
        self.start = DateTime::<Utc>::UNIX_EPOCH;
        self.end = DateTime::<Utc>::MAX_UTC;
        self
    }
}

/// Invalid ids and the all-zero id both mean "no filter on this field".
fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok().filter(|id| !id.is_nil())
}

/// Accepts epoch-millis or RFC3339; both appear across endpoint families.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(millis) = raw.parse::<i64>() {
        return Utc.timestamp_millis_opt(millis).single();
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Monday 00:00 UTC of the week `offset` weeks away from the current one.
pub fn start_of_week(offset: i64) -> DateTime<Utc> {
    let today = Utc::now().date_naive();
    let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64)
        + Duration::weeks(offset);
    monday.and_time(NaiveTime::MIN).and_utc()
}

/// Last second of the week `offset` weeks away from the current one.
pub fn end_of_week(offset: i64) -> DateTime<Utc> {
    start_of_week(offset + 1) - Duration::seconds(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn empty_params_match_everything() {
        let cq = CommonQuery::from_params(&ListParams::default());
        assert_eq!(cq.q, "");
        assert_eq!(cq.status, "");
        assert_eq!(cq.user_id, None);
        assert_eq!(cq.start, DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(cq.end, DateTime::<Utc>::MAX_UTC);
        assert_eq!(cq.sort, SortDirection::Desc);
        assert_eq!(cq.page, 1);
        assert_eq!(cq.limit, None);
    }

    #[test]
    fn status_and_type_are_normalized() {
        let params = ListParams {
            status: Some("  Active ".to_string()),
            kind: Some("MEETING".to_string()),
            ..Default::default()
        };
        let cq = CommonQuery::from_params(&params);
        assert_eq!(cq.status, "active");
        assert_eq!(cq.kind, "meeting");
    }

    #[test]
    fn invalid_ids_mean_no_filter() {
        let params = ListParams {
            user_id: Some("not-a-uuid".to_string()),
            project_id: Some(Uuid::nil().to_string()),
            ..Default::default()
        };
        let cq = CommonQuery::from_params(&params);
        assert_eq!(cq.user_id, None);
        assert_eq!(cq.project_id, None);

        let id = Uuid::new_v4();
        let params = ListParams { user_id: Some(id.to_string()), ..Default::default() };
        assert_eq!(CommonQuery::from_params(&params).user_id, Some(id));
    }

    #[test]
    fn timestamps_accept_millis_and_rfc3339() {
        let params = ListParams {
            start: Some("0".to_string()),
            end: Some("2024-03-01T00:00:00Z".to_string()),
            ..Default::default()
        };
        let cq = CommonQuery::from_params(&params);
        assert_eq!(cq.start, DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(cq.end.to_rfc3339(), "2024-03-01T00:00:00+00:00");

        let bad = ListParams { start: Some("yesterday".to_string()), ..Default::default() };
        assert_eq!(CommonQuery::from_params(&bad).start, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn sort_defaults_to_desc() {
        let asc = ListParams { sort: Some("asc".to_string()), ..Default::default() };
        assert_eq!(CommonQuery::from_params(&asc).sort, SortDirection::Asc);

        let junk = ListParams { sort: Some("sideways".to_string()), ..Default::default() };
        assert_eq!(CommonQuery::from_params(&junk).sort, SortDirection::Desc);
    }

    #[test]
    fn page_and_limit_reject_non_positive() {
        let params = ListParams {
            page: Some("0".to_string()),
            limit: Some("-5".to_string()),
            ..Default::default()
        };
        let cq = CommonQuery::from_params(&params);
        assert_eq!(cq.page, 1);
        assert_eq!(cq.limit, None);

        let params = ListParams {
            page: Some("3".to_string()),
            limit: Some("25".to_string()),
            ..Default::default()
        };
        let cq = CommonQuery::from_params(&params);
        assert_eq!(cq.page, 3);
        assert_eq!(cq.limit, Some(25));
    }

    #[test]
    fn resets() {
        let params = ListParams {
            page: Some("4".to_string()),
            limit: Some("10".to_string()),
            start: Some("1000".to_string()),
            end: Some("2000".to_string()),
            ..Default::default()
        };
        let mut cq = CommonQuery::from_params(&params);

        cq.reset_pagination();
        assert_eq!(cq.page, 1);
        assert_eq!(cq.limit, None);

        cq.reset_date_range();
        assert_eq!(cq.start, DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(cq.end, DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn weeks_start_on_monday_and_are_ordered() {
        let mut prev = None;
        for offset in -7..=0 {
            let start = start_of_week(offset);
            let end = end_of_week(offset);
            assert_eq!(start.weekday(), Weekday::Mon);
            assert!(start < end);
            if let Some(p) = prev {
                assert!(start > p, "weeks must increase in calendar order");
            }
            prev = Some(start);
        }
    }

    #[test]
    fn week_end_is_one_second_before_next_week() {
        let end = end_of_week(0);
        let next = start_of_week(1);
        assert_eq!(next - end, Duration::seconds(1));
    }
}
