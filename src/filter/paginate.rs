use serde::Serialize;

/// Page size applied by paginating handlers when the caller gives no limit.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Response wrapper for paginated lists.
///
/// `result` is null (not an error) when the requested page is beyond the
/// last page of a non-empty set; the metadata stays accurate so clients can
/// recover.
#[derive(Debug, Serialize)]
pub struct PageEnvelope<T> {
    pub result: Option<Vec<T>>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
    pub limit: i64,
}

impl<T> PageEnvelope<T> {
    pub fn new(data: Vec<T>, total: i64, page: i64, limit: i64) -> Self {
        let pages = total_pages(total, limit);
        let result = if page > pages && pages != 0 { None } else { Some(data) };
        Self { result, total, page, pages, limit }
    }
}

pub fn total_pages(total: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

/// Row offset for a 1-based page.
pub fn skip(page: i64, limit: i64) -> i64 {
    (page.max(1) - 1) * limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_is_ceil_of_total_over_limit() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(99, 10), 10);
        assert_eq!(total_pages(100, 10), 10);
    }

    #[test]
    fn skip_is_zero_based_offset() {
        assert_eq!(skip(1, 10), 0);
        assert_eq!(skip(3, 10), 20);
        assert_eq!(skip(0, 10), 0);
    }

    #[test]
    fn out_of_range_page_keeps_metadata() {
        let envelope = PageEnvelope::<i32>::new(vec![], 25, 9, 10);
        assert!(envelope.result.is_none());
        assert_eq!(envelope.total, 25);
        assert_eq!(envelope.pages, 3);
        assert_eq!(envelope.page, 9);
        assert_eq!(envelope.limit, 10);
    }

    #[test]
    fn empty_set_is_not_out_of_range() {
        let envelope = PageEnvelope::<i32>::new(vec![], 0, 1, 10);
        assert_eq!(envelope.result.as_deref(), Some(&[][..]));
        assert_eq!(envelope.pages, 0);
    }

    #[test]
    fn in_range_page_carries_rows() {
        let envelope = PageEnvelope::new(vec![1, 2, 3], 23, 3, 10);
        assert_eq!(envelope.result.as_deref(), Some(&[1, 2, 3][..]));
        assert_eq!(envelope.pages, 3);
    }

    #[test]
    fn envelope_serializes_null_result() {
        let envelope = PageEnvelope::<i32>::new(vec![], 25, 9, 10);
        let json = serde_json::to_value(&envelope).unwrap();
        assert!(json["result"].is_null());
        assert_eq!(json["total"], 25);
    }
}
