use chrono::SecondsFormat;

/// A 1-based page window over an ordered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
}

impl Page {
    /// Build a page window, falling back to page 1 and `default_limit`.
    ///
    /// `page` is floored at 1 and `limit` is clamped to `1..=max_limit`.
    pub fn new(page: Option<u32>, limit: Option<u32>, default_limit: u32, max_limit: u32) -> Self {
        let max_limit = max_limit.max(1);
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(default_limit).clamp(1, max_limit),
        }
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// Generate a new random ID (UUIDv4, no dashes).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string().replace('-', "")
}

/// Current UTC time as a fixed-width RFC 3339 string.
///
/// Fixed width (microseconds, `Z` suffix) keeps lexical order equal to
/// chronological order, which the listing queries rely on.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id() {
        let id = new_id();
        assert_eq!(id.len(), 32);
        assert!(!id.contains('-'));
    }

    #[test]
    fn test_now_rfc3339_is_fixed_width() {
        let a = now_rfc3339();
        let b = now_rfc3339();
        assert!(a.ends_with('Z'));
        assert_eq!(a.len(), "2026-01-01T00:00:00.000000Z".len());
        assert!(a <= b);
    }

    #[test]
    fn test_page_defaults() {
        let page = Page::new(None, None, 10, 100);
        assert_eq!(page, Page { page: 1, limit: 10 });
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_page_offset() {
        let page = Page::new(Some(3), Some(20), 10, 100);
        assert_eq!(page.offset(), 40);
    }

    #[test]
    fn test_page_clamps() {
        assert_eq!(Page::new(Some(0), Some(0), 10, 100), Page { page: 1, limit: 1 });
        assert_eq!(Page::new(None, Some(5000), 10, 100).limit, 100);
    }
}
