use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

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

    /// Case-insensitive "asc"/"desc"; anything else yields `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("asc") {
            Some(SortDirection::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }
}

/// Fixed description of a listable table: which columns may be selected,
/// sorted on, and searched, plus an optional predicate applied to every query.
#[derive(Debug)]
pub struct ResourceSpec {
    pub table: &'static str,
    pub columns: &'static [&'static str],
    pub sortable: &'static [&'static str],
    pub searchable: &'static [&'static str],
    pub default_sort: &'static str,
    pub default_order: SortDirection,
    pub fixed_filter: Option<FixedFilter>,
}

/// `column = value` equality applied to every count and data query.
#[derive(Debug)]
pub struct FixedFilter {
    pub column: &'static str,
    pub value: &'static str,
}

/// Raw list parameters as they arrive on the query string.
/// Everything is optional and parsed leniently; bad values fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub search: Option<String>,
}

/// Effective, clamped pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    pub fn from_params(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_PAGE)
            .max(1);
        let limit = limit
            .and_then(|l| l.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_LIMIT)
            .clamp(1, MAX_LIMIT);
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn meta(&self, total: i64) -> PageMeta {
        let total_pages = if total <= 0 {
            0
        } else {
            (total + self.limit - 1) / self.limit
        };
        PageMeta {
            page: self.page,
            limit: self.limit,
            total,
            total_pages,
        }
    }
}

/// Pagination metadata carried in every listing envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterOrderInfo {
    pub column: &'static str,
    pub sort: SortDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<String>,
}
