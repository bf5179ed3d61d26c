use serde::Deserialize;
use serde_json::json;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// `page`, `page_size` and `ordering` query parameters shared by list endpoints.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ListParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub ordering: Option<String>,
}

impl ListParams {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.page_size()
    }

    /// Resolves `ordering` against a whitelist. A leading `-` means descending;
    /// anything not whitelisted falls back to `default`.
    pub fn order_by(&self, allowed: &[&'static str], default: &str) -> OrderBy {
        self.ordering
            .as_deref()
            .and_then(|ordering| OrderBy::parse(ordering, allowed))
            .or_else(|| OrderBy::parse(default, allowed))
            .unwrap_or(OrderBy {
                column: "created_at",
                descending: true,
            })
    }

    pub fn meta(&self, count: i64) -> serde_json::Value {
        let page_size = self.page_size();
        json!({
            "count": count,
            "page": self.page(),
            "page_size": page_size,
            "total_pages": (count + page_size - 1) / page_size,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub column: &'static str,
    pub descending: bool,
}

impl OrderBy {
    fn parse(value: &str, allowed: &[&'static str]) -> Option<Self> {
        let value = value.trim();
        let (name, descending) = match value.strip_prefix('-') {
            Some(name) => (name, true),
            None => (value, false),
        };

        allowed
            .iter()
            .copied()
            .find(|column| *column == name)
            .map(|column| OrderBy { column, descending })
    }

    /// SQL fragment for `ORDER BY`, qualified by `alias`. Only whitelisted
    /// column names ever reach this point.
    pub fn to_sql(&self, alias: &str) -> String {
        let direction = if self.descending {
            "DESC NULLS LAST"
        } else {
            "ASC NULLS FIRST"
        };
        format!("{alias}.{} {direction}, {alias}.id ASC", self.column)
    }
}
