//! Pagination, sort and search parameters for recipe listings.
//!
//! Raw parameters come straight from a URL query string, so normalization is
//! deliberately permissive: anything missing or malformed falls back to a
//! default and nothing here can fail.

use serde::{Deserialize, Serialize};

/// Default number of recipes per page.
pub const DEFAULT_LIMIT: u32 = 12;

/// Sort option used when none (or a non-string value) is supplied.
pub const DEFAULT_SORT_OPTION: &str = "popular";

/// A single raw query-string parameter.
///
/// A key that appears more than once is a list, not a string, and is treated
/// as if no usable value was given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RawParam {
    #[default]
    Missing,
    Single(String),
    Multiple(Vec<String>),
}

impl RawParam {
    fn push(&mut self, value: String) {
        *self = match std::mem::take(self) {
            Self::Missing => Self::Single(value),
            Self::Single(first) => Self::Multiple(vec![first, value]),
            Self::Multiple(mut values) => {
                values.push(value);
                Self::Multiple(values)
            }
        };
    }

    /// The value when exactly one was supplied.
    #[must_use]
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            Self::Missing | Self::Multiple(_) => None,
        }
    }
}

/// Unvalidated listing parameters as received from the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPaginationQuery {
    pub page: RawParam,
    pub limit: RawParam,
    pub sort_option: RawParam,
    pub query: RawParam,
}

impl RawPaginationQuery {
    /// Collect the recognised parameters from decoded query-string pairs.
    ///
    /// Unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut raw = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "page" => &mut raw.page,
                "limit" => &mut raw.limit,
                "sortOption" => &mut raw.sort_option,
                "query" => &mut raw.query,
                _ => continue,
            };
            slot.push(value.into());
        }
        raw
    }
}

/// Validated listing parameters.
///
/// Invariant: `skip == (page - 1) * limit`, with `page >= 1` and `limit >= 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationQuery {
    pub page: u32,
    pub limit: u32,
    pub skip: u64,
    pub sort_option: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl PaginationQuery {
    /// Normalize raw parameters, substituting defaults for anything unusable.
    #[must_use]
    pub fn normalize(raw: &RawPaginationQuery) -> Self {
        let page = positive_integer(&raw.page).unwrap_or(1);
        let limit = positive_integer(&raw.limit).unwrap_or(DEFAULT_LIMIT);
        let skip = u64::from(page - 1) * u64::from(limit);
        let sort_option = raw
            .sort_option
            .as_single()
            .unwrap_or(DEFAULT_SORT_OPTION)
            .to_string();
        let query = raw.query.as_single().map(str::to_string);

        Self {
            page,
            limit,
            skip,
            sort_option,
            query,
        }
    }

    /// Parameters to forward to the REST API listing endpoint.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
            ("sortOption", self.sort_option.clone()),
        ];
        if let Some(query) = &self.query {
            pairs.push(("query", query.clone()));
        }
        pairs
    }
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self::normalize(&RawPaginationQuery::default())
    }
}

impl From<&RawPaginationQuery> for PaginationQuery {
    fn from(raw: &RawPaginationQuery) -> Self {
        Self::normalize(raw)
    }
}

/// Integer coercion: surrounding whitespace is ignored and anything that is
/// not a whole number of at least 1 yields `None`.
fn positive_integer(param: &RawParam) -> Option<u32> {
    param
        .as_single()
        .and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|&n| n >= 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> RawPaginationQuery {
        RawPaginationQuery::from_pairs(pairs.iter().map(|(k, v)| (*k, *v)))
    }

    #[test]
    fn test_normalize_numeric_strings() {
        let query = PaginationQuery::normalize(&raw(&[("page", "3"), ("limit", "5")]));
        assert_eq!(
            query,
            PaginationQuery {
                page: 3,
                limit: 5,
                skip: 10,
                sort_option: "popular".to_string(),
                query: None,
            }
        );
    }

    #[test]
    fn test_normalize_defaults() {
        let query = PaginationQuery::default();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 12);
        assert_eq!(query.skip, 0);
        assert_eq!(query.sort_option, "popular");
        assert_eq!(query.query, None);
    }

    #[test]
    fn test_non_numeric_page_falls_back() {
        for bad in ["abc", "", "  ", "0", "-2", "3.5", "NaN", "1e3"] {
            let query = PaginationQuery::normalize(&raw(&[("page", bad)]));
            assert_eq!(query.page, 1, "page {bad:?} should default");
            assert_eq!(query.skip, 0);
        }
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let query = PaginationQuery::normalize(&raw(&[("page", " 2 "), ("limit", "\t4")]));
        assert_eq!(query.page, 2);
        assert_eq!(query.limit, 4);
        assert_eq!(query.skip, 4);
    }

    #[test]
    fn test_repeated_params_are_not_strings() {
        let query = PaginationQuery::normalize(&raw(&[
            ("sortOption", "recent"),
            ("sortOption", "popular"),
            ("query", "tofu"),
            ("query", "rice"),
            ("page", "2"),
            ("page", "3"),
        ]));
        assert_eq!(query.sort_option, "popular");
        assert_eq!(query.query, None);
        assert_eq!(query.page, 1);
    }

    #[test]
    fn test_search_and_sort_pass_through() {
        let query = PaginationQuery::normalize(&raw(&[
            ("sortOption", "recent"),
            ("query", "lentil soup"),
            ("utm_source", "mail"),
        ]));
        assert_eq!(query.sort_option, "recent");
        assert_eq!(query.query.as_deref(), Some("lentil soup"));
    }

    #[test]
    fn test_skip_does_not_overflow() {
        let max = u32::MAX.to_string();
        let query = PaginationQuery::normalize(&raw(&[("page", &max), ("limit", &max)]));
        assert_eq!(query.skip, u64::from(u32::MAX - 1) * u64::from(u32::MAX));
    }

    #[test]
    fn test_to_query_pairs() {
        let query = PaginationQuery::normalize(&raw(&[("page", "2"), ("query", "kimchi")]));
        assert_eq!(
            query.to_query_pairs(),
            vec![
                ("page", "2".to_string()),
                ("limit", "12".to_string()),
                ("sortOption", "popular".to_string()),
                ("query", "kimchi".to_string()),
            ]
        );
    }

    #[test]
    fn test_serializes_camel_case() {
        let value = serde_json::to_value(PaginationQuery::default()).unwrap_or_default();
        assert_eq!(value["sortOption"], "popular");
        assert!(value.get("query").is_none());
    }
}
