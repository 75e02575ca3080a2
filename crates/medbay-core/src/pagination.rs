//! Pagination primitives for list endpoints.
//!
//! Endpoints accept either `limit`/`offset` or `limit`/`page` query
//! parameters. When both `page` and `offset` are supplied, `page` wins.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Query parameters shared by paginated list endpoints.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PaginationParams {
    /// Maximum number of records to return (1 to 100, default 10).
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    /// Number of records to skip.
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub offset: Option<i64>,
    /// 1-based page number. Takes precedence over `offset`.
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
}

/// Query strings deliver numbers as strings, and clients sometimes send
/// empty values (`?limit=`). Treat empty as absent instead of rejecting
/// the request.
fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid integer: {value}"))),
    }
}

impl PaginationParams {
    /// Effective limit, clamped to 1..=100 with a default of 10.
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(10).clamp(1, 100)
    }

    /// Effective offset. `page` takes precedence over `offset`.
    #[must_use]
    pub fn offset(&self) -> i64 {
        if let Some(page) = self.page {
            (page.max(1) - 1) * self.limit()
        } else {
            self.offset.unwrap_or(0).max(0)
        }
    }
}

/// Pagination metadata returned alongside list data.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginationMeta {
    /// Total number of records matching the query.
    pub total: i64,
    /// Limit that was applied.
    pub limit: i64,
    /// Offset that was applied. Omitted when paging by `page`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    /// Page that was applied. Omitted when paging by `offset`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    /// Whether more records exist past this slice.
    pub has_more: bool,
}

impl PaginationMeta {
    #[must_use]
    pub fn new(params: &PaginationParams, total: i64) -> Self {
        let limit = params.limit();
        let offset = params.offset();
        Self {
            total,
            limit,
            offset: if params.page.is_none() { Some(offset) } else { None },
            page: params.page.map(|p| p.max(1)),
            has_more: offset + limit < total,
        }
    }
}
