use serde::{Deserialize, Serialize};

use crate::entities::inventory_item::ItemStatus;

/// Query parameters shared by list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
    pub search: Option<String>,
    /// Status filter; absent or "All" means no filter.
    pub status: Option<String>,
    /// When true, list endpoints that support it return the full
    /// available set instead of a page.
    #[serde(default)]
    pub all: bool,
}

fn default_page() -> u64 {
    1
}
fn default_limit() -> u64 {
    10
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            search: None,
            status: None,
            all: false,
        }
    }
}

impl ListQuery {
    /// Page size for queries. `limit=0` would divide by zero in the page
    /// count and panic the query builder, so it is clamped to 1.
    pub fn per_page(&self) -> u64 {
        self.limit.max(1)
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn status_filter(&self) -> Option<ItemStatus> {
        match self.status.as_deref() {
            None | Some("") | Some("All") => None,
            Some("IN_STOCK") => Some(ItemStatus::InStock),
            Some("SOLD") => Some(ItemStatus::Sold),
            Some("BORROWED") => Some(ItemStatus::Borrowed),
            Some("IN_WAREHOUSE") => Some(ItemStatus::InWarehouse),
            Some("ASSIGNED") => Some(ItemStatus::Assigned),
            Some("DECOMMISSIONED") => Some(ItemStatus::Decommissioned),
            Some("DEFECTIVE") => Some(ItemStatus::Defective),
            Some(_) => None,
        }
    }
}

/// Pagination metadata in the response contract shared with the frontend.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub total_items: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub items_per_page: u64,
}

/// Standard paginated response wrapper: `{ data, pagination }`.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, query: &ListQuery, total_items: u64) -> Self {
        let per_page = query.per_page();
        let total_pages = if total_items == 0 {
            0
        } else {
            (total_items + per_page - 1) / per_page
        };
        Self {
            data,
            pagination: PaginationMeta {
                total_items,
                total_pages,
                current_page: query.page,
                items_per_page: per_page,
            },
        }
    }
}
