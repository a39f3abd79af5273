// src/shared/api/query.rs
use serde::Deserialize;
use utoipa::IntoParams;

use crate::shared::pagination::PageRequest;

/// `?limit=&offset=` pair accepted by every list endpoint.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PageQuery {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl PageQuery {
    pub fn to_page(&self) -> PageRequest {
        PageRequest::new(self.limit, self.offset)
    }
}
