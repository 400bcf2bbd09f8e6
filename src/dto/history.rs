use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Product;

/// One checkout snapshot with the products bought in it.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BuyHistoryEntry {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct HistoryList {
    #[schema(value_type = Vec<BuyHistoryEntry>)]
    pub items: Vec<BuyHistoryEntry>,
}
