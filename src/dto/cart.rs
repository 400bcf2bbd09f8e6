use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::{history::BuyHistoryEntry, navigation::Redirect},
    models::Product,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub cart_id: Uuid,
    pub items: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartUpdated {
    pub product_id: Uuid,
    pub redirect: Redirect,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub history: BuyHistoryEntry,
    pub redirect: Redirect,
}
