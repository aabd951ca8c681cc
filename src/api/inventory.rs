use serde_json::Value;

use crate::models::{EntityId, NewInventory};

use super::client::ApiClient;
use super::error::ApiError;

/// `POST /inventory`: stock a book in a store.
pub fn create_inventory(
    client: &ApiClient,
    store_id: EntityId,
    book_id: EntityId,
    quantity: i64,
) -> Result<Value, ApiError> {
    let draft = NewInventory {
        store_id,
        book_id,
        quantity,
    };
    client.post("/inventory", &draft)
}
