use serde_json::Value;

use crate::models::{Author, Book, EntityId, NewStore, Rename, Store};

use super::client::ApiClient;
use super::error::ApiError;

pub fn list_stores(client: &ApiClient) -> Result<Vec<Store>, ApiError> {
    client.get("/stores")
}

pub fn create_store(client: &ApiClient, name: &str, address: &str) -> Result<Value, ApiError> {
    let draft = NewStore {
        name: name.to_string(),
        address: address.to_string(),
    };
    client.post("/stores", &draft)
}

/// `PUT /stores/{id}`. The address cannot be changed after creation.
pub fn update_store(client: &ApiClient, id: EntityId, name: &str) -> Result<Value, ApiError> {
    client.put(
        &format!("/stores/{id}"),
        &Rename {
            name: name.to_string(),
        },
    )
}

/// `GET /stores/{id}/books`: books stocked by one store.
pub fn list_store_books(client: &ApiClient, store_id: EntityId) -> Result<Vec<Book>, ApiError> {
    client.get(&format!("/stores/{store_id}/books"))
}

/// `GET /stores/{id}/authors`: authors with at least one book in the store.
pub fn list_store_authors(client: &ApiClient, store_id: EntityId) -> Result<Vec<Author>, ApiError> {
    client.get(&format!("/stores/{store_id}/authors"))
}
