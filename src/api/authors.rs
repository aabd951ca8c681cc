use serde_json::Value;

use crate::models::{Author, EntityId, NewAuthor, Rename};

use super::client::ApiClient;
use super::error::ApiError;

pub fn list_authors(client: &ApiClient) -> Result<Vec<Author>, ApiError> {
    client.get("/authors")
}

pub fn create_author(client: &ApiClient, name: &str) -> Result<Value, ApiError> {
    client.post(
        "/authors",
        &NewAuthor {
            name: name.to_string(),
        },
    )
}

pub fn update_author(client: &ApiClient, id: EntityId, name: &str) -> Result<Value, ApiError> {
    client.put(
        &format!("/authors/{id}"),
        &Rename {
            name: name.to_string(),
        },
    )
}
