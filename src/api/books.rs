use serde_json::Value;

use crate::models::{Book, EntityId, NewBook, Rename};

use super::client::ApiClient;
use super::error::ApiError;

/// `GET /books`: the full catalogue.
pub fn list_books(client: &ApiClient) -> Result<Vec<Book>, ApiError> {
    client.get("/books")
}

/// `POST /books`. The author is referenced by id; the response body is
/// returned as-is.
pub fn create_book(
    client: &ApiClient,
    name: &str,
    pages: i64,
    author_id: EntityId,
) -> Result<Value, ApiError> {
    let draft = NewBook {
        name: name.to_string(),
        pages,
        author_id,
    };
    client.post("/books", &draft)
}

/// `PUT /books/{id}`. Only the title can be changed through the API.
pub fn update_book(client: &ApiClient, id: EntityId, name: &str) -> Result<Value, ApiError> {
    client.put(
        &format!("/books/{id}"),
        &Rename {
            name: name.to_string(),
        },
    )
}
