//! REST client for the catalog API, split per entity the same way the API is.
//! The free functions map one-to-one onto endpoints; [`Catalog`] bundles them
//! behind a trait so the view layer can run against an in-memory fake.

mod authors;
mod books;
mod client;
mod error;
mod inventory;
mod stores;

#[cfg(test)]
pub(crate) mod fake;

use serde_json::Value;

use crate::models::{
    Author, Book, Collection, EntityId, NewAuthor, NewBook, NewInventory, NewStore, Store,
};

pub use authors::{create_author, list_authors, update_author};
pub use books::{create_book, list_books, update_book};
pub use client::ApiClient;
pub use error::ApiError;
pub use inventory::create_inventory;
pub use stores::{create_store, list_store_authors, list_store_books, list_stores, update_store};

/// `DELETE /{collection}/{id}`. The collection decides the endpoint, so a book
/// row is always deleted through `/books`.
pub fn delete_entity(
    client: &ApiClient,
    collection: Collection,
    id: EntityId,
) -> Result<Value, ApiError> {
    client.delete(&format!("/{}/{id}", collection.path()))
}

/// Every operation the admin screens perform against the catalog.
pub trait Catalog: Send + Sync {
    fn list_books(&self) -> Result<Vec<Book>, ApiError>;
    fn list_authors(&self) -> Result<Vec<Author>, ApiError>;
    fn list_stores(&self) -> Result<Vec<Store>, ApiError>;
    fn list_store_books(&self, store_id: EntityId) -> Result<Vec<Book>, ApiError>;
    fn list_store_authors(&self, store_id: EntityId) -> Result<Vec<Author>, ApiError>;
    fn create_author(&self, draft: &NewAuthor) -> Result<Value, ApiError>;
    fn create_book(&self, draft: &NewBook) -> Result<Value, ApiError>;
    fn create_store(&self, draft: &NewStore) -> Result<Value, ApiError>;
    fn create_inventory(&self, draft: &NewInventory) -> Result<Value, ApiError>;
    /// Name-only update, the only kind of update the API accepts.
    fn rename(&self, collection: Collection, id: EntityId, name: &str) -> Result<Value, ApiError>;
    fn delete(&self, collection: Collection, id: EntityId) -> Result<Value, ApiError>;
}

impl Catalog for ApiClient {
    fn list_books(&self) -> Result<Vec<Book>, ApiError> {
        list_books(self)
    }

    fn list_authors(&self) -> Result<Vec<Author>, ApiError> {
        list_authors(self)
    }

    fn list_stores(&self) -> Result<Vec<Store>, ApiError> {
        list_stores(self)
    }

    fn list_store_books(&self, store_id: EntityId) -> Result<Vec<Book>, ApiError> {
        list_store_books(self, store_id)
    }

    fn list_store_authors(&self, store_id: EntityId) -> Result<Vec<Author>, ApiError> {
        list_store_authors(self, store_id)
    }

    fn create_author(&self, draft: &NewAuthor) -> Result<Value, ApiError> {
        create_author(self, &draft.name)
    }

    fn create_book(&self, draft: &NewBook) -> Result<Value, ApiError> {
        create_book(self, &draft.name, draft.pages, draft.author_id)
    }

    fn create_store(&self, draft: &NewStore) -> Result<Value, ApiError> {
        create_store(self, &draft.name, &draft.address)
    }

    fn create_inventory(&self, draft: &NewInventory) -> Result<Value, ApiError> {
        create_inventory(self, draft.store_id, draft.book_id, draft.quantity)
    }

    fn rename(&self, collection: Collection, id: EntityId, name: &str) -> Result<Value, ApiError> {
        match collection {
            Collection::Books => update_book(self, id, name),
            Collection::Authors => update_author(self, id, name),
            Collection::Stores => update_store(self, id, name),
        }
    }

    fn delete(&self, collection: Collection, id: EntityId) -> Result<Value, ApiError> {
        delete_entity(self, collection, id)
    }
}
