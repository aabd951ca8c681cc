//! Catalog records mirrored from the REST API. These are plain data holders:
//! the API owns every business rule, so the client only decodes, displays, and
//! sends them back. Drafts are the request bodies for create calls.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier issued by the API. The client never mints one itself; it only
/// echoes ids back in update, delete, and nested-list calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub i64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Top-level collections that support update and delete. Each maps to its own
/// endpoint, so a delete always targets the collection the row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Books,
    Authors,
    Stores,
}

impl Collection {
    /// Path segment of the collection endpoint, without slashes.
    pub fn path(self) -> &'static str {
        match self {
            Collection::Books => "books",
            Collection::Authors => "authors",
            Collection::Stores => "stores",
        }
    }

    /// Singular noun used in status and log messages.
    pub fn noun(self) -> &'static str {
        match self {
            Collection::Books => "book",
            Collection::Authors => "author",
            Collection::Stores => "store",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A book as listed by `/books` and `/stores/{id}/books`.
pub struct Book {
    pub id: EntityId,
    /// Some endpoints call this `name`; both spellings land here.
    #[serde(alias = "name")]
    pub title: String,
    /// Author display name, not an id.
    #[serde(default)]
    pub author: String,
    /// Cover image URL.
    #[serde(default)]
    pub cover: String,
    /// Names of the stores carrying this book.
    #[serde(default)]
    pub stores: Vec<String>,
    #[serde(default)]
    pub pages: i64,
    /// Set by the shop's "sell" action. Never sent to or read from the API, so
    /// every re-fetch resets it.
    #[serde(skip)]
    pub sold: bool,
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: EntityId,
    pub name: String,
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: EntityId,
    pub name: String,
    /// Street address. Creation sends it as `address`, listings may return it
    /// as `location`.
    #[serde(default, alias = "address")]
    pub location: String,
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Body of `POST /authors`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAuthor {
    pub name: String,
}

/// Body of `POST /books`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub name: String,
    pub pages: i64,
    pub author_id: EntityId,
}

/// Body of `POST /stores`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewStore {
    pub name: String,
    pub address: String,
}

/// Body of `POST /inventory`. Inventory rows are never read back.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInventory {
    pub store_id: EntityId,
    pub book_id: EntityId,
    pub quantity: i64,
}

/// Body of every `PUT /{collection}/{id}`. Updates only ever carry the name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rename {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_accepts_name_alias_and_defaults_missing_fields() {
        let book: Book = serde_json::from_str(r#"{"id": 7, "name": "Dune"}"#).unwrap();
        assert_eq!(book.id, EntityId(7));
        assert_eq!(book.title, "Dune");
        assert!(book.stores.is_empty());
        assert!(!book.sold);
    }

    #[test]
    fn sold_flag_is_never_serialized() {
        let book = Book {
            id: EntityId(1),
            title: "Atlas".into(),
            author: "Rand".into(),
            cover: String::new(),
            stores: vec![],
            pages: 10,
            sold: true,
        };
        let json = serde_json::to_value(&book).unwrap();
        assert!(json.get("sold").is_none());
    }

    #[test]
    fn drafts_use_camel_case_keys() {
        let draft = NewInventory {
            store_id: EntityId(3),
            book_id: EntityId(4),
            quantity: 2,
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json, serde_json::json!({"storeId": 3, "bookId": 4, "quantity": 2}));
    }
}
