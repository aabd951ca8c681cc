//! In-memory catalog used by the view-layer tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use serde_json::{json, Value};

use crate::models::{
    Author, Book, Collection, EntityId, NewAuthor, NewBook, NewInventory, NewStore, Store,
};

use super::{ApiError, Catalog};

#[derive(Default)]
struct State {
    books: Vec<Book>,
    authors: Vec<Author>,
    stores: Vec<Store>,
    store_books: HashMap<EntityId, Vec<Book>>,
    store_authors: HashMap<EntityId, Vec<Author>>,
    next_id: i64,
    failing: HashSet<&'static str>,
    calls: Vec<String>,
}

#[derive(Default)]
pub(crate) struct FakeCatalog {
    state: Mutex<State>,
}

pub(crate) fn book(id: i64, title: &str) -> Book {
    Book {
        id: EntityId(id),
        title: title.to_string(),
        author: String::new(),
        cover: String::new(),
        stores: Vec::new(),
        pages: 0,
        sold: false,
    }
}

pub(crate) fn author(id: i64, name: &str) -> Author {
    Author {
        id: EntityId(id),
        name: name.to_string(),
    }
}

pub(crate) fn store(id: i64, name: &str) -> Store {
    Store {
        id: EntityId(id),
        name: name.to_string(),
        location: String::new(),
    }
}

impl FakeCatalog {
    pub(crate) fn new() -> Self {
        let fake = Self::default();
        fake.state.lock().unwrap().next_id = 100;
        fake
    }

    pub(crate) fn with_books(self, books: Vec<Book>) -> Self {
        self.state.lock().unwrap().books = books;
        self
    }

    pub(crate) fn with_authors(self, authors: Vec<Author>) -> Self {
        self.state.lock().unwrap().authors = authors;
        self
    }

    pub(crate) fn with_stores(self, stores: Vec<Store>) -> Self {
        self.state.lock().unwrap().stores = stores;
        self
    }

    pub(crate) fn with_store_stock(self, store_id: i64, books: Vec<Book>, authors: Vec<Author>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.store_books.insert(EntityId(store_id), books);
            state.store_authors.insert(EntityId(store_id), authors);
        }
        self
    }

    /// Make every call of the named operation fail with a 503.
    pub(crate) fn fail(&self, op: &'static str) {
        self.state.lock().unwrap().failing.insert(op);
    }

    pub(crate) fn recover(&self, op: &'static str) {
        self.state.lock().unwrap().failing.remove(op);
    }

    /// Operation names in call order.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub(crate) fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub(crate) fn set_books(&self, books: Vec<Book>) {
        self.state.lock().unwrap().books = books;
    }

    fn enter(&self, op: &'static str) -> Result<std::sync::MutexGuard<'_, State>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(op.to_string());
        if state.failing.contains(op) {
            return Err(ApiError::Status {
                method: "FAKE".into(),
                url: format!("fake://{op}"),
                status: 503,
                body: String::new(),
            });
        }
        Ok(state)
    }
}

impl State {
    fn issue_id(&mut self) -> EntityId {
        self.next_id += 1;
        EntityId(self.next_id)
    }
}

impl Catalog for FakeCatalog {
    fn list_books(&self) -> Result<Vec<Book>, ApiError> {
        Ok(self.enter("list_books")?.books.clone())
    }

    fn list_authors(&self) -> Result<Vec<Author>, ApiError> {
        Ok(self.enter("list_authors")?.authors.clone())
    }

    fn list_stores(&self) -> Result<Vec<Store>, ApiError> {
        Ok(self.enter("list_stores")?.stores.clone())
    }

    fn list_store_books(&self, store_id: EntityId) -> Result<Vec<Book>, ApiError> {
        let state = self.enter("list_store_books")?;
        Ok(state.store_books.get(&store_id).cloned().unwrap_or_default())
    }

    fn list_store_authors(&self, store_id: EntityId) -> Result<Vec<Author>, ApiError> {
        let state = self.enter("list_store_authors")?;
        Ok(state.store_authors.get(&store_id).cloned().unwrap_or_default())
    }

    fn create_author(&self, draft: &NewAuthor) -> Result<Value, ApiError> {
        let mut state = self.enter("create_author")?;
        let id = state.issue_id();
        state.authors.push(author(id.0, &draft.name));
        Ok(json!({"id": id, "name": draft.name}))
    }

    fn create_book(&self, draft: &NewBook) -> Result<Value, ApiError> {
        let mut state = self.enter("create_book")?;
        let id = state.issue_id();
        let mut created = book(id.0, &draft.name);
        created.pages = draft.pages;
        state.books.push(created);
        Ok(json!({"id": id}))
    }

    fn create_store(&self, draft: &NewStore) -> Result<Value, ApiError> {
        let mut state = self.enter("create_store")?;
        let id = state.issue_id();
        let mut created = store(id.0, &draft.name);
        created.location = draft.address.clone();
        state.stores.push(created);
        Ok(json!({"id": id}))
    }

    fn create_inventory(&self, draft: &NewInventory) -> Result<Value, ApiError> {
        let mut state = self.enter("create_inventory")?;
        let stocked = state.books.iter().find(|b| b.id == draft.book_id).cloned();
        if let Some(stocked) = stocked {
            state
                .store_books
                .entry(draft.store_id)
                .or_default()
                .push(stocked);
        }
        Ok(Value::Null)
    }

    fn rename(&self, collection: Collection, id: EntityId, name: &str) -> Result<Value, ApiError> {
        let mut state = self.enter("rename")?;
        match collection {
            Collection::Books => state
                .books
                .iter_mut()
                .filter(|b| b.id == id)
                .for_each(|b| b.title = name.to_string()),
            Collection::Authors => state
                .authors
                .iter_mut()
                .filter(|a| a.id == id)
                .for_each(|a| a.name = name.to_string()),
            Collection::Stores => state
                .stores
                .iter_mut()
                .filter(|s| s.id == id)
                .for_each(|s| s.name = name.to_string()),
        }
        Ok(Value::Null)
    }

    fn delete(&self, collection: Collection, id: EntityId) -> Result<Value, ApiError> {
        let op = match collection {
            Collection::Books => "delete_book",
            Collection::Authors => "delete_author",
            Collection::Stores => "delete_store",
        };
        let mut state = self.enter(op)?;
        match collection {
            Collection::Books => state.books.retain(|b| b.id != id),
            Collection::Authors => state.authors.retain(|a| a.id != id),
            Collection::Stores => state.stores.retain(|s| s.id != id),
        }
        Ok(Value::Null)
    }
}
