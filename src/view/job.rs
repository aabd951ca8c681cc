use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, error};
use serde_json::Value;

use crate::api::{ApiError, Catalog};
use crate::models::{
    Author, Book, Collection, EntityId, NewAuthor, NewBook, NewInventory, NewStore, Store,
};

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// Identity of one mounted page or dialog. Responses addressed to an instance
/// that is no longer on screen are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(u64);

impl InstanceId {
    pub fn next() -> Self {
        Self(NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed))
    }
}

/// Collections a view can fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Books,
    Authors,
    Stores,
    StoreBooks(EntityId),
    StoreAuthors(EntityId),
}

impl Source {
    pub fn describe(self) -> String {
        match self {
            Source::Books => "books".to_string(),
            Source::Authors => "authors".to_string(),
            Source::Stores => "stores".to_string(),
            Source::StoreBooks(id) => format!("books of store {id}"),
            Source::StoreAuthors(id) => format!("authors of store {id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Draft {
    Author(NewAuthor),
    Book(NewBook),
    Store(NewStore),
    Inventory(NewInventory),
}

impl Draft {
    pub fn noun(&self) -> &'static str {
        match self {
            Draft::Author(_) => "author",
            Draft::Book(_) => "book",
            Draft::Store(_) => "store",
            Draft::Inventory(_) => "inventory",
        }
    }
}

/// One API request and what it is for.
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    Fetch { source: Source, generation: u64 },
    Rename { collection: Collection, id: EntityId, name: String },
    Delete { collection: Collection, id: EntityId },
    Create(Draft),
}

/// A task tagged with the instance that issued it.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub owner: InstanceId,
    pub task: Task,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Books(Vec<Book>),
    Authors(Vec<Author>),
    Stores(Vec<Store>),
    Body(Value),
}

#[derive(Debug)]
pub struct Completion {
    pub job: Job,
    pub result: Result<Payload, ApiError>,
}

impl Job {
    pub fn new(owner: InstanceId, task: Task) -> Self {
        Self { owner, task }
    }

    /// Perform the request. Blocks the calling thread until the API answers.
    pub fn run(self, catalog: &dyn Catalog) -> Completion {
        let result = match &self.task {
            Task::Fetch { source, .. } => match *source {
                Source::Books => catalog.list_books().map(Payload::Books),
                Source::Authors => catalog.list_authors().map(Payload::Authors),
                Source::Stores => catalog.list_stores().map(Payload::Stores),
                Source::StoreBooks(id) => catalog.list_store_books(id).map(Payload::Books),
                Source::StoreAuthors(id) => catalog.list_store_authors(id).map(Payload::Authors),
            },
            Task::Rename {
                collection,
                id,
                name,
            } => catalog.rename(*collection, *id, name).map(Payload::Body),
            Task::Delete { collection, id } => catalog.delete(*collection, *id).map(Payload::Body),
            Task::Create(draft) => match draft {
                Draft::Author(d) => catalog.create_author(d),
                Draft::Book(d) => catalog.create_book(d),
                Draft::Store(d) => catalog.create_store(d),
                Draft::Inventory(d) => catalog.create_inventory(d),
            }
            .map(Payload::Body),
        };
        Completion { job: self, result }
    }
}

/// Monotonic fetch counter for one collection. Only the response to the most
/// recently issued fetch may replace the collection.
#[derive(Debug, Default, Clone)]
pub struct FetchGate {
    issued: u64,
}

impl FetchGate {
    pub fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.issued
    }
}

/// A fetched collection plus its loading flag.
#[derive(Debug, Clone)]
pub struct Feed<T> {
    items: Vec<T>,
    loading: bool,
    gate: FetchGate,
}

impl<T> Default for Feed<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            gate: FetchGate::default(),
        }
    }
}

impl<T> Feed<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut Vec<T> {
        &mut self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Mark the feed loading and hand out the generation for the new fetch.
    pub fn begin(&mut self) -> u64 {
        self.loading = true;
        self.gate.issue()
    }

    /// Apply a fetch result. Returns `false` when the generation is stale and
    /// the result was dropped. Failures keep the previous items.
    pub fn settle(
        &mut self,
        generation: u64,
        result: Result<Payload, ApiError>,
        unpack: fn(Payload) -> Option<Vec<T>>,
        what: &str,
    ) -> bool {
        if !self.gate.is_current(generation) {
            debug!("discarding stale {what} response (generation {generation})");
            return false;
        }
        self.loading = false;
        match result {
            Ok(payload) => match unpack(payload) {
                Some(items) => self.items = items,
                None => error!("Error fetching {what}: unexpected response shape"),
            },
            Err(err) => error!("Error fetching {what}: {err}"),
        }
        true
    }
}

impl Payload {
    pub fn into_books(self) -> Option<Vec<Book>> {
        match self {
            Payload::Books(books) => Some(books),
            _ => None,
        }
    }

    pub fn into_authors(self) -> Option<Vec<Author>> {
        match self {
            Payload::Authors(authors) => Some(authors),
            _ => None,
        }
    }

    pub fn into_stores(self) -> Option<Vec<Store>> {
        match self {
            Payload::Stores(stores) => Some(stores),
            _ => None,
        }
    }
}
