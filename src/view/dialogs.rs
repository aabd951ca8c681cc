//! Creation dialogs. Each dialog owns its draft fields, a `submitting` flag,
//! and (for books and inventory) a separately loaded option list. Dialogs never
//! touch the owning page directly; they report [`DialogEvent::Created`] and the
//! page reloads itself.

use log::{error, info};

use crate::api::ApiError;
use crate::models::{Author, Book, EntityId, NewAuthor, NewBook, NewInventory, NewStore};

use super::job::{Draft, Feed, InstanceId, Job, Payload, Source, Task};

/// What a completion meant to the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogEvent {
    Created,
    Failed,
    OptionsLoaded,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Choice,
}

/// Render-ready snapshot of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub label: &'static str,
    pub value: String,
    pub active: bool,
    pub kind: FieldKind,
}

pub trait CreationDialog {
    fn instance(&self) -> InstanceId;
    fn title(&self) -> &'static str;

    /// Called every time the dialog is shown. May return a fetch for the
    /// option list.
    fn on_open(&mut self) -> Option<Job> {
        None
    }

    /// Start a create request. Returns `None` while a submit is in flight or
    /// when a required field is missing.
    fn submit(&mut self) -> Option<Job>;
    fn complete(&mut self, task: Task, result: Result<Payload, ApiError>) -> DialogEvent;
    fn is_submitting(&self) -> bool;

    fn is_loading_options(&self) -> bool {
        false
    }

    fn fields(&self) -> Vec<FieldView>;
    fn push_char(&mut self, ch: char) -> bool;
    fn backspace(&mut self);
    fn next_field(&mut self);

    /// Move the selection of the active choice field.
    fn cycle_option(&mut self, _offset: isize) {}
}

/// Shared handling of a create response: clear on success, keep everything on
/// failure.
fn settle_create(
    submitting: &mut bool,
    result: Result<Payload, ApiError>,
    noun: &str,
    clear: impl FnOnce(),
) -> DialogEvent {
    *submitting = false;
    match result {
        Ok(_) => {
            info!("created {noun}");
            clear();
            DialogEvent::Created
        }
        Err(err) => {
            error!("Error adding {noun}: {err}");
            DialogEvent::Failed
        }
    }
}

fn accepts_text(ch: char) -> bool {
    !ch.is_control()
}

/// Step through `options` from the current choice, wrapping at both ends.
fn cycle_choice<T>(
    options: &[T],
    current: Option<EntityId>,
    offset: isize,
    id_of: impl Fn(&T) -> EntityId,
) -> Option<EntityId> {
    if options.is_empty() {
        return None;
    }
    let len = options.len() as isize;
    let next = match current.and_then(|id| options.iter().position(|o| id_of(o) == id)) {
        Some(index) => (index as isize + offset).rem_euclid(len),
        None if offset < 0 => len - 1,
        None => 0,
    };
    options.get(next as usize).map(id_of)
}

fn choice_label<T>(
    options: &Feed<T>,
    current: Option<EntityId>,
    id_of: impl Fn(&T) -> EntityId,
    label_of: impl Fn(&T) -> String,
) -> String {
    if options.is_loading() {
        return "<loading...>".to_string();
    }
    current
        .and_then(|id| options.items().iter().find(|o| id_of(o) == id))
        .map(label_of)
        .unwrap_or_default()
}

#[derive(Debug, Clone)]
pub struct AuthorDialog {
    instance: InstanceId,
    pub name: String,
    submitting: bool,
}

impl Default for AuthorDialog {
    fn default() -> Self {
        Self {
            instance: InstanceId::next(),
            name: String::new(),
            submitting: false,
        }
    }
}

impl CreationDialog for AuthorDialog {
    fn instance(&self) -> InstanceId {
        self.instance
    }

    fn title(&self) -> &'static str {
        "New Author"
    }

    fn submit(&mut self) -> Option<Job> {
        if self.submitting || self.name.trim().is_empty() {
            return None;
        }
        self.submitting = true;
        Some(Job::new(
            self.instance,
            Task::Create(Draft::Author(NewAuthor {
                name: self.name.clone(),
            })),
        ))
    }

    fn complete(&mut self, task: Task, result: Result<Payload, ApiError>) -> DialogEvent {
        match task {
            Task::Create(_) => {
                let name = &mut self.name;
                settle_create(&mut self.submitting, result, "author", || name.clear())
            }
            _ => DialogEvent::Ignored,
        }
    }

    fn is_submitting(&self) -> bool {
        self.submitting
    }

    fn fields(&self) -> Vec<FieldView> {
        vec![FieldView {
            label: "Author Name",
            value: self.name.clone(),
            active: true,
            kind: FieldKind::Text,
        }]
    }

    fn push_char(&mut self, ch: char) -> bool {
        if self.submitting || !accepts_text(ch) {
            return false;
        }
        self.name.push(ch);
        true
    }

    fn backspace(&mut self) {
        if !self.submitting {
            self.name.pop();
        }
    }

    fn next_field(&mut self) {}
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum StoreField {
    #[default]
    Name,
    Address,
}

#[derive(Debug, Clone)]
pub struct StoreDialog {
    instance: InstanceId,
    pub name: String,
    pub address: String,
    pub active: StoreField,
    submitting: bool,
}

impl Default for StoreDialog {
    fn default() -> Self {
        Self {
            instance: InstanceId::next(),
            name: String::new(),
            address: String::new(),
            active: StoreField::Name,
            submitting: false,
        }
    }
}

impl CreationDialog for StoreDialog {
    fn instance(&self) -> InstanceId {
        self.instance
    }

    fn title(&self) -> &'static str {
        "New Store"
    }

    fn submit(&mut self) -> Option<Job> {
        if self.submitting || self.name.trim().is_empty() {
            return None;
        }
        self.submitting = true;
        Some(Job::new(
            self.instance,
            Task::Create(Draft::Store(NewStore {
                name: self.name.clone(),
                address: self.address.clone(),
            })),
        ))
    }

    fn complete(&mut self, task: Task, result: Result<Payload, ApiError>) -> DialogEvent {
        match task {
            Task::Create(_) => {
                let (name, address, active) = (&mut self.name, &mut self.address, &mut self.active);
                settle_create(&mut self.submitting, result, "store", || {
                    name.clear();
                    address.clear();
                    *active = StoreField::Name;
                })
            }
            _ => DialogEvent::Ignored,
        }
    }

    fn is_submitting(&self) -> bool {
        self.submitting
    }

    fn fields(&self) -> Vec<FieldView> {
        vec![
            FieldView {
                label: "Store Name",
                value: self.name.clone(),
                active: self.active == StoreField::Name,
                kind: FieldKind::Text,
            },
            FieldView {
                label: "Store Address",
                value: self.address.clone(),
                active: self.active == StoreField::Address,
                kind: FieldKind::Text,
            },
        ]
    }

    fn push_char(&mut self, ch: char) -> bool {
        if self.submitting || !accepts_text(ch) {
            return false;
        }
        match self.active {
            StoreField::Name => self.name.push(ch),
            StoreField::Address => self.address.push(ch),
        }
        true
    }

    fn backspace(&mut self) {
        if self.submitting {
            return;
        }
        match self.active {
            StoreField::Name => {
                self.name.pop();
            }
            StoreField::Address => {
                self.address.pop();
            }
        }
    }

    fn next_field(&mut self) {
        self.active = match self.active {
            StoreField::Name => StoreField::Address,
            StoreField::Address => StoreField::Name,
        };
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum BookField {
    #[default]
    Name,
    Pages,
    Author,
}

#[derive(Debug, Clone)]
pub struct BookDialog {
    instance: InstanceId,
    pub name: String,
    pub pages: String,
    pub author_id: Option<EntityId>,
    pub active: BookField,
    authors: Feed<Author>,
    submitting: bool,
}

impl Default for BookDialog {
    fn default() -> Self {
        Self {
            instance: InstanceId::next(),
            name: String::new(),
            pages: String::new(),
            author_id: None,
            active: BookField::Name,
            authors: Feed::default(),
            submitting: false,
        }
    }
}

impl BookDialog {
    pub fn authors(&self) -> &[Author] {
        self.authors.items()
    }
}

impl CreationDialog for BookDialog {
    fn instance(&self) -> InstanceId {
        self.instance
    }

    fn title(&self) -> &'static str {
        "New Book"
    }

    fn on_open(&mut self) -> Option<Job> {
        let generation = self.authors.begin();
        Some(Job::new(
            self.instance,
            Task::Fetch {
                source: Source::Authors,
                generation,
            },
        ))
    }

    fn submit(&mut self) -> Option<Job> {
        if self.submitting {
            return None;
        }
        let author_id = self.author_id?;
        self.submitting = true;
        Some(Job::new(
            self.instance,
            Task::Create(Draft::Book(NewBook {
                name: self.name.clone(),
                pages: self.pages.parse().unwrap_or(0),
                author_id,
            })),
        ))
    }

    fn complete(&mut self, task: Task, result: Result<Payload, ApiError>) -> DialogEvent {
        match task {
            Task::Fetch { generation, .. } => {
                if self
                    .authors
                    .settle(generation, result, Payload::into_authors, "authors")
                {
                    DialogEvent::OptionsLoaded
                } else {
                    DialogEvent::Ignored
                }
            }
            Task::Create(_) => {
                let (name, pages, author_id, active) = (
                    &mut self.name,
                    &mut self.pages,
                    &mut self.author_id,
                    &mut self.active,
                );
                settle_create(&mut self.submitting, result, "book", || {
                    name.clear();
                    pages.clear();
                    *author_id = None;
                    *active = BookField::Name;
                })
            }
            _ => DialogEvent::Ignored,
        }
    }

    fn is_submitting(&self) -> bool {
        self.submitting
    }

    fn is_loading_options(&self) -> bool {
        self.authors.is_loading()
    }

    fn fields(&self) -> Vec<FieldView> {
        vec![
            FieldView {
                label: "Book Name",
                value: self.name.clone(),
                active: self.active == BookField::Name,
                kind: FieldKind::Text,
            },
            FieldView {
                label: "Number of Pages",
                value: self.pages.clone(),
                active: self.active == BookField::Pages,
                kind: FieldKind::Number,
            },
            FieldView {
                label: "Author",
                value: choice_label(&self.authors, self.author_id, |a| a.id, |a| a.name.clone()),
                active: self.active == BookField::Author,
                kind: FieldKind::Choice,
            },
        ]
    }

    fn push_char(&mut self, ch: char) -> bool {
        if self.submitting {
            return false;
        }
        match self.active {
            BookField::Name if accepts_text(ch) => {
                self.name.push(ch);
                true
            }
            BookField::Pages if ch.is_ascii_digit() => {
                self.pages.push(ch);
                true
            }
            _ => false,
        }
    }

    fn backspace(&mut self) {
        if self.submitting {
            return;
        }
        match self.active {
            BookField::Name => {
                self.name.pop();
            }
            BookField::Pages => {
                self.pages.pop();
            }
            BookField::Author => self.author_id = None,
        }
    }

    fn next_field(&mut self) {
        self.active = match self.active {
            BookField::Name => BookField::Pages,
            BookField::Pages => BookField::Author,
            BookField::Author => BookField::Name,
        };
    }

    fn cycle_option(&mut self, offset: isize) {
        if self.active == BookField::Author && !self.submitting {
            self.author_id = cycle_choice(self.authors.items(), self.author_id, offset, |a| a.id);
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum InventoryField {
    #[default]
    Book,
    Quantity,
}

/// Stocks a book in one store. The store is fixed when the dialog is built.
#[derive(Debug, Clone)]
pub struct InventoryDialog {
    instance: InstanceId,
    store_id: EntityId,
    pub book_id: Option<EntityId>,
    pub quantity: String,
    pub active: InventoryField,
    books: Feed<Book>,
    submitting: bool,
}

impl InventoryDialog {
    pub fn new(store_id: EntityId) -> Self {
        Self {
            instance: InstanceId::next(),
            store_id,
            book_id: None,
            quantity: String::new(),
            active: InventoryField::Book,
            books: Feed::default(),
            submitting: false,
        }
    }

    pub fn store_id(&self) -> EntityId {
        self.store_id
    }

    pub fn books(&self) -> &[Book] {
        self.books.items()
    }
}

impl CreationDialog for InventoryDialog {
    fn instance(&self) -> InstanceId {
        self.instance
    }

    fn title(&self) -> &'static str {
        "Add Inventory"
    }

    fn on_open(&mut self) -> Option<Job> {
        let generation = self.books.begin();
        Some(Job::new(
            self.instance,
            Task::Fetch {
                source: Source::Books,
                generation,
            },
        ))
    }

    fn submit(&mut self) -> Option<Job> {
        if self.submitting {
            return None;
        }
        let book_id = self.book_id?;
        self.submitting = true;
        Some(Job::new(
            self.instance,
            Task::Create(Draft::Inventory(NewInventory {
                store_id: self.store_id,
                book_id,
                quantity: self.quantity.parse().unwrap_or(0),
            })),
        ))
    }

    fn complete(&mut self, task: Task, result: Result<Payload, ApiError>) -> DialogEvent {
        match task {
            Task::Fetch { generation, .. } => {
                if self
                    .books
                    .settle(generation, result, Payload::into_books, "books")
                {
                    DialogEvent::OptionsLoaded
                } else {
                    DialogEvent::Ignored
                }
            }
            Task::Create(_) => {
                let (book_id, quantity, active) =
                    (&mut self.book_id, &mut self.quantity, &mut self.active);
                settle_create(&mut self.submitting, result, "inventory", || {
                    *book_id = None;
                    quantity.clear();
                    *active = InventoryField::Book;
                })
            }
            _ => DialogEvent::Ignored,
        }
    }

    fn is_submitting(&self) -> bool {
        self.submitting
    }

    fn is_loading_options(&self) -> bool {
        self.books.is_loading()
    }

    fn fields(&self) -> Vec<FieldView> {
        vec![
            FieldView {
                label: "Book",
                value: choice_label(&self.books, self.book_id, |b| b.id, |b| b.title.clone()),
                active: self.active == InventoryField::Book,
                kind: FieldKind::Choice,
            },
            FieldView {
                label: "Quantity",
                value: self.quantity.clone(),
                active: self.active == InventoryField::Quantity,
                kind: FieldKind::Number,
            },
        ]
    }

    fn push_char(&mut self, ch: char) -> bool {
        if self.submitting || self.active != InventoryField::Quantity || !ch.is_ascii_digit() {
            return false;
        }
        self.quantity.push(ch);
        true
    }

    fn backspace(&mut self) {
        if self.submitting {
            return;
        }
        match self.active {
            InventoryField::Book => self.book_id = None,
            InventoryField::Quantity => {
                self.quantity.pop();
            }
        }
    }

    fn next_field(&mut self) {
        self.active = match self.active {
            InventoryField::Book => InventoryField::Quantity,
            InventoryField::Quantity => InventoryField::Book,
        };
    }

    fn cycle_option(&mut self, offset: isize) {
        if self.active == InventoryField::Book && !self.submitting {
            self.book_id = cycle_choice(self.books.items(), self.book_id, offset, |b| b.id);
        }
    }
}
