use std::cmp::min;

use log::{debug, error, info};

use crate::api::ApiError;
use crate::models::{Author, Book, Collection, EntityId, Store};

use super::dialogs::{AuthorDialog, BookDialog, CreationDialog, DialogEvent, StoreDialog};
use super::job::{Completion, Feed, InstanceId, Job, Payload, Source, Task};
use super::search;

/// An entity that has its own top-level list page.
pub trait Listed: Clone {
    const COLLECTION: Collection;
    type Dialog: CreationDialog + Default;

    fn id(&self) -> EntityId;
    /// The field that search matches and rename edits.
    fn label(&self) -> &str;
    fn unpack(payload: Payload) -> Option<Vec<Self>>;
}

impl Listed for Book {
    const COLLECTION: Collection = Collection::Books;
    type Dialog = BookDialog;

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> &str {
        &self.title
    }

    fn unpack(payload: Payload) -> Option<Vec<Self>> {
        payload.into_books()
    }
}

impl Listed for Author {
    const COLLECTION: Collection = Collection::Authors;
    type Dialog = AuthorDialog;

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn unpack(payload: Payload) -> Option<Vec<Self>> {
        payload.into_authors()
    }
}

impl Listed for Store {
    const COLLECTION: Collection = Collection::Stores;
    type Dialog = StoreDialog;

    fn id(&self) -> EntityId {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn unpack(payload: Payload) -> Option<Vec<Self>> {
        payload.into_stores()
    }
}

fn source_of(collection: Collection) -> Source {
    match collection {
        Collection::Books => Source::Books,
        Collection::Authors => Source::Authors,
        Collection::Stores => Source::Stores,
    }
}

/// Fetch, filter, and mutate one top-level collection.
pub struct ListPage<T: Listed> {
    instance: InstanceId,
    feed: Feed<T>,
    search: String,
    dialog: T::Dialog,
    dialog_open: bool,
    selected: usize,
}

impl<T: Listed> Default for ListPage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Listed> ListPage<T> {
    pub fn new() -> Self {
        Self {
            instance: InstanceId::next(),
            feed: Feed::default(),
            search: String::new(),
            dialog: T::Dialog::default(),
            dialog_open: false,
            selected: 0,
        }
    }

    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    /// First load after the page is shown.
    pub fn mount(&mut self) -> Job {
        self.reload()
    }

    /// Replace the whole collection with a fresh fetch.
    pub fn reload(&mut self) -> Job {
        let generation = self.feed.begin();
        Job::new(
            self.instance,
            Task::Fetch {
                source: source_of(T::COLLECTION),
                generation,
            },
        )
    }

    pub fn items(&self) -> &[T] {
        self.feed.items()
    }

    pub fn is_loading(&self) -> bool {
        self.feed.is_loading()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.clamp_selection();
    }

    /// Rows whose label contains the search term, recomputed on every call.
    pub fn visible(&self) -> Vec<&T> {
        search::filter(self.feed.items(), &self.search, |item| item.label())
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.visible().get(self.selected).copied()
    }

    pub fn move_selection(&mut self, offset: isize) {
        let len = self.visible().len();
        if len == 0 {
            return;
        }
        let next = (self.selected as isize + offset).clamp(0, len as isize - 1);
        self.selected = next as usize;
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        self.selected = min(self.selected, len.saturating_sub(1));
    }

    /// Send a new name for one row. The page reloads once the API accepts it.
    pub fn update(&mut self, id: EntityId, name: impl Into<String>) -> Job {
        Job::new(
            self.instance,
            Task::Rename {
                collection: T::COLLECTION,
                id,
                name: name.into(),
            },
        )
    }

    /// Delete one row against the collection's own endpoint. Local state only
    /// changes once the API confirms.
    pub fn delete(&mut self, id: EntityId) -> Job {
        Job::new(
            self.instance,
            Task::Delete {
                collection: T::COLLECTION,
                id,
            },
        )
    }

    pub fn dialog(&self) -> &T::Dialog {
        &self.dialog
    }

    pub fn dialog_mut(&mut self) -> &mut T::Dialog {
        &mut self.dialog
    }

    pub fn is_dialog_open(&self) -> bool {
        self.dialog_open
    }

    pub fn open_dialog(&mut self) -> Option<Job> {
        self.dialog_open = true;
        self.dialog.on_open()
    }

    pub fn close_dialog(&mut self) {
        self.dialog_open = false;
    }

    pub fn submit_dialog(&mut self) -> Option<Job> {
        self.dialog.submit()
    }

    /// Does this completion belong to this page or its dialog?
    pub fn owns(&self, completion: &Completion) -> bool {
        completion.job.owner == self.instance || completion.job.owner == self.dialog.instance()
    }

    /// Apply a finished job. Returns any follow-up jobs, such as the reload
    /// after a successful rename or create.
    pub fn complete(&mut self, completion: Completion) -> Vec<Job> {
        let Completion { job, result } = completion;

        if job.owner == self.dialog.instance() {
            return match self.dialog.complete(job.task, result) {
                DialogEvent::Created => {
                    let reload = self.reload();
                    self.dialog_open = false;
                    vec![reload]
                }
                _ => Vec::new(),
            };
        }

        if job.owner != self.instance {
            debug!("discarding response addressed to another view");
            return Vec::new();
        }

        let noun = T::COLLECTION.noun();
        match job.task {
            Task::Fetch { source, generation } => {
                self.feed
                    .settle(generation, result, T::unpack, &source.describe());
                self.clamp_selection();
                Vec::new()
            }
            Task::Rename { id, .. } => match result {
                Ok(_) => {
                    info!("renamed {noun} {id}");
                    vec![self.reload()]
                }
                Err(err) => {
                    log_failure("updating", noun, &err);
                    Vec::new()
                }
            },
            Task::Delete { id, .. } => {
                match result {
                    Ok(_) => {
                        info!("deleted {noun} {id}");
                        self.feed.items_mut().retain(|item| item.id() != id);
                        self.clamp_selection();
                    }
                    Err(err) => log_failure("deleting", noun, &err),
                }
                Vec::new()
            }
            Task::Create(_) => Vec::new(),
        }
    }
}

pub(crate) fn log_failure(action: &str, noun: &str, err: &ApiError) {
    error!("Error {action} {noun}: {err}");
}
