//! Per-store inventory: two tabbed sub-collections sharing one search term and
//! one "add inventory" dialog. Only the active tab is fetched; switching tabs
//! always refetches instead of reusing what was loaded before.

use std::cmp::min;

use log::{debug, info};

use crate::models::{Author, Book, Collection, EntityId};

use super::dialogs::{CreationDialog, DialogEvent, InventoryDialog};
use super::job::{Completion, Feed, InstanceId, Job, Payload, Source, Task};
use super::list::log_failure;
use super::search;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InventoryTab {
    #[default]
    Books,
    Authors,
}

impl InventoryTab {
    pub fn title(self) -> &'static str {
        match self {
            InventoryTab::Books => "Books",
            InventoryTab::Authors => "Authors",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            InventoryTab::Books => InventoryTab::Authors,
            InventoryTab::Authors => InventoryTab::Books,
        }
    }

    pub fn collection(self) -> Collection {
        match self {
            InventoryTab::Books => Collection::Books,
            InventoryTab::Authors => Collection::Authors,
        }
    }

    fn of(collection: Collection) -> Option<Self> {
        match collection {
            Collection::Books => Some(InventoryTab::Books),
            Collection::Authors => Some(InventoryTab::Authors),
            Collection::Stores => None,
        }
    }
}

pub struct StoreInventoryPage {
    instance: InstanceId,
    store_id: EntityId,
    tab: InventoryTab,
    books: Feed<Book>,
    authors: Feed<Author>,
    search: String,
    dialog: InventoryDialog,
    dialog_open: bool,
    selected: usize,
}

impl StoreInventoryPage {
    pub fn new(store_id: EntityId) -> Self {
        Self {
            instance: InstanceId::next(),
            store_id,
            tab: InventoryTab::Books,
            books: Feed::default(),
            authors: Feed::default(),
            search: String::new(),
            dialog: InventoryDialog::new(store_id),
            dialog_open: false,
            selected: 0,
        }
    }

    pub fn store_id(&self) -> EntityId {
        self.store_id
    }

    pub fn tab(&self) -> InventoryTab {
        self.tab
    }

    pub fn mount(&mut self) -> Job {
        self.fetch(self.tab)
    }

    fn fetch(&mut self, tab: InventoryTab) -> Job {
        let task = match tab {
            InventoryTab::Books => Task::Fetch {
                source: Source::StoreBooks(self.store_id),
                generation: self.books.begin(),
            },
            InventoryTab::Authors => Task::Fetch {
                source: Source::StoreAuthors(self.store_id),
                generation: self.authors.begin(),
            },
        };
        Job::new(self.instance, task)
    }

    /// Activate a tab. Selecting the tab already shown does nothing; any other
    /// tab is fetched from scratch.
    pub fn select_tab(&mut self, tab: InventoryTab) -> Option<Job> {
        if tab == self.tab {
            return None;
        }
        self.tab = tab;
        self.selected = 0;
        Some(self.fetch(tab))
    }

    pub fn books(&self) -> &[Book] {
        self.books.items()
    }

    pub fn authors(&self) -> &[Author] {
        self.authors.items()
    }

    /// Loading state of the active tab.
    pub fn is_loading(&self) -> bool {
        match self.tab {
            InventoryTab::Books => self.books.is_loading(),
            InventoryTab::Authors => self.authors.is_loading(),
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.clamp_selection();
    }

    pub fn visible_books(&self) -> Vec<&Book> {
        search::filter(self.books.items(), &self.search, |book| book.title.as_str())
    }

    pub fn visible_authors(&self) -> Vec<&Author> {
        search::filter(self.authors.items(), &self.search, |author| author.name.as_str())
    }

    fn visible_len(&self) -> usize {
        match self.tab {
            InventoryTab::Books => self.visible_books().len(),
            InventoryTab::Authors => self.visible_authors().len(),
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Id and label of the selected row in the active tab.
    pub fn selected_row(&self) -> Option<(EntityId, String)> {
        match self.tab {
            InventoryTab::Books => self
                .visible_books()
                .get(self.selected)
                .map(|book| (book.id, book.title.clone())),
            InventoryTab::Authors => self
                .visible_authors()
                .get(self.selected)
                .map(|author| (author.id, author.name.clone())),
        }
    }

    pub fn move_selection(&mut self, offset: isize) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        self.selected = (self.selected as isize + offset).clamp(0, len as isize - 1) as usize;
    }

    fn clamp_selection(&mut self) {
        self.selected = min(self.selected, self.visible_len().saturating_sub(1));
    }

    /// Rename a row of the active tab; that tab reloads on success.
    pub fn update(&mut self, id: EntityId, name: impl Into<String>) -> Job {
        Job::new(
            self.instance,
            Task::Rename {
                collection: self.tab.collection(),
                id,
                name: name.into(),
            },
        )
    }

    /// Delete a row of the active tab through that entity's own endpoint.
    pub fn delete(&mut self, id: EntityId) -> Job {
        Job::new(
            self.instance,
            Task::Delete {
                collection: self.tab.collection(),
                id,
            },
        )
    }

    pub fn dialog(&self) -> &InventoryDialog {
        &self.dialog
    }

    pub fn dialog_mut(&mut self) -> &mut InventoryDialog {
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

    pub fn owns(&self, completion: &Completion) -> bool {
        completion.job.owner == self.instance || completion.job.owner == self.dialog.instance()
    }

    pub fn complete(&mut self, completion: Completion) -> Vec<Job> {
        let Completion { job, result } = completion;

        if job.owner == self.dialog.instance() {
            return match self.dialog.complete(job.task, result) {
                DialogEvent::Created => {
                    self.dialog_open = false;
                    vec![self.fetch(InventoryTab::Books), self.fetch(InventoryTab::Authors)]
                }
                _ => Vec::new(),
            };
        }

        if job.owner != self.instance {
            debug!("discarding response addressed to another view");
            return Vec::new();
        }

        match job.task {
            Task::Fetch { source, generation } => {
                let what = source.describe();
                match source {
                    Source::StoreAuthors(_) => {
                        self.authors
                            .settle(generation, result, Payload::into_authors, &what);
                    }
                    _ => {
                        self.books
                            .settle(generation, result, Payload::into_books, &what);
                    }
                }
                self.clamp_selection();
                Vec::new()
            }
            Task::Rename { collection, id, .. } => match result {
                Ok(_) => {
                    info!("renamed {} {id}", collection.noun());
                    InventoryTab::of(collection)
                        .map(|tab| self.fetch(tab))
                        .into_iter()
                        .collect()
                }
                Err(err) => {
                    log_failure("updating", collection.noun(), &err);
                    Vec::new()
                }
            },
            Task::Delete { collection, id } => {
                match result {
                    Ok(_) => {
                        info!("deleted {} {id}", collection.noun());
                        match collection {
                            Collection::Books => self.books.items_mut().retain(|b| b.id != id),
                            Collection::Authors => {
                                self.authors.items_mut().retain(|a| a.id != id)
                            }
                            Collection::Stores => {}
                        }
                        self.clamp_selection();
                    }
                    Err(err) => log_failure("deleting", collection.noun(), &err),
                }
                Vec::new()
            }
            Task::Create(_) => Vec::new(),
        }
    }
}
