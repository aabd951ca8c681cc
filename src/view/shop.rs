use std::cmp::min;

use log::{debug, info};

use crate::models::{Book, EntityId};

use super::job::{Completion, Feed, InstanceId, Job, Payload, Source, Task};
use super::search;

/// Read-only storefront over all books. Selling only flips the local `sold`
/// flag; any re-fetch brings every book back unsold.
pub struct ShopPage {
    instance: InstanceId,
    feed: Feed<Book>,
    search: String,
    selected: usize,
}

impl Default for ShopPage {
    fn default() -> Self {
        Self::new()
    }
}

impl ShopPage {
    pub fn new() -> Self {
        Self {
            instance: InstanceId::next(),
            feed: Feed::default(),
            search: String::new(),
            selected: 0,
        }
    }

    pub fn mount(&mut self) -> Job {
        let generation = self.feed.begin();
        Job::new(
            self.instance,
            Task::Fetch {
                source: Source::Books,
                generation,
            },
        )
    }

    pub fn books(&self) -> &[Book] {
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

    /// Books whose title or author contains the search term.
    pub fn visible(&self) -> Vec<&Book> {
        self.feed
            .items()
            .iter()
            .filter(|book| {
                search::matches(&self.search, &[book.title.as_str(), book.author.as_str()])
            })
            .collect()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_book(&self) -> Option<&Book> {
        self.visible().get(self.selected).copied()
    }

    pub fn move_selection(&mut self, offset: isize) {
        let len = self.visible().len();
        if len == 0 {
            return;
        }
        self.selected = (self.selected as isize + offset).clamp(0, len as isize - 1) as usize;
    }

    fn clamp_selection(&mut self) {
        self.selected = min(self.selected, self.visible().len().saturating_sub(1));
    }

    /// Mark a book sold. Returns `false` when it was already sold or is not
    /// on the page.
    pub fn sell(&mut self, id: EntityId) -> bool {
        match self.feed.items_mut().iter_mut().find(|book| book.id == id) {
            Some(book) if !book.sold => {
                book.sold = true;
                info!("marked book {id} as sold");
                true
            }
            _ => false,
        }
    }

    pub fn owns(&self, completion: &Completion) -> bool {
        completion.job.owner == self.instance
    }

    pub fn complete(&mut self, completion: Completion) {
        let Completion { job, result } = completion;
        if job.owner != self.instance {
            debug!("discarding response addressed to another view");
            return;
        }
        if let Task::Fetch { source, generation } = job.task {
            self.feed
                .settle(generation, result, Payload::into_books, &source.describe());
            self.clamp_selection();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{book, FakeCatalog};

    fn catalog() -> FakeCatalog {
        let mut atlas = book(1, "Atlas Shrugged");
        atlas.author = "Ayn Rand".into();
        let mut dune = book(2, "Dune");
        dune.author = "Frank Herbert".into();
        FakeCatalog::new().with_books(vec![atlas, dune])
    }

    fn mounted(catalog: &FakeCatalog) -> ShopPage {
        let mut page = ShopPage::new();
        let done = page.mount().run(catalog);
        page.complete(done);
        page
    }

    #[test]
    fn search_matches_title_or_author() {
        let catalog = catalog();
        let mut page = mounted(&catalog);
        page.set_search("herbert");
        assert_eq!(page.visible().len(), 1);
        assert_eq!(page.visible()[0].id, EntityId(2));
        page.set_search("atlas");
        assert_eq!(page.visible()[0].id, EntityId(1));
    }

    #[test]
    fn selling_is_local_and_reset_by_refetch() {
        let catalog = catalog();
        let mut page = mounted(&catalog);
        assert!(page.sell(EntityId(1)));
        assert!(!page.sell(EntityId(1)));
        assert!(page.books()[0].sold);
        assert!(catalog.calls().iter().all(|call| call == "list_books"));

        let done = page.mount().run(&catalog);
        page.complete(done);
        assert!(!page.books()[0].sold);
    }

    #[test]
    fn selling_unknown_book_is_a_no_op() {
        let catalog = catalog();
        let mut page = mounted(&catalog);
        assert!(!page.sell(EntityId(42)));
    }
}
