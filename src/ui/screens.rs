use crate::models::{Author, Book, EntityId, Store};
use crate::view::{
    Completion, CreationDialog, Job, ListPage, Listed, Route, ShopPage, StoreInventoryPage,
};

/// The page currently on screen. Each variant owns its controller; swapping
/// the variant drops the old page, and with it any interest in its requests.
pub(crate) enum Screen {
    Shop(ShopPage),
    Authors(ListPage<Author>),
    Books(ListPage<Book>),
    Stores(ListPage<Store>),
    Inventory(StoreInventoryPage),
}

fn selected_row<T: Listed>(page: &ListPage<T>) -> Option<(EntityId, String)> {
    page.selected_item()
        .map(|item| (item.id(), item.label().to_string()))
}

impl Screen {
    /// Build a fresh page for `route` along with its initial fetch.
    pub(crate) fn open(route: Route) -> (Self, Job) {
        match route {
            Route::Shop => {
                let mut page = ShopPage::new();
                let job = page.mount();
                (Screen::Shop(page), job)
            }
            Route::Authors => {
                let mut page = ListPage::new();
                let job = page.mount();
                (Screen::Authors(page), job)
            }
            Route::Books => {
                let mut page = ListPage::new();
                let job = page.mount();
                (Screen::Books(page), job)
            }
            Route::Stores => {
                let mut page = ListPage::new();
                let job = page.mount();
                (Screen::Stores(page), job)
            }
            Route::StoreInventory(store_id) => {
                let mut page = StoreInventoryPage::new(store_id);
                let job = page.mount();
                (Screen::Inventory(page), job)
            }
        }
    }

    pub(crate) fn title(&self) -> String {
        match self {
            Screen::Shop(_) => "Shop".to_string(),
            Screen::Authors(_) => "Authors".to_string(),
            Screen::Books(_) => "Books".to_string(),
            Screen::Stores(_) => "Stores".to_string(),
            Screen::Inventory(page) => format!("Store {} inventory", page.store_id()),
        }
    }

    /// Fetch the visible data again.
    pub(crate) fn reload(&mut self) -> Job {
        match self {
            Screen::Shop(page) => page.mount(),
            Screen::Authors(page) => page.reload(),
            Screen::Books(page) => page.reload(),
            Screen::Stores(page) => page.reload(),
            Screen::Inventory(page) => page.mount(),
        }
    }

    pub(crate) fn is_loading(&self) -> bool {
        match self {
            Screen::Shop(page) => page.is_loading(),
            Screen::Authors(page) => page.is_loading(),
            Screen::Books(page) => page.is_loading(),
            Screen::Stores(page) => page.is_loading(),
            Screen::Inventory(page) => page.is_loading(),
        }
    }

    pub(crate) fn search(&self) -> &str {
        match self {
            Screen::Shop(page) => page.search(),
            Screen::Authors(page) => page.search(),
            Screen::Books(page) => page.search(),
            Screen::Stores(page) => page.search(),
            Screen::Inventory(page) => page.search(),
        }
    }

    pub(crate) fn set_search(&mut self, term: String) {
        match self {
            Screen::Shop(page) => page.set_search(term),
            Screen::Authors(page) => page.set_search(term),
            Screen::Books(page) => page.set_search(term),
            Screen::Stores(page) => page.set_search(term),
            Screen::Inventory(page) => page.set_search(term),
        }
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        match self {
            Screen::Shop(page) => page.move_selection(offset),
            Screen::Authors(page) => page.move_selection(offset),
            Screen::Books(page) => page.move_selection(offset),
            Screen::Stores(page) => page.move_selection(offset),
            Screen::Inventory(page) => page.move_selection(offset),
        }
    }

    /// Noun of the rows that can be renamed or deleted here. The shop is
    /// read-only.
    pub(crate) fn noun(&self) -> Option<&'static str> {
        match self {
            Screen::Shop(_) => None,
            Screen::Authors(_) => Some(Author::COLLECTION.noun()),
            Screen::Books(_) => Some(Book::COLLECTION.noun()),
            Screen::Stores(_) => Some(Store::COLLECTION.noun()),
            Screen::Inventory(page) => Some(page.tab().collection().noun()),
        }
    }

    pub(crate) fn selected_row(&self) -> Option<(EntityId, String)> {
        match self {
            Screen::Shop(page) => page
                .selected_book()
                .map(|book| (book.id, book.title.clone())),
            Screen::Authors(page) => selected_row(page),
            Screen::Books(page) => selected_row(page),
            Screen::Stores(page) => selected_row(page),
            Screen::Inventory(page) => page.selected_row(),
        }
    }

    pub(crate) fn update(&mut self, id: EntityId, name: String) -> Option<Job> {
        match self {
            Screen::Shop(_) => None,
            Screen::Authors(page) => Some(page.update(id, name)),
            Screen::Books(page) => Some(page.update(id, name)),
            Screen::Stores(page) => Some(page.update(id, name)),
            Screen::Inventory(page) => Some(page.update(id, name)),
        }
    }

    pub(crate) fn delete(&mut self, id: EntityId) -> Option<Job> {
        match self {
            Screen::Shop(_) => None,
            Screen::Authors(page) => Some(page.delete(id)),
            Screen::Books(page) => Some(page.delete(id)),
            Screen::Stores(page) => Some(page.delete(id)),
            Screen::Inventory(page) => Some(page.delete(id)),
        }
    }

    pub(crate) fn has_dialog(&self) -> bool {
        !matches!(self, Screen::Shop(_))
    }

    /// The creation dialog, while it is shown.
    pub(crate) fn dialog(&self) -> Option<&dyn CreationDialog> {
        match self {
            Screen::Authors(page) if page.is_dialog_open() => Some(page.dialog()),
            Screen::Books(page) if page.is_dialog_open() => Some(page.dialog()),
            Screen::Stores(page) if page.is_dialog_open() => Some(page.dialog()),
            Screen::Inventory(page) if page.is_dialog_open() => Some(page.dialog()),
            _ => None,
        }
    }

    pub(crate) fn dialog_mut(&mut self) -> Option<&mut dyn CreationDialog> {
        match self {
            Screen::Authors(page) if page.is_dialog_open() => Some(page.dialog_mut()),
            Screen::Books(page) if page.is_dialog_open() => Some(page.dialog_mut()),
            Screen::Stores(page) if page.is_dialog_open() => Some(page.dialog_mut()),
            Screen::Inventory(page) if page.is_dialog_open() => Some(page.dialog_mut()),
            _ => None,
        }
    }

    pub(crate) fn open_dialog(&mut self) -> Option<Job> {
        match self {
            Screen::Shop(_) => None,
            Screen::Authors(page) => page.open_dialog(),
            Screen::Books(page) => page.open_dialog(),
            Screen::Stores(page) => page.open_dialog(),
            Screen::Inventory(page) => page.open_dialog(),
        }
    }

    pub(crate) fn close_dialog(&mut self) {
        match self {
            Screen::Shop(_) => {}
            Screen::Authors(page) => page.close_dialog(),
            Screen::Books(page) => page.close_dialog(),
            Screen::Stores(page) => page.close_dialog(),
            Screen::Inventory(page) => page.close_dialog(),
        }
    }

    pub(crate) fn submit_dialog(&mut self) -> Option<Job> {
        match self {
            Screen::Shop(_) => None,
            Screen::Authors(page) => page.submit_dialog(),
            Screen::Books(page) => page.submit_dialog(),
            Screen::Stores(page) => page.submit_dialog(),
            Screen::Inventory(page) => page.submit_dialog(),
        }
    }

    pub(crate) fn owns(&self, completion: &Completion) -> bool {
        match self {
            Screen::Shop(page) => page.owns(completion),
            Screen::Authors(page) => page.owns(completion),
            Screen::Books(page) => page.owns(completion),
            Screen::Stores(page) => page.owns(completion),
            Screen::Inventory(page) => page.owns(completion),
        }
    }

    /// Hand a finished request to the page and collect its follow-ups.
    pub(crate) fn complete(&mut self, completion: Completion) -> Vec<Job> {
        match self {
            Screen::Shop(page) => {
                page.complete(completion);
                Vec::new()
            }
            Screen::Authors(page) => page.complete(completion),
            Screen::Books(page) => page.complete(completion),
            Screen::Stores(page) => page.complete(completion),
            Screen::Inventory(page) => page.complete(completion),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{Source, Task};

    fn fetched(job: &Job) -> Option<Source> {
        match job.task {
            Task::Fetch { source, .. } => Some(source),
            _ => None,
        }
    }

    #[test]
    fn each_route_mounts_its_own_source() {
        let cases = [
            (Route::Shop, Source::Books),
            (Route::Authors, Source::Authors),
            (Route::Books, Source::Books),
            (Route::Stores, Source::Stores),
            (Route::StoreInventory(EntityId(4)), Source::StoreBooks(EntityId(4))),
        ];
        for (route, source) in cases {
            let (screen, job) = Screen::open(route);
            assert_eq!(fetched(&job), Some(source), "{route}");
            assert!(screen.is_loading());
            assert!(screen.owns(&Completion {
                job,
                result: Ok(crate::view::Payload::Books(Vec::new())),
            }));
        }
    }

    #[test]
    fn shop_is_read_only() {
        let (mut screen, _) = Screen::open(Route::Shop);
        assert!(!screen.has_dialog());
        assert_eq!(screen.noun(), None);
        assert!(screen.open_dialog().is_none());
        assert!(screen.update(EntityId(1), "x".into()).is_none());
        assert!(screen.delete(EntityId(1)).is_none());
    }

    #[test]
    fn dialog_is_only_exposed_while_open() {
        let (mut screen, _) = Screen::open(Route::Authors);
        assert!(screen.dialog().is_none());
        assert!(screen.open_dialog().is_none());
        assert_eq!(screen.dialog().map(|d| d.title()), Some("New Author"));
        screen.close_dialog();
        assert!(screen.dialog_mut().is_none());
    }

    #[test]
    fn inventory_noun_follows_active_tab() {
        let (mut screen, _) = Screen::open(Route::StoreInventory(EntityId(2)));
        assert_eq!(screen.noun(), Some("book"));
        if let Screen::Inventory(page) = &mut screen {
            page.select_tab(page.tab().toggled());
        }
        assert_eq!(screen.noun(), Some("author"));
    }
}
