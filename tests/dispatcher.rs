use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bookstore_admin::api::{ApiClient, ApiError, Catalog};
use bookstore_admin::config::ClientConfig;
use bookstore_admin::models::{
    Author, Book, Collection, EntityId, NewAuthor, NewBook, NewInventory, NewStore, Store,
};
use bookstore_admin::view::{InstanceId, Job, ListPage, Payload, Source, Task};
use bookstore_admin::Dispatcher;
use mockito::Server;
use serde_json::Value;

const WAIT: Duration = Duration::from_secs(5);

/// Counts calls and answers every list with one fixed author.
#[derive(Default)]
struct CountingCatalog {
    calls: AtomicUsize,
}

impl CountingCatalog {
    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl Catalog for CountingCatalog {
    fn list_books(&self) -> Result<Vec<Book>, ApiError> {
        self.hit();
        Ok(Vec::new())
    }

    fn list_authors(&self) -> Result<Vec<Author>, ApiError> {
        self.hit();
        Ok(vec![Author {
            id: EntityId(1),
            name: "Ayn Rand".to_string(),
        }])
    }

    fn list_stores(&self) -> Result<Vec<Store>, ApiError> {
        self.hit();
        Ok(Vec::new())
    }

    fn list_store_books(&self, _: EntityId) -> Result<Vec<Book>, ApiError> {
        self.hit();
        Ok(Vec::new())
    }

    fn list_store_authors(&self, _: EntityId) -> Result<Vec<Author>, ApiError> {
        self.hit();
        Ok(Vec::new())
    }

    fn create_author(&self, _: &NewAuthor) -> Result<Value, ApiError> {
        self.hit();
        Ok(Value::Null)
    }

    fn create_book(&self, _: &NewBook) -> Result<Value, ApiError> {
        self.hit();
        Ok(Value::Null)
    }

    fn create_store(&self, _: &NewStore) -> Result<Value, ApiError> {
        self.hit();
        Ok(Value::Null)
    }

    fn create_inventory(&self, _: &NewInventory) -> Result<Value, ApiError> {
        self.hit();
        Ok(Value::Null)
    }

    fn rename(&self, _: Collection, _: EntityId, _: &str) -> Result<Value, ApiError> {
        self.hit();
        Ok(Value::Null)
    }

    fn delete(&self, _: Collection, _: EntityId) -> Result<Value, ApiError> {
        self.hit();
        Ok(Value::Null)
    }
}

#[test]
fn every_submitted_job_completes_once() {
    let catalog = Arc::new(CountingCatalog::default());
    let mut dispatcher = Dispatcher::new(catalog.clone());
    let owner = InstanceId::next();

    dispatcher.submit_all((0..5).map(|generation| {
        Job::new(
            owner,
            Task::Fetch {
                source: Source::Authors,
                generation,
            },
        )
    }));
    assert_eq!(dispatcher.in_flight(), 5);

    let mut generations = Vec::new();
    while let Some(completion) = dispatcher.wait(WAIT) {
        assert_eq!(completion.job.owner, owner);
        match completion.job.task {
            Task::Fetch { generation, .. } => generations.push(generation),
            other => panic!("unexpected task {other:?}"),
        }
        assert!(matches!(completion.result, Ok(Payload::Authors(_))));
        if dispatcher.in_flight() == 0 {
            break;
        }
    }

    generations.sort_unstable();
    assert_eq!(generations, vec![0, 1, 2, 3, 4]);
    assert_eq!(catalog.calls.load(Ordering::SeqCst), 5);
    assert!(dispatcher.try_next().is_none());
}

#[test]
fn try_next_never_blocks() {
    let mut dispatcher = Dispatcher::new(Arc::new(CountingCatalog::default()));
    assert!(dispatcher.try_next().is_none());
    assert_eq!(dispatcher.in_flight(), 0);
}

#[test]
fn list_page_loads_through_the_http_client() {
    let mut server = Server::new();
    let _authors = server
        .mock("GET", "/authors")
        .with_status(200)
        .with_body(r#"[{"id": 1, "name": "Ayn Rand"}, {"id": 2, "name": "Frank Herbert"}]"#)
        .create();
    let rename = server
        .mock("PUT", "/authors/2")
        .with_status(200)
        .with_body("{}")
        .create();

    let client = ApiClient::new(&ClientConfig {
        base_url: server.url(),
        headers: BTreeMap::new(),
    })
    .unwrap();
    let mut dispatcher = Dispatcher::new(Arc::new(client));
    let mut page: ListPage<Author> = ListPage::new();

    dispatcher.submit(page.mount());
    let completion = dispatcher.wait(WAIT).expect("fetch finished");
    assert!(page.owns(&completion));
    assert!(page.complete(completion).is_empty());
    assert_eq!(page.items().len(), 2);
    assert!(!page.is_loading());

    page.set_search("herb");
    assert_eq!(page.visible().len(), 1);

    dispatcher.submit(page.update(EntityId(2), "F. Herbert"));
    let completion = dispatcher.wait(WAIT).expect("rename finished");
    let follow_up = page.complete(completion);
    rename.assert();

    // A successful rename reloads the list.
    assert_eq!(follow_up.len(), 1);
    assert!(matches!(
        follow_up[0].task,
        Task::Fetch {
            source: Source::Authors,
            ..
        }
    ));
}
