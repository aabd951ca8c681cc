//! Page controllers. Pages never talk to the network themselves: each
//! operation returns a [`Job`] for the dispatcher, and the finished
//! [`Completion`] is handed back to `complete`, which may queue follow-up jobs.

mod dialogs;
mod inventory;
mod job;
mod list;
mod nav;
mod search;
mod shop;

pub use dialogs::{
    AuthorDialog, BookDialog, BookField, CreationDialog, DialogEvent, FieldKind, FieldView,
    InventoryDialog, InventoryField, StoreDialog, StoreField,
};
pub use inventory::{InventoryTab, StoreInventoryPage};
pub use job::{Completion, Draft, Feed, FetchGate, InstanceId, Job, Payload, Source, Task};
pub use list::{ListPage, Listed};
pub use nav::{Route, MENU};
pub use search::{filter, matches, Debouncer};
pub use shop::ShopPage;
