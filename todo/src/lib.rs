//! todostore - persistent to-do list state management
//!
//! A single-user task list with a reactive core: one mutable source of
//! truth ([`TodoList`]) that broadcasts every new list value to subscribers
//! and syncs it to local key-value storage behind a debounce window.
//!
//! # Architecture
//!
//! ```text
//! caller ──mutation──▶ TodoList ──publish──▶ subscribers (in order)
//!                         │                      │
//!                         └──synchronous──▶      └──▶ persistence actor
//!                            return value              (debounced)
//!                                                        │
//!                                                   TaskStore ──▶ Storage
//! ```
//!
//! # Example
//!
//! ```ignore
//! use todostore::{Task, TaskStore, TodoList};
//!
//! let store = TaskStore::open(".todostore")?;
//! let mut list = TodoList::new(store);
//! list.add(Task::new("Buy milk", ""));
//! list.flush().await?;
//! ```

pub mod cli;
pub mod config;
pub mod ready;
pub mod state;
pub mod storage;
pub mod store;
pub mod task;

pub use config::Config;
pub use ready::ReadyLatch;
pub use state::{DEFAULT_QUIESCENCE_MS, TodoList};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{STORAGE_KEY, TaskStore};
pub use task::{ListFilter, Task, filter_tasks, search_tasks};
