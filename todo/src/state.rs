//! Task list state manager
//!
//! `TodoList` owns the canonical task list as a single mutable source of
//! truth. Every mutation computes a new list value, publishes it to all
//! subscribers in registration order, and returns the resulting list to the
//! caller synchronously. Persistence is one of the subscribers: published
//! lists are forwarded to a spawned actor that writes to the [`TaskStore`]
//! only after a quiescence window with no newer state, so rapid mutations
//! coalesce into a single storage write.
//!
//! Mutations are single-threaded by design (`&mut self`, no locks); the
//! actor is the only concurrent piece and it never touches the in-memory
//! list, only the snapshots sent to it.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use crate::ready::ReadyLatch;
use crate::store::TaskStore;
use crate::task::Task;

/// Default quiescence window before a debounced write fires
pub const DEFAULT_QUIESCENCE_MS: u64 = 50;

type Subscriber = Box<dyn FnMut(&[Task]) + Send>;

/// Messages from the state manager to the persistence actor
enum PersistMsg {
    /// A new list was published; supersedes any pending write
    Publish(Vec<Task>),
    /// Write any pending state now and acknowledge
    Flush(oneshot::Sender<()>),
}

/// The task list state manager
///
/// Construction loads the list from the store, then the store is moved into
/// the persistence actor; the manager keeps exclusive ownership of the
/// in-memory list for the rest of its life.
pub struct TodoList {
    tasks: Vec<Task>,
    ready: ReadyLatch,
    subscribers: Vec<Subscriber>,
    persist_tx: mpsc::UnboundedSender<PersistMsg>,
}

impl TodoList {
    /// Create a manager over the given store with the default quiescence window
    ///
    /// Must run inside a tokio runtime: the persistence actor is spawned here.
    pub fn new(store: TaskStore) -> Self {
        Self::with_quiescence(store, Duration::from_millis(DEFAULT_QUIESCENCE_MS))
    }

    /// Create a manager with an explicit quiescence window
    pub fn with_quiescence(store: TaskStore, window: Duration) -> Self {
        let tasks = store.load_all();
        info!(count = tasks.len(), "TodoList: loaded initial task list");

        let (persist_tx, persist_rx) = mpsc::unbounded_channel();
        tokio::spawn(persist_loop(store, window, persist_rx));

        let mut list = Self {
            tasks,
            ready: ReadyLatch::new(),
            subscribers: Vec::new(),
            persist_tx: persist_tx.clone(),
        };

        // Persistence is an ordinary subscriber, registered first so it
        // observes every published state in arrival order.
        list.subscribe(move |tasks| {
            let _ = persist_tx.send(PersistMsg::Publish(tasks.to_vec()));
        });

        // Initial load is the only readiness gate; it just completed.
        list.ready.notify();
        list
    }

    /// Whether the initial load has completed
    pub fn is_ready(&self) -> bool {
        self.ready.is_ready()
    }

    /// Run `callback` once the manager is ready (immediately if it already is)
    pub fn on_ready(&mut self, callback: impl FnOnce() + Send + 'static) {
        self.ready.subscribe(callback);
    }

    /// Register a subscriber invoked with every published list
    ///
    /// Subscribers run synchronously during publish, in registration order.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&[Task]) + Send + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Latest published state, immediately
    pub fn current(&self) -> &[Task] {
        &self.tasks
    }

    /// Append a task to the end of the list
    ///
    /// The caller guarantees `task.id` is unique and pre-generated.
    pub fn add(&mut self, task: Task) -> Vec<Task> {
        debug!(id = %task.id, "TodoList::add: called");
        let mut tasks = self.tasks.clone();
        tasks.push(task);
        self.publish(tasks)
    }

    /// Replace the whole list
    ///
    /// Used for bulk writes and for reordering: the caller passes the full
    /// list in its new order.
    pub fn set_all(&mut self, tasks: Vec<Task>) -> Vec<Task> {
        debug!(count = tasks.len(), "TodoList::set_all: called");
        self.publish(tasks)
    }

    /// Replace the task whose id matches `task.id`, preserving position
    ///
    /// Silent no-op when no id matches; the list is returned unchanged.
    pub fn update(&mut self, task: Task) -> Vec<Task> {
        debug!(id = %task.id, "TodoList::update: called");
        let tasks = self
            .tasks
            .iter()
            .map(|t| if t.id == task.id { task.clone() } else { t.clone() })
            .collect();
        self.publish(tasks)
    }

    /// Set `complete = true` on the matching task; silent no-match
    pub fn mark_complete(&mut self, id: &str) -> Vec<Task> {
        debug!(%id, "TodoList::mark_complete: called");
        self.set_complete(id, true)
    }

    /// Set `complete = false` on the matching task; silent no-match
    pub fn mark_incomplete(&mut self, id: &str) -> Vec<Task> {
        debug!(%id, "TodoList::mark_incomplete: called");
        self.set_complete(id, false)
    }

    /// Flip `complete` on the matching task; silent no-match
    pub fn toggle_complete(&mut self, id: &str) -> Vec<Task> {
        debug!(%id, "TodoList::toggle_complete: called");
        let tasks = self
            .tasks
            .iter()
            .map(|t| {
                if t.id == id {
                    Task {
                        complete: !t.complete,
                        ..t.clone()
                    }
                } else {
                    t.clone()
                }
            })
            .collect();
        self.publish(tasks)
    }

    /// Remove the task with the matching id; silent no-match
    pub fn delete(&mut self, id: &str) -> Vec<Task> {
        debug!(%id, "TodoList::delete: called");
        let tasks = self.tasks.iter().filter(|t| t.id != id).cloned().collect();
        self.publish(tasks)
    }

    /// Force any pending debounced write to storage and wait for it
    ///
    /// Short-lived processes call this before exit so the last mutation is
    /// not lost inside the quiescence window.
    pub async fn flush(&self) -> eyre::Result<()> {
        debug!("TodoList::flush: called");
        let (ack_tx, ack_rx) = oneshot::channel();
        self.persist_tx
            .send(PersistMsg::Flush(ack_tx))
            .map_err(|_| eyre::eyre!("Persistence actor is gone"))?;
        ack_rx.await.map_err(|_| eyre::eyre!("Persistence actor dropped flush ack"))?;
        Ok(())
    }

    fn set_complete(&mut self, id: &str, complete: bool) -> Vec<Task> {
        let tasks = self
            .tasks
            .iter()
            .map(|t| {
                if t.id == id {
                    Task {
                        complete,
                        ..t.clone()
                    }
                } else {
                    t.clone()
                }
            })
            .collect();
        self.publish(tasks)
    }

    /// Install `tasks` as current state, notify subscribers, return a snapshot
    fn publish(&mut self, tasks: Vec<Task>) -> Vec<Task> {
        self.tasks = tasks;
        for subscriber in &mut self.subscribers {
            subscriber(&self.tasks);
        }
        self.tasks.clone()
    }
}

/// Persistence actor: debounced write-through to the store
///
/// Each published list supersedes the previous pending one; the write fires
/// only after `window` elapses with no newer publish. Channel close (the
/// manager was dropped) writes any pending state before exiting.
async fn persist_loop(store: TaskStore, window: Duration, mut rx: mpsc::UnboundedReceiver<PersistMsg>) {
    let mut pending: Option<Vec<Task>> = None;

    loop {
        let msg = if pending.is_some() {
            match tokio::time::timeout(window, rx.recv()).await {
                Ok(msg) => msg,
                Err(_) => {
                    // Quiescence window elapsed with no newer state
                    if let Some(tasks) = pending.take()
                        && let Err(e) = store.save_all(&tasks)
                    {
                        error!(error = %e, "persist_loop: debounced save failed");
                    }
                    continue;
                }
            }
        } else {
            rx.recv().await
        };

        match msg {
            Some(PersistMsg::Publish(tasks)) => {
                debug!(count = tasks.len(), "persist_loop: state published, rescheduling write");
                pending = Some(tasks);
            }
            Some(PersistMsg::Flush(ack)) => {
                if let Some(tasks) = pending.take()
                    && let Err(e) = store.save_all(&tasks)
                {
                    error!(error = %e, "persist_loop: flush save failed");
                }
                let _ = ack.send(());
            }
            None => {
                // Manager dropped; write whatever is still pending
                if let Some(tasks) = pending.take()
                    && let Err(e) = store.save_all(&tasks)
                {
                    error!(error = %e, "persist_loop: final save failed");
                }
                debug!("persist_loop: channel closed, exiting");
                break;
            }
        }
    }
}
