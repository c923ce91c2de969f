//! The task store: an in-memory, insertion-ordered collection of todos.
//!
//! [`TaskStore`] is the capability set the HTTP layer depends on;
//! [`InMemoryTaskStore`] is the only implementation. Ids are caller-supplied
//! and not checked for uniqueness on insert, so lookup reports an
//! ambiguity instead of picking one of several matches.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::todo::Todo;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{matches} todos share id {id}")]
    AmbiguousId { id: i32, matches: usize },
}

/// Lookup-by-id, list-all, add and delete-by-id over a collection of todos.
pub trait TaskStore: Send + Sync + 'static {
    /// Every todo, in insertion order. Empty when there are none.
    fn list_all(&self) -> Vec<Todo>;

    /// The todo with `id`, or `None`.
    ///
    /// # Errors
    ///
    /// [`StoreError::AmbiguousId`] if more than one todo carries `id`.
    fn get_by_id(&self, id: i32) -> Result<Option<Todo>, StoreError>;

    /// Appends `todo` and hands it back unchanged.
    fn add(&self, todo: Todo) -> Todo;

    /// Removes every todo with `id`; returns how many went. Zero is not an error.
    fn delete_by_id(&self, id: i32) -> usize;

    /// Number of stored todos.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-wide handle the route handlers share.
pub type SharedStore = Arc<dyn TaskStore>;

/// [`TaskStore`] backed by a `Vec` behind a reader/writer lock.
///
/// The lock is never held across an `.await`; every operation is a short
/// critical section.
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    todos: RwLock<Vec<Todo>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedStore {
        Arc::new(Self::new())
    }
}

impl TaskStore for InMemoryTaskStore {
    fn list_all(&self) -> Vec<Todo> {
        self.todos.read().clone()
    }

    fn get_by_id(&self, id: i32) -> Result<Option<Todo>, StoreError> {
        let todos = self.todos.read();
        let mut matches = todos.iter().filter(|t| t.id == id);
        let first = matches.next();
        let extra = matches.count();
        if extra > 0 {
            return Err(StoreError::AmbiguousId { id, matches: extra + 1 });
        }
        Ok(first.cloned())
    }

    fn add(&self, todo: Todo) -> Todo {
        self.todos.write().push(todo.clone());
        todo
    }

    fn delete_by_id(&self, id: i32) -> usize {
        let mut todos = self.todos.write();
        let before = todos.len();
        todos.retain(|t| t.id != id);
        before - todos.len()
    }

    fn len(&self) -> usize {
        self.todos.read().len()
    }
}
