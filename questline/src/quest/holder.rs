//! Thread-scoped binding of the active quest.

use super::SuperQuest;
use std::cell::RefCell;

thread_local! {
    static CURRENT_QUEST: RefCell<Option<SuperQuest>> = RefCell::new(None);
}

/// Process-wide, thread-scoped registry of the active quest.
///
/// `set` binds a context to the calling thread only; no two concurrently
/// executing threads observe each other's binding. `Quest::complete` clears
/// the binding on the thread that set it, so thread-pool reuse never leaks
/// a stale context into the next test.
pub struct QuestHolder;

impl QuestHolder {
    /// Binds the given context to the calling thread.
    pub fn set(quest: SuperQuest) {
        CURRENT_QUEST.with(|current| {
            *current.borrow_mut() = Some(quest);
        });
    }

    /// Returns the context bound to the calling thread, if any.
    #[must_use]
    pub fn get() -> Option<SuperQuest> {
        CURRENT_QUEST.with(|current| current.borrow().clone())
    }

    /// Unbinds the calling thread.
    pub fn clear() {
        CURRENT_QUEST.with(|current| {
            *current.borrow_mut() = None;
        });
    }

    /// Returns true if the calling thread has a bound context.
    #[must_use]
    pub fn is_bound() -> bool {
        CURRENT_QUEST.with(|current| current.borrow().is_some())
    }
}
