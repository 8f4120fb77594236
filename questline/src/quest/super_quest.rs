//! The privileged decorator over a quest.

use super::world::World;
use super::Quest;
use crate::assertions::SoftAssertions;
use crate::errors::QuestError;
use crate::storage::Storage;
use std::fmt;
use std::sync::Arc;

/// Capability-widening decorator over a shared [`Quest`].
///
/// Ordinary test code interacts with the narrower `Quest` surface;
/// framework orchestration code holds a `SuperQuest` over the identical
/// underlying instance, which forwards every public operation unchanged and
/// additionally exposes world registration and removal. Cloning is cheap
/// (an `Arc` bump), so call chains can pass the handle by value.
#[derive(Clone)]
pub struct SuperQuest {
    inner: Arc<Quest>,
}

impl SuperQuest {
    /// Wraps a shared quest.
    #[must_use]
    pub fn new(inner: Arc<Quest>) -> Self {
        Self { inner }
    }

    /// Returns the underlying quest.
    #[must_use]
    pub fn quest(&self) -> &Arc<Quest> {
        &self.inner
    }

    // Orchestration-only operations.

    /// Registers a world instance under its concrete type.
    pub fn register_world<W: World>(&self, world: Arc<W>) {
        self.inner.register_world(world);
    }

    /// Removes the world registered under `W`, returning whether one was
    /// present.
    pub fn remove_world<W: World>(&self) -> bool {
        self.inner.remove_world::<W>()
    }

    // Forwarded quest surface.

    /// Returns the registered world instance for `W`.
    pub fn enters<W: World>(&self) -> Result<Arc<W>, QuestError> {
        self.inner.enters::<W>()
    }

    /// Returns the first artifact of world `W` assignable to `A`.
    pub fn artifact<W: World, A: Send + Sync + 'static>(&self) -> Result<Arc<A>, QuestError> {
        self.inner.artifact::<W, A>()
    }

    /// Returns the quest's storage.
    #[must_use]
    pub fn storage(&self) -> &Arc<Storage> {
        self.inner.storage()
    }

    /// Returns the soft-assertion collector.
    #[must_use]
    pub fn soft_assertions(&self) -> &SoftAssertions {
        self.inner.soft_assertions()
    }

    /// Completes the underlying quest.
    pub fn complete(&self) -> Result<(), QuestError> {
        self.inner.complete()
    }
}

impl fmt::Debug for SuperQuest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuperQuest")
            .field("quest", &self.inner)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DbWorld;

    impl World for DbWorld {
        fn attach(&self, _quest: &SuperQuest) {}
    }

    #[test]
    fn test_decorates_the_identical_instance() {
        let quest = Arc::new(Quest::new());
        let wide = SuperQuest::new(quest.clone());

        assert!(Arc::ptr_eq(wide.quest(), &quest));
        assert!(Arc::ptr_eq(wide.storage(), quest.storage()));
    }

    #[test]
    fn test_widened_surface_registers_worlds() {
        let wide = SuperQuest::new(Arc::new(Quest::new()));
        wide.register_world(Arc::new(DbWorld));

        assert!(wide.enters::<DbWorld>().is_ok());
        assert!(wide.quest().enters::<DbWorld>().is_ok());

        assert!(wide.remove_world::<DbWorld>());
        assert!(wide.enters::<DbWorld>().is_err());
    }
}
