//! The per-test execution context.

use super::holder::QuestHolder;
use super::world::World;
use crate::assertions::SoftAssertions;
use crate::errors::QuestError;
use crate::storage::Storage;
use crate::utils::{generate_uuid, iso_timestamp, short_type_name};
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

struct WorldEntry {
    name: String,
    instance: Arc<dyn Any + Send + Sync>,
}

/// The per-test execution context.
///
/// A quest owns one [`Storage`] for the life of the test, a registry of
/// world services looked up by concrete type, and a soft-assertion
/// collector. It is created by [`super::QuestFactory`] at test start,
/// mutated by world registration and step execution, and torn down by
/// [`Quest::complete`], which flushes soft assertions and clears the
/// thread-scoped holder. No operation is valid after completion.
pub struct Quest {
    quest_id: Uuid,
    created_at: String,
    worlds: RwLock<HashMap<TypeId, WorldEntry>>,
    storage: Arc<Storage>,
    soft: SoftAssertions,
    completed: AtomicBool,
}

impl Quest {
    /// Creates a new empty quest.
    #[must_use]
    pub fn new() -> Self {
        Self {
            quest_id: generate_uuid(),
            created_at: iso_timestamp(),
            worlds: RwLock::new(HashMap::new()),
            storage: Arc::new(Storage::new()),
            soft: SoftAssertions::new(),
            completed: AtomicBool::new(false),
        }
    }

    /// Returns the quest's unique id.
    #[must_use]
    pub fn quest_id(&self) -> Uuid {
        self.quest_id
    }

    /// Returns when the quest was created (RFC3339).
    #[must_use]
    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    /// Returns the registered world instance for `W`.
    ///
    /// # Errors
    ///
    /// `WorldNotRegistered` when no world of that type was registered,
    /// `AlreadyCompleted` after completion.
    pub fn enters<W: World>(&self) -> Result<Arc<W>, QuestError> {
        self.ensure_active()?;

        let worlds = self.worlds.read();
        let entry = worlds
            .get(&TypeId::of::<W>())
            .ok_or_else(|| QuestError::WorldNotRegistered {
                world: short_type_name::<W>().to_string(),
            })?;

        tracing::debug!(quest_id = %self.quest_id, world = %entry.name, "entering world");

        entry
            .instance
            .clone()
            .downcast::<W>()
            .map_err(|_| QuestError::WorldNotRegistered {
                world: short_type_name::<W>().to_string(),
            })
    }

    /// Returns the first artifact of world `W` assignable to `A`.
    ///
    /// # Errors
    ///
    /// Fails when the world cannot be resolved or exposes no matching
    /// artifact.
    pub fn artifact<W: World, A: Send + Sync + 'static>(&self) -> Result<Arc<A>, QuestError> {
        let world = self.enters::<W>()?;
        world
            .artifacts()
            .first_of::<A>()
            .ok_or_else(|| QuestError::ArtifactNotFound {
                world: short_type_name::<W>().to_string(),
                artifact: short_type_name::<A>().to_string(),
            })
    }

    /// Returns the owned storage, a single instance for the quest's life.
    #[must_use]
    pub fn storage(&self) -> &Arc<Storage> {
        &self.storage
    }

    /// Returns the soft-assertion collector.
    #[must_use]
    pub fn soft_assertions(&self) -> &SoftAssertions {
        &self.soft
    }

    /// Completes the quest.
    ///
    /// Always clears the thread-scoped holder binding on the calling
    /// thread, then evaluates the accumulated soft assertions.
    ///
    /// # Errors
    ///
    /// `AlreadyCompleted` on a second call; an aggregate
    /// [`crate::errors::SoftAssertionError`] when any soft assertion failed.
    pub fn complete(&self) -> Result<(), QuestError> {
        if self.completed.swap(true, Ordering::SeqCst) {
            return Err(QuestError::AlreadyCompleted);
        }

        QuestHolder::clear();
        tracing::debug!(quest_id = %self.quest_id, "quest completed");

        self.soft.assert_all()?;
        Ok(())
    }

    /// Returns true once the quest has been completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed.load(Ordering::SeqCst)
    }

    /// Returns the number of registered worlds.
    #[must_use]
    pub fn world_count(&self) -> usize {
        self.worlds.read().len()
    }

    // Orchestration-only surface, exposed publicly through `SuperQuest`.

    pub(crate) fn register_world<W: World>(&self, world: Arc<W>) {
        let name = short_type_name::<W>().to_string();
        tracing::debug!(quest_id = %self.quest_id, world = %name, "registering world");
        self.worlds.write().insert(
            TypeId::of::<W>(),
            WorldEntry {
                name,
                instance: world,
            },
        );
    }

    pub(crate) fn remove_world<W: World>(&self) -> bool {
        self.worlds.write().remove(&TypeId::of::<W>()).is_some()
    }

    fn ensure_active(&self) -> Result<(), QuestError> {
        if self.is_completed() {
            return Err(QuestError::AlreadyCompleted);
        }
        Ok(())
    }
}

impl Default for Quest {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Quest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quest")
            .field("quest_id", &self.quest_id)
            .field("world_count", &self.world_count())
            .field("completed", &self.is_completed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct RestWorld;

    impl World for RestWorld {
        fn attach(&self, _quest: &super::super::SuperQuest) {}
    }

    #[test]
    fn test_enters_unregistered_world_fails() {
        let quest = Quest::new();
        let err = quest.enters::<RestWorld>().unwrap_err();
        assert_eq!(
            err,
            QuestError::WorldNotRegistered {
                world: "RestWorld".to_string()
            }
        );
    }

    #[test]
    fn test_enters_registered_world() {
        let quest = Quest::new();
        quest.register_world(Arc::new(RestWorld));

        assert_eq!(quest.world_count(), 1);
        assert!(quest.enters::<RestWorld>().is_ok());
    }

    #[test]
    fn test_remove_world() {
        let quest = Quest::new();
        quest.register_world(Arc::new(RestWorld));

        assert!(quest.remove_world::<RestWorld>());
        assert!(!quest.remove_world::<RestWorld>());
        assert!(quest.enters::<RestWorld>().is_err());
    }

    #[test]
    fn test_storage_is_single_instance() {
        let quest = Quest::new();
        let first = quest.storage().clone();
        let second = quest.storage().clone();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_complete_is_terminal() {
        let quest = Quest::new();
        quest.register_world(Arc::new(RestWorld));

        assert!(quest.complete().is_ok());
        assert!(quest.is_completed());
        assert_eq!(quest.complete().unwrap_err(), QuestError::AlreadyCompleted);
        assert_eq!(
            quest.enters::<RestWorld>().unwrap_err(),
            QuestError::AlreadyCompleted
        );
    }
}
