//! World services and their typed artifact accessors.

use super::{Quest, SuperQuest};
use crate::errors::QuestError;
use crate::utils::short_type_name;
use parking_lot::RwLock;
use std::any::Any;
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

/// A pluggable service registered into a quest and looked up by concrete
/// type.
///
/// Worlds wrap one family of test actions (browser, REST, DB). The factory
/// calls [`World::attach`] exactly once with the owning context before first
/// use, then [`World::prepare`] exactly once immediately afterwards.
pub trait World: Any + Send + Sync {
    /// Receives a handle to the owning quest.
    ///
    /// Worlds that need the back-reference typically store it in a
    /// [`QuestLink`].
    fn attach(&self, quest: &SuperQuest);

    /// Post-registration initialization hook.
    fn prepare(&self) {}

    /// The typed artifacts this world exposes to `Quest::artifact`.
    ///
    /// Defaults to an empty registry.
    fn artifacts(&self) -> &ArtifactRegistry {
        empty_artifacts()
    }
}

static EMPTY_ARTIFACTS: OnceLock<ArtifactRegistry> = OnceLock::new();

fn empty_artifacts() -> &'static ArtifactRegistry {
    EMPTY_ARTIFACTS.get_or_init(ArtifactRegistry::new)
}

struct ArtifactEntry {
    name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

/// Explicit registry of typed accessors a world exposes.
///
/// Worlds populate the registry at construction time; `Quest::artifact`
/// returns the first entry assignable to the requested type, in
/// registration order.
#[derive(Default)]
pub struct ArtifactRegistry {
    entries: RwLock<Vec<ArtifactEntry>>,
}

impl ArtifactRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an artifact.
    pub fn register<A: Send + Sync + 'static>(&self, artifact: A) {
        self.register_arc(Arc::new(artifact));
    }

    /// Registers a shared artifact.
    pub fn register_arc<A: Send + Sync + 'static>(&self, artifact: Arc<A>) {
        self.entries.write().push(ArtifactEntry {
            name: short_type_name::<A>(),
            value: artifact,
        });
    }

    /// Returns the first registered artifact assignable to `A`.
    #[must_use]
    pub fn first_of<A: Send + Sync + 'static>(&self) -> Option<Arc<A>> {
        self.entries
            .read()
            .iter()
            .find_map(|entry| entry.value.clone().downcast::<A>().ok())
    }

    /// Returns the number of registered artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if no artifacts are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl fmt::Debug for ArtifactRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&'static str> = self.entries.read().iter().map(|e| e.name).collect();
        f.debug_struct("ArtifactRegistry")
            .field("artifacts", &names)
            .finish()
    }
}

/// Weak back-reference from a world to its owning quest.
///
/// Quests own their worlds, so the reverse edge is weak to keep the cycle
/// from leaking. [`QuestLink::get`] fails once the quest is dropped.
#[derive(Default)]
pub struct QuestLink {
    quest: RwLock<Weak<Quest>>,
}

impl QuestLink {
    /// Creates a new unbound link.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the link to the owning quest.
    pub fn bind(&self, quest: &SuperQuest) {
        *self.quest.write() = Arc::downgrade(quest.quest());
    }

    /// Returns the owning quest.
    ///
    /// # Errors
    ///
    /// `WorldDetached` when the link was never bound or the quest is gone.
    pub fn get(&self) -> Result<SuperQuest, QuestError> {
        self.quest
            .read()
            .upgrade()
            .map(SuperQuest::new)
            .ok_or(QuestError::WorldDetached)
    }

    /// Returns true if the link currently points at a live quest.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.quest.read().strong_count() > 0
    }
}

impl fmt::Debug for QuestLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuestLink")
            .field("bound", &self.is_bound())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Driver {
        session: String,
    }

    struct Cookies;

    #[test]
    fn test_first_of_respects_registration_order() {
        let registry = ArtifactRegistry::new();
        registry.register(Driver {
            session: "s-1".to_string(),
        });
        registry.register(Driver {
            session: "s-2".to_string(),
        });
        registry.register(Cookies);

        let driver = registry.first_of::<Driver>().unwrap();
        assert_eq!(driver.session, "s-1");
        assert!(registry.first_of::<Cookies>().is_some());
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_first_of_missing_type() {
        let registry = ArtifactRegistry::new();
        registry.register(Cookies);
        assert!(registry.first_of::<Driver>().is_none());
    }

    #[test]
    fn test_unbound_link_is_detached() {
        let link = QuestLink::new();
        assert!(!link.is_bound());
        assert_eq!(link.get().unwrap_err(), QuestError::WorldDetached);
    }
}
