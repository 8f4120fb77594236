//! Assembly of new quests.

use super::holder::QuestHolder;
use super::world::World;
use super::{Quest, SuperQuest};
use crate::utils::short_type_name;
use std::sync::Arc;

type InstallFn = Box<dyn Fn(&SuperQuest) + Send + Sync>;

struct WorldRegistration {
    name: &'static str,
    install: InstallFn,
}

/// Builds new quests and publishes them to the calling thread.
///
/// The factory carries an explicit list of world providers; discovery of
/// providers belongs to the embedding framework. For each provider,
/// [`QuestFactory::create_quest`] constructs a fresh world instance,
/// attaches the new context, runs the post-registration hook and registers
/// the world under its concrete type, then binds the context into
/// [`QuestHolder`]. This is the only place worlds are registered; it is
/// typically invoked once per test execution.
#[derive(Default)]
pub struct QuestFactory {
    providers: Vec<WorldRegistration>,
}

impl QuestFactory {
    /// Creates a factory with no world providers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a world provider.
    ///
    /// The provider runs once per created quest, so parallel test threads
    /// never share world instances.
    #[must_use]
    pub fn with_world<W, F>(mut self, provider: F) -> Self
    where
        W: World,
        F: Fn() -> W + Send + Sync + 'static,
    {
        self.providers.push(WorldRegistration {
            name: short_type_name::<W>(),
            install: Box::new(move |quest| {
                let world = Arc::new(provider());
                world.attach(quest);
                world.prepare();
                quest.register_world(world);
            }),
        });
        self
    }

    /// Returns the number of registered providers.
    #[must_use]
    pub fn world_count(&self) -> usize {
        self.providers.len()
    }

    /// Builds a new quest, installs every world, and binds the quest to the
    /// calling thread.
    #[must_use]
    pub fn create_quest(&self) -> SuperQuest {
        let quest = SuperQuest::new(Arc::new(Quest::new()));
        tracing::debug!(
            quest_id = %quest.quest().quest_id(),
            worlds = self.providers.len(),
            "creating quest"
        );

        for registration in &self.providers {
            tracing::debug!(world = registration.name, "installing world");
            (registration.install)(&quest);
        }

        QuestHolder::set(quest.clone());
        quest
    }
}

impl std::fmt::Debug for QuestFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&'static str> = self.providers.iter().map(|p| p.name).collect();
        f.debug_struct("QuestFactory")
            .field("worlds", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ApiWorld;

    impl World for ApiWorld {
        fn attach(&self, _quest: &SuperQuest) {}
    }

    #[test]
    fn test_factory_registers_providers() {
        let factory = QuestFactory::new().with_world::<ApiWorld, _>(|| ApiWorld);
        assert_eq!(factory.world_count(), 1);

        let quest = factory.create_quest();
        assert_eq!(quest.quest().world_count(), 1);
        assert!(quest.enters::<ApiWorld>().is_ok());

        QuestHolder::clear();
    }

    #[test]
    fn test_create_quest_binds_the_holder() {
        let factory = QuestFactory::new();
        let quest = factory.create_quest();

        let bound = QuestHolder::get().expect("no bound quest");
        assert!(Arc::ptr_eq(bound.quest(), quest.quest()));

        QuestHolder::clear();
    }

    #[test]
    fn test_each_quest_gets_fresh_worlds() {
        let factory = QuestFactory::new().with_world::<ApiWorld, _>(|| ApiWorld);

        let first = factory.create_quest();
        let second = factory.create_quest();

        let world_a = first.enters::<ApiWorld>().expect("world missing");
        let world_b = second.enters::<ApiWorld>().expect("world missing");
        assert!(!Arc::ptr_eq(&world_a, &world_b));

        QuestHolder::clear();
    }
}
