//! Per-test execution contexts and world services.
//!
//! This module provides:
//! - The per-test [`Quest`] context owning storage, worlds and soft
//!   assertions
//! - The privileged [`SuperQuest`] decorator used by orchestration code
//! - The thread-scoped [`QuestHolder`] binding
//! - The [`QuestFactory`] that assembles and publishes new contexts

mod context;
mod factory;
mod holder;
mod super_quest;
mod world;

pub use context::Quest;
pub use factory::QuestFactory;
pub use holder::QuestHolder;
pub use super_quest::SuperQuest;
pub use world::{ArtifactRegistry, QuestLink, World};
