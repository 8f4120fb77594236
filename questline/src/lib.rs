//! # Questline
//!
//! A hierarchical, execution-scoped context store for chained test
//! automation steps.
//!
//! Questline provides the state-passing core that automated test suites use
//! to move data between chained steps (browser actions, API calls, DB
//! queries) belonging to one logical test run:
//!
//! - **Hierarchical storage**: a keyed, multi-valued container with nested
//!   sub-storages, latest/indexed/type-filtered retrieval
//! - **Execution context**: a per-test [`quest::Quest`] owning storage,
//!   pluggable "world" services and a soft-assertion collector
//! - **Thread-scoped propagation**: [`quest::QuestHolder`] binds the active
//!   context to the executing test thread
//! - **Deferred values**: [`storage::Late`] handles for test data produced
//!   asynchronously and resolved on demand
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use questline::prelude::*;
//!
//! let factory = QuestFactory::new().with_world::<BrowserWorld, _>(BrowserWorld::new);
//! let quest = factory.create_quest();
//!
//! const RESPONSE: DataKey = DataKey::from_static("RESPONSE");
//! quest.storage().put(&RESPONSE, fetch_users());
//!
//! quest.complete()?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod assertions;
pub mod config;
pub mod errors;
pub mod observability;
pub mod quest;
pub mod storage;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::assertions::{SoftAssertions, SoftFailure};
    pub use crate::config::StorageConfig;
    pub use crate::errors::{LateError, QuestError, SoftAssertionError, StorageError};
    pub use crate::quest::{
        ArtifactRegistry, Quest, QuestFactory, QuestHolder, QuestLink, SuperQuest, World,
    };
    pub use crate::storage::{DataExtractor, DataKey, Late, LatePromise, Storage};
    pub use crate::utils::{generate_uuid, iso_timestamp};
}
