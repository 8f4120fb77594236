//! Hierarchical, execution-scoped storage.
//!
//! This module provides:
//! - Opaque keys with structural equality
//! - The multi-valued, insertion-ordered [`Storage`] container with nested
//!   sub-storages
//! - Typed projections over raw stored values
//! - Deferred values resolved on demand

mod extractor;
mod key;
mod late;
mod store;

pub use extractor::DataExtractor;
pub use key::DataKey;
pub use late::{Late, LatePromise};
pub use store::Storage;
