//! The hierarchical, multi-valued storage container.

use super::extractor::DataExtractor;
use super::key::DataKey;
use super::late::{Late, LateSlot};
use crate::config;
use crate::errors::StorageError;
use dashmap::DashMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// One entry in a key's value list.
enum Slot {
    /// An opaque typed value.
    Value(Arc<dyn Any + Send + Sync>),
    /// A nested storage.
    Sub(Arc<Storage>),
    /// A deferred value, unresolved until `join_late_arguments`.
    Late(Box<dyn LateSlot>),
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(_) => f.write_str("Value"),
            Self::Sub(_) => f.write_str("Sub"),
            Self::Late(_) => f.write_str("Late"),
        }
    }
}

/// Keyed, multi-valued, insertion-ordered container for test-run state.
///
/// Chained test steps repeatedly write to the same logical key (successive
/// query results, page states, responses); retrieval offers "the latest",
/// "the Nth-from-latest" or "every value of a given shape" without explicit
/// versioning. Values are never removed except during late-value resolution.
///
/// A storage is normally owned by one quest and touched from one thread,
/// but the backing map is concurrent so a shared instance stays safe for
/// parallel read/append.
#[derive(Default)]
pub struct Storage {
    entries: DashMap<DataKey, Vec<Slot>>,
}

impl Storage {
    /// Creates a new empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value to the list for `key`, creating the list if absent.
    pub fn put<T: Send + Sync + 'static>(&self, key: &DataKey, value: T) {
        self.entries
            .entry(key.clone())
            .or_default()
            .push(Slot::Value(Arc::new(value)));
    }

    /// Appends an unresolved deferred value to the list for `key`.
    pub fn put_late<T: Send + Sync + 'static>(&self, key: &DataKey, late: Late<T>) {
        self.entries
            .entry(key.clone())
            .or_default()
            .push(Slot::Late(Box::new(late)));
    }

    /// Returns the most-recently-inserted value under `key` if it is a
    /// plain value of type `T`.
    ///
    /// Does not search earlier entries; a latest entry of another type
    /// resolves to `None` (see [`Storage::get_by_class`] for the scanning
    /// variant).
    #[must_use]
    pub fn get<T: Send + Sync + 'static>(&self, key: &DataKey) -> Option<Arc<T>> {
        let slots = self.entries.get(key)?;
        match slots.last()? {
            Slot::Value(value) => value.clone().downcast::<T>().ok(),
            _ => None,
        }
    }

    /// Returns the value at `index` counted from the most recent backward
    /// (1 = latest), if it is a plain value of type `T`.
    ///
    /// Returns `None` when `index` is outside `[1, count(key)]`.
    #[must_use]
    pub fn get_by_index<T: Send + Sync + 'static>(
        &self,
        key: &DataKey,
        index: usize,
    ) -> Option<Arc<T>> {
        let slots = self.entries.get(key)?;
        if index == 0 || index > slots.len() {
            return None;
        }
        match &slots[slots.len() - index] {
            Slot::Value(value) => value.clone().downcast::<T>().ok(),
            _ => None,
        }
    }

    /// Scans from most recent to oldest and returns the first plain value
    /// of type `T` under `key`.
    #[must_use]
    pub fn get_by_class<T: Send + Sync + 'static>(&self, key: &DataKey) -> Option<Arc<T>> {
        let slots = self.entries.get(key)?;
        slots.iter().rev().find_map(|slot| match slot {
            Slot::Value(value) => value.clone().downcast::<T>().ok(),
            _ => None,
        })
    }

    /// Returns every plain value of type `T` under `key`, in original
    /// insertion order.
    #[must_use]
    pub fn get_all_by_class<T: Send + Sync + 'static>(&self, key: &DataKey) -> Vec<Arc<T>> {
        self.entries.get(key).map_or_else(Vec::new, |slots| {
            slots
                .iter()
                .filter_map(|slot| match slot {
                    Slot::Value(value) => value.clone().downcast::<T>().ok(),
                    _ => None,
                })
                .collect()
        })
    }

    /// Resolves an extractor against the latest raw value.
    ///
    /// # Errors
    ///
    /// `ExtractionMissing` when no raw value exists at the extractor's
    /// location, `ExtractionMismatch` when the projection does not produce
    /// the requested type.
    pub fn extract<T: Send + Sync + 'static>(
        &self,
        extractor: &DataExtractor<T>,
    ) -> Result<T, StorageError> {
        self.extract_by_index(extractor, 1)
    }

    /// Resolves an extractor against the raw value at `index` counted from
    /// the most recent backward (1 = latest).
    pub fn extract_by_index<T: Send + Sync + 'static>(
        &self,
        extractor: &DataExtractor<T>,
        index: usize,
    ) -> Result<T, StorageError> {
        let raw = match extractor.sub_key() {
            Some(sub_key) => self.sub(sub_key)?.raw_by_index(extractor.key(), index),
            None => self.raw_by_index(extractor.key(), index),
        }
        .ok_or_else(|| StorageError::ExtractionMissing {
            key: extractor.key().clone(),
        })?;

        extractor
            .apply(raw.as_ref())
            .ok_or_else(|| StorageError::ExtractionMismatch {
                key: extractor.key().clone(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Returns the nested storage under `key`, creating and storing an
    /// empty one on first access.
    ///
    /// Repeated calls with the same key return the identical instance. Each
    /// successful call feeds the lazy default-sub-storage resolution (see
    /// [`crate::config`]).
    ///
    /// # Errors
    ///
    /// `SubStorageConflict` when `key` already holds a plain value.
    pub fn sub(&self, key: &DataKey) -> Result<Arc<Storage>, StorageError> {
        let mut slots = self.entries.entry(key.clone()).or_default();

        if !slots.is_empty() {
            let existing = slots.iter().rev().find_map(|slot| match slot {
                Slot::Sub(sub) => Some(sub.clone()),
                _ => None,
            });
            return match existing {
                Some(sub) => {
                    config::note_sub_access(key);
                    Ok(sub)
                }
                None => Err(StorageError::SubStorageConflict { key: key.clone() }),
            };
        }

        let sub = Arc::new(Storage::new());
        slots.push(Slot::Sub(sub.clone()));
        config::note_sub_access(key);
        Ok(sub)
    }

    /// Returns the storage under the resolved default sub-storage key.
    ///
    /// # Errors
    ///
    /// `NoDefaultSubStorage` when no sub-storage lookup has matched the
    /// configured name yet.
    pub fn sub_default(&self) -> Result<Arc<Storage>, StorageError> {
        let key = config::default_sub_key().ok_or(StorageError::NoDefaultSubStorage)?;
        self.sub(&key)
    }

    /// Resolves every deferred entry in place.
    ///
    /// Each unresolved late slot is replaced, at its original position, with
    /// its joined value. An entry whose join fails is silently dropped from
    /// its list rather than propagated; the drop is logged at `warn`. That
    /// best-effort policy is retained legacy behavior and may mask data
    /// loss, so callers relying on a joined value should retrieve it and
    /// handle absence.
    pub fn join_late_arguments(&self) {
        for mut entry in self.entries.iter_mut() {
            let key = entry.key().clone();
            let slots = entry.value_mut();
            let drained: Vec<Slot> = slots.drain(..).collect();
            for slot in drained {
                match slot {
                    Slot::Late(late) => match late.join_boxed() {
                        Ok(value) => slots.push(Slot::Value(value)),
                        Err(error) => {
                            tracing::warn!(key = %key, %error, "dropping late entry that failed to resolve");
                        }
                    },
                    other => slots.push(other),
                }
            }
        }
    }

    /// Returns all keys with at least one entry.
    #[must_use]
    pub fn keys(&self) -> Vec<DataKey> {
        self.entries.iter().map(|e| e.key().clone()).collect()
    }

    /// Returns the number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of entries under `key`.
    #[must_use]
    pub fn count(&self, key: &DataKey) -> usize {
        self.entries.get(key).map_or(0, |slots| slots.len())
    }

    /// Returns the latest raw plain value under `key` at `index`, skipping
    /// the type check.
    fn raw_by_index(&self, key: &DataKey, index: usize) -> Option<Arc<dyn Any + Send + Sync>> {
        let slots = self.entries.get(key)?;
        if index == 0 || index > slots.len() {
            return None;
        }
        match &slots[slots.len() - index] {
            Slot::Value(value) => Some(value.clone()),
            _ => None,
        }
    }
}

impl fmt::Debug for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage")
            .field("key_count", &self.entries.len())
            .finish()
    }
}
