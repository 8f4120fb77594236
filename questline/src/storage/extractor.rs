//! Typed projections over raw stored values.

use super::DataKey;
use std::any::Any;
use std::fmt;

/// A typed projection bound to a `(sub_key, key)` pair.
///
/// Extractors decouple the raw shape a step stored from the typed value a
/// consumer wants, without the consumer knowing where in the hierarchy the
/// raw value lives. They are stateless and created ad hoc:
///
/// ```rust,ignore
/// let body = DataExtractor::new::<HttpResponse>(RESPONSE, |r| r.body.clone());
/// let text: String = quest.storage().extract(&body)?;
/// ```
pub struct DataExtractor<T> {
    sub_key: Option<DataKey>,
    key: DataKey,
    project: Box<dyn Fn(&(dyn Any + Send + Sync)) -> Option<T> + Send + Sync>,
}

impl<T> DataExtractor<T> {
    /// Creates an extractor projecting from raw values of type `R` stored
    /// directly under `key`.
    #[must_use]
    pub fn new<R>(key: impl Into<DataKey>, project: impl Fn(&R) -> T + Send + Sync + 'static) -> Self
    where
        R: Send + Sync + 'static,
    {
        Self {
            sub_key: None,
            key: key.into(),
            project: Box::new(move |raw| raw.downcast_ref::<R>().map(&project)),
        }
    }

    /// Creates an extractor reading through the sub-storage under `sub_key`.
    #[must_use]
    pub fn in_sub<R>(
        sub_key: impl Into<DataKey>,
        key: impl Into<DataKey>,
        project: impl Fn(&R) -> T + Send + Sync + 'static,
    ) -> Self
    where
        R: Send + Sync + 'static,
    {
        Self {
            sub_key: Some(sub_key.into()),
            ..Self::new(key, project)
        }
    }

    /// The key the raw value is stored under.
    #[must_use]
    pub fn key(&self) -> &DataKey {
        &self.key
    }

    /// The sub-storage key, when reading through a nested storage.
    #[must_use]
    pub fn sub_key(&self) -> Option<&DataKey> {
        self.sub_key.as_ref()
    }

    /// Applies the projection to a raw stored value.
    pub(crate) fn apply(&self, raw: &(dyn Any + Send + Sync)) -> Option<T> {
        (self.project)(raw)
    }
}

impl<T> fmt::Debug for DataExtractor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataExtractor")
            .field("sub_key", &self.sub_key)
            .field("key", &self.key)
            .field("output", &std::any::type_name::<T>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Response {
        body: String,
        status: u16,
    }

    #[test]
    fn test_projection_applies_to_matching_raw() {
        let extractor = DataExtractor::new::<Response>("RESPONSE", |r| r.status);

        let raw = Response {
            body: "ok".to_string(),
            status: 200,
        };
        assert_eq!(extractor.apply(&raw), Some(200));
    }

    #[test]
    fn test_projection_misses_on_foreign_raw() {
        let extractor = DataExtractor::new::<Response>("RESPONSE", |r| r.body.clone());
        assert_eq!(extractor.apply(&"not a response".to_string()), None);
    }

    #[test]
    fn test_sub_key_is_carried() {
        let extractor = DataExtractor::in_sub::<Response>("API", "RESPONSE", |r| r.status);
        assert_eq!(extractor.sub_key().map(DataKey::name), Some("API"));
        assert_eq!(extractor.key().name(), "RESPONSE");
    }
}
