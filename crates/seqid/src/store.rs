use crate::StoreError;
use std::sync::Arc;

/// The minimal document shape written by entity-creation workflows.
///
/// `custom_id` is the formatted ID; `body` carries everything else about the
/// record and is opaque to this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    /// The formatted, human-readable ID (`customId`).
    pub custom_id: String,
    /// The rest of the document.
    pub body: serde_json::Value,
}

impl StoredRecord {
    /// Creates a record.
    pub fn new(custom_id: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            custom_id: custom_id.into(),
            body,
        }
    }
}

/// A document store holding entity records keyed by `customId`.
///
/// The allocator only ever reads through [`Self::custom_ids_with_prefix`].
/// [`Self::insert`] must enforce uniqueness of `customId` within a
/// collection: concurrent allocations can compute the same ID, and the
/// uniqueness constraint is what turns that race into a retryable
/// [`StoreError::Duplicate`] instead of two records sharing one ID.
pub trait RecordStore: Send + Sync {
    /// Returns every `customId` in `collection` that starts with `prefix`.
    ///
    /// The match is anchored and case-sensitive. Order is unspecified.
    fn custom_ids_with_prefix(
        &self,
        collection: &str,
        prefix: &str,
    ) -> impl Future<Output = Result<Vec<String>, StoreError>> + Send;

    /// Inserts `record`, failing with [`StoreError::Duplicate`] if its
    /// `customId` is already present in `collection`.
    fn insert(
        &self,
        collection: &str,
        record: StoredRecord,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Fetches a record by `customId`.
    fn get(
        &self,
        collection: &str,
        custom_id: &str,
    ) -> impl Future<Output = Result<Option<StoredRecord>, StoreError>> + Send;

    /// Deletes a record by `customId`, returning it if it existed.
    ///
    /// Numbers freed this way are not reissued unless they were the highest
    /// in the collection.
    fn remove(
        &self,
        collection: &str,
        custom_id: &str,
    ) -> impl Future<Output = Result<Option<StoredRecord>, StoreError>> + Send;
}

impl<S> RecordStore for Arc<S>
where
    S: RecordStore,
{
    fn custom_ids_with_prefix(
        &self,
        collection: &str,
        prefix: &str,
    ) -> impl Future<Output = Result<Vec<String>, StoreError>> + Send {
        (**self).custom_ids_with_prefix(collection, prefix)
    }

    fn insert(
        &self,
        collection: &str,
        record: StoredRecord,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).insert(collection, record)
    }

    fn get(
        &self,
        collection: &str,
        custom_id: &str,
    ) -> impl Future<Output = Result<Option<StoredRecord>, StoreError>> + Send {
        (**self).get(collection, custom_id)
    }

    fn remove(
        &self,
        collection: &str,
        custom_id: &str,
    ) -> impl Future<Output = Result<Option<StoredRecord>, StoreError>> + Send {
        (**self).remove(collection, custom_id)
    }
}
