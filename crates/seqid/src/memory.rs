use crate::{RecordStore, StoreError, StoredRecord};
use parking_lot::RwLock;
use std::{
    collections::{BTreeMap, HashMap},
    ops::Bound,
    sync::Arc,
};

type Collection = BTreeMap<String, StoredRecord>;

/// An in-process [`RecordStore`] with a unique index on `customId`.
///
/// Each collection is an ordered map keyed by `customId`, so prefix scans are
/// range reads. Clones share the same underlying data.
#[derive(Clone, Default, Debug)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `collection` with records carrying the given IDs and a `null`
    /// body. Existing IDs are overwritten.
    pub fn seed<I, S>(&self, collection: &str, custom_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut collections = self.collections.write();
        let records = collections.entry(collection.to_owned()).or_default();
        for custom_id in custom_ids {
            let record = StoredRecord::new(custom_id, serde_json::Value::Null);
            records.insert(record.custom_id.clone(), record);
        }
    }

    /// Number of records in `collection`.
    #[must_use]
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    /// Returns `true` if `collection` holds no records.
    #[must_use]
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

impl RecordStore for MemoryStore {
    async fn custom_ids_with_prefix(
        &self,
        collection: &str,
        prefix: &str,
    ) -> Result<Vec<String>, StoreError> {
        let collections = self.collections.read();
        let Some(records) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(records
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .map(|(custom_id, _)| custom_id)
            .take_while(|custom_id| custom_id.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn insert(&self, collection: &str, record: StoredRecord) -> Result<(), StoreError> {
        let mut collections = self.collections.write();
        let records = collections.entry(collection.to_owned()).or_default();
        if records.contains_key(&record.custom_id) {
            return Err(StoreError::Duplicate(record.custom_id));
        }
        records.insert(record.custom_id.clone(), record);
        Ok(())
    }

    async fn get(
        &self,
        collection: &str,
        custom_id: &str,
    ) -> Result<Option<StoredRecord>, StoreError> {
        Ok(self
            .collections
            .read()
            .get(collection)
            .and_then(|records| records.get(custom_id))
            .cloned())
    }

    async fn remove(
        &self,
        collection: &str,
        custom_id: &str,
    ) -> Result<Option<StoredRecord>, StoreError> {
        Ok(self
            .collections
            .write()
            .get_mut(collection)
            .and_then(|records| records.remove(custom_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn prefix_scan_is_anchored_and_case_sensitive() {
        let store = MemoryStore::new();
        store.seed(
            "establishments",
            ["EST-0001", "EST-0002", "est-0009", "XEST-0009", "ESTX-0009"],
        );
        let mut ids = store
            .custom_ids_with_prefix("establishments", "EST-")
            .await
            .unwrap();
        ids.sort();
        assert_eq!(ids, ["EST-0001", "EST-0002"]);
    }

    #[tokio::test]
    async fn unknown_collection_scans_empty() {
        let store = MemoryStore::new();
        let ids = store.custom_ids_with_prefix("orders", "ORD-").await.unwrap();
        assert!(ids.is_empty());
        assert!(store.is_empty("orders"));
    }

    #[tokio::test]
    async fn insert_enforces_unique_custom_id_per_collection() {
        let store = MemoryStore::new();
        store
            .insert("orders", StoredRecord::new("ORD-000001", json!({"total": 5})))
            .await
            .unwrap();
        let err = store
            .insert("orders", StoredRecord::new("ORD-000001", json!({})))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::Duplicate("ORD-000001".into()));

        // Same ID in another collection is a different record.
        store
            .insert("payments", StoredRecord::new("ORD-000001", json!({})))
            .await
            .unwrap();
        assert_eq!(store.len("orders"), 1);
        assert_eq!(store.len("payments"), 1);
    }

    #[tokio::test]
    async fn get_and_remove() {
        let store = MemoryStore::new();
        let record = StoredRecord::new("TBL-001", json!({"seats": 4}));
        store.insert("tables", record.clone()).await.unwrap();

        assert_eq!(store.get("tables", "TBL-001").await.unwrap(), Some(record.clone()));
        assert_eq!(store.remove("tables", "TBL-001").await.unwrap(), Some(record));
        assert_eq!(store.get("tables", "TBL-001").await.unwrap(), None);
        assert_eq!(store.remove("tables", "TBL-001").await.unwrap(), None);
    }

    #[tokio::test]
    async fn clones_share_data() {
        let store = MemoryStore::new();
        let other = store.clone();
        other.seed("users", ["USR-0001"]);
        assert_eq!(store.len("users"), 1);
    }
}
