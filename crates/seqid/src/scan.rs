use crate::{IdConfig, RecordStore, StoreError, parse_suffix};

/// Finds the highest numeric suffix currently assigned to records of the
/// kind described by `config`.
///
/// Reads every `customId` in the kind's collection that starts with
/// `<prefix>-` and returns the largest decimal suffix, or `None` if no record
/// carries a parseable one. Suffixes that are not decimal numbers (legacy or
/// corrupted data, fallback IDs) are skipped.
///
/// This is read-only. Store faults are returned to the caller untouched.
///
/// # Errors
///
/// Returns the store's error if the scan query fails.
pub async fn scan_highest<S>(store: &S, config: &IdConfig) -> Result<Option<u64>, StoreError>
where
    S: RecordStore,
{
    let prefix = config.scan_prefix();
    let custom_ids = store
        .custom_ids_with_prefix(config.collection, &prefix)
        .await?;

    let highest = custom_ids
        .iter()
        .filter_map(|custom_id| {
            let number = parse_suffix(config.prefix, custom_id);
            if number.is_none() {
                tracing::debug!(
                    collection = config.collection,
                    custom_id = %custom_id,
                    "skipping malformed customId"
                );
            }
            number
        })
        .max();

    Ok(highest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EntityKind, MemoryStore};

    #[tokio::test]
    async fn empty_collection_has_no_highest() {
        let store = MemoryStore::new();
        let highest = scan_highest(&store, EntityKind::Table.config()).await.unwrap();
        assert_eq!(highest, None);
    }

    #[tokio::test]
    async fn malformed_suffixes_are_skipped() {
        let store = MemoryStore::new();
        store.seed("establishments", ["EST-abc", "EST-0003", "EST-", "EST-12x"]);
        let highest = scan_highest(&store, EntityKind::Establishment.config())
            .await
            .unwrap();
        assert_eq!(highest, Some(3));
    }

    #[tokio::test]
    async fn only_malformed_records_means_none() {
        let store = MemoryStore::new();
        store.seed("orders", ["ORD-LZ3K9Q-00A1B2", "ORD-??"]);
        let highest = scan_highest(&store, EntityKind::Order.config()).await.unwrap();
        assert_eq!(highest, None);
    }

    #[tokio::test]
    async fn highest_is_numeric_not_lexicographic() {
        let store = MemoryStore::new();
        // "TBL-999" sorts after "TBL-1000" as a string.
        store.seed("tables", ["TBL-1000", "TBL-999", "TBL-002"]);
        let highest = scan_highest(&store, EntityKind::Table.config()).await.unwrap();
        assert_eq!(highest, Some(1000));
    }

    #[tokio::test]
    async fn other_prefixes_in_the_collection_are_ignored() {
        let store = MemoryStore::new();
        store.seed("menu_items", ["MENU-0004", "MENUX-0100", "MEN-0200", "menu-0300"]);
        let highest = scan_highest(&store, EntityKind::MenuItem.config())
            .await
            .unwrap();
        assert_eq!(highest, Some(4));
    }
}
