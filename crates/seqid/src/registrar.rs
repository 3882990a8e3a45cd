use crate::{
    EntityKind, Error, IdAllocator, RandSource, RecordStore, Result, StoreError, StoredRecord,
    SystemClock, ThreadRandom, TimeSource,
};

/// Creates entity records under freshly allocated IDs.
///
/// Allocation is advisory: two concurrent creations may compute the same ID.
/// The registrar relies on the store's unique `customId` constraint to detect
/// that, and re-allocates after each rejected insert. Once
/// [`AllocatorConfig::max_attempts`](crate::AllocatorConfig::max_attempts)
/// inserts have been rejected it gives up with [`Error::Conflict`].
#[derive(Clone, Debug)]
pub struct Registrar<S, T = SystemClock, R = ThreadRandom> {
    allocator: IdAllocator<S, T, R>,
}

impl<S, T, R> Registrar<S, T, R>
where
    S: RecordStore,
    T: TimeSource + Sync,
    R: RandSource<u64> + Sync,
{
    /// Wraps an allocator.
    pub fn new(allocator: IdAllocator<S, T, R>) -> Self {
        Self { allocator }
    }

    /// The wrapped allocator.
    pub fn allocator(&self) -> &IdAllocator<S, T, R> {
        &self.allocator
    }

    /// Creates a record of the entity type named by `entity_type`.
    ///
    /// # Errors
    ///
    /// See [`Self::create`]; additionally [`Error::Configuration`] for an
    /// unknown key.
    pub async fn create_for(
        &self,
        entity_type: &str,
        body: serde_json::Value,
    ) -> Result<StoredRecord> {
        self.create(entity_type.parse()?, body).await
    }

    /// Allocates an ID for `kind` and inserts a record carrying it.
    ///
    /// # Errors
    ///
    /// - [`Error::Conflict`] if every attempt collided with an existing ID.
    /// - [`Error::PersistenceUnavailable`] if the insert itself fails.
    /// - [`Error::Exhausted`] if the kind's suffix space is used up.
    #[tracing::instrument(level = "debug", skip_all, fields(kind = %kind))]
    pub async fn create(&self, kind: EntityKind, body: serde_json::Value) -> Result<StoredRecord> {
        let attempts = self.allocator.config().max_attempts.max(1);
        let collection = kind.config().collection;

        for attempt in 1..=attempts {
            let custom_id = self.allocator.generate(kind).await?;
            let record = StoredRecord::new(custom_id, body.clone());

            match self.allocator.store().insert(collection, record.clone()).await {
                Ok(()) => return Ok(record),
                Err(StoreError::Duplicate(id)) => {
                    tracing::debug!(
                        monotonic_counter.duplicate_retries = 1_u64,
                        kind = %kind,
                        attempt,
                        id = %id,
                        "customId taken by a concurrent writer, reallocating"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }

        tracing::warn!(
            monotonic_counter.allocation_conflicts = 1_u64,
            kind = %kind,
            attempts,
            "giving up on ID allocation after repeated conflicts"
        );
        Err(Error::Conflict { kind, attempts })
    }
}
