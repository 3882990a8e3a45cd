use seqid::{AllocatorConfig, IdAllocator, RecordStore, Registrar};

/// Shared handler state, generic over the record store.
///
/// The binary runs on [`seqid::MemoryStore`], which does not survive a
/// restart. A durable deployment supplies a document-database store with a
/// unique index on `customId`.
#[derive(Clone)]
pub struct AppState<S> {
    pub registrar: Registrar<S>,
}

impl<S> AppState<S>
where
    S: RecordStore,
{
    pub fn new(store: S, config: AllocatorConfig) -> Self {
        Self {
            registrar: Registrar::new(IdAllocator::with_config(store, config)),
        }
    }
}
