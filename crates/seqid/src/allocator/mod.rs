use crate::{
    EntityKind, Error, FallbackGenerator, RandSource, RecordStore, Result, SystemClock,
    ThreadRandom, TimeSource, scan_highest,
};
use core::time::Duration;


/// Default bound on a single highest-ID scan.
pub const DEFAULT_SCAN_TIMEOUT: Duration = Duration::from_secs(2);

/// Default number of allocate-and-insert attempts made by a
/// [`Registrar`](crate::Registrar).
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// Tuning for an [`IdAllocator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorConfig {
    /// How long a scan may take before the store is considered unavailable
    /// and the fallback path engages.
    pub scan_timeout: Duration,
    /// Allocation attempts before a duplicate-ID conflict is surfaced.
    pub max_attempts: usize,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            scan_timeout: DEFAULT_SCAN_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Computes the next sequential ID of an entity kind from persisted records.
///
/// The allocator keeps no counter. Every call scans the store for the highest
/// existing suffix and returns `max + 1` (or the kind's start number for an
/// empty collection), formatted with the kind's prefix and padding. Nothing is
/// reserved: the caller must persist a record carrying the ID, and concurrent
/// callers can be handed the same ID. Persist through a
/// [`Registrar`](crate::Registrar) to resolve that race against the store's
/// uniqueness constraint.
///
/// When the scan fails or times out, the allocator degrades to a
/// [`FallbackGenerator`] ID and logs a warning.
///
/// # Example
///
/// ```
/// # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
/// use seqid::{IdAllocator, MemoryStore};
///
/// let store = MemoryStore::new();
/// store.seed("establishments", ["EST-0001", "EST-0002", "EST-0004"]);
///
/// let allocator = IdAllocator::new(store);
/// assert_eq!(allocator.generate_id("establishments").await?, "EST-0005");
/// assert_eq!(allocator.generate_id("tables").await?, "TBL-001");
/// # Ok::<(), seqid::Error>(())
/// # }).unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct IdAllocator<S, T = SystemClock, R = ThreadRandom> {
    store: S,
    fallback: FallbackGenerator<T, R>,
    config: AllocatorConfig,
}

impl<S> IdAllocator<S>
where
    S: RecordStore,
{
    /// Creates an allocator with the default configuration, system clock and
    /// thread-local RNG.
    pub fn new(store: S) -> Self {
        Self::with_config(store, AllocatorConfig::default())
    }

    /// Creates an allocator with a custom configuration.
    pub fn with_config(store: S, config: AllocatorConfig) -> Self {
        Self::from_components(store, config, FallbackGenerator::default())
    }
}

impl<S, T, R> IdAllocator<S, T, R>
where
    S: RecordStore,
    T: TimeSource + Sync,
    R: RandSource<u64> + Sync,
{
    /// Creates an allocator from explicit parts.
    pub fn from_components(
        store: S,
        config: AllocatorConfig,
        fallback: FallbackGenerator<T, R>,
    ) -> Self {
        Self {
            store,
            fallback,
            config,
        }
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The allocator's configuration.
    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// Allocates the next ID for the entity type named by `entity_type`.
    ///
    /// # Errors
    ///
    /// - [`Error::Configuration`] if `entity_type` is not a known key.
    /// - [`Error::Exhausted`] if the next number does not fit a `u64`.
    pub async fn generate_id(&self, entity_type: &str) -> Result<String> {
        self.generate(entity_type.parse()?).await
    }

    /// Allocates the next ID for `kind`.
    ///
    /// Degrades to a non-sequential fallback ID if the store is unreachable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Exhausted`] if the next number does not fit a `u64`.
    #[tracing::instrument(level = "debug", skip_all, fields(kind = %kind))]
    pub async fn generate(&self, kind: EntityKind) -> Result<String> {
        let config = kind.config();
        match self.next_number(kind).await {
            Ok(number) => {
                if number >= config.capacity() {
                    tracing::warn!(
                        kind = %kind,
                        number,
                        padding = config.padding,
                        "ID suffix reached its padding width; widen the layout \
                         before fixed-width validators start rejecting new IDs"
                    );
                }
                Ok(config.format(number))
            }
            Err(Error::PersistenceUnavailable { reason }) => Ok(self.fallback(kind, &reason)),
            Err(err) => Err(err),
        }
    }

    /// Previews the ID the next allocation of `entity_type` would produce.
    ///
    /// # Errors
    ///
    /// Same as [`Self::generate_id`].
    pub async fn peek_next_id(&self, entity_type: &str) -> Result<String> {
        self.peek(entity_type.parse()?).await
    }

    /// Previews the ID the next allocation of `kind` would produce.
    ///
    /// The value is not reserved: another allocation may claim it before the
    /// caller creates its record, so never persist a peeked ID as-is. During
    /// a store outage the preview is fallback-shaped and only logged at
    /// `debug`, since no ID was issued.
    ///
    /// # Errors
    ///
    /// Same as [`Self::generate`].
    pub async fn peek(&self, kind: EntityKind) -> Result<String> {
        match self.next_number(kind).await {
            Ok(number) => Ok(kind.config().format(number)),
            Err(Error::PersistenceUnavailable { reason }) => {
                // Nothing is issued, so the fallback counter stays untouched.
                let id = self.fallback.generate(Some(kind.config().prefix));
                tracing::debug!(
                    kind = %kind,
                    reason,
                    id = %id,
                    "store unavailable, previewing a fallback ID"
                );
                Ok(id)
            }
            Err(err) => Err(err),
        }
    }

    /// Highest numeric suffix currently persisted for `kind`, bounded by the
    /// configured scan timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PersistenceUnavailable`] if the store fails or the scan
    /// times out.
    pub async fn highest_existing(&self, kind: EntityKind) -> Result<Option<u64>> {
        let scan = scan_highest(&self.store, kind.config());
        match tokio::time::timeout(self.config.scan_timeout, scan).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(Error::PersistenceUnavailable {
                reason: format!("scan timed out after {:?}", self.config.scan_timeout),
            }),
        }
    }

    async fn next_number(&self, kind: EntityKind) -> Result<u64> {
        match self.highest_existing(kind).await? {
            None => Ok(kind.config().start_number),
            Some(highest) => highest.checked_add(1).ok_or(Error::Exhausted { kind }),
        }
    }

    fn fallback(&self, kind: EntityKind, reason: &str) -> String {
        let id = self.fallback.generate(Some(kind.config().prefix));
        tracing::warn!(
            monotonic_counter.fallback_ids = 1_u64,
            kind = %kind,
            reason,
            id = %id,
            "store unavailable, issued non-sequential fallback ID"
        );
        id
    }
}
