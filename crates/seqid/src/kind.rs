use crate::{Error, Result};
use core::{fmt, str::FromStr};

/// Separator between a prefix and its numeric suffix.
pub const SEPARATOR: char = '-';

/// Static ID layout for one entity kind.
///
/// Every [`EntityKind`] has exactly one `IdConfig`, fixed at compile time.
/// Prefixes and collection names are unique across the table so that prefix
/// scans never match records of another kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdConfig {
    /// The entity kind this layout belongs to.
    pub kind: EntityKind,
    /// Document collection holding records of this kind.
    pub collection: &'static str,
    /// Short uppercase code, e.g. `EST`.
    pub prefix: &'static str,
    /// Minimum digit width of the numeric suffix.
    pub padding: usize,
    /// First number issued when the collection holds no formatted IDs.
    pub start_number: u64,
}

impl IdConfig {
    /// Formats `number` as `<prefix>-<number zero-padded to padding>`.
    ///
    /// Numbers wider than the padding are not truncated: with a padding of 4,
    /// `10000` formats as `EST-10000`.
    ///
    /// # Example
    ///
    /// ```
    /// use seqid::EntityKind;
    ///
    /// let config = EntityKind::Establishment.config();
    /// assert_eq!(config.format(7), "EST-0007");
    /// assert_eq!(config.format(10_000), "EST-10000");
    /// ```
    #[must_use]
    pub fn format(&self, number: u64) -> String {
        format!(
            "{}{SEPARATOR}{number:0width$}",
            self.prefix,
            width = self.padding
        )
    }

    /// The pattern every formatted ID of this kind starts with (`EST-`).
    #[must_use]
    pub fn scan_prefix(&self) -> String {
        format!("{}{SEPARATOR}", self.prefix)
    }

    /// Largest number that still fits the padding width (`9999` for a padding
    /// of 4).
    #[must_use]
    pub fn capacity(&self) -> u64 {
        u32::try_from(self.padding)
            .ok()
            .and_then(|width| 10_u64.checked_pow(width))
            .map_or(u64::MAX, |ceiling| ceiling - 1)
    }
}

/// The business records that receive sequential, human-readable IDs.
///
/// The string key of each kind (see [`EntityKind::key`]) matches the name used
/// by entity-creation workflows, so untyped callers can resolve it with
/// [`EntityKind::lookup`] or [`str::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Establishment,
    User,
    Order,
    MenuItem,
    Table,
    Inventory,
    Reservation,
    Payment,
    Room,
    HousekeepingTask,
    MaintenanceRequest,
    Subscription,
}

static ESTABLISHMENT: IdConfig = IdConfig {
    kind: EntityKind::Establishment,
    collection: "establishments",
    prefix: "EST",
    padding: 4,
    start_number: 1,
};
static USER: IdConfig = IdConfig {
    kind: EntityKind::User,
    collection: "users",
    prefix: "USR",
    padding: 4,
    start_number: 1,
};
static ORDER: IdConfig = IdConfig {
    kind: EntityKind::Order,
    collection: "orders",
    prefix: "ORD",
    padding: 6,
    start_number: 1,
};
static MENU_ITEM: IdConfig = IdConfig {
    kind: EntityKind::MenuItem,
    collection: "menu_items",
    prefix: "MENU",
    padding: 4,
    start_number: 1,
};
static TABLE: IdConfig = IdConfig {
    kind: EntityKind::Table,
    collection: "tables",
    prefix: "TBL",
    padding: 3,
    start_number: 1,
};
static INVENTORY: IdConfig = IdConfig {
    kind: EntityKind::Inventory,
    collection: "inventory",
    prefix: "INV",
    padding: 4,
    start_number: 1,
};
static RESERVATION: IdConfig = IdConfig {
    kind: EntityKind::Reservation,
    collection: "reservations",
    prefix: "RES",
    padding: 6,
    start_number: 1,
};
static PAYMENT: IdConfig = IdConfig {
    kind: EntityKind::Payment,
    collection: "payments",
    prefix: "PAY",
    padding: 6,
    start_number: 1,
};
static ROOM: IdConfig = IdConfig {
    kind: EntityKind::Room,
    collection: "rooms",
    prefix: "ROOM",
    padding: 4,
    start_number: 1,
};
static HOUSEKEEPING_TASK: IdConfig = IdConfig {
    kind: EntityKind::HousekeepingTask,
    collection: "housekeeping_tasks",
    prefix: "HKP",
    padding: 5,
    start_number: 1,
};
static MAINTENANCE_REQUEST: IdConfig = IdConfig {
    kind: EntityKind::MaintenanceRequest,
    collection: "maintenance_requests",
    prefix: "MNT",
    padding: 5,
    start_number: 1,
};
static SUBSCRIPTION: IdConfig = IdConfig {
    kind: EntityKind::Subscription,
    collection: "subscriptions",
    prefix: "SUB",
    padding: 5,
    start_number: 1,
};

impl EntityKind {
    /// Every entity kind, in declaration order.
    pub const ALL: [Self; 12] = [
        Self::Establishment,
        Self::User,
        Self::Order,
        Self::MenuItem,
        Self::Table,
        Self::Inventory,
        Self::Reservation,
        Self::Payment,
        Self::Room,
        Self::HousekeepingTask,
        Self::MaintenanceRequest,
        Self::Subscription,
    ];

    /// Returns the ID layout for this kind.
    #[must_use]
    pub fn config(self) -> &'static IdConfig {
        match self {
            Self::Establishment => &ESTABLISHMENT,
            Self::User => &USER,
            Self::Order => &ORDER,
            Self::MenuItem => &MENU_ITEM,
            Self::Table => &TABLE,
            Self::Inventory => &INVENTORY,
            Self::Reservation => &RESERVATION,
            Self::Payment => &PAYMENT,
            Self::Room => &ROOM,
            Self::HousekeepingTask => &HOUSEKEEPING_TASK,
            Self::MaintenanceRequest => &MAINTENANCE_REQUEST,
            Self::Subscription => &SUBSCRIPTION,
        }
    }

    /// The string key used by untyped callers; equal to the collection name.
    #[must_use]
    pub fn key(self) -> &'static str {
        self.config().collection
    }

    /// Resolves a string key. Absence is a value, not an error.
    ///
    /// ```
    /// use seqid::EntityKind;
    ///
    /// assert_eq!(EntityKind::lookup("orders"), Some(EntityKind::Order));
    /// assert_eq!(EntityKind::lookup("spaceships"), None);
    /// ```
    #[must_use]
    pub fn lookup(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    /// Resolves a prefix (`EST`) back to its kind.
    #[must_use]
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.config().prefix == prefix)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    /// Fails with [`Error::Configuration`] for unknown keys.
    fn from_str(s: &str) -> Result<Self> {
        Self::lookup(s).ok_or_else(|| Error::Configuration {
            entity_type: s.to_owned(),
        })
    }
}
