//! Error types for ID allocation.
//!
//! Three of the variants carry distinct recovery policies:
//!
//! - [`Error::Configuration`] is never recovered locally. It indicates a
//!   deployment or programming defect and bubbles to the caller.
//! - [`Error::PersistenceUnavailable`] is recovered by the allocator, which
//!   switches to the [`FallbackGenerator`](crate::FallbackGenerator).
//! - [`Error::DuplicateAllocation`] is recovered by the
//!   [`Registrar`](crate::Registrar) through bounded retry, and escalates to
//!   [`Error::Conflict`] once the attempts are spent.

use crate::EntityKind;

/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors `seqid` can produce.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The requested entity type has no registered ID configuration.
    #[error("no ID configuration registered for entity type `{entity_type}`")]
    Configuration {
        /// The key that failed to resolve.
        entity_type: String,
    },

    /// The store could not answer the highest-ID scan (fault or timeout).
    #[error("persistence layer unavailable: {reason}")]
    PersistenceUnavailable {
        /// Driver or timeout detail, for operators.
        reason: String,
    },

    /// The store rejected an insert because the `customId` is already taken.
    #[error("`{id}` is already assigned")]
    DuplicateAllocation {
        /// The rejected ID.
        id: String,
    },

    /// Every allocation attempt collided with a concurrent writer.
    #[error("could not allocate a unique {kind} ID after {attempts} attempts")]
    Conflict {
        /// Entity kind being created.
        kind: EntityKind,
        /// Number of attempts made before giving up.
        attempts: usize,
    },

    /// The numeric suffix space of an entity kind is used up.
    #[error("{kind} ID space exhausted")]
    Exhausted {
        /// Entity kind whose suffix would overflow.
        kind: EntityKind,
    },

    /// The input is not a formatted ID of any known entity kind.
    #[error("`{candidate}` is not a formatted ID")]
    Malformed {
        /// The rejected input.
        candidate: String,
    },
}

impl Error {
    /// Message safe to show end users of an entity-creation workflow.
    ///
    /// Internal detail (prefixes, attempt counts, driver faults) stays in the
    /// logs.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Malformed { .. } => "the identifier is not valid",
            _ => "could not complete registration, please try again",
        }
    }
}

/// Errors reported by a [`RecordStore`](crate::RecordStore).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The store could not be reached or the query failed.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A record with the same `customId` already exists in the collection.
    #[error("duplicate customId `{0}`")]
    Duplicate(String),
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(reason) => Self::PersistenceUnavailable { reason },
            StoreError::Duplicate(id) => Self::DuplicateAllocation { id },
        }
    }
}
