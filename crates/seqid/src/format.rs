use crate::{EntityKind, Error, IdConfig, Result, SEPARATOR};
use core::{fmt, str::FromStr};

/// Extracts the numeric suffix of `custom_id` if it is `<prefix>-<digits>`.
///
/// The prefix match is anchored, case-sensitive and requires the exact
/// separator. Suffixes with anything but ASCII digits, and suffixes too large
/// for a `u64`, yield `None`.
///
/// ```
/// use seqid::parse_suffix;
///
/// assert_eq!(parse_suffix("EST", "EST-0003"), Some(3));
/// assert_eq!(parse_suffix("EST", "EST-abc"), None);
/// assert_eq!(parse_suffix("EST", "est-0003"), None);
/// ```
#[must_use]
pub fn parse_suffix(prefix: &str, custom_id: &str) -> Option<u64> {
    let digits = custom_id
        .strip_prefix(prefix)?
        .strip_prefix(SEPARATOR)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

impl IdConfig {
    /// Returns `true` iff `candidate` is `^<prefix>-\d{padding}$` exactly.
    ///
    /// This rejects IDs whose suffix grew past the padding width. See
    /// [`FormattedId`] for a width-agnostic parser.
    #[must_use]
    pub fn is_valid(&self, candidate: &str) -> bool {
        candidate
            .strip_prefix(self.prefix)
            .and_then(|rest| rest.strip_prefix(SEPARATOR))
            .is_some_and(|digits| {
                digits.len() == self.padding && digits.bytes().all(|b| b.is_ascii_digit())
            })
    }
}

/// Pure format check of `candidate` against the layout of `entity_type`.
///
/// Unknown entity types are never valid.
///
/// ```
/// use seqid::is_valid_formatted_id;
///
/// assert!(is_valid_formatted_id("TBL-001", "tables"));
/// assert!(!is_valid_formatted_id("TBL-1000", "tables"));
/// assert!(!is_valid_formatted_id("TBL-001", "spaceships"));
/// ```
#[must_use]
pub fn is_valid_formatted_id(candidate: &str, entity_type: &str) -> bool {
    EntityKind::lookup(entity_type).is_some_and(|kind| kind.config().is_valid(candidate))
}

/// A decomposed formatted ID.
///
/// Parsing accepts suffixes of any width so that IDs issued after a kind
/// outgrew its padding still resolve. Fallback IDs do not parse.
///
/// Only the kind and number are kept. [`Display`](fmt::Display) (and the
/// `serde` representation) renders the canonical padded form, so an
/// under-padded input such as `EST-1` comes back as `EST-0001`. Keep the
/// original string when stored text must be preserved byte for byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormattedId {
    kind: EntityKind,
    number: u64,
}

impl FormattedId {
    /// Creates an ID from its parts.
    #[must_use]
    pub const fn new(kind: EntityKind, number: u64) -> Self {
        Self { kind, number }
    }

    /// The entity kind named by the prefix.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// The numeric suffix.
    #[must_use]
    pub const fn number(&self) -> u64 {
        self.number
    }

    /// Parses `<prefix>-<digits>` for any known prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] if the prefix is unknown or the suffix is
    /// not a decimal number.
    pub fn parse(candidate: &str) -> Result<Self> {
        let malformed = || Error::Malformed {
            candidate: candidate.to_owned(),
        };
        let (prefix, _) = candidate.split_once(SEPARATOR).ok_or_else(malformed)?;
        let kind = EntityKind::from_prefix(prefix).ok_or_else(malformed)?;
        let number = parse_suffix(prefix, candidate).ok_or_else(malformed)?;
        Ok(Self { kind, number })
    }
}

impl fmt::Display for FormattedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.kind.config().format(self.number))
    }
}

impl FromStr for FormattedId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
