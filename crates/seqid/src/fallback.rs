use crate::{RandSource, SEPARATOR, SystemClock, ThreadRandom, TimeSource};

/// Prefix used when no entity layout is available at all.
pub const FALLBACK_PREFIX: &str = "ID";

/// Width of the random component of a fallback ID, in base36 digits.
pub const FALLBACK_RANDOM_WIDTH: usize = 6;

const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

// 36^13 > u64::MAX
const MAX_BASE36_DIGITS: usize = 13;

/// Encodes `value` in uppercase base36, left-padded with `0` to at least
/// `width` digits.
///
/// ```
/// use seqid::encode_base36;
///
/// assert_eq!(encode_base36(35, 0), "Z");
/// assert_eq!(encode_base36(36, 4), "0010");
/// assert_eq!(encode_base36(0, 0), "0");
/// ```
#[must_use]
pub fn encode_base36(mut value: u64, width: usize) -> String {
    let mut buf = [b'0'; MAX_BASE36_DIGITS];
    let mut pos = MAX_BASE36_DIGITS;
    loop {
        pos -= 1;
        // `value % 36` is always a valid index into the 36-byte alphabet.
        buf[pos] = ALPHABET[(value % 36) as usize];
        value /= 36;
        if value == 0 {
            break;
        }
    }
    let digits = MAX_BASE36_DIGITS - pos;
    let mut out = String::with_capacity(width.max(digits));
    out.extend(core::iter::repeat_n('0', width.saturating_sub(digits)));
    out.extend(buf[pos..].iter().map(|&b| char::from(b)));
    out
}

/// Degraded-mode ID source used when the store cannot be scanned.
///
/// Produces `<prefix>-<base36 millis>-<base36 random>`, e.g.
/// `EST-MGT2X0K1-04ZQ7B`. These IDs are unique with very high probability but
/// are neither sequential nor reproducible, and they never satisfy the
/// fixed-width `<prefix>-<digits>` format: the second separator guarantees a
/// fallback ID is distinguishable from a sequential one.
#[derive(Clone, Debug, Default)]
pub struct FallbackGenerator<T = SystemClock, R = ThreadRandom> {
    clock: T,
    rng: R,
}

impl<T, R> FallbackGenerator<T, R>
where
    T: TimeSource,
    R: RandSource<u64>,
{
    /// Creates a generator from a clock and a random source.
    pub fn new(clock: T, rng: R) -> Self {
        Self { clock, rng }
    }

    /// Produces a fallback ID under `prefix`, or [`FALLBACK_PREFIX`] when the
    /// entity layout itself is unknown.
    #[must_use]
    pub fn generate(&self, prefix: Option<&str>) -> String {
        let prefix = prefix.unwrap_or(FALLBACK_PREFIX);
        let millis = encode_base36(self.clock.current_millis(), 0);
        let random = encode_base36(
            self.rng.rand() % random_space(),
            FALLBACK_RANDOM_WIDTH,
        );
        format!("{prefix}{SEPARATOR}{millis}{SEPARATOR}{random}")
    }
}

const fn random_space() -> u64 {
    // 36^6 = 2_176_782_336
    let mut space = 1_u64;
    let mut i = 0;
    while i < FALLBACK_RANDOM_WIDTH {
        space *= 36;
        i += 1;
    }
    space
}
