use std::fmt;

use crate::Node;

const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const PRIME: u64 = 0x0000_0100_0000_01b3;
const PAIR_SEPARATOR: u8 = 0x1e;

/// Compute the FNV-1a hash of the provided bytes.
///
/// ```
/// # use twindiff_core::fnv1a;
/// assert_eq!(fnv1a(b"diff"), fnv1a(b"diff"));
/// assert_ne!(fnv1a(b"left"), fnv1a(b"right"));
/// ```
#[must_use]
pub fn fnv1a(input: &[u8]) -> u64 {
    extend(OFFSET_BASIS, input)
}

fn extend(mut hash: u64, input: &[u8]) -> u64 {
    for byte in input {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

/// Identity of a `(before, after)` document pair.
///
/// Two comparisons share a key exactly when both documents serialize to the
/// same canonical JSON text, so the key survives re-parsing of unchanged
/// input but changes as soon as either side is edited.
///
/// ```
/// # use twindiff_core::{ComparisonKey, Node};
/// let a = Node::from_json_str("{\"b\":1,\"a\":2}")?;
/// let b = Node::from_json_str("{\"a\":2,\"b\":1}")?;
/// let c = Node::from_json_str("{\"a\":3}")?;
/// assert_eq!(ComparisonKey::of(&a, &c), ComparisonKey::of(&b, &c));
/// assert_ne!(ComparisonKey::of(&a, &c), ComparisonKey::of(&c, &a));
/// # Ok::<(), twindiff_core::CanonicalizeError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComparisonKey(u64);

impl ComparisonKey {
    /// Derives the key for a document pair.
    #[must_use]
    pub fn of(before: &Node, after: &Node) -> Self {
        let mut hash = extend(OFFSET_BASIS, before.canonical_json().as_bytes());
        hash = extend(hash, &[PAIR_SEPARATOR]);
        hash = extend(hash, after.canonical_json().as_bytes());
        Self(hash)
    }

    /// Returns the raw 64-bit value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ComparisonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
