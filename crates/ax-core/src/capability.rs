//! Capability identifiers, the [`CapabilitySet`] bitset, and [`TypeInfo`].
//!
//! A concrete type declares the capability chain it implements once, in a
//! `static` [`TypeInfo`]. The chain has two equivalent forms: a dotted name
//! (`"one.any.box.seq.array"`) kept for display and name-based queries, and
//! a bitset used for O(1) checks.

use std::fmt;

/// One level of the capability chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Capability {
    /// Base object: a name and a type table.
    One = 0,
    /// Value semantics: free, copy, move.
    Any,
    /// Collection protocol: size, bounds, iteration, clear.
    Box,
    /// Ordered collection.
    Seq,
    /// Keyed collection.
    Map,
    /// FIFO adapter.
    Tube,
    /// Contiguous sequence.
    Array,
    /// Doubly-linked sequence.
    List,
    /// Queue over an arbitrary sequence.
    Queue,
    /// Bucketed hash map.
    Hmap,
    /// Growable byte buffer.
    Buff,
}

impl Capability {
    /// Every capability, in discriminant order.
    pub const ALL: [Capability; 11] = [
        Self::One,
        Self::Any,
        Self::Box,
        Self::Seq,
        Self::Map,
        Self::Tube,
        Self::Array,
        Self::List,
        Self::Queue,
        Self::Hmap,
        Self::Buff,
    ];

    /// The segment this capability contributes to a dotted name chain.
    pub const fn segment(self) -> &'static str {
        match self {
            Self::One => "one",
            Self::Any => "any",
            Self::Box => "box",
            Self::Seq => "seq",
            Self::Map => "map",
            Self::Tube => "tube",
            Self::Array => "array",
            Self::List => "list",
            Self::Queue => "queue",
            Self::Hmap => "hmap",
            Self::Buff => "buff",
        }
    }

    /// Look a capability up by its chain segment.
    pub fn from_segment(segment: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.segment() == segment)
    }

    const fn bit(self) -> u32 {
        1u32 << self as u32
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.segment())
    }
}

/// A set of capabilities implemented as a fixed-width bitset.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CapabilitySet {
    bits: u32,
}

impl CapabilitySet {
    /// Create an empty set.
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Build a set from a slice, usable in `const` context.
    pub const fn from_slice(caps: &[Capability]) -> Self {
        let mut bits = 0u32;
        let mut i = 0;
        while i < caps.len() {
            bits |= caps[i].bit();
            i += 1;
        }
        Self { bits }
    }

    /// Insert a capability into the set.
    pub fn insert(&mut self, cap: Capability) {
        self.bits |= cap.bit();
    }

    /// Check whether the set contains a capability.
    pub const fn contains(&self, cap: Capability) -> bool {
        self.bits & cap.bit() != 0
    }

    /// Return the union of two sets (`self | other`).
    pub const fn union(&self, other: &Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    /// Check whether `self` is a subset of `other`.
    pub const fn is_subset(&self, other: &Self) -> bool {
        self.bits & !other.bits == 0
    }

    /// Returns `true` if the set is empty.
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Number of capabilities in the set.
    pub const fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Iterate over the capabilities in discriminant order.
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL
            .iter()
            .copied()
            .filter(move |cap| self.contains(*cap))
    }
}

impl fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        let mut set = Self::empty();
        for cap in iter {
            set.insert(cap);
        }
        set
    }
}

/// Static per-type record: the name chain and the capability set.
///
/// This is the "trait table" header of every runtime object. There is one
/// `static` instance per concrete type; objects point at it for their whole
/// lifetime and it is never mutated. The operations themselves live in the
/// Rust traits ([`One`](crate::One), [`Any`](crate::Any), ...) that the
/// type implements.
#[derive(Debug, PartialEq, Eq)]
pub struct TypeInfo {
    chain: &'static str,
    caps: CapabilitySet,
}

impl TypeInfo {
    /// Declare a type table.
    ///
    /// `chain` lists the capability segments from the most general to the
    /// most specific, separated by dots, and must name exactly the
    /// capabilities in `caps`.
    pub const fn new(chain: &'static str, caps: &[Capability]) -> Self {
        Self {
            chain,
            caps: CapabilitySet::from_slice(caps),
        }
    }

    /// The full dotted chain, e.g. `"one.any.box.seq.list"`.
    pub fn chain(&self) -> &'static str {
        self.chain
    }

    /// The most specific segment of the chain.
    pub fn name(&self) -> &'static str {
        match self.chain.rfind('.') {
            Some(dot) => &self.chain[dot + 1..],
            None => self.chain,
        }
    }

    /// The declared capabilities.
    pub const fn capabilities(&self) -> CapabilitySet {
        self.caps
    }

    /// O(1) capability check.
    pub const fn is(&self, cap: Capability) -> bool {
        self.caps.contains(cap)
    }

    /// Name-based capability check.
    ///
    /// Walks the chain from the most specific segment towards `one`,
    /// comparing names, and stops at the first match.
    pub fn is_named(&self, name: &str) -> bool {
        self.chain.rsplit('.').any(|segment| segment == name)
    }

    /// Whether this type implements every capability `base` does.
    pub const fn extends(&self, base: &TypeInfo) -> bool {
        base.caps.is_subset(&self.caps)
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.chain)
    }
}
