//! Modality Tags
//!
//! A [`Modality`] is a set of data modalities packed into a 64-bit value:
//! every atomic modality owns one bit, combinations are bitwise unions, and
//! the zero value is the reserved "invalid" tag.
//!
//! Tag values carry no names. Names live in a [`ModalityRegistry`], which
//! parses text into tags, renders tags back into canonical text and accepts
//! new atomic modalities or named combinations at runtime.
//!
//! ```rust
//! use modalmask::{Modality, ModalityRegistry};
//!
//! let mut registry = ModalityRegistry::new();
//! let video = registry.register_atomic("video").unwrap();
//! let tag = registry.parse("Text_Video");
//!
//! assert_eq!(tag, video | Modality::TEXT);
//! assert_eq!(registry.render(tag), "TEXT_VIDEO");
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{BitOr, BitOrAssign};

pub mod registry;

pub use registry::{ModalityRegistry, SharedRegistry};

// ==================== Errors ====================

/// Registry failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModalityError {
    #[error("a name is required to register a new atomic modality")]
    MissingName,
    #[error("invalid modality name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },
    #[error("combination carries bits {bits:#x} not owned by any registered modality")]
    UnknownBits { bits: u64 },
    #[error("all 64 modality bits are already allocated")]
    CapacityExhausted,
}

// ==================== Tag Value ====================

/// Bitwise set of modalities
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Modality(u64);

impl Modality {
    /// No modality; renders as `INVALID`
    pub const INVALID: Modality = Modality(0);
    pub const IMAGE: Modality = Modality(1);
    pub const TEXT: Modality = Modality(1 << 1);
    pub const AUDIO: Modality = Modality(1 << 2);
    pub const MULTIMODAL: Modality = Modality(1 << 3);

    pub(crate) const fn from_bits(bits: u64) -> Self {
        Modality(bits)
    }

    /// Raw bit value
    pub const fn bits(self) -> u64 {
        self.0
    }

    pub const fn is_invalid(self) -> bool {
        self.0 == 0
    }

    /// Single-bit tag
    pub const fn is_atomic(self) -> bool {
        self.0.is_power_of_two()
    }

    /// Bitwise union. Total and commutative; `INVALID` is the identity.
    pub const fn combine(self, other: Modality) -> Modality {
        Modality(self.0 | other.0)
    }

    /// True when every bit of `other` is also set in `self`
    pub const fn contains(self, other: Modality) -> bool {
        self.0 & other.0 == other.0
    }

    /// Number of atomic modalities in the set
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Single-bit tags making up this set, lowest bit first
    pub fn atoms(self) -> impl Iterator<Item = Modality> {
        let bits = self.0;
        (0..u64::BITS)
            .map(|shift| 1u64 << shift)
            .filter(move |bit| bits & bit != 0)
            .map(Modality)
    }
}

impl BitOr for Modality {
    type Output = Modality;

    fn bitor(self, rhs: Modality) -> Modality {
        self.combine(rhs)
    }
}

impl BitOrAssign for Modality {
    fn bitor_assign(&mut self, rhs: Modality) {
        self.0 |= rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_values_are_distinct_powers_of_two() {
        let base = [Modality::IMAGE, Modality::TEXT, Modality::AUDIO, Modality::MULTIMODAL];
        for (i, tag) in base.iter().enumerate() {
            assert!(tag.is_atomic());
            assert_eq!(tag.bits(), 1 << i);
        }
        assert!(!Modality::INVALID.is_atomic());
    }

    #[test]
    fn test_combine_is_commutative_with_invalid_identity() {
        let a = Modality::IMAGE | Modality::TEXT;
        let b = Modality::TEXT | Modality::IMAGE;
        assert_eq!(a, b);
        assert_eq!(a.combine(Modality::INVALID), a);
        assert_eq!(Modality::INVALID | Modality::INVALID, Modality::INVALID);
    }

    #[test]
    fn test_contains_and_atoms() {
        let tag = Modality::IMAGE | Modality::AUDIO;
        assert!(tag.contains(Modality::IMAGE));
        assert!(tag.contains(Modality::INVALID));
        assert!(!tag.contains(Modality::TEXT));
        assert_eq!(tag.count(), 2);

        let atoms: Vec<Modality> = tag.atoms().collect();
        assert_eq!(atoms, vec![Modality::IMAGE, Modality::AUDIO]);
    }

    #[test]
    fn test_bitor_assign_accumulates() {
        let mut tag = Modality::INVALID;
        tag |= Modality::TEXT;
        tag |= Modality::MULTIMODAL;
        assert_eq!(tag.bits(), 0b1010);
    }

    #[test]
    fn test_serializes_as_integer() {
        let tag = Modality::IMAGE | Modality::TEXT;
        assert_eq!(serde_json::to_string(&tag).unwrap(), "3");
        let back: Modality = serde_json::from_str("3").unwrap();
        assert_eq!(back, tag);
    }
}
