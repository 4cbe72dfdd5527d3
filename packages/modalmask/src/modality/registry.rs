//! Modality Registry
//!
//! Owned name table for [`Modality`] values. Names are unique and
//! case-insensitive (stored upper-cased), entries are never removed.
//!
//! Invariants:
//! - Every atomic entry is a power of two strictly greater than all
//!   previously registered atomic entries.
//! - Combination entries are unions of registered atomic bits.
//! - Registering an existing name returns the existing tag.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};

use super::{Modality, ModalityError};
use crate::types::{BASE_MODALITIES, INVALID_NAME, SEPARATOR};

#[derive(Clone, Debug)]
struct Entry {
    name: String,
    tag: Modality,
    atomic: bool,
}

/// Name table for modality tags
#[derive(Clone, Debug)]
pub struct ModalityRegistry {
    /// Entries in registration order
    entries: Vec<Entry>,
    /// Upper-cased name -> index into `entries`
    index: HashMap<String, usize>,
    /// Union of every atomic bit
    atomic_bits: u64,
}

impl ModalityRegistry {
    /// Registry holding `INVALID` plus the base modalities
    /// (`IMAGE`, `TEXT`, `AUDIO`, `MULTIMODAL`)
    pub fn new() -> Self {
        let mut registry = Self {
            entries: Vec::new(),
            index: HashMap::new(),
            atomic_bits: 0,
        };
        registry.insert(INVALID_NAME.to_string(), Modality::INVALID, false);
        for (shift, name) in BASE_MODALITIES.iter().enumerate() {
            registry.insert(name.to_string(), Modality::from_bits(1 << shift), true);
        }
        registry
    }

    fn insert(&mut self, name: String, tag: Modality, atomic: bool) {
        if atomic {
            self.atomic_bits |= tag.bits();
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push(Entry { name, tag, atomic });
    }

    fn normalize(name: &str) -> Result<String, ModalityError> {
        let key = name.trim().to_uppercase();
        if key.is_empty() {
            return Err(ModalityError::InvalidName {
                name: name.to_string(),
                reason: "name is empty",
            });
        }
        Ok(key)
    }

    fn get(&self, key: &str) -> Option<Modality> {
        self.index.get(key).map(|&i| self.entries[i].tag)
    }

    // ==================== Lookup ====================

    /// Tag registered under `name` (case-insensitive)
    pub fn lookup(&self, name: &str) -> Option<Modality> {
        self.get(&name.trim().to_uppercase())
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Membership check: every bit of `tag` belongs to a registered atomic
    /// modality. `INVALID` always belongs.
    pub fn contains(&self, tag: Modality) -> bool {
        tag.bits() & !self.atomic_bits == 0
    }

    /// First name registered with exactly this value
    pub fn name_of(&self, tag: Modality) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.tag == tag)
            .map(|entry| entry.name.as_str())
    }

    /// Atomic modalities in bit order
    pub fn atomics(&self) -> impl Iterator<Item = (&str, Modality)> {
        self.entries
            .iter()
            .filter(|entry| entry.atomic)
            .map(|entry| (entry.name.as_str(), entry.tag))
    }

    /// All registered names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ==================== Text Conversion ====================

    /// Parse `_`-separated names into a tag.
    ///
    /// Segments are looked up case-insensitively and unioned, so
    /// `"text_image"` equals `IMAGE | TEXT`. When a segment is unknown the
    /// whole text is tried as a registered name (aliases such as
    /// `SUPER_COMBO`). Anything else yields [`Modality::INVALID`].
    pub fn parse(&self, text: &str) -> Modality {
        let upper = text.trim().to_uppercase();

        let mut tag = Modality::INVALID;
        for segment in upper.split(SEPARATOR) {
            match self.get(segment) {
                Some(found) => tag |= found,
                None => return self.get(&upper).unwrap_or(Modality::INVALID),
            }
        }
        tag
    }

    /// Canonical text: sorted, `_`-joined names of the atomic modalities
    /// set in `tag`. Bits no atomic entry owns are ignored; a tag with no
    /// known bit renders as `INVALID`.
    pub fn render(&self, tag: Modality) -> String {
        let tokens: BTreeSet<&str> = self
            .atomics()
            .filter(|(_, atom)| tag.contains(*atom))
            .map(|(name, _)| name)
            .collect();

        if tokens.is_empty() {
            return INVALID_NAME.to_string();
        }
        tokens.into_iter().collect::<Vec<_>>().join("_")
    }

    // ==================== Registration ====================

    /// Register a modality.
    ///
    /// - `combination` absent: allocate a new atomic bit for `name` (required).
    /// - `combination` present: register `name` as an alias for it; without a
    ///   name the canonical rendering of the combination is used.
    ///
    /// An existing name returns its existing tag.
    pub fn register(
        &mut self,
        name: Option<&str>,
        combination: Option<Modality>,
    ) -> Result<Modality, ModalityError> {
        match (name, combination) {
            (None, None) => Err(ModalityError::MissingName),
            (Some(name), None) => self.register_atomic(name),
            (name, Some(combination)) => self.register_combination(name, combination),
        }
    }

    /// Allocate the next free bit for `name`
    pub fn register_atomic(&mut self, name: &str) -> Result<Modality, ModalityError> {
        let key = Self::normalize(name)?;
        if let Some(existing) = self.get(&key) {
            tracing::debug!(name = %key, bits = existing.bits(), "modality already registered");
            return Ok(existing);
        }
        if key.contains(SEPARATOR) {
            return Err(ModalityError::InvalidName {
                name: name.to_string(),
                reason: "atomic names cannot contain '_'",
            });
        }

        let bit = match self.atomic_bits {
            0 => 1,
            bits => {
                let highest = u64::BITS - 1 - bits.leading_zeros();
                if highest + 1 >= u64::BITS {
                    return Err(ModalityError::CapacityExhausted);
                }
                1u64 << (highest + 1)
            }
        };

        let tag = Modality::from_bits(bit);
        tracing::debug!(name = %key, bits = bit, "registered atomic modality");
        self.insert(key, tag, true);
        Ok(tag)
    }

    /// Name a union of registered modalities
    pub fn register_combination(
        &mut self,
        name: Option<&str>,
        combination: Modality,
    ) -> Result<Modality, ModalityError> {
        let key = match name {
            Some(name) => Some(Self::normalize(name)?),
            None => None,
        };

        if let Some(existing) = key.as_deref().and_then(|key| self.get(key)) {
            if existing != combination {
                tracing::warn!(
                    name = ?key,
                    existing = existing.bits(),
                    requested = combination.bits(),
                    "name already registered with a different value; keeping existing"
                );
            }
            return Ok(existing);
        }

        if !self.contains(combination) {
            return Err(ModalityError::UnknownBits {
                bits: combination.bits() & !self.atomic_bits,
            });
        }

        let key = key.unwrap_or_else(|| self.render(combination));
        if let Some(existing) = self.get(&key) {
            return Ok(existing);
        }

        tracing::debug!(name = %key, bits = combination.bits(), "registered modality combination");
        self.insert(key, combination, false);
        Ok(combination)
    }
}

impl Default for ModalityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ==================== Shared Handle ====================

/// Cloneable, lock-guarded registry handle.
///
/// Registrations take the write lock; lookups, parsing and rendering take
/// the read lock.
#[derive(Clone, Debug, Default)]
pub struct SharedRegistry {
    inner: Arc<RwLock<ModalityRegistry>>,
}

impl SharedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_registry(registry: ModalityRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    pub fn parse(&self, text: &str) -> Modality {
        self.inner.read().parse(text)
    }

    pub fn render(&self, tag: Modality) -> String {
        self.inner.read().render(tag)
    }

    pub fn lookup(&self, name: &str) -> Option<Modality> {
        self.inner.read().lookup(name)
    }

    pub fn contains(&self, tag: Modality) -> bool {
        self.inner.read().contains(tag)
    }

    pub fn register(
        &self,
        name: Option<&str>,
        combination: Option<Modality>,
    ) -> Result<Modality, ModalityError> {
        self.inner.write().register(name, combination)
    }

    /// Read guard for several lookups under one lock
    pub fn read(&self) -> RwLockReadGuard<'_, ModalityRegistry> {
        self.inner.read()
    }

    /// Owned copy of the current registry
    pub fn snapshot(&self) -> ModalityRegistry {
        self.inner.read().clone()
    }
}
