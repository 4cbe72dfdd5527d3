//! Presence Mask Generation
//!
//! Simulates missing-modality conditions: given `n_modalities` columns,
//! `n_samples` rows and a missing rate per modality, produce a binary
//! matrix (1 = observed, 0 = missing) where column `i` has exactly
//! `floor(n_samples * rate_i)` zeros.
//!
//! Core principles:
//! - Fail fast: arguments and joint feasibility are checked before any draw
//! - Guarantee pass reserves one present slot per row, column by column
//! - Fill pass blanks the requested number of entries per column
//! - One ChaCha8 generator per call; the same seed gives the same mask
//!
//! ```rust
//! use modalmask::mask;
//!
//! let m = mask::generate(3, 10, [0.3, 0.4, 0.5], Some(42)).unwrap();
//! assert_eq!(m.missing_count(0), 3);
//! assert_eq!(m.missing_count(2), 5);
//! assert!(m.rows_without_presence().is_empty());
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{MissingRate, ReservationPolicy};

pub mod generator;
pub mod presence;

pub use generator::MaskGenerator;
pub use presence::PresenceMask;

// ==================== Errors ====================

/// Mask generation failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MaskError {
    #[error("n_modalities must be greater than zero")]
    ZeroModalities,
    #[error("n_samples must be greater than zero")]
    ZeroSamples,
    #[error("expected {expected} missing rates, got {actual}")]
    RateLengthMismatch { expected: usize, actual: usize },
    #[error("missing rate {value} at index {index} is outside [0, 1]")]
    RateOutOfRange { index: usize, value: f64 },
    #[error("missing rates leave {capacity:.3} present slots for {required} samples")]
    Infeasible { capacity: f64, required: f64 },
    #[error("mask of {n_samples} x {n_modalities} cannot hold {len} entries")]
    MaskShapeMismatch {
        n_samples: usize,
        n_modalities: usize,
        len: usize,
    },
    #[error("mask entry {index} is {value}, expected 0 or 1")]
    NonBinaryEntry { index: usize, value: u8 },
}

// ==================== Options ====================

/// Mask generation options
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskOptions {
    /// Number of columns (modalities)
    pub n_modalities: usize,
    /// Number of rows (samples)
    pub n_samples: usize,
    /// Uniform or per-modality missing fraction
    pub missing_rate: MissingRate,
    /// Random seed for reproducibility; time-derived when absent
    pub seed: Option<u64>,
    /// Fill-pass treatment of reserved rows
    pub reservation: ReservationPolicy,
}

impl Default for MaskOptions {
    fn default() -> Self {
        Self {
            n_modalities: 3,
            n_samples: 10,
            missing_rate: MissingRate::default(),
            seed: None,
            reservation: ReservationPolicy::default(),
        }
    }
}

// ==================== Entry Points ====================

/// Generate one presence mask of shape `n_samples x n_modalities`
pub fn generate(
    n_modalities: usize,
    n_samples: usize,
    missing_rate: impl Into<MissingRate>,
    seed: Option<u64>,
) -> Result<PresenceMask, MaskError> {
    let options = MaskOptions {
        n_modalities,
        n_samples,
        missing_rate: missing_rate.into(),
        seed,
        reservation: ReservationPolicy::default(),
    };
    Ok(MaskGenerator::from_options(&options)?.generate())
}

/// Generate one mask per seed in parallel. `options.seed` is ignored.
pub fn generate_batch(options: &MaskOptions, seeds: &[u64]) -> Result<Vec<PresenceMask>, MaskError> {
    Ok(MaskGenerator::from_options(options)?.generate_batch(seeds))
}
