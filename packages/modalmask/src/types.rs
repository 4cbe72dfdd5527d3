//! Common Types and Constants
//!
//! Shared data structures used by the modality and mask modules.

use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// Separator between atomic names in a rendered tag
pub const SEPARATOR: char = '_';

/// Name and rendered form of the zero-valued tag
pub const INVALID_NAME: &str = "INVALID";

/// Atomic modalities every registry starts with, in bit order
pub const BASE_MODALITIES: [&str; 4] = ["IMAGE", "TEXT", "AUDIO", "MULTIMODAL"];

/// Relative tolerance for the feasibility comparison (scaled by sample count)
pub const FEASIBILITY_EPSILON: f64 = 1e-9;

// ==================== Mask Inputs ====================

/// Requested missing fraction per modality.
///
/// Deserializes from either a bare number or an array of numbers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MissingRate {
    /// One fraction applied to every modality
    Uniform(f64),
    /// One fraction per modality, in column order
    PerModality(Vec<f64>),
}

impl MissingRate {
    /// Expand into one rate per modality.
    ///
    /// A per-modality vector is returned as-is; its length is checked by
    /// [`crate::sanitize::validate_rates`].
    pub fn expand(&self, n_modalities: usize) -> Vec<f64> {
        match self {
            MissingRate::Uniform(rate) => vec![*rate; n_modalities],
            MissingRate::PerModality(rates) => rates.clone(),
        }
    }
}

impl Default for MissingRate {
    fn default() -> Self {
        MissingRate::Uniform(0.0)
    }
}

impl From<f64> for MissingRate {
    fn from(rate: f64) -> Self {
        MissingRate::Uniform(rate)
    }
}

impl From<Vec<f64>> for MissingRate {
    fn from(rates: Vec<f64>) -> Self {
        MissingRate::PerModality(rates)
    }
}

impl From<&[f64]> for MissingRate {
    fn from(rates: &[f64]) -> Self {
        MissingRate::PerModality(rates.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for MissingRate {
    fn from(rates: [f64; N]) -> Self {
        MissingRate::PerModality(rates.to_vec())
    }
}

/// How the missing-fill pass treats rows reserved by the guarantee pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationPolicy {
    /// A row reserved through column `i` is never blanked in column `i`.
    /// Every row keeps at least one present modality.
    #[default]
    Protect,
    /// The fill pass draws from every present row of the column, reserved
    /// or not. Rows can end up with no present modality at all.
    Legacy,
}

impl ReservationPolicy {
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "protect" => Some(ReservationPolicy::Protect),
            "legacy" => Some(ReservationPolicy::Legacy),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationPolicy::Protect => "protect",
            ReservationPolicy::Legacy => "legacy",
        }
    }
}
