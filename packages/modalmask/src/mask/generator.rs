//! Two-pass mask allocation.
//!
//! 1. Guarantee pass: modalities in index order each reserve up to
//!    `n_samples - missing_count` rows still lacking a guarantee.
//! 2. Fill pass: modalities in index order blank `missing_count` rows drawn
//!    from their present rows. Under [`ReservationPolicy::Protect`] a column
//!    never blanks the rows it reserved, so every row keeps a present entry.
//!
//! Both passes consume draws from a single `ChaCha8Rng` seeded per call.

use rand::seq::index;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use super::{MaskError, MaskOptions, PresenceMask};
use crate::sanitize::{check_feasibility, missing_counts, validate_rates};
use crate::types::{MissingRate, ReservationPolicy};

/// Validated mask request; generates any number of masks
#[derive(Clone, Debug)]
pub struct MaskGenerator {
    n_modalities: usize,
    n_samples: usize,
    rates: Vec<f64>,
    missing_counts: Vec<usize>,
    seed: Option<u64>,
    reservation: ReservationPolicy,
}

impl MaskGenerator {
    /// Validate arguments and feasibility. No random draw happens here.
    pub fn from_options(options: &MaskOptions) -> Result<Self, MaskError> {
        if options.n_modalities == 0 {
            return Err(MaskError::ZeroModalities);
        }
        if options.n_samples == 0 {
            return Err(MaskError::ZeroSamples);
        }

        let rates = validate_rates(&options.missing_rate, options.n_modalities)?;
        check_feasibility(&rates, options.n_samples)?;
        let missing_counts = missing_counts(&rates, options.n_samples);

        Ok(Self {
            n_modalities: options.n_modalities,
            n_samples: options.n_samples,
            rates,
            missing_counts,
            seed: options.seed,
            reservation: options.reservation,
        })
    }

    pub fn new(
        n_modalities: usize,
        n_samples: usize,
        missing_rate: impl Into<MissingRate>,
    ) -> Result<Self, MaskError> {
        Self::from_options(&MaskOptions {
            n_modalities,
            n_samples,
            missing_rate: missing_rate.into(),
            ..Default::default()
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_reservation(mut self, reservation: ReservationPolicy) -> Self {
        self.reservation = reservation;
        self
    }

    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    /// Zeros each column will hold: `floor(n_samples * rate)`
    pub fn missing_counts(&self) -> &[usize] {
        &self.missing_counts
    }

    pub fn reservation(&self) -> ReservationPolicy {
        self.reservation
    }

    /// Generate with the configured seed, or a time-derived one
    pub fn generate(&self) -> PresenceMask {
        let seed = self.seed.unwrap_or_else(|| {
            // Use system time as default seed
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(42)
        });
        self.generate_with_seed(seed)
    }

    /// One mask per seed, generated in parallel
    pub fn generate_batch(&self, seeds: &[u64]) -> Vec<PresenceMask> {
        seeds
            .par_iter()
            .map(|&seed| self.generate_with_seed(seed))
            .collect()
    }

    pub fn generate_with_seed(&self, seed: u64) -> PresenceMask {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut mask = PresenceMask::full(self.n_samples, self.n_modalities, seed);

        let reserved_by = self.reserve_rows(&mut rng);
        self.fill_missing(&mut rng, &mut mask, &reserved_by);

        if self.reservation == ReservationPolicy::Legacy {
            let empty = mask.rows_without_presence();
            if !empty.is_empty() {
                tracing::warn!(
                    seed,
                    rows = empty.len(),
                    "legacy reservation left rows without any present modality"
                );
            }
        }

        tracing::debug!(
            seed,
            n_samples = self.n_samples,
            n_modalities = self.n_modalities,
            missing = ?self.missing_counts,
            "generated presence mask"
        );
        mask
    }

    /// Guarantee pass: column that reserved each row, if any
    fn reserve_rows(&self, rng: &mut ChaCha8Rng) -> Vec<Option<usize>> {
        let mut reserved_by = vec![None; self.n_samples];
        let mut remaining: Vec<usize> = (0..self.n_samples).collect();

        for (col, &missing) in self.missing_counts.iter().enumerate() {
            if remaining.is_empty() {
                break;
            }

            let present = self.n_samples - missing;
            let amount = present.min(remaining.len());
            if amount == 0 {
                continue;
            }

            let mut picked = vec![false; remaining.len()];
            for pos in index::sample(&mut *rng, remaining.len(), amount).iter() {
                picked[pos] = true;
                reserved_by[remaining[pos]] = Some(col);
            }

            remaining = remaining
                .into_iter()
                .zip(picked)
                .filter(|&(_, taken)| !taken)
                .map(|(row, _)| row)
                .collect();
        }

        reserved_by
    }

    /// Fill pass: blank `missing_count` present rows per column
    fn fill_missing(
        &self,
        rng: &mut ChaCha8Rng,
        mask: &mut PresenceMask,
        reserved_by: &[Option<usize>],
    ) {
        for (col, &missing) in self.missing_counts.iter().enumerate() {
            if missing == 0 {
                continue;
            }

            let candidates: Vec<usize> = (0..self.n_samples)
                .filter(|&row| mask.is_present(row, col))
                .filter(|&row| match self.reservation {
                    ReservationPolicy::Protect => reserved_by[row] != Some(col),
                    ReservationPolicy::Legacy => true,
                })
                .collect();

            // present >= reserved, so candidates always cover `missing`
            let amount = missing.min(candidates.len());
            for pos in index::sample(&mut *rng, candidates.len(), amount).iter() {
                mask.set(candidates[pos], col, 0);
            }
        }
    }
}
