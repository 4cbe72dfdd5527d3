use serde::{Deserialize, Serialize};

use super::MaskError;

/// Binary presence matrix, row-major: rows are samples, columns are
/// modalities, 1 = observed and 0 = missing.
///
/// Deserialization checks the shape against `data` and rejects any
/// entry other than 0 or 1.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPresenceMask")]
pub struct PresenceMask {
    n_samples: usize,
    n_modalities: usize,
    /// Seed the mask was drawn with
    seed: u64,
    data: Vec<u8>,
}

/// Unchecked wire form of [`PresenceMask`]
#[derive(Deserialize)]
struct RawPresenceMask {
    n_samples: usize,
    n_modalities: usize,
    seed: u64,
    data: Vec<u8>,
}

impl TryFrom<RawPresenceMask> for PresenceMask {
    type Error = MaskError;

    fn try_from(raw: RawPresenceMask) -> Result<Self, Self::Error> {
        let fits = raw
            .n_samples
            .checked_mul(raw.n_modalities)
            .is_some_and(|expected| expected == raw.data.len());
        if !fits {
            return Err(MaskError::MaskShapeMismatch {
                n_samples: raw.n_samples,
                n_modalities: raw.n_modalities,
                len: raw.data.len(),
            });
        }
        if let Some((index, &value)) = raw.data.iter().enumerate().find(|&(_, &v)| v > 1) {
            return Err(MaskError::NonBinaryEntry { index, value });
        }

        Ok(Self {
            n_samples: raw.n_samples,
            n_modalities: raw.n_modalities,
            seed: raw.seed,
            data: raw.data,
        })
    }
}

impl PresenceMask {
    /// Every entry present
    pub(crate) fn full(n_samples: usize, n_modalities: usize, seed: u64) -> Self {
        Self {
            n_samples,
            n_modalities,
            seed,
            data: vec![1; n_samples * n_modalities],
        }
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, value: u8) {
        self.data[row * self.n_modalities + col] = value;
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn n_modalities(&self) -> usize {
        self.n_modalities
    }

    /// `(n_samples, n_modalities)`
    pub fn shape(&self) -> (usize, usize) {
        (self.n_samples, self.n_modalities)
    }

    /// Seed that reproduces this mask
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.n_samples || col >= self.n_modalities {
            return None;
        }
        self.data.get(row * self.n_modalities + col).copied()
    }

    pub fn is_present(&self, row: usize, col: usize) -> bool {
        self.get(row, col) == Some(1)
    }

    pub fn row(&self, row: usize) -> Option<&[u8]> {
        if row >= self.n_samples {
            return None;
        }
        let start = row * self.n_modalities;
        self.data.get(start..start + self.n_modalities)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks_exact(self.n_modalities.max(1))
    }

    pub fn column(&self, col: usize) -> Vec<u8> {
        self.rows().filter_map(|row| row.get(col).copied()).collect()
    }

    /// Number of zeros in column `col`
    pub fn missing_count(&self, col: usize) -> usize {
        self.rows()
            .filter(|row| row.get(col).copied() == Some(0))
            .count()
    }

    /// Realized missing fraction of column `col`
    pub fn missing_fraction(&self, col: usize) -> f64 {
        if self.n_samples == 0 {
            return 0.0;
        }
        self.missing_count(col) as f64 / self.n_samples as f64
    }

    /// Indices of rows with no present modality
    pub fn rows_without_presence(&self) -> Vec<usize> {
        self.rows()
            .enumerate()
            .filter(|(_, row)| row.iter().all(|&v| v == 0))
            .map(|(i, _)| i)
            .collect()
    }

    /// Flat row-major view
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Nested `Vec` per row
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.rows().map(|row| row.to_vec()).collect()
    }
}
