use crate::mask::MaskError;
use crate::types::{MissingRate, FEASIBILITY_EPSILON};

/// First rate outside [0, 1], NaN and infinities included
pub fn find_out_of_range(rates: &[f64]) -> Option<(usize, f64)> {
    rates
        .iter()
        .copied()
        .enumerate()
        .find(|&(_, rate)| !(0.0..=1.0).contains(&rate))
}

/// Expand a missing-rate input to one rate per modality and validate it
pub fn validate_rates(rate: &MissingRate, n_modalities: usize) -> Result<Vec<f64>, MaskError> {
    let rates = rate.expand(n_modalities);

    if rates.len() != n_modalities {
        return Err(MaskError::RateLengthMismatch {
            expected: n_modalities,
            actual: rates.len(),
        });
    }

    if let Some((index, value)) = find_out_of_range(&rates) {
        return Err(MaskError::RateOutOfRange { index, value });
    }

    Ok(rates)
}

/// `floor(n_samples * rate)` per modality
pub fn missing_counts(rates: &[f64], n_samples: usize) -> Vec<usize> {
    rates
        .iter()
        .map(|&rate| ((n_samples as f64) * rate).floor() as usize)
        .map(|count| count.min(n_samples))
        .collect()
}

/// Total expected present slots: `sum(n_samples * (1 - rate))`
pub fn present_capacity(rates: &[f64], n_samples: usize) -> f64 {
    rates
        .iter()
        .map(|&rate| n_samples as f64 * (1.0 - rate))
        .sum()
}

/// Fail unless the rates leave room for one present slot per sample
pub fn check_feasibility(rates: &[f64], n_samples: usize) -> Result<(), MaskError> {
    let capacity = present_capacity(rates, n_samples);
    let required = n_samples as f64;

    // 容差吸收 n * (1 - r) 的浮点误差
    if capacity + FEASIBILITY_EPSILON * required < required {
        return Err(MaskError::Infeasible { capacity, required });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_out_of_range() {
        assert_eq!(find_out_of_range(&[0.0, 0.5, 1.0]), None);
        assert_eq!(find_out_of_range(&[0.0, 1.5]), Some((1, 1.5)));
        assert_eq!(find_out_of_range(&[-0.1]), Some((0, -0.1)));
        assert!(find_out_of_range(&[0.2, f64::NAN]).is_some());
        assert_eq!(find_out_of_range(&[f64::INFINITY]).map(|(i, _)| i), Some(0));
    }

    #[test]
    fn test_validate_rates_length() {
        let rate = MissingRate::from(vec![0.1, 0.2]);
        assert_eq!(
            validate_rates(&rate, 3),
            Err(MaskError::RateLengthMismatch { expected: 3, actual: 2 })
        );
        assert_eq!(validate_rates(&MissingRate::from(0.2), 3), Ok(vec![0.2; 3]));
    }

    #[test]
    fn test_missing_counts_truncate() {
        assert_eq!(missing_counts(&[0.3, 0.4, 0.5], 10), vec![3, 4, 5]);
        assert_eq!(missing_counts(&[0.19, 0.99, 1.0], 10), vec![1, 9, 10]);
        assert_eq!(missing_counts(&[0.5], 3), vec![1]);
    }

    #[test]
    fn test_feasibility() {
        assert!(check_feasibility(&[0.5, 0.5], 10).is_ok());
        assert!(check_feasibility(&[0.7, 0.7, 0.6], 10).is_ok());
        assert!(matches!(
            check_feasibility(&[0.9, 0.9], 10),
            Err(MaskError::Infeasible { .. })
        ));
    }
}
