//! Property-Based Tests for Presence Mask Generation
//!
//! Tests the following invariants:
//! - Determinism: same arguments and seed give bit-identical masks
//! - Column counts: column i holds exactly floor(n_samples * rate_i) zeros
//! - Row guarantee: every row keeps at least one present modality (protect policy)
//! - Fail fast: infeasible rate vectors are rejected

use proptest::prelude::*;

use modalmask::{
    generate, generate_batch, MaskError, MaskGenerator, MaskOptions, MissingRate,
    ReservationPolicy,
};

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_rate() -> impl Strategy<Value = f64> {
    (0u32..=100u32).prop_map(|v| v as f64 / 100.0)
}

/// Feasible (n_modalities, n_samples, rates) triples
fn arb_feasible_request() -> impl Strategy<Value = (usize, usize, Vec<f64>)> {
    (1usize..=6, 1usize..=80)
        .prop_flat_map(|(n_modalities, n_samples)| {
            (
                Just(n_modalities),
                Just(n_samples),
                proptest::collection::vec(arb_rate(), n_modalities),
            )
        })
        .prop_filter("rates must be jointly feasible", |(_, n_samples, rates)| {
            let capacity: f64 = rates.iter().map(|r| *n_samples as f64 * (1.0 - r)).sum();
            capacity >= *n_samples as f64
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn same_seed_is_bit_identical((n, m, rates) in arb_feasible_request(), seed in any::<u64>()) {
        let a = generate(n, m, rates.clone(), Some(seed)).unwrap();
        let b = generate(n, m, rates, Some(seed)).unwrap();
        prop_assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn column_counts_are_floored((n, m, rates) in arb_feasible_request(), seed in any::<u64>()) {
        let mask = generate(n, m, rates.clone(), Some(seed)).unwrap();
        prop_assert_eq!(mask.shape(), (m, n));
        for (col, rate) in rates.iter().enumerate() {
            let expected = (m as f64 * rate).floor() as usize;
            prop_assert_eq!(mask.missing_count(col), expected);
        }
    }

    #[test]
    fn every_row_keeps_a_modality((n, m, rates) in arb_feasible_request(), seed in any::<u64>()) {
        let mask = generate(n, m, rates, Some(seed)).unwrap();
        prop_assert!(mask.rows_without_presence().is_empty());
    }

    #[test]
    fn entries_are_binary((n, m, rates) in arb_feasible_request(), seed in any::<u64>()) {
        let mask = generate(n, m, rates, Some(seed)).unwrap();
        prop_assert!(mask.as_slice().iter().all(|&v| v == 0 || v == 1));
    }
}

#[test]
fn test_infeasible_example_fails() {
    let err = generate(2, 10, vec![0.9, 0.9], Some(0)).unwrap_err();
    assert!(matches!(err, MaskError::Infeasible { .. }));
}

#[test]
fn test_column_counts_example() {
    let mask = generate(3, 10, vec![0.3, 0.4, 0.5], Some(42)).unwrap();
    assert_eq!(mask.missing_count(0), 3);
    assert_eq!(mask.missing_count(1), 4);
    assert_eq!(mask.missing_count(2), 5);
}

#[test]
fn test_rate_vector_must_match_modalities() {
    assert_eq!(
        generate(2, 10, vec![0.1, 0.1, 0.1], None).unwrap_err(),
        MaskError::RateLengthMismatch { expected: 2, actual: 3 }
    );
}

/// Regression pin for the reservation policy: the protect policy never
/// blanks a row's only reserved modality, while the legacy policy can.
#[test]
fn test_reservation_policy_regression() {
    let options = MaskOptions {
        n_modalities: 2,
        n_samples: 10,
        missing_rate: MissingRate::Uniform(0.5),
        seed: None,
        reservation: ReservationPolicy::Protect,
    };
    let seeds: Vec<u64> = (0..64).collect();

    let protected = generate_batch(&options, &seeds).unwrap();
    assert!(protected.iter().all(|mask| mask.rows_without_presence().is_empty()));

    let legacy = MaskGenerator::from_options(&options)
        .unwrap()
        .with_reservation(ReservationPolicy::Legacy)
        .generate_batch(&seeds);
    assert!(legacy.iter().any(|mask| !mask.rows_without_presence().is_empty()));
    assert!(legacy.iter().all(|mask| mask.missing_count(0) == 5 && mask.missing_count(1) == 5));
}
