//! Property-Based Tests for Modality Tags
//!
//! Tests the following invariants:
//! - Render round-trip: render(parse(render(t))) == render(t)
//! - Combine is commutative and associative, INVALID is its identity
//! - Parse is case-insensitive
//! - Registering a name twice returns the same tag

use proptest::prelude::*;

use modalmask::{Modality, ModalityError, ModalityRegistry};

// ============================================================================
// Arbitrary Generators
// ============================================================================

/// Registry with the base modalities plus VIDEO, DEPTH, LIDAR
fn extended_registry() -> ModalityRegistry {
    let mut registry = ModalityRegistry::new();
    for name in ["video", "depth", "lidar"] {
        registry.register_atomic(name).unwrap();
    }
    registry
}

/// Any union of the seven atomic modalities (bits 0..7), INVALID included
fn arb_tag() -> impl Strategy<Value = Modality> {
    let registry = extended_registry();
    let atoms: Vec<Modality> = registry.atomics().map(|(_, tag)| tag).collect();
    proptest::sample::subsequence(atoms.clone(), 0..=atoms.len())
        .prop_map(|picked| picked.into_iter().fold(Modality::INVALID, |acc, tag| acc | tag))
}

fn arb_case_mix() -> impl Strategy<Value = Vec<bool>> {
    proptest::collection::vec(any::<bool>(), 64)
}

proptest! {
    #[test]
    fn render_parse_round_trip(tag in arb_tag()) {
        let registry = extended_registry();
        let rendered = registry.render(tag);
        let parsed = registry.parse(&rendered);
        prop_assert_eq!(parsed, tag);
        prop_assert_eq!(registry.render(parsed), rendered);
    }

    #[test]
    fn combine_is_commutative(a in arb_tag(), b in arb_tag()) {
        prop_assert_eq!(a | b, b | a);
        prop_assert_eq!(a.combine(b), b.combine(a));
    }

    #[test]
    fn combine_is_associative(a in arb_tag(), b in arb_tag(), c in arb_tag()) {
        prop_assert_eq!((a | b) | c, a | (b | c));
    }

    #[test]
    fn invalid_is_identity(tag in arb_tag()) {
        prop_assert_eq!(tag | Modality::INVALID, tag);
        prop_assert_eq!(Modality::INVALID | tag, tag);
    }

    #[test]
    fn parse_ignores_case(tag in arb_tag(), mix in arb_case_mix()) {
        let registry = extended_registry();
        let rendered = registry.render(tag);
        let mixed: String = rendered
            .chars()
            .zip(mix.iter().cycle())
            .map(|(ch, &lower)| if lower { ch.to_ascii_lowercase() } else { ch })
            .collect();
        prop_assert_eq!(registry.parse(&mixed), registry.parse(&rendered));
    }

    #[test]
    fn every_generated_tag_belongs(tag in arb_tag()) {
        prop_assert!(extended_registry().contains(tag));
    }

    #[test]
    fn register_twice_is_idempotent(name in "[A-Za-z][A-Za-z0-9]{0,11}") {
        let mut registry = ModalityRegistry::new();
        let lower = name.to_lowercase();
        let first = registry.register(Some(name.as_str()), None).unwrap();
        let second = registry.register(Some(lower.as_str()), None).unwrap();
        prop_assert_eq!(first, second);
    }
}

#[test]
fn test_parse_is_case_insensitive() {
    let registry = ModalityRegistry::new();
    assert_eq!(registry.parse("IMAGE_TEXT"), registry.parse("image_text"));
}

#[test]
fn test_register_without_name_is_invalid_argument() {
    let mut registry = ModalityRegistry::new();
    assert_eq!(registry.register(None, None), Err(ModalityError::MissingName));
}

#[test]
fn test_combination_walkthrough() {
    let mut registry = ModalityRegistry::new();

    let video = registry.register(Some("VIDEO"), None).unwrap();
    assert_eq!(registry.render(video), "VIDEO");

    let video_text = registry
        .register(Some("VIDEO_TEXT"), Some(video | Modality::TEXT))
        .unwrap();
    assert_eq!(video_text, video | Modality::TEXT);

    let image_text = registry
        .register(Some("IMAGE_TEXT"), Some(Modality::IMAGE | Modality::TEXT))
        .unwrap();
    assert_eq!(image_text, registry.parse("text_image"));

    let image_audio = registry
        .register(Some("IMAGE_AUDIO"), Some(Modality::IMAGE | Modality::AUDIO))
        .unwrap();
    let text_audio_image = registry
        .register(
            Some("TEXT_AUDIO_IMAGE"),
            Some(Modality::TEXT | Modality::AUDIO | Modality::IMAGE),
        )
        .unwrap();
    let super_combo = registry
        .register(Some("SUPER_COMBO"), Some(image_audio | text_audio_image))
        .unwrap();
    assert_eq!(super_combo, text_audio_image);
    assert_eq!(registry.render(super_combo), "AUDIO_IMAGE_TEXT");

    // re-registering VIDEO returns the existing tag instead of failing
    assert_eq!(registry.register(Some("VIDEO"), None).unwrap(), video);
}
