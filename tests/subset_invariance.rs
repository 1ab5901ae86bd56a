// tests/subset_invariance.rs
// Any t shares of one polynomial recombine to the same value at x = 0.
use proptest::prelude::*;

use threshold_heist::{LagrangeVerifier, Poly, Roster};

const EPSILON: f64 = 1e-9;

fn consistent_roster() -> Roster {
    // f(x) = 3 + 5x + 7x^2
    let poly = Poly::from_coeffs(vec![3.0, 5.0, 7.0]);
    Roster::from_polynomial(
        &poly,
        &[
            ("alice", 1.0),
            ("bob", 2.0),
            ("carol", 3.0),
            ("dave", 4.0),
            ("eve", 5.0),
        ],
    )
    .unwrap()
}

#[test]
fn every_subset_recovers_the_secret() {
    let roster = consistent_roster();
    let verifier = LagrangeVerifier::new(&roster);
    let selections = roster.combinations();
    assert_eq!(selections.len(), 10);

    for selection in &selections {
        let coeffs = verifier.compute_coefficients(selection);
        let signature = verifier.compute_expected_signature(selection, &coeffs);
        assert!(
            (signature - 3.0).abs() < EPSILON,
            "{:?} gave {}",
            selection.ids(),
            signature
        );
    }
}

#[test]
fn inconsistent_shares_depend_on_the_subset() {
    // The executive shares were not drawn from one quadratic.
    let roster = Roster::executives();
    let verifier = LagrangeVerifier::new(&roster);
    let signatures: Vec<f64> = roster
        .combinations()
        .iter()
        .map(|s| verifier.compute_expected_signature(s, &verifier.compute_coefficients(s)))
        .collect();
    assert!(signatures.iter().any(|&s| (s - signatures[0]).abs() > 1.0));
}

#[test]
fn random_polynomials() {
    let mut rng = rand::rng();
    for _ in 0..20 {
        let poly = Poly::random(3, 9, &mut rng);
        let roster = Roster::from_polynomial(
            &poly,
            &[("a", 1.0), ("b", 2.0), ("c", 3.0), ("d", 4.0), ("e", 5.0)],
        )
        .unwrap();
        let verifier = LagrangeVerifier::new(&roster);
        for selection in roster.combinations() {
            let coeffs = verifier.compute_coefficients(&selection);
            let signature = verifier.compute_expected_signature(&selection, &coeffs);
            assert!((signature - poly.secret()).abs() < 1e-6);
        }
    }
}

proptest! {
    #[test]
    fn invariance_over_random_configurations(
        coeffs in prop::collection::vec(-20i32..=20, 1..=4),
        positions in prop::collection::btree_set(1i32..=12, 6),
        negate in any::<bool>(),
    ) {
        let poly = Poly::from_coeffs(coeffs.iter().map(|&a| f64::from(a)).collect());
        let ids = ["p0", "p1", "p2", "p3", "p4", "p5"];
        let members: Vec<(&str, f64)> = ids
            .iter()
            .zip(&positions)
            .map(|(&id, &x)| (id, if negate { -f64::from(x) } else { f64::from(x) }))
            .collect();
        let roster = Roster::from_polynomial(&poly, &members).unwrap();
        let verifier = LagrangeVerifier::new(&roster);

        for selection in roster.combinations() {
            let coeffs = verifier.compute_coefficients(&selection);
            let sum: f64 = coeffs.values().sum();
            prop_assert!((sum - 1.0).abs() < 1e-6);
            let signature = verifier.compute_expected_signature(&selection, &coeffs);
            let scale = 1.0 + poly.secret().abs();
            prop_assert!((signature - poly.secret()).abs() < 1e-6 * scale);
        }
    }

    #[test]
    fn selection_order_does_not_matter(
        picks in prop::sample::subsequence(vec!["alice", "bob", "carol", "dave", "eve"], 3),
        rotate in 0usize..3,
    ) {
        let roster = Roster::executives();
        let verifier = LagrangeVerifier::new(&roster);
        let mut rotated = picks.clone();
        rotated.rotate_left(rotate);
        let a = roster.select(&picks).unwrap();
        let b = roster.select(&rotated).unwrap();
        prop_assert_eq!(verifier.compute_coefficients(&a), verifier.compute_coefficients(&b));
    }
}
