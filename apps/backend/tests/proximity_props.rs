//! Property tests for the great-circle proximity filter.
//!
//! Increase cases locally with: PROPTEST_CASES=800 cargo test

use std::env;

use directory_auth::geo::{distance_km, near, within_radius, Coordinates, Positioned};
use proptest::prelude::*;

fn proptest_config() -> ProptestConfig {
    let cases = env::var("PROPTEST_CASES")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(64);

    ProptestConfig {
        cases,
        ..ProptestConfig::default()
    }
}

fn coordinates() -> impl Strategy<Value = Coordinates> {
    (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lng)| Coordinates { lat, lng })
}

#[derive(Debug, Clone)]
struct Pin(Option<Coordinates>);

impl Positioned for Pin {
    fn position(&self) -> Option<Coordinates> {
        self.0
    }
}

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn distance_is_symmetric_and_bounded(a in coordinates(), b in coordinates()) {
        let ab = distance_km(a, b);
        let ba = distance_km(b, a);
        prop_assert!((ab - ba).abs() < 1e-6);
        prop_assert!(ab >= 0.0);
        // Half the circumference, plus rounding
        prop_assert!(ab <= 20_016.0);
    }

    #[test]
    fn every_point_is_near_itself(a in coordinates()) {
        prop_assert!(near(a, a, 0.0));
    }

    #[test]
    fn near_grows_with_radius(a in coordinates(), b in coordinates(), r in 0.0f64..5000.0) {
        if near(a, b, r) {
            prop_assert!(near(a, b, r + 1.0));
        }
    }

    #[test]
    fn within_radius_is_sorted_and_bounded(
        origin in coordinates(),
        points in prop::collection::vec(prop::option::of(coordinates()), 0..24),
        r in 0.0f64..8000.0,
    ) {
        let pins: Vec<Pin> = points.iter().copied().map(Pin).collect();
        let found = within_radius(pins.clone(), origin, r);

        for pair in found.windows(2) {
            prop_assert!(pair[0].distance_km <= pair[1].distance_km);
        }
        for hit in &found {
            prop_assert!(hit.distance_km <= r);
        }

        let expected = pins
            .iter()
            .filter(|p| p.0.is_some_and(|at| near(origin, at, r)))
            .count();
        prop_assert_eq!(found.len(), expected);
    }
}
