//! Great-circle proximity tests.
//!
//! Distances are in kilometres on a spherical Earth (haversine). Good to a
//! fraction of a percent, which is plenty for "who is near me".

use serde::{Deserialize, Serialize};

use crate::errors::domain::{DomainError, InputField};

/// Mean Earth radius (IUGG)
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self, DomainError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(DomainError::invalid_input(
                InputField::Coordinates,
                format!("latitude must be within [-90, 90], got {lat}"),
            ));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(DomainError::invalid_input(
                InputField::Coordinates,
                format!("longitude must be within [-180, 180], got {lng}"),
            ));
        }
        Ok(Self { lat, lng })
    }
}

/// Haversine distance between two points.
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let half_dlat = (lat_b - lat_a) / 2.0;
    let half_dlng = (b.lng - a.lng).to_radians() / 2.0;

    let h = half_dlat.sin().powi(2) + lat_a.cos() * lat_b.cos() * half_dlng.sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// True iff `a` and `b` are at most `radius_km` apart.
///
/// Negative or NaN radii never match.
pub fn near(a: Coordinates, b: Coordinates, radius_km: f64) -> bool {
    radius_km >= 0.0 && distance_km(a, b) <= radius_km
}

/// Anything with an optional current position.
pub trait Positioned {
    fn position(&self) -> Option<Coordinates>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Nearby<T> {
    pub item: T,
    pub distance_km: f64,
}

/// Keep the items within `radius_km` of `origin`, closest first.
///
/// Items without a position are dropped.
pub fn within_radius<T, I>(items: I, origin: Coordinates, radius_km: f64) -> Vec<Nearby<T>>
where
    T: Positioned,
    I: IntoIterator<Item = T>,
{
    let mut found: Vec<Nearby<T>> = items
        .into_iter()
        .filter_map(|item| {
            let position = item.position()?;
            near(origin, position, radius_km).then(|| Nearby {
                distance_km: distance_km(origin, position),
                item,
            })
        })
        .collect();

    found.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    found
}
