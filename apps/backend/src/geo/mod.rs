pub mod proximity;

pub use proximity::{distance_km, near, within_radius, Coordinates, Nearby, Positioned};
