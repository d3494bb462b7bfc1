//! Surface distance between two coordinates on the WGS-84 ellipsoid.
//!
//! Delegates to `geo`'s geodesic (Karney) distance, which converges for every
//! pair of points, nearly antipodal ones included.

use crate::domain::model::Coordinate;
use geo::{Distance, Geodesic, Point};

/// Geodesic distance in meters. Symmetric and exactly zero for equal points.
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    if a == b {
        return 0.0;
    }

    // evaluate in a fixed argument order so distance(a, b) == distance(b, a) bit for bit
    let (p, q) = if (a.latitude(), a.longitude()) <= (b.latitude(), b.longitude()) {
        (a, b)
    } else {
        (b, a)
    };

    Geodesic.distance(to_point(p), to_point(q))
}

fn to_point(c: Coordinate) -> Point<f64> {
    Point::new(c.longitude(), c.latitude())
}

/// Rounds to one decimal place, the precision shown in alerts.
pub fn round_to_decimeter(meters: f64) -> f64 {
    (meters * 10.0).round() / 10.0
}
