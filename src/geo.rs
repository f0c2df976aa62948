//! Distance and heading between two lat/lng positions
//!
//! Consecutive fixes in a trip are at most a few seconds apart, so the
//! cleaner measures distance as a straight line in the lat/lng plane and
//! scales it with a per-degree constant (see [`crate::config::Units`]).
//! That is an approximation tuned for mid-latitudes, not a geodesic.

/// Euclidean distance in the lat/lng plane, in degrees.
///
/// Only meaningful over short spans such as two consecutive fixes.
pub fn planar_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    ((lat1 - lat2).powi(2) + (lng1 - lng2).powi(2)).sqrt()
}

/// Great-circle central angle between two positions given in degrees.
///
/// Haversine form, which stays well conditioned for short distances.
/// Returns radians; multiply by an earth radius for a length.
pub fn great_circle_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let (lat1, lng1) = (lat1.to_radians(), lng1.to_radians());
    let (lat2, lng2) = (lat2.to_radians(), lng2.to_radians());

    let a = ((lat1 - lat2) / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * ((lng1 - lng2) / 2.0).sin().powi(2);
    2.0 * a.sqrt().asin()
}

/// Initial compass bearing from point 1 to point 2, truncated to whole
/// degrees in `[0, 360)`.
pub fn bearing(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> i32 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let y = delta_lng.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lng.cos();
    let degrees = y.atan2(x).to_degrees();

    // atan2 yields (-180, 180], so one +360 is enough before the modulo
    (degrees.trunc() as i32 + 360) % 360
}
