//! Spherical-earth distance and bearing between an event location and a
//! station location. Display precision only; no ellipsoid correction.

use std::f64::consts::PI;

/// Degrees to radians conversion factor
const DTOR: f64 = PI / 180.0;

/// Radians to degrees conversion factor
const RTOD: f64 = 180.0 / PI;

/// Average earth radius for the spherical approximation, in kilometers
const SPHERICAL_R_KM: f64 = 6371.0;

/// Great-circle distance in kilometers between two lat/lon points (degrees).
pub fn distance_km(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> f64 {
    let phi_a = lat_a * DTOR;
    let phi_b = lat_b * DTOR;
    let d_phi = (lat_b - lat_a) * DTOR;
    let d_lambda = (lon_b - lon_a) * DTOR;

    let h = (d_phi / 2.0).sin().powi(2)
        + phi_a.cos() * phi_b.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * SPHERICAL_R_KM * h.sqrt().asin()
}

/// Initial bearing in degrees (0..360, clockwise from north) from point A
/// toward point B.
pub fn azimuth_deg(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> f64 {
    let phi_a = lat_a * DTOR;
    let phi_b = lat_b * DTOR;
    let d_lambda = (lon_b - lon_a) * DTOR;

    let y = d_lambda.sin() * phi_b.cos();
    let x = phi_a.cos() * phi_b.sin() - phi_a.sin() * phi_b.cos() * d_lambda.cos();
    (y.atan2(x) * RTOD).rem_euclid(360.0)
}
