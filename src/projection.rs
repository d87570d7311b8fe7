//! Latitude/longitude to sphere conversions.
//!
//! The polar axis is `+y`. Longitude is offset by 180 degrees so the texture
//! seam of an equirectangular map lines up with the antimeridian.

use nalgebra::Vector3;

/// Maps a latitude/longitude pair (degrees) to a point on a sphere of `radius`.
///
/// Inputs are not validated; out-of-range values still produce a point on the sphere.
pub fn lat_lng_to_vector3(lat: f64, lng: f64, radius: f64) -> Vector3<f64> {
    let phi = (90.0 - lat).to_radians();
    let theta = (lng + 180.0).to_radians();

    Vector3::new(
        -(radius * phi.sin() * theta.cos()),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    )
}

/// Inverse of [`lat_lng_to_vector3`]: returns `(lat, lng)` in degrees.
///
/// Longitude is normalized into `[-180, 180)`. The origin maps to `(0, 0)`.
pub fn vector3_to_lat_lng(point: &Vector3<f64>) -> (f64, f64) {
    let radius = point.norm();
    if radius == 0.0 {
        return (0.0, 0.0);
    }
    let phi = (point.y / radius).clamp(-1.0, 1.0).acos();
    let theta = point.z.atan2(-point.x);
    let lat = 90.0 - phi.to_degrees();
    let lng = theta.to_degrees().rem_euclid(360.0) - 180.0;
    (lat, lng)
}

/// Unit outward normal of the sphere at the given latitude/longitude.
pub fn surface_normal(lat: f64, lng: f64) -> Vector3<f64> {
    lat_lng_to_vector3(lat, lng, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_point_lies_on_sphere() {
        for lat in (-90..=90).step_by(15) {
            for lng in (-180..=180).step_by(20) {
                let p = lat_lng_to_vector3(lat as f64, lng as f64, 2.05);
                assert!((p.norm() - 2.05).abs() < EPS, "lat {lat} lng {lng}");
            }
        }
    }

    #[test]
    fn test_poles_are_on_y_axis() {
        let north = lat_lng_to_vector3(90.0, 37.0, 2.0);
        assert!(north.x.abs() < EPS && north.z.abs() < EPS);
        assert!((north.y - 2.0).abs() < EPS);

        let south = lat_lng_to_vector3(-90.0, -120.0, 2.0);
        assert!((south.y + 2.0).abs() < EPS);
    }

    #[test]
    fn test_prime_meridian_faces_positive_x() {
        // theta = 180 degrees, so x = -(r * cos(180)) = r
        let p = lat_lng_to_vector3(0.0, 0.0, 1.0);
        assert!((p.x - 1.0).abs() < EPS);
        assert!(p.y.abs() < EPS);
        assert!(p.z.abs() < EPS);
    }

    #[test]
    fn test_antimeridian_faces_negative_x() {
        let p = lat_lng_to_vector3(0.0, 180.0, 1.0);
        assert!((p.x + 1.0).abs() < EPS);
    }

    #[test]
    fn test_out_of_range_input_still_on_sphere() {
        let p = lat_lng_to_vector3(120.0, 400.0, 3.0);
        assert!((p.norm() - 3.0).abs() < EPS);
    }

    #[test]
    fn test_inverse_recovers_coordinates() {
        for &(lat, lng) in &[(46.2276, 2.2137), (-25.2744, 133.7751), (39.8283, -98.5795), (0.0, -179.5)] {
            let p = lat_lng_to_vector3(lat, lng, 2.05);
            let (rlat, rlng) = vector3_to_lat_lng(&p);
            assert!((rlat - lat).abs() < 1e-6, "lat {lat} -> {rlat}");
            assert!((rlng - lng).abs() < 1e-6, "lng {lng} -> {rlng}");
        }
    }

    #[test]
    fn test_surface_normal_is_unit() {
        let n = surface_normal(12.0, -45.0);
        assert!((n.norm() - 1.0).abs() < EPS);
    }
}
