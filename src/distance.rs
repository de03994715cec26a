//! Great-circle distance from the current position to a stored waypoint.
//!
//! Haversine on a spherical Earth: the intentional approximation for a
//! handheld display, not ellipsoidal geodesy. The current altitude is added
//! to the sphere radius as a first-order correction, assuming the waypoint
//! shares it (no altitude is stored per waypoint).

use libm::{atan2f, cosf, sinf, sqrtf};

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f32 = 6371.0;

/// Width of the formatted distance column.
pub const DISTANCE_STR_LEN: usize = 5;

/// Distance in kilometres between two decimal-degree positions at a shared
/// altitude (metres above mean sea level).
pub fn haversine_km(
    from_lat: f32,
    from_lon: f32,
    to_lat: f32,
    to_lon: f32,
    altitude_m: f32,
) -> f32 {
    let dlat = (to_lat - from_lat).to_radians();
    let dlon = (to_lon - from_lon).to_radians();
    let a = sinf(dlat / 2.0) * sinf(dlat / 2.0)
        + cosf(from_lat.to_radians()) * cosf(to_lat.to_radians()) * sinf(dlon / 2.0)
            * sinf(dlon / 2.0);
    let c = 2.0 * atan2f(sqrtf(a), sqrtf(1.0 - a));
    (EARTH_RADIUS_KM + altitude_m / 1000.0) * c
}

/// Format `km` into a fixed five-byte column: the whole part, a decimal
/// point, then as many fraction digits as fit. Fraction digits are truncated,
/// never rounded. A whole part too wide for the column saturates to "99999".
pub fn format_distance(km: f32, out: &mut [u8; DISTANCE_STR_LEN]) {
    let whole = km as u32;

    let mut digits = 1;
    let mut scale = 1u32;
    while whole / scale >= 10 {
        scale *= 10;
        digits += 1;
    }
    if digits > DISTANCE_STR_LEN {
        out.fill(b'9');
        return;
    }

    for slot in out[..digits].iter_mut() {
        *slot = b'0' + ((whole / scale) % 10) as u8;
        scale = (scale / 10).max(1);
    }

    let mut pos = digits;
    if pos < DISTANCE_STR_LEN {
        out[pos] = b'.';
        pos += 1;
    }
    let mut fraction = km - whole as f32;
    while pos < DISTANCE_STR_LEN {
        fraction *= 10.0;
        let digit = fraction as u8;
        out[pos] = b'0' + digit;
        fraction -= f32::from(digit);
        pos += 1;
    }
}
