//! Degrees-minutes to decimal-degrees conversion and display formatting.
//!
//! The wire carries coordinates as `DDMM.MMMMM` / `DDDMM.MMMMM` plus a
//! hemisphere character; the display contract wants signed decimal degrees in
//! fixed columns. Formatting places every digit individually so the output
//! width never varies: a sign, the integer digits, a literal `'.'` at a fixed
//! offset and exactly five truncated fraction digits.

use crate::gnss::fix::{LAT_STR_LEN, LON_STR_LEN};

/// Decimal degrees from a `DDMM.MMMMM` latitude field. Negative for 'S'.
pub fn latitude_to_decimal(field: &[u8], hemisphere: u8) -> Option<f32> {
    dm_to_decimal(field, 2, hemisphere == b'S')
}

/// Decimal degrees from a `DDDMM.MMMMM` longitude field. Negative for 'W'.
pub fn longitude_to_decimal(field: &[u8], hemisphere: u8) -> Option<f32> {
    dm_to_decimal(field, 3, hemisphere == b'W')
}

fn dm_to_decimal(field: &[u8], degree_digits: usize, negative: bool) -> Option<f32> {
    if field.len() <= degree_digits {
        return None;
    }
    let degrees = field[..degree_digits].iter().try_fold(0u16, |acc, &b| {
        b.is_ascii_digit().then(|| acc * 10 + u16::from(b - b'0'))
    })?;
    // The remainder, decimal point included, is minutes of arc.
    let minutes: f32 = core::str::from_utf8(&field[degree_digits..])
        .ok()?
        .trim()
        .parse()
        .ok()?;
    let decimal = f32::from(degrees) + minutes / 60.0;
    Some(if negative { -decimal } else { decimal })
}

/// Write `value` as `+DD.DDDDD` into a 9-byte column.
pub fn format_latitude(value: f32, out: &mut [u8; LAT_STR_LEN]) {
    let (magnitude, decimal_part) = split_value(value, &mut out[0]);
    out[1] = b'0' + ((magnitude / 10) % 10) as u8;
    out[2] = b'0' + (magnitude % 10) as u8;
    out[3] = b'.';
    place_fraction(decimal_part, &mut out[4..9]);
}

/// Write `value` as `+DDD.DDDDD` into a 10-byte column.
pub fn format_longitude(value: f32, out: &mut [u8; LON_STR_LEN]) {
    let (magnitude, decimal_part) = split_value(value, &mut out[0]);
    out[1] = b'0' + ((magnitude / 100) % 10) as u8;
    out[2] = b'0' + ((magnitude / 10) % 10) as u8;
    out[3] = b'0' + (magnitude % 10) as u8;
    out[4] = b'.';
    place_fraction(decimal_part, &mut out[5..10]);
}

/// Sign slot, integer magnitude and the fraction scaled to five digits,
/// truncated rather than rounded.
fn split_value(value: f32, sign: &mut u8) -> (u16, u32) {
    let magnitude = if value < 0.0 {
        *sign = b'-';
        -value
    } else {
        *sign = b'+';
        value
    };
    let integer_part = magnitude as u16;
    let fractional_part = magnitude - f32::from(integer_part);
    (integer_part, (fractional_part * 100_000.0) as u32)
}

fn place_fraction(mut decimal_part: u32, out: &mut [u8]) {
    for slot in out.iter_mut().rev() {
        *slot = b'0' + (decimal_part % 10) as u8;
        decimal_part /= 10;
    }
}
