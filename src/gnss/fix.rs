//! The current-fix record and its decimal-degree derivation.
//!
//! `FixRecord` holds the raw fixed-width ASCII fields exactly as they arrive
//! on the wire; `PositionDecimal` is derived from it whenever a fix-valid
//! position sentence completes. Only the latest fix is retained.

use chrono::NaiveTime;

use crate::gnss::coords;

/// Width of the UTC time field, e.g. `"161229.48"`.
pub const UTC_LEN: usize = 9;
/// Width of the DDMM.MMMMM latitude field, e.g. `"4123.24750"`.
pub const LAT_LEN: usize = 10;
/// Width of the DDDMM.MMMMM longitude field, e.g. `"09203.24000"`.
pub const LON_LEN: usize = 11;
/// Width of the satellites-used field, e.g. `"07"`.
pub const SATS_LEN: usize = 2;
/// Width of the HDOP field, e.g. `"1.0"`.
pub const HDOP_LEN: usize = 3;
/// Capacity for the variable-width altitude field, e.g. `"228.2"`.
pub const ALT_MAX_LEN: usize = 7;
/// Capacity for the variable-width ground-speed field, e.g. `"0.019"`.
pub const SPEED_MAX_LEN: usize = 7;

/// Width of a formatted `+DD.DDDDD` latitude string.
pub const LAT_STR_LEN: usize = 9;
/// Width of a formatted `+DDD.DDDDD` longitude string.
pub const LON_STR_LEN: usize = 10;

const BLANK: u8 = b' ';

/// Raw fixed-width ASCII fields of the most recent fix.
///
/// Each successfully parsed sentence overwrites only the fields it carries;
/// a field that arrives empty keeps its previous bytes. That staleness is
/// deliberate: between sentences the record always shows the last value the
/// receiver reported.
#[derive(Debug, Clone)]
pub struct FixRecord {
    pub utc_time: [u8; UTC_LEN],
    pub latitude: [u8; LAT_LEN],
    pub ns_indicator: [u8; 1],
    pub longitude: [u8; LON_LEN],
    pub ew_indicator: [u8; 1],
    pub fix_quality: [u8; 1],
    pub satellites_used: [u8; SATS_LEN],
    pub hdop: [u8; HDOP_LEN],
    pub msl_altitude: [u8; ALT_MAX_LEN],
    pub ground_speed: [u8; SPEED_MAX_LEN],
}

impl Default for FixRecord {
    fn default() -> Self {
        Self {
            utc_time: [BLANK; UTC_LEN],
            latitude: [BLANK; LAT_LEN],
            ns_indicator: [BLANK; 1],
            longitude: [BLANK; LON_LEN],
            ew_indicator: [BLANK; 1],
            fix_quality: [BLANK; 1],
            satellites_used: [BLANK; SATS_LEN],
            hdop: [BLANK; HDOP_LEN],
            msl_altitude: [BLANK; ALT_MAX_LEN],
            ground_speed: [BLANK; SPEED_MAX_LEN],
        }
    }
}

impl FixRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blank every position field while keeping UTC time and ground speed,
    /// so the time display survives a navigation restart.
    pub fn clear_nav_fields(&mut self) {
        self.latitude.fill(BLANK);
        self.ns_indicator.fill(BLANK);
        self.longitude.fill(BLANK);
        self.ew_indicator.fill(BLANK);
        self.fix_quality.fill(BLANK);
        self.satellites_used.fill(BLANK);
        self.hdop.fill(BLANK);
        self.msl_altitude.fill(BLANK);
    }

    /// Blank every field, UTC time and speed included.
    pub fn reset(&mut self) {
        self.clear_nav_fields();
        self.utc_time.fill(BLANK);
        self.ground_speed.fill(BLANK);
    }

    /// Whether the receiver reports a valid position solution.
    pub fn fix_valid(&self) -> bool {
        self.fix_quality[0] == b'1'
    }

    /// Whether the ground-speed field has never been filled in.
    pub fn speed_blank(&self) -> bool {
        self.ground_speed[0] == BLANK && self.ground_speed[1] == BLANK
    }

    /// Heuristic for a desynchronized receiver link: the position stream
    /// claims a valid fix while the velocity stream has produced nothing.
    /// The dispatch loop reacts by retrying [`resync`](crate::NavContext::resync).
    pub fn link_out_of_sync(&self) -> bool {
        self.fix_valid() && self.speed_blank()
    }

    /// UTC time of the fix, if the field holds a well-formed `HHMMSS.SS`.
    pub fn utc(&self) -> Option<NaiveTime> {
        let digits = |range: core::ops::Range<usize>| -> Option<u32> {
            self.utc_time[range].iter().try_fold(0u32, |acc, &b| {
                b.is_ascii_digit().then(|| acc * 10 + u32::from(b - b'0'))
            })
        };
        if self.utc_time[6] != b'.' {
            return None;
        }
        let (h, m, s) = (digits(0..2)?, digits(2..4)?, digits(4..6)?);
        let centis = digits(7..9)?;
        NaiveTime::from_hms_milli_opt(h, m, s, centis * 10)
    }

    /// Altitude above mean sea level in metres, if present.
    pub fn altitude_meters(&self) -> Option<f32> {
        parse_trimmed(&self.msl_altitude)
    }

    /// Ground speed in km/h, if present.
    pub fn speed_kmh(&self) -> Option<f32> {
        parse_trimmed(&self.ground_speed)
    }

    pub fn utc_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.utc_time).ok()
    }

    pub fn satellites_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.satellites_used).ok()
    }

    pub fn hdop_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.hdop).ok()
    }

    pub fn altitude_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.msl_altitude).ok()
    }

    pub fn speed_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.ground_speed).ok()
    }
}

fn parse_trimmed(field: &[u8]) -> Option<f32> {
    let text = core::str::from_utf8(field).ok()?.trim();
    if text.is_empty() {
        return None;
    }
    text.parse().ok()
}

/// Decimal-degree view of the fix, plus its fixed-width display strings.
///
/// Recomputed from the raw record each time a fix-valid position sentence
/// completes; when a field in the record is still blank the previous decimal
/// value is kept.
#[derive(Debug, Clone)]
pub struct PositionDecimal {
    pub latitude: f32,
    pub longitude: f32,
    /// Metres above mean sea level.
    pub altitude: f32,
    pub lat_str: [u8; LAT_STR_LEN],
    pub lon_str: [u8; LON_STR_LEN],
}

impl Default for PositionDecimal {
    fn default() -> Self {
        let mut lat_str = [BLANK; LAT_STR_LEN];
        let mut lon_str = [BLANK; LON_STR_LEN];
        coords::format_latitude(0.0, &mut lat_str);
        coords::format_longitude(0.0, &mut lon_str);
        Self {
            latitude: 0.0,
            longitude: 0.0,
            altitude: 0.0,
            lat_str,
            lon_str,
        }
    }
}

impl PositionDecimal {
    /// Re-derive the decimal values and display strings from the raw record.
    pub fn recompute(&mut self, fix: &FixRecord) {
        if let Some(lat) = coords::latitude_to_decimal(&fix.latitude, fix.ns_indicator[0]) {
            self.latitude = lat;
            coords::format_latitude(lat, &mut self.lat_str);
        }
        if let Some(lon) = coords::longitude_to_decimal(&fix.longitude, fix.ew_indicator[0]) {
            self.longitude = lon;
            coords::format_longitude(lon, &mut self.lon_str);
        }
        if let Some(alt) = fix.altitude_meters() {
            self.altitude = alt;
        }
    }

    pub fn lat_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.lat_str).ok()
    }

    pub fn lon_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.lon_str).ok()
    }
}
