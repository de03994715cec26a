//! Resumable NMEA sentence framer, dispatcher and field extractors.
//!
//! The parser is fed one byte at a time and carries its partial-sentence
//! state across calls, so readiness of the serial link never blocks anything.
//! On the sync character it reads the 5-byte talker/type tag plus one
//! delimiter, then either collects the sentence body (position and velocity
//! sentences) or discards everything up to the terminator (any other tag).
//!
//! Field extraction runs once the terminator arrives. A field that is empty
//! on the wire (delimiter immediately follows delimiter) keeps the previous
//! bytes in the fix record; that staleness is the single-current-value model
//! working as intended, not data corruption.

use heapless::Vec;

use crate::gnss::fix::FixRecord;

const SYNC: u8 = b'$';
const DELIMITER: u8 = b',';
const TERMINATOR: u8 = b'\r';

pub const TAG_LEN: usize = 5;
const POSITION_TAG: &[u8; TAG_LEN] = b"GPGGA";
const VELOCITY_TAG: &[u8; TAG_LEN] = b"GPVTG";

/// Longest legal NMEA sentence body; anything larger resets the parser.
const BODY_CAPACITY: usize = 82;

/// Delimited fields between the VTG tag and the km/h ground-speed field.
const VTG_LEADING_FIELDS: usize = 6;

/// Sentence types the dispatcher hands to an extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SentenceKind {
    /// Position sentence (GGA): time, position, fix quality, altitude.
    Position,
    /// Velocity sentence (VTG): ground speed.
    Velocity,
}

// States are named for what the parser is waiting on next.
#[derive(Debug, Clone, Copy)]
enum ParserState {
    /// Scanning for the sync character.
    Searching,
    /// Collecting the 5-byte talker/type tag.
    Tag { tag: [u8; TAG_LEN], len: usize },
    /// Tag recognized; expecting the delimiter that follows it.
    TagDelimiter { kind: SentenceKind },
    /// Collecting the sentence body up to the terminator.
    Body { kind: SentenceKind },
    /// Unknown or malformed sentence; consuming bytes up to the terminator.
    Discard,
}

pub struct SentenceParser {
    state: ParserState,
    body: Vec<u8, BODY_CAPACITY>,
}

impl Default for SentenceParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SentenceParser {
    pub fn new() -> Self {
        Self {
            state: ParserState::Searching,
            body: Vec::new(),
        }
    }

    /// Drop any partial sentence and go back to scanning for sync.
    pub fn reset(&mut self) {
        self.state = ParserState::Searching;
        self.body.clear();
    }

    /// Feed one byte; returns the sentence kind when a known sentence just
    /// completed and its fields were folded into `fix`.
    pub fn feed(&mut self, byte: u8, fix: &mut FixRecord) -> Option<SentenceKind> {
        match self.state {
            ParserState::Searching => {
                if byte == SYNC {
                    self.body.clear();
                    self.state = ParserState::Tag {
                        tag: [0; TAG_LEN],
                        len: 0,
                    };
                }
                // Anything else, line feeds included, is noise between sentences.
            }
            ParserState::Tag { mut tag, len } => {
                tag[len] = byte;
                let len = len + 1;
                if len < TAG_LEN {
                    self.state = ParserState::Tag { tag, len };
                } else if &tag == POSITION_TAG {
                    self.state = ParserState::TagDelimiter {
                        kind: SentenceKind::Position,
                    };
                } else if &tag == VELOCITY_TAG {
                    self.state = ParserState::TagDelimiter {
                        kind: SentenceKind::Velocity,
                    };
                } else {
                    trace!("discarding sentence");
                    self.state = ParserState::Discard;
                }
            }
            ParserState::TagDelimiter { kind } => {
                self.state = match byte {
                    DELIMITER => ParserState::Body { kind },
                    // Truncated right after the tag.
                    TERMINATOR => ParserState::Searching,
                    _ => ParserState::Discard,
                };
            }
            ParserState::Body { kind } => {
                if byte == TERMINATOR {
                    match kind {
                        SentenceKind::Position => extract_position(&self.body, fix),
                        SentenceKind::Velocity => extract_velocity(&self.body, fix),
                    }
                    self.state = ParserState::Searching;
                    return Some(kind);
                } else if self.body.push(byte).is_err() {
                    warn!("sentence body overflow, resyncing");
                    self.reset();
                }
            }
            ParserState::Discard => {
                if byte == TERMINATOR {
                    self.state = ParserState::Searching;
                }
            }
        }
        None
    }
}

/// Cursor over a completed sentence body, applying the per-field rules.
struct FieldCursor<'a> {
    body: &'a [u8],
    pos: usize,
}

impl<'a> FieldCursor<'a> {
    fn new(body: &'a [u8]) -> Self {
        Self { body, pos: 0 }
    }

    /// Fixed-width field: if the next byte is the delimiter the field is
    /// absent and the previous value stays; otherwise exactly `out.len()`
    /// bytes are copied and the trailing delimiter consumed. Returns false
    /// when the body ends early or the declared width doesn't line up, which
    /// aborts extraction of the remaining fields.
    fn copy_fixed(&mut self, out: &mut [u8]) -> bool {
        match self.body.get(self.pos) {
            None => false,
            Some(&DELIMITER) => {
                self.pos += 1;
                true
            }
            Some(_) => {
                let end = self.pos + out.len();
                if end > self.body.len() {
                    return false;
                }
                out.copy_from_slice(&self.body[self.pos..end]);
                self.pos = end;
                match self.body.get(self.pos) {
                    Some(&DELIMITER) => {
                        self.pos += 1;
                        true
                    }
                    _ => false,
                }
            }
        }
    }

    /// Variable-width field: copy until the next delimiter, the end of the
    /// body or the capacity of `out`, whichever comes first. A present field
    /// blanks the buffer first so a shorter value can't leave stale digits.
    fn copy_bounded(&mut self, out: &mut [u8]) -> bool {
        match self.body.get(self.pos) {
            None => false,
            Some(&DELIMITER) => {
                self.pos += 1;
                true
            }
            Some(_) => {
                out.fill(b' ');
                let mut len = 0;
                while len < out.len() {
                    match self.body.get(self.pos) {
                        None | Some(&DELIMITER) => break,
                        Some(&b) => {
                            out[len] = b;
                            len += 1;
                            self.pos += 1;
                        }
                    }
                }
                if self.body.get(self.pos) == Some(&DELIMITER) {
                    self.pos += 1;
                }
                true
            }
        }
    }

    /// Skip one delimited field without capturing it.
    fn skip_field(&mut self) -> bool {
        while let Some(&b) = self.body.get(self.pos) {
            self.pos += 1;
            if b == DELIMITER {
                return true;
            }
        }
        false
    }
}

/// GGA: UTC, latitude, N/S, longitude, E/W, fix quality, satellites, HDOP,
/// then the variable-width altitude. The geoid and DGPS trailer is ignored.
fn extract_position(body: &[u8], fix: &mut FixRecord) {
    let mut cursor = FieldCursor::new(body);
    let ok = cursor.copy_fixed(&mut fix.utc_time)
        && cursor.copy_fixed(&mut fix.latitude)
        && cursor.copy_fixed(&mut fix.ns_indicator)
        && cursor.copy_fixed(&mut fix.longitude)
        && cursor.copy_fixed(&mut fix.ew_indicator)
        && cursor.copy_fixed(&mut fix.fix_quality)
        && cursor.copy_fixed(&mut fix.satellites_used)
        && cursor.copy_fixed(&mut fix.hdop)
        && cursor.copy_bounded(&mut fix.msl_altitude);
    if !ok {
        debug!("short position sentence, trailing fields kept stale");
    }
}

/// VTG: six leading fields (the course pairs and the knots speed) are
/// skipped; the seventh is the km/h ground speed. The rest is dropped.
fn extract_velocity(body: &[u8], fix: &mut FixRecord) {
    let mut cursor = FieldCursor::new(body);
    for _ in 0..VTG_LEADING_FIELDS {
        if !cursor.skip_field() {
            debug!("short velocity sentence, speed kept stale");
            return;
        }
    }
    cursor.copy_bounded(&mut fix.ground_speed);
}
