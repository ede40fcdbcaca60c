//! Binary codec for the remote's pointer/sensor telemetry record.
//!
//! Wire format (little-endian, no padding):
//! ```text
//! [return_value:1][device_id:1][coordinate:2×i32][gyroscope:3×f32]
//! [acceleration:3×f32][quaternion:4×f32]
//! ```
//! Total size: 50 bytes.  Trailing bytes beyond the record are ignored.
//!
//! # Partial records
//!
//! The device occasionally sends short payloads.  Decoding proceeds one field
//! group at a time; the first group that does not fit in the remaining bytes
//! stops decoding.  Groups already read keep their values, everything after
//! stays zero, and the partially filled record travels inside the
//! [`TelemetryDecodeError`] so callers can still act on the coordinate.
//! A group is all-or-nothing: a payload that ends in the middle of the
//! coordinate pair leaves both components at zero.

use std::fmt;

use thiserror::Error;

/// Size in bytes of a complete telemetry record.
pub const TELEMETRY_LEN: usize = TelemetryField::ReturnValue.width()
    + TelemetryField::DeviceId.width()
    + TelemetryField::Coordinate.width()
    + TelemetryField::Gyroscope.width()
    + TelemetryField::Acceleration.width()
    + TelemetryField::Quaternion.width();

/// Decoded telemetry record.
///
/// Only [`coordinate`](Self::coordinate) drives pointer movement today; the
/// sensor fields are decoded and carried but produce no action.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TelemetryRecord {
    pub return_value: u8,
    pub device_id: u8,
    /// Absolute pointer position in the device's reporting range.
    pub coordinate: [i32; 2],
    pub gyroscope: [f32; 3],
    pub acceleration: [f32; 3],
    pub quaternion: [f32; 4],
}

/// Field groups of the record, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetryField {
    ReturnValue,
    DeviceId,
    Coordinate,
    Gyroscope,
    Acceleration,
    Quaternion,
}

impl TelemetryField {
    /// Width of the group on the wire, in bytes.
    pub const fn width(self) -> usize {
        match self {
            TelemetryField::ReturnValue | TelemetryField::DeviceId => 1,
            TelemetryField::Coordinate => 2 * 4,
            TelemetryField::Gyroscope | TelemetryField::Acceleration => 3 * 4,
            TelemetryField::Quaternion => 4 * 4,
        }
    }
}

impl fmt::Display for TelemetryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TelemetryField::ReturnValue => "returnValue",
            TelemetryField::DeviceId => "deviceId",
            TelemetryField::Coordinate => "coordinate",
            TelemetryField::Gyroscope => "gyroscope",
            TelemetryField::Acceleration => "acceleration",
            TelemetryField::Quaternion => "quaternion",
        };
        f.write_str(name)
    }
}

/// The payload ended before every field could be read.
///
/// Non-fatal: [`partial`](Self::partial) holds every group decoded before
/// `field`, with the rest zeroed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("telemetry truncated in {field}: need {needed} bytes at offset {offset}, {available} available")]
pub struct TelemetryDecodeError {
    /// The first group that could not be read.
    pub field: TelemetryField,
    /// Byte offset where that group starts.
    pub offset: usize,
    /// Bytes the group needs.
    pub needed: usize,
    /// Bytes that were left.
    pub available: usize,
    /// The record as far as it could be decoded.
    pub partial: TelemetryRecord,
}

impl TelemetryDecodeError {
    /// Consumes the error, returning the partially decoded record.
    pub fn into_partial(self) -> TelemetryRecord {
        self.partial
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Decodes a telemetry payload.
///
/// # Errors
///
/// Returns [`TelemetryDecodeError`] carrying the partial record when the
/// payload is shorter than [`TELEMETRY_LEN`].  Never panics.
///
/// # Examples
///
/// ```rust
/// use m4p_core::protocol::telemetry::{decode_telemetry, encode_telemetry, TelemetryRecord};
///
/// let record = TelemetryRecord { coordinate: [100, 200], ..Default::default() };
/// let bytes = encode_telemetry(&record);
/// assert_eq!(decode_telemetry(&bytes).unwrap(), record);
///
/// let partial = decode_telemetry(&bytes[..12]).unwrap_err().into_partial();
/// assert_eq!(partial.coordinate, [100, 200]);
/// ```
pub fn decode_telemetry(payload: &[u8]) -> Result<TelemetryRecord, TelemetryDecodeError> {
    let mut record = TelemetryRecord::default();
    let mut reader = FieldReader::new(payload);

    match read_fields(&mut reader, &mut record) {
        Ok(()) => Ok(record),
        Err(short) => Err(TelemetryDecodeError {
            field: short.field,
            offset: short.offset,
            needed: short.field.width(),
            available: short.available,
            partial: record,
        }),
    }
}

/// Encodes a record into its [`TELEMETRY_LEN`]-byte wire form.
pub fn encode_telemetry(record: &TelemetryRecord) -> Vec<u8> {
    let mut buf = Vec::with_capacity(TELEMETRY_LEN);
    buf.push(record.return_value);
    buf.push(record.device_id);
    for v in record.coordinate {
        buf.extend_from_slice(&v.to_le_bytes());
    }
    for v in record
        .gyroscope
        .iter()
        .chain(&record.acceleration)
        .chain(&record.quaternion)
    {
        buf.extend_from_slice(&v.to_le_bytes());
    }
    buf
}

// ── Field reader ──────────────────────────────────────────────────────────────

fn read_fields(r: &mut FieldReader<'_>, rec: &mut TelemetryRecord) -> Result<(), ShortRead> {
    rec.return_value = r.u8(TelemetryField::ReturnValue)?;
    rec.device_id = r.u8(TelemetryField::DeviceId)?;
    rec.coordinate = r.words(TelemetryField::Coordinate, i32::from_le_bytes)?;
    rec.gyroscope = r.words(TelemetryField::Gyroscope, f32::from_le_bytes)?;
    rec.acceleration = r.words(TelemetryField::Acceleration, f32::from_le_bytes)?;
    rec.quaternion = r.words(TelemetryField::Quaternion, f32::from_le_bytes)?;
    Ok(())
}

struct ShortRead {
    field: TelemetryField,
    offset: usize,
    available: usize,
}

/// Forward-only cursor over the payload.
struct FieldReader<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> FieldReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, offset: 0 }
    }

    fn group(&mut self, field: TelemetryField) -> Result<&'a [u8], ShortRead> {
        let available = self.buf.len() - self.offset;
        let width = field.width();
        if available < width {
            return Err(ShortRead {
                field,
                offset: self.offset,
                available,
            });
        }
        let bytes = &self.buf[self.offset..self.offset + width];
        self.offset += width;
        Ok(bytes)
    }

    fn u8(&mut self, field: TelemetryField) -> Result<u8, ShortRead> {
        Ok(self.group(field)?[0])
    }

    /// Reads a group of `N` four-byte words.
    fn words<T: Copy + Default, const N: usize>(
        &mut self,
        field: TelemetryField,
        convert: fn([u8; 4]) -> T,
    ) -> Result<[T; N], ShortRead> {
        debug_assert_eq!(field.width(), N * 4);
        let bytes = self.group(field)?;
        let mut out = [T::default(); N];
        for (slot, chunk) in out.iter_mut().zip(bytes.chunks_exact(4)) {
            *slot = convert([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Ok(out)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
