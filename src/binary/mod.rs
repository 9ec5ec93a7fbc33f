// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The binary log record format.
//!
//! A binary log is a plain concatenation of records. All integers are little-endian. Each record
//! is laid out as:
//!
//! | field             | encoding                                                   |
//! |-------------------|------------------------------------------------------------|
//! | format version    | 1 byte, currently [`FORMAT_VERSION`]                       |
//! | timestamp         | `i64`, see [`timestamp_to_binary`]                         |
//! | severity          | 1 byte, [`Severity::ordinal`](crate::Severity::ordinal)    |
//! | text              | length-prefixed string                                     |
//! | nesting depth     | `i32`                                                      |
//! | extra data string | length-prefixed string, only if the message had extra data |
//!
//! A length-prefixed string is the UTF-8 byte length as an unsigned LEB128 varint, followed by
//! the UTF-8 bytes.
//!
//! # Ambiguity
//!
//! No flag marks whether the trailing extra data string is present. A reader cannot tell a
//! record with extra data from a record without it followed by another record, so it needs
//! out-of-band knowledge: see [`TailField`].

use jiff::Timestamp;

use crate::Error;
use crate::ErrorKind;

mod decode;
mod encode;

pub use self::decode::DecodedRecord;
pub use self::decode::RecordReader;
pub use self::decode::TailField;
pub use self::decode::read_all;
pub use self::encode::encode_record;

/// The version byte leading every record.
pub const FORMAT_VERSION: u8 = 1;

const TICKS_PER_SECOND: i128 = 10_000_000;
const NANOS_PER_TICK: i128 = 100;
// ticks between 0001-01-01T00:00:00Z and the Unix epoch
const UNIX_EPOCH_TICKS: i128 = 62_135_596_800 * TICKS_PER_SECOND;
const KIND_UTC: i64 = 0x4000_0000_0000_0000;
const TICKS_MASK: i64 = 0x3FFF_FFFF_FFFF_FFFF;

/// Encodes a timestamp as 100 ns ticks since 0001-01-01T00:00:00 UTC, tagged with the UTC kind
/// in bits 62..64.
///
/// Precision below one tick is truncated toward the past. Instants before year 1 cannot be
/// represented.
pub fn timestamp_to_binary(timestamp: Timestamp) -> Result<i64, Error> {
    let ticks = timestamp.as_nanosecond().div_euclid(NANOS_PER_TICK) + UNIX_EPOCH_TICKS;
    match i64::try_from(ticks) {
        Ok(ticks) if ticks & !TICKS_MASK == 0 => Ok(ticks | KIND_UTC),
        _ => Err(
            Error::new(ErrorKind::Format, "timestamp is out of the encodable range")
                .with_context("timestamp", timestamp),
        ),
    }
}

/// Decodes a timestamp written by [`timestamp_to_binary`].
///
/// The kind bits are ignored; ticks are always read as UTC.
pub fn timestamp_from_binary(value: i64) -> Result<Timestamp, Error> {
    let ticks = i128::from(value & TICKS_MASK);
    let nanos = (ticks - UNIX_EPOCH_TICKS) * NANOS_PER_TICK;
    Timestamp::from_nanosecond(nanos).map_err(|err| {
        Error::new(ErrorKind::Decode, "timestamp is out of range")
            .with_context("value", value)
            .with_source(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_epoch_ticks() {
        let value = timestamp_to_binary(Timestamp::UNIX_EPOCH).unwrap();
        assert_eq!(value, 621_355_968_000_000_000 | KIND_UTC);
        assert_eq!(timestamp_from_binary(value).unwrap(), Timestamp::UNIX_EPOCH);
    }

    #[test]
    fn test_timestamp_truncates_to_ticks() {
        let timestamp = Timestamp::from_nanosecond(1_723_416_297_172_345_678).unwrap();
        let decoded = timestamp_from_binary(timestamp_to_binary(timestamp).unwrap()).unwrap();
        assert_eq!(decoded.as_nanosecond(), 1_723_416_297_172_345_600);

        let before_epoch = Timestamp::from_nanosecond(-150).unwrap();
        let decoded = timestamp_from_binary(timestamp_to_binary(before_epoch).unwrap()).unwrap();
        assert_eq!(decoded.as_nanosecond(), -200);
    }

    #[test]
    fn test_timestamp_before_year_one() {
        let err = timestamp_to_binary(Timestamp::MIN).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn test_timestamp_max_is_encodable() {
        let value = timestamp_to_binary(Timestamp::MAX).unwrap();
        assert_eq!(value & !TICKS_MASK, KIND_UTC);
    }
}
