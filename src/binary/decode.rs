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

use integer_encoding::VarInt;
use jiff::Timestamp;

use crate::Error;
use crate::ErrorKind;
use crate::binary::FORMAT_VERSION;
use crate::binary::timestamp_from_binary;
use crate::message::Severity;

/// Whether a record carries the trailing extra data string.
///
/// The format has no presence flag for this field, so the caller has to know.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TailField {
    /// The record ends after the nesting depth.
    Absent,
    /// The record ends with an extra data string.
    Present,
}

/// One record decoded from a binary log.
///
/// Extra data comes back as the string it was written as; the structured value is not
/// recoverable.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DecodedRecord {
    /// The point in time the message was created.
    pub timestamp: Timestamp,
    /// The severity of the message.
    pub severity: Severity,
    /// The message body.
    pub text: String,
    /// The nesting depth as stored on disk.
    pub nesting_depth: i32,
    /// The extra data string, if the record was read with [`TailField::Present`].
    pub extra_data: Option<String>,
}

/// Decodes records from the bytes of a binary log.
#[derive(Debug)]
pub struct RecordReader<'a> {
    input: &'a [u8],
    offset: usize,
}

impl<'a> RecordReader<'a> {
    /// Create a reader positioned at the start of `input`.
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, offset: 0 }
    }

    /// The byte offset of the next record.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Whether all input has been consumed.
    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// Decodes the next record.
    ///
    /// Returns `Ok(None)` when the input ends at a record boundary. On error the reader does not
    /// advance.
    pub fn read_record(&mut self, tail: TailField) -> Result<Option<DecodedRecord>, Error> {
        if self.input.is_empty() {
            return Ok(None);
        }

        let mut input = self.input;
        let record =
            read_record(&mut input, tail).map_err(|err| err.with_context("offset", self.offset))?;
        self.offset += self.input.len() - input.len();
        self.input = input;
        Ok(Some(record))
    }
}

/// Decodes a whole binary log, assuming every record has the same [`TailField`].
pub fn read_all(input: &[u8], tail: TailField) -> Result<Vec<DecodedRecord>, Error> {
    let mut reader = RecordReader::new(input);
    let mut records = vec![];
    while let Some(record) = reader.read_record(tail)? {
        records.push(record);
    }
    Ok(records)
}

fn read_record(input: &mut &[u8], tail: TailField) -> Result<DecodedRecord, Error> {
    let version = read_u8(input)?;
    if version != FORMAT_VERSION {
        return Err(Error::new(ErrorKind::Decode, "unsupported record format version")
            .with_context("version", version));
    }

    let timestamp = timestamp_from_binary(i64::from_le_bytes(read_array(input)?))?;
    let severity = Severity::try_from(read_u8(input)?)?;
    let text = read_string(input)?;
    let nesting_depth = i32::from_le_bytes(read_array(input)?);
    let extra_data = match tail {
        TailField::Absent => None,
        TailField::Present => Some(read_string(input)?),
    };

    Ok(DecodedRecord {
        timestamp,
        severity,
        text,
        nesting_depth,
        extra_data,
    })
}

fn truncated() -> Error {
    Error::new(ErrorKind::Decode, "record is truncated")
}

fn read_u8(input: &mut &[u8]) -> Result<u8, Error> {
    let (&byte, rest) = input.split_first().ok_or_else(truncated)?;
    *input = rest;
    Ok(byte)
}

fn read_array<const N: usize>(input: &mut &[u8]) -> Result<[u8; N], Error> {
    let (bytes, rest) = input.split_first_chunk::<N>().ok_or_else(truncated)?;
    *input = rest;
    Ok(*bytes)
}

fn read_string(input: &mut &[u8]) -> Result<String, Error> {
    let (len, varint_len) = u64::decode_var(input).ok_or_else(truncated)?;
    let len = i32::try_from(len)
        .ok()
        .and_then(|len| usize::try_from(len).ok())
        .ok_or_else(|| {
            Error::new(ErrorKind::Decode, "invalid string length").with_context("len", len)
        })?;
    let end = varint_len + len;
    if end > input.len() {
        return Err(truncated());
    }

    let text = std::str::from_utf8(&input[varint_len..end]).map_err(|err| {
        Error::new(ErrorKind::Decode, "string is not valid UTF-8").with_source(err)
    })?;
    let text = text.to_string();
    *input = &input[end..];
    Ok(text)
}
