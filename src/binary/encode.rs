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

use crate::Error;
use crate::ErrorKind;
use crate::binary::FORMAT_VERSION;
use crate::binary::timestamp_to_binary;
use crate::message::LogMessage;

/// Appends the binary record of `message` to `output`.
///
/// On error `output` is left unchanged.
///
/// # Errors
///
/// Returns a [`ErrorKind::Format`] error if the timestamp lies before year 1, the nesting depth
/// exceeds `i32::MAX`, or a string is longer than `i32::MAX` bytes.
pub fn encode_record(message: &LogMessage, output: &mut Vec<u8>) -> Result<(), Error> {
    let timestamp = timestamp_to_binary(message.timestamp())?;
    let depth = i32::try_from(message.nesting_depth()).map_err(|_| {
        Error::new(ErrorKind::Format, "nesting depth does not fit in an i32")
            .with_context("nesting_depth", message.nesting_depth())
    })?;
    let text = message.text();
    let text_len = string_len(text)?;
    let extra = message.extra_data_string();
    let extra_len = extra.as_deref().map(string_len).transpose()?;

    output.push(FORMAT_VERSION);
    output.extend_from_slice(&timestamp.to_le_bytes());
    output.push(message.severity().ordinal());
    write_string(output, text_len, text);
    output.extend_from_slice(&depth.to_le_bytes());
    if let (Some(extra), Some(extra_len)) = (extra.as_deref(), extra_len) {
        write_string(output, extra_len, extra);
    }
    Ok(())
}

fn string_len(s: &str) -> Result<u32, Error> {
    match i32::try_from(s.len()) {
        Ok(len) => Ok(len.unsigned_abs()),
        Err(_) => Err(Error::new(ErrorKind::Format, "string is too long to encode")
            .with_context("len", s.len())),
    }
}

fn write_string(output: &mut Vec<u8>, len: u32, s: &str) {
    output.extend_from_slice(&len.encode_var_vec());
    output.extend_from_slice(s.as_bytes());
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::message::Severity;

    #[test]
    fn test_encode_layout_without_extra_data() {
        let message = LogMessage::builder()
            .timestamp(Timestamp::UNIX_EPOCH)
            .severity(Severity::Info)
            .text("start")
            .nesting_depth(0)
            .build();
        let mut output = vec![];
        encode_record(&message, &mut output).unwrap();

        let mut expected = vec![1u8];
        expected.extend_from_slice(&(621_355_968_000_000_000i64 | (1 << 62)).to_le_bytes());
        expected.push(2);
        expected.push(5);
        expected.extend_from_slice(b"start");
        expected.extend_from_slice(&0i32.to_le_bytes());
        assert_eq!(output, expected);
    }

    #[test]
    fn test_encode_layout_with_extra_data() {
        let message = LogMessage::builder()
            .timestamp(Timestamp::UNIX_EPOCH)
            .severity(Severity::Error)
            .text("failure")
            .nesting_depth(1)
            .extra_data("code=42")
            .build();
        let mut output = vec![];
        encode_record(&message, &mut output).unwrap();

        assert_eq!(output.len(), 1 + 8 + 1 + (1 + 7) + 4 + (1 + 7));
        assert_eq!(output[9], 4);
        assert_eq!(&output[10..18], b"\x07failure");
        assert_eq!(&output[18..22], &1i32.to_le_bytes());
        assert_eq!(&output[22..], b"\x07code=42");
    }

    #[test]
    fn test_encode_long_string_uses_varint_prefix() {
        let text = "x".repeat(300);
        let message = LogMessage::builder().text(text.as_str()).build();
        let mut output = vec![];
        encode_record(&message, &mut output).unwrap();
        // 300 = 0b1_0010_1100
        assert_eq!(&output[10..12], &[0xACu8, 0x02]);
        assert_eq!(&output[12..312], text.as_bytes());
    }

    #[test]
    fn test_encode_rejects_deep_nesting() {
        let message = LogMessage::builder().nesting_depth(u32::MAX).build();
        let mut output = vec![0xFF];
        let err = encode_record(&message, &mut output).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(output, vec![0xFF]);
    }
}
