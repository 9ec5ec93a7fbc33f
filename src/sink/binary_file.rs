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

use std::fs::File;
use std::fs::OpenOptions;
use std::io::Seek;
use std::io::SeekFrom;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use crate::Error;
use crate::binary::encode_record;
use crate::message::LogMessage;
use crate::sink::Lifecycle;
use crate::sink::LogSink;
use crate::sink::SinkState;

const SINK_NAME: &str = "BinaryFileSink";

/// A sink that appends messages to a binary log file.
///
/// The file is opened once, positioned at its end, and kept open until the sink is disposed.
/// See [`binary`](crate::binary) for the record layout and how to read it back.
///
/// The extra data of a message is written as its string representation, so reading a binary log
/// does not give back the structured value.
///
/// # Examples
///
/// ```no_run
/// use logsink::LogMessage;
/// use logsink::sink::BinaryFileSink;
/// use logsink::sink::LogSink;
///
/// let mut sink = BinaryFileSink::open("/var/log/my_service.bin")?;
/// sink.process(&LogMessage::builder().text("hello").build())?;
/// sink.dispose();
/// # Ok::<(), logsink::Error>(())
/// ```
#[derive(Debug)]
pub struct BinaryFileSink {
    path: PathBuf,
    buf: Vec<u8>,
    lifecycle: Lifecycle<File>,
}

impl BinaryFileSink {
    /// Opens or creates the log file at `path` for appending records.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorKind::Io`](crate::ErrorKind::Io) error if the file cannot be opened.
    pub fn open(path: impl Into<PathBuf>) -> Result<BinaryFileSink, Error> {
        let path = path.into();
        let io_error = |err| Error::from_io_error(err).with_context("path", path.display());

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(io_error)?;
        let len = file.seek(SeekFrom::End(0)).map_err(io_error)?;
        log::debug!(target: "logsink", "{SINK_NAME} opened {} at offset {len}", path.display());

        Ok(BinaryFileSink {
            path,
            buf: Vec::new(),
            lifecycle: Lifecycle::new(SINK_NAME, file),
        })
    }

    /// The path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogSink for BinaryFileSink {
    fn process(&mut self, message: &LogMessage) -> Result<(), Error> {
        let file = self.lifecycle.get_mut()?;

        self.buf.clear();
        encode_record(message, &mut self.buf)?;
        file.write_all(&self.buf)
            .and_then(|()| file.flush())
            .map_err(|err| Error::from_io_error(err).with_context("path", self.path.display()))
    }

    fn dispose(&mut self) {
        if let Some(mut file) = self.lifecycle.dispose() {
            if let Err(err) = file.flush() {
                log::warn!(target: "logsink", "failed to flush {}: {err}", self.path.display());
            }
        }
    }

    fn state(&self) -> SinkState {
        self.lifecycle.state()
    }
}

impl Drop for BinaryFileSink {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use jiff::Timestamp;
    use tempfile::TempDir;

    use super::*;
    use crate::ErrorKind;
    use crate::binary::TailField;
    use crate::binary::read_all;
    use crate::message::Severity;

    fn message(text: &str) -> LogMessage {
        LogMessage::builder()
            .timestamp(Timestamp::from_millisecond(1_700_000_000_000).unwrap())
            .severity(Severity::Debug)
            .text(text)
            .build()
    }

    #[test]
    fn test_appends_to_existing_file() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("app.bin");

        let mut sink = BinaryFileSink::open(&path).unwrap();
        assert_eq!(sink.path(), path.as_path());
        sink.process(&message("one")).unwrap();
        sink.dispose();

        let mut sink = BinaryFileSink::open(&path).unwrap();
        sink.process(&message("two")).unwrap();
        drop(sink);

        let bytes = fs::read(&path).unwrap();
        let records = read_all(&bytes, TailField::Absent).unwrap();
        let texts = records.iter().map(|r| r.text.as_str()).collect::<Vec<_>>();
        assert_eq!(texts, ["one", "two"]);
    }

    #[test]
    fn test_record_visible_before_dispose() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("app.bin");

        let mut sink = BinaryFileSink::open(&path).unwrap();
        sink.process(&message("visible")).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(read_all(&bytes, TailField::Absent).unwrap().len(), 1);
        assert_eq!(sink.state(), SinkState::Open);
    }

    #[test]
    fn test_process_after_dispose() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("app.bin");

        let mut sink = BinaryFileSink::open(&path).unwrap();
        sink.dispose();
        sink.dispose();
        assert!(sink.is_disposed());

        let err = sink.process(&message("late")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UseAfterDispose);
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn test_open_in_missing_directory() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("missing").join("app.bin");

        let err = BinaryFileSink::open(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_unencodable_message_writes_nothing() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let path = temp_dir.path().join("app.bin");

        let mut sink = BinaryFileSink::open(&path).unwrap();
        let message = LogMessage::builder().nesting_depth(u32::MAX).build();
        let err = sink.process(&message).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
        assert_eq!(sink.state(), SinkState::Open);
    }
}
