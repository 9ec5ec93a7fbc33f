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

use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use crate::Error;
use crate::format::DefaultTextFormatter;
use crate::format::TextFormatter;
use crate::message::LogMessage;
use crate::sink::Lifecycle;
use crate::sink::LogSink;
use crate::sink::SinkState;

const SINK_NAME: &str = "TextFileSink";

/// A builder to configure and create a [`TextFileSink`].
#[derive(Debug)]
pub struct TextFileSinkBuilder {
    path: PathBuf,
    indent_width: usize,
    formatter: Box<dyn TextFormatter>,
}

impl TextFileSinkBuilder {
    /// Create a new builder.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            indent_width: 4,
            formatter: Box::new(DefaultTextFormatter::default()),
        }
    }

    /// Sets the number of spaces per nesting level.
    ///
    /// Default to 4.
    pub fn indent_width(mut self, indent_width: usize) -> Self {
        self.indent_width = indent_width;
        self
    }

    /// Sets the formatter for the messages.
    ///
    /// Default to [`DefaultTextFormatter`].
    ///
    /// # Examples
    ///
    /// ```
    /// use logsink::format::ShortTextFormatter;
    /// use logsink::sink::TextFileSinkBuilder;
    ///
    /// let builder = TextFileSinkBuilder::new("my_service.log");
    /// builder.formatter(ShortTextFormatter::default());
    /// ```
    pub fn formatter(mut self, formatter: impl Into<Box<dyn TextFormatter>>) -> Self {
        self.formatter = formatter.into();
        self
    }

    /// Build the [`TextFileSink`].
    ///
    /// No file is touched until the first message is processed.
    pub fn build(self) -> TextFileSink {
        let TextFileSinkBuilder {
            path,
            indent_width,
            formatter,
        } = self;
        log::debug!(target: "logsink", "{SINK_NAME} created for {}", path.display());
        TextFileSink {
            path,
            indent_width,
            lifecycle: Lifecycle::new(SINK_NAME, formatter),
        }
    }
}

/// A sink that appends formatted messages to a text file.
///
/// The file is opened in append mode, written and closed again for every message, and created
/// if it does not exist.
///
/// Two sinks appending to the same file at the same time race between opening the file and
/// writing the line, so one of the messages may get lost. Avoid logging to one file from more
/// than one sink concurrently.
///
/// # Examples
///
/// ```no_run
/// use logsink::LogMessage;
/// use logsink::sink::LogSink;
/// use logsink::sink::TextFileSink;
///
/// let mut sink = TextFileSink::new("/var/log/my_service.log");
/// sink.process(&LogMessage::builder().text("hello").build())?;
/// sink.dispose();
/// # Ok::<(), logsink::Error>(())
/// ```
#[derive(Debug)]
pub struct TextFileSink {
    path: PathBuf,
    indent_width: usize,
    lifecycle: Lifecycle<Box<dyn TextFormatter>>,
}

impl TextFileSink {
    /// Create a sink with the default indent width and formatter.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TextFileSinkBuilder::new(path).build()
    }

    /// Create a builder for a sink writing to `path`.
    pub fn builder(path: impl Into<PathBuf>) -> TextFileSinkBuilder {
        TextFileSinkBuilder::new(path)
    }

    /// The path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The number of spaces per nesting level.
    pub fn indent_width(&self) -> usize {
        self.indent_width
    }

    /// Determines whether the directory of the log file is writable by creating and removing a
    /// probe file in it.
    ///
    /// Returns `false` and appends a line to `messages` if the directory does not exist, the
    /// probe fails, or the sink has been disposed. I/O errors are never propagated.
    pub fn is_destination_writable(&self, messages: &mut String) -> bool {
        if self.lifecycle.get().is_err() {
            // SAFETY: write to a string always succeeds
            writeln!(messages, "{SINK_NAME} for {} is disposed", self.path.display()).unwrap();
            return false;
        }

        let dir = match self.path.parent() {
            Some(dir) if dir.as_os_str().is_empty() => Path::new("."),
            Some(dir) => dir,
            None => {
                writeln!(
                    messages,
                    "log file {} has no parent directory",
                    self.path.display()
                )
                .unwrap();
                return false;
            }
        };

        match probe_dir(dir) {
            Ok(()) => true,
            Err(err) => {
                log::warn!(target: "logsink", "log directory {} is not writable: {err}", dir.display());
                writeln!(
                    messages,
                    "log directory {} is not writable: {err}",
                    dir.display()
                )
                .unwrap();
                false
            }
        }
    }
}

fn probe_dir(dir: &Path) -> io::Result<()> {
    if !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            "directory does not exist",
        ));
    }
    let probe = tempfile::Builder::new().prefix("test_").tempfile_in(dir)?;
    probe.close()
}

impl LogSink for TextFileSink {
    fn process(&mut self, message: &LogMessage) -> Result<(), Error> {
        let formatter = self.lifecycle.get()?;
        let text = formatter.format(message, self.indent_width);

        let io_error = |err: io::Error| {
            Error::from_io_error(err).with_context("path", self.path.display())
        };
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(io_error)?;
        file.write_all(text.as_bytes()).map_err(io_error)?;
        Ok(())
    }

    fn dispose(&mut self) {
        self.lifecycle.dispose();
    }

    fn state(&self) -> SinkState {
        self.lifecycle.state()
    }
}

impl Drop for TextFileSink {
    fn drop(&mut self) {
        self.dispose();
    }
}
