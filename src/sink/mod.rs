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

//! Sinks persisting log messages.
//!
//! Every sink goes through the same two states: it is [`SinkState::Open`] after construction and
//! [`SinkState::Disposed`] after the first [`LogSink::dispose`]. Processing a message on a
//! disposed sink fails with [`ErrorKind::UseAfterDispose`](crate::ErrorKind::UseAfterDispose)
//! and performs no I/O.
//!
//! Sinks take `&mut self` to process messages and hold no internal lock. Callers that share a
//! sink between threads serialize access themselves, e.g. with a `Mutex`.

use std::fmt;

use crate::Error;
use crate::message::LogMessage;

mod binary_file;
mod lifecycle;
mod text_file;

pub use self::binary_file::BinaryFileSink;
pub use self::lifecycle::SinkState;
pub use self::text_file::TextFileSink;
pub use self::text_file::TextFileSinkBuilder;

pub(crate) use self::lifecycle::Lifecycle;

/// A sink that can persist log messages.
pub trait LogSink: fmt::Debug + Send + 'static {
    /// Persists a message before returning.
    ///
    /// # Errors
    ///
    /// Fails with [`ErrorKind::UseAfterDispose`](crate::ErrorKind::UseAfterDispose) if the sink
    /// has been disposed, or with [`ErrorKind::Io`](crate::ErrorKind::Io) if writing fails.
    fn process(&mut self, message: &LogMessage) -> Result<(), Error>;

    /// Releases the destination. Calling it again is a no-op.
    fn dispose(&mut self);

    /// The current lifecycle state.
    fn state(&self) -> SinkState;

    /// Whether the sink has been disposed.
    fn is_disposed(&self) -> bool {
        self.state() == SinkState::Disposed
    }
}

impl<T: LogSink> From<T> for Box<dyn LogSink> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}
