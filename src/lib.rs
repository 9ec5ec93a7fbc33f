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

//! Logsink persists structured log messages through interchangeable sinks.
//!
//! # Overview
//!
//! A [`LogMessage`] carries a timestamp, a [`Severity`], a text, a nesting depth used for
//! indentation, and optional structured extra data. Sinks implement [`LogSink`]:
//!
//! - [`TextFileSink`](sink::TextFileSink) appends lines rendered by a
//!   [`TextFormatter`](format::TextFormatter) to a text file.
//! - [`BinaryFileSink`](sink::BinaryFileSink) appends records in the [`binary`] format.
//!
//! Every `process` call writes synchronously on the caller's thread. A sink is open until it is
//! disposed, explicitly or on drop; afterwards it rejects messages.
//!
//! # Examples
//!
//! ```
//! use logsink::LogMessage;
//! use logsink::LogSink;
//! use logsink::Severity;
//! use logsink::format::ShortTextFormatter;
//! use logsink::sink::TextFileSink;
//!
//! let dir = tempfile::tempdir()?;
//! let mut sink = TextFileSink::builder(dir.path().join("app.log"))
//!     .indent_width(2)
//!     .formatter(ShortTextFormatter::default())
//!     .build();
//!
//! sink.process(&LogMessage::builder().text("starting").build())?;
//! sink.process(
//!     &LogMessage::builder()
//!         .severity(Severity::Debug)
//!         .text("loading config")
//!         .nesting_depth(1)
//!         .build(),
//! )?;
//! sink.dispose();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod binary;
pub mod format;
pub mod sink;

mod error;
mod message;

pub use self::error::Error;
pub use self::error::ErrorKind;
pub use self::message::ExtraDataConverter;
pub use self::message::LogMessage;
pub use self::message::LogMessageBuilder;
pub use self::message::Severity;
pub use self::message::default_extra_data_converter;
pub use self::sink::LogSink;
