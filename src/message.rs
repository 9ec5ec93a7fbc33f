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

//! Log message and severity.

use std::fmt;
use std::sync::Arc;

use jiff::Timestamp;
use serde_json::Value;

use crate::Error;
use crate::ErrorKind;

/// A function turning the structured extra data of a message into a string.
pub type ExtraDataConverter = Arc<dyn Fn(&Value) -> String + Send + Sync + 'static>;

/// The default [`ExtraDataConverter`].
///
/// JSON strings are rendered without quotes, every other value as compact JSON.
pub fn default_extra_data_converter(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// An enum representing the severities of a log message.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum Severity {
    /// The "trace" severity.
    ///
    /// Designates very low priority, often extremely verbose, information.
    Trace = 0,
    /// The "debug" severity.
    Debug = 1,
    /// The "info" severity.
    ///
    /// Designates useful information.
    Info = 2,
    /// The "warn" severity.
    Warn = 3,
    /// The "error" severity.
    Error = 4,
    /// The "fatal" severity.
    ///
    /// Designates errors after which the application cannot continue.
    Fatal = 5,
}

impl Severity {
    /// Return the string representation of the `Severity`.
    ///
    /// This returns the same string as the `fmt::Display` implementation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    /// The byte-sized ordinal stored in binary logs.
    pub fn ordinal(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl TryFrom<u8> for Severity {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        match value {
            0 => Ok(Severity::Trace),
            1 => Ok(Severity::Debug),
            2 => Ok(Severity::Info),
            3 => Ok(Severity::Warn),
            4 => Ok(Severity::Error),
            5 => Ok(Severity::Fatal),
            _ => Err(Error::new(ErrorKind::Decode, "unknown severity ordinal")
                .with_context("ordinal", value)),
        }
    }
}

impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::Error,
            log::Level::Warn => Self::Warn,
            log::Level::Info => Self::Info,
            log::Level::Debug => Self::Debug,
            log::Level::Trace => Self::Trace,
        }
    }
}

#[derive(Clone)]
struct ExtraData {
    value: Value,
    converter: ExtraDataConverter,
}

impl fmt::Debug for ExtraData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtraData")
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

/// A structured log message.
///
/// Messages are immutable once built; construct them with [`LogMessageBuilder`].
#[derive(Clone, Debug)]
pub struct LogMessage {
    timestamp: Timestamp,
    severity: Severity,
    text: String,
    nesting_depth: u32,
    extra_data: Option<ExtraData>,
}

impl LogMessage {
    /// Create a builder with the current time, [`Severity::Info`], empty text, depth zero and
    /// no extra data.
    pub fn builder() -> LogMessageBuilder {
        LogMessageBuilder::default()
    }

    /// The point in time the message was created.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// The severity of the message.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// The message body.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The logical indentation level of the message.
    pub fn nesting_depth(&self) -> u32 {
        self.nesting_depth
    }

    /// The structured extra data, if any.
    pub fn extra_data(&self) -> Option<&Value> {
        self.extra_data.as_ref().map(|extra| &extra.value)
    }

    /// The extra data converted to a string with the message's converter.
    ///
    /// Returns `None` if and only if the message carries no extra data.
    pub fn extra_data_string(&self) -> Option<String> {
        self.extra_data
            .as_ref()
            .map(|extra| (extra.converter)(&extra.value))
    }

    /// Convert a [`log::Record`] into a message at the given nesting depth.
    ///
    /// Key-values of the record become a JSON object in the extra data.
    pub fn from_log_record(record: &log::Record, nesting_depth: u32) -> LogMessage {
        let mut visitor = KvCollector::default();
        if let Err(err) = record.key_values().visit(&mut visitor) {
            log::warn!(target: "logsink", "failed to collect key-values of a log record: {err}");
        }

        let mut builder = LogMessageBuilder::default()
            .severity(record.level().into())
            .text(record.args().to_string())
            .nesting_depth(nesting_depth);
        if !visitor.kvs.is_empty() {
            builder = builder.extra_data(Value::Object(visitor.kvs));
        }
        builder.build()
    }
}

#[derive(Default)]
struct KvCollector {
    kvs: serde_json::Map<String, Value>,
}

impl<'kvs> log::kv::VisitSource<'kvs> for KvCollector {
    fn visit_pair(
        &mut self,
        key: log::kv::Key<'kvs>,
        value: log::kv::Value<'kvs>,
    ) -> Result<(), log::kv::Error> {
        self.kvs
            .insert(key.as_str().to_string(), Value::String(value.to_string()));
        Ok(())
    }
}

/// Builder for [`LogMessage`].
pub struct LogMessageBuilder {
    message: LogMessage,
    converter: Option<ExtraDataConverter>,
}

impl Default for LogMessageBuilder {
    fn default() -> Self {
        LogMessageBuilder {
            message: LogMessage {
                timestamp: Timestamp::now(),
                severity: Severity::Info,
                text: String::new(),
                nesting_depth: 0,
                extra_data: None,
            },
            converter: None,
        }
    }
}

impl LogMessageBuilder {
    /// Set [`timestamp`](LogMessage::timestamp).
    pub fn timestamp(mut self, timestamp: Timestamp) -> Self {
        self.message.timestamp = timestamp;
        self
    }

    /// Set [`severity`](LogMessage::severity).
    pub fn severity(mut self, severity: Severity) -> Self {
        self.message.severity = severity;
        self
    }

    /// Set [`text`](LogMessage::text).
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.message.text = text.into();
        self
    }

    /// Set [`nesting_depth`](LogMessage::nesting_depth).
    pub fn nesting_depth(mut self, depth: u32) -> Self {
        self.message.nesting_depth = depth;
        self
    }

    /// Attach structured extra data.
    pub fn extra_data(mut self, value: impl Into<Value>) -> Self {
        self.message.extra_data = Some(ExtraData {
            value: value.into(),
            converter: Arc::new(default_extra_data_converter),
        });
        self
    }

    /// Set the function used to turn the extra data into a string.
    ///
    /// Default to [`default_extra_data_converter`].
    pub fn extra_data_converter(
        mut self,
        converter: impl Fn(&Value) -> String + Send + Sync + 'static,
    ) -> Self {
        self.converter = Some(Arc::new(converter));
        self
    }

    /// Invoke the builder and return a `LogMessage`.
    pub fn build(self) -> LogMessage {
        let LogMessageBuilder {
            mut message,
            converter,
        } = self;
        if let (Some(extra), Some(converter)) = (message.extra_data.as_mut(), converter) {
            extra.converter = converter;
        }
        message
    }
}

impl fmt::Debug for LogMessageBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogMessageBuilder")
            .field("message", &self.message)
            .field("converter", &self.converter.as_ref().map(|_| ".."))
            .finish()
    }
}
