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

//! Formatters rendering log messages as text.
//!
//! Every formatter prefixes the rendered line with `nesting_depth * indent_width` spaces, and
//! ends it with a single newline. Continuation lines of a multi-line message carry the same
//! prefix.

use std::fmt;

use crate::message::LogMessage;

mod custom;
mod short;
mod verbose;

pub use self::custom::CustomTextFormatter;
pub use self::short::ShortTextFormatter;
pub use self::verbose::DefaultTextFormatter;

/// A formatter turning a log message into an indented block of text.
///
/// Formatters are stateless and can be shared between sinks.
pub trait TextFormatter: fmt::Debug + Send + Sync + 'static {
    /// Formats a message, indenting it by `indent_width` spaces per nesting level.
    fn format(&self, message: &LogMessage, indent_width: usize) -> String;
}

impl<T: TextFormatter> From<T> for Box<dyn TextFormatter> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}

/// The whitespace prefix for a message at `nesting_depth`.
pub fn indent(nesting_depth: u32, indent_width: usize) -> String {
    let depth = usize::try_from(nesting_depth).unwrap_or(usize::MAX);
    " ".repeat(depth.saturating_mul(indent_width))
}

// Appends `body` to `out` with `prefix` in front of every continuation line, then terminates the
// block with a newline.
pub(crate) fn push_indented(out: &mut String, prefix: &str, body: &str) {
    let mut lines = body.split('\n');
    if let Some(first) = lines.next() {
        out.push_str(first);
    }
    for line in lines {
        out.push('\n');
        out.push_str(prefix);
        out.push_str(line);
    }
    out.push('\n');
}
