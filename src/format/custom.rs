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

use std::fmt;

use crate::format::TextFormatter;
use crate::format::indent;
use crate::format::push_indented;
use crate::message::LogMessage;

type FormatFunction = dyn Fn(&LogMessage) -> String + Send + Sync + 'static;

/// A formatter that you can pass the custom format function.
///
/// The function renders the body of the message; the indentation prefix and the trailing newline
/// are added by the formatter, so custom output nests like the built-in formatters. For example:
///
/// ```rust
/// use logsink::LogMessage;
/// use logsink::format::CustomTextFormatter;
///
/// let formatter = CustomTextFormatter::new(|message: &LogMessage| {
///     format!("[{}] {}", message.severity(), message.text())
/// });
/// ```
pub struct CustomTextFormatter {
    f: Box<FormatFunction>,
}

impl fmt::Debug for CustomTextFormatter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CustomTextFormatter {{ ... }}")
    }
}

impl CustomTextFormatter {
    pub fn new(format: impl Fn(&LogMessage) -> String + Send + Sync + 'static) -> Self {
        CustomTextFormatter {
            f: Box::new(format),
        }
    }
}

impl TextFormatter for CustomTextFormatter {
    fn format(&self, message: &LogMessage, indent_width: usize) -> String {
        let prefix = indent(message.nesting_depth(), indent_width);
        let body = (self.f)(message);
        let mut text = prefix.clone();
        push_indented(&mut text, &prefix, body.trim_end_matches('\n'));
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Severity;

    #[test]
    fn test_custom_format_is_indented() {
        let formatter = CustomTextFormatter::new(|message: &LogMessage| {
            format!("{} - {}", message.severity(), message.text())
        });
        let message = LogMessage::builder()
            .severity(Severity::Debug)
            .text("nested\nbody")
            .nesting_depth(2)
            .build();
        assert_eq!(
            formatter.format(&message, 1),
            "  DEBUG - nested\n  body\n"
        );
    }

    #[test]
    fn test_custom_format_trailing_newline_not_doubled() {
        let formatter = CustomTextFormatter::new(|message: &LogMessage| format!("{}\n", message.text()));
        let message = LogMessage::builder().text("x").build();
        assert_eq!(formatter.format(&message, 4), "x\n");
    }
}
