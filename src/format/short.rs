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

use std::fmt::Write;

use jiff::tz::TimeZone;

use crate::format::TextFormatter;
use crate::format::indent;
use crate::format::push_indented;
use crate::message::LogMessage;

/// A formatter that renders a message as one compact line.
///
/// Output format:
///
/// ```text
/// 2024-08-11 22:44:57.172 INFO  service started
///     2024-08-11 22:44:57.173 DEBUG loading config
///     2024-08-11 22:44:57.180 ERROR config missing path=/etc/app.toml
/// ```
///
/// The extra data string, if any, follows the text separated by a space.
///
/// # Examples
///
/// ```
/// use jiff::tz::TimeZone;
/// use logsink::format::ShortTextFormatter;
///
/// let formatter = ShortTextFormatter::default().timezone(TimeZone::UTC);
/// ```
#[derive(Default, Debug, Clone)]
pub struct ShortTextFormatter {
    tz: Option<TimeZone>,
}

impl ShortTextFormatter {
    /// Sets the timezone for timestamps.
    ///
    /// Default to the system timezone.
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.tz = Some(tz);
        self
    }
}

impl TextFormatter for ShortTextFormatter {
    fn format(&self, message: &LogMessage, indent_width: usize) -> String {
        let prefix = indent(message.nesting_depth(), indent_width);
        let tz = self.tz.clone().unwrap_or_else(TimeZone::system);
        let time = message
            .timestamp()
            .to_zoned(tz)
            .strftime("%Y-%m-%d %H:%M:%S.%3f");
        let severity = message.severity();

        let mut text = prefix.clone();
        // SAFETY: write to a string always succeeds
        write!(&mut text, "{time} {severity:<5} ").unwrap();

        let mut body = message.text().to_string();
        if let Some(extra) = message.extra_data_string() {
            body.push(' ');
            body.push_str(&extra);
        }
        push_indented(&mut text, &prefix, &body);
        text
    }
}
