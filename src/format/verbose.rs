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
use crate::message::LogMessage;

/// A formatter that renders every field of a message with an explicit label.
///
/// Output format:
///
/// ```text
/// time=2024-08-11T22:44:57.172+00:00 severity=INFO depth=0 text="service started"
///     time=2024-08-11T22:44:57.180+00:00 severity=ERROR depth=1 text="config missing" extra="path=/etc/app.toml"
/// ```
///
/// Text and extra data are quoted with control characters escaped, so a message always takes
/// exactly one line.
///
/// # Examples
///
/// ```
/// use jiff::tz::TimeZone;
/// use logsink::format::DefaultTextFormatter;
///
/// let formatter = DefaultTextFormatter::default().timezone(TimeZone::UTC);
/// ```
#[derive(Default, Debug, Clone)]
pub struct DefaultTextFormatter {
    tz: Option<TimeZone>,
}

impl DefaultTextFormatter {
    /// Sets the timezone for timestamps.
    ///
    /// Default to the system timezone.
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.tz = Some(tz);
        self
    }
}

impl TextFormatter for DefaultTextFormatter {
    fn format(&self, message: &LogMessage, indent_width: usize) -> String {
        let tz = self.tz.clone().unwrap_or_else(TimeZone::system);
        let time = message
            .timestamp()
            .to_zoned(tz)
            .strftime("%Y-%m-%dT%H:%M:%S.%3f%:z");
        let severity = message.severity();
        let depth = message.nesting_depth();
        let body = message.text().escape_debug();

        let mut text = indent(depth, indent_width);
        // SAFETY: write to a string always succeeds
        write!(
            &mut text,
            "time={time} severity={severity} depth={depth} text=\"{body}\""
        )
        .unwrap();
        if let Some(extra) = message.extra_data_string() {
            write!(&mut text, " extra=\"{}\"", extra.escape_debug()).unwrap();
        }
        text.push('\n');
        text
    }
}
