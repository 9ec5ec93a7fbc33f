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

use std::fs;

use jiff::Timestamp;
use jiff::tz::TimeZone;
use logsink::ErrorKind;
use logsink::LogMessage;
use logsink::LogSink;
use logsink::Severity;
use logsink::format::DefaultTextFormatter;
use logsink::format::ShortTextFormatter;
use logsink::format::TextFormatter;
use logsink::format::indent;
use logsink::sink::BinaryFileSink;
use logsink::sink::SinkState;
use logsink::sink::TextFileSink;
use tempfile::TempDir;

#[derive(Debug)]
struct TaggedFormatter(&'static str);

impl TextFormatter for TaggedFormatter {
    fn format(&self, message: &LogMessage, indent_width: usize) -> String {
        let prefix = indent(message.nesting_depth(), indent_width);
        format!("{prefix}{} [{}] {}\n", self.0, message.severity(), message.text())
    }
}

fn message(depth: u32) -> LogMessage {
    LogMessage::builder()
        .timestamp(Timestamp::from_millisecond(1_723_416_297_172).unwrap())
        .severity(Severity::Warn)
        .text("disk almost full")
        .nesting_depth(depth)
        .build()
}

#[test]
fn test_short_formatter_nested_line() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let path = temp_dir.path().join("app.log");

    let mut sink = TextFileSink::builder(&path)
        .indent_width(4)
        .formatter(ShortTextFormatter::default().timezone(TimeZone::UTC))
        .build();
    sink.process(&message(2)).unwrap();
    sink.dispose();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("        2024-08-11"));
    assert!(!content.starts_with("         "));
    assert!(content.ends_with("WARN  disk almost full\n"));
}

#[test]
fn test_custom_formatter() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let path = temp_dir.path().join("app.log");

    let mut sink = TextFileSink::builder(&path)
        .indent_width(3)
        .formatter(TaggedFormatter("file"))
        .build();
    for depth in 0..3 {
        sink.process(&message(depth)).unwrap();
    }
    drop(sink);

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(
        content,
        "file [WARN] disk almost full\n   file [WARN] disk almost full\n      file [WARN] disk almost full\n"
    );
}

#[test]
fn test_indentation_matches_depth() {
    let formatters: Vec<Box<dyn TextFormatter>> = vec![
        ShortTextFormatter::default().timezone(TimeZone::UTC).into(),
        DefaultTextFormatter::default().timezone(TimeZone::UTC).into(),
        TaggedFormatter("x").into(),
    ];
    for formatter in &formatters {
        for width in [0, 1, 4] {
            for depth in [0, 1, 5] {
                let line = formatter.format(&message(depth), width);
                let leading = line.len() - line.trim_start_matches(' ').len();
                assert_eq!(leading, depth as usize * width, "{formatter:?}");
                assert_eq!(line, formatter.format(&message(depth), width));
            }
        }
    }
}

#[test]
fn test_log_record_bridge() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let path = temp_dir.path().join("app.log");

    let kvs = [("attempt", 3)];
    let record = log::Record::builder()
        .level(log::Level::Error)
        .args(format_args!("connect failed"))
        .key_values(&kvs)
        .build();

    let mut sink = TextFileSink::new(&path);
    sink.process(&LogMessage::from_log_record(&record, 1)).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("    time="));
    assert!(content.contains(r#"severity=ERROR depth=1 text="connect failed""#));
    assert!(content.contains(r#"extra="{\"attempt\":\"3\"}""#));
}

#[test]
fn test_every_sink_rejects_use_after_dispose() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let text_path = temp_dir.path().join("app.log");
    let binary_path = temp_dir.path().join("app.bin");

    let sinks: Vec<Box<dyn LogSink>> = vec![
        TextFileSink::new(&text_path).into(),
        BinaryFileSink::open(&binary_path).unwrap().into(),
    ];
    for mut sink in sinks {
        assert_eq!(sink.state(), SinkState::Open);
        sink.dispose();
        sink.dispose();
        assert_eq!(sink.state(), SinkState::Disposed);

        for _ in 0..2 {
            let err = sink.process(&message(0)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UseAfterDispose);
        }
    }

    assert!(!text_path.exists());
    assert_eq!(fs::metadata(&binary_path).unwrap().len(), 0);
}
