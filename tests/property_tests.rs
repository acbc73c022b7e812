//! Property-based tests for alog using proptest

use alog::core::MessageFormatter;
use alog::mail::{EmailData, MessageTemplate};
use alog::prelude::*;
use alog::{Result, Strategy};
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use proptest::prelude::*;
use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Default)]
struct Capture {
    records: Arc<Mutex<Vec<String>>>,
}

impl Strategy for Capture {
    fn write(&mut self, message: &str) -> Result<usize> {
        self.records.lock().push(message.to_string());
        Ok(message.len())
    }

    fn name(&self) -> &str {
        "capture"
    }
}

fn any_severity() -> impl proptest::strategy::Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Info),
        Just(Severity::Warning),
        Just(Severity::Error),
    ]
}

// ============================================================================
// Severity Tests
// ============================================================================

proptest! {
    /// Display output parses back to the same severity, in any case
    #[test]
    fn test_severity_name_roundtrip(severity in any_severity(), upper in any::<bool>()) {
        let name = if upper {
            severity.to_string().to_uppercase()
        } else {
            severity.to_string().to_lowercase()
        };
        let parsed: Severity = name.parse().unwrap();
        prop_assert_eq!(severity, parsed);
    }

    /// Every severity has a distinct environment key
    #[test]
    fn test_severity_env_keys(a in any_severity(), b in any_severity()) {
        prop_assert_eq!(a == b, a.env_key() == b.env_key());
        prop_assert!(a.env_key().starts_with("ALOG_LOGGER_"));
    }
}

// ============================================================================
// Formatter Tests
// ============================================================================

proptest! {
    /// A record is the timestamp, the message and one trailing newline
    #[test]
    fn test_record_layout(message in "[^\n]{0,64}", secs in 0i64..4_000_000_000) {
        let time = Utc.timestamp_opt(secs, 0).unwrap();
        let formatter = MessageFormatter::new(TimestampFormat::Unix, false);
        let record = formatter.format(&time, &message, Location::caller());

        prop_assert_eq!(record, format!("{};{}\n", secs, message));
    }

    /// With caller information the location sits between timestamp and message
    #[test]
    fn test_record_layout_with_caller(message in "[^\n]{0,64}") {
        let time = Utc.timestamp_opt(0, 0).unwrap();
        let formatter = MessageFormatter::new(TimestampFormat::Unix, true);
        let caller = Location::caller();
        let record = formatter.format(&time, &message, caller);

        let expected = format!("0;{}:{};{}\n", caller.file(), caller.line(), message);
        prop_assert_eq!(record, expected);
    }
}

// ============================================================================
// Template Tests
// ============================================================================

proptest! {
    /// The default template yields exactly the record data when nothing needs escaping
    #[test]
    fn test_default_template_is_identity(data in "[^{}<>&\"']{0,64}") {
        let mut values = EmailData::new();
        values.insert("Data".to_string(), data.clone());
        prop_assert_eq!(MessageTemplate::default().render(&values), data);
    }

    /// Text without placeholders renders unchanged
    #[test]
    fn test_plain_template_unchanged(text in "[a-zA-Z0-9 .,;:]{0,64}") {
        let template = MessageTemplate::new(text.clone());
        prop_assert_eq!(template.render(&EmailData::new()), text);
    }
}

// ============================================================================
// Queue Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Records come out in the order they went in, whatever the capacity
    #[test]
    fn test_fifo_for_any_capacity(
        capacity in 1usize..16,
        messages in prop::collection::vec("[a-z]{1,12}", 0..64),
    ) {
        let capture = Capture::default();
        let log = Log::builder()
            .time_format(TimestampFormat::Custom("T".to_string()))
            .severity(Severity::Warning, SeverityConfig::new(capacity).strategy(capture.clone()))
            .build()
            .unwrap();

        for message in &messages {
            log.warning(message);
        }
        prop_assert!(log.shutdown(Duration::from_secs(5)));

        let expected: Vec<String> = messages.iter().map(|m| format!("T;{}\n", m)).collect();
        prop_assert_eq!(capture.records.lock().clone(), expected);
        let metrics = log.metrics(Severity::Warning).unwrap();
        prop_assert_eq!(metrics.enqueued(), messages.len() as u64);
        prop_assert_eq!(metrics.pending(), 0);
    }
}
