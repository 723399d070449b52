//! Record module - what gets persisted for each processed document
//!
//! The JSON field names used here are read by existing consumers of the
//! master file, so every `rename` below is part of the on-disk format.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Sentinel stored for any event field the model did not provide
pub const NOT_AVAILABLE: &str = "N/A";

/// Key of the section an event refers to
pub const SECTION_KEY: &str = "Specification section";

/// Key of the suggested event name
pub const SYSTEM_EVENT_KEY: &str = "System event";

/// Key of the context variables to log
pub const SUGGESTED_LOG_KEY: &str = "Suggested log";

/// Key of the reason behind a suggestion
pub const RATIONALE_KEY: &str = "Rationale";

/// Format a local time the way `processed_at` has always been written:
/// seconds precision when the microseconds are zero, six digits otherwise.
pub fn format_processed_at(time: NaiveDateTime) -> String {
    let micros = (time.nanosecond() % 1_000_000_000) / 1_000;
    let seconds = time.format("%Y-%m-%dT%H:%M:%S");
    if micros == 0 {
        seconds.to_string()
    } else {
        format!("{}.{:06}", seconds, micros)
    }
}

/// One suggested new security-event log
///
/// Stored as the JSON object the parser built, keys in their original order.
/// Records loaded from an existing master file are kept exactly as found, so
/// a missing field is only filled in with [`NOT_AVAILABLE`] when it is read
/// through one of the accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventRecord {
    fields: Map<String, Value>,
}

impl EventRecord {
    /// Create an event record with the three reported fields
    pub fn new(
        system_event: impl Into<String>,
        suggested_log: impl Into<String>,
        rationale: impl Into<String>,
    ) -> Self {
        let mut fields = Map::new();
        fields.insert(SYSTEM_EVENT_KEY.to_string(), Value::String(system_event.into()));
        fields.insert(SUGGESTED_LOG_KEY.to_string(), Value::String(suggested_log.into()));
        fields.insert(RATIONALE_KEY.to_string(), Value::String(rationale.into()));
        Self { fields }
    }

    /// Wrap an already ordered set of fields
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Set the specification section the event refers to, as the first key
    pub fn with_section(self, section: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(SECTION_KEY.to_string(), Value::String(section.into()));
        for (key, value) in self.fields {
            if key != SECTION_KEY {
                fields.insert(key, value);
            }
        }
        Self { fields }
    }

    /// Section of the source document, if one was recorded
    pub fn specification_section(&self) -> Option<&str> {
        self.fields.get(SECTION_KEY).and_then(Value::as_str)
    }

    /// Name of the suggested event
    pub fn system_event(&self) -> Cow<'_, str> {
        self.text(SYSTEM_EVENT_KEY)
    }

    /// Context variables to add to the log entry
    pub fn suggested_log(&self) -> Cow<'_, str> {
        self.text(SUGGESTED_LOG_KEY)
    }

    /// Why the event is worth logging
    pub fn rationale(&self) -> Cow<'_, str> {
        self.text(RATIONALE_KEY)
    }

    /// Raw value of any key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// All keys in stored order
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Text of a field, [`NOT_AVAILABLE`] when absent
    fn text(&self, key: &str) -> Cow<'_, str> {
        match self.fields.get(key) {
            None => Cow::Borrowed(NOT_AVAILABLE),
            Some(Value::String(text)) => Cow::Borrowed(text),
            Some(Value::Null) => Cow::Borrowed(""),
            Some(other) => Cow::Owned(other.to_string()),
        }
    }
}

/// Status marker of a [`NoEventRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoEventStatus {
    /// Serialized as `"no_events"`
    #[serde(rename = "no_events")]
    NoEvents,
}

/// Marker result: the model judged that no new events are relevant
///
/// Only the exact two-key shape is read back as a marker. Anything else is
/// kept verbatim as an [`EventRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoEventRecord {
    /// Always [`NoEventStatus::NoEvents`]
    pub status: NoEventStatus,

    /// The model's reasoning
    pub explanation: String,
}

impl NoEventRecord {
    /// Create a no-event record with the given explanation
    pub fn new(explanation: impl Into<String>) -> Self {
        Self {
            status: NoEventStatus::NoEvents,
            explanation: explanation.into(),
        }
    }
}

/// One entry of an analysis record's `events` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventEntry {
    /// `{"status": "no_events", "explanation": ...}`
    NoEvents(NoEventRecord),

    /// A suggested event. Any object without the no-events marker lands here.
    Event(EventRecord),
}

impl EventEntry {
    /// Whether this entry carries the no-events marker
    pub fn is_no_events(&self) -> bool {
        matches!(self, EventEntry::NoEvents(_))
    }
}

impl From<EventRecord> for EventEntry {
    fn from(record: EventRecord) -> Self {
        EventEntry::Event(record)
    }
}

impl From<NoEventRecord> for EventEntry {
    fn from(record: NoEventRecord) -> Self {
        EventEntry::NoEvents(record)
    }
}

/// Persisted outcome of processing one source document
///
/// Created once per document on its first successful processing and never
/// modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// ISO-8601 local timestamp of when the document was processed
    pub processed_at: String,

    /// File name of the source document
    #[serde(rename = "pdf_file")]
    pub document_name: String,

    /// Number of entries in `events` at creation time
    #[serde(rename = "num_events")]
    pub event_count: usize,

    /// Parsed model output
    pub events: Vec<EventEntry>,
}

impl AnalysisRecord {
    /// Create a record stamped with the current local time
    ///
    /// # Examples
    ///
    /// ```
    /// use eventscout_domain::{AnalysisRecord, EventEntry, NoEventRecord};
    ///
    /// let record = AnalysisRecord::new(
    ///     "SWS_Crypto.pdf",
    ///     vec![EventEntry::from(NoEventRecord::new("nothing new"))],
    /// );
    /// assert_eq!(record.event_count, 1);
    /// assert!(record.is_no_events());
    /// ```
    pub fn new(document_name: impl Into<String>, events: Vec<EventEntry>) -> Self {
        let processed_at = format_processed_at(chrono::Local::now().naive_local());
        Self::with_timestamp(processed_at, document_name, events)
    }

    /// Create a record with an explicit timestamp
    pub fn with_timestamp(
        processed_at: impl Into<String>,
        document_name: impl Into<String>,
        events: Vec<EventEntry>,
    ) -> Self {
        Self {
            processed_at: processed_at.into(),
            document_name: document_name.into(),
            event_count: events.len(),
            events,
        }
    }

    /// Whether the first entry is a no-events marker
    pub fn is_no_events(&self) -> bool {
        self.events.first().is_some_and(EventEntry::is_no_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_record_field_names() {
        let record = EventRecord::new("Key rotation failed", "keyId, reason", "Detects tampering")
            .with_section("SWS_CryptoDriver");
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(
            value,
            json!({
                "Specification section": "SWS_CryptoDriver",
                "System event": "Key rotation failed",
                "Suggested log": "keyId, reason",
                "Rationale": "Detects tampering"
            })
        );
    }

    #[test]
    fn test_event_record_missing_fields_read_as_sentinel() {
        let record: EventRecord = serde_json::from_value(json!({"System event": "Boot"})).unwrap();
        assert_eq!(record.system_event(), "Boot");
        assert_eq!(record.suggested_log(), NOT_AVAILABLE);
        assert_eq!(record.rationale(), NOT_AVAILABLE);
        assert!(record.specification_section().is_none());

        // Reading a default does not store it
        assert_eq!(serde_json::to_value(&record).unwrap(), json!({"System event": "Boot"}));
    }

    #[test]
    fn test_event_record_keeps_keys_and_order() {
        let input = r#"{"Severity":"high","Suggested log":"ecuId","System event":"Boot","Count":3}"#;
        let record: EventRecord = serde_json::from_str(input).unwrap();
        assert_eq!(record.get("Severity"), Some(&json!("high")));
        assert_eq!(serde_json::to_string(&record).unwrap(), input);
    }

    #[test]
    fn test_non_string_fields_are_rendered() {
        let record: EventRecord =
            serde_json::from_value(json!({"System event": 42, "Rationale": null})).unwrap();
        assert_eq!(record.system_event(), "42");
        assert_eq!(record.rationale(), "");
    }

    #[test]
    fn test_with_section_goes_first() {
        let record = EventRecord::new("e", "l", "r").with_section("S");
        let keys: Vec<&str> = record.fields().keys().map(String::as_str).collect();
        assert_eq!(keys, [SECTION_KEY, SYSTEM_EVENT_KEY, SUGGESTED_LOG_KEY, RATIONALE_KEY]);
    }

    #[test]
    fn test_entry_untagged_dispatch() {
        let no_events: EventEntry =
            serde_json::from_value(json!({"status": "no_events", "explanation": "none"})).unwrap();
        assert!(no_events.is_no_events());

        let event: EventEntry = serde_json::from_value(json!({"System event": "x"})).unwrap();
        assert!(!event.is_no_events());

        // A foreign status value is just another event key
        let other: EventEntry = serde_json::from_value(json!({"status": "maybe"})).unwrap();
        assert!(!other.is_no_events());

        // So is a marker with extra keys, which then survives a rewrite unchanged
        let input = json!({"status": "no_events", "explanation": "x", "note": "y"});
        let extended: EventEntry = serde_json::from_value(input.clone()).unwrap();
        assert!(!extended.is_no_events());
        assert_eq!(serde_json::to_value(&extended).unwrap(), input);
    }

    #[test]
    fn test_analysis_record_wire_format() {
        let record = AnalysisRecord::with_timestamp(
            "2025-11-20T10:00:00.000001",
            "a.pdf",
            vec![NoEventRecord::new("nothing").into()],
        );
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(
            value,
            json!({
                "processed_at": "2025-11-20T10:00:00.000001",
                "pdf_file": "a.pdf",
                "num_events": 1,
                "events": [{"status": "no_events", "explanation": "nothing"}]
            })
        );
    }

    #[test]
    fn test_processed_at_format() {
        let date = chrono::NaiveDate::from_ymd_opt(2025, 11, 2).unwrap();
        let whole = date.and_hms_micro_opt(9, 0, 0, 0).unwrap();
        let fractional = date.and_hms_micro_opt(9, 0, 0, 1_250).unwrap();

        assert_eq!(format_processed_at(whole), "2025-11-02T09:00:00");
        assert_eq!(format_processed_at(fractional), "2025-11-02T09:00:00.001250");
    }

    #[test]
    fn test_analysis_record_timestamp_shape() {
        let record = AnalysisRecord::new("a.pdf", Vec::new());
        // 2025-11-20T10:00:00.123456, or without the fraction on a whole second
        assert!(record.processed_at.len() == 26 || record.processed_at.len() == 19);
        assert_eq!(&record.processed_at[10..11], "T");
        assert_eq!(record.event_count, 0);
        assert!(!record.is_no_events());
    }

    #[test]
    fn test_is_no_events_only_checks_first_entry() {
        let record = AnalysisRecord::with_timestamp(
            "t",
            "a.pdf",
            vec![EventRecord::default().into(), NoEventRecord::new("x").into()],
        );
        assert!(!record.is_no_events());
    }
}
