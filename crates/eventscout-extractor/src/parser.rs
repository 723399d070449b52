//! Parse model answers into event entries
//!
//! The model is asked for one of two shapes:
//!
//! ```text
//! ***N/A***
//! (explanation)
//! ```
//!
//! or any number of blocks like
//!
//! ```text
//! Specification section: 'SWS_CryptoDriver'
//! System event: 'name of the event'
//! Suggested log: 'context variables'
//! Rationale: 'why'
//! ```
//!
//! Parsing is lenient. Nothing here returns an error: missing fields become
//! [`NOT_AVAILABLE`], blocks without any `key: value` line are dropped, and
//! text before the first block is ignored.

use eventscout_domain::{
    EventEntry, EventRecord, NoEventRecord, NOT_AVAILABLE, RATIONALE_KEY, SECTION_KEY,
    SUGGESTED_LOG_KEY, SYSTEM_EVENT_KEY,
};
use serde_json::{Map, Value};

/// First line of an answer meaning "no new events"
pub const NO_EVENTS_SENTINEL: &str = "***N/A***";

/// Label that opens every event block
pub const BLOCK_LABEL: &str = "Specification section:";

/// Parse a model answer
///
/// Returns a single no-event entry, or one event entry per non-empty block
/// in the order they appear.
///
/// # Examples
///
/// ```
/// use eventscout_extractor::parse_response;
///
/// let entries = parse_response("***N/A***\nAlready covered by existing events.");
/// assert_eq!(entries.len(), 1);
/// assert!(entries[0].is_no_events());
/// ```
pub fn parse_response(response: &str) -> Vec<EventEntry> {
    if let Some(explanation) = no_events_explanation(response) {
        return vec![NoEventRecord::new(explanation).into()];
    }

    let mut parser = BlockParser::default();
    for line in response.lines() {
        parser.feed_line(line);
    }
    parser.finish()
}

/// The explanation, if the first non-empty line is the sentinel
fn no_events_explanation(response: &str) -> Option<String> {
    let mut lines = response.trim().lines();
    if lines.next()?.trim() != NO_EVENTS_SENTINEL {
        return None;
    }
    let explanation = lines.map(str::trim).collect::<Vec<_>>().join("\n");
    Some(explanation.trim().to_string())
}

fn clean_value(value: &str) -> &str {
    value.trim().trim_matches('\'')
}

#[derive(Debug, Default)]
struct Block {
    section: Option<String>,
    fields: Map<String, Value>,
}

impl Block {
    /// The text after the label is the block's first line. Without a colon
    /// it only names the section.
    fn opened_with(label_text: &str) -> Self {
        let mut block = Self::default();
        if label_text.contains(':') {
            block.add_line(label_text);
        } else {
            let section = clean_value(label_text);
            block.section = (!section.is_empty()).then(|| section.to_string());
        }
        block
    }

    fn add_line(&mut self, line: &str) {
        if let Some((key, value)) = line.split_once(':') {
            // Later duplicates win, in the position of the first
            self.fields.insert(
                key.trim().to_string(),
                Value::String(clean_value(value).to_string()),
            );
        }
    }

    fn into_entry(self) -> Option<EventEntry> {
        if self.fields.is_empty() {
            return None;
        }

        let mut fields = Map::new();
        if let Some(section) = self.section {
            if !self.fields.contains_key(SECTION_KEY) {
                fields.insert(SECTION_KEY.to_string(), Value::String(section));
            }
        }
        fields.extend(self.fields);
        for key in [SYSTEM_EVENT_KEY, SUGGESTED_LOG_KEY, RATIONALE_KEY] {
            fields
                .entry(key)
                .or_insert_with(|| Value::String(NOT_AVAILABLE.to_string()));
        }

        Some(EventRecord::from_fields(fields).into())
    }
}

#[derive(Debug, Default)]
enum State {
    #[default]
    ScanningPreamble,
    InBlock(Block),
}

/// Line-at-a-time tokenizer over the block format
#[derive(Debug, Default)]
struct BlockParser {
    state: State,
    entries: Vec<EventEntry>,
}

impl BlockParser {
    fn feed_line(&mut self, line: &str) {
        let mut rest = line;
        while let Some(pos) = rest.find(BLOCK_LABEL) {
            self.feed_text(&rest[..pos]);

            // The section name runs to the end of the line or the next label
            let after = &rest[pos + BLOCK_LABEL.len()..];
            let end = after.find(BLOCK_LABEL).unwrap_or(after.len());
            self.open_block(&after[..end]);
            rest = &after[end..];
        }
        self.feed_text(rest);
    }

    fn feed_text(&mut self, text: &str) {
        match &mut self.state {
            State::ScanningPreamble => {}
            State::InBlock(block) => block.add_line(text),
        }
    }

    fn open_block(&mut self, label_text: &str) {
        self.close_block();
        self.state = State::InBlock(Block::opened_with(label_text));
    }

    fn close_block(&mut self) {
        if let State::InBlock(block) = std::mem::take(&mut self.state) {
            self.entries.extend(block.into_entry());
        }
    }

    fn finish(mut self) -> Vec<EventEntry> {
        self.close_block();
        self.entries
    }
}
