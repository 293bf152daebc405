//! Tokenizer for concatenated JSON record batches.
//!
//! The OFS server emits responses as zero or more JSON objects written
//! back-to-back with no separator other than each record's own closing
//! brace. One receive cycle may therefore carry several records, a partial
//! record truncated by the idle window, or garbage from a lossy decode.
//! This module splits such a batch into individual records and extracts
//! their fields, independent of any socket: given a literal text blob it
//! returns a deterministic, order-preserving sequence of [`Record`]s.
//!
//! Malformed fragments are dropped and the rest of the batch is kept. That
//! tolerance is an explicit policy — the idle-timeout framing upstream can
//! legitimately truncate the final record of a batch, and one bad record
//! must not discard its neighbours.

use std::collections::BTreeMap;

use serde_json::Value;

/// Field carrying either a bare status token or a combined `TYPE:NAME` pair.
pub const COMBINED_FIELD: &str = "param2";

/// Field carrying the owning username in listing records.
pub const OWNER_FIELD: &str = "owner";

/// Marker field present on user-listing records.
pub const USER_FIELD: &str = "user";

/// One parsed response record: an immutable mapping from field name to
/// string value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: BTreeMap<String, String>,
}

impl Record {
    /// Look up a field by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// The `owner` field of a listing record, if present.
    #[must_use]
    pub fn owner(&self) -> Option<&str> { self.get(OWNER_FIELD) }

    /// Derive a directory entry from this record's combined `TYPE:NAME`
    /// field.
    ///
    /// The value is split on the FIRST colon only, because names may
    /// legitimately contain colons. Records whose type tag is neither `F`
    /// nor `D` carry no entry and are excluded from derived listings.
    #[must_use]
    pub fn dir_entry(&self) -> Option<DirEntry> {
        let combined = self.get(COMBINED_FIELD)?;
        let (tag, name) = combined.split_once(':')?;
        let kind = EntryKind::from_tag(tag)?;
        Some(DirEntry {
            name: name.to_owned(),
            kind,
        })
    }

    /// Number of fields in the record.
    #[must_use]
    pub fn len(&self) -> usize { self.fields.len() }

    /// Whether the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.fields.is_empty() }
}

/// Kind of a directory entry as tagged by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file (`F` tag).
    File,
    /// Directory (`D` tag).
    Dir,
}

impl EntryKind {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "F" => Some(Self::File),
            "D" => Some(Self::Dir),
            _ => None,
        }
    }
}

/// Derived view of a listing record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Entry name relative to the listed directory.
    pub name: String,
    /// File or directory.
    pub kind: EntryKind,
}

/// Split a raw batch into records, preserving arrival order.
///
/// The batch is scanned for balanced top-level `{…}` fragments, tracking
/// string literals and escapes so braces inside field values do not
/// terminate a fragment early. Each fragment is decoded as a JSON object;
/// fragments that fail to decode (truncated tail of a batch, replacement
/// characters from a lossy decode) are dropped.
#[must_use]
pub fn parse_records(text: &str) -> Vec<Record> {
    let mut records = Vec::new();
    for fragment in split_fragments(text) {
        match parse_fragment(fragment) {
            Some(record) => records.push(record),
            None => log::trace!("dropping malformed response fragment: {fragment:?}"),
        }
    }
    records
}

/// Derive the directory listing carried by a slice of records.
///
/// Ordering is whatever the server emitted; records without a usable
/// `TYPE:NAME` field contribute nothing.
#[must_use]
pub fn dir_entries(records: &[Record]) -> Vec<DirEntry> {
    records.iter().filter_map(Record::dir_entry).collect()
}

/// Scan for balanced top-level brace fragments.
fn split_fragments(text: &str) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut start = None;
    let mut depth = 0_usize;
    let mut in_string = false;
    let mut escaped = false;
    for (index, ch) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(index);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(begin) = start.take() {
                        fragments.push(&text[begin..=index]);
                    }
                }
            }
            _ => {}
        }
    }
    fragments
}

fn parse_fragment(fragment: &str) -> Option<Record> {
    let object: serde_json::Map<String, Value> = serde_json::from_str(fragment).ok()?;
    let fields = object
        .into_iter()
        .map(|(name, value)| {
            let rendered = match value {
                Value::String(text) => text,
                other => other.to_string(),
            };
            (name, rendered)
        })
        .collect();
    Some(Record { fields })
}
