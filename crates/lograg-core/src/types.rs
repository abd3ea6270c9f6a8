//! Domain types shared by extraction, ingestion and retrieval.

use serde::ser::{Serialize, SerializeMap, Serializer};

pub type Embedding = Vec<f32>;

/// Structured fields extracted from one log line.
///
/// Field order follows rule order. A name appears at most once: the first
/// value recorded under a name wins. An empty record is valid and simply
/// means no rule matched the line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self { Self::default() }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool { self.get(name).is_some() }

    pub fn len(&self) -> usize { self.fields.len() }

    pub fn is_empty(&self) -> bool { self.fields.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub(crate) fn insert_if_absent(&mut self, name: &str, value: &str) -> bool {
        if self.contains(name) { return false; }
        self.fields.push((name.to_string(), value.to_string()));
        true
    }
}

impl<N: AsRef<str>, V: AsRef<str>> FromIterator<(N, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (name, value) in iter { record.insert_if_absent(name.as_ref(), value.as_ref()); }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields { map.serialize_entry(name, value)?; }
        map.end()
    }
}

/// What is retained about a line once it has been embedded.
///
/// - `line_number`: 1-based physical line in the source
/// - `text`: the raw line, also the text that was embedded
/// - `fields`: the extracted record
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Metadata {
    pub line_number: usize,
    pub text: String,
    pub fields: Record,
}

/// A stored (embedding, metadata) pair. Entries are append-only.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorEntry {
    pub vector: Embedding,
    pub metadata: Metadata,
}
