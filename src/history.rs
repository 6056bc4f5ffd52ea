//! Serialization of visualizer state into navigable history entries and
//! back into form values.

use crate::config::{BASIC_FIELD, CUTOFF_FIELD};
use crate::error::{Result, VisualizerError};
use crate::state::VisualizationState;
use serde::{Deserialize, Serialize};

/// A value recorded under one name: a scalar, or a sequence for fields
/// that submit several values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    Multiple(Vec<String>),
}

impl FieldValue {
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            FieldValue::Single(value) => std::slice::from_ref(value),
            FieldValue::Multiple(values) => values,
        };
        slice.iter().map(String::as_str)
    }

    pub fn first(&self) -> Option<&str> {
        self.values().next()
    }

    pub fn contains(&self, candidate: &str) -> bool {
        self.values().any(|value| value == candidate)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPair {
    pub name: String,
    pub value: FieldValue,
}

impl FieldPair {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FieldValue::Single(value.into()),
        }
    }
}

/// Ordered `(name, value)` pairs stored with a history entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistorySnapshot {
    pairs: Vec<FieldPair>,
}

impl HistorySnapshot {
    pub fn from_pairs(pairs: Vec<FieldPair>) -> Self {
        Self { pairs }
    }

    pub fn pairs(&self) -> &[FieldPair] {
        &self.pairs
    }

    /// `?name=value&...` with percent-encoded values; a multi-valued pair
    /// repeats its name.
    pub fn query_string(&self) -> String {
        let parts: Vec<String> = self
            .pairs
            .iter()
            .flat_map(|pair| {
                pair.value
                    .values()
                    .map(move |value| format!("{}={}", pair.name, urlencoding::encode(value)))
            })
            .collect();
        format!("?{}", parts.join("&"))
    }

    /// Parse a query string (with or without the leading `?`).
    pub fn from_query(query: &str) -> Result<Self> {
        let trimmed = query.strip_prefix('?').unwrap_or(query);
        let pairs = trimmed
            .split('&')
            .filter(|part| !part.is_empty())
            .map(|part| {
                let (name, value) = part.split_once('=').unwrap_or((part, ""));
                let value = value.replace('+', " ");
                let name = urlencoding::decode(name)
                    .map_err(|e| VisualizerError::History(format!("{}: {}", name, e)))?;
                let value = urlencoding::decode(&value)
                    .map_err(|e| VisualizerError::History(format!("{}: {}", value, e)))?;
                Ok(FieldPair::new(name.into_owned(), value.into_owned()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { pairs })
    }
}

/// A snapshot paired with the URL shown for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub snapshot: HistorySnapshot,
    pub url: String,
}

/// Serialize the state after the ambient form fields.
///
/// Only enabled filters are written; an identifier missing from the entry
/// means its basic was excluded.
pub fn encode(state: &VisualizationState, ambient: &[FieldPair]) -> HistoryEntry {
    let mut pairs = ambient.to_vec();
    pairs.push(FieldPair::new(CUTOFF_FIELD, state.cutoff().to_string()));
    pairs.extend(
        state
            .filters()
            .enabled()
            .map(|identifier| FieldPair::new(BASIC_FIELD, identifier)),
    );

    let snapshot = HistorySnapshot::from_pairs(pairs);
    let url = snapshot.query_string();
    HistoryEntry { snapshot, url }
}

/// Values grouped by name, in order of each name's first appearance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodedFields {
    fields: Vec<(String, FieldValue)>,
}

impl DecodedFields {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Group a snapshot's pairs by name. A name recorded exactly once decodes
/// to a scalar, anything else to the full ordered sequence.
pub fn decode(snapshot: &HistorySnapshot) -> DecodedFields {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for pair in snapshot.pairs() {
        let slot = match grouped.iter().position(|(name, _)| *name == pair.name) {
            Some(pos) => pos,
            None => {
                grouped.push((pair.name.clone(), Vec::new()));
                grouped.len() - 1
            }
        };
        grouped[slot]
            .1
            .extend(pair.value.values().map(str::to_string));
    }

    let fields = grouped
        .into_iter()
        .map(|(name, mut values)| {
            let value = if values.len() == 1 {
                FieldValue::Single(values.remove(0))
            } else {
                FieldValue::Multiple(values)
            };
            (name, value)
        })
        .collect();
    DecodedFields { fields }
}
