//! Mutable visualization state: cutoff, per-basic filters and the last
//! received recommendations.

use crate::config::CUTOFF_UNBOUNDED;
use crate::error::{Result, VisualizerError};
use crate::model::RecommendationSet;
use crate::utils::validate_numeric_input;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Maximum number of garments shown per basic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cutoff {
    Limit(usize),
    #[default]
    Unbounded,
}

impl Cutoff {
    /// Number of garments to keep out of `len`.
    pub fn apply(self, len: usize) -> usize {
        match self {
            Cutoff::Limit(limit) => len.min(limit),
            Cutoff::Unbounded => len,
        }
    }
}

impl fmt::Display for Cutoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cutoff::Limit(limit) => write!(f, "{}", limit),
            Cutoff::Unbounded => f.write_str(CUTOFF_UNBOUNDED),
        }
    }
}

impl FromStr for Cutoff {
    type Err = VisualizerError;

    fn from_str(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(CUTOFF_UNBOUNDED) {
            return Ok(Cutoff::Unbounded);
        }
        validate_numeric_input::<usize>(trimmed, None, None, "Cutoff")
            .map(Cutoff::Limit)
            .map_err(|_| VisualizerError::InvalidCutoff(input.to_string()))
    }
}

/// Inclusion flag per basic identifier, in the order the filter controls
/// declare them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Filters {
    entries: Vec<(String, bool)>,
}

impl Filters {
    pub fn is_enabled(&self, identifier: &str) -> bool {
        self.entries
            .iter()
            .any(|(id, enabled)| id == identifier && *enabled)
    }

    pub fn get(&self, identifier: &str) -> Option<bool> {
        self.entries
            .iter()
            .find(|(id, _)| id == identifier)
            .map(|(_, enabled)| *enabled)
    }

    fn set(&mut self, identifier: &str, enabled: bool) {
        match self.entries.iter_mut().find(|(id, _)| id == identifier) {
            Some((_, flag)) => *flag = enabled,
            None => self.entries.push((identifier.to_string(), enabled)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries.iter().map(|(id, enabled)| (id.as_str(), *enabled))
    }

    /// Identifiers currently enabled, in declaration order.
    pub fn enabled(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|(_, enabled)| *enabled).map(|(id, _)| id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for Filters {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        let mut filters = Filters::default();
        for (id, enabled) in iter {
            let id: String = id.into();
            filters.set(&id, enabled);
        }
        filters
    }
}

/// State owned by one controller instance.
///
/// Every operation touches at most one of cutoff, filters and
/// recommendations.
#[derive(Debug, Clone, Default)]
pub struct VisualizationState {
    cutoff: Cutoff,
    filters: Filters,
    recommendations: Option<Rc<RecommendationSet>>,
}

impl VisualizationState {
    pub fn new(cutoff: Cutoff) -> Self {
        Self {
            cutoff,
            ..Self::default()
        }
    }

    /// Seed the filters from the known basic identifiers and their checked
    /// state, replacing whatever was there.
    pub fn init_filters<'a>(&mut self, initial: impl IntoIterator<Item = (&'a str, bool)>) {
        self.filters = initial.into_iter().collect();
    }

    pub fn set_filter(&mut self, identifier: &str, enabled: bool) {
        self.filters.set(identifier, enabled);
    }

    pub fn set_all_filters(&mut self, enabled: bool) {
        for (_, flag) in self.filters.entries.iter_mut() {
            *flag = enabled;
        }
    }

    /// Stored verbatim; projection decides what an out-of-range value means.
    pub fn set_cutoff(&mut self, cutoff: Cutoff) {
        self.cutoff = cutoff;
    }

    pub fn replace_recommendations(&mut self, set: RecommendationSet) {
        self.recommendations = Some(Rc::new(set));
    }

    pub fn current_recommendations(&self) -> Option<Rc<RecommendationSet>> {
        self.recommendations.clone()
    }

    pub fn cutoff(&self) -> Cutoff {
        self.cutoff
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }
}
