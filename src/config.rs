//! Application-level configuration constants.

use serde::{Deserialize, Serialize};

// Form field names
pub const CUTOFF_FIELD: &str = "cutoff";
pub const BASIC_FIELD: &str = "basic";
pub const CUTOFF_UNBOUNDED: &str = "all";

// Facet the garment cards are grouped by
pub const PRICE_FACET: &str = "price";

// Display scaling
pub const WEIGHT_BASE: f64 = 10.0;
pub const CENTS_PER_UNIT: f64 = 100.0;

// UI Behavior
pub const DEBOUNCE_MS: u32 = 300;

/// Page description compiled into the binary: endpoint, form controls,
/// basic filters and an optional pre-rendered payload.
pub const BOOTSTRAP: &str = include_str!("bootstrap.json");

/// Where normalization rows go relative to weighted rows in a garment's
/// expanded explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationPlacement {
    /// Weighted rows first, normalization rows after them as a block.
    #[default]
    Grouped,
    /// Both kinds merged into one list under the same ordering key.
    Interleaved,
}

/// How responses from overlapping fetches are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchSequencing {
    /// Only the response to the most recent submit is applied.
    #[default]
    LatestOnly,
    /// Every response is applied in the order it arrives.
    LastArrivalWins,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ControllerConfig {
    #[serde(default)]
    pub normalization: NormalizationPlacement,
    #[serde(default)]
    pub sequencing: FetchSequencing,
}
