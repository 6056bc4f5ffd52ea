use log::warn;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod controller;
pub mod details;
pub mod error;
pub mod form;
pub mod history;
pub mod model;
pub mod projector;
pub mod state;
pub mod utils;

pub use controller::{Controller, Display, Effect, Event, GarmentKey, Phase};
pub use error::{Result, VisualizerError};
pub use history::{decode, encode, DecodedFields, FieldPair, FieldValue, HistoryEntry, HistorySnapshot};
pub use model::{parse_payload, Payload, RecommendationSet};
pub use projector::{project, RenderContext};
pub use state::{Cutoff, Filters, VisualizationState};

/// Default controller policies
pub mod defaults {
    use crate::config::{FetchSequencing, NormalizationPlacement};

    pub const NORMALIZATION: NormalizationPlacement = NormalizationPlacement::Grouped;
    pub const SEQUENCING: FetchSequencing = FetchSequencing::LatestOnly;
}

/// Project a recommendation payload from JavaScript.
///
/// # Arguments
/// * `payload_js` - The fetch response, in any accepted transport shape
/// * `basics_js` - Identifiers of the basics to include
/// * `cutoff` - Garments per basic, or `"all"`
///
/// # Returns
/// The serialized render context. Failures are thrown as JS errors.
#[wasm_bindgen]
pub fn project_recommendations(
    payload_js: JsValue,
    basics_js: JsValue,
    cutoff: &str,
) -> std::result::Result<JsValue, JsValue> {
    let context = project_value(payload_js, basics_js, cutoff).map_err(|e| {
        warn!("Projection failed: {}", e);
        js_sys::Error::new(&e.to_string())
    })?;
    serde_wasm_bindgen::to_value(&context).map_err(JsValue::from)
}

fn project_value(payload_js: JsValue, basics_js: JsValue, cutoff: &str) -> Result<RenderContext> {
    let value: serde_json::Value = serde_wasm_bindgen::from_value(payload_js)
        .map_err(|e| VisualizerError::MalformedPayload(e.to_string()))?;
    let basics: Vec<String> = serde_wasm_bindgen::from_value(basics_js)
        .map_err(|e| VisualizerError::MalformedPayload(format!("basics: {}", e)))?;
    project_json(value, basics, cutoff)
}

/// [`project`] over an untyped payload and a list of included basics.
pub fn project_json(value: serde_json::Value, basics: Vec<String>, cutoff: &str) -> Result<RenderContext> {
    let cutoff: Cutoff = cutoff.parse()?;
    let payload = model::payload_from_value(value)?;
    let filters: Filters = basics.into_iter().map(|id| (id, true)).collect();
    Ok(project(&payload.recommendations, &filters, cutoff))
}
