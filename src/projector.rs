//! Derivation of a render context from recommendations, filters and cutoff.

use crate::config::PRICE_FACET;
use crate::model::{BasicRecommendation, DebugInfo, FacetGroup, GarmentRecommendation, RecommendationSet};
use crate::state::{Cutoff, Filters};
use crate::utils::{format_weight, parse_seconds_to_ms, seconds_to_ms};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GarmentView {
    pub identifier: String,
    pub brand: String,
    pub display_name: String,
    /// Weight on the 0–10 display scale
    pub weight: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_url: Option<String>,
}

impl From<&GarmentRecommendation> for GarmentView {
    fn from(rec: &GarmentRecommendation) -> Self {
        Self {
            identifier: rec.garment.identifier.clone(),
            brand: rec.garment.brand.clone(),
            display_name: rec.garment.display_name.clone(),
            weight: format_weight(rec.weight),
            edit_url: rec.edit_url.clone(),
        }
    }
}

/// Garments in one price band, each band cut off on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceGroupView {
    pub name: String,
    pub garments: Vec<GarmentView>,
}

impl PriceGroupView {
    fn new(rec: &BasicRecommendation, group: &FacetGroup, cutoff: Cutoff) -> Self {
        let listed = group.garment_ids.len().min(rec.garments.len());
        let keep = cutoff.apply(listed);
        Self {
            name: group.slug.clone(),
            garments: group.garment_ids[..keep]
                .iter()
                .filter_map(|id| rec.garment(id))
                .map(GarmentView::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicView {
    pub identifier: String,
    pub display_name: String,
    pub garments: Vec<GarmentView>,
    /// Empty when the basic carries no price facet
    pub price_groups: Vec<PriceGroupView>,
    /// Garments available before the cutoff was applied
    pub total_garments: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RenderContext {
    pub basics: Vec<BasicView>,
}

/// Build the view of every included basic, sorted by display name.
///
/// Basics are visited in payload order and skipped unless their filter is
/// enabled. Garment lists keep their rank order and are only truncated;
/// an included basic whose list ends up empty is still listed. The price
/// groups apply the same cutoff to every group separately.
pub fn project(recommendations: &RecommendationSet, filters: &Filters, cutoff: Cutoff) -> RenderContext {
    let mut basics: Vec<BasicView> = recommendations
        .iter()
        .filter(|rec| filters.is_enabled(&rec.basic.identifier))
        .map(|rec| {
            let keep = cutoff.apply(rec.garments.len());
            BasicView {
                identifier: rec.basic.identifier.clone(),
                display_name: rec.basic.display_name.clone(),
                garments: rec.garments[..keep].iter().map(GarmentView::from).collect(),
                price_groups: rec
                    .facet(PRICE_FACET)
                    .map(|facet| {
                        facet
                            .groups
                            .iter()
                            .map(|group| PriceGroupView::new(rec, group, cutoff))
                            .collect()
                    })
                    .unwrap_or_default(),
                total_garments: rec.garments.len(),
            }
        })
        .collect();

    // stable: equal names keep payload order
    basics.sort_by(|a, b| a.display_name.cmp(&b.display_name));
    RenderContext { basics }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryView {
    /// `None` when the reported time is not a number
    pub ms: Option<i64>,
    pub sql: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebugView {
    pub total_ms: i64,
    pub query_count: usize,
    pub queries: Vec<QueryView>,
}

/// Diagnostic panel data, with seconds converted to whole milliseconds.
pub fn project_debug(debug: &DebugInfo) -> DebugView {
    DebugView {
        total_ms: seconds_to_ms(debug.time),
        query_count: debug.queries.len(),
        queries: debug
            .queries
            .iter()
            .map(|query| QueryView {
                ms: parse_seconds_to_ms(&query.time),
                sql: query.sql.clone(),
            })
            .collect(),
    }
}
