//! On-demand explanation rows and purchase options for one garment.

use crate::config::NormalizationPlacement;
use crate::model::{AdminLink, Explanation, GarmentRecommendation, PurchaseOption};
use crate::utils::{format_price, format_reason_value};
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub weight_name: String,
    pub weight_value: f64,
    pub message: String,
    pub is_normalization: bool,
}

impl DetailRow {
    pub fn display_value(&self) -> String {
        format_reason_value(self.weight_value)
    }
}

/// Weight name ascending, then weight value descending.
fn row_order(a: &DetailRow, b: &DetailRow) -> Ordering {
    a.weight_name
        .cmp(&b.weight_name)
        .then_with(|| b.weight_value.total_cmp(&a.weight_value))
}

/// Stable sort by [`row_order`].
pub fn order_rows(rows: &mut [DetailRow]) {
    rows.sort_by(row_order);
}

fn normalization_message(importance: f64, action: Option<&str>) -> String {
    match action {
        Some(label) if !label.trim().is_empty() => label.to_string(),
        _ => format!("Scaled by importance {}", format_reason_value(importance)),
    }
}

/// Flatten an explanation into ordered rows.
///
/// Each reason becomes its own row, as does each normalization step. With
/// [`NormalizationPlacement::Grouped`] the two kinds are ordered separately
/// and normalization rows follow all weighted rows; with
/// [`NormalizationPlacement::Interleaved`] they share one ordering.
pub fn expand(explanation: &Explanation, placement: NormalizationPlacement) -> Vec<DetailRow> {
    let mut weighted: Vec<DetailRow> = explanation
        .weighted_reasons
        .iter()
        .flat_map(|weight| {
            weight.reasons.iter().map(move |reason| DetailRow {
                weight_name: weight.name.clone(),
                weight_value: reason.value,
                message: reason.message.clone(),
                is_normalization: false,
            })
        })
        .collect();

    let mut normalized: Vec<DetailRow> = explanation
        .normalization_steps
        .iter()
        .map(|step| DetailRow {
            weight_name: step.weight_name.clone(),
            weight_value: step.weight_value,
            message: normalization_message(step.importance, step.action.as_deref()),
            is_normalization: true,
        })
        .collect();

    match placement {
        NormalizationPlacement::Grouped => {
            order_rows(&mut weighted);
            order_rows(&mut normalized);
            weighted.extend(normalized);
        }
        NormalizationPlacement::Interleaved => {
            weighted.extend(normalized);
            order_rows(&mut weighted);
        }
    }
    weighted
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseOptionView {
    pub garment_name: String,
    pub retailer: String,
    pub price: Option<String>,
    pub url: String,
    /// Smallest image
    pub thumbnail: Option<String>,
    /// Largest image
    pub image: Option<String>,
    pub admin_links: Vec<AdminLink>,
}

impl PurchaseOptionView {
    pub fn new(garment_name: &str, option: &PurchaseOption) -> Self {
        let mut images: Vec<_> = option.images.iter().collect();
        images.sort_by_key(|image| u64::from(image.width) + u64::from(image.height));

        Self {
            garment_name: garment_name.to_string(),
            retailer: option.retailer.clone(),
            price: option.price.map(format_price),
            url: option.url.clone(),
            thumbnail: images.first().map(|image| image.url.clone()),
            image: images.last().map(|image| image.url.clone()),
            admin_links: option.admin_links.clone(),
        }
    }
}

/// Everything shown while a garment is expanded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GarmentDetail {
    pub rows: Vec<DetailRow>,
    pub purchase_options: Vec<PurchaseOptionView>,
}

impl GarmentDetail {
    pub fn new(garment: &GarmentRecommendation, placement: NormalizationPlacement) -> Self {
        Self {
            rows: expand(&garment.explanation, placement),
            purchase_options: garment
                .purchase_options
                .iter()
                .map(|option| PurchaseOptionView::new(&garment.garment.display_name, option))
                .collect(),
        }
    }

    pub fn weighted_rows(&self) -> impl Iterator<Item = &DetailRow> {
        self.rows.iter().filter(|row| !row.is_normalization)
    }

    pub fn normalization_rows(&self) -> impl Iterator<Item = &DetailRow> {
        self.rows.iter().filter(|row| row.is_normalization)
    }
}
