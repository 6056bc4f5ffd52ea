//! Recommendation payload types and the adapter that normalizes the
//! transport shape into an identifier-keyed, insertion-ordered set.

use crate::error::{Result, VisualizerError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicRef {
    #[serde(rename = "slug")]
    pub identifier: String,
    #[serde(rename = "name")]
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GarmentRef {
    #[serde(rename = "id", deserialize_with = "string_or_number")]
    pub identifier: String,
    pub brand: String,
    #[serde(rename = "name")]
    pub display_name: String,
}

/// One reason a weight gave for its contribution to a garment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reason {
    #[serde(rename = "reason")]
    pub message: String,
    #[serde(rename = "weight")]
    pub value: f64,
}

/// All reasons recorded by a single named weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedReasons {
    pub name: String,
    #[serde(default)]
    pub reasons: Vec<Reason>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationStep {
    #[serde(rename = "name")]
    pub weight_name: String,
    pub importance: f64,
    #[serde(rename = "weight")]
    pub weight_value: f64,
    /// Label of the adjustment applied, when the producer names it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Explanation {
    #[serde(rename = "weights", default)]
    pub weighted_reasons: Vec<WeightedReasons>,
    #[serde(rename = "normalization", default)]
    pub normalization_steps: Vec<NormalizationStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminLink {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOption {
    pub retailer: String,
    /// Price in cents
    #[serde(default)]
    pub price: Option<u64>,
    pub url: String,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub admin_links: Vec<AdminLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GarmentRecommendation {
    pub garment: GarmentRef,
    pub weight: f64,
    #[serde(rename = "explanations", default)]
    pub explanation: Explanation,
    #[serde(default)]
    pub purchase_options: Vec<PurchaseOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_url: Option<String>,
}

/// Garments sharing one facet value, in rank order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetGroup {
    pub slug: String,
    #[serde(default, deserialize_with = "strings_or_numbers")]
    pub garment_ids: Vec<String>,
}

/// A partition of a basic's garments, such as by price band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facet {
    pub slug: String,
    #[serde(default)]
    pub groups: Vec<FacetGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicRecommendation {
    pub basic: BasicRef,
    /// Pre-sorted by rank; never re-sorted here
    pub garments: Vec<GarmentRecommendation>,
    #[serde(default)]
    pub facets: Vec<Facet>,
}

impl BasicRecommendation {
    pub fn garment(&self, identifier: &str) -> Option<&GarmentRecommendation> {
        self.garments
            .iter()
            .find(|g| g.garment.identifier == identifier)
    }

    pub fn facet(&self, slug: &str) -> Option<&Facet> {
        self.facets.iter().find(|facet| facet.slug == slug)
    }
}

/// Recommendations keyed by basic identifier, in payload order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RecommendationSet {
    basics: Vec<BasicRecommendation>,
}

impl RecommendationSet {
    /// Build a set from records, a repeated identifier replacing the
    /// earlier record in its original position.
    pub fn from_records(records: impl IntoIterator<Item = BasicRecommendation>) -> Self {
        let mut basics: Vec<BasicRecommendation> = Vec::new();
        for record in records {
            match basics
                .iter_mut()
                .find(|b| b.basic.identifier == record.basic.identifier)
            {
                Some(existing) => *existing = record,
                None => basics.push(record),
            }
        }
        Self { basics }
    }

    pub fn get(&self, identifier: &str) -> Option<&BasicRecommendation> {
        self.basics.iter().find(|b| b.basic.identifier == identifier)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BasicRecommendation> {
        self.basics.iter()
    }

    pub fn len(&self) -> usize {
        self.basics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.basics.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryTiming {
    /// Seconds, as a decimal string
    #[serde(deserialize_with = "string_or_number")]
    pub time: String,
    pub sql: String,
}

/// Server-side diagnostics attached to a response.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DebugInfo {
    /// Seconds
    #[serde(default)]
    pub time: f64,
    #[serde(default)]
    pub queries: Vec<QueryTiming>,
}

/// A decoded fetch response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Payload {
    pub recommendations: RecommendationSet,
    pub debug: Option<DebugInfo>,
}

const BASICS_KEY: &str = "basics";
const DEBUG_KEY: &str = "debug";

/// Parse a response body into a [`Payload`].
pub fn parse_payload(text: &str) -> Result<Payload> {
    let value: Value = serde_json::from_str(text)?;
    payload_from_value(value)
}

/// Normalize any accepted transport shape into a [`Payload`].
pub fn payload_from_value(value: Value) -> Result<Payload> {
    let Value::Object(mut root) = value else {
        return Err(VisualizerError::MalformedPayload(
            "expected a JSON object at the top level".to_string(),
        ));
    };

    let debug = match root.remove(DEBUG_KEY) {
        None | Some(Value::Null) => None,
        Some(raw) => Some(serde_json::from_value::<DebugInfo>(raw).map_err(|e| {
            VisualizerError::MalformedPayload(format!("debug: {}", e))
        })?),
    };

    let records = match root.remove(BASICS_KEY) {
        Some(Value::Array(items)) => items,
        Some(Value::Object(keyed)) => keyed_records(keyed),
        Some(Value::Null) => Vec::new(),
        Some(other) => {
            return Err(VisualizerError::MalformedPayload(format!(
                "`basics` must be an array or an object, got {}",
                json_kind(&other)
            )))
        }
        None => keyed_records(root),
    };

    let basics = records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| {
            serde_json::from_value::<BasicRecommendation>(record).map_err(|e| {
                VisualizerError::MalformedPayload(format!("basic #{}: {}", idx + 1, e))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Payload {
        recommendations: RecommendationSet::from_records(basics),
        debug,
    })
}

fn keyed_records(keyed: Map<String, Value>) -> Vec<Value> {
    keyed.into_iter().map(|(_, record)| record).collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// An identifier the producer may send as a JSON string or number.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawIdentifier {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawIdentifier> for String {
    fn from(raw: RawIdentifier) -> Self {
        match raw {
            RawIdentifier::Text(text) => text,
            RawIdentifier::Number(number) => number.to_string(),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(RawIdentifier::deserialize(deserializer)?.into())
}

fn strings_or_numbers<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<RawIdentifier>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(String::from).collect())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn garment_json(id: u64, name: &str, weight: f64) -> Value {
        json!({
            "garment": { "id": id, "brand": "Acme", "name": name },
            "weight": weight
        })
    }

    pub(crate) fn basic_json(slug: &str, name: &str, garments: Vec<Value>) -> Value {
        json!({
            "basic": { "slug": slug, "name": name },
            "garments": garments
        })
    }

    #[test]
    fn array_shape_keeps_payload_order() {
        let payload = payload_from_value(json!({
            "basics": [
                basic_json("zzz", "Zed", vec![]),
                basic_json("aaa", "Ay", vec![garment_json(1, "Shirt", 0.5)]),
            ]
        }))
        .unwrap();

        let ids: Vec<_> = payload
            .recommendations
            .iter()
            .map(|b| b.basic.identifier.as_str())
            .collect();
        assert_eq!(ids, vec!["zzz", "aaa"]);
        assert!(payload.debug.is_none());
    }

    #[test]
    fn keyed_shape_preserves_insertion_order_not_alphabetical() {
        let text = r#"{
            "tops": {"basic": {"slug": "tops", "name": "Tops"}, "garments": []},
            "bottoms": {"basic": {"slug": "bottoms", "name": "Bottoms"}, "garments": []},
            "debug": {"time": 0.25, "queries": [{"time": "0.010", "sql": "SELECT 1"}]}
        }"#;
        let payload = parse_payload(text).unwrap();

        let ids: Vec<_> = payload
            .recommendations
            .iter()
            .map(|b| b.basic.identifier.as_str())
            .collect();
        assert_eq!(ids, vec!["tops", "bottoms"]);
        assert_eq!(payload.debug.unwrap().queries.len(), 1);
    }

    #[test]
    fn nested_keyed_shape_is_accepted() {
        let payload = payload_from_value(json!({
            "basics": { "shoes": basic_json("shoes", "Shoes", vec![garment_json(7, "Boot", 0.1)]) }
        }))
        .unwrap();

        let shoes = payload.recommendations.get("shoes").unwrap();
        assert_eq!(shoes.garments[0].garment.identifier, "7");
        assert!(shoes.garments[0].explanation.weighted_reasons.is_empty());
    }

    #[test]
    fn duplicate_identifier_replaces_in_place() {
        let payload = payload_from_value(json!({
            "basics": [
                basic_json("tops", "Tops", vec![]),
                basic_json("shoes", "Shoes", vec![]),
                basic_json("tops", "Tops again", vec![]),
            ]
        }))
        .unwrap();

        let names: Vec<_> = payload
            .recommendations
            .iter()
            .map(|b| b.basic.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["Tops again", "Shoes"]);
    }

    #[test]
    fn missing_weight_is_malformed() {
        let err = payload_from_value(json!({
            "basics": [{
                "basic": { "slug": "tops", "name": "Tops" },
                "garments": [{ "garment": { "id": 1, "brand": "Acme", "name": "Tee" } }]
            }]
        }))
        .unwrap_err();

        assert!(matches!(err, VisualizerError::MalformedPayload(_)));
    }

    #[test]
    fn non_object_root_is_malformed() {
        assert!(matches!(
            parse_payload("[1, 2]"),
            Err(VisualizerError::MalformedPayload(_))
        ));
        assert!(matches!(parse_payload("{"), Err(VisualizerError::Json(_))));
    }

    #[test]
    fn facet_groups_accept_numeric_and_text_ids() {
        let mut record = basic_json("tops", "Tops", vec![garment_json(1, "Tee", 0.5)]);
        record["facets"] = json!([
            { "slug": "price", "groups": [{ "slug": "low", "garment_ids": [1, "2"] }] }
        ]);
        let payload = payload_from_value(json!({ "basics": [record] })).unwrap();

        let tops = payload.recommendations.get("tops").unwrap();
        let price = tops.facet("price").unwrap();
        assert_eq!(price.groups[0].garment_ids, vec!["1", "2"]);
        assert!(tops.facet("color").is_none());
    }
}
