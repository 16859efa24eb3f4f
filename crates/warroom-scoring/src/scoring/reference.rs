//! Ground-truth resolution.
//!
//! Field names bind to fixed paths inside the reference tree. A failed walk
//! is not an error: the field is reported as not found and contributes
//! nothing. List-valued nodes are compared candidate by candidate under an
//! explicit match policy.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::value_text;

/// The immutable ground-truth record one subject entity is graded against.
/// Loaded once at startup; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ReferenceDataset {
    root: Value,
}

impl ReferenceDataset {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(raw)?))
    }

    /// Full tree, for the read-only dump surface.
    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// Walk the fixed path bound to `field`. `None` when the field has no
    /// binding, a key is absent, or an intermediate node is not an object.
    pub(crate) fn resolve(&self, field: &str) -> Option<&Value> {
        let path = field_path(field)?;

        let mut node = &self.root;
        for key in path {
            node = node.as_object()?.get(*key)?;
        }

        Some(node)
    }
}

/// Fixed binding from template field names to reference-tree paths.
fn field_path(field: &str) -> Option<&'static [&'static str]> {
    let path: &'static [&'static str] = match field {
        "founders" => &["leadership_and_ownership", "founders", "company"],
        "key_executives" => &["leadership_and_ownership", "key_executives"],
        "market_share" => &["market", "competitive_position", "market_share", "overall"],
        "geographic_footprint" => &["market", "geographic_footprint"],
        "product_lines" => &["products", "lines"],
        "pricing" => &["products", "lines"],
        "social_presence" => &["social_presence", "platforms"],
        "influencers" => &["social_presence", "platforms"],
        "funding" => &["funding", "revenue", "h1_2024_usd_billion"],
        "investors" => &["funding", "investors"],
        "revenue" => &["funding", "revenue"],
        "citations" => &["social_presence", "platforms"],
        "b2c" => &["customers", "b2c"],
        "b2b" => &["customers", "b2b"],
        "reviews" => &["customers", "reviews"],
        "partners" => &["partnerships_and_supply_chain", "strategic_partners"],
        "suppliers" => &["partnerships_and_supply_chain", "key_suppliers"],
        "growth" => &["growth", "recent_growth"],
        "expansions" => &["growth", "expansions"],
        _ => return None,
    };

    Some(path)
}

/// How a submitted value is scored against a list-valued reference node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListMatchPolicy {
    /// Keep the best similarity across candidates.
    #[default]
    BestMatch,
    /// Average the similarity across candidates.
    Average,
}

impl ListMatchPolicy {
    pub(crate) fn combine(self, scores: impl Iterator<Item = f64>) -> f64 {
        match self {
            ListMatchPolicy::BestMatch => scores.fold(0.0, f64::max),
            ListMatchPolicy::Average => {
                let mut total = 0.0;
                let mut count = 0usize;
                for score in scores {
                    total += score;
                    count += 1;
                }
                if count == 0 {
                    0.0
                } else {
                    total / count as f64
                }
            }
        }
    }
}

/// Display text for one list candidate: a `name` attribute wins, then
/// `title`, then plain text coercion.
pub(crate) fn candidate_text(candidate: &Value) -> String {
    if let Some(record) = candidate.as_object() {
        for key in ["name", "title"] {
            if let Some(label) = record.get(key).and_then(Value::as_str) {
                return label.to_string();
            }
        }
    }

    value_text(candidate)
}
