use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// Competing teams fixed by the game setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Team {
    Alpha,
    Delta,
}

impl Team {
    pub const fn label(self) -> &'static str {
        match self {
            Team::Alpha => "Alpha",
            Team::Delta => "Delta",
        }
    }
}

/// Kinds of supporting material a team may attach; opaque to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    Screenshot,
    Pdf,
}

/// Supporting material uploaded alongside a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
    pub url: Url,
}

/// Declared match against a pre-verified company record. When
/// `use_reference_as_primary` is set the source scorer skips domain
/// inspection entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyReference {
    pub company_id: String,
    pub use_reference_as_primary: bool,
}

/// One battle submission as received from the game client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeSubmission {
    pub team: Team,
    pub battle_no: u8,
    pub submission_id: String,
    pub submitted_at: DateTime<Utc>,
    pub time_taken_seconds: u64,
    pub total_time_seconds: u64,
    #[serde(default)]
    pub company_reference: Option<CompanyReference>,
    #[serde(default)]
    pub source_link: Option<Url>,
    pub fields: BTreeMap<String, Value>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// Excerpt of harvested external text supporting a submitted value. Produced
/// by the evidence collaborator, never by the engine itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceSnippet {
    pub snapshot_path: String,
    pub xpath: String,
    pub start_offset: usize,
    pub end_offset: usize,
    pub text_snippet: String,
}

/// Per-field audit record: what was submitted, whether ground truth was
/// resolvable, and how much the field contributed to the accuracy total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAccuracyDetail {
    pub field: String,
    pub submitted: String,
    pub found_in_source: bool,
    pub match_score: f64,
    pub weight: f64,
    pub contribution: f64,
    #[serde(default)]
    pub evidence_snippets: Vec<EvidenceSnippet>,
}

/// Sub-score decomposition of a graded submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub data_accuracy_raw: f64,
    pub speed_raw: f64,
    pub source_raw: f64,
    #[serde(default)]
    pub data_accuracy_details: Vec<FieldAccuracyDetail>,
    pub source_credibility: f64,
    pub source_verified: bool,
    pub matched_from_reference: bool,
    #[serde(default)]
    pub reference_company_id: Option<String>,
    pub reference_verified: bool,
}

/// Caller-facing notes about gaps in the submission or the reference walk.
/// `fetch_warnings` and `conflict_details` stay empty until evidence
/// harvesting feeds them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    #[serde(default)]
    pub missing_fields: Vec<String>,
    #[serde(default)]
    pub evidence_not_found_for: Vec<String>,
    #[serde(default)]
    pub fetch_warnings: Vec<String>,
    #[serde(default)]
    pub conflict_details: BTreeMap<String, Value>,
}

/// The graded outcome for one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeResult {
    pub submission_id: String,
    pub team: Team,
    pub battle_no: u8,
    pub raw_ai_percent: f64,
    pub scaled_battle_percent: f64,
    pub battle_points_out_of_20: f64,
    pub breakdown: ScoreBreakdown,
    pub diagnostics: Diagnostics,
    pub escalated_for_human_review: bool,
    pub confidence: f64,
    pub explain_text: String,
}

/// Text coercion applied to every submitted or reference value before
/// comparison. Structured values are rendered as JSON.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        other => other.to_string(),
    }
}

/// Presence check for required fields: null, empty text, `false`, zero, and
/// empty containers all count as absent.
pub(crate) fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.is_empty(),
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Value::Array(items) => !items.is_empty(),
        Value::Object(entries) => !entries.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn value_text_coerces_scalars() {
        assert_eq!(value_text(&json!("Ezz Steel")), "Ezz Steel");
        assert_eq!(value_text(&json!(42)), "42");
        assert_eq!(value_text(&json!(4.5)), "4.5");
        assert_eq!(value_text(&json!(true)), "true");
        assert_eq!(value_text(&Value::Null), "");
    }

    #[test]
    fn presence_mirrors_falsy_semantics() {
        assert!(!is_present(&Value::Null));
        assert!(!is_present(&json!("")));
        assert!(!is_present(&json!(0)));
        assert!(!is_present(&json!(false)));
        assert!(!is_present(&json!([])));
        assert!(is_present(&json!("50%")));
        assert!(is_present(&json!(["Cairo"])));
    }

    #[test]
    fn submission_accepts_minimal_payload() {
        let raw = r#"{
            "team": "Alpha",
            "battle_no": 1,
            "submission_id": "sub-001",
            "submitted_at": "2024-06-01T10:00:00Z",
            "time_taken_seconds": 300,
            "total_time_seconds": 3600,
            "fields": {"founders": "Ezz Steel Company S.A.E."}
        }"#;

        let submission: GradeSubmission = serde_json::from_str(raw).expect("payload parses");
        assert_eq!(submission.team, Team::Alpha);
        assert!(submission.company_reference.is_none());
        assert!(submission.source_link.is_none());
        assert!(submission.attachments.is_empty());
    }
}
