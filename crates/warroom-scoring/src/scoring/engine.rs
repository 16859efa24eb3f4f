use super::accuracy::evaluate_fields;
use super::confidence::{confidence_estimate, should_escalate};
use super::config::ScoringConfig;
use super::domain::{is_present, Diagnostics, GradeResult, GradeSubmission, ScoreBreakdown};
use super::explain::explanation;
use super::reference::{ListMatchPolicy, ReferenceDataset};
use super::source::source_score;
use super::speed::speed_score;
use super::template::TemplateCatalog;

/// Nominal composite scale: 60 accuracy + 10 speed + 15 source. Applied
/// uniformly even though battle weight sums range from 60 to 100, so
/// battles have different effective maxima before rescaling. Kept as
/// shipped; see DESIGN.md.
pub(crate) const COMPOSITE_SCALE: f64 = 85.0;

/// Submission rejected before any computation ran.
#[derive(Debug, thiserror::Error)]
pub enum GradeError {
    #[error("unknown battle number: {0}")]
    UnknownBattle(u8),
}

/// The deterministic grading core.
///
/// Owns the immutable template catalog, scoring configuration, and reference
/// dataset; holds no other state. `grade` is a pure function of the
/// submission and this context, so engines can be shared read-only across
/// threads and identical inputs always produce identical results.
pub struct ScoringEngine {
    templates: TemplateCatalog,
    config: ScoringConfig,
    reference: ReferenceDataset,
    list_policy: ListMatchPolicy,
}

impl ScoringEngine {
    pub fn new(templates: TemplateCatalog, config: ScoringConfig, reference: ReferenceDataset) -> Self {
        Self {
            templates,
            config,
            reference,
            list_policy: ListMatchPolicy::default(),
        }
    }

    /// Swap the list-valued reference match policy (best-match by default).
    pub fn with_list_policy(mut self, policy: ListMatchPolicy) -> Self {
        self.list_policy = policy;
        self
    }

    pub fn templates(&self) -> &TemplateCatalog {
        &self.templates
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn reference(&self) -> &ReferenceDataset {
        &self.reference
    }

    /// Grade one submission.
    pub fn grade(&self, submission: &GradeSubmission) -> Result<GradeResult, GradeError> {
        let template = self
            .templates
            .get(submission.battle_no)
            .ok_or(GradeError::UnknownBattle(submission.battle_no))?;

        let accuracy = evaluate_fields(
            &submission.fields,
            template,
            &self.reference,
            self.list_policy,
            &self.config,
        );

        let speed_raw = speed_score(
            submission.time_taken_seconds,
            submission.total_time_seconds,
            &self.config.speed_tiers,
        );

        let source = source_score(
            submission.source_link.as_ref(),
            submission.company_reference.as_ref(),
            &self.config,
        );

        let raw_ai_percent = accuracy.total + speed_raw + source.raw;
        let scaled_battle_percent = raw_ai_percent / COMPOSITE_SCALE * 100.0;
        let battle_points_out_of_20 = scaled_battle_percent / 100.0 * 20.0;

        let matched_from_reference = submission
            .company_reference
            .as_ref()
            .map(|reference| reference.use_reference_as_primary)
            .unwrap_or(false);

        let confidence = confidence_estimate(
            accuracy.total,
            speed_raw,
            source.raw,
            accuracy.details.len(),
        );

        let escalated = should_escalate(
            confidence,
            source.credibility,
            &accuracy.details,
            &self.config,
        );

        let missing_fields: Vec<String> = template
            .required_fields()
            .filter(|field| {
                submission
                    .fields
                    .get(*field)
                    .map(|value| !is_present(value))
                    .unwrap_or(true)
            })
            .map(str::to_string)
            .collect();

        let evidence_not_found_for: Vec<String> = accuracy
            .details
            .iter()
            .filter(|detail| !detail.found_in_source)
            .map(|detail| detail.field.clone())
            .collect();

        let explain_text = explanation(
            accuracy.total,
            speed_raw,
            source.raw,
            confidence,
            escalated,
        );

        Ok(GradeResult {
            submission_id: submission.submission_id.clone(),
            team: submission.team,
            battle_no: submission.battle_no,
            raw_ai_percent,
            scaled_battle_percent,
            battle_points_out_of_20,
            breakdown: ScoreBreakdown {
                data_accuracy_raw: accuracy.total,
                speed_raw,
                source_raw: source.raw,
                data_accuracy_details: accuracy.details,
                source_credibility: source.credibility,
                source_verified: source.verified,
                matched_from_reference,
                reference_company_id: submission
                    .company_reference
                    .as_ref()
                    .map(|reference| reference.company_id.clone()),
                reference_verified: matched_from_reference,
            },
            diagnostics: Diagnostics {
                missing_fields,
                evidence_not_found_for,
                fetch_warnings: Vec::new(),
                conflict_details: Default::default(),
            },
            escalated_for_human_review: escalated,
            confidence,
            explain_text,
        })
    }
}
