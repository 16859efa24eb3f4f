use super::config::ScoringConfig;
use super::domain::FieldAccuracyDetail;
use super::engine::COMPOSITE_SCALE;

/// Field count treated as full coverage when blending confidence.
const FULL_COVERAGE_FIELDS: f64 = 5.0;

/// Blend the composite score with field coverage into a [0, 1] confidence.
pub(crate) fn confidence_estimate(
    data_accuracy: f64,
    speed: f64,
    source: f64,
    evaluated_fields: usize,
) -> f64 {
    let base = (data_accuracy + speed + source) / COMPOSITE_SCALE;
    let coverage = (evaluated_fields as f64 / FULL_COVERAGE_FIELDS).min(1.0);

    (base * 0.8 + coverage * 0.2).clamp(0.0, 1.0)
}

/// Advisory escalation: low confidence, a weak source, or too many fields
/// with no reference evidence each force human review. Never blocks the
/// result.
pub(crate) fn should_escalate(
    confidence: f64,
    source_credibility: f64,
    details: &[FieldAccuracyDetail],
    config: &ScoringConfig,
) -> bool {
    if confidence < config.confidence_threshold {
        return true;
    }

    if source_credibility < config.source_credibility_threshold {
        return true;
    }

    let missing_evidence = details
        .iter()
        .filter(|detail| !detail.found_in_source)
        .count();

    missing_evidence >= config.max_missing_fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(field: &str, found: bool) -> FieldAccuracyDetail {
        FieldAccuracyDetail {
            field: field.to_string(),
            submitted: String::new(),
            found_in_source: found,
            match_score: 0.0,
            weight: 10.0,
            contribution: 0.0,
            evidence_snippets: Vec::new(),
        }
    }

    #[test]
    fn perfect_scores_blend_to_high_confidence() {
        // Four evaluated fields cap coverage at 0.8.
        let confidence = confidence_estimate(60.0, 10.0, 15.0, 4);
        assert!((confidence - 0.96).abs() < 1e-9);
    }

    #[test]
    fn confidence_is_clamped_to_unit_interval() {
        // Battle weight sums above 60 can push the base past 1.0.
        let confidence = confidence_estimate(100.0, 10.0, 15.0, 5);
        assert_eq!(confidence, 1.0);
        assert_eq!(confidence_estimate(0.0, 0.0, 0.0, 0), 0.0);
    }

    #[test]
    fn low_confidence_escalates() {
        let config = ScoringConfig::default();
        assert!(should_escalate(0.5, 1.0, &[], &config));
        assert!(!should_escalate(0.9, 1.0, &[], &config));
    }

    #[test]
    fn weak_sources_escalate() {
        let config = ScoringConfig::default();
        assert!(should_escalate(0.9, 0.30, &[], &config));
    }

    #[test]
    fn missing_evidence_count_escalates_at_the_threshold() {
        let config = ScoringConfig::default();
        let details = vec![
            detail("founders", false),
            detail("market_share", false),
            detail("key_executives", true),
        ];
        assert!(should_escalate(0.9, 1.0, &details, &config));

        let one_missing = vec![detail("founders", false), detail("key_executives", true)];
        assert!(!should_escalate(0.9, 1.0, &one_missing, &config));
    }
}
