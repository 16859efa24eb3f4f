/// Render the short human-readable justification from already-computed
/// numbers. Pure formatting; the breakpoints bucket each component into a
/// qualitative label.
pub(crate) fn explanation(
    data_accuracy: f64,
    speed: f64,
    source: f64,
    confidence: f64,
    escalated: bool,
) -> String {
    let mut parts = Vec::with_capacity(4);

    if data_accuracy >= 50.0 {
        parts.push(format!("Strong data accuracy ({data_accuracy:.1}/60 points)"));
    } else if data_accuracy >= 30.0 {
        parts.push(format!(
            "Moderate data accuracy ({data_accuracy:.1}/60 points)"
        ));
    } else {
        parts.push(format!("Weak data accuracy ({data_accuracy:.1}/60 points)"));
    }

    if speed >= 8.0 {
        parts.push(format!("Fast submission ({speed:.1}/10 points)"));
    } else if speed >= 5.0 {
        parts.push(format!("Moderate speed ({speed:.1}/10 points)"));
    } else {
        parts.push(format!("Slow submission ({speed:.1}/10 points)"));
    }

    if source >= 12.0 {
        parts.push(format!("High-quality sources ({source:.1}/15 points)"));
    } else if source >= 8.0 {
        parts.push(format!("Moderate source quality ({source:.1}/15 points)"));
    } else {
        parts.push(format!("Low source quality ({source:.1}/15 points)"));
    }

    if escalated {
        parts.push("Escalated for human review due to low confidence or missing evidence".into());
    } else if confidence >= 0.8 {
        parts.push("High confidence in scoring accuracy".into());
    } else {
        parts.push("Moderate confidence in scoring accuracy".into());
    }

    format!("{}.", parts.join(". "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_fast_verified_reads_confident() {
        let text = explanation(60.0, 10.0, 15.0, 0.96, false);
        assert_eq!(
            text,
            "Strong data accuracy (60.0/60 points). Fast submission (10.0/10 points). \
             High-quality sources (15.0/15 points). High confidence in scoring accuracy."
        );
    }

    #[test]
    fn escalation_clause_replaces_the_confidence_clause() {
        let text = explanation(10.0, 2.0, 0.0, 0.2, true);
        assert!(text.starts_with("Weak data accuracy (10.0/60 points)"));
        assert!(text.contains("Slow submission"));
        assert!(text.contains("Low source quality"));
        assert!(text.ends_with(
            "Escalated for human review due to low confidence or missing evidence."
        ));
    }

    #[test]
    fn middling_scores_use_the_moderate_buckets() {
        let text = explanation(35.0, 6.0, 9.0, 0.7, false);
        assert!(text.contains("Moderate data accuracy"));
        assert!(text.contains("Moderate speed"));
        assert!(text.contains("Moderate source quality"));
        assert!(text.ends_with("Moderate confidence in scoring accuracy."));
    }
}
