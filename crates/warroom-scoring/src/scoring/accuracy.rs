use std::collections::BTreeMap;

use serde_json::Value;

use super::config::ScoringConfig;
use super::domain::{value_text, FieldAccuracyDetail};
use super::reference::{candidate_text, ListMatchPolicy, ReferenceDataset};
use super::similarity::field_similarity;
use super::template::BattleTemplate;

pub(crate) struct AccuracyOutcome {
    pub total: f64,
    pub details: Vec<FieldAccuracyDetail>,
}

/// Score every weighted field of the template in declared order. Fields with
/// no resolvable ground truth are recorded as not found and contribute zero.
pub(crate) fn evaluate_fields(
    fields: &BTreeMap<String, Value>,
    template: &BattleTemplate,
    dataset: &ReferenceDataset,
    policy: ListMatchPolicy,
    config: &ScoringConfig,
) -> AccuracyOutcome {
    let mut total = 0.0;
    let mut details = Vec::with_capacity(template.fields().len());

    for spec in template.fields() {
        let submitted = fields
            .get(&spec.name)
            .map(value_text)
            .unwrap_or_default();

        let reference = match dataset.resolve(&spec.name) {
            Some(value) => value,
            None => {
                details.push(FieldAccuracyDetail {
                    field: spec.name.clone(),
                    submitted,
                    found_in_source: false,
                    match_score: 0.0,
                    weight: spec.weight,
                    contribution: 0.0,
                    evidence_snippets: Vec::new(),
                });
                continue;
            }
        };

        let match_score = match reference {
            Value::Array(candidates) => policy.combine(candidates.iter().map(|candidate| {
                field_similarity(spec.kind, &submitted, &candidate_text(candidate), config)
            })),
            scalar => field_similarity(spec.kind, &submitted, &value_text(scalar), config),
        };

        let contribution = spec.weight * match_score;
        total += contribution;

        details.push(FieldAccuracyDetail {
            field: spec.name.clone(),
            submitted,
            found_in_source: true,
            match_score,
            weight: spec.weight,
            contribution,
            evidence_snippets: Vec::new(),
        });
    }

    AccuracyOutcome { total, details }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::template::TemplateCatalog;
    use serde_json::json;

    fn dataset() -> ReferenceDataset {
        ReferenceDataset::new(json!({
            "leadership_and_ownership": {
                "founders": { "company": "Ezz Steel Company S.A.E." },
                "key_executives": [
                    { "name": "Hassan Ahmed Nouh", "title": "Chairman and Managing Director" },
                    { "name": "Ahmed Ezz", "title": "Founder" }
                ]
            },
            "market": {
                "competitive_position": { "market_share": { "overall": "50-60%" } },
                "geographic_footprint": ["Egypt", "Middle East and North Africa"]
            }
        }))
    }

    fn submission_fields(pairs: &[(&str, &str)]) -> BTreeMap<String, Value> {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_string(), json!(value)))
            .collect()
    }

    #[test]
    fn exact_fields_earn_full_weight() {
        let catalog = TemplateCatalog::standard();
        let template = catalog.get(1).expect("battle 1 exists");
        let fields = submission_fields(&[
            ("founders", "Ezz Steel Company S.A.E."),
            ("key_executives", "Hassan Ahmed Nouh"),
            ("market_share", "60%"),
            ("geographic_footprint", "Egypt"),
        ]);

        let outcome = evaluate_fields(
            &fields,
            template,
            &dataset(),
            ListMatchPolicy::BestMatch,
            &ScoringConfig::default(),
        );

        assert_eq!(outcome.total, 60.0);
        assert_eq!(outcome.details.len(), 4);
        assert!(outcome.details.iter().all(|detail| detail.found_in_source));
    }

    #[test]
    fn list_fields_take_the_best_candidate() {
        let catalog = TemplateCatalog::standard();
        let template = catalog.get(1).expect("battle 1 exists");
        let fields = submission_fields(&[("key_executives", "Ahmed Ezz")]);

        let outcome = evaluate_fields(
            &fields,
            template,
            &dataset(),
            ListMatchPolicy::BestMatch,
            &ScoringConfig::default(),
        );

        let executives = outcome
            .details
            .iter()
            .find(|detail| detail.field == "key_executives")
            .expect("detail recorded");
        assert_eq!(executives.match_score, 1.0);
        assert_eq!(executives.contribution, 18.0);
    }

    #[test]
    fn unresolved_fields_contribute_zero() {
        let catalog = TemplateCatalog::standard();
        let template = catalog.get(1).expect("battle 1 exists");
        let empty_dataset = ReferenceDataset::new(json!({}));
        let fields = submission_fields(&[("founders", "Ezz Steel Company S.A.E.")]);

        let outcome = evaluate_fields(
            &fields,
            template,
            &empty_dataset,
            ListMatchPolicy::BestMatch,
            &ScoringConfig::default(),
        );

        assert_eq!(outcome.total, 0.0);
        assert!(outcome.details.iter().all(|detail| !detail.found_in_source));
        assert!(outcome.details.iter().all(|detail| detail.contribution == 0.0));
    }

    #[test]
    fn totals_stay_within_template_weight_sum() {
        let catalog = TemplateCatalog::standard();
        for (_, template) in catalog.iter() {
            let fields = submission_fields(&[
                ("founders", "Ezz Steel"),
                ("market_share", "55%"),
                ("partners", "Danieli Group"),
            ]);
            let outcome = evaluate_fields(
                &fields,
                template,
                &dataset(),
                ListMatchPolicy::BestMatch,
                &ScoringConfig::default(),
            );

            assert!(outcome.total >= 0.0);
            assert!(outcome.total <= template.weight_sum());

            let contribution_sum: f64 = outcome
                .details
                .iter()
                .map(|detail| detail.contribution)
                .sum();
            assert!((contribution_sum - outcome.total).abs() < 1e-9);
        }
    }
}
