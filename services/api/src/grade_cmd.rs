use crate::cli::GradeArgs;
use crate::infra::load_reference_dataset;
use warroom_scoring::config::DataConfig;
use warroom_scoring::error::AppError;
use warroom_scoring::scoring::{GradeSubmission, ScoringConfig, ScoringEngine, TemplateCatalog};

/// Grade one submission file against the standard templates and print the
/// result as pretty JSON. Useful for demos and for auditing a grade without
/// standing up the HTTP service.
pub(crate) fn run_grade(args: GradeArgs) -> Result<(), AppError> {
    let raw = std::fs::read_to_string(&args.submission)?;
    let submission: GradeSubmission = serde_json::from_str(&raw)?;

    let reference = load_reference_dataset(&DataConfig {
        reference_path: args.reference,
    })?;

    let engine = ScoringEngine::new(
        TemplateCatalog::standard(),
        ScoringConfig::default(),
        reference,
    );

    let result = engine.grade(&submission)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
