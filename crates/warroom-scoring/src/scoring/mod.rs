//! Submission grading: type-dispatched field similarity, weighted accuracy
//! aggregation, tiered speed and source-credibility scoring, confidence and
//! escalation heuristics, and the pure orchestrator tying them together.

pub(crate) mod accuracy;
pub(crate) mod confidence;
pub mod config;
pub mod domain;
pub mod engine;
pub mod evidence;
pub(crate) mod explain;
pub mod records;
pub mod reference;
pub mod router;
pub mod service;
pub(crate) mod similarity;
pub(crate) mod source;
pub(crate) mod speed;
pub mod template;

pub use config::{ScoringConfig, SourceCredibility, SourceRules, SpeedTier};
pub use domain::{
    Attachment, AttachmentKind, CompanyReference, Diagnostics, EvidenceSnippet,
    FieldAccuracyDetail, GradeResult, GradeSubmission, ScoreBreakdown, Team,
};
pub use engine::{GradeError, ScoringEngine};
pub use evidence::{EvidenceCache, EvidenceProvider, NullEvidenceProvider};
pub use records::{RecordError, ScoreOverride, ScoreRecord, ScoreRecordStore};
pub use reference::{ListMatchPolicy, ReferenceDataset};
pub use router::grading_router;
pub use service::{GradingService, GradingServiceError};
pub use template::{BattleTemplate, FieldKind, FieldSpec, TemplateCatalog, TemplateError, TemplateView};
