//! Deterministic scoring for the Market Intelligence War Room game.
//!
//! The crate grades a structured battle submission against a fixed reference
//! dataset and battle template, producing a bounded composite score, a
//! per-field accuracy breakdown, a confidence estimate, and an advisory
//! escalation flag. Grading is a pure function of the submission plus the
//! immutable catalog, configuration, and dataset loaded at process start.

pub mod config;
pub mod error;
pub mod scoring;
pub mod telemetry;
