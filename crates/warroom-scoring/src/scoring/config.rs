use serde::{Deserialize, Serialize};

/// Tunable constants for the deterministic scorers. Built once at startup
/// and never mutated; every grade reads the same values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub name_similarity_threshold: f64,
    pub name_partial_threshold: f64,
    pub category_similarity_threshold: f64,
    pub date_tolerance_years: i32,
    pub numeric_tolerance_percent: f64,
    pub numeric_partial_tolerance_percent: f64,
    pub percentage_tolerance: f64,
    pub percentage_partial_tolerance: f64,
    pub speed_tiers: Vec<SpeedTier>,
    pub source_credibility: SourceCredibility,
    pub source_rules: SourceRules,
    pub confidence_threshold: f64,
    pub source_credibility_threshold: f64,
    pub max_missing_fields: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            name_similarity_threshold: 0.90,
            name_partial_threshold: 0.70,
            category_similarity_threshold: 0.85,
            date_tolerance_years: 1,
            numeric_tolerance_percent: 5.0,
            numeric_partial_tolerance_percent: 10.0,
            percentage_tolerance: 2.0,
            percentage_partial_tolerance: 5.0,
            speed_tiers: vec![
                SpeedTier::new(10.0, 10.0),
                SpeedTier::new(20.0, 8.0),
                SpeedTier::new(30.0, 6.0),
                SpeedTier::new(40.0, 4.0),
                SpeedTier::new(50.0, 2.0),
                SpeedTier::new(60.0, 1.0),
            ],
            source_credibility: SourceCredibility::default(),
            source_rules: SourceRules::default(),
            confidence_threshold: 0.75,
            source_credibility_threshold: 0.50,
            max_missing_fields: 2,
        }
    }
}

/// One rung of the tiered speed score, scanned in ascending order of
/// `max_minutes`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedTier {
    pub max_minutes: f64,
    pub score: f64,
}

impl SpeedTier {
    pub const fn new(max_minutes: f64, score: f64) -> Self {
        Self { max_minutes, score }
    }
}

/// Credibility assigned to each recognized source class, all in [0, 1].
/// `research_portal` is retained in the table but not currently produced by
/// the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCredibility {
    pub filings: f64,
    pub company_domain: f64,
    pub wire_press: f64,
    pub data_vendor: f64,
    pub professional_network: f64,
    pub research_portal: f64,
    pub blogs: f64,
    pub social_media: f64,
    pub unknown: f64,
}

impl Default for SourceCredibility {
    fn default() -> Self {
        Self {
            filings: 0.95,
            company_domain: 0.90,
            wire_press: 0.85,
            data_vendor: 0.80,
            professional_network: 0.75,
            research_portal: 0.70,
            blogs: 0.50,
            social_media: 0.40,
            unknown: 0.30,
        }
    }
}

/// Domain substrings driving source classification, checked in the class
/// precedence order of the scorer. The subject company's domains live here
/// rather than in code so a different reference entity only needs new
/// configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRules {
    pub filing_domains: Vec<String>,
    pub company_domains: Vec<String>,
    pub wire_press_domains: Vec<String>,
    pub data_vendor_domains: Vec<String>,
    pub professional_network_domains: Vec<String>,
    pub blog_markers: Vec<String>,
    pub social_markers: Vec<String>,
}

impl Default for SourceRules {
    fn default() -> Self {
        Self {
            filing_domains: to_owned(&["sec.gov", "edgar", "filings"]),
            company_domains: to_owned(&["ezzsteel"]),
            wire_press_domains: to_owned(&["reuters.com", "bloomberg.com", "wsj.com", "ft.com"]),
            data_vendor_domains: to_owned(&["crunchbase"]),
            professional_network_domains: to_owned(&["linkedin"]),
            blog_markers: to_owned(&["blog", "medium", "substack"]),
            social_markers: to_owned(&["facebook", "twitter", "instagram", "youtube"]),
        }
    }
}

fn to_owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}
