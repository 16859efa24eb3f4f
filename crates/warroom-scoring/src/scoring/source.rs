use url::Url;

use super::config::{ScoringConfig, SourceRules};
use super::domain::CompanyReference;

/// Maximum points the source component can earn.
const SOURCE_SCALE: f64 = 15.0;

/// Source classes in precedence order; the first matching class wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceClass {
    Filings,
    CompanyDomain,
    WirePress,
    DataVendor,
    ProfessionalNetwork,
    Blog,
    SocialMedia,
    Unknown,
}

pub(crate) struct SourceScore {
    pub raw: f64,
    pub credibility: f64,
    pub verified: bool,
}

/// Score the cited source.
///
/// A declared reference match with "use as primary" bypasses domain
/// inspection entirely; a submission with no citation earns nothing and is
/// unverified. Otherwise the citation's domain is classified and its
/// credibility scaled onto the 15-point component. `verified` reflects only
/// that a citation was present, not its quality.
pub(crate) fn source_score(
    source_link: Option<&Url>,
    company_reference: Option<&CompanyReference>,
    config: &ScoringConfig,
) -> SourceScore {
    if company_reference
        .map(|reference| reference.use_reference_as_primary)
        .unwrap_or(false)
    {
        return SourceScore {
            raw: SOURCE_SCALE,
            credibility: 1.0,
            verified: true,
        };
    }

    let link = match source_link {
        Some(link) => link,
        None => {
            return SourceScore {
                raw: 0.0,
                credibility: 0.0,
                verified: false,
            }
        }
    };

    let credibility = match link.host_str() {
        Some(host) => {
            let domain = host.to_ascii_lowercase();
            class_credibility(classify_domain(&domain, &config.source_rules), config)
        }
        None => config.source_credibility.unknown,
    };

    SourceScore {
        raw: credibility * SOURCE_SCALE,
        credibility,
        verified: true,
    }
}

/// Ordered substring classification: regulatory filings beat the subject
/// company's own domain, which beats wire press, and so on down to social
/// media.
pub(crate) fn classify_domain(domain: &str, rules: &SourceRules) -> SourceClass {
    let matches_any = |markers: &[String]| markers.iter().any(|marker| domain.contains(marker));

    if matches_any(&rules.filing_domains) {
        SourceClass::Filings
    } else if matches_any(&rules.company_domains) {
        SourceClass::CompanyDomain
    } else if matches_any(&rules.wire_press_domains) {
        SourceClass::WirePress
    } else if matches_any(&rules.data_vendor_domains) {
        SourceClass::DataVendor
    } else if matches_any(&rules.professional_network_domains) {
        SourceClass::ProfessionalNetwork
    } else if matches_any(&rules.blog_markers) {
        SourceClass::Blog
    } else if matches_any(&rules.social_markers) {
        SourceClass::SocialMedia
    } else {
        SourceClass::Unknown
    }
}

fn class_credibility(class: SourceClass, config: &ScoringConfig) -> f64 {
    let table = &config.source_credibility;
    match class {
        SourceClass::Filings => table.filings,
        SourceClass::CompanyDomain => table.company_domain,
        SourceClass::WirePress => table.wire_press,
        SourceClass::DataVendor => table.data_vendor,
        SourceClass::ProfessionalNetwork => table.professional_network,
        SourceClass::Blog => table.blogs,
        SourceClass::SocialMedia => table.social_media,
        SourceClass::Unknown => table.unknown,
    }
}
