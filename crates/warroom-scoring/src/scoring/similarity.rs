//! Type-dispatched field similarity.
//!
//! Every comparison runs over coerced text. Text kinds share one
//! normalization pass (lowercase, diacritics folded, punctuation blanked,
//! whitespace collapsed) followed by an order-independent token ratio;
//! numeric kinds extract the first usable numeral and apply tolerance bands.
//! Malformed input never raises, it scores 0.0.

use std::sync::OnceLock;

use regex::Regex;

use super::config::ScoringConfig;
use super::template::FieldKind;

/// Shared first step for text comparisons.
pub(crate) fn normalize_text(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars().flat_map(char::to_lowercase).map(fold_diacritic) {
        if c.is_ascii_alphanumeric() {
            if pending_space && !normalized.is_empty() {
                normalized.push(' ');
            }
            pending_space = false;
            normalized.push(c);
        } else {
            pending_space = true;
        }
    }

    normalized
}

/// ASCII fold for the Latin diacritics that show up in names. Anything not
/// mapped here falls through to the punctuation pass.
fn fold_diacritic(c: char) -> char {
    match c {
        'à'..='å' | 'ā' | 'ă' | 'ą' => 'a',
        'è'..='ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ì'..='ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => 'i',
        'ò'..='ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
        'ù'..='ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'ý' | 'ÿ' => 'y',
        'ś' | 'ŝ' | 'ş' | 'š' | 'ß' => 's',
        'ź' | 'ż' | 'ž' => 'z',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'ĺ' | 'ļ' | 'ľ' | 'ł' => 'l',
        'ŕ' | 'ŗ' | 'ř' => 'r',
        'ţ' | 'ť' => 't',
        'ď' | 'đ' => 'd',
        other => other,
    }
}

/// Order-independent token similarity: sort the whitespace tokens of each
/// side, rejoin, and take the indel ratio of the results.
pub(crate) fn token_sort_ratio(a: &str, b: &str) -> f64 {
    let mut left: Vec<&str> = a.split_whitespace().collect();
    let mut right: Vec<&str> = b.split_whitespace().collect();
    left.sort_unstable();
    right.sort_unstable();
    indel_ratio(&left.join(" "), &right.join(" "))
}

/// Normalized insert/delete similarity: `2 * lcs / (len_a + len_b)`.
fn indel_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let lcs = lcs_length(&a, &b) as f64;
    2.0 * lcs / (a.len() + b.len()) as f64
}

fn lcs_length(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                curr[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

fn year_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Finds the 4-digit year inside plain YYYY, MM/DD/YYYY, and YYYY-MM-DD
    // forms; the first match wins.
    RE.get_or_init(|| Regex::new(r"\b((?:19|20)\d{2})\b").expect("year pattern compiles"))
}

pub(crate) fn extract_year(text: &str) -> Option<i32> {
    year_pattern()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn number_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-?\d+\.?\d*").expect("number pattern compiles"))
}

/// First signed decimal numeral after currency symbols and thousands
/// separators are stripped.
pub(crate) fn extract_number(text: &str) -> Option<f64> {
    if text.is_empty() {
        return None;
    }

    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | '€' | '£' | '¥'))
        .map(|c| {
            if c.is_ascii_digit() || c == '.' || c == '-' {
                c
            } else {
                ' '
            }
        })
        .collect();

    number_pattern()
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

fn percent_patterns() -> &'static [Regex; 2] {
    static RES: OnceLock<[Regex; 2]> = OnceLock::new();
    RES.get_or_init(|| {
        [
            Regex::new(r"(\d+\.?\d*)\s*%").expect("percent pattern compiles"),
            Regex::new(r"(\d+\.?\d*)\s*percent").expect("percent word pattern compiles"),
        ]
    })
}

pub(crate) fn extract_percentage(text: &str) -> Option<f64> {
    if text.is_empty() {
        return None;
    }

    let lowered = text.to_lowercase();
    for pattern in percent_patterns() {
        if let Some(caps) = pattern.captures(&lowered) {
            if let Ok(value) = caps[1].parse::<f64>() {
                return Some(value);
            }
        }
    }

    None
}

pub(crate) fn name_similarity(submitted: &str, reference: &str, config: &ScoringConfig) -> f64 {
    if submitted.is_empty() || reference.is_empty() {
        return 0.0;
    }

    let submitted = normalize_text(submitted);
    let reference = normalize_text(reference);

    if submitted == reference {
        return 1.0;
    }

    let ratio = token_sort_ratio(&submitted, &reference);

    if ratio >= config.name_similarity_threshold {
        1.0
    } else if ratio >= config.name_partial_threshold {
        // Partial credit passes the ratio through unchanged.
        ratio
    } else {
        0.0
    }
}

/// Binary: categories either clear the threshold or score nothing.
pub(crate) fn category_similarity(submitted: &str, reference: &str, config: &ScoringConfig) -> f64 {
    if submitted.is_empty() || reference.is_empty() {
        return 0.0;
    }

    let submitted = normalize_text(submitted);
    let reference = normalize_text(reference);

    if submitted == reference {
        return 1.0;
    }

    if token_sort_ratio(&submitted, &reference) >= config.category_similarity_threshold {
        1.0
    } else {
        0.0
    }
}

pub(crate) fn date_similarity(submitted: &str, reference: &str, config: &ScoringConfig) -> f64 {
    if submitted.is_empty() || reference.is_empty() {
        return 0.0;
    }

    let (submitted_year, reference_year) = match (extract_year(submitted), extract_year(reference))
    {
        (Some(sub), Some(reference)) => (sub, reference),
        _ => return 0.0,
    };

    if (submitted_year - reference_year).abs() <= config.date_tolerance_years {
        1.0
    } else {
        0.0
    }
}

pub(crate) fn numeric_similarity(submitted: &str, reference: &str, config: &ScoringConfig) -> f64 {
    if submitted.is_empty() || reference.is_empty() {
        return 0.0;
    }

    let (submitted, reference) = match (extract_number(submitted), extract_number(reference)) {
        (Some(sub), Some(reference)) if reference != 0.0 => (sub, reference),
        _ => return 0.0,
    };

    let diff_percent = (submitted - reference).abs() / reference * 100.0;

    if diff_percent <= config.numeric_tolerance_percent {
        1.0
    } else if diff_percent <= config.numeric_partial_tolerance_percent {
        // Linear slide from 1.0 at the full band down to 0.5 at the partial
        // band edge.
        1.0 - (diff_percent - config.numeric_tolerance_percent)
            / (config.numeric_partial_tolerance_percent - config.numeric_tolerance_percent)
            * 0.5
    } else {
        0.0
    }
}

pub(crate) fn percentage_similarity(
    submitted: &str,
    reference: &str,
    config: &ScoringConfig,
) -> f64 {
    if submitted.is_empty() || reference.is_empty() {
        return 0.0;
    }

    let (submitted, reference) =
        match (extract_percentage(submitted), extract_percentage(reference)) {
            (Some(sub), Some(reference)) => (sub, reference),
            _ => return 0.0,
        };

    let diff = (submitted - reference).abs();

    if diff <= config.percentage_tolerance {
        1.0
    } else if diff <= config.percentage_partial_tolerance {
        1.0 - (diff - config.percentage_tolerance)
            / (config.percentage_partial_tolerance - config.percentage_tolerance)
            * 0.5
    } else {
        0.0
    }
}

/// Dispatch on the field's declared kind. URLs compare like names over their
/// normalized text.
pub(crate) fn field_similarity(
    kind: FieldKind,
    submitted: &str,
    reference: &str,
    config: &ScoringConfig,
) -> f64 {
    match kind {
        FieldKind::Name | FieldKind::Url => name_similarity(submitted, reference, config),
        FieldKind::Date => date_similarity(submitted, reference, config),
        FieldKind::Number => numeric_similarity(submitted, reference, config),
        FieldKind::Percentage => percentage_similarity(submitted, reference, config),
        FieldKind::Category => category_similarity(submitted, reference, config),
    }
}
