//! Canonicalization of user answers and extracted program requirements.
//!
//! Every dimension exposes a `normalize_*` function that never fails (unreadable input
//! yields `None`) and a `match_*` predicate that treats a missing side as "no constraint".
//! The criteria matcher is the only caller that combines them, so filtering and scoring
//! share one definition of "does X satisfy Y".

mod company;
mod funding;
mod industry;
mod location;
mod profile;

pub use company::{
    match_company_stage, match_company_type, normalize_company_stage, normalize_company_type,
    CompanyKind, CompanyStage, Maturity, NormalizedCompanyStage, NormalizedCompanyType,
};
pub use funding::{
    co_financing_from_funding_types, match_co_financing, match_funding_amount,
    normalize_co_financing, normalize_funding_amount, normalize_funding_bounds,
    normalize_funding_requirement, CoFinancingKind, FundingBracket, NormalizedCoFinancing,
    NormalizedFundingAmount, FUNDING_TOLERANCE,
};
pub use industry::{industry_label, match_industry, normalize_industry, NormalizedIndustry};
pub use location::{match_location, normalize_location, Area, NormalizedLocation};
pub use profile::{
    match_consortium, match_deadline, match_revenue_status, match_tags, match_team_size,
    match_trl, normalize_consortium, normalize_deadline, normalize_impact_focus,
    normalize_revenue_constraint, normalize_revenue_status, normalize_team_size,
    normalize_trl, normalize_urgency, normalize_use_of_funds,
    revenue_constraint_from_funding_types, ConsortiumStance, Deadline, DeadlineUrgency,
    HeadcountRange, NormalizedDeadlines, RevenueStatus, TagSet, TrlRange,
};

/// Lowercases and collapses whitespace, dropping invisible characters scrapers leave behind.
pub(crate) fn clean_text(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}', '\u{00a0}'], " ");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

/// Alphanumeric words of an already cleaned text.
pub(crate) fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
}

/// Short codes (`at`, `de`, `eu`, `it`) only match as whole words; longer terms match anywhere.
pub(crate) fn mentions(text: &str, term: &str) -> bool {
    if term.chars().count() <= 3 && term.chars().all(char::is_alphanumeric) {
        words(text).any(|word| word == term)
    } else {
        text.contains(term)
    }
}

pub(crate) fn mentions_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| mentions(text, term))
}

/// Whole-word match for single words that also occur inside longer ones ("idea" in "ideal").
pub(crate) fn mentions_word(text: &str, candidates: &[&str]) -> bool {
    words(text).any(|word| candidates.contains(&word))
}

/// Numbers appearing in free text, with the word (or `%`) directly following each number.
///
/// Handles `1,500,000`, the German `50.000` thousands style and decimals such as `1.5`.
pub(crate) fn numbers_with_units(text: &str) -> Vec<(f64, Option<String>)> {
    let chars: Vec<char> = text.chars().collect();
    let mut found = Vec::new();
    let mut index = 0;

    while index < chars.len() {
        if !chars[index].is_ascii_digit() {
            index += 1;
            continue;
        }

        let start = index;
        while index < chars.len()
            && (chars[index].is_ascii_digit()
                || ((chars[index] == ',' || chars[index] == '.')
                    && chars.get(index + 1).is_some_and(char::is_ascii_digit)))
        {
            index += 1;
        }
        let raw: String = chars[start..index].iter().collect();

        let mut unit_start = index;
        while unit_start < chars.len() && chars[unit_start] == ' ' {
            unit_start += 1;
        }
        let mut unit_end = unit_start;
        if chars.get(unit_start) == Some(&'%') {
            unit_end += 1;
        } else {
            while unit_end < chars.len() && chars[unit_end].is_alphabetic() {
                unit_end += 1;
            }
        }
        let unit = (unit_end > unit_start)
            .then(|| chars[unit_start..unit_end].iter().collect::<String>());

        if let Some(value) = parse_number(&raw) {
            found.push((value, unit));
        }
    }

    found
}

fn parse_number(raw: &str) -> Option<f64> {
    let groups: Vec<&str> = raw.split([',', '.']).collect();
    if groups.len() == 1 {
        return raw.parse().ok();
    }

    let thousands = groups[1..].iter().all(|group| group.len() == 3);
    if thousands {
        return groups.concat().parse().ok();
    }

    raw.replace(',', ".").parse().ok()
}
