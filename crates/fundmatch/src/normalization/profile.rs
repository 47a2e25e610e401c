use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};

use super::{clean_text, mentions_any, numbers_with_units, words};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y"];

/// Inclusive headcount range; `max == None` is open-ended.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadcountRange {
    pub min: f64,
    pub max: Option<f64>,
}

pub fn normalize_team_size(raw: &str) -> Option<HeadcountRange> {
    let text = clean_text(raw);

    let by_code = match text.as_str() {
        "1to2" => Some((1.0, Some(2.0))),
        "3to5" => Some((3.0, Some(5.0))),
        "6to10" => Some((6.0, Some(10.0))),
        "over10" => Some((11.0, None)),
        _ => None,
    };
    if let Some((min, max)) = by_code {
        return Some(HeadcountRange { min, max });
    }

    let counts: Vec<f64> = numbers_with_units(&text)
        .into_iter()
        .filter(|(_, unit)| unit.as_deref() != Some("%"))
        .map(|(value, _)| value)
        .collect();

    match counts.as_slice() {
        [] => None,
        [count] if mentions_any(&text, &["at least", "minimum", "or more", "more than", "mindestens"]) => {
            Some(HeadcountRange { min: *count, max: None })
        }
        [count]
            if text.contains('<')
                || mentions_any(&text, &["fewer than", "less than", "up to", "maximum", "max", "below", "under"]) =>
        {
            Some(HeadcountRange { min: 1.0, max: Some(*count) })
        }
        [count] => Some(HeadcountRange { min: *count, max: Some(*count) }),
        [first, second, ..] => Some(HeadcountRange {
            min: first.min(*second),
            max: Some(first.max(*second)),
        }),
    }
}

pub fn match_team_size(user: Option<&HeadcountRange>, program: Option<&HeadcountRange>) -> bool {
    let (Some(user), Some(program)) = (user, program) else {
        return true;
    };

    user.min <= program.max.unwrap_or(f64::INFINITY) && program.min <= user.max.unwrap_or(f64::INFINITY)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RevenueStatus {
    PreRevenue,
    EarlyRevenue,
    Established,
}

pub fn normalize_revenue_status(raw: &str) -> Option<RevenueStatus> {
    let text = clean_text(raw);
    match text.as_str() {
        "pre_revenue" => return Some(RevenueStatus::PreRevenue),
        "early_revenue" => return Some(RevenueStatus::EarlyRevenue),
        "established_revenue" | "growing_revenue" => return Some(RevenueStatus::Established),
        _ => {}
    }

    if mentions_any(&text, &["pre-revenue", "pre revenue", "no revenue", "without revenue", "kein umsatz"]) {
        Some(RevenueStatus::PreRevenue)
    } else if mentions_any(&text, &["early revenue", "first revenue", "first customers", "erste umsätze"]) {
        Some(RevenueStatus::EarlyRevenue)
    } else if mentions_any(&text, &["established", "profitable", "stable revenue", "recurring revenue"]) {
        Some(RevenueStatus::Established)
    } else {
        None
    }
}

/// Revenue statuses a program accepts, read from an explicit rule.
pub fn normalize_revenue_constraint(raw: &str) -> Option<BTreeSet<RevenueStatus>> {
    let text = clean_text(raw);

    if mentions_any(&text, &["pre-revenue", "pre revenue", "no revenue", "before revenue"]) {
        return Some(BTreeSet::from([RevenueStatus::PreRevenue]));
    }
    if mentions_any(&text, &["proven revenue", "revenue-generating", "revenue generating", "existing revenue", "track record"]) {
        return Some(BTreeSet::from([RevenueStatus::EarlyRevenue, RevenueStatus::Established]));
    }
    if mentions_any(&text, &["profitable", "established revenue", "audited financial"]) {
        return Some(BTreeSet::from([RevenueStatus::Established]));
    }

    normalize_revenue_status(&text).map(|status| BTreeSet::from([status]))
}

/// Revenue statuses implied by a program's funding instruments.
pub fn revenue_constraint_from_funding_types(types: &[String]) -> Option<BTreeSet<RevenueStatus>> {
    if types.is_empty() {
        return None;
    }

    let types: Vec<String> = types.iter().map(|kind| clean_text(kind)).collect();
    let any_of = |accepted: &[&str]| types.iter().any(|kind| accepted.contains(&kind.as_str()));

    let mut statuses = BTreeSet::from([RevenueStatus::Established]);
    if any_of(&["grant", "subsidy", "angel_investment", "crowdfunding", "micro_credit", "visa_application"]) {
        statuses.insert(RevenueStatus::PreRevenue);
    }
    if !any_of(&["venture_capital"]) {
        statuses.insert(RevenueStatus::EarlyRevenue);
    }
    Some(statuses)
}

pub fn match_revenue_status(
    user: Option<&RevenueStatus>,
    program: Option<&BTreeSet<RevenueStatus>>,
) -> bool {
    match (user, program) {
        (Some(status), Some(accepted)) => accepted.contains(status),
        _ => true,
    }
}

/// Canonical tags drawn from a fixed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSet(pub BTreeSet<&'static str>);

const IMPACT_TAGS: &[(&str, &[&str])] = &[
    ("environmental", &["environment", "climate", "green", "emission", "co2", "sustainab", "biodiversity"]),
    ("social", &["social", "inclusion", "diversity", "gender", "women", "community"]),
    ("economic", &["jobs", "job creation", "employment", "regional development", "economic growth", "arbeitsplätze"]),
    ("innovation", &["innovation", "innovative", "novel", "breakthrough"]),
];

const USE_OF_FUNDS_TAGS: &[(&str, &[&str])] = &[
    ("rd", &["rd", "r&d", "research", "development", "prototyp", "forschung", "entwicklung"]),
    ("marketing", &["marketing", "sales", "vertrieb", "go-to-market"]),
    ("hiring", &["hiring", "personnel", "staff", "salaries", "recruit"]),
    ("equipment", &["equipment", "machinery", "hardware", "infrastructure", "anlagen"]),
    ("internationalization", &["internationali", "export", "new markets", "expansion abroad"]),
    ("working_capital", &["working capital", "operating costs", "liquidity", "betriebsmittel"]),
    ("training", &["training", "qualification", "weiterbildung", "coaching"]),
];

fn tags(raw: &str, vocabulary: &[(&'static str, &[&str])]) -> Option<TagSet> {
    let text = clean_text(raw);
    let found: BTreeSet<&'static str> = vocabulary
        .iter()
        .filter(|(tag, synonyms)| text == *tag || mentions_any(&text, synonyms))
        .map(|(tag, _)| *tag)
        .collect();

    (!found.is_empty()).then_some(TagSet(found))
}

pub fn normalize_impact_focus(raw: &str) -> Option<TagSet> {
    tags(raw, IMPACT_TAGS)
}

pub fn normalize_use_of_funds(raw: &str) -> Option<TagSet> {
    tags(raw, USE_OF_FUNDS_TAGS)
}

pub fn match_tags(user: Option<&TagSet>, program: Option<&TagSet>) -> bool {
    match (user, program) {
        (Some(user), Some(program)) => user.0.intersection(&program.0).next().is_some(),
        _ => true,
    }
}

/// How soon the applicant needs to submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeadlineUrgency {
    Urgent,
    Soon,
    Flexible,
    Anytime,
}

impl DeadlineUrgency {
    pub fn window_days(self) -> Option<u64> {
        match self {
            DeadlineUrgency::Urgent => Some(30),
            DeadlineUrgency::Soon => Some(90),
            DeadlineUrgency::Flexible => Some(180),
            DeadlineUrgency::Anytime => None,
        }
    }
}

pub fn normalize_urgency(raw: &str) -> Option<DeadlineUrgency> {
    let text = clean_text(raw);
    match text.as_str() {
        "urgent" | "within_1_month" => Some(DeadlineUrgency::Urgent),
        "soon" | "within_3_months" => Some(DeadlineUrgency::Soon),
        "flexible" | "within_6_months" => Some(DeadlineUrgency::Flexible),
        "anytime" | "no_deadline" => Some(DeadlineUrgency::Anytime),
        _ if mentions_any(&text, &["asap", "urgent", "immediately"]) => Some(DeadlineUrgency::Urgent),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deadline {
    Rolling,
    Dated(NaiveDate),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDeadlines {
    pub deadlines: Vec<Deadline>,
}

pub fn normalize_deadline(raw: &str) -> Option<NormalizedDeadlines> {
    let text = clean_text(raw);
    let mut deadlines = Vec::new();

    if text == "open"
        || mentions_any(&text, &["rolling", "continuous", "ongoing", "laufend", "jederzeit", "any time", "anytime", "no deadline", "open call"])
    {
        deadlines.push(Deadline::Rolling);
    }

    for token in text.split_whitespace() {
        let token = token.trim_matches(|c: char| matches!(c, ',' | ';' | '(' | ')' | '.'));
        if let Some(date) = DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(token, format).ok())
        {
            deadlines.push(Deadline::Dated(date));
        }
    }

    (!deadlines.is_empty()).then_some(NormalizedDeadlines { deadlines })
}

/// Without a reference date the deadline cannot be judged and counts as satisfied.
pub fn match_deadline(
    user: Option<&DeadlineUrgency>,
    program: Option<&NormalizedDeadlines>,
    as_of: Option<NaiveDate>,
) -> bool {
    let (Some(urgency), Some(program), Some(today)) = (user, program, as_of) else {
        return true;
    };

    let window_end = urgency
        .window_days()
        .and_then(|days| today.checked_add_days(Days::new(days)));

    program.deadlines.iter().any(|deadline| match deadline {
        Deadline::Rolling => true,
        Deadline::Dated(date) => *date >= today && window_end.map_or(true, |end| *date <= end),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsortiumStance {
    Required,
    Possible,
    SingleApplicant,
}

pub fn normalize_consortium(raw: &str) -> Option<ConsortiumStance> {
    let text = clean_text(raw);
    match text.as_str() {
        "yes" | "true" | "consortium_yes" => return Some(ConsortiumStance::Required),
        "no" | "false" | "consortium_no" => return Some(ConsortiumStance::SingleApplicant),
        "open" | "maybe" | "consortium_open" => return Some(ConsortiumStance::Possible),
        _ => {}
    }

    if mentions_any(&text, &["single applicant", "individual applicant", "no consortium", "einzelantrag"]) {
        Some(ConsortiumStance::SingleApplicant)
    } else if mentions_any(
        &text,
        &[
            "not required", "not necessary", "not mandatory", "optional", "possible", "may apply",
            "can apply", "encouraged", "keine", "nicht erforderlich",
        ],
    ) {
        Some(ConsortiumStance::Possible)
    } else if mentions_any(&text, &["consortium", "partners", "collaborative", "cooperation", "kooperation", "konsortium"]) {
        Some(ConsortiumStance::Required)
    } else {
        None
    }
}

pub fn match_consortium(user: Option<&ConsortiumStance>, program: Option<&ConsortiumStance>) -> bool {
    !matches!(
        (user, program),
        (Some(ConsortiumStance::SingleApplicant), Some(ConsortiumStance::Required))
    )
}

/// Technology readiness levels, 1 through 9 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrlRange {
    pub min: u8,
    pub max: u8,
}

pub fn normalize_trl(raw: &str) -> Option<TrlRange> {
    let text = clean_text(raw);
    match text.as_str() {
        "trl_1_3" => return Some(TrlRange { min: 1, max: 3 }),
        "trl_4_6" => return Some(TrlRange { min: 4, max: 6 }),
        "trl_7_9" => return Some(TrlRange { min: 7, max: 9 }),
        _ => {}
    }

    let levels: Vec<u8> = words(&text)
        .filter_map(|word| word.trim_start_matches("trl").parse::<u8>().ok())
        .filter(|level| (1..=9).contains(level))
        .collect();

    match levels.as_slice() {
        [] => None,
        [level] if text.contains('+') || mentions_any(&text, &["at least", "or higher", "minimum", "from", "ab"]) => {
            Some(TrlRange { min: *level, max: 9 })
        }
        [level] if mentions_any(&text, &["up to", "maximum", "or lower", "below"]) => {
            Some(TrlRange { min: 1, max: *level })
        }
        [level] => Some(TrlRange { min: *level, max: *level }),
        [first, second, ..] => Some(TrlRange {
            min: *first.min(second),
            max: *first.max(second),
        }),
    }
}

pub fn match_trl(user: Option<&TrlRange>, program: Option<&TrlRange>) -> bool {
    match (user, program) {
        (Some(user), Some(program)) => user.min <= program.max && program.min <= user.max,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid date")
    }

    #[test]
    fn team_size_limits_are_read_from_text() {
        let program = normalize_team_size("Fewer than 50 employees").expect("limit");
        assert_eq!(program, HeadcountRange { min: 1.0, max: Some(50.0) });

        let solo = normalize_team_size("1to2");
        assert!(match_team_size(solo.as_ref(), Some(&program)));

        let minimum = normalize_team_size("at least 3 founders");
        assert!(!match_team_size(solo.as_ref(), minimum.as_ref()));
    }

    #[test]
    fn venture_capital_excludes_early_revenue() {
        let accepted = revenue_constraint_from_funding_types(&["venture_capital".to_string()]).expect("types");
        assert!(!match_revenue_status(Some(&RevenueStatus::EarlyRevenue), Some(&accepted)));
        assert!(!match_revenue_status(Some(&RevenueStatus::PreRevenue), Some(&accepted)));
        assert!(match_revenue_status(Some(&RevenueStatus::Established), Some(&accepted)));

        let grants = revenue_constraint_from_funding_types(&["grant".to_string()]).expect("types");
        assert!(match_revenue_status(Some(&RevenueStatus::PreRevenue), Some(&grants)));
    }

    #[test]
    fn explicit_revenue_rules() {
        let rule = normalize_revenue_constraint("Applicants must have proven revenue").expect("rule");
        assert!(!rule.contains(&RevenueStatus::PreRevenue));
        assert_eq!(normalize_revenue_status("pre_revenue"), Some(RevenueStatus::PreRevenue));
    }

    #[test]
    fn tags_intersect() {
        let user = normalize_use_of_funds("rd");
        let program = normalize_use_of_funds("Funding covers R&D personnel and prototypes");
        assert!(match_tags(user.as_ref(), program.as_ref()));

        let marketing = normalize_use_of_funds("marketing");
        let equipment = normalize_use_of_funds("machinery and equipment");
        assert!(!match_tags(marketing.as_ref(), equipment.as_ref()));

        let impact = normalize_impact_focus("Climate and biodiversity").expect("impact");
        assert!(impact.0.contains("environmental"));
    }

    #[test]
    fn rolling_deadlines_always_match() {
        let program = normalize_deadline("Rolling submissions").expect("deadline");
        let urgent = normalize_urgency("urgent");
        assert!(match_deadline(urgent.as_ref(), Some(&program), Some(date("2025-03-01"))));
    }

    #[test]
    fn dated_deadlines_must_fall_inside_the_window() {
        let program = normalize_deadline("Deadline: 15.04.2025").expect("deadline");
        let today = Some(date("2025-03-01"));

        assert!(!match_deadline(Some(&DeadlineUrgency::Urgent), Some(&program), today));
        assert!(match_deadline(Some(&DeadlineUrgency::Soon), Some(&program), today));
        assert!(!match_deadline(Some(&DeadlineUrgency::Soon), Some(&program), Some(date("2025-05-01"))));
        assert!(match_deadline(Some(&DeadlineUrgency::Urgent), Some(&program), None));
    }

    #[test]
    fn consortium_programs_reject_single_applicants() {
        let program = normalize_consortium("At least three partners from two member states");
        assert_eq!(program, Some(ConsortiumStance::Required));
        let user = normalize_consortium("no");
        assert!(!match_consortium(user.as_ref(), program.as_ref()));
        assert!(match_consortium(normalize_consortium("open").as_ref(), program.as_ref()));
    }

    #[test]
    fn negated_consortium_wording_admits_single_applicants() {
        let single = normalize_consortium("no");
        for text in [
            "Consortium not required",
            "Partners are not necessary",
            "Consortium optional",
            "Keine Kooperation notwendig",
        ] {
            let program = normalize_consortium(text);
            assert_eq!(program, Some(ConsortiumStance::Possible), "{text}");
            assert!(match_consortium(single.as_ref(), program.as_ref()), "{text}");
        }
    }

    #[test]
    fn trl_ranges_overlap() {
        let program = normalize_trl("TRL 5 or higher").expect("trl");
        assert_eq!(program, TrlRange { min: 5, max: 9 });
        assert!(match_trl(normalize_trl("trl_4_6").as_ref(), Some(&program)));
        assert!(!match_trl(normalize_trl("trl_1_3").as_ref(), Some(&program)));
        assert_eq!(normalize_trl("TRL 4-6"), Some(TrlRange { min: 4, max: 6 }));
    }
}
