use std::collections::BTreeSet;

use super::{clean_text, mentions_any, mentions_word, numbers_with_units};

/// Months of slack applied when comparing company ages.
const AGE_TOLERANCE_MONTHS: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CompanyKind {
    Startup,
    Sme,
    Large,
    Research,
    Nonprofit,
    Public,
    Individual,
}

impl CompanyKind {
    const ALL: [CompanyKind; 7] = [
        CompanyKind::Startup,
        CompanyKind::Sme,
        CompanyKind::Large,
        CompanyKind::Research,
        CompanyKind::Nonprofit,
        CompanyKind::Public,
        CompanyKind::Individual,
    ];

    fn synonyms(self) -> &'static [&'static str] {
        match self {
            CompanyKind::Startup => &["startup", "start-up", "start up", "new venture", "young compan", "early-stage compan"],
            CompanyKind::Sme => &["sme", "smes", "kmu", "kmü", "small and medium", "small business", "small enterprise", "medium-sized", "mittelstand", "micro enterprise", "micro-enterprise"],
            CompanyKind::Large => &["large", "corporation", "corporate", "big compan", "more than 250", "> 250"],
            CompanyKind::Research => &["research", "universit", "academic", "hochschul"],
            CompanyKind::Nonprofit => &["nonprofit", "non-profit", "ngo", "association", "verein", "charit"],
            CompanyKind::Public => &["public bod", "public sector", "public authorit", "municipal", "government", "gemeinde"],
            CompanyKind::Individual => &["individual", "freelanc", "self-employed", "sole proprietor", "natural person", "einzelunternehm"],
        }
    }

    /// Kinds a user of this kind also counts as when a program lists eligible applicants.
    fn implied(self) -> &'static [CompanyKind] {
        match self {
            CompanyKind::Startup => &[CompanyKind::Startup, CompanyKind::Sme],
            CompanyKind::Sme => &[CompanyKind::Sme],
            CompanyKind::Large => &[CompanyKind::Large],
            CompanyKind::Research => &[CompanyKind::Research],
            CompanyKind::Nonprofit => &[CompanyKind::Nonprofit],
            CompanyKind::Public => &[CompanyKind::Public],
            CompanyKind::Individual => &[CompanyKind::Individual],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCompanyType {
    pub kinds: BTreeSet<CompanyKind>,
}

pub fn normalize_company_type(raw: &str) -> Option<NormalizedCompanyType> {
    let text = clean_text(raw);
    let kinds: BTreeSet<CompanyKind> = CompanyKind::ALL
        .into_iter()
        .filter(|kind| mentions_any(&text, kind.synonyms()))
        .collect();

    (!kinds.is_empty()).then_some(NormalizedCompanyType { kinds })
}

pub fn match_company_type(
    user: Option<&NormalizedCompanyType>,
    program: Option<&NormalizedCompanyType>,
) -> bool {
    let (Some(user), Some(program)) = (user, program) else {
        return true;
    };

    user.kinds
        .iter()
        .flat_map(|kind| kind.implied())
        .any(|kind| program.kinds.contains(kind))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompanyStage {
    Idea,
    PreCompany,
    IncorporatedUnder6Months,
    Incorporated6To36Months,
    IncorporatedOver36Months,
    ResearchOrganisation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Maturity {
    Early,
    Growth,
    Mature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedCompanyStage {
    pub stage: CompanyStage,
    pub maturity: Maturity,
    /// Company age in months; `None` upper bound means open-ended.
    pub age_months: Option<(f64, Option<f64>)>,
}

impl NormalizedCompanyStage {
    fn new(stage: CompanyStage, age_months: Option<(f64, Option<f64>)>) -> Self {
        let maturity = match stage {
            CompanyStage::Idea | CompanyStage::PreCompany | CompanyStage::IncorporatedUnder6Months => {
                Maturity::Early
            }
            CompanyStage::Incorporated6To36Months => Maturity::Growth,
            CompanyStage::IncorporatedOver36Months | CompanyStage::ResearchOrganisation => Maturity::Mature,
        };

        Self {
            stage,
            maturity,
            age_months,
        }
    }
}

/// Reads either an option code (`inc_6_36m`) or a free-text stage description.
pub fn normalize_company_stage(raw: &str) -> Option<NormalizedCompanyStage> {
    let text = clean_text(raw);

    let by_code = match text.as_str() {
        "idea" => Some(CompanyStage::Idea),
        "pre_company" => Some(CompanyStage::PreCompany),
        "inc_lt_6m" | "early_stage" => Some(CompanyStage::IncorporatedUnder6Months),
        "inc_6_36m" | "growth_stage" => Some(CompanyStage::Incorporated6To36Months),
        "inc_gt_36m" => Some(CompanyStage::IncorporatedOver36Months),
        "research_org" => Some(CompanyStage::ResearchOrganisation),
        _ => None,
    };
    if let Some(stage) = by_code {
        return Some(NormalizedCompanyStage::new(stage, default_age(stage)));
    }

    let max_age = max_age_months(&text);

    let stage = if mentions_word(&text, &["idea", "ideas", "concept", "concepts"])
        || mentions_any(&text, &["pre-company", "pre-founding", "not yet founded"])
    {
        CompanyStage::Idea
    } else if mentions_any(&text, &["startup", "start-up", "early stage", "early-stage", "newly founded", "seed"])
        || max_age.is_some_and(|age| age <= 6.0)
    {
        CompanyStage::IncorporatedUnder6Months
    } else if mentions_any(&text, &["growth", "scale-up", "scaleup"])
        || max_age.is_some_and(|age| age <= 36.0)
    {
        CompanyStage::Incorporated6To36Months
    } else if mentions_any(&text, &["established", "mature"]) || max_age.is_some() {
        CompanyStage::IncorporatedOver36Months
    } else if mentions_any(&text, &["research", "universit", "academic"]) {
        CompanyStage::ResearchOrganisation
    } else {
        return None;
    };

    let age = match (stage, max_age) {
        (CompanyStage::Idea, _) | (CompanyStage::ResearchOrganisation, _) => default_age(stage),
        (_, Some(max)) => Some((0.0, Some(max))),
        (_, None) => default_age(stage),
    };

    Some(NormalizedCompanyStage::new(stage, age))
}

fn default_age(stage: CompanyStage) -> Option<(f64, Option<f64>)> {
    match stage {
        CompanyStage::Idea | CompanyStage::PreCompany => Some((0.0, Some(0.0))),
        CompanyStage::IncorporatedUnder6Months => Some((0.0, Some(6.0))),
        CompanyStage::Incorporated6To36Months => Some((6.0, Some(36.0))),
        CompanyStage::IncorporatedOver36Months => Some((36.0, None)),
        CompanyStage::ResearchOrganisation => None,
    }
}

fn max_age_months(text: &str) -> Option<f64> {
    numbers_with_units(text)
        .into_iter()
        .find_map(|(value, unit)| match unit.as_deref() {
            Some(unit) if unit.starts_with("month") || unit.starts_with("monat") => Some(value),
            Some(unit) if unit.starts_with("year") || unit.starts_with("jahr") => Some(value * 12.0),
            _ => None,
        })
}

/// Stage, maturity or company age (with a year of slack) must line up.
pub fn match_company_stage(
    user: Option<&NormalizedCompanyStage>,
    program: Option<&NormalizedCompanyStage>,
) -> bool {
    let (Some(user), Some(program)) = (user, program) else {
        return true;
    };

    if user.stage == program.stage || user.maturity == program.maturity {
        return true;
    }

    match (user.age_months, program.age_months) {
        (Some((user_min, user_max)), Some((program_min, program_max))) => {
            let user_max = user_max.unwrap_or(f64::INFINITY);
            let program_max = program_max.unwrap_or(f64::INFINITY);
            user_min <= program_max + AGE_TOLERANCE_MONTHS
                && program_min <= user_max + AGE_TOLERANCE_MONTHS
        }
        _ => false,
    }
}
