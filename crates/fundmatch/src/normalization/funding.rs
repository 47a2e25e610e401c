use crate::catalog::FundingBounds;

use super::{clean_text, mentions_any, numbers_with_units};

/// Relative slack around a program's advertised funding range.
pub const FUNDING_TOLERANCE: f64 = 0.5;

const NON_REPAYABLE_TYPES: &[&str] = &[
    "grant",
    "subsidy",
    "coaching",
    "mentoring",
    "networking",
    "consultation",
    "workshop",
    "support_program",
    "consulting_support",
    "acceleration_program",
    "gründungsprogramm",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FundingBracket {
    Under100k,
    From100kTo500k,
    From500kTo2m,
    Over2m,
    Custom,
}

impl FundingBracket {
    fn from_code(code: &str) -> Option<Self> {
        match code {
            "under100k" => Some(FundingBracket::Under100k),
            "100kto500k" => Some(FundingBracket::From100kTo500k),
            "500kto2m" => Some(FundingBracket::From500kTo2m),
            "over2m" => Some(FundingBracket::Over2m),
            _ => None,
        }
    }

    fn bounds(self) -> Option<(f64, Option<f64>)> {
        match self {
            FundingBracket::Under100k => Some((0.0, Some(100_000.0))),
            FundingBracket::From100kTo500k => Some((100_000.0, Some(500_000.0))),
            FundingBracket::From500kTo2m => Some((500_000.0, Some(2_000_000.0))),
            FundingBracket::Over2m => Some((2_000_000.0, None)),
            FundingBracket::Custom => None,
        }
    }
}

/// Amount range in EUR. `max == None` is open-ended.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedFundingAmount {
    pub min: f64,
    pub max: Option<f64>,
    pub bracket: FundingBracket,
}

impl NormalizedFundingAmount {
    fn custom(min: f64, max: Option<f64>) -> Self {
        Self {
            min,
            max,
            bracket: FundingBracket::Custom,
        }
    }
}

/// User side: a bracket code, a plain number or a written amount such as "€150k".
pub fn normalize_funding_amount(raw: &str) -> Option<NormalizedFundingAmount> {
    let text = clean_text(raw);
    let compact = text.replace([' ', '-', '_'], "");

    if let Some(bracket) = FundingBracket::from_code(&compact) {
        let (min, max) = bracket.bounds()?;
        return Some(NormalizedFundingAmount { min, max, bracket });
    }

    let amounts = money_amounts(&text);
    match amounts.as_slice() {
        [] => None,
        [single] if mentions_any(&text, &["over", "above", "more than", "at least", "mindestens"]) => {
            Some(NormalizedFundingAmount::custom(*single, None))
        }
        [single] if mentions_any(&text, &["under", "below", "up to", "less than", "bis"]) => {
            Some(NormalizedFundingAmount::custom(0.0, Some(*single)))
        }
        [single] => Some(NormalizedFundingAmount::custom(*single, Some(*single))),
        [first, second, ..] => {
            let (min, max) = ordered(*first, *second);
            Some(NormalizedFundingAmount::custom(min, Some(max)))
        }
    }
}

/// Program side from the structured `fundingAmount` field. Zero bounds mean "not stated".
pub fn normalize_funding_bounds(bounds: &FundingBounds) -> Option<NormalizedFundingAmount> {
    let min = bounds.min.filter(|value| *value > 0.0);
    let max = bounds.max.filter(|value| *value > 0.0);
    if min.is_none() && max.is_none() {
        return None;
    }

    Some(NormalizedFundingAmount::custom(min.unwrap_or(0.0), max))
}

/// Program side from extracted requirement text ("up to EUR 200.000", "50k - 1.5 Mio").
pub fn normalize_funding_requirement(raw: &str) -> Option<NormalizedFundingAmount> {
    let text = clean_text(raw);
    let amounts = money_amounts(&text);

    match amounts.as_slice() {
        [] => None,
        [single] if mentions_any(&text, &["at least", "minimum", "min", "from", "ab"]) => {
            Some(NormalizedFundingAmount::custom(*single, None))
        }
        [single] => Some(NormalizedFundingAmount::custom(0.0, Some(*single))),
        [first, second, ..] => {
            let (min, max) = ordered(*first, *second);
            Some(NormalizedFundingAmount::custom(min, Some(max)))
        }
    }
}

fn ordered(first: f64, second: f64) -> (f64, f64) {
    if first <= second {
        (first, second)
    } else {
        (second, first)
    }
}

fn money_amounts(text: &str) -> Vec<f64> {
    numbers_with_units(text)
        .into_iter()
        .filter_map(|(value, unit)| match unit.as_deref() {
            Some("%") => None,
            Some("k" | "tsd" | "thousand" | "tausend") => Some(value * 1_000.0),
            Some("m" | "mio" | "mn" | "million" | "millions" | "millionen") => Some(value * 1_000_000.0),
            Some("bn" | "billion" | "mrd") => Some(value * 1_000_000_000.0),
            _ => Some(value),
        })
        .collect()
}

/// Ranges overlap once the program's bounds are widened by [`FUNDING_TOLERANCE`].
pub fn match_funding_amount(
    user: Option<&NormalizedFundingAmount>,
    program: Option<&NormalizedFundingAmount>,
) -> bool {
    let (Some(user), Some(program)) = (user, program) else {
        return true;
    };

    let user_max = user.max.unwrap_or(f64::INFINITY);
    let program_max = program.max.unwrap_or(f64::INFINITY);

    user.min <= program_max * (1.0 + FUNDING_TOLERANCE)
        && user_max >= program.min * (1.0 - FUNDING_TOLERANCE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoFinancingKind {
    None,
    Partial,
    Required,
    Flexible,
}

/// On the user side `kind` describes what the applicant can contribute; on the program
/// side it describes what the program demands.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedCoFinancing {
    pub kind: CoFinancingKind,
    pub percentage: Option<f64>,
}

impl NormalizedCoFinancing {
    fn new(kind: CoFinancingKind, percentage: Option<f64>) -> Self {
        Self { kind, percentage }
    }

    pub fn requires_contribution(&self) -> bool {
        matches!(self.kind, CoFinancingKind::Partial | CoFinancingKind::Required)
    }
}

pub fn normalize_co_financing(raw: &str) -> Option<NormalizedCoFinancing> {
    let text = clean_text(raw);
    let percentage = numbers_with_units(&text)
        .into_iter()
        .find_map(|(value, unit)| (unit.as_deref() == Some("%")).then_some(value));

    match text.as_str() {
        "co_no" => return Some(NormalizedCoFinancing::new(CoFinancingKind::None, None)),
        "co_yes" => return Some(NormalizedCoFinancing::new(CoFinancingKind::Required, None)),
        "co_partial" => {
            return Some(NormalizedCoFinancing::new(CoFinancingKind::Partial, Some(50.0)))
        }
        "co_flexible" => return Some(NormalizedCoFinancing::new(CoFinancingKind::Flexible, None)),
        _ => {}
    }

    if mentions_any(&text, &["not required", "no co-financing", "no own contribution", "keine eigenmittel", "none"])
        || text == "no"
    {
        return Some(NormalizedCoFinancing::new(CoFinancingKind::None, None));
    }

    if let Some(percentage) = percentage {
        let kind = if percentage < 100.0 {
            CoFinancingKind::Partial
        } else {
            CoFinancingKind::Required
        };
        return Some(NormalizedCoFinancing::new(kind, Some(percentage)));
    }

    if mentions_any(&text, &["partial", "up to"]) {
        return Some(NormalizedCoFinancing::new(CoFinancingKind::Partial, Some(50.0)));
    }

    if mentions_any(
        &text,
        &["required", "must", "mandatory", "own contribution", "own funds", "eigenmittel", "eigenanteil", "yes"],
    ) {
        return Some(NormalizedCoFinancing::new(CoFinancingKind::Required, None));
    }

    if mentions_any(&text, &["flexible", "optional"]) {
        return Some(NormalizedCoFinancing::new(CoFinancingKind::Flexible, None));
    }

    None
}

/// Repayable or equity funding implies the applicant brings capital of their own.
pub fn co_financing_from_funding_types(types: &[String]) -> Option<NormalizedCoFinancing> {
    if types.is_empty() {
        return None;
    }

    let non_repayable = types.iter().any(|kind| {
        let kind = clean_text(kind);
        NON_REPAYABLE_TYPES.contains(&kind.as_str())
    });

    let kind = if non_repayable {
        CoFinancingKind::Flexible
    } else {
        CoFinancingKind::Required
    };
    Some(NormalizedCoFinancing::new(kind, None))
}

pub fn match_co_financing(
    user: Option<&NormalizedCoFinancing>,
    program: Option<&NormalizedCoFinancing>,
) -> bool {
    let (Some(user), Some(program)) = (user, program) else {
        return true;
    };

    if !program.requires_contribution() {
        return true;
    }

    if user.kind == CoFinancingKind::None {
        return false;
    }

    match (user.percentage, program.percentage) {
        (Some(offered), Some(demanded)) => offered >= demanded,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(min: Option<f64>, max: Option<f64>) -> FundingBounds {
        FundingBounds {
            min,
            max,
            currency: Some("EUR".to_string()),
        }
    }

    #[test]
    fn small_requests_overlap_wide_programs() {
        let user = normalize_funding_amount("under100k");
        let program = normalize_funding_bounds(&bounds(Some(50_000.0), Some(2_000_000.0)));
        assert!(match_funding_amount(user.as_ref(), program.as_ref()));
    }

    #[test]
    fn small_requests_miss_large_ticket_programs() {
        let user = normalize_funding_amount("under100k");
        let program = normalize_funding_bounds(&bounds(Some(5_000_000.0), None));
        assert!(!match_funding_amount(user.as_ref(), program.as_ref()));
    }

    #[test]
    fn tolerance_widens_the_program_ceiling() {
        let user = normalize_funding_amount("100kto500k");
        let program = normalize_funding_bounds(&bounds(None, Some(80_000.0)));
        assert!(match_funding_amount(user.as_ref(), program.as_ref()));

        let big = normalize_funding_amount("over2m");
        assert!(!match_funding_amount(big.as_ref(), program.as_ref()));
    }

    #[test]
    fn zero_bounds_are_unconstrained() {
        assert_eq!(normalize_funding_bounds(&bounds(Some(0.0), Some(0.0))), None);
        assert_eq!(normalize_funding_bounds(&bounds(None, None)), None);
    }

    #[test]
    fn written_amounts_are_parsed() {
        let user = normalize_funding_amount("€150k").expect("amount");
        assert_eq!((user.min, user.max), (150_000.0, Some(150_000.0)));

        let program = normalize_funding_requirement("Förderung bis zu 50.000 EUR").expect("amount");
        assert_eq!((program.min, program.max), (0.0, Some(50_000.0)));

        let range = normalize_funding_requirement("between 1,5 Mio and 200k").expect("amount");
        assert_eq!((range.min, range.max), (200_000.0, Some(1_500_000.0)));
    }

    #[test]
    fn not_required_wins_over_required() {
        let program = normalize_co_financing("Co-financing is not required").expect("parsed");
        assert_eq!(program.kind, CoFinancingKind::None);

        let user = normalize_co_financing("co_no");
        assert!(match_co_financing(user.as_ref(), Some(&program)));
    }

    #[test]
    fn users_without_own_funds_fail_co_financed_programs() {
        let user = normalize_co_financing("co_no");
        let program = normalize_co_financing("Own contribution of at least 30% required");
        assert_eq!(program.as_ref().map(|p| p.percentage), Some(Some(30.0)));
        assert!(!match_co_financing(user.as_ref(), program.as_ref()));

        let partial = normalize_co_financing("co_partial");
        assert!(match_co_financing(partial.as_ref(), program.as_ref()));
        let low = normalize_co_financing("20%");
        assert!(!match_co_financing(low.as_ref(), program.as_ref()));
    }

    #[test]
    fn loans_imply_own_contribution() {
        let loan = co_financing_from_funding_types(&["loan".to_string()]);
        let grant = co_financing_from_funding_types(&["Grant".to_string(), "loan".to_string()]);
        let user = normalize_co_financing("co_no");

        assert!(!match_co_financing(user.as_ref(), loan.as_ref()));
        assert!(match_co_financing(user.as_ref(), grant.as_ref()));
        assert_eq!(co_financing_from_funding_types(&[]), None);
    }
}
