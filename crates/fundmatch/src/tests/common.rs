use std::collections::BTreeMap;
use std::sync::Arc;

use crate::catalog::{FundingBounds, Program, RequirementCategory, RequirementItem, RequirementValue};

pub(crate) fn requirement(kind: &str, value: &str, confidence: f32) -> RequirementItem {
    RequirementItem {
        kind: kind.to_string(),
        value: RequirementValue::Text(value.to_string()),
        confidence: Some(confidence),
        source: None,
        description: None,
        decisiveness: None,
    }
}

pub(crate) struct ProgramBuilder {
    program: Program,
}

impl ProgramBuilder {
    pub(crate) fn new(id: &str) -> Self {
        Self {
            program: Program {
                id: id.to_string(),
                name: format!("Program {id}"),
                program_type: Some("grant".to_string()),
                region: None,
                funding_amount: None,
                funding_types: Vec::new(),
                program_focus: Vec::new(),
                categorized_requirements: BTreeMap::new(),
            },
        }
    }

    pub(crate) fn requires(mut self, category: RequirementCategory, item: RequirementItem) -> Self {
        self.program
            .categorized_requirements
            .entry(category)
            .or_default()
            .push(item);
        self
    }

    pub(crate) fn located(self, region: &str) -> Self {
        self.requires(RequirementCategory::Geographic, requirement("location", region, 0.9))
    }

    pub(crate) fn team(self, rule: &str) -> Self {
        self.requires(RequirementCategory::Team, requirement("team_size", rule, 0.6))
    }

    pub(crate) fn applicants(self, rule: &str) -> Self {
        self.requires(RequirementCategory::Eligibility, requirement("company_type", rule, 0.9))
    }

    pub(crate) fn funding(mut self, min: f64, max: f64) -> Self {
        self.program.funding_amount = Some(FundingBounds {
            min: Some(min),
            max: Some(max),
            currency: Some("EUR".to_string()),
        });
        self
    }

    pub(crate) fn focus(mut self, sectors: &[&str]) -> Self {
        self.program.program_focus = sectors.iter().map(|sector| sector.to_string()).collect();
        self
    }

    pub(crate) fn build(self) -> Program {
        self.program
    }
}

/// Eight programs gated on Austria, two with a soft team-size preference.
pub(crate) fn location_heavy_catalog() -> Arc<[Program]> {
    let mut programs: Vec<Program> = (1..=8)
        .map(|index| ProgramBuilder::new(&format!("at-{index}")).located("Austria").build())
        .collect();
    programs.push(ProgramBuilder::new("team-1").team("at least 10 employees").build());
    programs.push(ProgramBuilder::new("team-2").team("at least 12 employees").build());
    programs.into()
}

/// Mixed catalog used by the scoring and end-to-end checks.
pub(crate) fn mixed_catalog() -> Arc<[Program]> {
    vec![
        ProgramBuilder::new("aws-preseed")
            .located("Austria")
            .applicants("Startups and SMEs")
            .funding(50_000.0, 2_000_000.0)
            .focus(&["Digital", "Sustainability"])
            .build(),
        ProgramBuilder::new("ffg-basis")
            .located("Austria")
            .applicants("Research organisations")
            .funding(100_000.0, 3_000_000.0)
            .build(),
        ProgramBuilder::new("eic-accelerator")
            .located("EU member states")
            .applicants("SME")
            .funding(5_000_000.0, 17_500_000.0)
            .build(),
        ProgramBuilder::new("bavaria-digital")
            .located("Bavaria")
            .applicants("Startups")
            .funding(20_000.0, 200_000.0)
            .focus(&["Digital"])
            .build(),
    ]
    .into()
}
