use serde::{Deserialize, Serialize};

use crate::criteria::Dimension;

/// Points awarded per satisfied criterion. The defaults add up to 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub location: u32,
    pub company_type: u32,
    pub funding_amount: u32,
    pub industry: u32,
    pub team_size: u32,
    pub revenue_status: u32,
    pub impact_focus: u32,
    pub deadline_urgency: u32,
    pub use_of_funds: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            location: 35,
            company_type: 20,
            funding_amount: 20,
            industry: 10,
            team_size: 3,
            revenue_status: 3,
            impact_focus: 4,
            deadline_urgency: 3,
            use_of_funds: 2,
        }
    }
}

impl ScoringWeights {
    /// Weight for a dimension; dimensions outside the table only filter and never score.
    pub fn weight(&self, dimension: Dimension) -> u32 {
        match dimension {
            Dimension::Location => self.location,
            Dimension::CompanyType => self.company_type,
            Dimension::FundingAmount => self.funding_amount,
            Dimension::IndustryFocus => self.industry,
            Dimension::TeamSize => self.team_size,
            Dimension::RevenueStatus => self.revenue_status,
            Dimension::ImpactFocus => self.impact_focus,
            Dimension::DeadlineUrgency => self.deadline_urgency,
            Dimension::UseOfFunds => self.use_of_funds,
            Dimension::CompanyStage
            | Dimension::TrlLevel
            | Dimension::CoFinancing
            | Dimension::Consortium => 0,
        }
    }

    pub fn total(&self) -> u32 {
        Dimension::ALL.into_iter().map(|dimension| self.weight(dimension)).sum()
    }
}
