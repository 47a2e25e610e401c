use crate::answers::UserAnswers;
use crate::catalog::{Decisiveness, Program};
use crate::criteria::{CriteriaMatcher, Dimension};

/// Version of the information-value formula stamped into question metadata.
pub const RANKING_VERSION: u32 = 1;

/// How the candidate programs reference one dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionStats {
    pub dimension: Dimension,
    pub programs_affected: usize,
    pub hard: usize,
    pub soft: usize,
    pub uncertain: usize,
}

impl DimensionStats {
    pub fn collect(matcher: &CriteriaMatcher, dimension: Dimension, candidates: &[&Program]) -> Self {
        let mut stats = Self {
            dimension,
            programs_affected: 0,
            hard: 0,
            soft: 0,
            uncertain: 0,
        };

        for program in candidates {
            let Some(decisiveness) = matcher.reference(dimension, program) else {
                continue;
            };
            stats.programs_affected += 1;
            match decisiveness {
                Decisiveness::Hard => stats.hard += 1,
                Decisiveness::Soft => stats.soft += 1,
                Decisiveness::Uncertain => stats.uncertain += 1,
            }
        }

        stats
    }

    pub fn weighted_impact(&self) -> usize {
        3 * self.hard + 2 * self.soft + self.uncertain
    }

    /// `round(100 * weighted / affected)`, zero when nothing references the dimension.
    pub fn information_value(&self) -> u32 {
        if self.programs_affected == 0 {
            return 0;
        }
        (100.0 * self.weighted_impact() as f64 / self.programs_affected as f64).round() as u32
    }

    pub fn rank_score(&self) -> u32 {
        self.information_value() * self.dimension.ux_weight()
    }

    /// Strongest decisiveness seen across the candidates.
    pub fn decisiveness(&self) -> Option<Decisiveness> {
        if self.hard > 0 {
            Some(Decisiveness::Hard)
        } else if self.soft > 0 {
            Some(Decisiveness::Soft)
        } else if self.uncertain > 0 {
            Some(Decisiveness::Uncertain)
        } else {
            None
        }
    }
}

/// Unanswered dimensions referenced by at least one candidate, best first.
///
/// The sort is stable, so equal scores keep the declaration order of [`Dimension::ALL`].
pub fn rank_dimensions(
    matcher: &CriteriaMatcher,
    answers: &UserAnswers,
    candidates: &[&Program],
) -> Vec<DimensionStats> {
    let mut ranked: Vec<DimensionStats> = Dimension::ALL
        .into_iter()
        .filter(|dimension| !answers.is_answered(dimension.question_id()))
        .map(|dimension| DimensionStats::collect(matcher, dimension, candidates))
        .filter(|stats| stats.programs_affected > 0)
        .collect();

    ranked.sort_by(|left, right| right.rank_score().cmp(&left.rank_score()));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(dimension: Dimension, hard: usize, soft: usize, uncertain: usize) -> DimensionStats {
        DimensionStats {
            dimension,
            programs_affected: hard + soft + uncertain,
            hard,
            soft,
            uncertain,
        }
    }

    #[test]
    fn information_value_follows_weighted_impact() {
        let location = stats(Dimension::Location, 8, 0, 0);
        assert_eq!(location.information_value(), 300);
        assert_eq!(location.rank_score(), 3000);

        let team = stats(Dimension::TeamSize, 0, 2, 0);
        assert_eq!(team.information_value(), 200);
        assert_eq!(team.rank_score(), 600);

        let mixed = stats(Dimension::ImpactFocus, 1, 1, 1);
        assert_eq!(mixed.information_value(), 200);
        assert_eq!(mixed.decisiveness(), Some(Decisiveness::Hard));
    }

    #[test]
    fn unreferenced_dimensions_have_no_value() {
        let empty = stats(Dimension::Consortium, 0, 0, 0);
        assert_eq!(empty.information_value(), 0);
        assert_eq!(empty.decisiveness(), None);
    }
}
