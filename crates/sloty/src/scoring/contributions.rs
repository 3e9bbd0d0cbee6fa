use std::collections::BTreeSet;

use super::domain::{AuthorContribution, DisciplineId, Responsibility};

/// Queries over a record's contribution list.
#[derive(Debug, Clone, Copy)]
pub struct ContributionFilter<'a> {
    contributions: &'a [AuthorContribution],
}

impl<'a> ContributionFilter<'a> {
    pub fn new(contributions: &'a [AuthorContribution]) -> Self {
        Self { contributions }
    }

    pub fn all(&self) -> &'a [AuthorContribution] {
        self.contributions
    }

    /// Contributions that count for `discipline`: affiliated, in a reporting unit and
    /// pinned to that discipline. Record order is preserved.
    pub fn qualifying(
        &self,
        discipline: DisciplineId,
        responsibility: Option<Responsibility>,
    ) -> Vec<&'a AuthorContribution> {
        self.contributions
            .iter()
            .filter(|contribution| is_eligible(contribution))
            .filter(|contribution| contribution.discipline == Some(discipline))
            .filter(|contribution| {
                responsibility
                    .map(|role| contribution.responsibility == role)
                    .unwrap_or(true)
            })
            .collect()
    }

    /// Contributions that may receive a per-author cache row.
    pub fn eligible(&self) -> impl Iterator<Item = &'a AuthorContribution> + 'a {
        self.contributions
            .iter()
            .filter(|contribution| is_eligible(contribution) && contribution.discipline.is_some())
    }

    /// Distinct non-null pinned disciplines, in ascending id order.
    pub fn referenced_disciplines(&self) -> BTreeSet<DisciplineId> {
        self.contributions
            .iter()
            .filter_map(|contribution| contribution.discipline)
            .collect()
    }

    pub fn references(&self, discipline: DisciplineId) -> bool {
        self.contributions
            .iter()
            .any(|contribution| contribution.discipline == Some(discipline))
    }

    pub fn has_role(&self, responsibility: Responsibility) -> bool {
        self.contributions
            .iter()
            .any(|contribution| contribution.responsibility == responsibility)
    }
}

fn is_eligible(contribution: &AuthorContribution) -> bool {
    contribution.affiliates && contribution.unit_counts_for_reports
}
