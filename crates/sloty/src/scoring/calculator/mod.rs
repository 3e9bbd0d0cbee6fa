//! Point and slot apportionment for a record whose policy tier is known.
//!
//! A [`Calculator`] borrows the record it scores and never mutates it; the only
//! state it carries beyond its inputs is the lazily computed author counts held by
//! [`RatioMath`]. Methods return `None` where the record offers nothing to
//! apportion (discipline not referenced, no qualifying authors).

mod category;
mod tier;

pub use category::{CalcMode, Category, StructuralKind};
pub use tier::Tier;

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::contributions::ContributionFilter;
use super::domain::{AuthorContribution, DisciplineId, PublicationRecord, Responsibility};
use super::ratio::RatioMath;

#[derive(Debug)]
pub struct Calculator<'a> {
    record: &'a PublicationRecord,
    tier: Tier,
    category: Category,
    multipliers: BTreeMap<DisciplineId, Decimal>,
    filter: ContributionFilter<'a>,
    ratio: RatioMath<'a>,
}

impl<'a> Calculator<'a> {
    pub fn new(record: &'a PublicationRecord, tier: Tier, category: Category) -> Self {
        let filter = ContributionFilter::new(&record.contributions);
        Self {
            record,
            tier,
            category,
            multipliers: BTreeMap::new(),
            filter,
            ratio: RatioMath::new(filter),
        }
    }

    /// Per-discipline point multipliers; disciplines left out score with 1.
    pub fn with_multipliers(mut self, multipliers: BTreeMap<DisciplineId, Decimal>) -> Self {
        self.multipliers = multipliers;
        self
    }

    pub fn record(&self) -> &'a PublicationRecord {
        self.record
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn multiplier(&self, discipline: DisciplineId) -> Decimal {
        self.multipliers
            .get(&discipline)
            .copied()
            .unwrap_or(Decimal::ONE)
    }

    pub fn k(&self, discipline: DisciplineId) -> usize {
        self.ratio.k(discipline)
    }

    pub fn m(&self) -> usize {
        self.ratio.m()
    }

    pub fn k_over_m(&self, discipline: DisciplineId) -> Option<Decimal> {
        self.ratio.k_over_m(discipline)
    }

    pub fn sqrt_k_over_m(&self, discipline: DisciplineId) -> Option<Decimal> {
        self.ratio.sqrt_k_over_m(discipline)
    }

    pub fn all_referenced_disciplines(&self) -> Vec<DisciplineId> {
        self.filter.referenced_disciplines().into_iter().collect()
    }

    pub fn qualifying_authors(
        &self,
        discipline: DisciplineId,
        responsibility: Option<Responsibility>,
    ) -> Vec<&'a AuthorContribution> {
        self.filter.qualifying(discipline, responsibility)
    }

    /// Points the record yields for `discipline` (PKD), before division among authors.
    ///
    /// `None` also when the product leaves the `Decimal` range.
    pub fn points_for_discipline(&self, discipline: DisciplineId) -> Option<Decimal> {
        if !self.filter.references(discipline) {
            return None;
        }
        let share = self.tier.share(&self.ratio, discipline)?;
        self.record
            .raw_points
            .checked_mul(share)?
            .checked_mul(self.multiplier(discipline))
    }

    pub fn slot_for_discipline(&self, discipline: DisciplineId) -> Option<Decimal> {
        if !self.filter.references(discipline) {
            return None;
        }
        self.tier.share(&self.ratio, discipline)
    }

    pub fn slot_for_author_in_discipline(&self, discipline: DisciplineId) -> Option<Decimal> {
        let k = self.k(discipline);
        if k == 0 {
            return None;
        }
        self.slot_for_discipline(discipline)
            .map(|slot| slot / Decimal::from(k as u64))
    }

    pub fn points_for_author(&self, contribution: &AuthorContribution) -> Option<Decimal> {
        let discipline = contribution.discipline?;
        let k = self.k(discipline);
        if k == 0 {
            return None;
        }
        self.points_for_discipline(discipline)
            .map(|points| points / Decimal::from(k as u64))
    }

    pub fn slot_for_author(&self, contribution: &AuthorContribution) -> Option<Decimal> {
        contribution
            .discipline
            .and_then(|discipline| self.slot_for_author_in_discipline(discipline))
    }
}
