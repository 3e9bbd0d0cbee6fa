use std::cell::OnceCell;
use std::collections::BTreeMap;

use rust_decimal::{Decimal, MathematicalOps};

use super::contributions::ContributionFilter;
use super::domain::DisciplineId;

/// Author-count ratios for one record. Counts are computed on first use and reused.
#[derive(Debug)]
pub struct RatioMath<'a> {
    filter: ContributionFilter<'a>,
    qualifying_counts: OnceCell<BTreeMap<DisciplineId, usize>>,
}

impl<'a> RatioMath<'a> {
    pub fn new(filter: ContributionFilter<'a>) -> Self {
        Self {
            filter,
            qualifying_counts: OnceCell::new(),
        }
    }

    /// Qualifying authors pinned to `discipline`.
    pub fn k(&self, discipline: DisciplineId) -> usize {
        self.qualifying_counts
            .get_or_init(|| {
                self.filter
                    .referenced_disciplines()
                    .into_iter()
                    .map(|id| (id, self.filter.qualifying(id, None).len()))
                    .collect()
            })
            .get(&discipline)
            .copied()
            .unwrap_or(0)
    }

    /// Every contribution on the record, affiliated or not.
    pub fn m(&self) -> usize {
        self.filter.all().len()
    }

    pub fn k_over_m(&self, discipline: DisciplineId) -> Option<Decimal> {
        let m = self.m();
        if m == 0 {
            return None;
        }
        Some(Decimal::from(self.k(discipline) as u64) / Decimal::from(m as u64))
    }

    pub fn sqrt_k_over_m(&self, discipline: DisciplineId) -> Option<Decimal> {
        self.k_over_m(discipline).and_then(|ratio| ratio.sqrt())
    }
}
