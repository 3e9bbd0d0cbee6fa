use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::scoring::domain::DisciplineId;
use crate::scoring::ratio::RatioMath;

/// Scoring bracket ("Prog") selected from raw points, year and publisher level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Tier1,
    Tier2,
    Tier3,
}

impl Tier {
    pub const fn label(self) -> &'static str {
        match self {
            Tier::Tier1 => "tier1",
            Tier::Tier2 => "tier2",
            Tier::Tier3 => "tier3",
        }
    }

    /// Fraction of the record a discipline receives.
    ///
    /// Tier1 grants the full record, Tier2 dampens with √(k/m), Tier3 splits
    /// proportionally with k/m.
    pub(crate) fn share(self, ratio: &RatioMath<'_>, discipline: DisciplineId) -> Option<Decimal> {
        match self {
            Tier::Tier1 => Some(Decimal::ONE),
            Tier::Tier2 => ratio.sqrt_k_over_m(discipline),
            Tier::Tier3 => ratio.k_over_m(discipline),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
