use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::scoring::domain::{AuthorId, DisciplineId, RecordId, UnitId};

/// Points and slot a record yields for one discipline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedDisciplineScore {
    pub record_id: RecordId,
    pub discipline_id: DisciplineId,
    pub total_points: Decimal,
    pub slot: Decimal,
    pub contributing_author_ids: Vec<AuthorId>,
    /// Names as credited on the work, parallel to `contributing_author_ids`.
    pub contributing_display_names: Vec<String>,
}

/// One author's share of a record within a discipline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedAuthorScore {
    pub record_id: RecordId,
    pub author_id: AuthorId,
    pub unit_id: UnitId,
    pub discipline_id: DisciplineId,
    pub points_for_author: Decimal,
    pub slot_for_author: Decimal,
}

/// Complete cached row set of a single record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordScores {
    pub disciplines: Vec<CachedDisciplineScore>,
    pub authors: Vec<CachedAuthorScore>,
}

impl RecordScores {
    pub fn is_empty(&self) -> bool {
        self.disciplines.is_empty() && self.authors.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.disciplines.len() + self.authors.len()
    }
}
