use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::rows::CachedAuthorScore;
use crate::scoring::domain::{AuthorId, DisciplineId};

/// Totals of an author's cached shares within one discipline, as consumed by
/// evaluation reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorDisciplineTotals {
    pub author_id: AuthorId,
    pub discipline_id: DisciplineId,
    pub records: usize,
    pub points_sum: Decimal,
    pub slot_sum: Decimal,
    /// `points_sum / slot_sum`; absent when the slot sum is zero.
    pub points_per_slot: Option<Decimal>,
}

/// Groups rows by (author, discipline); output is ordered by author, then discipline.
pub fn summarize(rows: &[CachedAuthorScore]) -> Vec<AuthorDisciplineTotals> {
    let mut grouped: BTreeMap<(AuthorId, DisciplineId), (usize, Decimal, Decimal)> =
        BTreeMap::new();
    for row in rows {
        let entry = grouped
            .entry((row.author_id, row.discipline_id))
            .or_insert((0, Decimal::ZERO, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += row.points_for_author;
        entry.2 += row.slot_for_author;
    }

    grouped
        .into_iter()
        .map(
            |((author_id, discipline_id), (records, points_sum, slot_sum))| {
                AuthorDisciplineTotals {
                    author_id,
                    discipline_id,
                    records,
                    points_sum,
                    slot_sum,
                    points_per_slot: points_sum.checked_div(slot_sum),
                }
            },
        )
        .collect()
}
