//! Score cache: regenerates the cached point/slot rows of a record from its
//! current inputs and replaces the stored set in one step.

mod rows;
mod store;
mod summary;

pub use rows::{CachedAuthorScore, CachedDisciplineScore, RecordScores};
pub use store::{InMemoryScoreStore, ScoreStore, StoreError};
pub use summary::{summarize, AuthorDisciplineTotals};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::calculator::{Calculator, Tier};
use super::contributions::ContributionFilter;
use super::domain::{AuthorId, DisciplineId, InstitutionConfig, PublicationRecord, RecordId};
use super::policy::{IntegrityViolation, PolicyError, PolicySchedule, PolicySelector};
use super::reference::ReferenceCatalog;

/// Decimal places kept in cached values.
pub const DEFAULT_DECIMAL_PLACES: u32 = 4;

/// Result of rebuilding one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RebuildOutcome {
    Scored {
        tier: Tier,
        disciplines: usize,
        authors: usize,
    },
    Cleared {
        reason: String,
        removed: usize,
    },
}

/// Per-record outcomes of a batch rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RebuildReport {
    pub scored: Vec<RecordId>,
    pub cleared: Vec<(RecordId, String)>,
    pub failed: Vec<(RecordId, String)>,
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error(transparent)]
    Integrity(#[from] IntegrityViolation),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Owns the cached score rows and keeps them consistent with record inputs.
pub struct ScoreCache<C, S> {
    selector: PolicySelector<C>,
    store: Arc<S>,
    decimal_places: u32,
    record_locks: Mutex<HashMap<RecordId, Arc<Mutex<()>>>>,
}

impl<C, S> ScoreCache<C, S>
where
    C: ReferenceCatalog,
    S: ScoreStore,
{
    pub fn new(catalog: Arc<C>, store: Arc<S>, schedule: PolicySchedule) -> Self {
        Self::with_selector(PolicySelector::new(catalog, schedule), store)
    }

    pub fn with_selector(selector: PolicySelector<C>, store: Arc<S>) -> Self {
        Self {
            selector,
            store,
            decimal_places: DEFAULT_DECIMAL_PLACES,
            record_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_decimal_places(mut self, places: u32) -> Self {
        self.decimal_places = places;
        self
    }

    pub fn selector(&self) -> &PolicySelector<C> {
        &self.selector
    }

    /// Computes the rows a rebuild would write, without touching the store.
    pub fn score(
        &self,
        record: &PublicationRecord,
        institution: Option<&InstitutionConfig>,
    ) -> Result<(Tier, RecordScores), PolicyError> {
        let default_institution = InstitutionConfig::default();
        let institution = institution.unwrap_or(&default_institution);
        let calculator = self.selector.select(record, institution)?;
        Ok((calculator.tier(), self.rows(&calculator)))
    }

    /// Regenerates every cached row of `record`.
    ///
    /// Non-scorable records lose their rows. Integrity violations leave the stored
    /// rows untouched and are returned to the caller.
    pub fn rebuild(
        &self,
        record: &PublicationRecord,
        institution: Option<&InstitutionConfig>,
    ) -> Result<RebuildOutcome, CacheError> {
        let lock = self.record_lock(record.id);
        let outcome = {
            // A rebuild that panicked left no partial rows behind, so the guard is still usable.
            let _serialized = lock.lock().unwrap_or_else(PoisonError::into_inner);
            self.rebuild_locked(record, institution)
        };
        self.release_record_lock(record.id, lock);
        outcome
    }

    /// Rebuilds each record in turn. Integrity violations are collected per
    /// record; a store failure aborts the batch.
    pub fn rebuild_batch<'a>(
        &self,
        records: impl IntoIterator<Item = &'a PublicationRecord>,
        institution: Option<&InstitutionConfig>,
    ) -> Result<RebuildReport, StoreError> {
        let mut report = RebuildReport::default();
        for record in records {
            match self.rebuild(record, institution) {
                Ok(RebuildOutcome::Scored { .. }) => report.scored.push(record.id),
                Ok(RebuildOutcome::Cleared { reason, .. }) => {
                    report.cleared.push((record.id, reason))
                }
                Err(CacheError::Integrity(violation)) => {
                    report.failed.push((record.id, violation.to_string()))
                }
                Err(CacheError::Store(err)) => return Err(err),
            }
        }
        info!(
            scored = report.scored.len(),
            cleared = report.cleared.len(),
            failed = report.failed.len(),
            "score cache batch rebuilt"
        );
        Ok(report)
    }

    pub fn record_scores(&self, record: RecordId) -> Result<RecordScores, StoreError> {
        self.store.record_scores(record)
    }

    pub fn discipline_scores(
        &self,
        record: RecordId,
    ) -> Result<Vec<CachedDisciplineScore>, StoreError> {
        Ok(self.store.record_scores(record)?.disciplines)
    }

    pub fn author_scores(&self, record: RecordId) -> Result<Vec<CachedAuthorScore>, StoreError> {
        Ok(self.store.record_scores(record)?.authors)
    }

    pub fn scores_for_author(&self, author: AuthorId) -> Result<Vec<CachedAuthorScore>, StoreError> {
        self.store.author_rows_for_author(author)
    }

    pub fn scores_for_discipline(
        &self,
        discipline: DisciplineId,
    ) -> Result<Vec<CachedDisciplineScore>, StoreError> {
        self.store.discipline_rows_for_discipline(discipline)
    }

    pub fn author_totals(&self, author: AuthorId) -> Result<Vec<AuthorDisciplineTotals>, StoreError> {
        Ok(summarize(&self.store.author_rows_for_author(author)?))
    }

    fn rebuild_locked(
        &self,
        record: &PublicationRecord,
        institution: Option<&InstitutionConfig>,
    ) -> Result<RebuildOutcome, CacheError> {
        match self.score(record, institution) {
            Ok((tier, scores)) => {
                let disciplines = scores.disciplines.len();
                let authors = scores.authors.len();
                self.store.replace_record(record.id, scores)?;
                info!(
                    record = record.id.0,
                    %tier,
                    disciplines,
                    authors,
                    "score cache rebuilt"
                );
                Ok(RebuildOutcome::Scored {
                    tier,
                    disciplines,
                    authors,
                })
            }
            Err(PolicyError::NotScorable(not_scorable)) => {
                let removed = self.store.clear_record(record.id)?;
                debug!(
                    record = record.id.0,
                    reason = not_scorable.reason(),
                    removed,
                    "score cache cleared"
                );
                Ok(RebuildOutcome::Cleared {
                    reason: not_scorable.reason().to_string(),
                    removed,
                })
            }
            Err(PolicyError::Integrity(violation)) => {
                warn!(record = record.id.0, error = %violation, "score cache left untouched");
                Err(violation.into())
            }
        }
    }

    fn rows(&self, calculator: &Calculator<'_>) -> RecordScores {
        let record_id = calculator.record().id;
        let mut scores = RecordScores::default();

        for discipline in calculator.all_referenced_disciplines() {
            let authors = calculator.qualifying_authors(discipline, None);
            if authors.is_empty() {
                continue;
            }
            let (Some(total_points), Some(slot)) = (
                calculator.points_for_discipline(discipline),
                calculator.slot_for_discipline(discipline),
            ) else {
                continue;
            };
            scores.disciplines.push(CachedDisciplineScore {
                record_id,
                discipline_id: discipline,
                total_points: self.round(total_points),
                slot: self.round(slot),
                contributing_author_ids: authors.iter().map(|author| author.author_id).collect(),
                contributing_display_names: authors
                    .iter()
                    .map(|author| author.credited_name.clone())
                    .collect(),
            });
        }

        for contribution in ContributionFilter::new(&calculator.record().contributions).eligible() {
            let Some(discipline) = contribution.discipline else {
                continue;
            };
            let (Some(points), Some(slot)) = (
                calculator.points_for_author(contribution),
                calculator.slot_for_author_in_discipline(discipline),
            ) else {
                continue;
            };
            scores.authors.push(CachedAuthorScore {
                record_id,
                author_id: contribution.author_id,
                unit_id: contribution.unit_id,
                discipline_id: discipline,
                points_for_author: self.round(points),
                slot_for_author: self.round(slot),
            });
        }

        scores
    }

    fn round(&self, value: Decimal) -> Decimal {
        round_score(value, self.decimal_places)
    }

    fn lock_table(&self) -> MutexGuard<'_, HashMap<RecordId, Arc<Mutex<()>>>> {
        self.record_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn record_lock(&self, record: RecordId) -> Arc<Mutex<()>> {
        Arc::clone(self.lock_table().entry(record).or_default())
    }

    fn release_record_lock(&self, record: RecordId, lock: Arc<Mutex<()>>) {
        drop(lock);
        let mut locks = self.lock_table();
        // Only the table still holds it: nobody is waiting.
        if locks
            .get(&record)
            .is_some_and(|entry| Arc::strong_count(entry) == 1)
        {
            locks.remove(&record);
        }
    }

    #[cfg(test)]
    pub(crate) fn tracked_record_locks(&self) -> usize {
        self.lock_table().len()
    }
}

/// Rounds a score to `decimal_places`, halves away from zero.
pub fn round_score(value: Decimal, decimal_places: u32) -> Decimal {
    value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
}
