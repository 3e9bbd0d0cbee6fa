use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::rows::{CachedAuthorScore, CachedDisciplineScore, RecordScores};
use crate::scoring::domain::{AuthorId, DisciplineId, RecordId};

/// Storage abstraction for cached score rows.
///
/// `replace_record` must swap the complete row set of a record in one step: readers
/// see either the previous rows or the new ones, never a mix.
pub trait ScoreStore: Send + Sync {
    fn replace_record(&self, record: RecordId, scores: RecordScores) -> Result<(), StoreError>;
    /// Removes every row of `record`, returning how many were dropped.
    fn clear_record(&self, record: RecordId) -> Result<usize, StoreError>;
    fn record_scores(&self, record: RecordId) -> Result<RecordScores, StoreError>;
    fn author_rows_for_author(&self, author: AuthorId)
        -> Result<Vec<CachedAuthorScore>, StoreError>;
    fn discipline_rows_for_discipline(
        &self,
        discipline: DisciplineId,
    ) -> Result<Vec<CachedDisciplineScore>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("score store lock poisoned: {0}")]
    Poisoned(&'static str),
}

/// Process-local store keyed by record.
#[derive(Debug, Default, Clone)]
pub struct InMemoryScoreStore {
    records: Arc<Mutex<BTreeMap<RecordId, RecordScores>>>,
}

impl InMemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> Result<MutexGuard<'_, BTreeMap<RecordId, RecordScores>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Poisoned("score rows"))
    }

    pub fn record_count(&self) -> Result<usize, StoreError> {
        Ok(self.guard()?.len())
    }
}

impl ScoreStore for InMemoryScoreStore {
    fn replace_record(&self, record: RecordId, scores: RecordScores) -> Result<(), StoreError> {
        let mut guard = self.guard()?;
        if scores.is_empty() {
            guard.remove(&record);
        } else {
            guard.insert(record, scores);
        }
        Ok(())
    }

    fn clear_record(&self, record: RecordId) -> Result<usize, StoreError> {
        let mut guard = self.guard()?;
        Ok(guard
            .remove(&record)
            .map(|scores| scores.row_count())
            .unwrap_or(0))
    }

    fn record_scores(&self, record: RecordId) -> Result<RecordScores, StoreError> {
        let guard = self.guard()?;
        Ok(guard.get(&record).cloned().unwrap_or_default())
    }

    fn author_rows_for_author(
        &self,
        author: AuthorId,
    ) -> Result<Vec<CachedAuthorScore>, StoreError> {
        let guard = self.guard()?;
        Ok(guard
            .values()
            .flat_map(|scores| scores.authors.iter())
            .filter(|row| row.author_id == author)
            .cloned()
            .collect())
    }

    fn discipline_rows_for_discipline(
        &self,
        discipline: DisciplineId,
    ) -> Result<Vec<CachedDisciplineScore>, StoreError> {
        let guard = self.guard()?;
        Ok(guard
            .values()
            .flat_map(|scores| scores.disciplines.iter())
            .filter(|row| row.discipline_id == discipline)
            .cloned()
            .collect())
    }
}
