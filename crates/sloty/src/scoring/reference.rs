use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::domain::{Discipline, DisciplineId, PublisherId, PublisherTierEntry, RecordId};

/// External bibliographic database consulted by the conference-paper rule.
pub const WEB_OF_SCIENCE: &str = "WoS";

/// Read-only reference data the policy selector consults.
pub trait ReferenceCatalog: Send + Sync {
    fn discipline(&self, id: DisciplineId) -> Option<&Discipline>;
    /// Prestige tier of `publisher` in `year`, or `None` when unranked that year.
    fn publisher_tier(&self, publisher: PublisherId, year: i32) -> Option<i8>;
    fn is_indexed(&self, record: RecordId, database: &str) -> bool;
}

/// Registry row stating that a record is indexed in an external database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub record_id: RecordId,
    pub database: String,
}

/// Catalog backed by plain collections, used by tests and the operator CLI.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    disciplines: BTreeMap<DisciplineId, Discipline>,
    publisher_tiers: BTreeMap<(PublisherId, i32), i8>,
    indexed: BTreeSet<(RecordId, String)>,
}

impl InMemoryCatalog {
    pub fn new(
        disciplines: impl IntoIterator<Item = Discipline>,
        publisher_tiers: impl IntoIterator<Item = PublisherTierEntry>,
        indexed: impl IntoIterator<Item = IndexEntry>,
    ) -> Self {
        Self {
            disciplines: disciplines
                .into_iter()
                .map(|discipline| (discipline.id, discipline))
                .collect(),
            publisher_tiers: publisher_tiers
                .into_iter()
                .map(|entry| ((entry.publisher_id, entry.year), entry.tier))
                .collect(),
            indexed: indexed
                .into_iter()
                .map(|entry| (entry.record_id, entry.database))
                .collect(),
        }
    }

    pub fn with_discipline(mut self, discipline: Discipline) -> Self {
        self.disciplines.insert(discipline.id, discipline);
        self
    }

    pub fn with_publisher_tier(mut self, publisher: PublisherId, year: i32, tier: i8) -> Self {
        self.publisher_tiers.insert((publisher, year), tier);
        self
    }

    pub fn with_index(mut self, record: RecordId, database: &str) -> Self {
        self.indexed.insert((record, database.to_string()));
        self
    }
}

impl ReferenceCatalog for InMemoryCatalog {
    fn discipline(&self, id: DisciplineId) -> Option<&Discipline> {
        self.disciplines.get(&id)
    }

    fn publisher_tier(&self, publisher: PublisherId, year: i32) -> Option<i8> {
        self.publisher_tiers.get(&(publisher, year)).copied()
    }

    fn is_indexed(&self, record: RecordId, database: &str) -> bool {
        self.indexed.contains(&(record, database.to_string()))
    }
}
