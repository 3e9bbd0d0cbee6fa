use std::fs;
use std::path::Path;

use serde::Deserialize;
use sloty::error::AppError;
use sloty::scoring::{
    Discipline, InMemoryCatalog, IndexEntry, InstitutionConfig, PublicationRecord,
    PublisherTierEntry,
};

/// Bibliography export consumed by the CLI: reference data plus the records to score.
#[derive(Debug, Deserialize)]
pub(crate) struct Snapshot {
    #[serde(default)]
    pub(crate) disciplines: Vec<Discipline>,
    #[serde(default)]
    pub(crate) publisher_tiers: Vec<PublisherTierEntry>,
    #[serde(default)]
    pub(crate) indexed: Vec<IndexEntry>,
    #[serde(default)]
    pub(crate) institution: InstitutionConfig,
    pub(crate) records: Vec<PublicationRecord>,
}

impl Snapshot {
    pub(crate) fn load(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path)?;
        Self::parse(&raw)
    }

    pub(crate) fn parse(raw: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Splits the snapshot into its catalog and the remaining record data.
    pub(crate) fn into_parts(self) -> (InMemoryCatalog, InstitutionConfig, Vec<PublicationRecord>) {
        let catalog = InMemoryCatalog::new(self.disciplines, self.publisher_tiers, self.indexed);
        (catalog, self.institution, self.records)
    }
}
