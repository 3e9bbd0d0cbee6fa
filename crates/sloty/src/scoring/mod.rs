//! Scientific-evaluation scoring: which policy tier applies to a publication and
//! how its points and slots are apportioned among affiliated authors and their
//! disciplines.

pub mod cache;
pub mod calculator;
pub mod contributions;
pub mod domain;
pub mod policy;
pub mod ratio;
pub mod reference;

#[cfg(test)]
mod tests;

pub use cache::{
    round_score, AuthorDisciplineTotals, CacheError, CachedAuthorScore, CachedDisciplineScore,
    InMemoryScoreStore, RebuildOutcome, RebuildReport, RecordScores, ScoreCache, ScoreStore,
    StoreError,
};
pub use calculator::{CalcMode, Calculator, Category, StructuralKind, Tier};
pub use contributions::ContributionFilter;
pub use domain::{
    AuthorContribution, AuthorId, CorrectionStatusId, Discipline, DisciplineId, FormalCharacter,
    InstitutionConfig, PublicationKind, PublicationRecord, PublisherId, PublisherTierEntry,
    RecordId, Responsibility, UnitId,
};
pub use policy::{
    IntegrityViolation, NotScorable, PolicyError, PolicySchedule, PolicySelector, ScheduleError,
};
pub use ratio::RatioMath;
pub use reference::{InMemoryCatalog, IndexEntry, ReferenceCatalog, WEB_OF_SCIENCE};
