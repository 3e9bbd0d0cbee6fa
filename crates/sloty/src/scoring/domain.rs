use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for publication records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorId(pub u64);

/// Organizational unit an author belonged to when the work was credited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisciplineId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublisherId(pub u64);

/// Editorial workflow tag attached to a record ("before correction", "after correction", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrectionStatusId(pub u64);

/// Publication type as registered in the bibliography.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicationKind {
    ContinuousWork,
    MonographBook,
    MonographChapter,
    ConferencePaper,
    Patent,
    MultiInstitutionWork,
    DoctoralThesis,
    HabilitationThesis,
}

impl PublicationKind {
    pub const fn label(self) -> &'static str {
        match self {
            PublicationKind::ContinuousWork => "continuous_work",
            PublicationKind::MonographBook => "monograph_book",
            PublicationKind::MonographChapter => "monograph_chapter",
            PublicationKind::ConferencePaper => "conference_paper",
            PublicationKind::Patent => "patent",
            PublicationKind::MultiInstitutionWork => "multi_institution_work",
            PublicationKind::DoctoralThesis => "doctoral_thesis",
            PublicationKind::HabilitationThesis => "habilitation_thesis",
        }
    }
}

/// Role a contributor played in producing the work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Responsibility {
    Author,
    Editor,
    Translator,
    Reviewer,
    Other,
}

/// Formal-character metadata of a monograph ("KSP", "ROZ", ...).
///
/// A well-formed entry is flagged as exactly one of book or chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormalCharacter {
    pub code: String,
    #[serde(default)]
    pub book: bool,
    #[serde(default)]
    pub chapter: bool,
}

/// Snapshot of one author's participation in a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorContribution {
    pub author_id: AuthorId,
    pub unit_id: UnitId,
    /// Name as printed on the work, which may differ from the canonical author name.
    pub credited_name: String,
    pub responsibility: Responsibility,
    pub affiliates: bool,
    pub unit_counts_for_reports: bool,
    /// Pinned (currently active) discipline assignment.
    #[serde(default)]
    pub discipline: Option<DisciplineId>,
    pub order_index: u32,
}

/// Read-only view of a publication record handed to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicationRecord {
    pub id: RecordId,
    pub kind: PublicationKind,
    #[serde(default)]
    pub year: Option<i32>,
    pub raw_points: Decimal,
    #[serde(default)]
    pub publisher: Option<PublisherId>,
    #[serde(default)]
    pub formal_character: Option<FormalCharacter>,
    #[serde(default)]
    pub correction_status: Option<CorrectionStatusId>,
    #[serde(default)]
    pub contributions: Vec<AuthorContribution>,
}

/// Scientific discipline from the national classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discipline {
    pub id: DisciplineId,
    pub code: String,
    pub name: String,
    /// Humanities, social sciences or theology; scored on the higher monograph scale.
    #[serde(default)]
    pub is_hst: bool,
}

/// Publisher prestige level for a given year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublisherTierEntry {
    pub publisher_id: PublisherId,
    pub year: i32,
    pub tier: i8,
}

/// Tier value reported when a publisher has no entry for the year.
pub const NO_PUBLISHER_TIER: i8 = -1;

/// Institution-level switches consulted during policy selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstitutionConfig {
    #[serde(default)]
    pub hidden_correction_statuses_for_scoring: BTreeSet<CorrectionStatusId>,
}

impl InstitutionConfig {
    pub fn hides(&self, status: Option<CorrectionStatusId>) -> bool {
        status
            .map(|status| self.hidden_correction_statuses_for_scoring.contains(&status))
            .unwrap_or(false)
    }
}
