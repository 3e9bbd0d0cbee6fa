use crate::scoring::domain::{DisciplineId, RecordId};

/// Expected outcome for records no scoring policy covers.
///
/// Callers clear any cached scores for the record; this is not a fault.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("record cannot be scored: {reason}")]
pub struct NotScorable {
    reason: String,
}

impl NotScorable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Malformed record or reference data. Surfaced to the caller, never treated as "not scorable".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrityViolation {
    #[error("record {} has formal character '{code}' flagged as both book and chapter", .record.0)]
    BookAndChapter { record: RecordId, code: String },
    #[error("record {} references disciplines but has no publication year", .record.0)]
    DisciplinesWithoutYear { record: RecordId },
    #[error("record {} references discipline {} missing from the directory", .record.0, .discipline.0)]
    UnknownDiscipline {
        record: RecordId,
        discipline: DisciplineId,
    },
}

/// Failure of policy selection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    #[error(transparent)]
    NotScorable(#[from] NotScorable),
    #[error(transparent)]
    Integrity(#[from] IntegrityViolation),
}

impl PolicyError {
    pub fn not_scorable(reason: impl Into<String>) -> Self {
        Self::NotScorable(NotScorable::new(reason))
    }

    pub fn is_not_scorable(&self) -> bool {
        matches!(self, PolicyError::NotScorable(_))
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            PolicyError::NotScorable(not_scorable) => Some(not_scorable.reason()),
            PolicyError::Integrity(_) => None,
        }
    }
}
