use std::fmt;

use serde::{Deserialize, Serialize};

/// Book or chapter, resolved from formal-character metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralKind {
    Book,
    Chapter,
}

impl fmt::Display for StructuralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuralKind::Book => f.write_str("book"),
            StructuralKind::Chapter => f.write_str("chapter"),
        }
    }
}

/// How a monograph is credited to its contributors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalcMode {
    AuthorshipOfMonograph,
    EditorshipOfMonograph,
    ChapterInMonograph,
}

impl CalcMode {
    pub const fn label(self) -> &'static str {
        match self {
            CalcMode::AuthorshipOfMonograph => "authorship_of_monograph",
            CalcMode::EditorshipOfMonograph => "editorship_of_monograph",
            CalcMode::ChapterInMonograph => "chapter_in_monograph",
        }
    }
}

impl fmt::Display for CalcMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Publication category a calculator scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    ContinuousWork,
    Monograph(CalcMode),
    ConferencePaper,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::ContinuousWork => f.write_str("continuous_work"),
            Category::Monograph(mode) => write!(f, "monograph/{mode}"),
            Category::ConferencePaper => f.write_str("conference_paper"),
        }
    }
}
