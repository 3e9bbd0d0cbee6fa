use std::sync::Arc;

use rust_decimal::Decimal;

use crate::scoring::cache::{InMemoryScoreStore, ScoreCache};
use crate::scoring::domain::{
    AuthorContribution, AuthorId, Discipline, DisciplineId, PublicationKind, PublicationRecord,
    PublisherId, RecordId, Responsibility, UnitId,
};
use crate::scoring::policy::{PolicySchedule, PolicySelector};
use crate::scoring::reference::{InMemoryCatalog, WEB_OF_SCIENCE};

pub(super) const COMPUTER_SCIENCE: DisciplineId = DisciplineId(10);
pub(super) const MATHEMATICS: DisciplineId = DisciplineId(11);
pub(super) const HISTORY: DisciplineId = DisciplineId(20);
pub(super) const PHILOSOPHY: DisciplineId = DisciplineId(21);

pub(super) const TOP_PUBLISHER: PublisherId = PublisherId(1);
pub(super) const RANKED_PUBLISHER: PublisherId = PublisherId(2);
pub(super) const LOCAL_PUBLISHER: PublisherId = PublisherId(3);

/// Conference paper id registered in the WoS index.
pub(super) const INDEXED_PAPER: RecordId = RecordId(900);

pub(super) fn dec(value: &str) -> Decimal {
    value.parse().expect("valid decimal literal")
}

fn discipline(id: DisciplineId, code: &str, name: &str, is_hst: bool) -> Discipline {
    Discipline {
        id,
        code: code.to_string(),
        name: name.to_string(),
        is_hst,
    }
}

pub(super) fn catalog() -> InMemoryCatalog {
    let mut catalog = InMemoryCatalog::default()
        .with_discipline(discipline(COMPUTER_SCIENCE, "2.3", "Computer science", false))
        .with_discipline(discipline(MATHEMATICS, "7.1", "Mathematics", false))
        .with_discipline(discipline(HISTORY, "1.3", "History", true))
        .with_discipline(discipline(PHILOSOPHY, "1.4", "Philosophy", true))
        .with_index(INDEXED_PAPER, WEB_OF_SCIENCE);
    for year in 2017..=2025 {
        catalog = catalog
            .with_publisher_tier(TOP_PUBLISHER, year, 2)
            .with_publisher_tier(RANKED_PUBLISHER, year, 1)
            .with_publisher_tier(LOCAL_PUBLISHER, year, 0);
    }
    catalog
}

pub(super) fn selector() -> PolicySelector<InMemoryCatalog> {
    PolicySelector::new(Arc::new(catalog()), PolicySchedule::default())
}

pub(super) fn score_cache() -> (
    ScoreCache<InMemoryCatalog, InMemoryScoreStore>,
    Arc<InMemoryScoreStore>,
) {
    let store = Arc::new(InMemoryScoreStore::new());
    let cache = ScoreCache::new(
        Arc::new(catalog()),
        Arc::clone(&store),
        PolicySchedule::default(),
    );
    (cache, store)
}

pub(super) fn contribution(
    author: u64,
    discipline: Option<DisciplineId>,
    responsibility: Responsibility,
) -> AuthorContribution {
    AuthorContribution {
        author_id: AuthorId(author),
        unit_id: UnitId(100 + author),
        credited_name: format!("A. Author{author}"),
        responsibility,
        affiliates: true,
        unit_counts_for_reports: true,
        discipline,
        order_index: author as u32,
    }
}

pub(super) fn record(
    id: u64,
    kind: PublicationKind,
    year: i32,
    raw_points: Decimal,
    contributions: Vec<AuthorContribution>,
) -> PublicationRecord {
    PublicationRecord {
        id: RecordId(id),
        kind,
        year: Some(year),
        raw_points,
        publisher: None,
        formal_character: None,
        correction_status: None,
        contributions,
    }
}

/// Journal article by two affiliated authors, one per discipline.
pub(super) fn article(id: u64, year: i32, raw_points: i64) -> PublicationRecord {
    record(
        id,
        PublicationKind::ContinuousWork,
        year,
        Decimal::from(raw_points),
        vec![
            contribution(1, Some(COMPUTER_SCIENCE), Responsibility::Author),
            contribution(2, Some(MATHEMATICS), Responsibility::Author),
        ],
    )
}

/// Book credited to `disciplines.len()` authors, one per discipline.
pub(super) fn book(
    id: u64,
    publisher: PublisherId,
    raw_points: Decimal,
    responsibility: Responsibility,
    disciplines: &[DisciplineId],
) -> PublicationRecord {
    let contributions = disciplines
        .iter()
        .enumerate()
        .map(|(index, discipline)| {
            contribution(index as u64 + 1, Some(*discipline), responsibility)
        })
        .collect();
    let mut book = record(
        id,
        PublicationKind::MonographBook,
        2020,
        raw_points,
        contributions,
    );
    book.publisher = Some(publisher);
    book
}

pub(super) fn chapter(
    id: u64,
    publisher: PublisherId,
    raw_points: Decimal,
    disciplines: &[DisciplineId],
) -> PublicationRecord {
    let mut chapter = book(id, publisher, raw_points, Responsibility::Author, disciplines);
    chapter.kind = PublicationKind::MonographChapter;
    chapter
}

pub(super) fn conference_paper(
    id: RecordId,
    publisher: Option<PublisherId>,
    raw_points: i64,
) -> PublicationRecord {
    let mut paper = article(id.0, 2021, raw_points);
    paper.id = id;
    paper.kind = PublicationKind::ConferencePaper;
    paper.publisher = publisher;
    paper
}
