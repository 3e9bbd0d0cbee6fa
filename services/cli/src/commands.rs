use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use sloty::config::EngineConfig;
use sloty::error::AppError;
use sloty::scoring::{
    round_score, AuthorDisciplineTotals, AuthorId, DisciplineId, InMemoryCatalog,
    InMemoryScoreStore, InstitutionConfig, PolicyError, PolicySchedule, PolicySelector,
    PublicationRecord, RebuildReport, RecordId, RecordScores, ScoreCache, Tier,
};
use tracing::info;

use crate::snapshot::Snapshot;

#[derive(Args, Debug)]
pub(crate) struct SelectArgs {
    /// JSON snapshot with reference data and records
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct RebuildArgs {
    /// JSON snapshot with reference data and records
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// Rebuild only this record
    #[arg(long)]
    pub(crate) record: Option<u64>,
}

#[derive(Args, Debug)]
pub(crate) struct TotalsArgs {
    /// JSON snapshot with reference data and records
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// Author whose cached shares are summed
    #[arg(long)]
    pub(crate) author: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct SelectionView {
    pub(crate) record: RecordId,
    #[serde(flatten)]
    pub(crate) outcome: SelectionOutcome,
}

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub(crate) enum SelectionOutcome {
    Selected {
        tier: Tier,
        category: String,
        m: usize,
        disciplines: Vec<DisciplineShare>,
    },
    NotScorable {
        reason: String,
    },
    IntegrityViolation {
        error: String,
    },
}

#[derive(Debug, Serialize)]
pub(crate) struct DisciplineShare {
    pub(crate) discipline: DisciplineId,
    pub(crate) k: usize,
    pub(crate) points: Option<Decimal>,
    pub(crate) slot: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RebuildView {
    pub(crate) report: RebuildReport,
    pub(crate) records: Vec<RecordRows>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RecordRows {
    pub(crate) record: RecordId,
    #[serde(flatten)]
    pub(crate) scores: RecordScores,
}

#[derive(Debug, Serialize)]
pub(crate) struct TotalsView {
    pub(crate) author: AuthorId,
    pub(crate) totals: Vec<AuthorDisciplineTotals>,
}

pub(crate) fn run_select(config: &EngineConfig, args: SelectArgs) -> Result<(), AppError> {
    let (catalog, institution, records) = Snapshot::load(&args.snapshot)?.into_parts();
    let views = select_records(
        catalog,
        config.schedule()?,
        &institution,
        &records,
        config.scoring.decimal_places,
    );
    print_json(&views)
}

pub(crate) fn run_rebuild(config: &EngineConfig, args: RebuildArgs) -> Result<(), AppError> {
    let (catalog, institution, records) = Snapshot::load(&args.snapshot)?.into_parts();
    let cache = score_cache(catalog, config.schedule()?, config.scoring.decimal_places);
    let view = rebuild_records(&cache, &institution, &records, args.record.map(RecordId))?;
    print_json(&view)
}

pub(crate) fn run_totals(config: &EngineConfig, args: TotalsArgs) -> Result<(), AppError> {
    let (catalog, institution, records) = Snapshot::load(&args.snapshot)?.into_parts();
    let cache = score_cache(catalog, config.schedule()?, config.scoring.decimal_places);
    let view = author_totals(&cache, &institution, &records, AuthorId(args.author))?;
    print_json(&view)
}

pub(crate) fn run_schedule(config: &EngineConfig) -> Result<(), AppError> {
    print_json(&config.schedule()?)
}

fn score_cache(
    catalog: InMemoryCatalog,
    schedule: PolicySchedule,
    decimal_places: u32,
) -> ScoreCache<InMemoryCatalog, InMemoryScoreStore> {
    ScoreCache::new(
        Arc::new(catalog),
        Arc::new(InMemoryScoreStore::new()),
        schedule,
    )
    .with_decimal_places(decimal_places)
}

pub(crate) fn select_records(
    catalog: InMemoryCatalog,
    schedule: PolicySchedule,
    institution: &InstitutionConfig,
    records: &[PublicationRecord],
    decimal_places: u32,
) -> Vec<SelectionView> {
    let selector = PolicySelector::new(Arc::new(catalog), schedule);
    let round = |value: Decimal| round_score(value, decimal_places);

    records
        .iter()
        .map(|record| {
            let outcome = match selector.select(record, institution) {
                Ok(calculator) => SelectionOutcome::Selected {
                    tier: calculator.tier(),
                    category: calculator.category().to_string(),
                    m: calculator.m(),
                    disciplines: calculator
                        .all_referenced_disciplines()
                        .into_iter()
                        .map(|discipline| DisciplineShare {
                            discipline,
                            k: calculator.k(discipline),
                            points: calculator.points_for_discipline(discipline).map(round),
                            slot: calculator.slot_for_discipline(discipline).map(round),
                        })
                        .collect(),
                },
                Err(PolicyError::NotScorable(not_scorable)) => SelectionOutcome::NotScorable {
                    reason: not_scorable.reason().to_string(),
                },
                Err(PolicyError::Integrity(violation)) => SelectionOutcome::IntegrityViolation {
                    error: violation.to_string(),
                },
            };
            SelectionView {
                record: record.id,
                outcome,
            }
        })
        .collect()
}

pub(crate) fn rebuild_records(
    cache: &ScoreCache<InMemoryCatalog, InMemoryScoreStore>,
    institution: &InstitutionConfig,
    records: &[PublicationRecord],
    only: Option<RecordId>,
) -> Result<RebuildView, AppError> {
    let selected: Vec<&PublicationRecord> = records
        .iter()
        .filter(|record| only.map(|id| record.id == id).unwrap_or(true))
        .collect();
    if let (Some(id), true) = (only, selected.is_empty()) {
        return Err(AppError::UnknownRecord(id));
    }

    let report = cache.rebuild_batch(selected.iter().copied(), Some(institution))?;
    let mut rows = Vec::with_capacity(report.scored.len());
    for record in &report.scored {
        rows.push(RecordRows {
            record: *record,
            scores: cache.record_scores(*record)?,
        });
    }
    info!(records = selected.len(), "snapshot rebuilt");

    Ok(RebuildView {
        report,
        records: rows,
    })
}

pub(crate) fn author_totals(
    cache: &ScoreCache<InMemoryCatalog, InMemoryScoreStore>,
    institution: &InstitutionConfig,
    records: &[PublicationRecord],
    author: AuthorId,
) -> Result<TotalsView, AppError> {
    cache.rebuild_batch(records, Some(institution))?;
    Ok(TotalsView {
        author,
        totals: cache.author_totals(author)?,
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
