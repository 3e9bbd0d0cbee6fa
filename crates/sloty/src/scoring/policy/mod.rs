//! Policy selection: which tier and category scores a record, if any.
//!
//! Selection walks the record's kind, then year and raw points, then (for
//! monographs) the publisher level, structural kind, credited roles and the
//! HST grouping of its disciplines. The first rule that decides wins.

mod error;
mod schedule;

pub use error::{IntegrityViolation, NotScorable, PolicyError};
pub use schedule::{
    ConferenceSchedule, ContinuousSchedule, MonographRule, PolicySchedule, PublisherLevel,
    ScheduleError,
};

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::debug;

use super::calculator::{CalcMode, Calculator, Category, StructuralKind, Tier};
use super::contributions::ContributionFilter;
use super::domain::{
    DisciplineId, InstitutionConfig, PublicationKind, PublicationRecord, Responsibility,
    NO_PUBLISHER_TIER,
};
use super::reference::ReferenceCatalog;

/// Chooses the calculator that applies to a record.
pub struct PolicySelector<C> {
    catalog: Arc<C>,
    schedule: Arc<PolicySchedule>,
}

impl<C> Clone for PolicySelector<C> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            schedule: Arc::clone(&self.schedule),
        }
    }
}

impl<C> PolicySelector<C>
where
    C: ReferenceCatalog,
{
    pub fn new(catalog: Arc<C>, schedule: PolicySchedule) -> Self {
        Self {
            catalog,
            schedule: Arc::new(schedule),
        }
    }

    pub fn schedule(&self) -> &PolicySchedule {
        &self.schedule
    }

    pub fn select<'r>(
        &self,
        record: &'r PublicationRecord,
        institution: &InstitutionConfig,
    ) -> Result<Calculator<'r>, PolicyError> {
        let outcome = self.resolve(record, institution);
        match &outcome {
            Ok(calculator) => debug!(
                record = record.id.0,
                tier = %calculator.tier(),
                category = %calculator.category(),
                "scoring policy selected"
            ),
            Err(PolicyError::NotScorable(not_scorable)) => debug!(
                record = record.id.0,
                reason = not_scorable.reason(),
                "record not scorable"
            ),
            Err(PolicyError::Integrity(violation)) => debug!(
                record = record.id.0,
                error = %violation,
                "record failed integrity checks"
            ),
        }
        outcome
    }

    fn resolve<'r>(
        &self,
        record: &'r PublicationRecord,
        institution: &InstitutionConfig,
    ) -> Result<Calculator<'r>, PolicyError> {
        match record.kind {
            PublicationKind::Patent => {
                return Err(PolicyError::not_scorable("patents are not scored"))
            }
            PublicationKind::MultiInstitutionWork => {
                return Err(PolicyError::not_scorable(
                    "multi-institution works are not scored",
                ))
            }
            _ => {}
        }

        if institution.hides(record.correction_status) {
            let status = record.correction_status.map(|status| status.0).unwrap_or_default();
            return Err(PolicyError::not_scorable(format!(
                "correction status {status} is hidden from scoring"
            )));
        }

        let Some(year) = record.year else {
            let filter = ContributionFilter::new(&record.contributions);
            if filter.referenced_disciplines().is_empty() {
                return Err(PolicyError::not_scorable("record has no publication year"));
            }
            return Err(IntegrityViolation::DisciplinesWithoutYear { record: record.id }.into());
        };

        match record.kind {
            PublicationKind::ContinuousWork => self.continuous_work(record, year),
            PublicationKind::MonographBook
            | PublicationKind::MonographChapter
            | PublicationKind::ConferencePaper => self.monograph(record, year),
            PublicationKind::DoctoralThesis | PublicationKind::HabilitationThesis => {
                if record.raw_points > Decimal::ZERO {
                    Err(PolicyError::not_scorable(format!(
                        "cannot be matched to any scoring group ({}, year {year}, points {})",
                        record.kind.label(),
                        record.raw_points
                    )))
                } else {
                    Err(PolicyError::not_scorable(format!(
                        "unrecognized publication type {}",
                        record.kind.label()
                    )))
                }
            }
            PublicationKind::Patent | PublicationKind::MultiInstitutionWork => Err(
                PolicyError::not_scorable(format!("{} is not scored", record.kind.label())),
            ),
        }
    }

    fn continuous_work<'r>(
        &self,
        record: &'r PublicationRecord,
        year: i32,
    ) -> Result<Calculator<'r>, PolicyError> {
        let table = &self.schedule.continuous;
        let points = record.raw_points;
        let positive = points > Decimal::ZERO;

        let tier = if (self.schedule.min_year..=table.legacy_last_year).contains(&year) {
            if points >= table.legacy_tier1_floor {
                Some(Tier::Tier1)
            } else if table.legacy_tier2_points.contains(&points) {
                Some(Tier::Tier2)
            } else if positive && points < table.legacy_tier3_below {
                Some(Tier::Tier3)
            } else {
                None
            }
        } else if year > table.legacy_last_year && year <= self.schedule.max_year {
            if table.tier1_points.contains(&points) {
                Some(Tier::Tier1)
            } else if table.tier2_points.contains(&points) {
                Some(Tier::Tier2)
            } else if positive && points <= table.tier3_up_to {
                Some(Tier::Tier3)
            } else {
                None
            }
        } else {
            None
        };

        let tier = tier.ok_or_else(|| {
            PolicyError::not_scorable(format!(
                "points/year combination unmapped (year {year}, points {points})"
            ))
        })?;

        Ok(Calculator::new(record, tier, Category::ContinuousWork))
    }

    fn monograph<'r>(
        &self,
        record: &'r PublicationRecord,
        year: i32,
    ) -> Result<Calculator<'r>, PolicyError> {
        let schedule = &self.schedule;
        if year < schedule.min_year || year > schedule.max_year {
            return Err(PolicyError::not_scorable(format!(
                "year {year} outside the scored range {}-{}",
                schedule.min_year, schedule.max_year
            )));
        }

        let publisher_tier = record
            .publisher
            .and_then(|publisher| self.catalog.publisher_tier(publisher, year))
            .unwrap_or(NO_PUBLISHER_TIER);

        if record.kind == PublicationKind::ConferencePaper {
            let tier = self.conference_tier(record, publisher_tier)?;
            return Ok(Calculator::new(record, tier, Category::ConferencePaper));
        }

        let structural_kind = structural_kind(record)?;
        let filter = ContributionFilter::new(&record.contributions);
        let mode = match structural_kind {
            StructuralKind::Book => {
                let authors = filter.has_role(Responsibility::Author);
                let editors = filter.has_role(Responsibility::Editor);
                match (authors, editors) {
                    (true, false) => CalcMode::AuthorshipOfMonograph,
                    (false, true) => CalcMode::EditorshipOfMonograph,
                    (true, true) => {
                        return Err(PolicyError::not_scorable(
                            "both author and editor roles present",
                        ))
                    }
                    (false, false) => return Err(PolicyError::not_scorable("no qualifying roles")),
                }
            }
            StructuralKind::Chapter => CalcMode::ChapterInMonograph,
        };

        let (is_hst, hst_disciplines) = self.hst_grouping(record, &filter)?;
        let raw_points = record.raw_points;

        let tier = schedule
            .monograph_rule(PublisherLevel::from_tier(publisher_tier), mode)
            .filter(|rule| rule.matches(raw_points, is_hst))
            .map(|rule| rule.tier)
            .ok_or_else(|| {
                PolicyError::not_scorable(format!(
                    "cannot be matched to any scoring group (publisher tier {publisher_tier}, \
                     {structural_kind}, {mode}, points {raw_points}, hst {is_hst})"
                ))
            })?;

        let multipliers: BTreeMap<_, _> = if schedule.hst_monograph_multiplier == Decimal::ONE {
            BTreeMap::new()
        } else {
            hst_disciplines
                .into_iter()
                .map(|discipline| (discipline, schedule.hst_monograph_multiplier))
                .collect()
        };

        Ok(Calculator::new(record, tier, Category::Monograph(mode)).with_multipliers(multipliers))
    }

    fn conference_tier(
        &self,
        record: &PublicationRecord,
        publisher_tier: i8,
    ) -> Result<Tier, PolicyError> {
        let table = &self.schedule.conference;
        let points = record.raw_points;

        if points == table.indexed_tier3_points
            && self.catalog.is_indexed(record.id, &table.indexed_database)
        {
            return Ok(Tier::Tier3);
        }
        if table.tier1_points.contains(&points) {
            return Ok(Tier::Tier1);
        }
        if table.tier2_points.contains(&points) {
            return Ok(Tier::Tier2);
        }
        if points == table.ranked_publisher_points {
            return Ok(if publisher_tier == 1 {
                Tier::Tier2
            } else {
                Tier::Tier3
            });
        }
        if points == table.top_publisher_points && publisher_tier == 2 {
            return Ok(Tier::Tier1);
        }
        if table.tier3_points.contains(&points) {
            return Ok(Tier::Tier3);
        }

        Err(PolicyError::not_scorable(format!(
            "conference paper points/publisher combination unmapped \
             (points {points}, publisher tier {publisher_tier})"
        )))
    }

    /// HST flag shared by every referenced discipline, plus the HST disciplines themselves.
    fn hst_grouping(
        &self,
        record: &PublicationRecord,
        filter: &ContributionFilter<'_>,
    ) -> Result<(bool, Vec<DisciplineId>), PolicyError> {
        let referenced = filter.referenced_disciplines();
        if referenced.is_empty() {
            return Err(PolicyError::not_scorable("record references no disciplines"));
        }

        let mut hst = Vec::new();
        let mut other = 0usize;
        for id in referenced {
            let discipline =
                self.catalog
                    .discipline(id)
                    .ok_or(IntegrityViolation::UnknownDiscipline {
                        record: record.id,
                        discipline: id,
                    })?;
            if discipline.is_hst {
                hst.push(id);
            } else {
                other += 1;
            }
        }

        match (hst.is_empty(), other) {
            (false, 0) => Ok((true, hst)),
            (true, _) => Ok((false, hst)),
            (false, _) => Err(PolicyError::not_scorable("mixed HST/non-HST not supported")),
        }
    }
}

fn structural_kind(record: &PublicationRecord) -> Result<StructuralKind, PolicyError> {
    let Some(formal) = &record.formal_character else {
        return match record.kind {
            PublicationKind::MonographChapter => Ok(StructuralKind::Chapter),
            _ => Ok(StructuralKind::Book),
        };
    };

    match (formal.book, formal.chapter) {
        (true, false) => Ok(StructuralKind::Book),
        (false, true) => Ok(StructuralKind::Chapter),
        (true, true) => Err(IntegrityViolation::BookAndChapter {
            record: record.id,
            code: formal.code.clone(),
        }
        .into()),
        (false, false) => Err(PolicyError::not_scorable(format!(
            "formal character '{}' is neither book nor chapter",
            formal.code
        ))),
    }
}
