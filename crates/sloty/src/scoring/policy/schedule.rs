use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::scoring::calculator::{CalcMode, Tier};
use crate::scoring::reference::WEB_OF_SCIENCE;

/// Upper bound accepted for `hst_monograph_multiplier`.
pub const MAX_HST_MONOGRAPH_MULTIPLIER: i64 = 10;

/// Point tables of the national evaluation schedule.
///
/// Every section falls back to the built-in schedule when omitted, so a JSON file
/// only needs to list what changed:
///
/// ```json
/// { "max_year": 2026, "hst_monograph_multiplier": "1.5" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicySchedule {
    /// First year scored at all.
    pub min_year: i32,
    /// Last year covered by the tables.
    pub max_year: i32,
    pub continuous: ContinuousSchedule,
    pub conference: ConferenceSchedule,
    pub monograph: Vec<MonographRule>,
    /// Applied to HST disciplines of books and chapters.
    pub hst_monograph_multiplier: Decimal,
}

impl Default for PolicySchedule {
    fn default() -> Self {
        Self {
            min_year: 2017,
            max_year: 2025,
            continuous: ContinuousSchedule::default(),
            conference: ConferenceSchedule::default(),
            monograph: default_monograph_rules(),
            hst_monograph_multiplier: Decimal::ONE,
        }
    }
}

impl PolicySchedule {
    pub fn from_json_file(path: &Path) -> Result<Self, ScheduleError> {
        let raw = fs::read_to_string(path).map_err(|source| ScheduleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ScheduleError> {
        let schedule: PolicySchedule = serde_json::from_str(raw)?;
        schedule.validate()?;
        Ok(schedule)
    }

    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.min_year > self.max_year {
            return Err(ScheduleError::Invalid(format!(
                "min_year {} is after max_year {}",
                self.min_year, self.max_year
            )));
        }

        let legacy = self.continuous.legacy_last_year;
        if legacy < self.min_year || legacy > self.max_year {
            return Err(ScheduleError::Invalid(format!(
                "continuous.legacy_last_year {legacy} outside {}-{}",
                self.min_year, self.max_year
            )));
        }

        let max_multiplier = Decimal::from(MAX_HST_MONOGRAPH_MULTIPLIER);
        if self.hst_monograph_multiplier <= Decimal::ZERO
            || self.hst_monograph_multiplier > max_multiplier
        {
            return Err(ScheduleError::Invalid(format!(
                "hst_monograph_multiplier {} outside (0, {max_multiplier}]",
                self.hst_monograph_multiplier
            )));
        }

        let mut seen = BTreeSet::new();
        for rule in &self.monograph {
            if !seen.insert((rule.publisher_level, rule.mode.label())) {
                return Err(ScheduleError::Invalid(format!(
                    "duplicate monograph rule for {:?} publisher and {}",
                    rule.publisher_level, rule.mode
                )));
            }
        }

        Ok(())
    }

    pub fn monograph_rule(&self, level: PublisherLevel, mode: CalcMode) -> Option<&MonographRule> {
        self.monograph
            .iter()
            .find(|rule| rule.publisher_level == level && rule.mode == mode)
    }
}

/// Thresholds for journal articles and other serial works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContinuousSchedule {
    /// Years from `min_year` up to this one use the legacy point list.
    pub legacy_last_year: i32,
    pub legacy_tier1_floor: Decimal,
    pub legacy_tier2_points: Vec<Decimal>,
    /// Exclusive upper bound for legacy Tier3.
    pub legacy_tier3_below: Decimal,
    pub tier1_points: Vec<Decimal>,
    pub tier2_points: Vec<Decimal>,
    /// Inclusive upper bound for Tier3.
    pub tier3_up_to: Decimal,
}

impl Default for ContinuousSchedule {
    fn default() -> Self {
        Self {
            legacy_last_year: 2018,
            legacy_tier1_floor: Decimal::from(30),
            legacy_tier2_points: points(&[20, 25]),
            legacy_tier3_below: Decimal::from(20),
            tier1_points: points(&[200, 140, 100]),
            tier2_points: points(&[70, 40]),
            tier3_up_to: Decimal::from(20),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConferenceSchedule {
    pub indexed_database: String,
    /// Points that score Tier3 only when the paper is indexed in `indexed_database`.
    pub indexed_tier3_points: Decimal,
    pub tier1_points: Vec<Decimal>,
    pub tier2_points: Vec<Decimal>,
    /// Tier2 with a level-1 publisher, Tier3 otherwise.
    pub ranked_publisher_points: Decimal,
    /// Tier1, but only with a level-2 publisher.
    pub top_publisher_points: Decimal,
    pub tier3_points: Vec<Decimal>,
}

impl Default for ConferenceSchedule {
    fn default() -> Self {
        Self {
            indexed_database: WEB_OF_SCIENCE.to_string(),
            indexed_tier3_points: Decimal::from(15),
            tier1_points: points(&[200, 140, 100]),
            tier2_points: points(&[70, 40]),
            ranked_publisher_points: Decimal::from(20),
            top_publisher_points: Decimal::from(50),
            tier3_points: points(&[5]),
        }
    }
}

/// Publisher prestige band used by the monograph table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublisherLevel {
    /// Publisher tier 2.
    Top,
    /// Publisher tier 1.
    Ranked,
    /// Tier 0, or no entry for the year.
    Other,
}

impl PublisherLevel {
    pub fn from_tier(tier: i8) -> Self {
        match tier {
            2 => PublisherLevel::Top,
            1 => PublisherLevel::Ranked,
            _ => PublisherLevel::Other,
        }
    }
}

/// One cell group of the monograph table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonographRule {
    pub publisher_level: PublisherLevel,
    pub mode: CalcMode,
    pub non_hst_points: Vec<Decimal>,
    pub hst_points: Vec<Decimal>,
    pub tier: Tier,
}

impl MonographRule {
    pub fn matches(&self, raw_points: Decimal, is_hst: bool) -> bool {
        let accepted = if is_hst {
            &self.hst_points
        } else {
            &self.non_hst_points
        };
        accepted.contains(&raw_points)
    }
}

fn default_monograph_rules() -> Vec<MonographRule> {
    use CalcMode::{AuthorshipOfMonograph, ChapterInMonograph, EditorshipOfMonograph};
    use PublisherLevel::{Other, Ranked, Top};

    let two_and_half = Decimal::new(25, 1);
    let rule = |publisher_level, mode, non_hst_points, hst_points, tier| MonographRule {
        publisher_level,
        mode,
        non_hst_points,
        hst_points,
        tier,
    };

    vec![
        rule(Top, AuthorshipOfMonograph, points(&[200, 100]), points(&[300]), Tier::Tier1),
        rule(Top, EditorshipOfMonograph, points(&[100, 50]), points(&[150]), Tier::Tier1),
        rule(Top, ChapterInMonograph, points(&[50, 25]), points(&[75]), Tier::Tier1),
        rule(Ranked, AuthorshipOfMonograph, points(&[80, 40, 100]), points(&[120]), Tier::Tier2),
        rule(Ranked, EditorshipOfMonograph, points(&[20, 10]), points(&[40]), Tier::Tier2),
        rule(Ranked, ChapterInMonograph, points(&[20, 10]), points(&[20]), Tier::Tier2),
        rule(Other, AuthorshipOfMonograph, points(&[20, 10]), points(&[20, 120]), Tier::Tier3),
        rule(
            Other,
            EditorshipOfMonograph,
            vec![Decimal::from(5), two_and_half],
            points(&[10, 20]),
            Tier::Tier3,
        ),
        rule(
            Other,
            ChapterInMonograph,
            vec![Decimal::from(5), two_and_half],
            points(&[5, 20]),
            Tier::Tier3,
        ),
    ]
}

fn points(values: &[i64]) -> Vec<Decimal> {
    values.iter().copied().map(Decimal::from).collect()
}

/// Failure to load or validate a schedule file.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("unable to read policy schedule {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("policy schedule is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("policy schedule rejected: {0}")]
    Invalid(String),
}
