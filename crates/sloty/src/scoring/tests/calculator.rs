use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::common::*;
use crate::scoring::calculator::{Calculator, Category, Tier};
use crate::scoring::domain::{AuthorId, DisciplineId, InstitutionConfig, PublicationKind, Responsibility};

fn round(value: Option<Decimal>) -> Option<Decimal> {
    value.map(|value| value.round_dp(4))
}

fn assert_article_shares(year: i32, raw_points: i64, points: &str, slot: &str) {
    let record = article(1, year, raw_points);
    let calculator = selector()
        .select(&record, &InstitutionConfig::default())
        .expect("article scorable");

    for (index, discipline) in [COMPUTER_SCIENCE, MATHEMATICS].into_iter().enumerate() {
        assert_eq!(
            round(calculator.points_for_discipline(discipline)),
            Some(dec(points)),
            "{year}/{raw_points} points for {discipline:?}"
        );
        assert_eq!(
            round(calculator.slot_for_discipline(discipline)),
            Some(dec(slot)),
            "{year}/{raw_points} slot for {discipline:?}"
        );
        let author = &record.contributions[index];
        assert_eq!(round(calculator.points_for_author(author)), Some(dec(points)));
        assert_eq!(round(calculator.slot_for_author(author)), Some(dec(slot)));
    }
}

#[test]
fn legacy_article_shares_for_two_disciplines() {
    assert_article_shares(2017, 30, "30", "1");
    assert_article_shares(2017, 20, "14.1421", "0.7071");
    assert_article_shares(2017, 25, "17.6777", "0.7071");
    assert_article_shares(2017, 15, "7.5", "0.5");
}

#[test]
fn current_article_shares_for_two_disciplines() {
    assert_article_shares(2019, 70, "49.4975", "0.7071");
    assert_article_shares(2019, 40, "28.2843", "0.7071");
    assert_article_shares(2019, 20, "10", "0.5");
}

#[test]
fn removing_affiliation_zeroes_tier2_slot() {
    let mut record = article(1, 2019, 70);
    record.contributions[1].affiliates = false;
    let calculator = Calculator::new(&record, Tier::Tier2, Category::ContinuousWork);

    assert_eq!(calculator.k(MATHEMATICS), 0);
    assert_eq!(calculator.m(), 2);
    assert_eq!(calculator.slot_for_discipline(MATHEMATICS), Some(Decimal::ZERO));
    assert_eq!(calculator.slot_for_author_in_discipline(MATHEMATICS), None);
    assert_eq!(calculator.points_for_author(&record.contributions[1]), None);
    assert_eq!(
        round(calculator.slot_for_discipline(COMPUTER_SCIENCE)),
        Some(dec("0.7071"))
    );
}

#[test]
fn author_slot_divides_discipline_slot_by_k() {
    let record = record(
        1,
        PublicationKind::ContinuousWork,
        2019,
        Decimal::from(20),
        vec![
            contribution(1, Some(COMPUTER_SCIENCE), Responsibility::Author),
            contribution(2, Some(COMPUTER_SCIENCE), Responsibility::Author),
            contribution(3, Some(MATHEMATICS), Responsibility::Author),
        ],
    );
    let calculator = Calculator::new(&record, Tier::Tier3, Category::ContinuousWork);

    let slot = calculator
        .slot_for_discipline(COMPUTER_SCIENCE)
        .expect("discipline referenced");
    let author_slot = calculator
        .slot_for_author_in_discipline(COMPUTER_SCIENCE)
        .expect("two qualifying authors");

    assert_eq!(calculator.k(COMPUTER_SCIENCE), 2);
    assert_eq!(author_slot, slot / Decimal::from(2));
    assert_eq!(slot.round_dp(4), dec("0.6667"));
    assert_eq!(
        round(calculator.points_for_discipline(COMPUTER_SCIENCE)),
        Some(dec("13.3333"))
    );
    assert_eq!(
        round(calculator.points_for_author(&record.contributions[0])),
        Some(dec("6.6667"))
    );
}

#[test]
fn tier1_grants_full_slot_to_every_discipline() {
    let record = article(1, 2019, 100);
    let calculator = Calculator::new(&record, Tier::Tier1, Category::ContinuousWork);

    assert_eq!(
        calculator.points_for_discipline(COMPUTER_SCIENCE),
        Some(Decimal::from(100))
    );
    assert_eq!(calculator.slot_for_discipline(MATHEMATICS), Some(Decimal::ONE));
}

#[test]
fn unreferenced_discipline_yields_nothing() {
    let record = article(1, 2019, 70);
    let calculator = Calculator::new(&record, Tier::Tier2, Category::ContinuousWork);

    assert_eq!(calculator.points_for_discipline(HISTORY), None);
    assert_eq!(calculator.slot_for_discipline(HISTORY), None);
    assert_eq!(calculator.slot_for_author_in_discipline(HISTORY), None);

    let unpinned = contribution(9, None, Responsibility::Author);
    assert_eq!(calculator.points_for_author(&unpinned), None);
    assert_eq!(calculator.slot_for_author(&unpinned), None);
}

#[test]
fn referenced_disciplines_and_qualifying_authors_keep_order() {
    let record = record(
        1,
        PublicationKind::ContinuousWork,
        2019,
        Decimal::from(40),
        vec![
            contribution(3, Some(MATHEMATICS), Responsibility::Author),
            contribution(1, Some(COMPUTER_SCIENCE), Responsibility::Author),
            contribution(2, Some(MATHEMATICS), Responsibility::Editor),
        ],
    );
    let calculator = Calculator::new(&record, Tier::Tier2, Category::ContinuousWork);

    assert_eq!(
        calculator.all_referenced_disciplines(),
        vec![COMPUTER_SCIENCE, MATHEMATICS]
    );
    let authors: Vec<AuthorId> = calculator
        .qualifying_authors(MATHEMATICS, None)
        .into_iter()
        .map(|author| author.author_id)
        .collect();
    assert_eq!(authors, vec![AuthorId(3), AuthorId(2)]);
    assert_eq!(
        calculator
            .qualifying_authors(MATHEMATICS, Some(Responsibility::Editor))
            .len(),
        1
    );
    assert!(calculator
        .qualifying_authors(DisciplineId(404), None)
        .is_empty());
}

#[test]
fn record_without_contributions_has_no_ratio() {
    let record = record(
        1,
        PublicationKind::ContinuousWork,
        2019,
        Decimal::from(70),
        Vec::new(),
    );
    let calculator = Calculator::new(&record, Tier::Tier2, Category::ContinuousWork);

    assert_eq!(calculator.m(), 0);
    assert_eq!(calculator.k_over_m(COMPUTER_SCIENCE), None);
    assert_eq!(calculator.sqrt_k_over_m(COMPUTER_SCIENCE), None);
    assert!(calculator.all_referenced_disciplines().is_empty());
}

#[test]
fn overflowing_multiplier_yields_no_points() {
    let record = article(1, 2019, 300);
    let calculator = Calculator::new(&record, Tier::Tier1, Category::ContinuousWork)
        .with_multipliers(BTreeMap::from([(COMPUTER_SCIENCE, Decimal::MAX)]));

    assert_eq!(calculator.points_for_discipline(COMPUTER_SCIENCE), None);
    assert_eq!(calculator.slot_for_discipline(COMPUTER_SCIENCE), Some(Decimal::ONE));
    assert_eq!(
        calculator.points_for_author(&record.contributions[0]),
        None
    );
    assert_eq!(
        calculator.points_for_discipline(MATHEMATICS),
        Some(Decimal::from(300))
    );
}
