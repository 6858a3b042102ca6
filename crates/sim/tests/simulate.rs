use std::path::PathBuf;

use battle_core::{
    Battle, BattleConfig, BattleOutcome, BehaviorPolicy, Board, EntityTemplate, EntityType,
    Inventory, Roster, SequenceRng, Side, StatBlock,
};
use battle_sim::{SimConfig, run, simulate};

fn bundled_data() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

fn fighter(name: &str, max_hp: i32, atk: i32, behavior: BehaviorPolicy) -> EntityTemplate {
    EntityTemplate::new(
        name,
        EntityType::ORGANIC,
        max_hp,
        StatBlock {
            atk,
            def: 2,
            spd: 20,
            ..StatBlock::default()
        },
    )
    .with_behavior(behavior)
}

#[test]
fn stronger_side_wins_a_scripted_battle() {
    let mut roster = Roster::new();
    roster.spawn(Side::Player, &fighter("Rook", 60, 20, BehaviorPolicy::Brute));
    roster.spawn(Side::Enemy, &fighter("Fouling", 20, 4, BehaviorPolicy::Brute));

    let config = BattleConfig::instant().with_enemy_head_start(0.0);
    let mut battle = Battle::with_rng(
        config,
        roster,
        Board::default(),
        Inventory::default(),
        SequenceRng::new([10]),
    );

    let report = simulate(&mut battle, 1.0, 1_000).unwrap();
    assert_eq!(report.outcome, Some(BattleOutcome::Victory));
    assert!(report.ticks < 1_000);
    assert_eq!(report.survivors.len(), 1);
    assert_eq!(report.survivors[0].name, "Rook");
}

#[test]
fn input_driven_entities_stop_the_simulation() {
    let mut roster = Roster::new();
    roster.spawn(Side::Player, &fighter("Rook", 60, 20, BehaviorPolicy::Player));
    roster.spawn(Side::Enemy, &fighter("Fouling", 20, 4, BehaviorPolicy::Brute));

    let mut battle = Battle::with_rng(
        BattleConfig::instant(),
        roster,
        Board::default(),
        Inventory::default(),
        SequenceRng::new([10]),
    );

    let err = simulate(&mut battle, 1.0, 1_000).unwrap_err();
    assert!(err.to_string().contains("waiting for player input"));
}

#[test]
fn tick_limit_leaves_the_outcome_open() {
    let mut roster = Roster::new();
    roster.spawn(Side::Player, &fighter("Rook", 60, 20, BehaviorPolicy::Brute));
    roster.spawn(Side::Enemy, &fighter("Fouling", 20, 4, BehaviorPolicy::Brute));

    let mut battle = Battle::with_rng(
        BattleConfig::instant(),
        roster,
        Board::default(),
        Inventory::default(),
        SequenceRng::new([10]),
    );

    let report = simulate(&mut battle, 0.01, 1).unwrap();
    assert_eq!(report.outcome, None);
    assert_eq!(report.ticks, 1);
    assert_eq!(report.survivors.len(), 2);
}

#[test]
fn bundled_content_plays_to_the_end() {
    let config = SimConfig {
        data_dir: bundled_data(),
        seed: Some(7),
        tick_seconds: 0.1,
        ..SimConfig::default()
    };

    let report = run(&config).unwrap();
    assert!(report.outcome.is_some(), "battle did not finish: {report:?}");

    let json = serde_json::to_value(&report).unwrap();
    assert!(json["outcome"].is_string());
    assert!(json["survivors"].is_array());
}
