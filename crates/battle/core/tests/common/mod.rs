#![allow(dead_code)]

use battle_core::{
    Battle, BattleConfig, BehaviorPolicy, Board, EntityId, EntityTemplate, EntityType, Inventory,
    Roster, SequenceRng, Side, StatBlock,
};

pub type TestBattle = Battle<SequenceRng>;

/// Every roll comes out as 50: hits at 70% land, 1% criticals miss.
pub fn even_rolls() -> SequenceRng {
    SequenceRng::new([50])
}

pub fn hero(name: &str, spd: i32, atk: i32) -> EntityTemplate {
    EntityTemplate::new(
        name,
        EntityType::ORGANIC,
        40,
        StatBlock {
            atk,
            mag: 10,
            vlt: 10,
            def: 5,
            spd,
            ..StatBlock::default()
        },
    )
}

pub fn foe(max_hp: i32, spd: i32) -> EntityTemplate {
    EntityTemplate::new(
        "Fouling",
        EntityType::ORGANIC,
        max_hp,
        StatBlock {
            atk: 8,
            def: 5,
            res: 2,
            spd,
            ..StatBlock::default()
        },
    )
    .with_behavior(BehaviorPolicy::Brute)
    .with_exp_reward(40)
}

pub fn instant_config() -> BattleConfig {
    BattleConfig::instant().with_enemy_head_start(0.0)
}

/// Builds and starts a battle from player and enemy templates.
pub fn start(
    players: &[EntityTemplate],
    enemies: &[EntityTemplate],
    board: Board,
    inventory: Inventory,
) -> (TestBattle, Vec<EntityId>, Vec<EntityId>) {
    let mut roster = Roster::new();
    let player_ids = players
        .iter()
        .map(|t| roster.spawn(Side::Player, t))
        .collect();
    let enemy_ids = enemies
        .iter()
        .map(|t| roster.spawn(Side::Enemy, t))
        .collect();

    let mut battle = Battle::with_rng(instant_config(), roster, board, inventory, even_rolls());
    battle.start().expect("battle starts from prep");
    (battle, player_ids, enemy_ids)
}

/// Ticks one second at a time until `done` holds. Panics after `limit` ticks.
pub fn tick_until(battle: &mut TestBattle, limit: usize, done: impl Fn(&TestBattle) -> bool) {
    for _ in 0..limit {
        if done(battle) {
            return;
        }
        battle.tick(1.0);
    }
    assert!(done(battle), "condition not reached in {limit} ticks");
}

pub fn hp(battle: &TestBattle, id: EntityId) -> i32 {
    battle.roster().get(id).map_or(-1, |e| e.hp())
}
