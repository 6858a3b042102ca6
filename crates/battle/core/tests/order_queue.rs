mod common;

use battle_core::{
    BattleEvent, BattlePhase, Board, CommandError, CommandKind, EntityTemplate, Inventory,
    OrderId, TargetRef,
};
use common::{foe, hero, hp, start, tick_until};

fn sturdy_foe() -> EntityTemplate {
    let mut template = foe(100, 0);
    template.stats.def = 0;
    template
}

#[test]
fn cancelled_order_never_commits() {
    let heroes = [hero("Ada", 25, 10), hero("Bo", 25, 20), hero("Cy", 25, 30)];
    let (mut battle, players, enemies) =
        start(&heroes, &[sturdy_foe()], Board::default(), Inventory::default());
    let foe_id = enemies[0];

    tick_until(&mut battle, 100, |b| b.awaiting_input().len() == 3);

    let mut orders = Vec::new();
    for &actor in &players {
        battle.select_actor(actor).unwrap();
        battle.submit_command(CommandKind::Attack).unwrap();
        battle.submit_target(TargetRef::Entity(foe_id)).unwrap();
        orders.push(battle.confirm().unwrap().expect("order queued"));
    }
    assert_eq!(battle.queue().len(), 3);
    assert_eq!(hp(&battle, foe_id), 100);

    let cancelled = battle.cancel_order(orders[1]).expect("second order is queued");
    assert_eq!(cancelled.actor, players[1]);
    assert_eq!(
        battle.cancel_order(orders[1]),
        Err(CommandError::UnknownOrder(orders[1].0))
    );
    battle.drain_events();

    tick_until(&mut battle, 10, |b| {
        b.queue().is_empty() && b.phase() == BattlePhase::Normal
    });
    assert_eq!(hp(&battle, foe_id), 60);

    let hits: Vec<_> = battle
        .drain_events()
        .into_iter()
        .filter_map(|event| match event {
            BattleEvent::Resolved { actor, hp_delta, .. } => Some((actor, hp_delta)),
            _ => None,
        })
        .collect();
    assert_eq!(hits, vec![(players[0], -10), (players[2], -30)]);

    // The cancelled actor keeps its turn.
    assert_eq!(battle.awaiting_input(), vec![players[1]]);
}

#[test]
fn queued_actors_cannot_be_selected_twice() {
    let (mut battle, players, enemies) = start(
        &[hero("Ada", 25, 10)],
        &[sturdy_foe()],
        Board::default(),
        Inventory::default(),
    );

    tick_until(&mut battle, 100, |b| !b.awaiting_input().is_empty());
    battle.select_actor(players[0]).unwrap();
    battle.submit_command(CommandKind::Attack).unwrap();
    battle.submit_target(TargetRef::Entity(enemies[0])).unwrap();
    battle.confirm().unwrap();

    assert!(battle.awaiting_input().is_empty());
    assert_eq!(
        battle.select_actor(players[0]),
        Err(CommandError::NotReady(players[0]))
    );
    assert_eq!(
        battle.cancel_order(OrderId(42)),
        Err(CommandError::UnknownOrder(42))
    );
}
