//! The battle state machine.
//!
//! [`Battle`] owns every piece of battle state and is the only place that
//! mutates it. The caller advances time with [`Battle::tick`], feeds player
//! input through the methods in `input`, answers special animations with
//! [`Battle::notify_animation_complete`], and drains [`BattleEvent`]s.
mod input;
mod phase;
mod queue;
mod scheduler;

pub use phase::{BattleOutcome, BattlePhase};
pub use queue::{CommandKind, Order, OrderId, OrderPayload, OrderQueue, OrderTarget, TargetRef};
pub use scheduler::TurnScheduler;

use crate::behavior::Decision;
use crate::combat::{ActionResolver, Projection, Resolution};
use crate::config::BattleConfig;
use crate::env::{Board, PcgRng, RngOracle};
use crate::error::CommandError;
use crate::events::{BattleEvent, ProjectionSummary, TargetPreview};
use crate::state::{EffectOutcome, EntityId, Inventory, ItemEffect, Roster, Side, SpecialClass};

/// Order waiting in a projection phase for confirmation.
#[derive(Clone, Debug, PartialEq)]
struct PendingOrder {
    kind: CommandKind,
    actor: EntityId,
    target: OrderTarget,
    payload: OrderPayload,
}

/// Command under construction.
#[derive(Clone, Debug, Default)]
struct Selection {
    actor: Option<EntityId>,
    command: Option<CommandKind>,
    special: Option<(SpecialClass, usize)>,
    item: Option<usize>,
    pending: Option<PendingOrder>,
    summary: Option<ProjectionSummary>,
    /// Phase `cancel` returns to from a player projection.
    back: BattlePhase,
}

/// A single battle between the player party and an enemy party.
pub struct Battle<R: RngOracle = PcgRng> {
    config: BattleConfig,
    phase: BattlePhase,
    roster: Roster,
    board: Board,
    inventory: Inventory,
    scheduler: TurnScheduler,
    queue: OrderQueue,
    rng: R,
    selection: Selection,
    /// Order being animated.
    in_flight: Option<Order>,
    /// Seconds left in the current timed phase.
    delay: f32,
    outcome: Option<BattleOutcome>,
    events: Vec<BattleEvent>,
}

impl Battle<PcgRng> {
    /// Creates a battle using a PCG generator seeded from `config.seed`.
    pub fn new(config: BattleConfig, roster: Roster, board: Board, inventory: Inventory) -> Self {
        let rng = PcgRng::seeded(config.seed);
        Self::with_rng(config, roster, board, inventory, rng)
    }
}

impl<R: RngOracle> Battle<R> {
    pub fn with_rng(
        config: BattleConfig,
        roster: Roster,
        board: Board,
        inventory: Inventory,
        rng: R,
    ) -> Self {
        let scheduler = TurnScheduler::new(config.speed_multiplier);
        Self {
            config,
            phase: BattlePhase::BattlePrep,
            roster,
            board,
            inventory,
            scheduler,
            queue: OrderQueue::new(),
            rng,
            selection: Selection::default(),
            in_flight: None,
            delay: 0.0,
            outcome: None,
            events: Vec::new(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn queue(&self) -> &OrderQueue {
        &self.queue
    }

    pub fn scheduler(&self) -> &TurnScheduler {
        &self.scheduler
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Entity whose command is being built or previewed.
    pub fn selected_actor(&self) -> Option<EntityId> {
        self.selection.actor
    }

    /// Preview of the action awaiting confirmation.
    pub fn projection(&self) -> Option<&ProjectionSummary> {
        self.selection.summary.as_ref()
    }

    /// Order currently animating.
    pub fn in_flight(&self) -> Option<&Order> {
        self.in_flight.as_ref()
    }

    /// Takes every event buffered since the last call.
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Resets every combatant, gives enemies their random gauge head start
    /// and enters `Normal`.
    pub fn start(&mut self) -> Result<(), CommandError> {
        if self.phase != BattlePhase::BattlePrep {
            return Err(CommandError::invalid_phase("start", self.phase));
        }

        let head_start = self.config.enemy_head_start.max(0.0);
        for entity in self.roster.iter_mut() {
            entity.reset_for_battle();
            if entity.side == Side::Enemy {
                entity.set_gauge(self.rng.unit_f32() * head_start);
            }
        }
        self.roster.compact_indices();

        tracing::info!(
            players = self.roster.living(Side::Player).count(),
            enemies = self.roster.living(Side::Enemy).count(),
            "battle started"
        );
        self.set_phase(BattlePhase::Normal);
        Ok(())
    }

    /// Advances the battle by `dt` seconds.
    ///
    /// In `Normal` this first settles level-ups and terminal checks, then
    /// executes the next queued order, and only with an empty queue advances
    /// the speed gauges. Timed phases count down their delay. Every other
    /// phase waits for input.
    pub fn tick(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        match self.phase {
            BattlePhase::Normal => self.tick_normal(dt),
            BattlePhase::EnemyProjection => {
                self.delay -= dt;
                if self.delay <= 0.0 {
                    self.enqueue_pending();
                }
            }
            BattlePhase::Animating => {
                self.delay -= dt;
                if self.delay <= 0.0 {
                    self.finish_order();
                }
            }
            _ => {}
        }
    }

    /// Reports that the animation of the in-flight special reached its
    /// targets. The special's projection is committed now.
    pub fn notify_animation_complete(&mut self) -> Result<(), CommandError> {
        if self.phase != BattlePhase::SpecialAnimating {
            return Err(CommandError::invalid_phase(
                "notify_animation_complete",
                self.phase,
            ));
        }
        let Some(order) = self.in_flight.as_ref() else {
            return Err(CommandError::NoActiveEntity);
        };

        if let OrderPayload::Resolve(projection) = &order.payload {
            let projection = projection.clone();
            self.commit_projection(&projection);
        }
        self.delay = self.config.special_delay;
        self.set_phase(BattlePhase::Animating);
        Ok(())
    }

    // ========================================================================
    // Normal phase
    // ========================================================================

    fn tick_normal(&mut self, dt: f32) {
        if self.roster.is_wiped(Side::Player) {
            self.finish(BattleOutcome::Defeat);
            return;
        }
        if self.settle_level_ups() {
            return;
        }
        if self.roster.is_wiped(Side::Enemy) {
            self.finish(BattleOutcome::Victory);
            return;
        }

        if !self.queue.is_empty() {
            self.start_next_order();
            return;
        }

        self.scheduler
            .tick(&mut self.roster, &self.board, dt, &mut self.events);
        self.roster.compact_indices();

        if self.roster.is_wiped(Side::Player) {
            self.finish(BattleOutcome::Defeat);
            return;
        }
        if self.roster.is_wiped(Side::Enemy) {
            self.finish(BattleOutcome::Victory);
            return;
        }

        // Entities latched ready on earlier ticks still count.
        let next_ai = self
            .roster
            .iter()
            .find(|e| e.is_alive() && e.is_ready() && !e.behavior.is_player())
            .map(|e| e.id);
        if let Some(actor) = next_ai {
            self.begin_ai_turn(actor);
        }
    }

    /// Applies pending level-ups. Returns true if a player-side level-up
    /// opened the `LevelUp` phase.
    fn settle_level_ups(&mut self) -> bool {
        let mut player_levelled = false;
        for entity in self.roster.iter_mut() {
            if entity.is_dead() {
                continue;
            }
            while let Some(report) = entity.level_up(&mut self.rng) {
                tracing::info!(entity = %entity.id, name = %entity.name, level = report.level, "level up");
                player_levelled |= entity.side == Side::Player;
                self.events.push(BattleEvent::LevelUp {
                    entity: entity.id,
                    report,
                });
            }
        }
        if player_levelled {
            self.set_phase(BattlePhase::LevelUp);
        }
        player_levelled
    }

    fn finish(&mut self, outcome: BattleOutcome) {
        if self.outcome.is_some() {
            return;
        }
        tracing::info!(%outcome, "battle ended");
        self.outcome = Some(outcome);
        self.selection = Selection::default();
        self.queue.clear_active();
        self.events.push(BattleEvent::BattleEnded { outcome });
        self.set_phase(outcome.phase());
    }

    // ========================================================================
    // AI turns
    // ========================================================================

    fn begin_ai_turn(&mut self, actor: EntityId) {
        let Some(entity) = self.roster.get_mut(actor) else {
            return;
        };
        entity.turns_taken += 1;

        let Some(entity) = self.roster.get(actor) else {
            return;
        };
        let Some(decision) = entity.behavior.decide(entity, &self.roster, &mut self.rng) else {
            self.consume_turn(actor);
            return;
        };

        let prepared = self.prepare_decision(actor, decision).or_else(|err| {
            tracing::debug!(entity = %actor, error = %err, "special rejected, attacking instead");
            let projection = ActionResolver::prepare(
                &self.roster,
                &self.board,
                &mut self.rng,
                actor,
                decision.target(),
                None,
            )?;
            Ok::<_, CommandError>((CommandKind::Attack, projection))
        });

        match prepared {
            Ok((kind, projection)) => {
                let summary = summarize(&self.roster, kind, &projection);
                let target = OrderTarget::Entity(decision.target());
                self.selection = Selection {
                    actor: Some(actor),
                    command: Some(kind),
                    ..Selection::default()
                };
                self.propose(
                    PendingOrder {
                        kind,
                        actor,
                        target,
                        payload: OrderPayload::Resolve(projection),
                    },
                    summary,
                    BattlePhase::EnemyProjection,
                );
                self.delay = self.config.enemy_projection_delay;
            }
            Err(err) => {
                tracing::warn!(entity = %actor, error = %err, "no legal action, turn skipped");
                self.consume_turn(actor);
            }
        }
    }

    fn prepare_decision(
        &mut self,
        actor: EntityId,
        decision: Decision,
    ) -> Result<(CommandKind, Projection), CommandError> {
        match decision {
            Decision::Attack { target } => {
                let projection = ActionResolver::prepare(
                    &self.roster,
                    &self.board,
                    &mut self.rng,
                    actor,
                    target,
                    None,
                )?;
                Ok((CommandKind::Attack, projection))
            }
            Decision::Special {
                class,
                index,
                target,
            } => {
                let entity = self
                    .roster
                    .get(actor)
                    .ok_or(CommandError::UnknownEntity(actor))?;
                let special = input::usable_special(entity, class, index)?.clone();
                let target = if special.self_target { actor } else { target };
                let projection = ActionResolver::prepare(
                    &self.roster,
                    &self.board,
                    &mut self.rng,
                    actor,
                    target,
                    Some(&special),
                )?;
                Ok((CommandKind::from_class(class), projection))
            }
        }
    }

    // ========================================================================
    // Projection and queue
    // ========================================================================

    fn propose(&mut self, pending: PendingOrder, summary: ProjectionSummary, phase: BattlePhase) {
        tracing::debug!(
            actor = %summary.actor,
            command = %summary.command,
            description = %summary.description,
            "projection"
        );
        self.events.push(BattleEvent::Projection(summary.clone()));
        self.selection.pending = Some(pending);
        self.selection.summary = Some(summary);
        self.set_phase(phase);
    }

    /// Moves the confirmed projection into the queue and returns to `Normal`.
    fn enqueue_pending(&mut self) -> Option<OrderId> {
        let pending = self.selection.pending.take()?;
        let id = self
            .queue
            .enqueue(pending.kind, pending.actor, pending.target, pending.payload);
        self.events.push(BattleEvent::OrderQueued {
            order: id,
            actor: pending.actor,
            kind: pending.kind,
        });
        self.selection = Selection::default();
        self.set_phase(BattlePhase::Normal);
        Some(id)
    }

    fn start_next_order(&mut self) {
        let Some(order) = self.queue.dequeue() else {
            return;
        };
        tracing::debug!(order = %order.id, actor = %order.actor, kind = %order.kind, "dequeued");

        if !self.roster.get(order.actor).is_some_and(|e| e.is_alive()) {
            self.discard(order);
            return;
        }

        // The turn is consumed only once the order is known to execute.
        match &order.payload {
            OrderPayload::Resolve(projection) => {
                if !self.pay_for(&order, projection) {
                    self.discard(order);
                    return;
                }
            }
            OrderPayload::Item { slot, target } => {
                if !self.item_applies(*slot, *target) {
                    self.discard(order);
                    return;
                }
            }
            _ => {}
        }

        if let Some(entity) = self.roster.get_mut(order.actor) {
            entity.set_defending(false);
        }
        self.consume_turn(order.actor);

        match order.payload.clone() {
            OrderPayload::Resolve(projection) if order.kind == CommandKind::Attack => {
                self.commit_projection(&projection);
                self.delay = self.config.attack_delay;
                self.in_flight = Some(order);
                self.set_phase(BattlePhase::Animating);
            }
            OrderPayload::Resolve(projection) => {
                self.events.push(BattleEvent::AnimationStarted {
                    order: order.id,
                    actor: order.actor,
                    targets: projection.targets().collect(),
                });
                self.in_flight = Some(order);
                self.set_phase(BattlePhase::SpecialAnimating);
            }
            OrderPayload::Item { slot, target } => {
                self.use_item(order.actor, slot, target);
                self.delay = self.config.default_delay;
                self.in_flight = Some(order);
                self.set_phase(BattlePhase::Animating);
            }
            OrderPayload::Move(tile) => {
                if self.board.place(order.actor, tile) {
                    self.events.push(BattleEvent::Moved {
                        entity: order.actor,
                        tile,
                    });
                }
                self.delay = self.config.default_delay;
                self.in_flight = Some(order);
                self.set_phase(BattlePhase::Animating);
            }
            OrderPayload::Flee { chance, success } => {
                tracing::info!(chance, success, "flee attempt");
                self.events.push(BattleEvent::FleeAttempt { chance, success });
                if success {
                    self.finish(BattleOutcome::Fled);
                    return;
                }
                self.delay = self.config.default_delay;
                self.in_flight = Some(order);
                self.set_phase(BattlePhase::Animating);
            }
        }
    }

    /// Pays the HP cost of a spell or starts the recharge of a tech.
    /// Returns false if the caster can no longer afford the spell.
    fn pay_for(&mut self, order: &Order, projection: &Projection) -> bool {
        let Some(special) = projection.special.as_ref() else {
            return true;
        };
        let Some(entity) = self.roster.get_mut(order.actor) else {
            return false;
        };

        match special.class {
            SpecialClass::Spell if special.cost > 0 => {
                if special.cost >= entity.hp() {
                    return false;
                }
                entity.adjust_hp(-special.cost);
            }
            SpecialClass::Tech => entity.add_tech_cooldown(special.cost),
            _ => {}
        }
        true
    }

    /// Whether the item in `slot` is in stock and `target` is still in the
    /// state it was chosen for (dead for revives, alive otherwise).
    fn item_applies(&self, slot: usize, target: EntityId) -> bool {
        let Some(item) = self.inventory.get(slot).filter(|item| item.stock > 0) else {
            return false;
        };
        self.roster
            .get(target)
            .is_some_and(|entity| entity.is_dead() == item.effect.targets_dead())
    }

    fn discard(&mut self, order: Order) {
        tracing::debug!(order = %order.id, actor = %order.actor, "order discarded");
        self.events.push(BattleEvent::OrderDiscarded {
            order: order.id,
            actor: order.actor,
        });
    }

    fn finish_order(&mut self) {
        self.in_flight = None;
        self.queue.clear_active();
        self.roster.compact_indices();
        self.set_phase(BattlePhase::Normal);
    }

    // ========================================================================
    // Effects
    // ========================================================================

    fn consume_turn(&mut self, actor: EntityId) {
        let Some(entity) = self.roster.get_mut(actor) else {
            return;
        };
        for kind in entity.reset_timer() {
            self.events.push(BattleEvent::StatusExpired {
                entity: actor,
                kind,
            });
        }
    }

    fn commit_projection(&mut self, projection: &Projection) {
        let resolutions = ActionResolver::commit(&mut self.roster, projection);
        for resolution in resolutions {
            self.report(projection, resolution);
        }
        self.roster.compact_indices();
    }

    fn report(&mut self, projection: &Projection, resolution: Resolution) {
        self.events.push(BattleEvent::Resolved {
            actor: projection.actor,
            target: resolution.target,
            hp_delta: resolution.hp_delta,
            hit: resolution.hit,
            crit: resolution.crit,
        });

        match resolution.status {
            Some((kind, outcome)) if outcome.is_active() => {
                let turns = self
                    .roster
                    .get(resolution.target)
                    .and_then(|e| e.effects().turns_left(kind))
                    .unwrap_or(0);
                self.events.push(BattleEvent::StatusApplied {
                    entity: resolution.target,
                    kind,
                    turns,
                });
            }
            Some((kind, EffectOutcome::Immune)) => {
                tracing::debug!(entity = %resolution.target, %kind, "immune");
            }
            _ => {}
        }

        if resolution.died {
            tracing::info!(entity = %resolution.target, killer = %projection.actor, "died");
            self.events.push(BattleEvent::EntityDied {
                entity: resolution.target,
            });
        }
        if resolution.revived {
            self.events.push(BattleEvent::EntityRevived {
                entity: resolution.target,
                hp: resolution.hp_delta,
            });
        }
    }

    fn use_item(&mut self, user: EntityId, slot: usize, target: EntityId) {
        let name = self
            .inventory
            .get(slot)
            .map(|item| item.name.clone())
            .unwrap_or_default();
        let Some(effect) = self.inventory.consume(slot) else {
            return;
        };
        let Some(entity) = self.roster.get_mut(target) else {
            return;
        };

        match effect {
            ItemEffect::Heal(amount) => {
                let change = entity.adjust_hp(amount);
                self.events.push(BattleEvent::Resolved {
                    actor: user,
                    target,
                    hp_delta: change.delta(),
                    hit: true,
                    crit: false,
                });
            }
            ItemEffect::Revive => {
                if entity.revive() {
                    let hp = entity.hp();
                    self.events.push(BattleEvent::EntityRevived { entity: target, hp });
                }
            }
        }
        self.events.push(BattleEvent::ItemUsed {
            user,
            target,
            item: name,
        });
        self.roster.compact_indices();
    }

    fn set_phase(&mut self, to: BattlePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        tracing::info!(%from, %to, "phase changed");
        self.phase = to;
        self.events.push(BattleEvent::PhaseChanged { from, to });
    }
}

/// Builds the preview of a resolver projection.
fn summarize(roster: &Roster, command: CommandKind, projection: &Projection) -> ProjectionSummary {
    let targets: Vec<TargetPreview> = projection
        .outcomes
        .iter()
        .map(|outcome| TargetPreview {
            target: outcome.target,
            hit_chance: outcome.hit_chance,
            crit_chance: outcome.crit_chance,
            power: outcome.impact.magnitude(),
        })
        .collect();

    let actor = roster
        .get(projection.actor)
        .map_or_else(|| projection.actor.to_string(), |e| e.name.clone());
    let target = match targets.as_slice() {
        [] => "nobody".to_string(),
        [single] => roster
            .get(single.target)
            .map_or_else(|| single.target.to_string(), |e| e.name.clone()),
        many => format!("{} targets", many.len()),
    };

    let (ability, description) = match &projection.special {
        Some(special) => (
            Some(special.name.clone()),
            format!("{actor} uses {} on {target}", special.name),
        ),
        None => (None, format!("{actor} attacks {target}")),
    };

    ProjectionSummary {
        actor: projection.actor,
        command,
        ability,
        targets,
        description,
    }
}
