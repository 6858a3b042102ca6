//! Player input.
//!
//! Each method is legal only in specific phases. A rejected call returns
//! an error and leaves the battle untouched, so a front end that already
//! gates its buttons can ignore the result.
use super::{
    summarize, Battle, BattlePhase, CommandKind, Order, OrderId, OrderPayload, OrderTarget,
    PendingOrder, Selection, TargetRef,
};
use crate::combat::{flee_chance, roll_flee, ActionResolver, Projection};
use crate::env::{RngOracle, TileId};
use crate::error::CommandError;
use crate::events::{BattleEvent, ProjectionSummary, TargetPreview};
use crate::state::{CombatEntity, EntityId, ItemEffect, Special, SpecialClass};

/// Looks up a special the entity can use right now.
pub(super) fn usable_special(
    entity: &CombatEntity,
    class: SpecialClass,
    index: usize,
) -> Result<&Special, CommandError> {
    let special = entity
        .loadout
        .get(class, index)
        .ok_or(CommandError::EmptySlot { class, index })?;

    match class {
        SpecialClass::Tech if entity.tech_timer() > 0 => Err(CommandError::TechRecharging {
            remaining: entity.tech_timer(),
        }),
        SpecialClass::Spell if special.cost >= entity.hp() => Err(CommandError::InsufficientHp {
            cost: special.cost,
            hp: entity.hp(),
        }),
        _ => Ok(special),
    }
}

impl<R: RngOracle> Battle<R> {
    /// Ready entities waiting for a player command.
    pub fn awaiting_input(&self) -> Vec<EntityId> {
        self.roster
            .iter()
            .filter(|e| e.is_alive() && e.is_ready() && e.behavior.is_player())
            .filter(|e| !self.queue.contains_actor(e.id))
            .map(|e| e.id)
            .collect()
    }

    /// Opens the command menu for a ready, player-controlled entity.
    pub fn select_actor(&mut self, actor: EntityId) -> Result<(), CommandError> {
        self.expect_phase("select_actor", BattlePhase::Normal)?;
        let entity = self
            .roster
            .get(actor)
            .ok_or(CommandError::UnknownEntity(actor))?;
        if !entity.behavior.is_player() {
            return Err(CommandError::NotPlayerControlled(actor));
        }
        if entity.is_dead() || !entity.is_ready() || self.queue.contains_actor(actor) {
            return Err(CommandError::NotReady(actor));
        }

        self.selection = Selection {
            actor: Some(actor),
            ..Selection::default()
        };
        self.set_phase(BattlePhase::Commanding);
        Ok(())
    }

    /// Chooses the top-level command for the selected entity.
    ///
    /// `Defend` takes effect immediately and ends the turn. `Flee` goes
    /// straight to its projection.
    pub fn submit_command(&mut self, kind: CommandKind) -> Result<(), CommandError> {
        self.expect_phase("submit_command", BattlePhase::Commanding)?;
        let actor = self.selection.actor.ok_or(CommandError::NoActiveEntity)?;
        let entity = self
            .roster
            .get(actor)
            .ok_or(CommandError::UnknownEntity(actor))?;

        match kind {
            CommandKind::Attack => {
                self.selection.command = Some(kind);
                self.set_phase(BattlePhase::Selection);
            }
            CommandKind::Magic | CommandKind::Tech | CommandKind::Skill => {
                let Some(class) = kind.special_class() else {
                    return Err(CommandError::NoAbilities(actor, kind));
                };
                if entity.loadout.list(class).is_empty() {
                    return Err(CommandError::NoAbilities(actor, kind));
                }
                if class == SpecialClass::Tech && entity.tech_timer() > 0 {
                    return Err(CommandError::TechRecharging {
                        remaining: entity.tech_timer(),
                    });
                }
                self.selection.command = Some(kind);
                self.set_phase(BattlePhase::SpecialSelection);
            }
            CommandKind::Item => {
                if self.inventory.is_exhausted() {
                    return Err(CommandError::EmptyInventory);
                }
                self.selection.command = Some(kind);
                self.set_phase(BattlePhase::SpecialSelection);
            }
            CommandKind::Move => {
                self.selection.command = Some(kind);
                self.set_phase(BattlePhase::TileSelection);
            }
            CommandKind::Defend => self.defend(actor),
            CommandKind::Flee => {
                let chance = flee_chance(&self.roster, entity.side);
                let success = roll_flee(chance, &mut self.rng);
                let summary = ProjectionSummary {
                    actor,
                    command: kind,
                    ability: None,
                    targets: Vec::new(),
                    description: format!("{} tries to flee ({chance}%)", entity.name),
                };
                self.selection.command = Some(kind);
                self.selection.back = BattlePhase::Commanding;
                self.propose(
                    PendingOrder {
                        kind,
                        actor,
                        target: OrderTarget::None,
                        payload: OrderPayload::Flee { chance, success },
                    },
                    summary,
                    BattlePhase::PlayerProjection,
                );
            }
        }
        Ok(())
    }

    fn defend(&mut self, actor: EntityId) {
        if let Some(entity) = self.roster.get_mut(actor) {
            entity.set_defending(false);
            entity.set_defending(true);
        }
        self.events.push(BattleEvent::Defended { entity: actor });
        self.consume_turn(actor);
        self.selection = Selection::default();
        self.set_phase(BattlePhase::Normal);
    }

    /// Picks a slot from the special list (or inventory) of the chosen
    /// command.
    ///
    /// Self-targeting and hit-all specials need no target and go straight
    /// to their projection.
    pub fn select_special(&mut self, index: usize) -> Result<(), CommandError> {
        self.expect_phase("select_special", BattlePhase::SpecialSelection)?;
        let actor = self.selection.actor.ok_or(CommandError::NoActiveEntity)?;
        let command = self.selection.command.ok_or(CommandError::NoActiveEntity)?;

        if command == CommandKind::Item {
            let item = self
                .inventory
                .get(index)
                .ok_or(CommandError::EmptyItemSlot(index))?;
            if item.stock == 0 {
                return Err(CommandError::OutOfStock(index));
            }
            self.selection.item = Some(index);
            self.set_phase(BattlePhase::Selection);
            return Ok(());
        }

        let Some(class) = command.special_class() else {
            return Err(CommandError::invalid_phase("select_special", self.phase));
        };
        let entity = self
            .roster
            .get(actor)
            .ok_or(CommandError::UnknownEntity(actor))?;
        let special = usable_special(entity, class, index)?.clone();

        if special.self_target || special.hit_all {
            let projection = self.prepare_special(actor, actor, &special)?;
            self.selection.special = Some((class, index));
            self.selection.back = BattlePhase::SpecialSelection;
            let summary = summarize(&self.roster, command, &projection);
            self.propose(
                PendingOrder {
                    kind: command,
                    actor,
                    target: OrderTarget::Entity(actor),
                    payload: OrderPayload::Resolve(projection),
                },
                summary,
                BattlePhase::PlayerProjection,
            );
            return Ok(());
        }

        self.selection.special = Some((class, index));
        self.set_phase(BattlePhase::Selection);
        Ok(())
    }

    fn prepare_special(
        &mut self,
        actor: EntityId,
        target: EntityId,
        special: &Special,
    ) -> Result<Projection, CommandError> {
        let projection = ActionResolver::prepare(
            &self.roster,
            &self.board,
            &mut self.rng,
            actor,
            target,
            Some(special),
        )?;
        if projection.outcomes.is_empty() {
            return Err(CommandError::InvalidTarget(target));
        }
        Ok(projection)
    }

    /// Chooses the entity or tile the command acts on and builds its
    /// projection.
    pub fn submit_target(&mut self, target: TargetRef) -> Result<(), CommandError> {
        let actor = self.selection.actor.ok_or(CommandError::NoActiveEntity)?;
        let command = self.selection.command.ok_or(CommandError::NoActiveEntity)?;

        match (self.phase, target) {
            (BattlePhase::Selection, TargetRef::Entity(id)) => {
                self.target_entity(actor, command, id)
            }
            (BattlePhase::TileSelection, TargetRef::Tile(tile)) => self.target_tile(actor, tile),
            _ => Err(CommandError::invalid_phase("submit_target", self.phase)),
        }
    }

    fn target_entity(
        &mut self,
        actor: EntityId,
        command: CommandKind,
        target: EntityId,
    ) -> Result<(), CommandError> {
        if let Some(slot) = self.selection.item {
            return self.target_item(actor, slot, target);
        }

        let projection = match self.selection.special {
            Some((class, index)) => {
                let entity = self
                    .roster
                    .get(actor)
                    .ok_or(CommandError::UnknownEntity(actor))?;
                let special = usable_special(entity, class, index)?.clone();
                self.prepare_special(actor, target, &special)?
            }
            None => ActionResolver::prepare(
                &self.roster,
                &self.board,
                &mut self.rng,
                actor,
                target,
                None,
            )?,
        };

        self.selection.back = BattlePhase::Selection;
        let summary = summarize(&self.roster, command, &projection);
        self.propose(
            PendingOrder {
                kind: command,
                actor,
                target: OrderTarget::Entity(target),
                payload: OrderPayload::Resolve(projection),
            },
            summary,
            BattlePhase::PlayerProjection,
        );
        Ok(())
    }

    fn target_item(
        &mut self,
        actor: EntityId,
        slot: usize,
        target: EntityId,
    ) -> Result<(), CommandError> {
        let item = self
            .inventory
            .get(slot)
            .ok_or(CommandError::EmptyItemSlot(slot))?;
        let user = self
            .roster
            .get(actor)
            .ok_or(CommandError::UnknownEntity(actor))?;
        let entity = self
            .roster
            .get(target)
            .ok_or(CommandError::UnknownEntity(target))?;
        if entity.side != user.side || entity.is_dead() != item.effect.targets_dead() {
            return Err(CommandError::InvalidTarget(target));
        }

        let power = match item.effect {
            ItemEffect::Heal(amount) => amount.min(entity.max_hp() - entity.hp()),
            ItemEffect::Revive => 0,
        };
        let summary = ProjectionSummary {
            actor,
            command: CommandKind::Item,
            ability: Some(item.name.clone()),
            targets: vec![TargetPreview {
                target,
                hit_chance: 100,
                crit_chance: 0,
                power,
            }],
            description: format!("{} uses {} on {}", user.name, item.name, entity.name),
        };

        self.selection.back = BattlePhase::Selection;
        self.propose(
            PendingOrder {
                kind: CommandKind::Item,
                actor,
                target: OrderTarget::Entity(target),
                payload: OrderPayload::Item { slot, target },
            },
            summary,
            BattlePhase::PlayerProjection,
        );
        Ok(())
    }

    fn target_tile(&mut self, actor: EntityId, tile: TileId) -> Result<(), CommandError> {
        if !self.board.is_free(tile) {
            return Err(CommandError::InvalidTile(tile.0));
        }
        let name = self
            .board
            .tile(tile)
            .map(|t| t.name.clone())
            .unwrap_or_default();
        let mover = self
            .roster
            .get(actor)
            .map(|e| e.name.clone())
            .unwrap_or_default();

        let summary = ProjectionSummary {
            actor,
            command: CommandKind::Move,
            ability: None,
            targets: Vec::new(),
            description: format!("{mover} moves to {name}"),
        };
        self.selection.back = BattlePhase::TileSelection;
        self.propose(
            PendingOrder {
                kind: CommandKind::Move,
                actor,
                target: OrderTarget::Tile(tile),
                payload: OrderPayload::Move(tile),
            },
            summary,
            BattlePhase::PlayerProjection,
        );
        Ok(())
    }

    /// Confirms the player projection (queueing its order) or dismisses a
    /// level-up report.
    ///
    /// Returns the id of the queued order, if one was queued.
    pub fn confirm(&mut self) -> Result<Option<OrderId>, CommandError> {
        match self.phase {
            BattlePhase::PlayerProjection => Ok(self.enqueue_pending()),
            BattlePhase::LevelUp => {
                self.set_phase(BattlePhase::Normal);
                Ok(None)
            }
            phase => Err(CommandError::invalid_phase("confirm", phase)),
        }
    }

    /// Steps back one level in the command menus.
    pub fn cancel(&mut self) -> Result<(), CommandError> {
        let back = match self.phase {
            BattlePhase::Commanding => {
                self.selection = Selection::default();
                BattlePhase::Normal
            }
            BattlePhase::SpecialSelection | BattlePhase::TileSelection => {
                self.selection.command = None;
                BattlePhase::Commanding
            }
            BattlePhase::Selection => {
                if self.selection.special.take().is_some() || self.selection.item.take().is_some()
                {
                    BattlePhase::SpecialSelection
                } else {
                    self.selection.command = None;
                    BattlePhase::Commanding
                }
            }
            BattlePhase::PlayerProjection => {
                self.selection.pending = None;
                self.selection.summary = None;
                let back = self.selection.back;
                match back {
                    BattlePhase::Commanding => self.selection.command = None,
                    BattlePhase::SpecialSelection => self.selection.special = None,
                    _ => {}
                }
                back
            }
            phase => return Err(CommandError::invalid_phase("cancel", phase)),
        };
        self.set_phase(back);
        Ok(())
    }

    /// Removes a queued order before it executes.
    pub fn cancel_order(&mut self, id: OrderId) -> Result<Order, CommandError> {
        let order = self
            .queue
            .cancel(id)
            .ok_or(CommandError::UnknownOrder(id.0))?;
        tracing::debug!(order = %order.id, actor = %order.actor, "order cancelled");
        self.events.push(BattleEvent::OrderCancelled {
            order: order.id,
            actor: order.actor,
        });
        Ok(order)
    }

    pub fn pause(&mut self) -> Result<(), CommandError> {
        self.expect_phase("pause", BattlePhase::Normal)?;
        self.set_phase(BattlePhase::Paused);
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), CommandError> {
        self.expect_phase("resume", BattlePhase::Paused)?;
        self.set_phase(BattlePhase::Normal);
        Ok(())
    }

    // ========================================================================
    // Speed
    // ========================================================================

    pub fn speed_up(&mut self) -> f32 {
        self.scheduler.speed_up()
    }

    pub fn slow_down(&mut self) -> f32 {
        self.scheduler.slow_down()
    }

    pub fn set_speed_multiplier(&mut self, value: f32) {
        self.scheduler.set_speed_multiplier(value);
    }

    fn expect_phase(&self, action: &'static str, phase: BattlePhase) -> Result<(), CommandError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(CommandError::invalid_phase(action, self.phase))
        }
    }
}
