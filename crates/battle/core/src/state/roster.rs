//! Both parties of a battle.
//!
//! Entities live in a single arena indexed by [`EntityId`]; a party is the
//! filtered view of one [`Side`]. Queries return members in spawn order and
//! never reorder them, so "the second living enemy" stays stable while
//! others die around it.

use super::{CombatEntity, EntityId, EntityTemplate, EntityType, Side};
use crate::env::RngOracle;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Roster {
    entities: Vec<CombatEntity>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a combatant built from a template and returns its id.
    pub fn spawn(&mut self, side: Side, template: &EntityTemplate) -> EntityId {
        let id = EntityId(self.entities.len() as u32);
        self.entities
            .push(CombatEntity::from_template(id, side, template));
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&CombatEntity> {
        self.entities.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut CombatEntity> {
        self.entities.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CombatEntity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut CombatEntity> {
        self.entities.iter_mut()
    }

    /// Every member of a side, dead or alive.
    pub fn members(&self, side: Side) -> impl Iterator<Item = &CombatEntity> {
        self.entities.iter().filter(move |e| e.side == side)
    }

    /// Living members of a side, in spawn order.
    pub fn living(&self, side: Side) -> impl Iterator<Item = &CombatEntity> {
        self.members(side).filter(|e| e.is_alive())
    }

    pub fn living_ids(&self, side: Side) -> Vec<EntityId> {
        self.living(side).map(|e| e.id).collect()
    }

    /// True when no member of the side is left standing.
    pub fn is_wiped(&self, side: Side) -> bool {
        self.living(side).next().is_none()
    }

    /// A uniformly chosen living member of a side.
    pub fn random_living<R: RngOracle + ?Sized>(&self, side: Side, rng: &mut R) -> Option<EntityId> {
        let living = self.living_ids(side);
        if living.is_empty() {
            return None;
        }
        let pick = rng.range(0, living.len() as u32 - 1) as usize;
        living.get(pick).copied()
    }

    /// The living member with the lowest HP, skipping `excluding`.
    ///
    /// Ties resolve to the earliest member.
    pub fn lowest_hp(&self, side: Side, excluding: Option<EntityId>) -> Option<EntityId> {
        self.living(side)
            .filter(|e| Some(e.id) != excluding)
            .min_by_key(|e| e.hp())
            .map(|e| e.id)
    }

    /// Living members that carry every flag of `kind`.
    pub fn of_type(&self, side: Side, kind: EntityType) -> Vec<EntityId> {
        self.living(side)
            .filter(|e| e.kind.contains(kind))
            .map(|e| e.id)
            .collect()
    }

    /// Living member at a party index.
    pub fn by_index(&self, side: Side, index: usize) -> Option<EntityId> {
        self.living(side)
            .find(|e| e.index == Some(index))
            .map(|e| e.id)
    }

    /// Renumbers party indices: living members get `0..n` in spawn order,
    /// dead members lose their index.
    pub fn compact_indices(&mut self) {
        for side in [Side::Player, Side::Enemy] {
            let mut next = 0;
            for entity in self.entities.iter_mut().filter(|e| e.side == side) {
                if entity.is_alive() {
                    entity.index = Some(next);
                    next += 1;
                } else {
                    entity.index = None;
                }
            }
        }
    }

    /// Sum of the levels of a side's living members.
    pub fn level_sum(&self, side: Side) -> i32 {
        self.living(side).map(|e| e.level as i32).sum()
    }
}
