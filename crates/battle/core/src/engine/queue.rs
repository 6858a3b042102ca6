//! FIFO of confirmed actions.
use std::collections::VecDeque;
use std::fmt;

use crate::combat::Projection;
use crate::env::TileId;
use crate::state::{EntityId, SpecialClass};

/// Top-level command a ready entity can issue.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CommandKind {
    Attack,
    Magic,
    Tech,
    Skill,
    Item,
    Defend,
    Move,
    Flee,
}

impl CommandKind {
    /// Special class a command draws from, if any.
    pub fn special_class(self) -> Option<SpecialClass> {
        match self {
            Self::Magic => Some(SpecialClass::Spell),
            Self::Tech => Some(SpecialClass::Tech),
            Self::Skill => Some(SpecialClass::Skill),
            _ => None,
        }
    }

    pub fn from_class(class: SpecialClass) -> Self {
        match class {
            SpecialClass::Spell => Self::Magic,
            SpecialClass::Tech => Self::Tech,
            SpecialClass::Skill => Self::Skill,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderId(pub u64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order-{}", self.0)
    }
}

/// Input-side target reference: an entity or a board tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetRef {
    Entity(EntityId),
    Tile(TileId),
}

/// What an order acts on, kept for highlighting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrderTarget {
    None,
    Entity(EntityId),
    Tile(TileId),
}

impl From<TargetRef> for OrderTarget {
    fn from(target: TargetRef) -> Self {
        match target {
            TargetRef::Entity(id) => Self::Entity(id),
            TargetRef::Tile(tile) => Self::Tile(tile),
        }
    }
}

/// Prepared effect carried by an order until it executes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrderPayload {
    /// Attack or special with its rolls already made.
    Resolve(Projection),
    Item { slot: usize, target: EntityId },
    Move(TileId),
    /// Flee attempt rolled when it was projected.
    Flee { chance: i32, success: bool },
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Order {
    pub id: OrderId,
    pub kind: CommandKind,
    pub actor: EntityId,
    pub target: OrderTarget,
    pub payload: OrderPayload,
}

/// Strict FIFO of confirmed orders.
///
/// Orders execute in the order they were enqueued. A queued order can be
/// cancelled until it is dequeued; once it starts animating it can't.
#[derive(Clone, Debug, Default)]
pub struct OrderQueue {
    orders: VecDeque<Order>,
    next_id: u64,
    active: Option<(EntityId, OrderTarget)>,
}

impl OrderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an order and records its actor and target as active.
    pub fn enqueue(
        &mut self,
        kind: CommandKind,
        actor: EntityId,
        target: OrderTarget,
        payload: OrderPayload,
    ) -> OrderId {
        let id = OrderId(self.next_id);
        self.next_id += 1;
        self.orders.push_back(Order {
            id,
            kind,
            actor,
            target,
            payload,
        });
        self.active = Some((actor, target));
        id
    }

    pub fn dequeue(&mut self) -> Option<Order> {
        let order = self.orders.pop_front()?;
        self.active = Some((order.actor, order.target));
        Some(order)
    }

    /// Removes a queued order without executing it.
    pub fn cancel(&mut self, id: OrderId) -> Option<Order> {
        let position = self.orders.iter().position(|order| order.id == id)?;
        self.orders.remove(position)
    }

    pub fn contains_actor(&self, actor: EntityId) -> bool {
        self.orders.iter().any(|order| order.actor == actor)
    }

    /// Actor and target of the most recently queued or dequeued order.
    pub fn active(&self) -> Option<(EntityId, OrderTarget)> {
        self.active
    }

    pub fn clear_active(&mut self) {
        self.active = None;
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flee() -> OrderPayload {
        OrderPayload::Flee {
            chance: 50,
            success: false,
        }
    }

    #[test]
    fn orders_come_out_in_enqueue_order() {
        let mut queue = OrderQueue::new();
        let first = queue.enqueue(CommandKind::Flee, EntityId(0), OrderTarget::None, flee());
        let second = queue.enqueue(CommandKind::Flee, EntityId(1), OrderTarget::None, flee());

        assert_eq!(queue.active(), Some((EntityId(1), OrderTarget::None)));
        assert_eq!(queue.dequeue().map(|o| o.id), Some(first));
        assert_eq!(queue.dequeue().map(|o| o.id), Some(second));
        assert!(queue.dequeue().is_none());
    }

    #[test]
    fn cancelling_the_middle_order_keeps_the_rest() {
        let mut queue = OrderQueue::new();
        let ids: Vec<_> = (0..3)
            .map(|i| queue.enqueue(CommandKind::Flee, EntityId(i), OrderTarget::None, flee()))
            .collect();

        let cancelled = queue.cancel(ids[1]).expect("queued");
        assert_eq!(cancelled.actor, EntityId(1));
        assert!(queue.cancel(ids[1]).is_none());
        assert!(!queue.contains_actor(EntityId(1)));

        let remaining: Vec<_> = queue.iter().map(|o| o.id).collect();
        assert_eq!(remaining, vec![ids[0], ids[2]]);
    }

    #[test]
    fn commands_map_to_special_classes() {
        assert_eq!(CommandKind::Magic.special_class(), Some(SpecialClass::Spell));
        assert_eq!(CommandKind::Attack.special_class(), None);
        assert_eq!(CommandKind::from_class(SpecialClass::Tech), CommandKind::Tech);
        assert_eq!(CommandKind::Defend.to_string(), "defend");
    }
}
