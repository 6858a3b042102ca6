//! Shared party consumables.

/// What an item does to its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemEffect {
    /// Restores a fixed amount of HP to a living target.
    Heal(i32),
    /// Brings a dead target back with a third of its max HP.
    Revive,
}

impl ItemEffect {
    /// Whether the item is meant for dead allies.
    pub fn targets_dead(self) -> bool {
        matches!(self, Self::Revive)
    }
}

/// A stack of one consumable.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub name: String,
    pub effect: ItemEffect,
    pub stock: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
}

impl Item {
    pub fn new(name: impl Into<String>, effect: ItemEffect, stock: u32) -> Self {
        Self {
            name: name.into(),
            effect,
            stock,
            description: String::new(),
        }
    }
}

/// Ordered item stacks, addressed by slot index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Inventory {
    items: Vec<Item>,
}

impl Inventory {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn get(&self, slot: usize) -> Option<&Item> {
        self.items.get(slot)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// True when no slot has stock left.
    pub fn is_exhausted(&self) -> bool {
        self.items.iter().all(|item| item.stock == 0)
    }

    /// Takes one unit from a slot, returning its effect.
    ///
    /// Returns None for an empty slot or a stack without stock.
    pub fn consume(&mut self, slot: usize) -> Option<ItemEffect> {
        let item = self.items.get_mut(slot)?;
        if item.stock == 0 {
            return None;
        }
        item.stock -= 1;
        Some(item.effect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consume_decrements_stock_until_empty() {
        let mut inventory = Inventory::new(vec![Item::new("Tonic", ItemEffect::Heal(15), 1)]);
        assert_eq!(inventory.consume(0), Some(ItemEffect::Heal(15)));
        assert_eq!(inventory.consume(0), None);
        assert!(inventory.is_exhausted());
        assert_eq!(inventory.consume(3), None);
    }
}
