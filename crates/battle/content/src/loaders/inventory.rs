//! Item inventory loader.

use std::path::Path;

use battle_core::{Inventory, Item};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Item file structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<Item>,
}

/// Loader for the party inventory from RON files.
pub struct InventoryLoader;

impl InventoryLoader {
    pub fn load(path: &Path) -> LoadResult<Inventory> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Inventory> {
        let catalog: ItemCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;
        Ok(Inventory::new(catalog.items))
    }
}
