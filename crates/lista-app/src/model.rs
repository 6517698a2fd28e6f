// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::ids::*;

/// One raw catalog entry as served by the remote endpoint. `name` may be
/// null or absent on the wire; displayability is derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(rename = "listId")]
    pub list_id: ListId,
    #[serde(default)]
    pub name: Option<String>,
}

impl Item {
    pub fn is_displayable(&self) -> bool {
        self.name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty())
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// Filters out items without a usable display name and orders the rest for
/// presentation: list id ascending, then name ascending by plain code-point
/// comparison ("Item 280" sorts before "Item 29"). The sort is stable, so
/// duplicate (list id, name) pairs keep their fetch order.
pub fn prepare_catalog(raw: Vec<Item>) -> Vec<Item> {
    let mut items: Vec<Item> = raw.into_iter().filter(Item::is_displayable).collect();
    items.sort_by(|left, right| {
        left.list_id
            .cmp(&right.list_id)
            .then_with(|| left.display_name().cmp(right.display_name()))
    });
    items
}
