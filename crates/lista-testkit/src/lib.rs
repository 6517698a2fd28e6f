// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use lista_app::{Item, ItemId, ListId};

const BLANK_NAMES: [Option<&str>; 3] = [None, Some(""), Some("   ")];

struct SeededRng {
    state: u64,
}

impl SeededRng {
    fn new(seed: u64) -> Self {
        Self {
            state: seed.max(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        // xorshift64*
        let mut value = self.state;
        value ^= value >> 12;
        value ^= value << 25;
        value ^= value >> 27;
        self.state = value;
        value.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    fn int_n(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

/// Deterministic catalog fixtures. The same seed always yields the same
/// items, so assertions can name exact ids and names.
pub struct ItemFactory {
    rng: SeededRng,
    next_id: i64,
    blank_cursor: usize,
}

impl ItemFactory {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SeededRng::new(seed),
            next_id: 1,
            blank_cursor: 0,
        }
    }

    pub fn named_item(&mut self, list_id: i64) -> Item {
        let number = self.rng.int_n(900) + 100;
        self.item(list_id, Some(format!("Item {number}")))
    }

    /// An item the display filter must drop: no name, an empty name, or a
    /// whitespace-only name, rotating through all three shapes.
    pub fn blank_item(&mut self, list_id: i64) -> Item {
        let name = BLANK_NAMES[self.blank_cursor % BLANK_NAMES.len()];
        self.blank_cursor += 1;
        self.item(list_id, name.map(str::to_owned))
    }

    /// A shuffled catalog of `lists` lists with `named_per_list` displayable
    /// items and `blank_per_list` filtered-out items each.
    pub fn catalog(
        &mut self,
        lists: usize,
        named_per_list: usize,
        blank_per_list: usize,
    ) -> Vec<Item> {
        let mut items = Vec::new();
        for list in 1..=lists as i64 {
            for _ in 0..named_per_list {
                items.push(self.named_item(list));
            }
            for _ in 0..blank_per_list {
                items.push(self.blank_item(list));
            }
        }
        self.shuffle(&mut items);
        items
    }

    fn item(&mut self, list_id: i64, name: Option<String>) -> Item {
        let id = self.next_id;
        self.next_id += 1;
        Item {
            id: ItemId::new(id),
            list_id: ListId::new(list_id),
            name,
        }
    }

    fn shuffle(&mut self, items: &mut [Item]) {
        for index in (1..items.len()).rev() {
            let other = self.rng.int_n(index + 1);
            items.swap(index, other);
        }
    }
}

/// A small hand-written catalog covering the interesting shapes: unsorted
/// arrival order, duplicate names within a list, numeric-looking names that
/// expose code-point ordering, and every blank-name variant.
pub fn mixed_catalog() -> Vec<Item> {
    fn item(id: i64, list_id: i64, name: Option<&str>) -> Item {
        Item {
            id: ItemId::new(id),
            list_id: ListId::new(list_id),
            name: name.map(str::to_owned),
        }
    }

    vec![
        item(755, 2, Some("Item 755")),
        item(203, 2, None),
        item(684, 1, Some("Item 684")),
        item(276, 4, Some("Item 280")),
        item(736, 4, Some("Item 29")),
        item(926, 1, Some("")),
        item(808, 1, Some("Item 808")),
        item(599, 2, Some("Item 599")),
        item(424, 2, Some("Item 599")),
        item(444, 4, Some("   ")),
    ]
}

#[cfg(test)]
mod tests {
    use super::{ItemFactory, mixed_catalog};
    use lista_app::prepare_catalog;

    #[test]
    fn same_seed_yields_the_same_catalog() {
        let first = ItemFactory::new(42).catalog(3, 4, 2);
        let second = ItemFactory::new(42).catalog(3, 4, 2);
        assert_eq!(first, second);
    }

    #[test]
    fn catalog_mixes_displayable_and_blank_items() {
        let items = ItemFactory::new(7).catalog(2, 3, 2);
        assert_eq!(items.len(), 10);
        let displayable = items.iter().filter(|item| item.is_displayable()).count();
        assert_eq!(displayable, 6);
    }

    #[test]
    fn blank_items_rotate_through_every_shape() {
        let mut factory = ItemFactory::new(1);
        let blanks: Vec<_> = (0..3).map(|_| factory.blank_item(1).name).collect();
        assert_eq!(
            blanks,
            vec![None, Some(String::new()), Some("   ".to_owned())],
        );
    }

    #[test]
    fn mixed_catalog_survives_the_pipeline_as_expected() {
        let prepared = prepare_catalog(mixed_catalog());
        let names: Vec<&str> = prepared.iter().map(|item| item.display_name()).collect();
        assert_eq!(
            names,
            vec![
                "Item 684",
                "Item 808",
                "Item 599",
                "Item 599",
                "Item 755",
                "Item 280",
                "Item 29",
            ],
        );
    }
}
