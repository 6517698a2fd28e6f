// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;

use crate::ids::ListId;
use crate::model::Item;

/// One line of the presentation sequence: either a list header or an entry
/// belonging to an expanded list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    ListHeader { list_id: ListId, member_count: usize },
    Entry(Item),
}

impl Row {
    pub const fn list_id(&self) -> ListId {
        match self {
            Self::ListHeader { list_id, .. } => *list_id,
            Self::Entry(item) => item.list_id,
        }
    }

    pub const fn is_header(&self) -> bool {
        matches!(self, Self::ListHeader { .. })
    }
}

/// Builds the presentation sequence from an already filtered and sorted
/// catalog. The input is grouped into contiguous runs in one pass: a new list
/// starts whenever the list id changes. Each run emits one header carrying
/// the full member count, then its entries only if the list is expanded.
pub fn build_rows(items: &[Item], expanded: &BTreeSet<ListId>) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut start = 0;
    while start < items.len() {
        let list_id = items[start].list_id;
        let mut end = start;
        while end < items.len() && items[end].list_id == list_id {
            end += 1;
        }

        rows.push(Row::ListHeader {
            list_id,
            member_count: end - start,
        });
        if expanded.contains(&list_id) {
            rows.extend(items[start..end].iter().cloned().map(Row::Entry));
        }
        start = end;
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::{Row, build_rows};
    use crate::ids::{ItemId, ListId};
    use crate::model::{Item, prepare_catalog};
    use std::collections::BTreeSet;

    fn item(id: i64, list_id: i64, name: &str) -> Item {
        Item {
            id: ItemId::new(id),
            list_id: ListId::new(list_id),
            name: Some(name.to_owned()),
        }
    }

    fn expanded(keys: &[i64]) -> BTreeSet<ListId> {
        keys.iter().copied().map(ListId::new).collect()
    }

    #[test]
    fn empty_catalog_produces_no_rows() {
        assert!(build_rows(&[], &expanded(&[1, 2])).is_empty());
    }

    #[test]
    fn collapsed_lists_emit_only_headers() {
        let items = vec![
            item(3, 1, "Item 1"),
            item(2, 1, "Item 3"),
            item(4, 2, "Item 1"),
            item(1, 2, "Item 2"),
        ];
        let rows = build_rows(&items, &BTreeSet::new());
        assert_eq!(
            rows,
            vec![
                Row::ListHeader {
                    list_id: ListId::new(1),
                    member_count: 2,
                },
                Row::ListHeader {
                    list_id: ListId::new(2),
                    member_count: 2,
                },
            ],
        );
    }

    #[test]
    fn expanded_list_emits_entries_after_its_header() {
        let items = vec![
            item(3, 1, "Item 1"),
            item(2, 1, "Item 3"),
            item(4, 2, "Item 1"),
            item(1, 2, "Item 2"),
        ];
        let rows = build_rows(&items, &expanded(&[1]));
        assert_eq!(
            rows,
            vec![
                Row::ListHeader {
                    list_id: ListId::new(1),
                    member_count: 2,
                },
                Row::Entry(item(3, 1, "Item 1")),
                Row::Entry(item(2, 1, "Item 3")),
                Row::ListHeader {
                    list_id: ListId::new(2),
                    member_count: 2,
                },
            ],
        );
    }

    #[test]
    fn header_counts_ignore_expansion_state() {
        let items = vec![item(1, 7, "Item 1"), item(2, 7, "Item 2")];
        let collapsed = build_rows(&items, &BTreeSet::new());
        let open = build_rows(&items, &expanded(&[7]));
        assert_eq!(collapsed[0], open[0]);
        assert_eq!(
            collapsed[0],
            Row::ListHeader {
                list_id: ListId::new(7),
                member_count: 2,
            },
        );
    }

    #[test]
    fn fully_filtered_list_emits_no_header() {
        let raw = vec![
            Item {
                id: ItemId::new(1),
                list_id: ListId::new(1),
                name: Some("Item 1".to_owned()),
            },
            Item {
                id: ItemId::new(2),
                list_id: ListId::new(2),
                name: None,
            },
            Item {
                id: ItemId::new(3),
                list_id: ListId::new(2),
                name: Some("  ".to_owned()),
            },
        ];
        let rows = build_rows(&prepare_catalog(raw), &expanded(&[1, 2]));
        assert_eq!(
            rows,
            vec![
                Row::ListHeader {
                    list_id: ListId::new(1),
                    member_count: 1,
                },
                Row::Entry(item(1, 1, "Item 1")),
            ],
        );
    }

    #[test]
    fn expansion_keys_without_a_list_are_harmless() {
        let items = vec![item(1, 1, "Item 1")];
        let rows = build_rows(&items, &expanded(&[1, 99]));
        assert_eq!(rows.len(), 2);
        assert!(rows[0].is_header());
    }

    #[test]
    fn row_list_id_resolves_for_both_variants() {
        let header = Row::ListHeader {
            list_id: ListId::new(3),
            member_count: 1,
        };
        let entry = Row::Entry(item(1, 3, "Item 1"));
        assert_eq!(header.list_id(), ListId::new(3));
        assert_eq!(entry.list_id(), ListId::new(3));
    }
}
