// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use lista_app::{Item, ItemId, ListId};
use lista_fetch::Client;
use lista_tui::{CatalogSource, InternalEvent};
use std::sync::mpsc::Sender;
use std::thread;

/// Catalog source backed by the remote endpoint. `spawn_fetch` runs the GET
/// on its own thread so the event loop keeps drawing while the request is in
/// flight; the browser's single-flight rule means at most one such thread
/// exists at a time.
pub struct HttpCatalog {
    client: Client,
}

impl HttpCatalog {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl CatalogSource for HttpCatalog {
    fn fetch_items(&mut self) -> Result<Vec<Item>> {
        self.client.fetch_items()
    }

    fn spawn_fetch(&mut self, request_id: u64, tx: Sender<InternalEvent>) -> Result<()> {
        let client = self.client.clone();
        thread::spawn(move || {
            let outcome = client.fetch_items().map_err(|error| format!("{error:#}"));
            let _ = tx.send(InternalEvent::FetchCompleted {
                request_id,
                outcome,
            });
        });
        Ok(())
    }
}

/// Offline source for `--demo`: a fixed catalog that arrives unsorted and
/// includes blank and missing names, so the filter and the grouping are both
/// visible without a network.
pub struct DemoCatalog;

impl DemoCatalog {
    fn items() -> Vec<Item> {
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
            item(101, 3, Some("Item 101")),
            item(305, 3, Some("Item 35")),
            item(312, 3, Some("Item 312")),
            item(58, 1, Some("Item 58")),
            item(913, 4, Some("Item 913")),
            item(7, 2, Some("Item 7")),
        ]
    }
}

impl CatalogSource for DemoCatalog {
    fn fetch_items(&mut self) -> Result<Vec<Item>> {
        Ok(Self::items())
    }
}
