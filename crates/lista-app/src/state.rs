// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeSet;

use time::OffsetDateTime;

use crate::ids::ListId;
use crate::model::{Item, prepare_catalog};
use crate::rows::{Row, build_rows};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchPhase {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// What happens to the last fetched catalog when a later fetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StalePolicy {
    KeepLastCatalog,
    ClearCatalog,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserCommand {
    RequestFetch,
    FetchSucceeded {
        items: Vec<Item>,
        received_at: OffsetDateTime,
    },
    FetchFailed(String),
    ToggleList(ListId),
    CollapseAll,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserEvent {
    FetchStarted,
    FetchIgnored,
    CatalogReplaced { fetched: usize, shown: usize },
    FetchRejected(String),
    ListExpanded(ListId),
    ListCollapsed(ListId),
    ExpansionCleared,
}

/// Single owner of all browsing state. Every mutation flows through
/// `dispatch`, and the row sequence is fully rebuilt before `dispatch`
/// returns, so readers never observe rows inconsistent with the phase or the
/// expansion set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogBrowser {
    phase: FetchPhase,
    stale_policy: StalePolicy,
    items: Vec<Item>,
    fetched_total: usize,
    fetched_at: Option<OffsetDateTime>,
    expanded: BTreeSet<ListId>,
    rows: Vec<Row>,
}

impl CatalogBrowser {
    pub fn new(stale_policy: StalePolicy) -> Self {
        Self {
            phase: FetchPhase::Idle,
            stale_policy,
            items: Vec::new(),
            fetched_total: 0,
            fetched_at: None,
            expanded: BTreeSet::new(),
            rows: Vec::new(),
        }
    }

    pub fn phase(&self) -> &FetchPhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == FetchPhase::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            FetchPhase::Failed(description) => Some(description),
            _ => None,
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn expanded(&self) -> &BTreeSet<ListId> {
        &self.expanded
    }

    /// Count of items in the last fetch before filtering.
    pub fn fetched_total(&self) -> usize {
        self.fetched_total
    }

    /// Count of items that survived filtering and can be shown.
    pub fn shown_total(&self) -> usize {
        self.items.len()
    }

    pub fn fetched_at(&self) -> Option<OffsetDateTime> {
        self.fetched_at
    }

    pub fn dispatch(&mut self, command: BrowserCommand) -> Vec<BrowserEvent> {
        match command {
            BrowserCommand::RequestFetch => {
                if self.phase == FetchPhase::Loading {
                    return vec![BrowserEvent::FetchIgnored];
                }
                self.phase = FetchPhase::Loading;
                vec![BrowserEvent::FetchStarted]
            }
            BrowserCommand::FetchSucceeded { items, received_at } => {
                if self.phase != FetchPhase::Loading {
                    return vec![BrowserEvent::FetchIgnored];
                }
                self.fetched_total = items.len();
                self.items = prepare_catalog(items);
                self.fetched_at = Some(received_at);
                self.phase = FetchPhase::Loaded;
                self.rebuild_rows();
                vec![BrowserEvent::CatalogReplaced {
                    fetched: self.fetched_total,
                    shown: self.items.len(),
                }]
            }
            BrowserCommand::FetchFailed(description) => {
                if self.phase != FetchPhase::Loading {
                    return vec![BrowserEvent::FetchIgnored];
                }
                if self.stale_policy == StalePolicy::ClearCatalog {
                    self.items.clear();
                    self.fetched_total = 0;
                    self.fetched_at = None;
                }
                self.phase = FetchPhase::Failed(description.clone());
                self.rebuild_rows();
                vec![BrowserEvent::FetchRejected(description)]
            }
            BrowserCommand::ToggleList(list_id) => {
                let event = if self.expanded.remove(&list_id) {
                    BrowserEvent::ListCollapsed(list_id)
                } else {
                    self.expanded.insert(list_id);
                    BrowserEvent::ListExpanded(list_id)
                };
                self.rebuild_rows();
                vec![event]
            }
            BrowserCommand::CollapseAll => {
                self.expanded.clear();
                self.rebuild_rows();
                vec![BrowserEvent::ExpansionCleared]
            }
        }
    }

    fn rebuild_rows(&mut self) {
        self.rows = build_rows(&self.items, &self.expanded);
    }
}
