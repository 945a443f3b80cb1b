// Copyright 2026 The Production Chain Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Top-level composition: one `Model`, one `Selection`, and the
//! query -> layout -> view pipeline between them.
//!
//! The model is injected at construction and owned here; nothing
//! reaches for ambient state.  Query failures degrade to empty results
//! and a log line, layout failures suppress the view entirely (a
//! partial layout would be misleading), and only initialization
//! failures — which happen before a session exists — are fatal.

use crate::common::{ErrorKind, Result};
use crate::diagram::{ViewModel, build_view};
use crate::fraction::Fraction;
use crate::layout::{LayoutConfig, compute_layout};
use crate::model::Model;
use crate::selection::Selection;

pub struct Session {
    model: Model,
    selection: Selection,
    config: LayoutConfig,
}

/// A rendered view tagged with the selection generation it was
/// computed for.  Consumers must drop snapshots whose generation no
/// longer matches the session (stale in-flight queries are discarded,
/// never merged).
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub generation: u64,
    pub view: ViewModel,
}

impl Session {
    pub fn new(model: Model) -> Session {
        Session::with_config(model, LayoutConfig::default())
    }

    pub fn with_config(model: Model, config: LayoutConfig) -> Session {
        Session {
            model,
            selection: Selection::new(),
            config,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn set_faction(&mut self, faction: Option<String>) {
        self.selection.set_faction(faction);
    }

    pub fn set_product(&mut self, product: Option<String>) -> Result<()> {
        self.selection.set_product(product)
    }

    pub fn set_amount(&mut self, amount: Fraction) {
        self.selection.set_amount(amount);
    }

    pub fn factions(&self) -> Vec<String> {
        self.model.factions()
    }

    /// Products selectable under the current faction.  No faction (or
    /// a query failure, which is a logic defect upstream) yields an
    /// empty list; the menu disables the product control on empty.
    pub fn products(&self) -> Vec<String> {
        let Some(faction) = self.selection.faction() else {
            return Vec::new();
        };
        match self.model.products(faction) {
            Ok(products) => products,
            Err(err) => {
                log::warn!("listing products for '{faction}': {err}");
                Vec::new()
            }
        }
    }

    /// Run the full pipeline for the current selection.  `None` until
    /// both faction and product are chosen, or when the query or
    /// layout fails for the current pair.
    pub fn snapshot(&self) -> Option<Snapshot> {
        let (faction, product) = self.selection.pair()?;
        let generation = self.selection.generation();

        let graph = match self
            .model
            .graph(faction, product, self.selection.effective_amount())
        {
            Ok(graph) => graph,
            Err(err) => {
                log::warn!("fetching graph for '{faction}'/'{product}': {err}");
                return None;
            }
        };

        let view = compute_layout(&graph, &self.config)
            .and_then(|layout| build_view(&graph, &layout, &self.config));
        match view {
            Ok(view) => Some(Snapshot { generation, view }),
            Err(err) => {
                debug_assert_eq!(ErrorKind::Layout, err.kind);
                log::error!("layout for '{faction}'/'{product}': {err}");
                None
            }
        }
    }

    /// Whether a snapshot still matches the current selection.
    pub fn is_current(&self, snapshot: &Snapshot) -> bool {
        snapshot.generation == self.selection.generation()
    }
}
