// Copyright 2026 The Production Chain Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The query surface over a loaded dataset.
//!
//! `Model::initialize` is the application's single suspension point:
//! it loads and validates game data once, and failure is fatal (no
//! retry path).  Every accessor after that is synchronous and side
//! effect free.

use std::path::PathBuf;

use crate::chain::compute_chain_for_product;
use crate::common::{Error, ErrorCode, ErrorKind, Result};
use crate::dot;
use crate::fraction::Fraction;
use crate::gamedata::{EMBEDDED_GAME_DATA, Faction, GameData};
use crate::graph::ProductionGraph;
use crate::selection::effective_amount;

/// Where `Model::initialize` reads its dataset from.
#[derive(Clone, Debug, PartialEq)]
pub enum GameDataSource {
    /// The dataset compiled into the crate.
    Embedded,
    Path(PathBuf),
    Inline(String),
}

#[derive(Debug)]
pub struct Model {
    data: GameData,
}

impl Model {
    /// Load and validate the dataset.  This is the one load effect of
    /// the application; errors here are `ErrorKind::Init` and fatal.
    pub async fn initialize(source: GameDataSource) -> Result<Model> {
        let raw = match source {
            GameDataSource::Embedded => EMBEDDED_GAME_DATA.to_string(),
            GameDataSource::Inline(yaml) => yaml,
            GameDataSource::Path(path) => std::fs::read_to_string(&path).map_err(|err| {
                Error::new(
                    ErrorKind::Init,
                    ErrorCode::BadGameData,
                    Some(format!("reading {}: {err}", path.display())),
                )
            })?,
        };
        let data = GameData::from_yaml(&raw)?;
        Ok(Model { data })
    }

    /// Faction names in dataset order.  Never empty for a validated
    /// dataset.
    pub fn factions(&self) -> Vec<String> {
        self.data.faction_names()
    }

    /// Sorted end products of `faction`.  Unknown factions are a
    /// caller bug and surface as `does_not_exist`; a faction with no
    /// products legitimately yields an empty vec.
    pub fn products(&self, faction: &str) -> Result<Vec<String>> {
        let faction = self.faction(faction, ErrorCode::DoesNotExist)?;
        Ok(faction.products())
    }

    /// Compute the production graph for one faction/product pair.
    /// `amount` is the number of facilities producing the end product;
    /// non-positive amounts are consumed as 1.
    pub fn graph(&self, faction: &str, product: &str, amount: Fraction) -> Result<ProductionGraph> {
        let faction = self.faction(faction, ErrorCode::InvalidSelection)?;
        let chain = compute_chain_for_product(faction, product, effective_amount(amount))?;
        ProductionGraph::from_chain(&chain)
    }

    /// Legacy DOT-language rendering of the same chain.  The
    /// structured [`Model::graph`] path is authoritative; this exists
    /// for the old graphviz render path.
    pub fn dot_graph(&self, faction: &str, product: &str, amount: Fraction) -> Result<String> {
        let faction = self.faction(faction, ErrorCode::InvalidSelection)?;
        let chain = compute_chain_for_product(faction, product, effective_amount(amount))?;
        Ok(dot::render_dot(&chain))
    }

    fn faction(&self, name: &str, code: ErrorCode) -> Result<&Faction> {
        match self.data.faction(name) {
            Some(faction) => Ok(faction),
            None => Err(Error::new(
                ErrorKind::Query,
                code,
                Some(format!("unknown faction '{name}'")),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn model() -> Model {
        Model::initialize(GameDataSource::Embedded).await.unwrap()
    }

    #[tokio::test]
    async fn test_initialize_embedded() {
        let model = model().await;
        assert_eq!(vec!["Folktails", "IronTeeth"], model.factions());
    }

    #[tokio::test]
    async fn test_initialize_bad_path_is_fatal() {
        let err = Model::initialize(GameDataSource::Path("/nonexistent/data.yaml".into()))
            .await
            .unwrap_err();
        assert_eq!(ErrorKind::Init, err.kind);
        assert_eq!(ErrorCode::BadGameData, err.code);
    }

    #[tokio::test]
    async fn test_initialize_invalid_yaml_is_fatal() {
        let err = Model::initialize(GameDataSource::Inline("factions: 12".to_string()))
            .await
            .unwrap_err();
        assert_eq!(ErrorKind::Init, err.kind);
    }

    #[tokio::test]
    async fn test_products_for_unknown_faction() {
        let model = model().await;
        let err = model.products("Cogs").unwrap_err();
        assert_eq!(ErrorCode::DoesNotExist, err.code);
    }

    #[tokio::test]
    async fn test_products_sorted() {
        let model = model().await;
        let products = model.products("Folktails").unwrap();
        let mut sorted = products.clone();
        sorted.sort();
        assert_eq!(sorted, products);
        assert!(products.contains(&"Bread".to_string()));
    }

    #[tokio::test]
    async fn test_graph_invalid_selection() {
        let model = model().await;
        let err = model
            .graph("Cogs", "Plank", Fraction::ONE)
            .unwrap_err();
        assert_eq!(ErrorCode::InvalidSelection, err.code);

        let err = model
            .graph("IronTeeth", "Bread", Fraction::ONE)
            .unwrap_err();
        assert_eq!(ErrorCode::InvalidSelection, err.code);
    }

    #[tokio::test]
    async fn test_amount_clamped_at_consumption() {
        let model = model().await;
        let negative = model
            .graph("IronTeeth", "Plank", Fraction::from_integer(-4))
            .unwrap();
        let default = model.graph("IronTeeth", "Plank", Fraction::ONE).unwrap();
        assert_eq!(default, negative);

        let three = model
            .graph("IronTeeth", "Plank", Fraction::from_integer(3))
            .unwrap();
        assert_eq!(
            Fraction::from_integer(3),
            three.nodes[0].number_facilities
        );
    }

    #[tokio::test]
    async fn test_dot_graph_renders() {
        let model = model().await;
        let dot = model
            .dot_graph("IronTeeth", "Plank", Fraction::ONE)
            .unwrap();
        assert!(dot.starts_with("digraph {"));
        assert!(dot.contains("Plank Factory"));
    }
}
