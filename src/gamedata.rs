// Copyright 2026 The Production Chain Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The static dataset the solver computes over: factions, their
//! facilities, and the recipes each facility runs.
//!
//! Loaded once from YAML at model initialization and validated before
//! any query can observe it.  BTreeMaps keep recipe requirement and
//! product iteration deterministic, which the layout pipeline relies on.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::common::{Error, ErrorCode, ErrorKind, Result};
use crate::fraction::Fraction;
use crate::init_err;

/// Dataset shipped with the crate, used when no path is given to
/// `Model::initialize`.
pub const EMBEDDED_GAME_DATA: &str = include_str!("../data/game_data.yaml");

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    /// Product name -> amount produced per run.
    pub products: BTreeMap<String, Fraction>,
    /// Resource name -> amount consumed per run.
    #[serde(default)]
    pub requirements: BTreeMap<String, Fraction>,
    /// Hours per run.
    pub time: Fraction,
}

impl Recipe {
    /// Units of `product` produced per hour by one facility running
    /// this recipe, or `None` if the recipe does not yield it.
    pub fn throughput(&self, product: &str) -> Option<Fraction> {
        let amount = *self.products.get(product)?;
        // validation guarantees time > 0
        Some(amount / self.time)
    }

    /// Units of `resource` consumed per hour by one facility running
    /// this recipe.
    pub fn consumption(&self, resource: &str) -> Option<Fraction> {
        let amount = *self.requirements.get(resource)?;
        Some(amount / self.time)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub name: String,
    pub recipes: Vec<Recipe>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Faction {
    pub name: String,
    pub facilities: Vec<Facility>,
}

impl Faction {
    /// All product names some facility of this faction can produce,
    /// sorted and de-duplicated.
    pub fn products(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self
            .facilities
            .iter()
            .flat_map(|f| f.recipes.iter())
            .flat_map(|r| r.products.keys())
            .map(|name| name.as_str())
            .collect();
        names.into_iter().map(|name| name.to_string()).collect()
    }

    /// Facility/recipe pairs able to produce `product`, in dataset
    /// order.  The solver uses the first; later entries are alternate
    /// production options.
    pub fn producers_of(&self, product: &str) -> Vec<(&Facility, &Recipe)> {
        self.facilities
            .iter()
            .flat_map(|facility| {
                facility
                    .recipes
                    .iter()
                    .filter(|recipe| recipe.products.contains_key(product))
                    .map(move |recipe| (facility, recipe))
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameData {
    pub factions: Vec<Faction>,
}

impl GameData {
    pub fn from_yaml(source: &str) -> Result<GameData> {
        let data: GameData = serde_yaml::from_str(source).map_err(|err| {
            Error::new(
                ErrorKind::Init,
                ErrorCode::BadGameData,
                Some(format!("yaml parse: {err}")),
            )
        })?;
        data.validate()?;
        Ok(data)
    }

    pub fn faction(&self, name: &str) -> Option<&Faction> {
        self.factions.iter().find(|f| f.name == name)
    }

    /// Faction names in dataset order.
    pub fn faction_names(&self) -> Vec<String> {
        self.factions.iter().map(|f| f.name.clone()).collect()
    }

    fn validate(&self) -> Result<()> {
        if self.factions.is_empty() {
            return init_err!(BadGameData, "no factions defined".to_string());
        }

        let mut seen_factions = BTreeSet::new();
        for faction in &self.factions {
            if faction.name.trim().is_empty() {
                return init_err!(BadGameData, "faction with empty name".to_string());
            }
            if !seen_factions.insert(faction.name.as_str()) {
                return init_err!(BadGameData, format!("duplicate faction '{}'", faction.name));
            }
            for facility in &faction.facilities {
                if facility.name.trim().is_empty() {
                    return init_err!(
                        BadGameData,
                        format!("facility with empty name in faction '{}'", faction.name)
                    );
                }
                if facility.recipes.is_empty() {
                    return init_err!(
                        BadGameData,
                        format!("facility '{}' has no recipes", facility.name)
                    );
                }
                for recipe in &facility.recipes {
                    validate_recipe(facility, recipe)?;
                }
            }
        }
        Ok(())
    }
}

fn validate_recipe(facility: &Facility, recipe: &Recipe) -> Result<()> {
    let ctx = format!("recipe '{}' of facility '{}'", recipe.name, facility.name);
    if recipe.name.trim().is_empty() {
        return init_err!(
            BadGameData,
            format!("facility '{}' has a recipe with an empty name", facility.name)
        );
    }
    if recipe.products.is_empty() {
        return init_err!(BadGameData, format!("{ctx} produces nothing"));
    }
    if !recipe.time.is_positive() {
        return init_err!(BadGameData, format!("{ctx} has non-positive time"));
    }
    for (product, amount) in &recipe.products {
        if product.trim().is_empty() {
            return init_err!(BadGameData, format!("{ctx} has an unnamed product"));
        }
        if !amount.is_positive() {
            return init_err!(
                BadGameData,
                format!("{ctx} produces a non-positive amount of '{product}'")
            );
        }
    }
    for (resource, amount) in &recipe.requirements {
        if resource.trim().is_empty() {
            return init_err!(BadGameData, format!("{ctx} has an unnamed requirement"));
        }
        if !amount.is_positive() {
            return init_err!(
                BadGameData,
                format!("{ctx} requires a non-positive amount of '{resource}'")
            );
        }
    }
    Ok(())
}
