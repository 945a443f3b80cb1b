// Copyright 2026 The Production Chain Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Recipe resolution and facility-count arithmetic.
//!
//! A production chain is a tree rooted at the requested product: each
//! node pins a facility/recipe pair and the exact number of facilities
//! needed to sustain the parent's demand.  Resources with no producer
//! in the faction stay as raw inputs (ports without a subtree).

use std::collections::BTreeMap;

use crate::common::Result;
use crate::fraction::Fraction;
use crate::gamedata::{Faction, Recipe};
use crate::query_err;

#[derive(Clone, Debug, PartialEq)]
pub struct ProductionChain {
    pub facility_name: String,
    pub recipe: Recipe,
    pub number_facilities: Fraction,
    /// Resource name -> the chain producing it.  Only resources with a
    /// producer in the faction appear here; raw resources are ports on
    /// the recipe with no subtree.
    pub inputs: BTreeMap<String, ProductionChain>,
}

/// Compute the chain needed to run `number_facilities` producers of
/// `product` at full utilization.
pub fn compute_chain_for_product(
    faction: &Faction,
    product: &str,
    number_facilities: Fraction,
) -> Result<ProductionChain> {
    let producers = faction.producers_of(product);
    let Some(&(facility, recipe)) = producers.first() else {
        return query_err!(
            InvalidSelection,
            format!("no producer of '{product}' in faction '{}'", faction.name)
        );
    };
    // throughput is Some by producers_of construction
    let throughput = recipe
        .throughput(product)
        .unwrap_or(Fraction::ZERO);
    let target_per_hour = throughput.checked_mul(number_facilities)?;

    let mut visiting = Vec::new();
    compute_chain(
        faction,
        &facility.name,
        recipe,
        product,
        target_per_hour,
        &mut visiting,
    )
}

fn compute_chain(
    faction: &Faction,
    facility_name: &str,
    recipe: &Recipe,
    product: &str,
    target_per_hour: Fraction,
    visiting: &mut Vec<String>,
) -> Result<ProductionChain> {
    if visiting.iter().any(|p| p == product) {
        return query_err!(
            CircularDependency,
            format!("'{product}' transitively requires itself")
        );
    }
    visiting.push(product.to_string());

    let throughput = recipe.throughput(product).unwrap_or(Fraction::ZERO);
    let number_facilities = target_per_hour.checked_div(throughput)?;

    let mut inputs = BTreeMap::new();
    for (resource, required_amount) in &recipe.requirements {
        let producers = faction.producers_of(resource);
        let Some(&(child_facility, child_recipe)) = producers.first() else {
            // raw resource: a port, but no subtree
            continue;
        };
        let child_target = number_facilities
            .checked_mul(*required_amount)?
            .checked_div(recipe.time)?;
        let child = compute_chain(
            faction,
            &child_facility.name,
            child_recipe,
            resource,
            child_target,
            visiting,
        )?;
        inputs.insert(resource.clone(), child);
    }

    visiting.pop();

    Ok(ProductionChain {
        facility_name: facility_name.to_string(),
        recipe: recipe.clone(),
        number_facilities,
        inputs,
    })
}

impl ProductionChain {
    /// Total facility count per facility name, summed across the tree.
    pub fn totals(&self) -> BTreeMap<String, Fraction> {
        let mut totals = BTreeMap::new();
        self.add_totals(&mut totals);
        totals
    }

    fn add_totals(&self, totals: &mut BTreeMap<String, Fraction>) {
        let entry = totals
            .entry(self.facility_name.clone())
            .or_insert(Fraction::ZERO);
        *entry = *entry + self.number_facilities;
        for child in self.inputs.values() {
            child.add_totals(totals);
        }
    }

    /// Indented tree rendering for debugging and logs.
    pub fn str_tree(&self) -> String {
        let mut out = String::new();
        self.write_tree(&mut out, 0);
        out
    }

    fn write_tree(&self, out: &mut String, depth: usize) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        out.push_str(&format!(
            "{} x {}\n",
            self.facility_name, self.number_facilities
        ));
        for child in self.inputs.values() {
            child.write_tree(out, depth + 1);
        }
    }

    pub fn node_count(&self) -> usize {
        1 + self
            .inputs
            .values()
            .map(ProductionChain::node_count)
            .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ErrorCode;
    use crate::gamedata::{EMBEDDED_GAME_DATA, GameData};

    fn frac(num: i64, den: i64) -> Fraction {
        Fraction::new(num, den).unwrap()
    }

    fn iron_teeth() -> Faction {
        GameData::from_yaml(EMBEDDED_GAME_DATA)
            .unwrap()
            .faction("IronTeeth")
            .unwrap()
            .clone()
    }

    #[test]
    fn test_plank_chain_counts() {
        let faction = iron_teeth();
        let chain = compute_chain_for_product(&faction, "Plank", Fraction::ONE).unwrap();

        assert_eq!("Plank Factory", chain.facility_name);
        assert_eq!(Fraction::ONE, chain.number_facilities);
        assert_eq!(3, chain.node_count());

        // 1 Plank Factory consumes 1/2 Treated Log per hour; the Wood
        // Workshop produces 1 per hour, so half a workshop suffices.
        let workshop = &chain.inputs["Treated Log"];
        assert_eq!("Wood Workshop", workshop.facility_name);
        assert_eq!(frac(1, 2), workshop.number_facilities);

        // 1/2 workshop consumes 1/2 Log per hour; a Logging Camp yields
        // 3/2 per hour, so a third of a camp.
        let camp = &workshop.inputs["Log"];
        assert_eq!("Logging Camp", camp.facility_name);
        assert_eq!(frac(1, 3), camp.number_facilities);
    }

    #[test]
    fn test_amount_scales_linearly() {
        let faction = iron_teeth();
        let chain = compute_chain_for_product(&faction, "Plank", Fraction::from_integer(3)).unwrap();
        assert_eq!(Fraction::from_integer(3), chain.number_facilities);
        assert_eq!(
            frac(3, 2),
            chain.inputs["Treated Log"].number_facilities
        );
    }

    #[test]
    fn test_raw_resources_have_no_subtree() {
        let faction = iron_teeth();
        let chain = compute_chain_for_product(&faction, "Steel", Fraction::ONE).unwrap();
        // Scrap Metal has no producer; Log does
        assert!(!chain.inputs.contains_key("Scrap Metal"));
        assert!(chain.inputs.contains_key("Log"));
        assert!(chain.recipe.requirements.contains_key("Scrap Metal"));
    }

    #[test]
    fn test_totals_aggregate_shared_facilities() {
        let faction = iron_teeth();
        let chain = compute_chain_for_product(&faction, "Bot", Fraction::ONE).unwrap();
        let totals = chain.totals();

        // Logging Camp appears under both the Wood Workshop and the
        // Smelter subtrees and must be summed.
        assert!(totals.contains_key("Logging Camp"));
        assert_eq!(Fraction::ONE, totals["Bot Assembler"]);
        let tree = chain.str_tree();
        assert!(tree.starts_with("Bot Assembler x 1\n"));
        assert!(tree.contains("  Smelter x"));
    }

    #[test]
    fn test_unknown_product_rejected() {
        let faction = iron_teeth();
        let err = compute_chain_for_product(&faction, "Gears", Fraction::ONE).unwrap_err();
        assert_eq!(ErrorCode::InvalidSelection, err.code);
    }

    #[test]
    fn test_overflowing_counts_surface_as_error() {
        // each level multiplies the facility count by 10^9, so three
        // levels exceed i64 even though the dataset validates cleanly
        let yaml = r#"
factions:
  - name: Big
    facilities:
      - name: A
        recipes:
          - name: MakeX
            products:
              X: 1
            requirements:
              Y: 1000000000
            time: 1
      - name: B
        recipes:
          - name: MakeY
            products:
              Y: 1
            requirements:
              Z: 1000000000
            time: 1
      - name: C
        recipes:
          - name: MakeZ
            products:
              Z: 1
            requirements:
              W: 1000000000
            time: 1
      - name: D
        recipes:
          - name: MakeW
            products:
              W: 1
            time: 1
"#;
        let data = GameData::from_yaml(yaml).unwrap();
        let faction = data.faction("Big").unwrap();
        let err = compute_chain_for_product(faction, "X", Fraction::ONE).unwrap_err();
        assert_eq!(ErrorCode::BadFraction, err.code);
    }

    #[test]
    fn test_cyclic_recipes_detected() {
        let yaml = r#"
factions:
  - name: Loop
    facilities:
      - name: A
        recipes:
          - name: MakeX
            products:
              X: 1
            requirements:
              Y: 1
            time: 1
      - name: B
        recipes:
          - name: MakeY
            products:
              Y: 1
            requirements:
              X: 1
            time: 1
"#;
        let data = GameData::from_yaml(yaml).unwrap();
        let faction = data.faction("Loop").unwrap();
        let err = compute_chain_for_product(faction, "X", Fraction::ONE).unwrap_err();
        assert_eq!(ErrorCode::CircularDependency, err.code);
    }
}
