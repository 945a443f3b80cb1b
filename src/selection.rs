// Copyright 2026 The Production Chain Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The user's current faction/product/amount choice.
//!
//! A product is only meaningful under a faction, so changing faction
//! clears the product and selecting a product without a faction is
//! rejected.  Every accepted change bumps a generation counter; query
//! results tagged with an older generation are stale and must be
//! discarded by the consumer.

use crate::common::Result;
use crate::fraction::Fraction;
use crate::query_err;

/// The amount-consumption rule: non-positive input is treated as 1,
/// positive input passes through unchanged.
pub fn effective_amount(amount: Fraction) -> Fraction {
    if amount.is_positive() {
        amount
    } else {
        Fraction::ONE
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    faction: Option<String>,
    product: Option<String>,
    amount: Fraction,
    generation: u64,
}

impl Default for Selection {
    fn default() -> Self {
        Selection {
            faction: None,
            product: None,
            amount: Fraction::ONE,
            generation: 0,
        }
    }
}

impl Selection {
    pub fn new() -> Selection {
        Selection::default()
    }

    pub fn faction(&self) -> Option<&str> {
        self.faction.as_deref()
    }

    pub fn product(&self) -> Option<&str> {
        self.product.as_deref()
    }

    /// The stored amount, exactly as set (may be non-positive).
    pub fn amount(&self) -> Fraction {
        self.amount
    }

    /// The amount downstream consumers use: non-positive values are
    /// coerced to 1 here, never rewritten in place.
    pub fn effective_amount(&self) -> Fraction {
        effective_amount(self.amount)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Select a faction (or clear it).  Moving to a different faction
    /// clears the product, since the old product may not exist there.
    pub fn set_faction(&mut self, faction: Option<String>) {
        if self.faction == faction {
            return;
        }
        self.faction = faction;
        self.product = None;
        self.generation += 1;
    }

    /// Select a product (or clear it).  Selecting one while no faction
    /// is chosen is rejected and leaves the state untouched; the UI
    /// keeps the control disabled in that case.
    pub fn set_product(&mut self, product: Option<String>) -> Result<()> {
        if product.is_some() && self.faction.is_none() {
            return query_err!(
                InvalidSelection,
                "cannot select a product with no faction selected".to_string()
            );
        }
        if self.product != product {
            self.product = product;
            self.generation += 1;
        }
        Ok(())
    }

    pub fn set_amount(&mut self, amount: Fraction) {
        if self.amount != amount {
            self.amount = amount;
            self.generation += 1;
        }
    }

    /// The (faction, product) pair if both are selected.
    pub fn pair(&self) -> Option<(&str, &str)> {
        match (&self.faction, &self.product) {
            (Some(faction), Some(product)) => Some((faction, product)),
            _ => None,
        }
    }
}
