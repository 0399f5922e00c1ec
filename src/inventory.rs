//! Inventory Ledger
//!
//! TigerStyle: stock moves only through reserve and release.
//!
//! Reservation is check-then-commit. Every product, the combined mass and
//! the stock levels are checked before any quantity changes, so a rejected
//! request leaves the ledger exactly as it was.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{NestError, NestResult};

/// Product identifier.
pub type ProductId = i64;

/// A stocked product. Also the seed record and the client view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(rename = "product")]
    pub name: String,
    pub mass_g: f64,
    pub quantity: u32,
}

/// What clients see of a product.
pub type ProductView = Product;

/// Per-product stock with a payload limit.
#[derive(Debug)]
pub struct InventoryLedger {
    products: BTreeMap<ProductId, Product>,
    payload_mass_g_max: f64,
}

impl InventoryLedger {
    /// Build a ledger, rejecting duplicate ids or names and bad masses.
    ///
    /// # Errors
    /// Returns `Validation` naming the offending record.
    pub fn load(products: Vec<Product>, payload_mass_g_max: f64) -> NestResult<Self> {
        let mut ledger = Self {
            products: BTreeMap::new(),
            payload_mass_g_max,
        };

        for product in products {
            if !(product.mass_g.is_finite() && product.mass_g >= 0.0) {
                return Err(NestError::Validation(format!(
                    "product {} has invalid mass {}",
                    product.id, product.mass_g
                )));
            }
            if ledger.products.contains_key(&product.id) {
                return Err(NestError::Validation(format!(
                    "duplicate product id {}",
                    product.id
                )));
            }
            if ledger.products.values().any(|p| p.name == product.name) {
                return Err(NestError::Validation(format!(
                    "duplicate product name {:?}",
                    product.name
                )));
            }
            ledger.products.insert(product.id, product);
        }

        Ok(ledger)
    }

    /// Reserve one unit per listed id; repeats reserve several units.
    ///
    /// Checks run in order: unknown ids, combined mass, then stock.
    ///
    /// # Errors
    /// - `ProductsNotFound` listing every unknown id
    /// - `CapacityExceeded` if the combined mass is over the payload limit
    /// - `InsufficientStock` listing an id once per unit it is short
    ///
    /// # Returns
    /// Combined mass in grams.
    pub fn reserve(&mut self, product_ids: &[ProductId]) -> NestResult<f64> {
        let mut missing = Vec::new();
        let mut insufficient = Vec::new();
        let mut remaining: HashMap<ProductId, u32> = HashMap::new();
        let mut mass_g = 0.0;

        for &id in product_ids {
            let Some(product) = self.products.get(&id) else {
                missing.push(id);
                continue;
            };

            mass_g += product.mass_g;
            let left = remaining.entry(id).or_insert(product.quantity);
            if *left > 0 {
                *left -= 1;
            } else {
                insufficient.push(id);
            }
        }

        if !missing.is_empty() {
            return Err(NestError::ProductsNotFound(missing));
        }
        if mass_g > self.payload_mass_g_max {
            return Err(NestError::CapacityExceeded {
                mass_g,
                max_g: self.payload_mass_g_max,
            });
        }
        if !insufficient.is_empty() {
            return Err(NestError::InsufficientStock(insufficient));
        }

        // Commit
        for (id, left) in remaining {
            if let Some(product) = self.products.get_mut(&id) {
                product.quantity = left;
            }
        }

        Ok(mass_g)
    }

    /// Return one unit per listed id. Unknown ids are skipped.
    pub fn release(&mut self, product_ids: &[ProductId]) {
        for id in product_ids {
            match self.products.get_mut(id) {
                Some(product) => product.quantity = product.quantity.saturating_add(1),
                None => tracing::debug!(product_id = id, "restock skipped unknown product"),
            }
        }
    }

    /// Look up a product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    /// All products in id order.
    #[must_use]
    pub fn list(&self) -> Vec<ProductView> {
        self.products.values().cloned().collect()
    }
}
