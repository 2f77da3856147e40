//! Cart normalization.
//!
//! An incoming order request carries an ordered list of
//! `(product_uuid, quantity)` pairs and may repeat the same product.
//! Normalization merges repetitions by summing their quantities, producing
//! one entry per distinct product.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One requested line of a cart, as sent by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Public identifier of the requested product.
    pub product_uuid: Uuid,
    /// Requested quantity, at least 1.
    pub quantity: u32,
}

/// Errors produced by cart normalization.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The cart contained no lines.
    #[error("must contain at least one item")]
    Empty,
    /// A line carried a zero quantity.
    #[error("quantity must be at least 1 for product {product_uuid}")]
    ZeroQuantity {
        /// The offending product.
        product_uuid: Uuid,
    },
}

/// Merge cart lines into a product → total-quantity map.
///
/// Quantities of repeated products are summed, never overwritten. The
/// result is ordered by product UUID, which keeps downstream item creation
/// deterministic.
///
/// # Errors
///
/// Returns [`CartError::Empty`] for an empty input and
/// [`CartError::ZeroQuantity`] if any line has quantity 0.
pub fn normalize(lines: &[CartLine]) -> Result<BTreeMap<Uuid, u32>, CartError> {
    if lines.is_empty() {
        return Err(CartError::Empty);
    }

    let mut merged: BTreeMap<Uuid, u32> = BTreeMap::new();
    for line in lines {
        if line.quantity == 0 {
            return Err(CartError::ZeroQuantity {
                product_uuid: line.product_uuid,
            });
        }
        let entry = merged.entry(line.product_uuid).or_insert(0);
        *entry = entry.saturating_add(line.quantity);
    }

    Ok(merged)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(uuid: Uuid, quantity: u32) -> CartLine {
        CartLine {
            product_uuid: uuid,
            quantity,
        }
    }

    #[test]
    fn test_empty_cart_fails() {
        assert_eq!(normalize(&[]), Err(CartError::Empty));
    }

    #[test]
    fn test_distinct_products_pass_through() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let merged = normalize(&[line(a, 1), line(b, 3)]).unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[&a], 1);
        assert_eq!(merged[&b], 3);
    }

    #[test]
    fn test_duplicates_are_summed() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let merged = normalize(&[line(a, 2), line(b, 1), line(a, 3), line(a, 1)]).unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[&a], 6);
        assert_eq!(merged[&b], 1);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let a = Uuid::new_v4();
        assert_eq!(
            normalize(&[line(a, 0)]),
            Err(CartError::ZeroQuantity { product_uuid: a })
        );
    }
}
