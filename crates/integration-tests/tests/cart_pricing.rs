//! Integration tests for cart normalization and pricing.
//!
//! These mirror the order-creation scenarios end to end at the
//! calculation level: merge the cart, price each product, sum the
//! subtotal, add the delivery fee, compare against the store minimum.

use prato_core::cart::{self, CartError, CartLine};
use prato_core::pricing;
use rust_decimal::{Decimal, dec};
use uuid::Uuid;

fn line(product_uuid: Uuid, quantity: u32) -> CartLine {
    CartLine {
        product_uuid,
        quantity,
    }
}

// =============================================================================
// Cart Normalization
// =============================================================================

#[test]
fn test_duplicate_lines_collapse_into_one_item() {
    let burger = Uuid::new_v4();
    let soda = Uuid::new_v4();

    let merged = cart::normalize(&[
        line(burger, 1),
        line(soda, 2),
        line(burger, 1),
        line(burger, 2),
    ])
    .expect("valid cart");

    assert_eq!(merged.len(), 2, "one entry per distinct product");
    assert_eq!(merged.get(&burger), Some(&4), "quantities are summed");
    assert_eq!(merged.get(&soda), Some(&2));
}

#[test]
fn test_empty_cart_is_rejected() {
    assert_eq!(cart::normalize(&[]), Err(CartError::Empty));
}

// =============================================================================
// Pricing Scenarios
// =============================================================================

#[test]
fn test_successful_order_scenario() {
    // Store with min_order_value = 20.00, one active product at 15.00
    // with no discount, cart of quantity 2.
    let min_order_value = dec!(20.00);
    let delivery_fee = dec!(5.00);

    let unit_price = pricing::effective_price(dec!(15.00), dec!(0));
    assert_eq!(unit_price, dec!(15.00));

    let subtotal = pricing::subtotal([(unit_price, 2)]);
    assert_eq!(subtotal, dec!(30.00));
    assert!(subtotal >= min_order_value);

    let total = pricing::order_total(subtotal, delivery_fee);
    assert_eq!(total, dec!(35.00));
}

#[test]
fn test_rejected_order_scenario() {
    // Same store, cart totaling 10.00: below the 20.00 minimum.
    let min_order_value = dec!(20.00);
    let subtotal = pricing::subtotal([(dec!(10.00), 1)]);
    assert!(subtotal < min_order_value);
}

#[test]
fn test_minimum_order_value_boundary() {
    let min_order_value = dec!(20.00);

    // Exactly at the minimum: accepted.
    let at_minimum = pricing::subtotal([(dec!(10.00), 2)]);
    assert!(at_minimum >= min_order_value);

    // One cent below: rejected.
    let one_cent_below = pricing::subtotal([(dec!(19.99), 1)]);
    assert!(one_cent_below < min_order_value);
}

#[test]
fn test_discounted_price_feeds_the_subtotal() {
    // 25% off 12.00 = 9.00, twice = 18.00
    let unit_price = pricing::effective_price(dec!(12.00), dec!(25));
    assert_eq!(unit_price, dec!(9.00));
    assert_eq!(pricing::subtotal([(unit_price, 2)]), dec!(18.00));
}

#[test]
fn test_discount_boundaries() {
    assert_eq!(pricing::effective_price(dec!(37.90), dec!(0)), dec!(37.90));
    assert_eq!(pricing::effective_price(dec!(37.90), dec!(100)), dec!(0.00));
}

#[test]
fn test_rounding_is_half_up_not_bankers() {
    // 10.05 at 50% = 5.025; half-up gives 5.03, banker's would give 5.02.
    assert_eq!(pricing::effective_price(dec!(10.05), dec!(50)), dec!(5.03));
}

#[test]
fn test_recompute_is_idempotent() {
    let items = [(dec!(9.90), 3), (dec!(4.55), 1)];
    let first = pricing::subtotal(items);
    let second = pricing::subtotal(items);
    assert_eq!(first, second);
    assert_eq!(
        pricing::order_total(first, dec!(7.00)),
        pricing::order_total(second, dec!(7.00)),
    );
}

#[test]
fn test_empty_item_set_has_zero_subtotal() {
    let subtotal = pricing::subtotal(std::iter::empty::<(Decimal, u32)>());
    assert_eq!(subtotal, Decimal::ZERO);
    // Total degenerates to the delivery fee alone.
    assert_eq!(pricing::order_total(subtotal, dec!(6.50)), dec!(6.50));
}
