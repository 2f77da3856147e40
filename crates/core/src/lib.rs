//! Prato Core - Shared domain library.
//!
//! This crate provides the common types and pure business calculations used
//! across the Prato components:
//!
//! - `api` - REST backend (orders, catalog, accounts, addresses)
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. Pricing and cart normalization live
//! here because they are deterministic calculations; everything that needs
//! a transaction lives in the `api` crate's service layer.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, documents, statuses
//! - [`owner`] - Address ownership (account XOR store)
//! - [`cart`] - Cart line merging
//! - [`pricing`] - Discount and totals arithmetic

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod owner;
pub mod pricing;
pub mod types;

pub use cart::{CartError, CartLine};
pub use owner::AddressOwner;
pub use types::*;
