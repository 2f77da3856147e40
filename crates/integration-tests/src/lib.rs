//! Integration tests for Prato.
//!
//! # Test Categories
//!
//! - `order_lifecycle` - Status machine transitions
//! - `cart_pricing` - Cart merge and pricing scenarios
//! - `documents` - Document newtypes and address ownership
//!
//! These tests exercise the public surface of `prato-core` and
//! `prato-api` without a database; the transactional paths are covered by
//! the service-level unit tests next to the code.
