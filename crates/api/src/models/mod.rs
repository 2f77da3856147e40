//! Domain models backing the database rows.
//!
//! These structs map 1:1 to tables (via `sqlx::FromRow`) and carry the
//! validated core newtypes where a column has a fixed format.

pub mod account;
pub mod address;
pub mod catalog;
pub mod order;
pub mod store;

pub use account::{Account, UserIdentity};
pub use address::Address;
pub use catalog::{Product, Section};
pub use order::{Order, OrderItem};
pub use store::{OpeningHours, Store};
