//! Core types for Prato.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cnpj;
pub mod cpf;
pub mod id;
pub mod phone;
pub mod status;
pub mod uf;
pub mod zip_code;

pub use cnpj::{Cnpj, CnpjError};
pub use cpf::{Cpf, CpfError};
pub use id::*;
pub use phone::{Phone, PhoneError};
pub use status::*;
pub use uf::{Uf, UfError};
pub use zip_code::{ZipCode, ZipCodeError};
