//! Core types for Fakestore.
//!
//! This module provides type-safe wrappers for the catalog and cart domain.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;

pub use cart::{Cart, CartSummary, LineItem, LineSummary};
pub use id::*;
pub use price::{Price, PriceError};
pub use product::{Category, Product};
