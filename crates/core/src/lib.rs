//! Fakestore Core - Shared types library.
//!
//! This crate provides the types shared by all Fakestore components:
//! - `storefront` - Catalog loader, cart store, and the HTMX widget server
//! - `cli` - Command-line tools for browsing the catalog and managing the cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no storage,
//! no HTTP clients. Cart aggregation and total computation live here so they
//! can be tested without any collaborators.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, prices, products, categories, and the cart

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
