//! Fake Store storefront widget.
//!
//! Browses the public Fake Store catalog by category, filters it by title and
//! keeps a single persisted shopping cart. Pages and HTMX fragments are
//! rendered server-side with Askama.
//!
//! The crate is a library so the binary, the CLI and the integration tests
//! share the same catalog client, cart store and router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod storage;
