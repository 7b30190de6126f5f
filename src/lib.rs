//! Marketplace backend: accounts, shops, a category/subcategory product
//! catalog, advertisements, and the product engagement engine (likes with
//! idempotent toggle semantics, append-only star reviews, derived counters).

pub mod api;
pub mod catalog;
pub mod engagement;
pub mod users;
pub mod utils;

/// Entity ids are opaque and random, assigned at insert.
pub type Id = u32;
