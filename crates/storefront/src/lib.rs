//! Lesson Shop Storefront library.
//!
//! Catalog and order services over a document store, exposed as an axum
//! router so the binary, the integration tests and the router tests all
//! build the same application.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
