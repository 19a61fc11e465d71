//! Lesson Shop Core - Shared types library.
//!
//! This crate provides the domain types used across all lesson shop components:
//! - `storefront` - HTTP catalog and order services
//! - `client` - API client and the cart/checkout engine
//! - `cli` - Command-line tools for migrations, seeding and catalog queries
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! on both sides of the wire.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, prices, customer fields, lessons and orders

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
