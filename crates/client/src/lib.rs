//! Lesson Shop client.
//!
//! Everything the catalog UI needs besides rendering:
//!
//! - [`api`] - the [`ShopApi`] seam and its `reqwest` implementation
//! - [`catalog`] - sorting of the lesson list
//! - [`cart`] - one-entry-per-unit cart with optimistic space accounting
//! - [`checkout`] - form validation, the checkout lifecycle and space plan
//! - [`session`] - [`ShopSession`], the application state tying them together
//!
//! The client holds a working copy of each lesson's `spaces` and writes final
//! counts back on checkout. The server has no atomic decrement, so two
//! clients checking out the same lesson at once can overwrite each other.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod session;

#[cfg(test)]
mod mock;

pub use api::{ClientError, HttpShopClient, ShopApi};
pub use cart::{Cart, CartItem};
pub use catalog::{CatalogSort, SortKey, SortOrder};
pub use checkout::{CheckoutError, CheckoutForm, CheckoutPhase, FormError, OrderReceipt};
pub use config::ClientConfig;
pub use session::{ShopSession, View};
