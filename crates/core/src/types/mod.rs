//! Core types for the lesson shop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod customer;
pub mod id;
pub mod lesson;
pub mod order;
pub mod price;

pub use customer::{CustomerName, CustomerNameError, PhoneError, PhoneNumber};
pub use id::*;
pub use lesson::{Lesson, LessonPatch, NewLesson};
pub use order::{NewOrder, Order, OrderCreated};
pub use price::{Price, PriceError};
