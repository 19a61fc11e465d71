//! Shopping cart.
//!
//! The cart holds one entry per unit: buying two places on a lesson adds
//! two entries. Adding and removing adjust the working copy of the lesson's
//! `spaces` straight away so the catalog shows what is still available;
//! nothing is written to the server until checkout.

use std::collections::BTreeMap;

use lesson_shop_core::{Lesson, LessonId, Price};

/// One reserved unit of a lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    /// The lesson as it looked when the unit was added.
    pub lesson: Lesson,
}

impl CartItem {
    #[must_use]
    pub const fn lesson_id(&self) -> LessonId {
        self.lesson.id
    }

    #[must_use]
    pub const fn price(&self) -> Price {
        self.lesson.price
    }
}

/// Ordered list of reserved units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Reserve one unit of `lesson`, decrementing its working `spaces`.
    ///
    /// Returns false and changes nothing when no spaces are left.
    pub fn add(&mut self, lesson: &mut Lesson) -> bool {
        let Some(remaining) = lesson.spaces.checked_sub(1) else {
            return false;
        };
        lesson.spaces = remaining;
        self.items.push(CartItem {
            lesson: lesson.clone(),
        });
        true
    }

    /// Release one unit of `lesson`, incrementing its working `spaces`.
    ///
    /// Only the first matching entry is removed. Returns false and changes
    /// nothing when the lesson is not in the cart.
    pub fn remove(&mut self, lesson: &mut Lesson) -> bool {
        if self.take_one(lesson.id).is_none() {
            return false;
        }
        lesson.spaces = lesson.spaces.saturating_add(1);
        true
    }

    /// Remove the first entry for `id` without touching any lesson.
    pub fn take_one(&mut self, id: LessonId) -> Option<CartItem> {
        let index = self.items.iter().position(|item| item.lesson_id() == id)?;
        Some(self.items.remove(index))
    }

    /// Number of units of `id` in the cart.
    #[must_use]
    pub fn units_of(&self, id: LessonId) -> u32 {
        let units = self
            .items
            .iter()
            .filter(|item| item.lesson_id() == id)
            .count();
        u32::try_from(units).unwrap_or(u32::MAX)
    }

    /// Units held per lesson.
    #[must_use]
    pub fn reservations(&self) -> BTreeMap<LessonId, u32> {
        let mut out = BTreeMap::new();
        for item in &self.items {
            *out.entry(item.lesson_id()).or_insert(0u32) += 1;
        }
        out
    }

    /// One id per unit, in the order the units were added.
    #[must_use]
    pub fn lesson_ids(&self) -> Vec<LessonId> {
        self.items.iter().map(CartItem::lesson_id).collect()
    }

    /// Sum of the prices of every unit.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartItem::price).sum()
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Empty the cart, handing back its entries.
    ///
    /// Spaces are not restored; callers that abandon the cart do that.
    pub fn drain(&mut self) -> Vec<CartItem> {
        std::mem::take(&mut self.items)
    }
}
