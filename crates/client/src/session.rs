//! Client application state.
//!
//! [`ShopSession`] owns everything the catalog UI shows: the working copy of
//! each lesson, the cart, the checkout form, search text, sort, the current
//! view and the checkout phase.
//!
//! The cart is a reservation log over the working copy. Every catalog load
//! re-applies it: a lesson's local `spaces` is the server's value minus the
//! units of it in the cart. Reloading the list (typing a search, say) never
//! loses or double-counts a reservation.

use std::collections::{BTreeMap, BTreeSet};

use futures::future::join_all;
use tracing::instrument;

use lesson_shop_core::{Lesson, LessonId, NewOrder, Price};

use crate::api::{ClientError, ShopApi};
use crate::cart::Cart;
use crate::catalog::CatalogSort;
use crate::checkout::{CheckoutError, CheckoutForm, CheckoutPhase, OrderReceipt, final_spaces};

/// Which page the UI shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Catalog,
    Checkout,
}

/// State of one customer's visit.
pub struct ShopSession<A: ShopApi> {
    api: A,
    inventory: BTreeMap<LessonId, Lesson>,
    visible: Vec<LessonId>,
    cart: Cart,
    form: CheckoutForm,
    search: String,
    sort: CatalogSort,
    view: View,
    phase: CheckoutPhase,
}

impl<A: ShopApi> ShopSession<A> {
    /// Create an empty session. Call [`load_catalog`](Self::load_catalog)
    /// to fetch lessons.
    pub fn new(api: A) -> Self {
        Self {
            api,
            inventory: BTreeMap::new(),
            visible: Vec::new(),
            cart: Cart::new(),
            form: CheckoutForm::default(),
            search: String::new(),
            sort: CatalogSort::default(),
            view: View::default(),
            phase: CheckoutPhase::default(),
        }
    }

    pub const fn api(&self) -> &A {
        &self.api
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Fetch the full catalog and clear the search text.
    ///
    /// # Errors
    ///
    /// Returns the API error; the session is unchanged.
    #[instrument(skip(self))]
    pub async fn load_catalog(&mut self) -> Result<(), ClientError> {
        let lessons = self.api.list_lessons().await.inspect_err(|e| {
            tracing::warn!(error = %e, "Failed to load catalog");
        })?;
        self.search.clear();
        self.absorb(lessons, true);
        Ok(())
    }

    /// Change the search text and refresh the visible lessons.
    ///
    /// Blank text reloads the full catalog; anything else is searched on the
    /// server.
    ///
    /// # Errors
    ///
    /// Returns the API error. The search text is updated but the lesson list
    /// is left as it was.
    #[instrument(skip(self))]
    pub async fn set_search(&mut self, text: &str) -> Result<(), ClientError> {
        text.clone_into(&mut self.search);

        let needle = text.trim();
        let (result, full) = if needle.is_empty() {
            (self.api.list_lessons().await, true)
        } else {
            (self.api.search_lessons(needle).await, false)
        };

        let lessons = result.inspect_err(|e| {
            tracing::warn!(error = %e, "Catalog search failed");
        })?;
        self.absorb(lessons, full);
        Ok(())
    }

    /// Merge lessons from the server into the working copy, re-applying the
    /// cart's reservations.
    ///
    /// A full load also forgets lessons the server no longer has, unless the
    /// cart still holds units of them.
    fn absorb(&mut self, lessons: Vec<Lesson>, full: bool) {
        let reservations = self.cart.reservations();

        self.visible = lessons.iter().map(|l| l.id).collect();
        for mut lesson in lessons {
            let reserved = reservations.get(&lesson.id).copied().unwrap_or(0);
            lesson.spaces = lesson.spaces.saturating_sub(reserved);
            self.inventory.insert(lesson.id, lesson);
        }

        if full {
            let keep: BTreeSet<LessonId> = self.visible.iter().copied().collect();
            self.inventory
                .retain(|id, _| keep.contains(id) || reservations.contains_key(id));
        }
    }

    /// The working copy of a lesson.
    #[must_use]
    pub fn lesson(&self, id: LessonId) -> Option<&Lesson> {
        self.inventory.get(&id)
    }

    /// Lessons from the latest load, in server order.
    #[must_use]
    pub fn visible_lessons(&self) -> Vec<&Lesson> {
        self.visible
            .iter()
            .filter_map(|id| self.inventory.get(id))
            .collect()
    }

    /// Visible lessons in the current sort order.
    #[must_use]
    pub fn sorted_lessons(&self) -> Vec<Lesson> {
        self.sort.sorted(self.visible_lessons())
    }

    pub const fn set_sort(&mut self, sort: CatalogSort) {
        self.sort = sort;
    }

    #[must_use]
    pub const fn sort(&self) -> CatalogSort {
        self.sort
    }

    #[must_use]
    pub fn search_text(&self) -> &str {
        &self.search
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Reserve one unit of a lesson.
    ///
    /// Returns false when the lesson is unknown or has no spaces left.
    pub fn add_to_cart(&mut self, id: LessonId) -> bool {
        let Some(lesson) = self.inventory.get_mut(&id) else {
            return false;
        };
        let added = self.cart.add(lesson);
        self.settle_phase();
        added
    }

    /// Release one unit of a lesson.
    ///
    /// Returns false when the cart holds no unit of it. Removing the last
    /// unit in the cart returns to the catalog view.
    pub fn remove_from_cart(&mut self, id: LessonId) -> bool {
        let removed = match self.inventory.get_mut(&id) {
            Some(lesson) => self.cart.remove(lesson),
            None => self.cart.take_one(id).is_some(),
        };
        if self.cart.is_empty() {
            self.view = View::Catalog;
        }
        self.settle_phase();
        removed
    }

    /// Abandon the cart, giving every reserved space back.
    pub fn clear_cart(&mut self) {
        for item in self.cart.drain() {
            if let Some(lesson) = self.inventory.get_mut(&item.lesson_id()) {
                lesson.spaces = lesson.spaces.saturating_add(1);
            }
        }
        self.view = View::Catalog;
        self.settle_phase();
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn cart_total(&self) -> Price {
        self.cart.total()
    }

    // =========================================================================
    // View & form
    // =========================================================================

    /// Switch between catalog and checkout. The checkout view needs a
    /// non-empty cart.
    pub fn toggle_view(&mut self) -> View {
        self.view = match self.view {
            View::Catalog if !self.cart.is_empty() => View::Checkout,
            _ => View::Catalog,
        };
        self.view
    }

    #[must_use]
    pub const fn view(&self) -> View {
        self.view
    }

    #[must_use]
    pub const fn phase(&self) -> CheckoutPhase {
        self.phase
    }

    #[must_use]
    pub const fn form(&self) -> &CheckoutForm {
        &self.form
    }

    pub fn set_name(&mut self, name: &str) {
        name.clone_into(&mut self.form.name);
        self.settle_phase();
    }

    pub fn set_phone(&mut self, phone: &str) {
        phone.clone_into(&mut self.form.phone);
        self.settle_phase();
    }

    /// Whether the checkout button is enabled.
    ///
    /// A failed checkout leaves the session cart-building, so the customer
    /// can retry straight away.
    #[must_use]
    pub fn can_checkout(&self) -> bool {
        self.phase.is_cart_building() && !self.cart.is_empty() && self.form.is_valid()
    }

    fn settle_phase(&mut self) {
        self.phase = if self.cart.is_empty() {
            CheckoutPhase::Browsing
        } else {
            CheckoutPhase::CartBuilding
        };
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Place the order and write each lesson's final space count back.
    ///
    /// Validation failures and an empty cart return an error without any
    /// request. On a network failure the cart and form are kept so the
    /// customer can retry; requests already sent are not undone.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError`] describing which step failed.
    #[instrument(skip(self), fields(units = self.cart.len()))]
    pub async fn submit_order(&mut self) -> Result<OrderReceipt, CheckoutError> {
        let (name, phone) = self.form.validate()?;
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let order = NewOrder {
            name,
            phone,
            lesson_ids: self.cart.lesson_ids(),
        };
        let plan = final_spaces(&self.cart, &self.inventory);
        self.phase = CheckoutPhase::CheckoutPending;

        let created = self.api.create_order(&order).await;
        let order_id = match created {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(error = %e, "Order creation failed");
                self.phase = CheckoutPhase::Failed;
                return Err(CheckoutError::OrderFailed(e));
            }
        };

        // Every update runs to completion, even after another one fails
        let updates = plan
            .iter()
            .map(|(&id, &spaces)| self.api.update_spaces(id, spaces));
        let (updated, failed): (Vec<_>, Vec<_>) =
            join_all(updates).await.into_iter().partition(Result::is_ok);
        let lessons: Vec<Lesson> = updated.into_iter().filter_map(Result::ok).collect();
        let mut errors = failed.into_iter().filter_map(Result::err);

        if let Some(first) = errors.next() {
            let failed = errors.count() + 1;
            tracing::error!(
                order_id = %order_id,
                failed,
                written = lessons.len(),
                error = %first,
                "Order placed but lesson spaces were not updated"
            );
            self.phase = CheckoutPhase::Failed;
            return Err(CheckoutError::SpacesUpdateFailed {
                order_id,
                failed,
                source: first,
            });
        }

        // The cart is gone, so the server's counts are the working copy now
        for lesson in &lessons {
            self.inventory.insert(lesson.id, lesson.clone());
        }
        self.cart.drain();
        self.form.clear();
        self.view = View::Catalog;
        self.phase = CheckoutPhase::Completed;

        tracing::info!(order_id = %order_id, lessons = lessons.len(), "Order placed");
        Ok(OrderReceipt { order_id, lessons })
    }
}
